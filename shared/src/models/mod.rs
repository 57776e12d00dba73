//! Domain models for the Bakery Management Platform

mod ingredient;
mod order;
mod receipt;

pub use ingredient::*;
pub use order::*;
pub use receipt::*;
