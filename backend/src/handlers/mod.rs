//! HTTP handlers for the Bakery Management Platform API

pub mod customer;
pub mod health;
pub mod ingredient;
pub mod order;
pub mod product;
pub mod receipt;
pub mod reporting;

pub use customer::*;
pub use health::*;
pub use ingredient::*;
pub use order::*;
pub use product::*;
pub use receipt::*;
pub use reporting::*;
