//! Business logic services for the Bakery Management Platform

pub mod customer;
pub mod ingredient;
pub mod order;
pub mod product;
pub mod receipt;
pub mod reporting;
pub mod sequence;

pub use customer::CustomerService;
pub use ingredient::IngredientService;
pub use order::OrderService;
pub use product::ProductService;
pub use receipt::ReceiptService;
pub use reporting::ReportingService;
