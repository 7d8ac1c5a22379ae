//! Domain aggregates exposed by the back-office service layer.

pub mod admin;
pub mod customer;
pub mod filter;
pub mod money;
pub mod types;
