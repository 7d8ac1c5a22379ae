//! DTO modules that bridge services with the JSON API.

pub mod auth;
pub mod customers;
pub mod dashboard;
pub mod users;
