//! Wire models exchanged with the backend and configuration sources.

pub mod auth;
pub mod config;
pub mod customer;
pub mod envelope;
pub mod users;
