//! Tools API — REST CRUD over a collection of tool records.

pub mod config;
pub mod error;
pub mod server;
pub mod store;
pub mod tools;
