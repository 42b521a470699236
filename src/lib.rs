//! zmconf library
//!
//! Layered configuration resolution: a key/value file merged with rows of a
//! relational `Config` table into one registry.

pub mod cli;
pub mod config;
pub mod db;
pub mod error;
pub mod format;
pub mod logging;
pub mod types;
