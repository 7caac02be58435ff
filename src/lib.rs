//! Pagecrop Server Library
//!
//! This crate exposes the server's modules so integration tests can drive
//! the router and the crop/sweep cores directly. The server binary is in
//! main.rs.
//!
//! # Modules
//!
//! - `crop`: batch-wise page cropping over lopdf
//! - `sweep`: age-based retention sweep of the staging/output directories
//! - `routes`: HTTP endpoints and router assembly

pub mod config;
pub mod crop;
pub mod error;
pub mod routes;
pub mod state;
pub mod sweep;
