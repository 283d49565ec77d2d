//! User Accounts Backend Library
//!
//! Account registration and management behind stateless bearer-token
//! authentication. This library exposes the backend modules for use in
//! tests and by the server binary.

pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod repositories;
pub mod routes;
pub mod services;
pub mod state;
