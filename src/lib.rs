pub mod appointments;
pub mod auth;
pub mod config;
pub mod crypto;
pub mod error;
pub mod models;
pub mod notify;
pub mod session;
pub mod store;
pub mod web;
