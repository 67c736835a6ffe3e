pub mod admin;
pub mod config;
pub mod error;
pub mod models;
pub mod node;
pub mod store;
pub mod views;
