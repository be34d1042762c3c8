//! # TaskHub API Server Library
//!
//! HTTP layer of TaskHub: routing, configuration and error mapping on top
//! of `taskhub-shared`.
//!
//! ## Modules
//!
//! - `app`: Application state and router builder
//! - `config`: Configuration management
//! - `error`: Error handling and HTTP response mapping
//! - `routes`: API route handlers

pub mod app;
pub mod config;
pub mod error;
pub mod routes;
