//! Custodia - Home-care biomedical equipment management
//!
//! A Rust server for tracking biomedical equipment loaned to home-care
//! patients and staff, including the custody-transfer chain that gates
//! equipment before it may be loaned out.

use std::sync::Arc;

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod repository;
pub mod services;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub services: Arc<services::Services>,
}
