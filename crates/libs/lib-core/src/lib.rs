//! # Core Library
//!
//! Configuration, errors, pagination, entity models, repositories and the
//! request/response DTOs shared by the web layer.

pub mod config;
pub mod dto;
pub mod error;
pub mod model;
pub mod pagination;

// Re-export commonly used types
pub use config::Config;
pub use error::{AppError, FieldErrors, Result};
pub use model::store::{create_memory_pool, create_pool, migrate, DbPool};
pub use pagination::{Page, PageRequest, SortDirection};
