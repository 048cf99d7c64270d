//! # Model Layer
//!
//! Entities and the repositories that read and write them.

pub mod store;
