//! Relay Routes
//!
//! Route handlers organized by functionality.

pub mod cameras;
pub mod health;
pub mod history;
pub mod image;
