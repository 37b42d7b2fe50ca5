//! HTTP handlers for the agriscan service.

pub mod analyze;
pub mod health;

pub use analyze::analyze_leaf;
pub use health::health_check;
