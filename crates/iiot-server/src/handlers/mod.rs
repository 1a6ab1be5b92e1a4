//! HTTP request handlers organized by domain
//!
//! Each submodule contains handlers for a specific API area.

pub mod alerts;
pub mod chat;
pub mod dashboard;
pub mod evaluate;
pub mod health;
pub mod readings;
pub mod sensors;

// Re-export all handlers for use in router
pub use alerts::*;
pub use chat::*;
pub use dashboard::*;
pub use evaluate::*;
pub use health::*;
pub use readings::*;
pub use sensors::*;
