//! HTTP request handlers organized by domain
//!
//! Each submodule contains handlers for a specific API area.

pub mod audit;
pub mod goals;
pub mod plan;
pub mod profile;
pub mod wallets;

// Re-export all handlers for use in router
pub use audit::*;
pub use goals::*;
pub use plan::*;
pub use profile::*;
pub use wallets::*;
