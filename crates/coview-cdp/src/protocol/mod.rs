//! CDP protocol domain types.
//!
//! Only the domains the mediation tier actually drives are typed here; each
//! module mirrors the documented schemas of its CDP domain.

pub mod accessibility;
pub mod dom;
pub mod emulation;
pub mod input;
pub mod page;
mod page_screencast;
pub mod runtime;
pub mod target_domain;

// Re-export screencast types alongside the rest of the Page domain.
pub use page_screencast::*;
