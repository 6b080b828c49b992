//! Secret handling utilities.
//!
//! Re-exports the secrecy types that appear in [`SupabaseConfig`] so callers
//! can read credentials without depending on secrecy directly.
//!
//! [`SupabaseConfig`]: super::SupabaseConfig

pub use secrecy::{ExposeSecret, SecretString};
