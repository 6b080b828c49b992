//! # supabase-bootstrap
//!
//! Configuration and client bootstrap for a hosted Supabase project.
//!
//! Reads credentials from the environment, builds anon or service-role
//! clients over the REST API, and captures best-effort schema snapshots
//! (reachable tables and storage buckets) as JSON.

pub mod client;
pub mod config;
pub mod error;
pub mod scaffold;
pub mod snapshot;
pub mod telemetry;
