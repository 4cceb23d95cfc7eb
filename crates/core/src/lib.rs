//! Tandem Core - Shared domain types.
//!
//! This crate provides the types used across all Tandem components:
//! - `client` - Pairing, local persistence, and the backend API client
//! - `cli` - Command-line interface over the client
//!
//! # Architecture
//!
//! The core crate contains only types and pure logic - no I/O, no HTTP,
//! no storage access. This keeps it lightweight and allows it to be used
//! anywhere, including inside test fixtures.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for the couple code, type-safe IDs, and
//!   the closed vocabularies shared with the backend
//! - [`models`] - Wire structs for the backend's REST resources
//! - [`badges`] - The badge catalog and the pure achievement rule engine

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod badges;
pub mod models;
pub mod types;

pub use badges::{BADGE_KEYS, BadgeState, CounterSnapshot};
pub use models::*;
pub use types::*;
