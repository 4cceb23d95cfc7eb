//! Tandem Client - Offline-tolerant backend access for Tandem.
//!
//! This crate is the I/O half of the Tandem client stack. It owns everything
//! between [`tandem_core`](tandem_core)'s pure types and the wire:
//! - [`store`] - Two-tier preference store (in-memory cache over a durable file)
//! - [`pairing`] - Couple code lifecycle and the pairing gate
//! - [`api`] - HTTP client with cache-backed reads for offline tolerance
//! - [`badges`] - Reconciler that merges local achievement state with the server
//! - [`milestones`] - Client-local milestone journal
//! - [`profile`] - Avatar and account profile persistence
//!
//! # Offline tolerance
//!
//! Every GET routed through [`api::ApiClient`] caches its last successful
//! response body in the preference store. When the network is unreachable or a
//! request times out, the client serves that cached body and marks the result
//! as [`api::Source::Cache`] so callers can surface staleness to the user.
//! Writes are never replayed from cache; a failed write is a failed write.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod badges;
pub mod config;
pub mod milestones;
pub mod pairing;
pub mod profile;
pub mod store;

pub use api::{ApiClient, ApiError, Fetched, Source};
pub use badges::{BadgeReconciler, SyncReport};
pub use config::{ClientConfig, ConfigError};
pub use milestones::MilestoneJournal;
pub use pairing::{Gate, PairingError, PairingResolver};
pub use profile::ProfileManager;
pub use store::{FileStore, LayeredStore, MemoryStore, PreferenceStore, StoreError, keys};
