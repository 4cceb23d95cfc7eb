//! Core types for Tandem.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod couple_code;
pub mod id;
pub mod taxonomy;

pub use couple_code::{CoupleCode, CoupleCodeError};
pub use id::*;
pub use taxonomy::*;
