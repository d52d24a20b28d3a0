//! Regions Core - capability flags and ownership primitives
//!
//! This crate provides the type-safe building blocks the rest of Regions uses
//! to record which protection and permission flags are set, and who owns them.
//!
//! # Building Blocks
//!
//! - [`IndexedEnum`] / [`indexed_enum!`]: closed enumerations whose variants
//!   carry a dense offset and a case-insensitive configuration key
//! - [`CapabilitySet`]: bitset of variants of one enumeration, with
//!   [`CapabilitySnapshot`] as its read-only view
//! - [`OwnershipReference`]: weak child-to-parent back-reference
//! - [`ConfigSection`] and [`codec`]: key-list persistence that tolerates
//!   unknown keys
//!
//! # Threading
//!
//! Ownership primitives are `Rc`-based: an owner and everything it owns live
//! on one thread. Key registries are immutable once built and safe to read
//! from any thread; snapshots are `Arc`-backed and `Send`.

#![forbid(unsafe_code)]

// Lets `indexed_enum!` name this crate by path from inside it too.
extern crate self as regions_core;

/// Indexed enumerations and their key registries
pub mod indexed;

/// Bitset-backed capability sets
pub mod capability_set;

/// Weak parent references
pub mod ownership;

/// Hierarchical configuration stores
pub mod config;

/// Key-list persistence for capability sets
pub mod codec;

/// Unified error handling
pub mod errors;

pub use capability_set::{CapabilitySet, CapabilitySnapshot};
pub use config::ConfigSection;
pub use errors::{RegionsError, Result};
pub use indexed::{IndexedEnum, KeyRegistry};
pub use ownership::OwnershipReference;
pub use strum::IntoEnumIterator;

#[doc(hidden)]
pub mod __private {
    pub use once_cell::sync::Lazy;
    pub use serde;
    pub use strum;
}
