//! Shared primitives, traits, and utilities for the murex cheminformatics crates.
//!
//! `murex-core` provides the foundation the domain crates build on:
//!
//! - **Error types** — [`MurexError`] and [`Result`] for structured error handling
//! - **Traits** — Core abstractions like [`ContentAddressable`] and [`Summarizable`]
//! - **Bitsets** — [`BitSet`], the dense side-table used for match bookkeeping
//! - **Hashing** — SHA-256 content addressing for data integrity

pub mod bitset;
pub mod error;
pub mod hash;
pub mod traits;

pub use bitset::BitSet;
pub use error::{MurexError, Result};
pub use traits::*;
