//! Shared utilities.
//!
//! Common utilities used across the crate: content hashing and test helpers.

pub mod hash;

#[cfg(test)]
pub mod testutil;
