//! Shared test utilities for opdir.

pub mod fixtures;
pub mod logging;

#[cfg(test)]
pub mod arbitrary;
