//! Shared foundational types used across the PPA sweep collector.
//!
//! This crate provides sweep parameter spaces and the points they enumerate,
//! content hashing for run fingerprints, and frequency values.

#![warn(missing_docs)]

pub mod frequency;
pub mod hash;
pub mod point;

pub use frequency::{Frequency, ParseFrequencyError};
pub use hash::ContentHash;
pub use point::{Parameter, ParameterPoint, ParameterSpace, SpaceError};
