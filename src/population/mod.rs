//! Population management
//!
//! This module provides the Individual and Population types and the
//! attribute bags individuals carry.

pub mod attributes;
pub mod individual;
#[allow(clippy::module_inception)]
pub mod population;

pub mod prelude {
    pub use super::attributes::*;
    pub use super::individual::*;
    pub use super::population::*;
}
