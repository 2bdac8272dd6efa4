//! Pipeline operators
//!
//! This module provides the stage contract and the evaluation, selection,
//! cloning and mutation stages.

pub mod cloning;
pub mod evaluate;
pub mod mutation;
pub mod selection;
pub mod traits;

pub mod prelude {
    pub use super::cloning::*;
    pub use super::evaluate::*;
    pub use super::mutation::*;
    pub use super::selection::*;
    pub use super::traits::*;
}
