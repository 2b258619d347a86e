//! Re-exports commonly used items from this crate.
//!
//! This module is intended to be imported with a wildcard, providing
//! convenient access to the traits needed to define and run reductions.
//!
//! # Example
//!
//! ```
//! use better_reduce::prelude::*;
//! ```

pub use crate::exec::{ReduceExt, reduce};
pub use crate::reduction::{Combine, Reduction, SharedAccumulate};
