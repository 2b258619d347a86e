//! A mutable reduction protocol: fold a sequence into one value, sequentially or in parallel.
//!
//! A [`Reduction`] is four operations:
//!
//! - **seed**: [`create_accumulator()`](Reduction::create_accumulator) makes a fresh accumulator.
//! - **accumulate**: [`accumulate()`](Reduction::accumulate) folds one item into it, in place.
//! - **merge**: [`combiner()`](Reduction::combiner) optionally merges two partial accumulators.
//! - **finish**: [`finish()`](Reduction::finish) turns the last accumulator into the output.
//!
//! The reduction only describes *how* to fold. [`reduce()`] decides *where*: on the calling
//! thread, or split into partitions on the rayon pool.
//!
//! # Motivation
//!
//! Suppose we are given the wish lists of some customers and we are asked who wants what.
//!
//! - Approach 1: a loop
//!
//! ```
//! use std::collections::{HashMap, HashSet};
//!
//! let wishes = [("Patrick", ["onion", "ice cream"]), ("Steven", ["ice cream", "cable"])];
//!
//! let mut by_item: HashMap<&str, HashSet<&str>> = HashMap::new();
//! for (who, items) in wishes {
//!     for item in items {
//!         by_item.entry(item).or_default().insert(who);
//!     }
//! }
//!
//! assert_eq!(by_item["ice cream"], HashSet::from(["Patrick", "Steven"]));
//! ```
//!
//! **Cons:** This is single-threaded, and making it parallel means rewriting it:
//! one map per thread plus a merge, or a map behind a lock.
//!
//! - Approach 2: [`rayon`]'s `fold` and `reduce`
//!
//! Parallel, but the seed, the fold and the merge are three closures scattered across the
//! call site, written again at every call site.
//!
//! This crate names the whole recipe once, and lets the caller pick the execution:
//!
//! ```
//! use std::collections::HashSet;
//! use better_reduce::{prelude::*, Execution, GroupSets};
//!
//! let wishes = [("Patrick", ["onion", "ice cream"]), ("Steven", ["ice cream", "cable"])];
//! let by_item = GroupSets::new(|(who, items): (&'static str, [&'static str; 2])| (items, who));
//!
//! for execution in [Execution::Sequential, Execution::parallel(), Execution::concurrent()] {
//!     let groups = wishes.reduce_in(&by_item, execution).unwrap();
//!     assert_eq!(*groups.get("ice cream").unwrap(), HashSet::from(["Patrick", "Steven"]));
//! }
//! ```
//!
//! # Reductions
//!
//! - [`Joining`]: joins strings with a delimiter. Sequential only.
//! - [`GroupSets`]: groups labels into a set per key. Runs in every mode, including
//!   [`Execution::Concurrent`] where all workers share one map.
//! - [`BitString`]: decodes a list of indices and ranges into a string of `0`s and `1`s.
//!   Sequential only.
//! - [`Reducer`]: any reduction, from closures.
//!
//! # Errors
//!
//! A reduction either yields its output or a [`ReduceError`], never a partial output.
//! Running a reduction without a combiner in parallel is a
//! [`Configuration`](ReduceError::Configuration) error rather than a wrong answer:
//!
//! ```
//! use better_reduce::{prelude::*, Joining};
//!
//! let names = ["Joe", "Steven", "Patrick"];
//!
//! assert_eq!(names.reduce_in(&Joining::default(), false).unwrap(), "Joe,Steven,Patrick");
//! assert!(names.reduce_in(&Joining::default(), true).unwrap_err().is_configuration());
//! ```

#![cfg_attr(docsrs, feature(doc_cfg))]

mod bits;
mod error;
mod exec;
mod group;
mod join;
pub mod prelude;
mod reduction;

#[cfg(test)]
mod test_utils;

pub use bits::*;
pub use error::*;
pub use exec::*;
pub use group::*;
pub use join::*;
pub use reduction::*;
