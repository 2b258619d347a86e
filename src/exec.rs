//! Running a [`Reduction`] over a sequence.
//!
//! [`reduce()`] is the single entry point. The [`Execution`] mode decides how the input is
//! folded:
//!
//! - [`Execution::Sequential`]: one accumulator, items in input order.
//! - [`Execution::Parallel`]: the input is split into contiguous partitions, each folded into its
//!   own accumulator on the rayon pool. The partial accumulators are then merged pairwise as a
//!   balanced tree. Requires a [`combiner()`](Reduction::combiner).
//! - [`Execution::Concurrent`]: one accumulator shared by every worker, for reductions declaring
//!   [`Characteristics::CONCURRENT`](crate::Characteristics::CONCURRENT). Other reductions fall
//!   back to [`Execution::Parallel`].
//!
//! Parallel modes run on the current rayon pool. Use [`rayon::ThreadPool::install()`] to pick
//! another one.

use std::num::NonZeroUsize;

use rayon::prelude::*;
use tracing::{debug, trace};

use crate::{
    error::{ConfigError, ReduceError, Result},
    reduction::{Combine, Reduction},
};

/// How [`reduce()`] runs a reduction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Execution {
    /// Single accumulator, single thread, input order.
    #[default]
    Sequential,
    /// One accumulator per partition, merged afterwards.
    Parallel(Parallelism),
    /// One accumulator mutated by every worker.
    Concurrent(Parallelism),
}

impl Execution {
    /// Parallel execution with the default [`Parallelism`].
    #[inline]
    pub fn parallel() -> Self {
        Self::Parallel(Parallelism::default())
    }

    /// Concurrent execution with the default [`Parallelism`].
    #[inline]
    pub fn concurrent() -> Self {
        Self::Concurrent(Parallelism::default())
    }

    /// Returns `true` unless this is [`Execution::Sequential`].
    #[inline]
    pub fn is_parallel(&self) -> bool {
        !matches!(self, Self::Sequential)
    }
}

/// `false` is sequential, `true` is parallel with the default [`Parallelism`].
impl From<bool> for Execution {
    #[inline]
    fn from(parallel: bool) -> Self {
        if parallel {
            Self::parallel()
        } else {
            Self::Sequential
        }
    }
}

impl From<Parallelism> for Execution {
    #[inline]
    fn from(parallelism: Parallelism) -> Self {
        Self::Parallel(parallelism)
    }
}

/// Tuning of the parallel modes.
///
/// # Examples
///
/// ```
/// use std::num::NonZeroUsize;
/// use better_reduce::Parallelism;
///
/// let parallelism = Parallelism::new()
///     .partitions(NonZeroUsize::new(4).unwrap())
///     .min_partition_len(2);
///
/// assert_eq!(parallelism.partitions_for(100), 4);
/// // Never more partitions than `len / min_partition_len`.
/// assert_eq!(parallelism.partitions_for(5), 2);
/// // Always at least one.
/// assert_eq!(parallelism.partitions_for(0), 1);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Parallelism {
    partitions: Option<NonZeroUsize>,
    min_partition_len: usize,
}

impl Parallelism {
    /// As many partitions as threads in the current rayon pool.
    #[inline]
    pub const fn new() -> Self {
        Self {
            partitions: None,
            min_partition_len: 1,
        }
    }

    /// Sets the number of partitions.
    #[inline]
    pub const fn partitions(mut self, partitions: NonZeroUsize) -> Self {
        self.partitions = Some(partitions);
        self
    }

    /// Sets the minimum number of items per partition. `0` is treated as `1`.
    #[inline]
    pub const fn min_partition_len(mut self, len: usize) -> Self {
        self.min_partition_len = len;
        self
    }

    /// The number of partitions used for `len` items.
    pub fn partitions_for(&self, len: usize) -> usize {
        let wanted = self
            .partitions
            .map_or_else(rayon::current_num_threads, NonZeroUsize::get);
        let allowed = len / self.min_partition_len.max(1);

        wanted.min(allowed).max(1)
    }
}

impl Default for Parallelism {
    fn default() -> Self {
        Self::new()
    }
}

/// Reduces `items` with `reduction`, as `execution` says.
///
/// `execution` accepts an [`Execution`], a [`Parallelism`], or a `bool`
/// (`true` meaning parallel).
///
/// # Errors
///
/// - [`ReduceError::Configuration`] if a parallel mode is requested for a reduction that cannot
///   merge partitions. Nothing is consumed from `items` in that case.
/// - Whatever [`accumulate()`](Reduction::accumulate) fails with. The first error aborts the
///   reduction.
///
/// # Examples
///
/// ```
/// use better_reduce::{reduce, Joining};
///
/// let names = ["Joe", "Steven", "Patrick"];
///
/// assert_eq!(reduce(names, &Joining::default(), false).unwrap(), "Joe,Steven,Patrick");
/// assert!(reduce(names, &Joining::default(), true).unwrap_err().is_configuration());
/// ```
pub fn reduce<I, R>(items: I, reduction: &R, execution: impl Into<Execution>) -> Result<R::Output>
where
    I: IntoIterator<Item: Send>,
    R: Reduction<I::Item> + Sync + ?Sized,
    R::Accumulator: Send + Sync,
{
    match execution.into() {
        Execution::Sequential => reduce_sequential(items, reduction),
        Execution::Parallel(parallelism) => reduce_partitioned(items, reduction, parallelism),
        Execution::Concurrent(parallelism) => reduce_concurrent(items, reduction, parallelism),
    }
}

/// Reduces `items` sequentially, without requiring anything to be [`Send`] or [`Sync`].
pub fn reduce_sequential<I, R>(items: I, reduction: &R) -> Result<R::Output>
where
    I: IntoIterator,
    R: Reduction<I::Item> + ?Sized,
{
    let accum = fold_partition(reduction, items)?;
    Ok(reduction.finish(accum))
}

fn reduce_partitioned<I, R>(items: I, reduction: &R, parallelism: Parallelism) -> Result<R::Output>
where
    I: IntoIterator<Item: Send>,
    R: Reduction<I::Item> + Sync + ?Sized,
    R::Accumulator: Send,
{
    let combiner = reduction
        .combiner()
        .ok_or_else(|| ReduceError::configuration(reduction.name(), ConfigError::MissingCombiner))?;

    let items: Vec<_> = items.into_iter().collect();
    let partitions = parallelism.partitions_for(items.len());
    let partition_len = items.len().div_ceil(partitions).max(1);
    debug!(
        reduction = reduction.name(),
        len = items.len(),
        partitions,
        "partitioned reduction"
    );

    // Indexed by partition id.
    let arena: Vec<R::Accumulator> = items
        .into_par_iter()
        .chunks(partition_len)
        .map(|partition| fold_partition(reduction, partition))
        .collect::<Result<_>>()?;

    let accum = merge_tree(combiner, arena).unwrap_or_else(|| reduction.create_accumulator());
    Ok(reduction.finish(accum))
}

fn reduce_concurrent<I, R>(items: I, reduction: &R, parallelism: Parallelism) -> Result<R::Output>
where
    I: IntoIterator<Item: Send>,
    R: Reduction<I::Item> + Sync + ?Sized,
    R::Accumulator: Send + Sync,
{
    if !reduction.characteristics().is_concurrent() {
        debug!(
            reduction = reduction.name(),
            "not concurrent, falling back to partitioned reduction"
        );
        return reduce_partitioned(items, reduction, parallelism);
    }

    let shared = reduction
        .shared()
        .ok_or_else(|| ReduceError::configuration(reduction.name(), ConfigError::MissingShared))?;

    let items: Vec<_> = items.into_iter().collect();
    let partitions = parallelism.partitions_for(items.len());
    let partition_len = items.len().div_ceil(partitions).max(1);
    debug!(
        reduction = reduction.name(),
        len = items.len(),
        partitions,
        "concurrent reduction"
    );

    let accum = reduction.create_accumulator();
    items
        .into_par_iter()
        .with_min_len(partition_len)
        .try_for_each(|item| shared.accumulate_shared(&accum, item))?;

    Ok(reduction.finish(accum))
}

fn fold_partition<R, T>(reduction: &R, items: impl IntoIterator<Item = T>) -> Result<R::Accumulator>
where
    R: Reduction<T> + ?Sized,
{
    let mut accum = reduction.create_accumulator();
    items
        .into_iter()
        .try_for_each(|item| reduction.accumulate(&mut accum, item))?;
    Ok(accum)
}

/// Merges adjacent accumulators, halves in parallel, until one remains.
///
/// Returns `None` only if `arena` is empty.
fn merge_tree<A>(combiner: &dyn Combine<A>, mut arena: Vec<A>) -> Option<A>
where
    A: Send,
{
    match arena.len() {
        0 | 1 => arena.pop(),
        len => {
            let right = arena.split_off(len / 2);
            let (left, right) = rayon::join(
                || merge_tree(combiner, arena),
                || merge_tree(combiner, right),
            );
            trace!(len, "merging partitions");
            left.zip(right)
                .map(|(left, right)| combiner.combine(left, right))
        }
    }
}

/// Extends every [`IntoIterator`] with methods running a [`Reduction`] over it.
pub trait ReduceExt: IntoIterator + Sized {
    /// Reduces `self` sequentially.
    ///
    /// # Examples
    ///
    /// ```
    /// use better_reduce::{prelude::*, BitString};
    ///
    /// let bits = "1,3,5".split(',').reduce_by(&BitString::new()).unwrap();
    /// assert_eq!(bits, "10101");
    /// ```
    #[inline]
    fn reduce_by<R>(self, reduction: &R) -> Result<R::Output>
    where
        R: Reduction<Self::Item> + ?Sized,
    {
        reduce_sequential(self, reduction)
    }

    /// Reduces `self` as `execution` says. See [`reduce()`].
    #[inline]
    fn reduce_in<R>(self, reduction: &R, execution: impl Into<Execution>) -> Result<R::Output>
    where
        Self::Item: Send,
        R: Reduction<Self::Item> + Sync + ?Sized,
        R::Accumulator: Send + Sync,
    {
        reduce(self, reduction, execution)
    }
}

impl<I> ReduceExt for I where I: IntoIterator {}
