//! The reduction protocol.
//!
//! A [`Reduction`] describes *how* to fold a sequence into one value with four operations:
//!
//! - [`create_accumulator()`](Reduction::create_accumulator): seeds a fresh, independent
//!   accumulator. Called once per partition.
//! - [`accumulate()`](Reduction::accumulate): folds one item into an accumulator in place.
//! - [`combiner()`](Reduction::combiner): optionally merges two partial accumulators into one.
//!   Without it, the reduction can only run sequentially.
//! - [`finish()`](Reduction::finish): turns the last remaining accumulator into the output.
//!   Called exactly once.
//!
//! A reduction itself holds no accumulation state. All state lives in the accumulators it
//! creates, so the same reduction can be reused across runs and shared between threads.
//!
//! For ad-hoc reductions, [`Reducer`] plugs the four functions in as closures.

use std::{
    fmt::Debug,
    ops::{BitOr, BitOrAssign},
};

use crate::error::Result;

/// Describes how to fold items of type `T` into a single [`Output`](Reduction::Output).
///
/// See the [module documentation](self) for the role of each operation.
///
/// # Implementing
///
/// Only [`create_accumulator()`](Reduction::create_accumulator),
/// [`accumulate()`](Reduction::accumulate) and [`finish()`](Reduction::finish) are required.
/// Such a reduction is sequential-only: asking to run it in parallel fails with a
/// [`Configuration`](crate::ReduceError::Configuration) error.
///
/// To allow parallel execution, implement [`Combine`] for the accumulator and return it from
/// [`combiner()`](Reduction::combiner). The combiner **must** be associative.
/// Partitions are merged in order, so commutativity is only required if the caller cares
/// about order-insensitive results.
///
/// # Examples
///
/// ```
/// use better_reduce::prelude::*;
///
/// struct Sum;
///
/// impl Reduction<u32> for Sum {
///     type Accumulator = u64;
///     type Output = u64;
///
///     fn create_accumulator(&self) -> u64 {
///         0
///     }
///
///     fn accumulate(&self, sum: &mut u64, num: u32) -> better_reduce::Result<()> {
///         *sum += u64::from(num);
///         Ok(())
///     }
///
///     fn finish(&self, sum: u64) -> u64 {
///         sum
///     }
///
///     fn combiner(&self) -> Option<&dyn Combine<u64>> {
///         Some(self)
///     }
/// }
///
/// impl Combine<u64> for Sum {
///     fn combine(&self, left: u64, right: u64) -> u64 {
///         left + right
///     }
/// }
///
/// let nums: Vec<u32> = (1..=100).collect();
/// assert_eq!(nums.iter().copied().reduce_by(&Sum).unwrap(), 5050);
/// assert_eq!(nums.reduce_in(&Sum, true).unwrap(), 5050);
/// ```
pub trait Reduction<T> {
    /// Mutable working state of one partition.
    type Accumulator;

    /// The value yielded by [`finish()`](Reduction::finish).
    type Output;

    /// Creates a fresh accumulator.
    fn create_accumulator(&self) -> Self::Accumulator;

    /// Folds one item into the accumulator.
    ///
    /// An error aborts the whole reduction.
    fn accumulate(&self, accum: &mut Self::Accumulator, item: T) -> Result<()>;

    /// Consumes the final accumulator and returns the output.
    fn finish(&self, accum: Self::Accumulator) -> Self::Output;

    /// Returns the function merging two partial accumulators, if any.
    ///
    /// The default implementation returns `None`, which restricts the reduction
    /// to sequential execution.
    #[inline]
    fn combiner(&self) -> Option<&dyn Combine<Self::Accumulator>> {
        None
    }

    /// Returns the capability to accumulate into one accumulator from many threads.
    ///
    /// Only consulted when [`characteristics()`](Reduction::characteristics) contains
    /// [`Characteristics::CONCURRENT`].
    #[inline]
    fn shared(&self) -> Option<&dyn SharedAccumulate<T, Self::Accumulator>> {
        None
    }

    /// Returns the characteristics this reduction declares.
    #[inline]
    fn characteristics(&self) -> Characteristics {
        Characteristics::empty()
    }

    /// Name used in errors and logs.
    #[inline]
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}

/// Merges two partial accumulators into one.
///
/// Both inputs are consumed. The operation must be associative.
///
/// Implemented for every `Fn(A, A) -> A` that is [`Sync`].
pub trait Combine<A>: Sync {
    /// Merges `right` into `left`, or produces a new accumulator from both.
    fn combine(&self, left: A, right: A) -> A;
}

impl<A, F> Combine<A> for F
where
    F: Fn(A, A) -> A + Sync,
{
    #[inline]
    fn combine(&self, left: A, right: A) -> A {
        self(left, right)
    }
}

/// Accumulates into an accumulator shared by several threads.
///
/// Implementations must make every update atomic with respect to other threads
/// touching the same part of the accumulator.
pub trait SharedAccumulate<T, A>: Sync {
    /// Folds one item into the shared accumulator.
    fn accumulate_shared(&self, accum: &A, item: T) -> Result<()>;
}

/// A set of properties a [`Reduction`] declares about itself.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Characteristics(u8);

impl Characteristics {
    /// The output is the accumulator itself; [`finish()`](Reduction::finish) is a no-op.
    pub const IDENTITY_FINISH: Self = Self(1);

    /// A single accumulator may be mutated by several threads at once,
    /// through [`Reduction::shared()`].
    pub const CONCURRENT: Self = Self(1 << 1);

    /// No characteristic.
    #[inline]
    pub const fn empty() -> Self {
        Self(0)
    }

    /// Returns `true` if every characteristic in `other` is also in `self`.
    #[inline]
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// Returns `true` if [`IDENTITY_FINISH`](Self::IDENTITY_FINISH) is set.
    #[inline]
    pub const fn is_identity_finish(self) -> bool {
        self.contains(Self::IDENTITY_FINISH)
    }

    /// Returns `true` if [`CONCURRENT`](Self::CONCURRENT) is set.
    #[inline]
    pub const fn is_concurrent(self) -> bool {
        self.contains(Self::CONCURRENT)
    }
}

impl BitOr for Characteristics {
    type Output = Self;

    #[inline]
    fn bitor(self, rhs: Self) -> Self::Output {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for Characteristics {
    #[inline]
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl Debug for Characteristics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut set = f.debug_set();
        if self.is_identity_finish() {
            set.entry(&"IDENTITY_FINISH");
        }
        if self.is_concurrent() {
            set.entry(&"CONCURRENT");
        }
        set.finish()
    }
}

/// Turns the final accumulator into the output.
///
/// Implemented for [`Identity`] and every `Fn(A) -> O`.
pub trait Finish<A> {
    /// The finished value.
    type Output;

    /// Whether this finisher returns the accumulator unchanged.
    const IDENTITY: bool = false;

    /// Consumes the accumulator.
    fn finish(&self, accum: A) -> Self::Output;
}

/// A finisher returning the accumulator as is.
#[derive(Debug, Clone, Copy, Default)]
pub struct Identity;

impl<A> Finish<A> for Identity {
    type Output = A;

    const IDENTITY: bool = true;

    #[inline]
    fn finish(&self, accum: A) -> A {
        accum
    }
}

impl<A, O, F> Finish<A> for F
where
    F: Fn(A) -> O,
{
    type Output = O;

    #[inline]
    fn finish(&self, accum: A) -> O {
        self(accum)
    }
}

/// A [`Reduction`] assembled from closures.
///
/// [`new()`](Reducer::new) takes the supplier and the accumulator function. The result is
/// sequential-only with an identity finish. [`combiner()`](Reducer::combiner) enables
/// parallel execution and [`finisher()`](Reducer::finisher) adds a final transform.
///
/// # Examples
///
/// ```
/// use better_reduce::{prelude::*, Reducer};
///
/// let to_csv = Reducer::new(String::new, |csv: &mut String, num: i32| {
///     if !csv.is_empty() {
///         csv.push(',');
///     }
///     csv.push_str(&num.to_string());
/// });
///
/// assert_eq!([1, 2, 3].reduce_by(&to_csv).unwrap(), "1,2,3");
/// // No combiner, no parallelism.
/// assert!([1, 2, 3].reduce_in(&to_csv, true).unwrap_err().is_configuration());
///
/// let longest = Reducer::new(Vec::new, |words: &mut Vec<String>, word: String| words.push(word))
///     .combiner(|mut left, right| {
///         left.extend(right);
///         left
///     })
///     .finisher(|words| words.into_iter().max_by_key(|word: &String| word.len()));
///
/// let words = ["a", "quick", "fox"].map(String::from);
/// assert_eq!(words.reduce_in(&longest, true).unwrap().as_deref(), Some("quick"));
/// ```
pub struct Reducer<S, F, C, Fin = Identity> {
    supplier: S,
    accumulator: F,
    combiner: Option<C>,
    finisher: Fin,
}

impl<A, S, F> Reducer<S, F, fn(A, A) -> A>
where
    S: Fn() -> A,
{
    /// Creates a sequential-only reduction from a supplier and an accumulator function.
    #[inline]
    pub fn new<T>(supplier: S, accumulator: F) -> Self
    where
        F: Fn(&mut A, T),
    {
        Self {
            supplier,
            accumulator,
            combiner: None,
            finisher: Identity,
        }
    }
}

impl<A, S, F, C, Fin> Reducer<S, F, C, Fin>
where
    S: Fn() -> A,
{
    /// Sets the function merging two partial accumulators.
    ///
    /// It must be associative.
    #[inline]
    pub fn combiner<C2>(self, combiner: C2) -> Reducer<S, F, C2, Fin>
    where
        C2: Fn(A, A) -> A + Sync,
    {
        Reducer {
            supplier: self.supplier,
            accumulator: self.accumulator,
            combiner: Some(combiner),
            finisher: self.finisher,
        }
    }

    /// Sets the function turning the final accumulator into the output.
    #[inline]
    pub fn finisher<O, Fin2>(self, finisher: Fin2) -> Reducer<S, F, C, Fin2>
    where
        Fin2: Fn(A) -> O,
    {
        Reducer {
            supplier: self.supplier,
            accumulator: self.accumulator,
            combiner: self.combiner,
            finisher,
        }
    }
}

impl<T, A, S, F, C, Fin> Reduction<T> for Reducer<S, F, C, Fin>
where
    S: Fn() -> A,
    F: Fn(&mut A, T),
    C: Combine<A>,
    Fin: Finish<A>,
{
    type Accumulator = A;

    type Output = Fin::Output;

    #[inline]
    fn create_accumulator(&self) -> A {
        (self.supplier)()
    }

    #[inline]
    fn accumulate(&self, accum: &mut A, item: T) -> Result<()> {
        (self.accumulator)(accum, item);
        Ok(())
    }

    #[inline]
    fn finish(&self, accum: A) -> Self::Output {
        self.finisher.finish(accum)
    }

    #[inline]
    fn combiner(&self) -> Option<&dyn Combine<A>> {
        self.combiner.as_ref().map(|combiner| combiner as &dyn Combine<A>)
    }

    fn characteristics(&self) -> Characteristics {
        if Fin::IDENTITY {
            Characteristics::IDENTITY_FINISH
        } else {
            Characteristics::empty()
        }
    }

    fn name(&self) -> &'static str {
        "Reducer"
    }
}

impl<S, F, C, Fin> Debug for Reducer<S, F, C, Fin> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Reducer")
            .field("has_combiner", &self.combiner.is_some())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn characteristics_set() {
        let both = Characteristics::CONCURRENT | Characteristics::IDENTITY_FINISH;
        assert!(both.is_concurrent());
        assert!(both.is_identity_finish());
        assert!(both.contains(Characteristics::CONCURRENT));
        assert!(!Characteristics::empty().is_concurrent());
        assert!(Characteristics::empty().contains(Characteristics::empty()));

        let mut c = Characteristics::empty();
        c |= Characteristics::IDENTITY_FINISH;
        assert_eq!(c, Characteristics::IDENTITY_FINISH);
        assert_eq!(format!("{both:?}"), r#"{"IDENTITY_FINISH", "CONCURRENT"}"#);
    }

    #[test]
    fn reducer_protocol() {
        let reducer = Reducer::new(Vec::new, |v: &mut Vec<i32>, x: i32| v.push(x));
        assert!(Reduction::<i32>::combiner(&reducer).is_none());
        assert!(Reduction::<i32>::characteristics(&reducer).is_identity_finish());

        let mut accum = Reduction::<i32>::create_accumulator(&reducer);
        reducer.accumulate(&mut accum, 1).unwrap();
        reducer.accumulate(&mut accum, 2).unwrap();
        assert_eq!(Reduction::<i32>::finish(&reducer, accum), [1, 2]);

        let reducer = reducer
            .combiner(|mut left: Vec<i32>, right| {
                left.extend(right);
                left
            })
            .finisher(|v: Vec<i32>| v.len());

        let combiner = Reduction::<i32>::combiner(&reducer).unwrap();
        assert_eq!(combiner.combine(vec![1], vec![2, 3]), [1, 2, 3]);
        assert!(!Reduction::<i32>::characteristics(&reducer).is_identity_finish());
        assert_eq!(Reduction::<i32>::finish(&reducer, vec![4, 5]), 2);
        assert_eq!(Reduction::<i32>::name(&reducer), "Reducer");
    }
}
