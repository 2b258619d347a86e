use std::{collections::HashSet, fmt::Debug, hash::Hash};

use dashmap::DashMap;

use crate::{
    error::Result,
    reduction::{Characteristics, Combine, Reduction, SharedAccumulate},
};

/// A [`Reduction`] fanning every item out to several keys, grouping labels into a set per key.
/// Its [`Output`] is [`DashMap<K, HashSet<V>>`](DashMap).
///
/// `fan_out` turns an item into the keys it belongs to and the label recorded under each of
/// them. For a given key, the output set is the union of the labels of every item mentioning
/// that key, whatever the partitioning or the merge order.
///
/// This reduction can run in all modes:
///
/// - It has a combiner, merging the sets of matching keys.
/// - It is [`CONCURRENT`](Characteristics::CONCURRENT): the map is sharded with a lock per
///   shard, so many workers can fill one map without a lock over the whole map.
///
/// # Examples
///
/// ```
/// use std::collections::HashSet;
/// use better_reduce::{prelude::*, Execution, GroupSets};
///
/// // (who, what they want)
/// let wishes = [
///     ("Patrick", vec!["onion", "ice cream"]),
///     ("Steven", vec!["ice cream", "cable"]),
///     ("Amy", vec!["onion"]),
/// ];
///
/// let by_item = GroupSets::new(|(who, what): (&'static str, Vec<&'static str>)| (what, who));
/// let groups = wishes.reduce_in(&by_item, Execution::concurrent()).unwrap();
///
/// assert_eq!(*groups.get("ice cream").unwrap(), HashSet::from(["Patrick", "Steven"]));
/// assert_eq!(*groups.get("cable").unwrap(), HashSet::from(["Steven"]));
/// assert!(groups.get("desk").is_none());
/// ```
///
/// [`Output`]: Reduction::Output
#[derive(Clone)]
pub struct GroupSets<F> {
    fan_out: F,
}

impl<F> GroupSets<F> {
    /// Creates a new instance of this reduction with a function turning an item into
    /// `(keys, label)`.
    #[inline]
    pub const fn new(fan_out: F) -> Self {
        Self { fan_out }
    }
}

fn insert_all<K, V>(groups: &DashMap<K, HashSet<V>>, keys: impl IntoIterator<Item = K>, label: V)
where
    K: Eq + Hash,
    V: Eq + Hash + Clone,
{
    // The shard stays locked for the whole lookup-or-create and insert.
    for key in keys {
        groups.entry(key).or_default().insert(label.clone());
    }
}

impl<T, K, V, I, F> Reduction<T> for GroupSets<F>
where
    F: Fn(T) -> (I, V) + Sync,
    I: IntoIterator<Item = K>,
    K: Eq + Hash,
    V: Eq + Hash + Clone,
{
    type Accumulator = DashMap<K, HashSet<V>>;

    type Output = DashMap<K, HashSet<V>>;

    #[inline]
    fn create_accumulator(&self) -> Self::Accumulator {
        DashMap::new()
    }

    #[inline]
    fn accumulate(&self, groups: &mut Self::Accumulator, item: T) -> Result<()> {
        let (keys, label) = (self.fan_out)(item);
        insert_all(groups, keys, label);
        Ok(())
    }

    #[inline]
    fn finish(&self, groups: Self::Accumulator) -> Self::Output {
        groups
    }

    #[inline]
    fn combiner(&self) -> Option<&dyn Combine<Self::Accumulator>> {
        Some(self)
    }

    #[inline]
    fn shared(&self) -> Option<&dyn SharedAccumulate<T, Self::Accumulator>> {
        Some(self)
    }

    #[inline]
    fn characteristics(&self) -> Characteristics {
        Characteristics::CONCURRENT | Characteristics::IDENTITY_FINISH
    }

    fn name(&self) -> &'static str {
        "GroupSets"
    }
}

impl<K, V, F> Combine<DashMap<K, HashSet<V>>> for GroupSets<F>
where
    K: Eq + Hash,
    V: Eq + Hash,
    F: Sync,
{
    fn combine(
        &self,
        first: DashMap<K, HashSet<V>>,
        second: DashMap<K, HashSet<V>>,
    ) -> DashMap<K, HashSet<V>> {
        for (key, labels) in second {
            first.entry(key).or_default().extend(labels);
        }
        first
    }
}

impl<T, K, V, I, F> SharedAccumulate<T, DashMap<K, HashSet<V>>> for GroupSets<F>
where
    F: Fn(T) -> (I, V) + Sync,
    I: IntoIterator<Item = K>,
    K: Eq + Hash,
    V: Eq + Hash + Clone,
{
    #[inline]
    fn accumulate_shared(&self, groups: &DashMap<K, HashSet<V>>, item: T) -> Result<()> {
        let (keys, label) = (self.fan_out)(item);
        insert_all(groups, keys, label);
        Ok(())
    }
}

impl<F> Debug for GroupSets<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GroupSets").finish_non_exhaustive()
    }
}
