pub mod store;

use std::{fmt::Debug, num::NonZeroUsize};

use proptest::{prelude::*, test_runner::TestCaseResult};

use crate::{
    exec::{Execution, Parallelism, reduce},
    reduction::Reduction,
};

/// Every execution mode, with a spread of partition counts.
pub fn modes() -> Vec<Execution> {
    let with_partitions = |n| Parallelism::new().partitions(NonZeroUsize::new(n).unwrap());

    let mut modes = vec![Execution::Sequential, Execution::parallel(), Execution::concurrent()];
    modes.extend([1, 2, 3, 7, 64].map(|n| Execution::Parallel(with_partitions(n))));
    modes.extend([2, 5].map(|n| Execution::Concurrent(with_partitions(n))));
    modes
}

/// Runs `reduction` over the items of `iter_factory` in every mode of [`modes()`],
/// and checks every output with `pred`.
///
/// The reduction must support parallel execution.
pub fn proptest_reduction<I, R>(
    mut iter_factory: impl FnMut() -> I,
    reduction: &R,
    pred: impl Fn(&R::Output) -> bool,
) -> TestCaseResult
where
    I: Iterator<Item: Send>,
    R: Reduction<I::Item> + Sync,
    R::Accumulator: Send + Sync,
    R::Output: Debug,
{
    for execution in modes() {
        let output = reduce(iter_factory(), reduction, execution);
        prop_assert!(output.is_ok(), "{execution:?} failed: {output:?}");

        let output = output.unwrap();
        prop_assert!(pred(&output), "{execution:?} mismatched: {output:?}");
    }

    Ok(())
}
