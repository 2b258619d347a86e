use std::{
    collections::{HashMap, HashSet},
    hint::black_box,
    time::Duration,
};

use better_reduce::{Execution, GroupSets, prelude::*};
use criterion::{Criterion, criterion_group, criterion_main};
use rand::{RngExt, SeedableRng, rngs::StdRng};

fn group_sets(criterion: &mut Criterion) {
    let seed = 0;
    let mut rng = StdRng::seed_from_u64(seed);

    // (customer, wanted items)
    let wishes: Box<_> = (0..200_000_u32)
        .map(|customer| {
            let items: Vec<u32> = std::iter::repeat_with(|| rng.random_range(0..5_000))
                .take(4)
                .collect();
            (customer, items)
        })
        .collect();

    println!("Seed: {seed}");
    println!("First 3 elements: {:?}", &wishes[..3]);

    let by_item = GroupSets::new(|(customer, items): &(u32, Vec<u32>)| (items.clone(), *customer));

    let mut group = criterion.benchmark_group("group_sets");

    for (name, execution) in [
        ("sequential", Execution::Sequential),
        ("parallel", Execution::parallel()),
        ("concurrent", Execution::concurrent()),
    ] {
        group.bench_function(name, |bencher| {
            bencher.iter(|| black_box(wishes.iter().reduce_in(&by_item, execution)));
        });
    }

    group.bench_function("for_loop", |bencher| {
        bencher.iter(|| black_box(for_loop(&wishes)));
    });

    group.finish();
}

criterion_group! {
    name = benches;
    config = Criterion::default()
        .warm_up_time(Duration::from_secs(5))
        .measurement_time(Duration::from_secs(15))
        .sample_size(100);
    targets = group_sets
}
criterion_main!(benches);

fn for_loop(wishes: &[(u32, Vec<u32>)]) -> HashMap<u32, HashSet<u32>> {
    let mut groups: HashMap<_, HashSet<_>> = HashMap::new();
    for (customer, items) in wishes {
        for &item in items {
            groups.entry(item).or_default().insert(*customer);
        }
    }
    groups
}
