#![allow(
    missing_docs,
    clippy::missing_docs_in_private_items,
    clippy::unwrap_used,
    clippy::similar_names
)]
use std::collections::{BTreeSet, HashSet};
use std::hint::black_box;

use criterion::{BatchSize, Criterion, criterion_group, criterion_main};
use hotset::HotSet;
use proptest::{
    collection::vec,
    strategy::{Strategy, ValueTree},
    string::string_regex,
    test_runner::TestRunner,
};

const ITEMS_AMOUNT: usize = 1000;
const SAMPLE_SIZE: usize = 10;

fn dict_words() -> Vec<String> {
    let mut runner = TestRunner::default();
    vec(string_regex("[a-z]{2,12}").unwrap(), ITEMS_AMOUNT)
        .new_tree(&mut runner)
        .unwrap()
        .current()
}

fn hash_set_benches(c: &mut Criterion) {
    let words = dict_words();

    let mut group = c.benchmark_group("Hash set comparison benchmark");
    group.sample_size(SAMPLE_SIZE);

    group.bench_function("hot set insert", |b| {
        b.iter(|| {
            let mut set = HotSet::with_capacity(ITEMS_AMOUNT, String::new());
            for word in &words {
                set.insert(word.clone());
            }
            set
        });
    });
    group.bench_function("std hash set insert", |b| {
        b.iter(|| {
            let mut set = HashSet::with_capacity(ITEMS_AMOUNT);
            for word in &words {
                set.insert(word.clone());
            }
            set
        });
    });
    group.bench_function("hashbrown insert", |b| {
        b.iter(|| {
            let mut set = hashbrown::HashSet::with_capacity(ITEMS_AMOUNT);
            for word in &words {
                set.insert(word.clone());
            }
            set
        });
    });
    group.bench_function("btree set insert", |b| {
        b.iter(|| {
            let mut set = BTreeSet::new();
            for word in &words {
                set.insert(word.clone());
            }
            set
        });
    });

    let mut hot_set = HotSet::with_capacity(ITEMS_AMOUNT, String::new());
    let mut std_set = HashSet::new();
    let mut brown_set = hashbrown::HashSet::new();
    let mut btree_set = BTreeSet::new();
    for word in &words {
        hot_set.insert(word.clone());
        std_set.insert(word.clone());
        brown_set.insert(word.clone());
        btree_set.insert(word.clone());
    }

    group.bench_function("hot set find", |b| {
        b.iter(|| {
            for word in &words {
                black_box(hot_set.contains(word));
            }
        });
    });
    group.bench_function("std hash set find", |b| {
        b.iter(|| {
            for word in &words {
                black_box(std_set.contains(word));
            }
        });
    });
    group.bench_function("hashbrown find", |b| {
        b.iter(|| {
            for word in &words {
                black_box(brown_set.contains(word));
            }
        });
    });
    group.bench_function("btree set find", |b| {
        b.iter(|| {
            for word in &words {
                black_box(btree_set.contains(word));
            }
        });
    });

    group.bench_function("hot set erase", |b| {
        b.iter_batched(
            || hot_set.clone(),
            |mut set| {
                for word in &words {
                    black_box(set.erase(word));
                }
                set
            },
            BatchSize::LargeInput,
        );
    });
    group.bench_function("std hash set erase", |b| {
        b.iter_batched(
            || std_set.clone(),
            |mut set| {
                for word in &words {
                    black_box(set.remove(word));
                }
                set
            },
            BatchSize::LargeInput,
        );
    });
    group.bench_function("hashbrown erase", |b| {
        b.iter_batched(
            || brown_set.clone(),
            |mut set| {
                for word in &words {
                    black_box(set.remove(word));
                }
                set
            },
            BatchSize::LargeInput,
        );
    });

    group.finish();
}

criterion_group!(benches, hash_set_benches);

criterion_main!(benches);
