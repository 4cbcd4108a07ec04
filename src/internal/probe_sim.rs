#![allow(clippy::missing_docs_in_private_items)]
#![allow(clippy::arithmetic_side_effects)]
#![allow(clippy::indexing_slicing)]
#![allow(clippy::pedantic)]
#![allow(clippy::unwrap_used)]
#![allow(warnings)]

use plotters::prelude::*;
use rand::Rng;
use std::collections::hash_map::DefaultHasher;
use std::hash::{BuildHasher, BuildHasherDefault};

use hotset::{DefaultLoadPolicy, HotSet, ValueTombstone};

// Keep the allocation fixed so churn happens at a controlled load factor.
const TABLE_SIZE: usize = 1 << 14;
// Load factors from 0.1 up to 0.7 (growth would trigger above 75%).
const LOAD_FACTORS: [f64; 7] = [0.1, 0.2, 0.3, 0.4, 0.5, 0.6, 0.7];
// Each experiment erases and re-inserts this multiple of the live count.
const CHURN_MULTIPLIER: usize = 4;

type SimHasher = BuildHasherDefault<DefaultHasher>;

/// Classic open addressing with lazy tombstones: erased slots stay dead until
/// a rehash that never comes. The comparison baseline for the eager-repair set.
#[derive(Clone, PartialEq)]
enum LazySlot {
    Empty,
    Tombstone,
    Live(u64),
}

struct LazyTable {
    slots: Vec<LazySlot>,
    hasher: SimHasher,
}

impl LazyTable {
    fn new(size: usize) -> Self {
        Self { slots: vec![LazySlot::Empty; size], hasher: SimHasher::default() }
    }

    fn start(&self, key: u64) -> usize {
        (self.hasher.hash_one(&key) as usize) & (self.slots.len() - 1)
    }

    fn insert(&mut self, key: u64) {
        let mask = self.slots.len() - 1;
        let mut index = self.start(key);
        let mut grave = None;
        // One full pass at most: once churn has eaten every empty slot, the
        // first tombstone on the route is the only landing spot left.
        for _ in 0..self.slots.len() {
            match self.slots[index] {
                LazySlot::Empty => {
                    let target = grave.unwrap_or(index);
                    self.slots[target] = LazySlot::Live(key);
                    return;
                }
                LazySlot::Tombstone => {
                    if grave.is_none() {
                        grave = Some(index);
                    }
                }
                LazySlot::Live(existing) if existing == key => return,
                LazySlot::Live(_) => {}
            }
            index = (index + 1) & mask;
        }
        if let Some(target) = grave {
            self.slots[target] = LazySlot::Live(key);
        }
    }

    fn erase(&mut self, key: u64) {
        let mask = self.slots.len() - 1;
        let mut index = self.start(key);
        for _ in 0..self.slots.len() {
            match self.slots[index] {
                LazySlot::Empty => return,
                LazySlot::Live(existing) if existing == key => {
                    self.slots[index] = LazySlot::Tombstone;
                    return;
                }
                _ => {}
            }
            index = (index + 1) & mask;
        }
    }

    fn probe_length(&self, key: u64) -> usize {
        let mask = self.slots.len() - 1;
        let mut index = self.start(key);
        let mut probes = 1;
        while self.slots[index] != LazySlot::Live(key) && probes <= self.slots.len() {
            index = (index + 1) & mask;
            probes += 1;
        }
        probes
    }
}

/// Probe length of a lookup in the eager-repair set, measured over its raw
/// slot array with the same hasher the set uses.
fn hot_probe_length(slots: &[u64], hasher: &SimHasher, key: u64) -> usize {
    let mask = slots.len() - 1;
    let mut index = (hasher.hash_one(&key) as usize) & mask;
    let mut probes = 1;
    while slots[index] != key {
        index = (index + 1) & mask;
        probes += 1;
    }
    probes
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut rng = rand::rng();

    let mut eager_avg: Vec<f64> = Vec::new();
    let mut lazy_avg: Vec<f64> = Vec::new();
    let mut eager_worst: Vec<usize> = Vec::new();
    let mut lazy_worst: Vec<usize> = Vec::new();

    for &load in &LOAD_FACTORS {
        let n_keys = (TABLE_SIZE as f64 * load) as usize;
        println!("Load factor {:.1}: {} live keys, {} churn rounds", load, n_keys, n_keys * CHURN_MULTIPLIER);

        let mut eager = HotSet::with_policies(
            TABLE_SIZE / 2,
            ValueTombstone::new(0u64),
            SimHasher::default(),
            DefaultLoadPolicy,
        );
        assert_eq!(eager.allocated(), TABLE_SIZE);
        let mut lazy = LazyTable::new(TABLE_SIZE);

        let mut live: Vec<u64> = Vec::with_capacity(n_keys);
        for _ in 0..n_keys {
            let key = rng.random_range(1..u64::MAX);
            eager.insert(key);
            lazy.insert(key);
            live.push(key);
        }

        // Churn: every erase leaves a stale tombstone in the lazy table and
        // triggers a repair pass in the eager one.
        for _ in 0..n_keys * CHURN_MULTIPLIER {
            let victim = rng.random_range(0..live.len());
            let old = live.swap_remove(victim);
            eager.erase(&old);
            lazy.erase(old);

            let fresh = rng.random_range(1..u64::MAX);
            eager.insert(fresh);
            lazy.insert(fresh);
            live.push(fresh);
        }

        let hasher = SimHasher::default();
        let slots = eager.raw_slots();
        let mut eager_total = 0usize;
        let mut lazy_total = 0usize;
        let mut eager_max = 0usize;
        let mut lazy_max = 0usize;
        for &key in &live {
            let e = hot_probe_length(slots, &hasher, key);
            let l = lazy.probe_length(key);
            eager_total += e;
            lazy_total += l;
            eager_max = eager_max.max(e);
            lazy_max = lazy_max.max(l);
        }

        let e_avg = eager_total as f64 / live.len() as f64;
        let l_avg = lazy_total as f64 / live.len() as f64;
        println!(
            "  eager repair: avg probes = {:.2}, worst = {}\n  lazy tombstones: avg probes = {:.2}, worst = {}",
            e_avg, eager_max, l_avg, lazy_max
        );

        eager_avg.push(e_avg);
        lazy_avg.push(l_avg);
        eager_worst.push(eager_max);
        lazy_worst.push(lazy_max);
    }

    // Plot average probe length against load factor.
    let font_family = "sans-serif";
    let colors = [
        RGBColor(50, 90, 220),  // Eager repair: blue
        RGBColor(220, 50, 50),  // Lazy tombstones: red
    ];
    let series = [("Eager repair", &eager_avg), ("Lazy tombstones", &lazy_avg)];

    let root = BitMapBackend::new("probe_lengths.png", (1200, 800)).into_drawing_area();
    root.fill(&WHITE)?;

    let max_avg = eager_avg
        .iter()
        .chain(lazy_avg.iter())
        .fold(0.0, |max, &x| if x > max { x } else { max }) *
        1.1;

    let mut chart = ChartBuilder::on(&root)
        .caption("Probe Length Under Churn: Eager Repair vs Lazy Tombstones", (font_family, 30))
        .margin(15)
        .x_label_area_size(60)
        .y_label_area_size(60)
        .build_cartesian_2d(0.0f64..0.8f64, 0.0f64..max_avg)?;

    chart
        .configure_mesh()
        .x_desc("Load Factor")
        .y_desc("Average Lookup Probe Length")
        .axis_desc_style((font_family, 16))
        .draw()?;

    for (series_idx, (name, values)) in series.iter().enumerate() {
        let color = &colors[series_idx % colors.len()];
        let line_style = ShapeStyle::from(color).stroke_width(2);

        chart
            .draw_series(LineSeries::new(
                LOAD_FACTORS.iter().zip(values.iter()).map(|(&x, &y)| (x, y)),
                line_style,
            ))?
            .label(*name)
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], line_style));

        chart.draw_series(
            LOAD_FACTORS
                .iter()
                .zip(values.iter())
                .map(|(&x, &y)| Circle::new((x, y), 4, color.filled())),
        )?;
    }

    chart
        .configure_series_labels()
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .position(SeriesLabelPosition::UpperLeft)
        .draw()?;

    println!("Generated plot image: probe_lengths.png");
    println!(
        "Worst-case probes at the top load factor: eager = {}, lazy = {}",
        eager_worst.last().unwrap(),
        lazy_worst.last().unwrap()
    );

    Ok(())
}
