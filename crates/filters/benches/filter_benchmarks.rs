use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};

use catalog_core::Price;
use catalog_filters::{FilterState, PriceRange, QueryParams, filter_products, slice_page};
use catalog_products::{Catalog, ProductRecord};

const COLORS: [&str; 6] = ["White", "Black", "Green", "Brown", "Red", "Blue"];
const TAGS: [&str; 5] = ["Sandals", "Mules", "Mid-Heels", "Flats", "New Arrivals"];

/// Synthetic catalog with a spread of colors, tags and prices.
fn synthetic_catalog(size: usize) -> Catalog {
    Catalog::new(
        (0..size)
            .map(|i| {
                ProductRecord::new(format!("Product {i}"), Price::from_cents(1000 + (i as u64 * 137) % 20_000))
                    .with_colors([COLORS[i % COLORS.len()]])
                    .with_tags([TAGS[i % TAGS.len()], TAGS[(i / 3) % TAGS.len()]])
            })
            .collect(),
    )
}

fn narrowed_state() -> FilterState {
    FilterState::new(
        ["white", "green"],
        ["mid-heels", "mules"],
        PriceRange::new(Price::from_units(20), Price::from_units(150)),
    )
}

fn bench_full_filter(c: &mut Criterion) {
    let mut group = c.benchmark_group("full_catalog_filter");

    for size in [400, 4_000, 40_000, 400_000].iter() {
        let catalog = synthetic_catalog(*size);
        let state = narrowed_state();
        group.throughput(Throughput::Elements(*size as u64));
        group.bench_with_input(BenchmarkId::new("narrowed", size), size, |b, _| {
            b.iter(|| {
                black_box(filter_products(catalog.products(), &state, catalog.limits()).count());
            });
        });
    }

    group.finish();
}

fn bench_page_slice(c: &mut Criterion) {
    let mut group = c.benchmark_group("paged_fetch_slice");

    for size in [4_000, 40_000].iter() {
        let catalog = synthetic_catalog(*size);
        let first = QueryParams::parse("color=white&tag=mules&cursor=0");
        let deep = QueryParams::parse("color=white&tag=mules&cursor=50");

        group.bench_with_input(BenchmarkId::new("first_page", size), size, |b, _| {
            b.iter(|| black_box(slice_page(&catalog, &first)));
        });
        group.bench_with_input(BenchmarkId::new("deep_page", size), size, |b, _| {
            b.iter(|| black_box(slice_page(&catalog, &deep)));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_full_filter, bench_page_slice);
criterion_main!(benches);
