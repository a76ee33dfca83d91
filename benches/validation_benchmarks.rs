use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use std::hint::black_box;

use csv_validate::schema::{CLEANED, MERGED};
use csv_validate::{Dataset, SchemaRegistry, reconcile, validate_dataset};

const CLEANED_HEADER: &str = "customer_id,name,email,age,phone,salary,join_date";
const MERGED_HEADER: &str = "customer_id,name,email,city,registration_date,total_purchases";

/// Generate cleaned-customer CSV content for a scenario
fn generate_cleaned_content(rows: usize, scenario: &str) -> String {
    let mut content = String::from(CLEANED_HEADER);
    content.push('\n');

    for i in 0..rows {
        let line = match scenario {
            "all_valid" => format!(
                "{},Customer Number,c{}@example.com,{},(555) {:03}-{:04},{},2023-01-15",
                i,
                i,
                20 + i % 50,
                i % 1000,
                i % 10_000,
                40_000 + i
            ),
            "mixed_errors" => match i % 4 {
                0 => format!("{},customer lower,c{}@example,30,555-0000,1000,2023/01/15", i, i),
                1 => format!("{},Customer Ok,c{}@example.com,,,1000,", i, i),
                2 => format!(
                    "{},Customer Ok,c{}@example.com,31,(555) 000-0000,1000,2023-01-15",
                    i, i
                ),
                _ => format!("{},CUSTOMER,bad,x,(555) 000-0000,1000,15-01-2023", i),
            },
            _ => format!("{},Customer,c{}@example.com,30,(555) 000-0000,1000,2023-01-15", i, i),
        };
        content.push_str(&line);
        content.push('\n');
    }

    content
}

fn generate_merged_content(ids: impl Iterator<Item = usize>) -> String {
    let mut content = String::from(MERGED_HEADER);
    content.push('\n');
    for i in ids {
        content.push_str(&format!(
            "{},Customer {},c{}@example.com,City,2023-01-01,{}\n",
            i,
            i,
            i,
            i % 7
        ));
    }
    content
}

fn bench_load(c: &mut Criterion) {
    let mut group = c.benchmark_group("load");

    for rows in [100, 1_000, 10_000] {
        let content = generate_cleaned_content(rows, "all_valid");
        group.throughput(Throughput::Bytes(content.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(rows), &content, |b, content| {
            b.iter(|| {
                let dataset = Dataset::from_reader("bench.csv", black_box(content.as_bytes()));
                black_box(dataset)
            })
        });
    }

    group.finish();
}

fn bench_cleaned_rules(c: &mut Criterion) {
    let registry = SchemaRegistry::with_embedded().expect("embedded schemas");
    let schema = registry.get(CLEANED).expect("cleaned schema");

    let mut group = c.benchmark_group("cleaned_rules");

    for scenario in ["all_valid", "mixed_errors"] {
        for rows in [1_000, 10_000] {
            let content = generate_cleaned_content(rows, scenario);
            let dataset = Dataset::from_reader("bench.csv", content.as_bytes()).expect("load");

            group.throughput(Throughput::Elements(rows as u64));
            group.bench_with_input(
                BenchmarkId::new(scenario, rows),
                &dataset,
                |b, dataset| {
                    b.iter(|| {
                        let result = validate_dataset(black_box(dataset), black_box(schema));
                        black_box(result)
                    })
                },
            );
        }
    }

    group.finish();
}

fn bench_reconcile(c: &mut Criterion) {
    let registry = SchemaRegistry::with_embedded().expect("embedded schemas");
    let schema = registry.get(MERGED).expect("merged schema");

    let mut group = c.benchmark_group("reconcile");

    for customers in [1_000, 10_000] {
        // each source holds two thirds of the customers; the middle third overlaps
        let q1 = generate_merged_content(0..(customers * 2 / 3));
        let q2 = generate_merged_content((customers / 3)..customers);
        let merged = generate_merged_content(0..customers);

        let q1 = Dataset::from_reader("q1.csv", q1.as_bytes()).expect("load q1");
        let q2 = Dataset::from_reader("q2.csv", q2.as_bytes()).expect("load q2");
        let merged = Dataset::from_reader("merged.csv", merged.as_bytes()).expect("load merged");

        group.throughput(Throughput::Elements(customers as u64));
        group.bench_function(BenchmarkId::from_parameter(customers), |b| {
            b.iter(|| {
                let outcome = reconcile(black_box(&merged), [&q1, &q2], black_box(schema));
                black_box(outcome)
            })
        });
    }

    group.finish();
}

criterion_group!(
    validation_benches,
    bench_load,
    bench_cleaned_rules,
    bench_reconcile
);

criterion_main!(validation_benches);
