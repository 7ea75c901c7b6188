//! Query Rendering Benchmarks
//!
//! Benchmarks for XPath fragment rendering and literal escaping.
//!
//! Run with: `cargo bench --bench query_ops`

#![allow(missing_docs)]

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use palpar::prelude::*;

fn bench_query_rendering(c: &mut Criterion) {
    let mut group = c.benchmark_group("query_rendering");

    let queries = vec![
        ("id", Query::new().id("login_button")),
        ("id_and_text", Query::new().id_and_text("title", "Vault")),
        (
            "alternatives",
            Query::new().id_or("email", &["email_field", "username"]),
        ),
        (
            "nested_children",
            Query::new().element_with_class_and_child_texts(
                "XCUIElementTypeCell",
                &["Folders", "No folders"],
            ),
        ),
        (
            "composed",
            Query::new()
                .id("screen")
                .root_parent()
                .class("android.widget.ListView")
                .id_and_text("row", "Item 5")
                .index_wrapped(4),
        ),
    ];

    for (name, query) in queries {
        for platform in [Platform::Android, Platform::Ios] {
            group.bench_with_input(
                BenchmarkId::new(name, platform),
                &query,
                |bench, query| {
                    bench.iter(|| {
                        let rendered =
                            query.render(platform.dialect(), black_box("com.example.app"));
                        black_box(rendered);
                    });
                },
            );
        }
    }

    group.finish();
}

fn bench_literal_escaping(c: &mut Criterion) {
    let mut group = c.benchmark_group("literal_escaping");

    let texts = vec![
        ("plain", "Save changes"),
        ("apostrophes", "it's the user's vault"),
        ("ampersand", "Terms & Conditions"),
    ];

    for (name, text) in texts {
        group.bench_with_input(BenchmarkId::from_parameter(name), &text, |bench, text| {
            bench.iter(|| {
                let literal = xpath_literal(black_box(text));
                black_box(literal);
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_query_rendering, bench_literal_escaping);
criterion_main!(benches);
