//! Benchmarks for the schema safety check
//!
//! Measures lowering plus matching over generated schemas with many models
//! and fields, where every model and field is renamed behind a stable mapping.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use schemaguard_core::{FieldNode, ModelNode, SchemaAst};
use schemaguard_engine::{list_safety_issues, lower};

/// Generate a schema with N models of M fields, names prefixed by `prefix`
fn generate_schema(num_models: usize, num_fields: usize, prefix: &str) -> SchemaAst {
    let mut ast = SchemaAst::new();

    for i in 0..num_models {
        let mut model = ModelNode::new(format!("{}Model{}", prefix, i)).mapped(&format!("table_{}", i));
        model = model.with_field(FieldNode::new("id", "String").id());

        for j in 0..num_fields {
            let field = FieldNode::new(format!("{}field{}", prefix, j), "String")
                .mapped(&format!("column_{}", j));
            model = model.with_field(field);
        }

        if i > 0 {
            model = model.with_field(FieldNode::new("parent", format!("{}Model{}", prefix, i - 1)));
        }

        ast = ast.with_model(model);
    }

    ast
}

fn bench_lowering(c: &mut Criterion) {
    let mut group = c.benchmark_group("lowering");

    for size in [10, 100, 500] {
        let schema = generate_schema(size, 20, "");
        group.bench_with_input(BenchmarkId::from_parameter(size), &schema, |b, schema| {
            b.iter(|| lower(black_box(schema)).unwrap());
        });
    }

    group.finish();
}

fn bench_full_check(c: &mut Criterion) {
    let mut group = c.benchmark_group("full_check");

    for size in [10, 100, 500] {
        let prev = generate_schema(size, 20, "");
        let current = generate_schema(size, 20, "Renamed");

        group.bench_with_input(BenchmarkId::from_parameter(size), &(prev, current), |b, (prev, current)| {
            b.iter(|| {
                let issues = list_safety_issues(black_box(prev), black_box(current)).unwrap();
                assert!(issues.is_empty());
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_lowering, bench_full_check);
criterion_main!(benches);
