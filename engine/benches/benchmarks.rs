//! Performance benchmarks for formwright-engine

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use formwright_engine::{
    validate, BuilderState, FieldDefinition, FieldPatch, FieldType, FieldValue, FormValues,
    InputType, Mutation, Store,
};

fn create_test_store(size: usize) -> Store {
    let mut store = Store::new();
    for i in 0..size {
        store.dispatch(Mutation::add_field(FieldType::ALL[i % FieldType::ALL.len()]));
    }
    store
}

fn create_test_form(size: usize) -> (Vec<FieldDefinition>, FormValues) {
    let input_types = [InputType::Text, InputType::Email, InputType::Number, InputType::Url];
    let samples = ["Ada", "ada@example.com", "42", "https://example.com"];

    let mut fields = Vec::with_capacity(size);
    let mut values = FormValues::new();
    for i in 0..size {
        let id = format!("field_{}", i);
        let kind = i % input_types.len();
        fields.push(FieldDefinition::with_id(id.clone(), FieldType::Text).apply_update(
            &FieldPatch::new()
                .label(format!("Field {}", i))
                .required(i % 2 == 0)
                .input_type(input_types[kind]),
        ));
        values.insert(id, FieldValue::from(samples[kind]));
    }
    (fields, values)
}

fn bench_store_operations(c: &mut Criterion) {
    let mut group = c.benchmark_group("store_operations");

    // Benchmark add field
    group.bench_function("dispatch_add_field", |b| {
        let mut store = Store::new();
        b.iter(|| store.dispatch(black_box(Mutation::add_field(FieldType::Select))))
    });

    // Benchmark update field
    group.bench_function("dispatch_update_field", |b| {
        let mut store = create_test_store(100);
        let id = store.fields()[50].id().clone();
        let mut n = 0u64;

        b.iter(|| {
            n += 1;
            store.dispatch(black_box(Mutation::update_field(
                id.clone(),
                FieldPatch::new().label(format!("Label {}", n)),
            )))
        })
    });

    // Benchmark publish
    group.bench_function("publish_100_fields", |b| {
        let mut store = create_test_store(100);
        b.iter(|| store.publish())
    });

    group.finish();
}

fn bench_reorder(c: &mut Criterion) {
    let mut group = c.benchmark_group("reorder");

    for size in [10, 100, 1000].iter() {
        group.bench_with_input(BenchmarkId::new("first_to_last", size), size, |b, &size| {
            let mut store = create_test_store(size);
            b.iter(|| {
                let first = store.fields()[0].id().clone();
                let last = store.fields()[size - 1].id().clone();
                store.dispatch(black_box(Mutation::reorder_fields(first, last)))
            })
        });
    }

    group.finish();
}

fn bench_validation(c: &mut Criterion) {
    let mut group = c.benchmark_group("validation");

    for size in [10, 100, 1000].iter() {
        let (fields, values) = create_test_form(*size);
        group.bench_with_input(BenchmarkId::new("validate", size), size, |b, _| {
            b.iter(|| validate(black_box(&fields), black_box(&values)))
        });
    }

    // All required fields missing
    let (fields, _) = create_test_form(100);
    group.bench_function("validate_all_missing", |b| {
        let empty = FormValues::new();
        b.iter(|| validate(black_box(&fields), black_box(&empty)))
    });

    group.finish();
}

fn bench_serialization(c: &mut Criterion) {
    let mut group = c.benchmark_group("serialization");

    let store = create_test_store(100);
    let json = serde_json::to_string(store.state()).unwrap();

    group.bench_function("state_serialize", |b| {
        b.iter(|| serde_json::to_string(black_box(store.state())))
    });

    group.bench_function("state_deserialize", |b| {
        b.iter(|| serde_json::from_str::<BuilderState>(black_box(&json)))
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_store_operations,
    bench_reorder,
    bench_validation,
    bench_serialization,
);
criterion_main!(benches);
