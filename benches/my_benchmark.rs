use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use minisql::{Database, ExecutionResult, Tokenizer, parse};
use std::hint::black_box;

fn setup_populated_db(n: usize) -> Database {
    let mut db = Database::new();

    db.execute("CREATE TABLE users (id INT, name TEXT, age INT)")
        .unwrap();

    for i in 0..n {
        db.execute(&format!(
            "INSERT INTO users VALUES ({i}, 'user{i}', {})",
            i % 100
        ))
        .unwrap();
    }
    db
}

fn bench_tokenize(c: &mut Criterion) {
    let sql = "CREATE TABLE users (id INT, name TEXT); \
               INSERT INTO users VALUES (1, 'it''s'); \
               SELECT name, id FROM users;";

    c.bench_function("tokenize_batch", |b| {
        b.iter(|| Tokenizer::new(black_box(sql)).tokenize().unwrap());
    });
    c.bench_function("parse_batch", |b| {
        b.iter(|| parse(black_box(sql)).unwrap());
    });
}

fn bench_insert_sql(c: &mut Criterion) {
    let mut group = c.benchmark_group("Insert_SQL_Pipeline");
    group.bench_function("insert_single_row_sql", |b| {
        let mut db = Database::new();
        db.execute("CREATE TABLE tests (id INT)").unwrap();
        b.iter(|| {
            db.execute(black_box("INSERT INTO tests VALUES (42)"))
                .unwrap();
        });
    });
    group.finish();
}

fn bench_select_scaling(c: &mut Criterion) {
    let mut group = c.benchmark_group("Select_Projection");

    for n in [1000, 10000].iter() {
        group.bench_with_input(BenchmarkId::from_parameter(n), n, |b, &n| {
            let mut db = setup_populated_db(n);
            b.iter(|| {
                let res = db.execute("SELECT name, age FROM users").unwrap();
                assert!(matches!(res[0], ExecutionResult::Rows(_)));
                black_box(res);
            });
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_tokenize,
    bench_insert_sql,
    bench_select_scaling
);
criterion_main!(benches);
