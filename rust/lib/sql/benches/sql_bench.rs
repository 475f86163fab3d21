use criterion::{black_box, criterion_group, criterion_main, Criterion};

use factoryerp_sql::{SQLExecutor, SQLStore, SqliteStore, Value};

fn bench_exec_insert(c: &mut Criterion) {
    let store = SqliteStore::open_in_memory().unwrap();
    store
        .exec(
            "CREATE TABLE bench (id INTEGER PRIMARY KEY AUTOINCREMENT, name TEXT, qty INTEGER)",
            &[],
        )
        .unwrap();

    c.bench_function("sqlite_insert", |b| {
        b.iter(|| {
            store
                .exec(
                    "INSERT INTO bench (name, qty) VALUES (?1, ?2)",
                    &[
                        Value::Text("order-bench".to_string()),
                        Value::Integer(black_box(100)),
                    ],
                )
                .unwrap();
        })
    });
}

fn bench_txn_insert(c: &mut Criterion) {
    let store = SqliteStore::open_in_memory().unwrap();
    store
        .exec(
            "CREATE TABLE bench (id INTEGER PRIMARY KEY AUTOINCREMENT, name TEXT, qty INTEGER)",
            &[],
        )
        .unwrap();

    c.bench_function("sqlite_txn_insert_10", |b| {
        b.iter(|| {
            store
                .with_transaction(&mut |tx| {
                    for i in 0..10 {
                        tx.exec(
                            "INSERT INTO bench (name, qty) VALUES (?1, ?2)",
                            &[Value::Text("lot-bench".to_string()), Value::Integer(i)],
                        )?;
                    }
                    Ok(())
                })
                .unwrap();
        })
    });
}

criterion_group!(benches, bench_exec_insert, bench_txn_insert);
criterion_main!(benches);
