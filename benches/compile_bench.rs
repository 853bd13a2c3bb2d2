use criterion::{black_box, criterion_group, criterion_main, Criterion};
use lucene_to_sql::{parse_query, QueryCompiler};

/// Benchmark parsing alone
fn bench_parsing(c: &mut Criterion) {
    let mut group = c.benchmark_group("parsing");

    group.bench_function("single_term", |b| {
        b.iter(|| parse_query(black_box("ABC")))
    });

    group.bench_function("phrase", |b| {
        b.iter(|| parse_query(black_box("\"APPLE PIE WITH CREAM\"")))
    });

    group.bench_function("boolean_flat", |b| {
        b.iter(|| parse_query(black_box("CAT OR DOG AND MUZZLE OR LEASH")))
    });

    group.bench_function("boolean_nested", |b| {
        b.iter(|| {
            parse_query(black_box(
                "(CAT OR DOG) AND (MUZZLE AND LEASH (-TOY +TREAT))",
            ))
        })
    });

    group.bench_function("escaped_phrase", |b| {
        b.iter(|| {
            parse_query(black_box(
                "\"5% OF CODERS \\{\\{FOO\\}\\} ARE COD\\[ING\\] ALL_NIGHT_LONG\"",
            ))
        })
    });

    group.finish();
}

/// Benchmark full query-string to SQL compilation
fn bench_compilation(c: &mut Criterion) {
    let mut group = c.benchmark_group("compilation");
    let like = QueryCompiler::sql_server();
    let full_text = QueryCompiler::sql_server_full_text();

    group.bench_function("like_single_term", |b| {
        b.iter(|| like.build_where_clause(black_box("abc")))
    });

    group.bench_function("like_nested_boolean", |b| {
        b.iter(|| {
            like.build_where_clause(black_box(
                "(cat Or dog) And (muzzle aNd leash (-toy +treat))",
            ))
        })
    });

    group.bench_function("full_text_wildcard", |b| {
        b.iter(|| full_text.build_where_clause(black_box("ab?cd*")))
    });

    group.bench_function("expanded_three_columns", |b| {
        b.iter(|| {
            full_text.build_where_clause_for_columns(
                black_box("fruit AND (veg OR cheese)"),
                black_box(&["name", "desc", "code"]),
            )
        })
    });

    group.bench_function("full_statement", |b| {
        b.iter(|| {
            like.build_statement(
                black_box("fruit AND (veg OR cheese)"),
                black_box("products"),
                black_box(&["name", "summary"]),
                black_box(&["id", "name", "summary"]),
            )
        })
    });

    group.finish();
}

criterion_group!(benches, bench_parsing, bench_compilation);
criterion_main!(benches);
