use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use toml_scribe::{parse, Builder};

const SMALL_DOCUMENT: &str = r#"
title = "TOML Example"

[owner]
name = "Tom Preston-Werner"
dob = 1979-05-27T07:32:00Z

[database]
server = "192.168.1.1"
ports = [ 8001, 8001, 8002 ]
connection_max = 5000
enabled = true
"#;

fn generated_document(tables: usize) -> String {
    let mut builder = Builder::new();
    for index in 0..tables {
        builder.add_table(&format!("section{index}")).unwrap();
        builder.add_value("name", format!("item {index}")).unwrap();
        builder.add_value("index", index as i64).unwrap();
        builder
            .add_value("weights", vec![1.5.into(), 2.5.into(), 3.5.into()])
            .unwrap();
        builder.add_value("active", index % 2 == 0).unwrap();
    }
    builder.build()
}

fn benchmark_parse_small(c: &mut Criterion) {
    c.bench_function("parse_small_document", |b| {
        b.iter(|| parse(black_box(SMALL_DOCUMENT)))
    });
}

fn benchmark_parse_generated(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse_generated");

    for size in [10, 50, 250].iter() {
        let document = generated_document(*size);
        group.bench_with_input(
            BenchmarkId::from_parameter(size),
            &document,
            |b, document| b.iter(|| parse(black_box(document))),
        );
    }

    group.finish();
}

fn benchmark_build(c: &mut Criterion) {
    c.bench_function("build_document", |b| {
        b.iter(|| {
            let mut builder = Builder::new();
            builder
                .add_value("title", black_box("bench"))
                .unwrap()
                .add_table("server")
                .unwrap()
                .add_value("host", "127.0.0.1")
                .unwrap()
                .add_value("port", 8080)
                .unwrap()
                .add_value("tags", vec!["a".into(), "b".into()])
                .unwrap();
            builder.build()
        })
    });
}

fn benchmark_strings(c: &mut Criterion) {
    let document = {
        let mut lines = String::new();
        for index in 0..200 {
            lines.push_str(&format!(
                "key{index} = \"value with \\t escapes and \\u00E9 accents\"\n"
            ));
        }
        lines
    };

    c.bench_function("parse_escaped_strings", |b| {
        b.iter(|| parse(black_box(&document)))
    });
}

criterion_group!(
    benches,
    benchmark_parse_small,
    benchmark_parse_generated,
    benchmark_build,
    benchmark_strings
);
criterion_main!(benches);
