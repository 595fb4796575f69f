use std::path::Path;

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use darkblue_core::parser::{parse_document_str, validate_document};

fn make_document_json(n: usize) -> String {
    let users: Vec<String> = (0..n)
        .map(|i| {
            format!(
                r#"{{"index": 0.{i}, "name": "user{i}", "allowed": {}, "is_admin": {},
                    "admin_initial_state": false, "positive_points": 2, "negative_points": 0}}"#,
                i % 3 != 0,
                i % 2 == 0
            )
        })
        .collect();
    let registry: Vec<String> = (0..n)
        .map(|i| {
            format!(
                r#"{{"key": "HKEY_LOCAL_MACHINE", "key_path": "SOFTWARE\\Policies\\App{i}",
                    "entry_name": "Value{i}", "default_value": "1", "positive_value": "0",
                    "negative_value": "", "positive_points": 1, "negative_points": 0,
                    "create": false, "positive_message": "", "negative_message": ""}}"#
            )
        })
        .collect();

    format!(
        r#"{{"format": "DarkBlue", "OS": "Windows", "score": 500, "readme": "",
            "users": [{}], "registry": [{}]}}"#,
        users.join(","),
        registry.join(",")
    )
}

fn bench_json_parsing(c: &mut Criterion) {
    let mut group = c.benchmark_group("json_parsing");
    let source = Path::new("bench.json");

    for n in [10, 100, 1000] {
        let json = make_document_json(n);
        group.bench_function(format!("{n}_entries"), |b| {
            b.iter(|| parse_document_str(black_box(&json), source))
        });
    }

    group.finish();
}

fn bench_validation(c: &mut Criterion) {
    let json = make_document_json(500);
    let doc = parse_document_str(&json, Path::new("bench.json")).unwrap();

    c.bench_function("validate_500", |b| {
        b.iter(|| validate_document(black_box(&doc)))
    });
}

criterion_group!(benches, bench_json_parsing, bench_validation);
criterion_main!(benches);
