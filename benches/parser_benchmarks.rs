use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use serde::Deserialize;
use std::collections::HashMap;
use typed_ini::{MapVariableHandler, Parser, ParserConfig};

const SECTIONS: usize = 20;

/// Build a parser whose schema covers every generated section
fn schema(config: ParserConfig) -> Parser {
    let mut parser = Parser::with_config(config);
    for i in 0..SECTIONS {
        let section = parser.add_section(&format!("service_{}", i));
        section.add_string("name");
        section.add_uint64("port");
        section.add_bool("enabled");
        section.add_float64("weight");
        section.add_string("url");
        section.add_float64_list("factors");
        section.add_string_list("tags");
    }
    parser
}

/// Generate a document with `entries` assignments per section
fn generate_ini(entries: usize) -> String {
    let mut content = String::from("# generated\n");
    for i in 0..SECTIONS {
        content.push_str(&format!("\n[service_{}]\n", i));
        content.push_str(&format!("name = \"service {}\"\n", i));
        content.push_str(&format!("port = {}\n", 8000 + i));
        content.push_str("enabled =\n");
        content.push_str("weight = 0.75\n");
        content.push_str("url = \"${SCHEME}://${HOST}:$PORT/api\"\n");
        content.push_str("factors = [\n");
        for j in 0..entries {
            content.push_str(&format!("  {}.5, {},\n", j, j * 2));
        }
        content.push_str("]\n");
        for j in 0..entries {
            content.push_str(&format!("tags = tag{}\n", j));
        }
    }
    content
}

#[derive(Deserialize)]
#[allow(dead_code)]
struct Service {
    name: String,
    port: u16,
    enabled: bool,
    weight: f64,
    factors: Vec<f64>,
    tags: Vec<String>,
}

/// Benchmark parsing documents of growing size
fn bench_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse");
    let parser = schema(ParserConfig::default());

    for entries in [1, 10, 100] {
        let content = generate_ini(entries);
        group.throughput(Throughput::Bytes(content.len() as u64));
        group.bench_with_input(
            BenchmarkId::new("entries", entries),
            &content,
            |b, content| b.iter(|| parser.parse_str(black_box(content))),
        );
    }

    group.finish();
}

/// Benchmark variable expansion
fn bench_variable_expansion(c: &mut Criterion) {
    let mut group = c.benchmark_group("variable_expansion");

    let mut vars = HashMap::new();
    vars.insert("SCHEME".to_string(), "https".to_string());
    vars.insert("HOST".to_string(), "api.example.com".to_string());
    vars.insert("PORT".to_string(), "443".to_string());

    let content = generate_ini(10);
    group.throughput(Throughput::Bytes(content.len() as u64));

    let plain = schema(ParserConfig::default());
    group.bench_function("disabled", |b| {
        b.iter(|| plain.parse_str(black_box(&content)))
    });

    let expanding = schema(ParserConfig::new().with_expand_variables(true))
        .with_variable_handler(MapVariableHandler::from_map(vars));
    group.bench_function("map_handler", |b| {
        b.iter(|| expanding.parse_str(black_box(&content)))
    });

    group.finish();
}

/// Benchmark section deserialization
fn bench_deserialize_section(c: &mut Criterion) {
    let parser = schema(ParserConfig::default());
    let content = generate_ini(10);
    let store = match parser.parse_str(&content) {
        Ok(store) => store,
        Err(e) => panic!("benchmark input failed to parse: {}", e),
    };

    c.bench_function("deserialize_section", |b| {
        b.iter(|| parser.deserialize_section::<Service>(black_box(&store), "service_0"))
    });
}

criterion_group!(
    benches,
    bench_parse,
    bench_variable_expansion,
    bench_deserialize_section
);
criterion_main!(benches);
