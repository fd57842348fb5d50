use criterion::{Criterion, criterion_group, criterion_main};
use spacey_compiler::{CompileOptions, Compiler};
use std::hint::black_box;

const MODULE: &str = r#"
import { readFile } from "fs";
import * as path from "path";
import config, { defaults } from "./config.js";

export const root = path.resolve(config.root ?? defaults.root);

export function load(name) {
  const file = path.join(root, name);
  return readFile(file, (error, data) => {
    if (error) throw error;
    return { file, data, config };
  });
}

export default class Store {
  constructor(path) {
    this.path = path;
  }
}
"#;

fn bench_compile_module(c: &mut Criterion) {
    let mut compiler = Compiler::new();
    let options = CompileOptions::default();

    c.bench_function("compile_module", |b| {
        b.iter(|| black_box(compiler.compile(black_box(MODULE), &options)));
    });
}

fn bench_compile_large_module(c: &mut Criterion) {
    let source = MODULE.repeat(50).replace("export default class Store", "class Store");
    let mut compiler = Compiler::new();
    let options = CompileOptions::default();

    c.bench_function("compile_large_module", |b| {
        b.iter(|| black_box(compiler.compile(black_box(&source), &options)));
    });
}

fn bench_compile_script(c: &mut Criterion) {
    let source = "var total = 0;\nfor (var i = 0; i < 100; i++) { total += i * 2; }\n".repeat(20);
    let mut compiler = Compiler::new();
    let options = CompileOptions::default();

    c.bench_function("compile_script", |b| {
        b.iter(|| black_box(compiler.compile(black_box(&source), &options)));
    });
}

criterion_group!(
    benches,
    bench_compile_module,
    bench_compile_large_module,
    bench_compile_script
);
criterion_main!(benches);
