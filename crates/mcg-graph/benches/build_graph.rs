use criterion::{black_box, criterion_group, criterion_main, Criterion};
use mcg_core::{RngHandle, Token};
use mcg_graph::{build_with_scope, configuration_model, BuildOptions, ScopePreset, SwapOptions};
use mcg_morph::{AffixTable, Decomposer};
use rand::Rng;

const STEMS: &[&str] = &["ke", "ol", "ar", "a", "ee", "o", "t", "ckh", "e", "ai", "or", "al"];

fn synthetic_corpus(lines: u32) -> Vec<Token> {
    let prefixes = ["qo", "ch", "sh", "d", ""];
    let suffixes = ["dy", "y", "iin", "edy", ""];
    let mut rng = RngHandle::from_seed(42);
    let mut tokens = Vec::new();
    for line in 0..lines {
        for _ in 0..8 {
            let word = format!(
                "{}{}{}",
                prefixes[rng.gen_range(0..prefixes.len())],
                STEMS[rng.gen_range(0..STEMS.len())],
                suffixes[rng.gen_range(0..suffixes.len())]
            );
            tokens.push(Token::new(word, format!("f{}r", line / 30), line % 30, "H"));
        }
    }
    tokens
}

fn build_graph_bench(c: &mut Criterion) {
    let tokens = synthetic_corpus(5_000);
    let decomposer = Decomposer::new(
        AffixTable::new(["qo", "ch", "sh", "d"]).unwrap(),
        AffixTable::new(["edy", "dy", "iin", "y"]).unwrap(),
    );
    c.bench_function("build_graph_40k_tokens", |b| {
        b.iter(|| {
            let built = build_with_scope(
                &tokens,
                &decomposer,
                ScopePreset::Line,
                &BuildOptions::default(),
            )
            .unwrap();
            black_box(built);
        });
    });

    let graph = build_with_scope(&tokens, &decomposer, ScopePreset::Line, &BuildOptions::default())
        .unwrap()
        .graph;
    c.bench_function("configuration_model_draw", |b| {
        b.iter(|| {
            let mut rng = RngHandle::from_seed(7);
            black_box(configuration_model(&graph, &mut rng, &SwapOptions::default()).ok());
        });
    });
}

criterion_group!(benches, build_graph_bench);
criterion_main!(benches);
