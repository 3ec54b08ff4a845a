use mcg_core::Token;
use mcg_graph::{build_with_scope, BuildOptions, ScopePreset};
use mcg_morph::{AffixTable, Decomposer};
use proptest::prelude::*;

const WORDS: &[&str] = &[
    "daiin", "chol", "qokedy", "qokeedy", "shedy", "okaiin", "chor", "ol", "ar", "qo", "dy",
    "k?", "s",
];

fn decomposer() -> Decomposer {
    Decomposer::new(
        AffixTable::new(["qo", "ch", "sh", "ok", "d"]).unwrap(),
        AffixTable::new(["edy", "dy", "aiin", "iin", "y"]).unwrap(),
    )
}

fn corpus() -> impl Strategy<Value = Vec<Token>> {
    prop::collection::vec((0..WORDS.len(), 0u32..6, 0usize..2), 0..60).prop_map(|rows| {
        rows.into_iter()
            .map(|(word, line, folio)| Token::new(WORDS[word], ["f1r", "f1v"][folio], line, "H"))
            .collect()
    })
}

proptest! {
    #[test]
    fn permuting_tokens_changes_nothing(tokens in corpus(), rotate in 0usize..60, min in 1u64..3) {
        let decomposer = decomposer();
        let opts = BuildOptions { min_frequency: min };
        let baseline = build_with_scope(&tokens, &decomposer, ScopePreset::Line, &opts).unwrap();

        let mut shuffled = tokens.clone();
        shuffled.reverse();
        if !shuffled.is_empty() {
            let shift = rotate % shuffled.len();
            shuffled.rotate_left(shift);
        }
        let permuted = build_with_scope(&shuffled, &decomposer, ScopePreset::Line, &opts).unwrap();

        prop_assert_eq!(&baseline.vocabulary, &permuted.vocabulary);
        prop_assert_eq!(&baseline.graph, &permuted.graph);
    }

    #[test]
    fn built_graphs_are_symmetric_and_loop_free(tokens in corpus()) {
        let built = build_with_scope(&tokens, &decomposer(), ScopePreset::Folio, &BuildOptions::default()).unwrap();
        prop_assert!(built.graph.is_symmetric());
        for node in 0..built.graph.node_count() {
            prop_assert!(!built.graph.has_edge(node, node));
        }
        let degree_total: usize = built.graph.degrees().iter().sum();
        prop_assert_eq!(degree_total, 2 * built.graph.edge_count());
    }
}
