use mcg_core::Token;
use mcg_graph::{build, build_with_scope, BuildOptions, ScopePreset};
use mcg_morph::{AffixTable, Decomposer, Middle, RejectReason};

fn decomposer() -> Decomposer {
    Decomposer::new(
        AffixTable::new(["qo", "ch", "d"]).unwrap(),
        AffixTable::new(["edy", "dy", "iin", "y"]).unwrap(),
    )
}

fn line(folio: &str, line: u32, words: &[&str]) -> Vec<Token> {
    words
        .iter()
        .map(|word| Token::new(*word, folio, line, "H"))
        .collect()
}

fn text(value: &str) -> Middle {
    Middle::Text(value.into())
}

#[test]
fn single_line_of_three_middles_yields_a_triangle() {
    let tokens = line("f1r", 1, &["ke", "ol", "ar"]);
    let opts = BuildOptions { min_frequency: 1 };
    let built = build_with_scope(&tokens, &decomposer(), ScopePreset::Line, &opts).unwrap();
    let graph = built.graph;
    assert_eq!(graph.node_count(), 3);
    assert_eq!(graph.edge_count(), 3);
    let ke = graph.index_of(&text("ke")).unwrap();
    let ol = graph.index_of(&text("ol")).unwrap();
    let ar = graph.index_of(&text("ar")).unwrap();
    assert!(graph.has_edge(ke, ol));
    assert!(graph.has_edge(ke, ar));
    assert!(graph.has_edge(ol, ar));
    assert!(graph.is_symmetric());
}

#[test]
fn node_indices_follow_middle_order() {
    let tokens = line("f1r", 1, &["ol", "ar", "ke"]);
    let opts = BuildOptions { min_frequency: 1 };
    let built = build_with_scope(&tokens, &decomposer(), ScopePreset::Line, &opts).unwrap();
    assert_eq!(
        built.graph.labels(),
        &[text("ar"), text("ke"), text("ol")]
    );
}

#[test]
fn rare_middles_are_counted_but_not_nodes() {
    let mut tokens = line("f1r", 1, &["daiin", "chol", "qokedy"]);
    tokens.extend(line("f1r", 2, &["daiin", "chol"]));
    let built = build_with_scope(
        &tokens,
        &decomposer(),
        ScopePreset::Line,
        &BuildOptions::default(),
    )
    .unwrap();
    // daiin -> d|a|iin, chol -> ch|ol, qokedy -> qo|k|edy
    assert_eq!(built.vocabulary.frequency(&text("a")), 2);
    assert_eq!(built.vocabulary.frequency(&text("ol")), 2);
    assert_eq!(built.vocabulary.frequency(&text("k")), 1);
    assert_eq!(built.graph.labels(), &[text("a"), text("ol")]);
    assert_eq!(built.graph.edge_count(), 1);
    assert_eq!(built.scopes.scopes, 2);
}

#[test]
fn repeated_middle_in_a_scope_adds_no_loop() {
    let tokens = line("f2v", 4, &["chol", "chol", "ar", "ar"]);
    let built = build_with_scope(
        &tokens,
        &decomposer(),
        ScopePreset::Line,
        &BuildOptions::default(),
    )
    .unwrap();
    assert_eq!(built.graph.node_count(), 2);
    assert_eq!(built.graph.edge_count(), 1);
    assert!(built.graph.is_symmetric());
}

#[test]
fn lonely_scopes_contribute_no_edges() {
    let mut tokens = line("f1r", 1, &["ke"]);
    tokens.extend(line("f1r", 2, &["ke"]));
    tokens.extend(line("f1r", 3, &["ol"]));
    tokens.extend(line("f1r", 4, &["ol"]));
    let built = build_with_scope(
        &tokens,
        &decomposer(),
        ScopePreset::Line,
        &BuildOptions::default(),
    )
    .unwrap();
    assert_eq!(built.graph.node_count(), 2);
    assert_eq!(built.graph.edge_count(), 0);
    assert_eq!(built.scopes.scopes_without_edges, 4);

    let by_folio = build_with_scope(
        &tokens,
        &decomposer(),
        ScopePreset::Folio,
        &BuildOptions::default(),
    )
    .unwrap();
    assert_eq!(by_folio.graph.edge_count(), 1);
}

#[test]
fn skipped_tokens_are_counted_by_reason() {
    let tokens = line("f3r", 1, &["k", "ch?dy", "ke", "ol"]);
    let built = build_with_scope(
        &tokens,
        &decomposer(),
        ScopePreset::Line,
        &BuildOptions { min_frequency: 1 },
    )
    .unwrap();
    let skipped = built.vocabulary.skipped();
    assert_eq!(skipped.get(&RejectReason::TooShort), Some(&1));
    assert_eq!(skipped.get(&RejectReason::UncertaintyMarker), Some(&1));
    assert_eq!(built.graph.edge_count(), 1);
}

#[test]
fn custom_scope_closure_is_honoured() {
    let mut tokens = line("f1r", 1, &["ke", "ol"]);
    tokens.extend(line("f9v", 7, &["ke", "ol"]));
    let opts = BuildOptions { min_frequency: 1 };
    let everything = build(&tokens, &decomposer(), |_| (), &opts).unwrap();
    assert_eq!(everything.graph.edge_count(), 1);
    assert_eq!(everything.scopes.scopes, 1);
}

#[test]
fn empty_middle_is_an_ordinary_node() {
    let tokens = line("f1r", 1, &["qo", "qo", "ke", "ke"]);
    let built = build_with_scope(
        &tokens,
        &decomposer(),
        ScopePreset::Line,
        &BuildOptions::default(),
    )
    .unwrap();
    assert!(built.graph.index_of(&Middle::Empty).is_some());
    assert_eq!(built.graph.edge_count(), 1);
}
