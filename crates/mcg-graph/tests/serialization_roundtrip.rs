use mcg_graph::{
    canonical_hash, graph_from_bytes, graph_from_json, graph_to_bytes, graph_to_json,
    CompatibilityGraph,
};
use mcg_morph::Middle;

fn sample() -> CompatibilityGraph {
    let labels = vec![
        Middle::Text("a".into()),
        Middle::Text("ke".into()),
        Middle::Text("ol".into()),
        Middle::Empty,
    ];
    CompatibilityGraph::from_edges(labels, [(0, 1), (1, 2), (2, 3), (0, 3)]).unwrap()
}

#[test]
fn json_and_bytes_restore_identical_graphs() {
    let graph = sample();
    let json = graph_to_json(&graph).unwrap();
    let restored = graph_from_json(&json).unwrap();
    assert_eq!(restored, graph);
    assert_eq!(canonical_hash(&restored), canonical_hash(&graph));

    let bytes = graph_to_bytes(&graph).unwrap();
    assert_eq!(graph_from_bytes(&bytes).unwrap(), graph);
}

#[test]
fn json_with_self_loop_is_rejected() {
    let json = r#"{"schema_version":{"major":1,"minor":0,"patch":0},"labels":[{"text":"a"}],"edges":[[0,0]]}"#;
    let err = graph_from_json(json).unwrap_err();
    assert_eq!(err.info().code, "deserialize-json");
    assert!(err.info().message.contains("self-loop"));
}

#[test]
fn hash_depends_on_labels_and_edges() {
    let graph = sample();
    let relabelled = CompatibilityGraph::from_edges(
        vec![
            Middle::Text("b".into()),
            Middle::Text("ke".into()),
            Middle::Text("ol".into()),
            Middle::Empty,
        ],
        graph.edges(),
    )
    .unwrap();
    assert_ne!(canonical_hash(&graph), canonical_hash(&relabelled));
    assert_eq!(canonical_hash(&graph).len(), 64);
}
