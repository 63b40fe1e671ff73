// Graph property tests.
//
// Property: a Graph driven by random directed connections and undirected
// edge batches agrees with a nested std HashMap model.
//  - Model: HashMap<u, HashMap<v, w>>, last write wins.
//  - Operations: add_connection(u, v, w), read_edges(batch).
//  - Invariants after each op: vertex_count, edge_count and degree match;
//    every modeled weight is readable; add_connection never adds `v -> u`.
use probe_graph::{Edge, Graph};
use proptest::prelude::*;
use std::collections::HashMap;

#[derive(Clone, Debug)]
enum Op {
    Connect(u64, u64, u64),
    Batch(Vec<(u64, u64, u64)>),
}

fn arb_ops() -> impl Strategy<Value = Vec<Op>> {
    // A small vertex range forces overwrites and shared neighbors.
    let vertex = 0u64..40;
    let triple = (vertex.clone(), vertex, 0u64..100);
    let op = prop_oneof![
        3 => triple.clone().prop_map(|(u, v, w)| Op::Connect(u, v, w)),
        1 => proptest::collection::vec(triple, 0..20).prop_map(Op::Batch),
    ];
    proptest::collection::vec(op, 1..80)
}

type Model = HashMap<u64, HashMap<u64, u64>>;

fn connect(model: &mut Model, u: u64, v: u64, w: u64) {
    model.entry(u).or_default().insert(v, w);
}

proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_graph_matches_model(ops in arb_ops()) {
        let mut g = Graph::with_capacity(0, 1).expect("allocation");
        let mut model: Model = HashMap::new();

        for op in ops {
            match op {
                Op::Connect(u, v, w) => {
                    let reverse_before = g.weight(v, u);
                    g.add_connection(u, v, w).expect("allocation");
                    connect(&mut model, u, v, w);
                    if u != v {
                        prop_assert_eq!(g.weight(v, u), reverse_before, "add_connection is directed");
                    }
                }
                Op::Batch(triples) => {
                    let edges: Vec<Edge> = triples.iter().copied().map(Edge::from).collect();
                    g.read_edges(&edges).expect("allocation");
                    for e in &edges {
                        connect(&mut model, e.u, e.v, e.w);
                        connect(&mut model, e.v, e.u, e.w);
                    }
                }
            }

            prop_assert_eq!(g.vertex_count(), model.len());
            let total: usize = model.values().map(HashMap::len).sum();
            prop_assert_eq!(g.edge_count(), total);
            for (&u, adj) in &model {
                prop_assert_eq!(g.degree(u), adj.len());
                for (&v, &w) in adj {
                    prop_assert_eq!(g.weight(u, v), Some(w));
                }
            }
        }
    }
}
