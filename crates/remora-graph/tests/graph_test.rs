use remora_graph::{Direction, Graph, ItemData};

fn table(len: usize) -> ItemData<(), ()> {
    ItemData::new(vec![(); len], Vec::new())
}

#[test]
fn add_node_rejects_duplicate_ids() {
    let mut g = Graph::new(false);
    assert_eq!(g.add_node("a", Some(0)), Some(0));
    assert_eq!(g.add_node("a", Some(1)), None);
    assert_eq!(g.node_count(), 1);
}

#[test]
fn add_edge_with_unknown_endpoint_is_not_created() {
    let mut g = Graph::new(false);
    g.add_node("a", Some(0));
    assert_eq!(g.add_edge("a", "missing", Some(0)), None);
    assert_eq!(g.add_edge("missing", "a", Some(0)), None);
    assert_eq!(g.edge_count(), 0);
}

#[test]
fn endpoints_resolve_by_index_or_id() {
    let mut g = Graph::new(false);
    let a = g.add_node("a", Some(0)).unwrap();
    g.add_node("b", Some(1));
    assert!(g.add_edge(a, "b", Some(0)).is_some());
    assert!(g.add_edge("b", a, Some(1)).is_some());
    assert_eq!(g.edge_count(), 2);
}

#[test]
fn directed_adjacency_tracks_in_and_out_edges() {
    let mut g = Graph::new(true);
    let a = g.add_node("a", Some(0)).unwrap();
    let b = g.add_node("b", Some(1)).unwrap();
    g.add_edge(a, b, Some(0));

    assert_eq!(g.nodes()[a].out_degree(), 1);
    assert_eq!(g.nodes()[a].in_degree(), 0);
    assert_eq!(g.nodes()[b].in_degree(), 1);
    assert_eq!(g.nodes()[a].degree(), 1);
    assert_eq!(g.nodes()[b].degree(), 1);
}

#[test]
fn self_loop_enters_node_adjacency_once() {
    let mut g = Graph::new(true);
    let a = g.add_node("a", Some(0)).unwrap();
    g.add_edge(a, a, Some(0));

    assert_eq!(g.nodes()[a].degree(), 1);
    // In- and out-lists both carry the loop on a directed graph.
    assert_eq!(g.nodes()[a].in_degree(), 1);
    assert_eq!(g.nodes()[a].out_degree(), 1);
    assert!(g.edges()[0].is_self_loop());
}

#[test]
fn get_edge_probes_both_orders_only_when_undirected() {
    let mut g = Graph::new(false);
    g.add_node("a", Some(0));
    g.add_node("b", Some(1));
    g.add_edge("a", "b", Some(0));
    assert_eq!(g.get_edge("b", "a"), Some(0));

    let mut d = Graph::new(true);
    d.add_node("a", Some(0));
    d.add_node("b", Some(1));
    d.add_edge("a", "b", Some(0));
    assert_eq!(d.get_edge("a", "b"), Some(0));
    assert_eq!(d.get_edge("b", "a"), None);
}

#[test]
fn each_node_skips_filtered_entries_in_registration_order() {
    let mut g = Graph::new(false);
    g.add_node("a", Some(0));
    g.add_node("b", None);
    g.add_node("c", Some(1));

    let mut seen = Vec::new();
    g.each_node(|n| seen.push(n.id.clone()));
    assert_eq!(seen, vec!["a", "c"]);
}

#[test]
fn each_edge_requires_both_endpoints_active() {
    let mut g = Graph::new(false);
    g.add_node("a", Some(0));
    g.add_node("b", None);
    g.add_node("c", Some(1));
    g.add_edge("a", "b", Some(0));
    g.add_edge("a", "c", Some(1));

    let mut seen = Vec::new();
    g.each_edge(|_, index| seen.push(index));
    assert_eq!(seen, vec![1]);
}

#[test]
fn bfs_visits_breadth_first_with_from_nodes() {
    let mut g = Graph::new(true);
    for (i, id) in ["a", "b", "c", "d"].iter().enumerate() {
        g.add_node(*id, Some(i));
    }
    g.add_edge("a", "b", Some(0));
    g.add_edge("a", "c", Some(1));
    g.add_edge("b", "d", Some(2));

    let mut order = Vec::new();
    g.breadth_first_traverse("a", Direction::Out, |node, from| {
        order.push((node.id.clone(), from.map(|f| f.id.clone())));
        false
    });
    assert_eq!(
        order,
        vec![
            ("a".to_string(), None),
            ("b".to_string(), Some("a".to_string())),
            ("c".to_string(), Some("a".to_string())),
            ("d".to_string(), Some("b".to_string())),
        ]
    );
}

#[test]
fn bfs_stops_when_the_callback_says_so() {
    let mut g = Graph::new(true);
    for (i, id) in ["a", "b", "c"].iter().enumerate() {
        g.add_node(*id, Some(i));
    }
    g.add_edge("a", "b", Some(0));
    g.add_edge("b", "c", Some(1));

    let mut visited = 0;
    g.breadth_first_traverse("a", Direction::Out, |node, _| {
        visited += 1;
        node.id == "b"
    });
    assert_eq!(visited, 2);
}

#[test]
fn bfs_in_direction_walks_against_the_edges() {
    let mut g = Graph::new(true);
    for (i, id) in ["a", "b", "c"].iter().enumerate() {
        g.add_node(*id, Some(i));
    }
    g.add_edge("a", "b", Some(0));
    g.add_edge("b", "c", Some(1));

    let mut seen = Vec::new();
    g.breadth_first_traverse("c", Direction::In, |node, _| {
        seen.push(node.id.clone());
        false
    });
    assert_eq!(seen, vec!["c", "b", "a"]);
}

#[test]
fn bfs_with_unknown_start_is_a_no_op() {
    let g = Graph::new(true);
    let mut visited = 0;
    g.breadth_first_traverse("nope", Direction::All, |_, _| {
        visited += 1;
        false
    });
    assert_eq!(visited, 0);
}

#[test]
fn update_reconciles_nodes_and_drops_dangling_edges() {
    let mut g = Graph::new(true);
    g.add_node("a", Some(0));
    g.add_node("b", Some(1));
    g.add_node("c", Some(2));
    g.add_edge("a", "b", Some(0));
    g.add_edge("b", "c", Some(1));
    g.add_edge("a", "c", Some(2));

    let mut node_data = table(3);
    let mut edge_data = table(3);

    // The host filters node "b" out of view.
    node_data.filter_self(|_, raw| raw != 1);
    g.update(&node_data, &mut edge_data);

    let mut active_edges = Vec::new();
    g.each_edge(|_, index| active_edges.push(index));
    assert_eq!(active_edges, vec![2]);
    assert_eq!(edge_data.count(), 1);

    // Data-index round trips stay self-consistent.
    for data_index in 0..node_data.count() {
        let node = g.node_by_data_index(data_index, &node_data).unwrap();
        assert_eq!(node.data_index, Some(data_index));
    }
    for data_index in 0..edge_data.count() {
        let edge = g.edge_by_data_index(data_index, &edge_data).unwrap();
        assert_eq!(edge.data_index, Some(data_index));
    }
    assert_eq!(g.node_by_data_index(0, &node_data).unwrap().id, "a");
    assert_eq!(g.node_by_data_index(1, &node_data).unwrap().id, "c");
}

#[test]
fn update_restores_everything_when_the_filter_is_reset() {
    let mut g = Graph::new(true);
    g.add_node("a", Some(0));
    g.add_node("b", Some(1));
    g.add_edge("a", "b", Some(0));

    let mut node_data = table(2);
    let mut edge_data = table(1);

    node_data.filter_self(|_, raw| raw == 0);
    g.update(&node_data, &mut edge_data);
    assert_eq!(edge_data.count(), 0);

    node_data.reset_view();
    edge_data.reset_view();
    g.update(&node_data, &mut edge_data);
    assert_eq!(edge_data.count(), 1);
    assert_eq!(g.edges()[0].data_index, Some(0));
}

#[test]
fn clone_preserves_structure_ids_and_data_indices() {
    let mut g = Graph::new(true);
    g.add_node("a", Some(0));
    g.add_node("b", Some(1));
    g.add_edge("a", "b", Some(0));

    let clone = g.clone();
    assert_eq!(clone.node_count(), 2);
    assert_eq!(clone.edge_count(), 1);
    assert_eq!(clone.node_by_id("a"), Some(0));
    assert_eq!(clone.nodes()[0].data_index, Some(0));
    assert_eq!(clone.edges()[0].data_index, Some(0));
}

#[test]
fn adjacent_indices_only_count_active_items() {
    let mut g = Graph::new(true);
    let a = g.add_node("a", Some(0)).unwrap();
    g.add_node("b", Some(1));
    g.add_node("c", None);
    g.add_edge("a", "b", Some(0));
    g.add_edge("a", "c", Some(1));

    let adj = g.node_adjacent_indices(a);
    assert_eq!(adj.edge, vec![0]);
    assert_eq!(adj.node, vec![0, 1]);
}

#[test]
fn table_values_pad_with_nan() {
    let t: ItemData<(), ()> = ItemData::new(vec![(), ()], vec![3.0]);
    assert_eq!(t.value(0), 3.0);
    assert!(t.value(1).is_nan());
}
