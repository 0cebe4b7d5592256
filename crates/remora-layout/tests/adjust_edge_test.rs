use indexmap::IndexMap;
use remora_layout::{
    EdgeModel, EdgePoints, GraphData, LineStyle, NodeKey, NodeModel, Point, Rect, SeriesOptions,
    SymbolKind, SymbolSize, ViewRect, adjust_edges, layout,
};

fn node(id: &str, x: f64, y: f64, size: f64) -> NodeModel {
    NodeModel {
        id: Some(id.to_string()),
        x: Some(x),
        y: Some(y),
        symbol_size: SymbolSize::Scalar(size),
        ..Default::default()
    }
}

fn edge(source: &str, target: &str) -> EdgeModel {
    EdgeModel {
        source: Some(NodeKey::Id(source.to_string())),
        target: Some(NodeKey::Id(target.to_string())),
        symbol: Some([SymbolKind::Circle, SymbolKind::Arrow]),
        ..Default::default()
    }
}

fn run(data: &mut GraphData, series: &SeriesOptions) {
    let coord = ViewRect::new(Rect::new(0.0, 0.0, 200.0, 200.0));
    layout(data, series, &coord, IndexMap::new()).unwrap();
}

#[test]
fn straight_edges_are_trimmed_to_the_symbol_rims() {
    let mut data = GraphData::new(
        true,
        vec![node("a", 0.0, 0.0, 20.0), node("b", 100.0, 0.0, 10.0)],
        vec![edge("a", "b")],
    );
    let series = SeriesOptions::default();
    run(&mut data, &series);
    adjust_edges(&data.graph, &data.nodes, &mut data.edges, &series, 1.0);

    match data.edges.layout(0).unwrap().points {
        EdgePoints::Line { p1, p2 } => {
            assert_eq!(p1, Point::new(10.0, 0.0));
            assert_eq!(p2, Point::new(95.0, 0.0));
        }
        ref other => panic!("expected a straight edge, got {other:?}"),
    }
}

#[test]
fn ends_without_a_symbol_are_left_alone() {
    let mut data = GraphData::new(
        true,
        vec![node("a", 0.0, 0.0, 20.0), node("b", 100.0, 0.0, 10.0)],
        vec![EdgeModel {
            symbol: Some([SymbolKind::None, SymbolKind::Arrow]),
            ..edge("a", "b")
        }],
    );
    let series = SeriesOptions::default();
    run(&mut data, &series);
    adjust_edges(&data.graph, &data.nodes, &mut data.edges, &series, 1.0);

    match data.edges.layout(0).unwrap().points {
        EdgePoints::Line { p1, p2 } => {
            assert_eq!(p1, Point::new(0.0, 0.0));
            assert_eq!(p2, Point::new(95.0, 0.0));
        }
        ref other => panic!("expected a straight edge, got {other:?}"),
    }
}

#[test]
fn quadratic_edges_end_on_the_symbol_circle() {
    let mut data = GraphData::new(
        true,
        vec![node("a", 0.0, 0.0, 20.0), node("b", 100.0, 0.0, 20.0)],
        vec![EdgeModel {
            line_style: LineStyle {
                curveness: Some(0.3),
            },
            ..edge("a", "b")
        }],
    );
    let series = SeriesOptions::default();
    run(&mut data, &series);
    adjust_edges(&data.graph, &data.nodes, &mut data.edges, &series, 1.0);

    match data.edges.layout(0).unwrap().points {
        EdgePoints::Quadratic { p1, p2, .. } => {
            // Bisection tolerance is 1e-2 on the squared distance.
            assert!((p1.dist(Point::new(0.0, 0.0)) - 10.0).abs() < 0.2);
            assert!((p2.dist(Point::new(100.0, 0.0)) - 10.0).abs() < 0.2);
        }
        ref other => panic!("expected a quadratic edge, got {other:?}"),
    }
}

#[test]
fn adjusting_twice_is_idempotent() {
    let mut data = GraphData::new(
        true,
        vec![node("a", 0.0, 0.0, 20.0), node("b", 100.0, 0.0, 10.0)],
        vec![
            edge("a", "b"),
            EdgeModel {
                line_style: LineStyle {
                    curveness: Some(0.3),
                },
                ..edge("a", "b")
            },
        ],
    );
    let series = SeriesOptions::default();
    run(&mut data, &series);

    adjust_edges(&data.graph, &data.nodes, &mut data.edges, &series, 1.0);
    let first: Vec<_> = (0..2)
        .map(|i| data.edges.layout(i).unwrap().points.clone())
        .collect();

    adjust_edges(&data.graph, &data.nodes, &mut data.edges, &series, 1.0);
    let second: Vec<_> = (0..2)
        .map(|i| data.edges.layout(i).unwrap().points.clone())
        .collect();

    assert_eq!(first, second);
}

#[test]
fn rescaling_recomputes_from_the_original_points() {
    let mut data = GraphData::new(
        true,
        vec![node("a", 0.0, 0.0, 20.0), node("b", 100.0, 0.0, 20.0)],
        vec![edge("a", "b")],
    );
    let series = SeriesOptions::default();
    run(&mut data, &series);

    adjust_edges(&data.graph, &data.nodes, &mut data.edges, &series, 1.0);
    adjust_edges(&data.graph, &data.nodes, &mut data.edges, &series, 0.5);

    match data.edges.layout(0).unwrap().points {
        EdgePoints::Line { p1, p2 } => {
            // Half the scale trims half as much of the original segment.
            assert_eq!(p1, Point::new(5.0, 0.0));
            assert_eq!(p2, Point::new(95.0, 0.0));
        }
        ref other => panic!("expected a straight edge, got {other:?}"),
    }
}

#[test]
fn self_loop_cubics_are_trimmed_from_both_crossings() {
    let mut data = GraphData::new(
        true,
        vec![node("a", 50.0, 50.0, 20.0)],
        vec![edge("a", "a")],
    );
    let series = SeriesOptions::default();
    run(&mut data, &series);
    adjust_edges(&data.graph, &data.nodes, &mut data.edges, &series, 1.0);

    match data.edges.layout(0).unwrap().points {
        EdgePoints::Cubic { p1, p2, .. } => {
            let center = Point::new(50.0, 50.0);
            assert!((p1.dist(center) - 10.0).abs() < 0.5);
            assert!((p2.dist(center) - 10.0).abs() < 0.5);
            assert_ne!(p1, p2);
        }
        ref other => panic!("expected a cubic self-loop, got {other:?}"),
    }
}
