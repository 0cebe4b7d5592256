//! Coordinate-driven and explicit-position layout, plus the shared
//! straight/quadratic edge connector.

use remora_graph::{Graph, ItemData};

use crate::coord::CoordinateSystem;
use crate::curvature::CurvatureState;
use crate::geom::Point;
use crate::model::{
    EdgeLayout, EdgeModel, EdgePoints, NodeLayout, NodeModel, SeriesOptions, set_node_point,
};
use crate::self_loop::layout_self_loop_edges;

/// Positions nodes from their logical coordinates (through `coord`) or
/// their explicit x/y, then lays out edges.
pub fn simple_layout(
    graph: &Graph,
    nodes: &mut ItemData<NodeModel, NodeLayout>,
    edges: &mut ItemData<EdgeModel, EdgeLayout>,
    series: &SeriesOptions,
    coord: Option<&dyn CoordinateSystem>,
    curvature: &mut CurvatureState,
    node_scale: f64,
) {
    match coord {
        Some(cs) if !cs.is_view() => {
            let mut points = Vec::new();
            graph.each_node(|node| {
                let data_index = node.data_index.unwrap();
                let model = nodes.model(data_index);
                // A NaN dimension marks the node non-renderable; the layout
                // slot still exists so iteration membership is unchanged.
                let point = match model.and_then(|m| m.coord.as_ref()) {
                    Some(c) if c.len() >= 2 && !c[0].is_nan() && !c[1].is_nan() => {
                        cs.data_to_point(c)
                    }
                    _ => Point::NAN,
                };
                points.push((data_index, point));
            });
            for (data_index, point) in points {
                set_node_point(nodes, data_index, point);
            }
        }
        _ => {
            let mut points = Vec::new();
            graph.each_node(|node| {
                let data_index = node.data_index.unwrap();
                let point = match nodes.model(data_index) {
                    Some(model) => Point::new(
                        model.x.unwrap_or(f64::NAN),
                        model.y.unwrap_or(f64::NAN),
                    ),
                    None => Point::NAN,
                };
                points.push((data_index, point));
            });
            for (data_index, point) in points {
                set_node_point(nodes, data_index, point);
            }
        }
    }

    simple_layout_edges(graph, nodes, edges, series, curvature);
    layout_self_loop_edges(graph, nodes, edges, series, node_scale);
}

/// Lays out every active non-self-loop edge as a straight segment, or a
/// quadratic curve when a curvature applies. Curvature resolution order:
/// the edge's explicit option, then the negated allocator value
/// (direction-sensitive connector, so `needs_reverse`), then 0.
pub fn simple_layout_edges(
    graph: &Graph,
    nodes: &ItemData<NodeModel, NodeLayout>,
    edges: &mut ItemData<EdgeModel, EdgeLayout>,
    series: &SeriesOptions,
    curvature: &mut CurvatureState,
) {
    let mut placed = Vec::new();
    graph.each_edge(|edge, edge_index| {
        if edge.is_self_loop() {
            return;
        }
        let data_index = edge.data_index.unwrap();
        let (Some(l1), Some(l2)) = (
            graph.nodes()[edge.node1]
                .data_index
                .and_then(|d| nodes.layout(d)),
            graph.nodes()[edge.node2]
                .data_index
                .and_then(|d| nodes.layout(d)),
        ) else {
            return;
        };
        placed.push((data_index, edge_index, l1.point, l2.point));
    });

    for (data_index, edge_index, p1, p2) in placed {
        let curveness = edges
            .model(data_index)
            .and_then(|m| m.curveness(series))
            .or_else(|| {
                curvature
                    .curveness_for(graph, edge_index, true)
                    .map(|c| -c)
            })
            .unwrap_or(0.0);
        let points = connector_points(p1, p2, curveness);
        edges.set_layout(data_index, EdgeLayout::new(points));
    }
}

/// Straight segment, or a quadratic with one control point perpendicular to
/// the midpoint.
pub(crate) fn connector_points(p1: Point, p2: Point, curveness: f64) -> EdgePoints {
    if curveness != 0.0 {
        EdgePoints::Quadratic {
            p1,
            p2,
            cp: Point::new(
                (p1.x + p2.x) / 2.0 - (p1.y - p2.y) * curveness,
                (p1.y + p2.y) / 2.0 - (p2.x - p1.x) * curveness,
            ),
        }
    } else {
        EdgePoints::Line { p1, p2 }
    }
}
