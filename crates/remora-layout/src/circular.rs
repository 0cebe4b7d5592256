//! Circular node placement with value- and symbol-size-proportional arcs,
//! plus the pin-under-pointer dragging behavior.

use std::f64::consts::{FRAC_PI_2, PI, TAU};

use remora_graph::{Graph, ItemData};

use crate::coord::CoordinateSystem;
use crate::curvature::CurvatureState;
use crate::geom::Point;
use crate::model::{
    EdgeLayout, EdgeModel, EdgePoints, NodeLayout, NodeModel, SeriesOptions, set_node_fixed,
    set_node_point, symbol_size,
};
use crate::self_loop::layout_self_loop_edges;

/// How much arc each node claims.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CircularBasis {
    /// Arc proportional to the node value. Cheap, but small values can
    /// overlap; used as the force layout's warm start.
    Value,
    /// Arc reserved from the rendered symbol size so symbols cannot
    /// overlap. Needs all symbol sizes resolved.
    SymbolSize,
}

/// A node being dragged and the pointer driving it.
#[derive(Debug, Clone, Copy)]
pub struct DragUpdate {
    pub node_data_index: usize,
    pub pointer: Point,
}

/// The circle the nodes were placed on.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CircleInfo {
    pub cx: f64,
    pub cy: f64,
    pub radius: f64,
}

/// Places active nodes on the coordinate system's inscribed circle and lays
/// out the edges. Returns `None` when the coordinate system is not a view.
pub fn circular_layout(
    graph: &Graph,
    nodes: &mut ItemData<NodeModel, NodeLayout>,
    edges: &mut ItemData<EdgeModel, EdgeLayout>,
    series: &SeriesOptions,
    coord: &dyn CoordinateSystem,
    basis: CircularBasis,
    curvature: &mut CurvatureState,
    node_scale: f64,
    dragging: Option<DragUpdate>,
) -> Option<CircleInfo> {
    if !coord.is_view() {
        return None;
    }

    let rect = coord.bounding_rect();
    let center = rect.center();
    let radius = rect.width.min(rect.height) / 2.0;
    let info = CircleInfo {
        cx: center.x,
        cy: center.y,
        radius,
    };
    let count = nodes.count();
    if count == 0 {
        return Some(info);
    }

    if let Some(drag) = dragging {
        let data = coord.point_to_data(drag.pointer);
        let projected = center + (data - center).normalized() * radius;
        set_node_point(nodes, drag.node_data_index, projected);
        set_node_fixed(nodes, drag.node_data_index, true);
        if series.circular.rotate_label {
            let rotation = label_rotation(projected, center);
            nodes.update_layout(drag.node_data_index, NodeLayout::default, |layout| {
                layout.label_rotation = Some(rotation);
            });
        }
    }

    match basis {
        CircularBasis::Value => layout_by_value(graph, nodes, center, radius),
        CircularBasis::SymbolSize => {
            layout_by_symbol_size(graph, nodes, center, radius, node_scale, count)
        }
    }

    layout_edges(graph, nodes, edges, series, curvature, center);
    layout_self_loop_edges(graph, nodes, edges, series, node_scale);
    Some(info)
}

fn layout_by_value(
    graph: &Graph,
    nodes: &mut ItemData<NodeModel, NodeLayout>,
    center: Point,
    radius: f64,
) {
    let sum: f64 = nodes.values().filter(|v| !v.is_nan()).sum();

    let mut shares = Vec::new();
    graph.each_node(|node| {
        let data_index = node.data_index.unwrap();
        let share = if sum != 0.0 {
            let value = nodes.value(data_index);
            // One bad datum must not poison the running angle.
            if value.is_nan() { 0.0 } else { value }
        } else {
            1.0
        };
        shares.push((data_index, share));
    });

    let unit_angle = TAU / if sum != 0.0 { sum } else { shares.len() as f64 };
    let mut angle = 0.0;
    for (data_index, share) in shares {
        let half = unit_angle * share / 2.0;
        angle += half;
        set_node_point(nodes, data_index, center.polar_offset(angle, radius));
        angle += half;
    }
}

fn layout_by_symbol_size(
    graph: &Graph,
    nodes: &mut ItemData<NodeModel, NodeLayout>,
    center: Point,
    radius: f64,
    node_scale: f64,
    count: usize,
) {
    let mut halves = Vec::new();
    let mut sum_radian = 0.0;
    graph.each_node(|node| {
        let data_index = node.data_index.unwrap();
        let mut size = nodes.model(data_index).map(symbol_size).unwrap_or(f64::NAN);
        if size.is_nan() {
            size = 2.0;
        }
        if size < 0.0 {
            size = 0.0;
        }
        size *= node_scale;

        let mut half = (size / 2.0 / radius).asin();
        // The symbol is larger than the circle.
        if half.is_nan() {
            half = FRAC_PI_2;
        }
        halves.push((data_index, half));
        sum_radian += half * 2.0;
    });

    let pad_half = (TAU - sum_radian) / count as f64 / 2.0;
    let mut angle = 0.0;
    for (data_index, symbol_half) in halves {
        let half = pad_half + symbol_half;
        angle += half;
        let pinned = nodes.layout(data_index).is_some_and(|l| l.fixed);
        if !pinned {
            set_node_point(nodes, data_index, center.polar_offset(angle, radius));
        }
        angle += half;
    }
}

fn layout_edges(
    graph: &Graph,
    nodes: &ItemData<NodeModel, NodeLayout>,
    edges: &mut ItemData<EdgeModel, EdgeLayout>,
    series: &SeriesOptions,
    curvature: &mut CurvatureState,
    center: Point,
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
            .or_else(|| curvature.curveness_for(graph, edge_index, false))
            .unwrap_or(0.0);
        let points = if curveness != 0.0 {
            // Pull the control point toward the circle center so chords arc
            // inside the ring.
            let k = curveness * 3.0;
            let mid = Point::new((p1.x + p2.x) / 2.0, (p1.y + p2.y) / 2.0);
            EdgePoints::Quadratic {
                p1,
                p2,
                cp: Point::new(
                    center.x * k + mid.x * (1.0 - k),
                    center.y * k + mid.y * (1.0 - k),
                ),
            }
        } else {
            EdgePoints::Line { p1, p2 }
        };
        edges.set_layout(data_index, EdgeLayout::new(points));
    }
}

/// Rotation keeping a label radial and upright on either side of the
/// circle.
fn label_rotation(position: Point, center: Point) -> f64 {
    let mut radian = (position.y - center.y).atan2(position.x - center.x);
    if position.x < center.x {
        radian -= PI;
    }
    -radian
}
