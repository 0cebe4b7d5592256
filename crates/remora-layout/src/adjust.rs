//! Post-layout edge trimming: pull each edge end back to the rim of the
//! scaled node symbol so arrows and lines do not pierce the symbol.
//!
//! Trimming always starts from the cached pre-trim points, so re-running
//! after a zoom produces the same result instead of compounding.

use remora_graph::{Graph, ItemData};

use crate::curve::{Bezier, cubic_subdivide, intersect_curve_circle, quadratic_subdivide};
use crate::geom::Point;
use crate::model::{
    EdgeLayout, EdgeModel, EdgePoints, NodeLayout, NodeModel, SeriesOptions, SymbolKind,
    symbol_size,
};

/// Recomputes every active edge's points so that ends carrying a symbol
/// other than `none` stop at the symbol boundary. `scale` is the node
/// global scale (symbol sizes are diameters, hence the halving).
pub fn adjust_edges(
    graph: &Graph,
    nodes: &ItemData<NodeModel, NodeLayout>,
    edges: &mut ItemData<EdgeModel, EdgeLayout>,
    series: &SeriesOptions,
    scale: f64,
) {
    let scale = scale / 2.0;

    let mut active = Vec::new();
    graph.each_edge(|edge, _| {
        active.push((edge.data_index.unwrap(), edge.node1, edge.node2));
    });

    for (data_index, n1, n2) in active {
        let from_radius = nodes.model_raw(n1).map(symbol_size).unwrap_or(0.0) * scale;
        let to_radius = nodes.model_raw(n2).map(symbol_size).unwrap_or(0.0) * scale;
        let [from_symbol, to_symbol] = edges
            .model(data_index)
            .map(|m| m.end_symbols(series))
            .unwrap_or([SymbolKind::None, SymbolKind::None]);
        let trim_from = from_symbol != SymbolKind::None;
        let trim_to = to_symbol != SymbolKind::None;

        let Some(layout) = edges.layout_mut(data_index) else {
            continue;
        };
        if layout.original.is_none() {
            layout.original = Some(layout.points.clone());
        }
        let original = layout.original.clone().unwrap_or_else(|| layout.points.clone());

        layout.points = match original {
            EdgePoints::Line { p1, p2 } => {
                trim_line(p1, p2, trim_from.then_some(from_radius), trim_to.then_some(to_radius))
            }
            EdgePoints::Quadratic { p1, p2, cp } => trim_quadratic(
                p1,
                p2,
                cp,
                trim_from.then_some(from_radius),
                trim_to.then_some(to_radius),
            ),
            EdgePoints::Cubic { p1, p2, cp1, cp2 } => trim_cubic(
                p1,
                p2,
                cp1,
                cp2,
                trim_from.then_some(from_radius),
                trim_to.then_some(to_radius),
            ),
        };
    }
}

fn trim_line(p1: Point, p2: Point, from: Option<f64>, to: Option<f64>) -> EdgePoints {
    let dir = (p2 - p1).normalized();
    let mut a = p1;
    let mut b = p2;
    if let Some(radius) = from {
        a = a.scale_add(dir, radius);
    }
    if let Some(radius) = to {
        b = b.scale_add(dir, -radius);
    }
    EdgePoints::Line { p1: a, p2: b }
}

fn trim_quadratic(
    p1: Point,
    p2: Point,
    cp: Point,
    from: Option<f64>,
    to: Option<f64>,
) -> EdgePoints {
    let mut c = [p1, cp, p2];
    if let Some(radius) = from {
        let t = intersect_curve_circle(
            Bezier::Quadratic {
                p0: c[0],
                cp: c[1],
                p1: c[2],
            },
            p1,
            radius,
        );
        let (_, right) = quadratic_subdivide(c[0], c[1], c[2], t);
        c = right;
    }
    if let Some(radius) = to {
        let t = intersect_curve_circle(
            Bezier::Quadratic {
                p0: c[0],
                cp: c[1],
                p1: c[2],
            },
            p2,
            radius,
        );
        let (left, _) = quadratic_subdivide(c[0], c[1], c[2], t);
        c = left;
    }
    EdgePoints::Quadratic {
        p1: c[0],
        p2: c[2],
        cp: c[1],
    }
}

fn trim_cubic(
    p1: Point,
    p2: Point,
    cp1: Point,
    cp2: Point,
    from: Option<f64>,
    to: Option<f64>,
) -> EdgePoints {
    let mut c = [p1, cp1, cp2, p2];
    if let Some(radius) = from {
        let mut t = intersect_curve_circle(
            Bezier::Cubic {
                p0: c[0],
                cp1: c[1],
                cp2: c[2],
                p1: c[3],
            },
            p1,
            radius,
        );
        // Self-loops start and end on the same circle; keep the crossing
        // nearest the start.
        if t > 0.5 {
            t = 1.0 - t;
        }
        let (_, right) = cubic_subdivide(c[0], c[1], c[2], c[3], t);
        c = right;
    }
    if let Some(radius) = to {
        let mut t = intersect_curve_circle(
            Bezier::Cubic {
                p0: c[0],
                cp1: c[1],
                cp2: c[2],
                p1: c[3],
            },
            p2,
            radius,
        );
        if t < 0.5 {
            t = 1.0 - t;
        }
        let (left, _) = cubic_subdivide(c[0], c[1], c[2], c[3], t);
        c = left;
    }
    EdgePoints::Cubic {
        p1: c[0],
        p2: c[3],
        cp1: c[1],
        cp2: c[2],
    }
}
