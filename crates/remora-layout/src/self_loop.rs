//! Self-loop edge placement.
//!
//! Runs after every other edge has its layout: the angular gaps left
//! between the tangents of a node's ordinary edges are carved into
//! sections, self-loops are assigned to the roomiest sections, and each
//! loop becomes a cubic curve whose control points straddle its slot.
//! This is the single self-loop strategy; every layout mode delegates here.

use std::f64::consts::{FRAC_PI_2, PI, TAU};

use remora_graph::{Graph, ItemData};

use crate::model::{
    EdgeLayout, EdgeModel, EdgePoints, NodeLayout, NodeModel, SeriesOptions, symbol_size,
};

/// Minimum angular gap that can host a self-loop on its own.
const MIN_SECTION_RADIAN: f64 = PI / 3.0;

/// Widest angle between a loop's two control points; beyond this the curve
/// stops looking like a loop.
fn max_section_radian() -> f64 {
    PI - 2.0 * (5.5f64).atan2(4.0)
}

#[derive(Debug, Clone, Copy)]
struct Section {
    start: f64,
    end: f64,
    edge_count: usize,
}

/// Places every active self-loop edge. Must run after node layout and
/// non-self-loop edge layout.
pub fn layout_self_loop_edges(
    graph: &Graph,
    nodes: &ItemData<NodeModel, NodeLayout>,
    edges: &mut ItemData<EdgeModel, EdgeLayout>,
    series: &SeriesOptions,
    node_scale: f64,
) {
    for (node_index, node) in graph.nodes().iter().enumerate() {
        if node.data_index.is_none() {
            continue;
        }

        let mut self_loops = Vec::new();
        for &edge_index in &node.edges {
            let edge = &graph.edges()[edge_index];
            if edge.is_self_loop() {
                if let Some(data_index) = edge.data_index {
                    self_loops.push(data_index);
                }
            }
        }
        if self_loops.is_empty() {
            continue;
        }

        let sections = prepare_sections(graph, edges, node_index, self_loops.len());
        place_in_sections(nodes, edges, series, node, &sections, &self_loops, node_scale);
    }
}

/// Carves the angular gaps between adjacent-edge tangents into sections and
/// assigns each self-loop a slot. The returned sections' `edge_count`s sum
/// to `loop_count`.
fn prepare_sections(
    graph: &Graph,
    edges: &ItemData<EdgeModel, EdgeLayout>,
    node_index: usize,
    loop_count: usize,
) -> Vec<Section> {
    let node = &graph.nodes()[node_index];

    let mut tangents: Vec<f64> = Vec::new();
    for &edge_index in &node.edges {
        let edge = &graph.edges()[edge_index];
        if edge.is_self_loop() {
            continue;
        }
        let Some(data_index) = edge.data_index else {
            continue;
        };
        let Some(layout) = edges.layout(data_index) else {
            continue;
        };
        // Direction leaving the node: toward the first control point, or the
        // far endpoint when straight.
        let (p1, p2) = layout.points.endpoints();
        let (own, far) = if edge.node1 == node_index {
            (p1, p2)
        } else {
            (p2, p1)
        };
        let target = match layout.points {
            EdgePoints::Quadratic { cp, .. } => cp,
            EdgePoints::Cubic { cp1, .. } => cp1,
            EdgePoints::Line { .. } => far,
        };
        let v = target - own;
        tangents.push(v.y.atan2(v.x));
    }
    tangents.sort_by(f64::total_cmp);

    let mut available = 0.0;
    let mut sections: Vec<Section> = Vec::new();
    for i in 0..tangents.len() {
        let start = tangents[i];
        let end = if i + 1 < tangents.len() {
            tangents[i + 1]
        } else {
            tangents[0] + TAU
        };
        let span = end - start;
        if span >= MIN_SECTION_RADIAN {
            sections.push(Section {
                start,
                end,
                edge_count: 0,
            });
        }
        available += span / MIN_SECTION_RADIAN;
    }

    if available >= loop_count as f64 && !sections.is_empty() {
        for _ in 0..loop_count {
            // Largest remaining per-edge share wins the next loop. Splitting
            // a big section beats claiming a smaller untouched one.
            let mut best = 0;
            let mut best_share = 0.0;
            for (i, section) in sections.iter().enumerate() {
                let share = (section.end - section.start) / (section.edge_count + 1) as f64;
                if share > best_share {
                    best_share = share;
                    best = i;
                }
            }
            sections[best].edge_count += 1;
        }
    } else {
        // Too many loops to keep them apart; stack them around the full
        // circle and accept the overlap.
        sections.clear();
        sections.push(Section {
            start: -FRAC_PI_2,
            end: -FRAC_PI_2 + TAU,
            edge_count: loop_count,
        });
    }

    sections
}

fn place_in_sections(
    nodes: &ItemData<NodeModel, NodeLayout>,
    edges: &mut ItemData<EdgeModel, EdgeLayout>,
    series: &SeriesOptions,
    node: &remora_graph::Node,
    sections: &[Section],
    self_loops: &[usize],
    node_scale: f64,
) {
    let Some(node_data_index) = node.data_index else {
        return;
    };
    let Some(center) = nodes.layout(node_data_index).map(|l| l.point) else {
        return;
    };
    let size = nodes
        .model(node_data_index)
        .map(symbol_size)
        .unwrap_or_default();

    let mut next = 0;
    for section in sections {
        if section.edge_count == 0 {
            continue;
        }
        let split_half = (section.end - section.start) / section.edge_count as f64 / 2.0;
        let edge_half = split_half.min(max_section_radian() / 2.0);

        for slot in 0..section.edge_count {
            let edge_data_index = self_loops[next];
            next += 1;
            let mid = section.start + split_half * (slot * 2 + 1) as f64;

            let curveness = edges
                .model(edge_data_index)
                .and_then(|m| m.curveness(series))
                .unwrap_or(0.0);
            // Control points sit past the symbol rim; the fixed 100 offset
            // keeps the buckle visible on small symbols, `curveness` lets
            // users push it further out.
            let dist = (size / 2.0 + 100.0) * node_scale * (curveness + 1.0) / 3.0 * 4.0
                / edge_half.cos();

            edges.set_layout(
                edge_data_index,
                EdgeLayout::new(EdgePoints::Cubic {
                    p1: center,
                    p2: center,
                    cp1: center.polar_offset(mid - edge_half, dist),
                    cp2: center.polar_offset(mid + edge_half, dist),
                }),
            );
        }
    }

    debug_assert_eq!(next, self_loops.len());
    if next != self_loops.len() {
        tracing::error!(
            node = %node.id,
            placed = next,
            expected = self_loops.len(),
            "self-loop placement lost edges"
        );
    }
}

