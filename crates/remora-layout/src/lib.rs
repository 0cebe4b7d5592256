#![forbid(unsafe_code)]

//! Headless layout engine for network diagrams.
//!
//! Node/edge option data is ingested into a [`GraphData`] bundle (arena +
//! tables), one of the layout passes positions the nodes, curvature and
//! self-loop placement shape the edges, and [`adjust_edges`] trims the
//! ends to the node symbols. The force layout is frame-stepped: [`layout`]
//! returns the live instance and the caller drives it once per frame.

pub mod adjust;
pub mod circular;
pub mod coord;
pub mod curvature;
pub mod curve;
pub mod data;
pub mod error;
pub mod force;
pub mod geom;
pub mod model;
pub mod self_loop;
pub mod simple;
pub mod util;

pub use remora_graph::{AdjacentIndices, Direction, Edge, Graph, ItemData, Node, NodeRef};

pub use adjust::adjust_edges;
pub use circular::{CircleInfo, CircularBasis, DragUpdate, circular_layout};
pub use coord::{CoordinateSystem, ViewRect};
pub use curvature::CurvatureState;
pub use data::GraphData;
pub use error::{Error, Result};
pub use force::{ForceLayout, ForceSimulation, SimulationState};
pub use geom::{Point, Rect};
pub use model::{
    AutoCurveness, CircularOptions, EdgeLayout, EdgeModel, EdgePoints, ForceOptions, InitLayout,
    LayoutMode, LineStyle, NodeKey, NodeLayout, NodeModel, ScalarOrRange, SeriesOptions,
    SymbolKind, SymbolSize, node_global_scale, symbol_size,
};
pub use self_loop::layout_self_loop_edges;
pub use simple::{simple_layout, simple_layout_edges};

use indexmap::IndexMap;

/// Runs the configured layout pass.
///
/// Non-view coordinate systems always take the coordinate-driven simple
/// layout. On a view system the series' layout mode decides; force mode
/// returns the live [`ForceLayout`] for the caller to step, warmed from
/// `preserved` positions when the ids match.
pub fn layout(
    data: &mut GraphData,
    series: &SeriesOptions,
    coord: &dyn CoordinateSystem,
    preserved: IndexMap<String, Point>,
) -> Result<Option<ForceLayout>> {
    validate(data)?;

    let node_scale = node_global_scale(series, coord);
    let mut curvature = CurvatureState::build(&data.graph, series.auto_curveness.as_ref());

    if !coord.is_view() {
        simple_layout(
            &data.graph,
            &mut data.nodes,
            &mut data.edges,
            series,
            Some(coord),
            &mut curvature,
            node_scale,
        );
        return Ok(None);
    }

    match series.layout {
        LayoutMode::None => {
            simple_layout(
                &data.graph,
                &mut data.nodes,
                &mut data.edges,
                series,
                Some(coord),
                &mut curvature,
                node_scale,
            );
            Ok(None)
        }
        LayoutMode::Circular => {
            circular_layout(
                &data.graph,
                &mut data.nodes,
                &mut data.edges,
                series,
                coord,
                CircularBasis::SymbolSize,
                &mut curvature,
                node_scale,
                None,
            );
            Ok(None)
        }
        LayoutMode::Force => Ok(Some(ForceLayout::new(
            &data.graph,
            &mut data.nodes,
            &mut data.edges,
            series,
            coord,
            &mut curvature,
            preserved,
            node_scale,
        ))),
    }
}

fn validate(data: &GraphData) -> Result<()> {
    if data.graph.node_count() != data.nodes.raw_len()
        || data.graph.edge_count() != data.edges.raw_len()
    {
        return Err(Error::TableMismatch {
            node_rows: data.nodes.raw_len(),
            node_count: data.graph.node_count(),
            edge_rows: data.edges.raw_len(),
            edge_count: data.graph.edge_count(),
        });
    }
    Ok(())
}
