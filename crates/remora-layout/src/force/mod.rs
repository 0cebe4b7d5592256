//! Force-directed layout: simulation setup, per-frame driving, and
//! publication of the results into the layout slots.
//!
//! The caller owns the animation loop: build a [`ForceLayout`], call
//! [`ForceLayout::step`] once per frame, stop when it reports convergence.
//! Drag interactions pin a node (`set_fixed`), overwrite its layout point,
//! and `warm_up` the simulation; the overwrite is copied into the
//! simulation at the start of the next step, never mid-step.

mod sim;

pub use sim::{ForceEdge, ForceNode, ForceSimulation, SimulationState};

use indexmap::IndexMap;

use remora_graph::{Graph, ItemData};

use crate::circular::{CircularBasis, circular_layout};
use crate::coord::CoordinateSystem;
use crate::curvature::CurvatureState;
use crate::geom::Point;
use crate::model::{
    EdgeLayout, EdgeModel, InitLayout, NodeLayout, NodeModel, SeriesOptions, set_node_point,
};
use crate::self_loop::layout_self_loop_edges;
use crate::simple::{connector_points, simple_layout};
use crate::util::{linear_map, value_extent};

/// The per-series force layout instance. Valid for one filtered view: node
/// data index equals simulation index, so the tables must not be refiltered
/// while the instance is alive.
#[derive(Debug, Clone)]
pub struct ForceLayout {
    sim: ForceSimulation,
    /// Node id per simulation index, for the preserved-points map.
    ids: Vec<String>,
    /// Resolved curvature per simulation edge.
    curveness: Vec<f64>,
    /// Edge data index per simulation edge.
    edge_data_indices: Vec<usize>,
    /// Last published position per node id. Survives rebuilds so an
    /// animating graph resumes where it was.
    preserved: IndexMap<String, Point>,
}

impl ForceLayout {
    /// Prepares the simulation: restores preserved positions (or runs the
    /// configured warm-start layout), maps node values into repulsion
    /// weights and edge values into rest lengths, and seeds the RNG.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        graph: &Graph,
        nodes: &mut ItemData<NodeModel, NodeLayout>,
        edges: &mut ItemData<EdgeModel, EdgeLayout>,
        series: &SeriesOptions,
        coord: &dyn CoordinateSystem,
        curvature: &mut CurvatureState,
        preserved: IndexMap<String, Point>,
        node_scale: f64,
    ) -> Self {
        if !preserved.is_empty() {
            let mut restore = Vec::new();
            graph.each_node(|node| {
                let data_index = node.data_index.unwrap();
                let point = preserved.get(&node.id).copied().unwrap_or(Point::NAN);
                restore.push((data_index, point));
            });
            for (data_index, point) in restore {
                set_node_point(nodes, data_index, point);
            }
        } else {
            match series.force.init_layout {
                InitLayout::None => {
                    simple_layout(graph, nodes, edges, series, None, curvature, node_scale);
                }
                InitLayout::Circular => {
                    circular_layout(
                        graph,
                        nodes,
                        edges,
                        series,
                        coord,
                        CircularBasis::Value,
                        curvature,
                        node_scale,
                        None,
                    );
                }
            }
        }

        let node_extent = value_extent(nodes.values());
        let edge_extent = value_extent(edges.values());
        let repulsion_range = series.force.repulsion.as_range();
        // Larger data value maps to a shorter edge.
        let edge_length_range = {
            let r = series.force.edge_length.as_range();
            [r[1], r[0]]
        };

        let count = nodes.count();
        let placeholder = ForceNode {
            p: Point::NAN,
            pp: Point::NAN,
            w: 0.0,
            rep: 0.0,
            fixed: false,
        };
        let mut sim_nodes = vec![placeholder; count];
        let mut ids = vec![String::new(); count];
        graph.each_node(|node| {
            let data_index = node.data_index.unwrap();
            let mut repulsion = linear_map(nodes.value(data_index), node_extent, repulsion_range);
            if repulsion.is_nan() {
                repulsion = (repulsion_range[0] + repulsion_range[1]) / 2.0;
            }
            let fixed = nodes.model(data_index).is_some_and(|m| m.fixed);
            let point = nodes
                .layout(data_index)
                .map(|l| l.point)
                .unwrap_or(Point::NAN);
            sim_nodes[data_index] = ForceNode {
                p: point,
                pp: point,
                w: repulsion,
                rep: repulsion,
                fixed,
            };
            ids[data_index] = node.id.clone();
        });

        let mut sim_edges = Vec::new();
        let mut curveness = Vec::new();
        let mut edge_data_indices = Vec::new();
        graph.each_edge(|edge, edge_index| {
            let data_index = edge.data_index.unwrap();
            let (Some(d1), Some(d2)) = (
                graph.nodes()[edge.node1].data_index,
                graph.nodes()[edge.node2].data_index,
            ) else {
                return;
            };
            let mut rest_length = linear_map(edges.value(data_index), edge_extent, edge_length_range);
            if rest_length.is_nan() {
                rest_length = (edge_length_range[0] + edge_length_range[1]) / 2.0;
            }
            let model = edges.model(data_index);
            let c = model
                .and_then(|m| m.curveness(series))
                .or_else(|| {
                    curvature
                        .curveness_for(graph, edge_index, true)
                        .map(|v| -v)
                })
                .unwrap_or(0.0);
            sim_edges.push(ForceEdge {
                n1: d1,
                n2: d2,
                d: rest_length,
                ignore_force_layout: model.is_some_and(|m| m.ignore_force_layout),
            });
            curveness.push(c);
            edge_data_indices.push(data_index);
        });

        let sim = ForceSimulation::new(
            sim_nodes,
            sim_edges,
            coord.bounding_rect(),
            series.force.gravity,
            series.force.friction,
            series.force.random_seed,
        );

        Self {
            sim,
            ids,
            curveness,
            edge_data_indices,
            preserved,
        }
    }

    /// Advances one frame: copies externally pinned positions into the
    /// simulation, steps the physics, writes the results back into the
    /// layout slots, and refreshes the preserved-points map. Returns true
    /// once the simulation has converged.
    pub fn step(
        &mut self,
        graph: &Graph,
        nodes: &mut ItemData<NodeModel, NodeLayout>,
        edges: &mut ItemData<EdgeModel, EdgeLayout>,
        series: &SeriesOptions,
        node_scale: f64,
    ) -> bool {
        for index in 0..self.sim.nodes().len() {
            if self.sim.nodes()[index].fixed {
                if let Some(layout) = nodes.layout(index) {
                    self.sim.set_position(index, layout.point);
                }
            }
        }

        let finished = self.sim.step();

        for index in 0..self.sim.nodes().len() {
            let point = self.sim.nodes()[index].p;
            if !self.sim.nodes()[index].fixed {
                set_node_point(nodes, index, point);
            }
            self.preserved.insert(self.ids[index].clone(), point);
        }

        for sim_index in 0..self.sim.edges().len() {
            let edge = &self.sim.edges()[sim_index];
            if edge.n1 == edge.n2 {
                continue;
            }
            let p1 = self.sim.nodes()[edge.n1].p;
            let p2 = self.sim.nodes()[edge.n2].p;
            let points = connector_points(p1, p2, self.curveness[sim_index]);
            edges.set_layout(self.edge_data_indices[sim_index], EdgeLayout::new(points));
        }
        layout_self_loop_edges(graph, nodes, edges, series, node_scale);

        finished
    }

    pub fn warm_up(&mut self) {
        self.sim.warm_up();
    }

    /// Pins a node by data index.
    pub fn set_fixed(&mut self, index: usize) {
        self.sim.set_fixed(index);
    }

    pub fn set_unfixed(&mut self, index: usize) {
        self.sim.set_unfixed(index);
    }

    pub fn state(&self) -> SimulationState {
        self.sim.state()
    }

    pub fn simulation(&self) -> &ForceSimulation {
        &self.sim
    }

    pub fn preserved_points(&self) -> &IndexMap<String, Point> {
        &self.preserved
    }

    /// Hands the preserved positions back for the next rebuild.
    pub fn into_preserved_points(self) -> IndexMap<String, Point> {
        self.preserved
    }
}
