//! Ingestion of option data into the graph arena and its backing tables.

use remora_graph::{Graph, ItemData, NodeRef};

use crate::model::{EdgeLayout, EdgeModel, NodeKey, NodeLayout, NodeModel};

/// The graph arena together with its node/edge tables. Arena order equals
/// raw table order, which is what makes data-index translation O(1).
#[derive(Debug, Clone)]
pub struct GraphData {
    pub graph: Graph,
    pub nodes: ItemData<NodeModel, NodeLayout>,
    pub edges: ItemData<EdgeModel, EdgeLayout>,
}

impl GraphData {
    /// Builds the arena and tables from option rows. Rows that cannot enter
    /// the graph (duplicate node id, edge with an unresolvable endpoint) are
    /// dropped from the tables as well, so the two stay aligned.
    pub fn new(directed: bool, node_models: Vec<NodeModel>, edge_models: Vec<EdgeModel>) -> Self {
        let mut graph = Graph::new(directed);

        let mut kept_nodes = Vec::with_capacity(node_models.len());
        for model in node_models {
            let data_index = kept_nodes.len();
            let id = model
                .id
                .clone()
                .or_else(|| model.name.clone())
                .unwrap_or_else(|| data_index.to_string());
            if graph.add_node(id, Some(data_index)).is_some() {
                kept_nodes.push(model);
            }
        }

        let mut kept_edges = Vec::with_capacity(edge_models.len());
        for model in edge_models {
            let (Some(source), Some(target)) = (model.source.as_ref(), model.target.as_ref())
            else {
                continue;
            };
            let data_index = kept_edges.len();
            let added = graph.add_edge(node_ref(source), node_ref(target), Some(data_index));
            if added.is_some() {
                kept_edges.push(model);
            }
        }

        let node_values = kept_nodes
            .iter()
            .map(|m: &NodeModel| m.value.unwrap_or(f64::NAN))
            .collect();
        let edge_values = kept_edges
            .iter()
            .map(|m: &EdgeModel| m.value.unwrap_or(f64::NAN))
            .collect();

        Self {
            graph,
            nodes: ItemData::new(kept_nodes, node_values),
            edges: ItemData::new(kept_edges, edge_values),
        }
    }

    /// Reconciles the arena with the tables after external filtering.
    pub fn update(&mut self) {
        self.graph.update(&self.nodes, &mut self.edges);
    }
}

fn node_ref(key: &NodeKey) -> NodeRef<'_> {
    match key {
        NodeKey::Index(i) => NodeRef::Index(*i),
        NodeKey::Id(id) => NodeRef::Id(id),
    }
}
