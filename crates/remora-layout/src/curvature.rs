//! Curvature assignment for parallel edges.
//!
//! When several edges connect the same node pair they are fanned out by
//! giving each a distinct curvature from an alternating signed table. The
//! allocator is an explicit value rebuilt per layout pass; buckets are
//! keyed by arena-index pairs so lookups stay stable under filtering.

use rustc_hash::FxHashMap;

use remora_graph::Graph;

use crate::model::AutoCurveness;

const DEFAULT_TABLE_LEN: usize = 20;

#[derive(Debug, Default)]
struct Bucket {
    /// Edge arena indices in registration order.
    edges: Vec<usize>,
    /// Whether this direction is the pair's "forward" side.
    is_forward: bool,
}

#[derive(Debug, Default)]
pub struct CurvatureState {
    enabled: bool,
    /// Explicit user table: no parity correction, no extension.
    explicit: bool,
    base_len: usize,
    table: Vec<f64>,
    buckets: FxHashMap<(usize, usize), Bucket>,
}

impl CurvatureState {
    /// Builds the allocator for one layout pass by replaying the arena's
    /// edges in registration order. Inert unless automatic curvature is
    /// configured.
    pub fn build(graph: &Graph, auto: Option<&AutoCurveness>) -> Self {
        let mut state = match auto {
            None | Some(AutoCurveness::Enabled(false)) => return Self::default(),
            Some(AutoCurveness::Enabled(true)) => Self {
                enabled: true,
                base_len: DEFAULT_TABLE_LEN,
                ..Default::default()
            },
            Some(AutoCurveness::Count(n)) => Self {
                enabled: true,
                base_len: *n,
                ..Default::default()
            },
            Some(AutoCurveness::List(list)) => Self {
                enabled: true,
                explicit: true,
                table: list.clone(),
                ..Default::default()
            },
        };
        state.extend_table(0);
        for (index, edge) in graph.edges().iter().enumerate() {
            state.register(edge.node1, edge.node2, index);
        }
        state
    }

    /// Regenerates the alternating table when more entries are needed. The
    /// generated length is forced odd so the last entry keeps the positive
    /// side of the fan.
    fn extend_table(&mut self, needed: usize) {
        if self.explicit {
            return;
        }
        let requested = self.base_len.max(needed);
        let len = if requested % 2 == 1 {
            requested + 2
        } else {
            requested + 3
        };
        if len <= self.table.len() {
            return;
        }
        self.table = (0..len)
            .map(|i| {
                let magnitude = if i % 2 == 0 { i } else { i + 1 } as f64 / 10.0;
                if i % 2 == 0 { magnitude } else { -magnitude }
            })
            .collect();
    }

    fn register(&mut self, node1: usize, node2: usize, edge_index: usize) {
        let key = (node1, node2);
        let opposite = (node2, node1);

        let has_key = self.buckets.contains_key(&key);
        let has_opposite = self.buckets.contains_key(&opposite);
        if has_key && !has_opposite {
            // Repeated same-direction registrations with no reverse sibling.
            self.buckets.get_mut(&key).unwrap().is_forward = true;
        } else if has_key && has_opposite {
            // The reverse sibling registered first and owns the forward side.
            self.buckets.get_mut(&opposite).unwrap().is_forward = true;
            self.buckets.get_mut(&key).unwrap().is_forward = false;
        }

        self.buckets.entry(key).or_default().edges.push(edge_index);
    }

    /// Curvature for one edge, by arena index. `needs_reverse` is set by the
    /// straight-connector callers (simple/force) whose control-point formula
    /// is direction-sensitive; the circular layout passes `false`.
    ///
    /// `None` means "no automatic curvature": the allocator is disabled, the
    /// edge was never registered, or an explicit table is too short.
    pub fn curveness_for(
        &mut self,
        graph: &Graph,
        edge_index: usize,
        needs_reverse: bool,
    ) -> Option<f64> {
        if !self.enabled {
            return None;
        }
        let edge = graph.edges().get(edge_index)?;
        let key = (edge.node1, edge.node2);
        let opposite = (edge.node2, edge.node1);

        let position = self
            .buckets
            .get(&key)?
            .edges
            .iter()
            .position(|&e| e == edge_index)?;
        let opposite_len = if opposite == key {
            0
        } else {
            self.buckets.get(&opposite).map_or(0, |b| b.edges.len())
        };
        let bucket_len = self.buckets[&key].edges.len();
        let total = bucket_len + opposite_len;
        self.extend_table(total);

        let parity = if self.explicit {
            0
        } else if total % 2 == 0 {
            1
        } else {
            0
        };

        if self.buckets[&key].is_forward {
            return self.table.get(parity + position).copied();
        }

        let value = self.table.get(position + opposite_len + parity).copied()?;
        if !needs_reverse {
            return Some(value);
        }
        let keep_sign = if self.explicit {
            if self.table.first().copied() == Some(0.0) {
                (opposite_len + parity) % 2 == 1
            } else {
                (usize::from(opposite_len % 2 == 0) + parity) % 2 == 1
            }
        } else {
            (opposite_len + parity) % 2 == 1
        };
        Some(if keep_sign { value } else { -value })
    }
}
