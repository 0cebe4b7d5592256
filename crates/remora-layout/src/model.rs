//! Option structs mirroring the chart's JSON configuration, plus the
//! per-item layout slot types the engine writes into the tables.

use serde::Deserialize;

use crate::coord::CoordinateSystem;
use crate::geom::Point;

/// Node placement strategy for a series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayoutMode {
    /// Positions come from explicit x/y or a coordinate system.
    #[default]
    None,
    Circular,
    Force,
}

/// Warm-start strategy for the force simulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InitLayout {
    #[default]
    None,
    Circular,
}

/// A scalar option that may also be written as a `[min, max]` range.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ScalarOrRange {
    Scalar(f64),
    Range([f64; 2]),
}

impl ScalarOrRange {
    pub fn as_range(&self) -> [f64; 2] {
        match *self {
            ScalarOrRange::Scalar(v) => [v, v],
            ScalarOrRange::Range(r) => r,
        }
    }
}

/// Automatic multi-edge curvature configuration: a switch, a table length,
/// or an explicit curvature table.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum AutoCurveness {
    Enabled(bool),
    Count(usize),
    List(Vec<f64>),
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ForceOptions {
    pub init_layout: InitLayout,
    pub repulsion: ScalarOrRange,
    pub gravity: f64,
    pub friction: f64,
    /// Larger data value maps to a shorter edge.
    pub edge_length: ScalarOrRange,
    /// Seed for the scatter/perturbation RNG; fixed so reruns are
    /// reproducible.
    pub random_seed: u64,
}

impl Default for ForceOptions {
    fn default() -> Self {
        Self {
            init_layout: InitLayout::None,
            repulsion: ScalarOrRange::Range([0.0, 50.0]),
            gravity: 0.1,
            friction: 0.6,
            edge_length: ScalarOrRange::Scalar(30.0),
            random_seed: 0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CircularOptions {
    pub rotate_label: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LineStyle {
    pub curveness: Option<f64>,
}

/// Symbol drawn at an edge end; layout only cares whether it is `None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SymbolKind {
    #[default]
    None,
    Circle,
    Rect,
    RoundRect,
    Triangle,
    Diamond,
    Pin,
    Arrow,
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum SymbolSize {
    Scalar(f64),
    /// `[width, height]`; layout uses the mean.
    Pair([f64; 2]),
}

impl SymbolSize {
    pub fn resolved(&self) -> f64 {
        match *self {
            SymbolSize::Scalar(s) => s,
            SymbolSize::Pair([w, h]) => (w + h) / 2.0,
        }
    }
}

impl Default for SymbolSize {
    fn default() -> Self {
        SymbolSize::Scalar(10.0)
    }
}

/// Series-level configuration consumed by the layout engine.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SeriesOptions {
    pub layout: LayoutMode,
    pub force: ForceOptions,
    pub circular: CircularOptions,
    pub auto_curveness: Option<AutoCurveness>,
    /// How strongly node symbols scale with zoom.
    pub node_scale_ratio: f64,
    /// Series-level fallback for per-edge line style.
    pub line_style: LineStyle,
    /// Series-level `[from, to]` edge-end symbols.
    pub edge_symbol: [SymbolKind; 2],
}

impl Default for SeriesOptions {
    fn default() -> Self {
        Self {
            layout: LayoutMode::None,
            force: ForceOptions::default(),
            circular: CircularOptions::default(),
            auto_curveness: None,
            node_scale_ratio: 0.6,
            line_style: LineStyle::default(),
            edge_symbol: [SymbolKind::None, SymbolKind::None],
        }
    }
}

/// Per-node configuration.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct NodeModel {
    pub id: Option<String>,
    pub name: Option<String>,
    pub x: Option<f64>,
    pub y: Option<f64>,
    /// Logical coordinate for non-view coordinate systems.
    pub coord: Option<Vec<f64>>,
    pub value: Option<f64>,
    /// Pinned during the force simulation.
    pub fixed: bool,
    pub category: Option<String>,
    pub symbol_size: SymbolSize,
}

/// Per-edge configuration.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EdgeModel {
    pub source: Option<NodeKey>,
    pub target: Option<NodeKey>,
    pub value: Option<f64>,
    pub line_style: LineStyle,
    /// Drawn but contributing no spring force.
    pub ignore_force_layout: bool,
    /// `[from, to]` end symbols overriding the series setting.
    pub symbol: Option<[SymbolKind; 2]>,
}

impl EdgeModel {
    /// Explicit curveness with series fallback.
    pub fn curveness(&self, series: &SeriesOptions) -> Option<f64> {
        self.line_style.curveness.or(series.line_style.curveness)
    }

    pub fn end_symbols(&self, series: &SeriesOptions) -> [SymbolKind; 2] {
        self.symbol.unwrap_or(series.edge_symbol)
    }
}

/// An edge endpoint in option data: node array index or node id/name.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum NodeKey {
    Index(usize),
    Id(String),
}

/// Layout slot written per node.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeLayout {
    pub point: Point,
    /// Keeps the node in place during force/circular passes.
    pub fixed: bool,
    pub label_rotation: Option<f64>,
}

impl Default for NodeLayout {
    fn default() -> Self {
        Self {
            point: Point::NAN,
            fixed: false,
            label_rotation: None,
        }
    }
}

/// Point list written per edge.
#[derive(Debug, Clone, PartialEq)]
pub enum EdgePoints {
    Line {
        p1: Point,
        p2: Point,
    },
    Quadratic {
        p1: Point,
        p2: Point,
        cp: Point,
    },
    Cubic {
        p1: Point,
        p2: Point,
        cp1: Point,
        cp2: Point,
    },
}

impl EdgePoints {
    pub fn endpoints(&self) -> (Point, Point) {
        match *self {
            EdgePoints::Line { p1, p2 }
            | EdgePoints::Quadratic { p1, p2, .. }
            | EdgePoints::Cubic { p1, p2, .. } => (p1, p2),
        }
    }
}

/// Layout slot written per edge. `original` caches the untrimmed points so
/// the endpoint adjustment never compounds.
#[derive(Debug, Clone, PartialEq)]
pub struct EdgeLayout {
    pub points: EdgePoints,
    pub original: Option<EdgePoints>,
}

impl EdgeLayout {
    pub fn new(points: EdgePoints) -> Self {
        Self {
            points,
            original: None,
        }
    }
}

/// Merge-writes a node's layout point, preserving the rest of the slot.
pub fn set_node_point(
    nodes: &mut remora_graph::ItemData<NodeModel, NodeLayout>,
    data_index: usize,
    point: Point,
) {
    nodes.update_layout(data_index, NodeLayout::default, |layout| {
        layout.point = point;
    });
}

/// Merge-writes a node's fixed flag.
pub fn set_node_fixed(
    nodes: &mut remora_graph::ItemData<NodeModel, NodeLayout>,
    data_index: usize,
    fixed: bool,
) {
    nodes.update_layout(data_index, NodeLayout::default, |layout| {
        layout.fixed = fixed;
    });
}

/// Mean symbol size of a node.
pub fn symbol_size(model: &NodeModel) -> f64 {
    model.symbol_size.resolved()
}

/// Scale applied to node symbols on the drawing plane: zoom-dependent for
/// view coordinate systems, 1 otherwise.
pub fn node_global_scale(series: &SeriesOptions, coord: &dyn CoordinateSystem) -> f64 {
    if !coord.is_view() {
        return 1.0;
    }
    let node_scale = (coord.zoom() - 1.0) * series.node_scale_ratio + 1.0;
    node_scale / coord.scale_x()
}
