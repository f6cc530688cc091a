use crate::error::Result;
use crate::geom::{Point, Rect, Size, Vector, point, size, vector};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

pub type ItemId = u64;

/// Similarity assumed for items the ranking backend did not score.
pub const DEFAULT_SIMILARITY: f64 = 50.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    /// Higher is more similar; nominally `0..=100` but never validated.
    #[serde(default)]
    pub similarity: Option<f64>,
}

impl Item {
    pub fn new(id: ItemId, similarity: f64) -> Self {
        Self {
            id,
            similarity: Some(similarity),
        }
    }

    pub fn unscored(id: ItemId) -> Self {
        Self {
            id,
            similarity: None,
        }
    }

    pub fn similarity_or_default(&self) -> f64 {
        self.similarity.unwrap_or(DEFAULT_SIMILARITY)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CanvasSpec {
    pub width: f64,
    pub height: f64,
}

impl CanvasSpec {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub fn center(&self) -> Point {
        point(self.width / 2.0, self.height / 2.0)
    }

    pub fn rect(&self) -> Rect {
        Rect::new(point(0.0, 0.0), size(self.width, self.height))
    }

    /// Region where a node center may sit so that `clearance` (per axis) stays on canvas.
    pub fn inset(&self, clearance: Vector) -> Rect {
        Rect::new(
            point(clearance.x, clearance.y),
            size(
                self.width - 2.0 * clearance.x,
                self.height - 2.0 * clearance.y,
            ),
        )
    }
}

/// Where similarity distance is measured from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum AnchorSpec {
    /// Canvas midpoint, full-circle placement.
    #[default]
    Center,
    /// Center of a poster dock near the bottom-left corner; items fan out toward the top-right.
    ///
    /// `offset_x` is the gap between the canvas' left edge and the dock, `offset_y` the gap
    /// between the canvas' bottom edge and the dock.
    #[serde(rename_all = "camelCase")]
    Corner {
        offset_x: f64,
        offset_y: f64,
        exclusion_width: f64,
        exclusion_height: f64,
    },
}

impl AnchorSpec {
    pub fn corner_default() -> Self {
        Self::Corner {
            offset_x: 40.0,
            offset_y: 40.0,
            exclusion_width: 180.0,
            exclusion_height: 270.0,
        }
    }

    /// Dock rectangle in absolute canvas coordinates (corner-anchored only).
    pub fn dock_rect(&self, canvas: CanvasSpec) -> Option<Rect> {
        match *self {
            Self::Center => None,
            Self::Corner {
                offset_x,
                offset_y,
                exclusion_width,
                exclusion_height,
            } => Some(Rect::new(
                point(offset_x, canvas.height - offset_y - exclusion_height),
                size(exclusion_width, exclusion_height),
            )),
        }
    }

    pub fn anchor_point(&self, canvas: CanvasSpec) -> Point {
        match self.dock_rect(canvas) {
            Some(dock) => dock.center(),
            None => canvas.center(),
        }
    }
}

/// Per-item float parameters, drawn once per solve and consumed by the animator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FloatSeed {
    /// Radians per millisecond of the primary oscillation.
    pub speed: f64,
    pub offset: f64,
    pub phase: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BasePosition {
    pub item_id: ItemId,
    /// 0 = most similar.
    pub rank: usize,
    /// Offset from the anchor (after stretch, clamping and exclusion push).
    pub x: f64,
    pub y: f64,
    pub angle: f64,
    /// Band radius assigned to this rank (including the fallback growth, if any).
    pub radius: f64,
    pub float_seed: FloatSeed,
}

impl BasePosition {
    pub fn offset(&self) -> Vector {
        vector(self.x, self.y)
    }

    pub fn absolute(&self, anchor: Point) -> Point {
        anchor + self.offset()
    }
}

/// Absolute canvas position of an item at one instant.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderPoint {
    pub item_id: ItemId,
    pub x: f64,
    pub y: f64,
}

impl RenderPoint {
    pub fn point(&self) -> Point {
        point(self.x, self.y)
    }
}

/// Insertion order is rank order.
pub type PositionMap = IndexMap<ItemId, BasePosition>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Axis {
    X,
    Y,
}

/// A place where the solver had to give up on one of its guarantees for an item.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Adjustment {
    /// Angular search ran out of attempts while still too close to a placed node.
    #[serde(rename_all = "camelCase")]
    CollisionBudgetExhausted {
        item_id: ItemId,
        attempts: usize,
        /// Distance to the nearest placed node at the accepted candidate (before any growth).
        clearance: f64,
        radius_grown: bool,
    },
    /// Node was nudged out of the dock's keep-out rectangle; not re-validated afterwards.
    #[serde(rename_all = "camelCase")]
    ExclusionPush {
        item_id: ItemId,
        axis: Axis,
        distance: f64,
    },
}

impl Adjustment {
    pub fn item_id(&self) -> ItemId {
        match *self {
            Self::CollisionBudgetExhausted { item_id, .. } | Self::ExclusionPush { item_id, .. } => {
                item_id
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutResult {
    /// Absolute anchor location the offsets were computed against.
    pub anchor: Point,
    pub node_size: Size,
    pub min_node_distance: f64,
    pub positions: PositionMap,
    #[serde(default)]
    pub adjustments: Vec<Adjustment>,
}

impl LayoutResult {
    pub fn empty(anchor: Point, node_size: Size, min_node_distance: f64) -> Self {
        Self {
            anchor,
            node_size,
            min_node_distance,
            positions: PositionMap::new(),
            adjustments: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn get(&self, id: ItemId) -> Option<&BasePosition> {
        self.positions.get(&id)
    }

    pub fn absolute(&self, id: ItemId) -> Option<Point> {
        self.get(id).map(|p| p.absolute(self.anchor))
    }

    /// Whether the solver recorded any adjustment for `id`.
    pub fn is_flagged(&self, id: ItemId) -> bool {
        self.adjustments.iter().any(|a| a.item_id() == id)
    }
}

/// JSON request shape accepted by the CLI: `{ "source": Item, "items": [Item] }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutRequest {
    pub source: Item,
    #[serde(default)]
    pub items: Vec<Item>,
}

impl LayoutRequest {
    pub fn from_json_str(text: &str) -> Result<Self> {
        let req: Self = serde_json::from_str(text)?;
        let mut seen = rustc_hash::FxHashSet::default();
        for item in &req.items {
            if !seen.insert(item.id) {
                tracing::warn!(item_id = item.id, "duplicate item id in layout request");
            }
        }
        Ok(req)
    }
}
