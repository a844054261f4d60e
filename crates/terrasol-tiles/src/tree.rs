//! The LOD tile tree: bounding volumes, geometric error, lazily loaded
//! content.

use glam::DVec3;

/// Axis-aligned bounding box in the anchored local frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Aabb {
    pub min: DVec3,
    pub max: DVec3,
}

impl Aabb {
    /// Create a box from min/max corners.
    pub fn new(min: DVec3, max: DVec3) -> Self {
        debug_assert!(min.x <= max.x && min.y <= max.y && min.z <= max.z);
        Self { min, max }
    }

    /// Box center.
    pub fn center(&self) -> DVec3 {
        (self.min + self.max) * 0.5
    }

    /// Distance from a point to the nearest surface of the box, zero inside.
    pub fn distance_to_point(&self, point: DVec3) -> f64 {
        let clamped = point.clamp(self.min, self.max);
        (point - clamped).length()
    }
}

/// Identifies a tile within its tree.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TileId(pub(crate) usize);

/// Lifecycle of a tile's content.
///
/// `Unloaded → Loading → Loaded`; eviction and fetch failure both return the
/// tile to `Unloaded`, from where visibility re-requests it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ContentState {
    Unloaded,
    Loading,
    Loaded,
}

/// Decoded tile content: geometry/texture payload plus attribution metadata.
#[derive(Clone, Debug, PartialEq)]
pub struct TileContent {
    /// Decoded payload bytes (opaque to the cache; only the size matters for
    /// the memory budget).
    pub data: Vec<u8>,
    /// Data provider attribution carried in the tile metadata.
    pub attribution: Option<String>,
}

impl TileContent {
    /// Bytes this content holds against the memory budget.
    pub fn size_bytes(&self) -> usize {
        self.data.len()
    }
}

/// One node of the LOD hierarchy.
#[derive(Clone, Debug)]
pub struct TileNode {
    /// Bounding volume in the anchored local frame.
    pub bounds: Aabb,
    /// Geometric error in local units; drives screen-space error.
    pub geometric_error: f64,
    /// Where to fetch this node's content, if it has any.
    pub content_uri: Option<String>,
    pub(crate) children: Vec<TileId>,
    pub(crate) parent: Option<TileId>,
    pub(crate) depth: u32,
    pub(crate) state: ContentState,
    pub(crate) content: Option<TileContent>,
    pub(crate) last_touched_frame: u64,
}

impl TileNode {
    /// Current content state.
    pub fn state(&self) -> ContentState {
        self.state
    }

    /// Loaded content, if any.
    pub fn content(&self) -> Option<&TileContent> {
        self.content.as_ref()
    }

    /// Frame this node was last touched by traversal.
    pub fn last_touched_frame(&self) -> u64 {
        self.last_touched_frame
    }

    /// Depth below the root (root = 0).
    pub fn depth(&self) -> u32 {
        self.depth
    }

    /// Child tile ids.
    pub fn children(&self) -> &[TileId] {
        &self.children
    }
}

/// Arena-stored tile hierarchy owned by the streaming cache.
#[derive(Clone, Debug)]
pub struct TileTree {
    nodes: Vec<TileNode>,
    root: TileId,
}

impl TileTree {
    /// Create a tree with a single root node.
    pub fn with_root(bounds: Aabb, geometric_error: f64, content_uri: Option<String>) -> Self {
        let root = TileNode {
            bounds,
            geometric_error,
            content_uri,
            children: Vec::new(),
            parent: None,
            depth: 0,
            state: ContentState::Unloaded,
            content: None,
            last_touched_frame: 0,
        };
        Self {
            nodes: vec![root],
            root: TileId(0),
        }
    }

    /// Add a child under `parent` and return its id.
    pub fn add_child(
        &mut self,
        parent: TileId,
        bounds: Aabb,
        geometric_error: f64,
        content_uri: Option<String>,
    ) -> TileId {
        let depth = self.nodes[parent.0].depth + 1;
        let id = TileId(self.nodes.len());
        self.nodes.push(TileNode {
            bounds,
            geometric_error,
            content_uri,
            children: Vec::new(),
            parent: Some(parent),
            depth,
            state: ContentState::Unloaded,
            content: None,
            last_touched_frame: 0,
        });
        self.nodes[parent.0].children.push(id);
        id
    }

    /// The root tile id.
    pub fn root(&self) -> TileId {
        self.root
    }

    /// Total number of nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the tree holds only the root.
    pub fn is_empty(&self) -> bool {
        self.nodes.len() <= 1
    }

    /// Read access to a node.
    pub fn node(&self, id: TileId) -> &TileNode {
        &self.nodes[id.0]
    }

    pub(crate) fn node_mut(&mut self, id: TileId) -> &mut TileNode {
        &mut self.nodes[id.0]
    }

    /// Iterate all node ids.
    pub fn ids(&self) -> impl Iterator<Item = TileId> + '_ {
        (0..self.nodes.len()).map(TileId)
    }

    /// Sibling ids of a node (children of its parent, excluding itself).
    pub fn siblings(&self, id: TileId) -> Vec<TileId> {
        match self.nodes[id.0].parent {
            Some(parent) => self.nodes[parent.0]
                .children
                .iter()
                .copied()
                .filter(|&c| c != id)
                .collect(),
            None => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_box() -> Aabb {
        Aabb::new(DVec3::splat(-1.0), DVec3::splat(1.0))
    }

    #[test]
    fn test_aabb_distance() {
        let aabb = unit_box();
        assert_eq!(aabb.distance_to_point(DVec3::ZERO), 0.0);
        assert_eq!(aabb.distance_to_point(DVec3::new(3.0, 0.0, 0.0)), 2.0);
        let corner = aabb.distance_to_point(DVec3::new(2.0, 2.0, 2.0));
        assert!((corner - 3.0_f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn test_tree_structure() {
        let mut tree = TileTree::with_root(unit_box(), 64.0, None);
        let a = tree.add_child(tree.root(), unit_box(), 32.0, Some("a".into()));
        let b = tree.add_child(tree.root(), unit_box(), 32.0, Some("b".into()));
        let a1 = tree.add_child(a, unit_box(), 16.0, Some("a1".into()));

        assert_eq!(tree.len(), 4);
        assert_eq!(tree.node(a).depth(), 1);
        assert_eq!(tree.node(a1).depth(), 2);
        assert_eq!(tree.node(tree.root()).children(), &[a, b]);
        assert_eq!(tree.siblings(a), vec![b]);
        assert!(tree.siblings(tree.root()).is_empty());
    }

    #[test]
    fn test_new_nodes_start_unloaded() {
        let tree = TileTree::with_root(unit_box(), 64.0, Some("root".into()));
        assert_eq!(tree.node(tree.root()).state(), ContentState::Unloaded);
        assert!(tree.node(tree.root()).content().is_none());
    }
}
