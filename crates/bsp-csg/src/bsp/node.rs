//! BSP tree node implementation.

use crate::{Plane3D, Polygon};

/// Handle of a node inside a [`Bsp`](super::Bsp) arena.
///
/// Handles are dense indices; they stay valid for the lifetime of the tree
/// that issued them and are meaningless for any other tree.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

impl NodeId {
    pub(crate) fn new(idx: usize) -> Self {
        debug_assert!(u32::try_from(idx).is_ok(), "BSP arena exceeds u32 handles");
        Self(idx as u32)
    }

    #[inline]
    pub(crate) const fn idx(self) -> usize {
        self.0 as usize
    }
}

/// A node in the BSP tree.
///
/// Each node partitions space using a splitting plane and stores the
/// polygons lying on that plane and facing the same way. Polygons in front
/// of or behind the plane live in the respective child subtrees.
///
/// # Ownership
///
/// Nodes live in the arena of their [`Bsp`](super::Bsp). `front` and `back`
/// are the owning links of the tree; `parent` is a plain back-reference
/// used for bookkeeping and never controls destruction.
#[derive(Debug, Clone, PartialEq)]
pub struct BspNode<M = ()> {
    /// The splitting plane for this node.
    plane: Plane3D,

    /// Polygons coplanar with the plane, facing the same direction as its normal.
    polygons: Vec<Polygon<M>>,

    /// Subtree containing polygons in FRONT of the splitting plane.
    front: Option<NodeId>,

    /// Subtree containing polygons BEHIND the splitting plane.
    back: Option<NodeId>,

    parent: Option<NodeId>,
}

impl<M> BspNode<M> {
    /// Creates a new BSP node with the given splitting plane.
    ///
    /// The node starts with no polygons and no children.
    pub(crate) fn new(plane: Plane3D, parent: Option<NodeId>) -> Self {
        Self {
            plane,
            polygons: Vec::new(),
            front: None,
            back: None,
            parent,
        }
    }

    /// Returns a reference to the splitting plane.
    #[inline]
    pub fn plane(&self) -> &Plane3D {
        &self.plane
    }

    /// Returns the polygons stored at this node.
    #[inline]
    pub fn polygons(&self) -> &[Polygon<M>] {
        &self.polygons
    }

    /// Returns the handle of the front child subtree.
    #[inline]
    pub fn front(&self) -> Option<NodeId> {
        self.front
    }

    /// Returns the handle of the back child subtree.
    #[inline]
    pub fn back(&self) -> Option<NodeId> {
        self.back
    }

    /// Returns the handle of the parent node (`None` for the root).
    #[inline]
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Checks if this node has any children.
    #[inline]
    pub fn is_leaf(&self) -> bool {
        self.front.is_none() && self.back.is_none()
    }

    #[inline]
    pub(crate) fn set_front(&mut self, node: NodeId) {
        self.front = Some(node);
    }

    #[inline]
    pub(crate) fn set_back(&mut self, node: NodeId) {
        self.back = Some(node);
    }

    #[inline]
    pub(crate) fn push_polygon(&mut self, polygon: Polygon<M>) {
        self.polygons.push(polygon);
    }

    /// Rebuilds this node with a transformed plane and polygon list, keeping
    /// its links (which index into the rebuilt arena).
    pub(crate) fn map<N>(
        &self,
        plane: impl Fn(&Plane3D) -> Plane3D,
        polygon: impl Fn(&Polygon<M>) -> Polygon<N>,
    ) -> BspNode<N> {
        BspNode {
            plane: plane(&self.plane),
            polygons: self.polygons.iter().map(polygon).collect(),
            front: self.front,
            back: self.back,
            parent: self.parent,
        }
    }
}

/// Determines if a polygon faces the same direction as a plane.
///
/// Compares the polygon's normal to the plane's normal using the dot product.
#[inline]
pub fn faces_same_direction<M>(polygon: &Polygon<M>, plane: &Plane3D) -> bool {
    polygon.plane().faces_same_direction(plane)
}
