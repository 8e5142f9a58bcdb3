//! BSP tree container, construction entry points and queries.

use nalgebra::Point3;
use rand::RngCore;

use crate::{DeterministicRng, Mesh, PlaneSide, Polygon};

use super::node::{BspNode, NodeId};

/// Where a point lies relative to the solid described by a [`Bsp`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointLocation {
    /// Strictly inside the solid.
    Inside,
    /// Strictly outside the solid.
    Outside,
    /// On one of the solid's boundary polygons.
    Boundary,
}

/// A Binary Space Partitioning tree describing a closed polygonal solid.
///
/// Nodes are stored in a dense arena owned by the tree. An empty tree
/// represents the empty solid. Trees are immutable once built: transforms
/// and merges return new trees (see [`Bsp::translated`], [`Bsp::merged`]),
/// so a tree can be shared freely, including across threads.
///
/// # Construction
///
/// ```ignore
/// use bsp_csg::{Mesh, bsp::Bsp};
///
/// let mesh: Mesh = /* ... */;
/// let tree = Bsp::new(&mesh);
/// ```
///
/// Convex meshes take a fast path producing a chain of nodes linked through
/// `back`; other meshes are built by repeated insertion.
#[derive(Debug, Clone, PartialEq)]
pub struct Bsp<M = ()> {
    pub(super) nodes: Vec<BspNode<M>>,
    pub(super) root: Option<NodeId>,
}

impl<M> Default for Bsp<M> {
    fn default() -> Self {
        Self {
            nodes: Vec::new(),
            root: None,
        }
    }
}

impl<M: Clone> Bsp<M> {
    /// Creates an empty BSP tree (the empty solid).
    pub fn empty() -> Self {
        Self::default()
    }

    /// Builds a tree from a mesh, using its convexity flag to pick the
    /// construction strategy.
    pub fn new(mesh: &Mesh<M>) -> Self {
        Self::from_polygons(mesh.polygons().to_vec(), mesh.is_convex())
    }

    /// Builds a tree from a polygon list with the default [`DeterministicRng`].
    ///
    /// `is_convex` must only be set when the polygons bound a convex solid.
    /// Returns an empty tree if the input is empty.
    pub fn from_polygons(polygons: Vec<Polygon<M>>, is_convex: bool) -> Self {
        Self::build_with_rng(polygons, is_convex, &mut DeterministicRng::default())
    }

    /// Builds a tree, shuffling convex input with the supplied generator.
    pub fn build_with_rng<R: RngCore + ?Sized>(
        polygons: Vec<Polygon<M>>,
        is_convex: bool,
        rng: &mut R,
    ) -> Self {
        let mut tree = Self::empty();
        if polygons.is_empty() {
            return tree;
        }
        let input = polygons.len();
        if is_convex {
            tree.build_convex(polygons, rng);
        } else {
            tree.build_general(polygons);
        }
        log::debug!(
            "built {} BSP: {} polygons -> {} nodes",
            if is_convex { "convex" } else { "general" },
            input,
            tree.node_count()
        );
        tree
    }
}

impl<M> Bsp<M> {
    /// Returns `true` if the tree contains no nodes (the empty solid).
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Returns the handle of the root node, if any.
    #[inline]
    pub fn root_id(&self) -> Option<NodeId> {
        self.root
    }

    /// Returns a reference to the root node, if any.
    #[inline]
    pub fn root(&self) -> Option<&BspNode<M>> {
        self.root.map(|id| self.node(id))
    }

    /// Returns the node behind a handle issued by this tree.
    ///
    /// # Panics
    /// Panics if `id` was issued by a different tree.
    #[inline]
    pub fn node(&self, id: NodeId) -> &BspNode<M> {
        &self.nodes[id.idx()]
    }

    /// Returns the number of nodes in the tree.
    #[inline]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Returns the total number of polygons in the tree.
    pub fn polygon_count(&self) -> usize {
        self.nodes.iter().map(|n| n.polygons().len()).sum()
    }

    /// Returns the maximum depth of the tree (0 for empty tree, 1 for a lone root).
    pub fn depth(&self) -> usize {
        self.nodes
            .iter()
            .filter(|n| n.is_leaf())
            .map(|leaf| self.ancestors(leaf).count() + 1)
            .max()
            .unwrap_or(0)
    }

    /// Walks parent links from `node` up to the root.
    fn ancestors<'a>(&'a self, node: &'a BspNode<M>) -> impl Iterator<Item = &'a BspNode<M>> + 'a {
        std::iter::successors(node.parent().map(|id| self.node(id)), move |n| {
            n.parent().map(|id| self.node(id))
        })
    }

    /// Locates a point relative to the solid.
    ///
    /// In front of a plane continues into the front subtree (no subtree means
    /// outside); behind continues into the back subtree (no subtree means
    /// inside). A point on a node's plane that lies on one of its polygons is
    /// on the boundary; otherwise it is treated as being in front.
    pub fn locate(&self, point: Point3<f32>) -> PointLocation {
        let mut current = self.root;
        while let Some(id) = current {
            let node = self.node(id);
            match node.plane().classify_point(point) {
                PlaneSide::Back => match node.back() {
                    Some(back) => current = Some(back),
                    None => return PointLocation::Inside,
                },
                side => {
                    if side == PlaneSide::OnPlane
                        && node.polygons().iter().any(|p| p.contains_point(point))
                    {
                        return PointLocation::Boundary;
                    }
                    match node.front() {
                        Some(front) => current = Some(front),
                        None => return PointLocation::Outside,
                    }
                }
            }
        }
        PointLocation::Outside
    }

    /// Returns `true` if the point is inside the solid or on its boundary.
    pub fn contains_point(&self, point: Point3<f32>) -> bool {
        self.locate(point) != PointLocation::Outside
    }

    /// Appends a node to the arena and returns its handle.
    pub(super) fn push_node(&mut self, node: BspNode<M>) -> NodeId {
        let id = NodeId::new(self.nodes.len());
        self.nodes.push(node);
        id
    }

    #[inline]
    pub(super) fn node_mut(&mut self, id: NodeId) -> &mut BspNode<M> {
        &mut self.nodes[id.idx()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Vector3;

    fn make_triangle(a: [f32; 3], b: [f32; 3], c: [f32; 3]) -> Polygon {
        Polygon::new(
            vec![
                Point3::new(a[0], a[1], a[2]),
                Point3::new(b[0], b[1], b[2]),
                Point3::new(c[0], c[1], c[2]),
            ],
            (),
        )
        .unwrap()
    }

    fn unit_cube() -> Mesh {
        Mesh::cuboid(Point3::new(0.5, 0.5, 0.5), Vector3::new(1.0, 1.0, 1.0), ()).unwrap()
    }

    #[test]
    fn empty_tree() {
        let tree: Bsp = Bsp::empty();
        assert!(tree.is_empty());
        assert_eq!(tree.polygon_count(), 0);
        assert_eq!(tree.depth(), 0);
        assert_eq!(tree.locate(Point3::origin()), PointLocation::Outside);
    }

    #[test]
    fn build_empty() {
        assert!(Bsp::<()>::from_polygons(vec![], false).is_empty());
        assert!(Bsp::<()>::from_polygons(vec![], true).is_empty());
    }

    #[test]
    fn build_single_polygon() {
        let poly = make_triangle([0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]);
        for convex in [false, true] {
            let tree = Bsp::from_polygons(vec![poly.clone()], convex);
            assert!(!tree.is_empty());
            assert_eq!(tree.polygon_count(), 1);
            assert_eq!(tree.depth(), 1);
            assert!(tree.root().unwrap().parent().is_none());
        }
    }

    #[test]
    fn depth_follows_parent_links() {
        let tree = Bsp::new(&unit_cube());
        // A convex cube is a chain of six distinct planes.
        assert_eq!(tree.node_count(), 6);
        assert_eq!(tree.depth(), 6);
    }

    #[test]
    fn locate_in_cube() {
        let cube = unit_cube();
        for tree in [Bsp::new(&cube), Bsp::from_polygons(cube.polygons().to_vec(), false)] {
            assert_eq!(tree.locate(Point3::new(0.5, 0.5, 0.5)), PointLocation::Inside);
            assert_eq!(tree.locate(Point3::new(1.5, 0.5, 0.5)), PointLocation::Outside);
            assert_eq!(tree.locate(Point3::new(0.5, 0.5, 1.0)), PointLocation::Boundary);
            assert_eq!(tree.locate(Point3::new(2.0, 0.5, 1.0)), PointLocation::Outside);
            assert!(tree.contains_point(Point3::new(0.1, 0.9, 0.2)));
            assert!(!tree.contains_point(Point3::new(-0.1, 0.9, 0.2)));
        }
    }
}
