//! Depth-first traversal over every polygon stored in a tree.

use crate::Polygon;

use super::node::NodeId;
use super::tree::Bsp;

/// Lazy iterator over all polygons of a [`Bsp`], created by [`Bsp::polygons`].
///
/// Uses an explicit stack rather than recursion, so arbitrarily deep trees
/// can be walked. Every stored polygon is yielded exactly once; the order
/// across sibling subtrees is unspecified. A clone continues from the same
/// position; call [`Bsp::polygons`] again to restart.
#[derive(Debug, Clone)]
pub struct Polygons<'a, M> {
    tree: &'a Bsp<M>,
    stack: Vec<NodeId>,
    current: Option<NodeId>,
    index: usize,
}

impl<'a, M> Polygons<'a, M> {
    fn new(tree: &'a Bsp<M>) -> Self {
        let mut polygons = Self {
            tree,
            stack: Vec::new(),
            current: tree.root_id(),
            index: 0,
        };
        polygons.push_children();
        polygons
    }

    fn push_children(&mut self) {
        let Some(id) = self.current else { return };
        let node = self.tree.node(id);
        self.stack.extend(node.front());
        self.stack.extend(node.back());
    }
}

impl<'a, M> Iterator for Polygons<'a, M> {
    type Item = &'a Polygon<M>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let id = self.current?;
            let polygons = self.tree.node(id).polygons();
            if let Some(polygon) = polygons.get(self.index) {
                self.index += 1;
                return Some(polygon);
            }
            self.current = self.stack.pop();
            self.index = 0;
            self.push_children();
        }
    }
}

impl<M> Bsp<M> {
    /// Returns a fresh iterator over every polygon stored in the tree.
    ///
    /// Each call starts a new traversal from the root.
    pub fn polygons(&self) -> Polygons<'_, M> {
        Polygons::new(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Mesh;
    use nalgebra::{Point3, Vector3};

    #[test]
    fn empty_tree_yields_nothing() {
        let tree: Bsp = Bsp::empty();
        assert_eq!(tree.polygons().count(), 0);
    }

    #[test]
    fn yields_every_polygon_once() {
        let cube =
            Mesh::cuboid(Point3::new(0.0, 0.0, 0.0), Vector3::new(2.0, 2.0, 2.0), ()).unwrap();
        for convex in [true, false] {
            let tree = Bsp::from_polygons(cube.polygons().to_vec(), convex);
            let yielded: Vec<_> = tree.polygons().collect();
            assert_eq!(yielded.len(), 6);
            for face in cube.polygons() {
                assert_eq!(yielded.iter().filter(|p| **p == face).count(), 1);
            }
        }
    }

    #[test]
    fn traversal_is_restartable() {
        let cube =
            Mesh::cuboid(Point3::new(0.0, 0.0, 0.0), Vector3::new(1.0, 1.0, 1.0), ()).unwrap();
        let tree = Bsp::new(&cube);
        let mut first = tree.polygons();
        first.next();
        first.next();
        assert_eq!(first.count(), 4);
        assert_eq!(tree.polygons().count(), 6);
    }

    #[test]
    fn visits_front_and_back_subtrees() {
        // Three parallel slabs; the middle one is the root, so both children exist.
        let slab = |z: f32| {
            crate::Polygon::new(
                vec![
                    Point3::new(0.0, 0.0, z),
                    Point3::new(1.0, 0.0, z),
                    Point3::new(0.0, 1.0, z),
                ],
                (),
            )
            .unwrap()
        };
        let tree = Bsp::from_polygons(vec![slab(0.0), slab(1.0), slab(-1.0)], false);
        let root = tree.root().unwrap();
        assert!(root.front().is_some() && root.back().is_some());
        assert_eq!(tree.polygons().count(), 3);
    }
}
