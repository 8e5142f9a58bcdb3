//! Whole-tree transforms and merging.
//!
//! A transform never touches the source tree: every node is rebuilt into a
//! fresh arena with the same shape, so handles stay valid in the copy.

use nalgebra::{Rotation3, Vector3};

use crate::{LineageCounter, Plane3D, Polygon};

use super::tree::Bsp;

impl<M: Clone> Bsp<M> {
    /// Returns a copy of the tree moved by `translation`.
    pub fn translated(&self, translation: &Vector3<f32>) -> Self {
        self.map_nodes(
            |plane| plane.translated(translation),
            |polygon| polygon.translated(translation),
        )
    }

    /// Returns a copy of the tree scaled about the origin.
    ///
    /// Non-uniform and mirroring scales are supported; scale components must
    /// be non-zero.
    pub fn scaled(&self, scale: &Vector3<f32>) -> Self {
        self.map_nodes(|plane| plane.scaled(scale), |polygon| polygon.scaled(scale))
    }

    /// Returns a copy of the tree rotated about the origin.
    pub fn rotated(&self, rotation: &Rotation3<f32>) -> Self {
        self.map_nodes(
            |plane| plane.rotated(rotation),
            |polygon| polygon.rotated(rotation),
        )
    }

    /// Returns an independent copy of the tree.
    pub fn duplicate(&self) -> Self {
        self.translated(&Vector3::zeros())
    }

    /// Returns a new tree holding the polygons of both `self` and `other`.
    ///
    /// The polygons of `other` are inserted into a copy of `self`, so they
    /// may be split by its planes. Neither input is modified.
    pub fn merged(&self, other: &Bsp<M>) -> Self {
        let Some(root) = self.root else {
            return other.duplicate();
        };
        let mut merged = self.duplicate();
        let incoming: Vec<Polygon<M>> = other.polygons().cloned().collect();
        let count = incoming.len();
        merged.insert(root, incoming, &mut LineageCounter::new());
        log::debug!(
            "merged {} polygons into tree of {} nodes -> {} nodes",
            count,
            self.node_count(),
            merged.node_count()
        );
        merged
    }

    fn map_nodes(
        &self,
        plane: impl Fn(&Plane3D) -> Plane3D,
        polygon: impl Fn(&Polygon<M>) -> Polygon<M>,
    ) -> Self {
        Self {
            nodes: self
                .nodes
                .iter()
                .map(|node| node.map(&plane, &polygon))
                .collect(),
            root: self.root,
        }
    }
}
