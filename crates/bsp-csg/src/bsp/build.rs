//! Tree construction: the convex fast path and general insertion.

use rand::RngCore;
use rand::seq::SliceRandom;

use crate::{Classification, LineageCounter, Plane3D, Polygon};

use super::node::{faces_same_direction, BspNode, NodeId};
use super::tree::Bsp;

impl<M: Clone> Bsp<M> {
    /// Builds a chain of nodes, one per distinct plane, linked through `back`.
    ///
    /// In a convex solid every polygon lies behind (or on) every other
    /// polygon's plane, so nothing is ever split and no node needs a front
    /// child.
    pub(super) fn build_convex<R: RngCore + ?Sized>(
        &mut self,
        mut polygons: Vec<Polygon<M>>,
        rng: &mut R,
    ) {
        polygons.shuffle(rng);

        let mut groups: Vec<(Plane3D, Vec<Polygon<M>>)> = Vec::new();
        for polygon in polygons {
            match groups
                .iter_mut()
                .find(|(plane, _)| plane.approx_eq(polygon.plane()))
            {
                Some((_, group)) => group.push(polygon),
                None => groups.push((polygon.plane().clone(), vec![polygon])),
            }
        }

        let mut parent: Option<NodeId> = None;
        for (plane, group) in groups {
            let mut node = BspNode::new(plane, parent);
            for polygon in group {
                node.push_polygon(polygon);
            }
            let id = self.push_node(node);
            match parent {
                Some(p) => self.node_mut(p).set_back(id),
                None => self.root = Some(id),
            }
            parent = Some(id);
        }
    }

    /// Seeds the root with the first polygon's plane and inserts everything.
    pub(super) fn build_general(&mut self, polygons: Vec<Polygon<M>>) {
        let Some(first) = polygons.first() else {
            return;
        };
        let root = self.push_node(BspNode::new(first.plane().clone(), None));
        self.root = Some(root);
        self.insert(root, polygons, &mut LineageCounter::new());
    }

    /// Inserts polygons into the subtree rooted at `start`.
    ///
    /// Each polygon is classified against the node plane; spanning polygons
    /// are split, coplanar polygons facing the plane's way are stored at the
    /// node and opposite-facing ones are sent behind it. Children are created
    /// on demand from the first polygon that needs them. Recursion only goes
    /// into the smaller partition; the larger one is handled by the loop, which
    /// keeps stack depth bounded by the small side at each level.
    pub(super) fn insert(
        &mut self,
        start: NodeId,
        polygons: Vec<Polygon<M>>,
        lineage: &mut LineageCounter,
    ) {
        let mut node = start;
        let mut polygons = polygons;
        while !polygons.is_empty() {
            let plane = self.node(node).plane().clone();
            let mut front = Vec::new();
            let mut back = Vec::new();
            for polygon in polygons {
                match polygon.classify(&plane) {
                    Classification::Coplanar => {
                        if faces_same_direction(&polygon, &plane) {
                            self.node_mut(node).push_polygon(polygon);
                        } else {
                            back.push(polygon);
                        }
                    }
                    Classification::Front => front.push(polygon),
                    Classification::Back => back.push(polygon),
                    Classification::Spanning => {
                        polygon.split_spanning(&plane, &mut front, &mut back, lineage)
                    }
                }
            }

            let front_child = self.child_or_seed(node, &front, Side::Front);
            let back_child = self.child_or_seed(node, &back, Side::Back);
            log::trace!(
                "insert at node {:?}: {} front, {} back",
                node,
                front.len(),
                back.len()
            );

            if front.len() > back.len() {
                if let Some(child) = back_child {
                    self.insert(child, back, lineage);
                }
                // front is non-empty here, so the child exists
                let Some(child) = front_child else { break };
                polygons = front;
                node = child;
            } else {
                if let Some(child) = front_child {
                    self.insert(child, front, lineage);
                }
                let Some(child) = back_child else { break };
                polygons = back;
                node = child;
            }
        }
    }

    /// Returns the child on `side`, creating it from the plane of the first
    /// pending polygon if it does not exist yet.
    fn child_or_seed(
        &mut self,
        node: NodeId,
        pending: &[Polygon<M>],
        side: Side,
    ) -> Option<NodeId> {
        let existing = match side {
            Side::Front => self.node(node).front(),
            Side::Back => self.node(node).back(),
        };
        if existing.is_some() {
            return existing;
        }
        let seed = pending.first()?.plane().clone();
        let child = self.push_node(BspNode::new(seed, Some(node)));
        match side {
            Side::Front => self.node_mut(node).set_front(child),
            Side::Back => self.node_mut(node).set_back(child),
        }
        Some(child)
    }
}

#[derive(Clone, Copy)]
enum Side {
    Front,
    Back,
}
