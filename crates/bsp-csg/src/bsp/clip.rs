//! Clipping polygon batches against the solid described by a tree.

use crate::{LineageCounter, Polygon};

use super::node::{faces_same_direction, NodeId};
use super::tree::Bsp;

/// Which fragments a clip pass keeps, relative to the clipping solid.
///
/// `GreaterThan`/`GreaterThanOrEqual` keep what lies outside the solid,
/// `LessThan`/`LessThanOrEqual` what lies inside. The `OrEqual` variants
/// differ from the strict ones in how fragments lying on the solid's
/// surface are resolved. Boolean operations combine two passes with
/// complementary rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClipRule {
    /// Keep fragments strictly outside.
    GreaterThan,
    /// Keep fragments outside, plus surface fragments facing the same way as the surface.
    GreaterThanOrEqual,
    /// Keep fragments inside; surface fragments facing the same way are dropped.
    LessThan,
    /// Keep fragments inside, plus surface fragments overlapping the surface.
    LessThanOrEqual,
}

impl ClipRule {
    /// Returns `true` for the rules that keep the front (outside) by default.
    #[inline]
    pub fn keeps_front(self) -> bool {
        matches!(self, ClipRule::GreaterThan | ClipRule::GreaterThanOrEqual)
    }
}

impl<M: Clone> Bsp<M> {
    /// Clips `polygons` against this solid, keeping the fragments selected by `rule`.
    ///
    /// Lineage ids on the input are cleared first; fragments cut during the
    /// pass are rejoined where possible before being returned. An empty tree
    /// is the empty solid: everything is outside it.
    pub fn clip(&self, polygons: Vec<Polygon<M>>, rule: ClipRule) -> Vec<Polygon<M>> {
        let mut polygons = polygons;
        for polygon in &mut polygons {
            polygon.set_lineage(None);
        }
        let input = polygons.len();
        let result = match self.root {
            Some(root) => self.clip_from(root, polygons, rule, &mut LineageCounter::new()),
            // The empty solid has no inside, so back-keeping rules keep nothing.
            None if rule.keeps_front() => polygons,
            None => Vec::new(),
        };
        log::debug!("clip {:?}: {} polygons -> {} fragments", rule, input, result.len());
        result
    }

    fn clip_from(
        &self,
        start: NodeId,
        polygons: Vec<Polygon<M>>,
        rule: ClipRule,
        lineage: &mut LineageCounter,
    ) -> Vec<Polygon<M>> {
        let keep_front = rule.keeps_front();
        let mut kept = Vec::new();
        let mut node_id = start;
        let mut polygons = polygons;

        while !polygons.is_empty() {
            let node = self.node(node_id);
            let mut coplanar = Vec::new();
            let mut front = Vec::new();
            let mut back = Vec::new();
            for polygon in polygons {
                polygon.split(node.plane(), &mut coplanar, &mut front, &mut back, lineage);
            }
            for polygon in coplanar {
                match rule {
                    ClipRule::GreaterThan | ClipRule::LessThanOrEqual => {
                        polygon.clip_to(node.polygons(), &mut back, &mut front, lineage)
                    }
                    ClipRule::GreaterThanOrEqual | ClipRule::LessThan => {
                        if faces_same_direction(&polygon, node.plane()) {
                            front.push(polygon);
                        } else {
                            polygon.clip_to(node.polygons(), &mut back, &mut front, lineage);
                        }
                    }
                }
            }

            if front.len() > back.len() {
                match node.back() {
                    Some(child) => {
                        let clipped = self.clip_from(child, back, rule, lineage);
                        add_fragments(&mut kept, clipped);
                    }
                    None if !keep_front => add_fragments(&mut kept, back),
                    None => {}
                }
                let Some(child) = node.front() else {
                    if keep_front {
                        add_fragments(&mut kept, front);
                    }
                    return kept;
                };
                polygons = front;
                node_id = child;
            } else {
                match node.front() {
                    Some(child) => {
                        let clipped = self.clip_from(child, front, rule, lineage);
                        add_fragments(&mut kept, clipped);
                    }
                    None if keep_front => add_fragments(&mut kept, front),
                    None => {}
                }
                let Some(child) = node.back() else {
                    if !keep_front {
                        add_fragments(&mut kept, back);
                    }
                    return kept;
                };
                polygons = back;
                node_id = child;
            }
        }
        kept
    }
}

/// Appends fragments to `kept`, first joining each one with any kept
/// fragment of the same lineage that it shares an edge with.
fn add_fragments<M: Clone>(kept: &mut Vec<Polygon<M>>, fragments: Vec<Polygon<M>>) {
    for mut fragment in fragments {
        if let Some(id) = fragment.lineage() {
            for i in (0..kept.len()).rev() {
                if kept[i].lineage() != Some(id) {
                    continue;
                }
                if let Some(joined) = fragment.join(&kept[i], true) {
                    fragment = joined;
                    kept.remove(i);
                }
            }
        }
        kept.push(fragment);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Mesh;
    use approx::assert_relative_eq;
    use nalgebra::{Point3, Vector3};

    fn cube(center: [f32; 3], size: f32) -> Mesh {
        Mesh::cuboid(
            Point3::new(center[0], center[1], center[2]),
            Vector3::new(size, size, size),
            (),
        )
        .unwrap()
    }

    fn area(polygons: &[Polygon]) -> f32 {
        polygons.iter().map(Polygon::area).sum()
    }

    const RULES: [ClipRule; 4] = [
        ClipRule::GreaterThan,
        ClipRule::GreaterThanOrEqual,
        ClipRule::LessThan,
        ClipRule::LessThanOrEqual,
    ];

    #[test]
    fn keep_all_rule_returns_own_polygons() {
        let solid = cube([0.5, 0.5, 0.5], 1.0);
        for convex in [true, false] {
            let tree = Bsp::from_polygons(solid.polygons().to_vec(), convex);
            let kept = tree.clip(solid.polygons().to_vec(), ClipRule::GreaterThanOrEqual);
            assert_eq!(kept.len(), solid.polygons().len());
            assert_relative_eq!(area(&kept), 6.0, epsilon = 1e-5);
        }
    }

    #[test]
    fn strict_rules_drop_own_surface() {
        let solid = cube([0.5, 0.5, 0.5], 1.0);
        let tree = Bsp::new(&solid);
        assert!(tree.clip(solid.polygons().to_vec(), ClipRule::GreaterThan).is_empty());
        assert!(tree.clip(solid.polygons().to_vec(), ClipRule::LessThan).is_empty());
        let on_surface = tree.clip(solid.polygons().to_vec(), ClipRule::LessThanOrEqual);
        assert_relative_eq!(area(&on_surface), 6.0, epsilon = 1e-5);
    }

    #[test]
    fn disjoint_polygons_are_outside() {
        let tree = Bsp::new(&cube([0.0, 0.0, 0.0], 1.0));
        let far = cube([5.0, 0.0, 0.0], 1.0);
        let outside = tree.clip(far.polygons().to_vec(), ClipRule::GreaterThan);
        assert_eq!(outside.len(), 6);
        assert!(tree.clip(far.polygons().to_vec(), ClipRule::LessThan).is_empty());
    }

    #[test]
    fn enclosed_polygons_are_inside() {
        let tree = Bsp::new(&cube([0.0, 0.0, 0.0], 4.0));
        let inner = cube([0.0, 0.0, 0.0], 1.0);
        assert_eq!(tree.clip(inner.polygons().to_vec(), ClipRule::LessThan).len(), 6);
        assert!(tree.clip(inner.polygons().to_vec(), ClipRule::GreaterThan).is_empty());
    }

    #[test]
    fn overlapping_cube_is_split_and_rejoined() {
        let a = cube([0.5, 0.5, 0.5], 1.0);
        let b = cube([1.0, 0.5, 0.5], 1.0);
        let tree = Bsp::new(&b);

        let outside = tree.clip(a.polygons().to_vec(), ClipRule::GreaterThan);
        // the x=0 face plus the outer halves of four side faces
        assert_relative_eq!(area(&outside), 3.0, epsilon = 1e-4);
        assert_eq!(outside.len(), 5);

        let inside = tree.clip(a.polygons().to_vec(), ClipRule::LessThan);
        // only the x=1 face is strictly inside b
        assert_relative_eq!(area(&inside), 1.0, epsilon = 1e-4);
    }

    #[test]
    fn clip_is_idempotent() {
        let a = cube([0.5, 0.5, 0.5], 1.0);
        let b = cube([1.0, 0.5, 0.5], 1.0);
        for tree in [Bsp::new(&b), Bsp::from_polygons(b.polygons().to_vec(), false)] {
            for rule in RULES {
                let once = tree.clip(a.polygons().to_vec(), rule);
                let twice = tree.clip(once.clone(), rule);
                assert_relative_eq!(area(&once), area(&twice), epsilon = 1e-4);
                assert_eq!(once.len(), twice.len(), "{rule:?}");
            }
        }
    }

    #[test]
    fn empty_tree_keeps_front_rules_only() {
        let tree: Bsp = Bsp::empty();
        let polygons = cube([0.0, 0.0, 0.0], 1.0).into_polygons();
        assert_eq!(tree.clip(polygons.clone(), ClipRule::GreaterThan).len(), 6);
        assert_eq!(tree.clip(polygons.clone(), ClipRule::GreaterThanOrEqual).len(), 6);
        assert!(tree.clip(polygons.clone(), ClipRule::LessThan).is_empty());
        assert!(tree.clip(polygons, ClipRule::LessThanOrEqual).is_empty());
    }

    #[test]
    fn add_fragments_rejoins_same_lineage() {
        let quad = cube([0.5, 0.5, 0.5], 1.0).into_polygons().remove(0);
        let normal = quad.plane().normal();
        // any plane through the centroid perpendicular to the face
        let axis = if normal.x.abs() < 0.5 {
            Vector3::new(1.0, 0.0, 0.0)
        } else {
            Vector3::new(0.0, 1.0, 0.0)
        };
        let cut = crate::Plane3D::from_point_and_normal(quad.centroid(), axis).unwrap();
        let mut counter = LineageCounter::new();
        let (mut front, mut back) = (Vec::new(), Vec::new());
        quad.clone().split_spanning(&cut, &mut front, &mut back, &mut counter);

        let mut kept = Vec::new();
        add_fragments(&mut kept, front);
        add_fragments(&mut kept, back);
        assert_eq!(kept.len(), 1);
        assert_relative_eq!(kept[0].area(), quad.area(), epsilon = 1e-6);
    }
}
