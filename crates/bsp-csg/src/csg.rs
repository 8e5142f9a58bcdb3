//! Boolean operations on meshes.
//!
//! Each operation builds a tree for both operands and clips each operand's
//! polygons against the other's tree. The rule pairs are chosen so that
//! surface regions shared by both solids end up in the result exactly once.

use crate::bsp::{Bsp, ClipRule};
use crate::{Mesh, Polygon};

impl<M: Clone> Mesh<M> {
    /// Returns the solid occupied by `self` or `other`.
    pub fn union(&self, other: &Mesh<M>) -> Mesh<M> {
        if !self.overlaps(other) {
            log::debug!("union: disjoint bounds, concatenating");
            return Mesh::new(concat(self.polygons(), other.polygons()));
        }
        let (a, b) = (Bsp::new(self), Bsp::new(other));
        let mut polygons = b.clip(self.polygons().to_vec(), ClipRule::GreaterThan);
        polygons.extend(a.clip(other.polygons().to_vec(), ClipRule::GreaterThanOrEqual));
        log::debug!("union: {} polygons", polygons.len());
        Mesh::new(polygons)
    }

    /// Returns the solid occupied by both `self` and `other`.
    pub fn intersection(&self, other: &Mesh<M>) -> Mesh<M> {
        if !self.overlaps(other) {
            log::debug!("intersection: disjoint bounds, result is empty");
            return Mesh::default();
        }
        let (a, b) = (Bsp::new(self), Bsp::new(other));
        let mut polygons = b.clip(self.polygons().to_vec(), ClipRule::LessThan);
        polygons.extend(a.clip(other.polygons().to_vec(), ClipRule::LessThanOrEqual));
        log::debug!("intersection: {} polygons", polygons.len());
        Mesh::new(polygons)
    }

    /// Returns the solid occupied by `self` but not `other`.
    pub fn subtraction(&self, other: &Mesh<M>) -> Mesh<M> {
        if !self.overlaps(other) {
            log::debug!("subtraction: disjoint bounds, keeping minuend");
            return self.clone();
        }
        let (a, b) = (Bsp::new(self), Bsp::new(other));
        let mut polygons = b.clip(self.polygons().to_vec(), ClipRule::GreaterThan);
        polygons.extend(
            a.clip(other.polygons().to_vec(), ClipRule::LessThan)
                .into_iter()
                .map(Polygon::inverted),
        );
        log::debug!("subtraction: {} polygons", polygons.len());
        Mesh::new(polygons)
    }

    /// Returns the solid occupied by exactly one of `self` and `other`.
    pub fn symmetric_difference(&self, other: &Mesh<M>) -> Mesh<M> {
        if !self.overlaps(other) {
            log::debug!("symmetric difference: disjoint bounds, concatenating");
            return Mesh::new(concat(self.polygons(), other.polygons()));
        }
        let mut polygons = self.subtraction(other).into_polygons();
        polygons.extend(other.subtraction(self).into_polygons());
        log::debug!("symmetric difference: {} polygons", polygons.len());
        Mesh::with_convexity(polygons, false)
    }

    /// Returns `false` when the bounding boxes prove the solids disjoint.
    fn overlaps(&self, other: &Mesh<M>) -> bool {
        match (self.bounds(), other.bounds()) {
            (Some(a), Some(b)) => a.intersects(&b),
            _ => false,
        }
    }
}

fn concat<M: Clone>(a: &[Polygon<M>], b: &[Polygon<M>]) -> Vec<Polygon<M>> {
    a.iter().chain(b).cloned().collect()
}
