//! Polygon cutting, clipping and rejoining against planes.
//!
//! These are the geometric primitives the BSP algorithms are built from:
//! classify a polygon against a plane, split it into front/back parts, clip
//! it against a set of coplanar polygons, and join two fragments of the same
//! original polygon back into one.

use nalgebra::Point3;

use crate::polygon::is_convex;
use crate::{Classification, LineageCounter, Plane3D, PlaneSide, Polygon, PLANE_EPSILON};

impl<M: Clone> Polygon<M> {
    /// Classifies this polygon relative to a plane.
    ///
    /// Returns:
    /// - `Coplanar` if the polygon's own plane equals `plane`, or all vertices lie on it
    /// - `Front` if all vertices are in front of or on the plane
    /// - `Back` if all vertices are behind or on the plane
    /// - `Spanning` if vertices are on both sides
    pub fn classify(&self, plane: &Plane3D) -> Classification {
        if self.plane().approx_eq(plane) {
            return Classification::Coplanar;
        }
        let mut classification = Classification::Coplanar;
        for vertex in self.vertices() {
            classification = classification.with_side(plane.classify_point(*vertex));
            if classification == Classification::Spanning {
                break;
            }
        }
        classification
    }

    /// Sorts this polygon into `coplanar`, `front` or `back`, splitting it
    /// when it spans `plane`.
    pub fn split(
        self,
        plane: &Plane3D,
        coplanar: &mut Vec<Self>,
        front: &mut Vec<Self>,
        back: &mut Vec<Self>,
        lineage: &mut LineageCounter,
    ) {
        match self.classify(plane) {
            Classification::Coplanar => coplanar.push(self),
            Classification::Front => front.push(self),
            Classification::Back => back.push(self),
            Classification::Spanning => self.split_spanning(plane, front, back, lineage),
        }
    }

    /// Splits a polygon known to span `plane` into a front and a back part.
    ///
    /// Both fragments carry the same lineage id: the polygon's existing id,
    /// or a fresh one from `lineage` if it had none. Walks the polygon edges
    /// (Sutherland-Hodgman) and builds two vertex lists, adding the
    /// intersection point to both when an edge crosses the plane.
    pub fn split_spanning(
        mut self,
        plane: &Plane3D,
        front: &mut Vec<Self>,
        back: &mut Vec<Self>,
        lineage: &mut LineageCounter,
    ) {
        if self.lineage().is_none() {
            self.set_lineage(Some(lineage.next_id()));
        }

        let vertices = self.vertices();
        let n = vertices.len();
        let mut front_verts = Vec::with_capacity(n + 1);
        let mut back_verts = Vec::with_capacity(n + 1);

        let sides: Vec<PlaneSide> = vertices.iter().map(|v| plane.classify_point(*v)).collect();

        for i in 0..n {
            let current = vertices[i];
            let current_side = sides[i];
            let next_idx = (i + 1) % n;
            let next_side = sides[next_idx];

            match current_side {
                PlaneSide::Front => front_verts.push(current),
                PlaneSide::Back => back_verts.push(current),
                PlaneSide::OnPlane => {
                    front_verts.push(current);
                    back_verts.push(current);
                }
            }

            if matches!(
                (current_side, next_side),
                (PlaneSide::Front, PlaneSide::Back) | (PlaneSide::Back, PlaneSide::Front)
            ) {
                let crossing = plane.crossing_point(current, vertices[next_idx]);
                front_verts.push(crossing);
                back_verts.push(crossing);
            }
        }

        let own_plane = self.plane().clone();
        let lineage = self.lineage();
        let material = self.material().clone();
        if front_verts.len() >= 3 {
            front.push(Polygon::from_parts(
                front_verts,
                own_plane.clone(),
                material.clone(),
                lineage,
            ));
        }
        if back_verts.len() >= 3 {
            back.push(Polygon::from_parts(back_verts, own_plane, material, lineage));
        }
    }

    /// Clips this polygon against a set of polygons lying on the same plane.
    ///
    /// Parts overlapping any of `polygons` go to `inside`; the remainder goes
    /// to `outside`.
    pub fn clip_to(
        self,
        polygons: &[Self],
        inside: &mut Vec<Self>,
        outside: &mut Vec<Self>,
        lineage: &mut LineageCounter,
    ) {
        let mut to_test = vec![self];
        for polygon in polygons {
            if to_test.is_empty() {
                break;
            }
            let mut remaining = Vec::new();
            for candidate in to_test {
                polygon.clip_one(candidate, inside, &mut remaining, lineage);
            }
            to_test = remaining;
        }
        outside.extend(to_test);
    }

    /// Cuts `polygon` by each edge plane of `self`: what lies outside any edge
    /// goes to `outside`, what survives every edge is inside `self`.
    fn clip_one(
        &self,
        polygon: Self,
        inside: &mut Vec<Self>,
        outside: &mut Vec<Self>,
        lineage: &mut LineageCounter,
    ) {
        let mut polygon = polygon;
        let mut coplanar = Vec::new();
        for edge in self.edge_planes() {
            let mut back = Vec::new();
            polygon.split(&edge, &mut coplanar, outside, &mut back, lineage);
            match back.pop() {
                Some(rest) => polygon = rest,
                None => return,
            }
        }
        inside.push(polygon);
    }

    /// Joins two fragments sharing an edge back into one polygon.
    ///
    /// The polygons must lie on the same plane and share an edge traversed in
    /// opposite directions. Vertices made redundant by the join (collinear or
    /// coincident) are removed. With `ensure_convex`, a non-convex result is
    /// rejected. Returns `None` if the polygons cannot be joined.
    pub fn join(&self, other: &Self, ensure_convex: bool) -> Option<Self> {
        if !self.plane().approx_eq(other.plane()) {
            return None;
        }
        let a = self.vertices();
        let b = other.vertices();
        let (n, m) = (a.len(), b.len());

        for i in 0..n {
            let a0 = a[i];
            let a1 = a[(i + 1) % n];
            let Some(j) = (0..m).find(|&j| {
                points_coincide(a0, b[(j + 1) % m]) && points_coincide(a1, b[j])
            }) else {
                continue;
            };

            // a1 .. a0 around self, then the vertices of other strictly between a0 and a1.
            let mut vertices = Vec::with_capacity(n + m - 2);
            vertices.extend((0..n).map(|k| a[(i + 1 + k) % n]));
            vertices.extend((0..m - 2).map(|k| b[(j + 2 + k) % m]));
            remove_redundant_vertices(&mut vertices);

            if vertices.len() < 3 {
                return None;
            }
            if ensure_convex && !is_convex(&vertices, &self.plane().normal()) {
                return None;
            }
            return Some(Polygon::from_parts(
                vertices,
                self.plane().clone(),
                self.material().clone(),
                self.lineage(),
            ));
        }
        None
    }
}

#[inline]
fn points_coincide(a: Point3<f32>, b: Point3<f32>) -> bool {
    (a - b).iter().all(|c| c.abs() <= PLANE_EPSILON)
}

/// Drops vertices that coincide with their successor or sit on a straight
/// line between their neighbours.
fn remove_redundant_vertices(vertices: &mut Vec<Point3<f32>>) {
    let mut i = 0;
    while vertices.len() >= 3 && i < vertices.len() {
        let n = vertices.len();
        let prev = vertices[(i + n - 1) % n];
        let current = vertices[i];
        let next = vertices[(i + 1) % n];
        let redundant = points_coincide(prev, current)
            || distance_to_line(current, prev, next) <= PLANE_EPSILON;
        if redundant {
            vertices.remove(i);
            i = i.saturating_sub(1);
        } else {
            i += 1;
        }
    }
}

/// Distance from `point` to the line through `start` and `end`.
fn distance_to_line(point: Point3<f32>, start: Point3<f32>, end: Point3<f32>) -> f32 {
    let line = end - start;
    let length = line.norm();
    if length <= f32::EPSILON {
        return (point - start).norm();
    }
    (point - start).cross(&line).norm() / length
}
