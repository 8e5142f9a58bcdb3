//! Convex polygon representation for BSP trees.

use nalgebra::{Point3, Rotation3, Vector3};

use crate::{GeometryError, LineageId, Plane3D, PlaneSide, PLANE_EPSILON};

/// A convex polygon in 3D space, defined by an ordered list of vertices.
///
/// Vertices are coplanar and in counter-clockwise winding order when viewed
/// from the front (the direction the plane normal points). Each polygon
/// carries an opaque `material` tag that is copied onto every fragment cut
/// from it, and an optional lineage id linking it to sibling fragments.
#[derive(Debug, Clone, PartialEq)]
pub struct Polygon<M = ()> {
    vertices: Vec<Point3<f32>>,
    plane: Plane3D,
    material: M,
    lineage: Option<LineageId>,
}

impl<M> Polygon<M> {
    /// Creates a new polygon from a list of vertices.
    ///
    /// The plane is derived from the vertices. The polygon starts with no
    /// lineage.
    ///
    /// # Errors
    /// - [`GeometryError::TooFewVertices`] if fewer than 3 vertices are provided.
    /// - [`GeometryError::InvalidCoordinate`] if a coordinate is not finite.
    /// - [`GeometryError::DegenerateNormal`] if the vertices do not span a plane.
    /// - [`GeometryError::NonPlanar`] if a vertex lies off the plane.
    /// - [`GeometryError::NonConvex`] if the polygon is not convex.
    pub fn new(vertices: Vec<Point3<f32>>, material: M) -> Result<Self, GeometryError> {
        if vertices.len() < 3 {
            return Err(GeometryError::TooFewVertices {
                count: vertices.len(),
            });
        }
        if vertices.iter().any(|v| !v.coords.iter().all(|c| c.is_finite())) {
            return Err(GeometryError::InvalidCoordinate);
        }
        let plane = Plane3D::from_points(&vertices).ok_or(GeometryError::DegenerateNormal)?;
        if vertices
            .iter()
            .any(|v| plane.classify_point(*v) != PlaneSide::OnPlane)
        {
            return Err(GeometryError::NonPlanar);
        }
        if !is_convex(&vertices, &plane.normal()) {
            return Err(GeometryError::NonConvex);
        }
        Ok(Self::from_parts(vertices, plane, material, None))
    }

    /// Assembles a polygon whose vertices are already known to be valid.
    pub(crate) fn from_parts(
        vertices: Vec<Point3<f32>>,
        plane: Plane3D,
        material: M,
        lineage: Option<LineageId>,
    ) -> Self {
        debug_assert!(vertices.len() >= 3, "Polygon must have at least 3 vertices");
        Self {
            vertices,
            plane,
            material,
            lineage,
        }
    }

    /// Returns the vertices of the polygon.
    #[inline]
    pub fn vertices(&self) -> &[Point3<f32>] {
        &self.vertices
    }

    /// Returns the number of vertices.
    #[inline]
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    /// Returns true if the polygon has no vertices (always false for valid polygons).
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Returns the plane that this polygon lies on.
    #[inline]
    pub fn plane(&self) -> &Plane3D {
        &self.plane
    }

    /// Returns the material tag.
    #[inline]
    pub fn material(&self) -> &M {
        &self.material
    }

    /// Returns the lineage id, if this polygon is a tracked fragment.
    #[inline]
    pub fn lineage(&self) -> Option<LineageId> {
        self.lineage
    }

    pub(crate) fn set_lineage(&mut self, lineage: Option<LineageId>) {
        self.lineage = lineage;
    }

    /// Computes the centroid (vertex average) of the polygon.
    pub fn centroid(&self) -> Point3<f32> {
        let sum: Vector3<f32> = self.vertices.iter().map(|p| p.coords).sum();
        Point3::from(sum / self.vertices.len() as f32)
    }

    /// Computes the surface area of the polygon.
    pub fn area(&self) -> f32 {
        let origin = self.vertices[0];
        let doubled: Vector3<f32> = self
            .vertices
            .windows(2)
            .skip(1)
            .map(|pair| (pair[0] - origin).cross(&(pair[1] - origin)))
            .sum();
        doubled.dot(&self.plane.normal()).abs() / 2.0
    }

    /// Returns the outward-facing planes through each edge, perpendicular to
    /// the polygon's own plane.
    ///
    /// A point on the polygon's plane is inside the polygon when it is behind
    /// or on every edge plane.
    pub fn edge_planes(&self) -> Vec<Plane3D> {
        let normal = self.plane.normal();
        let n = self.vertices.len();
        (0..n)
            .filter_map(|i| {
                let start = self.vertices[i];
                let end = self.vertices[(i + 1) % n];
                Plane3D::from_point_and_normal(start, (end - start).cross(&normal))
            })
            .collect()
    }

    /// Returns `true` if `point` lies on the polygon (interior or boundary).
    pub fn contains_point(&self, point: Point3<f32>) -> bool {
        self.plane.classify_point(point) == PlaneSide::OnPlane
            && self
                .edge_planes()
                .iter()
                .all(|edge| edge.classify_point(point) != PlaneSide::Front)
    }

    /// Returns the polygon facing the opposite way (reversed winding, flipped plane).
    pub fn inverted(mut self) -> Self {
        self.vertices.reverse();
        self.plane = self.plane.flipped();
        self
    }

    /// Returns this polygon moved by `translation`.
    pub fn translated(&self, translation: &Vector3<f32>) -> Self
    where
        M: Clone,
    {
        Self {
            vertices: self.vertices.iter().map(|v| v + translation).collect(),
            plane: self.plane.translated(translation),
            material: self.material.clone(),
            lineage: self.lineage,
        }
    }

    /// Returns this polygon rotated about the origin.
    pub fn rotated(&self, rotation: &Rotation3<f32>) -> Self
    where
        M: Clone,
    {
        Self {
            vertices: self.vertices.iter().map(|v| rotation * v).collect(),
            plane: self.plane.rotated(rotation),
            material: self.material.clone(),
            lineage: self.lineage,
        }
    }

    /// Returns this polygon scaled about the origin.
    ///
    /// A scale that mirrors an odd number of axes reverses the winding so
    /// the polygon keeps facing along its (transformed) normal.
    pub fn scaled(&self, scale: &Vector3<f32>) -> Self
    where
        M: Clone,
    {
        let mut vertices: Vec<Point3<f32>> = self
            .vertices
            .iter()
            .map(|v| Point3::from(v.coords.component_mul(scale)))
            .collect();
        let mirrored = scale.iter().filter(|c| **c < 0.0).count() % 2 == 1;
        if mirrored {
            vertices.reverse();
        }
        Self {
            vertices,
            plane: self.plane.scaled(scale),
            material: self.material.clone(),
            lineage: self.lineage,
        }
    }
}

/// Checks that the vertices turn consistently around `normal` (no reflex corners).
///
/// Each turn is measured as the sine of the angle between consecutive edges,
/// so the result does not depend on the size of the polygon. Corners next to
/// a zero-length edge are ignored.
pub(crate) fn is_convex(vertices: &[Point3<f32>], normal: &Vector3<f32>) -> bool {
    let n = vertices.len();
    (0..n).all(|i| {
        let a = vertices[i];
        let b = vertices[(i + 1) % n];
        let c = vertices[(i + 2) % n];
        let (incoming, outgoing) = (b - a, c - b);
        let (in_len, out_len) = (incoming.norm(), outgoing.norm());
        in_len <= f32::EPSILON
            || out_len <= f32::EPSILON
            || incoming.cross(&outgoing).dot(normal) / (in_len * out_len) >= -PLANE_EPSILON
    })
}
