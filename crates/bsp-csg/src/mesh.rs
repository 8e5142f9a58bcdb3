//! Closed polygonal solids.

use nalgebra::{Point3, Rotation3, Vector3};

use crate::bsp::Bsp;
use crate::{GeometryError, PlaneSide, Polygon};

/// Corner indices of each cuboid face, counter-clockwise seen from outside.
///
/// Bit 0 of a corner index selects the max x, bit 1 max y, bit 2 max z.
const CUBOID_FACES: [[usize; 4]; 6] = [
    [0, 4, 6, 2],
    [1, 3, 7, 5],
    [0, 1, 5, 4],
    [2, 6, 7, 3],
    [0, 2, 3, 1],
    [4, 5, 7, 6],
];

/// Axis-aligned bounding box of a mesh.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    /// Corner with the smallest coordinates.
    pub min: Point3<f32>,
    /// Corner with the largest coordinates.
    pub max: Point3<f32>,
}

impl Bounds {
    /// Smallest box containing every point, or `None` for no points.
    pub fn from_points<'a>(points: impl IntoIterator<Item = &'a Point3<f32>>) -> Option<Self> {
        let mut points = points.into_iter();
        let first = *points.next()?;
        Some(points.fold(Self { min: first, max: first }, |bounds, p| Self {
            min: bounds.min.inf(p),
            max: bounds.max.sup(p),
        }))
    }

    /// Returns `true` if the boxes overlap or touch.
    #[inline]
    pub fn intersects(&self, other: &Self) -> bool {
        self.max.x >= other.min.x
            && self.min.x <= other.max.x
            && self.max.y >= other.min.y
            && self.min.y <= other.max.y
            && self.max.z >= other.min.z
            && self.min.z <= other.max.z
    }

    /// Midpoint of the box.
    #[inline]
    pub fn center(&self) -> Point3<f32> {
        nalgebra::center(&self.min, &self.max)
    }

    /// Extent of the box along each axis.
    #[inline]
    pub fn size(&self) -> Vector3<f32> {
        self.max - self.min
    }
}

/// A closed solid described by outward-facing convex polygons.
///
/// The `is_convex` flag selects the fast construction path when the mesh
/// is turned into a [`Bsp`]. It is detected by [`Mesh::new`] and trusted
/// by [`Mesh::with_convexity`].
#[derive(Debug, Clone, PartialEq)]
pub struct Mesh<M = ()> {
    polygons: Vec<Polygon<M>>,
    is_convex: bool,
}

impl<M> Default for Mesh<M> {
    fn default() -> Self {
        Self {
            polygons: Vec::new(),
            is_convex: true,
        }
    }
}

impl<M> Mesh<M> {
    /// Creates a mesh, detecting whether it bounds a convex solid.
    ///
    /// A mesh is convex when every vertex lies behind or on every polygon's
    /// plane.
    pub fn new(polygons: Vec<Polygon<M>>) -> Self {
        let is_convex = polygons.iter().all(|face| {
            polygons.iter().all(|other| {
                other
                    .vertices()
                    .iter()
                    .all(|v| face.plane().classify_point(*v) != PlaneSide::Front)
            })
        });
        Self {
            polygons,
            is_convex,
        }
    }

    /// Creates a mesh with a caller-supplied convexity flag.
    ///
    /// Setting `is_convex` for a non-convex solid produces a tree that does
    /// not describe it.
    pub fn with_convexity(polygons: Vec<Polygon<M>>, is_convex: bool) -> Self {
        Self {
            polygons,
            is_convex,
        }
    }

    /// Returns the polygons bounding the solid.
    #[inline]
    pub fn polygons(&self) -> &[Polygon<M>] {
        &self.polygons
    }

    /// Consumes the mesh, returning its polygons.
    #[inline]
    pub fn into_polygons(self) -> Vec<Polygon<M>> {
        self.polygons
    }

    /// Returns `true` if the mesh is flagged as bounding a convex solid.
    #[inline]
    pub fn is_convex(&self) -> bool {
        self.is_convex
    }

    /// Returns `true` if the mesh has no polygons (the empty solid).
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.polygons.is_empty()
    }

    /// Bounding box of all vertices, `None` for an empty mesh.
    pub fn bounds(&self) -> Option<Bounds> {
        Bounds::from_points(self.polygons.iter().flat_map(|p| p.vertices()))
    }

    /// Total area of all polygons.
    pub fn surface_area(&self) -> f32 {
        self.polygons.iter().map(Polygon::area).sum()
    }

    /// Turns the solid inside out.
    pub fn inverted(self) -> Self {
        let polygons: Vec<_> = self.polygons.into_iter().map(Polygon::inverted).collect();
        Self {
            is_convex: polygons.is_empty(),
            polygons,
        }
    }
}

impl<M: Clone> Mesh<M> {
    /// Builds an axis-aligned box centred on `center`.
    ///
    /// # Errors
    /// - [`GeometryError::InvalidCoordinate`] if `center` or `size` is not finite.
    /// - [`GeometryError::DegenerateNormal`] if a size component is not positive.
    pub fn cuboid(
        center: Point3<f32>,
        size: Vector3<f32>,
        material: M,
    ) -> Result<Self, GeometryError> {
        if !center.coords.iter().chain(size.iter()).all(|c| c.is_finite()) {
            return Err(GeometryError::InvalidCoordinate);
        }
        if size.iter().any(|c| *c <= 0.0) {
            return Err(GeometryError::DegenerateNormal);
        }
        let half = size / 2.0;
        let corner = |i: usize| {
            Point3::new(
                if i & 1 == 0 { center.x - half.x } else { center.x + half.x },
                if i & 2 == 0 { center.y - half.y } else { center.y + half.y },
                if i & 4 == 0 { center.z - half.z } else { center.z + half.z },
            )
        };
        let polygons = CUBOID_FACES
            .iter()
            .map(|face| Polygon::new(face.iter().map(|&i| corner(i)).collect(), material.clone()))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::with_convexity(polygons, true))
    }

    /// Returns the mesh moved by `translation`.
    pub fn translated(&self, translation: &Vector3<f32>) -> Self {
        self.map_polygons(|p| p.translated(translation))
    }

    /// Scales about the origin; scale components must be non-zero.
    pub fn scaled(&self, scale: &Vector3<f32>) -> Self {
        self.map_polygons(|p| p.scaled(scale))
    }

    /// Returns the mesh rotated about the origin.
    pub fn rotated(&self, rotation: &Rotation3<f32>) -> Self {
        self.map_polygons(|p| p.rotated(rotation))
    }

    /// Returns `true` if `point` is inside the solid or on its surface.
    pub fn contains_point(&self, point: Point3<f32>) -> bool {
        Bsp::new(self).contains_point(point)
    }

    fn map_polygons(&self, f: impl Fn(&Polygon<M>) -> Polygon<M>) -> Self {
        Self {
            polygons: self.polygons.iter().map(f).collect(),
            is_convex: self.is_convex,
        }
    }
}
