//! Plane representation and operations for BSP trees.

use nalgebra::{Point3, Rotation3, Vector3};

/// Default epsilon for plane classification and plane equality.
/// Points within this distance of the plane are considered "on" the plane.
pub const PLANE_EPSILON: f32 = 1e-5;

/// Which side of a plane a point lies on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaneSide {
    /// Point is in front of the plane (positive side of normal)
    Front,
    /// Point is behind the plane (negative side of normal)
    Back,
    /// Point lies on the plane (within epsilon tolerance)
    OnPlane,
}

/// Classification of a polygon relative to a plane.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    /// All vertices are in front of the plane
    Front,
    /// All vertices are behind the plane
    Back,
    /// All vertices are on the plane (coplanar)
    Coplanar,
    /// Vertices are on both sides (spans the plane)
    Spanning,
}

impl Classification {
    /// Folds the side of one more vertex into a running classification.
    ///
    /// Starting from `Coplanar`, folding every vertex of a polygon yields the
    /// polygon's classification.
    #[inline]
    pub fn with_side(self, side: PlaneSide) -> Self {
        match (self, side) {
            (c, PlaneSide::OnPlane) => c,
            (Classification::Coplanar, PlaneSide::Front) => Classification::Front,
            (Classification::Coplanar, PlaneSide::Back) => Classification::Back,
            (Classification::Front, PlaneSide::Front) => Classification::Front,
            (Classification::Back, PlaneSide::Back) => Classification::Back,
            _ => Classification::Spanning,
        }
    }
}

/// A plane in 3D space, represented as `normal · point = offset`.
#[derive(Debug, Clone, PartialEq)]
pub struct Plane3D {
    normal: Vector3<f32>,
    offset: f32,
}

impl Plane3D {
    /// Creates a new plane from a normal vector and offset.
    /// The normal will be normalized automatically.
    ///
    /// # Panics
    /// Panics if the normal vector has zero length.
    pub fn new(normal: Vector3<f32>, offset: f32) -> Self {
        let norm = normal.norm();
        assert!(norm > f32::EPSILON, "Plane normal cannot be zero");
        Self {
            normal: normal / norm,
            offset: offset / norm,
        }
    }

    /// Creates a plane from a point on the plane and a normal vector.
    ///
    /// Returns `None` if the normal vector has (nearly) zero length.
    pub fn from_point_and_normal(point: Point3<f32>, normal: Vector3<f32>) -> Option<Self> {
        let norm = normal.norm();
        if norm <= f32::EPSILON {
            return None;
        }
        let unit_normal = normal / norm;
        Some(Self {
            normal: unit_normal,
            offset: unit_normal.dot(&point.coords),
        })
    }

    /// Creates the plane through a polygon's vertices.
    ///
    /// The normal is computed with Newell's method, so collinear leading
    /// vertices do not matter. The direction follows the counter-clockwise
    /// winding of the vertices. Returns `None` for degenerate input.
    pub fn from_points(points: &[Point3<f32>]) -> Option<Self> {
        if points.len() < 3 {
            return None;
        }
        let mut normal = Vector3::zeros();
        let mut centroid = Vector3::zeros();
        for (i, current) in points.iter().enumerate() {
            let next = points[(i + 1) % points.len()];
            normal.x += (current.y - next.y) * (current.z + next.z);
            normal.y += (current.z - next.z) * (current.x + next.x);
            normal.z += (current.x - next.x) * (current.y + next.y);
            centroid += current.coords;
        }
        let centroid = Point3::from(centroid / points.len() as f32);
        Self::from_point_and_normal(centroid, normal)
    }

    /// Returns the unit normal vector of the plane.
    #[inline]
    pub fn normal(&self) -> Vector3<f32> {
        self.normal
    }

    /// Returns the signed distance from the origin to the plane along the normal.
    #[inline]
    pub fn offset(&self) -> f32 {
        self.offset
    }

    /// Computes the signed distance from a point to the plane.
    /// - Positive: point is in front (same side as normal)
    /// - Negative: point is behind (opposite side from normal)
    /// - Zero: point is on the plane
    #[inline]
    pub fn signed_distance(&self, point: Point3<f32>) -> f32 {
        self.normal.dot(&point.coords) - self.offset
    }

    /// Classifies which side of the plane a point lies on.
    /// Uses the default `PLANE_EPSILON` tolerance.
    #[inline]
    pub fn classify_point(&self, point: Point3<f32>) -> PlaneSide {
        self.classify_point_with_epsilon(point, PLANE_EPSILON)
    }

    /// Classifies which side of the plane a point lies on, with a custom epsilon.
    pub fn classify_point_with_epsilon(&self, point: Point3<f32>, epsilon: f32) -> PlaneSide {
        let dist = self.signed_distance(point);
        if dist > epsilon {
            PlaneSide::Front
        } else if dist < -epsilon {
            PlaneSide::Back
        } else {
            PlaneSide::OnPlane
        }
    }

    /// Tolerance-based equality using `PLANE_EPSILON`.
    ///
    /// Two planes are equal when both their normals and their offsets match
    /// within the tolerance. Opposite-facing planes are never equal.
    #[inline]
    pub fn approx_eq(&self, other: &Plane3D) -> bool {
        self.approx_eq_with_epsilon(other, PLANE_EPSILON)
    }

    /// Tolerance-based equality with a custom epsilon.
    pub fn approx_eq_with_epsilon(&self, other: &Plane3D, epsilon: f32) -> bool {
        (self.offset - other.offset).abs() <= epsilon
            && (self.normal - other.normal).iter().all(|c| c.abs() <= epsilon)
    }

    /// Returns `true` if both planes face roughly the same way (dot > 0).
    #[inline]
    pub fn faces_same_direction(&self, other: &Plane3D) -> bool {
        self.normal.dot(&other.normal) > 0.0
    }

    /// Returns a new plane with the normal flipped (facing the opposite direction).
    #[inline]
    pub fn flipped(&self) -> Self {
        Self {
            normal: -self.normal,
            offset: -self.offset,
        }
    }

    /// Returns the point where the line through `start` and `end` meets the plane.
    ///
    /// Callers guarantee the endpoints lie on opposite sides, so the
    /// denominator cannot vanish.
    pub(crate) fn crossing_point(&self, start: Point3<f32>, end: Point3<f32>) -> Point3<f32> {
        let direction = end - start;
        let t = (self.offset - self.normal.dot(&start.coords)) / self.normal.dot(&direction);
        start + direction * t
    }

    /// Returns this plane moved by `translation`.
    pub fn translated(&self, translation: &Vector3<f32>) -> Self {
        Self {
            normal: self.normal,
            offset: self.offset + self.normal.dot(translation),
        }
    }

    /// Returns this plane rotated about the origin.
    pub fn rotated(&self, rotation: &Rotation3<f32>) -> Self {
        Self {
            normal: rotation * self.normal,
            offset: self.offset,
        }
    }

    /// Returns this plane under a (possibly non-uniform) scale about the origin.
    ///
    /// Normals transform by the inverse scale. Scale components must be non-zero.
    pub fn scaled(&self, scale: &Vector3<f32>) -> Self {
        debug_assert!(
            scale.iter().all(|c| c.abs() > f32::EPSILON),
            "Scale components must be non-zero"
        );
        let normal = self.normal.component_div(scale);
        let norm = normal.norm();
        Self {
            normal: normal / norm,
            offset: self.offset / norm,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn new_normalizes() {
        let plane = Plane3D::new(Vector3::new(0.0, 2.0, 0.0), 4.0);
        assert_relative_eq!(plane.normal(), Vector3::new(0.0, 1.0, 0.0));
        assert_relative_eq!(plane.offset(), 2.0);
    }

    #[test]
    fn classify_points() {
        let plane = Plane3D::new(Vector3::new(0.0, 0.0, 1.0), 1.0);
        assert_eq!(plane.classify_point(Point3::new(0.0, 0.0, 2.0)), PlaneSide::Front);
        assert_eq!(plane.classify_point(Point3::new(0.0, 0.0, 0.0)), PlaneSide::Back);
        assert_eq!(plane.classify_point(Point3::new(5.0, -3.0, 1.0)), PlaneSide::OnPlane);
        assert_eq!(
            plane.classify_point(Point3::new(0.0, 0.0, 1.0 + PLANE_EPSILON / 2.0)),
            PlaneSide::OnPlane
        );
    }

    #[test]
    fn from_points_follows_winding() {
        let ccw = [
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
        ];
        let plane = Plane3D::from_points(&ccw).unwrap();
        assert_relative_eq!(plane.normal(), Vector3::new(0.0, 0.0, 1.0));
        assert_relative_eq!(plane.offset(), 0.0);

        let mut cw = ccw;
        cw.reverse();
        let flipped = Plane3D::from_points(&cw).unwrap();
        assert!(flipped.approx_eq(&plane.flipped()));
    }

    #[test]
    fn from_points_rejects_collinear() {
        let points = [
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(2.0, 0.0, 0.0),
        ];
        assert!(Plane3D::from_points(&points).is_none());
    }

    #[test]
    fn approx_eq_tolerates_noise_but_not_flips() {
        let plane = Plane3D::new(Vector3::new(1.0, 0.0, 0.0), 0.5);
        let noisy = Plane3D::new(Vector3::new(1.0, 1e-7, 0.0), 0.5 + 1e-6);
        assert!(plane.approx_eq(&noisy));
        assert!(!plane.approx_eq(&plane.flipped()));
        assert!(!plane.approx_eq(&Plane3D::new(Vector3::new(1.0, 0.0, 0.0), 0.6)));
    }

    #[test]
    fn translate_and_rotate() {
        let plane = Plane3D::new(Vector3::new(0.0, 1.0, 0.0), 1.0);
        let moved = plane.translated(&Vector3::new(3.0, 2.0, 0.0));
        assert_relative_eq!(moved.offset(), 3.0);

        let rotation = Rotation3::from_axis_angle(&Vector3::z_axis(), std::f32::consts::FRAC_PI_2);
        let rotated = plane.rotated(&rotation);
        assert_relative_eq!(rotated.normal(), Vector3::new(-1.0, 0.0, 0.0), epsilon = 1e-6);
        assert_relative_eq!(rotated.offset(), 1.0);
    }

    #[test]
    fn scale_keeps_points_on_plane() {
        let plane = Plane3D::new(Vector3::new(1.0, 1.0, 0.0), 1.0);
        let scale = Vector3::new(2.0, 3.0, 1.0);
        let on_plane = Point3::new(1.0, 0.0, 0.0);
        assert_eq!(plane.classify_point(on_plane), PlaneSide::OnPlane);

        let scaled = plane.scaled(&scale);
        let moved = Point3::from(on_plane.coords.component_mul(&scale));
        assert_eq!(scaled.classify_point(moved), PlaneSide::OnPlane);
        assert_relative_eq!(scaled.normal().norm(), 1.0, epsilon = 1e-6);
    }

    #[test]
    fn mirror_scale_flips_normal() {
        let plane = Plane3D::new(Vector3::new(1.0, 0.0, 0.0), 1.0);
        let mirrored = plane.scaled(&Vector3::new(-1.0, 1.0, 1.0));
        assert_relative_eq!(mirrored.normal(), Vector3::new(-1.0, 0.0, 0.0));
        assert_relative_eq!(mirrored.offset(), 1.0);
    }

    #[test]
    fn classification_fold() {
        use Classification::*;
        let fold = |sides: &[PlaneSide]| sides.iter().fold(Coplanar, |c, s| c.with_side(*s));
        assert_eq!(fold(&[PlaneSide::OnPlane, PlaneSide::OnPlane]), Coplanar);
        assert_eq!(fold(&[PlaneSide::OnPlane, PlaneSide::Front]), Front);
        assert_eq!(fold(&[PlaneSide::Back, PlaneSide::OnPlane]), Back);
        assert_eq!(fold(&[PlaneSide::Back, PlaneSide::Front]), Spanning);
    }
}
