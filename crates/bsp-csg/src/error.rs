//! Errors raised while validating input geometry.

/// Reasons a polygon or solid cannot be constructed.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GeometryError {
    /// A polygon needs at least three vertices.
    #[error("polygon has {count} vertices, at least 3 are required")]
    TooFewVertices {
        /// Number of vertices supplied.
        count: usize,
    },
    /// The vertices are collinear or coincident, so no plane can be derived.
    #[error("polygon vertices are degenerate and do not define a plane")]
    DegenerateNormal,
    /// A vertex lies off the polygon's plane by more than the tolerance.
    #[error("polygon vertices are not coplanar")]
    NonPlanar,
    /// The polygon is not convex.
    #[error("polygon is not convex")]
    NonConvex,
    /// A coordinate is NaN or infinite.
    #[error("coordinate is NaN or infinite")]
    InvalidCoordinate,
}
