//! Boolean operations on polygonal solids using BSP (Binary Space Partitioning) trees.

pub mod bsp;
mod csg;
mod error;
mod lineage;
mod mesh;
mod plane;
mod polygon;
mod rng;
mod split;

pub use error::GeometryError;
pub use lineage::{LineageCounter, LineageId};
pub use mesh::{Bounds, Mesh};
pub use plane::{Classification, Plane3D, PlaneSide, PLANE_EPSILON};
pub use polygon::Polygon;
pub use rng::DeterministicRng;
