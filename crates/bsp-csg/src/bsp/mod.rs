//! Binary Space Partitioning trees for boolean operations on solids.
//!
//! A [`Bsp`] partitions space with the planes of a closed solid's polygons.
//! Polygon batches can be clipped against it to keep the parts inside or
//! outside the solid, which is the building block of union, intersection
//! and subtraction (see [`crate::Mesh::union`] and friends).
//!
//! # Example
//!
//! ```ignore
//! use bsp_csg::Mesh;
//! use bsp_csg::bsp::{Bsp, ClipRule};
//! use nalgebra::{Point3, Vector3};
//!
//! let a = Mesh::cuboid(Point3::origin(), Vector3::new(1.0, 1.0, 1.0), ())?;
//! let b = Mesh::cuboid(Point3::new(0.5, 0.0, 0.0), Vector3::new(1.0, 1.0, 1.0), ())?;
//!
//! let tree = Bsp::new(&b);
//! let outside_b = tree.clip(a.polygons().to_vec(), ClipRule::GreaterThan);
//! ```
//!
//! # Architecture
//!
//! - [`Bsp`]: the arena holding every node and the root handle
//! - [`BspNode`]: a splitting plane plus the polygons lying on it
//! - [`ClipRule`]: which fragments a clip pass keeps
//! - [`Polygons`]: depth-first iterator over the stored polygons

mod build;
mod clip;
mod iter;
mod node;
mod transform;
mod tree;

pub use clip::ClipRule;
pub use iter::Polygons;
pub use node::{faces_same_direction, BspNode, NodeId};
pub use tree::{Bsp, PointLocation};
