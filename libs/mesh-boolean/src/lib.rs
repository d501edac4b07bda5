//! # mesh-boolean
//!
//! An exact-arithmetic boolean engine for closed triangle and polygon
//! meshes: union, intersection and difference of any number of input
//! shapes, computed over exact rational coordinates so every geometric
//! decision is deterministic and machine independent.
//!
//! ## Architecture
//!
//! ```text
//! polygon mesh -> triangulate -> (intersection pre-pass, external)
//!   -> topology -> patches -> cells -> ambient cell -> windings
//!   -> boundary extraction -> polygon reassembly with dissolve
//! ```
//!
//! The engine starts from a conforming triangle mesh in which every
//! triangle/triangle intersection already appears as a shared edge; the
//! pre-pass that produces such a mesh is a collaborator behind
//! [`intersect::TrimeshIntersect`]. From there, triangles are grouped into
//! manifold patches, 3-space is partitioned into cells by sorting triangles
//! radially around non-manifold edges, per-shape winding numbers are
//! propagated from the unbounded cell, and the triangles separating kept
//! from discarded cells form the result, reassembled into polygons.
//!
//! ## Example
//!
//! ```rust
//! use mesh_boolean::boolean::{boolean_mesh, BoolOpType};
//! use mesh_boolean::intersect::PreIntersected;
//! use mesh_boolean::mesh::MeshArena;
//! use mesh_boolean::primitives::{axis_box, MeshBuilder};
//!
//! // Two exactly coincident cubes; their union is the cube itself.
//! let mut arena = MeshArena::new();
//! let mut builder = MeshBuilder::new();
//! axis_box(&mut arena, &mut builder, [0, 0, 0], [1, 1, 1]);
//! axis_box(&mut arena, &mut builder, [0, 0, 0], [1, 1, 1]);
//! let pm = builder.build();
//!
//! let shape_of = |f: usize| if f < 6 { 0 } else { 1 };
//! let out = boolean_mesh(
//!     &pm,
//!     BoolOpType::Union,
//!     2,
//!     &shape_of,
//!     false,
//!     None,
//!     &PreIntersected,
//!     &mut arena,
//! );
//! assert_eq!(out.face_count(), 6);
//! ```

pub mod boolean;
pub mod cdt;
pub mod error;
pub mod exact;
pub mod export;
pub mod intersect;
pub mod mesh;
pub mod primitives;
pub mod triangulate;

pub use boolean::{boolean_mesh, boolean_trimesh, BoolOpType};
pub use error::BooleanError;
pub use export::{mesh_to_buffers, MeshBuffers};
pub use intersect::{PreIntersected, TrimeshIntersect};
pub use mesh::{FaceId, Mesh, MeshArena, VertId, NO_INDEX};
