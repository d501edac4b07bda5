//! # Mesh arena and mesh value type
//!
//! All vertices and faces live in a [`MeshArena`] and are addressed by typed
//! indices ([`VertId`], [`FaceId`]). Cross-references between topology
//! records are plain indices, which keeps the inherently cyclic adjacency
//! graphs free of ownership cycles.
//!
//! A [`Mesh`] is a value: an ordered list of face handles plus a lazily
//! built vertex index derived from those faces. Two vertex handles are equal
//! exactly when they refer to the same arena entry; `add_or_find_vert`
//! deduplicates by exact coordinate, so geometry built twice at the same
//! rational point shares one vertex.

use std::collections::HashMap;

use glam::DVec3;

use crate::exact::{EVec3, Scalar};

/// Invalid index sentinel for `orig` references and unresolved links.
pub const NO_INDEX: u32 = u32::MAX;

/// Handle of a vertex in the arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VertId(pub u32);

/// Handle of a face in the arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FaceId(pub u32);

/// A vertex: exact position, float mirror, stable id and input origin.
#[derive(Debug, Clone)]
pub struct Vert {
    /// Exact rational position; the source of truth for all predicates.
    pub co_exact: EVec3,
    /// Approximate position, used only for length metrics.
    pub co: DVec3,
    /// Stable integer id (the arena slot), used for hashing and canonical
    /// ordering.
    pub id: u32,
    /// Index of the input vertex this came from, or `NO_INDEX` if synthetic.
    pub orig: u32,
}

/// Support plane of a face: `norm · p + d = 0` with exact coefficients.
///
/// The normal is the (unnormalized) Newell sum, so its orientation follows
/// the face's vertex winding.
#[derive(Debug, Clone)]
pub struct FacePlane {
    pub norm: EVec3,
    pub d: Scalar,
}

/// A face: an ordered vertex cycle with per-side edge origins and a cached
/// support plane. A face is a triangle exactly when its length is 3.
#[derive(Debug, Clone)]
pub struct FaceData {
    pub verts: Vec<VertId>,
    /// Index of the input face this came from, or `NO_INDEX` if synthetic.
    pub orig: u32,
    /// For each side `i` (from vertex `i` to vertex `i+1`), the input edge it
    /// came from, or `NO_INDEX` for edges introduced by triangulation or
    /// intersection.
    pub edge_orig: Vec<u32>,
    pub plane: FacePlane,
}

impl FaceData {
    pub fn len(&self) -> usize {
        self.verts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.verts.is_empty()
    }

    pub fn is_tri(&self) -> bool {
        self.verts.len() == 3
    }

    pub fn vert(&self, i: usize) -> VertId {
        self.verts[i]
    }

    pub fn next_pos(&self, i: usize) -> usize {
        (i + 1) % self.verts.len()
    }

    pub fn prev_pos(&self, i: usize) -> usize {
        (i + self.verts.len() - 1) % self.verts.len()
    }

    /// True when `other` has the same vertex cycle up to rotation.
    /// Reflections do not match.
    pub fn cyclic_equal(&self, other: &FaceData) -> bool {
        if self.verts.len() != other.verts.len() {
            return false;
        }
        let n = self.verts.len();
        (0..n).any(|shift| (0..n).all(|i| self.verts[(i + shift) % n] == other.verts[i]))
    }
}

/// Owner of all vertices and faces.
#[derive(Debug, Default)]
pub struct MeshArena {
    verts: Vec<Vert>,
    faces: Vec<FaceData>,
    vert_lookup: HashMap<EVec3, VertId>,
}

impl MeshArena {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the vertex at `co_exact`, creating it if this exact point has
    /// not been seen before. The `orig` of an existing vertex is not
    /// modified.
    pub fn add_or_find_vert(&mut self, co_exact: EVec3, orig: u32) -> VertId {
        if let Some(&id) = self.vert_lookup.get(&co_exact) {
            return id;
        }
        let id = VertId(self.verts.len() as u32);
        let co = co_exact.to_dvec3();
        self.vert_lookup.insert(co_exact.clone(), id);
        self.verts.push(Vert {
            co_exact,
            co,
            id: id.0,
            orig,
        });
        id
    }

    /// Allocates a face over `verts` with the given origins, computing its
    /// support plane from the vertex cycle (Newell sum).
    pub fn add_face(&mut self, verts: Vec<VertId>, orig: u32, edge_orig: Vec<u32>) -> FaceId {
        debug_assert!(verts.len() >= 3);
        debug_assert_eq!(verts.len(), edge_orig.len());
        let plane = self.face_plane(&verts);
        let id = FaceId(self.faces.len() as u32);
        self.faces.push(FaceData {
            verts,
            orig,
            edge_orig,
            plane,
        });
        id
    }

    pub fn vert(&self, id: VertId) -> &Vert {
        &self.verts[id.0 as usize]
    }

    pub fn face(&self, id: FaceId) -> &FaceData {
        &self.faces[id.0 as usize]
    }

    pub fn vert_count(&self) -> usize {
        self.verts.len()
    }

    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    fn face_plane(&self, verts: &[VertId]) -> FacePlane {
        let n = verts.len();
        let mut norm = EVec3::from_ints(0, 0, 0);
        for i in 0..n {
            let a = &self.vert(verts[i]).co_exact;
            let b = &self.vert(verts[(i + 1) % n]).co_exact;
            norm = &norm + &a.cross(b);
        }
        let d = -norm.dot(&self.vert(verts[0]).co_exact);
        FacePlane { norm, d }
    }
}

/// An ordered sequence of faces with a lazily built vertex index.
#[derive(Debug, Clone, Default)]
pub struct Mesh {
    faces: Vec<FaceId>,
    verts: Vec<VertId>,
    vert_index: HashMap<VertId, usize>,
    verts_valid: bool,
}

impl Mesh {
    pub fn new(faces: Vec<FaceId>) -> Self {
        Self {
            faces,
            verts: Vec::new(),
            vert_index: HashMap::new(),
            verts_valid: false,
        }
    }

    pub fn faces(&self) -> &[FaceId] {
        &self.faces
    }

    pub fn face(&self, i: usize) -> FaceId {
        self.faces[i]
    }

    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.faces.is_empty()
    }

    /// Builds the vertex list and index from the faces. Vertices are listed
    /// in first-appearance order (faces in order, corners in order), which
    /// is reproducible.
    pub fn populate_verts(&mut self, arena: &MeshArena) {
        if self.verts_valid {
            return;
        }
        self.verts.clear();
        self.vert_index.clear();
        for &f in &self.faces {
            for &v in &arena.face(f).verts {
                if !self.vert_index.contains_key(&v) {
                    self.vert_index.insert(v, self.verts.len());
                    self.verts.push(v);
                }
            }
        }
        self.verts_valid = true;
    }

    /// Vertices in first-appearance order; call `populate_verts` first.
    pub fn verts(&self) -> &[VertId] {
        debug_assert!(self.verts_valid);
        &self.verts
    }

    pub fn vert_count(&self) -> usize {
        debug_assert!(self.verts_valid);
        self.verts.len()
    }

    pub fn vert(&self, i: usize) -> VertId {
        debug_assert!(self.verts_valid);
        self.verts[i]
    }

    /// Position of `v` in the vertex list, if present.
    pub fn lookup_vert(&self, v: VertId) -> Option<usize> {
        debug_assert!(self.verts_valid);
        self.vert_index.get(&v).copied()
    }

    /// Invalidates the vertex index after the face list changed.
    pub fn set_dirty_verts(&mut self) {
        self.verts_valid = false;
        self.verts.clear();
        self.vert_index.clear();
    }

    /// Replaces face `f` with a copy that drops every position where
    /// `erase` is true. The surviving side starting at a kept position keeps
    /// that position's edge origin.
    pub fn erase_face_positions(&mut self, f: usize, erase: &[bool], arena: &mut MeshArena) {
        let face = arena.face(self.faces[f]);
        debug_assert_eq!(erase.len(), face.len());
        let mut verts = Vec::with_capacity(face.len());
        let mut edge_orig = Vec::with_capacity(face.len());
        for i in 0..face.len() {
            if !erase[i] {
                verts.push(face.verts[i]);
                edge_orig.push(face.edge_orig[i]);
            }
        }
        if verts.len() < 3 || verts.len() == face.len() {
            return;
        }
        let orig = face.orig;
        let new_face = arena.add_face(verts, orig, edge_orig);
        self.faces[f] = new_face;
    }
}
