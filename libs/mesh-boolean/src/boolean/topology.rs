//! Edge-centric topology of a triangle mesh.

use std::collections::HashMap;

use crate::mesh::{Mesh, MeshArena, VertId};

/// An undirected edge, canonicalized so the vertex with the smaller id comes
/// first. Hashing and equality use only the vertex ids, which keeps every
/// edge-keyed container reproducible from run to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Edge {
    v: [VertId; 2],
}

impl Edge {
    pub fn new(a: VertId, b: VertId) -> Self {
        if a.0 <= b.0 {
            Self { v: [a, b] }
        } else {
            Self { v: [b, a] }
        }
    }

    pub fn v0(&self) -> VertId {
        self.v[0]
    }

    pub fn v1(&self) -> VertId {
        self.v[1]
    }
}

/// Topology of a mesh that is all triangles: which triangles contain each
/// edge, and which edges touch each vertex.
///
/// An edge with one triangle is a boundary edge, with two a manifold edge,
/// with three or more a non-manifold edge.
#[derive(Debug, Default)]
pub struct TriMeshTopology {
    edge_tri: HashMap<Edge, Vec<usize>>,
    vert_edges: HashMap<VertId, Vec<Edge>>,
}

impl TriMeshTopology {
    pub fn new(tm: &Mesh, arena: &MeshArena) -> Self {
        // If everything were manifold, E = 3F/2 and V = F/2; allowing for
        // non-manifold input, E = 2F and V = F are safe overestimates.
        let mut topo = TriMeshTopology {
            edge_tri: HashMap::with_capacity(2 * tm.face_count()),
            vert_edges: HashMap::with_capacity(tm.face_count()),
        };
        for t in 0..tm.face_count() {
            let tri = arena.face(tm.face(t));
            debug_assert!(tri.is_tri());
            for i in 0..3 {
                let v = tri.vert(i);
                let vnext = tri.vert((i + 1) % 3);
                let e = Edge::new(v, vnext);
                let edges = topo.vert_edges.entry(v).or_default();
                if !edges.contains(&e) {
                    edges.push(e);
                }
                let tris = topo.edge_tri.entry(e).or_default();
                if !tris.contains(&t) {
                    tris.push(t);
                }
            }
        }
        topo
    }

    /// Triangles containing `e` in either orientation, in first-appearance
    /// order.
    pub fn edge_tris(&self, e: Edge) -> Option<&Vec<usize>> {
        self.edge_tri.get(&e)
    }

    /// If `e` is manifold, the triangle on it other than `t`.
    pub fn other_tri_if_manifold(&self, e: Edge, t: usize) -> Option<usize> {
        match self.edge_tri.get(&e) {
            Some(tris) if tris.len() == 2 => {
                Some(if tris[0] == t { tris[1] } else { tris[0] })
            }
            _ => None,
        }
    }

    /// Edges incident to `v`, in first-appearance order.
    pub fn vert_edges(&self, v: VertId) -> &[Edge] {
        self.vert_edges.get(&v).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Total of all `edge_tris` list lengths; equals `3 * face_count` for a
    /// triangle mesh in which no triangle repeats an edge.
    pub fn edge_tri_total(&self) -> usize {
        self.edge_tri.values().map(Vec::len).sum()
    }

    pub fn edge_count(&self) -> usize {
        self.edge_tri.len()
    }
}
