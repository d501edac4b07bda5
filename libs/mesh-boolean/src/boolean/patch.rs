//! Partitioning triangles into manifold patches.

use std::collections::HashMap;

use crate::mesh::{Mesh, MeshArena, NO_INDEX};

use super::topology::{Edge, TriMeshTopology};

/// A maximal set of triangles connected through manifold edges, plus the
/// cells on its two sides once cell construction has run.
///
/// The "above" side is the half-space the first triangle's counterclockwise
/// normal points into.
#[derive(Debug, Default)]
pub struct Patch {
    tris: Vec<usize>,
    pub cell_above: u32,
    pub cell_below: u32,
}

impl Patch {
    fn new() -> Self {
        Self {
            tris: Vec::new(),
            cell_above: NO_INDEX,
            cell_below: NO_INDEX,
        }
    }

    pub fn tris(&self) -> &[usize] {
        &self.tris
    }

    pub fn tri(&self, i: usize) -> usize {
        self.tris[i]
    }

    pub fn tot_tri(&self) -> usize {
        self.tris.len()
    }

    /// Cell on the given side; `above` when `side_above` is true.
    pub fn cell_on_side(&self, side_above: bool) -> u32 {
        if side_above {
            self.cell_above
        } else {
            self.cell_below
        }
    }

    pub fn set_cell_on_side(&mut self, side_above: bool, c: u32) {
        if side_above {
            self.cell_above = c;
        } else {
            self.cell_below = c;
        }
    }
}

/// All patches of a mesh, the patch each triangle belongs to, and a
/// representative shared edge for each pair of patches that meet along at
/// least one non-manifold edge.
#[derive(Debug, Default)]
pub struct PatchesInfo {
    patches: Vec<Patch>,
    tri_patch: Vec<u32>,
    pp_edge: HashMap<(u32, u32), Edge>,
}

impl PatchesInfo {
    fn new(ntri: usize) -> Self {
        Self {
            patches: Vec::new(),
            tri_patch: vec![NO_INDEX; ntri],
            pp_edge: HashMap::new(),
        }
    }

    pub fn tri_patch(&self, t: usize) -> u32 {
        self.tri_patch[t]
    }

    pub fn tri_is_assigned(&self, t: usize) -> bool {
        self.tri_patch[t] != NO_INDEX
    }

    fn add_patch(&mut self) -> u32 {
        self.patches.push(Patch::new());
        (self.patches.len() - 1) as u32
    }

    fn grow_patch(&mut self, p: u32, t: usize) {
        self.tri_patch[t] = p;
        self.patches[p as usize].tris.push(t);
    }

    pub fn patch(&self, p: u32) -> &Patch {
        &self.patches[p as usize]
    }

    pub fn patch_mut(&mut self, p: u32) -> &mut Patch {
        &mut self.patches[p as usize]
    }

    pub fn tot_patch(&self) -> usize {
        self.patches.len()
    }

    /// Representative shared edge of patches `p` and `q`, if they meet
    /// along a non-manifold edge.
    pub fn patch_patch_edge(&self, p: u32, q: u32) -> Option<Edge> {
        self.pp_edge.get(&(p, q)).copied()
    }

    fn add_patch_patch_edge(&mut self, p: u32, q: u32, e: Edge) {
        self.pp_edge.insert((p, q), e);
        self.pp_edge.insert((q, p), e);
    }
}

/// Groups the triangles of `tm` into patches by growing across manifold
/// edges, and records one representative shared edge per incident patch
/// pair. Triangles are seeded in index order and grown with an index stack,
/// so the partition is reproducible.
pub fn find_patches(tm: &Mesh, arena: &MeshArena, tmtopo: &TriMeshTopology) -> PatchesInfo {
    let ntri = tm.face_count();
    let mut pinfo = PatchesInfo::new(ntri);
    let mut grow: Vec<usize> = Vec::new();
    for t in 0..ntri {
        if pinfo.tri_is_assigned(t) {
            continue;
        }
        let cur_patch = pinfo.add_patch();
        grow.push(t);
        while let Some(tcand) = grow.pop() {
            if pinfo.tri_is_assigned(tcand) {
                continue;
            }
            pinfo.grow_patch(cur_patch, tcand);
            let tri = arena.face(tm.face(tcand));
            for i in 0..3 {
                let e = Edge::new(tri.vert(i), tri.vert((i + 1) % 3));
                match tmtopo.other_tri_if_manifold(e, tcand) {
                    Some(t_other) => {
                        if !pinfo.tri_is_assigned(t_other) {
                            grow.push(t_other);
                        }
                    }
                    None => {
                        // Non-manifold edge: record any patch incidences we
                        // can already see.
                        let Some(etris) = tmtopo.edge_tris(e) else {
                            continue;
                        };
                        for &t_other in etris {
                            if t_other == tcand || !pinfo.tri_is_assigned(t_other) {
                                continue;
                            }
                            let p_other = pinfo.tri_patch(t_other);
                            if p_other == cur_patch {
                                continue;
                            }
                            if pinfo.patch_patch_edge(cur_patch, p_other).is_none() {
                                pinfo.add_patch_patch_edge(cur_patch, p_other, e);
                            }
                        }
                    }
                }
            }
        }
    }
    log::debug!(
        "found {} patches over {} triangles",
        pinfo.tot_patch(),
        ntri
    );
    pinfo
}
