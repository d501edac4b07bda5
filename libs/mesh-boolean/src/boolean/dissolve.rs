//! Reassembly of result triangles into polygonal faces.
//!
//! The extractor outputs triangles. Grouped by the input face they came
//! from, those triangles are merged back into polygons by dissolving edges
//! that were introduced by triangulation (recognizable by their `NO_INDEX`
//! edge origin), as long as each dissolve leaves a structurally valid
//! polygon mesh. Afterwards, synthetic degree-2 vertices that are exactly
//! collinear with their neighbours are erased.

use std::collections::HashMap;

use crate::mesh::{FaceData, FaceId, Mesh, MeshArena, VertId, NO_INDEX};

/// An edge of the merge state: canonical vertex pair, squared length from
/// the approximate coordinates, current left/right faces, a representative
/// edge origin, and whether dissolving it is allowed at all.
#[derive(Debug, Clone)]
struct MergeEdge {
    len_squared: f64,
    v1: VertId,
    v2: VertId,
    left_face: Option<usize>,
    right_face: Option<usize>,
    orig: u32,
    dissolvable: bool,
}

impl MergeEdge {
    fn new(va: VertId, vb: VertId) -> Self {
        let (v1, v2) = if va.0 < vb.0 { (va, vb) } else { (vb, va) };
        MergeEdge {
            len_squared: 0.0,
            v1,
            v2,
            left_face: None,
            right_face: None,
            orig: NO_INDEX,
            dissolvable: false,
        }
    }
}

/// A face being merged: its current vertex cycle, the merge-state edge at
/// each position, and a forwarding index once it has been merged away.
#[derive(Debug, Clone, Default)]
struct MergeFace {
    vert: Vec<VertId>,
    edge: Vec<usize>,
    merge_to: Option<usize>,
    orig: u32,
}

#[derive(Debug, Default)]
struct FaceMergeState {
    face: Vec<MergeFace>,
    edge: Vec<MergeEdge>,
    edge_map: HashMap<(u32, u32), usize>,
}

fn init_face_merge_state(fms: &mut FaceMergeState, tris: &[usize], tm: &Mesh, arena: &MeshArena) {
    fms.face.reserve(tris.len() + 1);
    fms.edge.reserve(3 * tris.len());
    fms.edge_map.reserve(3 * tris.len());
    for &t in tris {
        let tri = arena.face(tm.face(t));
        debug_assert!(tri.is_tri());
        let f = fms.face.len();
        fms.face.push(MergeFace {
            vert: tri.verts.clone(),
            edge: Vec::with_capacity(3),
            merge_to: None,
            orig: tri.orig,
        });
        for i in 0..3 {
            let inext = (i + 1) % 3;
            let va = fms.face[f].vert[i];
            let vb = fms.face[f].vert[inext];
            let new_me = MergeEdge::new(va, vb);
            let canon_vs = (new_me.v1.0, new_me.v2.0);
            let me_index = match fms.edge_map.get(&canon_vs) {
                Some(&idx) => idx,
                None => {
                    let mut me = new_me;
                    let vec = arena.vert(me.v2).co - arena.vert(me.v1).co;
                    me.len_squared = vec.length_squared();
                    me.orig = tri.edge_orig[i];
                    me.dissolvable = me.orig == NO_INDEX;
                    fms.edge.push(me);
                    let idx = fms.edge.len() - 1;
                    fms.edge_map.insert(canon_vs, idx);
                    idx
                }
            };
            let me = &mut fms.edge[me_index];
            if me.dissolvable && tri.edge_orig[i] != NO_INDEX {
                me.dissolvable = false;
                me.orig = tri.edge_orig[i];
            }
            // The triangle is on the edge's left or right depending on
            // which direction it traverses the edge.
            if me.v1 == va {
                debug_assert!(me.left_face.is_none());
                me.left_face = Some(f);
            } else {
                debug_assert!(me.right_face.is_none());
                me.right_face = Some(f);
            }
            fms.face[f].edge.push(me_index);
        }
    }
}

/// A dissolve is allowed only if it leaves a valid polygon mesh: it must
/// not create a face with two disconnected boundary parts (another edge
/// already joins the same two faces) and must not create a face with a
/// repeated vertex (the two faces share a vertex besides the edge ends).
fn dissolve_leaves_valid_mesh(fms: &FaceMergeState, me_index: usize) -> bool {
    let me = &fms.edge[me_index];
    let (Some(left), Some(right)) = (me.left_face, me.right_face) else {
        return false;
    };
    let mf_left = &fms.face[left];
    let mf_right = &fms.face[right];
    let a_edge_start = mf_left
        .edge
        .iter()
        .position(|&x| x == me_index)
        .expect("edge must occur in its left face");
    let alen = mf_left.vert.len();

    let mut a_e_index = (a_edge_start + 1) % alen;
    while a_e_index != a_edge_start {
        if fms.edge[mf_left.edge[a_e_index]].right_face == me.right_face {
            return false;
        }
        a_e_index = (a_e_index + 1) % alen;
    }
    for &a_v in &mf_left.vert {
        if a_v != me.v1 && a_v != me.v2 && mf_right.vert.contains(&a_v) {
            return false;
        }
    }
    true
}

/// Removes the shared edge `me_index`, splicing the right face's boundary
/// into the left face's. The spliced edges are retargeted at the merged
/// face and the right face is marked as merged away.
fn splice_faces(fms: &mut FaceMergeState, me_index: usize) {
    let me = fms.edge[me_index].clone();
    let left = me.left_face.expect("dissolving edge needs a left face");
    let right = me.right_face.expect("dissolving edge needs a right face");
    let left_vert = fms.face[left].vert.clone();
    let left_edge = fms.face[left].edge.clone();
    let right_vert = fms.face[right].vert.clone();
    let right_edge = fms.face[right].edge.clone();
    let a_edge_start = left_edge
        .iter()
        .position(|&x| x == me_index)
        .expect("edge must occur in its left face");
    let b_edge_start = right_edge
        .iter()
        .position(|&x| x == me_index)
        .expect("edge must occur in its right face");
    let alen = left_vert.len();
    let blen = right_vert.len();

    let mut splice_vert = Vec::with_capacity(alen + blen - 2);
    let mut splice_edge = Vec::with_capacity(alen + blen - 2);
    for ai in 0..a_edge_start {
        splice_vert.push(left_vert[ai]);
        splice_edge.push(left_edge[ai]);
    }
    let mut bi = b_edge_start + 1;
    while bi != b_edge_start {
        if bi >= blen {
            bi = 0;
            if bi == b_edge_start {
                break;
            }
        }
        splice_vert.push(right_vert[bi]);
        splice_edge.push(right_edge[bi]);
        let spliced = &mut fms.edge[right_edge[bi]];
        if right_vert[bi] == spliced.v1 {
            spliced.left_face = Some(left);
        } else {
            spliced.right_face = Some(left);
        }
        bi += 1;
    }
    for ai in (a_edge_start + 1)..alen {
        splice_vert.push(left_vert[ai]);
        splice_edge.push(left_edge[ai]);
    }

    fms.face[right].merge_to = Some(left);
    fms.face[left].vert = splice_vert;
    fms.face[left].edge = splice_edge;
    fms.edge[me_index].left_face = None;
    fms.edge[me_index].right_face = None;
}

/// Dissolves as many dissolvable edges as validity allows, longest first.
/// Longer edges first tends to avoid slivers with extreme angles in the
/// final polygons.
fn do_dissolve(fms: &mut FaceMergeState) {
    let mut dissolve_edges: Vec<usize> = (0..fms.edge.len())
        .filter(|&e| fms.edge[e].dissolvable)
        .collect();
    if dissolve_edges.is_empty() {
        return;
    }
    dissolve_edges.sort_by(|&a, &b| fms.edge[b].len_squared.total_cmp(&fms.edge[a].len_squared));
    for me_index in dissolve_edges {
        let me = &fms.edge[me_index];
        if me.left_face.is_none() || me.right_face.is_none() {
            continue;
        }
        if !dissolve_leaves_valid_mesh(fms, me_index) {
            continue;
        }
        splice_faces(fms, me_index);
    }
}

/// If `tri1` and `tri2` share an edge in opposite orientation, the
/// positions in each where that edge starts.
fn find_tris_common_edge(tri1: &FaceData, tri2: &FaceData) -> Option<(usize, usize)> {
    for i in 0..3 {
        for j in 0..3 {
            if tri1.vert((i + 1) % 3) == tri2.vert(j) && tri1.vert(i) == tri2.vert((j + 1) % 3) {
                return Some((i, j));
            }
        }
    }
    None
}

fn cyclic_match(seq: &[VertId], face: &FaceData) -> bool {
    if seq.len() != face.len() {
        return false;
    }
    let n = seq.len();
    (0..n).any(|shift| (0..n).all(|i| seq[(i + shift) % n] == face.vert(i)))
}

/// Merges the triangles that came from one input face into as few polygons
/// as possible.
///
/// Two fast paths: a single triangle stays as-is, and two triangles that
/// are an input quad split along a synthetic diagonal give back the
/// original quad. Everything else goes through the merge state.
fn merge_tris_for_face(
    tris: &[usize],
    tm: &Mesh,
    pm_in: &Mesh,
    arena: &mut MeshArena,
) -> Vec<FaceId> {
    if tris.len() == 1 {
        return vec![tm.face(tris[0])];
    }
    if tris.len() == 2 {
        let tri1 = arena.face(tm.face(tris[0]));
        let tri2 = arena.face(tm.face(tris[1]));
        if tri1.orig != NO_INDEX && (tri1.orig as usize) < pm_in.face_count() {
            let in_face_id = pm_in.face(tri1.orig as usize);
            let in_face = arena.face(in_face_id);
            if in_face.len() == 4 {
                if let Some((i0, j0)) = find_tris_common_edge(tri1, tri2) {
                    if tri1.edge_orig[i0] == NO_INDEX {
                        let i1 = (i0 + 1) % 3;
                        let i2 = (i0 + 2) % 3;
                        let j2 = (j0 + 2) % 3;
                        let quad = [
                            tri1.vert(i1),
                            tri1.vert(i2),
                            tri1.vert(i0),
                            tri2.vert(j2),
                        ];
                        if cyclic_match(&quad, in_face) {
                            return vec![in_face_id];
                        }
                    }
                }
            }
        }
    }

    let mut fms = FaceMergeState::default();
    init_face_merge_state(&mut fms, tris, tm, arena);
    do_dissolve(&mut fms);
    let mut ans = Vec::new();
    for mf in &fms.face {
        if mf.merge_to.is_some() {
            continue;
        }
        let edge_orig: Vec<u32> = mf.edge.iter().map(|&e| fms.edge[e].orig).collect();
        ans.push(arena.add_face(mf.vert.clone(), mf.orig, edge_orig));
    }
    ans
}

/// Marks the vertices of `pm_out` that can be erased: synthetic, used with
/// the same two neighbours everywhere they appear, and exactly collinear
/// with those neighbours. Returns the marks and their count.
fn find_dissolve_verts(pm_out: &mut Mesh, arena: &MeshArena) -> (Vec<bool>, usize) {
    pm_out.populate_verts(arena);
    let nverts = pm_out.vert_count();
    let mut dissolve: Vec<bool> = (0..nverts)
        .map(|i| arena.vert(pm_out.vert(i)).orig == NO_INDEX)
        .collect();
    let mut neighbors: Vec<Option<(VertId, VertId)>> = vec![None; nverts];
    for &f in pm_out.faces() {
        let face = arena.face(f);
        for i in 0..face.len() {
            let v = face.vert(i);
            let v_index = pm_out
                .lookup_vert(v)
                .expect("face vertex must be in the populated index");
            if !dissolve[v_index] {
                continue;
            }
            let n1 = face.vert(face.next_pos(i));
            let n2 = face.vert(face.prev_pos(i));
            match neighbors[v_index] {
                Some((f_n1, f_n2)) => {
                    if !((n1 == f_n2 && n2 == f_n1) || (n1 == f_n1 && n2 == f_n2)) {
                        dissolve[v_index] = false;
                    }
                }
                None => neighbors[v_index] = Some((n1, n2)),
            }
        }
    }
    let mut count = 0;
    for v_out in 0..nverts {
        if !dissolve[v_out] {
            continue;
        }
        dissolve[v_out] = false;
        if let Some((nb1, nb2)) = neighbors[v_out] {
            let co1 = &arena.vert(nb1).co_exact;
            let co2 = &arena.vert(nb2).co_exact;
            let co = &arena.vert(pm_out.vert(v_out)).co_exact;
            let dir1 = co - co1;
            let dir2 = co2 - co;
            if dir1.cross(&dir2).is_zero() {
                dissolve[v_out] = true;
                count += 1;
            }
        }
    }
    (dissolve, count)
}

/// Erases the marked vertices from every face they appear in.
fn dissolve_verts(pm: &mut Mesh, dissolve: &[bool], arena: &mut MeshArena) {
    for f in 0..pm.face_count() {
        let verts = arena.face(pm.face(f)).verts.clone();
        let mut face_pos_erase = Vec::with_capacity(verts.len());
        let mut num_erase = 0;
        for v in verts {
            let v_index = pm
                .lookup_vert(v)
                .expect("face vertex must be in the populated index");
            let erase = dissolve[v_index];
            face_pos_erase.push(erase);
            if erase {
                num_erase += 1;
            }
        }
        if num_erase > 0 {
            pm.erase_face_positions(f, &face_pos_erase, arena);
        }
    }
    pm.set_dirty_verts();
}

/// Converts the boolean's triangle output back into a polygonal mesh.
///
/// Triangles are grouped by the input face they came from, each group is
/// merged by dissolving synthetic edges, and finally synthetic collinear
/// degree-2 vertices left over from dissolved diagonals are erased.
pub fn polymesh_from_trimesh_with_dissolve(
    tm_out: &Mesh,
    pm_in: &Mesh,
    arena: &mut MeshArena,
) -> Mesh {
    let tot_in_face = pm_in.face_count();
    let mut face_output_tris: Vec<Vec<usize>> = vec![Vec::new(); tot_in_face];
    let mut orphans: Vec<FaceId> = Vec::new();
    for t in 0..tm_out.face_count() {
        let orig = arena.face(tm_out.face(t)).orig;
        if (orig as usize) < tot_in_face {
            face_output_tris[orig as usize].push(t);
        } else {
            debug_assert!(orig == NO_INDEX, "face orig out of range");
            orphans.push(tm_out.face(t));
        }
    }

    let mut out_faces: Vec<FaceId> = Vec::new();
    for in_f in 0..tot_in_face {
        if face_output_tris[in_f].is_empty() {
            continue;
        }
        out_faces.extend(merge_tris_for_face(
            &face_output_tris[in_f],
            tm_out,
            pm_in,
            arena,
        ));
    }
    out_faces.extend(orphans);
    let mut pm_out = Mesh::new(out_faces);

    let (v_dissolve, count_dissolve) = find_dissolve_verts(&mut pm_out, arena);
    if count_dissolve > 0 {
        log::debug!("dissolving {count_dissolve} collinear synthetic vertices");
        dissolve_verts(&mut pm_out, &v_dissolve, arena);
    }
    pm_out
}
