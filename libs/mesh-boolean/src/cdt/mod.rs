//! # Planar triangulation of polygon faces
//!
//! Exact-arithmetic triangulation of polygon interiors, used to reduce
//! general polygonal input faces to triangles. The result reports, for
//! every output vertex and edge, which input vertex or boundary edge it
//! came from, so diagonals introduced here can be recognized (and later
//! dissolved) by their missing edge origin.
//!
//! Output triangles keep the winding of the input polygon. The current
//! implementation clips ears with exact orientation tests; input polygons
//! are expected to be simple.

use crate::exact::{orient2d, EVec2, Orientation};
use std::collections::HashMap;

/// Input to [`delaunay_2d_calc`]: a shared vertex pool and one or more
/// polygon faces given as vertex index cycles.
#[derive(Debug, Clone, Default)]
pub struct CdtInput {
    pub vert: Vec<EVec2>,
    pub face: Vec<Vec<usize>>,
}

/// Which parts of the arrangement to output. Only the polygon interiors
/// are supported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CdtOutputMode {
    Inside,
}

/// Triangulation result.
///
/// `vert_orig[v]` lists the input vertices merged into output vertex `v`.
/// `edge_orig[e]` lists the input face boundary edges that output edge `e`
/// lies on; empty for diagonals.
#[derive(Debug, Clone, Default)]
pub struct CdtResult {
    pub vert: Vec<EVec2>,
    pub edge: Vec<(usize, usize)>,
    pub face: Vec<Vec<usize>>,
    pub vert_orig: Vec<Vec<usize>>,
    pub edge_orig: Vec<Vec<usize>>,
}

/// Triangulates the interiors of the input faces.
pub fn delaunay_2d_calc(input: &CdtInput, _mode: CdtOutputMode) -> CdtResult {
    let mut result = CdtResult {
        vert: input.vert.clone(),
        vert_orig: (0..input.vert.len()).map(|i| vec![i]).collect(),
        ..CdtResult::default()
    };

    // Boundary edges of the input faces, canonical vertex pair -> position
    // in the face cycle.
    let mut boundary: HashMap<(usize, usize), usize> = HashMap::new();
    for poly in &input.face {
        let n = poly.len();
        for k in 0..n {
            boundary.insert(canon(poly[k], poly[(k + 1) % n]), k);
        }
    }

    let mut edge_index: HashMap<(usize, usize), usize> = HashMap::new();
    for poly in &input.face {
        for tri in clip_ears(&input.vert, poly) {
            for i in 0..3 {
                let key = canon(tri[i], tri[(i + 1) % 3]);
                if !edge_index.contains_key(&key) {
                    edge_index.insert(key, result.edge.len());
                    result.edge.push(key);
                    result
                        .edge_orig
                        .push(boundary.get(&key).map(|&k| vec![k]).unwrap_or_default());
                }
            }
            result.face.push(tri.to_vec());
        }
    }
    result
}

fn canon(a: usize, b: usize) -> (usize, usize) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

/// Ear clipping over vertex indices, preserving the winding of `poly`.
fn clip_ears(verts: &[EVec2], poly: &[usize]) -> Vec<[usize; 3]> {
    let mut tris = Vec::new();
    if poly.len() < 3 {
        return tris;
    }

    let winding = polygon_winding(verts, poly);
    let mut rest: Vec<usize> = poly.to_vec();
    if winding == Orientation::Zero {
        // Degenerate polygon; emit a fan and let downstream filtering cope.
        fan(&rest, &mut tris);
        return tris;
    }

    while rest.len() > 3 {
        match find_ear(verts, &rest, winding) {
            EarSearch::Ear(i) => {
                let n = rest.len();
                tris.push([rest[(i + n - 1) % n], rest[i], rest[(i + 1) % n]]);
                rest.remove(i);
            }
            EarSearch::Collinear(i) => {
                rest.remove(i);
            }
            EarSearch::None => {
                fan(&rest, &mut tris);
                return tris;
            }
        }
    }
    tris.push([rest[0], rest[1], rest[2]]);
    tris
}

enum EarSearch {
    Ear(usize),
    Collinear(usize),
    None,
}

fn find_ear(verts: &[EVec2], rest: &[usize], winding: Orientation) -> EarSearch {
    let n = rest.len();
    let mut collinear = None;
    for i in 0..n {
        let p = &verts[rest[(i + n - 1) % n]];
        let c = &verts[rest[i]];
        let nx = &verts[rest[(i + 1) % n]];
        let turn = orient2d(p, c, nx);
        if turn == Orientation::Zero {
            collinear.get_or_insert(i);
            continue;
        }
        if turn != winding {
            continue;
        }
        let blocked = (0..n)
            .filter(|&j| j != i && j != (i + n - 1) % n && j != (i + 1) % n)
            .any(|j| in_triangle(p, c, nx, &verts[rest[j]], winding));
        if !blocked {
            return EarSearch::Ear(i);
        }
    }
    match collinear {
        Some(i) => EarSearch::Collinear(i),
        None => EarSearch::None,
    }
}

/// Closed point-in-triangle test for a triangle wound `winding`.
fn in_triangle(a: &EVec2, b: &EVec2, c: &EVec2, p: &EVec2, winding: Orientation) -> bool {
    [orient2d(a, b, p), orient2d(b, c, p), orient2d(c, a, p)]
        .iter()
        .all(|&o| o == winding || o == Orientation::Zero)
}

fn polygon_winding(verts: &[EVec2], poly: &[usize]) -> Orientation {
    let n = poly.len();
    let mut doubled_area = crate::exact::int(0);
    for i in 0..n {
        doubled_area = doubled_area + verts[poly[i]].cross(&verts[poly[(i + 1) % n]]);
    }
    Orientation::of(&doubled_area)
}

fn fan(rest: &[usize], tris: &mut Vec<[usize; 3]>) {
    for i in 1..rest.len() - 1 {
        tris.push([rest[0], rest[i], rest[i + 1]]);
    }
}
