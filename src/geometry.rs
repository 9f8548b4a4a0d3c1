//! Coordinate helpers shared by the fragment pipeline and the model.
//!
//! All distances are Euclidean in display coordinates; the unit for the
//! editor's thresholds is the current average bond length.

use crate::mol::Mol;
use crate::traits::HasPosition2D;

/// Axis-aligned rectangle in display coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

pub fn distance(a: [f64; 2], b: [f64; 2]) -> f64 {
    let dx = b[0] - a[0];
    let dy = b[1] - a[1];
    (dx * dx + dy * dy).sqrt()
}

/// Distance from `p` to the segment `a`–`b`.
pub fn point_segment_distance(p: [f64; 2], a: [f64; 2], b: [f64; 2]) -> f64 {
    let ab = [b[0] - a[0], b[1] - a[1]];
    let len_sq = ab[0] * ab[0] + ab[1] * ab[1];
    if len_sq == 0.0 {
        return distance(p, a);
    }
    let t = ((p[0] - a[0]) * ab[0] + (p[1] - a[1]) * ab[1]) / len_sq;
    let t = t.clamp(0.0, 1.0);
    distance(p, [a[0] + t * ab[0], a[1] + t * ab[1]])
}

/// Mean distance between bonded atom pairs; `0.0` for a bond-free graph.
pub fn average_bond_length<A: HasPosition2D, B>(mol: &Mol<A, B>) -> f64 {
    let mut sum = 0.0;
    let mut count = 0usize;
    for edge in mol.bonds() {
        if let Some((a, b)) = mol.bond_endpoints(edge) {
            sum += distance(mol.atom(a).position(), mol.atom(b).position());
            count += 1;
        }
    }
    if count == 0 {
        0.0
    } else {
        sum / count as f64
    }
}

/// Mean atom position; `None` for an empty graph.
pub fn center_of_gravity<A: HasPosition2D, B>(mol: &Mol<A, B>) -> Option<[f64; 2]> {
    if mol.atom_count() == 0 {
        return None;
    }
    let mut sum = [0.0, 0.0];
    for idx in mol.atoms() {
        let p = mol.atom(idx).position();
        sum[0] += p[0];
        sum[1] += p[1];
    }
    let n = mol.atom_count() as f64;
    Some([sum[0] / n, sum[1] / n])
}

pub fn translate_coords<A: HasPosition2D, B>(mol: &mut Mol<A, B>, dx: f64, dy: f64) {
    for idx in mol.atoms().collect::<Vec<_>>() {
        let p = mol.atom(idx).position();
        mol.atom_mut(idx).set_position([p[0] + dx, p[1] + dy]);
    }
}

pub fn scale_coords<A: HasPosition2D, B>(mol: &mut Mol<A, B>, sx: f64, sy: f64) {
    for idx in mol.atoms().collect::<Vec<_>>() {
        let p = mol.atom(idx).position();
        mol.atom_mut(idx).set_position([p[0] * sx, p[1] * sy]);
    }
}
