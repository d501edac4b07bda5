//! Exact rational arithmetic for geometric predicates.
//!
//! All topological decisions in the boolean engine run on exact rational
//! coordinates so that results are deterministic and machine independent.
//! This module is the only place the backing arithmetic crates are named;
//! the rest of the engine consumes `Scalar`, the vector types and the
//! predicates, so the backend can be swapped without touching the core.

pub mod vec2;
pub mod vec3;

pub use vec2::EVec2;
pub use vec3::EVec3;

use num_bigint::BigInt;
use num_traits::{Signed, ToPrimitive, Zero};

/// Exact rational scalar. Always stored in reduced form, so equality and
/// hashing are structural.
pub type Scalar = num_rational::BigRational;

/// Builds a scalar from an integer.
///
/// # Examples
/// ```
/// use mesh_boolean::exact::int;
/// assert_eq!(int(2) + int(3), int(5));
/// ```
pub fn int(n: i64) -> Scalar {
    Scalar::from_integer(BigInt::from(n))
}

/// Builds the scalar `n / d`. Panics if `d` is zero.
///
/// # Examples
/// ```
/// use mesh_boolean::exact::{frac, int};
/// assert_eq!(frac(1, 2) + frac(1, 2), int(1));
/// ```
pub fn frac(n: i64, d: i64) -> Scalar {
    Scalar::new(BigInt::from(n), BigInt::from(d))
}

/// Nearest `f64` to a scalar, for the approximate coordinate mirror.
pub fn to_f64(s: &Scalar) -> f64 {
    s.to_f64().unwrap_or(f64::NAN)
}

/// Sign of an exact determinant or scalar expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    Negative,
    Zero,
    Positive,
}

impl Orientation {
    /// Classifies the sign of a scalar.
    pub fn of(s: &Scalar) -> Self {
        if s.is_zero() {
            Orientation::Zero
        } else if s.is_positive() {
            Orientation::Positive
        } else {
            Orientation::Negative
        }
    }
}

/// Exact 3D orientation test.
///
/// Returns the sign of the signed volume of the tetrahedron `(a, b, c, d)`:
/// `Positive` when `d` lies below the plane through `a`, `b`, `c` oriented so
/// that `a`, `b`, `c` appear counterclockwise seen from above.
pub fn orient3d(a: &EVec3, b: &EVec3, c: &EVec3, d: &EVec3) -> Orientation {
    let ad = a - d;
    let bd = b - d;
    let cd = c - d;
    let det = &ad.x * (&bd.y * &cd.z - &bd.z * &cd.y)
        - &ad.y * (&bd.x * &cd.z - &bd.z * &cd.x)
        + &ad.z * (&bd.x * &cd.y - &bd.y * &cd.x);
    Orientation::of(&det)
}

/// Exact 2D orientation test: sign of the area of triangle `(a, b, c)`,
/// `Positive` for counterclockwise.
pub fn orient2d(a: &EVec2, b: &EVec2, c: &EVec2) -> Orientation {
    let ab = b - a;
    let ac = c - a;
    Orientation::of(&(&ab.x * &ac.y - &ab.y * &ac.x))
}

/// Index of the axis with the largest absolute component of `v`.
/// Ties prefer the earlier axis.
pub fn dominant_axis(v: &EVec3) -> usize {
    let x = v.x.abs();
    let y = v.y.abs();
    let z = v.z.abs();
    if x >= y && x >= z {
        0
    } else if y >= z {
        1
    } else {
        2
    }
}
