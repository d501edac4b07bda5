//! Exact rational 2-vector, used by the planar triangulation step.

use std::ops::{Add, Sub};

use super::Scalar;

/// A 2-vector with exact rational components.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EVec2 {
    pub x: Scalar,
    pub y: Scalar,
}

impl EVec2 {
    pub fn new(x: Scalar, y: Scalar) -> Self {
        Self { x, y }
    }

    pub fn from_ints(x: i64, y: i64) -> Self {
        Self::new(super::int(x), super::int(y))
    }

    /// 2D cross product (signed parallelogram area).
    pub fn cross(&self, other: &EVec2) -> Scalar {
        &self.x * &other.y - &self.y * &other.x
    }
}

impl Add<&EVec2> for &EVec2 {
    type Output = EVec2;

    fn add(self, rhs: &EVec2) -> EVec2 {
        EVec2::new(&self.x + &rhs.x, &self.y + &rhs.y)
    }
}

impl Sub<&EVec2> for &EVec2 {
    type Output = EVec2;

    fn sub(self, rhs: &EVec2) -> EVec2 {
        EVec2::new(&self.x - &rhs.x, &self.y - &rhs.y)
    }
}
