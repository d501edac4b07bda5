//! Exact rational 3-vector.

use std::ops::{Add, Neg, Sub};

use glam::DVec3;

use super::{to_f64, Scalar};

/// A 3-vector with exact rational components.
///
/// Not `Copy`: components are arbitrary-precision rationals. Arithmetic is
/// implemented on references to avoid needless clones.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EVec3 {
    pub x: Scalar,
    pub y: Scalar,
    pub z: Scalar,
}

impl EVec3 {
    pub fn new(x: Scalar, y: Scalar, z: Scalar) -> Self {
        Self { x, y, z }
    }

    /// Vector with integer components.
    ///
    /// # Examples
    /// ```
    /// use mesh_boolean::exact::{int, EVec3};
    /// let v = EVec3::from_ints(1, 2, 3);
    /// assert_eq!(v.y, int(2));
    /// ```
    pub fn from_ints(x: i64, y: i64, z: i64) -> Self {
        Self::new(super::int(x), super::int(y), super::int(z))
    }

    pub fn cross(&self, other: &EVec3) -> EVec3 {
        EVec3::new(
            &self.y * &other.z - &self.z * &other.y,
            &self.z * &other.x - &self.x * &other.z,
            &self.x * &other.y - &self.y * &other.x,
        )
    }

    pub fn dot(&self, other: &EVec3) -> Scalar {
        &self.x * &other.x + &self.y * &other.y + &self.z * &other.z
    }

    pub fn is_zero(&self) -> bool {
        use num_traits::Zero;
        self.x.is_zero() && self.y.is_zero() && self.z.is_zero()
    }

    /// Component along axis `i` (0 = x, 1 = y, 2 = z).
    pub fn axis(&self, i: usize) -> &Scalar {
        match i {
            0 => &self.x,
            1 => &self.y,
            _ => &self.z,
        }
    }

    /// Approximate float mirror of this point.
    pub fn to_dvec3(&self) -> DVec3 {
        DVec3::new(to_f64(&self.x), to_f64(&self.y), to_f64(&self.z))
    }
}

impl Add<&EVec3> for &EVec3 {
    type Output = EVec3;

    fn add(self, rhs: &EVec3) -> EVec3 {
        EVec3::new(&self.x + &rhs.x, &self.y + &rhs.y, &self.z + &rhs.z)
    }
}

impl Sub<&EVec3> for &EVec3 {
    type Output = EVec3;

    fn sub(self, rhs: &EVec3) -> EVec3 {
        EVec3::new(&self.x - &rhs.x, &self.y - &rhs.y, &self.z - &rhs.z)
    }
}

impl Neg for &EVec3 {
    type Output = EVec3;

    fn neg(self) -> EVec3 {
        EVec3::new(-&self.x, -&self.y, -&self.z)
    }
}
