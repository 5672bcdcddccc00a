//! Defines a spatial 3-vector: (x, y, z)

/// A three-vector, units of m
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct ThreeVector {
    x: f64,
    y: f64,
    z: f64,
}

impl ThreeVector {
    /// Creates a new three-vector with the specified components.
    pub fn new(x: f64, y: f64, z: f64) -> ThreeVector {
        ThreeVector {x, y, z}
    }

    /// Creates a new three-vector from a slice, failing if it
    /// does not have exactly three elements.
    pub fn from_slice(a: &[f64]) -> Option<ThreeVector> {
        match a {
            [x, y, z] => Some(ThreeVector::new(*x, *y, *z)),
            _ => None,
        }
    }

    pub fn x(&self) -> f64 {
        self.x
    }

    pub fn y(&self) -> f64 {
        self.y
    }

    pub fn z(&self) -> f64 {
        self.z
    }

    /// Returns the cross product of two three-vectors.
    pub fn cross(self, other: ThreeVector) -> ThreeVector {
        ThreeVector {
            x: self.y * other.z - self.z * other.y,
            y: self.z * other.x - self.x * other.z,
            z: self.x * other.y - self.y * other.x,
        }
    }

    /// Returns the squared magnitude of the three-vector.
    pub fn norm_sqr(self) -> f64 {
        self * self
    }

    /// Returns the magnitude of the three-vector.
    pub fn norm(self) -> f64 {
        self.norm_sqr().sqrt()
    }

    /// Returns a new three-vector which has the same direction,
    /// but unit magnitude, or `None` if `self` has zero (or non-finite)
    /// length.
    pub fn normalize(self) -> Option<Self> {
        let mag = self.norm();
        if mag > 0.0 && mag.is_finite() {
            Some(self / mag)
        } else {
            None
        }
    }
}

impl std::fmt::Display for ThreeVector {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "({:.3}, {:.3}, {:.3})", self.x, self.y, self.z)
    }
}

impl std::ops::Add for ThreeVector {
    type Output = ThreeVector;
    fn add(self, other: ThreeVector) -> ThreeVector {
        ThreeVector {x: self.x + other.x, y: self.y + other.y, z: self.z + other.z}
    }
}

impl std::ops::Sub for ThreeVector {
    type Output = ThreeVector;
    fn sub(self, other: ThreeVector) -> ThreeVector {
        ThreeVector {x: self.x - other.x, y: self.y - other.y, z: self.z - other.z}
    }
}

impl std::ops::Mul for ThreeVector {
    type Output = f64;
    fn mul(self, other: ThreeVector) -> f64 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }
}

impl std::ops::Mul<f64> for ThreeVector {
    type Output = ThreeVector;
    fn mul(self, other: f64) -> ThreeVector {
        ThreeVector {x: self.x * other, y: self.y * other, z: self.z * other}
    }
}

impl std::ops::Mul<ThreeVector> for f64 {
    type Output = ThreeVector;
    fn mul(self, other: ThreeVector) -> ThreeVector {
        ThreeVector {x: self * other.x, y: self * other.y, z: self * other.z}
    }
}

impl std::ops::Neg for ThreeVector {
    type Output = ThreeVector;
    fn neg(self) -> ThreeVector {
        -1.0 * self
    }
}

impl std::ops::Div<f64> for ThreeVector {
    type Output = ThreeVector;
    fn div(self, other: f64) -> ThreeVector {
        ThreeVector {x: self.x / other, y: self.y / other, z: self.z / other}
    }
}

impl std::convert::From<[f64; 3]> for ThreeVector {
    fn from(item: [f64; 3]) -> Self {
        ThreeVector::new(item[0], item[1], item[2])
    }
}
