use std::f64::consts::PI;

#[inline(always)]
pub fn pi(v: f64) -> f64 {
    PI * v
}

pub fn modulo(n: f64, m: f64) -> f64 {
    ((n % m) + m) % m
}

/// Absolute difference between two directions, wrapped into `[0, π]`.
pub fn angle_difference(a: f64, b: f64) -> f64 {
    let d = modulo(a - b, pi(2.0));
    f64::min(d, pi(2.0) - d)
}

/// Unit vector in the direction of `(x, y)`, or `(1, 0)` for a (near) zero vector.
pub fn normalize((x, y): (f64, f64)) -> (f64, f64) {
    let len = f64::hypot(x, y);
    if len < 1e-10 {
        return (1.0, 0.0);
    }
    (x / len, y / len)
}

/// A 2-D affine map `p ↦ M·p + t`, stored row-major as
/// `[[m00, m01, m02], [m10, m11, m12]]`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Transform {
    m00: f64,
    m01: f64,
    m02: f64,
    m10: f64,
    m11: f64,
    m12: f64,
}

impl Transform {
    pub const IDENTITY: Transform = Transform {
        m00: 1.0,
        m01: 0.0,
        m02: 0.0,
        m10: 0.0,
        m11: 1.0,
        m12: 0.0,
    };

    pub fn new(m00: f64, m01: f64, m02: f64, m10: f64, m11: f64, m12: f64) -> Self {
        Transform {
            m00,
            m01,
            m02,
            m10,
            m11,
            m12,
        }
    }

    /// Rotation by `theta` radians (clockwise on screen, since y points down) about
    /// `(cx, cy)`.
    ///
    /// Quarter turns are snapped so that their sine and cosine are exactly 0 or ±1.
    pub fn rotation_about(theta: f64, (cx, cy): (f64, f64)) -> Self {
        let mut sin = theta.sin();
        let mut cos = theta.cos();
        if sin == 1.0 || sin == -1.0 {
            cos = 0.0;
        } else if cos == 1.0 || cos == -1.0 {
            sin = 0.0;
        }
        Transform {
            m00: cos,
            m01: -sin,
            m02: cx - cos * cx + sin * cy,
            m10: sin,
            m11: cos,
            m12: cy - sin * cx - cos * cy,
        }
    }

    pub fn apply(&self, (x, y): (f64, f64)) -> (f64, f64) {
        (
            self.m00 * x + self.m01 * y + self.m02,
            self.m10 * x + self.m11 * y + self.m12,
        )
    }

    pub fn determinant(&self) -> f64 {
        self.m00 * self.m11 - self.m01 * self.m10
    }

    /// The inverse map, or `None` when the linear part is singular.
    pub fn inverse(&self) -> Option<Transform> {
        let det = self.determinant();
        if !det.is_finite() || det.abs() < f64::MIN_POSITIVE {
            return None;
        }
        Some(Transform {
            m00: self.m11 / det,
            m01: -self.m01 / det,
            m02: (self.m01 * self.m12 - self.m11 * self.m02) / det,
            m10: -self.m10 / det,
            m11: self.m00 / det,
            m12: (self.m10 * self.m02 - self.m00 * self.m12) / det,
        })
    }
}
