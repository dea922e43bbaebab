use glam::{DMat4, DVec3, DVec4};

use super::quadric::Quadric;

/// Triangles whose cross product is at most this long count as zero-area.
pub const AREA_EPSILON: f64 = 1e-12;

#[derive(Debug, Clone, Copy)]
pub struct Plane(pub DVec4);

impl Plane {
    /// Plane through the triangle `a`, `b`, `c`, or `None` when the triangle
    /// has numerically zero area and no usable normal.
    pub fn from_triangle(a: DVec3, b: DVec3, c: DVec3) -> Option<Self> {
        let n = (b - a).cross(c - a);

        if n.length() <= AREA_EPSILON {
            return None;
        }

        Some(Self::from_normal_and_point(n.normalize(), a))
    }

    pub fn from_normal_and_point(norm: DVec3, p: DVec3) -> Self {
        let d = -p.dot(norm);

        Plane(DVec4::new(norm.x, norm.y, norm.z, d))
    }

    /// The fundamental error quadric `K_p`, such that `v^T K_p v` = `sqr distance v <-> p`
    /// Properties: Additive, Symmetric.
    pub fn fundamental_error_quadric(self) -> Quadric {
        let p = self.0;
        let (a, b, c, d) = p.into();

        // Do `p p^T`
        Quadric(DMat4::from_cols(a * p, b * p, c * p, d * p))
    }

    pub fn normal(&self) -> DVec3 {
        self.0.truncate()
    }

    /// Signed distance from `point` to the plane.
    pub fn distance(&self, point: DVec3) -> f64 {
        point.dot(self.normal()) + self.0.w
    }
}
