use std::ops;

use glam::{DMat4, DVec3, DVec4};

/// Pivots below this magnitude make the optimal-position system singular.
pub const PIVOT_EPSILON: f64 = 1e-12;

/// Quadric type. Internally a DMat4.
#[derive(Debug, Clone, Copy)]
#[repr(transparent)]
pub struct Quadric(pub DMat4);

impl Quadric {
    pub const ZERO: Self = Quadric(DMat4::ZERO);
}

impl Default for Quadric {
    fn default() -> Self {
        // glam matrices default to identity, which is wrong for accumulation.
        Self::ZERO
    }
}

impl ops::Add for Quadric {
    type Output = Quadric;

    fn add(self, rhs: Self) -> Self::Output {
        Quadric(self.0 + rhs.0)
    }
}

impl ops::Add for &Quadric {
    type Output = Quadric;

    fn add(self, rhs: Self) -> Self::Output {
        Quadric(self.0 + rhs.0)
    }
}

impl ops::AddAssign<Self> for Quadric {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0
    }
}

impl Quadric {
    /// Calculate error from Q and vertex, `v^T Q v`
    pub fn error(&self, v: DVec3) -> f64 {
        let v = DVec4::new(v.x, v.y, v.z, 1.0);
        v.dot(self.0 * v)
    }

    /// The point minimizing `v^T Q v`, solved from the 3x3 system
    /// `Q[0..3, 0..3] x = -Q[0..3, 3]` with partial-pivoting Gaussian
    /// elimination. `None` when a pivot falls below [`PIVOT_EPSILON`]
    /// (singular or near-singular local geometry).
    pub fn minimizer(&self) -> Option<DVec3> {
        let q = &self.0;

        // Augmented rows of the top-left block. glam matrices are
        // column-major: `y_axis.x` is row 0, column 1.
        let mut m = [
            [q.x_axis.x, q.y_axis.x, q.z_axis.x, -q.w_axis.x],
            [q.x_axis.y, q.y_axis.y, q.z_axis.y, -q.w_axis.y],
            [q.x_axis.z, q.y_axis.z, q.z_axis.z, -q.w_axis.z],
        ];

        for i in 0..3 {
            let mut piv = i;
            let mut piv_val = m[i][i].abs();
            for r in i + 1..3 {
                if m[r][i].abs() > piv_val {
                    piv = r;
                    piv_val = m[r][i].abs();
                }
            }
            if piv_val < PIVOT_EPSILON {
                return None;
            }
            m.swap(i, piv);

            let div = m[i][i];
            for c in i..4 {
                m[i][c] /= div;
            }
            for r in i + 1..3 {
                let factor = m[r][i];
                for c in i..4 {
                    m[r][c] -= factor * m[i][c];
                }
            }
        }

        let mut x = [0.0; 3];
        for i in (0..3).rev() {
            let mut s = m[i][3];
            for c in i + 1..3 {
                s -= m[i][c] * x[c];
            }
            x[i] = s;
        }

        Some(DVec3::from_array(x))
    }

    /// Error-minimizing merge position for an edge with endpoints `pu` and
    /// `pv`, and the cost `v^T Q v` at that position.
    ///
    /// When the system is singular the arithmetic midpoint of the endpoints
    /// is used instead; near-flat regions and isolated edges are common and
    /// must not abort the run.
    pub fn optimal_position(&self, pu: DVec3, pv: DVec3) -> (DVec3, f64) {
        let position = self.minimizer().unwrap_or_else(|| (pu + pv) * 0.5);

        (position, self.error(position))
    }
}
