use std::ops::{Mul, MulAssign};

use serde::{Deserialize, Serialize};

use crate::core::types::{Point, Rect};

/// 2D affine transform in row-vector form.
///
/// A point maps as `x' = a*x + c*y + tx`, `y' = b*x + d*y + ty`.
/// `lhs.concatenating(rhs)` applies `lhs` first, then `rhs`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AffineTransform {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
    pub tx: f64,
    pub ty: f64,
}

/// Outcome of inverting a transform.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Inversion {
    /// The true inverse.
    Inverted(AffineTransform),
    /// The determinant was zero; carries the original, non-inverted transform.
    Degenerate(AffineTransform),
}

impl Inversion {
    /// Returns the carried transform, inverse or not.
    #[must_use]
    pub fn transform(self) -> AffineTransform {
        match self {
            Self::Inverted(t) | Self::Degenerate(t) => t,
        }
    }

    #[must_use]
    pub fn is_degenerate(self) -> bool {
        matches!(self, Self::Degenerate(_))
    }
}

impl AffineTransform {
    pub const IDENTITY: Self = Self {
        a: 1.0,
        b: 0.0,
        c: 0.0,
        d: 1.0,
        tx: 0.0,
        ty: 0.0,
    };

    #[must_use]
    pub const fn new(a: f64, b: f64, c: f64, d: f64, tx: f64, ty: f64) -> Self {
        Self { a, b, c, d, tx, ty }
    }

    #[must_use]
    pub const fn translation(tx: f64, ty: f64) -> Self {
        Self::new(1.0, 0.0, 0.0, 1.0, tx, ty)
    }

    #[must_use]
    pub const fn scaling(sx: f64, sy: f64) -> Self {
        Self::new(sx, 0.0, 0.0, sy, 0.0, 0.0)
    }

    /// Scales points before this transform is applied.
    #[must_use]
    pub fn scaled_by(self, sx: f64, sy: f64) -> Self {
        Self {
            a: self.a * sx,
            b: self.b * sx,
            c: self.c * sy,
            d: self.d * sy,
            tx: self.tx,
            ty: self.ty,
        }
    }

    /// Translates points before this transform is applied.
    #[must_use]
    pub fn translated_by(self, tx: f64, ty: f64) -> Self {
        Self {
            tx: tx * self.a + ty * self.c + self.tx,
            ty: tx * self.b + ty * self.d + self.ty,
            ..self
        }
    }

    /// Applies `self`, then `other`.
    #[must_use]
    pub fn concatenating(self, other: Self) -> Self {
        Self {
            a: self.a * other.a + self.b * other.c,
            b: self.a * other.b + self.b * other.d,
            c: self.c * other.a + self.d * other.c,
            d: self.c * other.b + self.d * other.d,
            tx: self.tx * other.a + self.ty * other.c + other.tx,
            ty: self.tx * other.b + self.ty * other.d + other.ty,
        }
    }

    #[must_use]
    pub fn determinant(self) -> f64 {
        self.a * self.d - self.b * self.c
    }

    #[must_use]
    pub fn is_identity(self) -> bool {
        self == Self::IDENTITY
    }

    /// Inverts the transform, reporting a zero determinant as
    /// [`Inversion::Degenerate`] instead of producing non-finite coefficients.
    #[must_use]
    pub fn inversion(self) -> Inversion {
        let det = self.determinant();
        if det == 0.0 {
            return Inversion::Degenerate(self);
        }

        Inversion::Inverted(Self {
            a: self.d / det,
            b: -self.b / det,
            c: -self.c / det,
            d: self.a / det,
            tx: (self.c * self.ty - self.d * self.tx) / det,
            ty: (self.b * self.tx - self.a * self.ty) / det,
        })
    }

    #[must_use]
    pub fn try_inverted(self) -> Option<Self> {
        match self.inversion() {
            Inversion::Inverted(t) => Some(t),
            Inversion::Degenerate(_) => None,
        }
    }

    /// Inverse when one exists, otherwise `self` unchanged.
    #[must_use]
    pub fn inverted_or_self(self) -> Self {
        self.inversion().transform()
    }

    #[must_use]
    pub fn apply_to_point(self, point: Point) -> Point {
        Point {
            x: self.a * point.x + self.c * point.y + self.tx,
            y: self.b * point.x + self.d * point.y + self.ty,
        }
    }

    /// Maps all four corners and returns their standardized bounding box.
    #[must_use]
    pub fn apply_to_rect(self, rect: Rect) -> Rect {
        let [first, rest @ ..] = rect.corners().map(|corner| self.apply_to_point(corner));
        let (min, max) = rest.iter().fold((first, first), |(min, max), p| {
            (
                Point::new(min.x.min(p.x), min.y.min(p.y)),
                Point::new(max.x.max(p.x), max.y.max(p.y)),
            )
        });
        Rect::from_corners(min, max)
    }
}

impl Default for AffineTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Mul for AffineTransform {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self {
        self.concatenating(rhs)
    }
}

impl MulAssign for AffineTransform {
    fn mul_assign(&mut self, rhs: Self) {
        *self = self.concatenating(rhs);
    }
}
