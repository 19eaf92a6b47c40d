use crate::{Interval, Vec3, EPSILON};

/// A ray segment used by the integrator.
///
/// Besides origin and direction a ray carries its bounce depth (number of
/// scattering events since the camera) and the parametric interval in which
/// hits are accepted. Rays are immutable; continuing a path builds a new ray
/// one level deeper with [`Ray::spawn`].
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Ray {
    origin: Vec3,
    /// Always unit length
    direction: Vec3,
    depth: u32,
    t: Interval,
}

impl Ray {
    /// Create a ray valid on `[EPSILON, inf)`. The direction is normalized.
    pub fn new(origin: Vec3, direction: Vec3, depth: u32) -> Self {
        Self::with_bounds(origin, direction, depth, EPSILON, f32::INFINITY)
    }

    /// Create a ray with an explicit parametric interval.
    pub fn with_bounds(origin: Vec3, direction: Vec3, depth: u32, t_min: f32, t_max: f32) -> Self {
        Self {
            origin,
            direction: direction.normalize_or_zero(),
            depth,
            t: Interval::new(t_min, t_max),
        }
    }

    /// Build a shadow ray from `from` towards `to`.
    ///
    /// Both ends are pulled in by [`EPSILON`] so neither the shading point nor
    /// the target surface count as occluders. Returns the ray together with the
    /// distance between the two points.
    pub fn shadow(from: Vec3, to: Vec3, depth: u32) -> (Self, f32) {
        let offset = to - from;
        let distance = offset.length();
        let ray = Self::with_bounds(from, offset, depth, EPSILON, distance - EPSILON);
        (ray, distance)
    }

    /// Continue the path from `origin` along `direction`, one bounce deeper.
    #[inline]
    pub fn spawn(&self, origin: Vec3, direction: Vec3) -> Self {
        Self::new(origin, direction, self.depth + 1)
    }

    #[inline]
    pub fn origin(&self) -> Vec3 {
        self.origin
    }

    #[inline]
    pub fn direction(&self) -> Vec3 {
        self.direction
    }

    #[inline]
    pub fn depth(&self) -> u32 {
        self.depth
    }

    /// Parametric range in which intersections are valid.
    #[inline]
    pub fn interval(&self) -> Interval {
        self.t
    }

    /// Get the point along the ray at parameter t.
    ///
    /// Returns: origin + t * direction
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }
}
