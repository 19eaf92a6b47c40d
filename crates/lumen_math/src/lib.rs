// Re-export glam for convenience
pub use glam::*;

// Lumen math types
mod interval;
mod ray;
pub use interval::Interval;
pub use ray::Ray;

/// Offset used to keep spawned rays from re-hitting the surface they left.
///
/// Also pads the far end of shadow rays so the light's own surface is not
/// reported as an occluder.
pub const EPSILON: f32 = 1e-3;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vec3_operations() {
        let a = Vec3::new(1.0, 2.0, 3.0);
        let b = Vec3::new(4.0, 5.0, 6.0);
        assert_eq!(a + b, Vec3::new(5.0, 7.0, 9.0));
        assert_eq!(a * b, Vec3::new(4.0, 10.0, 18.0));
        assert_eq!(a.dot(b), 32.0);
    }
}
