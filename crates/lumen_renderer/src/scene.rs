//! Objects and lights rendered together.

use crate::{Hittable, HittableList, LightSource};

/// Geometry plus the lights sampled for direct illumination.
///
/// Lights are not geometry. A visible luminaire needs an emissive shape in
/// `objects` as well as an entry in `lights`.
#[derive(Default)]
pub struct Scene {
    pub objects: HittableList,
    pub lights: Vec<LightSource>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_object(&mut self, object: impl Hittable + 'static) {
        self.objects.add(object);
    }

    pub fn add_light(&mut self, light: impl Into<LightSource>) {
        self.lights.push(light.into());
    }
}
