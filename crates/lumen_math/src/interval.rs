/// A closed range of ray parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Interval {
    pub min: f32,
    pub max: f32,
}

impl Interval {
    /// Create a new interval given min and max values.
    pub fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// Returns true if x is within the interval [min, max] (inclusive).
    pub fn contains(&self, x: f32) -> bool {
        self.min <= x && x <= self.max
    }

    /// Same lower bound, new upper bound. Used to shrink the search range
    /// once a closer hit is known.
    pub fn with_max(&self, max: f32) -> Interval {
        Interval::new(self.min, max)
    }
}
