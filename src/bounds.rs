use serde::Serialize;

/// An integer default together with the inclusive range it must stay in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct BoundedInt {
    pub min: i64,
    pub default: i64,
    pub max: i64,
}

impl BoundedInt {
    /// Build a bound from three integers in any order.
    ///
    /// The values are sorted, so the smallest becomes `min`, the middle one
    /// `default` and the largest `max`. `BoundedInt::new(3, 1, 2)` and
    /// `BoundedInt::new(1, 2, 3)` are the same bound.
    pub fn new(a: i64, b: i64, c: i64) -> Self {
        let mut values = [a, b, c];
        values.sort_unstable();
        Self {
            min: values[0],
            default: values[1],
            max: values[2],
        }
    }

    pub fn clamp(&self, value: i64) -> i64 {
        if value < self.min {
            self.min
        } else if value > self.max {
            self.max
        } else {
            value
        }
    }
}
