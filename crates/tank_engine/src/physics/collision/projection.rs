//! One-dimensional shadow of a shape on an axis

/// Interval covered by a shape projected onto an axis
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    /// Smallest projected coordinate
    pub min: f32,
    /// Largest projected coordinate
    pub max: f32,
}

impl Projection {
    /// Creates a projection; `min` must not exceed `max`
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// Builds the projection covering all `values`.
    ///
    /// Returns `None` for an empty iterator.
    pub fn from_values(values: impl IntoIterator<Item = f32>) -> Option<Self> {
        let mut values = values.into_iter();
        let first = values.next()?;
        Some(values.fold(Self::new(first, first), |projection, value| {
            Self::new(projection.min.min(value), projection.max.max(value))
        }))
    }

    /// Whether the two intervals share at least one point
    pub fn overlaps(&self, other: &Self) -> bool {
        !(self.min > other.max || other.min > self.max)
    }

    /// Depth of the overlap; negative when the intervals are apart
    pub fn overlap(&self, other: &Self) -> f32 {
        (other.max - self.min).min(self.max - other.min)
    }

    /// Whether `other` lies strictly inside this interval
    pub fn contains(&self, other: &Self) -> bool {
        other.min > self.min && other.max < self.max
    }

    /// True when leaving `other` past its `max` is shorter than leaving it
    /// past its `min`
    pub fn lower_of(&self, other: &Self) -> bool {
        (other.max - self.min) < (self.max - other.min)
    }

    /// Complement of [`Projection::lower_of`]
    pub fn higher_of(&self, other: &Self) -> bool {
        !self.lower_of(other)
    }

    /// Length of the interval
    pub fn length(&self) -> f32 {
        self.max - self.min
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_from_values() {
        let projection = Projection::from_values([3.0, -1.0, 2.0, 0.5]).unwrap();
        assert_eq!(projection, Projection::new(-1.0, 3.0));
        assert_relative_eq!(projection.length(), 4.0);
        assert!(Projection::from_values(std::iter::empty()).is_none());
    }

    #[test]
    fn test_overlap_depth() {
        let a = Projection::new(0.0, 4.0);
        let b = Projection::new(3.0, 10.0);
        assert!(a.overlaps(&b));
        assert_relative_eq!(a.overlap(&b), 1.0);
        assert_relative_eq!(b.overlap(&a), 1.0);
        // Leaving b past its max means travelling 10, past its min only 1
        assert!(a.higher_of(&b));
        assert!(b.lower_of(&a));
    }

    #[test]
    fn test_touching_intervals_overlap_with_zero_depth() {
        let a = Projection::new(0.0, 4.0);
        let b = Projection::new(4.0, 6.0);
        assert!(a.overlaps(&b));
        assert_relative_eq!(a.overlap(&b), 0.0);
    }

    #[test]
    fn test_separated_intervals() {
        let a = Projection::new(0.0, 1.0);
        let b = Projection::new(2.0, 3.0);
        assert!(!a.overlaps(&b));
        assert!(a.overlap(&b) < 0.0);
        assert!(a.higher_of(&b));
        assert!(!a.lower_of(&b));
    }

    #[test]
    fn test_nested_intervals_pick_one_side() {
        let outer = Projection::new(0.0, 10.0);
        let inner = Projection::new(2.0, 4.0);
        assert!(outer.lower_of(&inner));
        assert_ne!(outer.lower_of(&inner), outer.higher_of(&inner));
        assert!(inner.higher_of(&outer));
        assert_ne!(inner.lower_of(&outer), inner.higher_of(&outer));
    }

    #[test]
    fn test_containment() {
        let outer = Projection::new(-5.0, 5.0);
        let inner = Projection::new(-1.0, 2.0);
        assert!(outer.contains(&inner));
        assert!(!inner.contains(&outer));
        assert!(!outer.contains(&Projection::new(-5.0, 2.0)));
        assert!(!outer.contains(&outer));
        // Overlap of nested intervals is the shorter way out
        assert_relative_eq!(inner.overlap(&outer), 6.0);
    }
}
