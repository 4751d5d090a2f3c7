//! Parametric contact interval reported by the line colliders

use nalgebra::SVector;

/// Where a line enters and leaves a shape.
///
/// Both times are multiples of the line's direction vector measured from its
/// offset, so the actual points are `offset + direction * time`. Colliders
/// return `Option<LineContacts>`; `None` means the query succeeded and found no
/// intersection.
///
/// `entry_time <= exit_time` always holds. Crossings of infinitely thin shapes
/// (another line, a plane) report a single point with both times equal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineContacts {
    /// Parametric time at which the line enters the shape
    pub entry_time: f32,
    /// Parametric time at which the line leaves the shape
    pub exit_time: f32,
}

impl LineContacts {
    /// Creates a contact interval; the caller guarantees `entry_time <= exit_time`
    pub const fn new(entry_time: f32, exit_time: f32) -> Self {
        Self { entry_time, exit_time }
    }

    /// Creates an interval from two times in any order
    pub fn ordered(first: f32, second: f32) -> Self {
        if first <= second {
            Self::new(first, second)
        } else {
            Self::new(second, first)
        }
    }

    /// A single point of contact
    pub const fn touching(time: f32) -> Self {
        Self::new(time, time)
    }

    /// True when the line only touches the shape at a single point
    pub fn is_single_point(&self) -> bool {
        self.entry_time == self.exit_time
    }

    /// Length of the interval in parametric time
    pub fn duration(&self) -> f32 {
        self.exit_time - self.entry_time
    }

    /// World-space point where the line enters the shape
    pub fn entry_point<const D: usize>(
        &self,
        offset: &SVector<f32, D>,
        direction: &SVector<f32, D>,
    ) -> SVector<f32, D> {
        offset + direction * self.entry_time
    }

    /// World-space point where the line leaves the shape
    pub fn exit_point<const D: usize>(
        &self,
        offset: &SVector<f32, D>,
        direction: &SVector<f32, D>,
    ) -> SVector<f32, D> {
        offset + direction * self.exit_time
    }

    /// Restrict the interval to non-negative time, the part a ray can see.
    ///
    /// Returns `None` when the whole interval lies behind the origin.
    pub fn clip_to_ray(self) -> Option<Self> {
        if self.exit_time < 0.0 {
            None
        } else if self.entry_time < 0.0 {
            Some(Self::new(0.0, self.exit_time))
        } else {
            Some(self)
        }
    }
}
