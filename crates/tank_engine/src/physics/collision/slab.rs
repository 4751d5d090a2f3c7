//! Slab clipping shared by the 2D and 3D box colliders.

use super::LineContacts;

/// Running parametric interval narrowed by successive half-space clips
pub(super) struct SlabInterval {
    entry: f32,
    exit: f32,
}

impl SlabInterval {
    pub(super) const fn new() -> Self {
        Self {
            entry: f32::NEG_INFINITY,
            exit: f32::INFINITY,
        }
    }

    /// Clip against the half-space `denominator * t >= numerator`.
    ///
    /// Returns `false` when the line lies entirely outside the half-space.
    pub(super) fn clip(&mut self, denominator: f32, numerator: f32) -> bool {
        if denominator > 0.0 {
            if numerator > denominator * self.exit {
                return false;
            }
            if numerator > denominator * self.entry {
                self.entry = numerator / denominator;
            }
            true
        } else if denominator < 0.0 {
            if numerator > denominator * self.entry {
                return false;
            }
            if numerator > denominator * self.exit {
                self.exit = numerator / denominator;
            }
            true
        } else {
            // Parallel to the slab: inside only if the offset already is
            numerator <= 0.0
        }
    }

    /// Clip against both faces of one axis of a box centered on the origin
    pub(super) fn clip_axis(&mut self, offset: f32, direction: f32, extent: f32) -> bool {
        self.clip(direction, -offset - extent) && self.clip(-direction, offset - extent)
    }

    /// The narrowed interval, or `None` if nothing ever clipped it
    pub(super) fn finish(self) -> Option<LineContacts> {
        if self.entry == f32::NEG_INFINITY && self.exit == f32::INFINITY {
            None
        } else {
            Some(LineContacts::new(self.entry, self.exit))
        }
    }
}
