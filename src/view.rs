//! Sample and pixel ranges, and the view snapshot handed to plots.

use std::ops::Sub;

/// Ordered pair of bounds with `minimum <= maximum`.
///
/// Used in sample space (view range, selection) and in pixel space (cursor
/// positions). A range may be empty but is never inverted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct Range<T> {
    /// Lower bound.
    pub minimum: T,
    /// Upper bound.
    pub maximum: T,
}

/// Range of absolute sample indices.
pub type SampleRange = Range<i64>;

/// Range of pixel columns.
pub type PixelRange = Range<i32>;

impl<T> Range<T>
where
    T: Copy + PartialOrd + Sub<Output = T>,
{
    /// Create a new range, swapping bounds if needed.
    pub fn new(mut minimum: T, mut maximum: T) -> Self {
        if minimum > maximum {
            std::mem::swap(&mut minimum, &mut maximum);
        }
        Self { minimum, maximum }
    }

    /// Distance between the bounds.
    pub fn length(&self) -> T {
        self.maximum - self.minimum
    }

    /// Check whether the range holds no values.
    pub fn is_empty(&self) -> bool {
        self.maximum <= self.minimum
    }

    /// Clamp a value into the closed range.
    pub fn clamp(&self, value: T) -> T {
        if value < self.minimum {
            self.minimum
        } else if value > self.maximum {
            self.maximum
        } else {
            value
        }
    }
}

/// Immutable description of what is on screen for one paint or input pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewSnapshot {
    /// Absolute sample interval mapped across the viewport width.
    pub range: SampleRange,
    /// Source samples represented by one pixel column.
    pub samples_per_column: i64,
}

impl ViewSnapshot {
    /// Create a snapshot.
    pub fn new(range: SampleRange, samples_per_column: i64) -> Self {
        Self {
            range,
            samples_per_column,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_swaps_inverted_bounds() {
        let range = SampleRange::new(10, 4);
        assert_eq!(range.minimum, 4);
        assert_eq!(range.maximum, 10);
        assert_eq!(range.length(), 6);
    }

    #[test]
    fn empty_range_is_allowed() {
        let range = PixelRange::new(3, 3);
        assert!(range.is_empty());
        assert_eq!(range.length(), 0);
        assert_eq!(range.clamp(7), 3);
    }

    #[test]
    fn clamp_pins_to_bounds() {
        let bounds = SampleRange::new(0, 1000);
        assert_eq!(bounds.clamp(-64), 0);
        assert_eq!(bounds.clamp(640), 640);
        assert_eq!(bounds.clamp(1024), 1000);
    }
}
