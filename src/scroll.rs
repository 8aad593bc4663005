//! Scrollbar model used by the view controller.

/// A scroll position clamped into `[minimum, maximum]`.
///
/// Mirrors a toolkit scrollbar: changing the bounds re-clamps the value, and
/// the maximum is never allowed below the minimum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScrollBar {
    value: i64,
    minimum: i64,
    maximum: i64,
    single_step: i64,
    page_step: i64,
}

impl ScrollBar {
    /// Create a scrollbar at zero with an empty range.
    pub fn new() -> Self {
        Self {
            value: 0,
            minimum: 0,
            maximum: 0,
            single_step: 1,
            page_step: 10,
        }
    }

    /// Current position.
    pub fn value(&self) -> i64 {
        self.value
    }

    /// Lower bound.
    pub fn minimum(&self) -> i64 {
        self.minimum
    }

    /// Upper bound.
    pub fn maximum(&self) -> i64 {
        self.maximum
    }

    /// Step used for arrow keys and wheel notches.
    pub fn single_step(&self) -> i64 {
        self.single_step
    }

    /// Step used for page up/down.
    pub fn page_step(&self) -> i64 {
        self.page_step
    }

    /// Set the position, clamped into the bounds. Returns true if it changed.
    pub fn set_value(&mut self, value: i64) -> bool {
        let clamped = value.clamp(self.minimum, self.maximum);
        let changed = clamped != self.value;
        self.value = clamped;
        changed
    }

    /// Set both bounds. An inverted pair collapses to `minimum`.
    pub fn set_range(&mut self, minimum: i64, maximum: i64) {
        self.minimum = minimum;
        self.maximum = maximum.max(minimum);
        self.value = self.value.clamp(self.minimum, self.maximum);
    }

    /// Set the single and page step sizes.
    pub fn set_steps(&mut self, single_step: i64, page_step: i64) {
        self.single_step = single_step.max(1);
        self.page_step = page_step.max(1);
    }

    /// Move by a number of single steps.
    pub fn step_by(&mut self, steps: i64) -> bool {
        self.set_value(self.value.saturating_add(steps.saturating_mul(self.single_step)))
    }
}
