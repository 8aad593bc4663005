//! Input events routed through the plot stack, and events the view emits.
//!
//! Render backends translate toolkit events into these types so that the
//! controller, the cursor overlay, and the plots share one input vocabulary.

use crate::geom::ScreenPoint;

/// Pointer event phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerKind {
    /// Button pressed.
    Press,
    /// Pointer moved, with or without a button held.
    Move,
    /// Button released.
    Release,
}

/// Mouse button involved in a pointer event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PointerButton {
    /// Primary button.
    #[default]
    Left,
    /// Secondary button.
    Right,
    /// Middle button.
    Middle,
    /// No button (plain moves).
    None,
}

/// Keyboard modifiers held during an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Modifiers {
    /// Control key.
    pub control: bool,
    /// Shift key.
    pub shift: bool,
    /// Alt/option key.
    pub alt: bool,
    /// Command/super key.
    pub platform: bool,
}

/// A pointer press, move, or release.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    /// Event phase.
    pub kind: PointerKind,
    /// Position in the receiver's local coordinates.
    pub position: ScreenPoint,
    /// Button involved.
    pub button: PointerButton,
    /// Modifiers held.
    pub modifiers: Modifiers,
}

impl PointerEvent {
    /// Create an event with no modifiers.
    pub fn new(kind: PointerKind, position: ScreenPoint, button: PointerButton) -> Self {
        Self {
            kind,
            position,
            button,
            modifiers: Modifiers::default(),
        }
    }

    /// Shorthand for a left-button press.
    pub fn press(x: f32, y: f32) -> Self {
        Self::new(PointerKind::Press, ScreenPoint::new(x, y), PointerButton::Left)
    }

    /// Shorthand for a move with the left button held.
    pub fn drag(x: f32, y: f32) -> Self {
        Self::new(PointerKind::Move, ScreenPoint::new(x, y), PointerButton::Left)
    }

    /// Shorthand for a left-button release.
    pub fn release(x: f32, y: f32) -> Self {
        Self::new(PointerKind::Release, ScreenPoint::new(x, y), PointerButton::Left)
    }

    /// The same event with its position moved by `(dx, dy)`.
    pub fn translated(&self, dx: f32, dy: f32) -> Self {
        Self {
            position: self.position.offset(dx, dy),
            ..*self
        }
    }
}

/// A scroll wheel or trackpad event, delta in pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WheelEvent {
    /// Scroll delta; positive Y scrolls up / away from the user.
    pub delta: ScreenPoint,
    /// Modifiers held.
    pub modifiers: Modifiers,
}

/// Notifications the view emits for the surrounding UI.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ViewEvent {
    /// The user asked to zoom in (modifier + wheel up).
    ZoomIn,
    /// The user asked to zoom out (modifier + wheel down).
    ZoomOut,
    /// The selected time span changed, in seconds.
    TimeSelectionChanged(f64),
}

/// Check whether `value` is within `tolerance` pixels of `target`.
pub(crate) fn near(value: f32, target: f32, tolerance: f32) -> bool {
    (value - target).abs() <= tolerance
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn translated_keeps_kind_and_button() {
        let event = PointerEvent::press(10.0, 300.0).translated(0.0, -200.0);
        assert_eq!(event.kind, PointerKind::Press);
        assert_eq!(event.button, PointerButton::Left);
        assert_eq!(event.position, ScreenPoint::new(10.0, 100.0));
    }

    #[test]
    fn near_is_inclusive() {
        assert!(near(10.0, 15.0, 5.0));
        assert!(!near(10.0, 15.5, 5.0));
    }
}
