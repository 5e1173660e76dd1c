use glam::Vec2;
use winit::event::MouseButton;

use crate::input::Input;
use crate::view::{MAX_TILT, ViewAngles};

/// Rotates the view while the left mouse button is dragged.
///
/// Horizontal motion turns `y`, vertical motion tilts `x`. Dragging right or down turns
/// the scene the opposite way, as if grabbing the world.
///
/// # Example
/// ```
/// use beachside::{DragController, ViewAngles};
/// use glam::Vec2;
///
/// let mut drag = DragController::new().scale_factor(2.0);
/// let mut view = ViewAngles::ZERO;
/// drag.drag(Vec2::new(-20.0, 0.0), &mut view);
/// assert_eq!(view.y, 10.0);
/// ```
#[derive(Clone, Debug)]
pub struct DragController {
    /// Pixels of mouse motion per degree of rotation.
    pub scale_factor: f32,
}

impl Default for DragController {
    fn default() -> Self {
        Self { scale_factor: 3.0 }
    }
}

impl DragController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set how many pixels of motion make one degree.
    pub fn scale_factor(mut self, scale_factor: f32) -> Self {
        self.scale_factor = scale_factor.max(f32::EPSILON);
        self
    }

    /// Apply one mouse movement in pixels.
    pub fn drag(&self, delta: Vec2, view: &mut ViewAngles) {
        let turn = -delta / self.scale_factor;
        view.y = (view.y + turn.x) % 360.0;
        view.x = (view.x + turn.y).clamp(-MAX_TILT, MAX_TILT);
    }

    /// Rotate `view` from this frame's input. Returns true when a drag moved it.
    pub fn update(&self, input: &Input, view: &mut ViewAngles) -> bool {
        if !input.mouse_down(MouseButton::Left) {
            return false;
        }
        let delta = input.mouse_delta();
        if delta == Vec2::ZERO {
            return false;
        }
        self.drag(delta, view);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tilt_is_clamped() {
        let drag = DragController::new();
        let mut view = ViewAngles::ZERO;
        drag.drag(Vec2::new(0.0, -600.0), &mut view);
        assert_eq!(view.x, 90.0);
        drag.drag(Vec2::new(0.0, 1200.0), &mut view);
        assert_eq!(view.x, -90.0);
    }

    #[test]
    fn turn_wraps_at_one_revolution() {
        let drag = DragController::new();
        let mut view = ViewAngles::new(0.0, 350.0, 0.0);
        drag.drag(Vec2::new(-60.0, 0.0), &mut view);
        assert!((view.y - 10.0).abs() < 1e-4);
    }

    #[test]
    fn idle_input_leaves_view_alone() {
        let drag = DragController::new();
        let input = Input::new();
        let mut view = ViewAngles::new(1.0, 2.0, 3.0);
        assert!(!drag.update(&input, &mut view));
        assert_eq!(view, ViewAngles::new(1.0, 2.0, 3.0));
    }
}
