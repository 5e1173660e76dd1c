//! User-controlled view rotation.
//!
//! The scene root is rotated by [`ViewAngles`] after the camera is placed. The angles are
//! in degrees: `x` turns about Z, `y` about Y and `z` about X, applied in that order.

use crate::painter::{Painter, Renderer};

/// Largest magnitude the `x` angle may take.
pub const MAX_TILT: f32 = 90.0;

/// Root rotation angles in degrees.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ViewAngles {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl ViewAngles {
    pub const ZERO: ViewAngles = ViewAngles::new(0.0, 0.0, 0.0);

    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Apply the root rotations to the painter, with `yaw` added to the `y` angle.
    pub fn apply<R: Renderer>(&self, painter: &mut Painter<R>, yaw: f32) {
        painter
            .rotate(self.x, 0.0, 0.0, 1.0)
            .rotate(self.y + yaw, 0.0, 1.0, 0.0)
            .rotate(self.z, 1.0, 0.0, 0.0);
    }

    /// Add a delta to each angle, keeping `y` and `z` within one turn and `x` within
    /// [`MAX_TILT`].
    pub fn nudge(&mut self, dx: f32, dy: f32, dz: f32) {
        self.x = (self.x + dx).clamp(-MAX_TILT, MAX_TILT);
        self.y = (self.y + dy) % 360.0;
        self.z = (self.z + dz) % 360.0;
    }
}

/// Named view directions, laid out like a numeric keypad.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ViewPreset {
    FrontLeft,
    Front,
    FrontRight,
    Left,
    Top,
    Right,
    BackLeft,
    Back,
    BackRight,
}

impl ViewPreset {
    pub const ALL: [ViewPreset; 9] = [
        ViewPreset::FrontLeft,
        ViewPreset::Front,
        ViewPreset::FrontRight,
        ViewPreset::Left,
        ViewPreset::Top,
        ViewPreset::Right,
        ViewPreset::BackLeft,
        ViewPreset::Back,
        ViewPreset::BackRight,
    ];

    /// Preset bound to digit `n` (1 through 9).
    pub fn from_digit(n: u8) -> Option<Self> {
        Self::ALL.get(usize::from(n).checked_sub(1)?).copied()
    }

    pub fn angles(self) -> ViewAngles {
        match self {
            ViewPreset::FrontLeft => ViewAngles::new(0.0, 45.0, 0.0),
            ViewPreset::Front => ViewAngles::ZERO,
            ViewPreset::FrontRight => ViewAngles::new(0.0, -45.0, 0.0),
            ViewPreset::Left => ViewAngles::new(0.0, 90.0, 0.0),
            ViewPreset::Top => ViewAngles::new(90.0, 0.0, 0.0),
            ViewPreset::Right => ViewAngles::new(0.0, -90.0, 0.0),
            ViewPreset::BackLeft => ViewAngles::new(0.0, 135.0, 0.0),
            ViewPreset::Back => ViewAngles::new(0.0, 180.0, 0.0),
            ViewPreset::BackRight => ViewAngles::new(0.0, -135.0, 0.0),
        }
    }
}

impl From<ViewPreset> for ViewAngles {
    fn from(preset: ViewPreset) -> Self {
        preset.angles()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::painter::DrawList;
    use glam::{Mat4, Vec3};

    #[test]
    fn digits_map_to_keypad_layout() {
        assert_eq!(ViewPreset::from_digit(0), None);
        assert_eq!(ViewPreset::from_digit(1), Some(ViewPreset::FrontLeft));
        assert_eq!(ViewPreset::from_digit(5), Some(ViewPreset::Top));
        assert_eq!(ViewPreset::from_digit(9), Some(ViewPreset::BackRight));
        assert_eq!(ViewPreset::from_digit(10), None);
        assert_eq!(ViewAngles::from(ViewPreset::Back).y, 180.0);
    }

    #[test]
    fn nudge_clamps_tilt_and_wraps_turns() {
        let mut angles = ViewAngles::new(80.0, 350.0, 0.0);
        angles.nudge(20.0, 20.0, -370.0);
        assert_eq!(angles.x, MAX_TILT);
        assert_eq!(angles.y, 10.0);
        assert_eq!(angles.z, -10.0);
    }

    #[test]
    fn yaw_adds_to_y_rotation() {
        let mut painter = Painter::new(DrawList::new());
        ViewAngles::new(0.0, 30.0, 0.0).apply(&mut painter, 60.0);
        let expected = Mat4::from_axis_angle(Vec3::Y, 90f32.to_radians());
        assert!(painter.stack().current().abs_diff_eq(expected, 1e-5));
    }
}
