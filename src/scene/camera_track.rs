use glam::Vec3;

use crate::camera::Camera;
use crate::timeline::{Timeline, TimelineError};

/// Where the camera sits, what it looks at, and how far the scene is turned about Y.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraRig {
    pub eye: Vec3,
    pub target: Vec3,
    /// Degrees about Y. Added on top of the user's `y` view angle instead of replacing it,
    /// so dragging and the arrow keys keep turning the view while the camera moves.
    pub yaw: f32,
}

impl Default for CameraRig {
    fn default() -> Self {
        let camera = Camera::default();
        Self {
            eye: camera.eye,
            target: camera.target,
            yaw: 0.0,
        }
    }
}

impl CameraRig {
    pub fn camera(&self) -> Camera {
        Camera {
            eye: self.eye,
            target: self.target,
            ..Camera::default()
        }
    }
}

/// Fly in from far out over the water, swing around behind the chair, settle over the
/// character's shoulder, then pull back out to sea for the loop.
pub fn camera_track() -> Result<Timeline<CameraRig>, TimelineError> {
    Timeline::<CameraRig>::builder()
        .show_before(true)
        .window(0.0, 2.0, |rig, _, ease| {
            rig.target = Vec3::new(0.0, ease.between(-50.0, -10.0), 0.0);
            rig.eye = Vec3::new(0.0, ease.between(2.0, 10.0), ease.between(-100.0, -50.0));
            rig.yaw = 0.0;
        })
        .window(2.0, 6.0, |rig, _, ease| {
            rig.target = Vec3::new(0.0, ease.between(-10.0, 3.0), 0.0);
            rig.eye = Vec3::new(0.0, ease.between(10.0, 7.0), ease.between(-50.0, -10.0));
            rig.yaw = ease.between(0.0, -210.0);
        })
        .window(8.0, 9.0, |rig, _, ease| {
            rig.target = Vec3::new(0.0, 3.0, 0.0);
            rig.eye = Vec3::new(0.0, ease.between(7.0, 5.0), ease.between(-10.0, -5.0));
            rig.yaw = -210.0;
        })
        .window(26.0, 29.0, |rig, _, ease| {
            rig.target = Vec3::new(0.0, ease.between(3.0, -10.0), ease.between(0.0, 80.0));
            rig.eye = Vec3::new(0.0, ease.between(5.0, 1.0), ease.between(-5.0, 50.0));
            rig.yaw = -210.0;
        })
        .window(29.0, 30.0, |rig, _, ease| {
            rig.target = Vec3::new(0.0, -10.0, 80.0);
            rig.eye = Vec3::new(0.0, ease.between(1.0, 3.0), ease.between(50.0, 80.0));
            rig.yaw = -210.0;
        })
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rig_at(time: f32) -> CameraRig {
        let track = camera_track().unwrap();
        let mut rig = CameraRig::default();
        assert!(track.evaluate(time, &mut rig) >= 1);
        rig
    }

    #[test]
    fn opens_far_out_at_sea() {
        let rig = rig_at(0.0);
        assert_eq!(rig.eye, Vec3::new(0.0, 2.0, -100.0));
        assert_eq!(rig.target, Vec3::new(0.0, -50.0, 0.0));
        assert_eq!(rig.yaw, 0.0);
    }

    #[test]
    fn swing_holds_through_gap() {
        let rig = rig_at(7.0);
        assert_eq!(rig.yaw, -210.0);
        assert_eq!(rig.eye, Vec3::new(0.0, 7.0, -10.0));
    }

    #[test]
    fn every_cycle_time_is_covered() {
        let track = camera_track().unwrap();
        let mut time = 0.0;
        while time < 30.0 {
            let mut rig = CameraRig::default();
            assert!(track.evaluate(time, &mut rig) >= 1, "uncovered at {time}");
            time += 0.25;
        }
    }

    #[test]
    fn rig_becomes_camera() {
        let rig = rig_at(15.0);
        let camera = rig.camera();
        assert_eq!(camera.eye, Vec3::new(0.0, 5.0, -5.0));
        assert_eq!(camera.target, Vec3::new(0.0, 3.0, 0.0));
    }
}
