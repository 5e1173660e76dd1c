//! The beach scene.
//!
//! [`BeachScene`] composes one frame: it evaluates the camera track, turns the scene root
//! by the user's view angles, and draws the water, island, palm tree, chair and character
//! through a [`Painter`]. All timelines are built once in [`BeachScene::new`].
//!
//! # Example
//!
//! ```
//! use beachside::{BeachScene, DrawList, FrameTime, Material, Painter, ViewAngles};
//!
//! let scene = BeachScene::new().unwrap();
//! let mut painter = Painter::new(DrawList::new());
//! let time = FrameTime { elapsed: 12.0, cycle: 12.0 };
//!
//! let camera = scene.compose(&mut painter, time, ViewAngles::ZERO);
//! assert_eq!(painter.stack().depth(), 0);
//! assert_eq!(painter.renderer().count_material(Material::Bark), 10);
//! assert!(camera.view_matrix().is_finite());
//! ```
//!
//! # Keyframes
//!
//! The character's beats are keyed on [`keyframe`]`(i)`, offset so they start once the
//! camera has arrived:
//!
//! | Index | Time    | Beat                             |
//! |-------|---------|----------------------------------|
//! | 0–1   | 8–8.85  | coconut falls into the left hand |
//! | 2–3   | 10–11   | right hand passes the straw      |
//! | 3–10  | 11–21   | three sips                       |
//! | 11–13 | 22–23   | coconut is thrown                |

mod camera_track;
mod character;
mod palm_tree;
mod props;

use crate::camera::Camera;
use crate::clock::FrameTime;
use crate::painter::{Painter, Renderer};
use crate::timeline::{Timeline, TimelineError};
use crate::view::ViewAngles;

pub use camera_track::{CameraRig, camera_track};
pub use character::{Arm, Character, HAIR_GRID, Side};
pub use palm_tree::{PalmTree, TRUNK_SEGMENTS};
pub use props::{beach_chair, coconut, island, straw, water};

/// Delay before the character starts moving.
pub const START_OFFSET: f32 = 8.0;

const KEYFRAMES: [f32; 15] = [
    0.0, 0.85, 2.0, 3.0, 4.0, 6.0, 7.0, 9.0, 10.0, 12.0, 13.0, 14.0, 14.25, 15.0, 16.0,
];

/// Number of character keyframes.
pub const KEYFRAME_COUNT: usize = KEYFRAMES.len();

/// Cycle time of character keyframe `index`.
///
/// # Panics
///
/// If `index >= KEYFRAME_COUNT`.
pub const fn keyframe(index: usize) -> f32 {
    KEYFRAMES[index] + START_OFFSET
}

/// Everything needed to compose the beach scene each frame.
pub struct BeachScene<R> {
    camera_track: Timeline<CameraRig>,
    palm_tree: PalmTree<R>,
    character: Character<R>,
}

impl<R: Renderer + 'static> BeachScene<R> {
    pub fn new() -> Result<Self, TimelineError> {
        let scene = Self {
            camera_track: camera_track()?,
            palm_tree: PalmTree::new()?,
            character: Character::new()?,
        };
        log::debug!(
            "beach scene ready: {} camera windows",
            scene.camera_track.windows().len()
        );
        Ok(scene)
    }

    pub fn camera_track(&self) -> &Timeline<CameraRig> {
        &self.camera_track
    }

    pub fn palm_tree(&self) -> &PalmTree<R> {
        &self.palm_tree
    }

    pub fn character(&self) -> &Character<R> {
        &self.character
    }

    /// Camera rig at a cycle time.
    pub fn rig(&self, cycle: f32) -> CameraRig {
        let mut rig = CameraRig::default();
        self.camera_track.evaluate(cycle, &mut rig);
        rig
    }

    /// Draw one frame into `painter` and return the camera to view it through.
    ///
    /// The painter's stack is reset first. When this returns it is back at depth 0 with an
    /// identity transform, whatever the view angles and camera yaw were.
    pub fn compose(&self, painter: &mut Painter<R>, time: FrameTime, view: ViewAngles) -> Camera {
        let rig = self.rig(time.cycle);

        painter.begin_frame();
        painter.scoped(|p| {
            view.apply(p, rig.yaw);

            water(p);
            island(p);
            self.palm_tree.draw(p, time);
            beach_chair(p);
            self.character.draw(p, time);
        });

        debug_assert_eq!(painter.stack().depth(), 0, "unbalanced scene transforms");
        rig.camera()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::material::{Material, Program};
    use crate::painter::DrawList;
    use glam::{Mat4, Vec3};

    fn compose_at(cycle: f32, view: ViewAngles) -> (DrawList, Camera) {
        let scene = BeachScene::new().unwrap();
        let mut painter = Painter::new(DrawList::new());
        let camera = scene.compose(
            &mut painter,
            FrameTime {
                elapsed: cycle,
                cycle,
            },
            view,
        );
        assert_eq!(painter.stack().depth(), 0);
        assert_eq!(painter.stack().current(), Mat4::IDENTITY);
        (painter.into_renderer(), camera)
    }

    #[test]
    fn keyframes_are_offset_and_sorted() {
        assert_eq!(keyframe(0), 8.0);
        assert_eq!(keyframe(KEYFRAME_COUNT - 1), 24.0);
        assert!(KEYFRAMES.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn stack_is_balanced_across_the_cycle() {
        let scene = BeachScene::new().unwrap();
        let mut painter = Painter::new(DrawList::new());
        for step in 0..60 {
            let cycle = step as f32 * 0.5;
            scene.compose(
                &mut painter,
                FrameTime {
                    elapsed: cycle,
                    cycle,
                },
                ViewAngles::new(10.0, 20.0, 30.0),
            );
            assert_eq!(painter.stack().depth(), 0, "at {cycle}");
        }
    }

    #[test]
    fn frame_contains_every_part() {
        let (list, _) = compose_at(0.0, ViewAngles::ZERO);
        assert_eq!(list.count_material(Material::Water), 1);
        assert_eq!(list.count_material(Material::Bark), TRUNK_SEGMENTS);
        assert_eq!(list.count_material(Material::Sand), 2);
        assert_eq!(list.count_material(Material::Flowers), 2);
        assert_eq!(list.count_material(Material::Eye), 2);
        let water: Vec<_> = list
            .commands()
            .iter()
            .filter(|d| d.program == Program::Water)
            .collect();
        assert_eq!(water.len(), 1);
        assert_eq!(water[0].material, Material::Water);
    }

    #[test]
    fn coconut_drop_only_in_its_window() {
        let scene = BeachScene::<DrawList>::new().unwrap();
        let drop = scene.palm_tree().coconut_drop();
        assert_eq!(drop.sample(keyframe(0) + 0.4).count(), 1);
        assert_eq!(drop.sample(keyframe(0) - 0.1).count(), 0);
        assert_eq!(drop.sample(keyframe(1) + 0.1).count(), 0);

        // Crown: 2 resting coconuts, character: hair.
        let hair = (HAIR_GRID * HAIR_GRID) as usize;
        let (before, _) = compose_at(5.0, ViewAngles::ZERO);
        assert_eq!(before.count_material(Material::Coconut), hair + 2);
        let (falling, _) = compose_at(keyframe(0) + 0.4, ViewAngles::ZERO);
        assert_eq!(falling.count_material(Material::Coconut), hair + 3);
    }

    #[test]
    fn turned_frame_leaves_painter_at_identity() {
        let scene = BeachScene::new().unwrap();
        let mut painter = Painter::new(DrawList::new());
        let time = FrameTime {
            elapsed: 12.0,
            cycle: 12.0,
        };
        scene.compose(&mut painter, time, ViewAngles::new(15.0, 40.0, -25.0));
        assert_eq!(painter.stack().depth(), 0);
        assert_eq!(painter.stack().current(), Mat4::IDENTITY);

        // A second frame on the same painter starts from the same root.
        let first = painter.renderer().commands()[0].model;
        painter.renderer_mut().clear();
        scene.compose(&mut painter, time, ViewAngles::new(15.0, 40.0, -25.0));
        assert!(painter.renderer().commands()[0].model.abs_diff_eq(first, 1e-5));
    }

    #[test]
    fn camera_yaw_turns_the_root() {
        let scene = BeachScene::<DrawList>::new().unwrap();
        assert_eq!(scene.rig(1.0).yaw, 0.0);
        assert_eq!(scene.rig(12.0).yaw, -210.0);

        // The water sphere sits at the root, so its model matrix is the root rotation.
        let (list, camera) = compose_at(12.0, ViewAngles::new(0.0, 30.0, 0.0));
        let expected = Mat4::from_axis_angle(Vec3::Y, (-180f32).to_radians())
            * Mat4::from_scale(Vec3::new(100.0, 0.01, 100.0));
        assert!(list.commands()[0].model.abs_diff_eq(expected, 1e-4));
        assert_eq!(camera.eye, Vec3::new(0.0, 5.0, -5.0));
    }
}
