//! The character lounging in the chair.
//!
//! Arms are jointed at the shoulder, elbow and wrist. Each joint is posed by its own
//! [`Timeline`], built once and evaluated inside the joint's transform scope so the pose
//! composes with everything above it. The left arm catches the falling coconut, sips
//! from it, and throws it away; the right arm hands over the straw.

use crate::clock::FrameTime;
use crate::easing::Ease;
use crate::material::Material;
use crate::painter::{Painter, Renderer};
use crate::timeline::{Timeline, TimelineBuilder, TimelineError};

use super::keyframe;
use super::props::{held_coconut, straw};

/// Hair strands per side of the square grid on the scalp.
pub const HAIR_GRID: i32 = 31;

const SHIRT: Material = Material::Squirrels;
const SHORTS: Material = Material::Denim;
const SKIN: Material = Material::Skin;

/// Relative toe sizes, big toe first.
const TOES: [f32; 5] = [1.75, 1.0, 1.0, 1.0, 1.0];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    /// -1 on the left, +1 on the right.
    pub fn sign(self) -> f32 {
        match self {
            Side::Left => -1.0,
            Side::Right => 1.0,
        }
    }
}

/// One shoulder keyframe: fly, lateral raise and twist angles, each eased from the first
/// value to the second.
#[derive(Clone, Copy, Debug)]
struct ShoulderKey {
    start: f32,
    end: f32,
    fly: [f32; 2],
    raise: [f32; 2],
    twist: [f32; 2],
}

impl ShoulderKey {
    const fn new(start: f32, end: f32, fly: [f32; 2], raise: [f32; 2], twist: [f32; 2]) -> Self {
        Self {
            start,
            end,
            fly,
            raise,
            twist,
        }
    }

    fn apply<R: Renderer>(&self, p: &mut Painter<R>, ease: Ease, side: Side) {
        p.rotate(ease.between(self.fly[0], self.fly[1]), 1.0, 0.0, 0.0)
            .rotate(ease.between(self.raise[0], self.raise[1]), 0.0, side.sign(), 0.0)
            .rotate(ease.between(self.twist[0], self.twist[1]), 0.0, 0.0, 1.0);
    }
}

/// Elbow bend eased between two angles.
#[derive(Clone, Copy, Debug)]
struct ElbowKey {
    start: f32,
    end: f32,
    bend: [f32; 2],
}

impl ElbowKey {
    const fn new(start: f32, end: f32, bend: [f32; 2]) -> Self {
        Self { start, end, bend }
    }
}

// Reach up for the coconut, catch it, then three sips and a throw.
static LEFT_SHOULDER: [ShoulderKey; 8] = [
    ShoulderKey::new(keyframe(1) - 0.4, keyframe(1), [20.0, -5.0], [56.0, 44.0], [-25.0, 0.0]),
    ShoulderKey::new(keyframe(1), keyframe(2), [-5.0, 20.0], [44.0, 56.0], [0.0, -30.0]),
    ShoulderKey::new(keyframe(3), keyframe(4), [20.0, 35.0], [56.0, 0.0], [-30.0, 7.0]),
    ShoulderKey::new(keyframe(5), keyframe(6), [35.0, 20.0], [0.0, 56.0], [7.0, -30.0]),
    ShoulderKey::new(keyframe(7), keyframe(8), [20.0, 35.0], [56.0, 0.0], [-30.0, 7.0]),
    ShoulderKey::new(keyframe(9), keyframe(10), [35.0, 20.0], [0.0, 56.0], [7.0, -30.0]),
    ShoulderKey::new(keyframe(11), keyframe(12), [20.0, 35.0], [56.0, 0.0], [-30.0, 40.0]),
    ShoulderKey::new(keyframe(13), keyframe(14), [35.0, 20.0], [0.0, 56.0], [40.0, -30.0]),
];

// Pass the straw across and return.
static RIGHT_SHOULDER: [ShoulderKey; 3] = [
    ShoulderKey::new(keyframe(1), keyframe(2), [20.0, 40.0], [56.0, -40.0], [25.0, -90.0]),
    ShoulderKey::new(keyframe(2), keyframe(3), [40.0, 65.0], [-40.0, 35.0], [-90.0, 15.0]),
    ShoulderKey::new(keyframe(3), keyframe(4), [65.0, 20.0], [35.0, 56.0], [15.0, 25.0]),
];

static LEFT_ELBOW: [ElbowKey; 6] = [
    ElbowKey::new(keyframe(1) - 0.4, keyframe(1), [80.0, 56.5]),
    ElbowKey::new(keyframe(1), keyframe(2), [56.5, 85.0]),
    ElbowKey::new(keyframe(3), keyframe(4), [85.0, 130.0]),
    ElbowKey::new(keyframe(5), keyframe(6), [130.0, 85.0]),
    ElbowKey::new(keyframe(7), keyframe(8), [85.0, 130.0]),
    ElbowKey::new(keyframe(9), keyframe(10), [130.0, 85.0]),
];

static RIGHT_ELBOW: [ElbowKey; 2] = [
    ElbowKey::new(keyframe(1), keyframe(2), [80.0, 100.0]),
    ElbowKey::new(keyframe(2), keyframe(3), [100.0, 70.0]),
];

/// Joint timelines for one arm.
pub struct Arm<R> {
    side: Side,
    shoulder: Timeline<Painter<R>>,
    elbow: Timeline<Painter<R>>,
    wrist: Timeline<Painter<R>>,
}

impl<R: Renderer + 'static> Arm<R> {
    pub fn new(side: Side) -> Result<Self, TimelineError> {
        let (shoulder_keys, elbow_keys): (&[ShoulderKey], &[ElbowKey]) = match side {
            Side::Left => (&LEFT_SHOULDER[..], &LEFT_ELBOW[..]),
            Side::Right => (&RIGHT_SHOULDER[..], &RIGHT_ELBOW[..]),
        };

        let shoulder = shoulder_keys
            .iter()
            .fold(
                Timeline::<Painter<R>>::builder().show_before(true),
                |builder, &key| {
                    builder.window(key.start, key.end, move |p, _, ease| {
                        key.apply(p, ease, side)
                    })
                },
            )
            .build()?;

        let elbow = elbow_keys
            .iter()
            .fold(
                Timeline::<Painter<R>>::builder().show_before(true),
                |builder, &key| {
                    builder.window(key.start, key.end, move |p, _, ease| {
                        p.rotate(ease.between(key.bend[0], key.bend[1]), 1.0, 0.0, 0.0);
                    })
                },
            )
            .build()?;

        let wrist = match side {
            Side::Left => left_wrist(),
            Side::Right => right_wrist(),
        }
        .build()?;

        Ok(Self {
            side,
            shoulder,
            elbow,
            wrist,
        })
    }

    pub fn side(&self) -> Side {
        self.side
    }

    pub fn shoulder(&self) -> &Timeline<Painter<R>> {
        &self.shoulder
    }

    pub fn elbow(&self) -> &Timeline<Painter<R>> {
        &self.elbow
    }

    pub fn wrist(&self) -> &Timeline<Painter<R>> {
        &self.wrist
    }

    /// Sleeve, upper arm, elbow, forearm and hand, starting at the chest.
    fn draw(&self, p: &mut Painter<R>, time: f32) {
        let e = self.side.sign();
        p.tapered_cylinder(SHIRT, |p| {
            p.rotate(90.0, 0.0, e, 0.0).translate(e * 0.4, 0.0, 0.35);
            self.shoulder.evaluate(time, p);
            p.translate(0.0, 0.0, 0.5);

            // Upper arm
            p.tapered_cylinder(SKIN, |p| {
                p.translate(0.0, 0.0, 0.5);

                // Elbow
                p.sphere(SKIN, |p| {
                    p.translate(0.0, 0.0, 0.25);

                    // Forearm
                    p.tapered_cylinder(SKIN, |p| {
                        self.elbow.evaluate(time, p);
                        p.translate(0.0, 0.0, 0.5);

                        // Hand
                        p.sphere(SKIN, |p| {
                            p.translate(0.0, 0.0, 0.5);
                            self.wrist.evaluate(time, p);
                            p.scale_uniform(0.15);
                        });

                        p.scale(0.3, 0.3, 1.0);
                    });

                    p.scale_uniform(0.14);
                });

                p.scale(0.35, 0.4, 0.5);
            });

            p.scale(0.5, 0.5, 0.75);
        });
    }
}

/// Palm up to catch, turn to hold, tilt to sip, then throw.
fn left_wrist<R: Renderer + 'static>() -> TimelineBuilder<Painter<R>> {
    Timeline::<Painter<R>>::builder()
        .show_after(false)
        .window(keyframe(0), keyframe(1), |p, _, _| {
            p.rotate(180.0, 0.0, 0.0, 1.0);
        })
        .window(keyframe(1), keyframe(2), |p, _, ease| {
            p.rotate(ease.between(180.0, 90.0), 0.0, 0.0, 1.0);
            held_coconut(p, false);
        })
        .window(keyframe(3), keyframe(4), |p, _, ease| {
            p.rotate(ease.between(90.0, 120.0), 0.0, 0.0, 1.0)
                .rotate(ease.between(0.0, -25.0), 1.0, 0.0, 0.0);
            held_coconut(p, true);
        })
        .window(keyframe(11), keyframe(12), |p, _, ease| {
            p.rotate(ease.between(120.0, 155.0), 0.0, 0.0, 1.0)
                .rotate(ease.between(-25.0, 0.0), 1.0, 0.0, 0.0);
            held_coconut(p, true);
        })
        .window(keyframe(12), keyframe(13), |p, lt, _| {
            p.rotate(155.0, 0.0, 0.0, 1.0);
            p.scoped(|p| {
                // Ballistic arc away from the hand.
                p.translate(-lt * 20.0, 0.0, -20.0 * lt * lt + 5.0 * lt);
                held_coconut(p, true);
            });
        })
}

/// Hold out the straw for one beat.
fn right_wrist<R: Renderer + 'static>() -> TimelineBuilder<Painter<R>> {
    Timeline::<Painter<R>>::builder()
        .show_after(false)
        .window(keyframe(2), keyframe(3), |p, _, _| {
            p.rotate(-50.0, 0.0, 0.0, 1.0)
                .rotate(80.0, 0.0, 1.0, 0.0)
                .rotate(12.0, 1.0, 0.0, 0.0);
            p.scoped(|p| {
                p.scale_uniform(2.0)
                    .rotate(180.0, 0.0, 1.0, 0.0)
                    .rotate(50.0, 0.0, 0.0, 1.0)
                    .translate(0.1, 0.15, -0.3);
                straw(p);
            });
        })
}

/// The character, seated on the chair.
pub struct Character<R> {
    arms: [Arm<R>; 2],
}

impl<R: Renderer + 'static> Character<R> {
    pub fn new() -> Result<Self, TimelineError> {
        Ok(Self {
            arms: [Arm::new(Side::Left)?, Arm::new(Side::Right)?],
        })
    }

    pub fn arm(&self, side: Side) -> &Arm<R> {
        match side {
            Side::Left => &self.arms[0],
            Side::Right => &self.arms[1],
        }
    }

    pub fn draw(&self, p: &mut Painter<R>, time: FrameTime) {
        p.scoped(|p| {
            p.scale_uniform(0.5).translate(1.0, 4.0, 0.0);

            // Waist
            p.tapered_cylinder(SHIRT, |p| {
                p.translate(0.0, -0.3, -1.1).rotate(-135.0, 1.0, 0.0, 0.0);

                // Chest
                p.tapered_cylinder(SHIRT, |p| {
                    p.translate(0.0, 0.0, 0.8);

                    // Neck
                    p.tapered_cylinder(SKIN, |p| {
                        p.translate(0.0, 0.0, 0.2).scale(1.0, 0.65, 0.25);
                    });

                    for arm in &self.arms {
                        arm.draw(p, time.cycle);
                    }

                    p.scale(1.2, 0.85, 0.25);
                });

                head(p);
                hips(p);

                p.scale(1.5, 1.0, 1.5);
            });
        });
    }
}

fn head<R: Renderer>(p: &mut Painter<R>) {
    p.sphere(SKIN, |p| {
        p.translate(0.0, 0.0, 1.5);

        for e in [-1.0f32, 1.0] {
            p.sphere(Material::Eye, |p| {
                p.translate(e * 0.2, -0.4, 0.1)
                    .rotate(e * 20.0, 0.0, 0.0, 1.0)
                    .scale_uniform(0.1);
            });
        }

        // Mouth, with a lip over it
        p.sphere(Material::Black, |p| {
            p.translate(0.0, -0.28, -0.2).scale_uniform(0.2);
        });
        p.sphere(SKIN, |p| {
            p.translate(0.0, -0.28, -0.17).scale_uniform(0.21);
        });

        hair(p);

        p.scale(0.5, 0.5, 0.6);
    });
}

/// A square grid of strands fanned over the scalp, longer toward the back.
fn hair<R: Renderer>(p: &mut Painter<R>) {
    let half = HAIR_GRID / 2;
    for y in -half..=half {
        for x in -half..=half {
            p.scoped(|p| {
                p.rotate(y as f32 * 3.0, 1.0, 0.0, 0.0);
                p.tapered_cylinder(Material::Coconut, |p| {
                    p.rotate(x as f32 * 3.0, 0.0, 1.0, 0.0)
                        .translate(0.0, 0.0, 0.6)
                        .scale(0.03, 0.03, 0.2 + y as f32 / 100.0);
                });
            });
        }
    }
}

fn hips<R: Renderer>(p: &mut Painter<R>) {
    p.cylinder(SHORTS, |p| {
        p.rotate(135.0, 1.0, 0.0, 0.0).translate(0.0, -0.5, 0.75);

        p.sphere(SHORTS, |p| {
            p.scale(0.6, 0.25, 0.1);
        });

        for e in [-1.0f32, 1.0] {
            leg(p, e);
        }

        p.scale(1.49, 0.5, 0.5);
    });
}

fn leg<R: Renderer>(p: &mut Painter<R>, e: f32) {
    // Thigh
    p.tapered_cylinder(SHORTS, |p| {
        p.translate(e / 3.0, 0.0, 0.85);

        // Shin
        p.tapered_cylinder(SKIN, |p| {
            p.translate(0.0, 0.0, 1.0);

            // Foot
            p.sphere(SKIN, |p| {
                p.translate(0.0, 0.15, 0.65).rotate(15.0, 1.0, 0.0, -e);

                for (i, size) in TOES.into_iter().enumerate() {
                    let i = i as f32;
                    p.sphere(SKIN, |p| {
                        p.translate(
                            e * (i - size) / 25.0,
                            0.35 - (i / 3.0).tan() / 60.0,
                            0.02,
                        )
                        .scale(0.025 * size, 0.035 * size, 0.03);
                    });
                }

                p.scale(0.175, 0.35, 0.1);
            });

            p.scale(0.4, 0.3, 1.25);
        });

        p.scale(0.75, 0.4, 1.25);
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::painter::DrawList;
    use crate::primitive::Primitive;
    use crate::timeline::Phase;

    fn draw_at(cycle: f32) -> DrawList {
        let character = Character::new().unwrap();
        let mut p = Painter::new(DrawList::new());
        character.draw(
            &mut p,
            FrameTime {
                elapsed: cycle,
                cycle,
            },
        );
        assert_eq!(p.stack().depth(), 0);
        p.into_renderer()
    }

    #[test]
    fn hair_grid_is_complete() {
        let list = draw_at(0.0);
        let strands = list
            .commands()
            .iter()
            .filter(|d| d.material == Material::Coconut && d.primitive == Primitive::TaperedCylinder)
            .count();
        assert_eq!(strands, (HAIR_GRID * HAIR_GRID) as usize);
    }

    #[test]
    fn ten_toes() {
        let list = draw_at(0.0);
        // Two feet, ten toes, two elbows, two hands, head, lip.
        assert_eq!(
            list.commands()
                .iter()
                .filter(|d| d.material == SKIN && d.primitive == Primitive::Sphere)
                .count(),
            18
        );
    }

    #[test]
    fn left_hand_holds_coconut_between_catch_and_throw() {
        // Before the catch there is nothing in hand.
        assert_eq!(draw_at(5.0).count_material(Material::Coconut), HAIR_GRID.pow(2) as usize);
        // Sipping, with straw.
        let sipping = draw_at(keyframe(8));
        assert_eq!(
            sipping.count_material(Material::Coconut),
            HAIR_GRID.pow(2) as usize + 1
        );
        assert_eq!(sipping.count_material(Material::Rust), 3);
        // Long after the throw.
        assert_eq!(draw_at(29.0).count_material(Material::Coconut), HAIR_GRID.pow(2) as usize);
    }

    #[test]
    fn right_hand_passes_straw() {
        let list = draw_at((keyframe(2) + keyframe(3)) / 2.0);
        // Left hand holds the coconut without a straw in this beat.
        assert_eq!(list.count_material(Material::Rust), 3);
    }

    #[test]
    fn shoulders_hold_first_pose_before_animation() {
        let character = Character::<DrawList>::new().unwrap();
        for side in [Side::Left, Side::Right] {
            let samples: Vec<_> = character.arm(side).shoulder().sample(0.0).collect();
            assert_eq!(samples.len(), 1);
            assert_eq!(samples[0].phase, Phase::Before);
        }
        let wrist: Vec<_> = character.arm(Side::Left).wrist().sample(0.0).collect();
        assert!(wrist.is_empty());
    }
}
