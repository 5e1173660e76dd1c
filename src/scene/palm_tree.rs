use glam::Vec3;

use crate::clock::FrameTime;
use crate::material::Material;
use crate::painter::{Painter, Renderer};
use crate::primitive::Primitive;
use crate::timeline::{Timeline, TimelineError};

use super::keyframe;
use super::props::{CROWN_COCONUTS, coconut};

/// Number of stacked trunk segments.
pub const TRUNK_SEGMENTS: usize = 10;

/// Leaves per ring of the crown.
const LEAVES_PER_RING: u32 = 5;

/// Base droop of each ring of leaves, in degrees.
const LEAF_RINGS: [f32; 3] = [-20.0, 15.0, 30.0];

/// Palm tree on the island, with a coconut that drops as the scene opens.
pub struct PalmTree<R> {
    coconut_drop: Timeline<Painter<R>>,
}

impl<R: Renderer + 'static> PalmTree<R> {
    pub fn new() -> Result<Self, TimelineError> {
        let coconut_drop =
            Timeline::once(keyframe(0), keyframe(1) - keyframe(0), |p: &mut Painter<R>, lt| {
                coconut(p, CROWN_COCONUTS[1], Vec3::new(20.0 * lt * lt, 0.0, 0.0));
            })?;
        Ok(Self { coconut_drop })
    }

    pub fn coconut_drop(&self) -> &Timeline<Painter<R>> {
        &self.coconut_drop
    }

    pub fn draw(&self, p: &mut Painter<R>, time: FrameTime) {
        p.scoped(|p| {
            p.translate(-2.0, 0.4, 0.0).rotate(90.0, -1.0, 0.0, 0.0);

            p.draw_recursive(
                Material::Bark,
                Primitive::TaperedCylinder,
                TRUNK_SEGMENTS,
                |p| {
                    p.rotate(4.0, 0.0, 1.0, 0.0)
                        .translate(-0.0125, 0.0, 0.8)
                        .scale_uniform(0.9);
                },
            );

            // Crown
            p.scoped(|p| {
                p.translate(1.75, 0.0, 5.0).rotate(90.0, 1.0, 0.0, -1.0);
                leaves(p, time.elapsed);

                // The middle coconut only exists while it falls.
                self.coconut_drop.evaluate(time.cycle, p);
                coconut(p, CROWN_COCONUTS[0], Vec3::ZERO);
                coconut(p, CROWN_COCONUTS[2], Vec3::ZERO);
            });
        });
    }
}

/// Fronds swaying with unwrapped time so the sway never jumps at the loop point.
fn leaves<R: Renderer>(p: &mut Painter<R>, elapsed: f32) {
    for (ring, droop) in LEAF_RINGS.into_iter().enumerate() {
        let length = droop.abs() / 10.0;
        for leaf in 0..LEAVES_PER_RING {
            p.tapered_cylinder(Material::Grass, |p| {
                let sway = (elapsed + leaf as f32).cos() * 10.0;
                p.rotate(
                    360.0 / LEAVES_PER_RING as f32 * leaf as f32 + 35.0 * ring as f32,
                    0.0,
                    1.0,
                    0.0,
                )
                .rotate(sway + droop, 0.0, 0.0, 1.0)
                .translate(length / 3.0, 0.0, 0.0)
                .rotate(90.0, 0.0, 1.0, 0.0)
                .scale(LEAVES_PER_RING as f32 / 7.0, 0.01, length);
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::painter::DrawList;

    fn draw_at(cycle: f32) -> DrawList {
        let tree = PalmTree::new().unwrap();
        let mut p = Painter::new(DrawList::new());
        tree.draw(
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
    fn trunk_and_crown() {
        let list = draw_at(0.0);
        assert_eq!(list.count_material(Material::Bark), TRUNK_SEGMENTS);
        assert_eq!(list.count_material(Material::Grass), 15);
        assert_eq!(list.count_material(Material::Coconut), 2);
    }

    #[test]
    fn middle_coconut_only_while_falling() {
        assert_eq!(draw_at(8.4).count_material(Material::Coconut), 3);
        assert_eq!(draw_at(7.9).count_material(Material::Coconut), 2);
        assert_eq!(draw_at(8.9).count_material(Material::Coconut), 2);
    }

    #[test]
    fn falling_coconut_moves_away_from_rest() {
        let start = draw_at(8.0);
        let later = draw_at(8.8);
        // Order: leaves, falling coconut (holes then shell), then the two resting ones.
        let shell = |list: &DrawList| {
            list.commands()
                .iter()
                .filter(|d| d.material == Material::Coconut)
                .map(|d| d.model.w_axis.truncate())
                .next()
                .unwrap()
        };
        assert!(shell(&start).distance(shell(&later)) > 0.1);
    }
}
