//! Static scenery and small reusable objects.

use glam::Vec3;

use crate::material::{Material, Program};
use crate::painter::{Painter, Renderer};

/// Where the three coconuts hang in the palm crown, in coconut-local units.
pub const CROWN_COCONUTS: [Vec3; 3] = [
    Vec3::new(2.0, -1.5, -1.0),
    Vec3::new(3.0, -1.0, 0.0),
    Vec3::new(2.0, -1.5, 1.0),
];

/// Where a held coconut sits relative to the hand.
pub const HELD_COCONUT: Vec3 = Vec3::new(0.0, 0.0, 1.25);

const COCONUT_HOLES: u32 = 3;

/// The ocean: a huge, flat sphere drawn with the water program.
pub fn water<R: Renderer>(p: &mut Painter<R>) {
    p.with_program(Program::Water, |p| {
        p.sphere(Material::Water, |p| {
            p.scale(100.0, 0.01, 100.0);
        });
    });
}

/// Grass mound ringed by two layers of sand.
pub fn island<R: Renderer>(p: &mut Painter<R>) {
    p.scoped(|p| {
        p.sphere(Material::Grass, |p| {
            p.scale(5.0, 1.0, 5.0);
        });
        p.sphere(Material::Sand, |p| {
            p.translate(-1.0, 0.0, 0.0).scale(5.0, 0.97, 5.0);
        });
        p.sphere(Material::Sand, |p| {
            p.scale(5.5, 0.75, 5.5);
        });
    });
}

/// Coconut with three dark eyes.
///
/// `position` is the resting spot and `offset` moves it from there along the
/// coconut's tilted frame.
pub fn coconut<R: Renderer>(p: &mut Painter<R>, position: Vec3, offset: Vec3) {
    p.scoped(|p| {
        p.rotate(45.0, 0.0, 1.0, -1.0)
            .scale_uniform(0.2)
            .translate(position.x, position.y, position.z)
            .rotate(-20.0, 0.0, 0.0, 1.0)
            .translate(offset.x, offset.y, offset.z);

        p.sphere(Material::Coconut, |p| {
            for hole in 0..COCONUT_HOLES {
                p.sphere(Material::Black, |p| {
                    p.rotate(hole as f32 / COCONUT_HOLES as f32 * 360.0, 0.0, 1.0, 0.0)
                        .translate(0.0, -0.8, -0.25)
                        .scale_uniform(0.2);
                });
            }
        });
    });
}

/// Bent drinking straw.
pub fn straw<R: Renderer>(p: &mut Painter<R>) {
    let material = Material::Rust;
    p.scoped(|p| {
        p.rotate(90.0, 1.0, 0.0, 0.0).rotate(-60.0, 0.0, 1.0, 0.0);
        p.cylinder(material, |p| {
            p.translate(0.11, 0.22, 0.2);
            // Bend
            p.sphere(material, |p| {
                p.translate(0.0, 0.0, 0.11).rotate(-90.0, 0.0, 0.0, 1.0);
                p.cylinder(material, |p| {
                    p.rotate(45.0, 1.0, 0.0, 0.0)
                        .translate(0.0, 0.0, 0.09)
                        .scale(0.03, 0.03, 0.15);
                });
                p.scale_uniform(0.02);
            });
            p.scale(0.03, 0.03, 0.25);
        });
    });
}

/// Coconut held in a hand, optionally with a straw in it.
pub fn held_coconut<R: Renderer>(p: &mut Painter<R>, with_straw: bool) {
    p.scoped(|p| {
        p.scale_uniform(2.0).rotate(-20.0, 0.0, 1.0, 0.0);
        coconut(p, HELD_COCONUT, Vec3::ZERO);
        if with_straw {
            straw(p);
        }
    });
}

/// Deck chair with flowered fabric on a wooden frame.
pub fn beach_chair<R: Renderer>(p: &mut Painter<R>) {
    p.scoped(|p| {
        p.scale_uniform(0.5).translate(1.0, 3.8, 0.0);

        // Back rest
        p.cube(Material::Flowers, |p| {
            p.translate(0.0, 0.0, -2.0)
                .rotate(45.0, 1.0, 0.0, 0.0)
                .scale(1.0, 0.02, 1.5);
        });
        // Seat
        p.cube(Material::Flowers, |p| {
            p.translate(0.0, -1.0, 1.0).scale(1.0, 0.02, 2.0);
        });

        for side in [-1.0f32, 1.0] {
            p.scoped(|p| {
                p.translate(side, 0.0, 0.0);
                chair_side(p, side);
            });
        }
    });
}

fn chair_side<R: Renderer>(p: &mut Painter<R>, side: f32) {
    let wood = Material::ChairWood;

    // Seat rail
    p.cylinder(wood, |p| {
        p.translate(0.0, -1.0, 1.0).scale(0.2, 0.2, 4.1);
    });
    // Back rail
    p.cylinder(wood, |p| {
        p.translate(0.0, 0.0, -2.0)
            .rotate(45.0, 1.0, 0.0, 0.0)
            .scale(0.2, 0.2, 3.0);
    });
    // Back rail cap
    p.sphere(wood, |p| {
        p.translate(0.0, 1.025, -3.025)
            .rotate(45.0, 1.0, 0.0, 0.0)
            .scale_uniform(0.1);
    });
    // Back leg
    p.cylinder(wood, |p| {
        p.translate(0.0, -1.5, -1.5)
            .rotate(135.0, 1.0, 0.0, 0.0)
            .scale(0.2, 0.2, 1.5);
    });
    // Front leg
    p.cylinder(wood, |p| {
        p.translate(0.0, -1.5, 3.5)
            .rotate(45.0, 1.0, 0.0, 0.0)
            .scale(0.2, 0.2, 1.5);
    });
    // Head bar
    p.cylinder(wood, |p| {
        p.rotate(90.0, 0.0, 1.0, 0.0)
            .translate(3.0, 1.0, -side / 2.0)
            .scale(0.2, 0.2, 1.0);
    });
    // Foot bar
    p.cylinder(wood, |p| {
        p.rotate(90.0, 0.0, 1.0, 0.0)
            .translate(-3.0, -1.0, -side / 2.0)
            .scale(0.2, 0.2, 1.0);
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::painter::DrawList;
    use crate::primitive::Primitive;

    #[test]
    fn coconut_draws_shell_after_holes() {
        let mut p = Painter::new(DrawList::new());
        coconut(&mut p, CROWN_COCONUTS[0], Vec3::ZERO);
        let draws = p.renderer().commands();
        assert_eq!(draws.len(), 4);
        assert!(draws[..3].iter().all(|d| d.material == Material::Black));
        assert_eq!(draws[3].material, Material::Coconut);
        assert_eq!(p.stack().depth(), 0);
    }

    #[test]
    fn water_uses_water_program() {
        let mut p = Painter::new(DrawList::new());
        water(&mut p);
        island(&mut p);
        let draws = p.renderer().commands();
        assert_eq!(draws[0].program, Program::Water);
        assert!(draws[1..].iter().all(|d| d.program == Program::Default));
    }

    #[test]
    fn chair_is_mirrored() {
        let mut p = Painter::new(DrawList::new());
        beach_chair(&mut p);
        let list = p.renderer();
        assert_eq!(list.count_material(Material::Flowers), 2);
        assert_eq!(list.count_material(Material::ChairWood), 14);
        let caps = list
            .commands()
            .iter()
            .filter(|d| d.primitive == Primitive::Sphere)
            .count();
        assert_eq!(caps, 2);
    }

    #[test]
    fn straw_has_three_parts() {
        let mut p = Painter::new(DrawList::new());
        held_coconut(&mut p, true);
        assert_eq!(p.renderer().count_material(Material::Rust), 3);
        assert_eq!(p.renderer().count_material(Material::Coconut), 1);
    }
}
