//! Shape drawing on top of the matrix stack.
//!
//! [`Painter`] is the per-frame render context: it owns the [`MatrixStack`] and a
//! [`Renderer`] backend. Every shape goes through [`Painter::draw_object`], which
//!
//! 1. saves the current transform,
//! 2. runs the caller's transform closure (which may draw children first),
//! 3. binds the material and uploads the resulting transform,
//! 4. draws the primitive,
//! 5. restores the transform.
//!
//! ```
//! use beachside::{DrawList, Material, Painter, Primitive};
//!
//! let mut painter = Painter::new(DrawList::new());
//! painter.sphere(Material::Skin, |p| {
//!     p.translate(0.0, 0.0, 1.5);
//!     // An eye, positioned relative to the head.
//!     p.sphere(Material::Eye, |p| {
//!         p.translate(0.2, -0.4, 0.1).scale_uniform(0.1);
//!     });
//!     p.scale(0.5, 0.5, 0.6);
//! });
//!
//! let draws = painter.renderer().commands();
//! assert_eq!(draws.len(), 2);
//! assert_eq!(draws[0].material, Material::Eye);
//! assert_eq!(draws[1].primitive, Primitive::Sphere);
//! ```
//!
//! The painter takes `&mut self` everywhere, so draws are issued strictly in sequence on
//! whichever thread owns it.

use glam::Mat4;

use crate::material::{Material, Program};
use crate::matrix_stack::MatrixStack;
use crate::primitive::Primitive;

/// Backend that turns draw requests into pixels (or records them).
pub trait Renderer {
    /// Switch the shading program for subsequent draws.
    fn use_program(&mut self, program: Program);
    /// Bind the surface appearance for subsequent draws.
    fn bind_material(&mut self, material: Material);
    /// Upload the model transform for the next draw.
    fn upload_transform(&mut self, model: Mat4);
    /// Draw a primitive with the bound program, material and transform.
    fn draw(&mut self, primitive: Primitive);
}

/// One recorded draw.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DrawCommand {
    pub primitive: Primitive,
    pub material: Material,
    pub program: Program,
    pub model: Mat4,
}

/// A [`Renderer`] that records draws for later submission or inspection.
#[derive(Clone, Debug, Default)]
pub struct DrawList {
    commands: Vec<DrawCommand>,
    program: Program,
    material: Material,
    model: Mat4,
}

impl DrawList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Forget recorded draws and bound state.
    pub fn clear(&mut self) {
        self.commands.clear();
        self.program = Program::default();
        self.material = Material::default();
        self.model = Mat4::IDENTITY;
    }

    /// Number of draws using `material`.
    pub fn count_material(&self, material: Material) -> usize {
        self.commands
            .iter()
            .filter(|c| c.material == material)
            .count()
    }
}

impl Renderer for DrawList {
    fn use_program(&mut self, program: Program) {
        self.program = program;
    }

    fn bind_material(&mut self, material: Material) {
        self.material = material;
    }

    fn upload_transform(&mut self, model: Mat4) {
        self.model = model;
    }

    fn draw(&mut self, primitive: Primitive) {
        self.commands.push(DrawCommand {
            primitive,
            material: self.material,
            program: self.program,
            model: self.model,
        });
    }
}

/// Render context for one frame: matrix stack plus backend.
#[derive(Debug)]
pub struct Painter<R> {
    stack: MatrixStack,
    renderer: R,
    program: Program,
}

impl<R: Renderer> Painter<R> {
    pub fn new(renderer: R) -> Self {
        Self {
            stack: MatrixStack::new(),
            renderer,
            program: Program::Default,
        }
    }

    /// Reset the stack to identity and select the default program.
    pub fn begin_frame(&mut self) {
        self.stack.reset();
        self.program = Program::Default;
        self.renderer.use_program(Program::Default);
    }

    pub fn stack(&self) -> &MatrixStack {
        &self.stack
    }

    pub fn stack_mut(&mut self) -> &mut MatrixStack {
        &mut self.stack
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    pub fn into_renderer(self) -> R {
        self.renderer
    }

    pub fn program(&self) -> Program {
        self.program
    }

    pub fn translate(&mut self, x: f32, y: f32, z: f32) -> &mut Self {
        self.stack.translate(x, y, z);
        self
    }

    pub fn rotate(&mut self, angle_degrees: f32, x: f32, y: f32, z: f32) -> &mut Self {
        self.stack.rotate(angle_degrees, x, y, z);
        self
    }

    pub fn scale(&mut self, sx: f32, sy: f32, sz: f32) -> &mut Self {
        self.stack.scale(sx, sy, sz);
        self
    }

    pub fn scale_uniform(&mut self, factor: f32) -> &mut Self {
        self.stack.scale_uniform(factor);
        self
    }

    /// Run `f` with the transform saved and restored around it.
    pub fn scoped<T>(&mut self, f: impl FnOnce(&mut Self) -> T) -> T {
        self.stack.push();
        let out = f(self);
        self.stack.pop();
        out
    }

    /// Draw `primitive` in `material` after applying `transform` in a saved scope.
    ///
    /// `transform` may draw child shapes before it finishes shaping this one; children
    /// inherit whatever the closure had applied when they were drawn.
    pub fn draw_object(
        &mut self,
        material: Material,
        primitive: Primitive,
        transform: impl FnOnce(&mut Self),
    ) {
        self.scoped(|p| {
            transform(p);
            p.emit(material, primitive);
        });
    }

    pub fn cube(&mut self, material: Material, transform: impl FnOnce(&mut Self)) {
        self.draw_object(material, Primitive::Cube, transform);
    }

    pub fn sphere(&mut self, material: Material, transform: impl FnOnce(&mut Self)) {
        self.draw_object(material, Primitive::Sphere, transform);
    }

    pub fn cylinder(&mut self, material: Material, transform: impl FnOnce(&mut Self)) {
        self.draw_object(material, Primitive::Cylinder, transform);
    }

    pub fn cone(&mut self, material: Material, transform: impl FnOnce(&mut Self)) {
        self.draw_object(material, Primitive::Cone, transform);
    }

    pub fn tapered_cylinder(&mut self, material: Material, transform: impl FnOnce(&mut Self)) {
        self.draw_object(material, Primitive::TaperedCylinder, transform);
    }

    /// Draw a chain of `count` segments, each nested in the previous one.
    ///
    /// Segment `k` (1-based) is drawn with `step` applied `k` times on top of the current
    /// transform, so the chain compounds like a recursive hierarchy without recursing.
    /// The transform is restored afterwards. `count == 0` draws nothing.
    pub fn draw_recursive(
        &mut self,
        material: Material,
        primitive: Primitive,
        count: usize,
        mut step: impl FnMut(&mut Self),
    ) {
        if count == 0 {
            return;
        }
        self.scoped(|p| {
            for _ in 0..count {
                step(p);
                p.emit(material, primitive);
            }
        });
    }

    /// Draw everything in `f` with `program`, then restore the previous program.
    pub fn with_program<T>(&mut self, program: Program, f: impl FnOnce(&mut Self) -> T) -> T {
        let previous = self.program;
        self.set_program(program);
        let out = f(self);
        self.set_program(previous);
        out
    }

    fn set_program(&mut self, program: Program) {
        self.program = program;
        self.renderer.use_program(program);
    }

    fn emit(&mut self, material: Material, primitive: Primitive) {
        self.renderer.bind_material(material);
        self.renderer.upload_transform(self.stack.current());
        self.renderer.draw(primitive);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    fn painter() -> Painter<DrawList> {
        Painter::new(DrawList::new())
    }

    #[test]
    fn draw_object_restores_transform() {
        let mut p = painter();
        p.translate(1.0, 0.0, 0.0);
        let before = p.stack().current();

        p.cube(Material::Flowers, |p| {
            p.translate(0.0, 0.0, -2.0).rotate(45.0, 1.0, 0.0, 0.0);
        });

        assert_eq!(p.stack().current(), before);
        assert_eq!(p.stack().depth(), 0);

        let draw = p.renderer().commands()[0];
        assert_eq!(draw.material, Material::Flowers);
        assert_eq!(draw.primitive, Primitive::Cube);
        let origin = draw.model.transform_point3(Vec3::ZERO);
        assert!(origin.abs_diff_eq(Vec3::new(1.0, 0.0, -2.0), 1e-5));
    }

    #[test]
    fn children_inherit_partial_parent_transform() {
        let mut p = painter();
        p.sphere(Material::Skin, |p| {
            p.translate(0.0, 2.0, 0.0);
            p.sphere(Material::Eye, |p| {
                p.translate(1.0, 0.0, 0.0);
            });
            // Only the parent is flattened.
            p.scale(1.0, 0.1, 1.0);
        });

        let draws = p.renderer().commands();
        assert_eq!(draws.len(), 2);
        let eye = draws[0].model;
        let head = draws[1].model;
        assert!(eye
            .transform_point3(Vec3::Y)
            .abs_diff_eq(Vec3::new(1.0, 3.0, 0.0), 1e-5));
        assert!(head
            .transform_point3(Vec3::Y)
            .abs_diff_eq(Vec3::new(0.0, 2.1, 0.0), 1e-5));
    }

    #[test]
    fn draw_recursive_zero_is_a_no_op() {
        let mut p = painter();
        let mut calls = 0;
        p.draw_recursive(Material::Bark, Primitive::TaperedCylinder, 0, |_| calls += 1);
        assert!(p.renderer().is_empty());
        assert_eq!(calls, 0);
    }

    #[test]
    fn draw_recursive_compounds_step() {
        let mut p = painter();
        p.draw_recursive(Material::Bark, Primitive::TaperedCylinder, 3, |p| {
            p.translate(0.0, 0.0, 1.0).scale_uniform(0.5);
        });

        let step = Mat4::from_translation(Vec3::Z) * Mat4::from_scale(Vec3::splat(0.5));
        let draws = p.renderer().commands();
        assert_eq!(draws.len(), 3);
        let mut expected = Mat4::IDENTITY;
        for draw in draws {
            expected *= step;
            assert!(draw.model.abs_diff_eq(expected, 1e-5));
            assert_eq!(draw.material, Material::Bark);
        }
        assert_eq!(p.stack().current(), Mat4::IDENTITY);
        assert_eq!(p.stack().depth(), 0);
    }

    #[test]
    fn with_program_restores_previous_program() {
        let mut p = painter();
        p.begin_frame();
        p.with_program(Program::Water, |p| {
            p.sphere(Material::Water, |p| {
                p.scale(100.0, 0.01, 100.0);
            });
        });
        p.sphere(Material::Sand, |_| {});

        let draws = p.renderer().commands();
        assert_eq!(draws[0].program, Program::Water);
        assert_eq!(draws[1].program, Program::Default);
        assert_eq!(p.program(), Program::Default);
    }

    #[test]
    fn begin_frame_resets_stack() {
        let mut p = painter();
        p.stack_mut().push();
        p.translate(3.0, 3.0, 3.0);
        p.begin_frame();
        assert_eq!(p.stack().depth(), 0);
        assert_eq!(p.stack().current(), Mat4::IDENTITY);
    }

    #[test]
    fn draw_list_counts_materials() {
        let mut p = painter();
        for _ in 0..3 {
            p.sphere(Material::Skin, |_| {});
        }
        p.cone(Material::Black, |_| {});
        assert_eq!(p.renderer().count_material(Material::Skin), 3);
        assert_eq!(p.renderer().count_material(Material::Black), 1);

        let mut list = p.into_renderer();
        list.clear();
        assert!(list.is_empty());
    }
}
