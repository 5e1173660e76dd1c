//! Hierarchical model transforms with save/restore.
//!
//! [`MatrixStack`] holds the current cumulative model matrix and a stack of saved
//! snapshots. Every elementary operation right-multiplies the current matrix, so
//! operations read in the order they apply to a child's local space:
//!
//! ```
//! use beachside::MatrixStack;
//! use glam::Vec3;
//!
//! let mut stack = MatrixStack::new();
//! stack.translate(1.0, 0.0, 0.0);
//! stack.scoped(|s| {
//!     s.scale(2.0, 2.0, 2.0);
//!     let p = s.current().transform_point3(Vec3::X);
//!     assert_eq!(p, Vec3::new(3.0, 0.0, 0.0));
//! });
//! assert_eq!(stack.depth(), 0);
//! ```
//!
//! # Balance
//!
//! Popping an empty stack is a programming error and panics. Prefer [`MatrixStack::scoped`]
//! or [`MatrixStack::save`], which pair the push and pop structurally.

use std::ops::{Deref, DerefMut};

use glam::{Mat4, Vec3};

/// The current model transform plus its saved ancestors.
#[derive(Clone, Debug)]
pub struct MatrixStack {
    current: Mat4,
    saved: Vec<Mat4>,
}

impl Default for MatrixStack {
    fn default() -> Self {
        Self {
            current: Mat4::IDENTITY,
            saved: Vec::new(),
        }
    }
}

impl MatrixStack {
    /// Create an empty stack with an identity transform.
    pub fn new() -> Self {
        Self::default()
    }

    /// The current cumulative transform.
    pub fn current(&self) -> Mat4 {
        self.current
    }

    /// Number of saved transforms.
    pub fn depth(&self) -> usize {
        self.saved.len()
    }

    /// Drop all saved transforms and return to identity.
    pub fn reset(&mut self) {
        self.reset_to(Mat4::IDENTITY);
    }

    /// Drop all saved transforms and install `root` as the current transform.
    pub fn reset_to(&mut self, root: Mat4) {
        self.saved.clear();
        self.current = root;
    }

    /// Right-multiply by a translation.
    pub fn translate(&mut self, x: f32, y: f32, z: f32) -> &mut Self {
        self.current *= Mat4::from_translation(Vec3::new(x, y, z));
        self
    }

    /// Right-multiply by a rotation of `angle_degrees` about the axis `(x, y, z)`.
    ///
    /// The axis does not need to be unit length. A zero axis has no direction and
    /// leaves the transform untouched (and trips a debug assertion).
    pub fn rotate(&mut self, angle_degrees: f32, x: f32, y: f32, z: f32) -> &mut Self {
        let axis = Vec3::new(x, y, z).normalize_or_zero();
        debug_assert!(axis != Vec3::ZERO, "rotation axis must be non-zero");
        if axis != Vec3::ZERO {
            self.current *= Mat4::from_axis_angle(axis, angle_degrees.to_radians());
        }
        self
    }

    /// Right-multiply by a per-axis scale.
    pub fn scale(&mut self, sx: f32, sy: f32, sz: f32) -> &mut Self {
        self.current *= Mat4::from_scale(Vec3::new(sx, sy, sz));
        self
    }

    /// Right-multiply by the same scale on every axis.
    pub fn scale_uniform(&mut self, factor: f32) -> &mut Self {
        self.scale(factor, factor, factor)
    }

    /// Save a copy of the current transform.
    pub fn push(&mut self) {
        self.saved.push(self.current);
    }

    /// Restore the most recently saved transform.
    ///
    /// # Panics
    ///
    /// Panics if nothing has been pushed.
    pub fn pop(&mut self) {
        self.current = self
            .saved
            .pop()
            .expect("MatrixStack::pop called on an empty stack");
    }

    /// Run `f` between a push and the matching pop.
    pub fn scoped<T>(&mut self, f: impl FnOnce(&mut Self) -> T) -> T {
        self.push();
        let out = f(self);
        self.pop();
        out
    }

    /// Push now and pop when the returned guard is dropped.
    ///
    /// ```
    /// use beachside::MatrixStack;
    ///
    /// let mut stack = MatrixStack::new();
    /// {
    ///     let mut saved = stack.save();
    ///     saved.translate(0.0, 5.0, 0.0);
    ///     assert_eq!(saved.depth(), 1);
    /// }
    /// assert_eq!(stack.depth(), 0);
    /// assert_eq!(stack.current(), glam::Mat4::IDENTITY);
    /// ```
    pub fn save(&mut self) -> SavedTransform<'_> {
        self.push();
        SavedTransform { stack: self }
    }
}

/// Guard returned by [`MatrixStack::save`]. Pops on drop.
pub struct SavedTransform<'a> {
    stack: &'a mut MatrixStack,
}

impl Deref for SavedTransform<'_> {
    type Target = MatrixStack;

    fn deref(&self) -> &MatrixStack {
        self.stack
    }
}

impl DerefMut for SavedTransform<'_> {
    fn deref_mut(&mut self) -> &mut MatrixStack {
        self.stack
    }
}

impl Drop for SavedTransform<'_> {
    fn drop(&mut self) {
        self.stack.pop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-5;

    #[test]
    fn push_pop_restores_transform() {
        let mut stack = MatrixStack::new();
        stack.translate(1.0, 2.0, 3.0).rotate(30.0, 0.0, 1.0, 0.0);
        let before = stack.current();

        stack.push();
        stack
            .translate(-4.0, 0.5, 9.0)
            .rotate(77.0, 1.0, 1.0, 0.0)
            .scale(0.3, 2.0, 5.0);
        stack.push();
        stack.rotate(-15.0, 0.0, 0.0, 1.0);
        stack.pop();
        stack.pop();

        assert_eq!(stack.current(), before);
        assert_eq!(stack.depth(), 0);
    }

    #[test]
    fn scale_then_inverse_scale_is_identity() {
        let mut stack = MatrixStack::new();
        stack.scale(2.0, 2.0, 2.0);
        stack.scale(0.5, 0.5, 0.5);
        assert!(stack.current().abs_diff_eq(Mat4::IDENTITY, EPS));
    }

    #[test]
    fn operations_right_multiply() {
        let mut stack = MatrixStack::new();
        stack.translate(10.0, 0.0, 0.0);
        stack.rotate(90.0, 0.0, 0.0, 1.0);

        // The rotation applies in the translated frame, so +X maps to +Y then shifts.
        let p = stack.current().transform_point3(Vec3::X);
        assert!(p.abs_diff_eq(Vec3::new(10.0, 1.0, 0.0), EPS));
    }

    #[test]
    fn rotation_axis_is_normalized() {
        let mut a = MatrixStack::new();
        a.rotate(45.0, 0.0, 5.0, -5.0);
        let mut b = MatrixStack::new();
        b.rotate(45.0, 0.0, 1.0, -1.0);
        assert!(a.current().abs_diff_eq(b.current(), EPS));
    }

    #[test]
    fn scoped_returns_closure_value_and_balances() {
        let mut stack = MatrixStack::new();
        let depth_inside = stack.scoped(|s| {
            s.translate(1.0, 1.0, 1.0);
            s.scoped(|s| s.depth())
        });
        assert_eq!(depth_inside, 2);
        assert_eq!(stack.depth(), 0);
        assert_eq!(stack.current(), Mat4::IDENTITY);
    }

    #[test]
    fn reset_to_clears_saved() {
        let mut stack = MatrixStack::new();
        stack.push();
        stack.push();
        let root = Mat4::from_translation(Vec3::Y);
        stack.reset_to(root);
        assert_eq!(stack.depth(), 0);
        assert_eq!(stack.current(), root);
    }

    #[test]
    #[should_panic(expected = "empty stack")]
    fn pop_on_empty_stack_panics() {
        let mut stack = MatrixStack::new();
        stack.pop();
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "rotation axis must be non-zero")]
    fn zero_axis_rotation_panics_in_debug() {
        MatrixStack::new().rotate(45.0, 0.0, 0.0, 0.0);
    }

    /// xorshift32, so the generated op sequences are reproducible.
    fn next(state: &mut u32) -> u32 {
        *state ^= *state << 13;
        *state ^= *state >> 17;
        *state ^= *state << 5;
        *state
    }

    fn unit(state: &mut u32) -> f32 {
        (next(state) % 2001) as f32 / 1000.0 - 1.0
    }

    #[test]
    fn generated_push_pop_sequences_match_a_reference_stack() {
        for seed in 1..=64u32 {
            let mut rng = seed.wrapping_mul(0x9E37_79B9) | 1;
            let mut stack = MatrixStack::new();
            let mut current = Mat4::IDENTITY;
            let mut saved: Vec<Mat4> = Vec::new();

            for _ in 0..200 {
                match next(&mut rng) % 5 {
                    0 => {
                        stack.push();
                        saved.push(current);
                    }
                    1 if !saved.is_empty() => {
                        stack.pop();
                        current = saved.pop().unwrap();
                    }
                    1 | 2 => {
                        let t = Vec3::new(unit(&mut rng), unit(&mut rng), unit(&mut rng)) * 5.0;
                        stack.translate(t.x, t.y, t.z);
                        current *= Mat4::from_translation(t);
                    }
                    3 => {
                        let angle = unit(&mut rng) * 180.0;
                        let axis = Vec3::new(unit(&mut rng), unit(&mut rng), 1.5);
                        stack.rotate(angle, axis.x, axis.y, axis.z);
                        current *= Mat4::from_axis_angle(axis.normalize(), angle.to_radians());
                    }
                    _ => {
                        let s = Vec3::new(unit(&mut rng), unit(&mut rng), unit(&mut rng)) * 0.5
                            + Vec3::splat(1.0);
                        stack.scale(s.x, s.y, s.z);
                        current *= Mat4::from_scale(s);
                    }
                }
                assert_eq!(stack.depth(), saved.len(), "seed {seed}");
            }

            // Unwinding every save lands back on the outermost transform.
            while let Some(m) = saved.pop() {
                stack.pop();
                current = m;
                assert!(stack.current().abs_diff_eq(current, 1e-3), "seed {seed}");
            }
            assert_eq!(stack.depth(), 0);
        }
    }
}
