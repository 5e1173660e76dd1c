//! Surface materials and shading programs.
//!
//! Every drawable surface in the scene names a [`Material`]. Backends keep per-material
//! GPU state in a [`MaterialTable`], an array indexed by the enum, so lookups are typed
//! and total.

use std::ops::{Index, IndexMut};

/// Linear RGBA color.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub const WHITE: Color = Color::rgb(1.0, 1.0, 1.0);
    pub const BLACK: Color = Color::rgb(0.0, 0.0, 0.0);
    /// Clear color behind the scene.
    pub const SKY: Color = Color::rgb(0.529, 0.808, 0.922);

    pub fn to_array(self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }

    /// Quantize to 8-bit RGBA.
    pub fn to_rgba8(self) -> [u8; 4] {
        let q = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
        [q(self.r), q(self.g), q(self.b), q(self.a)]
    }
}

/// A named surface appearance.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Material {
    #[default]
    Default,
    Bark,
    Grass,
    Sand,
    Coconut,
    Water,
    ChairWood,
    Cotton,
    Skin,
    Denim,
    Flowers,
    Squirrels,
    Eye,
    Black,
    Rust,
}

impl Material {
    pub const COUNT: usize = 15;

    pub const ALL: [Material; Material::COUNT] = [
        Material::Default,
        Material::Bark,
        Material::Grass,
        Material::Sand,
        Material::Coconut,
        Material::Water,
        Material::ChairWood,
        Material::Cotton,
        Material::Skin,
        Material::Denim,
        Material::Flowers,
        Material::Squirrels,
        Material::Eye,
        Material::Black,
        Material::Rust,
    ];

    /// Position in [`Material::ALL`].
    pub fn index(self) -> usize {
        self as usize
    }

    /// Directory name holding this material's texture images.
    pub fn folder(self) -> &'static str {
        match self {
            Material::Default => "default",
            Material::Bark => "bark",
            Material::Grass => "grass",
            Material::Sand => "sand",
            Material::Coconut => "coconut",
            Material::Water => "water",
            Material::ChairWood => "chair_wood",
            Material::Cotton => "cotton",
            Material::Skin => "skin",
            Material::Denim => "denim",
            Material::Flowers => "flowers",
            Material::Squirrels => "squirrels",
            Material::Eye => "eye",
            Material::Black => "black",
            Material::Rust => "rust",
        }
    }

    /// Flat color used when no texture image is available.
    pub fn base_color(self) -> Color {
        match self {
            Material::Default => Color::rgb(1.0, 0.8, 0.0),
            Material::Bark => Color::rgb(0.45, 0.32, 0.2),
            Material::Grass => Color::rgb(0.25, 0.6, 0.2),
            Material::Sand => Color::rgb(0.93, 0.84, 0.62),
            Material::Coconut => Color::rgb(0.4, 0.26, 0.13),
            Material::Water => Color::rgb(0.1, 0.45, 0.75),
            Material::ChairWood => Color::rgb(0.6, 0.42, 0.25),
            Material::Cotton => Color::rgb(0.95, 0.95, 0.92),
            Material::Skin => Color::rgb(0.96, 0.76, 0.62),
            Material::Denim => Color::rgb(0.2, 0.3, 0.55),
            Material::Flowers => Color::rgb(0.9, 0.45, 0.6),
            Material::Squirrels => Color::rgb(0.85, 0.55, 0.3),
            Material::Eye => Color::rgb(0.98, 0.98, 1.0),
            Material::Black => Color::rgb(0.05, 0.05, 0.05),
            Material::Rust => Color::rgb(0.55, 0.25, 0.12),
        }
    }
}

/// Shading program a draw runs under.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Program {
    /// Textured Phong lighting.
    #[default]
    Default,
    /// Animated water surface.
    Water,
}

/// One `T` per [`Material`], indexed by the enum.
#[derive(Clone, Debug)]
pub struct MaterialTable<T> {
    entries: Vec<T>,
}

impl<T> MaterialTable<T> {
    /// Build every entry from its material.
    pub fn from_fn(mut f: impl FnMut(Material) -> T) -> Self {
        Self {
            entries: Material::ALL.iter().map(|&m| f(m)).collect(),
        }
    }

    /// Build every entry, stopping at the first error.
    pub fn try_from_fn<E>(mut f: impl FnMut(Material) -> Result<T, E>) -> Result<Self, E> {
        let entries = Material::ALL
            .iter()
            .map(|&m| f(m))
            .collect::<Result<Vec<_>, E>>()?;
        Ok(Self { entries })
    }

    pub fn get(&self, material: Material) -> &T {
        &self.entries[material.index()]
    }

    pub fn iter(&self) -> impl Iterator<Item = (Material, &T)> {
        Material::ALL.iter().copied().zip(self.entries.iter())
    }
}

impl<T> Index<Material> for MaterialTable<T> {
    type Output = T;

    fn index(&self, material: Material) -> &T {
        self.get(material)
    }
}

impl<T> IndexMut<Material> for MaterialTable<T> {
    fn index_mut(&mut self, material: Material) -> &mut T {
        &mut self.entries[material.index()]
    }
}
