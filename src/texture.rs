use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::gpu::GpuContext;
use crate::material::{Color, Material};

/// Diffuse image file name inside each material folder.
pub const DIFFUSE_FILE: &str = "DIF.jpg";

/// Edge length of generated fallback textures.
const NOISE_SIZE: u32 = 64;

/// A GPU texture that can be bound to shaders.
#[derive(Debug)]
pub struct Texture {
    pub(crate) view: wgpu::TextureView,
    pub(crate) sampler: wgpu::Sampler,
    pub width: u32,
    pub height: u32,
}

impl Texture {
    /// Create a texture from raw RGBA data.
    pub fn from_rgba(gpu: &GpuContext, data: &[u8], width: u32, height: u32, label: &str) -> Self {
        use wgpu::util::DeviceExt;

        let texture = gpu.device.create_texture_with_data(
            &gpu.queue,
            &wgpu::TextureDescriptor {
                label: Some(label),
                size: wgpu::Extent3d {
                    width,
                    height,
                    depth_or_array_layers: 1,
                },
                mip_level_count: 1,
                sample_count: 1,
                dimension: wgpu::TextureDimension::D2,
                format: wgpu::TextureFormat::Rgba8UnormSrgb,
                usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
                view_formats: &[],
            },
            wgpu::util::TextureDataOrder::LayerMajor,
            data,
        );

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

        // Surfaces wrap the texture around curved primitives.
        let sampler = gpu.device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some(&format!("{label} Sampler")),
            address_mode_u: wgpu::AddressMode::Repeat,
            address_mode_v: wgpu::AddressMode::Repeat,
            address_mode_w: wgpu::AddressMode::Repeat,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::FilterMode::Nearest,
            ..Default::default()
        });

        Self {
            view,
            sampler,
            width,
            height,
        }
    }

    /// Load a texture from an image file.
    pub fn from_file(gpu: &GpuContext, path: &Path) -> Result<Self> {
        let img = image::open(path)
            .map_err(|source| Error::image(path, source))?
            .to_rgba8();
        let (width, height) = img.dimensions();
        Ok(Self::from_rgba(
            gpu,
            &img,
            width,
            height,
            &path.display().to_string(),
        ))
    }

    /// Generate a speckled texture around `tint`.
    pub fn noise(gpu: &GpuContext, size: u32, seed: u32, tint: Color, label: &str) -> Self {
        Self::from_rgba(gpu, &noise_pixels(size, seed, tint), size, size, label)
    }
}

/// Where a material's diffuse image lives under `root`.
pub fn diffuse_path(root: &Path, material: Material) -> PathBuf {
    root.join(material.folder()).join(DIFFUSE_FILE)
}

/// A material's diffuse texture and the color it should be tinted with.
///
/// Image textures carry their own color and use a white tint. Generated textures are
/// neutral noise tinted by the material's base color.
#[derive(Debug)]
pub struct MaterialTexture {
    pub texture: Texture,
    pub tint: Color,
    /// Whether the texture came from an image file.
    pub from_file: bool,
}

impl MaterialTexture {
    /// Load `material`'s image from `root`, or generate a stand-in if there is no
    /// directory or the image cannot be read.
    pub fn load(gpu: &GpuContext, root: Option<&Path>, material: Material) -> Self {
        if let Some(root) = root {
            match Texture::from_file(gpu, &diffuse_path(root, material)) {
                Ok(texture) => {
                    log::debug!(
                        "loaded {material:?} texture ({}x{})",
                        texture.width,
                        texture.height
                    );
                    return Self {
                        texture,
                        tint: Color::WHITE,
                        from_file: true,
                    };
                }
                Err(err) => log::warn!("{err}; using a generated texture for {material:?}"),
            }
        }

        Self {
            texture: Texture::noise(
                gpu,
                NOISE_SIZE,
                material.index() as u32,
                Color::WHITE,
                &format!("{material:?} Noise"),
            ),
            tint: material.base_color(),
            from_file: false,
        }
    }
}

/// RGBA pixels of light grayscale noise tinted by `tint`.
pub fn noise_pixels(size: u32, seed: u32, tint: Color) -> Vec<u8> {
    let [r, g, b, a] = tint.to_array();
    let mut data = Vec::with_capacity((size * size * 4) as usize);

    for y in 0..size {
        for x in 0..size {
            // Mostly bright with occasional darker flecks.
            let shade = 0.8 + (hash(x, y, seed) % 21) as f32 / 100.0;
            let fleck = if hash(x + 1000, y + 1000, seed) % 13 == 0 {
                0.85
            } else {
                1.0
            };
            let value = shade * fleck;
            data.extend_from_slice(&Color::rgba(r * value, g * value, b * value, a).to_rgba8());
        }
    }

    data
}

/// Simple hash function for procedural generation.
fn hash(x: u32, y: u32, seed: u32) -> u32 {
    let mut h = seed;
    h = h.wrapping_add(x.wrapping_mul(374761393));
    h = h.wrapping_add(y.wrapping_mul(668265263));
    h ^= h >> 13;
    h = h.wrapping_mul(1274126177);
    h ^= h >> 16;
    h
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn diffuse_path_uses_material_folder() {
        let path = diffuse_path(Path::new("assets/textures"), Material::ChairWood);
        assert_eq!(path, Path::new("assets/textures/chair_wood/DIF.jpg"));
    }

    #[test]
    fn noise_is_deterministic_and_sized() {
        let a = noise_pixels(16, 7, Color::WHITE);
        let b = noise_pixels(16, 7, Color::WHITE);
        assert_eq!(a.len(), 16 * 16 * 4);
        assert_eq!(a, b);
        assert_ne!(a, noise_pixels(16, 8, Color::WHITE));
    }

    #[test]
    fn noise_stays_near_tint() {
        let pixels = noise_pixels(32, 3, Color::rgb(1.0, 0.0, 0.0));
        for px in pixels.chunks_exact(4) {
            assert!(px[0] >= 170, "{px:?}");
            assert_eq!(px[1], 0);
            assert_eq!(px[2], 0);
            assert_eq!(px[3], 255);
        }
    }
}
