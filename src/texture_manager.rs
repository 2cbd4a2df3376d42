use crate::displacement::RasterSink;
use crate::error::TextureManagerError;
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, RwLock};
use tracing::debug;

/// The two textures the particle shader samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextureSlot {
    /// Source picture giving every particle its brightness and size.
    Picture,
    /// GPU copy of the trail buffer.
    Displacement,
}

impl fmt::Display for TextureSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TextureSlot::Picture => write!(f, "picture"),
            TextureSlot::Displacement => write!(f, "displacement"),
        }
    }
}

struct StoredTexture {
    texture: wgpu::Texture,
    dimensions: (u32, u32),
}

#[derive(Default)]
struct TextureStorage {
    textures: HashMap<TextureSlot, StoredTexture>,
    /// Bumped on every allocation so cached bind groups can tell they are stale.
    generation: u64,
}

/// Owns the GPU textures sampled by the particle shader.
///
/// The manager can be cloned and handed to a loader thread: the picture may be uploaded from
/// there while frames keep rendering, and the renderer simply skips drawing until the picture
/// slot is loaded.
///
/// ```rust,no_run
/// # use futures::executor::block_on;
/// # use trailfield::{Renderer, TextureSlot, TrailFieldConfig};
/// # let renderer = block_on(Renderer::try_new_headless((256, 256), 1.0, TrailFieldConfig::default()))
/// #     .unwrap();
/// let texture_manager = renderer.texture_manager();
/// let loader = std::thread::spawn(move || {
///     let picture = vec![255u8; 64 * 64 * 4];
///     texture_manager.allocate_texture_with_data(TextureSlot::Picture, (64, 64), &picture)
/// });
/// loader.join().unwrap().unwrap();
/// assert!(renderer.texture_manager().is_texture_loaded(TextureSlot::Picture));
/// ```
#[derive(Clone)]
pub struct TextureManager {
    device: Arc<wgpu::Device>,
    queue: Arc<wgpu::Queue>,
    sampler: Arc<wgpu::Sampler>,
    texture_storage: Arc<RwLock<TextureStorage>>,
    /// Bind group for both textures, tagged with the storage generation it was built from.
    field_bind_group_cache: Arc<RwLock<Option<(u64, Arc<wgpu::BindGroup>)>>>,
}

impl TextureManager {
    pub(crate) fn new(device: Arc<wgpu::Device>, queue: Arc<wgpu::Queue>) -> Self {
        let sampler = Self::create_sampler(&device);
        Self {
            device,
            queue,
            sampler: Arc::new(sampler),
            texture_storage: Arc::new(RwLock::new(TextureStorage::default())),
            field_bind_group_cache: Arc::new(RwLock::new(None)),
        }
    }

    fn create_sampler(device: &wgpu::Device) -> wgpu::Sampler {
        device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("field_sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::FilterMode::Nearest,
            ..Default::default()
        })
    }

    /// Allocates an RGBA8 texture for `slot`, replacing any previous one.
    ///
    /// Both slots use a linear (non-sRGB) format: the shader reads the red channel as a plain
    /// intensity, not as a color.
    ///
    /// Returns `Err(TextureManagerError::InvalidDimensions { .. })` for an empty texture or one
    /// larger than the device supports. Nothing is allocated in that case.
    pub fn allocate_texture(
        &self,
        slot: TextureSlot,
        texture_dimensions: (u32, u32),
    ) -> Result<(), TextureManagerError> {
        check_texture_dimensions(
            slot,
            texture_dimensions,
            self.device.limits().max_texture_dimension_2d,
        )?;

        let texture_extent = wgpu::Extent3d {
            width: texture_dimensions.0,
            height: texture_dimensions.1,
            depth_or_array_layers: 1,
        };

        let texture = self.device.create_texture(&wgpu::TextureDescriptor {
            label: Some(match slot {
                TextureSlot::Picture => "picture_texture",
                TextureSlot::Displacement => "displacement_texture",
            }),
            size: texture_extent,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8Unorm,
            // TEXTURE_BINDING to use texture in the shader, COPY_DST to copy data to the texture
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        debug!(
            "Allocated {} texture of {}x{}",
            slot, texture_dimensions.0, texture_dimensions.1
        );

        let mut storage = self.texture_storage.write().unwrap();
        storage.textures.insert(
            slot,
            StoredTexture {
                texture,
                dimensions: texture_dimensions,
            },
        );
        storage.generation += 1;
        Ok(())
    }

    /// Allocates the texture for `slot` and uploads `texture_data` into it.
    pub fn allocate_texture_with_data(
        &self,
        slot: TextureSlot,
        texture_dimensions: (u32, u32),
        texture_data: &[u8],
    ) -> Result<(), TextureManagerError> {
        check_rgba8_len(slot, texture_dimensions, texture_data)?;
        self.allocate_texture(slot, texture_dimensions)?;
        self.load_data_into_texture(slot, texture_data)
    }

    /// Overwrites the contents of an already allocated texture.
    ///
    /// # Returns
    /// - `Err(TextureManagerError::TextureNotFound(slot))` if `slot` was never allocated.
    /// - `Err(TextureManagerError::DimensionMismatch { .. })` if `texture_data` does not cover
    ///   the allocated texture exactly.
    pub fn load_data_into_texture(
        &self,
        slot: TextureSlot,
        texture_data: &[u8],
    ) -> Result<(), TextureManagerError> {
        let storage = self.texture_storage.read().unwrap();
        let stored = storage
            .textures
            .get(&slot)
            .ok_or(TextureManagerError::TextureNotFound(slot))?;
        check_rgba8_len(slot, stored.dimensions, texture_data)?;

        self.write_image_bytes_to_texture(&stored.texture, stored.dimensions, texture_data);
        Ok(())
    }

    fn write_image_bytes_to_texture(
        &self,
        texture: &wgpu::Texture,
        texture_dimensions: (u32, u32),
        texture_data_bytes: &[u8],
    ) {
        self.queue.write_texture(
            // Tells wgpu where to copy the pixel data
            wgpu::TexelCopyTextureInfo {
                texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            texture_data_bytes,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(4 * texture_dimensions.0),
                rows_per_image: Some(texture_dimensions.1),
            },
            wgpu::Extent3d {
                width: texture_dimensions.0,
                height: texture_dimensions.1,
                depth_or_array_layers: 1,
            },
        );
    }

    pub fn is_texture_loaded(&self, slot: TextureSlot) -> bool {
        self.texture_storage
            .read()
            .unwrap()
            .textures
            .contains_key(&slot)
    }

    pub fn texture_dimensions(&self, slot: TextureSlot) -> Option<(u32, u32)> {
        self.texture_storage
            .read()
            .unwrap()
            .textures
            .get(&slot)
            .map(|stored| stored.dimensions)
    }

    /// Bind group exposing the picture, the displacement texture and the shared sampler.
    ///
    /// The bind group is cached until either texture is reallocated, so per-frame uploads into
    /// the displacement texture reuse it.
    pub(crate) fn get_or_create_field_bind_group(
        &self,
        layout: &wgpu::BindGroupLayout,
    ) -> Result<Arc<wgpu::BindGroup>, TextureManagerError> {
        let storage = self.texture_storage.read().unwrap();

        if let Some((generation, bind_group)) = self.field_bind_group_cache.read().unwrap().as_ref()
        {
            if *generation == storage.generation {
                return Ok(bind_group.clone());
            }
        }

        let picture = storage
            .textures
            .get(&TextureSlot::Picture)
            .ok_or(TextureManagerError::TextureNotFound(TextureSlot::Picture))?;
        let displacement = storage
            .textures
            .get(&TextureSlot::Displacement)
            .ok_or(TextureManagerError::TextureNotFound(
                TextureSlot::Displacement,
            ))?;

        let picture_view = picture
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let displacement_view = displacement
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let bind_group = Arc::new(self.device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&picture_view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(&displacement_view),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::Sampler(&self.sampler),
                },
            ],
            label: Some("field_texture_bind_group"),
        }));

        *self.field_bind_group_cache.write().unwrap() =
            Some((storage.generation, bind_group.clone()));

        Ok(bind_group)
    }
}

impl RasterSink for TextureManager {
    type Error = TextureManagerError;

    /// Uploads into the displacement slot, (re)allocating it when the raster size changed.
    fn write_raster(&self, dimensions: (u32, u32), rgba: &[u8]) -> Result<(), Self::Error> {
        if self.texture_dimensions(TextureSlot::Displacement) != Some(dimensions) {
            self.allocate_texture(TextureSlot::Displacement, dimensions)?;
        }
        self.load_data_into_texture(TextureSlot::Displacement, rgba)
    }
}

fn check_texture_dimensions(
    slot: TextureSlot,
    (width, height): (u32, u32),
    max: u32,
) -> Result<(), TextureManagerError> {
    if width == 0 || height == 0 || width > max || height > max {
        return Err(TextureManagerError::InvalidDimensions {
            slot,
            width,
            height,
            max,
        });
    }
    Ok(())
}

fn check_rgba8_len(
    slot: TextureSlot,
    dimensions: (u32, u32),
    data: &[u8],
) -> Result<(), TextureManagerError> {
    let expected = dimensions.0 as usize * dimensions.1 as usize * 4;
    if data.len() != expected {
        return Err(TextureManagerError::DimensionMismatch {
            slot,
            expected,
            actual: data.len(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rgba8_length_check() {
        assert!(check_rgba8_len(TextureSlot::Picture, (2, 2), &[0; 16]).is_ok());
        assert_eq!(
            check_rgba8_len(TextureSlot::Displacement, (2, 2), &[0; 12]),
            Err(TextureManagerError::DimensionMismatch {
                slot: TextureSlot::Displacement,
                expected: 16,
                actual: 12,
            })
        );
    }

    #[test]
    fn texture_dimensions_must_fit_the_device() {
        assert!(check_texture_dimensions(TextureSlot::Picture, (1, 1), 8192).is_ok());
        assert!(check_texture_dimensions(TextureSlot::Picture, (8192, 8192), 8192).is_ok());
        assert_eq!(
            check_texture_dimensions(TextureSlot::Picture, (0, 0), 8192),
            Err(TextureManagerError::InvalidDimensions {
                slot: TextureSlot::Picture,
                width: 0,
                height: 0,
                max: 8192,
            })
        );
        assert!(check_texture_dimensions(TextureSlot::Displacement, (20000, 16), 8192).is_err());
    }

    #[test]
    fn slots_display_their_role() {
        assert_eq!(TextureSlot::Picture.to_string(), "picture");
        assert_eq!(TextureSlot::Displacement.to_string(), "displacement");
    }
}
