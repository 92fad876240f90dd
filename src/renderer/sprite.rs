//! Sprites with a zoom-dependent texture cache

use std::cell::{Cell, Ref, RefCell};
use std::path::Path;

use glam::DVec2;

use super::canvas::Canvas;
use crate::assets::AssetError;

/// An image drawn at a world-space size.
///
/// The source image is kept untouched. The texture actually blitted is a
/// rescaled copy that is only rebuilt when the on-screen pixel size changes.
#[derive(Debug)]
pub struct Sprite {
    source: Canvas,
    texture: RefCell<Canvas>,
    generation: Cell<u64>,
    /// Size in world units
    pub size: DVec2,
    /// Draw offset in world units
    pub offset: DVec2,
}

impl Sprite {
    /// Load an image file (PNG, JPEG)
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or decoded
    pub fn load(path: impl AsRef<Path>) -> Result<Self, AssetError> {
        let path = path.as_ref();
        let image = image::open(path).map_err(|source| AssetError::Image {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::from_canvas(Canvas::from_image(image.to_rgba8())))
    }

    /// Build a sprite from an existing surface, one world unit square
    pub fn from_canvas(source: Canvas) -> Self {
        Self {
            texture: RefCell::new(source.clone()),
            source,
            generation: Cell::new(0),
            size: DVec2::ONE,
            offset: DVec2::ZERO,
        }
    }

    /// Set the world-space size
    #[must_use]
    pub fn with_size(mut self, size: DVec2) -> Self {
        self.size = size;
        self
    }

    /// Set the world-space draw offset
    #[must_use]
    pub fn with_offset(mut self, offset: DVec2) -> Self {
        self.offset = offset;
        self
    }

    /// The unscaled image
    pub fn source(&self) -> &Canvas {
        &self.source
    }

    /// Pixel size of the cached texture
    pub fn texture_size(&self) -> (u32, u32) {
        self.texture.borrow().size()
    }

    /// How many times the texture has been rebuilt
    pub fn generation(&self) -> u64 {
        self.generation.get()
    }

    /// Texture at `pixel_size`, rescaling the source only if the cache is stale
    pub(crate) fn texture_at(&self, pixel_size: (u32, u32)) -> Ref<'_, Canvas> {
        if self.texture.borrow().size() != pixel_size {
            *self.texture.borrow_mut() = self.source.scaled(pixel_size.0, pixel_size.1);
            self.generation.set(self.generation.get() + 1);
            log::trace!("Sprite texture rebuilt at {}x{}", pixel_size.0, pixel_size.1);
        }
        self.texture.borrow()
    }
}
