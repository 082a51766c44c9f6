//! Upload of resolved images as egui textures.

use colonist_media::Image;
use egui::{ColorImage, Context, TextureHandle, TextureOptions};
use image::RgbaImage;
use std::collections::HashMap;
use std::sync::Arc;

/// Convert a straight-alpha image for egui.
pub fn to_color_image(image: &RgbaImage) -> ColorImage {
    let size = [image.width() as usize, image.height() as usize];
    ColorImage::from_rgba_unmultiplied(size, image.as_raw())
}

/// Textures uploaded so far, keyed by the asset key they were resolved from.
///
/// An entry is replaced when the library hands out a different image for the
/// same key, e.g. after a resource reload.
#[derive(Default)]
pub struct TextureCache {
    textures: HashMap<String, (Image, TextureHandle)>,
}

impl TextureCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Texture for `image`, uploading it on first use.
    pub fn get_or_load(&mut self, ctx: &Context, key: &str, image: &Image) -> TextureHandle {
        if let Some((cached, handle)) = self.textures.get(key) {
            if Arc::ptr_eq(cached, image) {
                return handle.clone();
            }
        }
        tracing::trace!(%key, size = ?image.dimensions(), "Uploading texture");
        let handle = ctx.load_texture(key, to_color_image(image), TextureOptions::LINEAR);
        self.textures
            .insert(key.to_string(), (Arc::clone(image), handle.clone()));
        handle
    }

    /// Drop the texture of `key`.
    pub fn forget(&mut self, key: &str) -> bool {
        self.textures.remove(key).is_some()
    }

    /// Drop every texture.
    pub fn clear(&mut self) {
        self.textures.clear();
    }

    /// Number of uploaded textures.
    pub fn len(&self) -> usize {
        self.textures.len()
    }

    /// True if nothing has been uploaded.
    pub fn is_empty(&self) -> bool {
        self.textures.is_empty()
    }
}
