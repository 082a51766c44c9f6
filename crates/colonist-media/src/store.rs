//! Resource store: the keyed repository of images, strings and colors the
//! image library resolves against.
//!
//! [`ResourceStore`] is the seam the library depends on.
//! [`MemoryResourceStore`] is the in-process implementation: it holds raster
//! and SVG images, localized strings and colors, renders scaled renditions on
//! demand and loads assets from a JSON manifest or a directory tree.

use crate::imaging::{check_size, resize_image, scaled_size, to_grayscale};
use crate::{Image, MediaError, Result};
use colonist_core::Rgb;
use image::{Rgba, RgbaImage};
use parking_lot::RwLock;
use serde::Deserialize;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fs;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

/// File extensions decoded as raster images.
pub const RASTER_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "bmp"];

/// Keyed access to game media.
pub trait ResourceStore: Send + Sync {
    /// True if any resource (image, string or color) has this key.
    fn has(&self, key: &str) -> bool;

    /// The image under `key` drawn at `scale`.
    fn image(&self, key: &str, scale: f32) -> Option<Image>;

    /// The image under `key` resampled to exactly `size`.
    fn image_sized(&self, key: &str, size: (u32, u32)) -> Option<Image>;

    /// Desaturated rendition of the image under `key`.
    fn grayscale_image(&self, key: &str, scale: f32) -> Option<Image>;

    /// Localized string.
    fn string(&self, key: &str) -> Option<String>;

    /// Named color.
    fn color(&self, key: &str) -> Option<Rgb>;

    /// Every key starting with `prefix`, in sorted order.
    fn keys_with_prefix(&self, prefix: &str) -> BTreeSet<String>;

    /// Register an already rendered image.
    fn put_image(&self, key: &str, image: Image);

    /// Counter that changes whenever the store is bulk reloaded or cleared.
    fn generation(&self) -> u64;
}

// ============================================================================
// Sources and renditions
// ============================================================================

#[derive(Clone)]
enum ImageSource {
    Raster(Image),
    Vector { data: Arc<[u8]>, size: (f32, f32) },
}

impl ImageSource {
    fn base_size(&self) -> (u32, u32) {
        match self {
            ImageSource::Raster(image) => image.dimensions(),
            ImageSource::Vector { size, .. } => {
                (size.0.round().max(1.0) as u32, size.1.round().max(1.0) as u32)
            }
        }
    }
}

#[derive(Clone, Copy)]
enum Target {
    Scale(f32),
    Size(u32, u32),
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct RenditionKey {
    key: String,
    width: u32,
    height: u32,
    grayscale: bool,
}

#[derive(Default)]
struct Resources {
    images: HashMap<String, ImageSource>,
    strings: HashMap<String, String>,
    colors: HashMap<String, Rgb>,
}

/// Layout of a resource manifest file. Image paths are relative to the
/// manifest's directory.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Manifest {
    images: BTreeMap<String, String>,
    strings: BTreeMap<String, String>,
    colors: BTreeMap<String, String>,
}

// ============================================================================
// MemoryResourceStore
// ============================================================================

/// In-memory resource store with lazily rendered, cached renditions.
#[derive(Default)]
pub struct MemoryResourceStore {
    resources: RwLock<Resources>,
    renditions: RwLock<HashMap<RenditionKey, Image>>,
    generation: AtomicU64,
}

impl MemoryResourceStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a raster image.
    pub fn insert_image(&self, key: impl Into<String>, image: RgbaImage) {
        self.put_source(key.into(), ImageSource::Raster(Arc::new(image)));
    }

    /// Add or replace an SVG image. The document is parsed once here to
    /// validate it and learn its natural size.
    pub fn insert_svg(&self, key: impl Into<String>, data: impl Into<Arc<[u8]>>) -> Result<()> {
        let data = data.into();
        let tree = parse_svg(&data)?;
        let size = (tree.size().width(), tree.size().height());
        self.put_source(key.into(), ImageSource::Vector { data, size });
        Ok(())
    }

    /// Add or replace a string.
    pub fn insert_string(&self, key: impl Into<String>, value: impl Into<String>) {
        self.resources.write().strings.insert(key.into(), value.into());
    }

    /// Add or replace a color.
    pub fn insert_color(&self, key: impl Into<String>, color: Rgb) {
        self.resources.write().colors.insert(key.into(), color);
    }

    /// Decode the image file at `path` and register it under `key`.
    pub fn load_image_file(&self, key: impl Into<String>, path: &Path) -> Result<()> {
        let key = key.into();
        if is_svg(path) {
            let data = fs::read(path)
                .map_err(|e| MediaError::FileOpen(format!("{}: {e}", path.display())))?;
            self.insert_svg(key, data)
        } else {
            let image = image::open(path)
                .map_err(|e| MediaError::DecoderError(format!("{}: {e}", path.display())))?
                .to_rgba8();
            self.insert_image(key, image);
            Ok(())
        }
    }

    /// Load every resource listed in a JSON manifest:
    ///
    /// ```json
    /// { "images":  { "model.goods.furs.image": "goods/furs.png" },
    ///   "strings": { "cross": "+" },
    ///   "colors":  { "mission.expert.foreground.color": "#000000" } }
    /// ```
    ///
    /// Returns the number of resources added. Bumps the generation.
    pub fn load_manifest(&self, path: &Path) -> Result<usize> {
        let text = fs::read_to_string(path)
            .map_err(|e| MediaError::FileOpen(format!("{}: {e}", path.display())))?;
        let manifest: Manifest = serde_json::from_str(&text)?;
        let base = path.parent().unwrap_or_else(|| Path::new("."));

        let mut loaded = 0;
        for (key, relative) in &manifest.images {
            self.load_image_file(key.as_str(), &base.join(relative))?;
            loaded += 1;
        }
        for (key, value) in manifest.strings {
            self.insert_string(key, value);
            loaded += 1;
        }
        for (key, value) in &manifest.colors {
            self.insert_color(key.as_str(), value.parse::<Rgb>()?);
            loaded += 1;
        }

        self.bump_generation();
        info!(manifest = %path.display(), loaded, "resource manifest loaded");
        Ok(loaded)
    }

    /// Register every image file below `root`. The key is the relative path
    /// without extension, with separators replaced by dots, so
    /// `model/goods/furs.image.png` becomes `model.goods.furs.image`.
    ///
    /// Files that fail to decode are skipped with a warning. Returns the
    /// number of images added. Bumps the generation.
    pub fn scan_directory(&self, root: &Path) -> Result<usize> {
        if !root.is_dir() {
            return Err(MediaError::FileOpen(format!("{} is not a directory", root.display())));
        }
        let mut loaded = 0;
        for entry in WalkDir::new(root).sort_by_file_name() {
            let entry = entry.map_err(|e| MediaError::Io(e.into()))?;
            let path = entry.path();
            if !entry.file_type().is_file() || !is_image_file(path) {
                continue;
            }
            let Some(key) = key_for_path(root, path) else {
                continue;
            };
            match self.load_image_file(key.as_str(), path) {
                Ok(()) => loaded += 1,
                Err(e) => warn!(path = %path.display(), "skipping unreadable image: {e}"),
            }
        }
        self.bump_generation();
        info!(root = %root.display(), loaded, "resource directory scanned");
        Ok(loaded)
    }

    /// Remove every resource and rendition. Bumps the generation.
    pub fn clear(&self) {
        *self.resources.write() = Resources::default();
        self.renditions.write().clear();
        self.bump_generation();
    }

    /// Signal a bulk change so that memoized counts are recomputed.
    pub fn bump_generation(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
    }

    /// Number of cached scaled renditions.
    pub fn rendition_count(&self) -> usize {
        self.renditions.read().len()
    }

    fn put_source(&self, key: String, source: ImageSource) {
        self.renditions.write().retain(|k, _| k.key != key);
        self.resources.write().images.insert(key, source);
    }

    fn source(&self, key: &str) -> Option<ImageSource> {
        self.resources.read().images.get(key).cloned()
    }

    fn resolve(&self, key: &str, target: Target, grayscale: bool) -> Result<Option<Image>> {
        let Some(source) = self.source(key) else {
            return Ok(None);
        };
        let base = source.base_size();
        let (width, height) = match target {
            Target::Scale(scale) => scaled_size(base, scale)?,
            Target::Size(w, h) => check_size(w.max(1), h.max(1))?,
        };

        if let ImageSource::Raster(image) = &source {
            if !grayscale && (width, height) == base {
                return Ok(Some(Arc::clone(image)));
            }
        }

        let rendition_key = RenditionKey {
            key: key.to_string(),
            width,
            height,
            grayscale,
        };
        if let Some(image) = self.renditions.read().get(&rendition_key) {
            return Ok(Some(Arc::clone(image)));
        }

        let mut rendered = match &source {
            ImageSource::Raster(image) => resize_image(image, width, height),
            ImageSource::Vector { data, size } => render_svg(data, *size, width, height)?,
        };
        if grayscale {
            rendered = to_grayscale(&rendered);
        }
        debug!(key, width, height, grayscale, "rendered image");

        let image = Arc::new(rendered);
        let mut renditions = self.renditions.write();
        let stored = renditions.entry(rendition_key).or_insert(image);
        Ok(Some(Arc::clone(stored)))
    }

    fn resolve_logged(&self, key: &str, target: Target, grayscale: bool) -> Option<Image> {
        match self.resolve(key, target, grayscale) {
            Ok(image) => image,
            Err(e) => {
                warn!(key, "failed to render image: {e}");
                None
            }
        }
    }
}

impl ResourceStore for MemoryResourceStore {
    fn has(&self, key: &str) -> bool {
        let resources = self.resources.read();
        resources.images.contains_key(key)
            || resources.strings.contains_key(key)
            || resources.colors.contains_key(key)
    }

    fn image(&self, key: &str, scale: f32) -> Option<Image> {
        self.resolve_logged(key, Target::Scale(scale), false)
    }

    fn image_sized(&self, key: &str, size: (u32, u32)) -> Option<Image> {
        self.resolve_logged(key, Target::Size(size.0, size.1), false)
    }

    fn grayscale_image(&self, key: &str, scale: f32) -> Option<Image> {
        self.resolve_logged(key, Target::Scale(scale), true)
    }

    fn string(&self, key: &str) -> Option<String> {
        self.resources.read().strings.get(key).cloned()
    }

    fn color(&self, key: &str) -> Option<Rgb> {
        self.resources.read().colors.get(key).copied()
    }

    fn keys_with_prefix(&self, prefix: &str) -> BTreeSet<String> {
        let resources = self.resources.read();
        resources
            .images
            .keys()
            .chain(resources.strings.keys())
            .chain(resources.colors.keys())
            .filter(|k| k.starts_with(prefix))
            .cloned()
            .collect()
    }

    fn put_image(&self, key: &str, image: Image) {
        self.put_source(key.to_string(), ImageSource::Raster(image));
    }

    fn generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }
}

// ============================================================================
// Helpers
// ============================================================================

fn parse_svg(data: &[u8]) -> Result<usvg::Tree> {
    let options = usvg::Options::default();
    usvg::Tree::from_data(data, &options).map_err(|e| MediaError::SvgError(e.to_string()))
}

fn render_svg(data: &[u8], natural: (f32, f32), width: u32, height: u32) -> Result<RgbaImage> {
    let tree = parse_svg(data)?;
    let mut pixmap = resvg::tiny_skia::Pixmap::new(width, height)
        .ok_or_else(|| MediaError::SvgError(format!("cannot allocate {width}x{height} pixmap")))?;
    let transform = resvg::tiny_skia::Transform::from_scale(
        width as f32 / natural.0.max(f32::EPSILON),
        height as f32 / natural.1.max(f32::EPSILON),
    );
    resvg::render(&tree, transform, &mut pixmap.as_mut());

    let mut out = RgbaImage::new(width, height);
    for (dst, src) in out.pixels_mut().zip(pixmap.pixels()) {
        let c = src.demultiply();
        *dst = Rgba([c.red(), c.green(), c.blue(), c.alpha()]);
    }
    Ok(out)
}

fn is_svg(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("svg"))
}

fn is_image_file(path: &Path) -> bool {
    is_svg(path)
        || path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| RASTER_EXTENSIONS.iter().any(|r| e.eq_ignore_ascii_case(r)))
}

fn key_for_path(root: &Path, path: &Path) -> Option<String> {
    let relative = path.strip_prefix(root).ok()?.with_extension("");
    let parts: Vec<&str> = relative
        .components()
        .map(|c| c.as_os_str().to_str())
        .collect::<Option<_>>()?;
    Some(parts.join("."))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SQUARE_SVG: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" width="10" height="10">
        <rect width="10" height="10" fill="#ff0000"/></svg>"##;

    #[test]
    fn test_scaled_renditions_are_cached() {
        let store = MemoryResourceStore::new();
        store.insert_image("a.image", RgbaImage::from_pixel(30, 30, Rgba([9, 9, 9, 255])));

        let native = store.image("a.image", 1.0).unwrap();
        assert_eq!(native.dimensions(), (30, 30));
        assert_eq!(store.rendition_count(), 0);

        let small = store.image("a.image", 2.0 / 3.0).unwrap();
        assert_eq!(small.dimensions(), (20, 20));
        let again = store.image("a.image", 2.0 / 3.0).unwrap();
        assert!(Arc::ptr_eq(&small, &again));
        assert_eq!(store.rendition_count(), 1);

        // Replacing the source drops its renditions.
        store.insert_image("a.image", RgbaImage::new(3, 3));
        assert_eq!(store.rendition_count(), 0);
    }

    #[test]
    fn test_svg_renders_at_scale() {
        let store = MemoryResourceStore::new();
        store.insert_svg("flag.image", SQUARE_SVG.as_bytes()).unwrap();
        let image = store.image("flag.image", 2.0).unwrap();
        assert_eq!(image.dimensions(), (20, 20));
        assert_eq!(image.get_pixel(10, 10).0, [255, 0, 0, 255]);
        assert!(store.insert_svg("bad.image", b"not svg".as_slice()).is_err());
    }

    #[test]
    fn test_grayscale_and_sized() {
        let store = MemoryResourceStore::new();
        store.insert_image("a.image", RgbaImage::from_pixel(4, 4, Rgba([255, 0, 0, 255])));
        let gray = store.grayscale_image("a.image", 1.0).unwrap();
        assert_eq!(gray.get_pixel(0, 0).0, [77, 77, 77, 255]);
        assert_eq!(store.image_sized("a.image", (8, 2)).unwrap().dimensions(), (8, 2));
        assert!(store.image("missing.image", 1.0).is_none());
    }

    #[test]
    fn test_keys_with_prefix_spans_all_kinds() {
        let store = MemoryResourceStore::new();
        store.insert_image("model.tile.hills.overlay0.image", RgbaImage::new(1, 1));
        store.insert_image("model.tile.hills.overlay1.image", RgbaImage::new(1, 1));
        store.insert_string("model.tile.hills.name", "Hills");
        store.insert_color("model.nation.dutch.color", Rgb::new(255, 128, 0));

        assert_eq!(store.keys_with_prefix("model.tile.hills.overlay").len(), 2);
        assert_eq!(store.keys_with_prefix("model.tile.hills").len(), 3);
        assert!(store.has("model.nation.dutch.color"));
        assert_eq!(store.string("model.tile.hills.name").as_deref(), Some("Hills"));
    }

    #[test]
    fn test_clear_bumps_generation() {
        let store = MemoryResourceStore::new();
        store.insert_string("cross", "+");
        let before = store.generation();
        store.clear();
        assert!(store.generation() > before);
        assert!(!store.has("cross"));
    }

    #[test]
    fn test_key_for_path() {
        let root = Path::new("/assets");
        assert_eq!(
            key_for_path(root, Path::new("/assets/model/goods/furs.image.png")).as_deref(),
            Some("model.goods.furs.image")
        );
    }
}
