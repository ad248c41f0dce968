// ============================================================================
// FONT LOADING
// ============================================================================

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use image::RgbaImage;
use rusttype::Font;
use tracing::{info, warn};

use crate::error::{CurveError, Result};

/// Fonts tried when no font path is configured.
const SYSTEM_FONTS: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/usr/share/fonts/noto/NotoSans-Regular.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    "/Library/Fonts/Arial.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
];

pub fn load_font(path: &Path) -> Result<Font<'static>> {
    let bytes = std::fs::read(path).map_err(|source| CurveError::FontIo {
        path: path.to_path_buf(),
        source,
    })?;
    Font::try_from_vec(bytes).ok_or_else(|| CurveError::FontParse(path.to_path_buf()))
}

/// Loads the configured font, falling back to well known system fonts.
pub fn find_font(configured: Option<&Path>) -> Option<Font<'static>> {
    if let Some(path) = configured {
        match load_font(path) {
            Ok(font) => return Some(font),
            Err(e) => warn!("{e}; trying system fonts"),
        }
    }
    for candidate in SYSTEM_FONTS {
        let path = Path::new(candidate);
        if path.exists() {
            if let Ok(font) = load_font(path) {
                info!(font = %path.display(), "using system font");
                return Some(font);
            }
        }
    }
    warn!("no usable font found, chart text is disabled");
    None
}

// ============================================================================
// ICON CACHE
// ============================================================================

/// Decoded label icons, keyed by path. Failed loads are remembered so each
/// broken path is reported once.
pub struct IconCache {
    icons: HashMap<PathBuf, Option<RgbaImage>>,
    size: u32,
}

impl Default for IconCache {
    fn default() -> Self {
        Self::new(24)
    }
}

impl IconCache {
    pub fn new(size: u32) -> Self {
        Self {
            icons: HashMap::new(),
            size: size.max(1),
        }
    }

    /// Makes sure `path` has been attempted; returns whether an icon exists.
    pub fn load(&mut self, path: &Path) -> bool {
        let size = self.size;
        self.icons
            .entry(path.to_path_buf())
            .or_insert_with(|| match image::open(path) {
                Ok(img) => Some(img.thumbnail(size, size).to_rgba8()),
                Err(e) => {
                    warn!(icon = %path.display(), "icon unavailable: {e}");
                    None
                }
            })
            .is_some()
    }

    pub fn get(&self, path: &Path) -> Option<&RgbaImage> {
        self.icons.get(path).and_then(|icon| icon.as_ref())
    }

    /// Drops icons no longer referenced by any label.
    pub fn retain<'p>(&mut self, live: impl IntoIterator<Item = &'p Path>) {
        let live: Vec<&Path> = live.into_iter().collect();
        self.icons.retain(|path, _| live.contains(&path.as_path()));
    }

    pub fn len(&self) -> usize {
        self.icons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.icons.is_empty()
    }
}

/// Transient rendering resources: the text font and decoded icons.
#[derive(Default)]
pub struct Assets {
    font: Option<Font<'static>>,
    pub icons: IconCache,
}

impl Assets {
    pub fn new(font: Option<Font<'static>>, icon_size: u32) -> Self {
        Self {
            font,
            icons: IconCache::new(icon_size),
        }
    }

    pub fn font(&self) -> Option<&Font<'static>> {
        self.font.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_icon_degrades_to_none() {
        let mut cache = IconCache::new(24);
        let path = Path::new("/definitely/not/here.png");
        assert!(!cache.load(path));
        assert!(cache.get(path).is_none());
        // remembered, not retried
        assert_eq!(cache.len(), 1);
        assert!(!cache.load(path));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn decodes_and_thumbnails_png() {
        let dir = std::env::temp_dir().join(format!("emotion-curve-icon-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("sun.png");
        RgbaImage::from_pixel(64, 32, image::Rgba([255, 200, 0, 255]))
            .save(&path)
            .unwrap();

        let mut cache = IconCache::new(24);
        assert!(cache.load(&path));
        let icon = cache.get(&path).unwrap();
        assert_eq!(icon.width(), 24);
        assert_eq!(icon.height(), 12);

        cache.retain(std::iter::empty());
        assert!(cache.is_empty());
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn missing_font_is_an_error() {
        let err = load_font(Path::new("/no/such/font.ttf")).err().unwrap();
        assert!(matches!(err, CurveError::FontIo { .. }));
    }
}
