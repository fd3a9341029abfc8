//! Asset Loading
//!
//! Where zone layouts and friendly-actor resources come from. The world
//! only talks to [`AssetSource`]; [`FsAssets`] reads the on-disk layout
//! and [`MemoryAssets`] serves tests and the headless demo.
//!
//! On-disk layout, relative to the asset root:
//!
//! ```text
//! zones/zone<N>/layout.png       encoded layout (N starts at 1)
//! zones/zone<N>/top.png          drawn above actors (optional)
//! zones/zone<N>/bottom.png       drawn beneath actors (optional)
//! entities/friendly/<id>/main.png
//! entities/friendly/<id>/speech.txt   (optional)
//! ```

use std::collections::BTreeMap;
use std::io;
use std::path::{Path, PathBuf};

use image::{ImageReader, RgbImage};
use thiserror::Error;
use tracing::debug;

use crate::game::zone::ZoneArt;

/// Asset loading errors. A missing optional asset is not an error.
#[derive(Debug, Error)]
pub enum AssetError {
    /// File could not be read
    #[error("failed to read {path}: {source}")]
    Io {
        /// Offending file
        path: PathBuf,
        /// Underlying error
        #[source]
        source: io::Error,
    },

    /// File could not be decoded as an image
    #[error("failed to decode image {path}: {source}")]
    Image {
        /// Offending file
        path: PathBuf,
        /// Underlying error
        #[source]
        source: image::ImageError,
    },
}

/// Images making up one zone.
#[derive(Clone, Debug)]
pub struct ZoneImages {
    /// One pixel per tile
    pub layout: RgbImage,
    /// Decorative layers
    pub art: ZoneArt,
}

/// Supplier of zone and friendly-actor assets.
pub trait AssetSource {
    /// Images for zone `number` (1-based), or `None` past the last zone.
    fn zone_layout(&self, number: usize) -> Result<Option<ZoneImages>, AssetError>;

    /// Whether art exists for friendly `id`.
    fn friendly_exists(&self, id: u8) -> bool;

    /// Dialogue text for friendly `id`, if it has any.
    fn friendly_dialogue(&self, id: u8) -> Option<String>;
}

// =============================================================================
// FILESYSTEM
// =============================================================================

/// Assets under a root directory.
#[derive(Clone, Debug)]
pub struct FsAssets {
    root: PathBuf,
}

impl FsAssets {
    /// Read assets below `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Asset root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn zone_dir(&self, number: usize) -> PathBuf {
        self.root.join("zones").join(format!("zone{number}"))
    }

    fn friendly_dir(&self, id: u8) -> PathBuf {
        self.root.join("entities").join("friendly").join(id.to_string())
    }
}

/// Decode an image file into RGB pixels.
pub fn load_rgb(path: &Path) -> Result<RgbImage, AssetError> {
    let reader = ImageReader::open(path).map_err(|source| AssetError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let decoded = reader.decode().map_err(|source| AssetError::Image {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(decoded.to_rgb8())
}

/// Path as a string if the file exists.
fn existing(path: PathBuf) -> Option<String> {
    path.is_file().then(|| path.display().to_string())
}

impl AssetSource for FsAssets {
    fn zone_layout(&self, number: usize) -> Result<Option<ZoneImages>, AssetError> {
        let dir = self.zone_dir(number);
        let layout_path = dir.join("layout.png");
        if !layout_path.is_file() {
            debug!(path = %layout_path.display(), "no zone layout");
            return Ok(None);
        }
        let layout = load_rgb(&layout_path)?;
        let art = ZoneArt {
            bottom: existing(dir.join("bottom.png")),
            top: existing(dir.join("top.png")),
        };
        Ok(Some(ZoneImages { layout, art }))
    }

    fn friendly_exists(&self, id: u8) -> bool {
        self.friendly_dir(id).join("main.png").is_file()
    }

    fn friendly_dialogue(&self, id: u8) -> Option<String> {
        let path = self.friendly_dir(id).join("speech.txt");
        match std::fs::read_to_string(&path) {
            Ok(text) => Some(text),
            Err(e) => {
                debug!(path = %path.display(), error = %e, "no friendly dialogue");
                None
            }
        }
    }
}

// =============================================================================
// IN MEMORY
// =============================================================================

/// Assets held in memory.
#[derive(Clone, Debug, Default)]
pub struct MemoryAssets {
    zones: Vec<RgbImage>,
    friendlies: BTreeMap<u8, Option<String>>,
}

impl MemoryAssets {
    /// No zones, no friendlies.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append the next zone layout.
    pub fn with_zone(mut self, layout: RgbImage) -> Self {
        self.zones.push(layout);
        self
    }

    /// Register friendly art, with optional dialogue.
    pub fn with_friendly(mut self, id: u8, dialogue: Option<&str>) -> Self {
        self.friendlies.insert(id, dialogue.map(str::to_owned));
        self
    }
}

impl AssetSource for MemoryAssets {
    fn zone_layout(&self, number: usize) -> Result<Option<ZoneImages>, AssetError> {
        let layout = number.checked_sub(1).and_then(|i| self.zones.get(i));
        Ok(layout.map(|layout| ZoneImages {
            layout: layout.clone(),
            art: ZoneArt::default(),
        }))
    }

    fn friendly_exists(&self, id: u8) -> bool {
        self.friendlies.contains_key(&id)
    }

    fn friendly_dialogue(&self, id: u8) -> Option<String> {
        self.friendlies.get(&id).cloned().flatten()
    }
}
