//! Sprite sheet loading.
//!
//! `load_game_assets` decodes every sheet the scene needs and turns them into
//! the initial entity snapshots. The cat and tub sheets are required: any
//! failure aborts the load. Decorations and the wash sheet are optional and
//! are skipped with a warning when they can't be read.

use std::path::PathBuf;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use glam::Vec2;

use crate::cat::{self, CatAnimation, CatSprite};
use crate::config::{
    StaticSpriteConfig, CAT_SPRITE_SHEET_PATH, DEFAULT_FRAME_DELAY, FRAME_SIZE,
    STATIC_SPRITE_CONFIGS, TUB_FRAME_SIZE, TUB_SPRITE_SHEET_PATH, WASH_CAT_SPRITE_PATH,
};
use crate::sprite::{AnimationKey, AnimationTable, AtlasError, AtlasLayout, StaticSprite};
use crate::tub::{self, TubAnimation, TubSprite};

/// Identity of a decoded bitmap, used to cache GPU textures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ImageKey(u32);

static NEXT_IMAGE_KEY: AtomicU32 = AtomicU32::new(1);

/// Decoded RGBA8 pixels (straight alpha). Read-only once loaded.
pub struct Bitmap {
    pub key: ImageKey,
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

impl Bitmap {
    pub fn new(width: u32, height: u32, rgba: Vec<u8>) -> Self {
        Self {
            key: ImageKey(NEXT_IMAGE_KEY.fetch_add(1, Ordering::Relaxed)),
            width,
            height,
            rgba,
        }
    }
}

impl std::fmt::Debug for Bitmap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Bitmap")
            .field("key", &self.key)
            .field("width", &self.width)
            .field("height", &self.height)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    #[error("failed to load image {path}")]
    Decode {
        path: String,
        #[source]
        source: image::ImageError,
    },
    #[error("image {path} not found")]
    Missing { path: String },
    #[error("sprite sheet {path} does not match its atlas")]
    Atlas {
        path: &'static str,
        #[source]
        source: AtlasError,
    },
}

/// Where sheet bytes come from.
pub trait AssetSource {
    fn load_image(&self, path: &str) -> Result<Bitmap, AssetError>;
}

/// Reads PNGs relative to a root directory.
pub struct FsAssetSource {
    root: PathBuf,
}

impl FsAssetSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl AssetSource for FsAssetSource {
    fn load_image(&self, path: &str) -> Result<Bitmap, AssetError> {
        let full = self.root.join(path);
        if !full.is_file() {
            return Err(AssetError::Missing {
                path: full.display().to_string(),
            });
        }
        let image = image::open(&full)
            .map_err(|source| AssetError::Decode {
                path: full.display().to_string(),
                source,
            })?
            .to_rgba8();
        let (width, height) = image.dimensions();
        Ok(Bitmap::new(width, height, image.into_raw()))
    }
}

/// Everything the scene needs to start.
#[derive(Debug, Clone)]
pub struct LoadedAssets {
    pub static_sprites: Vec<StaticSprite>,
    pub cat: CatSprite,
    pub tub: TubSprite,
    /// Sheet for the wash minigame, if it could be read.
    pub wash_sheet: Option<Arc<Bitmap>>,
}

pub fn load_game_assets(source: &dyn AssetSource) -> Result<LoadedAssets, AssetError> {
    let (cat_image, cat_table) =
        load_sheet::<CatAnimation>(source, CAT_SPRITE_SHEET_PATH, FRAME_SIZE)?;
    let cat = cat::spawn_cat(cat_image, cat_table);

    let (tub_image, tub_table) =
        load_sheet::<TubAnimation>(source, TUB_SPRITE_SHEET_PATH, TUB_FRAME_SIZE)?;
    let tub = tub::place_tub(tub_image, tub_table);

    let static_sprites = load_static_sprites(source, STATIC_SPRITE_CONFIGS);

    let wash_sheet = match source.load_image(WASH_CAT_SPRITE_PATH) {
        Ok(bitmap) => Some(Arc::new(bitmap)),
        Err(e) => {
            log::warn!("Wash sheet unavailable, minigame will show a placeholder: {e}");
            None
        }
    };

    log::info!(
        "Assets loaded: cat {}x{}, tub {}x{}, {} decoration(s), wash sheet: {}",
        cat.image.width,
        cat.image.height,
        tub.image.width,
        tub.image.height,
        static_sprites.len(),
        wash_sheet.is_some(),
    );

    Ok(LoadedAssets {
        static_sprites,
        cat,
        tub,
        wash_sheet,
    })
}

/// Decode a required sheet and slice its animation table.
fn load_sheet<K: AnimationKey>(
    source: &dyn AssetSource,
    path: &'static str,
    frame_size: u32,
) -> Result<(Arc<Bitmap>, Arc<AnimationTable<K>>), AssetError> {
    let image = source.load_image(path)?;
    let layout = AtlasLayout {
        frame_size,
        frame_delay: DEFAULT_FRAME_DELAY,
    };
    let table = AnimationTable::build(layout, image.width, image.height)
        .map_err(|source| AssetError::Atlas { path, source })?;
    Ok((Arc::new(image), Arc::new(table)))
}

fn load_static_sprites(
    source: &dyn AssetSource,
    configs: &[StaticSpriteConfig],
) -> Vec<StaticSprite> {
    configs
        .iter()
        .filter_map(|config| match source.load_image(config.src) {
            Ok(image) => {
                log::debug!("Loaded static sprite {}", config.id);
                Some(StaticSprite {
                    image: Arc::new(image),
                    pos: Vec2::new(config.x, config.y),
                    size: Vec2::new(config.width, config.height),
                })
            }
            Err(e) => {
                log::warn!("Skipping static sprite {}: {e}", config.id);
                None
            }
        })
        .collect()
}

#[cfg(test)]
pub(crate) mod testing {
    use std::collections::HashMap;

    use super::*;

    impl Bitmap {
        /// Fully transparent bitmap.
        pub fn blank(width: u32, height: u32) -> Self {
            Self::new(width, height, vec![0; (width * height * 4) as usize])
        }
    }

    /// In-memory sheets of fixed sizes; unknown paths are missing.
    pub struct MemorySource {
        sizes: HashMap<&'static str, (u32, u32)>,
    }

    impl MemorySource {
        pub fn empty() -> Self {
            Self {
                sizes: HashMap::new(),
            }
        }

        /// Cat, tub and wash sheets at their real sizes.
        pub fn complete() -> Self {
            Self::empty()
                .with(CAT_SPRITE_SHEET_PATH, FRAME_SIZE * 15, FRAME_SIZE * 7)
                .with(TUB_SPRITE_SHEET_PATH, TUB_FRAME_SIZE, TUB_FRAME_SIZE * 2)
                .with(WASH_CAT_SPRITE_PATH, 192, 192 * 6)
        }

        pub fn with(mut self, path: &'static str, width: u32, height: u32) -> Self {
            self.sizes.insert(path, (width, height));
            self
        }

        pub fn without(mut self, path: &str) -> Self {
            self.sizes.remove(path);
            self
        }
    }

    impl AssetSource for MemorySource {
        fn load_image(&self, path: &str) -> Result<Bitmap, AssetError> {
            self.sizes
                .get(path)
                .map(|&(w, h)| Bitmap::blank(w, h))
                .ok_or_else(|| AssetError::Missing {
                    path: path.to_string(),
                })
        }
    }

    pub fn loaded() -> LoadedAssets {
        load_game_assets(&MemorySource::complete()).expect("complete source loads")
    }
}
