use std::path::PathBuf;

// ---------------------------------------------------------------------------
// Canvas
// ---------------------------------------------------------------------------

/// Logical canvas width in pixels. The window surface is stretched to fit.
pub const CANVAS_WIDTH: f32 = 800.0;
/// Logical canvas height in pixels.
pub const CANVAS_HEIGHT: f32 = 600.0;
/// Largest simulated step per tick (ms). Keeps a backgrounded window from
/// jumping the simulation forward when it resumes.
pub const MAX_DELTA_TIME: f64 = 100.0;
/// Canvas clear colour (#fdfcdc).
pub const CLEAR_COLOR: [f64; 3] = [0.992, 0.988, 0.863];

// ---------------------------------------------------------------------------
// Sprite sheets
// ---------------------------------------------------------------------------

/// Edge length of one square cell in the cat and tub sheets.
pub const FRAME_SIZE: u32 = 96;
/// Time each animation frame stays on screen (ms).
pub const DEFAULT_FRAME_DELAY: f64 = 150.0;

// ---------------------------------------------------------------------------
// Cat behavior
// ---------------------------------------------------------------------------

/// Pixels moved per FSM tick while walking.
pub const WALK_SPEED: f32 = 2.0;
/// How long the cat sits still before playing a random idle animation (ms).
pub const PAUSE_DURATION: f64 = 2000.0;
/// Sitting spot, near the top-right corner.
pub const CAT_TARGET_X: f32 = 696.0;
pub const CAT_SITTING_Y: f32 = 32.0;

// ---------------------------------------------------------------------------
// Tub
// ---------------------------------------------------------------------------

pub const TUB_FRAME_SIZE: u32 = FRAME_SIZE;
/// Tub is centered on the canvas.
pub const TUB_DEFAULT_X: f32 = (CANVAS_WIDTH - TUB_FRAME_SIZE as f32) / 2.0;
pub const TUB_DEFAULT_Y: f32 = (CANVAS_HEIGHT - TUB_FRAME_SIZE as f32) / 2.0;

// ---------------------------------------------------------------------------
// Wash minigame
// ---------------------------------------------------------------------------

/// Delay between the final trace and the "wash complete" notification (ms).
pub const WASH_COMPLETE_DELAY: f64 = 500.0;

// ---------------------------------------------------------------------------
// Assets
// ---------------------------------------------------------------------------

pub const CAT_SPRITE_SHEET_PATH: &str = "sprites/cats/orange-cat.png";
pub const TUB_SPRITE_SHEET_PATH: &str = "sprites/stations/tub-sheet.png";
pub const WASH_CAT_SPRITE_PATH: &str = "sprites/cats/orange-cat-minigame-bath.png";

/// Environment variable overriding the asset root directory.
pub const ASSET_ROOT_ENV: &str = "CATBATH_ASSETS";
const DEFAULT_ASSET_ROOT: &str = "assets";

/// A decorative sprite drawn behind everything else. Missing files are
/// tolerated: the sprite is skipped.
#[derive(Debug, Clone, Copy)]
pub struct StaticSpriteConfig {
    pub id: &'static str,
    pub src: &'static str,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

pub const STATIC_SPRITE_CONFIGS: &[StaticSpriteConfig] = &[
    StaticSpriteConfig {
        id: "background",
        src: "sprites/background.png",
        x: 0.0,
        y: 0.0,
        width: CANVAS_WIDTH,
        height: CANVAS_HEIGHT,
    },
    StaticSpriteConfig {
        id: "food-bowl",
        src: "sprites/stations/food-bowl.png",
        x: 100.0,
        y: 400.0,
        width: FRAME_SIZE as f32,
        height: FRAME_SIZE as f32,
    },
];

/// Directory sprite paths are resolved against.
pub fn asset_root() -> PathBuf {
    resolve_asset_root(std::env::var_os(ASSET_ROOT_ENV).map(PathBuf::from))
}

fn resolve_asset_root(from_env: Option<PathBuf>) -> PathBuf {
    match from_env {
        Some(path) if !path.as_os_str().is_empty() => path,
        _ => PathBuf::from(DEFAULT_ASSET_ROOT),
    }
}
