/// World-space constants.  Every box lives in a 1280×720 pixel viewport and
/// every rate is expressed against a 60 Hz reference tick.

// ── Viewport ──────────────────────────────────────────────────────────────────

pub const WIDTH: i32 = 1280;
pub const HEIGHT: i32 = 720;
pub const FPS: u32 = 60;

// ── Player ────────────────────────────────────────────────────────────────────

pub const PLAYER_WIDTH: i32 = 50;
pub const PLAYER_HEIGHT: i32 = 100;
pub const PLAYER_SPEED: i32 = 8;
pub const PLAYER_HP: i32 = 3;
/// Spawn point (box centre).
pub const PLAYER_SPAWN: (i32, i32) = (WIDTH / 2, HEIGHT - 100);

/// Applied to both axes after a tick that moved the player on X and Y.
pub const DIAGONAL_FACTOR: f32 = 0.7071;

/// A player bullet is fired on ticks where the elapsed milliseconds are a
/// multiple of this value.
pub const AUTO_FIRE_MODULUS: u64 = 15;

// ── Bullets ───────────────────────────────────────────────────────────────────

pub const BULLET_SIZE: i32 = 8;
pub const BULLET_SPEED: f32 = 8.0;
pub const BULLET_RADIUS: i32 = 4;

// ── Enemies ───────────────────────────────────────────────────────────────────

/// Pixels per tick, independent of frame time.
pub const ENEMY_FALL_SPEED: i32 = 3;
/// Seconds between spread volleys.
pub const ENEMY_SHOT_INTERVAL: f32 = 2.0;
/// Degrees added to the aimed angle for each bullet of a volley.
pub const SPREAD_OFFSETS: [f32; 3] = [-15.0, 0.0, 15.0];
/// Horizontal margin kept free of spawns on both sides.
pub const SPAWN_MARGIN: i32 = 50;
/// Horizontal offset of the two escorts released by a destroyed carrier.
pub const SPLIT_OFFSET: i32 = 50;

pub const SPAWN_BASE_CHANCE: f64 = 0.02;
pub const SPAWN_CHANCE_PER_POINT: f64 = 0.0001;

// ── Session ───────────────────────────────────────────────────────────────────

pub const MUSIC_VOLUME: f32 = 0.5;
pub const LEDGER_SLOTS: usize = 3;
/// How long the localized build shows its summary before exiting.
pub const SUMMARY_HOLD_SECS: u64 = 3;
