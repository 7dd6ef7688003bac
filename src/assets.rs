/// Asset lookup and text-sprite loading.
///
/// Sprites are plain text files: each line is a row of glyphs, stretched by
/// the display layer over the entity's box.  A sprite that cannot be loaded
/// is replaced by a placeholder and the failure is logged; it is never fatal.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use crate::entities::EnemyKind;
use crate::error::AssetError;

/// Overrides the directory assets are looked up from (packaged builds).
pub const BASE_DIR_ENV: &str = "FLYING_SHOOTER_BASE_DIR";
pub const ASSET_DIR: &str = "assets";

const PLACEHOLDER_GLYPH: char = '▒';

/// Directory that holds the `assets/` folder: the override if set, otherwise
/// the executable's directory when it ships one, otherwise the working
/// directory.
pub fn base_dir() -> PathBuf {
    if let Some(dir) = env::var_os(BASE_DIR_ENV) {
        return PathBuf::from(dir);
    }
    env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
        .filter(|dir| dir.join(ASSET_DIR).is_dir())
        .unwrap_or_else(|| PathBuf::from("."))
}

pub fn asset_dir() -> PathBuf {
    base_dir().join(ASSET_DIR)
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Sprite {
    rows: Vec<Vec<char>>,
}

impl Sprite {
    pub fn from_text(text: &str) -> Option<Self> {
        let rows: Vec<Vec<char>> = text
            .lines()
            .map(|line| line.trim_end().chars().collect::<Vec<_>>())
            .collect();
        let width = rows.iter().map(Vec::len).max().unwrap_or(0);
        if width == 0 {
            return None;
        }
        // pad ragged rows so sampling never falls off the end
        let rows = rows
            .into_iter()
            .map(|mut row| {
                row.resize(width, ' ');
                row
            })
            .collect();
        Some(Sprite { rows })
    }

    pub fn load(path: &Path) -> Result<Self, AssetError> {
        let text = fs::read_to_string(path).map_err(|source| AssetError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Sprite::from_text(&text).ok_or_else(|| AssetError::Empty {
            path: path.to_path_buf(),
        })
    }

    /// Solid block used when an entity sprite is missing.
    pub fn placeholder() -> Self {
        Sprite {
            rows: vec![vec![PLACEHOLDER_GLYPH]],
        }
    }

    /// Transparent sprite used when the background is missing.
    pub fn blank() -> Self {
        Sprite {
            rows: vec![vec![' ']],
        }
    }

    pub fn width(&self) -> usize {
        self.rows[0].len()
    }

    pub fn height(&self) -> usize {
        self.rows.len()
    }

    /// Nearest-neighbour sample for a cell at `(col, row)` of a
    /// `cols × rows` target area.
    pub fn sample(&self, col: usize, row: usize, cols: usize, rows: usize) -> char {
        let sx = col * self.width() / cols.max(1);
        let sy = row * self.height() / rows.max(1);
        self.rows[sy.min(self.height() - 1)][sx.min(self.width() - 1)]
    }
}

/// Every sprite the renderer needs, loaded once at startup.
#[derive(Clone, Debug)]
pub struct SpriteSheet {
    pub player: Sprite,
    pub drone: Sprite,
    pub gunship: Sprite,
    pub carrier: Sprite,
    pub background: Sprite,
}

impl SpriteSheet {
    pub fn load(dir: &Path) -> Self {
        SpriteSheet {
            player: load_or(dir, "player.txt", Sprite::placeholder),
            drone: load_or(dir, "enemy_a.txt", Sprite::placeholder),
            gunship: load_or(dir, "enemy_b.txt", Sprite::placeholder),
            carrier: load_or(dir, "enemy_c.txt", Sprite::placeholder),
            background: load_or(dir, "background.txt", Sprite::blank),
        }
    }

    pub fn enemy(&self, kind: EnemyKind) -> &Sprite {
        match kind {
            EnemyKind::Drone => &self.drone,
            EnemyKind::Gunship => &self.gunship,
            EnemyKind::Carrier => &self.carrier,
        }
    }
}

fn load_or(dir: &Path, file: &str, fallback: fn() -> Sprite) -> Sprite {
    let path = dir.join(file);
    Sprite::load(&path).unwrap_or_else(|e| {
        tracing::warn!("Failed to load: {}: {e}", path.display());
        fallback()
    })
}
