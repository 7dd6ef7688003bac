/// Command-line configuration.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::assets::asset_dir;
use crate::constants::MUSIC_VOLUME;
use crate::entities::Variant;
use crate::ledger::DEFAULT_LEDGER_FILE;

pub const DEFAULT_LOG_FILE: &str = "flying_shooter.log";

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum CliVariant {
    /// English build with carriers and the restart flow
    Classic,
    /// Chinese build: no carriers, no restart, read-only high scores
    Localized,
}

impl From<CliVariant> for Variant {
    fn from(v: CliVariant) -> Self {
        match v {
            CliVariant::Classic => Variant::Classic,
            CliVariant::Localized => Variant::Localized,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "flying_shooter")]
#[command(about = "Terminal arcade shoot-em-up: dodge, auto-fire, survive")]
pub struct Cli {
    #[arg(long, value_enum, default_value_t = CliVariant::Classic)]
    pub variant: CliVariant,
    /// High-score file (three lines, best first)
    #[arg(long, default_value = DEFAULT_LEDGER_FILE)]
    pub ledger: PathBuf,
    /// Directory holding sprites and music [default: <base dir>/assets]
    #[arg(long)]
    pub assets: Option<PathBuf>,
    /// Seed for enemy spawns; random when omitted
    #[arg(long)]
    pub seed: Option<u64>,
    /// Drop enemies that fall below the screen instead of letting them linger
    #[arg(long)]
    pub cull_offscreen: bool,
    #[arg(long, default_value_t = MUSIC_VOLUME, value_parser = parse_volume)]
    pub volume: f32,
    #[arg(long, default_value = DEFAULT_LOG_FILE)]
    pub log_file: PathBuf,
}

fn parse_volume(s: &str) -> Result<f32, String> {
    let v: f32 = s.parse().map_err(|_| format!("`{s}` is not a number"))?;
    if (0.0..=1.0).contains(&v) {
        Ok(v)
    } else {
        Err(format!("volume must be in [0.0..=1.0], got {v}"))
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct GameConfig {
    pub variant: Variant,
    pub ledger_path: PathBuf,
    pub assets_dir: PathBuf,
    pub seed: Option<u64>,
    pub cull_offscreen: bool,
    pub volume: f32,
    pub log_file: PathBuf,
}

impl From<Cli> for GameConfig {
    fn from(cli: Cli) -> Self {
        GameConfig {
            variant: cli.variant.into(),
            ledger_path: cli.ledger,
            assets_dir: cli.assets.unwrap_or_else(asset_dir),
            seed: cli.seed,
            cull_offscreen: cli.cull_offscreen,
            volume: cli.volume,
            log_file: cli.log_file,
        }
    }
}
