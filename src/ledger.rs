/// High-score persistence: the three best final scores, one decimal integer
/// per line in a plaintext file.  Single-writer only.

use std::fs;
use std::path::{Path, PathBuf};

use crate::constants::LEDGER_SLOTS;
use crate::error::LedgerError;

pub const DEFAULT_LEDGER_FILE: &str = "highscores.txt";

pub trait ScoreLedger {
    /// Best scores, highest first.  Never fails: an unreadable ledger reads
    /// as `[0, 0, 0]`.
    fn read_top3(&self) -> Vec<u32>;

    /// Merge `score` into the ledger and keep the best three.
    fn write_top3(&mut self, score: u32) -> Result<(), LedgerError>;
}

/// Sort descending and keep the best `LEDGER_SLOTS` entries.
pub fn merge_top3(mut scores: Vec<u32>, score: u32) -> Vec<u32> {
    scores.push(score);
    top3(scores)
}

fn top3(mut scores: Vec<u32>) -> Vec<u32> {
    scores.sort_unstable_by(|a, b| b.cmp(a));
    scores.truncate(LEDGER_SLOTS);
    scores
}

fn parse_ledger(text: &str) -> Result<Vec<u32>, LedgerError> {
    text.lines()
        .enumerate()
        .map(|(i, line)| {
            line.trim().parse::<u32>().map_err(|_| LedgerError::Parse {
                line: i + 1,
                text: line.to_string(),
            })
        })
        .collect()
}

#[derive(Clone, Debug)]
pub struct FileLedger {
    path: PathBuf,
}

impl FileLedger {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        FileLedger { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn try_read(&self) -> Result<Vec<u32>, LedgerError> {
        let text = fs::read_to_string(&self.path)?;
        Ok(top3(parse_ledger(&text)?))
    }
}

impl ScoreLedger for FileLedger {
    fn read_top3(&self) -> Vec<u32> {
        match self.try_read() {
            Ok(scores) => scores,
            Err(e) => {
                tracing::warn!(path = %self.path.display(), "reading high scores failed: {e}");
                vec![0; LEDGER_SLOTS]
            }
        }
    }

    fn write_top3(&mut self, score: u32) -> Result<(), LedgerError> {
        let merged = merge_top3(self.read_top3(), score);
        let body: String = merged.iter().map(|s| format!("{s}\n")).collect();
        fs::write(&self.path, body)?;
        Ok(())
    }
}
