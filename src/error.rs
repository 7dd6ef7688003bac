use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("high-score ledger I/O error")]
    Io(#[from] std::io::Error),
    #[error("bad high-score entry on line {line}: {text:?}")]
    Parse { line: usize, text: String },
}

#[derive(Error, Debug)]
pub enum AssetError {
    #[error("failed to read {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("sprite {path} has no visible rows")]
    Empty { path: PathBuf },
}

#[derive(Error, Debug)]
pub enum AudioError {
    #[error("music track {0} not found")]
    Missing(PathBuf),
    #[error("music track {path} is unreadable")]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("music track {path} could not be decoded")]
    Decode {
        path: PathBuf,
        #[source]
        source: rodio::decoder::DecoderError,
    },
}
