/// Background-music surface.  The session only ever loads one looping track,
/// stops it at game over and restarts it on a new run.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use rodio::source::Buffered;
use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink, Source};

use crate::error::AudioError;

pub const MUSIC_FILE: &str = "bgm.ogg";

type Track = Buffered<Decoder<BufReader<File>>>;

pub trait AudioSink {
    fn load(&mut self, track: &Path) -> Result<(), AudioError>;
    fn play(&mut self, looped: bool);
    fn stop(&mut self);
    fn set_volume(&mut self, level: f32);
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Playback {
    Stopped,
    Playing { looped: bool },
}

/// rodio-backed music player.
///
/// Tracks are fully validated by the decoder on `load`, with or without an
/// output device.  When no device could be opened the player still follows
/// load/play/stop but stays silent.
pub struct MusicPlayer {
    // the stream must outlive every sink created from its handle
    output: Option<(OutputStream, OutputStreamHandle)>,
    sink: Option<Sink>,
    track: Option<(PathBuf, Track)>,
    playback: Playback,
    volume: f32,
}

impl MusicPlayer {
    /// Open the default output device, falling back to a silent player.
    pub fn new() -> Self {
        match OutputStream::try_default() {
            Ok(output) => MusicPlayer::with_output(Some(output)),
            Err(e) => {
                tracing::warn!("no audio output, music disabled: {e}");
                MusicPlayer::silent()
            }
        }
    }

    /// A player that never opens an output device.
    pub fn silent() -> Self {
        MusicPlayer::with_output(None)
    }

    fn with_output(output: Option<(OutputStream, OutputStreamHandle)>) -> Self {
        MusicPlayer {
            output,
            sink: None,
            track: None,
            playback: Playback::Stopped,
            volume: 1.0,
        }
    }

    pub fn playback(&self) -> Playback {
        self.playback
    }

    pub fn volume(&self) -> f32 {
        self.volume
    }

    /// True while a sink is actually feeding the output device.
    pub fn is_audible(&self) -> bool {
        self.sink.as_ref().map(|sink| !sink.empty()).unwrap_or(false)
    }

    fn open_sink(&self) -> Option<Sink> {
        let (_, handle) = self.output.as_ref()?;
        match Sink::try_new(handle) {
            Ok(sink) => Some(sink),
            Err(e) => {
                tracing::warn!("music playback skipped: {e}");
                None
            }
        }
    }
}

impl Default for MusicPlayer {
    fn default() -> Self {
        MusicPlayer::new()
    }
}

impl AudioSink for MusicPlayer {
    fn load(&mut self, track: &Path) -> Result<(), AudioError> {
        if !track.exists() {
            return Err(AudioError::Missing(track.to_path_buf()));
        }
        let file = File::open(track).map_err(|source| AudioError::Unreadable {
            path: track.to_path_buf(),
            source,
        })?;
        let decoder = Decoder::new(BufReader::new(file)).map_err(|source| AudioError::Decode {
            path: track.to_path_buf(),
            source,
        })?;
        tracing::debug!(track = %track.display(), "music loaded");
        self.stop();
        self.track = Some((track.to_path_buf(), decoder.buffered()));
        Ok(())
    }

    fn play(&mut self, looped: bool) {
        let Some((path, track)) = &self.track else {
            tracing::debug!("play requested with no track loaded");
            return;
        };
        tracing::debug!(track = %path.display(), looped, "music playing");
        let track = track.clone();

        if let Some(old) = self.sink.take() {
            old.stop();
        }
        self.sink = self.open_sink().map(|sink| {
            sink.set_volume(self.volume);
            if looped {
                sink.append(track.repeat_infinite());
            } else {
                sink.append(track);
            }
            sink
        });
        self.playback = Playback::Playing { looped };
    }

    fn stop(&mut self) {
        if let Some(sink) = self.sink.take() {
            sink.stop();
        }
        if self.playback != Playback::Stopped {
            tracing::debug!("music stopped");
        }
        self.playback = Playback::Stopped;
    }

    fn set_volume(&mut self, level: f32) {
        self.volume = level.clamp(0.0, 1.0);
        if let Some(sink) = &self.sink {
            sink.set_volume(self.volume);
        }
    }
}
