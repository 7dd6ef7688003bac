/// One play session: the PLAYING → GAME_OVER → (restart) state machine and
/// the collaborators it drives at each transition.

use std::path::Path;

use rand::Rng;

use crate::audio::AudioSink;
use crate::compute::{init_state, restart_state, tick, Controls, FrameClock};
use crate::entities::{GameState, GameStatus, Variant};
use crate::ledger::ScoreLedger;

/// What the game-over screen shows.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Summary {
    pub final_score: u32,
    pub top_scores: Vec<u32>,
}

pub struct Session<R, L, A> {
    state: GameState,
    rng: R,
    ledger: L,
    audio: A,
    music_loaded: bool,
    summary: Option<Summary>,
}

impl<R: Rng, L: ScoreLedger, A: AudioSink> Session<R, L, A> {
    pub fn new(variant: Variant, rng: R, ledger: L, audio: A) -> Self {
        tracing::info!(?variant, "session started");
        Session {
            state: init_state(variant),
            rng,
            ledger,
            audio,
            music_loaded: false,
            summary: None,
        }
    }

    pub fn with_culling(mut self, cull_offscreen: bool) -> Self {
        self.state.cull_offscreen = cull_offscreen;
        self
    }

    /// Load and loop the background track.  A missing or unreadable track
    /// only costs the music.
    pub fn start_music(&mut self, track: &Path, volume: f32) {
        match self.audio.load(track) {
            Ok(()) => {
                self.audio.set_volume(volume);
                self.audio.play(true);
                self.music_loaded = true;
            }
            Err(e) => tracing::warn!("Music error: {e}"),
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn audio(&self) -> &A {
        &self.audio
    }

    pub fn ledger(&self) -> &L {
        &self.ledger
    }

    pub fn summary(&self) -> Option<&Summary> {
        self.summary.as_ref()
    }

    pub fn is_over(&self) -> bool {
        self.state.status == GameStatus::GameOver
    }

    /// Run one tick.  Returns the summary on the tick the player dies.
    pub fn step(&mut self, controls: Controls, clock: FrameClock) -> Option<Summary> {
        if self.is_over() {
            return None;
        }
        self.state = tick(&self.state, controls, clock, &mut self.rng);
        if !self.is_over() {
            return None;
        }
        let summary = self.finish();
        self.summary = Some(summary.clone());
        Some(summary)
    }

    fn finish(&mut self) -> Summary {
        let final_score = self.state.score;
        tracing::info!(final_score, frame = self.state.frame, "game over");

        self.audio.stop();
        if self.state.variant.persists_scores() {
            if let Err(e) = self.ledger.write_top3(final_score) {
                tracing::warn!("saving high score failed: {e}");
            }
        }
        Summary {
            final_score,
            top_scores: self.ledger.read_top3(),
        }
    }

    /// Start a fresh run after game over.  Returns `false` when the variant
    /// has no restart flow or the game is still running.
    pub fn restart(&mut self) -> bool {
        if !self.state.variant.can_restart() || !self.is_over() {
            return false;
        }
        self.state = restart_state(&self.state);
        self.summary = None;
        if self.music_loaded {
            self.audio.play(true);
        }
        tracing::info!("restarted");
        true
    }
}
