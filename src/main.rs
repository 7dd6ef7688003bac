mod display;

use std::collections::HashMap;
use std::fs::File;
use std::io::{stdout, BufWriter, Write};
use std::path::Path;
use std::sync::{mpsc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

use clap::Parser;
use crossterm::{
    cursor,
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        KeyModifiers, KeyboardEnhancementFlags, MouseButton, MouseEvent, MouseEventKind,
        PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    terminal, ExecutableCommand,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing_subscriber::EnvFilter;

use flying_shooter::assets::SpriteSheet;
use flying_shooter::audio::{MusicPlayer, MUSIC_FILE};
use flying_shooter::compute::{Controls, FrameClock};
use flying_shooter::config::{Cli, GameConfig};
use flying_shooter::constants::{FPS, SUMMARY_HOLD_SECS};
use flying_shooter::entities::Variant;
use flying_shooter::ledger::FileLedger;
use flying_shooter::menu::{GameOverMenu, MenuChoice};
use flying_shooter::render::{frame_commands, summary_commands};
use flying_shooter::session::{Session, Summary};

use display::Projection;

const FRAME: Duration = Duration::from_nanos(1_000_000_000 / FPS as u64);

/// A key is considered "held" if its last press/repeat event arrived within
/// this many frames.  Covers terminals that don't emit key-release events:
/// once auto-repeat is running (≥ 15 Hz) an 8-frame (≈133 ms) window is
/// refreshed before it expires.
const HOLD_WINDOW: u64 = 8;

/// Window for a key that has been pressed but not yet repeated.  The OS
/// repeat delay (typically 250–500 ms) is longer than `HOLD_WINDOW`, so a
/// fresh press is held for ≈600 ms or until its first repeat arrives.
const FIRST_REPEAT_WINDOW: u64 = 36;

/// Last press/repeat frame of a key and whether auto-repeat has started.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct KeyHold {
    last: u64,
    repeating: bool,
}

impl KeyHold {
    fn is_held(&self, frame: u64) -> bool {
        let window = if self.repeating {
            HOLD_WINDOW
        } else {
            FIRST_REPEAT_WINDOW
        };
        frame.saturating_sub(self.last) <= window
    }
}

fn hint(variant: Variant) -> &'static str {
    match variant {
        Variant::Classic => "W A S D / ← ↑ ↓ → : Move   Auto-fire   Q : Quit",
        Variant::Localized => "W A S D / 方向键 : 移动   自动射击   Q : 退出",
    }
}

// ── Input ─────────────────────────────────────────────────────────────────────

/// Held keys, pointer position and the one-shot signals seen since the last
/// drain.
///
/// Held-key model: `keys` records the frame of the last press/repeat event
/// for every key.  Keyboard-enhancement terminals (kitty protocol)
/// also send `Release`, which removes the key at once; classic terminals
/// only repeat `Press`, so keys expire after a window of silence (see
/// `KeyHold`).
#[derive(Default)]
struct Input {
    keys: HashMap<KeyCode, KeyHold>,
    pointer: Option<(u16, u16)>,
    clicks: Vec<(u16, u16)>,
    quit: bool,
    restart: bool,
}

impl Input {
    fn drain(&mut self, rx: &mpsc::Receiver<Event>, frame: u64) {
        while let Ok(ev) = rx.try_recv() {
            match ev {
                Event::Key(KeyEvent {
                    code,
                    kind,
                    modifiers,
                    ..
                }) => match kind {
                    KeyEventKind::Press => {
                        // classic terminals report auto-repeat as more presses
                        let repeating = self
                            .keys
                            .get(&code)
                            .map(|hold| hold.is_held(frame))
                            .unwrap_or(false);
                        self.keys.insert(code, KeyHold { last: frame, repeating });
                        match code {
                            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                                self.quit = true;
                            }
                            KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
                                self.quit = true;
                            }
                            KeyCode::Char('r') | KeyCode::Char('R') => self.restart = true,
                            _ => {}
                        }
                    }
                    KeyEventKind::Repeat => {
                        self.keys.insert(
                            code,
                            KeyHold {
                                last: frame,
                                repeating: true,
                            },
                        );
                    }
                    KeyEventKind::Release => {
                        self.keys.remove(&code);
                    }
                },
                Event::Mouse(MouseEvent {
                    kind, column, row, ..
                }) => {
                    self.pointer = Some((column, row));
                    if kind == MouseEventKind::Down(MouseButton::Left) {
                        self.clicks.push((column, row));
                    }
                }
                _ => {}
            }
        }
    }

    fn is_held(&self, keys: &[KeyCode], frame: u64) -> bool {
        keys.iter().any(|key| {
            self.keys
                .get(key)
                .map(|hold| hold.is_held(frame))
                .unwrap_or(false)
        })
    }

    fn controls(&self, frame: u64) -> Controls {
        Controls {
            up: self.is_held(&[KeyCode::Up, KeyCode::Char('w'), KeyCode::Char('W')], frame),
            down: self.is_held(&[KeyCode::Down, KeyCode::Char('s'), KeyCode::Char('S')], frame),
            left: self.is_held(&[KeyCode::Left, KeyCode::Char('a'), KeyCode::Char('A')], frame),
            right: self.is_held(&[KeyCode::Right, KeyCode::Char('d'), KeyCode::Char('D')], frame),
        }
    }

    /// Forget everything except the pointer position.
    fn reset(&mut self) {
        self.keys.clear();
        self.clicks.clear();
        self.restart = false;
    }
}

// ── Game-over screen ──────────────────────────────────────────────────────────

/// Show the summary until the player picks restart or exit.  The localized
/// build has no buttons: it holds the summary for a few seconds and exits.
fn game_over_screen<W: Write>(
    out: &mut W,
    rx: &mpsc::Receiver<Event>,
    input: &mut Input,
    summary: &Summary,
    variant: Variant,
    sprites: &SpriteSheet,
) -> std::io::Result<MenuChoice> {
    input.reset();

    if !variant.can_restart() {
        let proj = Projection::current()?;
        let cmds = summary_commands(summary, variant, None, None);
        display::render(out, &cmds, sprites, &proj, hint(variant))?;
        thread::sleep(Duration::from_secs(SUMMARY_HOLD_SECS));
        return Ok(MenuChoice::Exit);
    }

    let menu = GameOverMenu::default();
    let mut frame: u64 = 0;
    loop {
        let frame_start = Instant::now();
        frame += 1;
        input.drain(rx, frame);
        let proj = Projection::current()?;

        if input.quit {
            return Ok(MenuChoice::Exit);
        }
        if input.restart {
            return Ok(MenuChoice::Restart);
        }
        for (col, row) in input.clicks.drain(..) {
            let (x, y) = proj.to_world(col, row);
            if let Some(choice) = menu.choice_at(x, y) {
                return Ok(choice);
            }
        }

        let pointer = input.pointer.map(|(col, row)| proj.to_world(col, row));
        let cmds = summary_commands(summary, variant, Some(&menu), pointer);
        display::render(out, &cmds, sprites, &proj, hint(variant))?;

        let elapsed = frame_start.elapsed();
        if elapsed < FRAME {
            thread::sleep(FRAME - elapsed);
        }
    }
}

// ── Game loop ─────────────────────────────────────────────────────────────────

fn run<W: Write>(
    out: &mut W,
    rx: &mpsc::Receiver<Event>,
    config: &GameConfig,
) -> std::io::Result<()> {
    let sprites = SpriteSheet::load(&config.assets_dir);
    let rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let mut session = Session::new(
        config.variant,
        rng,
        FileLedger::new(&config.ledger_path),
        MusicPlayer::new(),
    )
    .with_culling(config.cull_offscreen);
    session.start_music(&config.assets_dir.join(MUSIC_FILE), config.volume);

    let mut input = Input::default();
    let started = Instant::now();
    let mut last_tick = started;
    let mut frame: u64 = 0;

    loop {
        let frame_start = Instant::now();
        frame += 1;

        input.drain(rx, frame);
        if input.quit {
            return Ok(());
        }

        let clock = FrameClock {
            dt: frame_start.duration_since(last_tick).as_secs_f32(),
            elapsed_ms: started.elapsed().as_millis() as u64,
        };
        last_tick = frame_start;

        if let Some(summary) = session.step(input.controls(frame), clock) {
            match game_over_screen(out, rx, &mut input, &summary, config.variant, &sprites)? {
                MenuChoice::Restart => {
                    session.restart();
                    input.reset();
                    last_tick = Instant::now();
                    continue;
                }
                MenuChoice::Exit => return Ok(()),
            }
        }

        let proj = Projection::current()?;
        display::render(
            out,
            &frame_commands(session.state()),
            &sprites,
            &proj,
            hint(config.variant),
        )?;

        let elapsed = frame_start.elapsed();
        if elapsed < FRAME {
            thread::sleep(FRAME - elapsed);
        }
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

/// The terminal is in raw mode while the game runs, so logs go to a file.
fn init_logging(path: &Path) {
    let writer: Box<dyn Write + Send> = match File::create(path) {
        Ok(file) => Box::new(file),
        Err(_) => Box::new(std::io::sink()),
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(Mutex::new(writer))
        .with_ansi(false)
        .init();
}

fn main() -> std::io::Result<()> {
    let config = GameConfig::from(Cli::parse());
    init_logging(&config.log_file);
    tracing::info!(
        "starting flying_shooter: variant={:?} ledger={} assets={} seed={:?}",
        config.variant,
        config.ledger_path.display(),
        config.assets_dir.display(),
        config.seed
    );

    let raw_out = stdout();
    let mut out = BufWriter::new(raw_out);

    terminal::enable_raw_mode()?;
    out.execute(terminal::EnterAlternateScreen)?;
    out.execute(cursor::Hide)?;
    out.execute(EnableMouseCapture)?;

    // Request key-release (and key-repeat) events from the terminal.
    // Kitty-protocol terminals support this; others fall back gracefully.
    let keyboard_enhanced = out
        .execute(PushKeyboardEnhancementFlags(
            KeyboardEnhancementFlags::REPORT_EVENT_TYPES,
        ))
        .is_ok();

    // Dedicate a thread exclusively to blocking event reads, sending them
    // through a channel so the game loop never has to block on I/O.
    let (tx, rx) = mpsc::channel::<Event>();
    thread::spawn(move || loop {
        match event::read() {
            Ok(ev) => {
                if tx.send(ev).is_err() {
                    break; // receiver dropped → program exiting
                }
            }
            Err(_) => break,
        }
    });

    let result = run(&mut out, &rx, &config);
    if let Err(e) = &result {
        tracing::error!("terminal error: {e}");
    }

    // Always restore the terminal
    if keyboard_enhanced {
        let _ = out.execute(PopKeyboardEnhancementFlags);
    }
    let _ = out.execute(DisableMouseCapture);
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();

    result
}
