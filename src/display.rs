/// Rendering layer — all terminal I/O lives here.
///
/// Receives the world-space draw commands produced by the library and
/// projects the 1280×720 world onto the terminal grid.  No game logic is
/// performed here.

use std::io::Write;

use crossterm::{
    cursor,
    style::{self, Color, Print},
    terminal,
    QueueableCommand,
};
use flying_shooter::assets::{Sprite, SpriteSheet};
use flying_shooter::constants::{HEIGHT, WIDTH};
use flying_shooter::entities::{EnemyKind, Rect};
use flying_shooter::render::{Anchor, DrawCommand, Rgb, SpriteId};

// ── Colour palette ────────────────────────────────────────────────────────────

const C_BACKGROUND: Color = Color::DarkGrey;
const C_PLAYER: Color = Color::White;
const C_DRONE: Color = Color::Green;
const C_GUNSHIP: Color = Color::Yellow;
const C_CARRIER: Color = Color::Magenta;
const C_HINT: Color = Color::DarkGrey;

fn rgb(color: Rgb) -> Color {
    Color::Rgb {
        r: color.0,
        g: color.1,
        b: color.2,
    }
}

fn sprite_color(id: SpriteId) -> Color {
    match id {
        SpriteId::Background => C_BACKGROUND,
        SpriteId::Player => C_PLAYER,
        SpriteId::Enemy(EnemyKind::Drone) => C_DRONE,
        SpriteId::Enemy(EnemyKind::Gunship) => C_GUNSHIP,
        SpriteId::Enemy(EnemyKind::Carrier) => C_CARRIER,
    }
}

// ── World ↔ terminal projection ───────────────────────────────────────────────

/// Maps world pixels onto terminal cells.  The last terminal row is kept
/// for the controls hint.
#[derive(Clone, Copy, Debug)]
pub struct Projection {
    cols: u16,
    rows: u16,
}

impl Projection {
    pub fn new(cols: u16, rows: u16) -> Self {
        Projection {
            cols: cols.max(1),
            rows: rows.saturating_sub(1).max(1),
        }
    }

    pub fn current() -> std::io::Result<Self> {
        let (cols, rows) = terminal::size()?;
        Ok(Projection::new(cols, rows))
    }

    fn col(&self, x: i32) -> i32 {
        (x as i64 * self.cols as i64 / WIDTH as i64) as i32
    }

    fn row(&self, y: i32) -> i32 {
        (y as i64 * self.rows as i64 / HEIGHT as i64) as i32
    }

    /// Cell span covered by a world box; at least one cell on each axis.
    fn span(&self, rect: &Rect) -> (i32, i32, i32, i32) {
        let c0 = self.col(rect.left());
        let r0 = self.row(rect.top());
        let c1 = self.col(rect.right()).max(c0 + 1);
        let r1 = self.row(rect.bottom()).max(r0 + 1);
        (c0, r0, c1, r1)
    }

    fn visible(&self, col: i32, row: i32) -> bool {
        col >= 0 && row >= 0 && col < self.cols as i32 && row < self.rows as i32
    }

    /// World point at the centre of a terminal cell.
    pub fn to_world(&self, col: u16, row: u16) -> (i32, i32) {
        let x = (col as i64 * 2 + 1) * WIDTH as i64 / (self.cols as i64 * 2);
        let y = (row as i64 * 2 + 1) * HEIGHT as i64 / (self.rows as i64 * 2);
        (x as i32, y as i32)
    }

    pub fn hint_row(&self) -> u16 {
        self.rows
    }
}

// ── Public entry point ────────────────────────────────────────────────────────

/// Render one complete frame.
pub fn render<W: Write>(
    out: &mut W,
    commands: &[DrawCommand],
    sprites: &SpriteSheet,
    proj: &Projection,
    hint: &str,
) -> std::io::Result<()> {
    out.queue(terminal::Clear(terminal::ClearType::All))?;

    for cmd in commands {
        match cmd {
            DrawCommand::Fill(_) => {
                out.queue(terminal::Clear(terminal::ClearType::All))?;
            }
            DrawCommand::Sprite { sprite, rect } => {
                let glyphs = match sprite {
                    SpriteId::Background => &sprites.background,
                    SpriteId::Player => &sprites.player,
                    SpriteId::Enemy(kind) => sprites.enemy(*kind),
                };
                draw_sprite(out, proj, glyphs, rect, sprite_color(*sprite))?;
            }
            DrawCommand::Circle { cx, cy, color, .. } => {
                let (col, row) = (proj.col(*cx), proj.row(*cy));
                if proj.visible(col, row) {
                    out.queue(cursor::MoveTo(col as u16, row as u16))?;
                    out.queue(style::SetForegroundColor(rgb(*color)))?;
                    out.queue(Print("●"))?;
                }
            }
            DrawCommand::Text {
                text,
                x,
                y,
                anchor,
                color,
            } => {
                let mut col = proj.col(*x);
                if *anchor == Anchor::Center {
                    col -= text.chars().count() as i32 / 2;
                }
                draw_text(out, proj, col, proj.row(*y), text, rgb(*color))?;
            }
            DrawCommand::Button { label, rect, color } => {
                draw_button(out, proj, label, rect, rgb(*color))?;
            }
        }
    }

    out.queue(cursor::MoveTo(1, proj.hint_row()))?;
    out.queue(style::SetForegroundColor(C_HINT))?;
    out.queue(Print(hint))?;

    // Park cursor in a harmless spot and flush
    out.queue(style::ResetColor)?;
    out.queue(cursor::MoveTo(0, proj.hint_row()))?;
    out.flush()?;
    Ok(())
}

// ── Primitives ────────────────────────────────────────────────────────────────

/// Stretch a sprite over the cells its box covers.  Spaces are transparent.
fn draw_sprite<W: Write>(
    out: &mut W,
    proj: &Projection,
    sprite: &Sprite,
    rect: &Rect,
    color: Color,
) -> std::io::Result<()> {
    let (c0, r0, c1, r1) = proj.span(rect);
    let (cols, rows) = ((c1 - c0) as usize, (r1 - r0) as usize);

    out.queue(style::SetForegroundColor(color))?;
    for row in r0..r1 {
        for col in c0..c1 {
            if !proj.visible(col, row) {
                continue;
            }
            let glyph = sprite.sample((col - c0) as usize, (row - r0) as usize, cols, rows);
            if glyph == ' ' {
                continue;
            }
            out.queue(cursor::MoveTo(col as u16, row as u16))?;
            out.queue(Print(glyph))?;
        }
    }
    Ok(())
}

fn draw_text<W: Write>(
    out: &mut W,
    proj: &Projection,
    col: i32,
    row: i32,
    text: &str,
    color: Color,
) -> std::io::Result<()> {
    if !proj.visible(col.max(0), row) {
        return Ok(());
    }
    // clip the left edge rather than dropping the whole line
    let skip = (-col).max(0) as usize;
    let visible: String = text.chars().skip(skip).collect();
    out.queue(cursor::MoveTo(col.max(0) as u16, row as u16))?;
    out.queue(style::SetForegroundColor(color))?;
    out.queue(Print(visible))?;
    Ok(())
}

fn draw_button<W: Write>(
    out: &mut W,
    proj: &Projection,
    label: &str,
    rect: &Rect,
    color: Color,
) -> std::io::Result<()> {
    let (c0, r0, c1, r1) = proj.span(rect);
    out.queue(style::SetBackgroundColor(color))?;
    for row in r0..r1 {
        if !proj.visible(c0.max(0), row) {
            continue;
        }
        out.queue(cursor::MoveTo(c0.max(0) as u16, row as u16))?;
        out.queue(Print(" ".repeat((c1 - c0.max(0)).max(0) as usize)))?;
    }

    let label_col = c0 + ((c1 - c0) - label.chars().count() as i32) / 2;
    let label_row = r0 + (r1 - r0) / 2;
    draw_text(out, proj, label_col, label_row, label, Color::White)?;
    out.queue(style::SetBackgroundColor(Color::Reset))?;
    Ok(())
}
