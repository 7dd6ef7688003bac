/// Draw-command generation.
///
/// The simulation never touches the terminal.  Each frame it is turned into a
/// flat list of `DrawCommand`s in world coordinates, which the binary's
/// display layer projects onto whatever surface it owns.

use crate::constants::{BULLET_RADIUS, HEIGHT, WIDTH};
use crate::entities::{Bullet, EnemyKind, GameState, Rect, Variant};
use crate::menu::GameOverMenu;
use crate::session::Summary;

pub type Rgb = (u8, u8, u8);

pub const BLACK: Rgb = (0, 0, 0);
pub const WHITE: Rgb = (255, 255, 255);
pub const GREY: Rgb = (200, 200, 200);
pub const PLAYER_BULLET: Rgb = (0, 0, 255);
pub const ENEMY_BULLET: Rgb = (255, 0, 0);
pub const BUTTON: Rgb = (70, 130, 180);
pub const BUTTON_HOVER: Rgb = (100, 150, 200);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SpriteId {
    Background,
    Player,
    Enemy(EnemyKind),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Anchor {
    TopLeft,
    Center,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DrawCommand {
    Fill(Rgb),
    Sprite { sprite: SpriteId, rect: Rect },
    Circle { cx: i32, cy: i32, radius: i32, color: Rgb },
    Text { text: String, x: i32, y: i32, anchor: Anchor, color: Rgb },
    Button { label: String, rect: Rect, color: Rgb },
}

// ── Labels ────────────────────────────────────────────────────────────────────

/// User-facing strings for each build.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Labels {
    pub hp: &'static str,
    pub score: &'static str,
    pub final_score: &'static str,
}

impl Labels {
    pub fn for_variant(variant: Variant) -> Self {
        match variant {
            Variant::Classic => Labels {
                hp: "HP",
                score: "Score",
                final_score: "Final Score",
            },
            Variant::Localized => Labels {
                hp: "生命值",
                score: "得分",
                final_score: "最终得分",
            },
        }
    }

    /// `rank` is zero-based.
    pub fn top_line(&self, variant: Variant, rank: usize, score: u32) -> String {
        match variant {
            Variant::Classic => format!("Top {}: {}", rank + 1, score),
            Variant::Localized => format!("第{}名: {}", rank + 1, score),
        }
    }
}

// ── Play frame ────────────────────────────────────────────────────────────────

fn bullet_circle(bullet: &Bullet, color: Rgb) -> DrawCommand {
    let (cx, cy) = bullet.rect().center();
    DrawCommand::Circle {
        cx,
        cy,
        radius: BULLET_RADIUS,
        color,
    }
}

/// Background, player, enemies, bullets, then the HUD on top.
pub fn frame_commands(state: &GameState) -> Vec<DrawCommand> {
    let labels = Labels::for_variant(state.variant);
    let mut cmds = Vec::with_capacity(
        4 + state.enemies.len() + state.player_bullets.len() + state.enemy_bullets.len(),
    );

    cmds.push(DrawCommand::Sprite {
        sprite: SpriteId::Background,
        rect: Rect::new(0, 0, WIDTH, HEIGHT),
    });
    cmds.push(DrawCommand::Sprite {
        sprite: SpriteId::Player,
        rect: state.player.rect,
    });
    for enemy in &state.enemies {
        cmds.push(DrawCommand::Sprite {
            sprite: SpriteId::Enemy(enemy.kind),
            rect: enemy.rect,
        });
    }
    cmds.extend(
        state
            .player_bullets
            .iter()
            .map(|b| bullet_circle(b, PLAYER_BULLET)),
    );
    cmds.extend(
        state
            .enemy_bullets
            .iter()
            .map(|b| bullet_circle(b, ENEMY_BULLET)),
    );

    cmds.push(DrawCommand::Text {
        text: format!("{}: {}", labels.hp, state.player.hp),
        x: 10,
        y: 10,
        anchor: Anchor::TopLeft,
        color: WHITE,
    });
    cmds.push(DrawCommand::Text {
        text: format!("{}: {}", labels.score, state.score),
        x: WIDTH - 150,
        y: 10,
        anchor: Anchor::TopLeft,
        color: WHITE,
    });
    cmds
}

// ── Game-over screen ──────────────────────────────────────────────────────────

/// Final score, the top three, and the buttons when the build has them.
pub fn summary_commands(
    summary: &Summary,
    variant: Variant,
    menu: Option<&GameOverMenu>,
    pointer: Option<(i32, i32)>,
) -> Vec<DrawCommand> {
    let labels = Labels::for_variant(variant);
    let mut cmds = vec![
        DrawCommand::Fill(BLACK),
        DrawCommand::Text {
            text: format!("{}: {}", labels.final_score, summary.final_score),
            x: WIDTH / 2,
            y: HEIGHT / 2 - 100,
            anchor: Anchor::Center,
            color: WHITE,
        },
    ];

    let top_y = HEIGHT / 2 - 30;
    for (rank, score) in summary.top_scores.iter().take(3).enumerate() {
        cmds.push(DrawCommand::Text {
            text: labels.top_line(variant, rank, *score),
            x: WIDTH / 2 - 80,
            y: top_y + rank as i32 * 50,
            anchor: Anchor::TopLeft,
            color: GREY,
        });
    }

    if let Some(menu) = menu {
        for button in &menu.buttons {
            cmds.push(DrawCommand::Button {
                label: button.label.to_string(),
                rect: button.rect,
                color: if button.hovered(pointer) {
                    BUTTON_HOVER
                } else {
                    BUTTON
                },
            });
        }
    }
    cmds
}
