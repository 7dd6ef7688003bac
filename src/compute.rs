/// Pure game-logic functions.
///
/// Every public function takes an immutable reference to the current
/// `GameState` (and, where needed, an RNG handle or frame timing) and returns
/// a brand-new `GameState`.  Collections are rebuilt from a snapshot of the
/// previous ones, so removals never skip or repeat an element.

use rand::Rng;

use crate::constants::{
    AUTO_FIRE_MODULUS, DIAGONAL_FACTOR, ENEMY_FALL_SPEED, ENEMY_SHOT_INTERVAL, HEIGHT,
    SPAWN_BASE_CHANCE, SPAWN_CHANCE_PER_POINT, SPLIT_OFFSET, SPREAD_OFFSETS, WIDTH,
};
use crate::entities::{
    Bullet, BulletOwner, Enemy, EnemyKind, GameState, GameStatus, Player, Rect, Variant,
};

/// Directions held during a tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Controls {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
}

/// Frame timing handed to `tick` by the loop.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameClock {
    /// Seconds since the previous tick.
    pub dt: f32,
    /// Milliseconds since the game started.
    pub elapsed_ms: u64,
}

pub fn viewport() -> Rect {
    Rect::new(0, 0, WIDTH, HEIGHT)
}

// ── Constructors ─────────────────────────────────────────────────────────────

pub fn init_state(variant: Variant) -> GameState {
    GameState {
        variant,
        player: Player::at_spawn(),
        enemies: Vec::new(),
        player_bullets: Vec::new(),
        enemy_bullets: Vec::new(),
        score: 0,
        status: GameStatus::Playing,
        frame: 0,
        cull_offscreen: false,
    }
}

/// Back to spawn defaults: full HP, zero score, empty collections.
pub fn restart_state(state: &GameState) -> GameState {
    GameState {
        cull_offscreen: state.cull_offscreen,
        ..init_state(state.variant)
    }
}

// ── Input-driven movement ────────────────────────────────────────────────────

/// Move the player for one tick.
///
/// Each held direction moves `int(speed * dt * 60)` pixels as long as the
/// player is not already against that edge; the step is clamped so the box
/// never leaves the viewport.  When both axes moved, the clamped deltas are
/// scaled by `DIAGONAL_FACTOR` and the result truncated.
pub fn move_player(state: &GameState, controls: Controls, dt: f32) -> GameState {
    let step = (state.player.speed as f32 * dt * 60.0) as i32;
    let original = state.player.rect;
    let mut rect = original;

    if controls.left && rect.left() > 0 {
        rect.x -= step.min(rect.left());
    }
    if controls.right && rect.right() < WIDTH {
        rect.x += step.min(WIDTH - rect.right());
    }
    if controls.up && rect.top() > 0 {
        rect.y -= step.min(rect.top());
    }
    if controls.down && rect.bottom() < HEIGHT {
        rect.y += step.min(HEIGHT - rect.bottom());
    }

    if rect.x != original.x && rect.y != original.y {
        let move_x = (rect.x - original.x) as f32;
        let move_y = (rect.y - original.y) as f32;
        rect.x = (original.x as f32 + move_x * DIAGONAL_FACTOR) as i32;
        rect.y = (original.y as f32 + move_y * DIAGONAL_FACTOR) as i32;
    }

    GameState {
        player: Player {
            rect,
            ..state.player.clone()
        },
        ..state.clone()
    }
}

// ── Auto-fire & spawning ─────────────────────────────────────────────────────

/// Fire one shot from the player's nose on ticks whose elapsed milliseconds
/// land on a multiple of `AUTO_FIRE_MODULUS`.  Cadence therefore follows
/// frame-timing jitter.
pub fn auto_fire(state: &GameState, elapsed_ms: u64) -> GameState {
    if elapsed_ms % AUTO_FIRE_MODULUS != 0 {
        return state.clone();
    }
    let rect = state.player.rect;
    let mut player_bullets = state.player_bullets.clone();
    player_bullets.push(Bullet::player_shot(rect.center_x(), rect.top()));
    GameState {
        player_bullets,
        ..state.clone()
    }
}

/// Per-tick spawn chance.  Deliberately unclamped: past a score of 9800 it
/// exceeds 1 and an enemy spawns every tick.
pub fn spawn_probability(score: u32) -> f64 {
    SPAWN_BASE_CHANCE + score as f64 * SPAWN_CHANCE_PER_POINT
}

pub fn roll_enemy_kind(variant: Variant, rng: &mut impl Rng) -> EnemyKind {
    let roll = rng.gen_range(1..=variant.type_roll_max());
    variant.kind_for_roll(roll)
}

pub fn spawn_enemies(state: &GameState, rng: &mut impl Rng) -> GameState {
    if rng.gen::<f64>() >= spawn_probability(state.score) {
        return state.clone();
    }
    let kind = roll_enemy_kind(state.variant, rng);
    let mut enemies = state.enemies.clone();
    enemies.push(Enemy::spawn(kind, rng));
    GameState {
        enemies,
        ..state.clone()
    }
}

// ── Player bullets ↔ enemies ─────────────────────────────────────────────────

/// Move every player bullet up and resolve hits.
///
/// A bullet is spent on the first live enemy it overlaps (list order).  An
/// enemy brought to zero HP pays its reward and is removed; a carrier also
/// releases two gunships centred 50px either side of its own centre.  The
/// released gunships join the live list at once and can absorb later bullets
/// from the same pass.
pub fn update_player_bullets(state: &GameState, rng: &mut impl Rng) -> GameState {
    let mut enemies = state.enemies.clone();
    let mut score = state.score;
    let mut player_bullets = Vec::with_capacity(state.player_bullets.len());

    for bullet in &state.player_bullets {
        let moved = Bullet {
            y: bullet.y - bullet.speed,
            ..bullet.clone()
        };
        let rect = moved.rect();
        if rect.bottom() < 0 {
            continue;
        }

        let Some(hit) = enemies.iter().position(|e| rect.intersects(&e.rect)) else {
            player_bullets.push(moved);
            continue;
        };

        enemies[hit].hp -= 1;
        if enemies[hit].hp <= 0 {
            let dead = enemies.remove(hit);
            let stats = dead.kind.stats();
            score += stats.reward;
            tracing::debug!(kind = %dead.kind.tag(), reward = stats.reward, "enemy destroyed");
            if stats.splits_on_death {
                let (cx, cy) = dead.rect.center();
                for offset in [-SPLIT_OFFSET, SPLIT_OFFSET] {
                    let mut escort = Enemy::spawn(EnemyKind::Gunship, rng);
                    escort.rect.set_center(cx + offset, cy);
                    enemies.push(escort);
                }
            }
        }
    }

    GameState {
        enemies,
        player_bullets,
        score,
        ..state.clone()
    }
}

// ── Enemies ──────────────────────────────────────────────────────────────────

/// Screen-space angle in degrees from one point to another.
fn aim_degrees(from: (i32, i32), to: (i32, i32)) -> f32 {
    let dx = (to.0 - from.0) as f32;
    let dy = (to.1 - from.1) as f32;
    dy.atan2(dx).to_degrees()
}

/// Drop every enemy by a fixed step, let gunships fire, and resolve contact
/// with the player.  An enemy that touches the player deals its contact
/// damage once and is removed without paying a reward.
pub fn update_enemies(state: &GameState, dt: f32) -> GameState {
    let mut player = state.player.clone();
    let mut enemy_bullets = state.enemy_bullets.clone();
    let mut enemies = Vec::with_capacity(state.enemies.len());

    for enemy in &state.enemies {
        let mut enemy = enemy.clone();
        enemy.rect.y += ENEMY_FALL_SPEED;

        let stats = enemy.kind.stats();
        if stats.fires_spread {
            enemy.shoot_timer += dt;
            if enemy.shoot_timer >= ENEMY_SHOT_INTERVAL {
                let base = aim_degrees(enemy.rect.center(), player.rect.center());
                for offset in SPREAD_OFFSETS {
                    enemy_bullets.push(Bullet::centered(
                        enemy.rect.center_x(),
                        enemy.rect.bottom(),
                        base + offset,
                        BulletOwner::Enemy,
                    ));
                }
                enemy.shoot_timer = 0.0;
            }
        }

        if player.rect.intersects(&enemy.rect) {
            player.hp -= stats.contact_damage;
            tracing::debug!(kind = %enemy.kind.tag(), hp = player.hp, "player rammed");
            continue;
        }
        if state.cull_offscreen && enemy.rect.top() >= HEIGHT {
            continue;
        }
        enemies.push(enemy);
    }

    GameState {
        player,
        enemies,
        enemy_bullets,
        ..state.clone()
    }
}

// ── Enemy bullets ↔ player ───────────────────────────────────────────────────

/// Advance enemy bullets along their headings.  A bullet touching the player
/// costs 1 HP and is removed; otherwise it is removed once its box no longer
/// overlaps the viewport.
pub fn update_enemy_bullets(state: &GameState) -> GameState {
    let screen = viewport();
    let mut player = state.player.clone();
    let mut enemy_bullets = Vec::with_capacity(state.enemy_bullets.len());

    for bullet in &state.enemy_bullets {
        let moved = bullet.advanced();
        let rect = moved.rect();
        if rect.intersects(&player.rect) {
            player.hp -= 1;
        } else if screen.intersects(&rect) {
            enemy_bullets.push(moved);
        }
    }

    GameState {
        player,
        enemy_bullets,
        ..state.clone()
    }
}

// ── Status ───────────────────────────────────────────────────────────────────

pub fn check_game_over(state: &GameState) -> GameState {
    if state.player.hp > 0 {
        return state.clone();
    }
    GameState {
        status: GameStatus::GameOver,
        ..state.clone()
    }
}

// ── Per-frame tick (nearly pure — RNG is injected) ──────────────────────────

/// Advance the simulation by one frame.  All randomness comes through `rng`
/// so callers control determinism (tests use a seeded RNG).
///
/// Passes run in a fixed order: movement, auto-fire, spawning, player
/// bullets, enemies, enemy bullets, then the game-over check.
pub fn tick(
    state: &GameState,
    controls: Controls,
    clock: FrameClock,
    rng: &mut impl Rng,
) -> GameState {
    if state.status != GameStatus::Playing {
        return state.clone();
    }

    let state = GameState {
        frame: state.frame + 1,
        ..move_player(state, controls, clock.dt)
    };
    let state = auto_fire(&state, clock.elapsed_ms);
    let state = spawn_enemies(&state, rng);
    let state = update_player_bullets(&state, rng);
    let state = update_enemies(&state, clock.dt);
    let state = update_enemy_bullets(&state);
    check_game_over(&state)
}
