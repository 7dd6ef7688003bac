/// All game entity types — pure data plus the small geometry helpers the
/// simulation needs.  No per-frame logic lives here.

use rand::Rng;

use crate::constants::{
    BULLET_SIZE, BULLET_SPEED, PLAYER_HEIGHT, PLAYER_HP, PLAYER_SPAWN, PLAYER_SPEED,
    PLAYER_WIDTH, SPAWN_MARGIN, WIDTH,
};

// ── Geometry ──────────────────────────────────────────────────────────────────

/// Axis-aligned box in world pixels, top-left anchored.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Rect { x, y, w, h }
    }

    pub fn left(&self) -> i32 {
        self.x
    }

    pub fn right(&self) -> i32 {
        self.x + self.w
    }

    pub fn top(&self) -> i32 {
        self.y
    }

    pub fn bottom(&self) -> i32 {
        self.y + self.h
    }

    pub fn center_x(&self) -> i32 {
        self.x + self.w / 2
    }

    pub fn center_y(&self) -> i32 {
        self.y + self.h / 2
    }

    pub fn center(&self) -> (i32, i32) {
        (self.center_x(), self.center_y())
    }

    pub fn set_center(&mut self, cx: i32, cy: i32) {
        self.x = cx - self.w / 2;
        self.y = cy - self.h / 2;
    }

    pub fn with_center(mut self, cx: i32, cy: i32) -> Self {
        self.set_center(cx, cy);
        self
    }

    /// Strict overlap: boxes that only share an edge do not intersect, and a
    /// zero-area box intersects nothing.
    pub fn intersects(&self, other: &Rect) -> bool {
        if self.w <= 0 || self.h <= 0 || other.w <= 0 || other.h <= 0 {
            return false;
        }
        self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }

    pub fn contains_point(&self, px: i32, py: i32) -> bool {
        px >= self.x && px < self.right() && py >= self.y && py < self.bottom()
    }
}

// ── Enemies ───────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EnemyKind {
    /// Type A: one hit, drops straight down.
    Drone,
    /// Type B: two hits, fires an aimed three-way spread every two seconds.
    Gunship,
    /// Type C: three hits, releases two gunships when destroyed.
    Carrier,
}

/// Per-kind stat table.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EnemyStats {
    pub width: i32,
    pub height: i32,
    pub max_hp: i32,
    /// HP taken from the player on contact.
    pub contact_damage: i32,
    pub reward: u32,
    pub fires_spread: bool,
    pub splits_on_death: bool,
}

impl EnemyKind {
    pub fn stats(&self) -> EnemyStats {
        match self {
            EnemyKind::Drone => EnemyStats {
                width: 50,
                height: 70,
                max_hp: 1,
                contact_damage: 1,
                reward: 1,
                fires_spread: false,
                splits_on_death: false,
            },
            EnemyKind::Gunship => EnemyStats {
                width: 60,
                height: 90,
                max_hp: 2,
                contact_damage: 2,
                reward: 2,
                fires_spread: true,
                splits_on_death: false,
            },
            EnemyKind::Carrier => EnemyStats {
                width: 70,
                height: 100,
                max_hp: 3,
                contact_damage: 2,
                reward: 3,
                fires_spread: false,
                splits_on_death: true,
            },
        }
    }

    /// Single-letter type tag used in logs.
    pub fn tag(&self) -> char {
        match self {
            EnemyKind::Drone => 'A',
            EnemyKind::Gunship => 'B',
            EnemyKind::Carrier => 'C',
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Enemy {
    pub kind: EnemyKind,
    pub rect: Rect,
    pub hp: i32,
    /// Seconds accumulated towards the next volley (gunships only).
    pub shoot_timer: f32,
}

impl Enemy {
    /// A fresh enemy of `kind` with its box at `(x, y)`.
    pub fn new(kind: EnemyKind, x: i32, y: i32) -> Self {
        let stats = kind.stats();
        Enemy {
            kind,
            rect: Rect::new(x, y, stats.width, stats.height),
            hp: stats.max_hp,
            shoot_timer: 0.0,
        }
    }

    /// Spawn just above the top edge at a random column in
    /// `[SPAWN_MARGIN, WIDTH - SPAWN_MARGIN]`.
    pub fn spawn(kind: EnemyKind, rng: &mut impl Rng) -> Self {
        let x = rng.gen_range(SPAWN_MARGIN..=WIDTH - SPAWN_MARGIN);
        Enemy::new(kind, x, -kind.stats().height)
    }
}

// ── Projectiles ───────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BulletOwner {
    Player,
    Enemy,
}

/// An 8×8 projectile.  The position is kept in sub-pixel floats so aimed
/// shots at shallow angles still drift sideways; the collision box is the
/// floor of that position.
#[derive(Clone, Debug, PartialEq)]
pub struct Bullet {
    pub x: f32,
    pub y: f32,
    /// Heading in screen space (radians, y grows downward).
    pub angle: f32,
    pub speed: f32,
    pub owner: BulletOwner,
}

impl Bullet {
    /// A bullet whose box is centred on `(cx, cy)`.
    pub fn centered(cx: i32, cy: i32, angle_deg: f32, owner: BulletOwner) -> Self {
        Bullet {
            x: (cx - BULLET_SIZE / 2) as f32,
            y: (cy - BULLET_SIZE / 2) as f32,
            angle: angle_deg.to_radians(),
            speed: BULLET_SPEED,
            owner,
        }
    }

    /// Player shots travel straight up the screen.
    pub fn player_shot(cx: i32, top: i32) -> Self {
        Bullet::centered(cx, top, -90.0, BulletOwner::Player)
    }

    pub fn rect(&self) -> Rect {
        Rect::new(
            self.x.floor() as i32,
            self.y.floor() as i32,
            BULLET_SIZE,
            BULLET_SIZE,
        )
    }

    /// Advance one tick along the stored heading.
    pub fn advanced(&self) -> Self {
        Bullet {
            x: self.x + self.angle.cos() * self.speed,
            y: self.y + self.angle.sin() * self.speed,
            ..self.clone()
        }
    }
}

// ── Player ────────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct Player {
    pub rect: Rect,
    /// Pixels per tick at the 60 Hz reference rate.
    pub speed: i32,
    pub hp: i32,
}

impl Player {
    pub fn at_spawn() -> Self {
        Player {
            rect: Rect::new(0, 0, PLAYER_WIDTH, PLAYER_HEIGHT)
                .with_center(PLAYER_SPAWN.0, PLAYER_SPAWN.1),
            speed: PLAYER_SPEED,
            hp: PLAYER_HP,
        }
    }
}

// ── Build variants ────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Variant {
    /// English build: carriers, persisted high scores, restart flow.
    Classic,
    /// Chinese build: no carriers, read-only high scores, exits after the summary.
    Localized,
}

impl Variant {
    /// Map a uniform roll to an enemy kind.  The roll range comes from
    /// [`Variant::type_roll_max`].
    pub fn kind_for_roll(&self, roll: u32) -> EnemyKind {
        match self {
            Variant::Classic => match roll {
                1 => EnemyKind::Carrier,
                2..=4 => EnemyKind::Gunship,
                _ => EnemyKind::Drone,
            },
            Variant::Localized => match roll {
                1 => EnemyKind::Gunship,
                _ => EnemyKind::Drone,
            },
        }
    }

    pub fn type_roll_max(&self) -> u32 {
        match self {
            Variant::Classic => 10,
            Variant::Localized => 4,
        }
    }

    pub fn persists_scores(&self) -> bool {
        matches!(self, Variant::Classic)
    }

    pub fn can_restart(&self) -> bool {
        matches!(self, Variant::Classic)
    }
}

// ── Master game state ─────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameStatus {
    Playing,
    GameOver,
}

/// Everything the simulation owns.  Cloneable so the per-frame passes can
/// return a new copy without mutating the original.
#[derive(Clone, Debug)]
pub struct GameState {
    pub variant: Variant,
    pub player: Player,
    pub enemies: Vec<Enemy>,
    pub player_bullets: Vec<Bullet>,
    pub enemy_bullets: Vec<Bullet>,
    pub score: u32,
    pub status: GameStatus,
    pub frame: u64,
    /// Drop enemies once they fall past the bottom edge.  Off by default:
    /// gunships below the viewport keep firing at the player.
    pub cull_offscreen: bool,
}
