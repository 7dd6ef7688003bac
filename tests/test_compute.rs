use flying_shooter::compute::*;
use flying_shooter::constants::{HEIGHT, WIDTH};
use flying_shooter::entities::*;

use rand::rngs::StdRng;
use rand::SeedableRng;

const DT: f32 = 1.0 / 60.0;

fn make_state() -> GameState {
    init_state(Variant::Classic)
}

fn seeded_rng() -> StdRng {
    StdRng::seed_from_u64(42)
}

fn held(up: bool, down: bool, left: bool, right: bool) -> Controls {
    Controls {
        up,
        down,
        left,
        right,
    }
}

fn player_bullet_at(cx: i32, cy: i32) -> Bullet {
    Bullet::centered(cx, cy, -90.0, BulletOwner::Player)
}

fn enemy_bullet(x: f32, y: f32, angle_deg: f32) -> Bullet {
    Bullet {
        x,
        y,
        angle: angle_deg.to_radians(),
        speed: 8.0,
        owner: BulletOwner::Enemy,
    }
}

// ── init_state / restart_state ────────────────────────────────────────────────

#[test]
fn init_state_player_at_spawn() {
    let s = make_state();
    assert_eq!(s.player.rect, Rect::new(615, 570, 50, 100));
    assert_eq!(s.player.rect.center(), (640, 620));
    assert_eq!(s.player.hp, 3);
    assert_eq!(s.player.speed, 8);
}

#[test]
fn init_state_empty_collections() {
    let s = make_state();
    assert!(s.enemies.is_empty());
    assert!(s.player_bullets.is_empty());
    assert!(s.enemy_bullets.is_empty());
    assert_eq!(s.score, 0);
    assert_eq!(s.frame, 0);
    assert_eq!(s.status, GameStatus::Playing);
}

#[test]
fn restart_resets_everything_but_variant() {
    let mut s = init_state(Variant::Classic);
    s.cull_offscreen = true;
    s.player.hp = 0;
    s.player.rect.x = 3;
    s.player.rect.y = 12;
    s.score = 77;
    s.status = GameStatus::GameOver;
    s.enemies.push(Enemy::new(EnemyKind::Drone, 10, 10));
    s.player_bullets.push(player_bullet_at(50, 50));
    s.enemy_bullets.push(enemy_bullet(60.0, 60.0, 90.0));

    let r = restart_state(&s);
    assert_eq!(r.player.hp, 3);
    assert_eq!(r.score, 0);
    assert!(r.enemies.is_empty());
    assert!(r.player_bullets.is_empty());
    assert!(r.enemy_bullets.is_empty());
    assert_eq!(r.player.rect.center(), (640, 620));
    assert_eq!(r.status, GameStatus::Playing);
    assert_eq!(r.variant, Variant::Classic);
    assert!(r.cull_offscreen);
}

// ── move_player ──────────────────────────────────────────────────────────────

#[test]
fn move_right_one_step() {
    let s = move_player(&make_state(), held(false, false, false, true), DT);
    assert_eq!(s.player.rect.x, 623);
    assert_eq!(s.player.rect.y, 570);
}

#[test]
fn move_up_one_step() {
    let s = move_player(&make_state(), held(true, false, false, false), DT);
    assert_eq!(s.player.rect.y, 562);
    assert_eq!(s.player.rect.x, 615);
}

#[test]
fn move_step_scales_with_dt() {
    // two reference ticks worth of time → 16px
    let s = move_player(&make_state(), held(false, false, true, false), 2.0 * DT);
    assert_eq!(s.player.rect.x, 599);
}

#[test]
fn diagonal_scales_truncated_deltas() {
    // +8 on each axis, scaled by 0.7071 → 5.6568, truncated → 5
    let s = move_player(&make_state(), held(false, true, false, true), DT);
    assert_eq!(s.player.rect.x, 620);
    assert_eq!(s.player.rect.y, 575);
}

#[test]
fn opposite_keys_cancel_without_diagonal_scaling() {
    let s = move_player(&make_state(), held(true, false, true, true), DT);
    // left then right nets zero on X, so only the Y move remains
    assert_eq!(s.player.rect.x, 615);
    assert_eq!(s.player.rect.y, 562);
}

#[test]
fn move_left_clamps_at_edge() {
    let mut s = make_state();
    s.player.rect.x = 3;
    let s2 = move_player(&s, held(false, false, true, false), DT);
    assert_eq!(s2.player.rect.x, 0);
    let s3 = move_player(&s2, held(false, false, true, false), DT);
    assert_eq!(s3.player.rect.x, 0);
}

#[test]
fn move_right_blocked_at_edge() {
    let mut s = make_state();
    s.player.rect.x = WIDTH - s.player.rect.w;
    let s2 = move_player(&s, held(false, false, false, true), DT);
    assert_eq!(s2.player.rect.right(), WIDTH);
}

#[test]
fn move_down_clamps_at_bottom() {
    let mut s = make_state();
    s.player.rect.y = HEIGHT - s.player.rect.h - 2;
    let s2 = move_player(&s, held(false, true, false, false), DT);
    assert_eq!(s2.player.rect.bottom(), HEIGHT);
}

#[test]
fn player_never_leaves_viewport() {
    let mut s = make_state();
    let patterns = [
        held(true, false, true, false),
        held(false, true, false, true),
        held(true, false, false, true),
        held(false, true, true, false),
        held(true, false, false, false),
        held(false, false, true, false),
    ];
    for pattern in patterns {
        for _ in 0..200 {
            s = move_player(&s, pattern, 1.7 * DT);
            let r = s.player.rect;
            assert!(r.left() >= 0 && r.right() <= WIDTH, "x out of bounds: {r:?}");
            assert!(r.top() >= 0 && r.bottom() <= HEIGHT, "y out of bounds: {r:?}");
        }
    }
}

#[test]
fn move_does_not_mutate_original() {
    let s = make_state();
    let _ = move_player(&s, held(true, true, true, true), DT);
    assert_eq!(s.player.rect.x, 615);
}

// ── auto_fire ────────────────────────────────────────────────────────────────

#[test]
fn auto_fire_on_modulus_tick() {
    let s = auto_fire(&make_state(), 30);
    assert_eq!(s.player_bullets.len(), 1);
    let b = &s.player_bullets[0];
    assert_eq!(b.owner, BulletOwner::Player);
    // centred on the player's nose
    assert_eq!(b.rect(), Rect::new(636, 566, 8, 8));
}

#[test]
fn auto_fire_skips_other_ticks() {
    let s = make_state();
    for ms in [1, 14, 16, 29, 31] {
        assert!(auto_fire(&s, ms).player_bullets.is_empty(), "fired at {ms}ms");
    }
}

// ── spawning ─────────────────────────────────────────────────────────────────

#[test]
fn spawn_probability_base_and_ramp() {
    assert_eq!(spawn_probability(0), 0.02);
    assert!((spawn_probability(100) - 0.03).abs() < 1e-12);
    let mut last = 0.0;
    for score in (0..20_000).step_by(250) {
        let p = spawn_probability(score);
        assert!(p >= last);
        last = p;
    }
}

#[test]
fn spawn_always_happens_past_probability_one() {
    let mut s = make_state();
    s.score = 10_000;
    let mut rng = seeded_rng();
    for _ in 0..50 {
        s = spawn_enemies(&s, &mut rng);
    }
    assert_eq!(s.enemies.len(), 50);
}

#[test]
fn spawned_enemy_starts_above_screen() {
    let mut s = make_state();
    s.score = 10_000;
    let mut rng = seeded_rng();
    for _ in 0..100 {
        s = spawn_enemies(&s, &mut rng);
    }
    for e in &s.enemies {
        assert!(e.rect.x >= 50 && e.rect.x <= WIDTH - 50);
        assert_eq!(e.rect.y, -e.rect.h);
        assert_eq!(e.hp, e.kind.stats().max_hp);
    }
}

#[test]
fn localized_never_rolls_carriers() {
    let mut rng = seeded_rng();
    let kinds: Vec<_> = (0..2000)
        .map(|_| roll_enemy_kind(Variant::Localized, &mut rng))
        .collect();
    assert!(!kinds.contains(&EnemyKind::Carrier));
    assert!(kinds.contains(&EnemyKind::Gunship));
    assert!(kinds.contains(&EnemyKind::Drone));
}

#[test]
fn classic_rolls_all_kinds() {
    let mut rng = seeded_rng();
    let kinds: Vec<_> = (0..2000)
        .map(|_| roll_enemy_kind(Variant::Classic, &mut rng))
        .collect();
    let carriers = kinds.iter().filter(|k| **k == EnemyKind::Carrier).count();
    let drones = kinds.iter().filter(|k| **k == EnemyKind::Drone).count();
    // 10% / 60% nominal
    assert!((120..=280).contains(&carriers), "carriers = {carriers}");
    assert!((1050..=1350).contains(&drones), "drones = {drones}");
}

// ── player bullets ───────────────────────────────────────────────────────────

#[test]
fn player_bullet_moves_up() {
    let mut s = make_state();
    s.player_bullets.push(player_bullet_at(100, 300));
    let s2 = update_player_bullets(&s, &mut seeded_rng());
    assert_eq!(s2.player_bullets.len(), 1);
    assert_eq!(s2.player_bullets[0].rect(), Rect::new(96, 288, 8, 8));
}

#[test]
fn player_bullet_removed_above_top() {
    let mut s = make_state();
    let mut gone = player_bullet_at(100, 0);
    gone.y = -1.0; // bottom at -1 after the move
    let mut kept = player_bullet_at(200, 0);
    kept.y = 0.0; // bottom exactly at 0 after the move
    s.player_bullets.push(gone);
    s.player_bullets.push(kept);
    let s2 = update_player_bullets(&s, &mut seeded_rng());
    assert_eq!(s2.player_bullets.len(), 1);
    assert_eq!(s2.player_bullets[0].rect().x, 196);
}

#[test]
fn drone_killed_by_one_hit() {
    let mut s = make_state();
    s.enemies.push(Enemy::new(EnemyKind::Drone, 100, 100));
    s.player_bullets.push(player_bullet_at(120, 180));
    let s2 = update_player_bullets(&s, &mut seeded_rng());
    assert!(s2.enemies.is_empty());
    assert!(s2.player_bullets.is_empty());
    assert_eq!(s2.score, 1);
}

#[test]
fn gunship_survives_first_hit() {
    let mut s = make_state();
    s.enemies.push(Enemy::new(EnemyKind::Gunship, 100, 100));
    s.player_bullets.push(player_bullet_at(120, 200));
    let s2 = update_player_bullets(&s, &mut seeded_rng());
    assert_eq!(s2.enemies.len(), 1);
    assert_eq!(s2.enemies[0].hp, 1);
    assert!(s2.player_bullets.is_empty());
    assert_eq!(s2.score, 0);
}

#[test]
fn gunship_killed_pays_two() {
    let mut s = make_state();
    s.enemies.push(Enemy::new(EnemyKind::Gunship, 100, 100));
    s.player_bullets.push(player_bullet_at(120, 200));
    s.player_bullets.push(player_bullet_at(130, 200));
    let s2 = update_player_bullets(&s, &mut seeded_rng());
    assert!(s2.enemies.is_empty());
    assert_eq!(s2.score, 2);
}

#[test]
fn carrier_splits_into_two_gunships() {
    let mut s = make_state();
    let mut carrier = Enemy::new(EnemyKind::Carrier, 300, 200);
    carrier.hp = 1;
    s.enemies.push(carrier);
    s.player_bullets.push(player_bullet_at(335, 310));
    let s2 = update_player_bullets(&s, &mut seeded_rng());

    assert_eq!(s2.score, 3);
    assert_eq!(s2.enemies.len(), 2);
    let centers: Vec<_> = s2.enemies.iter().map(|e| e.rect.center()).collect();
    assert_eq!(centers, vec![(285, 250), (385, 250)]);
    for e in &s2.enemies {
        assert_eq!(e.kind, EnemyKind::Gunship);
        assert_eq!(e.hp, 2);
        assert_eq!(e.shoot_timer, 0.0);
    }
}

#[test]
fn carrier_split_follows_kill_position() {
    for (x, y) in [(50, -20), (900, 400), (1200, 10)] {
        let mut s = make_state();
        let mut carrier = Enemy::new(EnemyKind::Carrier, x, y);
        carrier.hp = 1;
        let (cx, cy) = carrier.rect.center();
        s.enemies.push(carrier);
        s.player_bullets.push(player_bullet_at(cx, cy + 4));
        let s2 = update_player_bullets(&s, &mut seeded_rng());
        let centers: Vec<_> = s2.enemies.iter().map(|e| e.rect.center()).collect();
        assert_eq!(centers, vec![(cx - 50, cy), (cx + 50, cy)]);
    }
}

#[test]
fn bullet_hits_only_first_overlapping_enemy() {
    let mut s = make_state();
    s.enemies.push(Enemy::new(EnemyKind::Drone, 100, 100));
    s.enemies.push(Enemy::new(EnemyKind::Gunship, 100, 100));
    s.player_bullets.push(player_bullet_at(120, 160));
    let s2 = update_player_bullets(&s, &mut seeded_rng());
    assert_eq!(s2.enemies.len(), 1);
    assert_eq!(s2.enemies[0].kind, EnemyKind::Gunship);
    assert_eq!(s2.enemies[0].hp, 2);
    assert_eq!(s2.score, 1);
}

// ── enemies ──────────────────────────────────────────────────────────────────

#[test]
fn enemies_fall_fixed_step_regardless_of_dt() {
    for dt in [0.001, DT, 0.5] {
        let mut s = make_state();
        s.enemies.push(Enemy::new(EnemyKind::Drone, 100, 100));
        let s2 = update_enemies(&s, dt);
        assert_eq!(s2.enemies[0].rect.y, 103);
    }
}

#[test]
fn gunship_fires_aimed_spread() {
    let mut s = make_state();
    let mut gunship = Enemy::new(EnemyKind::Gunship, 100, 100);
    gunship.shoot_timer = 1.99;
    s.enemies.push(gunship);
    let s2 = update_enemies(&s, 0.02);

    assert_eq!(s2.enemy_bullets.len(), 3);
    assert_eq!(s2.enemies[0].shoot_timer, 0.0);

    // gunship after the fall: centre (130, 148), bottom 193
    let base = (620.0f32 - 148.0).atan2(640.0 - 130.0);
    let expected = [
        base - 15f32.to_radians(),
        base,
        base + 15f32.to_radians(),
    ];
    for (bullet, angle) in s2.enemy_bullets.iter().zip(expected) {
        assert_eq!(bullet.owner, BulletOwner::Enemy);
        assert_eq!(bullet.rect(), Rect::new(126, 189, 8, 8));
        assert!((bullet.angle - angle).abs() < 1e-4);
    }
}

#[test]
fn gunship_timer_accumulates_below_interval() {
    let mut s = make_state();
    s.enemies.push(Enemy::new(EnemyKind::Gunship, 100, 100));
    let s2 = update_enemies(&s, 0.5);
    let s3 = update_enemies(&s2, 0.5);
    assert!(s3.enemy_bullets.is_empty());
    assert!((s3.enemies[0].shoot_timer - 1.0).abs() < 1e-6);
}

#[test]
fn drones_and_carriers_never_fire() {
    let mut s = make_state();
    s.enemies.push(Enemy::new(EnemyKind::Drone, 100, 100));
    s.enemies.push(Enemy::new(EnemyKind::Carrier, 300, 100));
    for _ in 0..300 {
        s = update_enemies(&s, DT);
    }
    assert!(s.enemy_bullets.is_empty());
}

#[test]
fn drone_contact_costs_one_hp() {
    let mut s = make_state();
    s.enemies.push(Enemy::new(EnemyKind::Drone, 620, 500));
    let s2 = update_enemies(&s, DT);
    assert_eq!(s2.player.hp, 2);
    assert!(s2.enemies.is_empty());
    assert_eq!(s2.score, 0);
}

#[test]
fn gunship_contact_costs_two_hp() {
    let mut s = make_state();
    s.enemies.push(Enemy::new(EnemyKind::Gunship, 620, 500));
    let s2 = update_enemies(&s, DT);
    assert_eq!(s2.player.hp, 1);
    assert!(s2.enemies.is_empty());
}

#[test]
fn carrier_contact_costs_two_hp() {
    let mut s = make_state();
    s.enemies.push(Enemy::new(EnemyKind::Carrier, 620, 500));
    let s2 = update_enemies(&s, DT);
    assert_eq!(s2.player.hp, 1);
    assert!(s2.enemies.is_empty());
}

#[test]
fn offscreen_enemies_linger_by_default() {
    let mut s = make_state();
    s.enemies.push(Enemy::new(EnemyKind::Drone, 100, 800));
    let s2 = update_enemies(&s, DT);
    assert_eq!(s2.enemies.len(), 1);
    assert_eq!(s2.enemies[0].rect.y, 803);
}

#[test]
fn offscreen_enemies_culled_when_enabled() {
    let mut s = make_state();
    s.cull_offscreen = true;
    s.enemies.push(Enemy::new(EnemyKind::Drone, 100, 800));
    s.enemies.push(Enemy::new(EnemyKind::Drone, 300, 600));
    let s2 = update_enemies(&s, DT);
    assert_eq!(s2.enemies.len(), 1);
    assert_eq!(s2.enemies[0].rect.x, 300);
}

// ── enemy bullets ────────────────────────────────────────────────────────────

#[test]
fn enemy_bullet_outside_viewport_removed() {
    let mut s = make_state();
    s.enemy_bullets.push(enemy_bullet(100.0, -10.0, 0.0));
    s.enemy_bullets.push(enemy_bullet(100.0, 5.0, 0.0));
    let s2 = update_enemy_bullets(&s);
    assert_eq!(s2.enemy_bullets.len(), 1);
    assert_eq!(s2.enemy_bullets[0].rect(), Rect::new(108, 5, 8, 8));
}

#[test]
fn enemy_bullet_follows_heading() {
    let mut s = make_state();
    s.enemy_bullets.push(enemy_bullet(100.0, 100.0, 90.0));
    let s2 = update_enemy_bullets(&s);
    assert_eq!(s2.enemy_bullets[0].rect(), Rect::new(100, 108, 8, 8));
}

#[test]
fn enemy_bullet_hits_player() {
    let mut s = make_state();
    s.enemy_bullets.push(enemy_bullet(630.0, 600.0, 0.0));
    let s2 = update_enemy_bullets(&s);
    assert_eq!(s2.player.hp, 2);
    assert!(s2.enemy_bullets.is_empty());
}

// ── game over & tick ─────────────────────────────────────────────────────────

#[test]
fn game_over_at_zero_hp() {
    let mut s = make_state();
    s.player.hp = 0;
    assert_eq!(check_game_over(&s).status, GameStatus::GameOver);
    s.player.hp = -1;
    assert_eq!(check_game_over(&s).status, GameStatus::GameOver);
    s.player.hp = 1;
    assert_eq!(check_game_over(&s).status, GameStatus::Playing);
}

#[test]
fn tick_increments_frame() {
    let mut s = make_state();
    s.frame = 5;
    let clock = FrameClock { dt: DT, elapsed_ms: 1 };
    let s2 = tick(&s, Controls::default(), clock, &mut seeded_rng());
    assert_eq!(s2.frame, 6);
}

#[test]
fn tick_contact_ends_game_same_tick() {
    let mut s = make_state();
    s.player.hp = 1;
    s.enemies.push(Enemy::new(EnemyKind::Drone, 620, 500));
    let clock = FrameClock { dt: DT, elapsed_ms: 1 };
    let s2 = tick(&s, Controls::default(), clock, &mut seeded_rng());
    assert_eq!(s2.player.hp, 0);
    assert_eq!(s2.status, GameStatus::GameOver);
}

#[test]
fn tick_is_inert_after_game_over() {
    let mut s = make_state();
    s.status = GameStatus::GameOver;
    s.enemies.push(Enemy::new(EnemyKind::Drone, 100, 100));
    let clock = FrameClock { dt: DT, elapsed_ms: 30 };
    let s2 = tick(&s, held(true, false, false, false), clock, &mut seeded_rng());
    assert_eq!(s2.frame, 0);
    assert_eq!(s2.enemies[0].rect.y, 100);
    assert!(s2.player_bullets.is_empty());
}

#[test]
fn tick_fires_and_moves_bullet_same_frame() {
    let s = make_state();
    let clock = FrameClock { dt: DT, elapsed_ms: 45 };
    let s2 = tick(&s, Controls::default(), clock, &mut seeded_rng());
    assert_eq!(s2.player_bullets.len(), 1);
    // spawned at y=566, moved up 8 in the bullet pass
    assert_eq!(s2.player_bullets[0].rect().y, 558);
}

#[test]
fn score_never_decreases() {
    let mut s = make_state();
    s.player.hp = 1_000;
    let mut rng = seeded_rng();
    let mut last = 0;
    for frame in 0..3_000u64 {
        let clock = FrameClock {
            dt: DT,
            elapsed_ms: frame * 16,
        };
        let controls = held(false, false, frame % 240 < 120, frame % 240 >= 120);
        s = tick(&s, controls, clock, &mut rng);
        assert!(s.score >= last);
        last = s.score;
    }
    assert!(s.frame > 0);
}
