//! Per-frame simulation step
//!
//! Advances the session by one frame: phase transitions first, then player
//! movement, aiming, bullets, enemies, the win check and the level clock.

use std::f32::consts::{FRAC_PI_2, PI};

use glam::Vec2;

use super::collision::try_move;
use super::maze::generate;
use super::spawn::spawn_enemies;
use super::state::{Aim, AimMode, Bullet, GameEvent, GameState, Player, SessionPhase};
use crate::consts::*;
use crate::normalize_angle;

/// Movement keys held during a step
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MoveKeys {
    pub forward: bool,
    pub back: bool,
    pub strafe_left: bool,
    pub strafe_right: bool,
}

/// Input commands for a single step
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    pub movement: MoveKeys,
    /// Pointer motion since the previous step (pixels, captured pointer only)
    pub pointer_delta: Vec2,
    /// Latest pointer position while not captured
    pub pointer_position: Option<Vec2>,
    /// Host currently holds exclusive pointer capture
    pub pointer_locked: bool,
    /// Fire a bullet
    pub fire: bool,
    /// Begin the current level from an idle screen
    pub start: bool,
    /// Leave the level for the menu
    pub exit: bool,
    /// Pause toggle
    pub pause: bool,
    /// Reset level and score from an idle screen
    pub reset: bool,
}

/// Advance the session by one frame of `dt` seconds
///
/// Movement, bullets and enemy timers integrate at most `MAX_FRAME_DT`; the
/// level clock counts the full frame delta.
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    let frame_dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };
    let dt = frame_dt.min(MAX_FRAME_DT);

    match state.phase {
        phase if phase.is_idle() => {
            if input.start {
                start_level(state);
            } else if input.reset {
                reset_progress(state);
            }
            return;
        }
        SessionPhase::Paused => {
            if input.pause {
                state.phase = SessionPhase::Playing;
                state.events.push(GameEvent::Resumed);
                state.events.push(GameEvent::PointerCapture(true));
                log::info!("Resumed level {}", state.level);
            } else if input.exit {
                exit_to_menu(state);
            } else {
                update_aim(state, input);
            }
            return;
        }
        _ => {}
    }

    if input.pause {
        state.phase = SessionPhase::Paused;
        state.events.push(GameEvent::Paused);
        state.events.push(GameEvent::PointerCapture(false));
        log::info!("Paused level {} with {}s left", state.level, state.time_left);
        return;
    }
    if input.exit {
        exit_to_menu(state);
        return;
    }

    state.time_ticks += 1;

    move_player(state, input.movement, dt);
    update_aim(state, input);
    if input.fire {
        fire(state);
    }
    update_bullets(state, dt);
    update_enemies(state, dt);

    if level_cleared(state) {
        complete_level(state);
        return;
    }

    advance_clock(state, frame_dt);
}

/// Generate the maze for the current level, place enemies and begin play
pub fn start_level(state: &mut GameState) {
    let spec = state.config.level(state.level);
    let tuning = state.config.tuning;
    let mut rng = state.rng_state.next_rng();

    state.maze = generate(spec.maze_width, spec.maze_height, &mut rng);
    state.enemies = spawn_enemies(
        &state.maze.grid,
        state.maze.start,
        spec.enemy_count,
        tuning.enemy_min_start_distance,
        &mut rng,
    );
    state.bullets.clear();
    state.player = Player::new(state.start_point(), tuning.player_speed);
    state.time_left = spec.time_limit_secs;
    state.clock_accumulator = 0.0;
    state.aim = Aim {
        mode: AimMode::Locked,
        reticle: state.viewport.center(),
    };
    state.phase = SessionPhase::Playing;

    state.events.push(GameEvent::LevelStarted { level: state.level });
    state.events.push(GameEvent::PointerCapture(true));
    log::info!(
        "Level {}/{} started: {}x{} maze, {} enemies, {}s",
        state.level,
        state.level_count(),
        state.maze.grid.width(),
        state.maze.grid.height(),
        state.enemies.len(),
        state.time_left
    );
}

fn reset_progress(state: &mut GameState) {
    state.level = 1;
    state.score = 0;
    state.phase = SessionPhase::Menu;
    log::info!("Progress reset");
}

fn exit_to_menu(state: &mut GameState) {
    state.phase = SessionPhase::Menu;
    state.bullets.clear();
    state.events.push(GameEvent::Exited);
    state.events.push(GameEvent::PointerCapture(false));
    log::info!("Left level {} for the menu", state.level);
}

/// Walk along each held direction, resolving collisions per axis.
///
/// Each direction is split into sub-steps no longer than `MOVE_SUBSTEP` so a
/// fast player cannot pass through a wall cell.
fn move_player(state: &mut GameState, keys: MoveKeys, dt: f32) {
    let player = &mut state.player;
    let travel = player.speed * dt;
    let steps = ((travel / MOVE_SUBSTEP).ceil() as usize).max(1);
    let step = travel / steps as f32;
    let clearance = state.config.tuning.clearance;

    let directions = [
        (keys.forward, player.angle),
        (keys.back, player.angle + PI),
        (keys.strafe_left, player.angle - FRAC_PI_2),
        (keys.strafe_right, player.angle + FRAC_PI_2),
    ];

    for (held, direction) in directions {
        if !held {
            continue;
        }
        let delta = Vec2::from_angle(direction) * step;
        for _ in 0..steps {
            let result = try_move(player.pos, delta, &state.maze.grid, clearance);
            player.pos = result.pos;
            if result.moved() {
                player.last_move_angle = direction;
            }
        }
    }
}

/// Consume pointer input: turn the view and place the reticle
fn update_aim(state: &mut GameState, input: &TickInput) {
    state.aim.mode = if input.pointer_locked {
        AimMode::Locked
    } else {
        AimMode::FreeAim
    };

    if state.phase == SessionPhase::Playing {
        let turn = input.pointer_delta.x * state.config.tuning.mouse_sensitivity;
        state.player.angle = normalize_angle(state.player.angle + turn);
    }

    match state.aim.mode {
        AimMode::Locked => {
            state.aim.reticle = state.viewport.clamp(state.aim.reticle + input.pointer_delta);
        }
        AimMode::FreeAim => {
            if let Some(position) = input.pointer_position {
                state.aim.reticle = state.viewport.clamp(position);
            }
        }
    }
}

/// Spawn a bullet toward the reticle
fn fire(state: &mut GameState) {
    let offset = state.aim.reticle.x / state.viewport.width - 0.5;
    let angle = state.player.angle + offset * FOV;
    let pos = state.player.pos + Vec2::from_angle(angle) * BULLET_SPAWN_OFFSET;

    state.bullets.push(Bullet {
        pos,
        angle,
        speed: state.config.tuning.bullet_speed,
    });
    state.events.push(GameEvent::Fired);
}

/// Move bullets in short sub-steps; remove those that hit a wall or an enemy.
///
/// Bullets are resolved in list order, so when two could take the same enemy
/// in one step the earlier bullet wins. Removal happens after the pass.
fn update_bullets(state: &mut GameState, dt: f32) {
    let mut spent = vec![false; state.bullets.len()];

    for (i, bullet) in state.bullets.iter_mut().enumerate() {
        let travel = bullet.speed * dt;
        let steps = ((travel / BULLET_SUBSTEP).ceil() as usize).max(1);
        let step = Vec2::from_angle(bullet.angle) * (travel / steps as f32);

        'flight: for _ in 0..steps {
            bullet.pos += step;
            if state.maze.grid.is_wall_at(bullet.pos) {
                spent[i] = true;
                break;
            }
            for (j, enemy) in state.enemies.iter_mut().enumerate() {
                if enemy.alive && enemy.pos.distance(bullet.pos) < BULLET_HIT_RADIUS {
                    enemy.alive = false;
                    enemy.hit_time = HIT_FLASH_DURATION;
                    state.score = state.score.saturating_add(1);
                    state.events.push(GameEvent::EnemyKilled { enemy: j });
                    log::debug!("Enemy {} down, score {}", j, state.score);
                    spent[i] = true;
                    break 'flight;
                }
            }
        }
    }

    let mut idx = 0;
    state.bullets.retain(|_| {
        let keep = !spent[idx];
        idx += 1;
        keep
    });
}

fn update_enemies(state: &mut GameState, dt: f32) {
    for enemy in &mut state.enemies {
        if enemy.alive {
            enemy.time += dt;
        }
        enemy.hit_time = (enemy.hit_time - dt).max(0.0);
    }
}

fn level_cleared(state: &GameState) -> bool {
    state.enemies.iter().all(|e| !e.alive)
        && state.player.pos.distance(state.exit_point()) < EXIT_RADIUS
}

fn complete_level(state: &mut GameState) {
    let finished = state.level;
    state.bullets.clear();
    state.events.push(GameEvent::LevelComplete { level: finished });
    state.events.push(GameEvent::PointerCapture(false));

    if finished >= state.level_count() {
        let final_score = state.score;
        state.phase = SessionPhase::GameComplete { final_score };
        state.level = 1;
        state.score = 0;
        state.events.push(GameEvent::GameComplete { final_score });
        log::info!("Game complete, final score {}", final_score);
    } else {
        state.level += 1;
        state.phase = SessionPhase::LevelComplete;
        log::info!("Level {} complete, score {}", finished, state.score);
    }
}

/// Count down one second of `time_left` for every whole second of play
fn advance_clock(state: &mut GameState, dt: f32) {
    state.clock_accumulator += dt;
    while state.clock_accumulator >= 1.0 {
        state.clock_accumulator -= 1.0;
        state.time_left = state.time_left.saturating_sub(1);
        if state.time_left == 0 {
            state.phase = SessionPhase::TimedOut;
            state.bullets.clear();
            state.events.push(GameEvent::TimedOut);
            state.events.push(GameEvent::PointerCapture(false));
            log::info!("Level {} timed out with score {}", state.level, state.score);
            return;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use crate::sim::grid::Grid;
    use crate::sim::maze::Maze;
    use crate::sim::state::Enemy;

    const DT: f32 = 0.1;

    fn start() -> TickInput {
        TickInput {
            start: true,
            ..Default::default()
        }
    }

    /// A playing session in a straight east-west corridor with the exit at the far end
    fn corridor_state() -> GameState {
        let mut state = GameState::new(1, GameConfig::default());
        tick(&mut state, &start(), DT);
        state.maze = Maze {
            grid: Grid::from_rows(&["##########", "#........#", "##########"]),
            start: (1, 1),
            exit: (8, 1),
        };
        state.player = Player::new(Vec2::new(1.5, 1.5), PLAYER_SPEED);
        state.enemies.clear();
        state.bullets.clear();
        state.drain_events();
        state
    }

    #[test]
    fn test_start_from_menu() {
        let mut state = GameState::new(12345, GameConfig::default());
        assert_eq!(state.phase, SessionPhase::Menu);

        // Ticks without start stay on the menu
        tick(&mut state, &TickInput::default(), DT);
        assert_eq!(state.phase, SessionPhase::Menu);

        tick(&mut state, &start(), DT);
        assert_eq!(state.phase, SessionPhase::Playing);
        assert_eq!(state.enemies.len(), 3);
        assert_eq!(state.time_left, 120);
        assert_eq!(state.player.pos, Vec2::new(1.5, 1.5));
        assert_eq!(state.aim.mode, AimMode::Locked);
        let events = state.drain_events();
        assert!(events.contains(&GameEvent::LevelStarted { level: 1 }));
        assert!(events.contains(&GameEvent::PointerCapture(true)));
    }

    #[test]
    fn test_start_click_does_not_fire() {
        let mut state = GameState::new(1, GameConfig::default());
        let click = TickInput {
            start: true,
            fire: true,
            ..Default::default()
        };
        tick(&mut state, &click, DT);
        assert_eq!(state.phase, SessionPhase::Playing);
        assert!(state.bullets.is_empty());
    }

    #[test]
    fn test_pause_freezes_simulation() {
        let mut state = corridor_state();
        let pause = TickInput {
            pause: true,
            ..Default::default()
        };
        tick(&mut state, &pause, DT);
        assert_eq!(state.phase, SessionPhase::Paused);
        assert!(state.drain_events().contains(&GameEvent::PointerCapture(false)));

        let walk = TickInput {
            movement: MoveKeys {
                forward: true,
                ..Default::default()
            },
            ..Default::default()
        };
        let time_left = state.time_left;
        for _ in 0..30 {
            tick(&mut state, &walk, DT);
        }
        assert_eq!(state.player.pos, Vec2::new(1.5, 1.5));
        assert_eq!(state.time_left, time_left);

        tick(&mut state, &pause, DT);
        assert_eq!(state.phase, SessionPhase::Playing);
        assert!(state.drain_events().contains(&GameEvent::Resumed));
    }

    #[test]
    fn test_exit_keeps_score_and_level() {
        let mut state = corridor_state();
        state.score = 4;
        let exit = TickInput {
            exit: true,
            ..Default::default()
        };
        tick(&mut state, &exit, DT);
        assert_eq!(state.phase, SessionPhase::Menu);
        assert_eq!(state.score, 4);
        assert_eq!(state.level, 1);
    }

    #[test]
    fn test_reset_from_idle_screen() {
        let mut state = GameState::new(1, GameConfig::default());
        state.phase = SessionPhase::LevelComplete;
        state.level = 2;
        state.score = 3;
        let reset = TickInput {
            reset: true,
            ..Default::default()
        };
        tick(&mut state, &reset, DT);
        assert_eq!(state.phase, SessionPhase::Menu);
        assert_eq!(state.level, 1);
        assert_eq!(state.score, 0);
    }

    #[test]
    fn test_forward_movement_and_blocked_strafe() {
        let mut state = corridor_state();
        let input = TickInput {
            movement: MoveKeys {
                forward: true,
                ..Default::default()
            },
            ..Default::default()
        };
        tick(&mut state, &input, DT);
        assert!((state.player.pos.x - 1.8).abs() < 1e-5);
        assert_eq!(state.player.last_move_angle, 0.0);

        // Strafing into the corridor wall stops short of it
        let before = state.player.pos;
        let strafe = TickInput {
            movement: MoveKeys {
                strafe_left: true,
                ..Default::default()
            },
            ..Default::default()
        };
        for _ in 0..10 {
            tick(&mut state, &strafe, DT);
        }
        assert!((state.player.pos.x - before.x).abs() < 1e-4);
        assert!(state.player.pos.y >= 1.0 + PLAYER_CLEARANCE);
        assert!(state.player.pos.y < before.y);
    }

    #[test]
    fn test_large_dt_is_clamped() {
        let mut state = corridor_state();
        let input = TickInput {
            movement: MoveKeys {
                forward: true,
                ..Default::default()
            },
            ..Default::default()
        };
        tick(&mut state, &input, 5.0);
        assert!((state.player.pos.x - (1.5 + PLAYER_SPEED * MAX_FRAME_DT)).abs() < 1e-5);
    }

    #[test]
    fn test_fast_player_cannot_pass_through_wall() {
        let mut state = corridor_state();
        state.maze.grid = Grid::from_rows(&["#######", "#.#...#", "#######"]);
        state.player = Player::new(Vec2::new(1.5, 1.5), 20.0);
        let input = TickInput {
            movement: MoveKeys {
                forward: true,
                ..Default::default()
            },
            ..Default::default()
        };
        for _ in 0..5 {
            tick(&mut state, &input, DT);
        }
        assert!(state.player.pos.x <= 2.0 - PLAYER_CLEARANCE);
        assert!(state.player.pos.x > 1.5);
    }

    #[test]
    fn test_pointer_delta_turns_player_and_moves_reticle() {
        let mut state = corridor_state();
        let input = TickInput {
            pointer_delta: Vec2::new(50.0, -10.0),
            pointer_locked: true,
            ..Default::default()
        };
        tick(&mut state, &input, DT);
        assert!((state.player.angle - 50.0 * MOUSE_SENSITIVITY).abs() < 1e-6);
        assert_eq!(state.aim.reticle, state.viewport.center() + Vec2::new(50.0, -10.0));

        // Free aim places the reticle at the pointer
        let free = TickInput {
            pointer_position: Some(Vec2::new(10.0, 20.0)),
            ..Default::default()
        };
        tick(&mut state, &free, DT);
        assert_eq!(state.aim.mode, AimMode::FreeAim);
        assert_eq!(state.aim.reticle, Vec2::new(10.0, 20.0));
    }

    #[test]
    fn test_fire_follows_reticle_offset() {
        let mut state = corridor_state();
        state.aim.reticle = Vec2::new(state.viewport.width, 0.0);
        let fire_input = TickInput {
            fire: true,
            ..Default::default()
        };
        tick(&mut state, &fire_input, 0.0);
        assert_eq!(state.bullets.len(), 1);
        assert!((state.bullets[0].angle - FOV / 2.0).abs() < 1e-6);
    }

    #[test]
    fn test_bullet_kills_exactly_one_enemy() {
        let mut state = corridor_state();
        state.enemies = vec![Enemy::new(Vec2::new(5.5, 1.5)), Enemy::new(Vec2::new(7.5, 1.5))];

        let fire_input = TickInput {
            fire: true,
            ..Default::default()
        };
        tick(&mut state, &fire_input, DT);
        for _ in 0..10 {
            tick(&mut state, &TickInput::default(), DT);
        }

        assert!(!state.enemies[0].alive);
        assert!(state.enemies[1].alive);
        assert_eq!(state.score, 1);
        assert!(state.bullets.is_empty());
        assert!(state.drain_events().contains(&GameEvent::EnemyKilled { enemy: 0 }));
    }

    #[test]
    fn test_dead_enemy_is_not_killed_again() {
        let mut state = corridor_state();
        let mut enemy = Enemy::new(Vec2::new(5.5, 1.5));
        enemy.alive = false;
        state.enemies = vec![enemy];

        let fire_input = TickInput {
            fire: true,
            ..Default::default()
        };
        tick(&mut state, &fire_input, DT);
        for _ in 0..10 {
            tick(&mut state, &TickInput::default(), DT);
        }
        assert_eq!(state.score, 0);
        assert!(state.bullets.is_empty());
    }

    #[test]
    fn test_first_bullet_in_list_takes_shared_enemy() {
        let mut state = corridor_state();
        state.enemies = vec![Enemy::new(Vec2::new(5.5, 1.5))];
        state.bullets = vec![
            Bullet {
                pos: Vec2::new(5.2, 1.5),
                angle: 0.0,
                speed: 10.0,
            },
            Bullet {
                pos: Vec2::new(5.0, 1.5),
                angle: 0.0,
                speed: 10.0,
            },
        ];

        tick(&mut state, &TickInput::default(), 0.01);

        assert_eq!(state.score, 1);
        assert_eq!(state.bullets.len(), 1);
        // The survivor is the second bullet, which found the enemy already dead
        assert!((state.bullets[0].pos.x - 5.1).abs() < 1e-4);
    }

    #[test]
    fn test_bullet_into_wall_is_removed_without_score() {
        let mut state = corridor_state();
        state.player.angle = PI;
        let fire_input = TickInput {
            fire: true,
            ..Default::default()
        };
        tick(&mut state, &fire_input, DT);
        assert!(state.bullets.is_empty());
        assert_eq!(state.score, 0);
    }

    #[test]
    fn test_hit_flash_decays_to_zero() {
        let mut state = corridor_state();
        let mut enemy = Enemy::new(Vec2::new(5.5, 1.5));
        enemy.alive = false;
        enemy.hit_time = HIT_FLASH_DURATION;
        state.enemies = vec![enemy, Enemy::new(Vec2::new(7.5, 1.5))];

        for _ in 0..5 {
            tick(&mut state, &TickInput::default(), DT);
        }
        assert_eq!(state.enemies[0].hit_time, 0.0);
        assert_eq!(state.enemies[0].time, 0.0);
        assert!((state.enemies[1].time - 0.5).abs() < 1e-5);
    }

    #[test]
    fn test_clock_ticks_once_per_second() {
        let mut state = corridor_state();
        state.enemies = vec![Enemy::new(Vec2::new(5.5, 1.5))];
        let before = state.time_left;
        for _ in 0..3 {
            tick(&mut state, &TickInput::default(), 0.25);
        }
        assert_eq!(state.time_left, before);
        tick(&mut state, &TickInput::default(), 0.25);
        assert_eq!(state.time_left, before - 1);
    }

    #[test]
    fn test_clock_counts_full_frame_time() {
        let mut state = corridor_state();
        state.enemies = vec![Enemy::new(Vec2::new(5.5, 1.5))];
        let before = state.time_left;
        for _ in 0..4 {
            tick(&mut state, &TickInput::default(), 0.5);
        }
        assert_eq!(state.time_left, before - 2);
        // Enemy animation still advances at most MAX_FRAME_DT per step
        assert!((state.enemies[0].time - 4.0 * MAX_FRAME_DT).abs() < 1e-5);

        tick(&mut state, &TickInput::default(), f32::NAN);
        assert_eq!(state.time_left, before - 2);
    }

    #[test]
    fn test_score_saturates() {
        let mut state = corridor_state();
        state.score = u32::MAX;
        state.enemies = vec![Enemy::new(Vec2::new(2.5, 1.5))];
        let fire_input = TickInput {
            fire: true,
            ..Default::default()
        };
        tick(&mut state, &fire_input, DT);
        for _ in 0..5 {
            tick(&mut state, &TickInput::default(), DT);
        }
        assert!(!state.enemies[0].alive);
        assert_eq!(state.score, u32::MAX);
    }

    #[test]
    fn test_timeout_with_enemies_left() {
        let mut state = corridor_state();
        state.enemies = vec![Enemy::new(Vec2::new(5.5, 1.5))];
        state.time_left = 2;
        for _ in 0..25 {
            tick(&mut state, &TickInput::default(), DT);
        }
        assert_eq!(state.phase, SessionPhase::TimedOut);
        assert!(state.drain_events().contains(&GameEvent::TimedOut));

        // Retrying keeps the level
        tick(&mut state, &start(), DT);
        assert_eq!(state.phase, SessionPhase::Playing);
        assert_eq!(state.level, 1);
        assert_eq!(state.time_left, 120);
    }

    #[test]
    fn test_level_complete_then_game_complete() {
        let mut state = corridor_state();
        state.score = 3;
        state.player.pos = Vec2::new(7.6, 1.5);
        tick(&mut state, &TickInput::default(), DT);
        assert_eq!(state.phase, SessionPhase::LevelComplete);
        assert_eq!(state.level, 2);
        assert_eq!(state.score, 3);

        let mut state2 = corridor_state();
        state2.level = 2;
        state2.score = 6;
        state2.player.pos = Vec2::new(7.6, 1.5);
        tick(&mut state2, &TickInput::default(), DT);
        assert_eq!(state2.phase, SessionPhase::GameComplete { final_score: 6 });
        assert_eq!(state2.level, 1);
        assert_eq!(state2.score, 0);
    }

    #[test]
    fn test_no_win_while_enemies_alive() {
        let mut state = corridor_state();
        state.enemies = vec![Enemy::new(Vec2::new(4.5, 1.5))];
        state.player.pos = Vec2::new(8.0, 1.5);
        tick(&mut state, &TickInput::default(), DT);
        assert_eq!(state.phase, SessionPhase::Playing);
    }

    #[test]
    fn test_determinism() {
        // Two states with same seed should produce identical results
        let mut state1 = GameState::new(99999, GameConfig::default());
        let mut state2 = GameState::new(99999, GameConfig::default());

        let inputs = [
            start(),
            TickInput {
                movement: MoveKeys {
                    forward: true,
                    ..Default::default()
                },
                ..Default::default()
            },
            TickInput {
                pointer_delta: Vec2::new(30.0, 0.0),
                pointer_locked: true,
                fire: true,
                ..Default::default()
            },
            TickInput::default(),
        ];

        for input in &inputs {
            tick(&mut state1, input, DT);
            tick(&mut state2, input, DT);
        }

        assert_eq!(state1.maze.grid, state2.maze.grid);
        assert_eq!(state1.time_ticks, state2.time_ticks);
        assert_eq!(state1.bullets.len(), state2.bullets.len());
        assert_eq!(state1.player.pos, state2.player.pos);
        for (a, b) in state1.enemies.iter().zip(&state2.enemies) {
            assert_eq!(a.pos, b.pos);
        }
    }
}
