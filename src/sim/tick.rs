//! Fixed cadence simulation tick
//!
//! One call advances the session by one frame: menu/popup intents are
//! applied first, then (while playing) paddle movement, ball motion,
//! collisions, ball loss, power-up decay and the level-clear check.

use glam::Vec2;
use rand::Rng;

use super::collision::{BallLoss, collect_pickups, remove_lost_balls, resolve_balls};
use super::powerups::advance_powers;
use super::state::{GameEvent, GamePhase, GameState, Popup, PowerUpKind};
use crate::ticks_to_seconds;

/// Menu and popup navigation intents
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuCommand {
    /// Menu: begin playing the current level
    Start,
    Instructions,
    Settings,
    /// Instructions/settings: return to the menu
    Back,
    /// Settings: flip the sound flag
    ToggleSound,
    /// Level popup: advance one level
    NextLevel,
    /// Level popup: replay the cleared level
    RepeatLevel,
    /// Level popup: go back one level (never below 1)
    PreviousLevel,
    /// Popups and game over: level 1, zero score, starting lives
    Restart,
    Exit,
}

/// Input intents for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Paddle direction: -1 left, 0 still, +1 right (before REVERSE is applied)
    pub direction: i8,
    /// Launch every stuck ball
    pub launch: bool,
    /// Pause toggle
    pub pause: bool,
    /// Menu or popup navigation
    pub command: Option<MenuCommand>,
    /// Demo mode: the tick steers and launches on its own
    pub autopilot: bool,
}

/// Advance the game state by `dt` elapsed ticks (1.0 = one nominal frame)
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    state.events.clear();

    if let Some(command) = input.command {
        handle_command(state, command);
    }

    // Handle pause toggle
    if input.pause {
        match state.phase {
            GamePhase::Playing => {
                set_phase(state, GamePhase::Paused);
                return;
            }
            GamePhase::Paused => set_phase(state, GamePhase::Playing),
            _ => {}
        }
    }

    // Menus, pause and popups freeze the simulation
    if state.phase != GamePhase::Playing {
        return;
    }

    let mut input = input.clone();
    if input.autopilot {
        autopilot(state, &mut input);
    }

    if input.launch {
        launch_stuck_balls(state);
    }

    state.time_ticks += 1;

    // Paddle
    let mut direction = f32::from(input.direction.signum());
    if state.powers.controls_reversed() {
        direction = -direction;
    }
    if direction != 0.0 {
        state.paddle.move_by(direction, state.config.screen_width);
    }

    // Entities
    let screen_width = state.config.screen_width;
    let trail_length = state.config.trail_length;
    for ball in &mut state.balls {
        if ball.stuck {
            ball.anchor_to(&state.paddle);
        } else {
            ball.integrate(dt, screen_width, trail_length);
        }
    }
    let fall_speed = state.config.powerup_fall_speed;
    for pickup in &mut state.powerups {
        pickup.fall(dt, fall_speed);
    }

    // Collisions
    resolve_balls(state);
    collect_pickups(state);

    match remove_lost_balls(state) {
        BallLoss::OutOfLives => {
            game_over(state);
            return;
        }
        BallLoss::LifeLost => log::debug!("Ball lost, {} lives left", state.lives),
        BallLoss::None => {}
    }

    let seconds = ticks_to_seconds(dt, state.config.fps);
    advance_powers(state, seconds);

    if state.bricks.is_empty() {
        level_cleared(state);
    }
}

fn set_phase(state: &mut GameState, phase: GamePhase) {
    if state.phase != phase {
        log::debug!("Phase {:?} -> {:?}", state.phase, phase);
        state.phase = phase;
    }
}

/// Apply a navigation intent; intents that do not belong to the current
/// phase are ignored
fn handle_command(state: &mut GameState, command: MenuCommand) {
    use GamePhase as P;
    use MenuCommand as C;

    match (state.phase, command) {
        (_, C::Exit) => {
            log::info!("Exit requested");
            state.exit_requested = true;
        }
        (P::Menu, C::Start) => {
            state.begin_level();
            set_phase(state, P::Playing);
        }
        (P::Menu, C::Instructions) => set_phase(state, P::Instructions),
        (P::Menu, C::Settings) => set_phase(state, P::Settings),
        (P::Instructions | P::Settings, C::Back) => set_phase(state, P::Menu),
        (P::Settings, C::ToggleSound) => {
            state.sound_on = !state.sound_on;
            log::info!("Sound {}", if state.sound_on { "on" } else { "off" });
        }
        (P::LevelPopup, C::NextLevel) => {
            if state.level < state.config.max_level {
                state.level += 1;
            }
            enter_level(state);
        }
        (P::LevelPopup, C::RepeatLevel) => enter_level(state),
        (P::LevelPopup, C::PreviousLevel) => {
            if state.level > 1 {
                state.level -= 1;
            }
            enter_level(state);
        }
        (P::LevelPopup | P::MaxPopup | P::GameOver, C::Restart) => {
            state.restart();
            set_phase(state, P::Playing);
        }
        (phase, command) => log::trace!("Ignoring {:?} in {:?}", command, phase),
    }
}

/// Regenerate the current level and resume play
fn enter_level(state: &mut GameState) {
    state.begin_level();
    set_phase(state, GamePhase::Playing);
}

/// Release every stuck ball upward with one of four horizontal speeds
fn launch_stuck_balls(state: &mut GameState) {
    let v = state.config.base_ball_speed;
    let choices = [-v, -(v - 1.0), v - 1.0, v];
    // Keep launches on the slowed scale so SLOW expiry restores base speed
    let scale = if state.powers.is_active(PowerUpKind::Slow) {
        state.config.slow_factor
    } else {
        1.0
    };

    for i in 0..state.balls.len() {
        if !state.balls[i].stuck {
            continue;
        }
        let vx = choices[state.rng.random_range(0..choices.len())];
        state.balls[i].launch(Vec2::new(vx, -v) * scale);
    }
}

fn game_over(state: &mut GameState) {
    state.popup = Some(Popup::new("Game Over").with_subtitle(format!("Score: {}", state.score)));
    set_phase(state, GamePhase::GameOver);
    state.emit(GameEvent::GameOver);
    log::info!(
        "Game over on level {} with score {}",
        state.level,
        state.score
    );
}

fn level_cleared(state: &mut GameState) {
    let level = state.level;
    if level < state.config.max_level {
        if level > state.best_level {
            state.best_level = level;
        }
        state.popup = Some(Popup::new(format!("Level {level} Cleared!")));
        set_phase(state, GamePhase::LevelPopup);
    } else {
        state.popup = Some(
            Popup::new(format!(
                "You've reached the Max Level ({})!",
                state.config.max_level
            ))
            .with_subtitle(format!("Best Level: {}", state.best_level)),
        );
        set_phase(state, GamePhase::MaxPopup);
    }
    state.emit(GameEvent::LevelCleared { level });
    log::info!("Level {} cleared, score {}", level, state.score);
}

/// Demo mode: launch, then chase the ball that will land first, or the
/// nearest pickup when nothing is coming down
fn autopilot(state: &GameState, input: &mut TickInput) {
    if state.balls.iter().any(|b| b.stuck) {
        input.launch = true;
    }

    let paddle_top = state.paddle.y;
    let width = state.config.screen_width;
    let center = state.paddle.center_x();

    let incoming = state
        .balls
        .iter()
        .filter(|b| !b.stuck && b.vel.y > 0.0)
        .map(|b| {
            let time = ((paddle_top - b.radius - b.pos.y) / b.vel.y).max(0.0);
            (time, landing_x(b.pos.x + b.vel.x * time, b.radius, width))
        })
        .min_by(|a, b| a.0.total_cmp(&b.0));

    let target = match incoming {
        Some((_, x)) => Some(x),
        None => state
            .powerups
            .iter()
            .map(|p| p.rect().center().x)
            .min_by(|a, b| (a - center).abs().total_cmp(&(b - center).abs())),
    };

    let Some(target) = target else {
        input.direction = 0;
        return;
    };

    let deadzone = state.paddle.speed.max(1.0);
    let mut direction = if target < center - deadzone {
        -1
    } else if target > center + deadzone {
        1
    } else {
        0
    };
    // The tick flips the direction under REVERSE, so pre-flip it here
    if state.powers.controls_reversed() {
        direction = -direction;
    }
    input.direction = direction;
}

/// Fold a straight-line x position back into the play area as the side walls
/// would
fn landing_x(x: f32, radius: f32, width: f32) -> f32 {
    let span = (width - 2.0 * radius).max(1.0);
    let t = (x - radius).rem_euclid(2.0 * span);
    radius + if t > span { 2.0 * span - t } else { t }
}
