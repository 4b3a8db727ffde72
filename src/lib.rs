//! Brick Breaker - arcade brick-breaking simulation engine
//!
//! Core modules:
//! - `sim`: Simulation (physics, collisions, power-ups, game state machine)
//! - `config`: Tunable game constants with JSON loading
//! - `audio`: Sound cue descriptors handed to the host's audio backend

pub mod audio;
pub mod config;
pub mod sim;

pub use audio::{AudioSink, SoundEffect};
pub use config::GameConfig;

use glam::Vec2;

/// Reference game constants (the defaults of [`GameConfig`])
pub mod consts {
    /// Nominal frame rate; one tick of elapsed time 1.0 lasts 1/FPS seconds
    pub const FPS: f32 = 60.0;

    /// Play area
    pub const SCREEN_WIDTH: f32 = 1024.0;
    pub const SCREEN_HEIGHT: f32 = 768.0;

    /// Paddle defaults
    pub const PADDLE_WIDTH: f32 = 120.0;
    pub const PADDLE_HEIGHT: f32 = 18.0;
    pub const PADDLE_Y_OFFSET: f32 = 48.0;
    /// Pixels per tick
    pub const PADDLE_SPEED: f32 = 10.0;
    pub const PADDLE_MAX_WIDTH: f32 = 400.0;
    /// Horizontal velocity added per unit of off-center impact
    pub const PADDLE_STEER: f32 = 3.0;

    /// Ball defaults
    pub const BALL_RADIUS: f32 = 9.0;
    /// Pixels per tick
    pub const BASE_SPEED: f32 = 5.0;
    pub const TRAIL_LENGTH: usize = 12;

    /// Brick grid
    pub const BRICK_ROWS_BASE: u32 = 6;
    pub const BRICK_COLS: u32 = 12;
    pub const BRICK_AREA_MARGIN: f32 = 70.0;
    pub const BRICK_TOP: f32 = 90.0;
    pub const BRICK_HEIGHT: f32 = 26.0;
    /// Gutter subtracted from each grid cell
    pub const BRICK_GAP: f32 = 6.0;
    pub const BOMB_BRICK_CHANCE: f64 = 0.15;

    /// Power-ups
    pub const POWERUP_CHANCE: f64 = 0.18;
    pub const POWERUP_SIZE: f32 = 26.0;
    /// Pixels per tick
    pub const POWERUP_FALL_SPEED: f32 = 2.6;
    pub const EXPAND_FACTOR: f32 = 1.5;
    pub const SLOW_FACTOR: f32 = 0.6;
    /// Seconds
    pub const POWER_DURATION: f32 = 12.0;
    pub const REVERSE_DURATION: f32 = 5.0;

    /// Session
    pub const MAX_LEVEL: u32 = 1000;
    pub const STARTING_LIVES: u32 = 3;
    pub const NORMAL_BRICK_SCORE: u64 = 10;
    pub const CHAIN_BRICK_SCORE: u64 = 15;
}

/// Convert elapsed ticks into seconds at the given nominal frame rate
#[inline]
pub fn ticks_to_seconds(ticks: f32, fps: f32) -> f32 {
    if fps > 0.0 { ticks / fps } else { 0.0 }
}

/// Linear steering factor (-1 at the left edge, +1 at the right) for an impact at `x` on a span centered at `center`
#[inline]
pub fn steer_offset(x: f32, center: f32, half_width: f32) -> f32 {
    if half_width <= 0.0 {
        return 0.0;
    }
    (x - center) / half_width
}

/// Mirror a velocity horizontally
#[inline]
pub fn mirror_x(vel: Vec2) -> Vec2 {
    Vec2::new(-vel.x, vel.y)
}
