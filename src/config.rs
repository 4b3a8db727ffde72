//! Game configuration
//!
//! Every tunable the engine reads. Hosts may load overrides from JSON;
//! values that would put the initial state out of bounds are clamped.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Tunable game constants
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    // === Screen / cadence ===
    pub screen_width: f32,
    pub screen_height: f32,
    /// Nominal frames per second (converts elapsed ticks into seconds)
    pub fps: f32,

    // === Paddle ===
    pub paddle_width: f32,
    pub paddle_height: f32,
    /// Distance from the bottom of the screen to the paddle's top edge
    pub paddle_y_offset: f32,
    pub paddle_speed: f32,
    pub paddle_max_width: f32,
    pub paddle_steer: f32,

    // === Ball ===
    pub ball_radius: f32,
    pub base_ball_speed: f32,
    pub trail_length: usize,

    // === Bricks ===
    pub brick_rows_base: u32,
    /// One extra row every this many levels
    pub rows_per_level_step: u32,
    pub brick_cols: u32,
    pub brick_area_margin: f32,
    pub brick_top: f32,
    pub brick_height: f32,
    pub brick_gap: f32,
    pub max_gaps_per_row: u32,
    pub row_shuffle_chance: f64,
    pub double_hit_chance: f64,
    pub bomb_chance: f64,

    // === Power-ups ===
    pub powerup_chance: f64,
    pub powerup_size: f32,
    pub powerup_fall_speed: f32,
    pub expand_factor: f32,
    pub slow_factor: f32,
    /// Seconds
    pub power_duration: f32,
    /// Seconds
    pub reverse_duration: f32,

    // === Session ===
    pub max_level: u32,
    pub starting_lives: u32,
    pub normal_brick_score: u64,
    pub chain_brick_score: u64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            screen_width: SCREEN_WIDTH,
            screen_height: SCREEN_HEIGHT,
            fps: FPS,

            paddle_width: PADDLE_WIDTH,
            paddle_height: PADDLE_HEIGHT,
            paddle_y_offset: PADDLE_Y_OFFSET,
            paddle_speed: PADDLE_SPEED,
            paddle_max_width: PADDLE_MAX_WIDTH,
            paddle_steer: PADDLE_STEER,

            ball_radius: BALL_RADIUS,
            base_ball_speed: BASE_SPEED,
            trail_length: TRAIL_LENGTH,

            brick_rows_base: BRICK_ROWS_BASE,
            rows_per_level_step: 3,
            brick_cols: BRICK_COLS,
            brick_area_margin: BRICK_AREA_MARGIN,
            brick_top: BRICK_TOP,
            brick_height: BRICK_HEIGHT,
            brick_gap: BRICK_GAP,
            max_gaps_per_row: 3,
            row_shuffle_chance: 0.4,
            double_hit_chance: 0.12,
            bomb_chance: BOMB_BRICK_CHANCE,

            powerup_chance: POWERUP_CHANCE,
            powerup_size: POWERUP_SIZE,
            powerup_fall_speed: POWERUP_FALL_SPEED,
            expand_factor: EXPAND_FACTOR,
            slow_factor: SLOW_FACTOR,
            power_duration: POWER_DURATION,
            reverse_duration: REVERSE_DURATION,

            max_level: MAX_LEVEL,
            starting_lives: STARTING_LIVES,
            normal_brick_score: NORMAL_BRICK_SCORE,
            chain_brick_score: CHAIN_BRICK_SCORE,
        }
    }
}

impl GameConfig {
    /// Parse a (possibly partial) JSON config; missing fields keep their defaults
    pub fn from_json(json: &str) -> Result<Self> {
        let config: GameConfig =
            serde_json::from_str(json).context("failed to parse game config JSON")?;
        Ok(config.sanitized())
    }

    /// Load a JSON config file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        let config = Self::from_json(&json)
            .with_context(|| format!("invalid config file {}", path.display()))?;
        log::info!("Loaded game config from {}", path.display());
        Ok(config)
    }

    /// Serialize to pretty JSON
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("failed to serialize game config")
    }

    /// Clamp values that would make the initial state out of bounds
    pub fn sanitized(mut self) -> Self {
        let original = self.clone();

        self.fps = positive_or(self.fps, FPS);
        self.screen_width = positive_or(self.screen_width, SCREEN_WIDTH);
        self.screen_height = positive_or(self.screen_height, SCREEN_HEIGHT);

        self.paddle_width = positive_or(self.paddle_width, PADDLE_WIDTH).min(self.screen_width);
        self.paddle_height =
            positive_or(self.paddle_height, PADDLE_HEIGHT).min(self.screen_height);
        self.paddle_y_offset = self
            .paddle_y_offset
            .clamp(self.paddle_height, self.screen_height);
        self.paddle_speed = self.paddle_speed.max(0.0);
        self.paddle_max_width = self
            .paddle_max_width
            .clamp(self.paddle_width, self.screen_width);
        self.expand_factor = self.expand_factor.max(1.0);

        self.ball_radius = positive_or(self.ball_radius, BALL_RADIUS)
            .min(self.screen_width / 2.0)
            .min(self.screen_height / 2.0);
        self.base_ball_speed = positive_or(self.base_ball_speed, BASE_SPEED);
        self.trail_length = self.trail_length.max(1);

        self.brick_cols = self.brick_cols.max(1);
        self.brick_rows_base = self.brick_rows_base.max(1);
        self.rows_per_level_step = self.rows_per_level_step.max(1);
        self.brick_area_margin = self
            .brick_area_margin
            .clamp(0.0, (self.screen_width / 2.0 - 1.0).max(0.0));
        self.brick_height = positive_or(self.brick_height, BRICK_HEIGHT);
        self.brick_gap = self.brick_gap.clamp(0.0, self.brick_height * 0.5);
        self.max_gaps_per_row = self.max_gaps_per_row.min(self.brick_cols);
        self.row_shuffle_chance = probability(self.row_shuffle_chance);
        self.double_hit_chance = probability(self.double_hit_chance);
        self.bomb_chance = probability(self.bomb_chance);

        self.powerup_chance = probability(self.powerup_chance);
        self.powerup_size = positive_or(self.powerup_size, POWERUP_SIZE);
        self.powerup_fall_speed = self.powerup_fall_speed.max(0.0);
        self.slow_factor = if self.slow_factor > 0.0 && self.slow_factor <= 1.0 {
            self.slow_factor
        } else {
            SLOW_FACTOR
        };
        self.power_duration = positive_or(self.power_duration, POWER_DURATION);
        self.reverse_duration = positive_or(self.reverse_duration, REVERSE_DURATION);

        self.max_level = self.max_level.max(1);
        self.starting_lives = self.starting_lives.max(1);

        if self != original {
            log::warn!("Game config contained out-of-range values; clamped");
        }
        self
    }

    /// Width of one brick grid cell
    pub fn brick_cell_width(&self) -> f32 {
        (self.screen_width - 2.0 * self.brick_area_margin) / self.brick_cols as f32
    }

    /// Number of brick rows for a level
    pub fn rows_for_level(&self, level: u32) -> u32 {
        self.brick_rows_base + level / self.rows_per_level_step.max(1)
    }

    /// Paddle top edge
    pub fn paddle_y(&self) -> f32 {
        self.screen_height - self.paddle_y_offset
    }
}

fn positive_or(value: f32, fallback: f32) -> f32 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        fallback
    }
}

fn probability(p: f64) -> f64 {
    if p.is_nan() { 0.0 } else { p.clamp(0.0, 1.0) }
}
