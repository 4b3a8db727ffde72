//! Power-up lifecycle: acquisition, timed decay and expiry reversal

use std::collections::BTreeMap;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::state::{Ball, GameState, PowerUpKind};
use crate::config::GameConfig;
use crate::mirror_x;

/// Active power-up kinds and their remaining duration in seconds.
/// At most one entry per kind.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ActivePowers {
    remaining: BTreeMap<PowerUpKind, f32>,
}

impl ActivePowers {
    /// (Re)start a kind's timer; never stacks
    pub fn refresh(&mut self, kind: PowerUpKind, duration: f32) {
        self.remaining.insert(kind, duration);
    }

    pub fn is_active(&self, kind: PowerUpKind) -> bool {
        self.remaining.contains_key(&kind)
    }

    pub fn remaining(&self, kind: PowerUpKind) -> Option<f32> {
        self.remaining.get(&kind).copied()
    }

    /// Count every timer down by `seconds`; expired kinds are removed and returned
    pub fn decay(&mut self, seconds: f32) -> Vec<PowerUpKind> {
        let mut expired = Vec::new();
        for (kind, left) in self.remaining.iter_mut() {
            *left -= seconds;
            if *left <= 0.0 {
                expired.push(*kind);
            }
        }
        for kind in &expired {
            self.remaining.remove(kind);
        }
        expired
    }

    pub fn iter(&self) -> impl Iterator<Item = (PowerUpKind, f32)> + '_ {
        self.remaining.iter().map(|(k, v)| (*k, *v))
    }

    pub fn len(&self) -> usize {
        self.remaining.len()
    }

    pub fn is_empty(&self) -> bool {
        self.remaining.is_empty()
    }

    pub fn clear(&mut self) {
        self.remaining.clear();
    }

    /// Left/right input is swapped
    pub fn controls_reversed(&self) -> bool {
        self.is_active(PowerUpKind::Reverse)
    }

    /// Balls stick to the paddle on contact
    pub fn sticky(&self) -> bool {
        self.is_active(PowerUpKind::Sticky)
    }
}

/// Full timer for a kind (REVERSE is shorter than the rest)
pub fn full_duration(kind: PowerUpKind, config: &GameConfig) -> f32 {
    match kind {
        PowerUpKind::Reverse => config.reverse_duration,
        _ => config.power_duration,
    }
}

/// Apply a collected power-up and refresh its timer
pub fn apply_power(state: &mut GameState, kind: PowerUpKind) {
    let was_active = state.powers.is_active(kind);
    let duration = full_duration(kind, &state.config);
    state.powers.refresh(kind, duration);

    match kind {
        PowerUpKind::Expand => {
            // Always derived from the base width so refreshes cannot compound
            let width = (state.paddle.base_width * state.config.expand_factor)
                .min(state.config.paddle_max_width);
            state.paddle.set_width(width, state.config.screen_width);
        }
        PowerUpKind::Multi => spawn_multi_balls(state),
        PowerUpKind::Slow => {
            if !was_active {
                let factor = state.config.slow_factor;
                for ball in &mut state.balls {
                    ball.vel *= factor;
                }
            }
        }
        PowerUpKind::Life => state.lives += 1,
        PowerUpKind::Sticky | PowerUpKind::Reverse => {}
    }

    log::debug!(
        "Power-up {} applied ({:.1}s{})",
        kind.as_str(),
        duration,
        if was_active { ", refreshed" } else { "" }
    );
}

/// Undo a kind's persistent side effect
pub fn expire_power(state: &mut GameState, kind: PowerUpKind) {
    match kind {
        PowerUpKind::Expand => {
            let base = state.paddle.base_width;
            state.paddle.set_width(base, state.config.screen_width);
        }
        PowerUpKind::Slow => {
            let inverse = 1.0 / state.config.slow_factor;
            for ball in &mut state.balls {
                ball.vel *= inverse;
            }
        }
        // Extra MULTI balls stay in play
        PowerUpKind::Multi | PowerUpKind::Life | PowerUpKind::Sticky | PowerUpKind::Reverse => {}
    }
    log::debug!("Power-up {} expired", kind.as_str());
}

/// Count active timers down by `seconds` of wall-clock time and reverse
/// whatever expired
pub fn advance_powers(state: &mut GameState, seconds: f32) {
    for kind in state.powers.decay(seconds) {
        expire_power(state, kind);
    }
}

/// Two mirrored clones per live ball
fn spawn_multi_balls(state: &mut GameState) {
    let base = state.config.base_ball_speed;
    // Resting parents get a launch speed, slowed like any launch while SLOW runs
    let rest_scale = if state.powers.is_active(PowerUpKind::Slow) {
        state.config.slow_factor
    } else {
        1.0
    };
    let parents: Vec<(Vec2, Vec2, f32)> = state
        .balls
        .iter()
        .map(|b| (b.pos, b.vel, b.radius))
        .collect();

    for (pos, vel, radius) in parents {
        let vx = if vel.x != 0.0 { vel.x } else { base * rest_scale };
        let vy = if vel.y != 0.0 { vel.y } else { -base * rest_scale };
        let right = Vec2::new(vx, vy);

        for clone_vel in [right, mirror_x(right)] {
            let id = state.next_entity_id();
            state.balls.push(Ball::new_free(id, pos, clone_vel, radius));
        }
    }
}
