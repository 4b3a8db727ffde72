//! Read-only view of the session handed to renderers after each tick

use glam::Vec2;
use serde::Serialize;

use super::geometry::Rect;
use super::powerups::full_duration;
use super::state::{BrickKind, Color, GamePhase, GameState, GridPos, Popup, PowerUpKind};

#[derive(Debug, Clone, Serialize)]
pub struct BallView {
    pub id: u32,
    pub pos: Vec2,
    pub radius: f32,
    pub stuck: bool,
    /// Newest first
    pub trail: Vec<Vec2>,
}

#[derive(Debug, Clone, Serialize)]
pub struct BrickView {
    pub pos: GridPos,
    pub rect: Rect,
    pub kind: BrickKind,
    pub hits: u8,
    pub color: Color,
}

#[derive(Debug, Clone, Serialize)]
pub struct PowerUpView {
    pub id: u32,
    pub kind: PowerUpKind,
    pub rect: Rect,
    /// Glyph drawn on the pickup
    pub icon: &'static str,
    pub color: Color,
}

/// One active power-up as the HUD shows it
#[derive(Debug, Clone, Serialize)]
pub struct ActivePowerView {
    pub kind: PowerUpKind,
    /// Seconds left
    pub remaining: f32,
    /// remaining / full duration, in 0..=1
    pub fraction: f32,
}

#[derive(Debug, Clone, Serialize)]
pub struct Hud {
    pub score: u64,
    pub lives: u32,
    pub level: u32,
    pub best_level: u32,
    pub powers: Vec<ActivePowerView>,
}

/// Everything a renderer needs for one frame
#[derive(Debug, Clone, Serialize)]
pub struct RenderSnapshot {
    pub phase: GamePhase,
    pub popup: Option<Popup>,
    pub paddle: Rect,
    pub balls: Vec<BallView>,
    pub bricks: Vec<BrickView>,
    pub powerups: Vec<PowerUpView>,
    pub hud: Hud,
    pub sound_on: bool,
}

impl GameState {
    /// Copy out the drawable state
    pub fn snapshot(&self) -> RenderSnapshot {
        let balls = self
            .balls
            .iter()
            .map(|b| BallView {
                id: b.id,
                pos: b.pos,
                radius: b.radius,
                stuck: b.stuck,
                trail: b.trail.clone(),
            })
            .collect();

        let bricks = self
            .bricks
            .iter()
            .map(|b| BrickView {
                pos: b.pos,
                rect: b.rect,
                kind: b.kind,
                hits: b.hits,
                color: b.color,
            })
            .collect();

        let powerups = self
            .powerups
            .iter()
            .map(|p| PowerUpView {
                id: p.id,
                kind: p.kind,
                rect: p.rect(),
                icon: p.kind.icon(),
                color: p.kind.color(),
            })
            .collect();

        let powers = self
            .powers
            .iter()
            .map(|(kind, remaining)| {
                let full = full_duration(kind, &self.config);
                ActivePowerView {
                    kind,
                    remaining,
                    fraction: (remaining / full).clamp(0.0, 1.0),
                }
            })
            .collect();

        RenderSnapshot {
            phase: self.phase,
            popup: self.popup.clone(),
            paddle: self.paddle.rect(),
            balls,
            bricks,
            powerups,
            hud: Hud {
                score: self.score,
                lives: self.lives,
                level: self.level,
                best_level: self.best_level,
                powers,
            },
            sound_on: self.sound_on,
        }
    }
}
