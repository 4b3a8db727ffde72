//! Simulation module
//!
//! All gameplay logic lives here, with no rendering or audio dependencies:
//! - One tick per frame, elapsed time given in nominal frames
//! - Session-owned seeded RNG
//! - Row-major brick iteration, insertion-ordered balls and pickups

pub mod bricks;
pub mod collision;
pub mod geometry;
pub mod powerups;
pub mod snapshot;
pub mod state;
pub mod tick;

pub use bricks::{BrickField, generate_bricks};
pub use collision::{BallLoss, BrickHit, detonate};
pub use geometry::Rect;
pub use powerups::ActivePowers;
pub use snapshot::{Hud, RenderSnapshot};
pub use state::{
    Ball, Brick, BrickKind, GameEvent, GamePhase, GameState, GridPos, Paddle, Popup, PowerUp,
    PowerUpKind,
};
pub use tick::{MenuCommand, TickInput, tick};
