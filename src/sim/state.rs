//! Game state and core simulation types
//!
//! The session owns every entity collection. Hosts read it through the
//! accessors below or a [`RenderSnapshot`](super::snapshot::RenderSnapshot);
//! mutation happens only inside [`tick`](super::tick::tick).

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::bricks::{BrickField, generate_bricks};
use super::geometry::Rect;
use super::powerups::ActivePowers;
use crate::config::GameConfig;

/// RGB color
pub type Color = [u8; 3];

/// Current phase of the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Title menu
    Menu,
    Instructions,
    Settings,
    /// Active gameplay
    Playing,
    /// Game is paused
    Paused,
    /// Level cleared, waiting for next/previous/repeat
    LevelPopup,
    /// Final level cleared, only a restart continues
    MaxPopup,
    /// Run ended
    GameOver,
}

/// Message shown by a popup phase
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Popup {
    pub message: String,
    /// Secondary line (max-level popup shows the best level here)
    pub subtitle: Option<String>,
}

impl Popup {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            subtitle: None,
        }
    }

    pub fn with_subtitle(mut self, subtitle: impl Into<String>) -> Self {
        self.subtitle = Some(subtitle.into());
        self
    }
}

/// Something the host may want to react to (sound, HUD flash)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    /// Ball bounced off (or stuck to) the paddle
    PaddleHit,
    /// Brick took a hit but survived
    BrickDamaged,
    /// Normal brick destroyed by a direct hit
    BrickDestroyed,
    /// Bomb chain reaction; `destroyed` counts every brick it removed
    BombExploded { destroyed: usize },
    PowerUpCollected(PowerUpKind),
    /// Last ball fell out of the play area
    LifeLost,
    LevelCleared { level: u32 },
    GameOver,
}

/// A ball entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ball {
    pub id: u32,
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    /// Glued to the paddle, not simulated
    pub stuck: bool,
    /// Trail history for rendering (newest first)
    #[serde(skip)]
    pub trail: Vec<Vec2>,
}

impl Ball {
    /// A fresh ball resting on the paddle
    pub fn new_stuck(id: u32, paddle: &Paddle, radius: f32) -> Self {
        let mut ball = Self {
            id,
            pos: Vec2::ZERO,
            vel: Vec2::ZERO,
            radius,
            stuck: true,
            trail: Vec::new(),
        };
        ball.anchor_to(paddle);
        ball
    }

    /// A free-flying ball
    pub fn new_free(id: u32, pos: Vec2, vel: Vec2, radius: f32) -> Self {
        Self {
            id,
            pos,
            vel,
            radius,
            stuck: false,
            trail: Vec::new(),
        }
    }

    /// Force the ball onto the paddle's top-center
    pub fn anchor_to(&mut self, paddle: &Paddle) {
        self.pos = paddle.anchor_point(self.radius);
    }

    /// Square bounding box
    pub fn bounds(&self) -> Rect {
        Rect::around_circle(self.pos, self.radius)
    }

    /// Integrate motion and reflect off the left, right and top walls.
    /// There is no bottom wall.
    pub fn integrate(&mut self, dt: f32, screen_width: f32, trail_length: usize) {
        if self.stuck {
            return;
        }
        self.pos += self.vel * dt;

        if self.pos.x - self.radius <= 0.0 {
            self.pos.x = self.radius;
            self.vel.x = -self.vel.x;
        }
        if self.pos.x + self.radius >= screen_width {
            self.pos.x = screen_width - self.radius;
            self.vel.x = -self.vel.x;
        }
        if self.pos.y - self.radius <= 0.0 {
            self.pos.y = self.radius;
            self.vel.y = -self.vel.y;
        }

        self.record_trail(trail_length);
    }

    /// Record current position to trail
    pub fn record_trail(&mut self, max_len: usize) {
        self.trail.insert(0, self.pos);
        self.trail.truncate(max_len);
    }

    /// Top edge has passed below the play area
    pub fn is_lost(&self, screen_height: f32) -> bool {
        self.pos.y - self.radius > screen_height
    }

    /// Release from the paddle with the given velocity
    pub fn launch(&mut self, vel: Vec2) {
        if self.stuck {
            self.stuck = false;
            self.vel = vel;
            self.trail.clear();
        }
    }
}

/// The player's paddle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Paddle {
    /// Left edge
    pub x: f32,
    /// Top edge
    pub y: f32,
    pub width: f32,
    pub height: f32,
    /// Pixels per tick
    pub speed: f32,
    /// Width restored when EXPAND expires
    pub base_width: f32,
}

impl Paddle {
    /// Centered paddle from config
    pub fn from_config(config: &GameConfig) -> Self {
        let width = config.paddle_width.min(config.screen_width);
        Self {
            x: ((config.screen_width - width) / 2.0).max(0.0),
            y: config.paddle_y(),
            width,
            height: config.paddle_height,
            speed: config.paddle_speed,
            base_width: width,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }

    #[inline]
    pub fn center_x(&self) -> f32 {
        self.x + self.width / 2.0
    }

    /// Where a stuck ball of `radius` rests
    pub fn anchor_point(&self, radius: f32) -> Vec2 {
        Vec2::new(self.center_x(), self.y - radius - 2.0)
    }

    /// Move by `direction * speed`, then clamp to the screen
    pub fn move_by(&mut self, direction: f32, screen_width: f32) {
        self.x += direction * self.speed;
        self.clamp_to(screen_width);
    }

    /// Resize, keeping the paddle on screen
    pub fn set_width(&mut self, width: f32, screen_width: f32) {
        self.width = width.min(screen_width);
        self.clamp_to(screen_width);
    }

    fn clamp_to(&mut self, screen_width: f32) {
        self.x = self.x.clamp(0.0, (screen_width - self.width).max(0.0));
    }
}

/// Brick types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BrickKind {
    #[default]
    Normal,
    /// Destroys grid-adjacent bricks when it goes, chaining through other bombs
    Bomb,
}

/// Grid coordinate of a brick (row-major ordering)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct GridPos {
    pub row: i32,
    pub col: i32,
}

impl GridPos {
    pub const fn new(row: i32, col: i32) -> Self {
        Self { row, col }
    }

    /// The four orthogonal neighbours (may lie outside the grid)
    pub fn neighbors(&self) -> [GridPos; 4] {
        [
            GridPos::new(self.row - 1, self.col),
            GridPos::new(self.row + 1, self.col),
            GridPos::new(self.row, self.col - 1),
            GridPos::new(self.row, self.col + 1),
        ]
    }
}

/// A brick entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Brick {
    pub pos: GridPos,
    pub rect: Rect,
    /// Remaining hits (1 or 2 when generated)
    pub hits: u8,
    pub color: Color,
    pub kind: BrickKind,
}

/// Power-up types
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum PowerUpKind {
    Expand,
    Multi,
    Slow,
    Life,
    Sticky,
    Reverse,
}

impl PowerUpKind {
    pub const ALL: [PowerUpKind; 6] = [
        PowerUpKind::Expand,
        PowerUpKind::Multi,
        PowerUpKind::Slow,
        PowerUpKind::Life,
        PowerUpKind::Sticky,
        PowerUpKind::Reverse,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PowerUpKind::Expand => "EXPAND",
            PowerUpKind::Multi => "MULTI",
            PowerUpKind::Slow => "SLOW",
            PowerUpKind::Life => "LIFE",
            PowerUpKind::Sticky => "STICKY",
            PowerUpKind::Reverse => "REVERSE",
        }
    }

    /// Glyph drawn on the falling pickup
    pub fn icon(&self) -> &'static str {
        match self {
            PowerUpKind::Expand => "=",
            PowerUpKind::Multi => "*",
            PowerUpKind::Slow => "~",
            PowerUpKind::Life => "+",
            PowerUpKind::Sticky => "S",
            PowerUpKind::Reverse => "<>",
        }
    }

    pub fn color(&self) -> Color {
        match self {
            PowerUpKind::Expand => [120, 180, 255],
            PowerUpKind::Multi => [255, 200, 80],
            PowerUpKind::Slow => [150, 150, 255],
            PowerUpKind::Life => [90, 220, 140],
            PowerUpKind::Sticky => [200, 160, 255],
            PowerUpKind::Reverse => [255, 110, 110],
        }
    }
}

/// A falling pickup
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PowerUp {
    pub id: u32,
    pub kind: PowerUpKind,
    /// Top-left corner
    pub pos: Vec2,
    pub size: f32,
}

impl PowerUp {
    /// Pickup centered on `center`
    pub fn centered(id: u32, kind: PowerUpKind, center: Vec2, size: f32) -> Self {
        Self {
            id,
            kind,
            pos: center - Vec2::splat(size / 2.0),
            size,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.pos.x, self.pos.y, self.size, self.size)
    }

    pub fn fall(&mut self, dt: f32, speed: f32) {
        self.pos.y += speed * dt;
    }

    /// Entirely below the play area
    pub fn is_gone(&self, screen_height: f32) -> bool {
        self.pos.y > screen_height
    }
}

/// Complete session state
#[derive(Debug, Clone)]
pub struct GameState {
    pub(crate) config: GameConfig,
    pub(crate) phase: GamePhase,
    pub(crate) popup: Option<Popup>,
    pub(crate) level: u32,
    pub(crate) best_level: u32,
    pub(crate) lives: u32,
    pub(crate) score: u64,
    pub(crate) paddle: Paddle,
    pub(crate) balls: Vec<Ball>,
    pub(crate) bricks: BrickField,
    pub(crate) powerups: Vec<PowerUp>,
    pub(crate) powers: ActivePowers,
    /// Events raised during the most recent tick
    pub(crate) events: Vec<GameEvent>,
    pub(crate) sound_on: bool,
    pub(crate) exit_requested: bool,
    /// Ticks simulated while playing
    pub(crate) time_ticks: u64,
    pub(crate) rng: Pcg32,
    next_id: u32,
}

impl GameState {
    /// New session in the menu, seeded from ambient entropy
    pub fn new(config: GameConfig) -> Self {
        Self::with_seed(config, rand::random())
    }

    /// New session with a fixed RNG seed
    pub fn with_seed(config: GameConfig, seed: u64) -> Self {
        let config = config.sanitized();
        let mut state = Self {
            paddle: Paddle::from_config(&config),
            phase: GamePhase::Menu,
            popup: None,
            level: 1,
            best_level: 1,
            lives: config.starting_lives,
            score: 0,
            balls: Vec::new(),
            bricks: BrickField::default(),
            powerups: Vec::new(),
            powers: ActivePowers::default(),
            events: Vec::new(),
            sound_on: true,
            exit_requested: false,
            time_ticks: 0,
            rng: Pcg32::seed_from_u64(seed),
            next_id: 1,
            config,
        };
        state.begin_level();
        state
    }

    /// Allocate a new entity ID
    pub(crate) fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Spawn a ball stuck to the paddle
    pub(crate) fn spawn_ball_stuck(&mut self) {
        let id = self.next_entity_id();
        let ball = Ball::new_stuck(id, &self.paddle, self.config.ball_radius);
        self.balls.push(ball);
    }

    /// Fresh paddle, one stuck ball and a newly generated brick field for
    /// the current level. Active power-ups are dropped.
    pub(crate) fn begin_level(&mut self) {
        self.paddle = Paddle::from_config(&self.config);
        self.balls.clear();
        self.powerups.clear();
        self.powers.clear();
        self.popup = None;
        self.spawn_ball_stuck();

        let rows = self.config.rows_for_level(self.level);
        self.bricks = generate_bricks(&self.config, rows, &mut self.rng);
        log::info!(
            "Level {}: {} bricks over {} rows",
            self.level,
            self.bricks.len(),
            rows
        );
    }

    /// Full restart: level 1, zero score, starting lives. Best level is kept.
    pub(crate) fn restart(&mut self) {
        self.level = 1;
        self.score = 0;
        self.lives = self.config.starting_lives;
        self.begin_level();
        log::info!("Game restarted (best level {})", self.best_level);
    }

    /// Fresh session starting on `level` (clamped to 1..=max) instead of 1
    pub fn with_level(mut self, level: u32) -> Self {
        self.level = level.clamp(1, self.config.max_level);
        self.begin_level();
        self
    }

    pub(crate) fn emit(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn popup(&self) -> Option<&Popup> {
        self.popup.as_ref()
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn best_level(&self) -> u32 {
        self.best_level
    }

    pub fn lives(&self) -> u32 {
        self.lives
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn paddle(&self) -> &Paddle {
        &self.paddle
    }

    pub fn balls(&self) -> &[Ball] {
        &self.balls
    }

    pub fn bricks(&self) -> &BrickField {
        &self.bricks
    }

    pub fn powerups(&self) -> &[PowerUp] {
        &self.powerups
    }

    pub fn powers(&self) -> &ActivePowers {
        &self.powers
    }

    pub fn events(&self) -> &[GameEvent] {
        &self.events
    }

    pub fn sound_on(&self) -> bool {
        self.sound_on
    }

    pub fn exit_requested(&self) -> bool {
        self.exit_requested
    }

    pub fn time_ticks(&self) -> u64 {
        self.time_ticks
    }
}
