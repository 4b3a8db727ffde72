//! Collision detection and response
//!
//! Per tick, every live ball is resolved against the paddle and then against
//! at most one brick. Destroying a bomb brick starts a chain reaction that
//! walks the brick grid through bomb adjacency.

use glam::Vec2;
use rand::Rng;

use super::bricks::BrickField;
use super::geometry::circle_intersects_rect;
use super::powerups::apply_power;
use super::state::{Ball, Brick, BrickKind, GameEvent, GameState, GridPos, Paddle, PowerUp, PowerUpKind};
use crate::steer_offset;

/// Outcome of a ball striking a brick
#[derive(Debug, Clone, PartialEq)]
pub enum BrickHit {
    /// Brick survived with fewer hits left
    Damaged,
    /// Normal brick removed
    Destroyed(Brick),
    /// Bomb brick removed together with everything its chain reached
    Detonated(Vec<Brick>),
}

/// What happened when lost balls were culled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BallLoss {
    /// At least one ball is still in play
    None,
    /// Last ball lost, a fresh ball was put on the paddle
    LifeLost,
    /// Last ball lost with no lives left
    OutOfLives,
}

/// Bounce a ball off the paddle (or glue it there while sticky).
/// Returns true on contact.
pub fn paddle_bounce(ball: &mut Ball, paddle: &Paddle, sticky: bool, steer: f32) -> bool {
    if ball.stuck || !circle_intersects_rect(ball.pos, ball.radius, &paddle.rect()) {
        return false;
    }

    if sticky {
        ball.stuck = true;
        ball.vel = Vec2::ZERO;
    } else {
        ball.pos.y = paddle.y - ball.radius - 1.0;
        ball.vel.y = -ball.vel.y.abs();
        let offset = steer_offset(ball.pos.x, paddle.center_x(), paddle.width / 2.0);
        ball.vel.x += offset * steer;
    }
    true
}

/// Resolve a ball against the first live brick it touches (row-major order).
///
/// The reflection axis comes only from the overlap between the ball's
/// bounding box and the brick: wider than tall flips vx, otherwise vy.
pub fn ball_bricks(ball: &mut Ball, field: &mut BrickField) -> Option<BrickHit> {
    let pos = field
        .iter()
        .find(|b| circle_intersects_rect(ball.pos, ball.radius, &b.rect))
        .map(|b| b.pos)?;
    let brick = field.get_mut(pos)?;

    let overlap = ball.bounds().clip(&brick.rect).unwrap_or_default();
    if overlap.w > overlap.h {
        ball.vel.x = -ball.vel.x;
    } else {
        ball.vel.y = -ball.vel.y;
    }

    brick.hits = brick.hits.saturating_sub(1);
    if brick.hits > 0 {
        return Some(BrickHit::Damaged);
    }

    let kind = brick.kind;
    match kind {
        BrickKind::Normal => field.remove(pos).map(BrickHit::Destroyed),
        BrickKind::Bomb => Some(BrickHit::Detonated(detonate(field, pos))),
    }
}

/// Chain reaction starting at `origin`.
///
/// Work-list search over grid coordinates: a coordinate holding a live brick
/// destroys it, and a destroyed bomb enqueues its four neighbours. Empty or
/// already-cleared coordinates are skipped, so every brick goes at most once
/// and the search ends even when bombs form cycles.
pub fn detonate(field: &mut BrickField, origin: GridPos) -> Vec<Brick> {
    let mut work = vec![origin];
    let mut destroyed = Vec::new();

    while let Some(pos) = work.pop() {
        let Some(brick) = field.remove(pos) else {
            continue;
        };
        if brick.kind == BrickKind::Bomb {
            work.extend(pos.neighbors());
        }
        destroyed.push(brick);
    }

    destroyed
}

/// Paddle and brick resolution for every live ball
pub fn resolve_balls(state: &mut GameState) {
    let sticky = state.powers.sticky();
    let steer = state.config.paddle_steer;

    for i in 0..state.balls.len() {
        if state.balls[i].stuck {
            state.balls[i].anchor_to(&state.paddle);
            continue;
        }

        if paddle_bounce(&mut state.balls[i], &state.paddle, sticky, steer) {
            state.emit(GameEvent::PaddleHit);
        }

        match ball_bricks(&mut state.balls[i], &mut state.bricks) {
            None => {}
            Some(BrickHit::Damaged) => state.emit(GameEvent::BrickDamaged),
            Some(BrickHit::Destroyed(brick)) => {
                state.score += state.config.normal_brick_score;
                state.emit(GameEvent::BrickDestroyed);
                maybe_spawn_powerup(state, brick.rect.center());
            }
            Some(BrickHit::Detonated(destroyed)) => {
                state.score += state.config.chain_brick_score * destroyed.len() as u64;
                log::debug!("Bomb chain destroyed {} bricks", destroyed.len());
                state.emit(GameEvent::BombExploded {
                    destroyed: destroyed.len(),
                });
            }
        }
    }
}

/// Roll for a pickup dropping from a destroyed normal brick
fn maybe_spawn_powerup(state: &mut GameState, center: Vec2) {
    if !state.rng.random_bool(state.config.powerup_chance) {
        return;
    }
    let kind = PowerUpKind::ALL[state.rng.random_range(0..PowerUpKind::ALL.len())];
    let id = state.next_entity_id();
    let size = state.config.powerup_size;
    state.powerups.push(PowerUp::centered(id, kind, center, size));
}

/// Apply and remove pickups touching the paddle; drop those below the screen
pub fn collect_pickups(state: &mut GameState) {
    let paddle_rect = state.paddle.rect();
    let screen_height = state.config.screen_height;

    let mut collected: Vec<PowerUpKind> = Vec::new();
    state.powerups.retain(|pickup| {
        if pickup.rect().intersects(&paddle_rect) {
            collected.push(pickup.kind);
            false
        } else {
            !pickup.is_gone(screen_height)
        }
    });

    for kind in collected {
        apply_power(state, kind);
        state.emit(GameEvent::PowerUpCollected(kind));
    }
}

/// Remove balls that fell out of the play area and settle the life count
pub fn remove_lost_balls(state: &mut GameState) -> BallLoss {
    let screen_height = state.config.screen_height;
    state.balls.retain(|ball| !ball.is_lost(screen_height));
    if !state.balls.is_empty() {
        return BallLoss::None;
    }

    state.lives = state.lives.saturating_sub(1);
    state.emit(GameEvent::LifeLost);
    if state.lives == 0 {
        return BallLoss::OutOfLives;
    }
    state.spawn_ball_stuck();
    BallLoss::LifeLost
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use proptest::prelude::*;

    use super::*;
    use crate::config::GameConfig;
    use crate::sim::bricks::{brick_rect, row_color};

    fn brick(config: &GameConfig, row: i32, col: i32, kind: BrickKind, hits: u8) -> Brick {
        Brick {
            pos: GridPos::new(row, col),
            rect: brick_rect(config, row as u32, col as u32),
            hits,
            color: row_color(row as u32),
            kind,
        }
    }

    fn state_with(bricks: Vec<Brick>) -> GameState {
        let mut state = GameState::with_seed(GameConfig::default(), 5);
        state.bricks = bricks.into_iter().collect();
        state.balls.clear();
        state
    }

    #[test]
    fn test_paddle_center_hit_reflects_upward() {
        let config = GameConfig::default();
        let paddle = Paddle::from_config(&config);
        let mut ball = Ball::new_free(1, Vec2::new(paddle.center_x(), paddle.y - 4.0), Vec2::new(2.0, 5.0), 9.0);

        assert!(paddle_bounce(&mut ball, &paddle, false, 3.0));
        assert_eq!(ball.vel, Vec2::new(2.0, -5.0));
        assert_eq!(ball.pos.y, paddle.y - 10.0);
        assert!(!ball.stuck);
    }

    #[test]
    fn test_paddle_edges_steer_the_ball() {
        let config = GameConfig::default();
        let paddle = Paddle::from_config(&config);

        let mut left = Ball::new_free(1, Vec2::new(paddle.x, paddle.y - 2.0), Vec2::new(0.0, 5.0), 9.0);
        paddle_bounce(&mut left, &paddle, false, 3.0);
        assert!((left.vel.x + 3.0).abs() < 1e-5);

        let mut right = Ball::new_free(2, Vec2::new(paddle.x + paddle.width, paddle.y - 2.0), Vec2::new(0.0, 5.0), 9.0);
        paddle_bounce(&mut right, &paddle, false, 3.0);
        assert!((right.vel.x - 3.0).abs() < 1e-5);
    }

    #[test]
    fn test_sticky_paddle_glues_ball() {
        let config = GameConfig::default();
        let paddle = Paddle::from_config(&config);
        let mut ball = Ball::new_free(1, Vec2::new(paddle.center_x(), paddle.y - 4.0), Vec2::new(2.0, 5.0), 9.0);

        assert!(paddle_bounce(&mut ball, &paddle, true, 3.0));
        assert!(ball.stuck);
        assert_eq!(ball.vel, Vec2::ZERO);
        // Stuck balls are not bounced again
        assert!(!paddle_bounce(&mut ball, &paddle, true, 3.0));
    }

    #[test]
    fn test_wide_overlap_flips_vx() {
        let config = GameConfig::default();
        let b = brick(&config, 0, 0, BrickKind::Normal, 2);
        let rect = b.rect;
        let mut field: BrickField = vec![b].into_iter().collect();

        // Ball poking up into the brick's bottom edge by 3px
        let mut ball = Ball::new_free(1, Vec2::new(rect.center().x, rect.bottom() + 6.0), Vec2::new(1.0, -5.0), 9.0);
        assert_eq!(ball_bricks(&mut ball, &mut field), Some(BrickHit::Damaged));
        assert_eq!(ball.vel, Vec2::new(-1.0, -5.0));
        assert_eq!(field.get(GridPos::new(0, 0)).map(|b| b.hits), Some(1));
    }

    #[test]
    fn test_tall_overlap_flips_vy() {
        let config = GameConfig::default();
        let b = brick(&config, 0, 0, BrickKind::Normal, 2);
        let rect = b.rect;
        let mut field: BrickField = vec![b].into_iter().collect();

        // Ball poking into the brick's left side by 2px
        let mut ball = Ball::new_free(1, Vec2::new(rect.left() - 7.0, rect.center().y), Vec2::new(5.0, 1.0), 9.0);
        assert_eq!(ball_bricks(&mut ball, &mut field), Some(BrickHit::Damaged));
        assert_eq!(ball.vel, Vec2::new(5.0, -1.0));
    }

    #[test]
    fn test_only_first_brick_resolved_per_tick() {
        let config = GameConfig::default();
        let a = brick(&config, 0, 0, BrickKind::Normal, 1);
        let b = brick(&config, 0, 1, BrickKind::Normal, 1);
        // Straddle the shared gutter
        let seam = Vec2::new((a.rect.right() + b.rect.left()) / 2.0, a.rect.center().y);
        let mut field: BrickField = vec![a, b].into_iter().collect();
        let mut ball = Ball::new_free(1, seam, Vec2::new(0.0, -5.0), 9.0);

        let hit = ball_bricks(&mut ball, &mut field);
        assert!(matches!(hit, Some(BrickHit::Destroyed(ref gone)) if gone.pos == GridPos::new(0, 0)));
        assert_eq!(field.len(), 1);
        assert!(field.contains(GridPos::new(0, 1)));
    }

    #[test]
    fn test_bomb_cycle_destroys_each_brick_once() {
        let config = GameConfig::default();
        let mut field: BrickField = [(0, 0), (0, 1), (1, 0), (1, 1)]
            .into_iter()
            .map(|(r, c)| brick(&config, r, c, BrickKind::Bomb, 1))
            .chain([
                brick(&config, 2, 0, BrickKind::Normal, 2),
                brick(&config, 3, 0, BrickKind::Normal, 1),
                brick(&config, 0, 5, BrickKind::Bomb, 1),
            ])
            .collect();

        let destroyed = detonate(&mut field, GridPos::new(0, 0));
        let unique: BTreeSet<_> = destroyed.iter().map(|b| b.pos).collect();

        assert_eq!(destroyed.len(), 5);
        assert_eq!(unique.len(), 5);
        // Normal neighbour goes regardless of remaining hits; it does not propagate
        assert!(unique.contains(&GridPos::new(2, 0)));
        assert!(field.contains(GridPos::new(3, 0)));
        assert!(field.contains(GridPos::new(0, 5)));
    }

    #[test]
    fn test_detonate_on_empty_coordinate_is_a_noop() {
        let config = GameConfig::default();
        let mut field: BrickField = vec![brick(&config, 0, 0, BrickKind::Bomb, 1)].into_iter().collect();
        assert!(detonate(&mut field, GridPos::new(4, 4)).is_empty());
        assert_eq!(field.len(), 1);
    }

    #[test]
    fn test_normal_brick_scores_ten() {
        let config = GameConfig::default();
        let target = brick(&config, 0, 3, BrickKind::Normal, 1);
        let below = Vec2::new(target.rect.center().x, target.rect.bottom() + 6.0);
        let mut state = state_with(vec![target, brick(&config, 0, 4, BrickKind::Bomb, 1)]);
        state.balls.push(Ball::new_free(1, below, Vec2::new(0.0, -5.0), 9.0));

        resolve_balls(&mut state);
        assert_eq!(state.score, 10);
        assert_eq!(state.bricks.len(), 1);
        assert!(!state.bricks.contains(GridPos::new(0, 3)));
        assert!(state.events.contains(&GameEvent::BrickDestroyed));
        let origin = brick_rect(&config, 0, 3).center();
        for pickup in &state.powerups {
            assert!((pickup.rect().center() - origin).length() < 1e-3);
        }
    }

    #[test]
    fn test_lone_bomb_scores_fifteen() {
        let config = GameConfig::default();
        let bomb = brick(&config, 2, 6, BrickKind::Bomb, 1);
        let below = Vec2::new(bomb.rect.center().x, bomb.rect.bottom() + 6.0);
        let mut state = state_with(vec![bomb, brick(&config, 0, 0, BrickKind::Normal, 1)]);
        state.balls.push(Ball::new_free(1, below, Vec2::new(0.0, -5.0), 9.0));

        resolve_balls(&mut state);
        assert_eq!(state.score, 15);
        assert_eq!(state.bricks.len(), 1);
        assert_eq!(state.events, vec![GameEvent::BombExploded { destroyed: 1 }]);
        assert!(state.powerups.is_empty());
    }

    #[test]
    fn test_chain_destruction_spawns_no_powerups() {
        let config = GameConfig {
            powerup_chance: 1.0,
            ..Default::default()
        };
        let mut state = GameState::with_seed(config.clone(), 8);
        state.bricks = [
            brick(&config, 0, 0, BrickKind::Bomb, 1),
            brick(&config, 0, 1, BrickKind::Normal, 1),
            brick(&config, 1, 0, BrickKind::Normal, 1),
        ]
        .into_iter()
        .collect();
        let bomb_rect = brick_rect(&config, 0, 0);
        state.balls = vec![Ball::new_free(1, Vec2::new(bomb_rect.center().x - 20.0, bomb_rect.center().y), Vec2::new(0.0, -5.0), 9.0)];

        resolve_balls(&mut state);
        assert!(state.bricks.is_empty());
        assert_eq!(state.score, 45);
        assert!(state.powerups.is_empty());
    }

    #[test]
    fn test_stuck_ball_is_reanchored_and_skips_collisions() {
        let config = GameConfig::default();
        let mut state = state_with(vec![]);
        let paddle = state.paddle.clone();
        let mut ball = Ball::new_stuck(1, &paddle, 9.0);
        ball.pos = Vec2::new(10.0, 10.0);
        state.balls.push(ball);

        resolve_balls(&mut state);
        assert_eq!(state.balls[0].pos, paddle.anchor_point(config.ball_radius));
        assert!(state.events.is_empty());
    }

    #[test]
    fn test_pickup_collected_on_paddle_contact() {
        let mut state = state_with(vec![]);
        let paddle_center = state.paddle.rect().center();
        state.powerups.push(PowerUp::centered(50, PowerUpKind::Life, paddle_center, 26.0));
        state.powerups.push(PowerUp::centered(51, PowerUpKind::Expand, Vec2::new(20.0, 900.0), 26.0));

        collect_pickups(&mut state);
        assert_eq!(state.lives, 4);
        assert!(state.powerups.is_empty());
        assert!(state.powers.is_active(PowerUpKind::Life));
        assert_eq!(state.events, vec![GameEvent::PowerUpCollected(PowerUpKind::Life)]);
    }

    #[test]
    fn test_last_ball_lost_with_one_life_is_game_over() {
        let mut state = state_with(vec![]);
        state.lives = 1;
        state.balls.push(Ball::new_free(1, Vec2::new(300.0, 800.0), Vec2::new(0.0, 5.0), 9.0));

        assert_eq!(remove_lost_balls(&mut state), BallLoss::OutOfLives);
        assert_eq!(state.lives, 0);
        assert!(state.balls.is_empty());
    }

    #[test]
    fn test_last_ball_lost_with_two_lives_respawns() {
        let mut state = state_with(vec![]);
        state.lives = 2;
        state.balls.push(Ball::new_free(1, Vec2::new(300.0, 800.0), Vec2::new(0.0, 5.0), 9.0));

        assert_eq!(remove_lost_balls(&mut state), BallLoss::LifeLost);
        assert_eq!(state.lives, 1);
        assert_eq!(state.balls.len(), 1);
        assert!(state.balls[0].stuck);
    }

    #[test]
    fn test_losing_one_of_several_balls_costs_nothing() {
        let mut state = state_with(vec![]);
        state.balls.push(Ball::new_free(1, Vec2::new(300.0, 800.0), Vec2::new(0.0, 5.0), 9.0));
        state.balls.push(Ball::new_free(2, Vec2::new(300.0, 300.0), Vec2::new(0.0, 5.0), 9.0));

        assert_eq!(remove_lost_balls(&mut state), BallLoss::None);
        assert_eq!(state.lives, 3);
        assert_eq!(state.balls.len(), 1);
    }

    /// Reference reachability: bricks reachable from `origin`, expanding only through bombs
    fn reachable(field: &BrickField, origin: GridPos) -> BTreeSet<GridPos> {
        let mut seen = BTreeSet::new();
        let mut frontier = vec![origin];
        while let Some(pos) = frontier.pop() {
            let Some(b) = field.get(pos) else { continue };
            if !seen.insert(pos) {
                continue;
            }
            if b.kind == BrickKind::Bomb {
                frontier.extend(pos.neighbors());
            }
        }
        seen
    }

    proptest! {
        #[test]
        fn prop_detonation_matches_bomb_reachability(
            cells in proptest::collection::vec((0i32..6, 0i32..8, any::<bool>()), 1..40),
        ) {
            let config = GameConfig::default();
            let mut field: BrickField = cells
                .iter()
                .map(|&(r, c, bomb)| {
                    let kind = if bomb { BrickKind::Bomb } else { BrickKind::Normal };
                    brick(&config, r, c, kind, 1)
                })
                .collect();
            let origin = GridPos::new(cells[0].0, cells[0].1);
            let before = field.len();
            let expected = reachable(&field, origin);

            let destroyed = detonate(&mut field, origin);
            let got: BTreeSet<_> = destroyed.iter().map(|b| b.pos).collect();

            prop_assert_eq!(destroyed.len(), got.len());
            prop_assert_eq!(&got, &expected);
            prop_assert_eq!(field.len() + destroyed.len(), before);
        }
    }
}
