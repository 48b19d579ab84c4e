//! Patrol / chase behaviour
//!
//! Two-state enemy brain switched purely on distance to a target:
//! - Patrol: walk a loop of waypoints
//! - Chase: head straight for the target
//!
//! The lose radius is larger than the detect radius so an enemy sitting right
//! on the edge doesn't flicker between states every frame.

use macroquad::prelude::Vec2;
use serde::{Deserialize, Serialize};

/// AI state for enemies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AiState {
    /// Walking the waypoint loop, not aware of the target
    #[default]
    Patrol,
    /// Target in range, moving to engage
    Chase,
}

impl AiState {
    pub fn label(&self) -> &'static str {
        match self {
            AiState::Patrol => "patrol",
            AiState::Chase => "chase",
        }
    }
}

/// Tunables for a patrol/chase brain
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PatrolChaseConfig {
    pub patrol_speed: f32,
    pub chase_speed: f32,
    /// Start chasing at or below this distance
    pub detect_radius: f32,
    /// Give up chasing beyond this distance
    pub lose_radius: f32,
    /// Distance at which a waypoint counts as reached
    pub arrive_radius: f32,
}

impl Default for PatrolChaseConfig {
    fn default() -> Self {
        Self {
            patrol_speed: 80.0,
            chase_speed: 150.0,
            detect_radius: 150.0,
            lose_radius: 220.0,
            arrive_radius: 4.0,
        }
    }
}

/// Outcome of one `think` step
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Steering {
    pub velocity: Vec2,
    /// Some(new_state) on the frame the state flipped
    pub transition: Option<AiState>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PatrolChase {
    pub config: PatrolChaseConfig,
    state: AiState,
    waypoints: Vec<Vec2>,
    next_waypoint: usize,
}

impl PatrolChase {
    pub fn new(waypoints: Vec<Vec2>, config: PatrolChaseConfig) -> Self {
        Self {
            config,
            state: AiState::Patrol,
            waypoints,
            next_waypoint: 0,
        }
    }

    pub fn state(&self) -> AiState {
        self.state
    }

    pub fn waypoints(&self) -> &[Vec2] {
        &self.waypoints
    }

    pub fn current_waypoint(&self) -> Option<Vec2> {
        self.waypoints.get(self.next_waypoint).copied()
    }

    /// Pick the state for this frame and return the velocity to apply.
    pub fn think(&mut self, position: Vec2, target: Vec2) -> Steering {
        let distance = position.distance(target);
        let previous = self.state;

        self.state = match self.state {
            AiState::Patrol if distance <= self.config.detect_radius => AiState::Chase,
            AiState::Chase if distance > self.config.lose_radius => AiState::Patrol,
            other => other,
        };

        let velocity = match self.state {
            AiState::Chase => towards(position, target, self.config.chase_speed),
            AiState::Patrol => self.patrol_velocity(position),
        };

        Steering {
            velocity,
            transition: (self.state != previous).then_some(self.state),
        }
    }

    fn patrol_velocity(&mut self, position: Vec2) -> Vec2 {
        let Some(mut waypoint) = self.current_waypoint() else {
            return Vec2::ZERO;
        };
        if position.distance(waypoint) <= self.config.arrive_radius {
            self.next_waypoint = (self.next_waypoint + 1) % self.waypoints.len();
            waypoint = self.waypoints[self.next_waypoint];
        }
        towards(position, waypoint, self.config.patrol_speed)
    }
}

/// Velocity of magnitude `speed` pointing from `from` to `to`
pub fn towards(from: Vec2, to: Vec2, speed: f32) -> Vec2 {
    let delta = to - from;
    if delta.length_squared() <= f32::EPSILON {
        Vec2::ZERO
    } else {
        delta.normalize() * speed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn brain() -> PatrolChase {
        PatrolChase::new(
            vec![Vec2::new(0.0, 0.0), Vec2::new(100.0, 0.0)],
            PatrolChaseConfig::default(),
        )
    }

    #[test]
    fn test_starts_patrolling_towards_first_waypoint() {
        let mut ai = brain();
        let steer = ai.think(Vec2::new(50.0, 0.0), Vec2::new(1000.0, 1000.0));
        assert_eq!(ai.state(), AiState::Patrol);
        assert_eq!(steer.transition, None);
        assert_eq!(steer.velocity, Vec2::new(-80.0, 0.0));
    }

    #[test]
    fn test_switches_to_chase_within_radius() {
        let mut ai = brain();
        let steer = ai.think(Vec2::ZERO, Vec2::new(0.0, 150.0));
        assert_eq!(steer.transition, Some(AiState::Chase));
        assert_eq!(steer.velocity, Vec2::new(0.0, 150.0));
    }

    #[test]
    fn test_hysteresis_between_radii() {
        let mut ai = brain();
        ai.think(Vec2::ZERO, Vec2::new(0.0, 100.0));
        assert_eq!(ai.state(), AiState::Chase);

        // Between detect (150) and lose (220): keep chasing
        let steer = ai.think(Vec2::ZERO, Vec2::new(0.0, 200.0));
        assert_eq!(ai.state(), AiState::Chase);
        assert_eq!(steer.transition, None);

        let steer = ai.think(Vec2::ZERO, Vec2::new(0.0, 221.0));
        assert_eq!(steer.transition, Some(AiState::Patrol));

        // Back in the band: patrol does not re-acquire until detect radius
        ai.think(Vec2::ZERO, Vec2::new(0.0, 200.0));
        assert_eq!(ai.state(), AiState::Patrol);
    }

    #[test]
    fn test_advances_waypoint_on_arrival() {
        let mut ai = brain();
        let far = Vec2::new(5000.0, 5000.0);
        let steer = ai.think(Vec2::new(1.0, 0.0), far);
        // Reached waypoint 0, now heading to waypoint 1
        assert_eq!(ai.current_waypoint(), Some(Vec2::new(100.0, 0.0)));
        assert!(steer.velocity.x > 0.0);
    }

    #[test]
    fn test_no_waypoints_stands_still() {
        let mut ai = PatrolChase::new(Vec::new(), PatrolChaseConfig::default());
        let steer = ai.think(Vec2::ZERO, Vec2::new(1000.0, 0.0));
        assert_eq!(steer.velocity, Vec2::ZERO);
    }
}
