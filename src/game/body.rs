//! Arcade body
//!
//! Axis-aligned box with a velocity. This is just enough "physics" for the
//! demos: integrate velocity, optionally clamp or bounce against the world
//! bounds, and test overlaps. Anything richer belongs to a real physics
//! engine, which the demos don't need.

use macroquad::prelude::{Rect, Vec2};

/// World rectangle bodies are kept inside
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min: Vec2,
    pub max: Vec2,
}

impl Bounds {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            min: Vec2::ZERO,
            max: Vec2::new(width, height),
        }
    }

    pub fn width(&self) -> f32 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f32 {
        self.max.y - self.min.y
    }

    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }

    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= self.min.x && point.x <= self.max.x && point.y >= self.min.y && point.y <= self.max.y
    }
}

/// Which world edges a body touched during the last `integrate`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Blocked {
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub down: bool,
}

impl Blocked {
    pub fn any(&self) -> bool {
        self.left || self.right || self.up || self.down
    }
}

/// A moving box. `pos` is the box centre.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Body {
    pub pos: Vec2,
    pub vel: Vec2,
    pub size: Vec2,
    /// Velocity kept after hitting a world edge (0 = stop, 1 = perfect bounce)
    pub bounce: f32,
    pub collide_world: bool,
    pub blocked: Blocked,
}

impl Body {
    pub fn new(pos: Vec2, size: Vec2) -> Self {
        Self {
            pos,
            vel: Vec2::ZERO,
            size,
            bounce: 0.0,
            collide_world: true,
            blocked: Blocked::default(),
        }
    }

    pub fn with_velocity(mut self, vel: Vec2) -> Self {
        self.vel = vel;
        self
    }

    pub fn with_bounce(mut self, bounce: f32) -> Self {
        self.bounce = bounce;
        self
    }

    pub fn with_world_collision(mut self, collide: bool) -> Self {
        self.collide_world = collide;
        self
    }

    pub fn half_size(&self) -> Vec2 {
        self.size * 0.5
    }

    pub fn rect(&self) -> Rect {
        let half = self.half_size();
        Rect::new(self.pos.x - half.x, self.pos.y - half.y, self.size.x, self.size.y)
    }

    pub fn top(&self) -> f32 {
        self.pos.y - self.size.y * 0.5
    }

    pub fn bottom(&self) -> f32 {
        self.pos.y + self.size.y * 0.5
    }

    /// Move by velocity and resolve against the world bounds.
    pub fn integrate(&mut self, delta_time: f32, bounds: &Bounds) {
        self.pos += self.vel * delta_time;
        self.blocked = Blocked::default();

        if !self.collide_world {
            return;
        }

        let half = self.half_size();
        if self.pos.x - half.x < bounds.min.x {
            self.pos.x = bounds.min.x + half.x;
            self.vel.x = self.vel.x.abs() * self.bounce;
            self.blocked.left = true;
        } else if self.pos.x + half.x > bounds.max.x {
            self.pos.x = bounds.max.x - half.x;
            self.vel.x = -self.vel.x.abs() * self.bounce;
            self.blocked.right = true;
        }

        if self.pos.y - half.y < bounds.min.y {
            self.pos.y = bounds.min.y + half.y;
            self.vel.y = self.vel.y.abs() * self.bounce;
            self.blocked.up = true;
        } else if self.pos.y + half.y > bounds.max.y {
            self.pos.y = bounds.max.y - half.y;
            self.vel.y = -self.vel.y.abs() * self.bounce;
            self.blocked.down = true;
        }
    }

    pub fn overlaps(&self, other: &Body) -> bool {
        self.rect().overlaps(&other.rect())
    }

    pub fn contains_point(&self, point: Vec2) -> bool {
        self.rect().contains(point)
    }

    pub fn distance(&self, other: &Body) -> f32 {
        self.pos.distance(other.pos)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integrate_moves_by_velocity() {
        let bounds = Bounds::new(800.0, 600.0);
        let mut body = Body::new(Vec2::new(100.0, 100.0), Vec2::splat(10.0))
            .with_velocity(Vec2::new(200.0, -100.0));
        body.integrate(0.5, &bounds);
        assert_eq!(body.pos, Vec2::new(200.0, 50.0));
        assert!(!body.blocked.any());
    }

    #[test]
    fn test_world_clamp_stops() {
        let bounds = Bounds::new(800.0, 600.0);
        let mut body = Body::new(Vec2::new(790.0, 300.0), Vec2::splat(20.0))
            .with_velocity(Vec2::new(400.0, 0.0));
        body.integrate(1.0, &bounds);
        assert_eq!(body.pos.x, 790.0);
        assert_eq!(body.vel.x, 0.0);
        assert!(body.blocked.right);
    }

    #[test]
    fn test_world_bounce_reflects() {
        let bounds = Bounds::new(800.0, 600.0);
        let mut body = Body::new(Vec2::new(20.0, 590.0), Vec2::splat(20.0))
            .with_velocity(Vec2::new(-100.0, 100.0))
            .with_bounce(1.0);
        body.integrate(1.0, &bounds);
        assert_eq!(body.vel, Vec2::new(100.0, -100.0));
        assert!(body.blocked.left && body.blocked.down);
    }

    #[test]
    fn test_no_world_collision_leaves_bounds() {
        let bounds = Bounds::new(100.0, 100.0);
        let mut body = Body::new(Vec2::new(50.0, 50.0), Vec2::splat(10.0))
            .with_velocity(Vec2::new(0.0, 500.0))
            .with_world_collision(false);
        body.integrate(1.0, &bounds);
        assert_eq!(body.pos.y, 550.0);
    }

    #[test]
    fn test_overlap_and_distance() {
        let a = Body::new(Vec2::new(0.0, 0.0), Vec2::splat(10.0));
        let b = Body::new(Vec2::new(8.0, 0.0), Vec2::splat(10.0));
        let c = Body::new(Vec2::new(30.0, 40.0), Vec2::splat(10.0));
        assert!(a.overlaps(&b));
        assert!(!a.overlaps(&c));
        assert_eq!(a.distance(&c), 50.0);
    }
}
