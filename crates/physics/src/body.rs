//! Player body: movement integration, jumping and fall damage.

use crate::collision::{resolve_motion, Contacts, DEFAULT_CLEARANCE};
use glam::Vec2;
use serde::{Deserialize, Serialize};
use tilecraft_core::TickInput;
use tilecraft_world::{TileGrid, WorldRect};

/// Per-tick movement constants, in world units per tick.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MovementTuning {
    /// Horizontal speed gained per tick while a direction is held.
    pub acceleration: f32,
    /// Horizontal velocity multiplier when no single direction is held.
    pub friction: f32,
    /// Horizontal speed cap.
    pub max_speed: f32,
    /// Downward acceleration.
    pub gravity: f32,
    /// Downward speed cap.
    pub terminal_fall: f32,
    /// Upward speed set by a jump.
    pub jump_speed: f32,
    /// Jumps available between landings.
    pub max_jumps: u8,
    /// Gap left between the body and blocking cells.
    pub clearance: f32,
}

impl Default for MovementTuning {
    fn default() -> Self {
        Self {
            acceleration: 0.6,
            friction: 0.8,
            max_speed: 4.0,
            gravity: 0.5,
            terminal_fall: 12.0,
            jump_speed: 9.5,
            max_jumps: 2,
            clearance: DEFAULT_CLEARANCE,
        }
    }
}

/// Horizontal speeds below this snap to zero under friction.
const REST_SPEED: f32 = 0.01;

/// Damage dealt on landing after a long fall.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FallDamagePolicy {
    /// Fall distance that is free.
    pub threshold: f32,
    /// World units of extra fall per point of damage.
    pub divisor: f32,
}

impl Default for FallDamagePolicy {
    fn default() -> Self {
        Self {
            threshold: 100.0,
            divisor: 5.0,
        }
    }
}

impl FallDamagePolicy {
    /// Damage for a fall of `distance` world units.
    pub fn damage_for(&self, distance: f32) -> u32 {
        if distance <= self.threshold || self.divisor <= 0.0 {
            return 0;
        }
        ((distance - self.threshold) / self.divisor).floor() as u32
    }
}

/// Body configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BodySettings {
    /// Body width and height in world units.
    pub size: [f32; 2],
    /// Health on spawn.
    pub max_health: u32,
    /// Movement constants.
    pub tuning: MovementTuning,
    /// Landing damage rule.
    pub fall_damage: FallDamagePolicy,
}

impl Default for BodySettings {
    fn default() -> Self {
        Self {
            size: [20.0, 40.0],
            max_health: 100,
            tuning: MovementTuning::default(),
            fall_damage: FallDamagePolicy::default(),
        }
    }
}

/// A finished fall.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Landing {
    /// Vertical distance from takeoff to landing (negative when landing higher).
    pub distance: f32,
    /// Health removed.
    pub damage: u32,
}

/// What happened during one [`KinematicBody::step`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepOutcome {
    /// Sides blocked during collision resolution.
    pub contacts: Contacts,
    /// Whether a jump was spent this tick.
    pub jumped: bool,
    /// Set on the tick the body comes to rest after being airborne.
    pub landing: Option<Landing>,
}

/// The player-controlled rectangle.
#[derive(Debug, Clone)]
pub struct KinematicBody {
    position: Vec2,
    size: Vec2,
    velocity: Vec2,
    resting_on_solid: bool,
    jumps_remaining: u8,
    health: u32,
    takeoff_y: Option<f32>,
    spawn: Vec2,
    max_health: u32,
    tuning: MovementTuning,
    fall_damage: FallDamagePolicy,
}

impl KinematicBody {
    /// Create an airborne body at `spawn` (top-left corner).
    pub fn spawn(spawn: Vec2, settings: &BodySettings) -> Self {
        Self {
            position: spawn,
            size: Vec2::from(settings.size),
            velocity: Vec2::ZERO,
            resting_on_solid: false,
            jumps_remaining: settings.tuning.max_jumps,
            health: settings.max_health,
            takeoff_y: Some(spawn.y),
            spawn,
            max_health: settings.max_health,
            tuning: settings.tuning.clone(),
            fall_damage: settings.fall_damage,
        }
    }

    /// Put the body back at its spawn point with full health and jumps.
    pub fn respawn(&mut self) {
        self.respawn_at(self.spawn);
    }

    /// Like [`KinematicBody::respawn`] but at an explicit position.
    pub fn respawn_at(&mut self, at: Vec2) {
        self.position = at;
        self.velocity = Vec2::ZERO;
        self.resting_on_solid = false;
        self.jumps_remaining = self.tuning.max_jumps;
        self.health = self.max_health;
        self.takeoff_y = Some(at.y);
    }

    /// Top-left corner.
    pub fn position(&self) -> Vec2 {
        self.position
    }

    /// Width and height.
    pub fn size(&self) -> Vec2 {
        self.size
    }

    /// Velocity in world units per tick.
    pub fn velocity(&self) -> Vec2 {
        self.velocity
    }

    /// Where [`KinematicBody::respawn`] puts the body.
    pub fn spawn_point(&self) -> Vec2 {
        self.spawn
    }

    /// World-space rectangle.
    pub fn rect(&self) -> WorldRect {
        WorldRect::from_origin_size(self.position, self.size)
    }

    /// Center point, used as the reach origin.
    pub fn center(&self) -> Vec2 {
        self.position + self.size * 0.5
    }

    /// Whether the body stood on a solid cell after the last step.
    pub fn is_resting(&self) -> bool {
        self.resting_on_solid
    }

    /// Jumps left before the next landing.
    pub fn jumps_remaining(&self) -> u8 {
        self.jumps_remaining
    }

    /// Current health.
    pub fn health(&self) -> u32 {
        self.health
    }

    /// Health restored on respawn.
    pub fn max_health(&self) -> u32 {
        self.max_health
    }

    /// Whether health has reached zero.
    pub fn is_dead(&self) -> bool {
        self.health == 0
    }

    /// Movement constants in use.
    pub fn tuning(&self) -> &MovementTuning {
        &self.tuning
    }

    /// Remove health, flooring at zero. Returns the amount actually removed.
    pub fn apply_damage(&mut self, amount: u32) -> u32 {
        let dealt = amount.min(self.health);
        self.health -= dealt;
        dealt
    }

    /// Advance one tick: integrate intents and gravity, then resolve collisions.
    pub fn step(&mut self, grid: &TileGrid, input: &TickInput) -> StepOutcome {
        let t = &self.tuning;

        let axis = input.horizontal_axis();
        if axis != 0.0 {
            self.velocity.x += axis * t.acceleration;
        } else {
            self.velocity.x *= t.friction;
            if self.velocity.x.abs() < REST_SPEED {
                self.velocity.x = 0.0;
            }
        }
        let cap = t.max_speed.abs();
        self.velocity.x = self.velocity.x.clamp(-cap, cap);

        self.velocity.y = (self.velocity.y + t.gravity).min(t.terminal_fall);

        let jumped = input.jump && self.jumps_remaining > 0;
        if jumped {
            self.velocity.y = -t.jump_speed;
            self.jumps_remaining -= 1;
        }

        let before = self.position;
        let resolution = resolve_motion(grid, before, self.size, self.velocity, t.clearance);
        self.position = resolution.position;

        let contacts = resolution.contacts;
        if contacts.vertical() {
            self.velocity.y = 0.0;
        }
        if contacts.horizontal() {
            self.velocity.x = 0.0;
        }
        if contacts.contains(Contacts::GROUND) {
            self.jumps_remaining = self.tuning.max_jumps;
        }

        let was_resting = self.resting_on_solid;
        self.resting_on_solid = contacts.contains(Contacts::GROUND);

        let mut landing = None;
        if was_resting && !self.resting_on_solid {
            self.takeoff_y = Some(before.y);
        } else if !was_resting && self.resting_on_solid {
            let takeoff = self.takeoff_y.take().unwrap_or(self.position.y);
            let distance = self.position.y - takeoff;
            let damage = self.apply_damage(self.fall_damage.damage_for(distance));
            landing = Some(Landing { distance, damage });
        }

        StepOutcome {
            contacts,
            jumped,
            landing,
        }
    }
}
