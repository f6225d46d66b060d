//! Vehicle kinematics and blocking logic
//!
//! Each vehicle owns its own motion: it advances along its direction's travel
//! axis at constant base speed scaled by the weather modifier, holds at its
//! stop position when its direction does not have right-of-way, and keeps a
//! minimum following gap behind the nearest vehicle ahead in its lane.

use super::config::SimConfig;
use super::signal::SignalController;
use super::snapshot::VehicleView;
use super::types::{
    Direction, Position, VehicleClass, VehicleId, AREA_HEIGHT, AREA_WIDTH, EXIT_MARGIN,
};

/// A vehicle approaching or transiting the intersection
#[derive(Debug, Clone)]
pub struct Vehicle {
    pub id: VehicleId,
    pub lane: u8,
    pub class: VehicleClass,
    pub direction: Direction,
    pub position: Position,
    /// True once the vehicle has passed its stop line by the crossing margin;
    /// never reverts
    pub crossed: bool,
    /// True only for the emergency class
    pub priority: bool,
    /// Whether the vehicle intends to turn; carried for snapshot consumers
    pub will_turn: bool,
    /// Ticks spent blocked before crossing
    pub wait_time: u32,
    /// Travel-axis coordinate where the vehicle holds without right-of-way
    pub stop_position: f32,
}

impl Vehicle {
    pub fn new(
        id: VehicleId,
        lane: u8,
        class: VehicleClass,
        direction: Direction,
        will_turn: bool,
        config: &SimConfig,
    ) -> Self {
        let position = direction.spawn_position(lane);
        let (length, _) = class.footprint();
        let clearance = length + config.gap;
        let stop_position = match direction {
            Direction::Right | Direction::Down => direction.stop_line() - clearance,
            Direction::Left | Direction::Up => direction.stop_line() + clearance,
        };

        Self {
            id,
            lane,
            class,
            direction,
            position,
            crossed: false,
            priority: class.is_priority(),
            will_turn,
            wait_time: 0,
            stop_position,
        }
    }

    /// Whether the vehicle has reached the point where it must hold on red
    pub fn at_stop_position(&self) -> bool {
        match self.direction {
            Direction::Right => self.position.x >= self.stop_position,
            Direction::Down => self.position.y >= self.stop_position,
            Direction::Left => self.position.x <= self.stop_position,
            Direction::Up => self.position.y <= self.stop_position,
        }
    }

    /// Whether the vehicle may advance this tick
    ///
    /// Crossed vehicles are always free to continue. Otherwise the signal
    /// phase blocks a non-priority vehicle that has reached its stop
    /// position, and the following gap blocks any vehicle too close to the
    /// nearest un-crossed vehicle ahead of it (`gap_ahead`, Euclidean,
    /// computed by the caller from a consistent pre-tick snapshot).
    pub fn can_advance(
        &self,
        signal: &SignalController,
        gap_ahead: Option<f32>,
        config: &SimConfig,
    ) -> bool {
        if self.crossed {
            return true;
        }

        if !self.priority && !signal.grants(self.direction) && self.at_stop_position() {
            return false;
        }

        if let Some(gap) = gap_ahead {
            if gap < config.moving_gap {
                return false;
            }
        }

        true
    }

    /// Advance one tick: either move by `base_speed * weather_modifier`
    /// along the travel axis, or stay put and accumulate wait time
    pub fn step(
        &mut self,
        signal: &SignalController,
        gap_ahead: Option<f32>,
        weather_modifier: f32,
        config: &SimConfig,
    ) {
        if !self.can_advance(signal, gap_ahead, config) {
            self.wait_time += 1;
            return;
        }

        let distance = self.class.base_speed() * weather_modifier;
        match self.direction {
            Direction::Right => self.position.x += distance,
            Direction::Down => self.position.y += distance,
            Direction::Left => self.position.x -= distance,
            Direction::Up => self.position.y -= distance,
        }

        self.update_crossed(config);
    }

    fn update_crossed(&mut self, config: &SimConfig) {
        if self.crossed {
            return;
        }
        let line = self.direction.stop_line();
        let past_line = match self.direction {
            Direction::Right => self.position.x - line,
            Direction::Down => self.position.y - line,
            Direction::Left => line - self.position.x,
            Direction::Up => line - self.position.y,
        };
        if past_line > config.crossing_margin {
            self.crossed = true;
        }
    }

    /// Whether the vehicle is still inside the bounded simulation area
    pub fn in_bounds(&self) -> bool {
        self.position.x >= -EXIT_MARGIN
            && self.position.x <= AREA_WIDTH + EXIT_MARGIN
            && self.position.y >= -EXIT_MARGIN
            && self.position.y <= AREA_HEIGHT + EXIT_MARGIN
    }

    /// Copy-out view for snapshots and the frozen per-tick position set
    pub fn view(&self) -> VehicleView {
        VehicleView {
            id: self.id,
            class: self.class,
            direction: self.direction,
            lane: self.lane,
            position: self.position,
            crossed: self.crossed,
            priority: self.priority,
            will_turn: self.will_turn,
            wait_time: self.wait_time,
        }
    }
}
