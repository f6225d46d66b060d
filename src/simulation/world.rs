//! The simulation context and tick driver
//!
//! `SimWorld` owns every component and drives one discrete step per tick in
//! a fixed order: weather, emergency preemption, advisory, signal
//! controller, vehicle updates, spawning, stats. External readers consume
//! copy-out snapshots between ticks; nothing outside the driver mutates
//! simulation state.

use log::{debug, trace};
use ordered_float::OrderedFloat;
use rand::rngs::StdRng;
use rand::SeedableRng;

use super::advisory::{AdvisoryClient, AdvisoryRequest, AdvisoryService, LocalQueueAdvisor};
use super::config::SimConfig;
use super::emergency::EmergencyPreemption;
use super::signal::{SignalController, TimingPlan};
use super::snapshot::{SignalView, SimSnapshot, StatsView, VehicleView, WeatherView};
use super::spawner::{spacing_clear, VehicleSpawner};
use super::stats::SimStats;
use super::types::{Direction, VehicleClass, VehicleId};
use super::vehicle::Vehicle;
use super::weather::WeatherModel;

/// Congestion contributed by each waiting vehicle, saturating at 1.0
const CONGESTION_PER_VEHICLE: f32 = 0.1;

/// The main simulation world
pub struct SimWorld {
    config: SimConfig,
    weather: WeatherModel,
    preemption: EmergencyPreemption,
    advisory: AdvisoryClient,
    signal: SignalController,
    spawner: VehicleSpawner,
    stats: SimStats,
    vehicles: Vec<Vehicle>,
    /// Most recent advisory (or fallback) plan; the controller adopts it at
    /// cycle boundaries
    latest_plan: TimingPlan,
    tick: u64,
    next_id: usize,
}

impl SimWorld {
    /// Create a world with OS-seeded randomness and the built-in local
    /// advisor
    pub fn new(config: SimConfig) -> Self {
        Self::new_internal(config, StdRng::from_os_rng(), LocalQueueAdvisor)
    }

    /// Create a reproducible world: same seed, same advisory responses,
    /// same run
    pub fn new_with_seed(config: SimConfig, seed: u64) -> Self {
        Self::new_internal(config, StdRng::seed_from_u64(seed), LocalQueueAdvisor)
    }

    /// Create a reproducible world driven by a custom advisory service
    pub fn new_with_advisor<S>(config: SimConfig, seed: u64, service: S) -> Self
    where
        S: AdvisoryService + 'static,
    {
        Self::new_internal(config, StdRng::seed_from_u64(seed), service)
    }

    fn new_internal<S>(config: SimConfig, mut master: StdRng, service: S) -> Self
    where
        S: AdvisoryService + 'static,
    {
        // Each randomized component gets its own generator derived from the
        // master seed.
        let weather = WeatherModel::new(StdRng::from_rng(&mut master));
        let preemption = EmergencyPreemption::new(StdRng::from_rng(&mut master));
        let spawner = VehicleSpawner::new(StdRng::from_rng(&mut master));

        let advisory = AdvisoryClient::new(service, config.advisory_timeout);
        let signal = SignalController::new(&config.signal);
        let latest_plan = TimingPlan::fallback(&config.signal);

        Self {
            config,
            weather,
            preemption,
            advisory,
            signal,
            spawner,
            stats: SimStats::new(),
            vehicles: Vec::new(),
            latest_plan,
            tick: 0,
            next_id: 0,
        }
    }

    fn next_vehicle_id(&mut self) -> VehicleId {
        let id = VehicleId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Admit a vehicle if the spacing-safety check passes
    ///
    /// Returns false and drops the vehicle when an existing same-direction,
    /// same-lane vehicle is too close to its spawn position.
    pub fn try_admit(&mut self, vehicle: Vehicle) -> bool {
        if !spacing_clear(&self.vehicles, &vehicle, self.config.gap) {
            return false;
        }
        self.vehicles.push(vehicle);
        true
    }

    /// Main simulation tick
    pub fn tick(&mut self) {
        self.weather.tick(&self.config);

        if let Some((direction, lane)) = self.preemption.tick(&self.config) {
            let id = self.next_vehicle_id();
            let vehicle = Vehicle::new(
                id,
                lane,
                VehicleClass::Emergency,
                direction,
                false,
                &self.config,
            );
            if self.try_admit(vehicle) {
                debug!("emergency vehicle {id:?} dispatched {direction:?} lane {lane}");
                self.preemption.confirm_dispatch();
            }
        }
        self.preemption.refresh(&self.vehicles);

        // The advisory result is applied before the controller transition
        // check; on timeout or unusable content this is the fallback plan.
        let request = self.advisory_request();
        self.latest_plan = self.advisory.request_plan(&request, &self.config.signal);

        self.signal.tick(&self.latest_plan);

        self.update_vehicles();

        if let Some(attrs) = self.spawner.tick(self.vehicles.len(), &self.config) {
            let id = self.next_vehicle_id();
            let vehicle = Vehicle::new(
                id,
                attrs.lane,
                attrs.class,
                attrs.direction,
                attrs.will_turn,
                &self.config,
            );
            // Rejected spawns are dropped silently; there is no retry this
            // tick.
            self.try_admit(vehicle);
        }

        self.stats.sample_waits(&self.vehicles, self.config.wait_samples);
        self.tick += 1;
    }

    fn update_vehicles(&mut self) {
        let modifier = self.weather.speed_modifier();

        // Freeze positions before mutating anything so every blocked check
        // sees one consistent pre-tick state.
        let frozen: Vec<VehicleView> = self.vehicles.iter().map(Vehicle::view).collect();

        for (index, vehicle) in self.vehicles.iter_mut().enumerate() {
            let gap_ahead = nearest_gap_ahead(&frozen, index);
            let was_crossed = vehicle.crossed;
            vehicle.step(&self.signal, gap_ahead, modifier, &self.config);
            if !was_crossed && vehicle.crossed {
                self.stats.record_crossing(self.tick, vehicle.direction);
            }
        }

        self.vehicles.retain(|vehicle| {
            let keep = vehicle.in_bounds();
            if !keep {
                trace!("vehicle {:?} left the simulation area", vehicle.id);
            }
            keep
        });
    }

    fn advisory_request(&mut self) -> AdvisoryRequest {
        let waiting = self.waiting_counts();
        let congestion =
            waiting.map(|count| (count as f32 * CONGESTION_PER_VEHICLE).min(1.0));
        let flow_rates = self.stats.flow_rates(self.tick, self.config.flow_window);
        let hour_of_day =
            ((u64::from(self.config.start_hour) + self.tick / self.config.ticks_per_hour) % 24)
                as u8;

        AdvisoryRequest {
            waiting,
            flow_rates,
            congestion,
            hour_of_day,
        }
    }

    /// Un-crossed vehicles per direction
    fn waiting_counts(&self) -> [u32; 4] {
        let mut counts = [0u32; 4];
        for vehicle in &self.vehicles {
            if !vehicle.crossed {
                counts[vehicle.direction.index()] += 1;
            }
        }
        counts
    }

    /// Copy-out view of the entire simulation state
    ///
    /// The snapshot is owned by the caller; mutating it has no effect on the
    /// simulation.
    pub fn snapshot(&self) -> SimSnapshot {
        let (rain, fog, wind) = self.weather.intensities();
        SimSnapshot {
            tick: self.tick,
            vehicles: self.vehicles.iter().map(Vehicle::view).collect(),
            signal: SignalView {
                current_green: self.signal.current_green(),
                yellow_active: self.signal.yellow_active(),
                green_times: self.signal.plan().green_times,
                cycle_length: self.signal.plan().cycle_length,
            },
            weather: WeatherView {
                rain,
                fog,
                wind,
                speed_modifier: self.weather.speed_modifier(),
            },
            stats: StatsView {
                total_crossed: self.stats.total_crossed(),
                average_wait: self.stats.average_wait(),
                throughput: self.stats.throughput(self.tick),
            },
            emergency_active: self.preemption.is_active(),
        }
    }

    /// Number of completed ticks
    pub fn elapsed_ticks(&self) -> u64 {
        self.tick
    }

    /// The vehicles currently in the simulation
    pub fn vehicles(&self) -> &[Vehicle] {
        &self.vehicles
    }

    /// The signal controller state
    pub fn signal(&self) -> &SignalController {
        &self.signal
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    /// Print a summary of the world state
    pub fn print_summary(&self) {
        let snapshot = self.snapshot();
        let waiting: u32 = self.waiting_counts().iter().sum();

        println!("=== Intersection Summary (tick {}) ===", snapshot.tick);
        println!(
            "Vehicles: {} active, {} waiting at the line",
            snapshot.vehicles.len(),
            waiting
        );
        println!(
            "Signal: {:?} {}",
            snapshot.signal.current_green,
            if snapshot.signal.yellow_active {
                "(yellow)"
            } else {
                "(green)"
            }
        );
        println!(
            "Plan: greens {:?}, cycle {} ticks",
            snapshot.signal.green_times, snapshot.signal.cycle_length
        );
        println!(
            "Weather: rain {:.2}, fog {:.2}, wind {:.2} -> speed x{:.2}",
            snapshot.weather.rain,
            snapshot.weather.fog,
            snapshot.weather.wind,
            snapshot.weather.speed_modifier
        );
        println!(
            "Crossed: {}, avg wait {:.1} ticks, throughput {:.3}/tick",
            snapshot.stats.total_crossed, snapshot.stats.average_wait, snapshot.stats.throughput
        );
        if snapshot.emergency_active {
            println!("Emergency vehicle in transit");
        }
    }
}

/// Euclidean distance to the nearest un-crossed vehicle ahead of the subject
/// in the same direction and lane, measured on the frozen pre-tick positions
fn nearest_gap_ahead(frozen: &[VehicleView], subject_index: usize) -> Option<f32> {
    let subject = &frozen[subject_index];
    frozen
        .iter()
        .enumerate()
        .filter(|(index, other)| {
            *index != subject_index
                && other.direction == subject.direction
                && other.lane == subject.lane
                && !other.crossed
                && is_ahead(subject, other)
        })
        .map(|(_, other)| OrderedFloat(subject.position.distance(&other.position)))
        .min()
        .map(OrderedFloat::into_inner)
}

fn is_ahead(subject: &VehicleView, other: &VehicleView) -> bool {
    match subject.direction {
        Direction::Right => other.position.x > subject.position.x,
        Direction::Down => other.position.y > subject.position.y,
        Direction::Left => other.position.x < subject.position.x,
        Direction::Up => other.position.y < subject.position.y,
    }
}
