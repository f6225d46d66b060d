//! Signal controller: the ring state machine over the four approaches
//!
//! Exactly one direction holds a green or yellow phase at any tick; the
//! others are red. Directions take turns in a fixed round-robin order, and
//! demand only stretches each turn's duration through the applied
//! [`TimingPlan`], never the order.

use super::config::SignalTiming;
use super::types::Direction;

/// Per-direction green durations plus the derived cycle length, in ticks
///
/// Produced by the advisory layer (or its fallback policy) and applied by
/// the controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimingPlan {
    pub green_times: [u32; 4],
    pub cycle_length: u32,
}

impl TimingPlan {
    /// Build a plan from explicit green times; the cycle length is the sum
    /// of the greens plus one yellow phase per direction
    pub fn from_green_times(green_times: [u32; 4], timing: &SignalTiming) -> Self {
        let yellow_total = Direction::ALL.len() as u32 * timing.yellow;
        let cycle_length = green_times.iter().sum::<u32>() + yellow_total;
        Self {
            green_times,
            cycle_length,
        }
    }

    /// Build a plan from per-direction waiting counts: each green is the
    /// base green plus two ticks per waiting vehicle, clamped to the
    /// configured bounds
    pub fn from_waiting_counts(counts: [u32; 4], timing: &SignalTiming) -> Self {
        let green_times = counts.map(|count| {
            (timing.base_green + 2 * count).clamp(timing.min_green, timing.max_green)
        });
        Self::from_green_times(green_times, timing)
    }

    /// The deterministic plan substituted whenever the advisory service is
    /// unavailable or unusable; pure and side-effect-free
    pub fn fallback(timing: &SignalTiming) -> Self {
        Self::from_green_times([timing.default_green; 4], timing)
    }
}

/// The authoritative signal state machine
///
/// Mutated only by [`tick`](Self::tick), once per simulation tick. The
/// applied plan is pinned for a whole cycle: a new advisory plan is adopted
/// only at the cycle boundary, so a mid-cycle change of cycle length can
/// never skip or repeat a transition.
#[derive(Debug, Clone)]
pub struct SignalController {
    current_green: Direction,
    yellow_active: bool,
    plan: TimingPlan,
    ticks_into_cycle: u32,
    yellow_ticks: u32,
}

impl SignalController {
    /// Start with the first direction green under the fallback plan
    pub fn new(timing: &SignalTiming) -> Self {
        Self {
            current_green: Direction::ALL[0],
            yellow_active: false,
            plan: TimingPlan::fallback(timing),
            ticks_into_cycle: 0,
            yellow_ticks: timing.yellow,
        }
    }

    /// Whether vehicles travelling `direction` currently hold green or yellow
    pub fn grants(&self, direction: Direction) -> bool {
        self.current_green == direction
    }

    /// Advance the state machine one tick
    ///
    /// At the cycle boundary the controller pins `latest_plan` and enters
    /// yellow for the outgoing direction; when the yellow duration elapses
    /// the next direction in the ring receives green. No phase change is
    /// evaluated while yellow is active.
    pub fn tick(&mut self, latest_plan: &TimingPlan) {
        if self.yellow_active {
            if self.ticks_into_cycle >= self.yellow_ticks {
                self.yellow_active = false;
                self.current_green = self.current_green.next();
            }
        } else if self.ticks_into_cycle >= self.plan.cycle_length {
            self.plan = latest_plan.clone();
            self.ticks_into_cycle = 0;
            self.yellow_active = true;
        }
        self.ticks_into_cycle += 1;
    }

    /// The direction currently holding the green or yellow phase
    pub fn current_green(&self) -> Direction {
        self.current_green
    }

    pub fn yellow_active(&self) -> bool {
        self.yellow_active
    }

    /// The plan applied to the current cycle
    pub fn plan(&self) -> &TimingPlan {
        &self.plan
    }
}
