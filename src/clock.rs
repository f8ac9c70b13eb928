//! Simulation clock and planning-mode snapshot/restore (spec.md §4.H).
//!
//! The teacher's `time::advance_time` advances a `SimulationTime` resource
//! by `delta_secs * scale * SECONDS_PER_DAY` each frame, with a `paused`
//! flag. This keeps the same day-scale vocabulary (renamed `time_scale`,
//! spec.md's "days per tick") but drops the separate `paused` flag in favor
//! of `time_scale == 0.0` meaning paused, per spec.md §4.H, and adds the
//! planning-mode snapshot the teacher has no equivalent of (§9 REDESIGN
//! FLAGS: "model the snapshot as a value type (deep copy) passed by move").

use crate::constants::PLANNING_OFFSET_MAX_DAYS;

/// A named time-scale preset (days advanced per tick).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpeedPreset {
    pub name: &'static str,
    pub days_per_tick: f64,
}

/// Default speed presets, slowest to fastest. `Paused` is `time_scale=0.0`.
pub const SPEED_PRESETS: &[SpeedPreset] = &[
    SpeedPreset { name: "paused", days_per_tick: 0.0 },
    SpeedPreset { name: "real_time", days_per_tick: 1.0 / 86_400.0 },
    SpeedPreset { name: "hour_per_tick", days_per_tick: 1.0 / 24.0 },
    SpeedPreset { name: "day_per_tick", days_per_tick: 1.0 },
    SpeedPreset { name: "week_per_tick", days_per_tick: 7.0 },
    SpeedPreset { name: "month_per_tick", days_per_tick: 30.0 },
];

/// The simulation's Julian-date clock.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SimulationClock {
    pub julian_date: f64,
    pub time_scale: f64,
    pub speed_preset: &'static str,
}

impl SimulationClock {
    pub fn new(julian_date: f64) -> Self {
        Self { julian_date, time_scale: 0.0, speed_preset: "paused" }
    }

    /// Advance by one tick.
    pub fn tick(&mut self) {
        self.julian_date += self.time_scale;
    }

    fn set_speed(&mut self, preset: SpeedPreset) {
        self.time_scale = preset.days_per_tick;
        self.speed_preset = preset.name;
    }
}

/// Planning-mode controller: snapshots a clock and an arbitrary piece of
/// "plannable" host state (ship elements, sail state, autopilot state,
/// camera target — whatever the host composes into `T`) on entry, and
/// restores it on exit. Generic over `T` so the core does not need to know
/// the concrete shape of the host's plannable state (§9 REDESIGN FLAGS).
pub struct PlanningController<T: Clone> {
    snapshot: Option<(SimulationClock, T)>,
    sandbox_offset_days: f64,
}

impl<T: Clone> PlanningController<T> {
    pub fn new() -> Self {
        Self { snapshot: None, sandbox_offset_days: 0.0 }
    }

    pub fn is_active(&self) -> bool {
        self.snapshot.is_some()
    }

    /// Enter planning mode: deep-copy `clock` and `state`, force
    /// `time_scale=0`. Idempotent — re-entering while already active is a
    /// no-op (spec.md §4.H: "Repeated entry/exit must be idempotent").
    pub fn enter(&mut self, clock: &mut SimulationClock, state: &T) {
        if self.is_active() {
            return;
        }
        self.snapshot = Some((*clock, state.clone()));
        self.sandbox_offset_days = 0.0;
        clock.time_scale = 0.0;
        clock.speed_preset = "paused";
    }

    /// Set the planning sandbox time offset, clamped to `[0, 730]` days
    /// (spec.md §4.H, §9 resolved open question). No-op while inactive.
    pub fn set_sandbox_offset(&mut self, days: f64) {
        if self.is_active() {
            self.sandbox_offset_days = days.clamp(0.0, PLANNING_OFFSET_MAX_DAYS);
        }
    }

    pub fn sandbox_offset(&self) -> f64 {
        self.sandbox_offset_days
    }

    /// The effective Julian date all physics/prediction/crossing-detection
    /// consumers must use while planning is active: `snapshot.jd +
    /// sandboxOffset`. `None` while inactive — callers fall back to the
    /// live clock (spec.md §4.H: "Ghost-planet time filter uses the
    /// effective date too").
    pub fn effective_date(&self) -> Option<f64> {
        self.snapshot.as_ref().map(|(clock, _)| clock.julian_date + self.sandbox_offset_days)
    }

    /// Exit planning mode: restore `clock` and `state` from the snapshot,
    /// reset the sandbox offset to 0. Idempotent — exiting while already
    /// inactive is a no-op.
    pub fn exit(&mut self, clock: &mut SimulationClock, state: &mut T) {
        if let Some((snap_clock, snap_state)) = self.snapshot.take() {
            *clock = snap_clock;
            *state = snap_state;
        }
        self.sandbox_offset_days = 0.0;
    }
}

impl<T: Clone> Default for PlanningController<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Set the clock's speed, unless planning mode is active (spec.md §4.H:
/// "Changing speed is blocked while in planning mode"). Returns whether the
/// change was applied.
pub fn set_speed<T: Clone>(clock: &mut SimulationClock, planning: &PlanningController<T>, preset: SpeedPreset) -> bool {
    if planning.is_active() {
        return false;
    }
    clock.set_speed(preset);
    true
}
