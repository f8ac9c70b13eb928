//! Trajectory prediction with input-hash caching (spec.md §4.F).
//!
//! The teacher's `prediction::PredictionState`/`PredictionSettings` owns a
//! single-slot cache the same shape this keeps (§9 REDESIGN FLAGS: "model
//! caches as owned structs held by the predictor ... not as module
//! globals"), but propagates via N-body Velocity Verlet
//! (`physics::integrator`). This predictor instead samples the
//! closed-form Kepler solution each step and applies thrust as a
//! state-vector delta-v (`thrust_step::apply_thrust_step`), per spec.md's
//! patched-conics design.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::time::{Duration, Instant};

use glam::DVec3;

use crate::body::CelestialBody;
use crate::constants::{
    EXTREME_ECCENTRICITY_THRESHOLD, MAX_HELIOCENTRIC_RADIUS_AU, MIN_HELIOCENTRIC_RADIUS_AU,
    PREDICTOR_SOI_EXIT_FACTOR, TRAJECTORY_CACHE_TTL_MS,
};
use crate::elements::OrbitalElements;
use crate::kepler::{position, velocity};
use crate::sail::{self, SailState};
use crate::ship::ExtremeFlybyState;
use crate::soi::SoiState;
use crate::thrust_step::apply_thrust_step;

/// Why a trajectory sample was the last one retained.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TruncationTag {
    SoiExit,
    MaxDistance,
    SunApproach,
    OrbitalInstability,
    EccentricInstability,
}

/// One point on a predicted trajectory. Always heliocentric (§4.F output
/// contract), even when the ship is propagated inside an SOI.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TrajectorySample {
    pub position: DVec3,
    pub time: f64,
}

/// A predicted trajectory, with an optional tag on why it ended early.
#[derive(Clone, Debug, PartialEq)]
pub struct Trajectory {
    pub samples: Vec<TrajectorySample>,
    pub truncation: Option<TruncationTag>,
}

/// Everything that affects the shape of a predicted polyline; hashed to
/// drive the cache (§4.F "Caching").
#[derive(Clone, Copy, Debug)]
pub struct PredictorInput {
    pub elements: OrbitalElements,
    pub sail: SailState,
    pub mass_kg: f64,
    pub start_time: f64,
    pub duration_days: f64,
    pub steps: usize,
    pub soi_state: SoiState,
    pub extreme_flyby: Option<ExtremeFlybyState>,
}

fn hash_f64<H: Hasher>(hasher: &mut H, x: f64) {
    x.to_bits().hash(hasher);
}

/// Hash every field that affects the output polyline. Start time is
/// rounded to the millisecond first (§5 determinism: "given identical
/// inputs ... at millisecond rounding, all core outputs are bit-identical").
fn hash_input(input: &PredictorInput) -> u64 {
    let mut hasher = DefaultHasher::new();
    let e = &input.elements;
    hash_f64(&mut hasher, e.semi_major_axis);
    hash_f64(&mut hasher, e.eccentricity);
    hash_f64(&mut hasher, e.inclination);
    hash_f64(&mut hasher, e.raan);
    hash_f64(&mut hasher, e.arg_periapsis);
    hash_f64(&mut hasher, e.mean_anomaly_at_epoch);
    hash_f64(&mut hasher, e.epoch);
    hash_f64(&mut hasher, e.mu);

    hash_f64(&mut hasher, input.sail.area_m2);
    hash_f64(&mut hasher, input.sail.reflectivity);
    hash_f64(&mut hasher, input.sail.yaw);
    hash_f64(&mut hasher, input.sail.pitch);
    hash_f64(&mut hasher, input.sail.deployment);
    hash_f64(&mut hasher, input.sail.condition);
    input.sail.sail_count.hash(&mut hasher);

    hash_f64(&mut hasher, input.mass_kg);

    let rounded_start_ms = (input.start_time * 86_400_000.0).round() as i64;
    rounded_start_ms.hash(&mut hasher);
    hash_f64(&mut hasher, input.duration_days);
    input.steps.hash(&mut hasher);

    input.soi_state.parent_body.hash(&mut hasher);
    match input.extreme_flyby {
        Some(flyby) => {
            1u8.hash(&mut hasher);
            hash_f64(&mut hasher, flyby.entry_time);
        }
        None => 0u8.hash(&mut hasher),
    }

    hasher.finish()
}

/// Single-slot trajectory cache, owned by the caller (§9 REDESIGN FLAGS).
pub struct TrajectoryCache {
    entry: Option<(u64, Instant, Trajectory)>,
}

impl TrajectoryCache {
    pub fn new() -> Self {
        Self { entry: None }
    }

    fn get(&self, hash: u64) -> Option<&Trajectory> {
        let (entry_hash, inserted_at, trajectory) = self.entry.as_ref()?;
        if *entry_hash == hash && inserted_at.elapsed() < Duration::from_millis(TRAJECTORY_CACHE_TTL_MS) {
            Some(trajectory)
        } else {
            None
        }
    }

    fn put(&mut self, hash: u64, trajectory: Trajectory) {
        self.entry = Some((hash, Instant::now(), trajectory));
    }
}

impl Default for TrajectoryCache {
    fn default() -> Self {
        Self::new()
    }
}

fn elements_are_finite(e: &OrbitalElements) -> bool {
    e.semi_major_axis.is_finite()
        && e.eccentricity.is_finite()
        && e.inclination.is_finite()
        && e.raan.is_finite()
        && e.arg_periapsis.is_finite()
        && e.mean_anomaly_at_epoch.is_finite()
}

/// Predict a trajectory, consulting `cache` first (§4.F). `parent` is the
/// SOI body the ship is currently inside, if any — required when
/// `input.soi_state.is_in_soi()`, ignored otherwise.
pub fn predict(input: &PredictorInput, cache: &mut TrajectoryCache, parent: Option<&CelestialBody>) -> Trajectory {
    let hash = hash_input(input);
    if let Some(cached) = cache.get(hash) {
        return cached.clone();
    }

    let trajectory = predict_uncached(input, parent);
    cache.put(hash, trajectory.clone());
    trajectory
}

fn predict_uncached(input: &PredictorInput, parent: Option<&CelestialBody>) -> Trajectory {
    let steps = input.steps.max(1);
    let dt = input.duration_days / steps as f64;
    let in_soi = input.soi_state.is_in_soi();
    let soi_radius = parent.map(|p| p.soi_radius_au).unwrap_or(f64::INFINITY);

    let mut elements = input.elements;
    let mut extreme_flyby = input.extreme_flyby;
    let mut samples = Vec::with_capacity(steps + 1);
    let mut truncation = None;

    for i in 0..=steps {
        let t_i = input.start_time + i as f64 * dt;

        let using_flyby = in_soi
            && extreme_flyby.is_some()
            && elements.eccentricity > EXTREME_ECCENTRICITY_THRESHOLD;

        let pos_local = if using_flyby {
            let flyby = extreme_flyby.unwrap();
            flyby.entry_pos + flyby.entry_vel * (t_i - flyby.entry_time)
        } else {
            position(&elements, t_i)
        };

        if !pos_local.is_finite() {
            tracing::info!(time = t_i, "trajectory position went non-finite, truncating");
            truncation = Some(TruncationTag::OrbitalInstability);
            break;
        }

        let d_local = pos_local.length();

        let parent_state_at_ti = parent.and_then(|p| {
            p.elements.as_ref().map(|pe| (position(pe, t_i), velocity(pe, t_i)))
        });

        let helio_pos = if in_soi {
            match parent_state_at_ti {
                Some((parent_pos, _)) => parent_pos + pos_local,
                None => pos_local,
            }
        } else {
            pos_local
        };
        let d_helio = helio_pos.length();

        let mut stop_tag = None;
        if in_soi && d_local > soi_radius * PREDICTOR_SOI_EXIT_FACTOR {
            stop_tag = Some(TruncationTag::SoiExit);
        }
        if stop_tag.is_none() && d_helio > MAX_HELIOCENTRIC_RADIUS_AU {
            stop_tag = Some(TruncationTag::MaxDistance);
        }
        if stop_tag.is_none() && d_helio < 2.0 * MIN_HELIOCENTRIC_RADIUS_AU {
            stop_tag = Some(TruncationTag::SunApproach);
        }
        if stop_tag.is_none() && !elements_are_finite(&elements) {
            stop_tag = Some(TruncationTag::OrbitalInstability);
        }
        if stop_tag.is_none()
            && !using_flyby
            && (elements.eccentricity < 0.0 || elements.eccentricity > EXTREME_ECCENTRICITY_THRESHOLD)
        {
            stop_tag = Some(TruncationTag::EccentricInstability);
        }

        if let Some(tag) = stop_tag {
            tracing::info!(time = t_i, ?tag, "trajectory truncated");
            truncation = Some(tag);
            break;
        }

        samples.push(TrajectorySample { position: helio_pos, time: t_i });

        let is_last_step = i == steps;
        let near_sun = d_helio < 2.0 * MIN_HELIOCENTRIC_RADIUS_AU;
        let sail_active = input.sail.effective_area() > 0.0 && input.mass_kg > 0.0;

        if !is_last_step && sail_active && !near_sun && !using_flyby {
            let v_local = velocity(&elements, t_i);

            let (helio_r, helio_v) = if in_soi {
                match parent_state_at_ti {
                    Some((parent_pos, parent_vel)) => (parent_pos + pos_local, parent_vel + v_local),
                    None => (pos_local, v_local),
                }
            } else {
                (pos_local, v_local)
            };

            let accel = sail::acceleration(&input.sail, input.mass_kg, helio_r, helio_v);
            let candidate = apply_thrust_step(&elements, accel, dt, t_i, in_soi);

            if !elements_are_finite(&candidate) {
                tracing::info!(time = t_i, "post-thrust elements went non-finite, truncating");
                truncation = Some(TruncationTag::OrbitalInstability);
                break;
            }
            if candidate.eccentricity < 0.0 || candidate.eccentricity > EXTREME_ECCENTRICITY_THRESHOLD {
                tracing::info!(time = t_i, eccentricity = candidate.eccentricity, "post-thrust eccentricity unstable, truncating");
                truncation = Some(TruncationTag::EccentricInstability);
                break;
            }

            elements = candidate;
        }
    }

    if extreme_flyby.is_some() && !in_soi {
        extreme_flyby = None;
    }

    Trajectory { samples, truncation }
}
