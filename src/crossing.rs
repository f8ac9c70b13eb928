//! Ghost-planet crossing detection (spec.md §4.G).
//!
//! The teacher has no analogue (it renders deflection outcomes, not future
//! orbit-crossing markers); this module is built fresh, grounded loosely on
//! `lambert.rs`'s bisection-refinement style (narrow a bracket, then solve
//! a closed form inside it) even though Lambert's problem itself is out of
//! scope here. Per spec.md §9's Open Questions, the two co-existing
//! detector designs are unified into the hybrid inclination-threshold
//! approach specified below; the high-eccentricity perihelion/aphelion-only
//! branch is deliberately not kept.

use std::collections::HashSet;

use glam::DVec3;

use crate::body::CelestialBody;
use crate::constants::{LOW_INCLINATION_THRESHOLD_RAD, MAX_CROSSINGS};
use crate::ephemeris::{heliocentric_state, EphemerisOracle};
use crate::kepler::position;
use crate::predictor::Trajectory;

/// Margin (AU) added to the trajectory's radial envelope and to the
/// orbital-plane-crossing radius check (§4.G).
const RADIAL_MARGIN_AU: f64 = 0.02;

/// Fraction of segment length below which both endpoint signed distances
/// are treated as "on the plane" and the detector falls back to the
/// radial-shell method (§4.G step 3).
const PLANE_FALLBACK_FRACTION: f64 = 0.001;

/// Magnitude below which a negative quadratic discriminant is clamped to
/// zero (tangent case, §4.G step 4 / §8 stability).
const DISCRIMINANT_EPSILON: f64 = 1e-10;

/// Zoom-adaptive precision knobs (§4.G "Zoom-adaptive sampling").
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CrossingConfig {
    pub segment_stride: usize,
    pub bisection_iterations: u32,
    pub dedup_rounding_days: f64,
}

impl CrossingConfig {
    pub fn high_zoom() -> Self {
        Self { segment_stride: 1, bisection_iterations: 10, dedup_rounding_days: 0.001 }
    }

    pub fn low_zoom() -> Self {
        Self { segment_stride: 4, bisection_iterations: 4, dedup_rounding_days: 1.0 }
    }

    /// Pick a config for a normalized zoom level (`0.0` = fully zoomed out,
    /// `1.0` = fully zoomed in), the way the teacher's
    /// `PredictionConfig::for_dragging` picks a named preset instead of
    /// interpolating continuously.
    pub fn for_zoom(zoom: f64) -> Self {
        if zoom < 0.5 {
            Self::low_zoom()
        } else {
            Self::high_zoom()
        }
    }
}

impl Default for CrossingConfig {
    fn default() -> Self {
        Self::high_zoom()
    }
}

/// One ghost-planet encounter marker (§3 Intersection / Encounter Marker).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EncounterMarker {
    pub body_name: &'static str,
    pub time: f64,
    pub body_position_at_time: DVec3,
    pub trajectory_position_at_crossing: DVec3,
    /// Always 0: by construction the crossing point lies on the body's
    /// orbital shell, not at a measured separation (§4.G step 7).
    pub distance: f64,
}

struct Candidate {
    body: &'static str,
    time: f64,
    point: DVec3,
}

fn orbital_plane_normal(inclination: f64, raan: f64) -> DVec3 {
    DVec3::new(raan.sin() * inclination.sin(), -raan.cos() * inclination.sin(), inclination.cos())
}

/// Solve `|p1 + t*(p2-p1)|^2 = target_radius^2` for `t`, preferring the
/// real root nearest `bracket_hint` (disambiguates a segment that crosses
/// the shell twice). Falls back to linear interpolation if the quadratic
/// degenerates (§4.G step 4).
fn solve_radial_crossing(p1: DVec3, p2: DVec3, target_radius: f64, bracket_hint: f64) -> Option<f64> {
    let d = p2 - p1;
    let a = d.dot(d);
    let b = 2.0 * p1.dot(d);
    let c = p1.dot(p1) - target_radius * target_radius;

    if a.abs() < 1e-18 {
        let r1 = p1.length();
        let r2 = p2.length();
        if (r2 - r1).abs() < 1e-18 {
            return None;
        }
        return Some(((target_radius - r1) / (r2 - r1)).clamp(0.0, 1.0));
    }

    let mut discriminant = b * b - 4.0 * a * c;
    if discriminant < 0.0 && discriminant.abs() < DISCRIMINANT_EPSILON {
        discriminant = 0.0;
    }
    if discriminant < 0.0 {
        return None;
    }

    let sqrt_disc = discriminant.sqrt();
    let t1 = (-b - sqrt_disc) / (2.0 * a);
    let t2 = (-b + sqrt_disc) / (2.0 * a);

    let in_range = |t: f64| (-1e-9..=1.0 + 1e-9).contains(&t);
    match (in_range(t1), in_range(t2)) {
        (true, true) => {
            if (t1 - bracket_hint).abs() <= (t2 - bracket_hint).abs() {
                Some(t1.clamp(0.0, 1.0))
            } else {
                Some(t2.clamp(0.0, 1.0))
            }
        }
        (true, false) => Some(t1.clamp(0.0, 1.0)),
        (false, true) => Some(t2.clamp(0.0, 1.0)),
        (false, false) => None,
    }
}

/// Radial-shell crossing test at target radius `a` (the body's semi-major
/// axis), used directly for low-inclination bodies and as the fallback
/// when the orbital-plane test is inconclusive (§4.G steps 3-4).
fn radial_shell_crossing(p1: DVec3, p2: DVec3, target_radius: f64, config: &CrossingConfig) -> Option<f64> {
    let r1 = p1.length();
    let r2 = p2.length();

    let straddles = (r1 <= target_radius && r2 >= target_radius) || (r1 >= target_radius && r2 <= target_radius);
    let degenerate = (r1 - target_radius).abs() < 1e-15 && (r2 - target_radius).abs() < 1e-15;
    if !straddles || degenerate {
        return None;
    }

    let (mut t_lo, mut t_hi) = (0.0_f64, 1.0_f64);
    let (mut r_lo, mut _r_hi) = (r1, r2);

    for _ in 0..config.bisection_iterations {
        let t_mid = (t_lo + t_hi) / 2.0;
        let p_mid = p1 + t_mid * (p2 - p1);
        let r_mid = p_mid.length();

        let lower_half_straddles =
            (r_lo <= target_radius && r_mid >= target_radius) || (r_lo >= target_radius && r_mid <= target_radius);

        if lower_half_straddles {
            t_hi = t_mid;
            _r_hi = r_mid;
        } else {
            t_lo = t_mid;
            r_lo = r_mid;
        }
    }

    let bracket_hint = (t_lo + t_hi) / 2.0;
    solve_radial_crossing(p1, p2, target_radius, bracket_hint)
}

fn orbital_plane_crossing(
    p1: DVec3,
    p2: DVec3,
    inclination: f64,
    raan: f64,
    perihelion: f64,
    aphelion: f64,
) -> Option<(f64, DVec3)> {
    let normal = orbital_plane_normal(inclination, raan);
    let d1 = normal.dot(p1);
    let d2 = normal.dot(p2);

    if d1 * d2 > 0.0 {
        return None;
    }

    let seg_len = (p2 - p1).length();
    if seg_len < 1e-15 {
        return None;
    }
    if d1.abs() < PLANE_FALLBACK_FRACTION * seg_len && d2.abs() < PLANE_FALLBACK_FRACTION * seg_len {
        return None; // signal to caller: fall back to radial-shell
    }

    let denom = d2 - d1;
    if denom.abs() < 1e-18 {
        return None;
    }
    let t = (-d1 / denom).clamp(0.0, 1.0);
    let point = p1 + t * (p2 - p1);
    let r = point.length();

    if r < perihelion - RADIAL_MARGIN_AU / 4.0 || r > aphelion + RADIAL_MARGIN_AU / 4.0 {
        return None;
    }

    Some((t, point))
}

/// Detect where `trajectory` crosses each body's orbital plane (or radial
/// shell, for near-zero inclination), filtered to crossings at or after
/// `active_time` and optionally restricted to a single body
/// (`soi_body_filter`).
pub fn detect_crossings(
    trajectory: &Trajectory,
    bodies: &[CelestialBody],
    active_time: f64,
    soi_body_filter: Option<&str>,
    config: &CrossingConfig,
    oracle: Option<&dyn EphemerisOracle>,
) -> Vec<EncounterMarker> {
    if trajectory.samples.len() < 2 {
        return Vec::new();
    }

    let r_min = trajectory.samples.iter().map(|s| s.position.length()).fold(f64::INFINITY, f64::min);
    let r_max = trajectory.samples.iter().map(|s| s.position.length()).fold(0.0, f64::max);
    let envelope = (r_min - RADIAL_MARGIN_AU, r_max + RADIAL_MARGIN_AU);

    let mut candidate_bodies: Vec<&CelestialBody> = bodies
        .iter()
        .filter(|b| b.elements.is_some())
        .filter(|b| soi_body_filter.is_none_or(|name| b.name == name))
        .filter(|b| {
            let e = b.elements.as_ref().unwrap();
            if e.eccentricity >= 1.0 {
                return false; // unbounded orbit has no perihelion/aphelion shell
            }
            let perihelion = e.semi_major_axis * (1.0 - e.eccentricity);
            let aphelion = e.semi_major_axis * (1.0 + e.eccentricity);
            aphelion >= envelope.0 && perihelion <= envelope.1
        })
        .collect();

    candidate_bodies.sort_by(|a, b| {
        a.elements.unwrap().semi_major_axis.partial_cmp(&b.elements.unwrap().semi_major_axis).unwrap()
    });

    let mut candidates: Vec<Candidate> = Vec::new();

    for body in &candidate_bodies {
        let elements = body.elements.as_ref().unwrap();
        let perihelion = elements.semi_major_axis * (1.0 - elements.eccentricity);
        let aphelion = elements.semi_major_axis * (1.0 + elements.eccentricity);
        let low_inclination = elements.inclination.abs() < LOW_INCLINATION_THRESHOLD_RAD;

        let mut idx = 0;
        while idx + config.segment_stride < trajectory.samples.len() {
            let p1 = trajectory.samples[idx];
            let p2 = trajectory.samples[idx + config.segment_stride];
            idx += config.segment_stride;

            if p2.time < active_time {
                continue;
            }

            let hit = if low_inclination {
                radial_shell_crossing(p1.position, p2.position, elements.semi_major_axis, config)
                    .map(|t| (t, p1.position + t * (p2.position - p1.position)))
            } else {
                match orbital_plane_crossing(p1.position, p2.position, elements.inclination, elements.raan, perihelion, aphelion) {
                    Some(hit) => Some(hit),
                    None => radial_shell_crossing(p1.position, p2.position, elements.semi_major_axis, config)
                        .map(|t| (t, p1.position + t * (p2.position - p1.position))),
                }
            };

            if let Some((t, point)) = hit {
                let time = p1.time + t * (p2.time - p1.time);
                candidates.push(Candidate { body: body.name, time, point });
            }
        }
    }

    let mut seen: HashSet<(&'static str, i64)> = HashSet::new();
    let mut markers = Vec::new();

    for candidate in candidates {
        let rounded = (candidate.time / config.dedup_rounding_days).round() as i64;
        if !seen.insert((candidate.body, rounded)) {
            continue;
        }

        let body_elements_position = |jd: f64| -> DVec3 {
            bodies
                .iter()
                .find(|b| b.name == candidate.body)
                .and_then(|b| b.elements.as_ref())
                .map(|e| position(e, jd))
                .unwrap_or(DVec3::ZERO)
        };

        let body_position_at_time = heliocentric_state(oracle, bodies, candidate.body, candidate.time)
            .map(|s| s.position)
            .unwrap_or_else(|| body_elements_position(candidate.time));

        markers.push(EncounterMarker {
            body_name: candidate.body,
            time: candidate.time,
            body_position_at_time,
            trajectory_position_at_crossing: candidate.point,
            distance: 0.0,
        });
    }

    markers.sort_by(|a, b| a.time.partial_cmp(&b.time).unwrap());
    markers.truncate(MAX_CROSSINGS);
    markers
}
