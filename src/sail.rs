//! Solar sail thrust model (spec.md §4.C).
//!
//! Grounded on the teacher's `continuous::thrust` module: same
//! inverse-square solar-pressure shape as `solar_sail_thrust`/
//! `solar_sail_acceleration`, generalized from a fixed-direction (ablation,
//! ion beam, gravity tractor are all scalar-thrust-along-a-direction) model
//! to the 2-DOF (yaw, pitch) steerable sail spec.md §3 describes, and from
//! 2D (`DVec2`) to full 3D with an RTN frame built from `(r, v)` the way
//! `compute_thrust_direction`'s `Radial`/`AntiRadial` variants build a
//! perpendicular from velocity, generalized to three dimensions via the
//! angular-momentum normal.

use glam::DVec3;

use crate::constants::{MIN_HELIOCENTRIC_RADIUS_AU, SOLAR_PRESSURE_AT_1AU};

const SECONDS_PER_DAY: f64 = 86_400.0;
const METERS_PER_AU: f64 = crate::constants::AU_TO_KM * 1000.0;

/// Threshold below which the angular-momentum vector is too small to trust
/// as a normal direction (near-radial trajectory); the ecliptic `+Z` is
/// used instead (§4.C).
const DEGENERATE_ANGULAR_MOMENTUM: f64 = 1e-10;

/// Sail configuration and condition, one per ship.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SailState {
    /// Sail area, square meters.
    pub area_m2: f64,
    /// Reflectivity coefficient, `[0, 1]` (1 = perfect mirror).
    pub reflectivity: f64,
    /// Yaw angle, radians, clamped to `[-pi/2, pi/2]` (§6).
    pub yaw: f64,
    /// Pitch angle, radians, clamped to `[-pi/2, pi/2]` (§6).
    pub pitch: f64,
    /// Deployment fraction, `[0, 1]` (§6 exposes this as a `[0,100]` percent
    /// at the host boundary; stored here as a fraction).
    pub deployment: f64,
    /// Structural condition fraction, `[0, 1]`; degrades under damage
    /// events the core does not itself model.
    pub condition: f64,
    /// Number of sail segments, `[1, 20]` (§6).
    pub sail_count: u32,
}

impl SailState {
    /// A fully deployed, undamaged, single-segment sail pointed flat to
    /// the Sun.
    pub fn new(area_m2: f64, reflectivity: f64) -> Self {
        Self {
            area_m2,
            reflectivity,
            yaw: 0.0,
            pitch: 0.0,
            deployment: 1.0,
            condition: 1.0,
            sail_count: 1,
        }
    }

    /// Effective reflecting area after deployment and condition derating.
    pub fn effective_area(&self) -> f64 {
        self.area_m2 * self.deployment * self.condition
    }
}

/// Solar radiation pressure at heliocentric distance `r` (AU), N/m^2.
/// `r` is clamped to a minimum of 0.01 AU to avoid a singularity at the
/// Sun (§4.C).
pub fn solar_pressure(r_au: f64) -> f64 {
    let r = r_au.abs().max(MIN_HELIOCENTRIC_RADIUS_AU);
    SOLAR_PRESSURE_AT_1AU / (r * r)
}

/// Thrust magnitude in Newtons at heliocentric distance `r_au`, for the
/// given sail and steering angles: `F = 2*P*A_eff*rho*cos^2(yaw)*cos^2(pitch)*sailCount`.
pub fn thrust_newtons(sail: &SailState, r_au: f64) -> f64 {
    let pressure = solar_pressure(r_au);
    let a_eff = sail.effective_area();
    let cos_yaw = sail.yaw.cos();
    let cos_pitch = sail.pitch.cos();

    2.0 * pressure * a_eff * sail.reflectivity * cos_yaw * cos_yaw * cos_pitch * cos_pitch
        * sail.sail_count as f64
}

/// Radial/Transverse/Normal frame at `(r, v)`. `N` falls back to the
/// ecliptic `+Z` when the angular-momentum vector is too small to define
/// an orbital plane (§4.C).
pub fn rtn_frame(r: DVec3, v: DVec3) -> (DVec3, DVec3, DVec3) {
    let radial = r.normalize_or_zero();
    let h = r.cross(v);
    let normal = if h.length() < DEGENERATE_ANGULAR_MOMENTUM {
        DVec3::Z
    } else {
        h.normalize()
    };
    let transverse = normal.cross(radial);
    (radial, transverse, normal)
}

/// Unit thrust direction for the given steering angles, built from the RTN
/// frame at `(r, v)`:
/// `d = cos(pitch)*[cos(yaw)*R + sin(yaw)*T] + sin(pitch)*N`.
///
/// Contract: never has a negative dot product with `R` — a flat sail
/// cannot pull sunward; the `cos^2` factors in `thrust_newtons` drive the
/// magnitude to zero as yaw/pitch approach +/-90 degrees rather than this
/// function flipping sign.
pub fn thrust_direction(r: DVec3, v: DVec3, yaw: f64, pitch: f64) -> DVec3 {
    let (radial, transverse, normal) = rtn_frame(r, v);
    let (sin_yaw, cos_yaw) = yaw.sin_cos();
    let (sin_pitch, cos_pitch) = pitch.sin_cos();

    cos_pitch * (cos_yaw * radial + sin_yaw * transverse) + sin_pitch * normal
}

/// Acceleration imparted by the sail at `(r, v)`, AU/day^2, for use
/// directly in §4.D's thrust-application step.
pub fn acceleration(sail: &SailState, mass_kg: f64, r: DVec3, v: DVec3) -> DVec3 {
    if mass_kg <= 0.0 {
        return DVec3::ZERO;
    }

    let r_au = r.length();
    let thrust_n = thrust_newtons(sail, r_au);
    let a_m_per_s2 = thrust_n / mass_kg;

    let a_au_per_day2 = a_m_per_s2 * (SECONDS_PER_DAY * SECONDS_PER_DAY) / METERS_PER_AU;
    let direction = thrust_direction(r, v, sail.yaw, sail.pitch);

    a_au_per_day2 * direction
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pressure_follows_inverse_square() {
        let p1 = solar_pressure(1.0);
        let p2 = solar_pressure(2.0);
        assert!((p1 / p2 - 4.0).abs() < 1e-9);
    }

    #[test]
    fn flat_sail_at_one_au_matches_reference_pressure() {
        assert!((solar_pressure(1.0) - SOLAR_PRESSURE_AT_1AU).abs() < 1e-12);
    }

    #[test]
    fn thrust_vanishes_at_ninety_degree_yaw() {
        let mut sail = SailState::new(1000.0, 1.0);
        sail.yaw = std::f64::consts::FRAC_PI_2;
        let f = thrust_newtons(&sail, 1.0);
        assert!(f.abs() < 1e-9);
    }

    #[test]
    fn direction_never_points_sunward() {
        let r = DVec3::new(1.0, 0.0, 0.0);
        let v = DVec3::new(0.0, 1.0, 0.0);
        for yaw in [-1.2, -0.5, 0.0, 0.5, 1.2] {
            for pitch in [-1.2, -0.5, 0.0, 0.5, 1.2] {
                let d = thrust_direction(r, v, yaw, pitch);
                let radial = r.normalize();
                assert!(d.dot(radial) >= -1e-12, "yaw={yaw} pitch={pitch} dot={}", d.dot(radial));
            }
        }
    }

    #[test]
    fn direction_is_unit_length() {
        let r = DVec3::new(0.5, 0.8, 0.1);
        let v = DVec3::new(-0.2, 0.1, 0.01);
        let d = thrust_direction(r, v, 0.3, -0.4);
        assert!((d.length() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn degenerate_angular_momentum_falls_back_to_ecliptic_normal() {
        let r = DVec3::new(1.0, 0.0, 0.0);
        let v = DVec3::new(1.0, 0.0, 0.0); // parallel to r: h = 0
        let (_, _, normal) = rtn_frame(r, v);
        assert_eq!(normal, DVec3::Z);
    }

    #[test]
    fn zero_mass_yields_zero_acceleration() {
        let sail = SailState::new(1000.0, 1.0);
        let a = acceleration(&sail, 0.0, DVec3::new(1.0, 0.0, 0.0), DVec3::new(0.0, 1.0, 0.0));
        assert_eq!(a, DVec3::ZERO);
    }
}
