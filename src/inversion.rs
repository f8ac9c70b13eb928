//! Cartesian state -> Keplerian elements inversion (spec.md §4.B).
//!
//! The teacher only ever goes elements -> state (`ephemeris::kepler`); there
//! is no inverse in the source repo. This module is built fresh, in the same
//! pure-function, no-panics style as `ephemeris::kepler::KeplerOrbit`, with
//! the degenerate-case branches spec.md calls out explicitly.

use glam::DVec3;

use crate::constants::{CIRCULAR_ECCENTRICITY, MIN_SEMI_MAJOR_AXIS_HELIO_AU, MIN_SEMI_MAJOR_AXIS_IN_SOI_AU};
use crate::elements::{nudge_parabolic, wrap_angle, OrbitalElements};
use crate::kepler::hyperbolic_from_true_anomaly;

/// Threshold below which the node vector's magnitude is treated as zero
/// (equatorial orbit: inclination ~0 or ~pi, ascending node undefined).
const EQUATORIAL_NODE_THRESHOLD: f64 = 1e-10;

/// Invert a Cartesian state to orbital elements.
///
/// `in_soi` selects the minimum `|a|` floor (§4.B: `1e-6` AU inside an SOI,
/// `1e-4` AU heliocentric). On corrupt input (zero position or non-finite
/// velocity), returns `fallback` unchanged rather than producing garbage
/// elements (§7 "Corrupt elements" policy).
pub fn state_to_elements(
    position: DVec3,
    velocity: DVec3,
    mu: f64,
    epoch: f64,
    in_soi: bool,
    fallback: &OrbitalElements,
) -> OrbitalElements {
    if position == DVec3::ZERO || !velocity.is_finite() || !position.is_finite() {
        tracing::warn!(?position, ?velocity, "corrupt state input to inversion, keeping prior elements");
        return *fallback;
    }

    let r = position;
    let v = velocity;
    let r_mag = r.length();
    let v2 = v.length_squared();

    let energy = v2 / 2.0 - mu / r_mag;
    let a_raw = -mu / (2.0 * energy);

    let h = r.cross(v);
    let h_mag = h.length();

    let e_vec = ((v2 - mu / r_mag) * r - r.dot(v) * v) / mu;
    let mut e = e_vec.length();

    let n = DVec3::Z.cross(h);
    let n_mag = n.length();

    let inclination = (h.z / h_mag).clamp(-1.0, 1.0).acos();

    let equatorial = n_mag < EQUATORIAL_NODE_THRESHOLD;
    let circular = e < CIRCULAR_ECCENTRICITY;

    let raan = if equatorial {
        0.0
    } else {
        let raw = (n.x / n_mag).clamp(-1.0, 1.0).acos();
        if n.y < 0.0 {
            wrap_angle(-raw)
        } else {
            wrap_angle(raw)
        }
    };

    let arg_periapsis = if circular {
        0.0
    } else if equatorial {
        wrap_angle(e_vec.y.atan2(e_vec.x))
    } else {
        let raw = (e_vec.dot(n) / (e * n_mag)).clamp(-1.0, 1.0).acos();
        if e_vec.z < 0.0 {
            wrap_angle(-raw)
        } else {
            wrap_angle(raw)
        }
    };

    let true_anomaly = if circular && equatorial {
        wrap_angle(r.y.atan2(r.x))
    } else if circular {
        let raw = (r.dot(n) / (r_mag * n_mag)).clamp(-1.0, 1.0).acos();
        if r.z < 0.0 {
            wrap_angle(-raw)
        } else {
            wrap_angle(raw)
        }
    } else {
        let raw = (e_vec.dot(r) / (e * r_mag)).clamp(-1.0, 1.0).acos();
        if r.dot(v) < 0.0 {
            wrap_angle(-raw)
        } else {
            wrap_angle(raw)
        }
    };

    e = e.max(0.0);
    let nudged_e = nudge_parabolic(e);
    let hyperbolic = nudged_e > 1.0;

    let min_a = if in_soi { MIN_SEMI_MAJOR_AXIS_IN_SOI_AU } else { MIN_SEMI_MAJOR_AXIS_HELIO_AU };
    let a = if hyperbolic {
        -a_raw.abs().max(min_a)
    } else {
        a_raw.abs().max(min_a)
    };

    let mean_anomaly = if hyperbolic {
        let h_anom = hyperbolic_from_true_anomaly(nudged_e, true_anomaly);
        nudged_e * h_anom.sinh() - h_anom
    } else {
        let e_anom = super::kepler::eccentric_from_true_anomaly(nudged_e, true_anomaly);
        wrap_angle(e_anom - nudged_e * e_anom.sin())
    };

    OrbitalElements::new(a, nudged_e, inclination, raan, arg_periapsis, mean_anomaly, epoch, mu)
}
