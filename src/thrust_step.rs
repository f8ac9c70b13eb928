//! Single-step thrust application in state-vector form (spec.md §4.D).
//!
//! Rationale, per spec.md: applying delta-v in state space guarantees no
//! position discontinuity across the step, unlike perturbing individual
//! elements directly under Gauss's variational equations (rejected — see
//! the GLOSSARY). The teacher has no analogue: its continuous-deflection
//! methods perturb an N-body integrator's acceleration field directly
//! (`physics::gravity::compute_acceleration`), never an elements set. This
//! function is the elements-space equivalent, grounded on that module's
//! "pure function, always returns a finite result" shape.

use glam::DVec3;

use crate::elements::OrbitalElements;
use crate::inversion::state_to_elements;
use crate::kepler::{position, velocity};

/// Below this acceleration magnitude (AU/day^2) a thrust step is a no-op
/// (§4.D step 1).
const NEGLIGIBLE_ACCELERATION: f64 = 1e-20;

/// Apply one step of continuous thrust to `elements`, returning the new
/// elements reconstructed with `epoch = jd` (not the old epoch — critical,
/// per spec.md, since propagation downstream of this call measures `Δt`
/// from the new epoch).
///
/// `in_soi` is forwarded to the inversion step so the reconstructed
/// `|a|` floor matches the frame the thrust was computed in (§4.B).
pub fn apply_thrust_step(
    elements: &OrbitalElements,
    acceleration: DVec3,
    dt: f64,
    jd: f64,
    in_soi: bool,
) -> OrbitalElements {
    if acceleration.length() < NEGLIGIBLE_ACCELERATION {
        return *elements;
    }

    let r = position(elements, jd);
    let v = velocity(elements, jd);

    if !r.is_finite() || !v.is_finite() || r == DVec3::ZERO {
        tracing::warn!(?elements, jd, "corrupt state ahead of thrust step, treating as no-op");
        return *elements;
    }

    let v_new = v + acceleration * dt;

    state_to_elements(r, v_new, elements.mu, jd, in_soi, elements)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::MU_SUN;

    fn earth_like() -> OrbitalElements {
        OrbitalElements::new(1.0, 0.0167, 0.0, 0.0, 0.0, 0.0, 2451545.0, MU_SUN)
    }

    #[test]
    fn negligible_acceleration_is_a_no_op() {
        let elements = earth_like();
        let result = apply_thrust_step(&elements, DVec3::new(1e-25, 0.0, 0.0), 1.0, 2451545.0, false);
        assert_eq!(result, elements);
    }

    #[test]
    fn new_epoch_is_the_step_time() {
        let elements = earth_like();
        let jd = 2451545.0 + 10.0;
        let result = apply_thrust_step(&elements, DVec3::new(1e-8, 0.0, 0.0), 1.0, jd, false);
        assert_eq!(result.epoch, jd);
    }

    #[test]
    fn position_is_preserved_across_the_step() {
        let elements = earth_like();
        let jd = 2451545.0 + 50.0;
        let r_before = position(&elements, jd);

        let result = apply_thrust_step(&elements, DVec3::new(0.0, 1e-7, 0.0), 1.0, jd, false);
        let r_after = position(&result, jd);

        assert!((r_before - r_after).length() < 1e-9);
    }
}
