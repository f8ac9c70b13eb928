//! External ephemeris oracle boundary and Keplerian fallback (spec.md §6).
//!
//! Grounded on the teacher's `Ephemeris::get_position_by_id`, which
//! recursively adds a parent body's position to a moon's parent-relative
//! position. Generalized here to first try a host-supplied oracle (the
//! real high-precision ephemeris, out of scope per spec.md §1) and fall
//! back to the catalog's own elements only when the oracle returns `None`.

use glam::DVec3;

use crate::body::CelestialBody;
use crate::frame::{CartesianState, Heliocentric};
use crate::kepler::{position, velocity};

/// The host-provided high-precision ephemeris. The core never implements
/// this itself; it only consumes it and tolerates `None`.
pub trait EphemerisOracle {
    /// Heliocentric state for `body_name` at `jd`, or `None` if the body is
    /// not covered (§6: "The core tolerates null by falling back to
    /// Keplerian propagation of the body's stored elements").
    fn heliocentric_state(&self, body_name: &str, jd: f64) -> Option<CartesianState<Heliocentric>>;
}

/// Resolve `body_name`'s heliocentric state at `jd`, preferring `oracle`
/// and falling back to Keplerian propagation of the catalog entry's
/// elements (recursing through a parent chain for moons, matching the
/// teacher's `get_position_by_id`). Returns `None` only if `body_name` is
/// not present in `catalog` at all.
pub fn heliocentric_state(
    oracle: Option<&dyn EphemerisOracle>,
    catalog: &[CelestialBody],
    body_name: &str,
    jd: f64,
) -> Option<CartesianState<Heliocentric>> {
    if let Some(oracle) = oracle {
        if let Some(state) = oracle.heliocentric_state(body_name, jd) {
            return Some(state);
        }
        tracing::info!(body_name, "ephemeris oracle unavailable, falling back to Keplerian propagation");
    }

    let body = catalog.iter().find(|b| b.name == body_name)?;
    match (&body.elements, body.parent) {
        (None, _) => Some(CartesianState::new(DVec3::ZERO, DVec3::ZERO)),
        (Some(elements), None) => Some(CartesianState::new(position(elements, jd), velocity(elements, jd))),
        (Some(elements), Some(parent_name)) => {
            let parent_state = heliocentric_state(oracle, catalog, parent_name, jd)?;
            let rel_pos = position(elements, jd);
            let rel_vel = velocity(elements, jd);
            Some(CartesianState::new(parent_state.position + rel_pos, parent_state.velocity + rel_vel))
        }
    }
}
