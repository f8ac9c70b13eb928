//! Sphere-of-influence manager: entry/exit detection and frame transitions
//! (spec.md §4.E).
//!
//! The teacher has no patched-conics model (its bodies orbit the Sun only,
//! with no ship SOI transitions); this is built fresh in the pure-function
//! style of `ephemeris::mod`'s position lookups, composed from
//! `frame::{helio_to_planetocentric, planetocentric_to_helio}` and
//! `inversion::state_to_elements`.

use glam::DVec3;

use crate::body::CelestialBody;
use crate::constants::{MU_SUN, SOI_EXIT_HYSTERESIS};
use crate::elements::OrbitalElements;
use crate::frame::{helio_to_planetocentric, planetocentric_to_helio, CartesianState, Heliocentric, Planetocentric};
use crate::inversion::state_to_elements;

/// Which body's sphere of influence the ship currently sits in, if any
/// (spec.md §3 `Ship.soiState`).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SoiState {
    pub parent_body: Option<&'static str>,
}

impl SoiState {
    pub fn is_in_soi(&self) -> bool {
        self.parent_body.is_some()
    }
}

/// Entry check: among bodies with a nonzero SOI radius, find those whose
/// sphere contains `ship_helio_pos`. Returns the dominant one by `mu/d^2`
/// and logs the alternatives it passed over (§4.E, §7 "SOI ambiguity").
pub fn check_entry<'a>(ship_helio_pos: DVec3, bodies: &'a [CelestialBody]) -> Option<&'a CelestialBody> {
    let mut candidates: Vec<(&CelestialBody, f64)> = bodies
        .iter()
        .filter(|b| b.soi_radius_au > 0.0)
        .filter_map(|b| {
            let body_pos = b.cached_state?.position;
            let d = (ship_helio_pos - body_pos).length();
            (d < b.soi_radius_au).then_some((b, d))
        })
        .collect();

    if candidates.is_empty() {
        return None;
    }

    candidates.sort_by(|(a, da), (b, db)| {
        let dominance_a = a.mu / (da * da);
        let dominance_b = b.mu / (db * db);
        dominance_b.partial_cmp(&dominance_a).unwrap_or(std::cmp::Ordering::Equal)
    });

    if candidates.len() > 1 {
        let alternatives: Vec<&str> = candidates[1..].iter().map(|(b, _)| b.name).collect();
        tracing::debug!(chosen = candidates[0].0.name, ?alternatives, "SOI entry ambiguity, chose dominant mu/d^2");
    }

    Some(candidates[0].0)
}

/// Exit check: the ship exits `parent`'s SOI once its planetocentric
/// distance exceeds `soiRadius * 1.01` (hysteresis prevents boundary
/// oscillation, §4.E).
pub fn check_exit(ship_planetocentric_pos: DVec3, parent: &CelestialBody) -> bool {
    ship_planetocentric_pos.length() > parent.soi_radius_au * SOI_EXIT_HYSTERESIS
}

/// Transition protocol on SOI entry: convert the ship's heliocentric state
/// into `parent`'s frame and reconstruct elements with `parent.mu` and
/// `epoch = jd` (§4.E steps 1-3). `parent.cached_state` must have been
/// refreshed for `jd` already.
pub fn enter_soi(
    ship_helio: CartesianState<Heliocentric>,
    parent: &CelestialBody,
    jd: f64,
    fallback: &OrbitalElements,
) -> (CartesianState<Planetocentric>, OrbitalElements) {
    let parent_state = parent
        .cached_state
        .expect("parent body must be refreshed before an SOI transition");

    let planetocentric = helio_to_planetocentric(ship_helio, parent_state);
    let elements = state_to_elements(planetocentric.position, planetocentric.velocity, parent.mu, jd, true, fallback);
    (planetocentric, elements)
}

/// Transition protocol on SOI exit: convert back to heliocentric and
/// reconstruct elements with `MU_SUN` (§4.E steps 1-3, reversed).
pub fn exit_soi(
    ship_planetocentric: CartesianState<Planetocentric>,
    parent: &CelestialBody,
    jd: f64,
    fallback: &OrbitalElements,
) -> (CartesianState<Heliocentric>, OrbitalElements) {
    let parent_state = parent
        .cached_state
        .expect("parent body must be refreshed before an SOI transition");

    let helio = planetocentric_to_helio(ship_planetocentric, parent_state);
    let elements = state_to_elements(helio.position, helio.velocity, MU_SUN, jd, false, fallback);
    (helio, elements)
}
