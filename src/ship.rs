//! Ship state (spec.md §3 Ship): elements, sail, SOI membership, and the
//! extreme-flyby linear fly-through marker.
//!
//! The teacher's closest analogue is its `asteroid::Asteroid` bundle of
//! physics + deflection-method state, generalized here from a single
//! N-body-integrated rigid body to a Kepler-elements ship with a
//! steerable sail and patched-conics bookkeeping.

use glam::DVec3;

use crate::elements::OrbitalElements;
use crate::frame::{CartesianState, Heliocentric};
use crate::sail::SailState;
use crate::soi::SoiState;

/// Snapshot taken on SOI entry when eccentricity exceeds
/// `EXTREME_ECCENTRICITY_THRESHOLD`, used by the trajectory predictor to
/// fly the ship through on a straight line rather than trust numerically
/// meaningless osculating elements (§4.F).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ExtremeFlybyState {
    pub entry_time: f64,
    pub entry_pos: DVec3,
    pub entry_vel: DVec3,
}

/// A ship: Keplerian elements plus the sail, SOI, and flyby state that
/// make propagation more than a pure two-body problem.
#[derive(Clone, Debug)]
pub struct Ship {
    pub elements: OrbitalElements,
    pub mass_kg: f64,
    pub sail: SailState,
    pub soi_state: SoiState,
    /// `Some` only while eccentricity is extreme and the ship is inside an
    /// SOI; explicitly cleared on SOI exit (see `clear_extreme_flyby`; this
    /// resolves spec.md §9's open question in favor of not persisting the
    /// marker once the ship leaves the SOI that produced it).
    pub extreme_flyby: Option<ExtremeFlybyState>,
    pub cached_state: Option<CartesianState<Heliocentric>>,
}

impl Ship {
    pub fn new(elements: OrbitalElements, mass_kg: f64, sail: SailState) -> Self {
        Self {
            elements,
            mass_kg,
            sail,
            soi_state: SoiState::default(),
            extreme_flyby: None,
            cached_state: None,
        }
    }

    /// Clear the extreme-flyby marker. Must be called on every SOI exit
    /// (spec.md §9 open question, resolved): a ship that decays back below
    /// the eccentricity threshold after leaving an SOI should propagate
    /// normally, not continue flying a stale straight line.
    pub fn clear_extreme_flyby(&mut self) {
        self.extreme_flyby = None;
    }
}
