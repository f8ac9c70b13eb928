//! sailnav-core - astrodynamics core for an interactive solar-sail
//! navigation simulator.
//!
//! Pure-function Keplerian orbit propagation, state/elements inversion,
//! continuous solar-sail thrust, sphere-of-influence patched conics,
//! cached trajectory prediction, and orbit-crossing ("ghost planet")
//! detection. Rendering, UI, input, configuration loading, and the
//! high-precision external ephemeris are all external collaborators,
//! specified only at the [`ephemeris::EphemerisOracle`] boundary.

pub mod body;
pub mod clock;
pub mod constants;
pub mod crossing;
pub mod elements;
pub mod ephemeris;
pub mod error;
pub mod frame;
pub mod inversion;
pub mod kepler;
pub mod predictor;
pub mod sail;
pub mod ship;
pub mod soi;
pub mod thrust_step;
