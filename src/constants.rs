//! Physical and numerical constants for the astrodynamics core.
//!
//! Units are fixed throughout the crate: astronomical units (AU) for
//! distance, days for time, radians for angles. All gravitational
//! parameters are expressed as `mu = G * M` in AU^3/day^2.

/// Gravitational parameter of the Sun (AU^3/day^2).
pub const MU_SUN: f64 = 2.9591220828559093e-4;

/// Julian date of the J2000.0 epoch.
pub const J2000: f64 = 2451545.0;

/// Astronomical unit, in kilometers.
pub const AU_TO_KM: f64 = 149597870.7;

/// Incident solar radiation pressure at 1 AU (N/m^2).
///
/// `P = S / c` with solar constant `S = 1361 W/m^2` and `c = 3e8 m/s`. The
/// perfect-reflection factor of 2 lives in `sail::thrust_newtons`'s
/// `2*P*...*rho` term (§4.C), not here — folding it into this constant
/// too would double-count it.
pub const SOLAR_PRESSURE_AT_1AU: f64 = 4.56e-6;

/// Eccentricity above which orbital elements are numerically meaningless
/// and the predictor switches to linear fly-through (§4.F).
pub const EXTREME_ECCENTRICITY_THRESHOLD: f64 = 50.0;

/// Trajectory cache time-to-live, in milliseconds.
pub const TRAJECTORY_CACHE_TTL_MS: u64 = 500;

/// Soft time budget for crossing detection, in milliseconds. Advisory only:
/// exceeding it is logged, never enforced by cancellation.
pub const CROSSING_SOFT_BUDGET_MS: f64 = 8.0;

/// Trajectory samples beyond this heliocentric radius (AU) are truncated.
pub const MAX_HELIOCENTRIC_RADIUS_AU: f64 = 10.0;

/// Trajectory samples inside this heliocentric radius (AU) are truncated
/// (too close to the Sun for the patched-conics model to remain valid).
pub const MIN_HELIOCENTRIC_RADIUS_AU: f64 = 0.01;

/// Lower bound on `|a|` for newly inverted elements, inside an SOI (AU).
pub const MIN_SEMI_MAJOR_AXIS_IN_SOI_AU: f64 = 1e-6;

/// Lower bound on `|a|` for newly inverted elements, heliocentric (AU).
pub const MIN_SEMI_MAJOR_AXIS_HELIO_AU: f64 = 1e-4;

/// Planning-mode sandbox offset bound, in days (§4.H).
pub const PLANNING_OFFSET_MAX_DAYS: f64 = 730.0;

/// Eccentricity band nudged away from exactly parabolic (§4.A classification).
pub const PARABOLIC_BAND: (f64, f64) = (0.9999, 1.0001);

/// Eccentricity below which an orbit is treated as circular (§4.A).
pub const CIRCULAR_ECCENTRICITY: f64 = 1e-6;

/// SOI exit hysteresis multiplier (§4.E): exit only past `soi_radius * 1.01`.
pub const SOI_EXIT_HYSTERESIS: f64 = 1.01;

/// Predictor SOI-exit multiplier (§4.F), looser than the SOI manager's own
/// hysteresis because it only decides when to stop a sampled trajectory.
pub const PREDICTOR_SOI_EXIT_FACTOR: f64 = 1.1;

/// Inclination threshold (radians, ~0.5 degrees) below which the crossing
/// detector uses the radial-shell method directly instead of plane-crossing.
pub const LOW_INCLINATION_THRESHOLD_RAD: f64 = 0.0087;

/// Maximum number of encounter markers returned by the crossing detector.
pub const MAX_CROSSINGS: usize = 20;
