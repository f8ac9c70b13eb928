//! Kepler and hyperbolic-Kepler solvers, anomaly conversions, and the
//! elements -> Cartesian state primitives (spec.md §4.A).
//!
//! Generalizes the teacher's `ephemeris::kepler::KeplerOrbit` (Newton's
//! method on the elliptic Kepler equation, 2D perifocal rotation by
//! argument of periapsis only) to hyperbolic orbits and a full 3D rotation
//! through inclination and ascending node.

use glam::{DMat3, DVec3};

use crate::elements::{OrbitKind, OrbitalElements};

/// Floor applied to the semi-latus rectum before computing radius/velocity,
/// to avoid a singularity as the orbit approaches parabolic (§4.A).
const SEMI_LATUS_RECTUM_FLOOR: f64 = 1e-12;

/// Clamp applied to `|tanh(H/2)|` before taking `atanh`, keeping the
/// hyperbolic true-anomaly inverse finite near the asymptote (§4.A, §7).
const HYPERBOLIC_ASYMPTOTE_CLAMP: f64 = 0.9999999;

/// Solve Kepler's equation `M = E - e*sin(E)` for the eccentric anomaly,
/// via Newton-Raphson.
///
/// Initial guess is `E = M` for `e < 0.8`, else `pi`. Short-circuits to
/// `E = M` for near-circular orbits (`e < 1e-10`). Converges to `1e-12` in
/// at most 50 iterations; on non-convergence returns the last iterate
/// rather than panicking or looping forever (§7: "Return last iterate, log
/// a warning at debug level").
pub fn solve_eccentric_anomaly(eccentricity: f64, mean_anomaly: f64) -> f64 {
    if eccentricity < 1e-10 {
        return mean_anomaly;
    }

    let m = mean_anomaly;
    let mut e_anomaly = if eccentricity < 0.8 {
        m
    } else {
        std::f64::consts::PI
    };

    let mut converged = false;
    for _ in 0..50 {
        let sin_e = e_anomaly.sin();
        let cos_e = e_anomaly.cos();

        let f = e_anomaly - eccentricity * sin_e - m;
        let f_prime = 1.0 - eccentricity * cos_e;

        let delta = f / f_prime;
        e_anomaly -= delta;

        if delta.abs() < 1e-12 {
            converged = true;
            break;
        }
    }

    if !converged {
        tracing::debug!(
            eccentricity,
            mean_anomaly,
            "Kepler solver did not converge in 50 iterations, returning last estimate"
        );
    }

    e_anomaly
}

/// Solve the hyperbolic Kepler equation `e*sinh(H) - H = M` for the
/// hyperbolic anomaly, via Newton-Raphson.
///
/// Initial guess is `M/(e-1)` for `|M| < 1`, else `sign(M)*ln(2|M|/e)`.
/// Detects divergence (a step more than double the previous one) and damps
/// by 0.5; guards against `|f'| < 1e-15`. Returns the last iterate on
/// non-convergence, matching the elliptic solver's policy.
pub fn solve_hyperbolic_anomaly(eccentricity: f64, mean_anomaly: f64) -> f64 {
    let m = mean_anomaly;
    let mut h = if m.abs() < 1.0 {
        m / (eccentricity - 1.0)
    } else {
        m.signum() * (2.0 * m.abs() / eccentricity).ln()
    };

    let mut prev_step = f64::INFINITY;
    let mut converged = false;
    for _ in 0..50 {
        let sinh_h = h.sinh();
        let cosh_h = h.cosh();

        let f = eccentricity * sinh_h - h - m;
        let mut f_prime = eccentricity * cosh_h - 1.0;
        if f_prime.abs() < 1e-15 {
            f_prime = f_prime.signum() * 1e-15;
        }

        let mut step = f / f_prime;
        if step.abs() > prev_step.abs() * 2.0 {
            step *= 0.5;
        }
        prev_step = step;
        h -= step;

        if step.abs() < 1e-12 {
            converged = true;
            break;
        }
    }

    if !converged {
        tracing::debug!(
            eccentricity,
            mean_anomaly,
            "Hyperbolic Kepler solver did not converge in 50 iterations, returning last estimate"
        );
    }

    h
}

/// True anomaly from eccentric anomaly (elliptic branch).
pub fn true_anomaly_from_eccentric(eccentricity: f64, eccentric_anomaly: f64) -> f64 {
    let (sin_e, cos_e) = eccentric_anomaly.sin_cos();
    ((1.0 - eccentricity * eccentricity).sqrt() * sin_e).atan2(cos_e - eccentricity)
}

/// Eccentric anomaly from true anomaly (elliptic branch), inverse of
/// `true_anomaly_from_eccentric`.
pub fn eccentric_from_true_anomaly(eccentricity: f64, true_anomaly: f64) -> f64 {
    let (sin_nu, cos_nu) = true_anomaly.sin_cos();
    ((1.0 - eccentricity * eccentricity).sqrt() * sin_nu).atan2(eccentricity + cos_nu)
}

/// True anomaly from hyperbolic anomaly.
pub fn true_anomaly_from_hyperbolic(eccentricity: f64, hyperbolic_anomaly: f64) -> f64 {
    let ratio = ((eccentricity + 1.0) / (eccentricity - 1.0)).sqrt();
    2.0 * (ratio * (hyperbolic_anomaly / 2.0).tanh()).atan()
}

/// Hyperbolic anomaly from true anomaly, the inverse of
/// `true_anomaly_from_hyperbolic`. Clamps the `atanh` argument to keep the
/// result finite near the asymptotic true anomaly (§4.A, §7).
pub fn hyperbolic_from_true_anomaly(eccentricity: f64, true_anomaly: f64) -> f64 {
    let ratio = ((eccentricity - 1.0) / (eccentricity + 1.0)).sqrt();
    let arg = (ratio * (true_anomaly / 2.0).tan()).clamp(
        -HYPERBOLIC_ASYMPTOTE_CLAMP,
        HYPERBOLIC_ASYMPTOTE_CLAMP,
    );
    2.0 * arg.atanh()
}

/// Radius at a given true anomaly: `r = p / (1 + e*cos(nu))`, valid for
/// both elliptic and hyperbolic orbits given the correct semi-latus rectum.
pub fn radius_at_true_anomaly(elements: &OrbitalElements, true_anomaly: f64) -> f64 {
    let p = elements.semi_latus_rectum().max(SEMI_LATUS_RECTUM_FLOOR);
    p / (1.0 + elements.eccentricity * true_anomaly.cos())
}

/// Position and velocity in the perifocal (orbital-plane) frame at a given
/// true anomaly.
fn perifocal_state(elements: &OrbitalElements, true_anomaly: f64) -> (DVec3, DVec3) {
    let p = elements.semi_latus_rectum().max(SEMI_LATUS_RECTUM_FLOOR);
    let r = radius_at_true_anomaly(elements, true_anomaly);
    let (sin_nu, cos_nu) = true_anomaly.sin_cos();

    let pos = DVec3::new(r * cos_nu, r * sin_nu, 0.0);

    let sqrt_mu_p = (elements.mu / p).sqrt();
    let vel = DVec3::new(-sqrt_mu_p * sin_nu, sqrt_mu_p * (elements.eccentricity + cos_nu), 0.0);

    (pos, vel)
}

/// The rotation `R_z(Omega) * R_x(i) * R_z(omega)` carrying perifocal
/// coordinates into the ecliptic frame.
fn perifocal_to_ecliptic_rotation(elements: &OrbitalElements) -> DMat3 {
    DMat3::from_rotation_z(elements.raan)
        * DMat3::from_rotation_x(elements.inclination)
        * DMat3::from_rotation_z(elements.arg_periapsis)
}

/// True anomaly of `elements` at Julian date `jd`, dispatched on orbit kind.
pub fn true_anomaly_at(elements: &OrbitalElements, jd: f64) -> f64 {
    let m = elements.mean_anomaly_at(jd);
    match elements.kind() {
        OrbitKind::Circular | OrbitKind::Elliptic => {
            let e_anomaly = solve_eccentric_anomaly(elements.eccentricity, m);
            true_anomaly_from_eccentric(elements.eccentricity, e_anomaly)
        }
        OrbitKind::Hyperbolic => {
            let h_anomaly = solve_hyperbolic_anomaly(elements.eccentricity, m);
            true_anomaly_from_hyperbolic(elements.eccentricity, h_anomaly)
        }
        OrbitKind::Parabolic => unreachable!("OrbitalElements::kind never returns Parabolic"),
    }
}

/// Position at Julian date `jd`, in the frame `elements` is defined in
/// (AU). Never returns a non-finite vector: on any non-finite intermediate
/// result this logs and returns the origin (§7).
pub fn position(elements: &OrbitalElements, jd: f64) -> DVec3 {
    let nu = true_anomaly_at(elements, jd);
    let (pos_pf, _vel_pf) = perifocal_state(elements, nu);
    let pos = perifocal_to_ecliptic_rotation(elements) * pos_pf;

    if pos.is_finite() {
        pos
    } else {
        tracing::warn!(?elements, jd, "non-finite position, substituting origin");
        DVec3::ZERO
    }
}

/// Velocity at Julian date `jd`, in the frame `elements` is defined in
/// (AU/day). Never returns a non-finite vector (§7).
pub fn velocity(elements: &OrbitalElements, jd: f64) -> DVec3 {
    let nu = true_anomaly_at(elements, jd);
    let (_pos_pf, vel_pf) = perifocal_state(elements, nu);
    let vel = perifocal_to_ecliptic_rotation(elements) * vel_pf;

    if vel.is_finite() {
        vel
    } else {
        tracing::warn!(?elements, jd, "non-finite velocity, substituting zero");
        DVec3::ZERO
    }
}
