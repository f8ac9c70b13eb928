//! Celestial body catalog (spec.md §3 Celestial Body; supplemented per
//! SPEC_FULL.md §B from the teacher's `ephemeris::data` table).
//!
//! The teacher's table is a flat 2D catalog (inclination and node
//! collapsed to zero, mean motion given directly instead of derived from
//! `mu`). This generalizes it to the full 3D element set and derives `mu`
//! from mass via `G`, keeping the same body set (Sun, 8 planets, 6 major
//! moons) and the same Hill-sphere formula (`compute_hill_sphere`).

use crate::constants::{AU_TO_KM, MU_SUN};
use crate::elements::OrbitalElements;
use crate::error::CoreError;
use crate::frame::{CartesianState, Heliocentric};
use crate::kepler::{position, velocity};

/// Gravitational constant, m^3 kg^-1 s^-2.
const G: f64 = 6.674_30e-11;

const SECONDS_PER_DAY: f64 = 86_400.0;
const METERS_PER_AU: f64 = AU_TO_KM * 1000.0;

/// Convert a mass in kg to a gravitational parameter in AU^3/day^2.
fn mu_from_mass_kg(mass_kg: f64) -> f64 {
    let mu_si = G * mass_kg; // m^3/s^2
    mu_si * (SECONDS_PER_DAY * SECONDS_PER_DAY) / METERS_PER_AU.powi(3)
}

/// Hill sphere radius, in the same distance unit as `semi_major_axis_au`
/// (AU here): `a * (m_body / (3*m_parent))^(1/3)`.
pub fn hill_sphere_au(semi_major_axis_au: f64, body_mass_kg: f64, parent_mass_kg: f64) -> f64 {
    semi_major_axis_au * (body_mass_kg / (3.0 * parent_mass_kg)).cbrt()
}

/// A body the ship, trajectory predictor, and crossing detector can
/// reason about.
#[derive(Clone, Debug)]
pub struct CelestialBody {
    pub name: &'static str,
    /// `None` for the Sun, which sits at the heliocentric origin.
    pub elements: Option<OrbitalElements>,
    pub physical_radius_km: f64,
    /// Zero if the body has no modeled sphere of influence (moons in this
    /// catalog are not SOI-bearing; only the Sun and the 8 planets are).
    pub soi_radius_au: f64,
    pub mu: f64,
    pub parent: Option<&'static str>,
    /// Current position/velocity, refreshed once per tick by `refresh`.
    pub cached_state: Option<CartesianState<Heliocentric>>,
}

impl CelestialBody {
    /// Recompute `cached_state` at Julian date `jd` from `elements` (the
    /// Keplerian fallback of §6). The Sun is always at the origin.
    pub fn refresh(&mut self, jd: f64) {
        self.cached_state = match &self.elements {
            None => Some(CartesianState::new(glam::DVec3::ZERO, glam::DVec3::ZERO)),
            Some(elements) => {
                Some(CartesianState::new(position(elements, jd), velocity(elements, jd)))
            }
        };
    }

    /// Validate a catalog entry at construction time: `mu`, physical
    /// radius, and SOI radius must be finite and non-negative, and `mu`
    /// must be strictly positive (every body, including the Sun, attracts).
    /// This is the one place catalog data is fallible (spec.md §7's
    /// numerical-propagation paths never return `Result`; only the data
    /// that feeds them can be malformed at construction).
    pub fn validate(&self) -> Result<(), CoreError> {
        if !self.mu.is_finite() || !self.physical_radius_km.is_finite() || !self.soi_radius_au.is_finite() {
            return Err(CoreError::NonFiniteCatalogEntry { name: self.name });
        }
        if self.mu <= 0.0 {
            return Err(CoreError::NonPositiveMu { mu: self.mu });
        }
        Ok(())
    }
}

/// Validate every entry in a catalog, short-circuiting on the first
/// failure. Used at catalog-construction time by callers that assemble a
/// custom body set rather than `default_catalog`.
pub fn validate_catalog(bodies: &[CelestialBody]) -> Result<(), CoreError> {
    for body in bodies {
        body.validate()?;
    }
    Ok(())
}

/// Look up a body by name, erroring rather than returning `None` — for
/// host call sites (e.g. persistence restoring a body-filter set, §6) that
/// treat an unknown name as a configuration mistake worth surfacing, as
/// opposed to the numerical surfaces (`ephemeris::heliocentric_state`)
/// that tolerate an unknown/unavailable body silently.
pub fn find_body<'a>(bodies: &'a [CelestialBody], name: &str) -> Result<&'a CelestialBody, CoreError> {
    bodies
        .iter()
        .find(|b| b.name == name)
        .ok_or_else(|| CoreError::UnknownBody { name: name.to_string() })
}

fn planet(
    name: &'static str,
    a_au: f64,
    e: f64,
    i_deg: f64,
    raan_deg: f64,
    arg_periapsis_deg: f64,
    m0_deg: f64,
    mass_kg: f64,
    radius_km: f64,
) -> CelestialBody {
    let elements = OrbitalElements::new(
        a_au,
        e,
        i_deg.to_radians(),
        raan_deg.to_radians(),
        arg_periapsis_deg.to_radians(),
        m0_deg.to_radians(),
        crate::constants::J2000,
        MU_SUN,
    );

    CelestialBody {
        name,
        elements: Some(elements),
        physical_radius_km: radius_km,
        soi_radius_au: hill_sphere_au(a_au, mass_kg, SUN_MASS_KG),
        mu: mu_from_mass_kg(mass_kg),
        parent: None,
        cached_state: None,
    }
}

fn moon(
    name: &'static str,
    parent: &'static str,
    parent_mu: f64,
    a_au: f64,
    e: f64,
    i_deg: f64,
    raan_deg: f64,
    arg_periapsis_deg: f64,
    m0_deg: f64,
    mass_kg: f64,
    radius_km: f64,
    parent_mass_kg: f64,
) -> CelestialBody {
    let elements = OrbitalElements::new(
        a_au,
        e,
        i_deg.to_radians(),
        raan_deg.to_radians(),
        arg_periapsis_deg.to_radians(),
        m0_deg.to_radians(),
        crate::constants::J2000,
        parent_mu,
    );

    CelestialBody {
        name,
        elements: Some(elements),
        physical_radius_km: radius_km,
        // Moons are not themselves SOI-bearing in this catalog (§B).
        soi_radius_au: 0.0,
        mu: mu_from_mass_kg(mass_kg),
        parent: Some(parent),
        cached_state: None,
    }
}

const SUN_MASS_KG: f64 = 1.989e30;
const EARTH_MASS_KG: f64 = 5.972e24;
const JUPITER_MASS_KG: f64 = 1.898e27;
const SATURN_MASS_KG: f64 = 5.683e26;

/// The default catalog: Sun, 8 planets, 6 major moons, J2000 elements.
pub fn default_catalog() -> Vec<CelestialBody> {
    let jupiter_mu = mu_from_mass_kg(JUPITER_MASS_KG);
    let saturn_mu = mu_from_mass_kg(SATURN_MASS_KG);
    let earth_mu = mu_from_mass_kg(EARTH_MASS_KG);

    vec![
        CelestialBody {
            name: "Sun",
            elements: None,
            physical_radius_km: 696_300.0,
            soi_radius_au: 0.0,
            mu: MU_SUN,
            parent: None,
            cached_state: None,
        },
        planet("Mercury", 0.387_098, 0.205_630, 7.005, 48.331, 29.124, 174.796, 3.302e23, 2_440.0),
        planet("Venus", 0.723_332, 0.006_772, 3.394_58, 76.680, 54.884, 50.115, 4.869e24, 6_052.0),
        planet("Earth", 1.000_000, 0.016_708_6, 0.000_05, 0.0, 114.207_83, 358.617, EARTH_MASS_KG, 6_371.0),
        planet("Mars", 1.523_679, 0.093_4, 1.850, 49.558, 286.502, 19.373, 6.417e23, 3_390.0),
        planet("Jupiter", 5.204_4, 0.048_9, 1.303, 100.464, 273.867, 20.020, JUPITER_MASS_KG, 69_911.0),
        planet("Saturn", 9.582_6, 0.056_5, 2.485, 113.665, 339.392, 317.020, SATURN_MASS_KG, 58_232.0),
        planet("Uranus", 19.218_4, 0.045_7, 0.773, 74.006, 96.998, 142.238, 8.681e25, 25_362.0),
        planet("Neptune", 30.110_4, 0.011_3, 1.770, 131.784, 273.187, 256.228, 1.024e26, 24_622.0),
        moon("Moon", "Earth", earth_mu, 384_400.0 / AU_TO_KM, 0.0549, 5.145, 125.08, 318.15, 134.96, 7.342e22, 1_737.0, EARTH_MASS_KG),
        moon("Io", "Jupiter", jupiter_mu, 421_800.0 / AU_TO_KM, 0.0041, 0.036, 0.0, 342.02, 203.49, 8.932e22, 1_822.0, JUPITER_MASS_KG),
        moon("Europa", "Jupiter", jupiter_mu, 671_100.0 / AU_TO_KM, 0.0094, 0.466, 0.0, 171.02, 101.37, 4.800e22, 1_561.0, JUPITER_MASS_KG),
        moon("Ganymede", "Jupiter", jupiter_mu, 1_070_400.0 / AU_TO_KM, 0.0011, 0.177, 0.0, 317.54, 50.32, 1.482e23, 2_634.0, JUPITER_MASS_KG),
        moon("Callisto", "Jupiter", jupiter_mu, 1_882_700.0 / AU_TO_KM, 0.0074, 0.192, 0.0, 181.41, 21.57, 1.076e23, 2_410.0, JUPITER_MASS_KG),
        moon("Titan", "Saturn", saturn_mu, 1_221_870.0 / AU_TO_KM, 0.0288, 0.33, 0.0, 163.31, 22.58, 1.345e23, 2_575.0, SATURN_MASS_KG),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_has_sun_eight_planets_and_six_moons() {
        assert_eq!(default_catalog().len(), 15);
    }

    #[test]
    fn sun_has_no_elements_and_sits_at_origin() {
        let mut sun = default_catalog().into_iter().next().unwrap();
        sun.refresh(crate::constants::J2000);
        assert!(sun.elements.is_none());
        assert_eq!(sun.cached_state.unwrap().position, glam::DVec3::ZERO);
    }

    #[test]
    fn planets_have_positive_soi_and_moons_do_not() {
        let catalog = default_catalog();
        let earth = catalog.iter().find(|b| b.name == "Earth").unwrap();
        let moon = catalog.iter().find(|b| b.name == "Moon").unwrap();
        assert!(earth.soi_radius_au > 0.0);
        assert_eq!(moon.soi_radius_au, 0.0);
    }

    #[test]
    fn sun_mu_is_dominant() {
        let catalog = default_catalog();
        let sun = &catalog[0];
        for body in catalog.iter().skip(1) {
            assert!(sun.mu > body.mu, "{} should have smaller mu than Sun", body.name);
        }
    }

    #[test]
    fn refreshed_earth_position_is_near_one_au() {
        let mut catalog = default_catalog();
        let earth = catalog.iter_mut().find(|b| b.name == "Earth").unwrap();
        earth.refresh(crate::constants::J2000);
        let r = earth.cached_state.unwrap().position.length();
        assert!((r - 1.0).abs() < 0.02);
    }

    #[test]
    fn default_catalog_validates() {
        assert!(validate_catalog(&default_catalog()).is_ok());
    }

    #[test]
    fn non_positive_mu_fails_validation() {
        let mut earth = default_catalog().into_iter().find(|b| b.name == "Earth").unwrap();
        earth.mu = 0.0;
        assert_eq!(earth.validate(), Err(CoreError::NonPositiveMu { mu: 0.0 }));
    }

    #[test]
    fn non_finite_soi_radius_fails_validation() {
        let mut earth = default_catalog().into_iter().find(|b| b.name == "Earth").unwrap();
        earth.soi_radius_au = f64::NAN;
        assert_eq!(earth.validate(), Err(CoreError::NonFiniteCatalogEntry { name: "Earth" }));
    }

    #[test]
    fn find_body_errors_on_unknown_name() {
        let catalog = default_catalog();
        assert!(find_body(&catalog, "Earth").is_ok());
        assert_eq!(
            find_body(&catalog, "Planet Nine"),
            Err(CoreError::UnknownBody { name: "Planet Nine".to_string() })
        );
    }
}
