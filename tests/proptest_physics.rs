//! Property-based tests for the universal invariants in spec.md §8.
//!
//! Mirrors the teacher's `physics::proptest_physics` module: a `proptest!`
//! block with `ProptestConfig::with_cases(100)`, one property per test,
//! `prop_assert!` with a formatted failure message naming the inputs that
//! broke it.

use glam::DVec3;
use proptest::prelude::*;

use sailnav_core::constants::MU_SUN;
use sailnav_core::elements::OrbitalElements;
use sailnav_core::frame::{helio_to_planetocentric, planetocentric_to_helio, CartesianState, Heliocentric, Planetocentric};
use sailnav_core::inversion::state_to_elements;
use sailnav_core::kepler::{position, velocity};

fn elements_with(a: f64, e: f64, i: f64, raan: f64, arg_periapsis: f64, m0: f64) -> OrbitalElements {
    OrbitalElements::new(a, e, i, raan, arg_periapsis, m0, 2_451_545.0, MU_SUN)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn prop_position_and_velocity_are_finite_and_satisfy_vis_viva(
        a in 0.3f64..10.0,
        e in 0.0f64..0.95,
        i in 0.0f64..std::f64::consts::PI,
        raan in 0.0f64..std::f64::consts::TAU,
        arg_periapsis in 0.0f64..std::f64::consts::TAU,
        m0 in 0.0f64..std::f64::consts::TAU,
        dt in -2000.0f64..2000.0,
    ) {
        let elements = elements_with(a, e, i, raan, arg_periapsis, m0);
        let jd = elements.epoch + dt;

        let pos = position(&elements, jd);
        let vel = velocity(&elements, jd);

        prop_assert!(pos.is_finite(), "non-finite position for a={a} e={e} jd={jd}");
        prop_assert!(vel.is_finite(), "non-finite velocity for a={a} e={e} jd={jd}");

        let r = pos.length();
        let v2 = vel.length_squared();
        let expected_v2 = elements.mu * (2.0 / r - 1.0 / elements.semi_major_axis);

        prop_assert!(
            (v2 - expected_v2).abs() < 1e-8,
            "vis-viva violated: v2={v2} expected={expected_v2} a={a} e={e}"
        );
    }

    #[test]
    fn prop_elliptic_round_trip_preserves_elements(
        a in 0.3f64..10.0,
        e in 0.0f64..0.95,
        i in 0.0f64..std::f64::consts::PI,
        raan in 0.0f64..std::f64::consts::TAU,
        arg_periapsis in 0.0f64..std::f64::consts::TAU,
        m0 in 0.0f64..std::f64::consts::TAU,
    ) {
        let original = elements_with(a, e, i, raan, arg_periapsis, m0);
        let jd = original.epoch + 10.0;

        let r = position(&original, jd);
        let v = velocity(&original, jd);
        let recovered = state_to_elements(r, v, MU_SUN, jd, false, &original);

        prop_assert!((recovered.semi_major_axis - original.semi_major_axis).abs() < 1e-6);
        prop_assert!((recovered.eccentricity - original.eccentricity).abs() < 1e-6);
        prop_assert!((recovered.inclination - original.inclination).abs() < 1e-6);
    }

    #[test]
    fn prop_hyperbolic_round_trip_preserves_a_e_i(
        a in 0.3f64..10.0,
        e in 1.01f64..5.0,
        i in 0.0f64..std::f64::consts::PI,
        raan in 0.0f64..std::f64::consts::TAU,
        arg_periapsis in 0.0f64..std::f64::consts::TAU,
        m0 in -3.0f64..3.0,
    ) {
        let original = elements_with(a, e, i, raan, arg_periapsis, m0);
        let jd = original.epoch + 1.0;

        let r = position(&original, jd);
        let v = velocity(&original, jd);
        let recovered = state_to_elements(r, v, MU_SUN, jd, false, &original);

        prop_assert!((recovered.semi_major_axis.abs() - original.semi_major_axis.abs()).abs() < 1e-6);
        prop_assert!((recovered.eccentricity - original.eccentricity).abs() < 1e-6);
        prop_assert!((recovered.inclination - original.inclination).abs() < 1e-6);
    }

    #[test]
    fn prop_frame_conversion_round_trip_is_identity(
        px in -10.0f64..10.0, py in -10.0f64..10.0, pz in -10.0f64..10.0,
        vx in -0.1f64..0.1, vy in -0.1f64..0.1, vz in -0.1f64..0.1,
        parent_px in -10.0f64..10.0, parent_py in -10.0f64..10.0, parent_pz in -10.0f64..10.0,
        parent_vx in -0.1f64..0.1, parent_vy in -0.1f64..0.1, parent_vz in -0.1f64..0.1,
    ) {
        let ship = CartesianState::<Heliocentric>::new(DVec3::new(px, py, pz), DVec3::new(vx, vy, vz));
        let parent = CartesianState::<Heliocentric>::new(
            DVec3::new(parent_px, parent_py, parent_pz),
            DVec3::new(parent_vx, parent_vy, parent_vz),
        );

        let planeto: CartesianState<Planetocentric> = helio_to_planetocentric(ship, parent);
        let back = planetocentric_to_helio(planeto, parent);

        prop_assert!((back.position - ship.position).length() < 1e-9);
        prop_assert!((back.velocity - ship.velocity).length() < 1e-9);
    }

    #[test]
    fn prop_mean_motion_is_monotone_decreasing_in_semi_major_axis(
        a1 in 0.3f64..10.0,
        a2 in 0.3f64..10.0,
        e in 0.0f64..0.9,
    ) {
        let e1 = elements_with(a1, e, 0.0, 0.0, 0.0, 0.0);
        let e2 = elements_with(a2, e, 0.0, 0.0, 0.0, 0.0);

        if a1 > a2 {
            prop_assert!(e1.mean_motion() < e2.mean_motion());
        } else if a1 < a2 {
            prop_assert!(e1.mean_motion() > e2.mean_motion());
        }
    }
}
