//! Frame-tagged Cartesian state (spec.md §9 REDESIGN FLAGS: "Frame confusion
//! between heliocentric and planetocentric ... model frames as a type
//! parameter ... so the compiler rejects subtracting a helio position from a
//! planetocentric one").
//!
//! The teacher keeps a single untagged `BodyState { position, velocity }`
//! and relies on the caller to track which frame a value lives in
//! (`ephemeris::mod::get_position_by_id` adds a parent's position back in by
//! convention, not by type). Here the frame is part of the type.

use glam::DVec3;
use std::marker::PhantomData;

/// Marker trait for reference frames. Sealed: only `Heliocentric` and
/// `Planetocentric` exist.
pub trait Frame: Copy + Clone + std::fmt::Debug + sealed::Sealed {}

/// Sun-centered inertial frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Heliocentric;
impl Frame for Heliocentric {}

/// Frame centered on a planet (or other SOI-bearing body), non-rotating,
/// parallel to the heliocentric axes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Planetocentric;
impl Frame for Planetocentric {}

mod sealed {
    pub trait Sealed {}
    impl Sealed for super::Heliocentric {}
    impl Sealed for super::Planetocentric {}
}

/// Position and velocity tagged with the frame they are expressed in.
#[derive(Clone, Copy, Debug)]
pub struct CartesianState<F: Frame> {
    pub position: DVec3,
    pub velocity: DVec3,
    _frame: PhantomData<F>,
}

impl<F: Frame> CartesianState<F> {
    pub fn new(position: DVec3, velocity: DVec3) -> Self {
        Self { position, velocity, _frame: PhantomData }
    }

    pub fn is_finite(&self) -> bool {
        self.position.is_finite() && self.velocity.is_finite()
    }
}

/// Convert a heliocentric state to planetocentric, given the parent body's
/// own heliocentric state at the same instant (§4.E "Frame conversion":
/// subtract the parent's heliocentric position and velocity, linear).
pub fn helio_to_planetocentric(
    state: CartesianState<Heliocentric>,
    parent: CartesianState<Heliocentric>,
) -> CartesianState<Planetocentric> {
    CartesianState::new(state.position - parent.position, state.velocity - parent.velocity)
}

/// Convert a planetocentric state back to heliocentric, given the parent's
/// heliocentric state at the same instant. Contract: composed with
/// `helio_to_planetocentric`, this is the identity to machine precision
/// (§4.E, §8).
pub fn planetocentric_to_helio(
    state: CartesianState<Planetocentric>,
    parent: CartesianState<Heliocentric>,
) -> CartesianState<Heliocentric> {
    CartesianState::new(state.position + parent.position, state.velocity + parent.velocity)
}
