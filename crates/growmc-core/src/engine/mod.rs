//! # Engine Module
//!
//! The sequential internal-coordinate growth engine and its supporting
//! machinery.
//!
//! ## Architecture
//!
//! - **Build Ordering** ([`order`]) - Derives a valid, randomized placement
//!   order for new atoms from bonded-graph reachability, with the
//!   log-probability of every torsion-chain choice
//! - **Staged Energies** ([`growth_system`]) - A growth-restricted energy
//!   surface whose interaction terms activate as atoms are grown in
//! - **Sampling** ([`sampling`]) - Discretized torsion probability mass
//!   functions and Boltzmann bin draws
//! - **Placement** ([`placement`]) - The `GeometryEngine` orchestrating the
//!   forward proposal and reverse density evaluation
//! - **Collaborator Seams** ([`reference`], [`trajectory`]) - Reference
//!   conformers for ring-closing restraints and the optional debug
//!   trajectory hook
//! - **Error Handling** ([`error`]) - The engine's failure taxonomy
//!
//! Placement is strictly sequential: each atom's Cartesian frame is built
//! from atoms placed before it, and the growth stage advances once per
//! atom. One staged energy model is scoped to each propose/reverse call.

pub mod error;
pub mod growth_system;
pub mod order;
pub mod placement;
pub mod reference;
pub mod sampling;
pub mod trajectory;
