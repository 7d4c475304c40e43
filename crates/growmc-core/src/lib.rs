//! # growmc Core Library
//!
//! A library implementing the geometry-proposal core of a reversible-jump
//! Markov chain Monte Carlo (RJMC) sampler: when a proposed topology change
//! adds or removes atoms, this engine generates plausible Cartesian
//! coordinates for the new atoms and computes the exact probability density
//! of that generation, in both directions, so that an outer sampler can
//! enforce detailed balance with a Jacobian-corrected acceptance ratio.
//!
//! ## Architectural Philosophy
//!
//! The library is designed with a strict two-layer architecture to keep the
//! probabilistic machinery separate from the molecular data model.
//!
//! - **[`core`]: The Foundation.** Contains stateless data models
//!   (`MolecularTopology`, `TopologyProposal`), pure mathematical building
//!   blocks (coordinate transforms with their Jacobians, force-field
//!   `potentials`), and the TOML system-description loader.
//!
//! - **[`engine`]: The Logic Core.** This layer orchestrates sequential
//!   atom growth: the `ProposalOrderResolver` derives a valid build order
//!   from bonded-graph reachability, the `GrowthSystem` provides a
//!   growth-restricted energy surface, and the `GeometryEngine` samples or
//!   evaluates bond/angle/torsion internal coordinates atom by atom while
//!   accumulating the proposal log-probability.
//!
//! The engine is a library invoked by an outer RJMC driver; it has no CLI
//! and no I/O beyond an optional debug trajectory hook.

pub mod core;
pub mod engine;
