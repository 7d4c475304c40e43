//! # Core Models Module
//!
//! Data structures describing the molecular systems a geometry proposal
//! operates on.
//!
//! ## Key Components
//!
//! - [`atom`] - Individual atom identity (name, element)
//! - [`topology`] - Bonded molecular graph with cached adjacency
//! - [`proposal`] - The old/new topology pairing with its partial atom map
//!
//! Atoms are addressed by dense integer indices; the same index addresses
//! an atom's row in every Cartesian position array the engine handles.

pub mod atom;
pub mod proposal;
pub mod topology;
