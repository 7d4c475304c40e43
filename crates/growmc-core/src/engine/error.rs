use crate::core::utils::geometry::GeometryError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GrowthError {
    #[error(
        "Topological inconsistency: {remaining} new atom(s) remain to place, but none has a positioned bonded neighbor"
    )]
    TopologicalInconsistency { remaining: usize },

    #[error("No eligible torsion found for placing atom {atom}")]
    NoSupportingTorsion { atom: usize },

    #[error("Missing force-field {kind} term for atoms {atoms:?}")]
    MissingForceFieldTerm {
        kind: &'static str,
        atoms: Vec<usize>,
    },

    #[error("Numeric degeneracy: {0}")]
    NumericDegeneracy(String),

    #[error("Invalid inverse temperature {0}; beta must be positive")]
    InvalidBeta(f64),

    #[error("Degenerate coordinate frame: {source}")]
    Geometry {
        #[from]
        source: GeometryError,
    },

    #[error("Observed torsion angle {phi} lies outside [-pi, pi)")]
    TorsionOutOfDomain { phi: f64 },

    #[error("Ring-closing restraints were requested but no reference geometry provider was given")]
    MissingReferenceGeometry,

    #[error(
        "Nonbonded parameters cover {actual} atom(s) but the topology has {expected}; sterics require one entry per atom"
    )]
    IncompleteNonbondedParameters { expected: usize, actual: usize },

    #[error("Position array holds {actual} atom(s) but the topology has {expected}")]
    PositionCountMismatch { expected: usize, actual: usize },

    #[error("Internal logic error: {0}")]
    Internal(String),
}
