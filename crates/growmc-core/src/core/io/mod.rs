use crate::core::forcefield::params::SystemParameters;
use crate::core::models::atom::Atom;
use crate::core::models::topology::{BondOrder, MolecularTopology, TopologyError};
use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("File I/O error for '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("TOML parsing error for '{path}': {source}")]
    Toml {
        path: String,
        source: toml::de::Error,
    },
    #[error("Unknown element symbol '{symbol}' for atom '{name}'")]
    UnknownElement { name: String, symbol: String },
    #[error("Invalid bond order '{0}'")]
    InvalidBondOrder(String),
    #[error("Topology error: {0}")]
    Topology(#[from] TopologyError),
    #[error("Parameter term references atom index {0}, which is out of range")]
    ParameterIndexOutOfRange(usize),
}

#[derive(Debug, Deserialize)]
struct AtomRecord {
    name: String,
    element: String,
}

#[derive(Debug, Deserialize)]
struct BondRecord {
    atom1: usize,
    atom2: usize,
    #[serde(default)]
    order: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TopologyDocument {
    atoms: Vec<AtomRecord>,
    #[serde(default)]
    bonds: Vec<BondRecord>,
}

#[derive(Debug, Deserialize)]
struct SystemDocument {
    topology: TopologyDocument,
    #[serde(default)]
    parameters: SystemParameters,
}

/// Loads a molecular topology and its force-field parameters from a single
/// TOML system description. All numeric parameters in the document are
/// expected in the canonical unit system (kcal/mol, Angstrom, radians).
pub fn load_system(path: &Path) -> Result<(MolecularTopology, SystemParameters), LoadError> {
    let content = std::fs::read_to_string(path).map_err(|e| LoadError::Io {
        path: path.to_string_lossy().to_string(),
        source: e,
    })?;
    let document: SystemDocument = toml::from_str(&content).map_err(|e| LoadError::Toml {
        path: path.to_string_lossy().to_string(),
        source: e,
    })?;
    build_system(document)
}

fn build_system(
    document: SystemDocument,
) -> Result<(MolecularTopology, SystemParameters), LoadError> {
    let mut topology = MolecularTopology::new();
    for record in &document.topology.atoms {
        let atom = Atom::from_symbol(&record.name, &record.element).ok_or_else(|| {
            LoadError::UnknownElement {
                name: record.name.clone(),
                symbol: record.element.clone(),
            }
        })?;
        topology.add_atom(atom);
    }
    for record in &document.topology.bonds {
        let order = match &record.order {
            Some(s) => s
                .parse::<BondOrder>()
                .map_err(|_| LoadError::InvalidBondOrder(s.clone()))?,
            None => BondOrder::default(),
        };
        topology.add_bond(record.atom1, record.atom2, order)?;
    }

    validate_parameters(&document.parameters, topology.n_atoms())?;
    Ok((topology, document.parameters))
}

fn validate_parameters(parameters: &SystemParameters, n_atoms: usize) -> Result<(), LoadError> {
    let check = |idx: usize| {
        if idx >= n_atoms {
            Err(LoadError::ParameterIndexOutOfRange(idx))
        } else {
            Ok(())
        }
    };
    for b in &parameters.bonds {
        check(b.atom1)?;
        check(b.atom2)?;
    }
    for a in &parameters.angles {
        check(a.atom1)?;
        check(a.atom2)?;
        check(a.atom3)?;
    }
    for t in &parameters.torsions {
        check(t.atom1)?;
        check(t.atom2)?;
        check(t.atom3)?;
        check(t.atom4)?;
    }
    for e in &parameters.exceptions {
        check(e.atom1)?;
        check(e.atom2)?;
    }
    for c in &parameters.constraints {
        check(c.atom1)?;
        check(c.atom2)?;
    }
    Ok(())
}
