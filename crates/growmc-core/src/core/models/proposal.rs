use super::topology::MolecularTopology;
use crate::core::forcefield::params::SystemParameters;
use std::collections::HashMap;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProposalError {
    #[error("Mapped atom index {index} is out of range for the {side} topology")]
    AtomIndexOutOfRange { side: &'static str, index: usize },
    #[error("Old atom {0} is mapped from more than one new atom")]
    DuplicateMappedAtom(usize),
}

/// Pairs an "old" and "new" parameterized topology with the bidirectional
/// partial atom-index mapping between them.
///
/// The mapping is supplied in the new→old direction; the inverse map and the
/// unique-atom sets for both sides are derived at construction so that the
/// invariant holds by definition: atoms absent from the mapping are exactly
/// the unique sets. Consumed read-only by the growth engine.
#[derive(Debug, Clone)]
pub struct TopologyProposal {
    pub old_topology: MolecularTopology,
    pub new_topology: MolecularTopology,
    pub old_parameters: SystemParameters,
    pub new_parameters: SystemParameters,
    new_to_old: HashMap<usize, usize>,
    old_to_new: HashMap<usize, usize>,
    unique_new_atoms: Vec<usize>,
    unique_old_atoms: Vec<usize>,
}

impl TopologyProposal {
    pub fn new(
        old_topology: MolecularTopology,
        old_parameters: SystemParameters,
        new_topology: MolecularTopology,
        new_parameters: SystemParameters,
        new_to_old: HashMap<usize, usize>,
    ) -> Result<Self, ProposalError> {
        let mut old_to_new = HashMap::with_capacity(new_to_old.len());
        for (&new_idx, &old_idx) in &new_to_old {
            if new_idx >= new_topology.n_atoms() {
                return Err(ProposalError::AtomIndexOutOfRange {
                    side: "new",
                    index: new_idx,
                });
            }
            if old_idx >= old_topology.n_atoms() {
                return Err(ProposalError::AtomIndexOutOfRange {
                    side: "old",
                    index: old_idx,
                });
            }
            if old_to_new.insert(old_idx, new_idx).is_some() {
                return Err(ProposalError::DuplicateMappedAtom(old_idx));
            }
        }

        let unique_new_atoms = (0..new_topology.n_atoms())
            .filter(|idx| !new_to_old.contains_key(idx))
            .collect();
        let unique_old_atoms = (0..old_topology.n_atoms())
            .filter(|idx| !old_to_new.contains_key(idx))
            .collect();

        Ok(Self {
            old_topology,
            new_topology,
            old_parameters,
            new_parameters,
            new_to_old,
            old_to_new,
            unique_new_atoms,
            unique_old_atoms,
        })
    }

    pub fn new_to_old(&self) -> &HashMap<usize, usize> {
        &self.new_to_old
    }

    pub fn old_to_new(&self) -> &HashMap<usize, usize> {
        &self.old_to_new
    }

    /// Atoms present only in the new topology, in ascending index order.
    pub fn unique_new_atoms(&self) -> &[usize] {
        &self.unique_new_atoms
    }

    /// Atoms present only in the old topology, in ascending index order.
    pub fn unique_old_atoms(&self) -> &[usize] {
        &self.unique_old_atoms
    }

    pub fn n_atoms_new(&self) -> usize {
        self.new_topology.n_atoms()
    }

    pub fn n_atoms_old(&self) -> usize {
        self.old_topology.n_atoms()
    }
}
