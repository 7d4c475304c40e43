use super::error::GrowthError;
use crate::core::models::proposal::TopologyProposal;
use crate::core::models::topology::MolecularTopology;
use rand::Rng;
use std::collections::HashSet;
use tracing::debug;

/// Which side of a topology proposal is being grown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Growing the atoms unique to the new topology.
    Forward,
    /// Evaluating the density of the atoms unique to the old topology.
    Reverse,
}

/// A topological 4-atom chain used to place one new atom: `atom1` is the
/// atom being placed; `atom2`/`atom3`/`atom4` are its bond, angle, and
/// torsion references and already hold positions when the atom is processed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TorsionChain {
    pub atom1: usize,
    pub atom2: usize,
    pub atom3: usize,
    pub atom4: usize,
}

/// A valid build order over the unique atoms of one proposal side, plus the
/// total log-probability of the random torsion choices taken along the way.
#[derive(Debug, Clone)]
pub struct ProposalOrder {
    pub atom_torsions: Vec<(usize, TorsionChain)>,
    pub logp_choice: f64,
}

/// Computes a randomized, topologically valid build order for the atoms
/// unique to one side of a topology proposal.
///
/// Heavy atoms are fully ordered and placed before any hydrogen: hydrogens
/// carry almost no directional information, and growing them early
/// destabilizes the torsion scans of the heavy atoms that follow.
pub struct ProposalOrderResolver<'a> {
    proposal: &'a TopologyProposal,
}

impl<'a> ProposalOrderResolver<'a> {
    pub fn new(proposal: &'a TopologyProposal) -> Self {
        Self { proposal }
    }

    pub fn determine_order(
        &self,
        direction: Direction,
        rng: &mut impl Rng,
    ) -> Result<ProposalOrder, GrowthError> {
        let (topology, unique_atoms, mut positioned): (_, _, HashSet<usize>) = match direction {
            Direction::Forward => (
                &self.proposal.new_topology,
                self.proposal.unique_new_atoms(),
                self.proposal.new_to_old().keys().copied().collect(),
            ),
            Direction::Reverse => (
                &self.proposal.old_topology,
                self.proposal.unique_old_atoms(),
                self.proposal.old_to_new().keys().copied().collect(),
            ),
        };

        let mut heavy_atoms: Vec<usize> = unique_atoms
            .iter()
            .copied()
            .filter(|&idx| topology.atom(idx).is_some_and(|a| !a.is_hydrogen()))
            .collect();
        let mut hydrogen_atoms: Vec<usize> = unique_atoms
            .iter()
            .copied()
            .filter(|&idx| topology.atom(idx).is_some_and(|a| a.is_hydrogen()))
            .collect();
        debug!(
            heavy = heavy_atoms.len(),
            hydrogens = hydrogen_atoms.len(),
            "resolving proposal order"
        );

        let mut atom_torsions = Vec::with_capacity(unique_atoms.len());
        let mut logp_choice = 0.0;
        self.place_partition(
            topology,
            &mut heavy_atoms,
            &mut positioned,
            &mut atom_torsions,
            &mut logp_choice,
            rng,
        )?;
        self.place_partition(
            topology,
            &mut hydrogen_atoms,
            &mut positioned,
            &mut atom_torsions,
            &mut logp_choice,
            rng,
        )?;

        Ok(ProposalOrder {
            atom_torsions,
            logp_choice,
        })
    }

    fn place_partition(
        &self,
        topology: &MolecularTopology,
        remaining: &mut Vec<usize>,
        positioned: &mut HashSet<usize>,
        atom_torsions: &mut Vec<(usize, TorsionChain)>,
        logp_choice: &mut f64,
        rng: &mut impl Rng,
    ) -> Result<(), GrowthError> {
        while !remaining.is_empty() {
            // Eligibility is evaluated once per pass; atoms resolved earlier
            // in the same pass still extend the positioned set for the
            // torsion choices of the atoms after them.
            let eligible: Vec<usize> = remaining
                .iter()
                .copied()
                .filter(|&atom| {
                    topology
                        .bonded_neighbors(atom)
                        .iter()
                        .any(|neighbor| positioned.contains(neighbor))
                })
                .collect();
            if eligible.is_empty() {
                return Err(GrowthError::TopologicalInconsistency {
                    remaining: remaining.len(),
                });
            }

            for atom in eligible {
                let candidates = topological_torsions(topology, positioned, atom);
                if candidates.is_empty() {
                    return Err(GrowthError::NoSupportingTorsion { atom });
                }
                let chosen = candidates[rng.gen_range(0..candidates.len())];
                *logp_choice -= (candidates.len() as f64).ln();
                atom_torsions.push((atom, chosen));
                positioned.insert(atom);
                remaining.retain(|&a| a != atom);
            }
        }
        Ok(())
    }
}

/// Enumerates every topological torsion chain (atom1, b, c, d) whose three
/// reference atoms already hold positions. Candidates are purely
/// topological; no force-field torsion term needs to exist for them.
fn topological_torsions(
    topology: &MolecularTopology,
    positioned: &HashSet<usize>,
    atom1: usize,
) -> Vec<TorsionChain> {
    let mut torsions = Vec::new();
    for &atom2 in topology.bonded_neighbors(atom1) {
        if !positioned.contains(&atom2) {
            continue;
        }
        for &atom3 in topology.bonded_neighbors(atom2) {
            if atom3 == atom1 || !positioned.contains(&atom3) {
                continue;
            }
            for &atom4 in topology.bonded_neighbors(atom3) {
                if atom4 == atom1 || atom4 == atom2 || !positioned.contains(&atom4) {
                    continue;
                }
                torsions.push(TorsionChain {
                    atom1,
                    atom2,
                    atom3,
                    atom4,
                });
            }
        }
    }
    torsions
}
