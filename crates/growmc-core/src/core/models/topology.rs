use super::atom::Atom;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum BondOrder {
    Single,
    Double,
    Triple,
    Aromatic,
}

impl Default for BondOrder {
    fn default() -> Self {
        BondOrder::Single
    }
}

#[derive(Debug, Error)]
#[error("Invalid bond order string")]
pub struct ParseBondOrderError;

impl FromStr for BondOrder {
    type Err = ParseBondOrderError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "1" | "s" | "single" => Ok(Self::Single),
            "2" | "d" | "double" => Ok(Self::Double),
            "3" | "t" | "triple" => Ok(Self::Triple),
            "ar" | "aromatic" => Ok(Self::Aromatic),
            _ => Err(ParseBondOrderError),
        }
    }
}

impl fmt::Display for BondOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Self::Single => "Single",
                Self::Double => "Double",
                Self::Triple => "Triple",
                Self::Aromatic => "Aromatic",
            }
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Bond {
    pub atom1: usize,
    pub atom2: usize,
    pub order: BondOrder,
}

impl Bond {
    pub fn new(atom1: usize, atom2: usize, order: BondOrder) -> Self {
        Self {
            atom1,
            atom2,
            order,
        }
    }

    pub fn contains(&self, atom: usize) -> bool {
        self.atom1 == atom || self.atom2 == atom
    }
}

#[derive(Debug, Error)]
pub enum TopologyError {
    #[error("Atom index {0} is out of range for this topology")]
    AtomIndexOutOfRange(usize),
    #[error("Atom {0} cannot be bonded to itself")]
    SelfBond(usize),
    #[error("Bond between atoms {0} and {1} already exists")]
    DuplicateBond(usize, usize),
}

/// A bonded molecular graph: atoms addressed by dense integer indices, plus
/// the bond list and a cached adjacency list for neighbor queries.
///
/// This is the structure-provider view the growth engine consumes: it only
/// ever asks for an atom's element, its bonded neighbors, and bond orders.
#[derive(Debug, Clone, Default)]
pub struct MolecularTopology {
    atoms: Vec<Atom>,
    bonds: Vec<Bond>,
    adjacency: Vec<Vec<usize>>,
}

impl MolecularTopology {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_atom(&mut self, atom: Atom) -> usize {
        self.atoms.push(atom);
        self.adjacency.push(Vec::new());
        self.atoms.len() - 1
    }

    pub fn add_bond(
        &mut self,
        atom1: usize,
        atom2: usize,
        order: BondOrder,
    ) -> Result<(), TopologyError> {
        for &idx in &[atom1, atom2] {
            if idx >= self.atoms.len() {
                return Err(TopologyError::AtomIndexOutOfRange(idx));
            }
        }
        if atom1 == atom2 {
            return Err(TopologyError::SelfBond(atom1));
        }
        if self.adjacency[atom1].contains(&atom2) {
            return Err(TopologyError::DuplicateBond(atom1, atom2));
        }
        self.bonds.push(Bond::new(atom1, atom2, order));
        self.adjacency[atom1].push(atom2);
        self.adjacency[atom2].push(atom1);
        Ok(())
    }

    pub fn atom(&self, index: usize) -> Option<&Atom> {
        self.atoms.get(index)
    }

    pub fn atoms(&self) -> &[Atom] {
        &self.atoms
    }

    pub fn n_atoms(&self) -> usize {
        self.atoms.len()
    }

    pub fn bonds(&self) -> &[Bond] {
        &self.bonds
    }

    pub fn bonded_neighbors(&self, atom: usize) -> &[usize] {
        self.adjacency
            .get(atom)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn bond_order(&self, atom1: usize, atom2: usize) -> Option<BondOrder> {
        self.bonds
            .iter()
            .find(|b| b.contains(atom1) && b.contains(atom2))
            .map(|b| b.order)
    }

    /// Whether the atom participates in at least one aromatic bond.
    pub fn is_aromatic_atom(&self, atom: usize) -> bool {
        self.bonds
            .iter()
            .any(|b| b.contains(atom) && b.order == BondOrder::Aromatic)
    }
}
