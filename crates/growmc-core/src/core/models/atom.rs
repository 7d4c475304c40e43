use crate::core::utils::elements;

/// Represents an atom within a molecular topology.
///
/// Atoms are identified by their dense integer index into the topology's
/// atom list; that same index addresses the atom's row in every Cartesian
/// position array handled by the growth engine. Atoms are never created or
/// destroyed by the engine; it only assigns and reads positions for them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Atom {
    /// The name of the atom (e.g., "CA", "N", "HB1").
    pub name: String,
    /// The element's atomic number (1 for hydrogen/deuterium).
    pub atomic_number: u8,
}

impl Atom {
    /// Creates a new `Atom` with the given name and atomic number.
    pub fn new(name: &str, atomic_number: u8) -> Self {
        Self {
            name: name.to_string(),
            atomic_number,
        }
    }

    /// Creates a new `Atom` from an element symbol (e.g., "C", "Cl").
    ///
    /// # Return
    ///
    /// Returns `None` if the symbol is not a known element.
    pub fn from_symbol(name: &str, symbol: &str) -> Option<Self> {
        elements::atomic_number(symbol).map(|z| Self::new(name, z))
    }

    /// Whether this atom is a hydrogen (or deuterium).
    ///
    /// Heavy atoms are always placed before hydrogens in a build order.
    pub fn is_hydrogen(&self) -> bool {
        elements::is_hydrogen(self.atomic_number)
    }
}
