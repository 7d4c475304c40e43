use crate::core::models::topology::MolecularTopology;
use nalgebra::Point3;

/// Collaborator interface for idealized reference geometry of the residue
/// being grown.
///
/// Implementations typically wrap a cheminformatics toolkit's conformer
/// generator. The growth engine uses the conformer only to synthesize
/// auxiliary ring-closing restraint values; a provider that cannot produce
/// a conformer simply causes those restraints to be omitted.
pub trait ReferenceGeometry {
    /// One idealized 3-D conformer, indexed like the given topology's atoms,
    /// or `None` if no valid conformer can be generated.
    fn conformer(&self, topology: &MolecularTopology) -> Option<Vec<Point3<f64>>>;

    /// Whether the bond between two atoms is freely rotatable. Torsions
    /// about rotatable bonds are flexible degrees of freedom and must not
    /// receive a restraint, to avoid double-counting.
    fn is_rotatable_bond(&self, topology: &MolecularTopology, atom1: usize, atom2: usize) -> bool;
}
