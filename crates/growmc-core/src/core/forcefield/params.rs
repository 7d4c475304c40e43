use serde::Deserialize;

/// A harmonic bond-stretch term, E = (k/2)(r - r0)^2.
///
/// All parameters are in the canonical unit system: kcal/mol, Angstrom,
/// radians. Normalization to these units happens once, at load time.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
pub struct HarmonicBond {
    pub atom1: usize,
    pub atom2: usize,
    /// Equilibrium length r0 in Angstrom.
    pub length: f64,
    /// Force constant k in kcal/(mol * Angstrom^2).
    pub force_constant: f64,
}

impl HarmonicBond {
    /// Standard deviation of the equilibrium length distribution at inverse
    /// temperature `beta`: sigma = 1/sqrt(beta * k).
    pub fn sigma(&self, beta: f64) -> f64 {
        1.0 / (beta * self.force_constant).sqrt()
    }
}

/// A harmonic angle-bend term, E = (k/2)(theta - theta0)^2.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
pub struct HarmonicAngle {
    pub atom1: usize,
    pub atom2: usize,
    pub atom3: usize,
    /// Equilibrium angle theta0 in radians.
    pub angle: f64,
    /// Force constant k in kcal/(mol * radian^2).
    pub force_constant: f64,
}

impl HarmonicAngle {
    pub fn sigma(&self, beta: f64) -> f64 {
        1.0 / (beta * self.force_constant).sqrt()
    }
}

/// A periodic torsion term, E = k * (1 + cos(n*phi - phase)).
#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
pub struct PeriodicTorsion {
    pub atom1: usize,
    pub atom2: usize,
    pub atom3: usize,
    pub atom4: usize,
    pub periodicity: u32,
    /// Phase offset in radians.
    pub phase: f64,
    /// Barrier height k in kcal/mol.
    pub force_constant: f64,
}

/// Per-atom nonbonded parameters (Lennard-Jones + point charge).
#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
pub struct NonbondedParticle {
    /// Partial charge in elementary charge units.
    pub charge: f64,
    /// Lennard-Jones sigma in Angstrom.
    pub sigma: f64,
    /// Lennard-Jones well depth epsilon in kcal/mol.
    pub epsilon: f64,
}

/// A 1-4 nonbonded exception pair with its own scaled parameters.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
pub struct NonbondedException {
    pub atom1: usize,
    pub atom2: usize,
    pub charge_product: f64,
    pub sigma: f64,
    pub epsilon: f64,
}

/// A rigid bond-length constraint, substituting for a harmonic bond term.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
pub struct DistanceConstraint {
    pub atom1: usize,
    pub atom2: usize,
    /// Constrained length in Angstrom.
    pub length: f64,
}

/// The full parameterized description of one molecular system: every
/// force-field term the growth engine may consult, in canonical units.
///
/// Lookups are direction-insensitive: a bond (i, j) matches (j, i) and an
/// angle (i, j, k) matches (k, j, i), with the center atom fixed.
#[derive(Debug, Deserialize, Clone, Default, PartialEq)]
pub struct SystemParameters {
    #[serde(default)]
    pub bonds: Vec<HarmonicBond>,
    #[serde(default)]
    pub angles: Vec<HarmonicAngle>,
    #[serde(default)]
    pub torsions: Vec<PeriodicTorsion>,
    #[serde(default)]
    pub nonbonded: Vec<NonbondedParticle>,
    #[serde(default)]
    pub exceptions: Vec<NonbondedException>,
    #[serde(default)]
    pub constraints: Vec<DistanceConstraint>,
}

impl SystemParameters {
    pub fn find_bond(&self, atom1: usize, atom2: usize) -> Option<&HarmonicBond> {
        self.bonds.iter().find(|b| {
            (b.atom1 == atom1 && b.atom2 == atom2) || (b.atom1 == atom2 && b.atom2 == atom1)
        })
    }

    pub fn find_angle(&self, atom1: usize, atom2: usize, atom3: usize) -> Option<&HarmonicAngle> {
        self.angles.iter().find(|a| {
            a.atom2 == atom2
                && ((a.atom1 == atom1 && a.atom3 == atom3)
                    || (a.atom1 == atom3 && a.atom3 == atom1))
        })
    }

    /// Length of the rigid constraint between two atoms, if one is defined.
    pub fn constraint_length(&self, atom1: usize, atom2: usize) -> Option<f64> {
        self.constraints
            .iter()
            .find(|c| {
                (c.atom1 == atom1 && c.atom2 == atom2) || (c.atom1 == atom2 && c.atom2 == atom1)
            })
            .map(|c| c.length)
    }
}
