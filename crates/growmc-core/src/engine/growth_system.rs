use super::error::GrowthError;
use super::reference::ReferenceGeometry;
use crate::core::forcefield::params::SystemParameters;
use crate::core::forcefield::potentials;
use crate::core::models::topology::MolecularTopology;
use crate::core::utils::geometry::{angle_between, dihedral_angle};
use nalgebra::Point3;
use std::collections::{HashMap, HashSet};
use std::f64::consts::{PI, TAU};
use tracing::{debug, warn};

const STERICS_CUTOFF: f64 = 9.0; // Angstrom
const RING_TORSION_FORCE_CONSTANT: f64 = 120.0; // kcal/mol
const RING_ANGLE_FORCE_CONSTANT: f64 = 95.6; // kcal/(mol·rad²)

#[derive(Debug, Clone, Copy)]
struct StagedBond {
    atom1: usize,
    atom2: usize,
    length: f64,
    force_constant: f64,
    growth_index: usize,
}

#[derive(Debug, Clone, Copy)]
struct StagedAngle {
    atom1: usize,
    atom2: usize,
    atom3: usize,
    angle: f64,
    force_constant: f64,
    growth_index: usize,
}

#[derive(Debug, Clone, Copy)]
struct StagedTorsion {
    atom1: usize,
    atom2: usize,
    atom3: usize,
    atom4: usize,
    periodicity: u32,
    phase: f64,
    force_constant: f64,
    growth_index: usize,
}

#[derive(Debug, Clone, Copy)]
struct StagedException {
    atom1: usize,
    atom2: usize,
    charge_product: f64,
    sigma: f64,
    epsilon: f64,
    growth_index: usize,
}

#[derive(Debug, Clone, Copy)]
struct StagedParticle {
    charge: f64,
    sigma: f64,
    epsilon: f64,
    growth_index: usize,
}

#[derive(Debug, Clone, Copy)]
pub struct GrowthSystemOptions {
    /// Whether short-range steric/electrostatic interactions participate in
    /// the growth energy. Valence terms and 1-4 exceptions always do.
    pub use_sterics: bool,
    /// Whether to synthesize auxiliary ring-closing angle/torsion restraints
    /// from a reference conformer.
    pub extra_restraints: bool,
}

impl Default for GrowthSystemOptions {
    fn default() -> Self {
        Self {
            use_sterics: false,
            extra_restraints: false,
        }
    }
}

/// A growth-restricted view of a parameterized system.
///
/// Every interaction term carries an explicit growth index: the build-order
/// rank (1-based) of the latest-added atom it touches, or 0 when it involves
/// only pre-existing atoms. A term contributes energy only while its growth
/// index is at most the current growth stage, so advancing the stage by one
/// activates exactly the terms introduced by the next atom in the build
/// order. Re-parameterization is an integer store: idempotent and auditable.
///
/// One instance is scoped to a single propose/reverse call and dropped
/// afterwards; it is never shared across calls or threads.
#[derive(Debug)]
pub struct GrowthSystem {
    n_atoms: usize,
    stage: usize,
    bonds: Vec<StagedBond>,
    angles: Vec<StagedAngle>,
    torsions: Vec<StagedTorsion>,
    exceptions: Vec<StagedException>,
    particles: Vec<StagedParticle>,
    exclusions: HashSet<(usize, usize)>,
    new_atoms: HashSet<usize>,
    use_sterics: bool,
}

impl GrowthSystem {
    pub fn new(
        topology: &MolecularTopology,
        parameters: &SystemParameters,
        growth_order: &[usize],
        options: GrowthSystemOptions,
        reference_geometry: Option<&dyn ReferenceGeometry>,
    ) -> Result<Self, GrowthError> {
        let rank: HashMap<usize, usize> = growth_order
            .iter()
            .enumerate()
            .map(|(i, &atom)| (atom, i + 1))
            .collect();
        let growth_index = |atoms: &[usize]| -> usize {
            atoms
                .iter()
                .filter_map(|a| rank.get(a))
                .copied()
                .max()
                .unwrap_or(0)
        };

        let bonds = parameters
            .bonds
            .iter()
            .map(|b| StagedBond {
                atom1: b.atom1,
                atom2: b.atom2,
                length: b.length,
                force_constant: b.force_constant,
                growth_index: growth_index(&[b.atom1, b.atom2]),
            })
            .collect();
        let angles = parameters
            .angles
            .iter()
            .map(|a| StagedAngle {
                atom1: a.atom1,
                atom2: a.atom2,
                atom3: a.atom3,
                angle: a.angle,
                force_constant: a.force_constant,
                growth_index: growth_index(&[a.atom1, a.atom2, a.atom3]),
            })
            .collect();
        let torsions: Vec<StagedTorsion> = parameters
            .torsions
            .iter()
            .map(|t| StagedTorsion {
                atom1: t.atom1,
                atom2: t.atom2,
                atom3: t.atom3,
                atom4: t.atom4,
                periodicity: t.periodicity,
                phase: t.phase,
                force_constant: t.force_constant,
                growth_index: growth_index(&[t.atom1, t.atom2, t.atom3, t.atom4]),
            })
            .collect();
        let exceptions = parameters
            .exceptions
            .iter()
            .filter(|e| e.charge_product != 0.0 || e.epsilon != 0.0)
            .map(|e| StagedException {
                atom1: e.atom1,
                atom2: e.atom2,
                charge_product: e.charge_product,
                sigma: e.sigma,
                epsilon: e.epsilon,
                growth_index: growth_index(&[e.atom1, e.atom2]),
            })
            .collect();

        let mut particles = Vec::new();
        let mut exclusions = HashSet::new();
        if options.use_sterics {
            if parameters.nonbonded.len() != topology.n_atoms() {
                return Err(GrowthError::IncompleteNonbondedParameters {
                    expected: topology.n_atoms(),
                    actual: parameters.nonbonded.len(),
                });
            }
            particles = parameters
                .nonbonded
                .iter()
                .enumerate()
                .map(|(atom, p)| StagedParticle {
                    charge: p.charge,
                    sigma: p.sigma,
                    epsilon: p.epsilon,
                    growth_index: growth_index(&[atom]),
                })
                .collect();
            // Every exception pair is excluded from the plain steric sum;
            // its interaction is carried by the exception term instead.
            exclusions = parameters
                .exceptions
                .iter()
                .map(|e| ordered_pair(e.atom1, e.atom2))
                .collect();
        }

        let mut system = Self {
            n_atoms: topology.n_atoms(),
            stage: 0,
            bonds,
            angles,
            torsions,
            exceptions,
            particles,
            exclusions,
            new_atoms: rank.keys().copied().collect(),
            use_sterics: options.use_sterics,
        };

        if options.extra_restraints && !growth_order.is_empty() {
            let provider = reference_geometry.ok_or(GrowthError::MissingReferenceGeometry)?;
            system.add_ring_closing_restraints(topology, provider, &rank);
        }

        Ok(system)
    }

    /// Synthesizes auxiliary angle/torsion restraints from an idealized
    /// conformer so that rings close reliably during the short,
    /// minimization-free build. Best-effort: a missing conformer only means
    /// the restraints are omitted.
    fn add_ring_closing_restraints(
        &mut self,
        topology: &MolecularTopology,
        provider: &dyn ReferenceGeometry,
        rank: &HashMap<usize, usize>,
    ) {
        let Some(conformer) = provider.conformer(topology) else {
            warn!("no reference conformer available; ring-closing restraints omitted");
            return;
        };
        if conformer.len() != topology.n_atoms() {
            warn!(
                expected = topology.n_atoms(),
                actual = conformer.len(),
                "reference conformer does not cover the topology; ring-closing restraints omitted"
            );
            return;
        }
        let growth_index = |atoms: &[usize]| -> usize {
            atoms
                .iter()
                .filter_map(|a| rank.get(a))
                .copied()
                .max()
                .unwrap_or(0)
        };
        let is_heavy =
            |atom: usize| -> bool { topology.atom(atom).is_some_and(|a| !a.is_hydrogen()) };

        let mut n_torsions = 0;
        for bond in topology.bonds() {
            let (j, k) = (bond.atom1, bond.atom2);
            if provider.is_rotatable_bond(topology, j, k) {
                continue;
            }
            for &i in topology.bonded_neighbors(j) {
                if i == k || !is_heavy(i) {
                    continue;
                }
                for &l in topology.bonded_neighbors(k) {
                    if l == j || l == i || !is_heavy(l) {
                        continue;
                    }
                    if !is_heavy(j) || !is_heavy(k) {
                        continue;
                    }
                    let Ok(measured) =
                        dihedral_angle(&conformer[i], &conformer[j], &conformer[k], &conformer[l])
                    else {
                        continue;
                    };
                    self.torsions.push(StagedTorsion {
                        atom1: i,
                        atom2: j,
                        atom3: k,
                        atom4: l,
                        periodicity: 1,
                        phase: wrap_to_pi(measured + PI),
                        force_constant: RING_TORSION_FORCE_CONSTANT,
                        growth_index: growth_index(&[i, j, k, l]),
                    });
                    n_torsions += 1;
                }
            }
        }
        if n_torsions == 0 {
            warn!("reference conformer yielded no ring-closing torsion restraints");
        }

        let mut n_angles = 0;
        for center in 0..topology.n_atoms() {
            if !topology.is_aromatic_atom(center) || !is_heavy(center) {
                continue;
            }
            let neighbors = topology.bonded_neighbors(center);
            for (a, &i) in neighbors.iter().enumerate() {
                for &k in neighbors.iter().skip(a + 1) {
                    if !is_heavy(i) || !is_heavy(k) {
                        continue;
                    }
                    let measured = angle_between(
                        &(conformer[i] - conformer[center]),
                        &(conformer[k] - conformer[center]),
                    );
                    if !measured.is_finite() {
                        continue;
                    }
                    self.angles.push(StagedAngle {
                        atom1: i,
                        atom2: center,
                        atom3: k,
                        angle: measured,
                        force_constant: RING_ANGLE_FORCE_CONSTANT,
                        growth_index: growth_index(&[i, center, k]),
                    });
                    n_angles += 1;
                }
            }
        }
        debug!(
            torsion_restraints = n_torsions,
            angle_restraints = n_angles,
            "added ring-closing restraints"
        );
    }

    /// Sets the growth stage: terms with growth index above `stage` are
    /// inactive, everything else contributes at its reference value.
    pub fn set_growth_stage(&mut self, stage: usize) {
        self.stage = stage;
    }

    pub fn stage(&self) -> usize {
        self.stage
    }

    /// Potential energy of `positions` under the current growth stage, in
    /// kcal/mol. Degenerate geometry in an active term yields NaN, which the
    /// torsion sampler treats as zero probability.
    pub fn evaluate_energy(&self, positions: &[Point3<f64>]) -> f64 {
        debug_assert_eq!(positions.len(), self.n_atoms);
        let stage = self.stage;
        let mut energy = 0.0;

        for bond in self.bonds.iter().filter(|t| t.growth_index <= stage) {
            let dist = (positions[bond.atom1] - positions[bond.atom2]).norm();
            energy += potentials::harmonic_bond(dist, bond.length, bond.force_constant);
        }
        for angle in self.angles.iter().filter(|t| t.growth_index <= stage) {
            let theta = angle_between(
                &(positions[angle.atom1] - positions[angle.atom2]),
                &(positions[angle.atom3] - positions[angle.atom2]),
            );
            energy += potentials::harmonic_angle(theta, angle.angle, angle.force_constant);
        }
        for torsion in self.torsions.iter().filter(|t| t.growth_index <= stage) {
            let phi = match dihedral_angle(
                &positions[torsion.atom1],
                &positions[torsion.atom2],
                &positions[torsion.atom3],
                &positions[torsion.atom4],
            ) {
                Ok(phi) => phi,
                Err(_) => f64::NAN,
            };
            energy += potentials::periodic_torsion(
                phi,
                torsion.periodicity,
                torsion.phase,
                torsion.force_constant,
            );
        }
        for exception in self.exceptions.iter().filter(|t| t.growth_index <= stage) {
            let dist = (positions[exception.atom1] - positions[exception.atom2]).norm();
            energy += potentials::coulomb(dist, exception.charge_product)
                + potentials::lennard_jones(dist, exception.sigma, exception.epsilon);
        }
        if self.use_sterics {
            energy += self.steric_energy(positions, stage);
        }

        energy
    }

    /// Steric/electrostatic sum restricted to pairs touching at least one
    /// new atom; pre-existing/pre-existing pairs never enter the growth
    /// energy (their contribution is constant over every placement).
    fn steric_energy(&self, positions: &[Point3<f64>], stage: usize) -> f64 {
        let mut energy = 0.0;
        for i in 0..self.n_atoms {
            for j in (i + 1)..self.n_atoms {
                if !self.new_atoms.contains(&i) && !self.new_atoms.contains(&j) {
                    continue;
                }
                if self.exclusions.contains(&(i, j)) {
                    continue;
                }
                let (pi, pj) = (&self.particles[i], &self.particles[j]);
                if pi.growth_index > stage || pj.growth_index > stage {
                    continue;
                }
                let dist = (positions[i] - positions[j]).norm();
                if dist >= STERICS_CUTOFF {
                    continue;
                }
                let sigma = 0.5 * (pi.sigma + pj.sigma);
                let epsilon = (pi.epsilon * pj.epsilon).sqrt();
                energy += potentials::lennard_jones(dist, sigma, epsilon)
                    + potentials::coulomb(dist, pi.charge * pj.charge);
            }
        }
        energy
    }
}

fn ordered_pair(a: usize, b: usize) -> (usize, usize) {
    if a < b { (a, b) } else { (b, a) }
}

fn wrap_to_pi(mut phi: f64) -> f64 {
    while phi >= PI {
        phi -= TAU;
    }
    while phi < -PI {
        phi += TAU;
    }
    phi
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::forcefield::params::{
        HarmonicAngle, HarmonicBond, NonbondedParticle, PeriodicTorsion,
    };
    use crate::core::models::atom::Atom;
    use crate::core::models::topology::BondOrder;

    const TOLERANCE: f64 = 1e-9;

    fn valence_options() -> GrowthSystemOptions {
        GrowthSystemOptions {
            use_sterics: false,
            extra_restraints: false,
        }
    }

    fn chain_topology(n: usize) -> MolecularTopology {
        let mut topology = MolecularTopology::new();
        for i in 0..n {
            topology.add_atom(Atom::new(&format!("C{}", i), 6));
        }
        for i in 1..n {
            topology.add_bond(i - 1, i, BondOrder::Single).unwrap();
        }
        topology
    }

    fn chain_positions(n: usize) -> Vec<Point3<f64>> {
        // Off-equilibrium zig-zag so that every term contributes energy.
        (0..n)
            .map(|i| Point3::new(1.4 * i as f64, if i % 2 == 0 { 0.0 } else { 0.9 }, 0.0))
            .collect()
    }

    fn bond_term(atom1: usize, atom2: usize) -> HarmonicBond {
        HarmonicBond {
            atom1,
            atom2,
            length: 1.53,
            force_constant: 620.0,
        }
    }

    #[test]
    fn growth_indices_gate_terms_by_build_order_rank() {
        let topology = chain_topology(4);
        let parameters = SystemParameters {
            bonds: vec![bond_term(0, 1), bond_term(1, 2), bond_term(2, 3)],
            ..Default::default()
        };
        // Atom 3 is new, rank 1.
        let system =
            GrowthSystem::new(&topology, &parameters, &[3], valence_options(), None).unwrap();

        assert_eq!(system.bonds[0].growth_index, 0);
        assert_eq!(system.bonds[1].growth_index, 0);
        assert_eq!(system.bonds[2].growth_index, 1);
    }

    #[test]
    fn stage_zero_energy_covers_only_the_pre_existing_subsystem() {
        let topology = chain_topology(4);
        let parameters = SystemParameters {
            bonds: vec![bond_term(0, 1), bond_term(1, 2), bond_term(2, 3)],
            ..Default::default()
        };
        let positions = chain_positions(4);
        let system =
            GrowthSystem::new(&topology, &parameters, &[3], valence_options(), None).unwrap();

        let expected: f64 = parameters.bonds[..2]
            .iter()
            .map(|b| {
                let dist = (positions[b.atom1] - positions[b.atom2]).norm();
                potentials::harmonic_bond(dist, b.length, b.force_constant)
            })
            .sum();
        assert!((system.evaluate_energy(&positions) - expected).abs() < TOLERANCE);
    }

    #[test]
    fn advancing_the_stage_never_removes_energy_terms() {
        let topology = chain_topology(5);
        let parameters = SystemParameters {
            bonds: vec![
                bond_term(0, 1),
                bond_term(1, 2),
                bond_term(2, 3),
                bond_term(3, 4),
            ],
            angles: vec![HarmonicAngle {
                atom1: 2,
                atom2: 3,
                atom3: 4,
                angle: 1.911,
                force_constant: 100.0,
            }],
            ..Default::default()
        };
        let positions = chain_positions(5);
        let mut system =
            GrowthSystem::new(&topology, &parameters, &[3, 4], valence_options(), None).unwrap();

        let mut previous = f64::NEG_INFINITY;
        for stage in 0..=2 {
            system.set_growth_stage(stage);
            let energy = system.evaluate_energy(&positions);
            assert!(energy >= previous - TOLERANCE);
            previous = energy;
        }
    }

    #[test]
    fn set_growth_stage_is_idempotent() {
        let topology = chain_topology(4);
        let parameters = SystemParameters {
            bonds: vec![bond_term(0, 1), bond_term(1, 2), bond_term(2, 3)],
            ..Default::default()
        };
        let positions = chain_positions(4);
        let mut system =
            GrowthSystem::new(&topology, &parameters, &[3], valence_options(), None).unwrap();

        system.set_growth_stage(1);
        let first = system.evaluate_energy(&positions);
        system.set_growth_stage(1);
        assert_eq!(system.evaluate_energy(&positions), first);
        assert_eq!(system.stage(), 1);
    }

    #[test]
    fn inactive_torsion_with_degenerate_geometry_does_not_poison_the_energy() {
        let topology = chain_topology(4);
        let parameters = SystemParameters {
            torsions: vec![PeriodicTorsion {
                atom1: 0,
                atom2: 1,
                atom3: 2,
                atom4: 3,
                periodicity: 1,
                phase: 0.0,
                force_constant: 2.0,
            }],
            ..Default::default()
        };
        // Perfectly collinear chain: the torsion is undefined.
        let positions: Vec<Point3<f64>> =
            (0..4).map(|i| Point3::new(i as f64, 0.0, 0.0)).collect();
        let mut system =
            GrowthSystem::new(&topology, &parameters, &[3], valence_options(), None).unwrap();

        system.set_growth_stage(0);
        assert_eq!(system.evaluate_energy(&positions), 0.0);
        system.set_growth_stage(1);
        assert!(system.evaluate_energy(&positions).is_nan());
    }

    #[test]
    fn sterics_require_complete_nonbonded_parameters() {
        let topology = chain_topology(3);
        let parameters = SystemParameters {
            nonbonded: vec![NonbondedParticle {
                charge: 0.0,
                sigma: 3.4,
                epsilon: 0.1,
            }],
            ..Default::default()
        };
        let result = GrowthSystem::new(
            &topology,
            &parameters,
            &[2],
            GrowthSystemOptions {
                use_sterics: true,
                extra_restraints: false,
            },
            None,
        );
        assert!(matches!(
            result,
            Err(GrowthError::IncompleteNonbondedParameters {
                expected: 3,
                actual: 1
            })
        ));
    }

    #[test]
    fn steric_energy_only_counts_pairs_touching_a_new_atom() {
        let topology = chain_topology(3);
        let particle = NonbondedParticle {
            charge: 0.0,
            sigma: 3.0,
            epsilon: 0.2,
        };
        let parameters = SystemParameters {
            nonbonded: vec![particle; 3],
            ..Default::default()
        };
        let positions = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(4.0, 0.0, 0.0),
            Point3::new(8.0, 0.0, 0.0),
        ];
        let mut system = GrowthSystem::new(
            &topology,
            &parameters,
            &[2],
            GrowthSystemOptions {
                use_sterics: true,
                extra_restraints: false,
            },
            None,
        )
        .unwrap();

        // Atom 2 not yet grown: no steric pair is active.
        system.set_growth_stage(0);
        assert!(system.evaluate_energy(&positions).abs() < TOLERANCE);

        // Atom 2 grown: pairs (0,2) and (1,2) are active, (0,1) is not.
        system.set_growth_stage(1);
        let expected = potentials::lennard_jones(8.0, 3.0, 0.2)
            + potentials::lennard_jones(4.0, 3.0, 0.2);
        assert!((system.evaluate_energy(&positions) - expected).abs() < TOLERANCE);
    }

    #[test]
    fn requesting_restraints_without_a_provider_fails_fast() {
        let topology = chain_topology(4);
        let parameters = SystemParameters::default();
        let result = GrowthSystem::new(
            &topology,
            &parameters,
            &[3],
            GrowthSystemOptions {
                use_sterics: false,
                extra_restraints: true,
            },
            None,
        );
        assert!(matches!(result, Err(GrowthError::MissingReferenceGeometry)));
    }

    struct FixedConformer {
        positions: Option<Vec<Point3<f64>>>,
        rotatable: bool,
    }

    impl ReferenceGeometry for FixedConformer {
        fn conformer(&self, _topology: &MolecularTopology) -> Option<Vec<Point3<f64>>> {
            self.positions.clone()
        }
        fn is_rotatable_bond(
            &self,
            _topology: &MolecularTopology,
            _atom1: usize,
            _atom2: usize,
        ) -> bool {
            self.rotatable
        }
    }

    fn bent_conformer() -> Vec<Point3<f64>> {
        vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.5, 0.0, 0.0),
            Point3::new(2.2, 1.3, 0.0),
            Point3::new(3.7, 1.4, 0.6),
        ]
    }

    #[test]
    fn provider_without_conformer_omits_restraints_without_error() {
        let topology = chain_topology(4);
        let provider = FixedConformer {
            positions: None,
            rotatable: false,
        };
        let system = GrowthSystem::new(
            &topology,
            &SystemParameters::default(),
            &[3],
            GrowthSystemOptions {
                use_sterics: false,
                extra_restraints: true,
            },
            Some(&provider),
        )
        .unwrap();
        assert!(system.torsions.is_empty());
        assert!(system.angles.is_empty());
    }

    #[test]
    fn non_rotatable_heavy_torsions_receive_restraints() {
        let topology = chain_topology(4);
        let provider = FixedConformer {
            positions: Some(bent_conformer()),
            rotatable: false,
        };
        let system = GrowthSystem::new(
            &topology,
            &SystemParameters::default(),
            &[3],
            GrowthSystemOptions {
                use_sterics: false,
                extra_restraints: true,
            },
            Some(&provider),
        )
        .unwrap();

        // Exactly one heavy 4-chain exists: 0-1-2-3.
        assert_eq!(system.torsions.len(), 1);
        let restraint = &system.torsions[0];
        assert_eq!(restraint.periodicity, 1);
        assert_eq!(restraint.force_constant, RING_TORSION_FORCE_CONSTANT);
        assert_eq!(restraint.growth_index, 1);
        assert!(restraint.phase >= -PI && restraint.phase < PI);

        // The restraint minimum sits at the measured conformer torsion.
        let conformer = bent_conformer();
        let measured =
            dihedral_angle(&conformer[0], &conformer[1], &conformer[2], &conformer[3]).unwrap();
        let energy_at_measured = potentials::periodic_torsion(
            measured,
            restraint.periodicity,
            restraint.phase,
            restraint.force_constant,
        );
        assert!(energy_at_measured.abs() < 1e-6);
    }

    #[test]
    fn rotatable_bonds_are_left_unrestrained() {
        let topology = chain_topology(4);
        let provider = FixedConformer {
            positions: Some(bent_conformer()),
            rotatable: true,
        };
        let system = GrowthSystem::new(
            &topology,
            &SystemParameters::default(),
            &[3],
            GrowthSystemOptions {
                use_sterics: false,
                extra_restraints: true,
            },
            Some(&provider),
        )
        .unwrap();
        assert!(system.torsions.is_empty());
    }

    #[test]
    fn aromatic_centers_receive_angle_restraints() {
        let mut aromatic = MolecularTopology::new();
        for i in 0..4 {
            aromatic.add_atom(Atom::new(&format!("C{}", i), 6));
        }
        aromatic.add_bond(0, 1, BondOrder::Aromatic).unwrap();
        aromatic.add_bond(1, 2, BondOrder::Aromatic).unwrap();
        aromatic.add_bond(2, 3, BondOrder::Single).unwrap();

        let provider = FixedConformer {
            positions: Some(bent_conformer()),
            rotatable: true, // suppress torsion restraints; isolate angles
        };
        let system = GrowthSystem::new(
            &aromatic,
            &SystemParameters::default(),
            &[3],
            GrowthSystemOptions {
                use_sterics: false,
                extra_restraints: true,
            },
            Some(&provider),
        )
        .unwrap();

        // Aromatic centers 1 (neighbors 0, 2) and 2 (neighbors 1, 3) each
        // contribute one heavy-atom angle restraint.
        assert_eq!(system.angles.len(), 2);
        assert!(
            system
                .angles
                .iter()
                .all(|a| a.force_constant == RING_ANGLE_FORCE_CONSTANT)
        );
    }

    #[test]
    fn wrap_to_pi_maps_into_the_half_open_interval() {
        assert!((wrap_to_pi(PI) + PI).abs() < TOLERANCE);
        assert!((wrap_to_pi(3.0 * PI) + PI).abs() < TOLERANCE);
        assert!((wrap_to_pi(-PI) + PI).abs() < TOLERANCE);
        assert!((wrap_to_pi(0.5) - 0.5).abs() < TOLERANCE);
    }
}
