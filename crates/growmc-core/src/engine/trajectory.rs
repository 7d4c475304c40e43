use crate::core::models::topology::MolecularTopology;
use nalgebra::Point3;
use std::io::{self, Write};

/// Observational hook receiving a snapshot after each atom placement.
///
/// Writers never feed back into the algorithm; a failing writer only costs
/// the debug output. Disabled by default on the engine.
pub trait TrajectoryWriter {
    /// Appends one frame containing the subset of atoms that currently hold
    /// positions.
    fn write_frame(
        &mut self,
        topology: &MolecularTopology,
        positions: &[Point3<f64>],
        positioned_atoms: &[usize],
        model_index: usize,
    ) -> io::Result<()>;
}

/// Writes placement snapshots as multi-frame XYZ to any byte sink.
pub struct XyzTrajectoryWriter<W: Write> {
    sink: W,
}

impl<W: Write> XyzTrajectoryWriter<W> {
    pub fn new(sink: W) -> Self {
        Self { sink }
    }
}

impl<W: Write> TrajectoryWriter for XyzTrajectoryWriter<W> {
    fn write_frame(
        &mut self,
        topology: &MolecularTopology,
        positions: &[Point3<f64>],
        positioned_atoms: &[usize],
        model_index: usize,
    ) -> io::Result<()> {
        writeln!(self.sink, "{}", positioned_atoms.len())?;
        writeln!(self.sink, "model {}", model_index)?;
        for &atom_idx in positioned_atoms {
            let name = topology
                .atom(atom_idx)
                .map(|a| a.name.as_str())
                .unwrap_or("X");
            let p = positions[atom_idx];
            writeln!(self.sink, "{} {:.6} {:.6} {:.6}", name, p.x, p.y, p.z)?;
        }
        self.sink.flush()
    }
}
