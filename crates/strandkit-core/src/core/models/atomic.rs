use super::ids::GlobalId;
use super::types::NucleicAcidKind;
use nalgebra::Point3;
use std::ops::Range;

/// Secondary-structure assignment of a generated residue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SecondaryStructure {
    Helix,
    #[default]
    Coil,
}

/// Chemistry of a generated chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeneratedChainKind {
    NucleicAcid(NucleicAcidKind),
    Protein,
}

/// One all-atom particle of the reconstructed model.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedAtom {
    pub name: String,
    pub element: String,
    pub position: Point3<f64>,
    /// Index into [`AtomicModel::residues`].
    pub residue: usize,
    pub serial: u32,
}

/// One reconstructed residue, covering a contiguous atom range.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedResidue {
    pub name: String,
    pub serial: u32,
    pub atoms: Range<usize>,
    /// Index into [`AtomicModel::chains`].
    pub chain: usize,
    pub secondary: SecondaryStructure,
    /// Global id of the coarse-grained monomer this residue was built from.
    pub source_monomer: GlobalId,
}

/// One reconstructed chain, covering a contiguous residue range.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedChain {
    pub name: String,
    pub kind: GeneratedChainKind,
    pub residues: Range<usize>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BondKind {
    /// Intra-residue bond taken from the fragment template.
    Template,
    /// Inter-residue backbone linkage confirmed geometrically.
    Linkage,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AtomBond {
    pub a: usize,
    pub b: usize,
    pub kind: BondKind,
}

impl AtomBond {
    pub fn new(a: usize, b: usize, kind: BondKind) -> Self {
        Self { a, b, kind }
    }

    pub fn contains(&self, atom: usize) -> bool {
        self.a == atom || self.b == atom
    }
}

/// Exact output sizes computed by the generation engine's sizing pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ModelSizing {
    pub atoms: usize,
    pub residues: usize,
    pub chains: usize,
}

/// The fully populated all-atom model of a structure.
///
/// Buffers are preallocated to the sizing pass's exact totals and filled in
/// place during placement; the model never grows incrementally.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AtomicModel {
    pub atoms: Vec<GeneratedAtom>,
    pub residues: Vec<GeneratedResidue>,
    pub chains: Vec<GeneratedChain>,
    pub bonds: Vec<AtomBond>,
}

impl AtomicModel {
    pub fn with_capacity(sizing: &ModelSizing) -> Self {
        Self {
            atoms: Vec::with_capacity(sizing.atoms),
            residues: Vec::with_capacity(sizing.residues),
            chains: Vec::with_capacity(sizing.chains),
            bonds: Vec::new(),
        }
    }

    pub fn atom_count(&self) -> usize {
        self.atoms.len()
    }

    pub fn residue_count(&self) -> usize {
        self.residues.len()
    }

    pub fn chain_count(&self) -> usize {
        self.chains.len()
    }

    /// Finds an atom by name within one residue's atom range.
    pub fn atom_in_residue(&self, residue: usize, name: &str) -> Option<usize> {
        let range = self.residues.get(residue)?.atoms.clone();
        self.atoms[range.clone()]
            .iter()
            .position(|atom| atom.name == name)
            .map(|offset| range.start + offset)
    }
}
