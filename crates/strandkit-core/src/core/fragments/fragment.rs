use nalgebra::{Point3, Vector3};
use phf::{Set, phf_set};
use serde::Deserialize;

/// Atom names that make up the 5' phosphate group.
///
/// Dropping these from a fragment yields the phosphate-truncated variant used
/// for the first nucleotide of a strand.
static PHOSPHATE_ATOMS: Set<&'static str> = phf_set! {
    "P",
    "OP1",
    "OP2",
};

/// One atom of a reference fragment as read from the library file.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct FragmentAtomData {
    /// Serial within the fragment's atom list; bonds reference serials.
    pub serial: usize,
    pub name: String,
    pub element: String,
    /// Coordinates in the fragment's canonical local frame, in Angstroms.
    pub position: [f64; 3],
}

/// Offset vectors from the fragment's conceptual origin, as read from file.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct FragmentOffsetsData {
    pub to_base_center: [f64; 3],
    pub to_backbone_center: [f64; 3],
    pub to_center_of_mass: [f64; 3],
    pub to_reference_atom: [f64; 3],
}

/// The complete serialized form of one reference fragment.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct FragmentData {
    pub atoms: Vec<FragmentAtomData>,
    pub bonds: Vec<[usize; 2]>,
    pub offsets: FragmentOffsetsData,
}

/// One atom of a runtime fragment.
#[derive(Debug, Clone, PartialEq)]
pub struct FragmentAtom {
    pub name: String,
    pub element: String,
    pub position: Point3<f64>,
}

/// Precomputed offsets from the fragment origin to its characteristic points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FragmentOffsets {
    pub to_base_center: Vector3<f64>,
    pub to_backbone_center: Vector3<f64>,
    pub to_center_of_mass: Vector3<f64>,
    /// Offset to the designated reference atom (C1' for nucleotides, CA for
    /// amino acids).
    pub to_reference_atom: Vector3<f64>,
}

impl From<&FragmentOffsetsData> for FragmentOffsets {
    fn from(data: &FragmentOffsetsData) -> Self {
        Self {
            to_base_center: Vector3::from(data.to_base_center),
            to_backbone_center: Vector3::from(data.to_backbone_center),
            to_center_of_mass: Vector3::from(data.to_center_of_mass),
            to_reference_atom: Vector3::from(data.to_reference_atom),
        }
    }
}

/// A canonical small all-atom template for one monomer type, in a local
/// coordinate frame: hydrogen face along +Y, base normal along +Z for
/// nucleotides.
#[derive(Debug, Clone, PartialEq)]
pub struct Fragment {
    pub atoms: Vec<FragmentAtom>,
    /// Index pairs into `atoms`.
    pub bonds: Vec<(usize, usize)>,
    pub offsets: FragmentOffsets,
}

impl Fragment {
    pub fn atom_count(&self) -> usize {
        self.atoms.len()
    }

    pub fn atom_index(&self, name: &str) -> Option<usize> {
        self.atoms.iter().position(|atom| atom.name == name)
    }

    pub fn has_atom(&self, name: &str) -> bool {
        self.atom_index(name).is_some()
    }

    /// Derives the 5'-terminal variant by dropping the phosphate group and
    /// remapping the bond indices.
    pub fn without_phosphate(&self) -> Fragment {
        let mut remap = vec![None; self.atoms.len()];
        let mut atoms = Vec::with_capacity(self.atoms.len());
        for (index, atom) in self.atoms.iter().enumerate() {
            if !PHOSPHATE_ATOMS.contains(atom.name.as_str()) {
                remap[index] = Some(atoms.len());
                atoms.push(atom.clone());
            }
        }
        let bonds = self
            .bonds
            .iter()
            .filter_map(|&(a, b)| Some((remap[a]?, remap[b]?)))
            .collect();
        Fragment {
            atoms,
            bonds,
            offsets: self.offsets,
        }
    }
}
