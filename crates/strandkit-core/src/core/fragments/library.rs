use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use super::fragment::{Fragment, FragmentAtom, FragmentData, FragmentOffsets};
use crate::core::models::types::{AminoAcidKind, NucleicAcidKind, NucleobaseKind};

/// Errors that can occur while loading or validating a fragment library.
#[derive(Debug, Error)]
pub enum FragmentLibraryError {
    #[error("failed to read fragment library file '{path}'")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse fragment library file '{path}'")]
    Toml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("unknown monomer code '{code}' in fragment library")]
    UnknownCode { code: String },
    #[error("duplicate atom serial {serial} in fragment '{code}'")]
    DuplicateSerial { code: String, serial: usize },
    #[error("bond references unknown atom serial {serial} in fragment '{code}'")]
    InvalidBondSerial { code: String, serial: usize },
}

#[derive(Debug, Deserialize)]
struct LibraryFile {
    #[serde(default)]
    dna: HashMap<String, FragmentData>,
    #[serde(default)]
    rna: HashMap<String, FragmentData>,
    #[serde(default)]
    amino: HashMap<String, FragmentData>,
}

/// A validated collection of reference fragments keyed by monomer type.
///
/// Loaded once from a TOML file and shared immutably across generation runs.
#[derive(Debug, Clone, Default)]
pub struct FragmentLibrary {
    nucleotides: HashMap<(NucleicAcidKind, NucleobaseKind), Fragment>,
    amino_acids: HashMap<AminoAcidKind, Fragment>,
}

impl FragmentLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads and validates a fragment library from a TOML file.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the library file, with `[dna.*]`, `[rna.*]` and
    ///   `[amino.*]` sections keyed by one-letter base codes and three-letter
    ///   amino acid codes respectively.
    ///
    /// # Return
    ///
    /// The parsed library, or an error describing the first I/O, syntax or
    /// validation failure encountered.
    pub fn load(path: &Path) -> Result<Self, FragmentLibraryError> {
        let content = std::fs::read_to_string(path).map_err(|source| FragmentLibraryError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let file: LibraryFile =
            toml::from_str(&content).map_err(|source| FragmentLibraryError::Toml {
                path: path.to_path_buf(),
                source,
            })?;

        let mut library = Self::new();
        for (kind, entries) in [
            (NucleicAcidKind::Dna, &file.dna),
            (NucleicAcidKind::Rna, &file.rna),
        ] {
            for (code, data) in entries {
                let base = code
                    .parse::<NucleobaseKind>()
                    .map_err(|_| FragmentLibraryError::UnknownCode {
                        code: format!("{kind}.{code}"),
                    })?;
                let fragment = build_fragment(&format!("{kind}.{code}"), data)?;
                library.nucleotides.insert((kind, base), fragment);
            }
        }
        for (code, data) in &file.amino {
            let amino = code
                .parse::<AminoAcidKind>()
                .map_err(|_| FragmentLibraryError::UnknownCode { code: code.clone() })?;
            let fragment = build_fragment(code, data)?;
            library.amino_acids.insert(amino, fragment);
        }
        Ok(library)
    }

    pub fn nucleotide(&self, kind: NucleicAcidKind, base: NucleobaseKind) -> Option<&Fragment> {
        self.nucleotides.get(&(kind, base))
    }

    pub fn amino_acid(&self, kind: AminoAcidKind) -> Option<&Fragment> {
        self.amino_acids.get(&kind)
    }

    pub fn insert_nucleotide(
        &mut self,
        kind: NucleicAcidKind,
        base: NucleobaseKind,
        fragment: Fragment,
    ) {
        self.nucleotides.insert((kind, base), fragment);
    }

    pub fn insert_amino_acid(&mut self, kind: AminoAcidKind, fragment: Fragment) {
        self.amino_acids.insert(kind, fragment);
    }

    /// Distance from the backbone center to the base center of a nucleotide
    /// fragment, used to rescale base positions after a base change.
    pub fn backbone_to_base_distance(
        &self,
        kind: NucleicAcidKind,
        base: NucleobaseKind,
    ) -> Option<f64> {
        let offsets = &self.nucleotide(kind, base)?.offsets;
        Some((offsets.to_base_center - offsets.to_backbone_center).norm())
    }
}

fn build_fragment(code: &str, data: &FragmentData) -> Result<Fragment, FragmentLibraryError> {
    let mut serial_to_index = HashMap::with_capacity(data.atoms.len());
    let mut atoms = Vec::with_capacity(data.atoms.len());
    for (index, atom) in data.atoms.iter().enumerate() {
        if serial_to_index.insert(atom.serial, index).is_some() {
            return Err(FragmentLibraryError::DuplicateSerial {
                code: code.to_string(),
                serial: atom.serial,
            });
        }
        atoms.push(FragmentAtom {
            name: atom.name.clone(),
            element: atom.element.clone(),
            position: atom.position.into(),
        });
    }

    let mut bonds = Vec::with_capacity(data.bonds.len());
    for &[a, b] in &data.bonds {
        let resolve = |serial: usize| {
            serial_to_index
                .get(&serial)
                .copied()
                .ok_or(FragmentLibraryError::InvalidBondSerial {
                    code: code.to_string(),
                    serial,
                })
        };
        bonds.push((resolve(a)?, resolve(b)?));
    }

    Ok(Fragment {
        atoms,
        bonds,
        offsets: FragmentOffsets::from(&data.offsets),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const VALID_LIBRARY: &str = r#"
        [dna.A]
        atoms = [
            { serial = 1, name = "P", element = "P", position = [0.0, 0.0, 0.0] },
            { serial = 2, name = "C1'", element = "C", position = [1.5, 0.0, 0.0] },
            { serial = 3, name = "N9", element = "N", position = [2.5, 1.0, 0.0] },
        ]
        bonds = [[1, 2], [2, 3]]

        [dna.A.offsets]
        to_base_center = [2.5, 1.0, 0.0]
        to_backbone_center = [0.5, 0.0, 0.0]
        to_center_of_mass = [1.3, 0.3, 0.0]
        to_reference_atom = [1.5, 0.0, 0.0]

        [amino.GLY]
        atoms = [
            { serial = 1, name = "N", element = "N", position = [0.0, 0.0, 0.0] },
            { serial = 2, name = "CA", element = "C", position = [1.4, 0.0, 0.0] },
        ]
        bonds = [[1, 2]]

        [amino.GLY.offsets]
        to_base_center = [0.0, 0.0, 0.0]
        to_backbone_center = [0.7, 0.0, 0.0]
        to_center_of_mass = [0.7, 0.0, 0.0]
        to_reference_atom = [1.4, 0.0, 0.0]
    "#;

    fn write_library(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().expect("failed to create temp file");
        file.write_all(content.as_bytes())
            .expect("failed to write temp file");
        file
    }

    #[test]
    fn loads_valid_library() {
        let file = write_library(VALID_LIBRARY);
        let library = FragmentLibrary::load(file.path()).expect("load failed");

        let adenine = library
            .nucleotide(NucleicAcidKind::Dna, NucleobaseKind::Adenine)
            .expect("missing DNA.A fragment");
        assert_eq!(adenine.atom_count(), 3);
        assert_eq!(adenine.bonds, vec![(0, 1), (1, 2)]);

        let glycine = library
            .amino_acid(AminoAcidKind::Glycine)
            .expect("missing GLY fragment");
        assert!(glycine.has_atom("CA"));
    }

    #[test]
    fn backbone_to_base_distance_uses_offsets() {
        let file = write_library(VALID_LIBRARY);
        let library = FragmentLibrary::load(file.path()).expect("load failed");

        let distance = library
            .backbone_to_base_distance(NucleicAcidKind::Dna, NucleobaseKind::Adenine)
            .expect("missing fragment");
        assert!((distance - (4.0f64 + 1.0).sqrt()).abs() < 1e-12);
    }

    #[test]
    fn rejects_unknown_base_code() {
        let content = VALID_LIBRARY.replace("[dna.A]", "[dna.Z]").replace("dna.A.offsets", "dna.Z.offsets");
        let file = write_library(&content);
        let result = FragmentLibrary::load(file.path());
        assert!(matches!(
            result,
            Err(FragmentLibraryError::UnknownCode { ref code }) if code == "DNA.Z"
        ));
    }

    #[test]
    fn rejects_duplicate_serials() {
        let content = VALID_LIBRARY.replace("serial = 3", "serial = 1");
        let file = write_library(&content);
        let result = FragmentLibrary::load(file.path());
        assert!(matches!(
            result,
            Err(FragmentLibraryError::DuplicateSerial { serial: 1, .. })
        ));
    }

    #[test]
    fn rejects_bond_with_unknown_serial() {
        let content = VALID_LIBRARY.replace("[[1, 2], [2, 3]]", "[[1, 2], [2, 9]]");
        let file = write_library(&content);
        let result = FragmentLibrary::load(file.path());
        assert!(matches!(
            result,
            Err(FragmentLibraryError::InvalidBondSerial { serial: 9, .. })
        ));
    }

    #[test]
    fn missing_file_reports_io_error() {
        let result = FragmentLibrary::load(Path::new("/nonexistent/fragments.toml"));
        assert!(matches!(result, Err(FragmentLibraryError::Io { .. })));
    }
}
