use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Distinguishes the two nucleic-acid chemistries a strand can carry.
///
/// The kind decides which complement table applies (A pairs with T in DNA and
/// with U in RNA) and which reference fragments the generation engine selects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NucleicAcidKind {
    Dna,
    Rna,
}

impl fmt::Display for NucleicAcidKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            match self {
                NucleicAcidKind::Dna => "DNA",
                NucleicAcidKind::Rna => "RNA",
            }
        )
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Invalid nucleic acid kind string")]
pub struct ParseNucleicAcidKindError;

impl FromStr for NucleicAcidKind {
    type Err = ParseNucleicAcidKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "DNA" => Ok(NucleicAcidKind::Dna),
            "RNA" => Ok(NucleicAcidKind::Rna),
            _ => Err(ParseNucleicAcidKindError),
        }
    }
}

/// The five canonical nucleobases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NucleobaseKind {
    Adenine,
    Cytosine,
    Guanine,
    Thymine,
    Uracil,
}

impl NucleobaseKind {
    /// Returns the one-letter code for this base.
    pub fn code(self) -> char {
        match self {
            NucleobaseKind::Adenine => 'A',
            NucleobaseKind::Cytosine => 'C',
            NucleobaseKind::Guanine => 'G',
            NucleobaseKind::Thymine => 'T',
            NucleobaseKind::Uracil => 'U',
        }
    }

    /// Parses a one-letter code (case-insensitive).
    pub fn from_code(code: char) -> Option<Self> {
        match code.to_ascii_uppercase() {
            'A' => Some(NucleobaseKind::Adenine),
            'C' => Some(NucleobaseKind::Cytosine),
            'G' => Some(NucleobaseKind::Guanine),
            'T' => Some(NucleobaseKind::Thymine),
            'U' => Some(NucleobaseKind::Uracil),
            _ => None,
        }
    }

    pub fn is_purine(self) -> bool {
        matches!(self, NucleobaseKind::Adenine | NucleobaseKind::Guanine)
    }

    /// The Watson-Crick complement under the given chemistry.
    ///
    /// Adenine complements Thymine in DNA and Uracil in RNA; Thymine and
    /// Uracil both complement Adenine regardless of the strand kind.
    pub fn complement(self, kind: NucleicAcidKind) -> Self {
        match (self, kind) {
            (NucleobaseKind::Adenine, NucleicAcidKind::Dna) => NucleobaseKind::Thymine,
            (NucleobaseKind::Adenine, NucleicAcidKind::Rna) => NucleobaseKind::Uracil,
            (NucleobaseKind::Thymine, _) | (NucleobaseKind::Uracil, _) => NucleobaseKind::Adenine,
            (NucleobaseKind::Cytosine, _) => NucleobaseKind::Guanine,
            (NucleobaseKind::Guanine, _) => NucleobaseKind::Cytosine,
        }
    }

    /// The name of the ring nitrogen bonded to C1' of the sugar.
    ///
    /// Purines attach through N9, pyrimidines through N1.
    pub fn attachment_atom(self) -> &'static str {
        if self.is_purine() { "N9" } else { "N1" }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Invalid nucleobase code '{0}'")]
pub struct ParseNucleobaseError(pub char);

impl FromStr for NucleobaseKind {
    type Err = ParseNucleobaseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => {
                NucleobaseKind::from_code(c).ok_or(ParseNucleobaseError(c))
            }
            _ => Err(ParseNucleobaseError(s.chars().next().unwrap_or('?'))),
        }
    }
}

impl fmt::Display for NucleobaseKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// The twenty standard amino acids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AminoAcidKind {
    Alanine,
    Arginine,
    Asparagine,
    AsparticAcid,
    Cysteine,
    GlutamicAcid,
    Glutamine,
    Glycine,
    Histidine,
    Isoleucine,
    Leucine,
    Lysine,
    Methionine,
    Phenylalanine,
    Proline,
    Serine,
    Threonine,
    Tryptophan,
    Tyrosine,
    Valine,
}

impl AminoAcidKind {
    pub fn one_letter(self) -> char {
        match self {
            AminoAcidKind::Alanine => 'A',
            AminoAcidKind::Arginine => 'R',
            AminoAcidKind::Asparagine => 'N',
            AminoAcidKind::AsparticAcid => 'D',
            AminoAcidKind::Cysteine => 'C',
            AminoAcidKind::GlutamicAcid => 'E',
            AminoAcidKind::Glutamine => 'Q',
            AminoAcidKind::Glycine => 'G',
            AminoAcidKind::Histidine => 'H',
            AminoAcidKind::Isoleucine => 'I',
            AminoAcidKind::Leucine => 'L',
            AminoAcidKind::Lysine => 'K',
            AminoAcidKind::Methionine => 'M',
            AminoAcidKind::Phenylalanine => 'F',
            AminoAcidKind::Proline => 'P',
            AminoAcidKind::Serine => 'S',
            AminoAcidKind::Threonine => 'T',
            AminoAcidKind::Tryptophan => 'W',
            AminoAcidKind::Tyrosine => 'Y',
            AminoAcidKind::Valine => 'V',
        }
    }

    pub fn three_letter(self) -> &'static str {
        match self {
            AminoAcidKind::Alanine => "ALA",
            AminoAcidKind::Arginine => "ARG",
            AminoAcidKind::Asparagine => "ASN",
            AminoAcidKind::AsparticAcid => "ASP",
            AminoAcidKind::Cysteine => "CYS",
            AminoAcidKind::GlutamicAcid => "GLU",
            AminoAcidKind::Glutamine => "GLN",
            AminoAcidKind::Glycine => "GLY",
            AminoAcidKind::Histidine => "HIS",
            AminoAcidKind::Isoleucine => "ILE",
            AminoAcidKind::Leucine => "LEU",
            AminoAcidKind::Lysine => "LYS",
            AminoAcidKind::Methionine => "MET",
            AminoAcidKind::Phenylalanine => "PHE",
            AminoAcidKind::Proline => "PRO",
            AminoAcidKind::Serine => "SER",
            AminoAcidKind::Threonine => "THR",
            AminoAcidKind::Tryptophan => "TRP",
            AminoAcidKind::Tyrosine => "TYR",
            AminoAcidKind::Valine => "VAL",
        }
    }

    pub fn from_one_letter(code: char) -> Option<Self> {
        ALL_AMINO_ACIDS
            .iter()
            .copied()
            .find(|kind| kind.one_letter() == code.to_ascii_uppercase())
    }
}

const ALL_AMINO_ACIDS: [AminoAcidKind; 20] = [
    AminoAcidKind::Alanine,
    AminoAcidKind::Arginine,
    AminoAcidKind::Asparagine,
    AminoAcidKind::AsparticAcid,
    AminoAcidKind::Cysteine,
    AminoAcidKind::GlutamicAcid,
    AminoAcidKind::Glutamine,
    AminoAcidKind::Glycine,
    AminoAcidKind::Histidine,
    AminoAcidKind::Isoleucine,
    AminoAcidKind::Leucine,
    AminoAcidKind::Lysine,
    AminoAcidKind::Methionine,
    AminoAcidKind::Phenylalanine,
    AminoAcidKind::Proline,
    AminoAcidKind::Serine,
    AminoAcidKind::Threonine,
    AminoAcidKind::Tryptophan,
    AminoAcidKind::Tyrosine,
    AminoAcidKind::Valine,
];

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Invalid amino acid code '{0}'")]
pub struct ParseAminoAcidError(pub String);

impl FromStr for AminoAcidKind {
    type Err = ParseAminoAcidError;

    /// Accepts either the one-letter or the three-letter code, case-insensitive.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.to_ascii_uppercase();
        let mut chars = upper.chars();
        if let (Some(code), None) = (chars.next(), chars.next()) {
            return AminoAcidKind::from_one_letter(code)
                .ok_or_else(|| ParseAminoAcidError(s.to_string()));
        }
        ALL_AMINO_ACIDS
            .iter()
            .copied()
            .find(|kind| kind.three_letter() == upper)
            .ok_or_else(|| ParseAminoAcidError(s.to_string()))
    }
}

impl fmt::Display for AminoAcidKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.three_letter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn complement_respects_strand_chemistry() {
        assert_eq!(
            NucleobaseKind::Adenine.complement(NucleicAcidKind::Dna),
            NucleobaseKind::Thymine
        );
        assert_eq!(
            NucleobaseKind::Adenine.complement(NucleicAcidKind::Rna),
            NucleobaseKind::Uracil
        );
        assert_eq!(
            NucleobaseKind::Guanine.complement(NucleicAcidKind::Dna),
            NucleobaseKind::Cytosine
        );
        assert_eq!(
            NucleobaseKind::Uracil.complement(NucleicAcidKind::Rna),
            NucleobaseKind::Adenine
        );
    }

    #[test]
    fn attachment_atom_follows_purine_pyrimidine_split() {
        assert_eq!(NucleobaseKind::Adenine.attachment_atom(), "N9");
        assert_eq!(NucleobaseKind::Guanine.attachment_atom(), "N9");
        assert_eq!(NucleobaseKind::Cytosine.attachment_atom(), "N1");
        assert_eq!(NucleobaseKind::Thymine.attachment_atom(), "N1");
        assert_eq!(NucleobaseKind::Uracil.attachment_atom(), "N1");
    }

    #[test]
    fn nucleobase_parsing_is_case_insensitive() {
        assert_eq!("a".parse::<NucleobaseKind>(), Ok(NucleobaseKind::Adenine));
        assert_eq!("T".parse::<NucleobaseKind>(), Ok(NucleobaseKind::Thymine));
        assert!("Z".parse::<NucleobaseKind>().is_err());
        assert!("AT".parse::<NucleobaseKind>().is_err());
    }

    #[test]
    fn amino_acid_parsing_accepts_both_code_lengths() {
        assert_eq!("G".parse::<AminoAcidKind>(), Ok(AminoAcidKind::Glycine));
        assert_eq!("gly".parse::<AminoAcidKind>(), Ok(AminoAcidKind::Glycine));
        assert_eq!("TRP".parse::<AminoAcidKind>(), Ok(AminoAcidKind::Tryptophan));
        assert!("XYZ".parse::<AminoAcidKind>().is_err());
    }
}
