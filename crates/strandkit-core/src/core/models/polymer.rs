use super::ids::{GlobalId, next_global_id};
use super::proxy::{AminoAcidView, AminoAcidViewMut, NucleotideView, NucleotideViewMut};
use super::store::{AminoAcidStore, NucleotideStore};
use super::types::{
    AminoAcidKind, NucleicAcidKind, NucleobaseKind, ParseAminoAcidError, ParseNucleobaseError,
};
use nalgebra::{Point3, Vector3};

/// Caller-supplied attributes for a newly inserted nucleotide.
///
/// The global identifier is never part of the init data; the strand assigns a
/// fresh one on insertion.
#[derive(Debug, Clone, Copy)]
pub struct NucleotideInit {
    pub base: Option<NucleobaseKind>,
    pub pair_id: Option<GlobalId>,
    pub backbone_center: Point3<f64>,
    pub base_center: Point3<f64>,
    pub hydrogen_face: Vector3<f64>,
    pub base_normal: Vector3<f64>,
}

impl Default for NucleotideInit {
    fn default() -> Self {
        Self {
            base: None,
            pair_id: None,
            backbone_center: Point3::origin(),
            base_center: Point3::origin(),
            hydrogen_face: Vector3::zeros(),
            base_normal: Vector3::zeros(),
        }
    }
}

impl NucleotideInit {
    pub fn with_base(base: NucleobaseKind) -> Self {
        Self {
            base: Some(base),
            ..Self::default()
        }
    }
}

/// Caller-supplied attributes for a newly inserted amino-acid residue.
#[derive(Debug, Clone, Copy)]
pub struct AminoAcidInit {
    pub kind: Option<AminoAcidKind>,
    pub alpha_carbon: Point3<f64>,
}

impl Default for AminoAcidInit {
    fn default() -> Self {
        Self {
            kind: None,
            alpha_carbon: Point3::origin(),
        }
    }
}

impl AminoAcidInit {
    pub fn with_kind(kind: AminoAcidKind) -> Self {
        Self {
            kind: Some(kind),
            ..Self::default()
        }
    }
}

/// An ordered sequence of nucleotides with the 5' terminus at index 0.
///
/// A strand owns its columnar store exclusively; detachment on emptiness and
/// the circular break/connect policy live on the owning structure, which is
/// the single dispatch point for edits.
#[derive(Debug, Clone)]
pub struct NucleicAcidStrand {
    id: GlobalId,
    pub name: String,
    pub color: Option<[f32; 3]>,
    kind: NucleicAcidKind,
    pub(crate) circular: bool,
    store: NucleotideStore,
}

impl NucleicAcidStrand {
    pub fn new(kind: NucleicAcidKind, name: impl Into<String>) -> Self {
        Self {
            id: next_global_id(),
            name: name.into(),
            color: None,
            kind,
            circular: false,
            store: NucleotideStore::new(),
        }
    }

    pub fn id(&self) -> GlobalId {
        self.id
    }

    pub fn kind(&self) -> NucleicAcidKind {
        self.kind
    }

    pub fn is_circular(&self) -> bool {
        self.circular
    }

    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    pub fn store(&self) -> &NucleotideStore {
        &self.store
    }

    pub(crate) fn store_mut(&mut self) -> &mut NucleotideStore {
        &mut self.store
    }

    /// Inserts a nucleotide at `index`, shifting the tail right.
    ///
    /// Returns the fresh global id assigned to the new monomer.
    pub fn insert(&mut self, index: usize, init: NucleotideInit) -> GlobalId {
        let id = next_global_id();
        self.store.insert_gap(index, 1);
        self.store.global_ids[index] = id;
        self.store.bases[index] = init.base;
        self.store.pair_ids[index] = init.pair_id;
        self.store.backbone_centers[index] = init.backbone_center;
        self.store.base_centers[index] = init.base_center;
        self.store.hydrogen_faces[index] = init.hydrogen_face;
        self.store.base_normals[index] = init.base_normal;
        id
    }

    /// Inserts at the 5' terminus (index 0).
    pub fn push_five_prime(&mut self, init: NucleotideInit) -> GlobalId {
        self.insert(0, init)
    }

    /// Appends at the 3' terminus.
    pub fn push_three_prime(&mut self, init: NucleotideInit) -> GlobalId {
        self.insert(self.len(), init)
    }

    /// Removes the nucleotide at `index`, returning its global id.
    ///
    /// Out-of-range indices are a no-op returning `None`.
    pub fn remove(&mut self, index: usize) -> Option<GlobalId> {
        let id = self.store.global_id(index)?;
        self.store.remove(index);
        Some(id)
    }

    pub fn truncate(&mut self, new_len: usize) {
        self.store.truncate(new_len);
    }

    pub(crate) fn rotate_to(&mut self, new_start: usize) {
        self.store.rotate_to(new_start);
    }

    /// Replaces this strand's content with rows `[start, end)` of another
    /// strand's store, resizing as needed. Global ids travel with the rows.
    pub fn copy_from(&mut self, other: &Self, start: usize, end: usize) {
        let count = end.saturating_sub(start);
        self.store.resize(count);
        self.store.copy_from(&other.store, 0, start, count);
    }

    pub fn nucleotide(&self, index: usize) -> Option<NucleotideView<'_>> {
        (index < self.len()).then_some(NucleotideView {
            store: &self.store,
            index,
        })
    }

    pub fn nucleotide_mut(&mut self, index: usize) -> Option<NucleotideViewMut<'_>> {
        (index < self.len()).then_some(NucleotideViewMut {
            store: &mut self.store,
            index,
        })
    }

    pub fn five_prime(&self) -> Option<NucleotideView<'_>> {
        self.nucleotide(0)
    }

    pub fn three_prime(&self) -> Option<NucleotideView<'_>> {
        self.nucleotide(self.len().wrapping_sub(1))
    }

    pub fn iter(&self) -> impl Iterator<Item = NucleotideView<'_>> {
        (0..self.len()).map(move |index| NucleotideView {
            store: &self.store,
            index,
        })
    }

    /// The ordered base sequence; unset bases render as `N`.
    pub fn sequence(&self) -> String {
        self.store
            .bases
            .iter()
            .map(|base| base.map_or('N', NucleobaseKind::code))
            .collect()
    }

    /// Applies the given base codes cyclically when shorter than the strand.
    ///
    /// Pairing-aware complement updates happen at the structure level; this
    /// writes only this strand's rows.
    pub fn set_sequence(&mut self, sequence: &str) -> Result<(), ParseNucleobaseError> {
        let bases = sequence
            .chars()
            .map(|code| NucleobaseKind::from_code(code).ok_or(ParseNucleobaseError(code)))
            .collect::<Result<Vec<_>, _>>()?;
        if bases.is_empty() {
            return Ok(());
        }
        for row in 0..self.len() {
            self.store.bases[row] = Some(bases[row % bases.len()]);
        }
        Ok(())
    }
}

/// An ordered sequence of amino-acid residues with the N-terminus at index 0.
#[derive(Debug, Clone)]
pub struct AminoAcidChain {
    id: GlobalId,
    pub name: String,
    pub color: Option<[f32; 3]>,
    pub(crate) circular: bool,
    store: AminoAcidStore,
}

impl AminoAcidChain {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: next_global_id(),
            name: name.into(),
            color: None,
            circular: false,
            store: AminoAcidStore::new(),
        }
    }

    pub fn id(&self) -> GlobalId {
        self.id
    }

    pub fn is_circular(&self) -> bool {
        self.circular
    }

    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    pub fn store(&self) -> &AminoAcidStore {
        &self.store
    }

    pub(crate) fn store_mut(&mut self) -> &mut AminoAcidStore {
        &mut self.store
    }

    pub fn insert(&mut self, index: usize, init: AminoAcidInit) -> GlobalId {
        let id = next_global_id();
        self.store.insert_gap(index, 1);
        self.store.global_ids[index] = id;
        self.store.kinds[index] = init.kind;
        self.store.alpha_carbons[index] = init.alpha_carbon;
        id
    }

    pub fn push_n_term(&mut self, init: AminoAcidInit) -> GlobalId {
        self.insert(0, init)
    }

    pub fn push_c_term(&mut self, init: AminoAcidInit) -> GlobalId {
        self.insert(self.len(), init)
    }

    pub fn remove(&mut self, index: usize) -> Option<GlobalId> {
        let id = self.store.global_id(index)?;
        self.store.remove(index);
        Some(id)
    }

    pub fn truncate(&mut self, new_len: usize) {
        self.store.truncate(new_len);
    }

    pub(crate) fn rotate_to(&mut self, new_start: usize) {
        self.store.rotate_to(new_start);
    }

    pub fn copy_from(&mut self, other: &Self, start: usize, end: usize) {
        let count = end.saturating_sub(start);
        self.store.resize(count);
        self.store.copy_from(&other.store, 0, start, count);
    }

    pub fn residue(&self, index: usize) -> Option<AminoAcidView<'_>> {
        (index < self.len()).then_some(AminoAcidView {
            store: &self.store,
            index,
        })
    }

    pub fn residue_mut(&mut self, index: usize) -> Option<AminoAcidViewMut<'_>> {
        (index < self.len()).then_some(AminoAcidViewMut {
            store: &mut self.store,
            index,
        })
    }

    pub fn n_term(&self) -> Option<AminoAcidView<'_>> {
        self.residue(0)
    }

    pub fn c_term(&self) -> Option<AminoAcidView<'_>> {
        self.residue(self.len().wrapping_sub(1))
    }

    pub fn iter(&self) -> impl Iterator<Item = AminoAcidView<'_>> {
        (0..self.len()).map(move |index| AminoAcidView {
            store: &self.store,
            index,
        })
    }

    /// The ordered one-letter residue sequence; unset kinds render as `X`.
    pub fn sequence(&self) -> String {
        self.store
            .kinds
            .iter()
            .map(|kind| kind.map_or('X', AminoAcidKind::one_letter))
            .collect()
    }

    pub fn set_sequence(&mut self, sequence: &str) -> Result<(), ParseAminoAcidError> {
        let kinds = sequence
            .chars()
            .map(|code| {
                AminoAcidKind::from_one_letter(code)
                    .ok_or_else(|| ParseAminoAcidError(code.to_string()))
            })
            .collect::<Result<Vec<_>, _>>()?;
        if kinds.is_empty() {
            return Ok(());
        }
        for row in 0..self.len() {
            self.store.kinds[row] = Some(kinds[row % kinds.len()]);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strand_with_sequence(seq: &str) -> NucleicAcidStrand {
        let mut strand = NucleicAcidStrand::new(NucleicAcidKind::Dna, "test");
        for code in seq.chars() {
            let base = NucleobaseKind::from_code(code).unwrap();
            strand.push_three_prime(NucleotideInit::with_base(base));
        }
        strand
    }

    #[test]
    fn sequential_inserts_preserve_order_and_indices() {
        let strand = strand_with_sequence("ACGT");

        assert_eq!(strand.len(), 4);
        for (position, view) in strand.iter().enumerate() {
            assert_eq!(view.index(), position);
        }
        assert_eq!(strand.sequence(), "ACGT");
    }

    #[test]
    fn five_prime_insert_shifts_existing_rows() {
        let mut strand = strand_with_sequence("CG");
        strand.push_five_prime(NucleotideInit::with_base(NucleobaseKind::Adenine));

        assert_eq!(strand.sequence(), "ACG");
        assert!(strand.five_prime().unwrap().is_chain_start());
        assert!(strand.three_prime().unwrap().is_chain_end());
    }

    #[test]
    fn three_prime_appends_build_an_ordered_strand() {
        let mut strand = NucleicAcidStrand::new(NucleicAcidKind::Dna, "polyA");
        for _ in 0..10 {
            strand.push_three_prime(NucleotideInit::with_base(NucleobaseKind::Adenine));
        }

        assert_eq!(strand.len(), 10);
        assert_eq!(strand.five_prime().unwrap().index(), 0);
        assert_eq!(strand.three_prime().unwrap().index(), 9);
        assert_eq!(strand.sequence(), "A".repeat(10));
    }

    #[test]
    fn inserted_monomers_receive_distinct_global_ids() {
        let strand = strand_with_sequence("AAAA");
        let mut ids: Vec<_> = strand.iter().map(|n| n.id()).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), 4);
    }

    #[test]
    fn terminal_queries_on_empty_strand_return_none() {
        let strand = NucleicAcidStrand::new(NucleicAcidKind::Dna, "empty");
        assert!(strand.five_prime().is_none());
        assert!(strand.three_prime().is_none());
        assert!(strand.nucleotide(0).is_none());
    }

    #[test]
    fn set_sequence_applies_cyclically_when_shorter() {
        let mut strand = strand_with_sequence("AAAAAA");
        strand.set_sequence("CG").unwrap();
        assert_eq!(strand.sequence(), "CGCGCG");
    }

    #[test]
    fn set_sequence_rejects_invalid_codes() {
        let mut strand = strand_with_sequence("AA");
        assert!(strand.set_sequence("AZ").is_err());
    }

    #[test]
    fn copy_from_replaces_content_with_slice() {
        let source = strand_with_sequence("ACGTAC");
        let mut target = NucleicAcidStrand::new(NucleicAcidKind::Dna, "copy");
        target.copy_from(&source, 1, 4);

        assert_eq!(target.len(), 3);
        assert_eq!(target.sequence(), "CGT");
        // Identity travels with the rows.
        assert_eq!(
            target.nucleotide(0).unwrap().id(),
            source.nucleotide(1).unwrap().id()
        );
    }

    #[test]
    fn chain_sequence_round_trip_with_one_letter_codes() {
        let mut chain = AminoAcidChain::new("peptide");
        for _ in 0..3 {
            chain.push_c_term(AminoAcidInit::default());
        }
        assert_eq!(chain.sequence(), "XXX");

        chain.set_sequence("GA").unwrap();
        assert_eq!(chain.sequence(), "GAG");
        assert_eq!(
            chain.residue(0).unwrap().kind(),
            Some(AminoAcidKind::Glycine)
        );
    }
}
