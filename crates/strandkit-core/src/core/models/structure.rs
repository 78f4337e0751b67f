use std::collections::HashMap;

use nalgebra::{Point3, Unit, Vector3};
use slotmap::SlotMap;
use thiserror::Error;

use super::atomic::{AtomicModel, GeneratedChainKind};
use super::ids::{GlobalId, PeptideId, StrandId, next_global_id};
use super::polymer::{AminoAcidChain, NucleicAcidStrand};
use super::proxy::{
    AminoAcidView, AminoAcidViewMut, NucleotideHandle, NucleotideView, NucleotideViewMut,
    ResidueHandle,
};
use super::types::{NucleicAcidKind, NucleobaseKind, ParseAminoAcidError, ParseNucleobaseError};
use crate::core::fragments::library::FragmentLibrary;
use crate::core::utils::geometry::{BoundingBox, bounding_box_of, principal_axis_of};

/// Errors reported by topology edits that cannot be expressed as a simple
/// missing-target `None`.
#[derive(Debug, Error, PartialEq)]
pub enum StructureError {
    #[error("strand not found in structure")]
    UnknownStrand,
    #[error("chain not found in structure")]
    UnknownChain,
    #[error("cannot connect a {found} strand to a {expected} strand")]
    KindMismatch {
        expected: NucleicAcidKind,
        found: NucleicAcidKind,
    },
    #[error("circular polymers cannot be connected")]
    CircularPolymer,
    #[error(transparent)]
    InvalidBaseSequence(#[from] ParseNucleobaseError),
    #[error(transparent)]
    InvalidResidueSequence(#[from] ParseAminoAcidError),
}

/// One exported polymer sequence.
#[derive(Debug, Clone, PartialEq)]
pub struct SequenceRecord {
    pub name: String,
    pub kind: GeneratedChainKind,
    pub sequence: String,
}

/// The top-level container: a set of nucleic acid strands and amino acid
/// chains plus the cached all-atom model generated from them.
///
/// All topology edits go through this type so that the stale flag, the id
/// lookup caches and reciprocal pairing stay consistent. Direct polymer
/// access via [`Structure::strand_mut`] is still allowed; the lookup caches
/// validate on every hit and fall back to a scan, so they tolerate edits that
/// bypass the structure-level operations.
#[derive(Debug)]
pub struct Structure {
    id: GlobalId,
    pub name: String,
    pub author: String,
    strands: SlotMap<StrandId, NucleicAcidStrand>,
    peptides: SlotMap<PeptideId, AminoAcidChain>,
    nucleotide_index: HashMap<GlobalId, (StrandId, usize)>,
    residue_index: HashMap<GlobalId, (PeptideId, usize)>,
    pub(crate) stale: bool,
    pub(crate) cached_model: Option<AtomicModel>,
    disposal_requested: bool,
}

impl Structure {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: next_global_id(),
            name: name.into(),
            author: String::new(),
            strands: SlotMap::with_key(),
            peptides: SlotMap::with_key(),
            nucleotide_index: HashMap::new(),
            residue_index: HashMap::new(),
            stale: true,
            cached_model: None,
            disposal_requested: false,
        }
    }

    pub fn id(&self) -> GlobalId {
        self.id
    }

    /// Whether edits have occurred since the cached model was generated.
    ///
    /// A freshly created structure is stale until its first generation run.
    pub fn is_stale(&self) -> bool {
        self.stale
    }

    pub fn mark_stale(&mut self) {
        self.stale = true;
    }

    /// The most recently generated model, possibly out of date when
    /// [`Structure::is_stale`] is true.
    pub fn cached_model(&self) -> Option<&AtomicModel> {
        self.cached_model.as_ref()
    }

    /// Set once the last polymer is removed; the owner decides when to drop
    /// the structure itself.
    pub fn is_disposal_requested(&self) -> bool {
        self.disposal_requested
    }

    // --- polymer ownership ---------------------------------------------------

    pub fn add_strand(&mut self, strand: NucleicAcidStrand) -> StrandId {
        let strand_id = self.strands.insert(strand);
        let strand = &self.strands[strand_id];
        for (index, nucleotide) in strand.iter().enumerate() {
            self.nucleotide_index
                .insert(nucleotide.id(), (strand_id, index));
        }
        self.disposal_requested = false;
        self.stale = true;
        strand_id
    }

    pub fn add_chain(&mut self, chain: AminoAcidChain) -> PeptideId {
        let peptide_id = self.peptides.insert(chain);
        let chain = &self.peptides[peptide_id];
        for (index, residue) in chain.iter().enumerate() {
            self.residue_index.insert(residue.id(), (peptide_id, index));
        }
        self.disposal_requested = false;
        self.stale = true;
        peptide_id
    }

    pub fn remove_strand(&mut self, id: StrandId) -> Option<NucleicAcidStrand> {
        let strand = self.strands.remove(id)?;
        self.stale = true;
        self.update_disposal();
        Some(strand)
    }

    pub fn remove_chain(&mut self, id: PeptideId) -> Option<AminoAcidChain> {
        let chain = self.peptides.remove(id)?;
        self.stale = true;
        self.update_disposal();
        Some(chain)
    }

    pub fn strand(&self, id: StrandId) -> Option<&NucleicAcidStrand> {
        self.strands.get(id)
    }

    /// Mutable strand access; conservatively marks the cached model stale.
    pub fn strand_mut(&mut self, id: StrandId) -> Option<&mut NucleicAcidStrand> {
        let strand = self.strands.get_mut(id)?;
        self.stale = true;
        Some(strand)
    }

    pub fn chain(&self, id: PeptideId) -> Option<&AminoAcidChain> {
        self.peptides.get(id)
    }

    pub fn chain_mut(&mut self, id: PeptideId) -> Option<&mut AminoAcidChain> {
        let chain = self.peptides.get_mut(id)?;
        self.stale = true;
        Some(chain)
    }

    pub fn strands(&self) -> impl Iterator<Item = (StrandId, &NucleicAcidStrand)> {
        self.strands.iter()
    }

    pub fn chains(&self) -> impl Iterator<Item = (PeptideId, &AminoAcidChain)> {
        self.peptides.iter()
    }

    // --- id resolution -------------------------------------------------------

    /// Resolves a monomer id to its current strand and index.
    ///
    /// Cached locations are validated against the store before use; a cache
    /// miss or a mismatch after direct polymer edits falls back to a linear
    /// scan and refreshes the cache.
    pub fn find_nucleotide(&mut self, id: GlobalId) -> Option<NucleotideHandle> {
        if let Some(&(strand, index)) = self.nucleotide_index.get(&id) {
            let valid = self
                .strands
                .get(strand)
                .and_then(|s| s.store().global_id(index))
                == Some(id);
            if valid {
                return Some(NucleotideHandle { strand, index });
            }
            self.nucleotide_index.remove(&id);
        }
        let handle = self.scan_nucleotide(id)?;
        self.nucleotide_index
            .insert(id, (handle.strand, handle.index));
        Some(handle)
    }

    pub fn find_residue(&mut self, id: GlobalId) -> Option<ResidueHandle> {
        if let Some(&(peptide, index)) = self.residue_index.get(&id) {
            let valid = self
                .peptides
                .get(peptide)
                .and_then(|c| c.store().global_id(index))
                == Some(id);
            if valid {
                return Some(ResidueHandle { peptide, index });
            }
            self.residue_index.remove(&id);
        }
        let handle = self.scan_residue(id)?;
        self.residue_index
            .insert(id, (handle.peptide, handle.index));
        Some(handle)
    }

    fn scan_nucleotide(&self, id: GlobalId) -> Option<NucleotideHandle> {
        self.strands.iter().find_map(|(strand, s)| {
            s.store()
                .global_ids
                .iter()
                .position(|&g| g == id)
                .map(|index| NucleotideHandle { strand, index })
        })
    }

    fn scan_residue(&self, id: GlobalId) -> Option<ResidueHandle> {
        self.peptides.iter().find_map(|(peptide, c)| {
            c.store()
                .global_ids
                .iter()
                .position(|&g| g == id)
                .map(|index| ResidueHandle { peptide, index })
        })
    }

    pub fn nucleotide(&self, handle: NucleotideHandle) -> Option<NucleotideView<'_>> {
        self.strands.get(handle.strand)?.nucleotide(handle.index)
    }

    pub fn nucleotide_mut(&mut self, handle: NucleotideHandle) -> Option<NucleotideViewMut<'_>> {
        let view = self
            .strands
            .get_mut(handle.strand)?
            .nucleotide_mut(handle.index)?;
        self.stale = true;
        Some(view)
    }

    pub fn residue(&self, handle: ResidueHandle) -> Option<AminoAcidView<'_>> {
        self.peptides.get(handle.peptide)?.residue(handle.index)
    }

    pub fn residue_mut(&mut self, handle: ResidueHandle) -> Option<AminoAcidViewMut<'_>> {
        let view = self
            .peptides
            .get_mut(handle.peptide)?
            .residue_mut(handle.index)?;
        self.stale = true;
        Some(view)
    }

    // --- monomer edits -------------------------------------------------------

    /// Removes one nucleotide, clearing its partner's pairing first.
    ///
    /// A strand emptied by the removal is detached from the structure.
    pub fn remove_nucleotide(&mut self, handle: NucleotideHandle) -> Option<GlobalId> {
        let pair = self.nucleotide(handle)?.pair_id();
        if let Some(partner) = pair {
            self.clear_pair(partner);
        }
        let removed = self.strands.get_mut(handle.strand)?.remove(handle.index)?;
        self.nucleotide_index.remove(&removed);
        self.detach_strand_if_empty(handle.strand);
        self.stale = true;
        Some(removed)
    }

    /// Removes a batch of nucleotides by id.
    ///
    /// Handles are resolved up front, then removed per strand in descending
    /// index order so earlier removals never shift later targets.
    pub fn remove_nucleotides(&mut self, ids: &[GlobalId]) -> usize {
        let mut handles: Vec<NucleotideHandle> = ids
            .iter()
            .filter_map(|&id| self.find_nucleotide(id))
            .collect();
        handles.sort_by(|a, b| a.strand.cmp(&b.strand).then(b.index.cmp(&a.index)));
        // Repeated ids resolve to the same handle; removing it twice would
        // delete whatever monomer shifted into that row.
        handles.dedup();
        handles
            .into_iter()
            .filter(|&handle| self.remove_nucleotide(handle).is_some())
            .count()
    }

    pub fn remove_residue(&mut self, handle: ResidueHandle) -> Option<GlobalId> {
        let removed = self
            .peptides
            .get_mut(handle.peptide)?
            .remove(handle.index)?;
        self.residue_index.remove(&removed);
        self.detach_chain_if_empty(handle.peptide);
        self.stale = true;
        Some(removed)
    }

    /// Rewrites a strand's sequence, applying codes cyclically when the input
    /// is shorter than the strand.
    ///
    /// Paired partners are updated to the complement of their new opposite,
    /// using the partner strand's kind for the thymine/uracil choice. Partner
    /// geometry is left untouched.
    pub fn set_strand_sequence(
        &mut self,
        id: StrandId,
        sequence: &str,
    ) -> Result<(), StructureError> {
        let strand = self.strands.get_mut(id).ok_or(StructureError::UnknownStrand)?;
        strand.set_sequence(sequence)?;
        let paired: Vec<(GlobalId, NucleobaseKind)> = strand
            .iter()
            .filter_map(|n| Some((n.pair_id()?, n.base()?)))
            .collect();
        for (partner_id, base) in paired {
            if let Some(handle) = self.find_nucleotide(partner_id) {
                let kind = match self.strands.get(handle.strand) {
                    Some(partner_strand) => partner_strand.kind(),
                    None => continue,
                };
                if let Some(mut view) = self.nucleotide_mut(handle) {
                    view.set_base(Some(base.complement(kind)));
                }
            }
        }
        self.stale = true;
        Ok(())
    }

    pub fn set_chain_sequence(
        &mut self,
        id: PeptideId,
        sequence: &str,
    ) -> Result<(), StructureError> {
        let chain = self.peptides.get_mut(id).ok_or(StructureError::UnknownChain)?;
        chain.set_sequence(sequence)?;
        self.stale = true;
        Ok(())
    }

    /// Changes one nucleotide's base, preserving the base orientation.
    ///
    /// The base center is moved along the existing backbone-to-base direction
    /// to the new base type's reference distance, so a purine/pyrimidine swap
    /// does not leave the ring floating at the wrong depth.
    pub fn set_nucleobase(
        &mut self,
        handle: NucleotideHandle,
        base: NucleobaseKind,
        library: &FragmentLibrary,
    ) -> Option<()> {
        let strand = self.strands.get_mut(handle.strand)?;
        let kind = strand.kind();
        let mut view = strand.nucleotide_mut(handle.index)?;
        view.set_base(Some(base));
        if let Some(distance) = library.backbone_to_base_distance(kind, base) {
            let backbone = view.backbone_center();
            if let Some(direction) = Unit::try_new(view.base_center() - backbone, 1e-9) {
                view.set_base_center(backbone + direction.into_inner() * distance);
            }
        }
        self.stale = true;
        Some(())
    }

    // --- pairing -------------------------------------------------------------

    /// Establishes a reciprocal pairing, dissolving any previous pairings of
    /// either participant.
    pub fn pair_nucleotides(
        &mut self,
        a: NucleotideHandle,
        b: NucleotideHandle,
    ) -> Option<()> {
        let a_id = self.nucleotide(a)?.id();
        let b_id = self.nucleotide(b)?.id();
        if a_id == b_id {
            return None;
        }
        for (handle, partner_of_other) in [(a, b_id), (b, a_id)] {
            if let Some(previous) = self.nucleotide(handle)?.pair_id() {
                if previous != partner_of_other {
                    self.clear_pair(previous);
                }
            }
        }
        self.nucleotide_mut(a)?.set_pair_id(Some(b_id));
        self.nucleotide_mut(b)?.set_pair_id(Some(a_id));
        Some(())
    }

    pub fn unpair_nucleotide(&mut self, handle: NucleotideHandle) -> Option<()> {
        let partner = self.nucleotide(handle)?.pair_id()?;
        self.clear_pair(partner);
        self.nucleotide_mut(handle)?.set_pair_id(None);
        Some(())
    }

    fn clear_pair(&mut self, id: GlobalId) {
        if let Some(handle) = self.find_nucleotide(id) {
            if let Some(mut view) = self.nucleotide_mut(handle) {
                view.set_pair_id(None);
            }
        }
    }

    // --- strand topology -----------------------------------------------------

    /// Breaks a strand by deleting the nucleotide at `handle`.
    ///
    /// A circular strand opens into a linear one starting just past the
    /// deletion. A linear strand loses a terminal nucleotide in place, or
    /// splits in two when the deletion is interior; the new strand holding the
    /// 3' remainder is returned.
    pub fn break_strand_at(&mut self, handle: NucleotideHandle) -> Option<StrandId> {
        let (len, circular) = {
            let strand = self.strands.get(handle.strand)?;
            (strand.len(), strand.is_circular())
        };
        if handle.index >= len {
            return None;
        }
        if let Some(partner) = self.nucleotide(handle)?.pair_id() {
            self.clear_pair(partner);
        }

        let result = if circular {
            let strand = self.strands.get_mut(handle.strand)?;
            strand.remove(handle.index);
            strand.circular = false;
            if !strand.is_empty() {
                let new_start = handle.index % strand.len();
                strand.rotate_to(new_start);
            }
            None
        } else if handle.index == 0 || handle.index + 1 == len {
            self.strands.get_mut(handle.strand)?.remove(handle.index);
            None
        } else {
            let sibling = {
                let strand = self.strands.get(handle.strand)?;
                let mut sibling = NucleicAcidStrand::new(strand.kind(), strand.name.clone());
                sibling.color = strand.color;
                sibling.copy_from(strand, handle.index + 1, len);
                sibling
            };
            self.strands.get_mut(handle.strand)?.truncate(handle.index);
            Some(self.strands.insert(sibling))
        };

        self.detach_strand_if_empty(handle.strand);
        self.stale = true;
        result
    }

    /// Breaks the backbone link following `handle` without deleting anything.
    ///
    /// A circular strand opens so that the nucleotide after the break becomes
    /// the 5' terminus. Breaking after the 3' end of a linear strand is a
    /// no-op; an interior break splits off the 3' remainder into a new strand.
    pub fn break_strand_after(&mut self, handle: NucleotideHandle) -> Option<StrandId> {
        let (len, circular) = {
            let strand = self.strands.get(handle.strand)?;
            (strand.len(), strand.is_circular())
        };
        if handle.index >= len {
            return None;
        }

        let result = if circular {
            let strand = self.strands.get_mut(handle.strand)?;
            strand.circular = false;
            strand.rotate_to((handle.index + 1) % len);
            None
        } else if handle.index + 1 == len {
            return None;
        } else {
            let sibling = {
                let strand = self.strands.get(handle.strand)?;
                let mut sibling = NucleicAcidStrand::new(strand.kind(), strand.name.clone());
                sibling.color = strand.color;
                sibling.copy_from(strand, handle.index + 1, len);
                sibling
            };
            self.strands
                .get_mut(handle.strand)?
                .truncate(handle.index + 1);
            Some(self.strands.insert(sibling))
        };

        self.stale = true;
        result
    }

    /// Joins two strands end to end, or closes one strand into a circle when
    /// both ids name the same strand.
    ///
    /// With `at_three_prime` the donor is appended after the target's 3' end;
    /// otherwise it is prepended before the 5' end. The donor strand is
    /// consumed; its monomers keep their global ids.
    pub fn connect_strands(
        &mut self,
        target: StrandId,
        donor: StrandId,
        at_three_prime: bool,
    ) -> Result<(), StructureError> {
        if target == donor {
            let strand = self
                .strands
                .get_mut(target)
                .ok_or(StructureError::UnknownStrand)?;
            strand.circular = true;
            self.stale = true;
            return Ok(());
        }

        {
            let target_strand = self.strands.get(target).ok_or(StructureError::UnknownStrand)?;
            let donor_strand = self.strands.get(donor).ok_or(StructureError::UnknownStrand)?;
            if target_strand.is_circular() || donor_strand.is_circular() {
                return Err(StructureError::CircularPolymer);
            }
            if target_strand.kind() != donor_strand.kind() {
                return Err(StructureError::KindMismatch {
                    expected: target_strand.kind(),
                    found: donor_strand.kind(),
                });
            }
        }

        let Some(donor_strand) = self.strands.remove(donor) else {
            return Err(StructureError::UnknownStrand);
        };
        let Some(strand) = self.strands.get_mut(target) else {
            return Err(StructureError::UnknownStrand);
        };
        let at = if at_three_prime { strand.len() } else { 0 };
        let count = donor_strand.len();
        strand.store_mut().insert_gap(at, count);
        strand
            .store_mut()
            .copy_from(donor_strand.store(), at, 0, count);
        self.stale = true;
        Ok(())
    }

    // --- chain topology ------------------------------------------------------

    pub fn break_chain_at(&mut self, handle: ResidueHandle) -> Option<PeptideId> {
        let (len, circular) = {
            let chain = self.peptides.get(handle.peptide)?;
            (chain.len(), chain.is_circular())
        };
        if handle.index >= len {
            return None;
        }

        let result = if circular {
            let chain = self.peptides.get_mut(handle.peptide)?;
            chain.remove(handle.index);
            chain.circular = false;
            if !chain.is_empty() {
                let new_start = handle.index % chain.len();
                chain.rotate_to(new_start);
            }
            None
        } else if handle.index == 0 || handle.index + 1 == len {
            self.peptides.get_mut(handle.peptide)?.remove(handle.index);
            None
        } else {
            let sibling = {
                let chain = self.peptides.get(handle.peptide)?;
                let mut sibling = AminoAcidChain::new(chain.name.clone());
                sibling.color = chain.color;
                sibling.copy_from(chain, handle.index + 1, len);
                sibling
            };
            self.peptides.get_mut(handle.peptide)?.truncate(handle.index);
            Some(self.peptides.insert(sibling))
        };

        self.detach_chain_if_empty(handle.peptide);
        self.stale = true;
        result
    }

    pub fn break_chain_after(&mut self, handle: ResidueHandle) -> Option<PeptideId> {
        let (len, circular) = {
            let chain = self.peptides.get(handle.peptide)?;
            (chain.len(), chain.is_circular())
        };
        if handle.index >= len {
            return None;
        }

        let result = if circular {
            let chain = self.peptides.get_mut(handle.peptide)?;
            chain.circular = false;
            chain.rotate_to((handle.index + 1) % len);
            None
        } else if handle.index + 1 == len {
            return None;
        } else {
            let sibling = {
                let chain = self.peptides.get(handle.peptide)?;
                let mut sibling = AminoAcidChain::new(chain.name.clone());
                sibling.color = chain.color;
                sibling.copy_from(chain, handle.index + 1, len);
                sibling
            };
            self.peptides
                .get_mut(handle.peptide)?
                .truncate(handle.index + 1);
            Some(self.peptides.insert(sibling))
        };

        self.stale = true;
        result
    }

    pub fn connect_chains(
        &mut self,
        target: PeptideId,
        donor: PeptideId,
        at_c_term: bool,
    ) -> Result<(), StructureError> {
        if target == donor {
            let chain = self
                .peptides
                .get_mut(target)
                .ok_or(StructureError::UnknownChain)?;
            chain.circular = true;
            self.stale = true;
            return Ok(());
        }

        {
            let target_chain = self.peptides.get(target).ok_or(StructureError::UnknownChain)?;
            let donor_chain = self.peptides.get(donor).ok_or(StructureError::UnknownChain)?;
            if target_chain.is_circular() || donor_chain.is_circular() {
                return Err(StructureError::CircularPolymer);
            }
        }

        let Some(donor_chain) = self.peptides.remove(donor) else {
            return Err(StructureError::UnknownChain);
        };
        let Some(chain) = self.peptides.get_mut(target) else {
            return Err(StructureError::UnknownChain);
        };
        let at = if at_c_term { chain.len() } else { 0 };
        let count = donor_chain.len();
        chain.store_mut().insert_gap(at, count);
        chain.store_mut().copy_from(donor_chain.store(), at, 0, count);
        self.stale = true;
        Ok(())
    }

    // --- derived queries -----------------------------------------------------

    pub fn polymer_count(&self) -> usize {
        self.strands.len() + self.peptides.len()
    }

    pub fn monomer_count(&self) -> usize {
        let nucleotides: usize = self.strands.values().map(NucleicAcidStrand::len).sum();
        let residues: usize = self.peptides.values().map(AminoAcidChain::len).sum();
        nucleotides + residues
    }

    pub fn is_empty(&self) -> bool {
        self.strands.is_empty() && self.peptides.is_empty()
    }

    pub fn export_sequences(&self) -> Vec<SequenceRecord> {
        let strands = self.strands.values().map(|strand| SequenceRecord {
            name: strand.name.clone(),
            kind: GeneratedChainKind::NucleicAcid(strand.kind()),
            sequence: strand.sequence(),
        });
        let chains = self.peptides.values().map(|chain| SequenceRecord {
            name: chain.name.clone(),
            kind: GeneratedChainKind::Protein,
            sequence: chain.sequence(),
        });
        strands.chain(chains).collect()
    }

    /// Axis-aligned bounds over backbone centers and alpha carbons.
    pub fn bounding_box(&self) -> Option<BoundingBox> {
        bounding_box_of(self.reference_points())
    }

    /// Dominant spatial direction of the coarse model, from the covariance of
    /// backbone centers and alpha carbons.
    pub fn principal_axis(&self) -> Option<Vector3<f64>> {
        let points: Vec<Point3<f64>> = self.reference_points().collect();
        principal_axis_of(&points)
    }

    fn reference_points(&self) -> impl Iterator<Item = Point3<f64>> + '_ {
        let backbone = self
            .strands
            .values()
            .flat_map(|strand| strand.store().backbone_centers.iter().copied());
        let alpha = self
            .peptides
            .values()
            .flat_map(|chain| chain.store().alpha_carbons.iter().copied());
        backbone.chain(alpha)
    }

    fn detach_strand_if_empty(&mut self, id: StrandId) {
        if self.strands.get(id).is_some_and(NucleicAcidStrand::is_empty) {
            self.strands.remove(id);
            self.update_disposal();
        }
    }

    fn detach_chain_if_empty(&mut self, id: PeptideId) {
        if self.peptides.get(id).is_some_and(AminoAcidChain::is_empty) {
            self.peptides.remove(id);
            self.update_disposal();
        }
    }

    fn update_disposal(&mut self) {
        if self.is_empty() {
            self.disposal_requested = true;
        }
    }
}
