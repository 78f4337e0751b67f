use super::ids::{GlobalId, PeptideId, StrandId};
use super::store::{AminoAcidStore, NucleotideStore};
use super::types::{AminoAcidKind, NucleobaseKind};
use nalgebra::{Point3, Vector3};

/// Location of one nucleotide: owning strand plus current row index.
///
/// Handles are plain data and may go stale when rows shift under them; stale
/// handles are detected and repaired by the owning structure's id lookup, so
/// callers that need an edit-stable reference should hold the monomer's
/// global id instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NucleotideHandle {
    pub strand: StrandId,
    pub index: usize,
}

/// Location of one amino-acid residue: owning peptide plus row index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ResidueHandle {
    pub peptide: PeptideId,
    pub index: usize,
}

/// A non-owning read view over one row of a [`NucleotideStore`].
///
/// Views read straight from the column buffers at their row index; they are
/// created per access and borrow the store, so they can never observe a
/// reshuffled layout.
#[derive(Debug, Clone, Copy)]
pub struct NucleotideView<'a> {
    pub(crate) store: &'a NucleotideStore,
    pub(crate) index: usize,
}

impl<'a> NucleotideView<'a> {
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn id(&self) -> GlobalId {
        self.store.global_ids[self.index]
    }

    pub fn atomic_ref(&self) -> Option<u32> {
        self.store.atomic_refs[self.index]
    }

    pub fn base(&self) -> Option<NucleobaseKind> {
        self.store.bases[self.index]
    }

    pub fn pair_id(&self) -> Option<GlobalId> {
        self.store.pair_ids[self.index]
    }

    pub fn backbone_center(&self) -> Point3<f64> {
        self.store.backbone_centers[self.index]
    }

    pub fn base_center(&self) -> Point3<f64> {
        self.store.base_centers[self.index]
    }

    pub fn hydrogen_face(&self) -> Vector3<f64> {
        self.store.hydrogen_faces[self.index]
    }

    pub fn base_normal(&self) -> Vector3<f64> {
        self.store.base_normals[self.index]
    }

    /// True iff this row is the 5' terminus at read time.
    pub fn is_chain_start(&self) -> bool {
        self.index == 0
    }

    /// True iff this row is the 3' terminus at read time.
    pub fn is_chain_end(&self) -> bool {
        self.index + 1 == self.store.len()
    }
}

/// The exclusive counterpart of [`NucleotideView`], writing into the store row.
#[derive(Debug)]
pub struct NucleotideViewMut<'a> {
    pub(crate) store: &'a mut NucleotideStore,
    pub(crate) index: usize,
}

impl<'a> NucleotideViewMut<'a> {
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn id(&self) -> GlobalId {
        self.store.global_ids[self.index]
    }

    pub fn base(&self) -> Option<NucleobaseKind> {
        self.store.bases[self.index]
    }

    pub fn pair_id(&self) -> Option<GlobalId> {
        self.store.pair_ids[self.index]
    }

    pub fn backbone_center(&self) -> Point3<f64> {
        self.store.backbone_centers[self.index]
    }

    pub fn base_center(&self) -> Point3<f64> {
        self.store.base_centers[self.index]
    }

    /// Sets the base type without geometric correction; type changes that
    /// must preserve the backbone-relative frame go through the structure's
    /// corrected setter instead.
    pub fn set_base(&mut self, base: Option<NucleobaseKind>) {
        self.store.bases[self.index] = base;
    }

    pub fn set_pair_id(&mut self, pair: Option<GlobalId>) {
        self.store.pair_ids[self.index] = pair;
    }

    pub fn set_atomic_ref(&mut self, atomic_ref: Option<u32>) {
        self.store.atomic_refs[self.index] = atomic_ref;
    }

    pub fn set_backbone_center(&mut self, position: Point3<f64>) {
        self.store.backbone_centers[self.index] = position;
    }

    pub fn set_base_center(&mut self, position: Point3<f64>) {
        self.store.base_centers[self.index] = position;
    }

    pub fn set_hydrogen_face(&mut self, direction: Vector3<f64>) {
        self.store.hydrogen_faces[self.index] = direction;
    }

    pub fn set_base_normal(&mut self, direction: Vector3<f64>) {
        self.store.base_normals[self.index] = direction;
    }
}

/// A non-owning read view over one row of an [`AminoAcidStore`].
#[derive(Debug, Clone, Copy)]
pub struct AminoAcidView<'a> {
    pub(crate) store: &'a AminoAcidStore,
    pub(crate) index: usize,
}

impl<'a> AminoAcidView<'a> {
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn id(&self) -> GlobalId {
        self.store.global_ids[self.index]
    }

    pub fn atomic_ref(&self) -> Option<u32> {
        self.store.atomic_refs[self.index]
    }

    pub fn kind(&self) -> Option<AminoAcidKind> {
        self.store.kinds[self.index]
    }

    pub fn alpha_carbon(&self) -> Point3<f64> {
        self.store.alpha_carbons[self.index]
    }

    /// True iff this row is the N-terminus at read time.
    pub fn is_chain_start(&self) -> bool {
        self.index == 0
    }

    /// True iff this row is the C-terminus at read time.
    pub fn is_chain_end(&self) -> bool {
        self.index + 1 == self.store.len()
    }
}

/// The exclusive counterpart of [`AminoAcidView`].
#[derive(Debug)]
pub struct AminoAcidViewMut<'a> {
    pub(crate) store: &'a mut AminoAcidStore,
    pub(crate) index: usize,
}

impl<'a> AminoAcidViewMut<'a> {
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn id(&self) -> GlobalId {
        self.store.global_ids[self.index]
    }

    pub fn kind(&self) -> Option<AminoAcidKind> {
        self.store.kinds[self.index]
    }

    pub fn alpha_carbon(&self) -> Point3<f64> {
        self.store.alpha_carbons[self.index]
    }

    pub fn set_kind(&mut self, kind: Option<AminoAcidKind>) {
        self.store.kinds[self.index] = kind;
    }

    pub fn set_atomic_ref(&mut self, atomic_ref: Option<u32>) {
        self.store.atomic_refs[self.index] = atomic_ref;
    }

    pub fn set_alpha_carbon(&mut self, position: Point3<f64>) {
        self.store.alpha_carbons[self.index] = position;
    }
}
