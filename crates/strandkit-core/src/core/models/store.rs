use super::types::{AminoAcidKind, NucleobaseKind};
use nalgebra::{Point3, Vector3};

/// Shifts rows `[at, len)` right by `count`, filling the gap with `fill`.
fn splice_fill<T: Copy>(column: &mut Vec<T>, at: usize, count: usize, fill: T) {
    column.splice(at..at, std::iter::repeat(fill).take(count));
}

fn copy_range<T: Copy>(dst: &mut [T], dest_at: usize, src: &[T], src_at: usize, count: usize) {
    dst[dest_at..dest_at + count].copy_from_slice(&src[src_at..src_at + count]);
}

/// Columnar storage for one nucleic-acid strand's monomer attributes.
///
/// Struct-of-arrays layout, one row per nucleotide. Every bulk operation is
/// O(shifted rows); sequential storage is deliberately favored over edit
/// speed because typical edits happen at strand ends. Row content beyond the
/// logical length is capacity headroom managed by the column vectors.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NucleotideStore {
    pub(crate) global_ids: Vec<u32>,
    /// Cross-reference to an externally generated atomic residue, if any.
    pub(crate) atomic_refs: Vec<Option<u32>>,
    pub(crate) bases: Vec<Option<NucleobaseKind>>,
    /// Global id of the paired nucleotide; relation-only, resolved lazily.
    pub(crate) pair_ids: Vec<Option<u32>>,
    pub(crate) backbone_centers: Vec<Point3<f64>>,
    pub(crate) base_centers: Vec<Point3<f64>>,
    /// Unit direction toward the hydrogen-bonding face of the base.
    pub(crate) hydrogen_faces: Vec<Vector3<f64>>,
    pub(crate) base_normals: Vec<Vector3<f64>>,
}

impl NucleotideStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// The logical row count.
    pub fn len(&self) -> usize {
        self.global_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.global_ids.is_empty()
    }

    /// Grows every column's capacity, preserving existing rows.
    pub fn reserve(&mut self, additional: usize) {
        self.global_ids.reserve(additional);
        self.atomic_refs.reserve(additional);
        self.bases.reserve(additional);
        self.pair_ids.reserve(additional);
        self.backbone_centers.reserve(additional);
        self.base_centers.reserve(additional);
        self.hydrogen_faces.reserve(additional);
        self.base_normals.reserve(additional);
    }

    /// Shifts rows `[at, len)` right by `count`, leaving the inserted rows
    /// zeroed/unset for caller initialization.
    pub fn insert_gap(&mut self, at: usize, count: usize) {
        debug_assert!(at <= self.len());
        splice_fill(&mut self.global_ids, at, count, 0);
        splice_fill(&mut self.atomic_refs, at, count, None);
        splice_fill(&mut self.bases, at, count, None);
        splice_fill(&mut self.pair_ids, at, count, None);
        splice_fill(&mut self.backbone_centers, at, count, Point3::origin());
        splice_fill(&mut self.base_centers, at, count, Point3::origin());
        splice_fill(&mut self.hydrogen_faces, at, count, Vector3::zeros());
        splice_fill(&mut self.base_normals, at, count, Vector3::zeros());
    }

    /// Removes row `at`, shifting the tail left by one.
    pub fn remove(&mut self, at: usize) {
        self.global_ids.remove(at);
        self.atomic_refs.remove(at);
        self.bases.remove(at);
        self.pair_ids.remove(at);
        self.backbone_centers.remove(at);
        self.base_centers.remove(at);
        self.hydrogen_faces.remove(at);
        self.base_normals.remove(at);
    }

    /// Bulk-copies every column for a contiguous range from another store.
    ///
    /// The destination rows must already exist.
    pub fn copy_from(&mut self, other: &Self, dest_at: usize, src_at: usize, count: usize) {
        copy_range(&mut self.global_ids, dest_at, &other.global_ids, src_at, count);
        copy_range(&mut self.atomic_refs, dest_at, &other.atomic_refs, src_at, count);
        copy_range(&mut self.bases, dest_at, &other.bases, src_at, count);
        copy_range(&mut self.pair_ids, dest_at, &other.pair_ids, src_at, count);
        copy_range(
            &mut self.backbone_centers,
            dest_at,
            &other.backbone_centers,
            src_at,
            count,
        );
        copy_range(&mut self.base_centers, dest_at, &other.base_centers, src_at, count);
        copy_range(
            &mut self.hydrogen_faces,
            dest_at,
            &other.hydrogen_faces,
            src_at,
            count,
        );
        copy_range(&mut self.base_normals, dest_at, &other.base_normals, src_at, count);
    }

    /// Intra-store move of `count` rows from `src` to `dest` (ranges may overlap).
    pub fn copy_within(&mut self, src: usize, dest: usize, count: usize) {
        self.global_ids.copy_within(src..src + count, dest);
        self.atomic_refs.copy_within(src..src + count, dest);
        self.bases.copy_within(src..src + count, dest);
        self.pair_ids.copy_within(src..src + count, dest);
        self.backbone_centers.copy_within(src..src + count, dest);
        self.base_centers.copy_within(src..src + count, dest);
        self.hydrogen_faces.copy_within(src..src + count, dest);
        self.base_normals.copy_within(src..src + count, dest);
    }

    /// Circularly permutes rows so that row `new_start` becomes row 0,
    /// preserving relative order. Used to cut a circular strand open at an
    /// arbitrary point.
    pub fn rotate_to(&mut self, new_start: usize) {
        if self.is_empty() {
            return;
        }
        let shift = new_start % self.len();
        self.global_ids.rotate_left(shift);
        self.atomic_refs.rotate_left(shift);
        self.bases.rotate_left(shift);
        self.pair_ids.rotate_left(shift);
        self.backbone_centers.rotate_left(shift);
        self.base_centers.rotate_left(shift);
        self.hydrogen_faces.rotate_left(shift);
        self.base_normals.rotate_left(shift);
    }

    /// Discards rows beyond `new_len`.
    pub fn truncate(&mut self, new_len: usize) {
        self.global_ids.truncate(new_len);
        self.atomic_refs.truncate(new_len);
        self.bases.truncate(new_len);
        self.pair_ids.truncate(new_len);
        self.backbone_centers.truncate(new_len);
        self.base_centers.truncate(new_len);
        self.hydrogen_faces.truncate(new_len);
        self.base_normals.truncate(new_len);
    }

    /// Sets the logical length, growing with unset filler rows as needed.
    pub fn resize(&mut self, new_len: usize) {
        let len = self.len();
        if new_len > len {
            self.insert_gap(len, new_len - len);
        } else {
            self.truncate(new_len);
        }
    }

    pub fn clear(&mut self) {
        self.truncate(0);
    }

    pub fn global_id(&self, row: usize) -> Option<u32> {
        self.global_ids.get(row).copied()
    }
}

/// Columnar storage for one amino-acid chain's monomer attributes.
///
/// Same layout discipline and bulk-operation contract as [`NucleotideStore`];
/// the column set is the amino-acid one (residue kind plus alpha-carbon
/// position instead of the nucleotide geometry columns).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AminoAcidStore {
    pub(crate) global_ids: Vec<u32>,
    pub(crate) atomic_refs: Vec<Option<u32>>,
    pub(crate) kinds: Vec<Option<AminoAcidKind>>,
    pub(crate) alpha_carbons: Vec<Point3<f64>>,
}

impl AminoAcidStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.global_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.global_ids.is_empty()
    }

    pub fn reserve(&mut self, additional: usize) {
        self.global_ids.reserve(additional);
        self.atomic_refs.reserve(additional);
        self.kinds.reserve(additional);
        self.alpha_carbons.reserve(additional);
    }

    pub fn insert_gap(&mut self, at: usize, count: usize) {
        debug_assert!(at <= self.len());
        splice_fill(&mut self.global_ids, at, count, 0);
        splice_fill(&mut self.atomic_refs, at, count, None);
        splice_fill(&mut self.kinds, at, count, None);
        splice_fill(&mut self.alpha_carbons, at, count, Point3::origin());
    }

    pub fn remove(&mut self, at: usize) {
        self.global_ids.remove(at);
        self.atomic_refs.remove(at);
        self.kinds.remove(at);
        self.alpha_carbons.remove(at);
    }

    pub fn copy_from(&mut self, other: &Self, dest_at: usize, src_at: usize, count: usize) {
        copy_range(&mut self.global_ids, dest_at, &other.global_ids, src_at, count);
        copy_range(&mut self.atomic_refs, dest_at, &other.atomic_refs, src_at, count);
        copy_range(&mut self.kinds, dest_at, &other.kinds, src_at, count);
        copy_range(&mut self.alpha_carbons, dest_at, &other.alpha_carbons, src_at, count);
    }

    pub fn copy_within(&mut self, src: usize, dest: usize, count: usize) {
        self.global_ids.copy_within(src..src + count, dest);
        self.atomic_refs.copy_within(src..src + count, dest);
        self.kinds.copy_within(src..src + count, dest);
        self.alpha_carbons.copy_within(src..src + count, dest);
    }

    pub fn rotate_to(&mut self, new_start: usize) {
        if self.is_empty() {
            return;
        }
        let shift = new_start % self.len();
        self.global_ids.rotate_left(shift);
        self.atomic_refs.rotate_left(shift);
        self.kinds.rotate_left(shift);
        self.alpha_carbons.rotate_left(shift);
    }

    pub fn truncate(&mut self, new_len: usize) {
        self.global_ids.truncate(new_len);
        self.atomic_refs.truncate(new_len);
        self.kinds.truncate(new_len);
        self.alpha_carbons.truncate(new_len);
    }

    pub fn resize(&mut self, new_len: usize) {
        let len = self.len();
        if new_len > len {
            self.insert_gap(len, new_len - len);
        } else {
            self.truncate(new_len);
        }
    }

    pub fn clear(&mut self) {
        self.truncate(0);
    }

    pub fn global_id(&self, row: usize) -> Option<u32> {
        self.global_ids.get(row).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled_store(n: u32) -> NucleotideStore {
        let mut store = NucleotideStore::new();
        store.insert_gap(0, n as usize);
        for row in 0..n as usize {
            store.global_ids[row] = row as u32 + 1;
            store.bases[row] = Some(NucleobaseKind::Adenine);
            store.backbone_centers[row] = Point3::new(row as f64, 0.0, 0.0);
        }
        store
    }

    #[test]
    fn insert_gap_shifts_tail_and_leaves_unset_rows() {
        let mut store = filled_store(4);
        store.insert_gap(2, 2);

        assert_eq!(store.len(), 6);
        assert_eq!(store.global_ids, vec![1, 2, 0, 0, 3, 4]);
        assert_eq!(store.bases[2], None);
        assert_eq!(store.bases[3], None);
        assert_eq!(store.backbone_centers[4], Point3::new(2.0, 0.0, 0.0));
    }

    #[test]
    fn remove_shifts_tail_left() {
        let mut store = filled_store(4);
        store.remove(1);

        assert_eq!(store.len(), 3);
        assert_eq!(store.global_ids, vec![1, 3, 4]);
        assert_eq!(store.backbone_centers[1], Point3::new(2.0, 0.0, 0.0));
    }

    #[test]
    fn copy_from_transfers_all_columns() {
        let src = filled_store(5);
        let mut dst = NucleotideStore::new();
        dst.resize(3);
        dst.copy_from(&src, 0, 2, 3);

        assert_eq!(dst.global_ids, vec![3, 4, 5]);
        assert_eq!(dst.bases[0], Some(NucleobaseKind::Adenine));
        assert_eq!(dst.backbone_centers[2], Point3::new(4.0, 0.0, 0.0));
    }

    #[test]
    fn copy_within_supports_overlapping_ranges() {
        let mut store = filled_store(5);
        store.copy_within(0, 1, 4);

        assert_eq!(store.global_ids, vec![1, 1, 2, 3, 4]);
    }

    #[test]
    fn rotate_to_rebases_row_zero_circularly() {
        let mut store = filled_store(5);
        store.rotate_to(3);

        assert_eq!(store.global_ids, vec![4, 5, 1, 2, 3]);
        assert_eq!(store.backbone_centers[0], Point3::new(3.0, 0.0, 0.0));
    }

    #[test]
    fn rotate_to_on_empty_store_is_a_no_op() {
        let mut store = NucleotideStore::new();
        store.rotate_to(2);
        assert!(store.is_empty());
    }

    #[test]
    fn resize_grows_and_shrinks_logical_length() {
        let mut store = filled_store(2);
        store.resize(4);
        assert_eq!(store.len(), 4);
        assert_eq!(store.global_ids[3], 0);

        store.resize(1);
        assert_eq!(store.len(), 1);
        assert_eq!(store.global_ids, vec![1]);
    }

    #[test]
    fn amino_acid_store_bulk_operations_mirror_nucleotide_store() {
        let mut store = AminoAcidStore::new();
        store.insert_gap(0, 3);
        store.global_ids.copy_from_slice(&[10, 11, 12]);
        store.kinds[1] = Some(AminoAcidKind::Glycine);
        store.alpha_carbons[2] = Point3::new(0.0, 1.0, 0.0);

        store.rotate_to(1);
        assert_eq!(store.global_ids, vec![11, 12, 10]);
        assert_eq!(store.kinds[0], Some(AminoAcidKind::Glycine));

        store.remove(0);
        assert_eq!(store.global_ids, vec![12, 10]);
        assert_eq!(store.alpha_carbons[0], Point3::new(0.0, 1.0, 0.0));
    }
}
