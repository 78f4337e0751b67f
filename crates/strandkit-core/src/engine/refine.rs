use itertools::iproduct;
use nalgebra::{Point3, Vector3};

use crate::core::models::atomic::{AtomicModel, GeneratedChainKind};
use crate::core::utils::geometry::rotate_about_axis;

/// Candidate adjustments of the glycosidic torsion, in degrees.
const GLYCOSIDIC_CANDIDATES: [f64; 5] = [-20.0, -10.0, 0.0, 10.0, 20.0];
/// Candidate adjustments of the sugar-phosphate torsion, in degrees.
const PHOSPHATE_CANDIDATES: [f64; 5] = [-30.0, -15.0, 0.0, 15.0, 30.0];
/// Ideal O3'-P linkage length in Angstroms.
const TARGET_LINKAGE_LENGTH: f64 = 1.595;

const DEGENERATE_AXIS: f64 = 1e-9;

/// Locally adjusts nucleic backbone torsions so each phosphate sits near its
/// ideal bonding distance from the upstream O3'.
///
/// Residues are visited 5' to 3'; each one searches the cross product of the
/// two candidate angle sets, scores candidates by the deviation of the
/// projected P position from the target linkage length, and permanently
/// applies the best pair before the next residue is scored. Protein chains
/// are left untouched.
pub(crate) fn refine_backbones(model: &mut AtomicModel, circular: &[bool]) {
    for chain in 0..model.chains.len() {
        if !matches!(model.chains[chain].kind, GeneratedChainKind::NucleicAcid(_)) {
            continue;
        }
        let residues = model.chains[chain].residues.clone();
        for residue in residues.clone() {
            let upstream = if residue == residues.start {
                if circular[chain] && residues.len() > 1 {
                    residues.end - 1
                } else {
                    continue;
                }
            } else {
                residue - 1
            };
            refine_residue(model, residue, upstream);
        }
    }
}

fn refine_residue(model: &mut AtomicModel, residue: usize, upstream: usize) {
    let Some(target) = atom_position(model, upstream, "O3'") else {
        return;
    };
    let Some(phosphate) = atom_position(model, residue, "P") else {
        return;
    };
    let (Some(o5), Some(c5), Some(c1)) = (
        atom_position(model, residue, "O5'"),
        atom_position(model, residue, "C5'"),
        atom_position(model, residue, "C1'"),
    ) else {
        return;
    };
    let glycosidic_axis = attachment_position(model, residue)
        .map(|n| n - c1)
        .filter(|axis| axis.norm_squared() > DEGENERATE_AXIS);

    let score = |p: Point3<f64>| ((p - target).norm() - TARGET_LINKAGE_LENGTH).abs();

    let mut best = (0.0, 0.0);
    let mut best_score = score(phosphate);
    for (&glycosidic, &sugar) in iproduct!(&GLYCOSIDIC_CANDIDATES, &PHOSPHATE_CANDIDATES) {
        let swing = |p: Point3<f64>| match glycosidic_axis {
            Some(axis) => rotate_about_axis(p, c1, axis, glycosidic),
            None => p,
        };
        let pivot = swing(o5);
        let axis = swing(c5) - pivot;
        if axis.norm_squared() <= DEGENERATE_AXIS {
            continue;
        }
        let candidate = rotate_about_axis(swing(phosphate), pivot, axis, sugar);
        let candidate_score = score(candidate);
        if candidate_score + 1e-12 < best_score {
            best_score = candidate_score;
            best = (glycosidic, sugar);
        }
    }

    let (glycosidic, sugar) = best;
    if let Some(axis) = glycosidic_axis {
        if glycosidic != 0.0 {
            rotate_atoms(model, residue, is_backbone_atom, c1, axis, glycosidic);
        }
    }
    if sugar != 0.0 {
        let (Some(pivot), Some(tip)) = (
            atom_position(model, residue, "O5'"),
            atom_position(model, residue, "C5'"),
        ) else {
            return;
        };
        let axis = tip - pivot;
        if axis.norm_squared() > DEGENERATE_AXIS {
            rotate_atoms(model, residue, is_phosphate_atom, pivot, axis, sugar);
        }
    }
}

fn atom_position(model: &AtomicModel, residue: usize, name: &str) -> Option<Point3<f64>> {
    model
        .atom_in_residue(residue, name)
        .map(|index| model.atoms[index].position)
}

/// The ring nitrogen bonded to the sugar: N9 on purines, N1 on pyrimidines.
fn attachment_position(model: &AtomicModel, residue: usize) -> Option<Point3<f64>> {
    atom_position(model, residue, "N9").or_else(|| atom_position(model, residue, "N1"))
}

fn is_backbone_atom(name: &str) -> bool {
    name.ends_with('\'') || is_phosphate_atom(name)
}

fn is_phosphate_atom(name: &str) -> bool {
    matches!(name, "P" | "OP1" | "OP2")
}

fn rotate_atoms(
    model: &mut AtomicModel,
    residue: usize,
    select: fn(&str) -> bool,
    pivot: Point3<f64>,
    axis: Vector3<f64>,
    angle_degrees: f64,
) {
    let range = model.residues[residue].atoms.clone();
    for atom in &mut model.atoms[range] {
        if select(&atom.name) {
            atom.position = rotate_about_axis(atom.position, pivot, axis, angle_degrees);
        }
    }
}
