use crate::core::models::atomic::{
    AtomBond, AtomicModel, BondKind, GeneratedChainKind, SecondaryStructure,
};
use nalgebra::Point3;

/// Maximum distance at which consecutive residues are considered covalently
/// linked, in Angstroms.
const LINKAGE_DISTANCE_CUTOFF: f64 = 2.5;
/// CA(i) to CA(i+4) distance below which a window is called helical.
const HELIX_CA_DISTANCE_CUTOFF: f64 = 6.5;

/// Adds inter-residue backbone bonds confirmed by geometry.
///
/// Nucleic chains link O3' to the next residue's P, protein chains link C to
/// the next N. A pair further apart than the cutoff stays unbonded, so chains
/// broken by unrefined geometry do not get spurious bonds. Circular chains
/// also test the closing last-to-first link.
pub(crate) fn connect_residues(model: &mut AtomicModel, circular: &[bool]) {
    let mut linkages = Vec::new();
    for chain in 0..model.chains.len() {
        let (donor, acceptor) = match model.chains[chain].kind {
            GeneratedChainKind::NucleicAcid(_) => ("O3'", "P"),
            GeneratedChainKind::Protein => ("C", "N"),
        };
        let residues = model.chains[chain].residues.clone();
        for residue in residues.clone() {
            let next = if residue + 1 < residues.end {
                residue + 1
            } else if circular[chain] && residues.len() > 1 {
                residues.start
            } else {
                continue;
            };
            let (Some(a), Some(b)) = (
                model.atom_in_residue(residue, donor),
                model.atom_in_residue(next, acceptor),
            ) else {
                continue;
            };
            let distance = (model.atoms[a].position - model.atoms[b].position).norm();
            if distance <= LINKAGE_DISTANCE_CUTOFF {
                linkages.push(AtomBond::new(a, b, BondKind::Linkage));
            }
        }
    }
    model.bonds.extend(linkages);
}

/// Marks helical runs on protein chains.
///
/// A residue window [i, i+4] whose terminal alpha carbons sit closer than the
/// helix cutoff is marked Helix in full; everything else stays Coil.
pub(crate) fn assign_secondary_structure(model: &mut AtomicModel) {
    for chain in 0..model.chains.len() {
        if model.chains[chain].kind != GeneratedChainKind::Protein {
            continue;
        }
        let residues = model.chains[chain].residues.clone();
        let alpha: Vec<Option<Point3<f64>>> = residues
            .clone()
            .map(|residue| {
                model
                    .atom_in_residue(residue, "CA")
                    .map(|index| model.atoms[index].position)
            })
            .collect();

        let mut helical = vec![false; residues.len()];
        for i in 0..residues.len().saturating_sub(4) {
            if let (Some(a), Some(b)) = (alpha[i], alpha[i + 4]) {
                if (a - b).norm() < HELIX_CA_DISTANCE_CUTOFF {
                    for flag in &mut helical[i..=i + 4] {
                        *flag = true;
                    }
                }
            }
        }
        for (offset, &is_helical) in helical.iter().enumerate() {
            if is_helical {
                model.residues[residues.start + offset].secondary = SecondaryStructure::Helix;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::atomic::{GeneratedAtom, GeneratedChain, GeneratedResidue};
    use crate::core::models::types::NucleicAcidKind;

    fn push_residue(model: &mut AtomicModel, chain: usize, atoms: &[(&str, [f64; 3])]) {
        let start = model.atoms.len();
        let residue = model.residues.len();
        for &(name, position) in atoms {
            model.atoms.push(GeneratedAtom {
                name: name.to_string(),
                element: name[..1].to_string(),
                position: Point3::from(position),
                residue,
                serial: model.atoms.len() as u32 + 1,
            });
        }
        model.residues.push(GeneratedResidue {
            name: "RES".to_string(),
            serial: residue as u32 + 1,
            atoms: start..model.atoms.len(),
            chain,
            secondary: SecondaryStructure::Coil,
            source_monomer: residue as u32 + 1,
        });
    }

    #[test]
    fn linkage_bonds_respect_distance_gate() {
        let mut model = AtomicModel::default();
        push_residue(&mut model, 0, &[("O3'", [0.0, 0.0, 0.0])]);
        push_residue(&mut model, 0, &[("P", [1.6, 0.0, 0.0]), ("O3'", [3.0, 0.0, 0.0])]);
        // Next phosphate is far beyond the cutoff.
        push_residue(&mut model, 0, &[("P", [20.0, 0.0, 0.0])]);
        model.chains.push(GeneratedChain {
            name: "s".to_string(),
            kind: GeneratedChainKind::NucleicAcid(NucleicAcidKind::Dna),
            residues: 0..3,
        });

        connect_residues(&mut model, &[false]);

        assert_eq!(model.bonds.len(), 1);
        assert_eq!(model.bonds[0].kind, BondKind::Linkage);
        assert_eq!((model.bonds[0].a, model.bonds[0].b), (0, 1));
    }

    #[test]
    fn circular_chain_gets_closing_linkage() {
        let mut model = AtomicModel::default();
        push_residue(&mut model, 0, &[("P", [0.0, 0.0, 0.0]), ("O3'", [1.6, 0.0, 0.0])]);
        push_residue(&mut model, 0, &[("P", [1.7, 0.0, 0.0]), ("O3'", [0.1, 0.0, 0.0])]);
        model.chains.push(GeneratedChain {
            name: "ring".to_string(),
            kind: GeneratedChainKind::NucleicAcid(NucleicAcidKind::Dna),
            residues: 0..2,
        });

        connect_residues(&mut model, &[true]);

        // Forward link plus the closing last-to-first link.
        assert_eq!(model.bonds.len(), 2);
        // The closing link lands back on the first residue's phosphate.
        assert!(model.bonds.iter().any(|bond| bond.contains(0) && bond.contains(3)));
    }

    #[test]
    fn compact_ca_trace_is_marked_helical() {
        let mut model = AtomicModel::default();
        // Idealized alpha-helix CA spacing: i to i+4 is about 6.2 A.
        for i in 0..6 {
            let t = i as f64 * 1.745;
            push_residue(
                &mut model,
                0,
                &[("CA", [2.3 * t.cos(), 2.3 * t.sin(), 1.5 * i as f64])],
            );
        }
        model.chains.push(GeneratedChain {
            name: "p".to_string(),
            kind: GeneratedChainKind::Protein,
            residues: 0..6,
        });

        assign_secondary_structure(&mut model);

        assert!(model
            .residues
            .iter()
            .all(|r| r.secondary == SecondaryStructure::Helix));
    }

    #[test]
    fn extended_ca_trace_stays_coil() {
        let mut model = AtomicModel::default();
        for i in 0..6 {
            push_residue(&mut model, 0, &[("CA", [3.8 * i as f64, 0.0, 0.0])]);
        }
        model.chains.push(GeneratedChain {
            name: "p".to_string(),
            kind: GeneratedChainKind::Protein,
            residues: 0..6,
        });

        assign_secondary_structure(&mut model);

        assert!(model
            .residues
            .iter()
            .all(|r| r.secondary == SecondaryStructure::Coil));
    }
}
