use std::collections::HashMap;
use std::collections::hash_map::Entry;

use phf::{Set, phf_set};
use tracing::{debug, instrument, warn};

use super::error::GenerationError;
use super::events::{EventSink, GenerationEvent};
use super::finalize::{assign_secondary_structure, connect_residues};
use super::limits::max_generated_atoms;
use super::refine::refine_backbones;
use crate::core::fragments::fragment::Fragment;
use crate::core::fragments::library::FragmentLibrary;
use crate::core::models::atomic::{
    AtomBond, AtomicModel, BondKind, GeneratedAtom, GeneratedChain, GeneratedChainKind,
    GeneratedResidue, ModelSizing, SecondaryStructure,
};
use crate::core::models::structure::Structure;
use crate::core::models::types::{AminoAcidKind, NucleicAcidKind, NucleobaseKind};
use crate::core::utils::geometry::{backbone_basis, nucleotide_basis};

/// Atoms every nucleotide fragment must provide for placement and backbone
/// refinement. The phosphate group is exempt so the 5'-truncated variant
/// still validates.
static NUCLEOTIDE_REQUIRED_ATOMS: Set<&'static str> = phf_set! {
    "C1'",
    "O5'",
    "C5'",
    "O3'",
};

/// Atoms every amino-acid fragment must provide for placement and linkage.
static AMINO_ACID_REQUIRED_ATOMS: Set<&'static str> = phf_set! {
    "N",
    "CA",
    "C",
};

/// Fragment lookup with lazily derived 5'-truncated variants.
///
/// The truncated variant of each nucleotide type is computed at most once per
/// run; further terminal nucleotides of the same type hit the cache.
struct FragmentCache<'a> {
    library: &'a FragmentLibrary,
    truncated: HashMap<(NucleicAcidKind, NucleobaseKind), Fragment>,
}

impl<'a> FragmentCache<'a> {
    fn new(library: &'a FragmentLibrary) -> Self {
        Self {
            library,
            truncated: HashMap::new(),
        }
    }

    fn nucleotide(
        &mut self,
        kind: NucleicAcidKind,
        base: NucleobaseKind,
        five_prime_terminal: bool,
    ) -> Result<&Fragment, GenerationError> {
        if !five_prime_terminal {
            return self
                .library
                .nucleotide(kind, base)
                .ok_or_else(|| GenerationError::FragmentNotFound {
                    code: format!("{kind}.{base}"),
                });
        }
        match self.truncated.entry((kind, base)) {
            Entry::Occupied(entry) => Ok(entry.into_mut()),
            Entry::Vacant(entry) => {
                let full = self.library.nucleotide(kind, base).ok_or_else(|| {
                    GenerationError::FragmentNotFound {
                        code: format!("{kind}.{base}"),
                    }
                })?;
                Ok(entry.insert(full.without_phosphate()))
            }
        }
    }

    fn amino_acid(&self, kind: AminoAcidKind) -> Result<&'a Fragment, GenerationError> {
        self.library
            .amino_acid(kind)
            .ok_or_else(|| GenerationError::FragmentNotFound {
                code: kind.three_letter().to_string(),
            })
    }
}

impl Structure {
    /// Generates, refines and caches the all-atom model of this structure.
    ///
    /// Returns the cached model untouched when it is present, up to date and
    /// `force` is false. A failed run clears the cache instead of leaving a
    /// model that no longer matches the edited state.
    #[instrument(skip_all, fields(structure = %self.name))]
    pub fn build_atomic_model(
        &mut self,
        library: &FragmentLibrary,
        events: &EventSink<'_>,
        force: bool,
    ) -> Result<&AtomicModel, GenerationError> {
        if force || self.stale || self.cached_model.is_none() {
            let model = match generate_model(self, library, events) {
                Ok(model) => model,
                Err(error) => {
                    self.cached_model = None;
                    return Err(error);
                }
            };
            self.link_atomic_refs(&model);
            self.cached_model = Some(model);
            self.stale = false;
            events.emit(GenerationEvent::Refreshed);
        }
        Ok(self.cached_model.get_or_insert_with(AtomicModel::default))
    }

    /// Points each placed monomer back at its generated residue.
    fn link_atomic_refs(&mut self, model: &AtomicModel) {
        for (residue_index, residue) in model.residues.iter().enumerate() {
            if let Some(handle) = self.find_nucleotide(residue.source_monomer) {
                if let Some(mut view) = self.nucleotide_mut(handle) {
                    view.set_atomic_ref(Some(residue_index as u32));
                }
            } else if let Some(handle) = self.find_residue(residue.source_monomer) {
                if let Some(mut view) = self.residue_mut(handle) {
                    view.set_atomic_ref(Some(residue_index as u32));
                }
            }
        }
    }
}

#[instrument(skip_all)]
fn generate_model(
    structure: &Structure,
    library: &FragmentLibrary,
    events: &EventSink<'_>,
) -> Result<AtomicModel, GenerationError> {
    let mut cache = FragmentCache::new(library);

    events.emit(GenerationEvent::SizingStarted {
        monomers: structure.monomer_count(),
    });
    let sizing = size_model(structure, &mut cache)?;
    events.emit(GenerationEvent::SizingFinished {
        atoms: sizing.atoms,
        residues: sizing.residues,
        chains: sizing.chains,
    });

    let ceiling = max_generated_atoms();
    if sizing.atoms > ceiling {
        warn!(
            projected = sizing.atoms,
            ceiling, "generation rejected before placement"
        );
        return Err(GenerationError::AtomBudgetExceeded {
            projected: sizing.atoms,
            ceiling,
        });
    }
    debug!(
        atoms = sizing.atoms,
        residues = sizing.residues,
        chains = sizing.chains,
        "sizing pass complete"
    );

    events.emit(GenerationEvent::PlacementStarted);
    let (mut model, circular) = place_model(structure, &mut cache, &sizing)?;
    events.emit(GenerationEvent::PlacementFinished);

    events.emit(GenerationEvent::RefinementStarted {
        residues: model.residue_count(),
    });
    refine_backbones(&mut model, &circular);
    events.emit(GenerationEvent::RefinementFinished);

    connect_residues(&mut model, &circular);
    assign_secondary_structure(&mut model);
    Ok(model)
}

/// Computes exact output totals and validates every fragment the run will
/// need, before any placement work happens.
fn size_model(
    structure: &Structure,
    cache: &mut FragmentCache<'_>,
) -> Result<ModelSizing, GenerationError> {
    let mut sizing = ModelSizing::default();
    for (_, strand) in structure.strands() {
        if strand.is_empty() {
            continue;
        }
        sizing.chains += 1;
        for (index, nucleotide) in strand.iter().enumerate() {
            let base = nucleotide
                .base()
                .ok_or(GenerationError::UnsetMonomerType {
                    id: nucleotide.id(),
                })?;
            let five_prime_terminal = index == 0 && !strand.is_circular();
            let fragment = cache.nucleotide(strand.kind(), base, five_prime_terminal)?;
            validate_required_atoms(
                &format!("{}.{}", strand.kind(), base),
                fragment,
                &NUCLEOTIDE_REQUIRED_ATOMS,
            )?;
            sizing.atoms += fragment.atom_count();
            sizing.residues += 1;
        }
    }
    for (_, chain) in structure.chains() {
        if chain.is_empty() {
            continue;
        }
        sizing.chains += 1;
        for residue in chain.iter() {
            let kind = residue
                .kind()
                .ok_or(GenerationError::UnsetMonomerType { id: residue.id() })?;
            let fragment = cache.amino_acid(kind)?;
            validate_required_atoms(kind.three_letter(), fragment, &AMINO_ACID_REQUIRED_ATOMS)?;
            sizing.atoms += fragment.atom_count();
            sizing.residues += 1;
        }
    }
    Ok(sizing)
}

fn validate_required_atoms(
    code: &str,
    fragment: &Fragment,
    required: &Set<&'static str>,
) -> Result<(), GenerationError> {
    for atom in required.iter() {
        if !fragment.has_atom(atom) {
            return Err(GenerationError::MissingRequiredAtom {
                fragment: code.to_string(),
                atom: (*atom).to_string(),
            });
        }
    }
    Ok(())
}

/// Rigidly places every monomer's fragment into preallocated buffers.
///
/// Nucleotide fragments are anchored by their backbone center and oriented by
/// the stored hydrogen-face and base-normal directions; amino-acid fragments
/// are anchored by the alpha carbon and oriented along the local chain
/// direction. Template bonds are carried over per residue.
fn place_model(
    structure: &Structure,
    cache: &mut FragmentCache<'_>,
    sizing: &ModelSizing,
) -> Result<(AtomicModel, Vec<bool>), GenerationError> {
    let mut model = AtomicModel::with_capacity(sizing);
    let mut circular = Vec::with_capacity(sizing.chains);

    for (_, strand) in structure.strands() {
        if strand.is_empty() {
            continue;
        }
        let chain_index = model.chains.len();
        let residue_start = model.residues.len();
        for (index, nucleotide) in strand.iter().enumerate() {
            let base = nucleotide
                .base()
                .ok_or(GenerationError::UnsetMonomerType {
                    id: nucleotide.id(),
                })?;
            let five_prime_terminal = index == 0 && !strand.is_circular();
            let fragment = cache.nucleotide(strand.kind(), base, five_prime_terminal)?;
            let rotation =
                nucleotide_basis(&nucleotide.hydrogen_face(), &nucleotide.base_normal());
            let anchor = nucleotide.backbone_center();
            let local_anchor = fragment.offsets.to_backbone_center;

            let residue_index = model.residues.len();
            let atom_start = model.atoms.len();
            for atom in &fragment.atoms {
                model.atoms.push(GeneratedAtom {
                    name: atom.name.clone(),
                    element: atom.element.clone(),
                    position: anchor + rotation * (atom.position.coords - local_anchor),
                    residue: residue_index,
                    serial: model.atoms.len() as u32 + 1,
                });
            }
            for &(a, b) in &fragment.bonds {
                model
                    .bonds
                    .push(AtomBond::new(atom_start + a, atom_start + b, BondKind::Template));
            }
            model.residues.push(GeneratedResidue {
                name: residue_name(strand.kind(), base),
                serial: (residue_index - residue_start) as u32 + 1,
                atoms: atom_start..model.atoms.len(),
                chain: chain_index,
                secondary: SecondaryStructure::Coil,
                source_monomer: nucleotide.id(),
            });
        }
        model.chains.push(GeneratedChain {
            name: strand.name.clone(),
            kind: GeneratedChainKind::NucleicAcid(strand.kind()),
            residues: residue_start..model.residues.len(),
        });
        circular.push(strand.is_circular());
    }

    for (_, chain) in structure.chains() {
        if chain.is_empty() {
            continue;
        }
        let chain_index = model.chains.len();
        let residue_start = model.residues.len();
        for (index, residue) in chain.iter().enumerate() {
            let kind = residue
                .kind()
                .ok_or(GenerationError::UnsetMonomerType { id: residue.id() })?;
            let fragment = cache.amino_acid(kind)?;
            let anchor = residue.alpha_carbon();
            let direction = if index + 1 < chain.len() {
                chain.residue(index + 1).map(|next| next.alpha_carbon() - anchor)
            } else if index > 0 {
                chain.residue(index - 1).map(|prev| anchor - prev.alpha_carbon())
            } else {
                None
            }
            .unwrap_or_default();
            let rotation = backbone_basis(&direction);
            let local_anchor = fragment.offsets.to_reference_atom;

            let residue_index = model.residues.len();
            let atom_start = model.atoms.len();
            for atom in &fragment.atoms {
                model.atoms.push(GeneratedAtom {
                    name: atom.name.clone(),
                    element: atom.element.clone(),
                    position: anchor + rotation * (atom.position.coords - local_anchor),
                    residue: residue_index,
                    serial: model.atoms.len() as u32 + 1,
                });
            }
            for &(a, b) in &fragment.bonds {
                model
                    .bonds
                    .push(AtomBond::new(atom_start + a, atom_start + b, BondKind::Template));
            }
            model.residues.push(GeneratedResidue {
                name: kind.three_letter().to_string(),
                serial: (residue_index - residue_start) as u32 + 1,
                atoms: atom_start..model.atoms.len(),
                chain: chain_index,
                secondary: SecondaryStructure::Coil,
                source_monomer: residue.id(),
            });
        }
        model.chains.push(GeneratedChain {
            name: chain.name.clone(),
            kind: GeneratedChainKind::Protein,
            residues: residue_start..model.residues.len(),
        });
        circular.push(chain.is_circular());
    }

    Ok((model, circular))
}

/// PDB-style residue name: DNA bases carry a D prefix, RNA bases do not.
fn residue_name(kind: NucleicAcidKind, base: NucleobaseKind) -> String {
    match kind {
        NucleicAcidKind::Dna => format!("D{}", base.code()),
        NucleicAcidKind::Rna => base.code().to_string(),
    }
}
