use crate::core::io::top::TopFile;
use crate::core::io::traits::TextFile;
use crate::core::models::document::TopologyDocument;
use crate::core::models::ligand::LigandFragment;
use crate::engine::config::LigandConfig;
use crate::engine::error::EngineError;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument};

const LIGAND_INCLUDE_COMMENT: &str = "; Including ligand ITP";
const LIGAND_POSRES_COMMENT: &str = "; Ligand position restraints";

/// Result of merging one ligand fragment into a topology document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LigandMergeOutcome {
    pub topology: TopologyDocument,
    /// The ligand without its `[ atomtypes ]` block.
    pub ligand: TopologyDocument,
    pub moleculetype: String,
    /// `true` when the ligand carried atom types that were merged.
    pub merged_atomtypes: bool,
    /// 0-based line of the new `[ molecules ]` entry in `topology`.
    pub molecules_line: usize,
}

/// Files written by [`merge_files`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LigandMergeReport {
    pub topology: PathBuf,
    pub ligand: PathBuf,
    pub posres: Option<PathBuf>,
    pub moleculetype: String,
    pub merged_atomtypes: bool,
}

/// Merges a ligand `.itp` into `topology`.
///
/// The ligand's atom types are folded into the topology's `[ atomtypes ]`
/// block right after the forcefield include, followed by the include of
/// `ligand_file` and, when `posres_file` is given, its `#ifdef posres_name`
/// guarded include. The ligand's moleculetype is registered in
/// `[ molecules ]` after the last protein entry.
///
/// # Errors
///
/// Fails on an empty topology, a topology without a forcefield include, or a
/// ligand without a `[ moleculetype ]` name. Nothing is returned on failure.
#[instrument(skip_all, name = "ligand_merge", fields(ligand = ligand_file))]
pub fn merge(
    mut topology: TopologyDocument,
    ligand_source: &TopologyDocument,
    ligand_file: &str,
    posres_file: Option<&str>,
    posres_name: &str,
) -> Result<LigandMergeOutcome, EngineError> {
    if topology.is_blank() {
        return Err(EngineError::EmptyTopology);
    }
    topology
        .forcefield_include()
        .ok_or(EngineError::MissingForcefieldInclude)?;
    let moleculetype = ligand_source
        .moleculetype_name()
        .ok_or(EngineError::MissingMoleculetype)?
        .to_string();

    let fragment = LigandFragment::split(ligand_source);
    let merged_atomtypes = fragment.has_atomtypes();

    let anchor = if merged_atomtypes {
        let merged: Vec<String> = match topology.atomtypes_block() {
            Some(existing) => {
                let mut block = topology.remove_range(existing);
                block.extend_from_slice(fragment.atomtypes_body());
                block
            }
            None => fragment.atomtypes.clone(),
        };
        let ff = topology
            .forcefield_include()
            .ok_or(EngineError::MissingForcefieldInclude)?;
        let count = merged.len();
        debug!(lines = count, "Merged [ atomtypes ] block placed after forcefield include.");
        topology.insert_after(ff, std::iter::once(String::new()).chain(merged));
        ff + 1 + count
    } else {
        topology
            .forcefield_include()
            .ok_or(EngineError::MissingForcefieldInclude)?
    };

    let mut includes = vec![
        String::new(),
        LIGAND_INCLUDE_COMMENT.to_string(),
        format!("#include \"{}\"", ligand_file),
        String::new(),
    ];
    if let Some(posres_file) = posres_file {
        includes.extend([
            LIGAND_POSRES_COMMENT.to_string(),
            format!("#ifdef {}", posres_name),
            format!("#include \"{}\"", posres_file),
            "#endif".to_string(),
            String::new(),
        ]);
    }
    topology.insert_after(anchor, includes);

    let entry = molecules_entry(&moleculetype);
    let molecules_line = match topology.last_protein_molecule_entry() {
        Some(protein) => {
            topology.insert_after(protein, [entry]);
            protein + 1
        }
        None => {
            topology.append([entry]);
            topology.len() - 1
        }
    };

    Ok(LigandMergeOutcome {
        topology,
        ligand: fragment.remainder,
        moleculetype,
        merged_atomtypes,
        molecules_line,
    })
}

/// File-level [`merge`]: reads both inputs and writes the merged topology,
/// the stripped ligand and the copied restraint file into the topology's
/// directory.
///
/// The merged topology is named by the configured namer (default
/// `ligand.top`); the ligand keeps its own file name. Once every output is
/// written the input topology is removed, so the directory again holds a
/// single `.top` file.
pub fn merge_files(
    topology_path: &Path,
    ligand_path: &Path,
    posres_path: Option<&Path>,
    config: &LigandConfig,
) -> Result<LigandMergeReport, EngineError> {
    let topology_dir = topology_path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("."));
    let topology = TopFile::read_from_path(topology_path).map_err(EngineError::io(topology_path))?;
    let ligand = TopFile::read_from_path(ligand_path).map_err(EngineError::io(ligand_path))?;

    let ligand_name = file_name_of(ligand_path)?;
    let posres_name = posres_path.map(file_name_of).transpose()?;

    let outcome = merge(
        topology,
        &ligand,
        ligand_name,
        posres_name,
        &config.posres_name,
    )?;

    info!(moleculetype = %outcome.moleculetype, "Ligand merged into topology.");
    let output_path = topology_dir.join(config.naming.file_name(&config.output_name));
    let ligand_output = topology_dir.join(ligand_name);
    TopFile::write_to_path(&outcome.topology, &output_path).map_err(EngineError::io(&output_path))?;
    TopFile::write_to_path(&outcome.ligand, &ligand_output).map_err(EngineError::io(&ligand_output))?;

    let posres = match (posres_path, posres_name) {
        (Some(source), Some(name)) => {
            let target = topology_dir.join(name);
            if !same_file(source, &target) {
                fs::copy(source, &target).map_err(EngineError::io(source))?;
            }
            Some(target)
        }
        _ => None,
    };

    if !same_file(topology_path, &output_path) {
        fs::remove_file(topology_path).map_err(EngineError::io(topology_path))?;
        debug!(removed = %topology_path.display(), "Replaced input topology.");
    }

    Ok(LigandMergeReport {
        topology: output_path,
        ligand: ligand_output,
        posres,
        moleculetype: outcome.moleculetype,
        merged_atomtypes: outcome.merged_atomtypes,
    })
}

/// `[ molecules ]` line for one copy of `name`, count aligned at column 21.
fn molecules_entry(name: &str) -> String {
    format!("{:<19} 1", name)
}

fn file_name_of(path: &Path) -> Result<&str, EngineError> {
    path.file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| {
            EngineError::io(path)(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                "path has no UTF-8 file name",
            ))
        })
}

fn same_file(a: &Path, b: &Path) -> bool {
    match (fs::canonicalize(a), fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}
