use crate::core::io::ndx::NdxFile;
use crate::core::io::posres::PosresFile;
use crate::core::io::top::TopFile;
use crate::core::io::traits::TextFile;
use crate::core::models::document::TopologyDocument;
use crate::core::models::index::{AtomGroup, IndexFile, group_key};
use crate::core::models::restraint::{PositionRestraints, RestraintTriplet};
use crate::core::topology::markers;
use crate::engine::config::RestraintConfig;
use crate::engine::error::EngineError;
use crate::engine::naming::NameAllocator;
use crate::engine::renumber::renumber;
use std::collections::btree_map::Entry;
use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument};

const RESTRAINT_INCLUDE_COMMENT: &str = "; Include Position restraint file";

/// Where the include of one restraint file was wired in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RestraintPlacement {
    /// Appended to every per-chain include file of a multi-chain topology.
    ChainFiles(Vec<PathBuf>),
    /// Inserted into the main topology; `line` is the 0-based index of the
    /// first inserted line (blank) in the written document.
    MainTopology { line: usize },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TripletReport {
    pub triplet: RestraintTriplet,
    pub posres_name: String,
    pub restraint_file: PathBuf,
    pub restrained_atoms: usize,
    pub placement: RestraintPlacement,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RestraintReport {
    pub topology: PathBuf,
    pub triplets: Vec<TripletReport>,
    /// `false` when every restraint went into per-chain files.
    pub topology_modified: bool,
}

/// Reads the index groups at `path`.
pub fn load_index(path: &Path) -> Result<IndexFile, EngineError> {
    NdxFile::read_from_path(path).map_err(EngineError::index(path))
}

/// The single `.top` file of a topology directory.
pub fn find_topology_file(topology_dir: &Path) -> Result<PathBuf, EngineError> {
    let mut found: Vec<PathBuf> = list_file_names(topology_dir)?
        .into_iter()
        .filter(|name| name.ends_with(".top"))
        .map(|name| topology_dir.join(name))
        .collect();
    if found.len() != 1 {
        return Err(EngineError::TopologyFileNotFound {
            dir: topology_dir.to_path_buf(),
            found: found.len(),
        });
    }
    Ok(found.remove(0))
}

/// Generates restraints against the single `.top` file of `topology_dir`.
pub fn generate(
    index: &IndexFile,
    topology_dir: &Path,
    config: &RestraintConfig,
) -> Result<RestraintReport, EngineError> {
    let topology_path = find_topology_file(topology_dir)?;
    run(index, &topology_path, config)
}

/// Writes one restraint file per triplet and wires each into the topology.
///
/// Triplets are processed strictly in order; single-chain insertions see the
/// document as left by earlier triplets. Every edit is staged in memory and
/// written only after all triplets succeeded, so an error leaves the
/// directory untouched. The main topology is rewritten only when modified.
#[instrument(skip_all, name = "restraint_workflow", fields(topology = %topology_path.display()))]
pub fn run(
    index: &IndexFile,
    topology_path: &Path,
    config: &RestraintConfig,
) -> Result<RestraintReport, EngineError> {
    let pairs = config.paired_triplets()?;
    let topology_dir = topology_path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("."));

    let mut staged = StagedEdits {
        topology: TopFile::read_from_path(topology_path).map_err(EngineError::io(topology_path))?,
        topology_modified: false,
        chain_files: BTreeMap::new(),
        restraint_files: Vec::new(),
    };
    let dir_files = list_file_names(topology_dir)?;
    let mut names = config.naming.allocator();
    let mut produced: HashSet<String> = HashSet::new();
    let mut reports = Vec::with_capacity(pairs.len());
    info!("Staging {} restraint triplet(s).", pairs.len());

    for (i, (triplet, posres_name)) in pairs.into_iter().enumerate() {
        let report = stage_triplet(
            index,
            triplet,
            posres_name,
            config,
            topology_dir,
            &dir_files,
            &mut names,
            &mut produced,
            &mut staged,
        )
        .map_err(|e| e.in_triplet(i, triplet))?;
        reports.push(report);
    }
    settle_topology_lines(&staged.topology, &mut reports);

    staged.commit(topology_path)?;
    info!(
        restraint_files = staged.restraint_files.len(),
        chain_files = staged.chain_files.len(),
        topology_modified = staged.topology_modified,
        "Restraint edits committed."
    );
    Ok(RestraintReport {
        topology: topology_path.to_path_buf(),
        triplets: reports,
        topology_modified: staged.topology_modified,
    })
}

struct StagedEdits {
    topology: TopologyDocument,
    topology_modified: bool,
    chain_files: BTreeMap<PathBuf, TopologyDocument>,
    restraint_files: Vec<(PathBuf, PositionRestraints)>,
}

impl StagedEdits {
    fn chain_file(&mut self, path: &Path) -> Result<&mut TopologyDocument, EngineError> {
        match self.chain_files.entry(path.to_path_buf()) {
            Entry::Occupied(entry) => Ok(entry.into_mut()),
            Entry::Vacant(entry) => {
                let document = TopFile::read_from_path(path).map_err(EngineError::io(path))?;
                Ok(entry.insert(document))
            }
        }
    }

    fn commit(&self, topology_path: &Path) -> Result<(), EngineError> {
        for (path, restraints) in &self.restraint_files {
            PosresFile::write_to_path(restraints, path).map_err(|source| {
                EngineError::RestraintFile {
                    path: path.clone(),
                    source,
                }
            })?;
        }
        for (path, document) in &self.chain_files {
            TopFile::write_to_path(document, path).map_err(EngineError::io(path))?;
        }
        if self.topology_modified {
            TopFile::write_to_path(&self.topology, topology_path)
                .map_err(EngineError::io(topology_path))?;
        }
        Ok(())
    }
}

#[allow(clippy::too_many_arguments)]
fn stage_triplet(
    index: &IndexFile,
    triplet: &RestraintTriplet,
    posres_name: &str,
    config: &RestraintConfig,
    topology_dir: &Path,
    dir_files: &[String],
    names: &mut NameAllocator<'_>,
    produced: &mut HashSet<String>,
    staged: &mut StagedEdits,
) -> Result<TripletReport, EngineError> {
    let reference = resolve_group(index, &triplet.reference)?;
    let restrain = resolve_group(index, &triplet.restrain)?;
    let local_indices = renumber(reference, restrain)?;

    let file_name = names.claim(&format!("{}_posre.itp", triplet.restrain));
    let restraint_path = topology_dir.join(&file_name);
    staged.restraint_files.push((
        restraint_path.clone(),
        PositionRestraints::from_local_indices(&local_indices, config.force_constants),
    ));
    produced.insert(file_name.clone());

    let chain_files: Vec<PathBuf> = dir_files
        .iter()
        .filter(|name| !produced.contains(*name))
        .filter(|name| markers::is_chain_include_file_name(name, &triplet.chain))
        .map(|name| topology_dir.join(name))
        .collect();

    let placement = if chain_files.is_empty() {
        let block = staged
            .topology
            .chain_moleculetype_block(&triplet.chain)
            .ok_or_else(|| EngineError::ChainNotFound {
                chain: triplet.chain.clone(),
                molecule: markers::chain_molecule_name(&triplet.chain),
            })?;
        let line = block.insertion_point();
        staged.topology.insert_before(
            line,
            std::iter::once(String::new()).chain(include_block(posres_name, &file_name)),
        );
        staged.topology_modified = true;
        debug!(chain = %triplet.chain, line, "Inserted restraint include into main topology.");
        RestraintPlacement::MainTopology { line }
    } else {
        for path in &chain_files {
            let document = staged.chain_file(path)?;
            document.append(
                std::iter::once(String::new())
                    .chain(include_block(posres_name, &file_name))
                    .chain(std::iter::once(String::new())),
            );
        }
        debug!(chain = %triplet.chain, files = chain_files.len(), "Appended restraint include to chain topologies.");
        RestraintPlacement::ChainFiles(chain_files)
    };

    Ok(TripletReport {
        triplet: triplet.clone(),
        posres_name: posres_name.to_string(),
        restraint_file: restraint_path,
        restrained_atoms: local_indices.len(),
        placement,
    })
}

/// Points every main-topology placement at its block in the final document.
///
/// A later insertion above an earlier block shifts that block down, so the
/// line recorded at staging time can be stale.
fn settle_topology_lines(topology: &TopologyDocument, reports: &mut [TripletReport]) {
    for report in reports {
        let RestraintPlacement::MainTopology { line } = &mut report.placement else {
            continue;
        };
        let Some(file_name) = report.restraint_file.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        let include = format!("#include \"{}\"", file_name);
        // blank, comment and `#ifdef` precede the include
        if let Some(at) = topology.find(|l| l == include) {
            *line = at.saturating_sub(3);
        }
    }
}

fn resolve_group<'a>(index: &'a IndexFile, name: &str) -> Result<&'a AtomGroup, EngineError> {
    index.get(name).ok_or_else(|| EngineError::MissingGroup {
        name: group_key(name),
    })
}

/// Comment, `#ifdef`, `#include` and `#endif` lines guarding one restraint file.
fn include_block(posres_name: &str, file_name: &str) -> [String; 4] {
    [
        RESTRAINT_INCLUDE_COMMENT.to_string(),
        format!("#ifdef {}", posres_name),
        format!("#include \"{}\"", file_name),
        "#endif".to_string(),
    ]
}

/// Names of the regular files in `dir`, sorted.
fn list_file_names(dir: &Path) -> Result<Vec<String>, EngineError> {
    let mut names = Vec::new();
    for entry in fs::read_dir(dir).map_err(EngineError::io(dir))? {
        let entry = entry.map_err(EngineError::io(dir))?;
        let is_file = entry
            .file_type()
            .map_err(EngineError::io(entry.path()))?
            .is_file();
        if let (true, Some(name)) = (is_file, entry.file_name().to_str()) {
            names.push(name.to_string());
        }
    }
    names.sort();
    Ok(names)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::restraint::ForceConstants;
    use crate::engine::config::RestraintConfigBuilder;
    use crate::engine::error::ErrorCategory;
    use tempfile::tempdir;

    const INDEX: &str = "\
[ System ]
   1    2    3    4    5    6
[ Chain_A ]
   1    2    3
[ Core_A ]
   3
[ Chain_B ]
   4    5    6
[ Core_B ]
   5    6
";

    const MULTI_CHAIN_TOP: &str = "\
#include \"amber99sb-ildn.ff/forcefield.itp\"

; Include chain topologies
#include \"topol_Protein_chain_A.itp\"
#include \"topol_Protein_chain_B.itp\"

[ system ]
Protein

[ molecules ]
Protein_chain_A     1
Protein_chain_B     1
";

    const CHAIN_A_ITP: &str = "\
[ moleculetype ]
; Name            nrexcl
Protein_chain_A     3

[ atoms ]
     1         N3      1    MET      N      1     0.1592      14.01

; Include Position restraint file
#ifdef POSRES
#include \"posre_Protein_chain_A.itp\"
#endif
";

    const SINGLE_CHAIN_TOP: &str = "\
#include \"amber99sb-ildn.ff/forcefield.itp\"

[ moleculetype ]
; Name            nrexcl
Protein_chain_B     3

[ atoms ]
     1         N3      1    MET      N      1     0.1592      14.01
     2         H       1    MET     H1      2     0.1984      1.008

[system]
Protein

[molecules]
Protein_chain_B     1
";

    fn index() -> IndexFile {
        NdxFile::read_from_str(INDEX).unwrap()
    }

    fn config(triplets: &str) -> RestraintConfig {
        RestraintConfigBuilder::new()
            .triplets(RestraintTriplet::parse_list(triplets).unwrap())
            .build()
            .unwrap()
    }

    fn write(dir: &Path, name: &str, content: &str) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn multi_chain_appends_to_chain_file_and_leaves_topology_untouched() {
        let dir = tempdir().unwrap();
        let top = write(dir.path(), "topol.top", MULTI_CHAIN_TOP);
        let chain_a = write(dir.path(), "topol_Protein_chain_A.itp", CHAIN_A_ITP);
        write(dir.path(), "posre_Protein_chain_A.itp", "[ position_restraints ]\n");

        let report = run(&index(), &top, &config("(Chain_A, Core_A, A)")).unwrap();

        assert!(!report.topology_modified);
        assert_eq!(fs::read_to_string(&top).unwrap(), MULTI_CHAIN_TOP);
        assert_eq!(
            report.triplets[0].placement,
            RestraintPlacement::ChainFiles(vec![chain_a.clone()])
        );

        let chain_text = fs::read_to_string(&chain_a).unwrap();
        let expected_tail = "#endif\n\n; Include Position restraint file\n#ifdef CUSTOM_POSRES\n#include \"Core_A_posre.itp\"\n#endif\n\n";
        assert!(chain_text.starts_with(CHAIN_A_ITP));
        assert!(chain_text.ends_with(expected_tail));
    }

    #[test]
    fn restraint_file_lists_local_indices_with_force_constants() {
        let dir = tempdir().unwrap();
        let top = write(dir.path(), "topol.top", MULTI_CHAIN_TOP);
        write(dir.path(), "topol_Protein_chain_B.itp", "[ moleculetype ]\nProtein_chain_B 3\n");

        let mut cfg = config("(Chain_B, Core_B, B)");
        cfg.force_constants = ForceConstants::new(1000.0, 1000.0, 1000.0);
        let report = run(&index(), &top, &cfg).unwrap();

        let restraint = fs::read_to_string(&report.triplets[0].restraint_file).unwrap();
        assert_eq!(
            restraint,
            "[ position_restraints ]\n\
             ; atom  type      fx      fy      fz\n\
             2     1  1000 1000 1000\n\
             3     1  1000 1000 1000\n"
        );
        assert_eq!(report.triplets[0].restrained_atoms, 2);
    }

    #[test]
    fn single_chain_inserts_between_block_and_system() {
        let dir = tempdir().unwrap();
        let top = write(dir.path(), "topol.top", SINGLE_CHAIN_TOP);

        let report = run(&index(), &top, &config("(Chain_B, Core_B, B)")).unwrap();
        assert!(report.topology_modified);

        let document = TopFile::read_from_path(&top).unwrap();
        let marker = document.find(|l| l.starts_with("Protein_chain_B     3")).unwrap();
        let ifdef = document.find(|l| l == "#ifdef CUSTOM_POSRES").unwrap();
        let system = document.find(|l| l == "[system]").unwrap();

        assert!(ifdef > marker + 3);
        assert!(ifdef < system);
        assert_eq!(document.line(ifdef + 1), Some("#include \"Core_B_posre.itp\""));
        assert_eq!(document.line(ifdef + 2), Some("#endif"));
        let atoms_last = document.find(|l| l.contains("MET     H1")).unwrap();
        assert!(ifdef > atoms_last);
        assert_eq!(
            report.triplets[0].placement,
            RestraintPlacement::MainTopology { line: ifdef - 2 }
        );
    }

    #[test]
    fn missing_chain_is_a_value_error_and_writes_nothing() {
        let dir = tempdir().unwrap();
        let top = write(dir.path(), "topol.top", SINGLE_CHAIN_TOP);

        let err = run(
            &index(),
            &top,
            &config("(Chain_B, Core_B, B), (Chain_A, Core_A, A)"),
        )
        .unwrap_err();

        assert_eq!(err.category(), ErrorCategory::Value);
        assert!(matches!(err, EngineError::Triplet { index: 1, .. }));
        assert_eq!(fs::read_to_string(&top).unwrap(), SINGLE_CHAIN_TOP);
        assert!(!dir.path().join("Core_B_posre.itp").exists());
    }

    #[test]
    fn later_triplets_see_earlier_insertions() {
        let dir = tempdir().unwrap();
        let top = write(dir.path(), "topol.top", SINGLE_CHAIN_TOP);
        let mut cfg = config("(Chain_B, Core_B, B), (Chain_B, Chain_B, B)");
        cfg.posres_names = Some(vec!["POSRES_CORE".into(), "POSRES_ALL".into()]);

        let report = run(&index(), &top, &cfg).unwrap();

        let document = TopFile::read_from_path(&top).unwrap();
        let core = document.find(|l| l == "#ifdef POSRES_CORE").unwrap();
        let all = document.find(|l| l == "#ifdef POSRES_ALL").unwrap();
        let system = document.find(|l| l == "[system]").unwrap();
        assert!(core < system && all < system);
        assert_eq!(document.line(core + 1), Some("#include \"Core_B_posre.itp\""));
        assert_eq!(document.line(all + 1), Some("#include \"Chain_B_posre.itp\""));
        assert_eq!(document.line(all + 2), Some("#endif"));

        // the second block lands above the first; both reports see the final layout
        assert!(all < core);
        for (triplet, ifdef) in report.triplets.iter().zip([core, all]) {
            let RestraintPlacement::MainTopology { line } = triplet.placement else {
                panic!("expected a main topology placement");
            };
            assert_eq!(line, ifdef - 2);
            assert_eq!(document.line(line), Some(""));
            assert_eq!(document.line(line + 1), Some(RESTRAINT_INCLUDE_COMMENT));
        }
    }

    #[test]
    fn repeated_restrain_group_gets_distinct_files() {
        let dir = tempdir().unwrap();
        let top = write(dir.path(), "topol.top", MULTI_CHAIN_TOP);
        write(dir.path(), "topol_Protein_chain_A.itp", CHAIN_A_ITP);
        write(dir.path(), "topol_Protein_chain_B.itp", "[ moleculetype ]\nProtein_chain_B 3\n");

        let report = run(&index(), &top, &config("(System, Core_A, A), (System, Core_A, B)")).unwrap();
        let files: Vec<_> = report
            .triplets
            .iter()
            .map(|t| t.restraint_file.file_name().unwrap().to_owned())
            .collect();
        assert_eq!(files, vec!["Core_A_posre.itp", "Core_A_posre_2.itp"]);
    }

    #[test]
    fn subset_violation_is_a_consistency_error() {
        let dir = tempdir().unwrap();
        let top = write(dir.path(), "topol.top", SINGLE_CHAIN_TOP);
        let err = run(&index(), &top, &config("(Chain_A, Core_B, B)")).unwrap_err();
        assert_eq!(err.category(), ErrorCategory::Consistency);
    }

    #[test]
    fn unknown_group_is_a_format_error() {
        let dir = tempdir().unwrap();
        let top = write(dir.path(), "topol.top", SINGLE_CHAIN_TOP);
        let err = run(&index(), &top, &config("(Chain_Z, Core_B, B)")).unwrap_err();
        assert_eq!(err.category(), ErrorCategory::Format);
        assert!(err.to_string().contains("[ Chain_Z ]"));
    }

    #[test]
    fn mismatched_posres_names_fail_before_any_work() {
        let dir = tempdir().unwrap();
        let top = write(dir.path(), "topol.top", SINGLE_CHAIN_TOP);
        let mut cfg = config("(Chain_B, Core_B, B)");
        cfg.posres_names = Some(vec!["A".into(), "B".into()]);
        let err = run(&index(), &top, &cfg).unwrap_err();
        assert!(matches!(err, EngineError::PosresNameCountMismatch { .. }));
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn load_index_reports_malformed_and_missing_files() {
        let dir = tempdir().unwrap();
        let good = write(dir.path(), "index.ndx", INDEX);
        assert_eq!(load_index(&good).unwrap().len(), 5);

        let bad = write(dir.path(), "bad.ndx", "1 2 3\n[ A ]\n4\n");
        let err = load_index(&bad).unwrap_err();
        assert_eq!(err.category(), ErrorCategory::Format);
        assert!(matches!(err, EngineError::Index { .. }));

        let err = load_index(&dir.path().join("absent.ndx")).unwrap_err();
        assert_eq!(err.category(), ErrorCategory::Io);
    }

    #[test]
    fn find_topology_file_requires_exactly_one_top() {
        let dir = tempdir().unwrap();
        assert!(matches!(
            find_topology_file(dir.path()),
            Err(EngineError::TopologyFileNotFound { found: 0, .. })
        ));
        let top = write(dir.path(), "topol.top", SINGLE_CHAIN_TOP);
        write(dir.path(), "topol_Protein_chain_A.itp", CHAIN_A_ITP);
        assert_eq!(find_topology_file(dir.path()).unwrap(), top);
        write(dir.path(), "other.top", "");
        assert!(find_topology_file(dir.path()).is_err());
    }

    #[test]
    fn generate_resolves_topology_inside_directory() {
        let dir = tempdir().unwrap();
        write(dir.path(), "topol.top", SINGLE_CHAIN_TOP);
        let report = generate(&index(), dir.path(), &config("(Chain_B, Core_B, B)")).unwrap();
        assert_eq!(report.topology, dir.path().join("topol.top"));
        assert!(dir.path().join("Core_B_posre.itp").exists());
    }
}
