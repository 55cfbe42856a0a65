use crate::cli::LigandArgs;
use crate::config::builder::build_ligand_config;
use crate::error::Result;
use topasm::workflows::ligand;
use tracing::{debug, info, warn};

pub fn run(args: LigandArgs) -> Result<()> {
    info!("Building ligand configuration...");
    let app = build_ligand_config(&args)?;
    debug!("Ligand configuration: {:?}", &app.core_config);

    info!(
        "Merging ligand {:?} into topology {:?}",
        &app.ligand_path, &app.topology_path
    );
    let report = ligand::merge_files(
        &app.topology_path,
        &app.ligand_path,
        app.posres_path.as_deref(),
        &app.core_config,
    )?;

    if !report.merged_atomtypes {
        warn!(
            "Ligand {:?} has no [ atomtypes ] section; only its include was added.",
            &app.ligand_path
        );
    }
    info!("Registered moleculetype '{}' in [ molecules ].", report.moleculetype);

    println!("✓ Merged topology written to: {}", report.topology.display());
    println!("  Ligand topology: {}", report.ligand.display());
    if let Some(posres) = &report.posres {
        println!(
            "  Ligand restraints: {} (#ifdef {})",
            posres.display(),
            app.core_config.posres_name
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CliError;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn merges_ligand_next_to_topology() {
        let dir = tempdir().unwrap();
        let topology = dir.path().join("topol.top");
        let ligand = dir.path().join("lig.itp");
        fs::write(
            &topology,
            "#include \"oplsaa.ff/forcefield.itp\"\n\n[ molecules ]\nProtein 1\n",
        )
        .unwrap();
        fs::write(&ligand, "[ moleculetype ]\nLIG 3\n").unwrap();

        let args = LigandArgs {
            topology,
            ligand,
            posres: None,
            posres_name: None,
            output_name: Some("complex.top".to_string()),
            config: None,
            set_values: vec![],
        };
        run(args).unwrap();

        let merged = fs::read_to_string(dir.path().join("complex.top")).unwrap();
        assert!(merged.ends_with("Protein 1\nLIG                 1\n"));
    }

    #[test]
    fn missing_forcefield_surfaces_core_error() {
        let dir = tempdir().unwrap();
        let topology = dir.path().join("topol.top");
        let ligand = dir.path().join("lig.itp");
        fs::write(&topology, "[ system ]\nX\n").unwrap();
        fs::write(&ligand, "[ moleculetype ]\nLIG 3\n").unwrap();

        let args = LigandArgs {
            topology,
            ligand,
            posres: None,
            posres_name: None,
            output_name: None,
            config: None,
            set_values: vec![],
        };
        assert!(matches!(run(args), Err(CliError::Core(_))));
    }
}
