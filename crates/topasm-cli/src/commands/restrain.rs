use crate::cli::RestrainArgs;
use crate::config::builder::build_restrain_config;
use crate::error::Result;
use topasm::workflows::restrain::{self, RestraintPlacement};
use tracing::{debug, info};

pub fn run(args: RestrainArgs) -> Result<()> {
    info!("Building restraint configuration...");
    let app = build_restrain_config(&args)?;
    debug!("Restraint configuration: {:?}", &app.core_config);

    info!("Loading index groups from {:?}", &app.index_path);
    let index = restrain::load_index(&app.index_path)?;
    info!("Read {} index group(s).", index.len());

    let report = if app.topology_path.is_dir() {
        restrain::generate(&index, &app.topology_path, &app.core_config)?
    } else {
        restrain::run(&index, &app.topology_path, &app.core_config)?
    };

    for (i, triplet) in report.triplets.iter().enumerate() {
        info!(
            "Triplet #{} {}: {} restrained atom(s) under #ifdef {}",
            i, triplet.triplet, triplet.restrained_atoms, triplet.posres_name
        );
        println!("✓ Restraint file written to: {}", triplet.restraint_file.display());
        match &triplet.placement {
            RestraintPlacement::ChainFiles(files) => {
                for file in files {
                    println!("  Included from chain topology: {}", file.display());
                }
            }
            RestraintPlacement::MainTopology { line } => {
                println!(
                    "  Included from {} at line {}",
                    report.topology.display(),
                    line + 1
                );
            }
        }
    }

    if !report.topology_modified {
        debug!("Main topology {:?} left unchanged.", &report.topology);
    }
    Ok(())
}
