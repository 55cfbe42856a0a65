use super::defaults::DefaultsConfig;
use super::file::FileConfig;
use super::models::{LigandAppConfig, RestrainAppConfig};
use crate::cli::{LigandArgs, RestrainArgs};
use crate::error::{CliError, Result};
use std::path::Path;
use topasm::core::models::restraint::{ForceConstants, RestraintTriplet};
use topasm::engine::config::{LigandConfigBuilder, RestraintConfigBuilder};
use topasm::engine::error::EngineError;
use topasm::engine::naming::OutputNamer;

pub fn build_restrain_config(args: &RestrainArgs) -> Result<RestrainAppConfig> {
    let defaults = DefaultsConfig::default();
    let file_config = load_file_config(args.config.as_deref())?;
    let mut file_config = apply_set_values(file_config, &args.set_values)?;

    let restrain_file = file_config.restrain.take().unwrap_or_default();

    let triplets = match &args.triplets {
        Some(text) => parse_triplets(text)?,
        None => restrain_file.triplets.ok_or_else(|| {
            CliError::Config(
                "Restraint triplets are required, via --triplets or `restrain.triplets`."
                    .to_string(),
            )
        })?,
    };

    let force_constants = match &args.force_constants {
        Some(text) => parse_force_constants(text)?,
        None => restrain_file
            .force_constants
            .unwrap_or(defaults.force_constants),
    };

    let posres_names = args.posres_names.clone().or(restrain_file.posres_names);

    let core_config = RestraintConfigBuilder::new()
        .triplets(triplets)
        .posres_names(posres_names)
        .force_constants(force_constants)
        .naming(output_namer(&file_config))
        .build()
        .map_err(|e| CliError::Config(e.to_string()))?;

    Ok(RestrainAppConfig {
        index_path: args.index.clone(),
        topology_path: args.topology.clone(),
        core_config,
    })
}

pub fn build_ligand_config(args: &LigandArgs) -> Result<LigandAppConfig> {
    let defaults = DefaultsConfig::default();
    let file_config = load_file_config(args.config.as_deref())?;
    let mut file_config = apply_set_values(file_config, &args.set_values)?;

    let ligand_file = file_config.ligand.take().unwrap_or_default();

    let posres_name = args
        .posres_name
        .clone()
        .or(ligand_file.posres_name)
        .unwrap_or(defaults.ligand_posres_name);
    let output_name = args
        .output_name
        .clone()
        .or(ligand_file.output_name)
        .unwrap_or(defaults.ligand_output_name);

    let core_config = LigandConfigBuilder::new()
        .posres_name(posres_name)
        .output_name(output_name)
        .naming(output_namer(&file_config))
        .build();

    Ok(LigandAppConfig {
        topology_path: args.topology.clone(),
        ligand_path: args.ligand.clone(),
        posres_path: args.posres.clone(),
        core_config,
    })
}

fn load_file_config(path: Option<&Path>) -> Result<FileConfig> {
    match path {
        Some(path) => FileConfig::from_file(path),
        None => Ok(FileConfig::default()),
    }
}

fn output_namer(file_config: &FileConfig) -> OutputNamer {
    let output = file_config.output.clone().unwrap_or_default();
    OutputNamer::new(output.prefix, output.step)
}

fn parse_triplets(text: &str) -> Result<Vec<RestraintTriplet>> {
    let triplets = RestraintTriplet::parse_list(text).map_err(EngineError::from)?;
    Ok(triplets)
}

fn parse_force_constants(text: &str) -> Result<ForceConstants> {
    let force_constants = text.parse::<ForceConstants>().map_err(EngineError::from)?;
    Ok(force_constants)
}

fn apply_set_values(mut config: FileConfig, set_values: &[String]) -> Result<FileConfig> {
    if set_values.is_empty() {
        return Ok(config);
    }
    for kv_pair in set_values {
        let (key, value_str) = kv_pair.split_once('=').ok_or_else(|| {
            CliError::Config(format!(
                "Invalid --set format: '{}'. Expected KEY=VALUE.",
                kv_pair
            ))
        })?;

        match key {
            "restrain.triplets" => {
                config.restrain.get_or_insert_with(Default::default).triplets =
                    Some(parse_triplets(value_str)?);
            }
            "restrain.posres-names" => {
                config
                    .restrain
                    .get_or_insert_with(Default::default)
                    .posres_names =
                    Some(value_str.split_whitespace().map(str::to_string).collect());
            }
            "restrain.force-constants" => {
                config
                    .restrain
                    .get_or_insert_with(Default::default)
                    .force_constants = Some(parse_force_constants(value_str)?);
            }
            "ligand.posres-name" => {
                config.ligand.get_or_insert_with(Default::default).posres_name =
                    Some(value_str.to_string());
            }
            "ligand.output-name" => {
                config.ligand.get_or_insert_with(Default::default).output_name =
                    Some(value_str.to_string());
            }
            "output.prefix" => {
                config.output.get_or_insert_with(Default::default).prefix =
                    Some(value_str.to_string());
            }
            "output.step" => {
                config.output.get_or_insert_with(Default::default).step =
                    Some(value_str.to_string());
            }
            _ => {
                return Err(CliError::Config(format!(
                    "Unsupported configuration key for --set: '{}'",
                    key
                )));
            }
        }
    }
    Ok(config)
}
