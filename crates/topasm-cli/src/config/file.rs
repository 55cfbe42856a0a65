use crate::error::{CliError, Result};
use serde::Deserialize;
use std::path::Path;
use topasm::core::models::restraint::{ForceConstants, RestraintTriplet};
use tracing::debug;

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct FileRestrainConfig {
    pub triplets: Option<Vec<RestraintTriplet>>,
    pub posres_names: Option<Vec<String>>,
    pub force_constants: Option<ForceConstants>,
}

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct FileLigandConfig {
    pub posres_name: Option<String>,
    pub output_name: Option<String>,
}

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct FileOutputConfig {
    pub prefix: Option<String>,
    pub step: Option<String>,
}

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct FileConfig {
    pub restrain: Option<FileRestrainConfig>,
    pub ligand: Option<FileLigandConfig>,
    pub output: Option<FileOutputConfig>,
}

impl FileConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Loading configuration from file: {:?}", path);
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| CliError::FileParsing {
            path: path.to_path_buf(),
            source: e.into(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn full_file_deserializes() {
        let toml = r#"
            [restrain]
            posres-names = ["POSRES_A", "POSRES_B"]
            force-constants = [1000, 1000, 500]

            [[restrain.triplets]]
            reference = "Chain_A"
            restrain = "Chain_A_noMut"
            chain = "A"

            [[restrain.triplets]]
            reference = "Chain_B"
            restrain = "Chain_B_noMut"
            chain = "B"

            [ligand]
            posres-name = "POSRES_JZ4"
            output-name = "complex.top"

            [output]
            prefix = "run1"
            step = "step2"
            "#;
        let config: FileConfig = toml::from_str(toml).unwrap();

        let restrain = config.restrain.unwrap();
        let triplets = restrain.triplets.unwrap();
        assert_eq!(triplets[1], RestraintTriplet::new("Chain_B", "Chain_B_noMut", "B"));
        assert_eq!(
            restrain.force_constants,
            Some(ForceConstants::new(1000.0, 1000.0, 500.0))
        );
        assert_eq!(config.ligand.unwrap().output_name.as_deref(), Some("complex.top"));
        assert_eq!(config.output.unwrap().step.as_deref(), Some("step2"));
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[restrain]\nposres-name = \"X\"\n").unwrap();

        let result = FileConfig::from_file(&path);
        assert!(matches!(result, Err(CliError::FileParsing { .. })));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let dir = tempdir().unwrap();
        let result = FileConfig::from_file(&dir.path().join("absent.toml"));
        assert!(matches!(result, Err(CliError::Io(_))));
    }
}
