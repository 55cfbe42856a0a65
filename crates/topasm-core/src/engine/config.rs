use super::error::EngineError;
use super::naming::OutputNamer;
use crate::core::models::restraint::{ForceConstants, RestraintTriplet};
use thiserror::Error;

/// `#ifdef` name shared by every restraint when no names are supplied.
pub const DEFAULT_POSRES_NAME: &str = "CUSTOM_POSRES";
pub const DEFAULT_LIGAND_POSRES_NAME: &str = "POSRES_LIGAND";
pub const DEFAULT_LIGAND_TOPOLOGY_NAME: &str = "ligand.top";

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum ConfigError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),
}

#[derive(Debug, Clone, PartialEq)]
pub struct RestraintConfig {
    pub triplets: Vec<RestraintTriplet>,
    /// One `#ifdef` name per triplet, paired by position.
    pub posres_names: Option<Vec<String>>,
    pub force_constants: ForceConstants,
    pub naming: OutputNamer,
}

impl RestraintConfig {
    /// Pairs every triplet with the `#ifdef` name guarding its include.
    ///
    /// # Errors
    ///
    /// [`EngineError::NoTriplets`] for an empty triplet list and
    /// [`EngineError::PosresNameCountMismatch`] when explicit names do not
    /// match the triplets one-to-one.
    pub fn paired_triplets(&self) -> Result<Vec<(&RestraintTriplet, &str)>, EngineError> {
        if self.triplets.is_empty() {
            return Err(EngineError::NoTriplets);
        }
        match &self.posres_names {
            Some(names) if names.len() != self.triplets.len() => {
                Err(EngineError::PosresNameCountMismatch {
                    names: names.len(),
                    triplets: self.triplets.len(),
                })
            }
            Some(names) => Ok(self
                .triplets
                .iter()
                .zip(names.iter().map(String::as_str))
                .collect()),
            None => Ok(self
                .triplets
                .iter()
                .map(|triplet| (triplet, DEFAULT_POSRES_NAME))
                .collect()),
        }
    }
}

#[derive(Default)]
pub struct RestraintConfigBuilder {
    triplets: Option<Vec<RestraintTriplet>>,
    posres_names: Option<Vec<String>>,
    force_constants: Option<ForceConstants>,
    naming: Option<OutputNamer>,
}

impl RestraintConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn triplets(mut self, triplets: Vec<RestraintTriplet>) -> Self {
        self.triplets = Some(triplets);
        self
    }
    pub fn posres_names(mut self, names: Option<Vec<String>>) -> Self {
        self.posres_names = names;
        self
    }
    pub fn force_constants(mut self, force_constants: ForceConstants) -> Self {
        self.force_constants = Some(force_constants);
        self
    }
    pub fn naming(mut self, naming: OutputNamer) -> Self {
        self.naming = Some(naming);
        self
    }

    pub fn build(self) -> Result<RestraintConfig, ConfigError> {
        Ok(RestraintConfig {
            triplets: self
                .triplets
                .ok_or(ConfigError::MissingParameter("triplets"))?,
            posres_names: self.posres_names,
            force_constants: self.force_constants.unwrap_or_default(),
            naming: self.naming.unwrap_or_default(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LigandConfig {
    /// `#ifdef` name guarding the ligand's restraint include.
    pub posres_name: String,
    /// File name of the merged topology, before prefix/step decoration.
    pub output_name: String,
    pub naming: OutputNamer,
}

impl Default for LigandConfig {
    fn default() -> Self {
        Self {
            posres_name: DEFAULT_LIGAND_POSRES_NAME.to_string(),
            output_name: DEFAULT_LIGAND_TOPOLOGY_NAME.to_string(),
            naming: OutputNamer::default(),
        }
    }
}

#[derive(Default)]
pub struct LigandConfigBuilder {
    posres_name: Option<String>,
    output_name: Option<String>,
    naming: Option<OutputNamer>,
}

impl LigandConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn posres_name(mut self, name: impl Into<String>) -> Self {
        self.posres_name = Some(name.into());
        self
    }
    pub fn output_name(mut self, name: impl Into<String>) -> Self {
        self.output_name = Some(name.into());
        self
    }
    pub fn naming(mut self, naming: OutputNamer) -> Self {
        self.naming = Some(naming);
        self
    }

    pub fn build(self) -> LigandConfig {
        let defaults = LigandConfig::default();
        LigandConfig {
            posres_name: self.posres_name.unwrap_or(defaults.posres_name),
            output_name: self.output_name.unwrap_or(defaults.output_name),
            naming: self.naming.unwrap_or(defaults.naming),
        }
    }
}
