use topasm::core::models::restraint::ForceConstants;
use topasm::engine::config::{
    DEFAULT_LIGAND_POSRES_NAME, DEFAULT_LIGAND_TOPOLOGY_NAME, DEFAULT_POSRES_NAME,
};

pub struct DefaultsConfig {
    pub posres_name: String,
    pub force_constants: ForceConstants,
    pub ligand_posres_name: String,
    pub ligand_output_name: String,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            posres_name: DEFAULT_POSRES_NAME.to_string(),
            force_constants: ForceConstants::default(),
            ligand_posres_name: DEFAULT_LIGAND_POSRES_NAME.to_string(),
            ligand_output_name: DEFAULT_LIGAND_TOPOLOGY_NAME.to_string(),
        }
    }
}
