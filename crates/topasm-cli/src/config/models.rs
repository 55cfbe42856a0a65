use std::path::PathBuf;
use topasm::engine::config::{LigandConfig, RestraintConfig};

pub struct RestrainAppConfig {
    pub index_path: PathBuf,
    pub topology_path: PathBuf,
    pub core_config: RestraintConfig,
}

pub struct LigandAppConfig {
    pub topology_path: PathBuf,
    pub ligand_path: PathBuf,
    pub posres_path: Option<PathBuf>,
    pub core_config: LigandConfig,
}
