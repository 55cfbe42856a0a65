pub mod ligand;
pub mod restrain;
