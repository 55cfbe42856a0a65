use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    author = "Tony Kan",
    version,
    about = "topasm CLI - Assemble GROMACS topologies: custom position restraints from index groups and ligand merging.",
    help_template = HELP_TEMPLATE,
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity level (-v for INFO, -vv for DEBUG, -vvv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output except for errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Write logs to a specified file in addition to the console output
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Write position restraint files for index groups and include them in the topology.
    Restrain(RestrainArgs),
    /// Merge a ligand ITP (and optional restraint file) into a system topology.
    Ligand(LigandArgs),
}

/// Arguments for the `restrain` subcommand.
#[derive(Args, Debug)]
pub struct RestrainArgs {
    /// Path to the GROMACS index file (.ndx).
    #[arg(short, long, required = true, value_name = "PATH")]
    pub index: PathBuf,

    /// Topology directory, or the main .top file inside it.
    #[arg(short, long, required = true, value_name = "PATH")]
    pub topology: PathBuf,

    /// Restraint triplets, e.g. "(Chain_A, Chain_A_noMut, A), (Chain_B, Chain_B_noMut, B)".
    #[arg(long, value_name = "TRIPLETS")]
    pub triplets: Option<String>,

    /// One #ifdef name per triplet, in order. Defaults to CUSTOM_POSRES for all.
    #[arg(short = 'n', long, value_name = "NAME", num_args(1..))]
    pub posres_names: Option<Vec<String>>,

    /// Force constants "fx fy fz" in kJ mol^-1 nm^-2.
    #[arg(short = 'k', long, value_name = "\"FX FY FZ\"")]
    pub force_constants: Option<String>,

    /// Path to a configuration file in TOML format.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Set a specific configuration value, overriding the config file.
    /// Can be used multiple times. Example: -S output.prefix=run1
    #[arg(short = 'S', long = "set", value_name = "KEY=VALUE", num_args(0..))]
    pub set_values: Vec<String>,
}

/// Arguments for the `ligand` subcommand.
#[derive(Args, Debug)]
pub struct LigandArgs {
    /// Path to the system topology (.top).
    #[arg(short, long, required = true, value_name = "PATH")]
    pub topology: PathBuf,

    /// Path to the ligand ITP file.
    #[arg(short, long, required = true, value_name = "PATH")]
    pub ligand: PathBuf,

    /// Path to the ligand position restraint ITP file.
    #[arg(short, long, value_name = "PATH")]
    pub posres: Option<PathBuf>,

    /// Name used in the #ifdef guarding the ligand restraints.
    #[arg(short = 'n', long, value_name = "NAME")]
    pub posres_name: Option<String>,

    /// File name of the merged topology, written next to the input topology.
    #[arg(short, long, value_name = "NAME")]
    pub output_name: Option<String>,

    /// Path to a configuration file in TOML format.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Set a specific configuration value, overriding the config file.
    /// Can be used multiple times. Example: -S ligand.posres-name=POSRES_LIG
    #[arg(short = 'S', long = "set", value_name = "KEY=VALUE", num_args(0..))]
    pub set_values: Vec<String>,
}
