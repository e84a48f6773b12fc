use std::path::PathBuf;

use clap::Parser;
use directories::ProjectDirs;

use crate::persist::SaveStore;

const LOG_FILE: &str = "soli.log";

/// Klondike solitaire in the terminal.
#[derive(Debug, Parser)]
#[command(name = "soli", version, about)]
pub struct Args {
    /// Deal a reproducible game from this seed
    #[arg(long)]
    pub seed: Option<u64>,

    /// Save file [default: soli-state.dat in the user data directory]
    #[arg(long, value_name = "PATH")]
    pub save_file: Option<PathBuf>,

    /// Log file; the filter comes from RUST_LOG [default: soli.log in the user data directory]
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

impl Args {
    /// Where saves go, if anywhere can be found.
    pub fn store(&self) -> Option<SaveStore> {
        self.save_file
            .clone()
            .or_else(SaveStore::default_path)
            .map(SaveStore::new)
    }

    pub fn log_path(&self) -> Option<PathBuf> {
        self.log_file.clone().or_else(|| {
            let proj_dirs = ProjectDirs::from("com", "soli", "soli")?;
            Some(proj_dirs.data_dir().join(LOG_FILE))
        })
    }
}
