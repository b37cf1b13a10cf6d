pub mod history;
pub mod play;
pub mod regions;
pub mod settings;

use std::path::{Path, PathBuf};

use gq_core::{FileStore, RegionPool};

/// Open the file store under `--data-dir`, or the platform data directory.
fn open_store(data_dir: Option<&Path>) -> Result<FileStore, String> {
    let dir: PathBuf = match data_dir {
        Some(dir) => dir.to_path_buf(),
        None => dirs::data_dir()
            .ok_or("no data directory on this platform; pass --data-dir")?
            .join("geoquiz"),
    };
    FileStore::open(dir.clone()).map_err(|e| format!("cannot open {}: {e}", dir.display()))
}

fn load_pool() -> Result<RegionPool, String> {
    RegionPool::builtin().map_err(|e| e.to_string())
}
