// First-run seeding of a binary's config file from the copy it ships in
// `defaults/`.

use std::io;
use std::path::{Path, PathBuf};

/// Copy `defaults/<name>` to `config/<name>` under `base_dir` when the config
/// file does not exist yet. Returns the path written, or `None` when the
/// user's file was already there. An existing file is never touched.
pub fn seed_config_file(base_dir: &Path, name: &str) -> io::Result<Option<PathBuf>> {
    let target = base_dir.join("config").join(name);
    if target.is_file() {
        return Ok(None);
    }

    let shipped = std::fs::read(base_dir.join("defaults").join(name))?;
    std::fs::create_dir_all(base_dir.join("config"))?;
    std::fs::write(&target, shipped)?;
    Ok(Some(target))
}
