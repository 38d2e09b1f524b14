// Export and import of the participant collection as a standalone JSON file.
//
// The file has the same shape as the persisted state: a JSON array of
// participants with their cached stats inlined.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde_json::Value;
use thiserror::Error;

use crate::model::{Participant, MAX_PICKS};
use crate::season::Season;

#[derive(Debug, Error)]
pub enum ImportError {
    #[error("could not read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("file is not valid JSON: {0}")]
    Syntax(serde_json::Error),

    #[error("file does not contain a participant list")]
    NotAList,

    #[error("participant list is malformed: {0}")]
    Malformed(serde_json::Error),

    #[error("participant list is invalid: {0}")]
    Invalid(String),
}

/// File name for an export of `season`, e.g. `nhl-pool-20242025.json`.
pub fn export_file_name(season: &Season) -> String {
    format!("nhl-pool-{season}.json")
}

/// Serialize the collection for export.
pub fn export_json(participants: &[Participant]) -> serde_json::Result<String> {
    serde_json::to_string_pretty(participants)
}

/// Write an export of `participants` into `dir`. Returns the written path.
pub fn write_export(
    dir: &Path,
    season: &Season,
    participants: &[Participant],
) -> anyhow::Result<PathBuf> {
    use anyhow::Context;

    let json = export_json(participants).context("failed to serialize participants")?;
    std::fs::create_dir_all(dir)
        .with_context(|| format!("failed to create {}", dir.display()))?;
    let path = dir.join(export_file_name(season));
    std::fs::write(&path, json).with_context(|| format!("failed to write {}", path.display()))?;
    Ok(path)
}

/// Parse an exported collection.
///
/// Nothing is returned unless the whole file is acceptable, so callers can
/// replace their state wholesale or not at all.
pub fn import_json(text: &str) -> Result<Vec<Participant>, ImportError> {
    let value: Value = serde_json::from_str(text).map_err(ImportError::Syntax)?;
    if !value.is_array() {
        return Err(ImportError::NotAList);
    }
    let participants: Vec<Participant> =
        serde_json::from_value(value).map_err(ImportError::Malformed)?;
    validate(&participants)?;
    Ok(participants)
}

/// Read and parse an export file from disk.
pub fn read_import(path: &Path) -> Result<Vec<Participant>, ImportError> {
    let text = std::fs::read_to_string(path).map_err(|source| ImportError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    import_json(&text)
}

fn validate(participants: &[Participant]) -> Result<(), ImportError> {
    let mut names = HashSet::new();
    let mut ids = HashSet::new();
    for p in participants {
        if p.name.trim().is_empty() {
            return Err(ImportError::Invalid("participant with an empty name".into()));
        }
        if !names.insert(p.name.to_lowercase()) {
            return Err(ImportError::Invalid(format!("duplicate participant `{}`", p.name)));
        }
        if !ids.insert(p.id.as_str()) {
            return Err(ImportError::Invalid(format!("duplicate participant id `{}`", p.id)));
        }
        if p.picks.len() > MAX_PICKS {
            return Err(ImportError::Invalid(format!(
                "`{}` has {} players (max {MAX_PICKS})",
                p.name,
                p.picks.len()
            )));
        }
        let mut pick_ids = HashSet::new();
        if let Some(dup) = p.picks.iter().find(|pick| !pick_ids.insert(pick.id)) {
            return Err(ImportError::Invalid(format!(
                "`{}` lists player {} twice",
                p.name, dup.id
            )));
        }
    }
    Ok(())
}
