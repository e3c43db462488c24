use crate::codec::{self, ExportDocument};
use crate::error::AppError;
use crate::store::{TaskStore, local_today};
use std::path::{Path, PathBuf};

const STORE_FILE_NAME: &str = "tasks.json";

/// Resolves where the snapshot lives. `TODOCAL_STORE_PATH` wins, otherwise
/// the platform config directory.
pub fn store_path() -> Result<PathBuf, AppError> {
    if let Ok(path) = std::env::var("TODOCAL_STORE_PATH")
        && !path.trim().is_empty()
    {
        return Ok(PathBuf::from(path));
    }

    if cfg!(windows) {
        let appdata =
            std::env::var("APPDATA").map_err(|_| AppError::io("APPDATA is not set"))?;
        Ok(PathBuf::from(appdata).join("todocal").join(STORE_FILE_NAME))
    } else {
        let home = std::env::var("HOME").map_err(|_| AppError::io("HOME is not set"))?;
        Ok(PathBuf::from(home)
            .join(".config")
            .join("todocal")
            .join(STORE_FILE_NAME))
    }
}

/// Loads the snapshot. A missing file is an empty store; an unparseable one
/// fails as a unit with no partial state.
pub fn load_store(path: &Path) -> Result<TaskStore, AppError> {
    if !path.exists() {
        return Ok(TaskStore::new());
    }

    let content = std::fs::read_to_string(path).map_err(|err| AppError::io(err.to_string()))?;
    let document: ExportDocument = codec::parse_document(&content)?;

    let mut store = TaskStore::new();
    codec::import_document(&mut store, document)?;
    Ok(store)
}

pub fn save_store(path: &Path, store: &TaskStore) -> Result<(), AppError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|err| AppError::io(err.to_string()))?;
    }

    let content = codec::export_json(store, local_today())?;
    std::fs::write(path, content).map_err(|err| AppError::io(err.to_string()))?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let permissions = std::fs::Permissions::from_mode(0o600);
        std::fs::set_permissions(path, permissions).map_err(|err| AppError::io(err.to_string()))?;
    }

    Ok(())
}
