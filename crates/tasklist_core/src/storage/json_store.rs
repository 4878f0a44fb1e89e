use crate::error::AppError;
use crate::model::Task;
use std::path::{Path, PathBuf};

const STORE_FILE_NAME: &str = "tasks.json";

pub fn store_path() -> Result<PathBuf, AppError> {
    if let Ok(path) = std::env::var("TASKLIST_STORE_PATH")
        && !path.trim().is_empty()
    {
        return Ok(PathBuf::from(path));
    }

    if cfg!(windows) {
        let appdata =
            std::env::var("APPDATA").map_err(|_| AppError::invalid_data("APPDATA is not set"))?;
        Ok(PathBuf::from(appdata)
            .join("tasklist")
            .join(STORE_FILE_NAME))
    } else {
        let home = std::env::var("HOME").map_err(|_| AppError::invalid_data("HOME is not set"))?;
        Ok(PathBuf::from(home)
            .join(".config")
            .join("tasklist")
            .join(STORE_FILE_NAME))
    }
}

/// Reads the stored task list. `Ok(None)` means the store file does not
/// exist yet (first run), which is distinct from an empty list.
pub fn load_tasks(path: &Path) -> Result<Option<Vec<Task>>, AppError> {
    if !path.exists() {
        return Ok(None);
    }

    let content = std::fs::read_to_string(path).map_err(|err| AppError::io(err.to_string()))?;
    let tasks: Vec<Task> =
        serde_json::from_str(&content).map_err(|err| AppError::invalid_data(err.to_string()))?;

    Ok(Some(tasks))
}

/// Writes the full task list, overwriting any prior value. The stored value
/// is a bare JSON array of `{id, text, status}` objects.
pub fn save_tasks(path: &Path, tasks: &[Task]) -> Result<(), AppError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|err| AppError::io(err.to_string()))?;
    }

    let content = serde_json::to_string_pretty(tasks)
        .map_err(|err| AppError::invalid_data(err.to_string()))?;
    std::fs::write(path, content).map_err(|err| AppError::io(err.to_string()))?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let permissions = std::fs::Permissions::from_mode(0o600);
        std::fs::set_permissions(path, permissions).map_err(|err| AppError::io(err.to_string()))?;
    }

    Ok(())
}
