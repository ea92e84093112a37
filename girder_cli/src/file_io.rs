//! # Study File I/O
//!
//! Study files (`.girder`) are pretty-printed JSON.
//!
//! - **Atomic saves**: write to `<file>.tmp`, sync, re-read and parse the
//!   temp file, then rename over the target
//! - **Version validation**: refuse files written by an incompatible schema

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use girder_core::errors::CalcError;
use girder_core::study::{Study, SCHEMA_VERSION};

use crate::errors::{CliError, CliResult};

/// Temp file used while saving `path`
fn tmp_path_for(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".tmp");
    PathBuf::from(name)
}

/// Save a study with atomic write semantics.
///
/// The save process:
/// 1. Serialize the study to JSON
/// 2. Write to `<path>.tmp` and fsync
/// 3. Read the temp file back and parse it
/// 4. Rename the temp file over `path`
pub fn save_study(study: &Study, path: &Path) -> CliResult<()> {
    let json = serde_json::to_string_pretty(study).map_err(CalcError::from)?;
    let tmp_path = tmp_path_for(path);
    let tmp_display = tmp_path.display().to_string();

    let mut tmp_file = File::create(&tmp_path)
        .map_err(|e| CliError::file_error("create temp file", &tmp_display, e.to_string()))?;
    tmp_file
        .write_all(json.as_bytes())
        .map_err(|e| CliError::file_error("write temp file", &tmp_display, e.to_string()))?;
    tmp_file
        .sync_all()
        .map_err(|e| CliError::file_error("sync temp file", &tmp_display, e.to_string()))?;
    drop(tmp_file);

    let verify = fs::read_to_string(&tmp_path)
        .map_err(|e| CliError::file_error("verify temp file", &tmp_display, e.to_string()))
        .and_then(|written| {
            serde_json::from_str::<Study>(&written)
                .map(|_| ())
                .map_err(|e| CliError::from(CalcError::from(e)))
        });
    if let Err(err) = verify {
        let _ = fs::remove_file(&tmp_path);
        return Err(err);
    }

    fs::rename(&tmp_path, path).map_err(|e| {
        let _ = fs::remove_file(&tmp_path);
        CliError::file_error("rename to final", path.display().to_string(), e.to_string())
    })?;

    log::debug!("Saved study to {}", path.display());
    Ok(())
}

/// Load a study and check its schema version.
pub fn load_study(path: &Path) -> CliResult<Study> {
    let contents = fs::read_to_string(path)
        .map_err(|e| CliError::file_error("read", path.display().to_string(), e.to_string()))?;

    let study: Study =
        serde_json::from_str(&contents).map_err(|e| CalcError::SerializationError {
            reason: format!("Invalid study in {}: {}", path.display(), e),
        })?;

    validate_version(&study.meta.schema_version)?;
    log::debug!("Loaded study '{}' from {}", study.meta.title, path.display());
    Ok(study)
}

/// Major versions must match; for 0.x the file's minor version cannot be
/// newer than ours.
fn validate_version(file_version: &str) -> Result<(), CalcError> {
    let parse = |v: &str| -> Vec<u32> { v.split('.').filter_map(|p| p.parse().ok()).collect() };
    let file_parts = parse(file_version);
    let current_parts = parse(SCHEMA_VERSION);

    let mismatch = || CalcError::VersionMismatch {
        file_version: file_version.to_string(),
        expected_version: SCHEMA_VERSION.to_string(),
    };

    match (file_parts.as_slice(), current_parts.as_slice()) {
        ([file_major, ..], [major, ..]) if file_major != major => Err(mismatch()),
        ([0, file_minor, ..], [0, minor, ..]) if file_minor > minor => Err(mismatch()),
        ([_, ..], [_, ..]) => Ok(()),
        _ => Err(mismatch()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env::temp_dir;

    fn temp_study_path(name: &str) -> PathBuf {
        temp_dir().join(format!("girder_test_{}_{}.girder", name, std::process::id()))
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let path = temp_study_path("roundtrip");
        let mut study = Study::new("Test Author", "Roundtrip");
        study.bridge.diaphragm_spacing_mm = Some(300.0);

        save_study(&study, &path).unwrap();
        let loaded = load_study(&path).unwrap();
        assert_eq!(loaded, study);

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_atomic_save_leaves_no_tmp_file() {
        let path = temp_study_path("atomic");
        save_study(&Study::new("Test", "Atomic"), &path).unwrap();

        assert!(path.exists());
        assert!(!tmp_path_for(&path).exists());

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_load_rejects_garbage_and_newer_schema() {
        let path = temp_study_path("garbage");
        fs::write(&path, "{ not json").unwrap();
        assert_eq!(load_study(&path).unwrap_err().error_code(), "SERIALIZATION_ERROR");

        let mut study = Study::new("Test", "Future");
        study.meta.schema_version = "0.9.0".to_string();
        fs::write(&path, serde_json::to_string(&study).unwrap()).unwrap();
        assert_eq!(load_study(&path).unwrap_err().error_code(), "VERSION_MISMATCH");

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_missing_file() {
        let err = load_study(&temp_study_path("missing")).unwrap_err();
        assert_eq!(err.error_code(), "FILE_ERROR");
    }

    #[test]
    fn test_version_validation() {
        assert!(validate_version(SCHEMA_VERSION).is_ok());
        assert!(validate_version("0.1.7").is_ok());
        assert!(validate_version("0.0.1").is_ok());
        assert!(validate_version("1.0.0").is_err());
        assert!(validate_version("0.2.0").is_err());
        assert!(validate_version("garbage").is_err());
    }
}
