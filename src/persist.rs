//! On-disk persistence of scan results.
//!
//! Layout contract: one timestamped directory per scan, one subdirectory
//! per discovered host, holding `<addr>_data.json` and, when a config was
//! captured, `<addr>_conf.xml` verbatim.

use crate::error::PersistError;
use crate::types::DeviceRecord;
use chrono::Local;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// Writer for one scan's result tree.
#[derive(Debug, Clone)]
pub struct ResultStore {
    dir: PathBuf,
}

impl ResultStore {
    /// Create the timestamped scan directory under `base`.
    pub fn create(base: &Path) -> Result<Self, PersistError> {
        let stamp = Local::now().format("%Y-%m-%d_%H-%M-%S").to_string();
        let dir = base.join(stamp);
        fs::create_dir_all(&dir).map_err(|err| PersistError::CreateDir {
            path: dir.clone(),
            reason: err.to_string(),
        })?;
        info!(dir = %dir.display(), "created result directory");
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Write one host's record (and raw config, if any) into its own
    /// subdirectory. Returns the host directory path.
    pub fn write_host(&self, record: &DeviceRecord) -> Result<PathBuf, PersistError> {
        let address = record.address();
        let host_dir = self.dir.join(address);
        fs::create_dir_all(&host_dir).map_err(|err| PersistError::CreateDir {
            path: host_dir.clone(),
            reason: err.to_string(),
        })?;

        if let Some(config) = &record.raw_config {
            let conf_path = host_dir.join(format!("{}_conf.xml", address));
            fs::write(&conf_path, config).map_err(|err| PersistError::WriteFile {
                path: conf_path,
                reason: err.to_string(),
            })?;
        }

        let data_path = host_dir.join(format!("{}_data.json", address));
        let json = serde_json::to_vec_pretty(record)?;
        fs::write(&data_path, json).map_err(|err| PersistError::WriteFile {
            path: data_path,
            reason: err.to_string(),
        })?;

        Ok(host_dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Scalar;

    #[test]
    fn test_host_layout() {
        let base = tempfile::tempdir().unwrap();
        let store = ResultStore::create(base.path()).unwrap();

        let mut record = DeviceRecord::with_fields("10.0.0.7", &["productname"]);
        record.set_info("productname", Scalar::from("RX8200"));
        record.raw_config = Some(b"<config>\n</config>".to_vec());

        let host_dir = store.write_host(&record).unwrap();
        assert_eq!(host_dir, store.dir().join("10.0.0.7"));

        let data = fs::read_to_string(host_dir.join("10.0.0.7_data.json")).unwrap();
        assert!(data.contains("\"RX8200\""));
        let conf = fs::read(host_dir.join("10.0.0.7_conf.xml")).unwrap();
        assert_eq!(conf, b"<config>\n</config>");
    }

    #[test]
    fn test_no_config_file_without_raw_config() {
        let base = tempfile::tempdir().unwrap();
        let store = ResultStore::create(base.path()).unwrap();

        let record = DeviceRecord::with_fields("10.0.0.8", &[]);
        let host_dir = store.write_host(&record).unwrap();

        assert!(host_dir.join("10.0.0.8_data.json").exists());
        assert!(!host_dir.join("10.0.0.8_conf.xml").exists());
    }

    #[test]
    fn test_scan_dir_is_timestamped() {
        let base = tempfile::tempdir().unwrap();
        let store = ResultStore::create(base.path()).unwrap();
        let name = store.dir().file_name().unwrap().to_string_lossy().into_owned();
        // YYYY-MM-DD_HH-MM-SS
        assert_eq!(name.len(), 19);
        assert_eq!(&name[4..5], "-");
        assert_eq!(&name[10..11], "_");
    }
}
