//! OSRM dataset preparation (download + preprocess) for a travel profile.
//!
//! Used to stand up a local routing server, e.g. in integration tests.

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::process::Command;

use thiserror::Error;

use crate::traits::TransportMode;

#[derive(Debug, Clone)]
pub struct GeofabrikRegion {
    /// Geofabrik region path, e.g. "north-america/us/nevada".
    pub path: String,
}

impl GeofabrikRegion {
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into() }
    }

    pub fn name(&self) -> &str {
        self.path.rsplit('/').next().unwrap_or("region")
    }

    pub fn url(&self) -> String {
        format!("https://download.geofabrik.de/{}-latest.osm.pbf", self.path)
    }
}

#[derive(Debug, Clone)]
pub struct OsrmDatasetConfig {
    pub region: GeofabrikRegion,
    pub data_root: PathBuf,
    /// Mode whose bundled lua profile is used for extraction.
    pub transport: TransportMode,
}

impl OsrmDatasetConfig {
    pub fn new(region: GeofabrikRegion, data_root: impl Into<PathBuf>) -> Self {
        Self {
            region,
            data_root: data_root.into(),
            transport: TransportMode::Walking,
        }
    }

    /// Lua script inside the osrm-backend image for this profile.
    fn profile_script(&self) -> String {
        format!("/opt/{}.lua", self.transport.osrm_profile())
    }

    /// Directory holding the extract for this region and profile.
    fn data_dir(&self, root: &Path) -> PathBuf {
        root.join(self.region.name())
            .join(self.transport.osrm_profile())
    }
}

#[derive(Debug, Clone)]
pub struct OsrmDataset {
    pub data_dir: PathBuf,
    pub osrm_base: PathBuf,
    pub pbf_path: PathBuf,
}

#[derive(Debug, Error)]
pub enum OsrmDataError {
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[error("download failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("{0}")]
    ProcessFailure(String),
}

impl OsrmDataset {
    /// Downloads and preprocesses (MLD) the region if not already on disk.
    pub fn ensure(config: &OsrmDatasetConfig) -> Result<Self, OsrmDataError> {
        let data_root = if config.data_root.is_absolute() {
            config.data_root.clone()
        } else {
            std::env::current_dir()?.join(&config.data_root)
        };
        let data_dir = config.data_dir(&data_root);
        fs::create_dir_all(&data_dir)?;

        let region = config.region.name();
        let pbf_path = data_dir.join(format!("{}-latest.osm.pbf", region));
        if !pbf_path.exists() {
            tracing::info!(url = %config.region.url(), "downloading extract");
            download_pbf(&config.region.url(), &pbf_path)?;
        }

        let osrm_base = data_dir.join(format!("{}-latest.osrm", region));
        if !osrm_base.exists() {
            let profile = config.profile_script();
            run_docker(
                &["osrm-extract", "-p", &profile, &format!("/data/{}", file_name(&pbf_path))],
                &data_dir,
            )?;
        }

        if !mld_ready(&osrm_base) {
            let base = format!("/data/{}", file_name(&osrm_base));
            run_docker(&["osrm-partition", &base], &data_dir)?;
            run_docker(&["osrm-customize", &base], &data_dir)?;
        }

        Ok(Self {
            data_dir,
            osrm_base,
            pbf_path,
        })
    }
}

fn download_pbf(url: &str, dest: &Path) -> Result<(), OsrmDataError> {
    let response = reqwest::blocking::get(url)?.error_for_status()?;
    let tmp_path = dest.with_extension("tmp");
    let mut writer = BufWriter::new(File::create(&tmp_path)?);
    let bytes = response.bytes()?;
    writer.write_all(&bytes)?;
    writer.flush()?;
    fs::rename(tmp_path, dest)?;
    Ok(())
}

fn mld_ready(osrm_base: &Path) -> bool {
    ["osrm.partition", "osrm.mldgr", "osrm.cells"]
        .iter()
        .all(|ext| osrm_base.with_extension(ext).exists())
}

fn run_docker(args: &[&str], data_dir: &Path) -> Result<(), OsrmDataError> {
    let status = Command::new("docker")
        .arg("run")
        .arg("--rm")
        .arg("-t")
        .arg("-v")
        .arg(format!("{}:/data", data_dir.display()))
        .arg("osrm/osrm-backend")
        .args(args)
        .status()?;

    if status.success() {
        Ok(())
    } else {
        Err(OsrmDataError::ProcessFailure(format!(
            "docker exited with status {}",
            status
        )))
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .and_then(|name| name.to_str())
        .unwrap_or_default()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_region_name_and_url() {
        let region = GeofabrikRegion::new("north-america/us/nevada");
        assert_eq!(region.name(), "nevada");
        assert_eq!(
            region.url(),
            "https://download.geofabrik.de/north-america/us/nevada-latest.osm.pbf"
        );
    }

    #[test]
    fn test_data_dir_per_profile() {
        let config = OsrmDatasetConfig::new(GeofabrikRegion::new("europe/monaco"), "/tmp/osrm");
        assert_eq!(
            config.data_dir(Path::new("/tmp/osrm")),
            PathBuf::from("/tmp/osrm/monaco/foot")
        );
    }

    #[test]
    fn test_cycling_uses_bicycle_script() {
        let mut config = OsrmDatasetConfig::new(GeofabrikRegion::new("europe/monaco"), "/tmp/osrm");
        assert_eq!(config.profile_script(), "/opt/foot.lua");

        config.transport = TransportMode::Cycling;
        assert_eq!(config.profile_script(), "/opt/bicycle.lua");
        assert_eq!(
            config.data_dir(Path::new("/tmp/osrm")),
            PathBuf::from("/tmp/osrm/monaco/bicycle")
        );
    }

    #[test]
    fn test_mld_not_ready_without_files() {
        assert!(!mld_ready(Path::new("/nonexistent/monaco-latest.osrm")));
    }
}
