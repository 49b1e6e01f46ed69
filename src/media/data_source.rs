use std::{
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
};

use anyhow::Context as _;
use serde::{Deserialize, Serialize};

use crate::{
    foundation::{
        core::Orientation,
        error::{AlphaError, AlphaResult},
    },
    geometry::ScaleMode,
};

/// One playable file and the scale mode it should be shown with.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MediaEntry {
    pub file: String,
    #[serde(default)]
    pub scale_mode: ScaleMode,
}

/// Per-orientation media for one alpha animation.
///
/// ```json
/// { "base_dir": "gift", "portrait": { "file": "port.mp4", "scale_mode": "fill-top" },
///   "landscape": { "file": "land.mp4" }, "looping": false }
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DataSource {
    #[serde(default)]
    pub base_dir: PathBuf,
    #[serde(default)]
    pub portrait: Option<MediaEntry>,
    #[serde(default)]
    pub landscape: Option<MediaEntry>,
    #[serde(default)]
    pub looping: bool,
}

impl DataSource {
    /// Load and validate a JSON description. A relative `base_dir` is taken relative to the
    /// file's own directory.
    pub fn from_path(path: &Path) -> AlphaResult<Self> {
        let f = File::open(path)
            .with_context(|| format!("open data source '{}'", path.display()))?;
        let mut ds: DataSource = serde_json::from_reader(BufReader::new(f))
            .with_context(|| format!("parse data source '{}'", path.display()))?;
        if ds.base_dir.is_relative() {
            let parent = path.parent().unwrap_or_else(|| Path::new("."));
            ds.base_dir = parent.join(&ds.base_dir);
        }
        ds.validate()?;
        Ok(ds)
    }

    pub fn validate(&self) -> AlphaResult<()> {
        if self.portrait.is_none() && self.landscape.is_none() {
            return Err(AlphaError::validation(
                "data source needs a portrait or a landscape entry",
            ));
        }
        for (label, entry) in [("portrait", &self.portrait), ("landscape", &self.landscape)] {
            if let Some(entry) = entry {
                if entry.file.trim().is_empty() {
                    return Err(AlphaError::validation(format!(
                        "{label} entry has an empty file name"
                    )));
                }
            }
        }
        Ok(())
    }

    /// Entry for `orientation`, falling back to the other orientation when it is missing.
    pub fn entry_for(&self, orientation: Orientation) -> Option<&MediaEntry> {
        let (preferred, fallback) = match orientation {
            Orientation::Portrait => (&self.portrait, &self.landscape),
            Orientation::Landscape => (&self.landscape, &self.portrait),
        };
        preferred.as_ref().or(fallback.as_ref())
    }

    pub fn resolve_path(&self, orientation: Orientation) -> AlphaResult<PathBuf> {
        let entry = self.entry_for(orientation).ok_or_else(|| {
            AlphaError::validation(format!("no media entry for {orientation:?}"))
        })?;
        Ok(self.base_dir.join(&entry.file))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/media/data_source.rs"]
mod tests;
