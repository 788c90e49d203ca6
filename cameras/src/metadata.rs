//! Capture metadata (`param.txt`)

use crate::settings::*;
use lfcore::error::*;
use lfcore::numeric::Float;
use regex::Regex;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::OnceLock;

/// Name of the metadata file written next to the rendered views.
pub const METADATA_FILE_NAME: &str = "param.txt";

/// Describes a captured light field: which camera rendered it and the array
/// layout.
#[derive(Clone, Debug, PartialEq)]
pub struct CaptureMetadata {
    /// Camera name.
    pub camera: String,

    /// Number of columns.
    pub num_x: usize,

    /// Number of rows.
    pub num_y: usize,

    /// Baseline along x.
    pub base_x: Float,

    /// Baseline along y.
    pub base_y: Float,
}

impl CaptureMetadata {
    /// Creates metadata for a camera with the given settings.
    ///
    /// * `camera`   - Camera name.
    /// * `settings` - Light field settings.
    pub fn new(camera: &str, settings: &LightFieldSettings) -> Self {
        Self {
            camera: camera.to_string(),
            num_x: settings.num_cols(),
            num_y: settings.num_rows(),
            base_x: settings.base_x(),
            base_y: settings.base_y(),
        }
    }

    /// Returns the light field settings described by the metadata.
    pub fn settings(&self) -> Result<LightFieldSettings> {
        LightFieldSettings::new(self.num_y, self.num_x, self.base_x, self.base_y)
    }

    /// Writes `param.txt` into the given directory and returns its path.
    ///
    /// * `dir` - Output directory.
    pub fn write<P: AsRef<Path>>(&self, dir: P) -> Result<PathBuf> {
        let path = dir.as_ref().join(METADATA_FILE_NAME);
        fs::write(&path, self.to_string()).map_err(|e| Error::io(&path, e))?;
        info!("Wrote capture metadata {}", path.display());
        Ok(path)
    }

    /// Reads a metadata file.
    ///
    /// * `path` - Path to `param.txt`.
    pub fn read<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        text.parse()
    }
}

impl fmt::Display for CaptureMetadata {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "camera: {}", self.camera)?;
        writeln!(f, "num_x: {}", self.num_x)?;
        writeln!(f, "num_y: {}", self.num_y)?;
        writeln!(f, "base_x: {}", self.base_x)?;
        writeln!(f, "base_y: {}", self.base_y)
    }
}

/// Returns the regular expression for a `key: value` line.
fn regex_key_value() -> &'static Regex {
    static DATA: OnceLock<Regex> = OnceLock::new();
    DATA.get_or_init(|| Regex::new(r"^\s*(\w+)\s*:\s*(.*?)\s*$").unwrap())
}

/// Parses a numeric metadata value.
///
/// * `key`   - Key name used in the error message.
/// * `value` - The value, if present.
fn parse_value<T: FromStr>(key: &str, value: Option<&str>) -> Result<T>
where
    T::Err: fmt::Display,
{
    let value = value.ok_or_else(|| Error::Metadata(format!("missing '{key}'")))?;
    value
        .parse()
        .map_err(|e| Error::Metadata(format!("invalid '{key}' value '{value}': {e}")))
}

impl FromStr for CaptureMetadata {
    type Err = Error;

    /// Parses `key: value` lines. Unknown keys and blank lines are skipped.
    /// Older files spell the camera key `cmera`.
    fn from_str(s: &str) -> Result<Self> {
        let mut camera = None;
        let mut num_x = None;
        let mut num_y = None;
        let mut base_x = None;
        let mut base_y = None;

        for line in s.lines().filter(|l| !l.trim().is_empty()) {
            let caps = regex_key_value()
                .captures(line)
                .ok_or_else(|| Error::Metadata(format!("malformed line '{line}'")))?;
            let value = caps.get(2).map_or("", |m| m.as_str());
            match &caps[1] {
                "camera" | "cmera" => camera = Some(value.to_string()),
                "num_x" => num_x = Some(value),
                "num_y" => num_y = Some(value),
                "base_x" => base_x = Some(value),
                "base_y" => base_y = Some(value),
                key => debug!("Ignoring metadata key '{key}'"),
            }
        }

        Ok(Self {
            camera: camera.ok_or_else(|| Error::Metadata("missing 'camera'".to_string()))?,
            num_x: parse_value("num_x", num_x)?,
            num_y: parse_value("num_y", num_y)?,
            base_x: parse_value("base_x", base_x)?,
            base_y: parse_value("base_y", base_y)?,
        })
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
