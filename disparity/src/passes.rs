//! Geometry passes
//!
//! The host can render auxiliary passes next to each view. They land in the
//! geometry directory as `<pass><frame:04>.exr`.

use bitflags::bitflags;
use lfcore::error::*;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

bitflags! {
    /// Stores combination of flags for the geometry passes to render.
    #[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
    pub struct GeometryPasses: u8 {
        const DEPTH = 1;
        const NORMAL = 2;
        const FLOW = 4;
    }
}

/// A single geometry pass.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum GeometryPass {
    Depth,
    Normal,
    Flow,
}

impl GeometryPass {
    /// All passes in render order.
    pub const ALL: [GeometryPass; 3] = [GeometryPass::Depth, GeometryPass::Normal, GeometryPass::Flow];

    /// Returns the pass name used in file names.
    pub fn name(self) -> &'static str {
        match self {
            GeometryPass::Depth => "depth",
            GeometryPass::Normal => "normal",
            GeometryPass::Flow => "flow",
        }
    }

    /// Returns the key of the host image receiving the pass.
    pub fn image_key(self) -> String {
        format!("geo_{}", self.name())
    }

    /// Returns the corresponding flag.
    pub fn flag(self) -> GeometryPasses {
        match self {
            GeometryPass::Depth => GeometryPasses::DEPTH,
            GeometryPass::Normal => GeometryPasses::NORMAL,
            GeometryPass::Flow => GeometryPasses::FLOW,
        }
    }
}

impl fmt::Display for GeometryPass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for GeometryPass {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        GeometryPass::ALL
            .into_iter()
            .find(|p| p.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| Error::UnknownKeyword {
                name: "geometry pass",
                token: s.to_string(),
                reason: "expected depth, normal or flow",
            })
    }
}

impl GeometryPasses {
    /// Returns the passes needed to compute disparity.
    pub fn for_disparity() -> Self {
        Self::DEPTH
    }

    /// Returns the requested passes in render order.
    pub fn passes(self) -> impl Iterator<Item = GeometryPass> {
        GeometryPass::ALL
            .into_iter()
            .filter(move |p| self.contains(p.flag()))
    }

    /// Returns the file paths of the requested passes for a frame.
    ///
    /// * `base`  - Geometry directory.
    /// * `frame` - Frame number.
    pub fn paths<P: AsRef<Path>>(self, base: P, frame: u32) -> Vec<PathBuf> {
        self.passes()
            .map(|p| path(base.as_ref(), p, frame))
            .collect()
    }
}

impl FromStr for GeometryPasses {
    type Err = Error;

    /// Parses a comma separated list of pass names, e.g. `depth,normal`.
    fn from_str(s: &str) -> Result<Self> {
        s.split(',')
            .filter(|name| !name.trim().is_empty())
            .try_fold(GeometryPasses::empty(), |acc, name| -> Result<Self> {
                Ok(acc | name.parse::<GeometryPass>()?.flag())
            })
    }
}

/// Returns the file name of a pass for a frame, `"<pass><frame:04>.exr"`.
///
/// * `pass`  - The geometry pass.
/// * `frame` - Frame number.
pub fn file_name(pass: GeometryPass, frame: u32) -> String {
    format!("{}{:04}.exr", pass.name(), frame)
}

/// Returns the path of a pass for a frame.
///
/// * `base`  - Geometry directory.
/// * `pass`  - The geometry pass.
/// * `frame` - Frame number.
pub fn path<P: AsRef<Path>>(base: P, pass: GeometryPass, frame: u32) -> PathBuf {
    base.as_ref().join(file_name(pass, frame))
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_and_keys() {
        assert_eq!(GeometryPass::Depth.name(), "depth");
        assert_eq!(GeometryPass::Normal.image_key(), "geo_normal");
        assert_eq!(GeometryPass::Flow.to_string(), "flow");
    }

    #[test]
    fn file_names_are_zero_padded() {
        assert_eq!(file_name(GeometryPass::Depth, 1), "depth0001.exr");
        assert_eq!(file_name(GeometryPass::Flow, 12345), "flow12345.exr");
        assert_eq!(
            path("/tmp/geo", GeometryPass::Normal, 7),
            PathBuf::from("/tmp/geo/normal0007.exr")
        );
    }

    #[test]
    fn disparity_needs_depth_only() {
        let passes = GeometryPasses::for_disparity();
        assert_eq!(passes.passes().collect::<Vec<_>>(), [GeometryPass::Depth]);
        assert_eq!(passes.paths("geo", 3), [Path::new("geo").join("depth0003.exr")]);
    }

    #[test]
    fn parse_list() {
        let passes: GeometryPasses = "depth, Normal".parse().unwrap();
        assert_eq!(passes, GeometryPasses::DEPTH | GeometryPasses::NORMAL);
        assert_eq!(
            passes.passes().collect::<Vec<_>>(),
            [GeometryPass::Depth, GeometryPass::Normal]
        );
        assert_eq!("".parse::<GeometryPasses>().unwrap(), GeometryPasses::empty());
        match "depth,albedo".parse::<GeometryPasses>() {
            Err(Error::UnknownKeyword { token, .. }) => assert_eq!(token, "albedo"),
            other => panic!("expected UnknownKeyword, got {other:?}"),
        }
    }

    #[test]
    fn all_passes_in_order() {
        let names: Vec<_> = GeometryPasses::all().passes().map(GeometryPass::name).collect();
        assert_eq!(names, ["depth", "normal", "flow"]);
    }
}
