//! Command line options

use cameras::*;
use clap::{Args, Parser, Subcommand};
use disparity::*;
use lfcore::error::*;
use lfcore::geometry::*;
use std::path::PathBuf;

/// Light field camera array planning and disparity tools.
#[derive(Parser, Clone, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Options {
    /// Suppress all text output other than error messages.
    #[arg(long, global = true)]
    pub quiet: bool,

    /// What to do.
    #[command(subcommand)]
    pub command: Command,
}

/// Subcommands.
#[derive(Subcommand, Clone, Debug)]
pub enum Command {
    /// List the camera locations and output paths of a capture.
    Plan(PlanArgs),

    /// Step through the array one view at a time.
    Preview(PreviewArgs),

    /// Convert a rendered depth map into a disparity map.
    Disparity(DisparityArgs),
}

/// Camera placement and array layout.
#[derive(Args, Clone, Debug)]
pub struct ArrayArgs {
    /// Number of rows of the camera array.
    #[arg(long, value_name = "NUM", default_value_t = 1)]
    pub rows: usize,

    /// Number of columns of the camera array.
    #[arg(long, value_name = "NUM", default_value_t = 1)]
    pub cols: usize,

    /// Baseline between columns.
    #[arg(long = "base-x", value_name = "FLOAT", default_value_t = 1.0)]
    pub base_x: Float,

    /// Baseline between rows.
    #[arg(long = "base-y", value_name = "FLOAT", default_value_t = 1.0)]
    pub base_y: Float,

    /// Camera location.
    #[arg(
        long,
        num_args = 3,
        value_names = ["X", "Y", "Z"],
        allow_negative_numbers = true,
        default_values_t = [0.0, 0.0, 0.0]
    )]
    pub location: Vec<Float>,

    /// Camera rotation as XYZ Euler angles in degrees.
    #[arg(
        long,
        num_args = 3,
        value_names = ["RX", "RY", "RZ"],
        allow_negative_numbers = true,
        default_values_t = [0.0, 0.0, 0.0]
    )]
    pub rotation: Vec<Float>,

    /// Camera name.
    #[arg(long, value_name = "NAME", default_value = "Camera")]
    pub camera: String,
}

impl ArrayArgs {
    /// Returns the camera placement.
    pub fn transform(&self) -> CameraTransform {
        let v = |a: &[Float], i: usize| a.get(i).copied().unwrap_or(0.0);
        CameraTransform::from_euler(
            Point3f::from([v(&self.location, 0), v(&self.location, 1), v(&self.location, 2)]),
            [v(&self.rotation, 0), v(&self.rotation, 1), v(&self.rotation, 2)],
        )
    }

    /// Returns the light field settings.
    pub fn settings(&self) -> Result<LightFieldSettings> {
        LightFieldSettings::new(self.rows, self.cols, self.base_x, self.base_y)
    }
}

/// Options for `plan`.
#[derive(Args, Clone, Debug)]
pub struct PlanArgs {
    #[command(flatten)]
    pub array: ArrayArgs,

    /// Directory receiving the views.
    #[arg(long, short = 'o', value_name = "DIR", default_value_os_t = std::env::temp_dir())]
    pub output: PathBuf,

    /// Write param.txt into the output directory.
    #[arg(long = "write-meta")]
    pub write_meta: bool,
}

/// Options for `preview`.
#[derive(Args, Clone, Debug)]
pub struct PreviewArgs {
    #[command(flatten)]
    pub array: ArrayArgs,

    /// Moves to make, e.g. `left,left,up` or `h,h,k`.
    #[arg(long, value_name = "DIR", value_delimiter = ',', num_args = 1..)]
    pub moves: Vec<Direction>,
}

/// Options for `disparity`.
#[derive(Args, Clone, Debug)]
pub struct DisparityArgs {
    /// Depth map (OpenEXR, PFM or NPY).
    #[arg(
        long,
        value_name = "FILE",
        conflicts_with = "geometry_dir",
        required_unless_present = "geometry_dir"
    )]
    pub depth: Option<PathBuf>,

    /// Directory holding the rendered geometry passes.
    #[arg(long = "geometry-dir", value_name = "DIR")]
    pub geometry_dir: Option<PathBuf>,

    /// Frame number of the geometry passes.
    #[arg(long, value_name = "NUM", default_value_t = 1)]
    pub frame: u32,

    /// Capture metadata providing the baseline.
    #[arg(
        long,
        value_name = "FILE",
        conflicts_with = "base_x",
        required_unless_present = "base_x"
    )]
    pub meta: Option<PathBuf>,

    /// Baseline between columns.
    #[arg(long = "base-x", value_name = "FLOAT")]
    pub base_x: Option<Float>,

    /// Focal length in millimeters.
    #[arg(long = "focal-length", value_name = "MM", default_value_t = 50.0)]
    pub focal_length: Float,

    /// Sensor width in millimeters.
    #[arg(long = "sensor-width", value_name = "MM", default_value_t = 36.0)]
    pub sensor_width: Float,

    /// Horizontal resolution in pixels.
    #[arg(long = "resolution-x", value_name = "PIXELS", default_value_t = 1920)]
    pub resolution_x: usize,

    /// Output file; the format follows the extension (npy, pfm, exr, png).
    #[arg(long, short = 'o', value_name = "FILE")]
    pub output: PathBuf,

    /// Handling of zero, negative or non-finite depth: nan, reject or fill=<v>.
    #[arg(long, value_name = "POLICY", default_value = "nan")]
    pub invalid: InvalidDepth,
}

impl DisparityArgs {
    /// Returns the depth map path.
    pub fn depth_path(&self) -> Result<PathBuf> {
        match (&self.depth, &self.geometry_dir) {
            (Some(path), _) => Ok(path.clone()),
            (None, Some(dir)) => Ok(path(dir, GeometryPass::Depth, self.frame)),
            (None, None) => Err(Error::Metadata(
                "either --depth or --geometry-dir is required".to_string(),
            )),
        }
    }

    /// Returns the light field settings, from the metadata file if given.
    pub fn settings(&self) -> Result<LightFieldSettings> {
        match (&self.meta, self.base_x) {
            (Some(meta), _) => CaptureMetadata::read(meta)?.settings(),
            (None, Some(base_x)) => LightFieldSettings::new(1, 1, base_x, base_x),
            (None, None) => Err(Error::Metadata(
                "either --meta or --base-x is required".to_string(),
            )),
        }
    }

    /// Returns the camera parameters.
    pub fn intrinsics(&self) -> Result<CameraIntrinsics> {
        CameraIntrinsics::new(self.focal_length, self.sensor_width, self.resolution_x)
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plan_options() {
        let o = Options::parse_from([
            "lightfield-camera",
            "plan",
            "--rows",
            "3",
            "--cols",
            "5",
            "--base-x",
            "0.1",
            "--location",
            "1",
            "-2",
            "3",
            "--output",
            "/tmp/lf",
            "--write-meta",
        ]);
        match o.command {
            Command::Plan(p) => {
                assert_eq!((p.array.rows, p.array.cols), (3, 5));
                assert_eq!(p.array.transform().position, Point3f::new(1.0, -2.0, 3.0));
                assert_eq!(p.array.settings().unwrap().base_x(), 0.1);
                assert!(p.write_meta);
                assert_eq!(p.output, PathBuf::from("/tmp/lf"));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn preview_moves() {
        let o = Options::parse_from(["lightfield-camera", "--quiet", "preview", "--moves", "left,k,DOWN_ARROW"]);
        assert!(o.quiet);
        match o.command {
            Command::Preview(p) => {
                assert_eq!(p.moves, [Direction::Left, Direction::Up, Direction::Down]);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn disparity_options() {
        let o = Options::parse_from([
            "lightfield-camera",
            "disparity",
            "--geometry-dir",
            "geo",
            "--frame",
            "7",
            "--base-x",
            "0.2",
            "--output",
            "d.npy",
            "--invalid",
            "fill=-1",
        ]);
        match o.command {
            Command::Disparity(d) => {
                assert_eq!(d.depth_path().unwrap(), PathBuf::from("geo").join("depth0007.exr"));
                assert_eq!(d.settings().unwrap().base_x(), 0.2);
                assert_eq!(d.invalid, InvalidDepth::Fill(-1.0));
                assert_eq!(d.intrinsics().unwrap(), CameraIntrinsics::default());
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn disparity_needs_a_depth_source() {
        assert!(Options::try_parse_from([
            "lightfield-camera",
            "disparity",
            "--base-x",
            "0.2",
            "--output",
            "d.npy",
        ])
        .is_err());
    }

    #[test]
    fn verify_cli() {
        use clap::CommandFactory;
        Options::command().debug_assert();
    }
}
