#[macro_use]
extern crate log;

mod app;

use app::*;
use cameras::*;
use clap::Parser;
use disparity::*;
use lfcore::error::*;
use lfcore::fileutil::*;
use lfcore::geometry::Point3f;
use std::process::ExitCode;

fn main() -> ExitCode {
    let options = Options::parse();

    // Initialize `env_logger`.
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if options.quiet {
        builder.filter_level(log::LevelFilter::Error);
    }
    builder.init();

    let result = match &options.command {
        Command::Plan(args) => plan(args).map(|_| ()),
        Command::Preview(args) => preview(args).map(|_| ()),
        Command::Disparity(args) => disparity(args).map(|_| ()),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}

/// Runs a capture session to completion and prints one line per view:
/// `index row col x y z path`.
fn plan(args: &PlanArgs) -> Result<Restore> {
    let camera = args.array.transform();
    let settings = args.array.settings()?;
    if args.write_meta {
        ensure_dir(&args.output)?;
    }
    let output = absolute_path(&args.output)?;
    let mut session = CaptureSession::start(&args.array.camera, &camera, &settings, output);

    if args.write_meta {
        session.write_metadata()?;
    }

    while let Some(step) = session.begin_frame() {
        let p = step.pose.position;
        println!(
            "{} {} {} {} {} {} {}",
            step.pose.index,
            step.pose.coord.0,
            step.pose.coord.1,
            p.x,
            p.y,
            p.z,
            step.output_path.display()
        );
        session.end_frame();
    }

    let restore = session.finish();
    info!(
        "Rendered {} views; camera back at {}",
        restore.rendered, restore.camera_position
    );
    Ok(restore)
}

/// Starts a preview in the middle of the array, applies the moves and prints
/// the view and camera location after each.
fn preview(args: &PreviewArgs) -> Result<Point3f> {
    let mut session = PreviewSession::start(&args.array.transform(), &args.array.settings()?);
    let print = |label: &str, session: &PreviewSession| {
        let (s, t) = session.current();
        let p = session.position();
        println!("{label} {s} {t} {} {} {}", p.x, p.y, p.z);
    };

    print("start", &session);
    for &direction in &args.moves {
        session.step(direction);
        print(&direction.to_string(), &session);
    }

    let center = session.finish();
    println!("restore {} {} {}", center.x, center.y, center.z);
    Ok(center)
}

/// Converts a depth map into disparity, writes it and prints the range and
/// the updated settings.
fn disparity(args: &DisparityArgs) -> Result<DisparityMap> {
    let settings = args.settings()?;
    let estimator =
        DisparityEstimator::for_settings(&settings, args.intrinsics()?)?.with_policy(args.invalid);

    let depth = DepthMap::from_file(args.depth_path()?)?;
    let map = estimator.estimate(&depth)?;
    map.write(&args.output)?;

    match map.depth_range() {
        Some((near, far)) => println!("depth: {near} {far}"),
        None => println!("depth: none"),
    }
    match map.range() {
        Some((lo, hi)) => println!("disparity: {lo} {hi}"),
        None => println!("disparity: none"),
    }
    println!("invalid: {}", map.invalid_count());

    let updated = map.apply_to(settings);
    println!("min_disp: {}", updated.min_disp());
    println!("max_disp: {}", updated.max_disp());
    Ok(map)
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::*;
    use lfcore::image_io::*;
    use lfcore::numeric::Float;
    use std::path::Path;

    fn command(args: &[&str]) -> Command {
        Options::parse_from(std::iter::once("lightfield-camera").chain(args.iter().copied())).command
    }

    #[test]
    fn plan_creates_output_directory_for_metadata() {
        let tmp = tempfile::tempdir().unwrap();
        let output = tmp.path().join("capture").join("lf");
        let output_arg = output.to_str().unwrap();
        let Command::Plan(args) = command(&[
            "plan", "--rows", "2", "--cols", "2", "--base-x", "0.2", "--output", output_arg, "--write-meta",
        ]) else {
            panic!("expected plan");
        };

        let restore = plan(&args).unwrap();
        assert_eq!(restore.rendered, 4);
        assert!(!restore.cancelled);
        assert!(output.is_dir());

        let meta = CaptureMetadata::read(output.join(METADATA_FILE_NAME)).unwrap();
        assert_eq!((meta.num_x, meta.num_y), (2, 2));
        assert_eq!(meta.base_x, 0.2);
        assert_eq!(restore.output_dir, output.canonicalize().unwrap());
    }

    #[test]
    fn plan_without_metadata_leaves_filesystem_alone() {
        let tmp = tempfile::tempdir().unwrap();
        let output = tmp.path().join("not-created");
        let Command::Plan(args) = command(&["plan", "--rows", "3", "--output", output.to_str().unwrap()]) else {
            panic!("expected plan");
        };

        let restore = plan(&args).unwrap();
        assert_eq!(restore.rendered, 3);
        assert_eq!(restore.output_dir, output);
        assert!(!output.exists());
    }

    #[test]
    fn preview_restores_camera_location() {
        let Command::Preview(args) = command(&[
            "preview", "--rows", "3", "--cols", "3", "--location", "1", "-2", "3", "--moves", "left,up,up",
        ]) else {
            panic!("expected preview");
        };
        assert_eq!(preview(&args).unwrap(), Point3f::new(1.0, -2.0, 3.0));
    }

    #[test]
    fn disparity_from_pfm_depth() {
        let tmp = tempfile::tempdir().unwrap();
        let depth_path = tmp.path().join("depth.pfm");
        let output = tmp.path().join("disparity.npy");
        let depth = FloatImage::new(vec![2.0, 4.0, 0.0, 1.0], 2, 2).unwrap();
        write_float_image(&depth_path, &depth).unwrap();

        let Command::Disparity(args) = command(&[
            "disparity",
            "--depth",
            depth_path.to_str().unwrap(),
            "--base-x",
            "0.1",
            "--output",
            output.to_str().unwrap(),
        ]) else {
            panic!("expected disparity");
        };

        // 50mm lens, 36mm sensor, 1920 pixels wide: 50 * 0.1 * 1920 / 36 / z.
        let map = disparity(&args).unwrap();
        let (lo, hi) = map.range().unwrap();
        assert!(approx_eq!(Float, lo, 66.66667, epsilon = 1e-3));
        assert!(approx_eq!(Float, hi, 266.66667, epsilon = 1e-3));
        assert_eq!(map.depth_range(), Some((1.0, 4.0)));
        assert_eq!(map.invalid_count(), 1);

        let written = read_float_image(&output).unwrap();
        assert_eq!((written.width, written.height), (2, 2));
        assert!(approx_eq!(Float, written.get(0, 0), 133.33333, epsilon = 1e-3));
        assert!(written.get(0, 1).is_nan());
    }

    #[test]
    fn disparity_of_missing_depth_is_an_error() {
        let tmp = tempfile::tempdir().unwrap();
        let missing = tmp.path().join("depth0001.exr");
        let output = tmp.path().join("disparity.npy");
        let Command::Disparity(args) = command(&[
            "disparity",
            "--depth",
            missing.to_str().unwrap(),
            "--base-x",
            "0.1",
            "--output",
            output.to_str().unwrap(),
        ]) else {
            panic!("expected disparity");
        };
        assert!(disparity(&args).is_err());
        assert!(!Path::new(&output).exists());
    }
}
