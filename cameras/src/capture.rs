//! Light field capture session
//!
//! The host renders; the session decides where the camera goes and where
//! each view is written. A render loop drives it like this:
//!
//! ```text
//! let mut session = CaptureSession::start("Camera", &camera, &settings, "/tmp/lf");
//! session.write_metadata()?;
//! while let Some(step) = session.begin_frame() {
//!     // move the camera to step.position, render to step.output_path
//!     session.end_frame();
//! }
//! let restore = session.finish();
//! ```

use crate::metadata::*;
use crate::pose_grid::*;
use crate::settings::*;
use crate::transform::*;
use lfcore::error::*;
use lfcore::geometry::*;
use std::path::{Path, PathBuf};

/// Where a capture session is in its life cycle.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SessionState {
    /// Waiting for the next frame to begin.
    Ready,

    /// A frame has begun and has not been written yet.
    Rendering,

    /// Every view was rendered.
    Finished,

    /// The user stopped the capture.
    Cancelled,
}

/// A single render of the capture.
#[derive(Clone, Debug, PartialEq)]
pub struct CaptureStep {
    /// The camera to render.
    pub pose: Pose,

    /// Output path without extension, `<dir>/<row>_<col>`.
    pub output_path: PathBuf,
}

/// What the host has to put back once the capture is over.
#[derive(Clone, Debug, PartialEq)]
pub struct Restore {
    /// The camera's original location.
    pub camera_position: Point3f,

    /// The original render output path.
    pub output_dir: PathBuf,

    /// Number of views written.
    pub rendered: usize,

    /// True if the capture was cancelled. A session finished before all
    /// views were written without being cancelled reports `false`; compare
    /// `rendered` with the number of poses to detect it.
    pub cancelled: bool,
}

/// Renders a light field one view at a time.
#[derive(Clone, Debug)]
pub struct CaptureSession {
    /// Name of the camera being captured.
    camera_name: String,

    /// Settings at the start of the capture.
    settings: LightFieldSettings,

    /// Camera locations.
    poses: PoseGrid,

    /// Directory receiving the views.
    output_dir: PathBuf,

    /// Number of views written so far.
    progress: usize,

    /// Current state.
    state: SessionState,
}

impl CaptureSession {
    /// Starts a capture for a camera.
    ///
    /// * `camera_name` - Camera name recorded in the metadata.
    /// * `camera`      - Camera placement at the start of the capture.
    /// * `settings`    - Light field settings.
    /// * `output_dir`  - Directory receiving the views.
    pub fn start<P: Into<PathBuf>>(
        camera_name: &str,
        camera: &CameraTransform,
        settings: &LightFieldSettings,
        output_dir: P,
    ) -> Self {
        if !settings.enabled() {
            warn!("Light field is disabled on '{camera_name}'; capturing a single view");
        }

        let poses = PoseGrid::new(camera, settings);
        let output_dir = output_dir.into();
        info!(
            "Capturing {} views ({} x {}) of '{camera_name}' into {}",
            poses.len(),
            settings.num_rows(),
            settings.num_cols(),
            output_dir.display()
        );

        Self {
            camera_name: camera_name.to_string(),
            settings: *settings,
            poses,
            output_dir,
            progress: 0,
            state: SessionState::Ready,
        }
    }

    /// Returns the current state.
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Returns the camera locations.
    pub fn poses(&self) -> &PoseGrid {
        &self.poses
    }

    /// Returns the output directory.
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Returns the number of views written and the total.
    pub fn progress(&self) -> (usize, usize) {
        (self.progress, self.poses.len())
    }

    /// Returns true once no more frames will begin.
    pub fn is_done(&self) -> bool {
        matches!(
            self.state,
            SessionState::Finished | SessionState::Cancelled
        )
    }

    /// Returns the metadata describing this capture.
    pub fn metadata(&self) -> CaptureMetadata {
        CaptureMetadata::new(&self.camera_name, &self.settings)
    }

    /// Writes `param.txt` into the output directory.
    pub fn write_metadata(&self) -> Result<PathBuf> {
        self.metadata().write(&self.output_dir)
    }

    /// Returns the step for the current progress.
    fn current_step(&self) -> CaptureStep {
        let pose = self.poses.pose(self.progress);
        let output_path = self.output_dir.join(pose.stem());
        CaptureStep { pose, output_path }
    }

    /// Begins the next frame and returns where to put the camera and where
    /// to write the render. While a frame is in flight the same step is
    /// returned again. Returns `None` once the capture is finished or
    /// cancelled.
    pub fn begin_frame(&mut self) -> Option<CaptureStep> {
        match self.state {
            SessionState::Ready if self.progress >= self.poses.len() => {
                self.state = SessionState::Finished;
                None
            }
            SessionState::Ready => {
                info!(
                    "render on {:03}/{:03}",
                    self.progress,
                    self.poses.len()
                );
                self.state = SessionState::Rendering;
                let step = self.current_step();
                debug!(
                    "Camera {} at {} -> {}",
                    step.pose.stem(),
                    step.pose.position,
                    step.output_path.display()
                );
                Some(step)
            }
            SessionState::Rendering => Some(self.current_step()),
            SessionState::Finished | SessionState::Cancelled => None,
        }
    }

    /// Marks the frame in flight as written.
    pub fn end_frame(&mut self) {
        if self.state != SessionState::Rendering {
            warn!("end_frame() without a frame in flight ({:?})", self.state);
            return;
        }

        self.progress += 1;
        self.state = if self.progress >= self.poses.len() {
            SessionState::Finished
        } else {
            SessionState::Ready
        };
    }

    /// Stops the capture. A frame in flight is not counted.
    pub fn cancel(&mut self) {
        if self.state != SessionState::Finished {
            info!(
                "Capture cancelled after {} of {} views",
                self.progress,
                self.poses.len()
            );
            self.state = SessionState::Cancelled;
        }
    }

    /// Ends the session and returns what the host has to restore.
    pub fn finish(self) -> Restore {
        let cancelled = self.state == SessionState::Cancelled;
        info!(
            "Capture of '{}' done: {} of {} views",
            self.camera_name,
            self.progress,
            self.poses.len()
        );
        Restore {
            camera_position: self.poses.center(),
            output_dir: self.output_dir,
            rendered: self.progress,
            cancelled,
        }
    }
}

impl Iterator for CaptureSession {
    type Item = CaptureStep;

    /// Ends the frame in flight, if any, and begins the next one.
    fn next(&mut self) -> Option<Self::Item> {
        if self.state == SessionState::Rendering {
            self.end_frame();
        }
        self.begin_frame()
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn session(rows: usize, cols: usize) -> CaptureSession {
        let camera = CameraTransform::new(Point3f::new(0.0, -5.0, 1.0), Matrix3x3::default());
        let settings = LightFieldSettings::new(rows, cols, 0.1, 0.1).unwrap();
        CaptureSession::start("Camera", &camera, &settings, "/tmp/lf")
    }

    #[test]
    fn renders_every_view_in_row_major_order() {
        let mut s = session(2, 3);
        let mut names = Vec::new();
        while let Some(step) = s.begin_frame() {
            assert_eq!(s.state(), SessionState::Rendering);
            names.push(step.output_path.file_name().unwrap().to_string_lossy().into_owned());
            s.end_frame();
        }
        assert_eq!(names, ["00_00", "00_01", "00_02", "01_00", "01_01", "01_02"]);
        assert_eq!(s.state(), SessionState::Finished);
        assert_eq!(s.progress(), (6, 6));

        let restore = s.finish();
        assert_eq!(restore.camera_position, Point3f::new(0.0, -5.0, 1.0));
        assert_eq!(restore.output_dir, PathBuf::from("/tmp/lf"));
        assert_eq!(restore.rendered, 6);
        assert!(!restore.cancelled);
    }

    #[test]
    fn begin_frame_repeats_in_flight_step() {
        let mut s = session(2, 2);
        let a = s.begin_frame().unwrap();
        let b = s.begin_frame().unwrap();
        assert_eq!(a, b);
        assert_eq!(s.progress(), (0, 4));
        s.end_frame();
        assert_eq!(s.begin_frame().unwrap().pose.index, 1);
    }

    #[test]
    fn end_frame_without_begin_is_ignored() {
        let mut s = session(2, 2);
        s.end_frame();
        assert_eq!(s.progress(), (0, 4));
        assert_eq!(s.state(), SessionState::Ready);
    }

    #[test]
    fn cancel_stops_the_capture() {
        let mut s = session(3, 3);
        s.begin_frame();
        s.end_frame();
        s.begin_frame();
        s.cancel();
        assert!(s.is_done());
        assert_eq!(s.begin_frame(), None);
        assert_eq!(s.next(), None);

        let restore = s.finish();
        assert!(restore.cancelled);
        assert_eq!(restore.rendered, 1);
        assert_eq!(restore.camera_position, Point3f::new(0.0, -5.0, 1.0));
    }

    #[test]
    fn finish_without_cancel_is_not_cancelled() {
        let s = session(2, 2);
        let restore = s.finish();
        assert!(!restore.cancelled);
        assert_eq!(restore.rendered, 0);

        let mut s = session(2, 2);
        s.begin_frame();
        s.end_frame();
        let restore = s.finish();
        assert!(!restore.cancelled);
        assert_eq!(restore.rendered, 1);
    }

    #[test]
    fn iterator_yields_all_poses() {
        let s = session(3, 4);
        let poses = *s.poses();
        let steps: Vec<_> = s.collect();
        assert_eq!(steps.len(), 12);
        for (step, pose) in steps.iter().zip(poses.iter()) {
            assert_eq!(step.pose, pose);
        }
    }

    #[test]
    fn single_camera_capture() {
        let camera = CameraTransform::default();
        let mut s = CaptureSession::start(
            "Camera",
            &camera,
            &LightFieldSettings::disabled(),
            "out",
        );
        let step = s.next().unwrap();
        assert_eq!(step.pose.position, Point3f::zero());
        assert_eq!(step.output_path, Path::new("out").join("00_00"));
        assert_eq!(s.next(), None);
        assert_eq!(s.state(), SessionState::Finished);
    }

    #[test]
    fn metadata_describes_the_capture() {
        let tmp = tempfile::tempdir().unwrap();
        let camera = CameraTransform::default();
        let settings = LightFieldSettings::new(2, 5, 0.2, 0.3).unwrap();
        let s = CaptureSession::start("LF Cam", &camera, &settings, tmp.path());
        let path = s.write_metadata().unwrap();
        let m = CaptureMetadata::read(path).unwrap();
        assert_eq!(m.camera, "LF Cam");
        assert_eq!((m.num_x, m.num_y), (5, 2));
        assert_eq!(m.settings().unwrap().grid(), settings.grid());
    }
}
