//! Interactive light field preview
//!
//! Steps the camera through the array one view at a time so the user can
//! look through each camera in the viewport.

use crate::pose_grid::*;
use crate::settings::*;
use crate::transform::*;
use lfcore::error::*;
use lfcore::geometry::*;
use std::fmt;
use std::str::FromStr;

/// Navigation direction in the array.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Direction {
    Left,
    Right,
    Up,
    Down,
}

impl Direction {
    /// Returns the (row, column) step.
    pub fn delta(self) -> (isize, isize) {
        match self {
            Direction::Left => (0, -1),
            Direction::Right => (0, 1),
            Direction::Up => (-1, 0),
            Direction::Down => (1, 0),
        }
    }
}

impl FromStr for Direction {
    type Err = Error;

    /// Accepts `left`/`right`/`up`/`down` in any case, arrow key names such
    /// as `LEFT_ARROW`, and the vi keys `h`, `j`, `k`, `l`.
    fn from_str(s: &str) -> Result<Self> {
        let key = s.trim().to_ascii_lowercase();
        match key.trim_end_matches("_arrow") {
            "left" | "h" => Ok(Direction::Left),
            "right" | "l" => Ok(Direction::Right),
            "up" | "k" => Ok(Direction::Up),
            "down" | "j" => Ok(Direction::Down),
            _ => Err(Error::UnknownKeyword {
                name: "direction",
                token: s.trim().to_string(),
                reason: "expected left, right, up or down",
            }),
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Direction::Left => "left",
            Direction::Right => "right",
            Direction::Up => "up",
            Direction::Down => "down",
        };
        f.write_str(name)
    }
}

/// State of a preview: the array and the view currently shown.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PreviewSession {
    poses: PoseGrid,
    current: (usize, usize),
}

impl PreviewSession {
    /// Starts a preview at the middle of the array.
    ///
    /// * `camera`   - Camera placement.
    /// * `settings` - Light field settings.
    pub fn start(camera: &CameraTransform, settings: &LightFieldSettings) -> Self {
        let poses = PoseGrid::new(camera, settings);
        let current = poses.grid().middle();
        info!(
            "Previewing {} x {} array from view {:?}",
            settings.num_rows(),
            settings.num_cols(),
            current
        );
        Self { poses, current }
    }

    /// Returns the array.
    pub fn poses(&self) -> &PoseGrid {
        &self.poses
    }

    /// Returns the view shown.
    pub fn current(&self) -> (usize, usize) {
        self.current
    }

    /// Returns the camera location for the view shown.
    pub fn position(&self) -> Point3f {
        self.poses.position_at_coord(self.current.0, self.current.1)
    }

    /// Moves to a view, clamped into the array, and returns the camera
    /// location.
    ///
    /// * `s` - Row.
    /// * `t` - Column.
    pub fn goto(&mut self, s: isize, t: isize) -> Point3f {
        let next = self.poses.clamp(s, t);
        if next.0 as isize != s || next.1 as isize != t {
            debug!("View ({s}, {t}) is outside the array; showing {next:?}");
        }
        self.current = next;
        self.position()
    }

    /// Moves one view in the given direction and returns the camera location.
    /// At the edge of the array the view does not change.
    ///
    /// * `direction` - Where to move.
    pub fn step(&mut self, direction: Direction) -> Point3f {
        let (ds, dt) = direction.delta();
        let (s, t) = self.current;
        self.goto(s as isize + ds, t as isize + dt)
    }

    /// Rebuilds the array after the camera was moved or the settings changed,
    /// and returns to the middle view. Whatever offset the user gave the
    /// camera relative to the view shown is carried over to the center.
    ///
    /// * `camera`   - Camera placement now.
    /// * `settings` - Light field settings now.
    pub fn reset(&mut self, camera: &CameraTransform, settings: &LightFieldSettings) -> Point3f {
        let shift = camera.position - self.position();
        let center = self.poses.center() + shift;
        *self = Self::start(&camera.moved_to(center), settings);
        self.position()
    }

    /// Ends the preview and returns the location to restore the camera to.
    pub fn finish(self) -> Point3f {
        self.poses.center()
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
