//! Dead-reckoned path derived from transmitted commands.
//!
//! Each transmitted direction moves the estimated position one grid step;
//! the trail is bounded, oldest points evicted first. Normalization
//! projects the trail into a 0-100 square for display and is recomputed
//! from the live window on every call.

use std::collections::VecDeque;

use super::command::DriveCommand;

/// Maximum number of retained path points (including the origin).
pub const PATH_CAPACITY: usize = 50;

/// Grid step applied per transmitted direction command.
const STEP: i32 = 10;

/// Displacement per command. Screen convention: forward decreases y.
fn displacement(command: DriveCommand) -> (i32, i32) {
    match command {
        DriveCommand::Forward => (0, -STEP),
        DriveCommand::Backward => (0, STEP),
        DriveCommand::Left => (-STEP, 0),
        DriveCommand::Right => (STEP, 0),
        DriveCommand::Stop => (0, 0),
    }
}

// ── Path tracker ───────────────────────────────────────────

/// Bounded trail of dead-reckoned positions, starting at the origin.
#[derive(Debug, Clone)]
pub struct PathTracker {
    points: VecDeque<(i32, i32)>,
}

impl PathTracker {
    /// Start a fresh path at (0, 0).
    pub fn new() -> Self {
        let mut points = VecDeque::with_capacity(PATH_CAPACITY);
        points.push_back((0, 0));
        Self { points }
    }

    /// Apply one transmitted command.
    ///
    /// Directions append the new position, evicting the oldest point once
    /// the capacity is reached. Stop moves nothing and appends nothing.
    pub fn advance(&mut self, command: DriveCommand) {
        let (dx, dy) = displacement(command);
        if dx == 0 && dy == 0 {
            return;
        }
        let (x, y) = self.position();
        self.points.push_back((x + dx, y + dy));
        if self.points.len() > PATH_CAPACITY {
            self.points.pop_front();
        }
    }

    /// Current dead-reckoned position.
    pub fn position(&self) -> (i32, i32) {
        self.points.back().copied().unwrap_or((0, 0))
    }

    /// Raw points, oldest first.
    pub fn points(&self) -> impl Iterator<Item = (i32, i32)> + '_ {
        self.points.iter().copied()
    }

    /// Project the path into a 0-100 square.
    ///
    /// Per-axis linear mapping over the current window's min/max. An axis
    /// with no spread maps to 0 for every entry rather than dividing by
    /// zero. Same length and order as the raw path.
    pub fn normalized(&self) -> Vec<(f32, f32)> {
        let (first_x, first_y) = match self.points.front() {
            Some(&p) => p,
            None => return Vec::new(),
        };

        let (mut min_x, mut max_x) = (first_x, first_x);
        let (mut min_y, mut max_y) = (first_y, first_y);
        for (x, y) in self.points() {
            min_x = min_x.min(x);
            max_x = max_x.max(x);
            min_y = min_y.min(y);
            max_y = max_y.max(y);
        }

        let range_x = (max_x - min_x).max(1) as f32;
        let range_y = (max_y - min_y).max(1) as f32;
        self.points()
            .map(|(x, y)| {
                (
                    (x - min_x) as f32 / range_x * 100.0,
                    (y - min_y) as f32 / range_y * 100.0,
                )
            })
            .collect()
    }
}

impl Default for PathTracker {
    fn default() -> Self {
        Self::new()
    }
}

// ── Tests ──────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_at_origin() {
        let path = PathTracker::new();
        assert_eq!(path.points().count(), 1);
        assert_eq!(path.position(), (0, 0));
    }

    #[test]
    fn test_displacements() {
        let mut path = PathTracker::new();
        path.advance(DriveCommand::Forward);
        assert_eq!(path.position(), (0, -10));
        path.advance(DriveCommand::Backward);
        assert_eq!(path.position(), (0, 0));
        path.advance(DriveCommand::Left);
        assert_eq!(path.position(), (-10, 0));
        path.advance(DriveCommand::Right);
        assert_eq!(path.position(), (0, 0));
    }

    #[test]
    fn test_direction_reversibility() {
        let mut path = PathTracker::new();
        path.advance(DriveCommand::Right);
        path.advance(DriveCommand::Forward);
        let anchor = path.position();

        path.advance(DriveCommand::Forward);
        path.advance(DriveCommand::Backward);
        assert_eq!(path.position(), anchor);

        path.advance(DriveCommand::Left);
        path.advance(DriveCommand::Right);
        assert_eq!(path.position(), anchor);
    }

    #[test]
    fn test_stop_appends_nothing() {
        let mut path = PathTracker::new();
        path.advance(DriveCommand::Forward);
        let len = path.points().count();
        let pos = path.position();

        path.advance(DriveCommand::Stop);
        assert_eq!(path.points().count(), len);
        assert_eq!(path.position(), pos);
    }

    #[test]
    fn test_transmitted_sequence_trail() {
        // The trail for transmitted [F, B, R, S] from the origin.
        let mut path = PathTracker::new();
        for cmd in [
            DriveCommand::Forward,
            DriveCommand::Backward,
            DriveCommand::Right,
            DriveCommand::Stop,
        ] {
            path.advance(cmd);
        }
        let trail: Vec<(i32, i32)> = path.points().collect();
        assert_eq!(trail, vec![(0, 0), (0, -10), (0, 0), (10, 0)]);
    }

    #[test]
    fn test_capacity_evicts_oldest() {
        let mut path = PathTracker::new();
        for _ in 0..80 {
            path.advance(DriveCommand::Right);
        }

        // 80 steps right from the origin; only the newest 50 remain.
        let trail: Vec<(i32, i32)> = path.points().collect();
        assert_eq!(trail.len(), PATH_CAPACITY);
        assert_eq!(trail[0], (310, 0));
        assert_eq!(trail[PATH_CAPACITY - 1], (800, 0));
    }

    #[test]
    fn test_normalized_range() {
        let mut path = PathTracker::new();
        for cmd in [
            DriveCommand::Forward,
            DriveCommand::Left,
            DriveCommand::Backward,
            DriveCommand::Backward,
            DriveCommand::Right,
            DriveCommand::Right,
        ] {
            path.advance(cmd);
        }
        let normalized = path.normalized();
        assert_eq!(normalized.len(), path.points().count());
        for &(x, y) in &normalized {
            assert!((0.0..=100.0).contains(&x), "x out of range: {}", x);
            assert!((0.0..=100.0).contains(&y), "y out of range: {}", y);
        }
    }

    #[test]
    fn test_normalized_degenerate_axis() {
        // Only vertical movement: x has no spread and must map to 0.
        let mut path = PathTracker::new();
        path.advance(DriveCommand::Forward);
        path.advance(DriveCommand::Forward);

        let normalized = path.normalized();
        for &(x, _) in &normalized {
            assert_eq!(x, 0.0);
        }
        // y spans -20..0 and still fills the axis.
        assert_eq!(normalized[0].1, 100.0);
        assert_eq!(normalized[2].1, 0.0);
    }

    #[test]
    fn test_normalized_single_point() {
        let path = PathTracker::new();
        assert_eq!(path.normalized(), vec![(0.0, 0.0)]);
    }

    #[test]
    fn test_normalized_known_values() {
        let mut path = PathTracker::new();
        path.advance(DriveCommand::Forward);
        path.advance(DriveCommand::Backward);
        path.advance(DriveCommand::Right);

        // Raw: (0,0) (0,-10) (0,0) (10,0); x range 10, y range 10.
        let normalized = path.normalized();
        assert_eq!(
            normalized,
            vec![(0.0, 100.0), (0.0, 0.0), (0.0, 100.0), (100.0, 100.0)],
        );
    }
}
