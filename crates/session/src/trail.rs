use std::collections::VecDeque;

use pendel_core::Point;

/// Bounded history of recent bob positions, oldest first.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Trail {
    points: VecDeque<Point>,
}

impl Trail {
    /// Creates an empty trail.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a point, then evicts the oldest points beyond `capacity`.
    ///
    /// A lowered capacity takes effect on the next push.
    pub fn push(&mut self, point: Point, capacity: usize) {
        self.points.push_back(point);
        while self.points.len() > capacity {
            self.points.pop_front();
        }
    }

    /// Removes every point.
    pub fn clear(&mut self) {
        self.points.clear();
    }

    /// Number of points held.
    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Returns `true` if no points are held.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Most recent point.
    #[must_use]
    pub fn last(&self) -> Option<Point> {
        self.points.back().copied()
    }

    /// Copies the points out, oldest first.
    #[must_use]
    pub fn to_vec(&self) -> Vec<Point> {
        self.points.iter().copied().collect()
    }
}
