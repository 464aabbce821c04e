//! Radial layout.
//!
//! One optional anchor node sits at the center; every other node is spaced
//! evenly on a circle around it, in the order given. Positions depend only on
//! node order and on which node (if any) is the anchor.

use crate::config::LayoutConfig;
use serde::{Deserialize, Serialize};
use std::f64::consts::TAU;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn distance_to(&self, other: &Position) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RadialLayout {
    pub center: Position,
    pub radius: f64,
}

impl RadialLayout {
    pub fn new(config: &LayoutConfig) -> Self {
        Self {
            center: Position { x: config.center_x, y: config.center_y },
            radius: config.radius,
        }
    }

    /// Positions for `count` nodes, index-aligned with the input order.
    ///
    /// `anchor` is the index of the node to center. An out-of-range anchor is
    /// treated as no anchor, in which case every node goes on the ring.
    pub fn arrange(&self, count: usize, anchor: Option<usize>) -> Vec<Position> {
        let anchor = anchor.filter(|&i| i < count);
        let ring_size = count - usize::from(anchor.is_some());
        let mut slot = 0;

        (0..count)
            .map(|i| {
                if Some(i) == anchor {
                    self.center
                } else {
                    let position = self.ring_position(slot, ring_size);
                    slot += 1;
                    position
                }
            })
            .collect()
    }

    /// Position of ring slot `index` out of `ring_size` at angle `index * 2π / ring_size`.
    pub fn ring_position(&self, index: usize, ring_size: usize) -> Position {
        if ring_size == 0 {
            return self.center;
        }
        let angle = index as f64 * (TAU / ring_size as f64);
        Position {
            x: self.center.x + angle.cos() * self.radius,
            y: self.center.y + angle.sin() * self.radius,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn layout() -> RadialLayout {
        RadialLayout::new(&LayoutConfig::default())
    }

    #[test]
    fn empty_input_has_no_positions() {
        assert!(layout().arrange(0, None).is_empty());
        assert!(layout().arrange(0, Some(0)).is_empty());
    }

    #[test]
    fn lone_anchor_sits_at_center() {
        let positions = layout().arrange(1, Some(0));
        assert_eq!(positions, vec![Position { x: 400.0, y: 300.0 }]);
    }

    #[test]
    fn anchor_plus_two_places_others_opposite() {
        let l = layout();
        let positions = l.arrange(3, Some(1));

        assert_eq!(positions[1], l.center);
        assert!((positions[0].x - 600.0).abs() < EPS && (positions[0].y - 300.0).abs() < EPS);
        assert!((positions[2].x - 200.0).abs() < EPS && (positions[2].y - 300.0).abs() < EPS);
        for p in [positions[0], positions[2]] {
            assert!((p.distance_to(&l.center) - 200.0).abs() < EPS);
        }
    }

    #[test]
    fn without_anchor_everyone_is_on_the_ring() {
        let l = layout();
        let positions = l.arrange(4, None);
        for p in &positions {
            assert!((p.distance_to(&l.center) - l.radius).abs() < EPS);
        }
        // Quarter turns: right, down, left, up in screen coordinates.
        assert!((positions[1].y - 500.0).abs() < EPS);
        assert!((positions[3].y - 100.0).abs() < EPS);
    }

    #[test]
    fn out_of_range_anchor_is_ignored() {
        let l = layout();
        assert_eq!(l.arrange(2, Some(7)), l.arrange(2, None));
    }
}
