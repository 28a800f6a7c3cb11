use crate::math::{straight_line, Point2d};
use crate::Street;

/// What a route minimises.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RouteMode {
    /// The length of the route, in cm.
    #[default]
    Distance,
    /// The time taken to drive the route at the speed limit, in s.
    Time,
}

/// Computes travel costs and the A* heuristic for one search.
#[derive(Clone, Copy, Debug)]
pub(crate) struct CostModel {
    mode: RouteMode,
    /// The fastest any vehicle may travel, in cm/s.
    speed_cap: f64,
    /// The point the search is heading for.
    target: Point2d,
}

impl CostModel {
    pub fn new(mode: RouteMode, speed_cap: f64, target: Point2d) -> Self {
        Self {
            mode,
            speed_cap,
            target,
        }
    }

    /// The cost of driving `length` cm along a street with an extra `penalty` cm.
    /// Returns `None` if the street cannot be driven.
    pub fn travel(&self, street: &Street, length: f64, penalty: u32) -> Option<f64> {
        if !street.is_drivable() {
            return None;
        }
        let dist = length + penalty as f64;
        match self.mode {
            RouteMode::Distance => Some(dist),
            RouteMode::Time => {
                let speed = f64::min(street.speed_limit? as f64, self.speed_cap);
                Some(dist / speed)
            }
        }
    }

    /// A lower bound on the cost of reaching the target from `pos`.
    pub fn heuristic(&self, pos: Point2d) -> f64 {
        let dist = straight_line(pos, self.target);
        match self.mode {
            RouteMode::Distance => dist,
            RouteMode::Time => dist / self.speed_cap,
        }
    }
}
