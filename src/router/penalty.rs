use crate::StreetId;
use slotmap::SparseSecondaryMap;

/// A temporary extra cost for travelling along a street,
/// e.g. due to congestion or a blocked lane.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Penalty {
    /// The penalised street.
    pub street: StreetId,
    /// The direction of travel the penalty applies to.
    pub direction: PenaltyDirection,
    /// The extra cost as an equivalent distance in cm.
    pub magnitude: u32,
    /// The simulation time in seconds from which the penalty no longer applies.
    /// `None` means it never expires.
    pub expires_at: Option<f64>,
}

impl Penalty {
    /// Whether the penalty still applies at time `now`.
    /// Every penalty applies when the time is unknown.
    pub fn is_active(&self, now: Option<f64>) -> bool {
        match (self.expires_at, now) {
            (Some(expires_at), Some(now)) => now < expires_at,
            _ => true,
        }
    }
}

/// The direction of travel a [Penalty] applies to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PenaltyDirection {
    /// Travel in either direction.
    Both,
    /// Travel from the street's start node to its end node.
    Forward,
    /// Travel from the street's end node to its start node.
    Backward,
}

impl PenaltyDirection {
    fn applies_to(self, forward: bool) -> bool {
        match self {
            PenaltyDirection::Both => true,
            PenaltyDirection::Forward => forward,
            PenaltyDirection::Backward => !forward,
        }
    }
}

/// The penalties of a single search, looked up by street.
/// Overlapping penalties don't stack; the largest one applies.
#[derive(Clone, Debug, Default)]
pub(crate) struct PenaltyTable {
    /// The largest forward and backward penalty of each penalised street.
    streets: SparseSecondaryMap<StreetId, [u32; 2]>,
}

impl PenaltyTable {
    /// Collects the penalties still active at time `now`.
    pub fn new(penalties: &[Penalty], now: Option<f64>) -> Self {
        let mut streets = SparseSecondaryMap::new();
        for penalty in penalties.iter().filter(|p| p.is_active(now)) {
            let Some(entry) = streets.entry(penalty.street) else {
                continue;
            };
            let max = entry.or_insert([0, 0]);
            for (idx, forward) in [true, false].into_iter().enumerate() {
                if penalty.direction.applies_to(forward) {
                    max[idx] = u32::max(max[idx], penalty.magnitude);
                }
            }
        }
        Self { streets }
    }

    /// The penalty for travelling along a street in the given direction, in cm.
    pub fn get(&self, street: StreetId, forward: bool) -> u32 {
        self.streets
            .get(street)
            .map(|max| max[if forward { 0 } else { 1 }])
            .unwrap_or(0)
    }
}
