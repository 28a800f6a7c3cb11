use crate::{NodeId, StreetId};

/// A street segment between two nodes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Street {
    /// The node at offset zero.
    pub start: NodeId,
    /// The node at offset `length`.
    pub end: NodeId,
    /// The length of the street in cm.
    pub length: u32,
    /// The speed limit in cm/s, or `None` if motor vehicles may not use the street.
    pub speed_limit: Option<u32>,
    /// Which directions the street may be travelled in.
    pub oneway: Oneway,
}

/// The one-way restriction of a street.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Oneway {
    /// The street may be travelled in both directions.
    #[default]
    Both,
    /// Only from `start` to `end`.
    Forward,
    /// Only from `end` to `start`.
    Backward,
}

/// One legal way of leaving a node along a street.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Traversal {
    /// The street being travelled.
    pub street: StreetId,
    /// The node at the far end of the street.
    pub to: NodeId,
    /// Whether the street is travelled from `start` to `end`.
    pub forward: bool,
}

impl Oneway {
    /// Whether travel is permitted in the given direction.
    pub fn allows(self, forward: bool) -> bool {
        match self {
            Oneway::Both => true,
            Oneway::Forward => forward,
            Oneway::Backward => !forward,
        }
    }
}

impl Street {
    /// Whether motor vehicles may use the street at all.
    pub fn is_drivable(&self) -> bool {
        matches!(self.speed_limit, Some(speed) if speed > 0)
    }

    /// Whether the street may be travelled in the given direction.
    pub fn allows(&self, forward: bool) -> bool {
        self.oneway.allows(forward)
    }

    /// The node reached by travelling the street in the given direction.
    pub fn far_node(&self, forward: bool) -> NodeId {
        if forward {
            self.end
        } else {
            self.start
        }
    }
}
