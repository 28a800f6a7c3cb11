use crate::{NodeId, StreetId};

/// A search run's tag on the node states it has written.
pub type Generation = u32;

/// The generation stamped on slots which have never been written.
const NEVER: Generation = 0;

/// The generation of the first run on a freshly created table.
pub const FIRST_GENERATION: Generation = 1;

/// The transient state of one node during a search.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct SearchNode {
    /// The node this state shadows.
    pub node: NodeId,
    /// The cost of the best known route from the origin.
    pub g: f64,
    /// `g` plus the estimated remaining cost to the target.
    pub f: f64,
    /// Whether the node is in the frontier.
    pub in_open: bool,
    /// Whether the node's cost is final.
    pub in_closed: bool,
    /// Whether `g` already includes the final stretch to the target point.
    pub arrived: bool,
    /// The node this one was reached from.
    pub predecessor: Option<NodeId>,
    /// The street travelled from the predecessor.
    pub via: Option<StreetId>,
    /// The run which last wrote this slot.
    pub generation: Generation,
}

impl SearchNode {
    /// The state of a node the current run has not yet visited.
    pub fn fresh(node: NodeId, generation: Generation) -> Self {
        Self {
            node,
            g: f64::INFINITY,
            f: f64::INFINITY,
            in_open: false,
            in_closed: false,
            arrived: false,
            predecessor: None,
            via: None,
            generation,
        }
    }
}

/// Node states for a single search, indexed by [NodeId].
///
/// Slots are never cleared. Instead each slot records the generation of the run
/// that wrote it, and anything written by an older run reads as unvisited.
#[derive(Clone, Debug, Default)]
pub struct NodeStateTable {
    slots: Vec<SearchNode>,
}

impl NodeStateTable {
    /// Creates an empty table.
    pub fn new() -> Self {
        Default::default()
    }

    /// The number of nodes the table can hold without growing.
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Grows the table so it can hold node IDs below `bound`.
    pub fn reserve_nodes(&mut self, bound: usize) {
        if bound > self.slots.len() {
            let len = self.slots.len();
            self.slots
                .extend((len..bound).map(|idx| SearchNode::fresh(NodeId(idx as u32), NEVER)));
        }
    }

    /// Gets the state of a node written during the given run, if any.
    pub(crate) fn get(&self, node: NodeId, generation: Generation) -> Option<&SearchNode> {
        self.slots
            .get(node.index())
            .filter(|slot| slot.generation == generation)
    }

    /// Gets the state of a node for the given run, resetting it first if it was
    /// written by an older run.
    pub(crate) fn entry(&mut self, node: NodeId, generation: Generation) -> &mut SearchNode {
        self.reserve_nodes(node.index() + 1);
        let slot = &mut self.slots[node.index()];
        if slot.generation != generation {
            *slot = SearchNode::fresh(node, generation);
        }
        slot
    }

    /// Stores the state of a node, growing the table if needed.
    pub(crate) fn put(&mut self, node: NodeId, state: SearchNode) {
        self.reserve_nodes(node.index() + 1);
        self.slots[node.index()] = state;
    }
}
