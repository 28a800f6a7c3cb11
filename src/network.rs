use crate::math::{point_cm, straight_line, Point2d};
use crate::StreetId;
use slotmap::SlotMap;
use smallvec::SmallVec;
pub use street::{Oneway, Street, Traversal};

mod street;

/// Unique ID of a node in the road network.
///
/// Node IDs are dense: a network with `n` nodes uses the IDs `0..n`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NodeId(pub u32);

impl NodeId {
    /// The ID as an index into a dense array.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// The read-only view of a road network used by the router.
pub trait RoadGraph {
    /// One more than the largest node ID in the network.
    fn node_bound(&self) -> usize;

    /// The coordinates of a node in cm, or `None` if there is no such node.
    fn node_position(&self, node: NodeId) -> Option<Point2d>;

    /// Gets a street by its ID.
    fn street(&self, id: StreetId) -> Option<&Street>;

    /// The streets which may legally be used to leave a node.
    /// Streets which are one-way in the other direction are not included.
    fn outgoing(&self, node: NodeId) -> &[Traversal];
}

/// The attributes of a street.
#[derive(Clone, Copy, Debug)]
pub struct StreetAttributes {
    /// The node at the start of the street.
    pub start: NodeId,
    /// The node at the end of the street.
    pub end: NodeId,
    /// The length of the street in cm.
    /// If `None`, the straight-line distance between the two nodes is used.
    pub length: Option<u32>,
    /// The speed limit in cm/s, or `None` if the street is not drivable.
    pub speed_limit: Option<u32>,
    /// The one-way restriction.
    pub oneway: Oneway,
}

/// A road network made of nodes joined by streets.
#[derive(Clone, Debug, Default)]
pub struct RoadNetwork {
    /// The nodes, indexed by [NodeId].
    nodes: Vec<Node>,
    /// The streets in the network.
    streets: SlotMap<StreetId, Street>,
    /// Incremented whenever a street is added or removed.
    version: u64,
}

#[derive(Clone, Debug)]
struct Node {
    /// The coordinates of the node in cm.
    pos: Point2d,
    /// The legal ways of leaving the node.
    out: SmallVec<[Traversal; 4]>,
}

impl RoadNetwork {
    /// Creates an empty road network.
    pub fn new() -> Self {
        Default::default()
    }

    /// Adds a node at the given coordinates in cm.
    pub fn add_node(&mut self, x: i32, y: i32) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(Node {
            pos: point_cm(x, y),
            out: SmallVec::new(),
        });
        id
    }

    /// Adds a street to the network.
    ///
    /// # Panics
    /// Panics if either end of the street is not a node in the network.
    pub fn add_street(&mut self, attributes: &StreetAttributes) -> StreetId {
        let start = self.nodes[attributes.start.index()].pos;
        let end = self.nodes[attributes.end.index()].pos;
        let length = attributes
            .length
            .unwrap_or_else(|| straight_line(start, end).ceil() as u32);
        let street = Street {
            start: attributes.start,
            end: attributes.end,
            length,
            speed_limit: attributes.speed_limit,
            oneway: attributes.oneway,
        };

        let id = self.streets.insert(street);
        for forward in [true, false] {
            if street.allows(forward) {
                let from = street.far_node(!forward);
                self.nodes[from.index()].out.push(Traversal {
                    street: id,
                    to: street.far_node(forward),
                    forward,
                });
            }
        }
        self.version += 1;
        id
    }

    /// Removes a street from the network, returning it if it existed.
    pub fn remove_street(&mut self, id: StreetId) -> Option<Street> {
        let street = self.streets.remove(id)?;
        for node in [street.start, street.end] {
            self.nodes[node.index()].out.retain(|t| t.street != id);
        }
        self.version += 1;
        Some(street)
    }

    /// The number of nodes in the network.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Returns an iterator over all the streets in the network.
    pub fn iter_streets(&self) -> impl Iterator<Item = (StreetId, &Street)> {
        self.streets.iter()
    }

    /// The highest speed limit of any drivable street in cm/s.
    pub fn max_speed_limit(&self) -> Option<u32> {
        self.streets.values().filter_map(|s| s.speed_limit).max()
    }

    /// A counter which changes whenever the topology of the network changes.
    pub fn version(&self) -> u64 {
        self.version
    }
}

impl RoadGraph for RoadNetwork {
    fn node_bound(&self) -> usize {
        self.nodes.len()
    }

    fn node_position(&self, node: NodeId) -> Option<Point2d> {
        self.nodes.get(node.index()).map(|n| n.pos)
    }

    fn street(&self, id: StreetId) -> Option<&Street> {
        self.streets.get(id)
    }

    fn outgoing(&self, node: NodeId) -> &[Traversal] {
        self.nodes
            .get(node.index())
            .map(|n| n.out.as_slice())
            .unwrap_or(&[])
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn street(start: NodeId, end: NodeId, oneway: Oneway) -> StreetAttributes {
        StreetAttributes {
            start,
            end,
            length: None,
            speed_limit: Some(1000),
            oneway,
        }
    }

    #[test]
    fn outgoing_respects_oneway() {
        let mut net = RoadNetwork::new();
        let a = net.add_node(0, 0);
        let b = net.add_node(300, 400);
        let c = net.add_node(300, 0);
        let ab = net.add_street(&street(a, b, Oneway::Forward));
        let bc = net.add_street(&street(b, c, Oneway::Both));
        let ca = net.add_street(&street(c, a, Oneway::Backward));

        assert_eq!(net.street(ab).unwrap().length, 500);
        assert_eq!(
            net.outgoing(a),
            &[
                Traversal { street: ab, to: b, forward: true },
                Traversal { street: ca, to: c, forward: false },
            ]
        );
        assert_eq!(net.outgoing(b), &[Traversal { street: bc, to: c, forward: true }]);
        assert_eq!(net.outgoing(c), &[Traversal { street: bc, to: b, forward: false }]);
    }

    #[test]
    fn remove_street_updates_topology() {
        let mut net = RoadNetwork::new();
        let a = net.add_node(0, 0);
        let b = net.add_node(100, 0);
        let ab = net.add_street(&street(a, b, Oneway::Both));
        let version = net.version();

        assert!(net.remove_street(ab).is_some());
        assert!(net.outgoing(a).is_empty());
        assert!(net.outgoing(b).is_empty());
        assert!(net.street(ab).is_none());
        assert_ne!(net.version(), version);
        assert!(net.remove_street(ab).is_none());
    }

    #[test]
    fn unknown_node_has_no_edges() {
        let net = RoadNetwork::new();
        assert!(net.outgoing(NodeId(7)).is_empty());
        assert!(net.node_position(NodeId(7)).is_none());
        assert_eq!(net.max_speed_limit(), None);
    }
}
