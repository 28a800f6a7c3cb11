//! Networks and reference route costs shared by the integration tests.

#![allow(dead_code)]

use rand::{Rng, SeedableRng};
use traffic_router::{
    Direction, NodeId, Oneway, Penalty, PenaltyDirection, RoadGraph, RoadNetwork, RouteMode,
    RouteRequest, StreetAttributes, StreetId,
};

/// The four corner network:
///
/// ```text
/// D ---- C
/// |      |
/// A ---- B
/// ```
///
/// Every street is 10 m long; D-C has half the speed limit of the others.
pub struct Square {
    pub net: RoadNetwork,
    pub a: NodeId,
    pub b: NodeId,
    pub c: NodeId,
    pub d: NodeId,
    pub ab: StreetId,
    pub bc: StreetId,
    pub ad: StreetId,
    pub dc: StreetId,
}

impl Square {
    pub fn new() -> Self {
        Self::with_oneway(Oneway::Both)
    }

    /// Builds the square with the given restriction on the A-B street.
    pub fn with_oneway(ab_oneway: Oneway) -> Self {
        let mut net = RoadNetwork::new();
        let a = net.add_node(0, 0);
        let b = net.add_node(1000, 0);
        let c = net.add_node(1000, 1000);
        let d = net.add_node(0, 1000);
        let mut street = |start, end, speed_limit, oneway| {
            net.add_street(&StreetAttributes {
                start,
                end,
                length: Some(1000),
                speed_limit: Some(speed_limit),
                oneway,
            })
        };
        let ab = street(a, b, 1000, ab_oneway);
        let bc = street(b, c, 1000, Oneway::Both);
        let ad = street(a, d, 1000, Oneway::Both);
        let dc = street(d, c, 500, Oneway::Both);
        Self {
            net,
            a,
            b,
            c,
            d,
            ab,
            bc,
            ad,
            dc,
        }
    }
}

/// Builds a random network whose street lengths are never shorter than the
/// straight-line distance between their ends.
pub fn random_network(seed: u64, num_nodes: usize, num_streets: usize) -> (RoadNetwork, Vec<StreetId>) {
    let mut rng = rand::rngs::StdRng::seed_from_u64(seed);
    let mut net = RoadNetwork::new();
    let nodes = (0..num_nodes)
        .map(|_| net.add_node(rng.gen_range(0..20_000), rng.gen_range(0..20_000)))
        .collect::<Vec<_>>();

    let mut streets = vec![];
    while streets.len() < num_streets {
        let start = nodes[rng.gen_range(0..num_nodes)];
        let end = nodes[rng.gen_range(0..num_nodes)];
        if start == end {
            continue;
        }
        let dist = net
            .node_position(start)
            .zip(net.node_position(end))
            .map(|(p, q)| traffic_router::math::straight_line(p, q).ceil() as u32)
            .unwrap_or(0);
        let oneway = match rng.gen_range(0..6) {
            0 => Oneway::Forward,
            1 => Oneway::Backward,
            _ => Oneway::Both,
        };
        let speed_limit = match rng.gen_range(0..12) {
            0 => None,
            _ => Some(rng.gen_range(500..3000)),
        };
        streets.push(net.add_street(&StreetAttributes {
            start,
            end,
            length: Some(dist + rng.gen_range(0..2000)),
            speed_limit,
            oneway,
        }));
    }
    (net, streets)
}

/// A state of the brute-force reference search.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum State {
    Origin,
    Node(NodeId),
    Target,
}

/// The largest active penalty for travelling a street in the given direction.
fn penalty(penalties: &[Penalty], now: Option<f64>, street: StreetId, forward: bool) -> u32 {
    penalties
        .iter()
        .filter(|p| p.street == street)
        .filter(|p| p.expires_at.zip(now).map_or(true, |(expires_at, now)| now < expires_at))
        .filter(|p| match p.direction {
            PenaltyDirection::Both => true,
            PenaltyDirection::Forward => forward,
            PenaltyDirection::Backward => !forward,
        })
        .map(|p| p.magnitude)
        .max()
        .unwrap_or(0)
}

/// Every transition of the reference search, with its cost.
pub fn reference_edges(net: &RoadNetwork, request: &RouteRequest) -> Vec<(State, State, f64)> {
    let cost = |street: StreetId, dist: f64, penalty: u32| -> Option<f64> {
        let street = net.street(street)?;
        let speed = street.speed_limit.filter(|s| *s > 0)? as f64;
        let dist = dist + penalty as f64;
        Some(match request.mode {
            RouteMode::Distance => dist,
            RouteMode::Time => dist / f64::min(speed, request.speed_cap),
        })
    };

    let mut edges = vec![];
    let origin = net.street(request.origin.street).unwrap();
    let target = net.street(request.target.street).unwrap();
    let o = request.origin.offset as f64;
    let t = request.target.offset as f64;
    let via_start = match request.direction {
        Direction::Either => origin.allows(false),
        Direction::Forward => true,
        Direction::Backward => false,
    };
    let via_end = match request.direction {
        Direction::Either => origin.allows(true),
        Direction::Forward => false,
        Direction::Backward => true,
    };

    if via_start {
        if let Some(c) = cost(request.origin.street, o, 0) {
            edges.push((State::Origin, State::Node(origin.start), c));
        }
    }
    if via_end {
        if let Some(c) = cost(request.origin.street, origin.length as f64 - o, 0) {
            edges.push((State::Origin, State::Node(origin.end), c));
        }
    }
    if request.origin.street == request.target.street {
        let permitted = if t < o {
            via_start
        } else if t > o {
            via_end
        } else {
            true
        };
        if permitted {
            if let Some(c) = cost(request.origin.street, (t - o).abs(), 0) {
                edges.push((State::Origin, State::Target, c));
            }
        }
    }

    for idx in 0..net.node_count() {
        let node = NodeId(idx as u32);
        for traversal in net.outgoing(node) {
            let street = net.street(traversal.street).unwrap();
            let p = penalty(request.penalties, request.now, traversal.street, traversal.forward);
            if let Some(c) = cost(traversal.street, street.length as f64, p) {
                edges.push((State::Node(node), State::Node(traversal.to), c));
            }
        }
    }

    let target_street = request.target.street;
    if target.allows(true) {
        let p = penalty(request.penalties, request.now, target_street, true);
        if let Some(c) = cost(target_street, t, p) {
            edges.push((State::Node(target.start), State::Target, c));
        }
    }
    if target.allows(false) {
        let p = penalty(request.penalties, request.now, target_street, false);
        if let Some(c) = cost(target_street, target.length as f64 - t, p) {
            edges.push((State::Node(target.end), State::Target, c));
        }
    }
    edges
}

/// The cheapest route cost according to Bellman-Ford, or `None` if unreachable.
pub fn bellman_ford(net: &RoadNetwork, request: &RouteRequest) -> Option<f64> {
    let edges = reference_edges(net, request);
    let index = |state: State| match state {
        State::Origin => 0,
        State::Target => 1,
        State::Node(node) => node.index() + 2,
    };
    let mut dist = vec![f64::INFINITY; net.node_count() + 2];
    dist[0] = 0.0;
    for _ in 0..dist.len() {
        let mut changed = false;
        for (from, to, cost) in &edges {
            let candidate = dist[index(*from)] + cost;
            if candidate < dist[index(*to)] {
                dist[index(*to)] = candidate;
                changed = true;
            }
        }
        if !changed {
            break;
        }
    }
    Some(dist[1]).filter(|d| d.is_finite())
}

/// The shortest route length according to Dijkstra's algorithm.
/// Only meaningful for [RouteMode::Distance], where every cost is a whole number.
pub fn dijkstra_distance(net: &RoadNetwork, request: &RouteRequest) -> Option<u64> {
    let edges = reference_edges(net, request);
    pathfinding::directed::dijkstra::dijkstra(
        &State::Origin,
        |state| {
            edges
                .iter()
                .filter(|(from, _, _)| from == state)
                .map(|(_, to, cost)| (*to, *cost as u64))
                .collect::<Vec<_>>()
        },
        |state| *state == State::Target,
    )
    .map(|(_, cost)| cost)
}
