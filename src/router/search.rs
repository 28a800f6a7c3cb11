//! The A* search itself.
//!
//! Routes start and end part-way along streets, so the search is seeded with
//! the ends of the origin street and finishes at an end of the target street.
//! When a target street end is first popped from the frontier its cost is
//! topped up with the final stretch to the target point and it is pushed back;
//! the route is only complete once such a corrected node is popped again, since
//! the other end of the target street may still turn out to be cheaper.

use super::cost::CostModel;
use super::frontier::PriorityFrontier;
use super::penalty::PenaltyTable;
use super::pool::TableLease;
use super::state::SearchNode;
use super::Route;
use crate::{NodeId, RoadGraph, RouteError, StreetId, Traversal};
use arrayvec::ArrayVec;
use itertools::unfold;

/// An end of the origin or target street.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(super) struct Endpoint {
    pub node: NodeId,
    /// The cost of travelling between the node and the street position.
    pub cost: f64,
}

/// Everything a search needs besides the road network.
pub(super) struct SearchPlan {
    pub origin: StreetId,
    pub target: StreetId,
    /// The nodes the search starts from.
    pub seeds: ArrayVec<Endpoint, 2>,
    /// The nodes from which the target position can be reached.
    pub terminals: ArrayVec<Endpoint, 2>,
    /// The cost of staying on the origin street, if it is also the target street.
    pub direct: Option<f64>,
    pub model: CostModel,
    pub penalties: PenaltyTable,
}

/// Adds an endpoint, keeping the cheaper cost if the node is already present.
pub(super) fn push_endpoint(list: &mut ArrayVec<Endpoint, 2>, node: NodeId, cost: Option<f64>) {
    let Some(cost) = cost else {
        return;
    };
    match list.iter_mut().find(|e| e.node == node) {
        Some(existing) => existing.cost = f64::min(existing.cost, cost),
        None => list.push(Endpoint { node, cost }),
    }
}

/// Runs an A* search, returning the cheapest route or `None` if the target
/// is unreachable.
pub(super) fn run<G: RoadGraph>(
    graph: &G,
    table: &mut TableLease,
    plan: &SearchPlan,
    max_expansions: Option<usize>,
) -> Result<Option<Route>, RouteError> {
    let generation = table.generation();
    table.reserve_nodes(graph.node_bound());
    log::trace!(
        "Search generation {} on a table of {} nodes",
        generation,
        table.capacity()
    );
    let mut frontier = PriorityFrontier::new();

    for seed in &plan.seeds {
        let Some(pos) = graph.node_position(seed.node) else {
            continue;
        };
        let f = seed.cost + plan.model.heuristic(pos);
        let state = SearchNode {
            g: seed.cost,
            f,
            in_open: true,
            ..SearchNode::fresh(seed.node, generation)
        };
        table.put(seed.node, state);
        frontier.insert(seed.node, f);
    }

    let mut expanded = 0;
    loop {
        if let Some(cost) = plan.direct {
            if frontier.is_empty() || frontier.peek_key() >= Some(cost) {
                return Ok(Some(Route::direct(plan.origin, cost)));
            }
        }

        let Some((node, _)) = frontier.extract_min() else {
            break;
        };
        let state = *table.entry(node, generation);
        if state.arrived {
            log::trace!("Reached target via node {} after {} expansions", node.0, expanded);
            return Ok(Some(reconstruct(table, plan, node)));
        }

        if max_expansions.map_or(false, |max| expanded >= max) {
            return Err(RouteError::ExpansionLimit { expanded });
        }
        expanded += 1;
        log::trace!(
            "Expanding node {} (g = {:.2}, f = {:.2}, frontier = {})",
            node.0,
            state.g,
            state.f,
            frontier.len()
        );

        let slot = table.entry(node, generation);
        slot.in_open = false;
        slot.in_closed = true;

        for traversal in graph.outgoing(node) {
            relax(graph, table, &mut frontier, plan, &state, traversal);
        }

        if let Some(terminal) = plan.terminals.iter().find(|t| t.node == node) {
            let slot = table.entry(node, generation);
            slot.g += terminal.cost;
            slot.f = slot.g;
            slot.arrived = true;
            slot.in_closed = false;
            slot.in_open = true;
            frontier.insert(node, slot.f);
        }
    }

    log::trace!("Frontier exhausted after {} expansions", expanded);
    Ok(None)
}

/// Considers reaching a neighbouring node along a street.
fn relax<G: RoadGraph>(
    graph: &G,
    table: &mut TableLease,
    frontier: &mut PriorityFrontier,
    plan: &SearchPlan,
    from: &SearchNode,
    traversal: &Traversal,
) {
    let Some(street) = graph.street(traversal.street) else {
        return;
    };
    let penalty = plan.penalties.get(traversal.street, traversal.forward);
    let Some(step) = plan.model.travel(street, street.length as f64, penalty) else {
        return;
    };
    let Some(pos) = graph.node_position(traversal.to) else {
        return;
    };
    let g = from.g + step;
    let f = g + plan.model.heuristic(pos);
    if !f.is_finite() {
        log::warn!("Skipping street {:?} with non-finite cost", traversal.street);
        return;
    }

    let generation = table.generation();
    let next = table.entry(traversal.to, generation);
    if next.in_closed || next.arrived {
        return;
    }
    if next.in_open && f >= next.f {
        return;
    }

    next.g = g;
    next.f = f;
    next.predecessor = Some(from.node);
    next.via = Some(traversal.street);
    if next.in_open {
        if !frontier.decrease_key(traversal.to, f) {
            log::warn!("Open node {} is missing from the frontier", traversal.to.0);
            frontier.insert(traversal.to, f);
        }
    } else {
        next.in_open = true;
        frontier.insert(traversal.to, f);
    }
}

/// Follows the predecessor links back from the node the target was reached from.
fn reconstruct(table: &TableLease, plan: &SearchPlan, last: NodeId) -> Route {
    let generation = table.generation();
    let mut steps = unfold(Some(last), |next| {
        let node = (*next)?;
        let state = table.get(node, generation)?;
        *next = state.predecessor;
        Some((node, state.via, state.g))
    })
    .collect::<Vec<_>>();
    let cost = steps.first().map(|s| s.2).unwrap_or(0.0);
    steps.reverse();

    let nodes = steps.iter().map(|s| s.0).collect();
    let streets = std::iter::once(plan.origin)
        .chain(steps.iter().filter_map(|s| s.1))
        .chain(std::iter::once(plan.target))
        .collect();

    Route {
        nodes,
        streets,
        cost,
    }
}
