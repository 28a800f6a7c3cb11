use self::cost::CostModel;
use self::penalty::PenaltyTable;
use self::search::SearchPlan;
use crate::math::{lerp, Point2d};
use crate::{NodeId, RoadGraph, RouteError, RouterConfig, Street, StreetId};
use arrayvec::ArrayVec;
pub use cost::RouteMode;
pub use penalty::{Penalty, PenaltyDirection};
pub use pool::NodeStateTablePool;
use std::sync::Arc;

mod cost;
mod frontier;
mod penalty;
mod pool;
mod search;
mod state;

/// Finds routes through a road network.
///
/// A router may be shared between threads; concurrent searches only contend
/// briefly on the pool of node state tables.
#[derive(Debug)]
pub struct Router<G> {
    /// The road network.
    graph: Arc<G>,
    /// Node state tables recycled between searches.
    pool: NodeStateTablePool,
    config: RouterConfig,
}

/// A position along a street.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StreetPosition {
    /// The street the position lies on.
    pub street: StreetId,
    /// The distance from the street's start node in cm.
    pub offset: u32,
}

/// Which end of the origin street a route may leave through.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Direction {
    /// Either end the street's one-way restriction allows.
    #[default]
    Either,
    /// Through the street's start node.
    Forward,
    /// Through the street's end node.
    Backward,
}

/// The parameters of a route search.
#[derive(Clone, Copy, Debug)]
pub struct RouteRequest<'a> {
    /// What the route minimises.
    pub mode: RouteMode,
    /// Which end of the origin street the route may leave through.
    pub direction: Direction,
    /// Where the route starts.
    pub origin: StreetPosition,
    /// Where the route ends.
    pub target: StreetPosition,
    /// The world coordinates of `target` in cm.
    /// If `None`, the point is interpolated between the ends of the target street.
    pub target_point: Option<Point2d>,
    /// Temporary penalties to take into account.
    pub penalties: &'a [Penalty],
    /// The current simulation time in seconds, used to skip expired penalties.
    /// If `None`, every penalty applies.
    pub now: Option<f64>,
    /// The highest speed any vehicle may travel at in cm/s.
    /// Only used when `mode` is [RouteMode::Time].
    pub speed_cap: f64,
}

/// A route between two street positions.
#[derive(Clone, Debug, PartialEq)]
pub struct Route {
    /// The nodes passed through, in order.
    nodes: Vec<NodeId>,
    /// The streets travelled along, in order, starting with the origin street
    /// and ending with the target street.
    streets: Vec<StreetId>,
    /// The total cost of the route.
    cost: f64,
}

impl<G: RoadGraph> Router<G> {
    /// Creates a router for the given road network.
    pub fn new(graph: Arc<G>) -> Self {
        Self::with_config(graph, Default::default())
    }

    /// Creates a router with the given configuration.
    pub fn with_config(graph: Arc<G>, config: RouterConfig) -> Self {
        Self {
            graph,
            pool: NodeStateTablePool::new(config.pool_capacity),
            config,
        }
    }

    /// Gets the road network.
    pub fn graph(&self) -> &G {
        &self.graph
    }

    /// Gets the router's configuration.
    pub fn config(&self) -> &RouterConfig {
        &self.config
    }

    /// Gets the pool of node state tables.
    pub fn pool(&self) -> &NodeStateTablePool {
        &self.pool
    }

    /// Replaces the road network, e.g. after a new map is loaded.
    /// Pooled node state is discarded since node IDs may have changed.
    pub fn replace_graph(&mut self, graph: Arc<G>) {
        self.graph = graph;
        self.pool.clear();
    }

    /// Finds the best route between two street positions.
    ///
    /// Returns `Ok(None)` if the target can't be reached from the origin.
    pub fn route(&self, request: &RouteRequest) -> Result<Option<Route>, RouteError> {
        let plan = self.plan(request)?;
        let mut table = self.pool.lease();
        let route = search::run(&*self.graph, &mut table, &plan, self.config.max_expansions)?;

        match &route {
            Some(route) => log::debug!(
                "Found route with {} nodes and cost {:.2}",
                route.nodes.len(),
                route.cost
            ),
            None => log::debug!("No route to target street {:?}", request.target.street),
        }
        Ok(route)
    }

    /// Validates a request and works out where the search starts and ends.
    fn plan(&self, request: &RouteRequest) -> Result<SearchPlan, RouteError> {
        let origin = self.street_at(request.origin, "origin")?;
        let target = self.street_at(request.target, "target")?;

        if request.mode == RouteMode::Time
            && (request.speed_cap.is_nan() || request.speed_cap <= 0.0)
        {
            return Err(RouteError::InvalidArgument(format!(
                "speed cap must be positive, got {}",
                request.speed_cap
            )));
        }
        if let Some(penalty) = request
            .penalties
            .iter()
            .find(|p| self.graph.street(p.street).is_none())
        {
            return Err(RouteError::InvalidArgument(format!(
                "penalty on unknown street {:?}",
                penalty.street
            )));
        }

        let target_point = match request.target_point {
            Some(point) => point,
            None => self.interpolate(target, request.target.offset)?,
        };
        if !(target_point.x.is_finite() && target_point.y.is_finite()) {
            return Err(RouteError::InvalidArgument("target point is not finite".into()));
        }

        let model = CostModel::new(request.mode, request.speed_cap, target_point);
        let penalties = PenaltyTable::new(request.penalties, request.now);
        let origin_offset = request.origin.offset as f64;
        let target_offset = request.target.offset as f64;

        let mut seeds = ArrayVec::new();
        if request.direction.leaves_via_start(origin) {
            let cost = model.travel(origin, origin_offset, 0);
            search::push_endpoint(&mut seeds, origin.start, cost);
        }
        if request.direction.leaves_via_end(origin) {
            let cost = model.travel(origin, origin.length as f64 - origin_offset, 0);
            search::push_endpoint(&mut seeds, origin.end, cost);
        }

        let mut terminals = ArrayVec::new();
        if target.allows(true) {
            let penalty = penalties.get(request.target.street, true);
            let cost = model.travel(target, target_offset, penalty);
            search::push_endpoint(&mut terminals, target.start, cost);
        }
        if target.allows(false) {
            let penalty = penalties.get(request.target.street, false);
            let cost = model.travel(target, target.length as f64 - target_offset, penalty);
            search::push_endpoint(&mut terminals, target.end, cost);
        }

        let direct = if request.origin.street != request.target.street {
            None
        } else {
            let permitted = match request.target.offset.cmp(&request.origin.offset) {
                std::cmp::Ordering::Less => request.direction.leaves_via_start(origin),
                std::cmp::Ordering::Greater => request.direction.leaves_via_end(origin),
                std::cmp::Ordering::Equal => true,
            };
            let dist = (target_offset - origin_offset).abs();
            permitted.then(|| model.travel(origin, dist, 0)).flatten()
        };

        Ok(SearchPlan {
            origin: request.origin.street,
            target: request.target.street,
            seeds,
            terminals,
            direct,
            model,
            penalties,
        })
    }

    /// Looks up the street of a position, checking that it can be driven on.
    fn street_at(&self, pos: StreetPosition, what: &str) -> Result<&Street, RouteError> {
        let street = self.graph.street(pos.street).ok_or_else(|| {
            RouteError::InvalidArgument(format!("{} street {:?} does not exist", what, pos.street))
        })?;
        if !street.is_drivable() {
            return Err(RouteError::InvalidArgument(format!(
                "{} street {:?} is not drivable",
                what, pos.street
            )));
        }
        if pos.offset > street.length {
            return Err(RouteError::InvalidArgument(format!(
                "{} offset {} exceeds street length {}",
                what, pos.offset, street.length
            )));
        }
        Ok(street)
    }

    /// Estimates the world coordinates of a point along a street.
    fn interpolate(&self, street: &Street, offset: u32) -> Result<Point2d, RouteError> {
        let ends = [street.start, street.end].map(|node| self.graph.node_position(node));
        let [Some(start), Some(end)] = ends else {
            return Err(RouteError::InvalidArgument("target street has an unknown node".into()));
        };
        let t = if street.length == 0 {
            0.0
        } else {
            offset as f64 / street.length as f64
        };
        Ok(lerp(start, end, t))
    }
}

impl<'a> RouteRequest<'a> {
    /// Creates a request for the shortest route between two positions.
    pub fn new(origin: StreetPosition, target: StreetPosition) -> Self {
        Self {
            mode: RouteMode::Distance,
            direction: Direction::Either,
            origin,
            target,
            target_point: None,
            penalties: &[],
            now: None,
            speed_cap: f64::INFINITY,
        }
    }

    /// Sets what the route minimises.
    pub fn mode(self, mode: RouteMode) -> Self {
        Self { mode, ..self }
    }

    /// Sets which end of the origin street the route may leave through.
    pub fn direction(self, direction: Direction) -> Self {
        Self { direction, ..self }
    }

    /// Sets the penalties to take into account.
    pub fn penalties(self, penalties: &'a [Penalty]) -> Self {
        Self { penalties, ..self }
    }

    /// Sets the current simulation time, so that expired penalties are skipped.
    pub fn now(self, now: f64) -> Self {
        Self {
            now: Some(now),
            ..self
        }
    }

    /// Sets the highest speed any vehicle may travel at in cm/s.
    pub fn speed_cap(self, speed_cap: f64) -> Self {
        Self { speed_cap, ..self }
    }

    /// Sets the world coordinates of the target position.
    pub fn target_point(self, point: Point2d) -> Self {
        Self {
            target_point: Some(point),
            ..self
        }
    }
}

impl StreetPosition {
    /// Creates a position `offset` cm from the start of a street.
    pub fn new(street: StreetId, offset: u32) -> Self {
        Self { street, offset }
    }
}

impl Direction {
    /// Whether a route from `street` may leave through its start node.
    fn leaves_via_start(self, street: &Street) -> bool {
        match self {
            Direction::Either => street.allows(false),
            Direction::Forward => true,
            Direction::Backward => false,
        }
    }

    /// Whether a route from `street` may leave through its end node.
    fn leaves_via_end(self, street: &Street) -> bool {
        match self {
            Direction::Either => street.allows(true),
            Direction::Forward => false,
            Direction::Backward => true,
        }
    }
}

impl Route {
    /// A route which stays on a single street.
    fn direct(street: StreetId, cost: f64) -> Self {
        Self {
            nodes: vec![],
            streets: vec![street],
            cost,
        }
    }

    /// The nodes passed through, in order.
    /// Empty if the route stays on the origin street.
    pub fn nodes(&self) -> &[NodeId] {
        &self.nodes
    }

    /// The streets travelled along, in order,
    /// starting with the origin street and ending with the target street.
    pub fn streets(&self) -> &[StreetId] {
        &self.streets
    }

    /// The total cost of the route, in cm or s depending on the [RouteMode].
    pub fn cost(&self) -> f64 {
        self.cost
    }

    /// Whether the route stays on the origin street without passing a node.
    pub fn is_direct(&self) -> bool {
        self.nodes.is_empty()
    }
}
