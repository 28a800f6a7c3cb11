//! A fast A* routing engine for vehicular traffic simulations.

pub use cgmath;
pub use config::RouterConfig;
pub use error::RouteError;
pub use network::{NodeId, Oneway, RoadGraph, RoadNetwork, Street, StreetAttributes, Traversal};
pub use router::{
    Direction, NodeStateTablePool, Penalty, PenaltyDirection, Route, RouteMode, RouteRequest,
    Router, StreetPosition,
};
use slotmap::new_key_type;
pub use slotmap::{Key, KeyData};

mod config;
mod error;
pub mod math;
mod network;
mod router;

new_key_type! {
    /// Unique ID of a [Street].
    pub struct StreetId;
}
