use thiserror::Error;

/// The ways a route request can fail.
///
/// An unreachable destination is not an error; see [Router::route](crate::Router::route).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RouteError {
    #[error("Invalid route request: {0}")]
    InvalidArgument(String),
    #[error("Search gave up after expanding {expanded} nodes")]
    ExpansionLimit { expanded: usize },
}
