//! Default IPv4 route resolution from the Linux kernel route table.
//!
//! Reads `/proc/net/route`, picks the default route and reports its
//! interface and gateway as a dotted-quad address.

pub mod config;
pub mod error;
pub mod routes;

pub use error::{RouteError, RouteResult};
pub use routes::resolver::DefaultRouteResolver;
pub use routes::{DefaultRoute, RouteRecord, RouteTable, Selection};
