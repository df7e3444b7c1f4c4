// Default route resolution from the kernel route table

use super::lookup::RouteEngine;
use super::parser::{self, PROC_NET_ROUTE};
use super::{DefaultRoute, Selection};
use crate::error::RouteResult;
use std::path::{Path, PathBuf};

/// Finds the interface and gateway of the default route.
///
/// The table is read fresh on every call; nothing is cached.
#[derive(Debug, Clone)]
pub struct DefaultRouteResolver {
    table_path: PathBuf,
    selection: Selection,
}

impl Default for DefaultRouteResolver {
    fn default() -> Self {
        DefaultRouteResolver::new(PROC_NET_ROUTE, Selection::default())
    }
}

impl DefaultRouteResolver {
    pub fn new(table_path: impl Into<PathBuf>, selection: Selection) -> Self {
        DefaultRouteResolver {
            table_path: table_path.into(),
            selection,
        }
    }

    pub fn table_path(&self) -> &Path {
        &self.table_path
    }

    pub fn selection(&self) -> Selection {
        self.selection
    }

    /// Read the table and pick the default route.
    ///
    /// Returns `Ok(None)` when the table has no default route; whether that
    /// is fatal is up to the caller.
    pub fn resolve(&self) -> RouteResult<Option<DefaultRoute>> {
        tracing::debug!(
            "Resolving default route from {} ({:?})",
            self.table_path.display(),
            self.selection
        );
        let content = parser::read_source(&self.table_path)?;
        let route = resolve_str(&content, self.selection)?;

        match &route {
            Some(route) => tracing::info!(
                "Default route via {} dev {} metric {}",
                route.gateway,
                route.interface,
                route.metric
            ),
            None => tracing::warn!("No default route in {}", self.table_path.display()),
        }

        Ok(route)
    }
}

/// Pick the default route out of route table text
pub fn resolve_str(content: &str, selection: Selection) -> RouteResult<Option<DefaultRoute>> {
    match selection {
        // Only the first data line is looked at, later lines may be anything
        Selection::FirstEntry => match parser::data_lines(content).next() {
            Some((line_no, line)) => {
                let record = parser::parse_record(line, line_no)?;
                Ok(Some(DefaultRoute::from(&record)))
            }
            None => Ok(None),
        },
        Selection::LowestMetric => {
            let routes = parser::parse_route_table(content)?;
            Ok(RouteEngine::new(&routes).default_route().map(DefaultRoute::from))
        }
    }
}
