// Route lookup engine with longest prefix matching

use super::{RTF_REJECT, RouteRecord};
use std::net::Ipv4Addr;

pub struct RouteEngine<'a> {
    routes: &'a [RouteRecord],
}

impl<'a> RouteEngine<'a> {
    pub fn new(routes: &'a [RouteRecord]) -> Self {
        RouteEngine { routes }
    }

    /// Find the best matching route for a destination using longest prefix matching.
    /// Equal prefixes are decided by the lower metric, then table order.
    pub fn lookup(&self, dest: Ipv4Addr) -> Option<&'a RouteRecord> {
        let mut best_match: Option<&'a RouteRecord> = None;

        for route in self.routes {
            if route.has_flag(RTF_REJECT) || !matches_prefix(route, dest) {
                continue;
            }
            match best_match {
                None => best_match = Some(route),
                Some(current) if outranks(route, current) => best_match = Some(route),
                _ => {}
            }
        }

        best_match
    }

    /// Reachable default route with the lowest metric, first one on ties.
    /// Positional selection never builds an engine, see `resolver::resolve_str`.
    pub fn default_route(&self) -> Option<&'a RouteRecord> {
        self.routes
            .iter()
            .filter(|r| r.is_default() && !r.has_flag(RTF_REJECT))
            .min_by_key(|r| r.metric)
    }
}

fn outranks(candidate: &RouteRecord, current: &RouteRecord) -> bool {
    let (cand_len, cur_len) = (candidate.prefix_len(), current.prefix_len());
    cand_len > cur_len || (cand_len == cur_len && candidate.metric < current.metric)
}

fn matches_prefix(route: &RouteRecord, addr: Ipv4Addr) -> bool {
    let mask = u32::from(route.mask);
    (u32::from(route.destination) & mask) == (u32::from(addr) & mask)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routes::parser::parse_route_table;

    const TABLE: &str = "Iface\tDestination\tGateway \tFlags\tRefCnt\tUse\tMetric\tMask\t\tMTU\tWindow\tIRTT
eth0\t0001A8C0\t00000000\t0001\t0\t0\t100\t00FFFFFF\t0\t0\t0
eth0\t00000000\t0101A8C0\t0003\t0\t0\t100\t00000000\t0\t0\t0
wlan0\t00000000\t0100000A\t0003\t0\t0\t600\t00000000\t0\t0\t0
eth1\t0000000A\t00000000\t0001\t0\t0\t0\t000000FF\t0\t0\t0
eth1\t0100000A\t00000000\t0201\t0\t0\t0\tFFFFFFFF\t0\t0\t0
";

    #[test]
    fn test_longest_prefix_wins() {
        let routes = parse_route_table(TABLE).unwrap();
        let engine = RouteEngine::new(&routes);

        let hit = engine.lookup(Ipv4Addr::new(192, 168, 1, 20)).unwrap();
        assert_eq!(hit.prefix_len(), 24);

        let hit = engine.lookup(Ipv4Addr::new(10, 9, 8, 7)).unwrap();
        assert_eq!(hit.interface, "eth1");
    }

    #[test]
    fn test_default_fallback_prefers_lower_metric() {
        let routes = parse_route_table(TABLE).unwrap();
        let engine = RouteEngine::new(&routes);

        let hit = engine.lookup(Ipv4Addr::new(8, 8, 8, 8)).unwrap();
        assert_eq!(hit.interface, "eth0");
        assert_eq!(hit.gateway, Ipv4Addr::new(192, 168, 1, 1));
    }

    #[test]
    fn test_reject_route_skipped() {
        let routes = parse_route_table(TABLE).unwrap();
        let engine = RouteEngine::new(&routes);

        // 10.0.0.1/32 is a reject route; the /8 covers it instead
        let hit = engine.lookup(Ipv4Addr::new(10, 0, 0, 1)).unwrap();
        assert_eq!(hit.prefix_len(), 8);
    }

    #[test]
    fn test_default_route_lowest_metric() {
        let routes = parse_route_table(TABLE).unwrap();
        let engine = RouteEngine::new(&routes);

        let lowest = engine.default_route().unwrap();
        assert_eq!((lowest.interface.as_str(), lowest.metric), ("eth0", 100));
    }

    #[test]
    fn test_default_route_skips_reject() {
        let table = format!("{}*\t00000000\t00000000\t0201\t0\t0\t10\t00000000\t0\t0\t0\n", TABLE);
        let routes = parse_route_table(&table).unwrap();
        let engine = RouteEngine::new(&routes);

        let chosen = engine.default_route().unwrap();
        let looked_up = engine.lookup(Ipv4Addr::new(8, 8, 8, 8)).unwrap();
        assert_eq!(chosen.interface, "eth0");
        assert_eq!(chosen, looked_up);
    }

    #[test]
    fn test_empty_table() {
        let engine = RouteEngine::new(&[]);
        assert!(engine.lookup(Ipv4Addr::new(1, 1, 1, 1)).is_none());
        assert!(engine.default_route().is_none());
    }
}
