// Parser for the kernel IPv4 route table (/proc/net/route)
//
// Layout, one route per line after a header:
//   Iface  Destination  Gateway  Flags  RefCnt  Use  Metric  Mask  MTU  Window  IRTT
// Addresses and flags are hex, addresses in host (little-endian) byte order.
// Everything else is decimal.

use super::{RouteRecord, RouteTable};
use crate::error::{RouteError, RouteResult};
use std::net::Ipv4Addr;
use std::path::Path;

pub const PROC_NET_ROUTE: &str = "/proc/net/route";

/// Columns a line must have before it can name an interface and a gateway
pub const REQUIRED_COLUMNS: usize = 3;

const COLUMNS: [&str; 11] = [
    "iface",
    "destination",
    "gateway",
    "flags",
    "refcnt",
    "use",
    "metric",
    "mask",
    "mtu",
    "window",
    "irtt",
];

/// Read and parse a route table file into a timestamped snapshot
pub fn read_route_table(path: &Path) -> RouteResult<RouteTable> {
    let content = read_source(path)?;
    let routes = parse_route_table(&content)?;
    tracing::debug!("Parsed {} route(s) from {}", routes.len(), path.display());

    Ok(RouteTable {
        hostname: get_hostname(),
        routes,
        timestamp: chrono::Utc::now().to_rfc3339(),
    })
}

/// Read the whole table; the handle is closed before returning
pub fn read_source(path: &Path) -> RouteResult<String> {
    std::fs::read_to_string(path).map_err(|e| RouteError::io(path, e))
}

/// Parse every data line of a route table
pub fn parse_route_table(content: &str) -> RouteResult<Vec<RouteRecord>> {
    data_lines(content)
        .map(|(line_no, line)| parse_record(line, line_no))
        .collect()
}

/// Non-blank lines after the header, with 1-based line numbers
pub fn data_lines(content: &str) -> impl Iterator<Item = (usize, &str)> {
    content
        .lines()
        .enumerate()
        .skip(1)
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(idx, line)| (idx + 1, line))
}

/// Parse a single tab-separated route line
pub fn parse_record(line: &str, line_no: usize) -> RouteResult<RouteRecord> {
    let fields: Vec<&str> = line.split('\t').map(str::trim).collect();
    if fields.len() < REQUIRED_COLUMNS {
        return Err(RouteError::Format {
            line: line_no,
            expected: REQUIRED_COLUMNS,
            found: fields.len(),
        });
    }

    let interface = fields[0];
    if interface.is_empty() {
        return Err(RouteError::parse(line_no, COLUMNS[0], interface, "empty interface name"));
    }

    let addr = |idx: usize| -> RouteResult<Ipv4Addr> {
        decode_hex_addr(fields[idx]).map_err(|e| RouteError::parse(line_no, COLUMNS[idx], fields[idx], e))
    };

    // Trailing columns are optional; a present but malformed one is still an error
    let optional = |idx: usize, radix: u32| -> RouteResult<Option<u32>> {
        match fields.get(idx).copied() {
            None | Some("") => Ok(None),
            Some(raw) => u32::from_str_radix(raw, radix)
                .map(Some)
                .map_err(|e| RouteError::parse(line_no, COLUMNS[idx], raw, e)),
        }
    };

    let destination = addr(1)?;
    let gateway = addr(2)?;

    let flags = match optional(3, 16)? {
        Some(raw) => u16::try_from(raw)
            .map_err(|e| RouteError::parse(line_no, COLUMNS[3], fields[3], e))?,
        None => 0,
    };

    let mask = match fields.get(7).copied() {
        None | Some("") if destination.is_unspecified() => Ipv4Addr::UNSPECIFIED,
        None | Some("") => Ipv4Addr::BROADCAST,
        Some(_) => addr(7)?,
    };

    Ok(RouteRecord {
        interface: interface.to_string(),
        destination,
        gateway,
        flags,
        refcnt: optional(4, 10)?.unwrap_or(0),
        use_count: optional(5, 10)?.unwrap_or(0),
        metric: optional(6, 10)?.unwrap_or(0),
        mask,
        mtu: optional(8, 10)?.unwrap_or(0),
        window: optional(9, 10)?.unwrap_or(0),
        irtt: optional(10, 10)?.unwrap_or(0),
    })
}

/// Decode a little-endian hex address such as `0280FEA9` (169.254.128.2)
pub fn decode_hex_addr(field: &str) -> Result<Ipv4Addr, String> {
    if field.is_empty() || field.len() > 8 {
        return Err(format!("expected 1 to 8 hex digits, got {}", field.len()));
    }
    if !field.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err("not a hexadecimal number".to_string());
    }

    let value = u32::from_str_radix(field, 16).map_err(|e| e.to_string())?;
    Ok(Ipv4Addr::from(value.to_le_bytes()))
}

/// Inverse of `decode_hex_addr`, in the kernel's uppercase 8-digit form
pub fn encode_hex_addr(addr: Ipv4Addr) -> String {
    format!("{:08X}", u32::from_le_bytes(addr.octets()))
}

fn get_hostname() -> String {
    hostname::get()
        .ok()
        .and_then(|h| h.into_string().ok())
        .unwrap_or_else(|| "unknown".to_string())
}
