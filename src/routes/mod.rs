// Routes module - kernel route table records and default route selection

pub mod lookup;
pub mod parser;
pub mod resolver;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::Ipv4Addr;

pub const RTF_UP: u16 = 0x0001;
pub const RTF_GATEWAY: u16 = 0x0002;
pub const RTF_HOST: u16 = 0x0004;
pub const RTF_REJECT: u16 = 0x0200;

/// One line of `/proc/net/route`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteRecord {
    pub interface: String,
    pub destination: Ipv4Addr,
    pub gateway: Ipv4Addr,
    pub flags: u16,
    pub refcnt: u32,
    pub use_count: u32,
    pub metric: u32,
    pub mask: Ipv4Addr,
    pub mtu: u32,
    pub window: u32,
    pub irtt: u32,
}

impl RouteRecord {
    /// Destination and mask are both 0.0.0.0
    pub fn is_default(&self) -> bool {
        self.destination.is_unspecified() && self.mask.is_unspecified()
    }

    pub fn prefix_len(&self) -> u8 {
        u32::from(self.mask).count_ones() as u8
    }

    pub fn has_flag(&self, flag: u16) -> bool {
        self.flags & flag != 0
    }

    /// Flags rendered the way `route -n` prints them
    pub fn flag_letters(&self) -> String {
        let mut letters = String::new();
        for (flag, letter) in [
            (RTF_UP, 'U'),
            (RTF_GATEWAY, 'G'),
            (RTF_HOST, 'H'),
            (RTF_REJECT, '!'),
        ] {
            if self.has_flag(flag) {
                letters.push(letter);
            }
        }
        letters
    }
}

impl fmt::Display for RouteRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{}\tvia {}\tdev {}\tmetric {}\t{}",
            self.destination,
            self.prefix_len(),
            self.gateway,
            self.interface,
            self.metric,
            self.flag_letters()
        )
    }
}

/// The resolved default route
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DefaultRoute {
    pub interface: String,
    pub gateway: Ipv4Addr,
    pub metric: u32,
}

impl From<&RouteRecord> for DefaultRoute {
    fn from(record: &RouteRecord) -> Self {
        DefaultRoute {
            interface: record.interface.clone(),
            gateway: record.gateway,
            metric: record.metric,
        }
    }
}

impl fmt::Display for DefaultRoute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}\t{}", self.interface, self.gateway)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouteTable {
    pub hostname: String,
    pub routes: Vec<RouteRecord>,
    pub timestamp: String,
}

/// How the default route is picked out of the table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum Selection {
    /// Lowest metric among reachable records with destination and mask 0.0.0.0
    #[default]
    LowestMetric,
    /// First data line of the table, whatever its destination
    FirstEntry,
}
