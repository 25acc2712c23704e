//! Core type definitions using newtype patterns for type safety.

mod port;
mod target;

pub use port::{
    default_ports, parse_port_list, parse_port_token, Port, PortError, DEFAULT_PORTS,
};
pub use target::ScanTarget;
