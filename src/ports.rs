// Host port availability for published container ports
// Read-only: each check binds and immediately releases the port

use std::net::{Ipv4Addr, TcpListener};

/// Check whether `port` can be bound on all interfaces
pub fn is_port_free(port: u16) -> bool {
    TcpListener::bind((Ipv4Addr::UNSPECIFIED, port)).is_ok()
}
