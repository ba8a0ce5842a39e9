//! Port resolution by interface id or MAC address.
//!
//! Both lookups scan the whole map and return the lowest matching port
//! number. `None` is left to the caller to interpret.

use crate::model::PortMap;

/// Find the port whose interface id equals `interface_id`.
pub fn find_by_interface(ports: &PortMap, interface_id: &str) -> Option<u32> {
    ports
        .values()
        .find(|record| record.interface_id == interface_id)
        .map(|record| record.port)
}

/// Find the port that has learned `mac` (exact string match).
pub fn find_by_mac(ports: &PortMap, mac: &str) -> Option<u32> {
    ports
        .values()
        .find(|record| record.mac_addresses.iter().any(|m| m == mac))
        .map(|record| record.port)
}
