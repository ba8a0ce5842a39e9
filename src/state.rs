//! Builds the per-port view of a switch.
//!
//! The `interfaces` resource creates one [`PortRecord`] per physical port.
//! The `vlans` resource is then walked to append VLAN membership and learned
//! MAC addresses to the port owning each referenced interface.
//!
//! Interfaces reporting port `-1` never get a record. A VLAN that later
//! references such an interface cannot be resolved and fails the build with
//! [`SwitchApiError::LookupNotFound`].

use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::error::SwitchApiError;
use crate::fetch::Fetch;
use crate::lookup;
use crate::model::{vlan_id_string, InterfaceItem, ItemList, PortMap, PortRecord, VlanItem};

const INTERFACES: &str = "interfaces";
const VLANS: &str = "vlans";

/// Port number the API uses for interfaces without a front-panel port.
const NO_PORT: i64 = -1;

/// Fully merged switch state, read-only once built.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SwitchState {
    ports: PortMap,
}

impl SwitchState {
    /// Queries `interfaces` then `vlans` and merges them.
    ///
    /// Any failure, including one on the second query, discards everything
    /// gathered so far.
    pub fn build<F: Fetch + ?Sized>(fetcher: &F) -> Result<Self, SwitchApiError> {
        let body = fetcher.fetch(Some(INTERFACES), None)?;
        let mut ports = parse_interfaces(&body)?;

        let body = fetcher.fetch(Some(VLANS), None)?;
        apply_vlans(&mut ports, &body)?;

        Ok(SwitchState { ports })
    }

    /// Builds state from already retrieved response bodies.
    pub fn from_json(interfaces: &str, vlans: &str) -> Result<Self, SwitchApiError> {
        let mut ports = parse_interfaces(interfaces)?;
        apply_vlans(&mut ports, vlans)?;
        Ok(SwitchState { ports })
    }

    pub fn ports(&self) -> &PortMap {
        &self.ports
    }

    pub fn port(&self, port: u32) -> Option<&PortRecord> {
        self.ports.get(&port)
    }

    pub fn find_by_interface(&self, interface_id: &str) -> Option<u32> {
        lookup::find_by_interface(&self.ports, interface_id)
    }

    pub fn find_by_mac(&self, mac: &str) -> Option<u32> {
        lookup::find_by_mac(&self.ports, mac)
    }
}

/// Creates a record for every interface that sits on a real port.
pub fn parse_interfaces(body: &str) -> Result<PortMap, SwitchApiError> {
    let interfaces: ItemList<InterfaceItem> = parse(INTERFACES, body)?;
    let mut ports = PortMap::new();

    for item in interfaces.items {
        if item.port == NO_PORT {
            debug!(interface = %item.id, "skipping interface without a port");
            continue;
        }

        let port = u32::try_from(item.port).map_err(|_| SwitchApiError::InvalidPort(item.port))?;
        let record = PortRecord::from_interface(port, item);

        if let Some(previous) = ports.insert(port, record) {
            warn!(port, replaced = %previous.interface_id, "port reported more than once");
        }
    }

    debug!(ports = ports.len(), "parsed interfaces");
    Ok(ports)
}

/// Appends VLAN membership and MAC addresses to the owning ports.
///
/// Entries are appended in response order without deduplication.
pub fn apply_vlans(ports: &mut PortMap, body: &str) -> Result<(), SwitchApiError> {
    let vlans: ItemList<VlanItem> = parse(VLANS, body)?;
    let vlan_count = vlans.items.len();

    for vlan in vlans.items {
        for interface_id in &vlan.interface_ids {
            let record = port_for_interface(ports, interface_id)?;
            record.allowed_vlans.push(vlan_id_string(&vlan.id));
        }

        for mac in vlan.mac_addresses {
            let record = port_for_interface(ports, &mac.interface_id)?;
            record.mac_addresses.push(mac.address);
        }
    }

    debug!(vlans = vlan_count, "applied vlans");
    Ok(())
}

fn port_for_interface<'a>(
    ports: &'a mut PortMap,
    interface_id: &str,
) -> Result<&'a mut PortRecord, SwitchApiError> {
    let not_found = || SwitchApiError::LookupNotFound {
        kind: "interface",
        value: interface_id.to_string(),
    };

    match lookup::find_by_interface(ports, interface_id) {
        Some(port) => ports.get_mut(&port).ok_or_else(not_found),
        None => Err(not_found()),
    }
}

fn parse<T: DeserializeOwned>(resource: &'static str, body: &str) -> Result<T, SwitchApiError> {
    serde_json::from_str(body).map_err(|source| SwitchApiError::Parse { resource, source })
}
