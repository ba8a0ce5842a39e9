//! Switch API wire types and the per-port record built from them.
//!
//! The `interfaces` and `vlans` resources both wrap their payload in an
//! `{"items": [...]}` envelope. Fields the report does not use are ignored
//! when deserializing.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Ports keyed by their switch port number, iterated in ascending order.
pub type PortMap = BTreeMap<u32, PortRecord>;

/// The `{"items": [...]}` envelope shared by every collection resource.
#[derive(Debug, Deserialize)]
pub struct ItemList<T> {
    pub items: Vec<T>,
}

/// One entry of the `interfaces` resource.
#[derive(Debug, Clone, Deserialize)]
pub struct InterfaceItem {
    /// Physical port number, or -1 for interfaces without a front-panel port.
    pub port: i64,
    pub id: String,
    pub trunking: Trunking,
    pub vlan_id: i64,
    pub admin: String,
    pub link: String,
    pub duplex: String,
    pub speed: i64,
    #[serde(rename = "type")]
    pub iface_type: String,
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Trunking {
    pub enabled: bool,
    /// `Some` whenever the key is present, even with a `null` value.
    #[serde(default, deserialize_with = "present")]
    pub native_vlan: Option<Value>,
}

fn present<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Value>, D::Error> {
    Value::deserialize(deserializer).map(Some)
}

/// One entry of the `vlans` resource.
#[derive(Debug, Clone, Deserialize)]
pub struct VlanItem {
    pub id: Value,
    #[serde(default)]
    pub interface_ids: Vec<String>,
    #[serde(default)]
    pub mac_addresses: Vec<MacEntry>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MacEntry {
    pub interface_id: String,
    pub address: String,
}

/// The joined view of a single switch port.
///
/// Created from an [`InterfaceItem`]; `allowed_vlans` and `mac_addresses`
/// are filled in afterwards while walking the `vlans` resource. Both lists
/// keep insertion order and may contain duplicates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PortRecord {
    pub port: u32,
    pub interface_id: String,
    pub is_trunk: bool,
    /// Only meaningful when `is_trunk` is false.
    pub access_vlan_id: i64,
    pub native_vlan_id: Option<String>,
    pub allowed_vlans: Vec<String>,
    pub mac_addresses: Vec<String>,
    pub admin_state: String,
    pub link_state: String,
    pub duplex: String,
    pub speed: i64,
    pub iface_type: String,
    pub name: String,
}

impl PortRecord {
    pub fn from_interface(port: u32, item: InterfaceItem) -> Self {
        PortRecord {
            port,
            native_vlan_id: item.trunking.native_vlan.as_ref().map(vlan_id_string),
            interface_id: item.id,
            is_trunk: item.trunking.enabled,
            access_vlan_id: item.vlan_id,
            allowed_vlans: Vec::new(),
            mac_addresses: Vec::new(),
            admin_state: item.admin,
            link_state: item.link,
            duplex: item.duplex,
            speed: item.speed,
            iface_type: item.iface_type,
            name: item.name,
        }
    }
}

/// Renders a VLAN id as the string used for display and comparison.
///
/// Numbers use their decimal form, strings are taken verbatim and `null`
/// becomes `"None"`.
pub fn vlan_id_string(value: &Value) -> String {
    match value {
        Value::Null => "None".to_string(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
