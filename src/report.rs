//! Human-readable port report.
//!
//! # Output Format
//! ```text
//! [1]	[link:up] [admin:up] [1000/full] [Trunk: *5* 10 20] [MAC: aa:bb:cc:dd:ee:ff]
//! [2]	[link:down] [admin:up] [100/half] [Access VLAN 30] [MAC: None/Multiple]
//! ```

use crate::model::PortRecord;

/// Shown in the MAC column unless exactly one address was learned.
pub const MULTIPLE_MAC_PLACEHOLDER: &str = "None/Multiple";

/// Formats one report line for `record`.
///
/// On trunk ports the first allowed VLAN equal to the native VLAN is
/// wrapped in asterisks. The record itself is left untouched.
pub fn render_line(record: &PortRecord) -> String {
    let vlan_info = if record.is_trunk {
        format!("Trunk: {}", trunk_vlans(record).join(" "))
    } else {
        format!("Access VLAN {}", record.access_vlan_id)
    };

    let mac_info = match record.mac_addresses.as_slice() {
        [only] => only.as_str(),
        _ => MULTIPLE_MAC_PLACEHOLDER,
    };

    format!(
        "[{}]\t[link:{}] [admin:{}] [{}/{}] [{}] [MAC: {}]",
        record.port,
        record.link_state,
        record.admin_state,
        record.speed,
        record.duplex,
        vlan_info,
        mac_info
    )
}

/// Formats every MAC address learned on `record` as `\t[mac1,mac2]`.
pub fn render_mac_list(record: &PortRecord) -> String {
    format!("\t[{}]", record.mac_addresses.join(","))
}

fn trunk_vlans(record: &PortRecord) -> Vec<String> {
    let mut vlans = record.allowed_vlans.clone();

    if let Some(native) = &record.native_vlan_id {
        if let Some(slot) = vlans.iter_mut().find(|v| v.as_str() == native.as_str()) {
            *slot = format!("*{}*", native);
        }
    }

    vlans
}
