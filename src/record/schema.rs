//! Required fields per resource
//!
//! Only the fields NetBox always rejects a write without are listed here, so
//! obviously incomplete records fail before any request is sent. Everything
//! else is left to the API.

use crate::resource::Resource;

pub fn required_fields(resource: Resource) -> &'static [&'static str] {
    use Resource::*;

    match resource {
        Tags | TenantGroups | Tenants | SiteGroups | Regions | Rirs | Sites | RackRoles
        | Manufacturers | Platforms | DeviceRoles | ClusterTypes | ClusterGroups
        | PrefixVlanRoles | VlanGroups | Providers | CircuitTypes | ContactGroups
        | ContactRoles => &["name", "slug"],
        CustomFields => &["name", "type"],
        CustomLinks => &["name", "link_text", "link_url"],
        ConfigTemplates => &["name", "template_code"],
        Webhooks => &["name", "payload_url"],
        Asns => &["asn", "rir"],
        Locations => &["name", "slug", "site"],
        Racks | PowerPanels => &["name", "site"],
        PowerFeeds => &["name", "power_panel"],
        DeviceTypes => &["manufacturer", "model", "slug"],
        Clusters => &["name", "type"],
        Vlans => &["name", "vid"],
        Devices => &["name", "device_type", "site"],
        Interfaces => &["name", "device", "type"],
        InterfaceTemplates => &["name", "type"],
        VirtualizationInterfaces => &["name", "virtual_machine"],
        Aggregates => &["prefix", "rir"],
        Prefixes => &["prefix"],
        IpAddresses => &["address"],
        PrimaryIps => &["device"],
        Services | ServiceTemplates => &["name", "protocol", "ports"],
        Circuits => &["cid", "provider", "type"],
        Cables => &["a_terminations", "b_terminations"],
        ConfigContexts => &["name", "data"],
        RouteTargets | Vrfs | VirtualMachines | Contacts => &["name"],
    }
}
