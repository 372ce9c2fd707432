//! Mapping from initializer file names to NetBox resource collections.
//!
//! [`Resource::all`] yields every collection in dependency order: objects that
//! others refer to (tags, tenants, sites, manufacturers, ...) come before the
//! objects that refer to them (devices, interfaces, IP addresses, ...).

use std::fmt;

/// One NetBox object collection, named after its initializer file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resource {
    CustomFields,
    CustomLinks,
    Tags,
    ConfigTemplates,
    Webhooks,
    TenantGroups,
    Tenants,
    SiteGroups,
    Regions,
    Rirs,
    Asns,
    Sites,
    Locations,
    RackRoles,
    Racks,
    PowerPanels,
    PowerFeeds,
    Manufacturers,
    Platforms,
    DeviceRoles,
    DeviceTypes,
    ClusterTypes,
    ClusterGroups,
    Clusters,
    PrefixVlanRoles,
    VlanGroups,
    Vlans,
    Devices,
    Interfaces,
    InterfaceTemplates,
    RouteTargets,
    Vrfs,
    Aggregates,
    VirtualMachines,
    VirtualizationInterfaces,
    Prefixes,
    IpAddresses,
    PrimaryIps,
    Services,
    ServiceTemplates,
    Providers,
    CircuitTypes,
    Circuits,
    Cables,
    ConfigContexts,
    ContactGroups,
    ContactRoles,
    Contacts,
}

/// How an existing object is found before writing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NaturalKey {
    /// The record field is also the query filter.
    Field(&'static str),
    /// `name`, falling back to `slug` when the record has no name.
    NameOrSlug,
    /// The record field names the target object, matched against its `name`.
    /// The field itself is not part of the written payload.
    Reference(&'static str),
    /// Objects of this kind cannot be looked up; every record is a create.
    None,
}

/// A parent reference that narrows a lookup.
///
/// A name or slug in the record is sent as `field`, a numeric id as
/// `id_filter`. A record without the parent is matched against objects that
/// have none (`id_filter=null`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Scope {
    pub field: &'static str,
    pub id_filter: &'static str,
}

impl Scope {
    pub const fn new(field: &'static str, id_filter: &'static str) -> Self {
        Self { field, id_filter }
    }
}

/// What to do depending on whether the object already exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertPolicy {
    Upsert,
    CreateOnly,
    UpdateOnly,
}

// (tag, file stem, API path below /api)
static TABLE: [(Resource, &str, &str); 48] = [
    (Resource::CustomFields, "custom_fields", "extras/custom-fields"),
    (Resource::CustomLinks, "custom_links", "extras/custom-links"),
    (Resource::Tags, "tags", "extras/tags"),
    (Resource::ConfigTemplates, "config_templates", "extras/config-templates"),
    (Resource::Webhooks, "webhooks", "extras/webhooks"),
    (Resource::TenantGroups, "tenant_groups", "tenancy/tenant-groups"),
    (Resource::Tenants, "tenants", "tenancy/tenants"),
    (Resource::SiteGroups, "site_groups", "dcim/site-groups"),
    (Resource::Regions, "regions", "dcim/regions"),
    (Resource::Rirs, "rirs", "ipam/rirs"),
    (Resource::Asns, "asns", "ipam/asns"),
    (Resource::Sites, "sites", "dcim/sites"),
    (Resource::Locations, "locations", "dcim/locations"),
    (Resource::RackRoles, "rack_roles", "dcim/rack-roles"),
    (Resource::Racks, "racks", "dcim/racks"),
    (Resource::PowerPanels, "power_panels", "dcim/power-panels"),
    (Resource::PowerFeeds, "power_feeds", "dcim/power-feeds"),
    (Resource::Manufacturers, "manufacturers", "dcim/manufacturers"),
    (Resource::Platforms, "platforms", "dcim/platforms"),
    (Resource::DeviceRoles, "device_roles", "dcim/device-roles"),
    (Resource::DeviceTypes, "device_types", "dcim/device-types"),
    (Resource::ClusterTypes, "cluster_types", "virtualization/cluster-types"),
    (Resource::ClusterGroups, "cluster_groups", "virtualization/cluster-groups"),
    (Resource::Clusters, "clusters", "virtualization/clusters"),
    (Resource::PrefixVlanRoles, "prefix_vlan_roles", "ipam/roles"),
    (Resource::VlanGroups, "vlan_groups", "ipam/vlan-groups"),
    (Resource::Vlans, "vlans", "ipam/vlans"),
    (Resource::Devices, "devices", "dcim/devices"),
    (Resource::Interfaces, "interfaces", "dcim/interfaces"),
    (Resource::InterfaceTemplates, "interface_templates", "dcim/interface-templates"),
    (Resource::RouteTargets, "route_targets", "ipam/route-targets"),
    (Resource::Vrfs, "vrfs", "ipam/vrfs"),
    (Resource::Aggregates, "aggregates", "ipam/aggregates"),
    (Resource::VirtualMachines, "virtual_machines", "virtualization/virtual-machines"),
    (Resource::VirtualizationInterfaces, "virtualization_interfaces", "virtualization/interfaces"),
    (Resource::Prefixes, "prefixes", "ipam/prefixes"),
    (Resource::IpAddresses, "ip_addresses", "ipam/ip-addresses"),
    (Resource::PrimaryIps, "primary_ips", "dcim/devices"),
    (Resource::Services, "services", "ipam/services"),
    (Resource::ServiceTemplates, "service_templates", "ipam/service-templates"),
    (Resource::Providers, "providers", "circuits/providers"),
    (Resource::CircuitTypes, "circuit_types", "circuits/circuit-types"),
    (Resource::Circuits, "circuits", "circuits/circuits"),
    (Resource::Cables, "cables", "dcim/cables"),
    (Resource::ConfigContexts, "config_contexts", "extras/config-contexts"),
    (Resource::ContactGroups, "contact_groups", "tenancy/contact-groups"),
    (Resource::ContactRoles, "contact_roles", "tenancy/contact-roles"),
    (Resource::Contacts, "contacts", "tenancy/contacts"),
];

impl Resource {
    /// Every resource, in the order initializer files are processed.
    pub fn all() -> impl Iterator<Item = Resource> {
        TABLE.iter().map(|(resource, _, _)| *resource)
    }

    /// Look up the resource an initializer file stem stands for.
    pub fn from_file_stem(stem: &str) -> Option<Self> {
        TABLE.iter().find(|(_, name, _)| *name == stem).map(|(resource, _, _)| *resource)
    }

    /// Position in the dependency order.
    pub fn order(self) -> usize {
        TABLE.iter().position(|(resource, _, _)| *resource == self).unwrap_or(TABLE.len())
    }

    pub fn file_stem(self) -> &'static str {
        self.entry().1
    }

    /// Collection path below `/api`, without slashes at either end.
    pub fn api_path(self) -> &'static str {
        self.entry().2
    }

    pub fn natural_key(self) -> NaturalKey {
        match self {
            Resource::Asns => NaturalKey::Field("asn"),
            Resource::IpAddresses => NaturalKey::Field("address"),
            Resource::DeviceTypes => NaturalKey::Field("model"),
            Resource::Prefixes | Resource::Aggregates => NaturalKey::Field("prefix"),
            Resource::Circuits => NaturalKey::Field("cid"),
            Resource::PrimaryIps => NaturalKey::Reference("device"),
            Resource::Cables => NaturalKey::None,
            _ => NaturalKey::NameOrSlug,
        }
    }

    /// Parent fields that narrow a name lookup, for objects whose names are
    /// only unique within their parent.
    pub fn lookup_scope(self) -> &'static [Scope] {
        const SITE: Scope = Scope::new("site", "site_id");
        const DEVICE: Scope = Scope::new("device", "device_id");
        const VIRTUAL_MACHINE: Scope = Scope::new("virtual_machine", "virtual_machine_id");
        const VRF: Scope = Scope::new("vrf", "vrf_id");
        const GROUP: Scope = Scope::new("group", "group_id");

        match self {
            Resource::Interfaces => &[DEVICE],
            Resource::VirtualizationInterfaces => &[VIRTUAL_MACHINE],
            Resource::Services => &[DEVICE, VIRTUAL_MACHINE],
            Resource::Vlans => &[SITE, GROUP],
            Resource::Locations | Resource::Racks | Resource::PowerPanels | Resource::Devices => {
                &[SITE]
            }
            Resource::Prefixes | Resource::IpAddresses => &[VRF],
            _ => &[],
        }
    }

    pub fn policy(self) -> UpsertPolicy {
        match self {
            Resource::Cables => UpsertPolicy::CreateOnly,
            Resource::PrimaryIps => UpsertPolicy::UpdateOnly,
            _ => UpsertPolicy::Upsert,
        }
    }

    /// Whether `name` may hold a range template such as `Ethernet[1-48]`.
    pub fn expands_name_templates(self) -> bool {
        matches!(
            self,
            Resource::Interfaces | Resource::InterfaceTemplates | Resource::VirtualizationInterfaces
        )
    }

    fn entry(self) -> &'static (Resource, &'static str, &'static str) {
        // The table holds every variant; the tests below keep it that way.
        TABLE.iter().find(|(resource, _, _)| *resource == self).unwrap_or(&TABLE[0])
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.file_stem())
    }
}
