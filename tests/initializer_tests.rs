//! Initializer runs against a recording in-memory NetBox

use nb_init::error::RecordError;
use nb_init::loader::InitializerFiles;
use nb_init::netbox::{NetboxApi, ObjectId};
use nb_init::report::{Reporter, Summary};
use nb_init::{Initializer, Lookup, Resource};
use serde_json::{json, Value};
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::fs;
use tempfile::TempDir;

#[derive(Debug, Clone, PartialEq)]
enum Call {
    Find(Resource, Vec<(&'static str, String)>),
    Create(Resource, Value),
    Update(Resource, ObjectId, Value),
}

#[derive(Default)]
struct FakeNetbox {
    calls: RefCell<Vec<Call>>,
    existing: HashMap<(Resource, Vec<(&'static str, String)>), ObjectId>,
    rejected: Vec<(Resource, String)>,
    next_id: Cell<ObjectId>,
}

impl FakeNetbox {
    /// An object found only by exactly these filters.
    fn with_existing(
        mut self,
        resource: Resource,
        filters: &[(&'static str, &str)],
        id: ObjectId,
    ) -> Self {
        let filters = filters.iter().map(|(field, value)| (*field, value.to_string())).collect();
        self.existing.insert((resource, filters), id);
        self
    }

    fn rejecting(mut self, resource: Resource, name: &str) -> Self {
        self.rejected.push((resource, name.to_string()));
        self
    }

    fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }
}

impl NetboxApi for FakeNetbox {
    fn find(&self, resource: Resource, lookup: &Lookup) -> Result<Option<ObjectId>, RecordError> {
        self.calls.borrow_mut().push(Call::Find(resource, lookup.filters.clone()));
        Ok(self.existing.get(&(resource, lookup.filters.clone())).copied())
    }

    fn create(&self, resource: Resource, payload: &Value) -> Result<ObjectId, RecordError> {
        self.calls.borrow_mut().push(Call::Create(resource, payload.clone()));
        let name = payload.get("name").and_then(Value::as_str).unwrap_or_default();
        if self.rejected.iter().any(|(r, n)| *r == resource && n == name) {
            return Err(RecordError::Api {
                status: 400,
                body: r#"{"site":["Related object not found using the provided attributes"]}"#
                    .to_string(),
            });
        }
        self.next_id.set(self.next_id.get() + 1);
        Ok(self.next_id.get())
    }

    fn update(&self, resource: Resource, id: ObjectId, payload: &Value) -> Result<(), RecordError> {
        self.calls.borrow_mut().push(Call::Update(resource, id, payload.clone()));
        Ok(())
    }
}

fn yaml_dir(files: &[(&str, &str)]) -> TempDir {
    let tmp = TempDir::new().expect("tmp");
    for (name, content) in files {
        fs::write(tmp.path().join(name), content).expect("write initializer file");
    }
    tmp
}

fn run(api: &FakeNetbox, dir: &TempDir) -> (Summary, String) {
    let files = InitializerFiles::open(dir.path()).expect("open yaml dir");
    let mut reporter = Reporter::new(Vec::new());
    let summary = Initializer::new(api).run(files, &mut reporter).expect("run");
    let output = String::from_utf8(reporter.into_inner()).expect("utf8");
    (summary, output)
}

fn creates(calls: &[Call]) -> Vec<(Resource, Value)> {
    calls
        .iter()
        .filter_map(|call| match call {
            Call::Create(resource, payload) => Some((*resource, payload.clone())),
            _ => None,
        })
        .collect()
}

#[test]
fn test_single_site_is_created_with_its_fields() {
    let dir = yaml_dir(&[("sites.yml", "- name: AMS 1\n  slug: ams1\n  status: active\n")]);
    let api = FakeNetbox::default();

    let (summary, output) = run(&api, &dir);

    assert_eq!(
        api.calls(),
        vec![
            Call::Find(Resource::Sites, vec![("name", "AMS 1".to_string())]),
            Call::Create(Resource::Sites, json!({"name": "AMS 1", "slug": "ams1", "status": "active"})),
        ]
    );
    assert_eq!(summary.created, 1);
    assert!(output.contains("created sites AMS 1"));
}

#[test]
fn test_existing_site_is_updated() {
    let dir = yaml_dir(&[("sites.yml", "- name: AMS 1\n  slug: ams1\n")]);
    let api = FakeNetbox::default().with_existing(Resource::Sites, &[("name", "AMS 1")], 5);

    let (summary, output) = run(&api, &dir);

    assert_eq!(
        api.calls()[1],
        Call::Update(Resource::Sites, 5, json!({"name": "AMS 1", "slug": "ams1"}))
    );
    assert_eq!(api.calls().len(), 2);
    assert_eq!(summary.updated, 1);
    assert!(output.contains("updated sites AMS 1"));
}

#[test]
fn test_unknown_file_is_skipped_with_warning() {
    let dir = yaml_dir(&[("widgets.yml", "- name: sprocket\n")]);
    let api = FakeNetbox::default();

    let (summary, output) = run(&api, &dir);

    assert!(api.calls().is_empty());
    assert_eq!(summary.warnings, 1);
    assert!(output.contains("warning:"));
    assert!(output.contains("widgets.yml"));
}

#[test]
fn test_api_failure_does_not_stop_later_files() {
    let dir = yaml_dir(&[
        ("sites.yml", "- name: AMS 1\n  slug: ams1\n- name: AMS 2\n  slug: ams2\n"),
        ("devices.yml", "- name: leaf1\n  device_type: C9300\n  site: AMS 2\n  role: leaf\n"),
    ]);
    let api = FakeNetbox::default().rejecting(Resource::Sites, "AMS 1");

    let (summary, output) = run(&api, &dir);

    assert_eq!(summary, Summary { created: 2, updated: 0, failed: 1, warnings: 0 });
    assert!(output.contains("failed sites AMS 1: NetBox returned 400"));
    assert!(output.contains("created sites AMS 2"));
    assert!(output.contains("created devices leaf1"));
}

#[test]
fn test_invalid_record_makes_no_api_call() {
    let dir = yaml_dir(&[("sites.yml", "- name: AMS 1\n")]);
    let api = FakeNetbox::default();

    let (summary, output) = run(&api, &dir);

    assert!(api.calls().is_empty());
    assert_eq!(summary.failed, 1);
    assert!(output.contains("missing required field(s): slug"));
}

#[test]
fn test_files_run_in_dependency_order() {
    let dir = yaml_dir(&[
        ("devices.yml", "- name: leaf1\n  device_type: C9300\n  site: AMS 1\n"),
        ("device_types.yml", "- model: C9300\n  slug: c9300\n  manufacturer: Cisco\n"),
        ("manufacturers.yml", "- name: Cisco\n  slug: cisco\n"),
        ("sites.yml", "- name: AMS 1\n  slug: ams1\n"),
    ]);
    let api = FakeNetbox::default();

    run(&api, &dir);

    let order: Vec<Resource> = creates(&api.calls()).into_iter().map(|(r, _)| r).collect();
    assert_eq!(
        order,
        vec![Resource::Sites, Resource::Manufacturers, Resource::DeviceTypes, Resource::Devices]
    );
}

#[test]
fn test_mapping_files_use_keys_as_names() {
    let dir = yaml_dir(&[("tags.yml", "core:\n  slug: core\n  color: ff0000\n")]);
    let api = FakeNetbox::default();

    run(&api, &dir);

    assert_eq!(
        creates(&api.calls()),
        vec![(Resource::Tags, json!({"slug": "core", "color": "ff0000", "name": "core"}))]
    );
}

#[test]
fn test_interface_templates_expand_before_upsert() {
    let dir = yaml_dir(&[(
        "interfaces.yml",
        "- name: Ethernet1/[1-2]\n  device: leaf1\n  type: 10gbase-x-sfpp\n",
    )]);
    let api = FakeNetbox::default().with_existing(
        Resource::Interfaces,
        &[("name", "Ethernet1/2"), ("device", "leaf1")],
        9,
    );

    let (summary, _) = run(&api, &dir);

    assert_eq!(
        api.calls()[0],
        Call::Find(
            Resource::Interfaces,
            vec![("name", "Ethernet1/1".to_string()), ("device", "leaf1".to_string())]
        )
    );
    assert_eq!(summary, Summary { created: 1, updated: 1, failed: 0, warnings: 0 });
}

#[test]
fn test_primary_ips_only_update_existing_devices() {
    let dir = yaml_dir(&[(
        "primary_ips.yml",
        "- device: leaf1\n  primary_ip4: 10.0.0.1/24\n- device: ghost\n  primary_ip4: 10.0.0.2/24\n",
    )]);
    let api = FakeNetbox::default().with_existing(Resource::PrimaryIps, &[("name", "leaf1")], 3);

    let (summary, output) = run(&api, &dir);

    assert!(api
        .calls()
        .contains(&Call::Update(Resource::PrimaryIps, 3, json!({"primary_ip4": "10.0.0.1/24"}))));
    assert!(creates(&api.calls()).is_empty());
    assert_eq!(summary.updated, 1);
    assert_eq!(summary.failed, 1);
    assert!(output.contains("failed primary_ips ghost: no dcim/devices found with name=ghost"));
}

#[test]
fn test_cables_are_created_without_lookup() {
    let dir = yaml_dir(&[(
        "cables.yml",
        "- a_terminations:\n    - object_type: dcim.interface\n      object_id: 1\n  b_terminations:\n    - object_type: dcim.interface\n      object_id: 2\n",
    )]);
    let api = FakeNetbox::default();

    let (summary, output) = run(&api, &dir);

    assert_eq!(api.calls().len(), 1);
    assert!(matches!(api.calls()[0], Call::Create(Resource::Cables, _)));
    assert_eq!(summary.created, 1);
    assert!(output.contains("created cables #1"));
}

#[test]
fn test_broken_file_is_reported_and_skipped() {
    let dir = yaml_dir(&[
        ("tags.yml", "- name: [unclosed\n"),
        ("sites.yml", "- name: AMS 1\n  slug: ams1\n"),
    ]);
    let api = FakeNetbox::default();

    let (summary, output) = run(&api, &dir);

    assert_eq!(summary.warnings, 1);
    assert_eq!(summary.created, 1);
    assert!(output.contains("invalid YAML"));
}

#[test]
fn test_empty_file_is_a_warning() {
    let dir = yaml_dir(&[("regions.yml", "")]);
    let api = FakeNetbox::default();

    let (summary, output) = run(&api, &dir);

    assert!(api.calls().is_empty());
    assert_eq!(summary.warnings, 1);
    assert!(output.contains("holds no records"));
}

#[test]
fn test_record_without_key_is_a_failure() {
    let dir = yaml_dir(&[("ip_addresses.yml", "- status: active\n")]);
    let api = FakeNetbox::default();

    let (summary, output) = run(&api, &dir);

    assert!(api.calls().is_empty());
    assert_eq!(summary.failed, 1);
    assert!(output.contains("failed ip_addresses #1"));
}

#[test]
fn test_nested_device_reference_scopes_interface_lookup() {
    let dir = yaml_dir(&[(
        "interfaces.yml",
        "- name: eth0\n  device:\n    name: leaf1\n  type: 1000base-t\n",
    )]);
    let api = FakeNetbox::default().with_existing(
        Resource::Interfaces,
        &[("name", "eth0"), ("device", "spine1")],
        77,
    );

    let (summary, output) = run(&api, &dir);

    assert_eq!(
        api.calls()[0],
        Call::Find(
            Resource::Interfaces,
            vec![("name", "eth0".to_string()), ("device", "leaf1".to_string())]
        )
    );
    assert!(!api.calls().iter().any(|call| matches!(call, Call::Update(..))));
    assert_eq!(summary.created, 1);
    assert!(output.contains("created interfaces eth0"));
}

#[test]
fn test_unusable_device_reference_fails_without_calls() {
    let dir = yaml_dir(&[(
        "interfaces.yml",
        "- name: eth0\n  device:\n    - leaf1\n  type: 1000base-t\n",
    )]);
    let api = FakeNetbox::default()
        .with_existing(Resource::Interfaces, &[("name", "eth0"), ("device", "spine1")], 77);

    let (summary, output) = run(&api, &dir);

    assert!(api.calls().is_empty());
    assert_eq!(summary.failed, 1);
    assert!(output.contains("`device` is a list"));
}

#[test]
fn test_same_vlan_name_on_another_site_is_a_new_vlan() {
    let dir = yaml_dir(&[("vlans.yml", "- name: mgmt\n  vid: 10\n  site: site-b\n")]);
    let api = FakeNetbox::default().with_existing(
        Resource::Vlans,
        &[("name", "mgmt"), ("site", "site-a"), ("group_id", "null")],
        5,
    );

    let (summary, _) = run(&api, &dir);

    assert_eq!(
        api.calls()[0],
        Call::Find(
            Resource::Vlans,
            vec![
                ("name", "mgmt".to_string()),
                ("site", "site-b".to_string()),
                ("group_id", "null".to_string()),
            ]
        )
    );
    assert!(matches!(api.calls()[1], Call::Create(Resource::Vlans, _)));
    assert_eq!(summary, Summary { created: 1, updated: 0, failed: 0, warnings: 0 });
}

#[test]
fn test_global_prefix_lookup_excludes_vrf_prefixes() {
    let dir = yaml_dir(&[("prefixes.yml", "- prefix: 10.0.0.0/24\n")]);
    let api = FakeNetbox::default()
        .with_existing(Resource::Prefixes, &[("prefix", "10.0.0.0/24"), ("vrf_id", "null")], 8);

    let (summary, _) = run(&api, &dir);

    assert_eq!(
        api.calls()[1],
        Call::Update(Resource::Prefixes, 8, json!({"prefix": "10.0.0.0/24"}))
    );
    assert_eq!(summary.updated, 1);
}
