//! NetBox REST API access
//!
//! [`NetboxApi`] is the seam between the initializer and the network: the
//! binary uses [`HttpNetbox`] through a [`Session`], tests use an in-memory
//! implementation.

pub mod client;
pub mod session;

pub use client::{api_base_url, HttpNetbox};
pub use session::Session;

use crate::error::RecordError;
use crate::record::Lookup;
use crate::resource::Resource;
use serde_json::Value;

/// Object id as assigned by NetBox.
pub type ObjectId = u64;

pub trait NetboxApi {
    /// Find the single object matching `lookup`.
    fn find(&self, resource: Resource, lookup: &Lookup) -> Result<Option<ObjectId>, RecordError>;

    /// Create an object and return its id.
    fn create(&self, resource: Resource, payload: &Value) -> Result<ObjectId, RecordError>;

    /// Patch an existing object with the fields in `payload`.
    fn update(&self, resource: Resource, id: ObjectId, payload: &Value) -> Result<(), RecordError>;
}

impl<T: NetboxApi + ?Sized> NetboxApi for &T {
    fn find(&self, resource: Resource, lookup: &Lookup) -> Result<Option<ObjectId>, RecordError> {
        (**self).find(resource, lookup)
    }

    fn create(&self, resource: Resource, payload: &Value) -> Result<ObjectId, RecordError> {
        (**self).create(resource, payload)
    }

    fn update(&self, resource: Resource, id: ObjectId, payload: &Value) -> Result<(), RecordError> {
        (**self).update(resource, id, payload)
    }
}
