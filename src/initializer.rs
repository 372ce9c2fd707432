//! The upsert loop: every file in order, every record in file order.

use crate::error::{FileError, RecordError};
use crate::loader::{Entry, InitializerFile};
use crate::netbox::NetboxApi;
use crate::record::Record;
use crate::report::{Outcome, Reporter, Summary};
use crate::resource::UpsertPolicy;
use std::io::{self, Write};

pub struct Initializer<A: NetboxApi> {
    api: A,
}

impl<A: NetboxApi> Initializer<A> {
    pub fn new(api: A) -> Self {
        Self { api }
    }

    /// Push every file to NetBox. Record and file problems are reported and
    /// skipped; only failing to write the report itself is an error.
    pub fn run<I, W>(&self, files: I, reporter: &mut Reporter<W>) -> io::Result<Summary>
    where
        I: IntoIterator<Item = Result<Entry, FileError>>,
        W: Write,
    {
        for entry in files {
            match entry {
                Ok(Entry::Initializer(file)) => self.process_file(file, reporter)?,
                Ok(Entry::Unrecognized(path)) => {
                    tracing::debug!("No resource for {}", path.display());
                    reporter.warning(&format!(
                        "{} does not match a known NetBox resource, skipping",
                        path.display()
                    ))?;
                }
                Err(e) => reporter.warning(&e.to_string())?,
            }
        }
        reporter.finish()
    }

    fn process_file<W: Write>(&self, file: InitializerFile, reporter: &mut Reporter<W>) -> io::Result<()> {
        let resource = file.resource;
        let path = file.path.clone();
        let Some(items) = file.into_items() else {
            return reporter.warning(&format!("{} holds no records, skipping", path.display()));
        };
        tracing::debug!("Processing {} record(s) from {}", items.len(), path.display());

        for (index, item) in items.into_iter().enumerate() {
            let fallback_label = format!("#{}", index + 1);
            let records = match Record::prepare(resource, item) {
                Ok(records) => records,
                Err(e) => {
                    reporter.failure(resource, &fallback_label, &e)?;
                    continue;
                }
            };

            for record in records {
                let label = record.label().unwrap_or_else(|| fallback_label.clone());
                match self.upsert(&record) {
                    Ok(outcome) => reporter.record(resource, &label, outcome)?,
                    Err(e) => {
                        tracing::debug!("{} {} failed: {:?}", resource, label, e);
                        reporter.failure(resource, &label, &e)?;
                    }
                }
            }
        }
        Ok(())
    }

    /// Write one record: at most one create or update call.
    pub fn upsert(&self, record: &Record) -> Result<Outcome, RecordError> {
        record.validate()?;
        let resource = record.resource();
        let lookup = record.lookup()?;
        let payload = record.payload();

        match (resource.policy(), lookup) {
            (UpsertPolicy::CreateOnly, _) | (UpsertPolicy::Upsert, None) => {
                self.api.create(resource, &payload)?;
                Ok(Outcome::Created)
            }
            (UpsertPolicy::Upsert, Some(lookup)) => match self.api.find(resource, &lookup)? {
                Some(id) => {
                    self.api.update(resource, id, &payload)?;
                    Ok(Outcome::Updated)
                }
                None => {
                    self.api.create(resource, &payload)?;
                    Ok(Outcome::Created)
                }
            },
            (UpsertPolicy::UpdateOnly, Some(lookup)) => match self.api.find(resource, &lookup)? {
                Some(id) => {
                    self.api.update(resource, id, &payload)?;
                    Ok(Outcome::Updated)
                }
                None => Err(RecordError::NotFound {
                    resource: resource.api_path(),
                    field: lookup.filters.first().map(|(field, _)| *field).unwrap_or("name"),
                    value: lookup.key_value().to_string(),
                }),
            },
            (UpsertPolicy::UpdateOnly, None) => Err(RecordError::MissingKey("name")),
        }
    }
}
