//! Journaled record workflow
//!
//! A journal never edits a stored record. Updates snapshot the current
//! version into a template, activate a new version and mark the old one
//! obsolete through the restricted accessors.

mod common;

use chrono::Utc;
use common::*;
use dtoforge_core::{Error, Result};
use dtoforge_engine::{Instance, Template, TypeCache};
use uuid::Uuid;

struct Journal {
    cache: TypeCache,
    versions: Vec<Instance>,
}

impl Journal {
    fn new() -> Self {
        Journal {
            cache: TypeCache::new(),
            versions: Vec::new(),
        }
    }

    fn create(&mut self, email: &str) -> Result<Uuid> {
        let id = Uuid::new_v4();
        let mut template = Template::<Customer>::in_cache(&self.cache);
        template
            .set(Persistent::id, id)?
            .set(Persistent::version_id, 1)?
            .set(Persistent::created, Utc::now())?
            .set(Customer::email, email.to_string())?;
        self.versions.push(template.activate()?);
        Ok(id)
    }

    fn current(&self, id: Uuid) -> Option<&Instance> {
        self.versions.iter().find(|v| {
            v.get(Persistent::id).ok() == Some(id)
                && !v.get_restricted(Persistent::obsolete).unwrap_or(true)
        })
    }

    fn update(&mut self, id: Uuid, edit: impl FnOnce(&mut Template<Customer>) -> Result<()>) -> Result<i64> {
        let position = self
            .versions
            .iter()
            .position(|v| {
                v.get(Persistent::id).ok() == Some(id)
                    && !v.get_restricted(Persistent::obsolete).unwrap_or(true)
            })
            .ok_or(Error::UnresolvableState)?;

        let mut template = Template::<Customer>::from_instance_in(&self.cache, &self.versions[position])?;
        let next_version = template.get(Persistent::version_id)? + 1;
        edit(&mut template)?;
        template.set(Persistent::version_id, next_version)?;
        let next = template.activate()?;

        let previous = &mut self.versions[position];
        previous.set_restricted(Persistent::obsolete, true)?;
        previous.set_restricted(Persistent::next_version_id, Some(next_version))?;
        self.versions.push(next);
        Ok(next_version)
    }
}

// ============================================================================
// Create / update
// ============================================================================

#[test]
fn test_create_then_update() {
    let mut journal = Journal::new();
    let id = journal.create("old@example.com").unwrap();

    let version = journal
        .update(id, |t| {
            t.set(Customer::email, "new@example.com".to_string())?;
            Ok(())
        })
        .unwrap();
    assert_eq!(version, 2);

    let current = journal.current(id).unwrap();
    assert_eq!(current.get(Customer::email).unwrap(), "new@example.com");
    assert_eq!(current.get(Persistent::version_id).unwrap(), 2);

    let first = &journal.versions[0];
    assert!(first.get_restricted(Persistent::obsolete).unwrap());
    assert_eq!(first.get_restricted(Persistent::next_version_id).unwrap(), Some(2));
    assert_eq!(first.get(Customer::email).unwrap(), "old@example.com");
}

#[test]
fn test_update_preserves_untouched_fields() {
    let mut journal = Journal::new();
    let id = journal.create("a@example.com").unwrap();
    let created = journal.current(id).unwrap().get(Persistent::created).unwrap();

    journal
        .update(id, |t| {
            t.set(Customer::display_name, "Ada".to_string())?;
            Ok(())
        })
        .unwrap();

    let current = journal.current(id).unwrap();
    assert_eq!(current.get(Persistent::created).unwrap(), created);
    assert_eq!(current.get(Customer::email).unwrap(), "a@example.com");
    assert_eq!(current.get(Customer::display_name).unwrap(), "Ada");
}

#[test]
fn test_stored_versions_are_immutable_where_declared() {
    let mut journal = Journal::new();
    let id = journal.create("a@example.com").unwrap();
    let stored = &mut journal.versions[0];

    assert!(matches!(
        stored.set(Persistent::version_id, 9),
        Err(Error::ReadOnlyProperty { .. })
    ));
    assert!(matches!(
        stored.set(Persistent::id, Uuid::new_v4()),
        Err(Error::ReadOnlyProperty { .. })
    ));
    assert_eq!(stored.get(Persistent::id).unwrap(), id);
}

#[test]
fn test_failed_edit_leaves_journal_unchanged() {
    let mut journal = Journal::new();
    let id = journal.create("a@example.com").unwrap();

    let result = journal.update(id, |t| {
        t.set(Persistent::obsolete, true)?;
        Ok(())
    });
    assert!(matches!(result, Err(Error::InaccessibleProperty { .. })));
    assert_eq!(journal.versions.len(), 1);
    assert!(journal.current(id).is_some());
}
