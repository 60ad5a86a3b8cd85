//! In-process `MatchStore` backed by `DashMap`.
//!
//! Each compare-and-swap runs under the shard lock of its key, so writes to
//! one match are serialized while different matches proceed in parallel.

use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use time::OffsetDateTime;
use tracing::{debug, info};

use crate::errors::domain::{ConflictKind, DomainError, InfraErrorKind, NotFoundKind};
use crate::repos::matches::{MatchRecord, MatchStore, Versioned, INITIAL_VERSION};

#[derive(Debug, Default)]
pub struct InMemoryMatchStore {
    active: DashMap<String, Versioned<MatchRecord>>,
    archived: DashMap<String, Versioned<MatchRecord>>,
}

impl InMemoryMatchStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active_count(&self) -> usize {
        self.active.len()
    }

    pub fn archived_count(&self) -> usize {
        self.archived.len()
    }

    fn missing(&self, match_id: &str) -> DomainError {
        if self.archived.contains_key(match_id) {
            DomainError::conflict(
                ConflictKind::MatchArchived,
                format!("Match {match_id} has finished and is archived"),
            )
        } else {
            DomainError::not_found(NotFoundKind::Match, format!("Match {match_id} not found"))
        }
    }
}

/// A write whose record id differs from its key would file one match under
/// another's name.
fn require_matching_id(match_id: &str, record: &MatchRecord) -> Result<(), DomainError> {
    if record.id() == match_id {
        return Ok(());
    }
    Err(DomainError::infra(
        InfraErrorKind::DataCorruption,
        format!("Record for match {} cannot be stored under key {match_id}", record.id()),
    ))
}

fn version_mismatch(match_id: &str, expected: i32, actual: i32) -> DomainError {
    DomainError::conflict(
        ConflictKind::OptimisticLock,
        format!(
            "Match lock version mismatch for {match_id}: expected {expected}, but match has version {actual}"
        ),
    )
}

#[async_trait]
impl MatchStore for InMemoryMatchStore {
    async fn insert(&self, mut record: MatchRecord) -> Result<Versioned<MatchRecord>, DomainError> {
        let match_id = record.id().to_string();
        if self.archived.contains_key(&match_id) {
            return Err(DomainError::conflict(
                ConflictKind::MatchExists,
                format!("Match {match_id} already exists (archived)"),
            ));
        }

        match self.active.entry(match_id.clone()) {
            Entry::Occupied(_) => Err(DomainError::conflict(
                ConflictKind::MatchExists,
                format!("Match {match_id} already exists"),
            )),
            Entry::Vacant(slot) => {
                let now = OffsetDateTime::now_utc();
                record.created_at = now;
                record.updated_at = now;
                let stored = Versioned {
                    version: INITIAL_VERSION,
                    value: record,
                };
                slot.insert(stored.clone());
                info!(match_id = %match_id, "Match inserted");
                Ok(stored)
            }
        }
    }

    async fn load(&self, match_id: &str) -> Result<Versioned<MatchRecord>, DomainError> {
        match self.active.get(match_id) {
            Some(entry) => Ok(entry.value().clone()),
            None => Err(self.missing(match_id)),
        }
    }

    async fn compare_and_swap(
        &self,
        match_id: &str,
        expected_version: i32,
        mut record: MatchRecord,
    ) -> Result<i32, DomainError> {
        require_matching_id(match_id, &record)?;
        let Some(mut entry) = self.active.get_mut(match_id) else {
            return Err(self.missing(match_id));
        };

        let current = entry.version;
        if current != expected_version {
            return Err(version_mismatch(match_id, expected_version, current));
        }

        let new_version = current + 1;
        record.updated_at = OffsetDateTime::now_utc();
        *entry = Versioned {
            version: new_version,
            value: record,
        };
        debug!(match_id, old_version = current, new_version, "Match record swapped");
        Ok(new_version)
    }

    async fn archive(
        &self,
        match_id: &str,
        expected_version: i32,
        mut record: MatchRecord,
    ) -> Result<i32, DomainError> {
        require_matching_id(match_id, &record)?;
        match self.active.entry(match_id.to_string()) {
            Entry::Vacant(_) => Err(self.missing(match_id)),
            Entry::Occupied(entry) => {
                let current = entry.get().version;
                if current != expected_version {
                    return Err(version_mismatch(match_id, expected_version, current));
                }

                let new_version = current + 1;
                record.updated_at = OffsetDateTime::now_utc();
                self.archived.insert(
                    match_id.to_string(),
                    Versioned {
                        version: new_version,
                        value: record,
                    },
                );
                entry.remove();
                info!(match_id, version = new_version, "Match archived");
                Ok(new_version)
            }
        }
    }

    async fn load_archived(&self, match_id: &str) -> Result<Versioned<MatchRecord>, DomainError> {
        self.archived
            .get(match_id)
            .map(|entry| entry.value().clone())
            .ok_or_else(|| {
                DomainError::not_found(
                    NotFoundKind::Match,
                    format!("No archived match {match_id}"),
                )
            })
    }
}
