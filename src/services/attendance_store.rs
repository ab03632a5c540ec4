use std::collections::{BTreeMap, HashSet};

use async_trait::async_trait;
use chrono::NaiveDateTime;
use sqlx::SqlitePool;
use tracing::{info, warn};

use crate::database::attendee_repo;
use crate::error::StoreError;
use crate::models::Attendee;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkOutcome {
    Marked,
    NotFound,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DedupeReport {
    /// Serial numbers that had more than one record.
    pub groups: usize,
    pub removed: usize,
}

/// The authoritative collection of attendee records, keyed loosely by `sno`.
#[async_trait]
pub trait AttendanceStore: Send + Sync {
    /// Marks the first record with `sno` present at `at`.
    async fn mark_present(&self, sno: i64, at: NaiveDateTime) -> Result<MarkOutcome, StoreError>;

    /// Every record, first-seen per `sno`. Later duplicates are left out of
    /// the result but stay in storage.
    async fn list_all(&self) -> Result<Vec<Attendee>, StoreError>;

    async fn count_present(&self) -> Result<i64, StoreError>;

    /// Stored records, duplicates included.
    async fn count_all(&self) -> Result<i64, StoreError>;

    /// Clears attendance and its timestamp on every record.
    async fn reset_all(&self) -> Result<u64, StoreError>;

    /// Deletes all but the most recently checked-in record of each `sno`.
    async fn dedupe(&self) -> Result<DedupeReport, StoreError>;

    /// Connectivity probe; `true` when at least one record exists.
    async fn ping(&self) -> Result<bool, StoreError>;
}

#[derive(Debug, Clone)]
pub struct SqliteAttendanceStore {
    pool: SqlitePool,
}

impl SqliteAttendanceStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    async fn load_all(&self) -> Result<Vec<Attendee>, StoreError> {
        let rows = attendee_repo::list_attendees(&self.pool).await?;
        Ok(rows.into_iter().map(Attendee::from).collect())
    }
}

#[async_trait]
impl AttendanceStore for SqliteAttendanceStore {
    async fn mark_present(&self, sno: i64, at: NaiveDateTime) -> Result<MarkOutcome, StoreError> {
        let updated = attendee_repo::mark_first_present(&self.pool, sno, at).await?;
        if updated > 0 {
            info!(sno, "Marked ticket present");
            Ok(MarkOutcome::Marked)
        } else {
            warn!(sno, "No attendee found for serial number");
            Ok(MarkOutcome::NotFound)
        }
    }

    async fn list_all(&self) -> Result<Vec<Attendee>, StoreError> {
        let entries = first_seen_by_sno(self.load_all().await?);
        info!("Retrieved {} unique attendees", entries.len());
        Ok(entries)
    }

    async fn count_present(&self) -> Result<i64, StoreError> {
        Ok(attendee_repo::count_present(&self.pool).await?)
    }

    async fn count_all(&self) -> Result<i64, StoreError> {
        Ok(attendee_repo::count_all(&self.pool).await?)
    }

    async fn reset_all(&self) -> Result<u64, StoreError> {
        let count = attendee_repo::reset_attendance(&self.pool).await?;
        info!("Reset attendance for {} attendees", count);
        Ok(count)
    }

    async fn dedupe(&self) -> Result<DedupeReport, StoreError> {
        // Snapshot and deletes share one transaction.
        let mut tx = self.pool.begin().await?;
        let attendees: Vec<Attendee> = attendee_repo::list_attendees(&mut *tx)
            .await?
            .into_iter()
            .map(Attendee::from)
            .collect();
        let (groups, doomed) = duplicates_to_remove(&attendees);

        let mut removed = 0;
        for (sno, id) in &doomed {
            removed += attendee_repo::delete_attendee(&mut *tx, id).await? as usize;
            info!(sno = *sno, id = %id, "Deleted duplicate attendee");
        }
        tx.commit().await?;

        let report = DedupeReport { groups, removed };
        info!(
            "Removed {} duplicate attendees across {} serial numbers",
            report.removed, report.groups
        );
        Ok(report)
    }

    async fn ping(&self) -> Result<bool, StoreError> {
        Ok(attendee_repo::any_attendee(&self.pool).await?)
    }
}

/// Keeps the first record per `sno`; records without a `sno` are all kept.
pub fn first_seen_by_sno(attendees: Vec<Attendee>) -> Vec<Attendee> {
    let mut seen = HashSet::new();
    attendees
        .into_iter()
        .filter(|a| match a.sno {
            Some(sno) => {
                let first = seen.insert(sno);
                if !first {
                    warn!(sno, id = %a.id, "Duplicate attendee skipped");
                }
                first
            }
            None => {
                warn!(id = %a.id, "Attendee without serial number");
                true
            }
        })
        .collect()
}

/// Picks the records `dedupe` deletes, as `(sno, id)` pairs, plus the number
/// of duplicated serial numbers.
///
/// Per `sno` the survivor is the latest `attendance_time`, ties and missing
/// times broken by the greatest id.
pub fn duplicates_to_remove(attendees: &[Attendee]) -> (usize, Vec<(i64, String)>) {
    let mut by_sno: BTreeMap<i64, Vec<&Attendee>> = BTreeMap::new();
    for attendee in attendees {
        if let Some(sno) = attendee.sno {
            by_sno.entry(sno).or_default().push(attendee);
        }
    }

    let mut groups = 0;
    let mut doomed = Vec::new();
    for (sno, mut group) in by_sno {
        if group.len() < 2 {
            continue;
        }
        groups += 1;
        group.sort_by(|a, b| {
            b.attendance_time
                .cmp(&a.attendance_time)
                .then_with(|| b.id.cmp(&a.id))
        });
        doomed.extend(group.into_iter().skip(1).map(|a| (sno, a.id.clone())));
    }
    (groups, doomed)
}
