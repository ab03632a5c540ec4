use std::sync::Arc;

use chrono::{Local, NaiveDateTime, SubsecRound};
use tracing::{info, warn};

use crate::error::{TicketLogError, WorkflowError};
use crate::models::ScanRecord;
use crate::services::attendance_store::{AttendanceStore, MarkOutcome};
use crate::services::serial_extractor;
use crate::services::ticket_log::TicketLog;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckInOutcome {
    /// The serial matched an attendee, who is now marked present.
    Matched { sno: i64 },
    /// A serial was found but no attendee carries it.
    UnknownTicket { sno: i64 },
    SerialNotFound,
}

impl CheckInOutcome {
    pub fn message(&self) -> &'static str {
        match self {
            CheckInOutcome::Matched { .. } => "Scan and update success",
            CheckInOutcome::UnknownTicket { .. } => "Scan success",
            CheckInOutcome::SerialNotFound => "Serial number not found in the data",
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            CheckInOutcome::Matched { .. } => "matched",
            CheckInOutcome::UnknownTicket { .. } => "unknown_ticket",
            CheckInOutcome::SerialNotFound => "serial_not_found",
        }
    }

    pub fn sno(&self) -> Option<i64> {
        match self {
            CheckInOutcome::Matched { sno } | CheckInOutcome::UnknownTicket { sno } => Some(*sno),
            CheckInOutcome::SerialNotFound => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct CheckIn {
    pub ticket: ScanRecord,
    pub outcome: CheckInOutcome,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ResetReport {
    pub attendees_reset: u64,
    pub scans_reset: usize,
}

/// Local wall-clock time at second precision, the resolution attendance
/// times are shown with.
pub fn current_timestamp() -> NaiveDateTime {
    Local::now().naive_local().trunc_subsecs(0)
}

pub async fn check_in(
    store: &dyn AttendanceStore,
    ticket_log: &Arc<TicketLog>,
    qr_code: &str,
) -> Result<CheckIn, WorkflowError> {
    check_in_at(store, ticket_log, qr_code, current_timestamp()).await
}

/// Records the raw scan first, so even unparseable payloads leave a trace.
pub async fn check_in_at(
    store: &dyn AttendanceStore,
    ticket_log: &Arc<TicketLog>,
    qr_code: &str,
    at: NaiveDateTime,
) -> Result<CheckIn, WorkflowError> {
    let ticket = ScanRecord::scanned(qr_code);
    let entry = ticket.clone();
    let logged = on_ticket_log(ticket_log, move |log| log.append(entry)).await?;
    info!(entries = logged, "Scan appended to ticket log");

    let Some(sno) = serial_extractor::extract_serial_number(qr_code) else {
        warn!("Scanned payload has no serial number");
        return Ok(CheckIn {
            ticket,
            outcome: CheckInOutcome::SerialNotFound,
        });
    };

    let outcome = match store.mark_present(sno, at).await? {
        MarkOutcome::Marked => CheckInOutcome::Matched { sno },
        MarkOutcome::NotFound => CheckInOutcome::UnknownTicket { sno },
    };
    Ok(CheckIn { ticket, outcome })
}

/// Clears attendance in the store, then flips every logged scan to
/// `not_scanned`. The log is left alone when the store reset fails.
pub async fn reset_attendance(
    store: &dyn AttendanceStore,
    ticket_log: &Arc<TicketLog>,
) -> Result<ResetReport, WorkflowError> {
    let attendees_reset = store.reset_all().await?;
    let scans_reset = on_ticket_log(ticket_log, |log| log.reset_statuses()).await?;
    info!(attendees_reset, scans_reset, "Attendance reset");
    Ok(ResetReport {
        attendees_reset,
        scans_reset,
    })
}

/// Runs a ticket log operation on the blocking pool; the log does plain
/// file I/O under a std mutex.
async fn on_ticket_log<T, F>(ticket_log: &Arc<TicketLog>, op: F) -> Result<T, TicketLogError>
where
    T: Send + 'static,
    F: FnOnce(&TicketLog) -> Result<T, TicketLogError> + Send + 'static,
{
    let log = Arc::clone(ticket_log);
    tokio::task::spawn_blocking(move || op(log.as_ref())).await?
}
