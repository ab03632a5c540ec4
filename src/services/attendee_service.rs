use chrono::NaiveDateTime;
use serde_json::Value;

use crate::error::StoreError;
use crate::models::{Attendee, ATTENDANCE_TIME_FORMAT};
use crate::services::attendance_store::AttendanceStore;

/// Columns every export starts with; the first attendee's detail keys follow.
pub const CSV_BASE_COLUMNS: [&str; 5] = [
    "sno",
    "name",
    "attendance",
    "attendance_time",
    "ticket_shared_status",
];

pub struct AttendeeRowView {
    pub sno_label: String,
    pub name: String,
    pub present: bool,
    pub attendance_time_label: String,
    pub ticket_shared: bool,
}

pub struct RegisteredPageData {
    pub attendees: Vec<AttendeeRowView>,
    pub present_count: i64,
    pub total_count: usize,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DashboardCounts {
    pub present_count: i64,
    /// Unique attendees, same figure the registered list shows.
    pub total_count: usize,
    /// Stored records; above `total_count` when duplicates exist.
    pub stored_count: i64,
}

impl DashboardCounts {
    pub fn has_duplicates(&self) -> bool {
        self.stored_count > self.total_count as i64
    }
}

pub async fn load_registered_page(
    store: &dyn AttendanceStore,
) -> Result<RegisteredPageData, StoreError> {
    let attendees = store.list_all().await?;
    let present_count = store.count_present().await?;

    Ok(RegisteredPageData {
        total_count: attendees.len(),
        attendees: attendees.iter().map(row_view).collect(),
        present_count,
    })
}

pub async fn load_dashboard_counts(
    store: &dyn AttendanceStore,
) -> Result<DashboardCounts, StoreError> {
    Ok(DashboardCounts {
        present_count: store.count_present().await?,
        total_count: store.list_all().await?.len(),
        stored_count: store.count_all().await?,
    })
}

fn row_view(attendee: &Attendee) -> AttendeeRowView {
    AttendeeRowView {
        sno_label: attendee.sno.map(|s| s.to_string()).unwrap_or_default(),
        name: attendee.name.clone().unwrap_or_default(),
        present: attendee.attendance,
        attendance_time_label: attendee
            .attendance_time
            .as_ref()
            .map(format_attendance_time)
            .unwrap_or_default(),
        ticket_shared: attendee.ticket_shared_status,
    }
}

pub fn format_attendance_time(at: &NaiveDateTime) -> String {
    at.format(ATTENDANCE_TIME_FORMAT).to_string()
}

/// Renders attendees as CSV, or `None` when there is nobody to export.
///
/// Detail keys absent from the first attendee are not exported; extra
/// columns are in key order.
pub fn build_attendees_csv(attendees: &[Attendee]) -> Option<String> {
    let first = attendees.first()?;
    let mut extra_keys: Vec<&String> = first.details.keys().collect();
    extra_keys.sort();

    let mut header: Vec<&str> = CSV_BASE_COLUMNS.to_vec();
    header.extend(extra_keys.iter().map(|k| k.as_str()));
    let mut csv = header.into_iter().map(esc).collect::<Vec<_>>().join(",");
    csv.push('\n');

    for attendee in attendees {
        let mut cells = vec![
            attendee.sno.map(|s| s.to_string()).unwrap_or_default(),
            attendee.name.clone().unwrap_or_default(),
            attendee.attendance.to_string(),
            attendee
                .attendance_time
                .as_ref()
                .map(format_attendance_time)
                .unwrap_or_default(),
            attendee.ticket_shared_status.to_string(),
        ];
        cells.extend(
            extra_keys
                .iter()
                .map(|key| attendee.details.get(*key).map(cell).unwrap_or_default()),
        );

        let row = cells.iter().map(|c| esc(c)).collect::<Vec<_>>().join(",");
        csv.push_str(&row);
        csv.push('\n');
    }

    Some(csv)
}

fn cell(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn esc(s: &str) -> String {
    if s.contains(',') || s.contains('"') || s.contains('\n') || s.contains('\r') {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}
