use chrono::{DateTime, NaiveDateTime};
use serde_json::{Map, Value};
use tracing::warn;

pub const ATTENDANCE_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Shapes accepted for stored times. Rows are seeded outside the app, so
/// anything else is read as "not checked in".
const STORED_TIME_FORMATS: [&str; 3] = [
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct AttendeeRow {
    pub id: String,
    pub sno: Option<i64>,
    pub name: Option<String>,
    pub details: Option<String>,
    pub attendance: Option<bool>,
    pub attendance_time: Option<String>,
    pub ticket_shared_status: Option<bool>,
}

/// Attendee with missing attendance fields normalized to their defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct Attendee {
    pub id: String,
    pub sno: Option<i64>,
    pub name: Option<String>,
    pub details: Map<String, Value>,
    pub attendance: bool,
    pub attendance_time: Option<NaiveDateTime>,
    pub ticket_shared_status: bool,
}

impl From<AttendeeRow> for Attendee {
    fn from(row: AttendeeRow) -> Self {
        let raw = row
            .details
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or("{}");
        let details = match serde_json::from_str::<Value>(raw) {
            Ok(Value::Object(map)) => map,
            Ok(_) | Err(_) => {
                warn!("Attendee {} has unreadable details, ignoring them", row.id);
                Map::new()
            }
        };

        let attendance_time = row
            .attendance_time
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .and_then(|raw| {
                let parsed = parse_stored_time(raw);
                if parsed.is_none() {
                    warn!("Attendee {} has unreadable attendance_time {:?}, ignoring it", row.id, raw);
                }
                parsed
            });

        Self {
            id: row.id,
            sno: row.sno,
            name: row.name,
            details,
            attendance: row.attendance.unwrap_or(false),
            attendance_time,
            ticket_shared_status: row.ticket_shared_status.unwrap_or(false),
        }
    }
}

fn parse_stored_time(raw: &str) -> Option<NaiveDateTime> {
    STORED_TIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .or_else(|| DateTime::parse_from_rfc3339(raw).ok().map(|dt| dt.naive_local()))
}
