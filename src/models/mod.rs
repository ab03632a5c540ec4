pub mod attendee;
pub mod scan_record;

pub use attendee::{Attendee, AttendeeRow, ATTENDANCE_TIME_FORMAT};
pub use scan_record::{ScanRecord, ScanStatus};
