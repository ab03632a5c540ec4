pub mod attendance_store;
pub mod attendee_service;
pub mod checkin_service;
pub mod serial_extractor;
pub mod ticket_log;
