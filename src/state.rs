use std::sync::Arc;

use cookie::Key;

use crate::config::AdminCredentials;
use crate::services::attendance_store::AttendanceStore;
use crate::services::ticket_log::TicketLog;

/// Everything a handler needs, built once in `main` and cloned per request.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn AttendanceStore>,
    pub ticket_log: Arc<TicketLog>,
    pub admin: Arc<AdminCredentials>,
    pub session_key: Key,
}

impl AppState {
    pub fn new(
        store: Arc<dyn AttendanceStore>,
        ticket_log: TicketLog,
        admin: AdminCredentials,
        session_key: Key,
    ) -> Self {
        Self {
            store,
            ticket_log: Arc::new(ticket_log),
            admin: Arc::new(admin),
            session_key,
        }
    }
}
