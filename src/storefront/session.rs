//! Browser-style cart session identifiers.

use uuid::Uuid;

/// Number of random characters after the timestamp.
const SUFFIX_LEN: usize = 9;

/// A fresh session id: `session_<unix millis>_<9 lowercase alphanumerics>`.
pub fn new_session_id() -> String {
    let millis = chrono::Utc::now().timestamp_millis();
    let suffix: String = Uuid::new_v4()
        .simple()
        .to_string()
        .chars()
        .take(SUFFIX_LEN)
        .collect();
    format!("session_{millis}_{suffix}")
}
