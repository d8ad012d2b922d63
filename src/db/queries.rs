use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};

use crate::models::EscalationState;

/// Escalation state for a session, if one has been recorded.
pub fn get_session_state(
    conn: &Connection,
    session_id: &str,
) -> anyhow::Result<Option<EscalationState>> {
    let state: Option<String> = conn
        .query_row(
            "SELECT escalation_state FROM sessions WHERE session_id = ?1",
            [session_id],
            |row| row.get(0),
        )
        .optional()?;

    Ok(state.map(|s| EscalationState::parse(&s)))
}

pub fn save_session_state(
    conn: &Connection,
    session_id: &str,
    state: EscalationState,
) -> anyhow::Result<()> {
    let updated_at = Utc::now().naive_utc().format("%Y-%m-%d %H:%M:%S").to_string();

    conn.execute(
        "INSERT INTO sessions (session_id, escalation_state, updated_at)
         VALUES (?1, ?2, ?3)
         ON CONFLICT(session_id) DO UPDATE SET
           escalation_state = excluded.escalation_state,
           updated_at = excluded.updated_at",
        params![session_id, state.as_str(), updated_at],
    )?;
    Ok(())
}

/// Ends a session: the next turn starts over at NotOffered.
pub fn delete_session(conn: &Connection, session_id: &str) -> anyhow::Result<bool> {
    let count = conn.execute("DELETE FROM sessions WHERE session_id = ?1", [session_id])?;
    Ok(count > 0)
}
