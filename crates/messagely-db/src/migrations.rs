use crate::Result;
use rusqlite::Connection;
use tracing::info;

pub fn run(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS schema_version (version INTEGER NOT NULL);"
    )?;

    let version: i64 = conn
        .query_row("SELECT COALESCE(MAX(version), 0) FROM schema_version", [], |r| r.get(0))?;

    if version < 1 {
        info!("Running migration v1 (users, messages)");
        conn.execute_batch(
            "
            CREATE TABLE users (
                username        TEXT PRIMARY KEY NOT NULL,
                password        TEXT NOT NULL,
                first_name      TEXT,
                last_name       TEXT,
                phone           TEXT,
                join_at         TEXT NOT NULL,
                last_login_at   TEXT
            );

            CREATE TABLE messages (
                id              TEXT PRIMARY KEY NOT NULL,
                from_username   TEXT NOT NULL REFERENCES users(username),
                to_username     TEXT NOT NULL REFERENCES users(username),
                body            TEXT NOT NULL,
                sent_at         TEXT NOT NULL,
                read_at         TEXT
            );

            CREATE INDEX idx_messages_from ON messages(from_username, sent_at);
            CREATE INDEX idx_messages_to ON messages(to_username, sent_at);

            INSERT INTO schema_version (version) VALUES (1);
            "
        )?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rerun_is_noop() {
        let conn = Connection::open_in_memory().unwrap();
        run(&conn).unwrap();
        run(&conn).unwrap();

        let versions: i64 = conn
            .query_row("SELECT COUNT(*) FROM schema_version", [], |r| r.get(0))
            .unwrap();
        assert_eq!(versions, 1);
    }
}
