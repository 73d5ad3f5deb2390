use anyhow::Result;
use rusqlite::Connection;
use tracing::info;

pub fn run(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS app_users (
            id                  TEXT PRIMARY KEY,
            username            TEXT NOT NULL UNIQUE,
            email               TEXT NOT NULL,
            display_name        TEXT NOT NULL,
            salutation          TEXT NOT NULL DEFAULT '',
            password            TEXT,
            role                TEXT NOT NULL CHECK (role IN ('user', 'admin')),
            invited_to_dinner   INTEGER NOT NULL DEFAULT 0,
            created_at          TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now')),
            updated_at          TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
        );

        CREATE INDEX IF NOT EXISTS idx_app_users_role
            ON app_users(role, created_at);

        CREATE TABLE IF NOT EXISTS rsvp_responses (
            id                  TEXT PRIMARY KEY,
            user_id             TEXT NOT NULL UNIQUE REFERENCES app_users(id) ON DELETE CASCADE,
            name                TEXT NOT NULL,
            email               TEXT NOT NULL,
            phone               TEXT,
            will_attend         INTEGER,
            will_attend_dinner  INTEGER,
            created_at          TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now')),
            updated_at          TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
        );

        CREATE TABLE IF NOT EXISTS wishes (
            id          TEXT PRIMARY KEY,
            user_id     TEXT NOT NULL REFERENCES app_users(id) ON DELETE CASCADE,
            name        TEXT NOT NULL,
            message     TEXT NOT NULL,
            created_at  TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
        );

        CREATE INDEX IF NOT EXISTS idx_wishes_created
            ON wishes(created_at);

        -- No UNIQUE(wish_id, session_id, sticker): one reaction per sticker
        -- per session is a client-side rule, not a storage rule.
        CREATE TABLE IF NOT EXISTS wish_reactions (
            id              TEXT PRIMARY KEY,
            wish_id         TEXT NOT NULL REFERENCES wishes(id) ON DELETE CASCADE,
            sticker         TEXT NOT NULL,
            session_id      TEXT NOT NULL,
            reactor_name    TEXT,
            created_at      TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
        );

        CREATE INDEX IF NOT EXISTS idx_wish_reactions_wish
            ON wish_reactions(wish_id, session_id);
        ",
    )?;

    info!("Database migrations complete");
    Ok(())
}
