use crate::Database;
use crate::models::{NewParticipant, NewRsvp, ReactionRow, RsvpRow, UserRow, WishRow};
use anyhow::{Result, anyhow};
use invite_types::models::Role;
use rusqlite::{Connection, OptionalExtension, Row};
use uuid::Uuid;

const USER_COLUMNS: &str = "u.id, u.username, u.email, u.display_name, u.salutation, u.password, u.role, u.invited_to_dinner, u.created_at, u.updated_at";
const RSVP_COLUMNS: &str = "r.id, r.user_id, r.name, r.email, r.phone, r.will_attend, r.will_attend_dinner, r.created_at, r.updated_at";
const WISH_COLUMNS: &str = "id, user_id, name, message, created_at";
const REACTION_COLUMNS: &str = "id, wish_id, sticker, session_id, reactor_name, created_at";

/// Placeholder address for guests that never gave one: the username reduced
/// to `[a-z0-9]`, or "guest" if nothing is left.
pub fn fallback_email(username: &str) -> String {
    let safe: String = username
        .chars()
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
        .collect();
    let safe = if safe.is_empty() { "guest".to_string() } else { safe };
    format!("{}@guests.local", safe)
}

impl Database {
    // -- Users --

    pub fn find_user_by_username(&self, username: &str, role: Role) -> Result<Option<UserRow>> {
        self.with_conn(|conn| query_user_by_username(conn, username, role))
    }

    pub fn get_user_by_id(&self, id: &str) -> Result<Option<UserRow>> {
        self.with_conn(|conn| query_user_by_id(conn, id))
    }

    pub fn create_admin(&self, id: &str, username: &str, display_name: &str, password_hash: &str) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO app_users (id, username, email, display_name, password, role)
                 VALUES (?1, ?2, ?3, ?4, ?5, 'admin')",
                rusqlite::params![id, username, fallback_email(username), display_name, password_hash],
            )?;
            Ok(())
        })
    }

    // -- Participants --

    /// Updates by id when `id` names an existing participant, otherwise
    /// inserts or updates on the username. Email and password are never
    /// overwritten once set.
    pub fn upsert_participant(&self, p: &NewParticipant<'_>) -> Result<UserRow> {
        self.with_conn(|conn| {
            if let Some(id) = p.id {
                let existing = query_user_by_id(conn, id)?.filter(|u| u.role == Role::User.as_str());
                if existing.is_some() {
                    conn.execute(
                        "UPDATE app_users
                         SET username = ?2, display_name = ?3, salutation = ?4, invited_to_dinner = ?5,
                             updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')
                         WHERE id = ?1",
                        rusqlite::params![id, p.username, p.display_name, p.salutation, p.invited_to_dinner],
                    )?;
                    return query_user_by_id(conn, id)?.ok_or_else(|| anyhow!("Participant vanished: {}", id));
                }
            }

            let id = p.id.map(str::to_string).unwrap_or_else(|| Uuid::new_v4().to_string());
            conn.execute(
                "INSERT INTO app_users (id, username, email, display_name, salutation, role, invited_to_dinner)
                 VALUES (?1, ?2, ?3, ?4, ?5, 'user', ?6)
                 ON CONFLICT(username) DO UPDATE SET
                     display_name = excluded.display_name,
                     salutation = excluded.salutation,
                     invited_to_dinner = excluded.invited_to_dinner,
                     updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')
                 WHERE app_users.role = 'user'",
                rusqlite::params![
                    id,
                    p.username,
                    fallback_email(p.username),
                    p.display_name,
                    p.salutation,
                    p.invited_to_dinner
                ],
            )?;

            query_user_by_username(conn, p.username, Role::User)?
                .ok_or_else(|| anyhow!("Username '{}' belongs to an organizer", p.username))
        })
    }

    /// Deletes participants (never organizers). Returns how many went.
    pub fn delete_participants(&self, ids: &[String]) -> Result<usize> {
        if ids.is_empty() {
            return Ok(0);
        }

        self.with_conn(|conn| {
            let sql = format!(
                "DELETE FROM app_users WHERE role = 'user' AND id IN ({})",
                placeholders(ids.len())
            );
            let deleted = conn.execute(&sql, rusqlite::params_from_iter(ids.iter()))?;
            Ok(deleted)
        })
    }

    /// All participants with their RSVP if any, newest first.
    pub fn list_participants(&self) -> Result<Vec<(UserRow, Option<RsvpRow>)>> {
        self.with_conn(|conn| {
            let sql = format!(
                "SELECT {}, {} FROM app_users u
                 LEFT JOIN rsvp_responses r ON r.user_id = u.id
                 WHERE u.role = 'user'
                 ORDER BY u.created_at DESC, u.rowid DESC",
                USER_COLUMNS, RSVP_COLUMNS
            );
            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt
                .query_map([], |row| {
                    let user = user_from_row(row, 0)?;
                    let rsvp_id: Option<String> = row.get(10)?;
                    let rsvp = match rsvp_id {
                        Some(_) => Some(rsvp_from_row(row, 10)?),
                        None => None,
                    };
                    Ok((user, rsvp))
                })?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    pub fn update_display_name(&self, id: &str, display_name: &str) -> Result<Option<UserRow>> {
        self.with_conn(|conn| {
            let changed = conn.execute(
                "UPDATE app_users
                 SET display_name = ?2, updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')
                 WHERE id = ?1 AND role = 'user'",
                (id, display_name),
            )?;
            if changed == 0 {
                return Ok(None);
            }
            query_user_by_id(conn, id)
        })
    }

    // -- RSVP --

    pub fn upsert_rsvp(&self, r: &NewRsvp<'_>) -> Result<RsvpRow> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO rsvp_responses (id, user_id, name, email, phone, will_attend, will_attend_dinner)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
                 ON CONFLICT(user_id) DO UPDATE SET
                     name = excluded.name,
                     email = excluded.email,
                     phone = COALESCE(excluded.phone, phone),
                     will_attend = COALESCE(excluded.will_attend, will_attend),
                     will_attend_dinner = COALESCE(excluded.will_attend_dinner, will_attend_dinner),
                     updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')",
                rusqlite::params![
                    r.id,
                    r.user_id,
                    r.name,
                    r.email,
                    r.phone,
                    r.will_attend,
                    r.will_attend_dinner
                ],
            )?;
            query_rsvp_for_user(conn, r.user_id)?.ok_or_else(|| anyhow!("RSVP vanished for user {}", r.user_id))
        })
    }

    pub fn get_rsvp_for_user(&self, user_id: &str) -> Result<Option<RsvpRow>> {
        self.with_conn(|conn| query_rsvp_for_user(conn, user_id))
    }

    /// Every participant RSVP with its owner, newest first.
    pub fn list_rsvps(&self) -> Result<Vec<(RsvpRow, UserRow)>> {
        self.with_conn(|conn| {
            let sql = format!(
                "SELECT {}, {} FROM rsvp_responses r
                 JOIN app_users u ON u.id = r.user_id
                 WHERE u.role = 'user'
                 ORDER BY r.created_at DESC, r.rowid DESC",
                RSVP_COLUMNS, USER_COLUMNS
            );
            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt
                .query_map([], |row| Ok((rsvp_from_row(row, 0)?, user_from_row(row, 9)?)))?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    // -- Wishes --

    pub fn insert_wish(&self, id: &str, user_id: &str, name: &str, message: &str) -> Result<WishRow> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO wishes (id, user_id, name, message) VALUES (?1, ?2, ?3, ?4)",
                (id, user_id, name, message),
            )?;
            query_wish(conn, id)?.ok_or_else(|| anyhow!("Wish vanished: {}", id))
        })
    }

    pub fn get_wish(&self, id: &str) -> Result<Option<WishRow>> {
        self.with_conn(|conn| query_wish(conn, id))
    }

    /// One page of wishes, newest first. `page` starts at 1.
    pub fn list_wishes(&self, page: u32, limit: u32) -> Result<Vec<WishRow>> {
        let offset = page.saturating_sub(1).saturating_mul(limit);
        self.with_conn(|conn| {
            let sql = format!(
                "SELECT {} FROM wishes ORDER BY created_at DESC, rowid DESC LIMIT ?1 OFFSET ?2",
                WISH_COLUMNS
            );
            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt
                .query_map((limit, offset), wish_from_row)?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    pub fn delete_wish(&self, id: &str) -> Result<bool> {
        self.with_conn(|conn| {
            let deleted = conn.execute("DELETE FROM wishes WHERE id = ?1", [id])?;
            Ok(deleted > 0)
        })
    }

    // -- Reactions --

    /// Appends a reaction. Repeats are not rejected here.
    pub fn insert_reaction(
        &self,
        id: &str,
        wish_id: &str,
        sticker: &str,
        session_id: &str,
        reactor_name: Option<&str>,
    ) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO wish_reactions (id, wish_id, sticker, session_id, reactor_name)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                rusqlite::params![id, wish_id, sticker, session_id, reactor_name],
            )?;
            Ok(())
        })
    }

    /// Reactions on one wish, oldest first.
    pub fn reactions_for_wish(&self, wish_id: &str) -> Result<Vec<ReactionRow>> {
        self.with_conn(|conn| {
            let sql = format!(
                "SELECT {} FROM wish_reactions WHERE wish_id = ?1 ORDER BY created_at, rowid",
                REACTION_COLUMNS
            );
            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt
                .query_map([wish_id], reaction_from_row)?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    /// Reactions one session left on one wish.
    pub fn reactions_for_wish_session(&self, wish_id: &str, session_id: &str) -> Result<Vec<ReactionRow>> {
        self.with_conn(|conn| {
            let sql = format!(
                "SELECT {} FROM wish_reactions WHERE wish_id = ?1 AND session_id = ?2 ORDER BY created_at, rowid",
                REACTION_COLUMNS
            );
            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt
                .query_map((wish_id, session_id), reaction_from_row)?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    /// Batch-fetch reactions for a set of wish IDs.
    pub fn reactions_for_wishes(&self, wish_ids: &[String]) -> Result<Vec<ReactionRow>> {
        if wish_ids.is_empty() {
            return Ok(vec![]);
        }

        self.with_conn(|conn| {
            let sql = format!(
                "SELECT {} FROM wish_reactions WHERE wish_id IN ({}) ORDER BY created_at, rowid",
                REACTION_COLUMNS,
                placeholders(wish_ids.len())
            );
            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt
                .query_map(rusqlite::params_from_iter(wish_ids.iter()), reaction_from_row)?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }
}

fn placeholders(n: usize) -> String {
    (1..=n).map(|i| format!("?{}", i)).collect::<Vec<_>>().join(", ")
}

fn user_from_row(row: &Row<'_>, at: usize) -> rusqlite::Result<UserRow> {
    Ok(UserRow {
        id: row.get(at)?,
        username: row.get(at + 1)?,
        email: row.get(at + 2)?,
        display_name: row.get(at + 3)?,
        salutation: row.get(at + 4)?,
        password: row.get(at + 5)?,
        role: row.get(at + 6)?,
        invited_to_dinner: row.get(at + 7)?,
        created_at: row.get(at + 8)?,
        updated_at: row.get(at + 9)?,
    })
}

fn rsvp_from_row(row: &Row<'_>, at: usize) -> rusqlite::Result<RsvpRow> {
    Ok(RsvpRow {
        id: row.get(at)?,
        user_id: row.get(at + 1)?,
        name: row.get(at + 2)?,
        email: row.get(at + 3)?,
        phone: row.get(at + 4)?,
        will_attend: row.get(at + 5)?,
        will_attend_dinner: row.get(at + 6)?,
        created_at: row.get(at + 7)?,
        updated_at: row.get(at + 8)?,
    })
}

fn wish_from_row(row: &Row<'_>) -> rusqlite::Result<WishRow> {
    Ok(WishRow {
        id: row.get(0)?,
        user_id: row.get(1)?,
        name: row.get(2)?,
        message: row.get(3)?,
        created_at: row.get(4)?,
    })
}

fn reaction_from_row(row: &Row<'_>) -> rusqlite::Result<ReactionRow> {
    Ok(ReactionRow {
        id: row.get(0)?,
        wish_id: row.get(1)?,
        sticker: row.get(2)?,
        session_id: row.get(3)?,
        reactor_name: row.get(4)?,
        created_at: row.get(5)?,
    })
}

fn query_user_by_username(conn: &Connection, username: &str, role: Role) -> Result<Option<UserRow>> {
    let sql = format!("SELECT {} FROM app_users u WHERE u.username = ?1 AND u.role = ?2", USER_COLUMNS);
    let row = conn
        .query_row(&sql, (username, role.as_str()), |row| user_from_row(row, 0))
        .optional()?;
    Ok(row)
}

fn query_user_by_id(conn: &Connection, id: &str) -> Result<Option<UserRow>> {
    let sql = format!("SELECT {} FROM app_users u WHERE u.id = ?1", USER_COLUMNS);
    let row = conn.query_row(&sql, [id], |row| user_from_row(row, 0)).optional()?;
    Ok(row)
}

fn query_rsvp_for_user(conn: &Connection, user_id: &str) -> Result<Option<RsvpRow>> {
    let sql = format!("SELECT {} FROM rsvp_responses r WHERE r.user_id = ?1", RSVP_COLUMNS);
    let row = conn.query_row(&sql, [user_id], |row| rsvp_from_row(row, 0)).optional()?;
    Ok(row)
}

fn query_wish(conn: &Connection, id: &str) -> Result<Option<WishRow>> {
    let sql = format!("SELECT {} FROM wishes WHERE id = ?1", WISH_COLUMNS);
    let row = conn.query_row(&sql, [id], wish_from_row).optional()?;
    Ok(row)
}
