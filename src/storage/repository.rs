//! SQLite repository for CRUD operations on accounts and favourites

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;

use super::schema::create_tables;

/// A registered account
#[derive(Debug, Clone)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub password_hash: String,
}

/// Repository for account, favourite, and session data
pub struct UserRepository {
    conn: Connection,
}

impl UserRepository {
    /// Create a new repository, initializing the database if needed
    pub fn new(db_path: &Path) -> Result<Self> {
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent).context("Failed to create database directory")?;
        }

        let conn = Connection::open(db_path).context("Failed to open database")?;

        // Enable foreign keys
        conn.execute("PRAGMA foreign_keys = ON", [])?;

        create_tables(&conn)?;

        Ok(Self { conn })
    }

    /// Create an in-memory repository (for testing)
    #[cfg(test)]
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        create_tables(&conn)?;
        Ok(Self { conn })
    }

    // ==================== Users ====================

    /// Insert a user and return the new row id
    pub fn create_user(&self, username: &str, email: &str, password_hash: &str) -> Result<i64> {
        self.conn.execute(
            "INSERT INTO users (username, email, password_hash) VALUES (?1, ?2, ?3)",
            params![username, email, password_hash],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    pub fn find_user_by_username(&self, username: &str) -> Result<Option<User>> {
        self.conn
            .query_row(
                "SELECT id, username, email, password_hash FROM users WHERE username = ?1",
                params![username],
                Self::user_from_row,
            )
            .optional()
            .context("Failed to look up user by username")
    }

    pub fn find_user_by_email(&self, email: &str) -> Result<Option<User>> {
        self.conn
            .query_row(
                "SELECT id, username, email, password_hash FROM users WHERE email = ?1",
                params![email],
                Self::user_from_row,
            )
            .optional()
            .context("Failed to look up user by email")
    }

    // ==================== Favourites ====================

    /// Add a favourite team. Returns false when it was already present.
    pub fn add_favorite(&self, user_id: i64, team: &str) -> Result<bool> {
        let inserted = self.conn.execute(
            "INSERT OR IGNORE INTO favourite_teams (user_id, team) VALUES (?1, ?2)",
            params![user_id, team],
        )?;
        Ok(inserted > 0)
    }

    /// Remove a favourite team. Returns false when it was not present.
    pub fn remove_favorite(&self, user_id: i64, team: &str) -> Result<bool> {
        let deleted = self.conn.execute(
            "DELETE FROM favourite_teams WHERE user_id = ?1 AND team = ?2",
            params![user_id, team],
        )?;
        Ok(deleted > 0)
    }

    /// Favourite teams of a user, in insertion order
    pub fn favorites_for_user(&self, user_id: i64) -> Result<Vec<String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT team FROM favourite_teams WHERE user_id = ?1 ORDER BY id")?;
        let rows = stmt.query_map(params![user_id], |row| row.get(0))?;

        let mut teams = Vec::new();
        for team in rows {
            teams.push(team?);
        }
        Ok(teams)
    }

    // ==================== Sessions ====================

    pub fn create_session(
        &self,
        token: &str,
        user_id: i64,
        expires_at: DateTime<Utc>,
    ) -> Result<()> {
        self.conn.execute(
            "INSERT INTO sessions (token, user_id, expires_at) VALUES (?1, ?2, ?3)",
            params![token, user_id, expires_at.to_rfc3339()],
        )?;
        Ok(())
    }

    /// Resolve a session token to its user, ignoring expired sessions
    pub fn find_session(&self, token: &str, now: DateTime<Utc>) -> Result<Option<User>> {
        self.conn
            .query_row(
                r#"
                SELECT u.id, u.username, u.email, u.password_hash
                FROM sessions s
                JOIN users u ON u.id = s.user_id
                WHERE s.token = ?1 AND s.expires_at > ?2
                "#,
                params![token, now.to_rfc3339()],
                Self::user_from_row,
            )
            .optional()
            .context("Failed to look up session")
    }

    pub fn delete_session(&self, token: &str) -> Result<()> {
        self.conn
            .execute("DELETE FROM sessions WHERE token = ?1", params![token])?;
        Ok(())
    }

    /// Remove sessions past their expiry. Returns how many were removed.
    pub fn delete_expired_sessions(&self, now: DateTime<Utc>) -> Result<usize> {
        let deleted = self.conn.execute(
            "DELETE FROM sessions WHERE expires_at <= ?1",
            params![now.to_rfc3339()],
        )?;
        Ok(deleted)
    }

    fn user_from_row(row: &rusqlite::Row) -> rusqlite::Result<User> {
        Ok(User {
            id: row.get(0)?,
            username: row.get(1)?,
            email: row.get(2)?,
            password_hash: row.get(3)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn seeded_repo() -> (UserRepository, i64) {
        let repo = UserRepository::in_memory().unwrap();
        let id = repo
            .create_user("alice", "alice@example.com", "$2b$10$hash")
            .unwrap();
        (repo, id)
    }

    #[test]
    fn test_create_and_find_user() {
        let (repo, id) = seeded_repo();

        let user = repo.find_user_by_username("alice").unwrap().unwrap();
        assert_eq!(user.id, id);
        assert_eq!(user.email, "alice@example.com");

        let by_email = repo.find_user_by_email("alice@example.com").unwrap().unwrap();
        assert_eq!(by_email.username, "alice");

        assert!(repo.find_user_by_username("bob").unwrap().is_none());
    }

    #[test]
    fn test_duplicate_username_rejected() {
        let (repo, _) = seeded_repo();
        let result = repo.create_user("alice", "other@example.com", "hash");
        assert!(result.is_err());
    }

    #[test]
    fn test_favorites_round_trip() {
        let (repo, id) = seeded_repo();

        assert!(repo.add_favorite(id, "Arsenal FC").unwrap());
        assert!(repo.add_favorite(id, "Fulham FC").unwrap());
        assert_eq!(
            repo.favorites_for_user(id).unwrap(),
            vec!["Arsenal FC".to_string(), "Fulham FC".to_string()]
        );

        assert!(repo.remove_favorite(id, "Arsenal FC").unwrap());
        assert_eq!(repo.favorites_for_user(id).unwrap(), vec!["Fulham FC".to_string()]);
    }

    #[test]
    fn test_duplicate_favorite_reports_not_inserted() {
        let (repo, id) = seeded_repo();

        assert!(repo.add_favorite(id, "Arsenal FC").unwrap());
        assert!(!repo.add_favorite(id, "Arsenal FC").unwrap());
        assert_eq!(repo.favorites_for_user(id).unwrap().len(), 1);
    }

    #[test]
    fn test_remove_missing_favorite_reports_absent() {
        let (repo, id) = seeded_repo();
        assert!(!repo.remove_favorite(id, "Arsenal FC").unwrap());
    }

    #[test]
    fn test_session_round_trip() {
        let (repo, id) = seeded_repo();
        let now = Utc::now();

        repo.create_session("tok-1", id, now + Duration::hours(1)).unwrap();
        let user = repo.find_session("tok-1", now).unwrap().unwrap();
        assert_eq!(user.username, "alice");

        repo.delete_session("tok-1").unwrap();
        assert!(repo.find_session("tok-1", now).unwrap().is_none());
    }

    #[test]
    fn test_expired_session_not_returned() {
        let (repo, id) = seeded_repo();
        let now = Utc::now();

        repo.create_session("tok-old", id, now - Duration::minutes(1)).unwrap();
        assert!(repo.find_session("tok-old", now).unwrap().is_none());

        assert_eq!(repo.delete_expired_sessions(now).unwrap(), 1);
    }

    #[test]
    fn test_unknown_token_is_none() {
        let (repo, _) = seeded_repo();
        assert!(repo.find_session("missing", Utc::now()).unwrap().is_none());
    }
}
