//! User accounts
//!
//! A single SQLite table keyed by username. Passwords are stored and compared
//! exactly as given.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use rusqlite::{params, Connection, ErrorCode, OptionalExtension};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::{Error, Result};

pub const DEFAULT_USERS_DB: &str = "users.db";

/// Account role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Formateur,
    Secouriste,
    GrandPublic,
}

impl Role {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Formateur => "formateur",
            Role::Secouriste => "secouriste",
            Role::GrandPublic => "grand_public",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "formateur" => Ok(Role::Formateur),
            "secouriste" => Ok(Role::Secouriste),
            "grand_public" => Ok(Role::GrandPublic),
            other => Err(Error::InvalidInput(format!("unknown role: {other}"))),
        }
    }
}

/// Registration details
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub username: String,
    pub password: String,
    pub role: Role,
    pub fullname: String,
    pub email: String,
}

/// SQLite-backed account store
pub struct UserStore {
    conn: Connection,
}

impl UserStore {
    /// Open or create the store at the provided sqlite path.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let store = Self {
            conn: Connection::open(path)?,
        };
        store.init()?;
        debug!(path = %path.display(), "user store opened");
        Ok(store)
    }

    /// Store that lives only as long as the value.
    pub fn open_in_memory() -> Result<Self> {
        let store = Self {
            conn: Connection::open_in_memory()?,
        };
        store.init()?;
        Ok(store)
    }

    fn init(&self) -> Result<()> {
        self.conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS users (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                username TEXT UNIQUE,
                password TEXT,
                role TEXT,
                fullname TEXT,
                email TEXT
            );",
        )?;
        Ok(())
    }

    /// Create an account.
    ///
    /// Returns `Ok(false)` when the username is already taken.
    pub fn register(&self, user: &NewUser) -> Result<bool> {
        let inserted = self.conn.execute(
            "INSERT INTO users (username, password, role, fullname, email) VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                user.username,
                user.password,
                user.role.as_str(),
                user.fullname,
                user.email
            ],
        );

        match inserted {
            Ok(_) => {
                info!(username = %user.username, role = %user.role, "user registered");
                Ok(true)
            }
            Err(rusqlite::Error::SqliteFailure(e, _)) if e.code == ErrorCode::ConstraintViolation => {
                debug!(username = %user.username, "username already taken");
                Ok(false)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Role of the account matching both username and password.
    ///
    /// Unknown users and wrong passwords both give `Ok(None)`.
    pub fn login(&self, username: &str, password: &str) -> Result<Option<Role>> {
        let role: Option<String> = self
            .conn
            .query_row(
                "SELECT role FROM users WHERE username = ?1 AND password = ?2",
                params![username, password],
                |row| row.get(0),
            )
            .optional()?;

        role.map(|r| r.parse()).transpose()
    }
}
