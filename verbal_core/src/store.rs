//! Profile persistence - whole-document load/save with atomic updates

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use rusqlite::{params, Connection, ErrorCode, OptionalExtension, TransactionBehavior};

use crate::error::{Result, VerbalError};
use crate::profile::Profile;

/// Storage for learner profiles. Every mutation replaces the whole profile.
pub trait ProfileRepository {
    fn load(&self, id: &str) -> Result<Option<Profile>>;

    fn save(&self, profile: &Profile) -> Result<()>;

    fn list(&self) -> Result<Vec<Profile>>;

    fn delete(&self, id: &str) -> Result<bool>;

    /// Create a profile. Names are unique, ignoring case.
    fn create(&self, name: &str) -> Result<Profile>;

    /// Read, mutate and write back one profile as a single transaction
    fn update(&self, id: &str, mutate: &mut dyn FnMut(&mut Profile)) -> Result<Profile>;
}

// ============= SQLite =============

/// Profiles stored as JSON documents in SQLite
#[derive(Debug, Clone)]
pub struct SqliteProfileStore {
    db_path: PathBuf,
}

/// Initialize database with schema
pub fn init_database(db_path: &Path) -> Result<Connection> {
    let conn = Connection::open(db_path)?;
    conn.busy_timeout(Duration::from_secs(5))?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS profiles (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL UNIQUE COLLATE NOCASE,
            data TEXT NOT NULL,
            created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP,
            updated_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
        )",
        [],
    )?;

    Ok(conn)
}

fn read_profile(conn: &Connection, id: &str) -> Result<Option<Profile>> {
    let data: Option<String> = conn
        .query_row("SELECT data FROM profiles WHERE id = ?1", params![id], |row| row.get(0))
        .optional()?;
    match data {
        Some(json) => Ok(Some(serde_json::from_str(&json)?)),
        None => Ok(None),
    }
}

fn write_profile(conn: &Connection, profile: &Profile) -> Result<()> {
    let data = serde_json::to_string(profile)?;
    conn.execute(
        "INSERT INTO profiles (id, name, data) VALUES (?1, ?2, ?3)
         ON CONFLICT(id) DO UPDATE SET
            name = excluded.name,
            data = excluded.data,
            updated_at = CURRENT_TIMESTAMP",
        params![profile.id, profile.name, data],
    )
    .map_err(|e| duplicate_or(e, &profile.name))?;
    Ok(())
}

fn duplicate_or(err: rusqlite::Error, name: &str) -> VerbalError {
    match err {
        rusqlite::Error::SqliteFailure(ref code, _)
            if code.code == ErrorCode::ConstraintViolation =>
        {
            VerbalError::DuplicateProfile(name.to_string())
        }
        other => VerbalError::Storage(other),
    }
}

impl SqliteProfileStore {
    /// Open (and create if needed) the profile database at `db_path`
    pub fn open(db_path: impl Into<PathBuf>) -> Result<Self> {
        let db_path = db_path.into();
        init_database(&db_path)?;
        Ok(Self { db_path })
    }

    fn connect(&self) -> Result<Connection> {
        let conn = Connection::open(&self.db_path)?;
        conn.busy_timeout(Duration::from_secs(5))?;
        Ok(conn)
    }
}

impl ProfileRepository for SqliteProfileStore {
    fn load(&self, id: &str) -> Result<Option<Profile>> {
        read_profile(&self.connect()?, id)
    }

    fn save(&self, profile: &Profile) -> Result<()> {
        write_profile(&self.connect()?, profile)
    }

    fn list(&self) -> Result<Vec<Profile>> {
        let conn = self.connect()?;
        let mut stmt = conn.prepare("SELECT data FROM profiles ORDER BY rowid")?;
        let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;

        let mut profiles = Vec::new();
        for row in rows {
            profiles.push(serde_json::from_str(&row?)?);
        }
        Ok(profiles)
    }

    fn delete(&self, id: &str) -> Result<bool> {
        let deleted = self
            .connect()?
            .execute("DELETE FROM profiles WHERE id = ?1", params![id])?;
        Ok(deleted > 0)
    }

    fn create(&self, name: &str) -> Result<Profile> {
        let profile = Profile::new(name);
        let conn = self.connect()?;
        conn.execute(
            "INSERT INTO profiles (id, name, data) VALUES (?1, ?2, ?3)",
            params![profile.id, profile.name, serde_json::to_string(&profile)?],
        )
        .map_err(|e| duplicate_or(e, &profile.name))?;
        log::info!("Created profile '{}' ({})", profile.name, profile.id);
        Ok(profile)
    }

    fn update(&self, id: &str, mutate: &mut dyn FnMut(&mut Profile)) -> Result<Profile> {
        let mut conn = self.connect()?;
        // IMMEDIATE takes the write lock up front so two updates never
        // interleave their read and write halves
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

        let mut profile =
            read_profile(&tx, id)?.ok_or_else(|| VerbalError::ProfileNotFound(id.to_string()))?;
        mutate(&mut profile);
        write_profile(&tx, &profile)?;

        tx.commit()?;
        Ok(profile)
    }
}

// ============= In-memory =============

/// Profiles held in memory; same semantics as the SQLite store
#[derive(Debug, Default)]
pub struct MemoryProfileStore {
    profiles: Mutex<HashMap<String, Profile>>,
}

impl MemoryProfileStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ProfileRepository for MemoryProfileStore {
    fn load(&self, id: &str) -> Result<Option<Profile>> {
        let profiles = self.profiles.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(profiles.get(id).cloned())
    }

    fn save(&self, profile: &Profile) -> Result<()> {
        let mut profiles = self.profiles.lock().unwrap_or_else(PoisonError::into_inner);
        let clash = profiles
            .values()
            .any(|p| p.id != profile.id && p.name.eq_ignore_ascii_case(&profile.name));
        if clash {
            return Err(VerbalError::DuplicateProfile(profile.name.clone()));
        }
        profiles.insert(profile.id.clone(), profile.clone());
        Ok(())
    }

    fn list(&self) -> Result<Vec<Profile>> {
        let profiles = self.profiles.lock().unwrap_or_else(PoisonError::into_inner);
        let mut all: Vec<Profile> = profiles.values().cloned().collect();
        all.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.name.cmp(&b.name)));
        Ok(all)
    }

    fn delete(&self, id: &str) -> Result<bool> {
        let mut profiles = self.profiles.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(profiles.remove(id).is_some())
    }

    fn create(&self, name: &str) -> Result<Profile> {
        let profile = Profile::new(name);
        self.save(&profile)?;
        Ok(profile)
    }

    fn update(&self, id: &str, mutate: &mut dyn FnMut(&mut Profile)) -> Result<Profile> {
        let mut profiles = self.profiles.lock().unwrap_or_else(PoisonError::into_inner);
        let profile = profiles
            .get_mut(id)
            .ok_or_else(|| VerbalError::ProfileNotFound(id.to_string()))?;
        mutate(profile);
        Ok(profile.clone())
    }
}
