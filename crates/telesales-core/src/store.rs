//! SQLite-backed CRM storage.
//!
//! # Tables
//!
//! ```text
//! agents       id TEXT PK | name | is_active | deleted_at | created_at
//! leads        id TEXT PK | name | phone | score | deposit_status | created_at
//! assignments  id INTEGER PK | agent_id -> agents | lead_id -> leads | is_active | assigned_at
//! ```
//!
//! Assignment rows are never deleted. A distribution run flips every active
//! row to inactive and inserts the new batch inside one `IMMEDIATE`
//! transaction, so concurrent runs serialise on the write lock and readers
//! only ever see a complete batch. A partial unique index keeps at most one
//! active row per lead.

use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::types::{Type, Value};
use rusqlite::{params, Connection, TransactionBehavior};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{CrmError, Result};
use crate::provider::{ActiveAgentsProvider, AssignmentStore, EligibleLeadsProvider};
use crate::types::{Agent, Assignment, Lead};

const SCHEMA: &str = "
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS agents (
    id          TEXT PRIMARY KEY,
    name        TEXT NOT NULL,
    is_active   INTEGER NOT NULL DEFAULT 1,
    deleted_at  TEXT,
    created_at  TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS leads (
    id              TEXT PRIMARY KEY,
    name            TEXT NOT NULL,
    phone           TEXT,
    score           REAL,
    deposit_status  TEXT NOT NULL DEFAULT 'open',
    created_at      TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS assignments (
    id           INTEGER PRIMARY KEY AUTOINCREMENT,
    agent_id     TEXT NOT NULL REFERENCES agents(id),
    lead_id      TEXT NOT NULL REFERENCES leads(id),
    is_active    INTEGER NOT NULL,
    assigned_at  TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS assignments_by_agent ON assignments(agent_id, is_active);
CREATE UNIQUE INDEX IF NOT EXISTS assignments_one_active_per_lead
    ON assignments(lead_id) WHERE is_active = 1;
";

// ---------------------------------------------------------------------------
// Records
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DepositStatus {
    Open,
    Closed,
}

impl DepositStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            DepositStatus::Open => "open",
            DepositStatus::Closed => "closed",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentRecord {
    pub id: String,
    pub name: String,
    pub is_active: bool,
    pub deleted_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeadRecord {
    pub id: String,
    pub name: String,
    pub phone: Option<String>,
    pub score: Option<f64>,
    pub deposit_status: DepositStatus,
    pub created_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Conversion helpers
// ---------------------------------------------------------------------------

fn db_err(e: rusqlite::Error) -> CrmError {
    CrmError::Database(e.to_string())
}

fn tx_err(e: rusqlite::Error) -> CrmError {
    CrmError::StoreTransaction(e.to_string())
}

fn ts(t: DateTime<Utc>) -> String {
    t.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn parse_ts(idx: usize, raw: &str) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|d| d.with_timezone(&Utc))
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

/// Scores imported from spreadsheets sometimes land as text; unparseable
/// values read back as absent.
fn score_from_value(v: Value) -> Option<f64> {
    match v {
        Value::Real(f) => Some(f),
        Value::Integer(i) => Some(i as f64),
        Value::Text(t) => t.trim().parse().ok(),
        Value::Null | Value::Blob(_) => None,
    }
}

fn assignment_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Assignment> {
    let assigned_at: String = row.get(3)?;
    Ok(Assignment {
        agent_id: row.get(0)?,
        lead_id: row.get(1)?,
        is_active: row.get(2)?,
        assigned_at: parse_ts(3, &assigned_at)?,
    })
}

// ---------------------------------------------------------------------------
// SqliteCrm
// ---------------------------------------------------------------------------

pub struct SqliteCrm {
    conn: Mutex<Connection>,
}

impl SqliteCrm {
    /// Open or create the database at `path` and apply the schema.
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(path).map_err(db_err)?;
        Self::init(conn)
    }

    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(db_err)?;
        Self::init(conn)
    }

    fn init(conn: Connection) -> Result<Self> {
        conn.busy_timeout(Duration::from_secs(5)).map_err(db_err)?;
        conn.execute_batch(SCHEMA).map_err(db_err)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| CrmError::Database("connection lock poisoned".into()))
    }

    // -----------------------------------------------------------------------
    // Agents
    // -----------------------------------------------------------------------

    pub fn add_agent(&self, name: &str) -> Result<AgentRecord> {
        let record = AgentRecord {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            is_active: true,
            deleted_at: None,
            created_at: Utc::now(),
        };
        self.conn()?
            .execute(
                "INSERT INTO agents (id, name, is_active, created_at) VALUES (?1, ?2, 1, ?3)",
                params![record.id, record.name, ts(record.created_at)],
            )
            .map_err(db_err)?;
        Ok(record)
    }

    /// Stop routing leads to an agent without removing them.
    pub fn deactivate_agent(&self, id: &str) -> Result<()> {
        let changed = self
            .conn()?
            .execute("UPDATE agents SET is_active = 0 WHERE id = ?1", params![id])
            .map_err(db_err)?;
        if changed == 0 {
            return Err(CrmError::AgentNotFound(id.to_string()));
        }
        Ok(())
    }

    /// Soft delete: the row stays for assignment history. Removing an
    /// already-removed agent is a no-op and keeps the first `deleted_at`.
    pub fn remove_agent(&self, id: &str) -> Result<()> {
        let conn = self.conn()?;
        let changed = conn
            .execute(
                "UPDATE agents SET is_active = 0, deleted_at = ?2
                 WHERE id = ?1 AND deleted_at IS NULL",
                params![id, ts(Utc::now())],
            )
            .map_err(db_err)?;
        if changed == 0 {
            let exists: bool = conn
                .query_row(
                    "SELECT EXISTS(SELECT 1 FROM agents WHERE id = ?1)",
                    params![id],
                    |row| row.get(0),
                )
                .map_err(db_err)?;
            if !exists {
                return Err(CrmError::AgentNotFound(id.to_string()));
            }
        }
        Ok(())
    }

    pub fn list_agents(&self) -> Result<Vec<AgentRecord>> {
        let conn = self.conn()?;
        let mut stmt = conn
            .prepare(
                "SELECT id, name, is_active, deleted_at, created_at
                 FROM agents ORDER BY created_at, rowid",
            )
            .map_err(db_err)?;
        let rows = stmt
            .query_map([], |row| {
                let deleted_at: Option<String> = row.get(3)?;
                let created_at: String = row.get(4)?;
                Ok(AgentRecord {
                    id: row.get(0)?,
                    name: row.get(1)?,
                    is_active: row.get(2)?,
                    deleted_at: deleted_at.as_deref().map(|s| parse_ts(3, s)).transpose()?,
                    created_at: parse_ts(4, &created_at)?,
                })
            })
            .map_err(db_err)?;
        rows.collect::<rusqlite::Result<Vec<_>>>().map_err(db_err)
    }

    // -----------------------------------------------------------------------
    // Leads
    // -----------------------------------------------------------------------

    pub fn add_lead(&self, name: &str, phone: Option<&str>, score: Option<f64>) -> Result<LeadRecord> {
        if let Some(s) = score {
            if !(0.0..=1.0).contains(&s) {
                return Err(CrmError::InvalidScore(s));
            }
        }
        let record = LeadRecord {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            phone: phone.map(str::to_string),
            score,
            deposit_status: DepositStatus::Open,
            created_at: Utc::now(),
        };
        self.conn()?
            .execute(
                "INSERT INTO leads (id, name, phone, score, deposit_status, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![
                    record.id,
                    record.name,
                    record.phone,
                    record.score,
                    record.deposit_status.as_str(),
                    ts(record.created_at)
                ],
            )
            .map_err(db_err)?;
        Ok(record)
    }

    /// Mark a lead's deposit as closed; it drops out of future runs.
    pub fn close_lead(&self, id: &str) -> Result<()> {
        let changed = self
            .conn()?
            .execute(
                "UPDATE leads SET deposit_status = 'closed' WHERE id = ?1",
                params![id],
            )
            .map_err(db_err)?;
        if changed == 0 {
            return Err(CrmError::LeadNotFound(id.to_string()));
        }
        Ok(())
    }

    pub fn list_leads(&self) -> Result<Vec<LeadRecord>> {
        let conn = self.conn()?;
        let mut stmt = conn
            .prepare(
                "SELECT id, name, phone, score, deposit_status, created_at
                 FROM leads ORDER BY created_at, rowid",
            )
            .map_err(db_err)?;
        let rows = stmt
            .query_map([], |row| {
                let status: String = row.get(4)?;
                let created_at: String = row.get(5)?;
                Ok(LeadRecord {
                    id: row.get(0)?,
                    name: row.get(1)?,
                    phone: row.get(2)?,
                    score: score_from_value(row.get(3)?),
                    deposit_status: if status == "closed" {
                        DepositStatus::Closed
                    } else {
                        DepositStatus::Open
                    },
                    created_at: parse_ts(5, &created_at)?,
                })
            })
            .map_err(db_err)?;
        rows.collect::<rusqlite::Result<Vec<_>>>().map_err(db_err)
    }

    // -----------------------------------------------------------------------
    // Assignments
    // -----------------------------------------------------------------------

    /// Current assignments, optionally for one agent, in insertion order.
    pub fn active_assignments(&self, agent_id: Option<&str>) -> Result<Vec<Assignment>> {
        let conn = self.conn()?;
        let mut stmt = conn
            .prepare(
                "SELECT agent_id, lead_id, is_active, assigned_at FROM assignments
                 WHERE is_active = 1 AND (?1 IS NULL OR agent_id = ?1)
                 ORDER BY id",
            )
            .map_err(db_err)?;
        let rows = stmt
            .query_map(params![agent_id], assignment_from_row)
            .map_err(db_err)?;
        rows.collect::<rusqlite::Result<Vec<_>>>().map_err(db_err)
    }

    /// Every assignment ever made for a lead, oldest first.
    pub fn assignment_history(&self, lead_id: &str) -> Result<Vec<Assignment>> {
        let conn = self.conn()?;
        let mut stmt = conn
            .prepare(
                "SELECT agent_id, lead_id, is_active, assigned_at FROM assignments
                 WHERE lead_id = ?1 ORDER BY id",
            )
            .map_err(db_err)?;
        let rows = stmt
            .query_map(params![lead_id], assignment_from_row)
            .map_err(db_err)?;
        rows.collect::<rusqlite::Result<Vec<_>>>().map_err(db_err)
    }
}

// ---------------------------------------------------------------------------
// Collaborator impls
// ---------------------------------------------------------------------------

impl ActiveAgentsProvider for SqliteCrm {
    fn list_active_agents(&self) -> Result<Vec<Agent>> {
        let conn = self.conn()?;
        let mut stmt = conn
            .prepare(
                "SELECT id, name FROM agents
                 WHERE is_active = 1 AND deleted_at IS NULL
                 ORDER BY created_at, rowid",
            )
            .map_err(db_err)?;
        let rows = stmt
            .query_map([], |row| Ok(Agent::new(row.get::<_, String>(0)?, row.get::<_, String>(1)?)))
            .map_err(db_err)?;
        rows.collect::<rusqlite::Result<Vec<_>>>().map_err(db_err)
    }
}

impl EligibleLeadsProvider for SqliteCrm {
    fn list_eligible_leads(&self) -> Result<Vec<Lead>> {
        let conn = self.conn()?;
        let mut stmt = conn
            .prepare(
                "SELECT id, score FROM leads
                 WHERE deposit_status != 'closed'
                 ORDER BY created_at, rowid",
            )
            .map_err(db_err)?;
        let rows = stmt
            .query_map([], |row| {
                Ok(Lead::new(
                    row.get::<_, String>(0)?,
                    score_from_value(row.get(1)?),
                ))
            })
            .map_err(db_err)?;
        rows.collect::<rusqlite::Result<Vec<_>>>().map_err(db_err)
    }
}

impl AssignmentStore for SqliteCrm {
    fn reset_and_bulk_assign(&self, records: &[Assignment]) -> Result<usize> {
        let mut conn = self.conn()?;
        // Dropping `tx` without commit rolls back both steps.
        let tx = conn
            .transaction_with_behavior(TransactionBehavior::Immediate)
            .map_err(tx_err)?;
        let deactivated = tx
            .execute("UPDATE assignments SET is_active = 0 WHERE is_active = 1", [])
            .map_err(tx_err)?;
        let mut inserted = 0usize;
        {
            let mut stmt = tx
                .prepare(
                    "INSERT INTO assignments (agent_id, lead_id, is_active, assigned_at)
                     VALUES (?1, ?2, ?3, ?4)",
                )
                .map_err(tx_err)?;
            for r in records {
                inserted += stmt
                    .execute(params![r.agent_id, r.lead_id, r.is_active, ts(r.assigned_at)])
                    .map_err(tx_err)?;
            }
        }
        tx.commit().map_err(tx_err)?;
        tracing::debug!(deactivated, inserted, "assignment set replaced");
        Ok(inserted)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
