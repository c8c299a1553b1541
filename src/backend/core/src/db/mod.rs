//! Database layer for Inkledger.
//!
//! Uses PostgreSQL for persistent storage with sqlx. Schema lives in
//! `migrations/` and is embedded at compile time.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{postgres::PgPoolOptions, PgPool, Postgres, Transaction};
use std::time::Duration;
use tracing::{debug, info, instrument};
use uuid::Uuid;

use crate::config::DatabaseConfig;
use crate::error::{ErrorCode, ErrorContext, InkError, Result};
use crate::events::{EventId, EventKind, LifecycleEvent};
use crate::inventory::{InkCatalogEntry, InkType, InkUnit, Printer, UnitStatus};
use crate::seed::SeedData;
use crate::store::{Catalog, EventStore, InventoryStore, UnitRegistry};

/// Database connection and operations.
#[derive(Clone)]
pub struct Database {
    pool: PgPool,
}

impl Database {
    /// Create a new database connection pool.
    pub async fn connect(config: &DatabaseConfig) -> Result<Self> {
        let url = config.url.as_deref().ok_or_else(|| {
            InkError::new(ErrorCode::MissingConfiguration, "database.url is not set")
        })?;

        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(Duration::from_secs(5))
            .connect(url)
            .await?;

        info!(max_connections = config.max_connections, "Database pool ready");
        Ok(Self { pool })
    }

    /// Run migrations.
    pub async fn migrate(&self) -> Result<()> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .context("Failed to run database migrations")
    }

    async fn begin(&self) -> Result<Transaction<'static, Postgres>> {
        self.pool
            .begin()
            .await
            .with_error_code(ErrorCode::DatabaseTransactionFailed)
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Event Operations
// ═══════════════════════════════════════════════════════════════════════════════

#[async_trait]
impl EventStore for Database {
    #[instrument(skip(self, event), fields(unit_id = %event.unit_id, event_kind = %event.kind))]
    async fn append(&self, event: LifecycleEvent) -> Result<LifecycleEvent> {
        sqlx::query(
            r#"
            INSERT INTO unit_events (id, occurred_at, unit_id, printer_id, event_kind, detail)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(event.id.0)
        .bind(event.timestamp)
        .bind(&event.unit_id)
        .bind(&event.printer_id)
        .bind(event.kind.as_str())
        .bind(&event.detail)
        .execute(&self.pool)
        .await?;

        debug!(event_id = %event.id, "Event appended");
        Ok(event)
    }

    async fn list_by_unit(&self, unit_id: &str) -> Result<Vec<LifecycleEvent>> {
        let rows = sqlx::query_as::<_, EventRow>(
            r#"
            SELECT id, occurred_at, unit_id, printer_id, event_kind, detail
            FROM unit_events
            WHERE unit_id = $1
            ORDER BY occurred_at ASC, seq ASC
            "#,
        )
        .bind(unit_id)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(LifecycleEvent::try_from).collect()
    }

    async fn list_all(&self) -> Result<Vec<LifecycleEvent>> {
        let rows = sqlx::query_as::<_, EventRow>(
            r#"
            SELECT id, occurred_at, unit_id, printer_id, event_kind, detail
            FROM unit_events
            ORDER BY occurred_at DESC, seq DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(LifecycleEvent::try_from).collect()
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: EventId) -> Result<bool> {
        let result = sqlx::query("DELETE FROM unit_events WHERE id = $1")
            .bind(id.0)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    #[instrument(skip(self))]
    async fn delete_all_for_unit(&self, unit_id: &str) -> Result<u64> {
        let result = sqlx::query("DELETE FROM unit_events WHERE unit_id = $1")
            .bind(unit_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Unit Operations
// ═══════════════════════════════════════════════════════════════════════════════

#[async_trait]
impl UnitRegistry for Database {
    #[instrument(skip(self, unit), fields(unit_id = %unit.unit_id))]
    async fn insert_unit(&self, unit: InkUnit) -> Result<InkUnit> {
        let result = sqlx::query(
            r#"
            INSERT INTO ink_units (unit_id, custom_name, ink_code, status, current_printer_id)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (unit_id) DO NOTHING
            "#,
        )
        .bind(&unit.unit_id)
        .bind(&unit.custom_name)
        .bind(&unit.ink_code)
        .bind(unit.status.as_str())
        .bind(&unit.current_printer_id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(InkError::unit_already_exists(&unit.unit_id));
        }
        Ok(unit)
    }

    async fn get_unit(&self, unit_id: &str) -> Result<Option<InkUnit>> {
        let row = sqlx::query_as::<_, UnitRow>(
            r#"
            SELECT unit_id, custom_name, ink_code, status, current_printer_id
            FROM ink_units
            WHERE unit_id = $1
            "#,
        )
        .bind(unit_id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(InkUnit::try_from).transpose()
    }

    async fn list_units(&self, statuses: &[UnitStatus]) -> Result<Vec<InkUnit>> {
        let statuses: Vec<&str> = statuses.iter().map(|s| s.as_str()).collect();
        let rows = sqlx::query_as::<_, UnitRow>(
            r#"
            SELECT unit_id, custom_name, ink_code, status, current_printer_id
            FROM ink_units
            WHERE status = ANY($1)
            ORDER BY unit_id
            "#,
        )
        .bind(&statuses)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(InkUnit::try_from).collect()
    }

    #[instrument(skip(self, unit), fields(unit_id = %unit.unit_id))]
    async fn update_unit(&self, unit: InkUnit) -> Result<InkUnit> {
        let result = sqlx::query(
            r#"
            UPDATE ink_units
            SET custom_name = $2, ink_code = $3, status = $4, current_printer_id = $5
            WHERE unit_id = $1
            "#,
        )
        .bind(&unit.unit_id)
        .bind(&unit.custom_name)
        .bind(&unit.ink_code)
        .bind(unit.status.as_str())
        .bind(&unit.current_printer_id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(InkError::unit_not_found(&unit.unit_id));
        }
        Ok(unit)
    }

    async fn remove_unit(&self, unit_id: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM ink_units WHERE unit_id = $1")
            .bind(unit_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Catalog Operations
// ═══════════════════════════════════════════════════════════════════════════════

#[async_trait]
impl Catalog for Database {
    async fn get_ink(&self, code: &str) -> Result<Option<InkCatalogEntry>> {
        let row = sqlx::query_as::<_, InkRow>(
            "SELECT code, name, ink_type, color FROM inks WHERE code = $1",
        )
        .bind(code)
        .fetch_optional(&self.pool)
        .await?;

        row.map(InkCatalogEntry::try_from).transpose()
    }

    async fn list_inks(&self) -> Result<Vec<InkCatalogEntry>> {
        let rows = sqlx::query_as::<_, InkRow>(
            "SELECT code, name, ink_type, color FROM inks ORDER BY code",
        )
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(InkCatalogEntry::try_from).collect()
    }

    async fn get_printer(&self, printer_id: &str) -> Result<Option<Printer>> {
        let row = sqlx::query_as::<_, PrinterRow>(
            "SELECT printer_id, name FROM printers WHERE printer_id = $1",
        )
        .bind(printer_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Printer::from))
    }

    async fn list_printers(&self) -> Result<Vec<Printer>> {
        let rows = sqlx::query_as::<_, PrinterRow>(
            "SELECT printer_id, name FROM printers ORDER BY printer_id",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Printer::from).collect())
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Cross-table Operations
// ═══════════════════════════════════════════════════════════════════════════════

#[async_trait]
impl InventoryStore for Database {
    #[instrument(skip(self))]
    async fn delete_unit_cascade(&self, unit_id: &str) -> Result<Option<u64>> {
        let mut tx = self.begin().await?;

        let events = sqlx::query("DELETE FROM unit_events WHERE unit_id = $1")
            .bind(unit_id)
            .execute(&mut *tx)
            .await?;
        let unit = sqlx::query("DELETE FROM ink_units WHERE unit_id = $1")
            .bind(unit_id)
            .execute(&mut *tx)
            .await?;

        if unit.rows_affected() == 0 {
            tx.rollback()
                .await
                .with_error_code(ErrorCode::DatabaseTransactionFailed)?;
            return Ok(None);
        }

        tx.commit()
            .await
            .with_error_code(ErrorCode::DatabaseTransactionFailed)?;
        Ok(Some(events.rows_affected()))
    }

    #[instrument(skip(self, seed))]
    async fn replace_all(&self, seed: &SeedData) -> Result<()> {
        let mut tx = self.begin().await?;

        sqlx::query("TRUNCATE unit_events, ink_units, printers, inks")
            .execute(&mut *tx)
            .await?;

        for ink in &seed.inks {
            sqlx::query("INSERT INTO inks (code, name, ink_type, color) VALUES ($1, $2, $3, $4)")
                .bind(&ink.code)
                .bind(&ink.name)
                .bind(ink.ink_type.as_str())
                .bind(&ink.color)
                .execute(&mut *tx)
                .await?;
        }

        for printer in &seed.printers {
            sqlx::query("INSERT INTO printers (printer_id, name) VALUES ($1, $2)")
                .bind(&printer.printer_id)
                .bind(&printer.name)
                .execute(&mut *tx)
                .await?;
        }

        for unit in &seed.units {
            sqlx::query(
                r#"
                INSERT INTO ink_units (unit_id, custom_name, ink_code, status, current_printer_id)
                VALUES ($1, $2, $3, $4, $5)
                "#,
            )
            .bind(&unit.unit_id)
            .bind(&unit.custom_name)
            .bind(&unit.ink_code)
            .bind(unit.status.as_str())
            .bind(&unit.current_printer_id)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit()
            .await
            .with_error_code(ErrorCode::DatabaseTransactionFailed)
    }

    async fn ping(&self) -> Result<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "postgres"
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Row types
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, sqlx::FromRow)]
pub struct EventRow {
    pub id: Uuid,
    pub occurred_at: DateTime<Utc>,
    pub unit_id: String,
    pub printer_id: String,
    pub event_kind: String,
    pub detail: Option<String>,
}

#[derive(Debug, sqlx::FromRow)]
pub struct UnitRow {
    pub unit_id: String,
    pub custom_name: Option<String>,
    pub ink_code: String,
    pub status: String,
    pub current_printer_id: Option<String>,
}

#[derive(Debug, sqlx::FromRow)]
pub struct InkRow {
    pub code: String,
    pub name: String,
    pub ink_type: String,
    pub color: Option<String>,
}

#[derive(Debug, sqlx::FromRow)]
pub struct PrinterRow {
    pub printer_id: String,
    pub name: String,
}

fn corrupt(column: &str, value: &str) -> InkError {
    InkError::with_internal(
        ErrorCode::DeserializationError,
        "Stored record could not be read",
        format!("unexpected {} value: {}", column, value),
    )
}

impl TryFrom<EventRow> for LifecycleEvent {
    type Error = InkError;

    fn try_from(row: EventRow) -> Result<Self> {
        let kind: EventKind = row
            .event_kind
            .parse()
            .map_err(|_| corrupt("event_kind", &row.event_kind))?;
        Ok(LifecycleEvent {
            id: EventId(row.id),
            timestamp: row.occurred_at,
            unit_id: row.unit_id,
            printer_id: row.printer_id,
            kind,
            detail: row.detail,
        })
    }
}

impl TryFrom<UnitRow> for InkUnit {
    type Error = InkError;

    fn try_from(row: UnitRow) -> Result<Self> {
        let status: UnitStatus = row
            .status
            .parse()
            .map_err(|_| corrupt("status", &row.status))?;
        Ok(InkUnit {
            unit_id: row.unit_id,
            custom_name: row.custom_name,
            ink_code: row.ink_code,
            status,
            current_printer_id: row.current_printer_id,
        })
    }
}

impl TryFrom<InkRow> for InkCatalogEntry {
    type Error = InkError;

    fn try_from(row: InkRow) -> Result<Self> {
        let ink_type: InkType = row
            .ink_type
            .parse()
            .map_err(|_| corrupt("ink_type", &row.ink_type))?;
        Ok(InkCatalogEntry {
            code: row.code,
            name: row.name,
            ink_type,
            color: row.color,
        })
    }
}

impl From<PrinterRow> for Printer {
    fn from(row: PrinterRow) -> Self {
        Printer {
            printer_id: row.printer_id,
            name: row.name,
        }
    }
}
