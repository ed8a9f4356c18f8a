//! Parsed license persistence

use chrono::Utc;
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

use super::models::ParsedLicenseRecord;
use super::usage_checks::{format_timestamp, parse_timestamp};
use crate::license::ParsedLicense;
use crate::{Error, Result};

/// Store a license text with the schema derived from it
pub async fn record_parsed_license(
    pool: &SqlitePool,
    license_text: &str,
    parsed: &ParsedLicense,
) -> Result<ParsedLicenseRecord> {
    let record = ParsedLicenseRecord {
        guid: Uuid::new_v4(),
        license_text: license_text.to_string(),
        schema: parsed.schema.clone(),
        confidence: parsed.confidence,
        created_at: Utc::now(),
    };

    // Prepare JSON before touching the database
    let parsed_schema = serde_json::to_string(&record.schema)?;

    sqlx::query(
        r#"
        INSERT INTO parsed_licenses (guid, license_text, parsed_schema, confidence, created_at)
        VALUES (?, ?, ?, ?, ?)
        "#,
    )
    .bind(record.guid.to_string())
    .bind(&record.license_text)
    .bind(&parsed_schema)
    .bind(record.confidence)
    .bind(format_timestamp(&record.created_at))
    .execute(pool)
    .await?;

    Ok(record)
}

pub async fn load_parsed_license(
    pool: &SqlitePool,
    guid: Uuid,
) -> Result<Option<ParsedLicenseRecord>> {
    let row = sqlx::query(
        r#"
        SELECT guid, license_text, parsed_schema, confidence, created_at
        FROM parsed_licenses
        WHERE guid = ?
        "#,
    )
    .bind(guid.to_string())
    .fetch_optional(pool)
    .await?;

    let Some(row) = row else {
        return Ok(None);
    };

    let parsed_schema: String = row.get("parsed_schema");
    let created_at: String = row.get("created_at");

    Ok(Some(ParsedLicenseRecord {
        guid,
        license_text: row.get("license_text"),
        schema: serde_json::from_str(&parsed_schema).map_err(|e| {
            Error::CorruptRecord(format!("parsed_licenses.parsed_schema: {}", e))
        })?,
        confidence: row.get("confidence"),
        created_at: parse_timestamp(&created_at)?,
    }))
}
