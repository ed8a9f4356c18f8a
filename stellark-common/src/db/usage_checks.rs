//! Usage check persistence

use chrono::{DateTime, SecondsFormat, Utc};
use sqlx::{sqlite::SqliteRow, Row, SqlitePool};
use uuid::Uuid;

use super::models::UsageCheck;
use crate::rights::{Classification, ClassificationResult, UsageContext, UseType};
use crate::{Error, Result};

/// Store the outcome of classifying `context` for an IP asset
pub async fn record_usage_check(
    pool: &SqlitePool,
    ip_asset_id: &str,
    context: &UsageContext,
    result: &ClassificationResult,
) -> Result<UsageCheck> {
    let check = UsageCheck {
        guid: Uuid::new_v4(),
        ip_asset_id: ip_asset_id.to_string(),
        domain: context.domain.clone(),
        use_type: context.use_type,
        classification: result.classification,
        reason: result.reason.clone(),
        created_at: Utc::now(),
    };

    sqlx::query(
        r#"
        INSERT INTO usage_checks (
            guid, ip_asset_id, domain, use_type, classification, reason, created_at
        ) VALUES (?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(check.guid.to_string())
    .bind(&check.ip_asset_id)
    .bind(&check.domain)
    .bind(check.use_type.as_str())
    .bind(check.classification.as_str())
    .bind(&check.reason)
    .bind(format_timestamp(&check.created_at))
    .execute(pool)
    .await?;

    tracing::debug!(
        guid = %check.guid,
        ip_asset_id = %check.ip_asset_id,
        classification = %check.classification,
        "Usage check recorded"
    );

    Ok(check)
}

/// All checks recorded for an IP asset, newest first
pub async fn list_usage_checks(pool: &SqlitePool, ip_asset_id: &str) -> Result<Vec<UsageCheck>> {
    let rows = sqlx::query(
        r#"
        SELECT guid, ip_asset_id, domain, use_type, classification, reason, created_at
        FROM usage_checks
        WHERE ip_asset_id = ?
        ORDER BY created_at DESC, rowid DESC
        "#,
    )
    .bind(ip_asset_id)
    .fetch_all(pool)
    .await?;

    rows.iter().map(row_to_usage_check).collect()
}

fn row_to_usage_check(row: &SqliteRow) -> Result<UsageCheck> {
    let guid: String = row.get("guid");
    let use_type: String = row.get("use_type");
    let classification: String = row.get("classification");
    let created_at: String = row.get("created_at");

    Ok(UsageCheck {
        guid: Uuid::parse_str(&guid)
            .map_err(|e| Error::CorruptRecord(format!("usage_checks.guid '{}': {}", guid, e)))?,
        ip_asset_id: row.get("ip_asset_id"),
        domain: row.get("domain"),
        use_type: use_type
            .parse::<UseType>()
            .map_err(|_| Error::CorruptRecord(format!("usage_checks.use_type '{}'", use_type)))?,
        classification: classification.parse::<Classification>().map_err(|_| {
            Error::CorruptRecord(format!("usage_checks.classification '{}'", classification))
        })?,
        reason: row.get("reason"),
        created_at: parse_timestamp(&created_at)?,
    })
}

/// Fixed-width RFC 3339 so stored timestamps sort lexicographically
pub(crate) fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub(crate) fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| Error::CorruptRecord(format!("timestamp '{}': {}", raw, e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::init_database_pool;
    use chrono::SubsecRound;
    use tempfile::TempDir;

    async fn setup_pool() -> (TempDir, SqlitePool) {
        let temp_dir = TempDir::new().unwrap();
        let pool = init_database_pool(&temp_dir.path().join("stellark.db"))
            .await
            .unwrap();
        (temp_dir, pool)
    }

    #[tokio::test]
    async fn test_record_and_list_usage_checks() {
        let (_dir, pool) = setup_pool().await;

        let permitted = ClassificationResult {
            classification: Classification::LikelyPermitted,
            reason: "Usage appears to comply with rights schema".to_string(),
        };
        let violation = ClassificationResult {
            classification: Classification::LikelyViolation,
            reason: "Commercial use not allowed".to_string(),
        };

        let first = record_usage_check(
            &pool,
            "0xasset",
            &UsageContext::new("myblog.com", UseType::Educational),
            &permitted,
        )
        .await
        .unwrap();
        let second = record_usage_check(
            &pool,
            "0xasset",
            &UsageContext::new("shop.example", UseType::Commercial),
            &violation,
        )
        .await
        .unwrap();
        record_usage_check(
            &pool,
            "0xother",
            &UsageContext::new("myblog.com", UseType::Educational),
            &permitted,
        )
        .await
        .unwrap();

        let checks = list_usage_checks(&pool, "0xasset").await.unwrap();
        assert_eq!(checks.len(), 2);
        assert_eq!(checks[0].guid, second.guid);
        assert_eq!(checks[1].guid, first.guid);
        assert_eq!(checks[0].use_type, UseType::Commercial);
        assert_eq!(checks[0].classification, Classification::LikelyViolation);
        assert_eq!(checks[1].created_at, first.created_at.trunc_subsecs(6));
    }

    #[tokio::test]
    async fn test_list_unknown_asset_is_empty() {
        let (_dir, pool) = setup_pool().await;
        assert!(list_usage_checks(&pool, "missing").await.unwrap().is_empty());
    }

    #[test]
    fn test_timestamp_format_is_fixed_width() {
        let a = parse_timestamp("2024-01-01T00:00:00Z").unwrap();
        let b = parse_timestamp("2024-01-01T00:00:00.5Z").unwrap();
        assert_eq!(format_timestamp(&a).len(), format_timestamp(&b).len());
        assert!(format_timestamp(&a) < format_timestamp(&b));
    }
}
