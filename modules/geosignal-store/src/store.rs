use std::collections::{HashMap, HashSet};

use chrono::Utc;
use geosignal_common::{Article, ConflictZone, EventRecord, FeedRunStatus, FeedUpdateLog, GlobalEventTone, ProcessingState, RiskIndexPoint};
use sqlx::PgPool;
use sqlx::Row;
use uuid::Uuid;

use crate::error::{Result, StoreError};
use crate::filter::{ArticleFilter, InsertOutcome, ZoneFilter};
use crate::rows::{ArticleRow, ConflictZoneRow, EnrichmentFields, EventRecordRow, GlobalEventToneRow};

/// The Article Store (C1): the single shared mutable resource in the system
/// (§5). All access goes through transactions; callers never see a partial
/// write.
#[derive(Clone)]
pub struct ArticleStore {
    pool: PgPool,
}

impl ArticleStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn connect(database_url: &str) -> Result<Self> {
        let pool = PgPool::connect(database_url).await?;
        Ok(Self::new(pool))
    }

    pub async fn migrate(&self) -> Result<()> {
        sqlx::migrate!("./migrations").run(&self.pool).await.map_err(|e| StoreError::Other(e.into()))?;
        Ok(())
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Idempotent on `url` (§4.1). Uses `ON CONFLICT DO NOTHING` so the
    /// uniqueness invariant is enforced at the database layer, not by a
    /// check-then-insert race.
    pub async fn insert_raw_article(&self, article: &Article) -> Result<InsertOutcome> {
        let content_hash = article.content_hash();
        let entities_json = article.entities.as_ref().map(|e| serde_json::to_value(e).unwrap_or_default());

        let result = sqlx::query(
            r#"
            INSERT INTO articles
                (id, url, content_hash, title, content, summary, source_name, source_url,
                 published_at, fetched_at, original_language, canonical_language,
                 country, region, latitude, longitude, image_url, category, entities,
                 processing_state)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18, $19, 'raw')
            ON CONFLICT (url) DO NOTHING
            "#,
        )
        .bind(article.id)
        .bind(&article.url)
        .bind(&content_hash)
        .bind(&article.title)
        .bind(&article.content)
        .bind(&article.summary)
        .bind(&article.source_name)
        .bind(&article.source_url)
        .bind(article.published_at)
        .bind(article.fetched_at)
        .bind(&article.original_language)
        .bind(&article.canonical_language)
        .bind(&article.country)
        .bind(&article.region)
        .bind(article.latitude)
        .bind(article.longitude)
        .bind(&article.image_url)
        .bind(&article.category)
        .bind(entities_json)
        .execute(&self.pool)
        .await?;

        Ok(if result.rows_affected() == 1 { InsertOutcome::Inserted } else { InsertOutcome::Duplicate })
    }

    /// Atomically transitions up to `batch_size` rows raw→enriching and
    /// returns them (§4.1). `SELECT ... FOR UPDATE SKIP LOCKED` is what makes
    /// the at-most-one-worker-per-article guarantee hold under concurrent
    /// enricher workers without a separate lock table.
    pub async fn claim_for_enrichment(
        &self,
        batch_size: i64,
        older_than: chrono::DateTime<Utc>,
    ) -> Result<Vec<Article>> {
        let mut tx = self.pool.begin().await?;

        let ids: Vec<Uuid> = sqlx::query_scalar(
            r#"
            SELECT id FROM articles
            WHERE processing_state = 'raw' AND fetched_at <= $1
            ORDER BY fetched_at ASC
            LIMIT $2
            FOR UPDATE SKIP LOCKED
            "#,
        )
        .bind(older_than)
        .bind(batch_size)
        .fetch_all(&mut *tx)
        .await?;

        if ids.is_empty() {
            tx.commit().await?;
            return Ok(Vec::new());
        }

        let rows: Vec<ArticleRow> = sqlx::query_as(
            r#"
            UPDATE articles
            SET processing_state = 'enriching', claimed_at = now()
            WHERE id = ANY($1)
            RETURNING id, url, title, content, summary, source_name, source_url,
                      published_at, fetched_at, original_language, canonical_language,
                      translated_title, translated_content, country, region, latitude,
                      longitude, image_url, risk_level, risk_score, sentiment_score,
                      category, entities, processing_state
            "#,
        )
        .bind(&ids)
        .fetch_all(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(rows.into_iter().map(ArticleRow::into_article).collect())
    }

    /// Transitions enriching→enriched (§4.1). Returns `StaleClaim` if the row
    /// was not in `enriching` state anymore — a concurrent retry already
    /// committed or the claim expired.
    pub async fn commit_enrichment(&self, article_id: Uuid, fields: EnrichmentFields) -> Result<()> {
        let entities_json = fields.entities.as_ref().map(|e| serde_json::to_value(e).unwrap_or_default());
        let risk_level_str = fields.risk_level.map(|r| r.to_string());

        let result = sqlx::query(
            r#"
            UPDATE articles
            SET processing_state = 'enriched',
                original_language = COALESCE($2, original_language),
                translated_title = $3,
                translated_content = $4,
                country = $5,
                region = $6,
                latitude = $7,
                longitude = $8,
                risk_level = $9,
                risk_score = $10,
                sentiment_score = $11,
                category = COALESCE($12, category),
                entities = COALESCE($13, entities),
                claimed_at = NULL
            WHERE id = $1 AND processing_state = 'enriching'
            "#,
        )
        .bind(article_id)
        .bind(&fields.original_language)
        .bind(&fields.translated_title)
        .bind(&fields.translated_content)
        .bind(&fields.country)
        .bind(&fields.region)
        .bind(fields.latitude)
        .bind(fields.longitude)
        .bind(&risk_level_str)
        .bind(fields.risk_score)
        .bind(fields.sentiment_score)
        .bind(&fields.category)
        .bind(entities_json)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::StaleClaim(article_id));
        }
        Ok(())
    }

    /// Transitions enriching→failed (§4.1). Bounded retries (tracked by
    /// `retry_count`) re-enter `raw` after a cooldown instead of staying
    /// permanently failed.
    pub async fn mark_failed(&self, article_id: Uuid, reason: &str, max_retries: i32) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE articles
            SET processing_state = CASE WHEN retry_count < $3 THEN 'raw' ELSE 'failed' END,
                retry_count = retry_count + 1,
                failure_reason = $2,
                claimed_at = NULL
            WHERE id = $1 AND processing_state = 'enriching'
            "#,
        )
        .bind(article_id)
        .bind(reason)
        .bind(max_retries)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Idempotent upsert keyed on `(event_id_from_provider, event_date)` (§3).
    pub async fn upsert_event_record(&self, record: &EventRecord) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO event_records
                (event_id_from_provider, event_date, country, region, latitude, longitude,
                 event_type, sub_event_type, actor1, actor2, fatalities, notes, imported_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            ON CONFLICT (event_id_from_provider, event_date) DO UPDATE SET
                country = EXCLUDED.country,
                region = EXCLUDED.region,
                latitude = EXCLUDED.latitude,
                longitude = EXCLUDED.longitude,
                event_type = EXCLUDED.event_type,
                sub_event_type = EXCLUDED.sub_event_type,
                actor1 = EXCLUDED.actor1,
                actor2 = EXCLUDED.actor2,
                fatalities = EXCLUDED.fatalities,
                notes = EXCLUDED.notes,
                imported_at = EXCLUDED.imported_at
            "#,
        )
        .bind(&record.event_id_from_provider)
        .bind(record.event_date)
        .bind(&record.country)
        .bind(&record.region)
        .bind(record.latitude)
        .bind(record.longitude)
        .bind(&record.event_type)
        .bind(&record.sub_event_type)
        .bind(&record.actor1)
        .bind(&record.actor2)
        .bind(record.fatalities)
        .bind(&record.notes)
        .bind(record.imported_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Upsert keyed on `global_event_id` (§3).
    pub async fn upsert_tone_event(&self, record: &GlobalEventTone) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO global_event_tone
                (global_event_id, sql_date, latitude, longitude, avg_tone, goldstein_scale,
                 event_code, event_root_code, num_mentions, num_sources, num_articles)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            ON CONFLICT (global_event_id) DO UPDATE SET
                sql_date = EXCLUDED.sql_date,
                latitude = EXCLUDED.latitude,
                longitude = EXCLUDED.longitude,
                avg_tone = EXCLUDED.avg_tone,
                goldstein_scale = EXCLUDED.goldstein_scale,
                event_code = EXCLUDED.event_code,
                event_root_code = EXCLUDED.event_root_code,
                num_mentions = EXCLUDED.num_mentions,
                num_sources = EXCLUDED.num_sources,
                num_articles = EXCLUDED.num_articles
            "#,
        )
        .bind(&record.global_event_id)
        .bind(record.sql_date)
        .bind(record.latitude)
        .bind(record.longitude)
        .bind(record.avg_tone)
        .bind(record.goldstein_scale)
        .bind(&record.event_code)
        .bind(&record.event_root_code)
        .bind(record.num_mentions)
        .bind(record.num_sources)
        .bind(record.num_articles)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Replaces the full `risk_index` series atomically (§3, §4.1): the
    /// monthly integrator ships a complete history, not a delta.
    pub async fn replace_risk_index(&self, series: &[RiskIndexPoint]) -> Result<()> {
        let mut tx = self.pool.begin().await?;
        sqlx::query("DELETE FROM risk_index").execute(&mut *tx).await?;
        for point in series {
            sqlx::query(
                "INSERT INTO risk_index (date, gpr_value, gpr_threats, gpr_acts) VALUES ($1, $2, $3, $4)",
            )
            .bind(point.date)
            .bind(point.gpr_value)
            .bind(point.gpr_threats)
            .bind(point.gpr_acts)
            .execute(&mut *tx)
            .await?;
        }
        tx.commit().await?;
        Ok(())
    }

    pub async fn latest_risk_index(&self) -> Result<Option<RiskIndexPoint>> {
        let row = sqlx::query_as::<_, (chrono::NaiveDate, f64, f64, f64)>(
            "SELECT date, gpr_value, gpr_threats, gpr_acts FROM risk_index ORDER BY date DESC LIMIT 1",
        )
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(|(date, gpr_value, gpr_threats, gpr_acts)| RiskIndexPoint { date, gpr_value, gpr_threats, gpr_acts }))
    }

    /// Read-only projection for §4.9 `list_articles`/`get_article`.
    pub async fn query_articles(&self, filter: &ArticleFilter) -> Result<Vec<Article>> {
        let mut builder = sqlx::QueryBuilder::<sqlx::Postgres>::new(
            "SELECT id, url, title, content, summary, source_name, source_url, published_at, \
             fetched_at, original_language, canonical_language, translated_title, \
             translated_content, country, region, latitude, longitude, image_url, risk_level, \
             risk_score, sentiment_score, category, entities, processing_state FROM articles WHERE 1=1",
        );
        if let Some(lang) = &filter.language {
            builder.push(" AND canonical_language = ").push_bind(lang.clone());
        }
        if let Some(country) = &filter.country {
            builder.push(" AND country = ").push_bind(country.clone());
        }
        if let Some(level) = &filter.risk_level {
            builder.push(" AND risk_level = ").push_bind(level.to_string());
        }
        if let Some(since) = filter.since {
            builder.push(" AND published_at >= ").push_bind(since);
        }
        if let Some(until) = filter.until {
            builder.push(" AND published_at <= ").push_bind(until);
        }
        builder.push(" ORDER BY published_at DESC");
        if let Some(limit) = filter.limit {
            builder.push(" LIMIT ").push_bind(limit);
        }

        let rows = builder.build_query_as::<ArticleRow>().fetch_all(&self.pool).await?;
        Ok(rows.into_iter().map(ArticleRow::into_article).collect())
    }

    pub async fn get_article(&self, id: Uuid) -> Result<Option<Article>> {
        let row: Option<ArticleRow> = sqlx::query_as(
            "SELECT id, url, title, content, summary, source_name, source_url, published_at, \
             fetched_at, original_language, canonical_language, translated_title, \
             translated_content, country, region, latitude, longitude, image_url, risk_level, \
             risk_score, sentiment_score, category, entities, processing_state \
             FROM articles WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(ArticleRow::into_article))
    }

    /// Read-only projection for §4.9 `list_zones`.
    pub async fn query_zones(&self, filter: &ZoneFilter) -> Result<Vec<ConflictZone>> {
        let mut builder = sqlx::QueryBuilder::<sqlx::Postgres>::new(
            "SELECT zone_id, centroid_lat, centroid_lng, bbox_min_lat, bbox_min_lng, bbox_max_lat, \
             bbox_max_lng, location_label, country, region, sources, source_scores, total_events, \
             total_fatalities, actors, event_types, latest_event_at, final_risk_score, risk_level, \
             monitoring_frequency, member_article_ids, is_prediction FROM conflict_zones WHERE 1=1",
        );
        if let Some(level) = &filter.risk_level {
            builder.push(" AND risk_level = ").push_bind(level.to_string());
        }
        if let Some(since) = filter.since {
            builder.push(" AND latest_event_at >= ").push_bind(since);
        }
        if let Some(priority) = &filter.priority {
            // priority is a minimum floor, ordered low < medium < high < critical
            let floor_rank = priority_rank(priority) as i32;
            builder.push(
                " AND CASE risk_level WHEN 'critical' THEN 3 WHEN 'high' THEN 2 WHEN 'medium' THEN 1 ELSE 0 END >= ",
            );
            builder.push_bind(floor_rank);
        }
        builder.push(" ORDER BY final_risk_score DESC");
        if let Some(limit) = filter.limit {
            builder.push(" LIMIT ").push_bind(limit);
        }

        let rows = builder.build_query_as::<ConflictZoneRow>().fetch_all(&self.pool).await?;
        Ok(rows.into_iter().map(ConflictZoneRow::into_zone).collect())
    }

    /// Writes the full new zone collection in one transaction (§4.1, §4.7):
    /// readers observe either the old set or the new set, never a mix.
    pub async fn replace_zones(&self, zones: &[ConflictZone]) -> Result<()> {
        let mut tx = self.pool.begin().await?;
        sqlx::query("DELETE FROM conflict_zones").execute(&mut *tx).await?;
        for zone in zones {
            let sources: Vec<String> = zone.sources.iter().map(|s| s.to_string()).collect();
            sqlx::query(
                r#"
                INSERT INTO conflict_zones
                    (zone_id, centroid_lat, centroid_lng, bbox_min_lat, bbox_min_lng, bbox_max_lat,
                     bbox_max_lng, location_label, country, region, sources, source_scores,
                     total_events, total_fatalities, actors, event_types, latest_event_at,
                     final_risk_score, risk_level, monitoring_frequency, member_article_ids,
                     is_prediction)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17,
                        $18, $19, $20, $21, $22)
                "#,
            )
            .bind(zone.zone_id)
            .bind(zone.centroid.lat)
            .bind(zone.centroid.lng)
            .bind(zone.bbox.min_lat)
            .bind(zone.bbox.min_lng)
            .bind(zone.bbox.max_lat)
            .bind(zone.bbox.max_lng)
            .bind(&zone.location_label)
            .bind(&zone.country)
            .bind(&zone.region)
            .bind(serde_json::to_value(&sources).unwrap_or_default())
            .bind(serde_json::to_value(&zone.source_scores).unwrap_or_default())
            .bind(zone.total_events)
            .bind(zone.total_fatalities)
            .bind(serde_json::to_value(&zone.actors).unwrap_or_default())
            .bind(serde_json::to_value(&zone.event_types).unwrap_or_default())
            .bind(zone.latest_event_at)
            .bind(zone.final_risk_score)
            .bind(zone.risk_level.to_string())
            .bind(zone.monitoring_frequency.to_string())
            .bind(serde_json::to_value(&zone.member_article_ids).unwrap_or_default())
            .bind(zone.is_prediction)
            .execute(&mut *tx)
            .await?;
        }
        tx.commit().await?;
        Ok(())
    }

    pub async fn log_feed_run(&self, log: &FeedUpdateLog) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO feed_update_logs
                (id, integrator_name, started_at, ended_at, records_ingested, status,
                 error_message, data_date_range_start, data_date_range_end)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(log.id)
        .bind(&log.integrator_name)
        .bind(log.started_at)
        .bind(log.ended_at)
        .bind(log.records_ingested)
        .bind(match log.status {
            FeedRunStatus::Ok => "ok",
            FeedRunStatus::Error => "error",
        })
        .bind(&log.error_message)
        .bind(log.data_date_range_start)
        .bind(log.data_date_range_end)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Most recent run (any status) per integrator, keyed by
    /// `integrator_name` (§4.10: "integrator last-success timestamp" feeds
    /// the health monitor's staleness check).
    pub async fn latest_feed_runs(&self) -> Result<HashMap<String, FeedUpdateLog>> {
        let rows = sqlx::query(
            r#"
            SELECT DISTINCT ON (integrator_name)
                id, integrator_name, started_at, ended_at, records_ingested, status,
                error_message, data_date_range_start, data_date_range_end
            FROM feed_update_logs
            ORDER BY integrator_name, started_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        let mut out = HashMap::new();
        for row in rows {
            let status_str: String = row.try_get("status")?;
            let status = if status_str == "ok" { FeedRunStatus::Ok } else { FeedRunStatus::Error };
            let log = FeedUpdateLog {
                id: row.try_get("id")?,
                integrator_name: row.try_get("integrator_name")?,
                started_at: row.try_get("started_at")?,
                ended_at: row.try_get("ended_at")?,
                records_ingested: row.try_get("records_ingested")?,
                status,
                error_message: row.try_get("error_message")?,
                data_date_range_start: row.try_get("data_date_range_start")?,
                data_date_range_end: row.try_get("data_date_range_end")?,
            };
            out.insert(log.integrator_name.clone(), log);
        }
        Ok(out)
    }

    /// Queue depth for C10: raw articles awaiting enrichment.
    pub async fn raw_queue_depth(&self) -> Result<i64> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM articles WHERE processing_state = $1")
                .bind(ProcessingState::Raw.to_string())
                .fetch_one(&self.pool)
                .await?;
        Ok(count)
    }

    pub async fn zone_count_by_risk_level(&self) -> Result<HashMap<String, i64>> {
        let rows = sqlx::query("SELECT risk_level, COUNT(*) AS n FROM conflict_zones GROUP BY risk_level")
            .fetch_all(&self.pool)
            .await?;
        let mut out = HashMap::new();
        for row in rows {
            let level: String = row.try_get("risk_level")?;
            let n: i64 = row.try_get("n")?;
            out.insert(level, n);
        }
        Ok(out)
    }

    /// `aggregate_counts(by, window)` (§4.9): counts enriched articles
    /// published within `window` grouped by one of `country`, `category`,
    /// `canonical_language`. `by` is validated against a fixed allow-list so
    /// this never interpolates caller-controlled SQL beyond a column name we
    /// already know is safe.
    pub async fn aggregate_counts(
        &self,
        by: AggregateBy,
        since: chrono::DateTime<Utc>,
    ) -> Result<HashMap<String, i64>> {
        let column = by.column();
        let sql = format!(
            "SELECT {column} AS bucket, COUNT(*) AS n FROM articles \
             WHERE published_at >= $1 AND {column} IS NOT NULL GROUP BY {column}"
        );
        let rows = sqlx::query(&sql).bind(since).fetch_all(&self.pool).await?;
        let mut out = HashMap::new();
        for row in rows {
            let bucket: String = row.try_get("bucket")?;
            let n: i64 = row.try_get("n")?;
            out.insert(bucket, n);
        }
        Ok(out)
    }

    /// Consolidator input (§4.7): enriched, geolocated articles that either
    /// clear the risk-score floor or read strongly negative, within the
    /// lookback window.
    pub async fn query_conflict_articles(
        &self,
        since: chrono::DateTime<Utc>,
        risk_threshold: f32,
        sentiment_threshold: f32,
    ) -> Result<Vec<Article>> {
        let rows: Vec<ArticleRow> = sqlx::query_as(
            "SELECT id, url, title, content, summary, source_name, source_url, published_at, \
             fetched_at, original_language, canonical_language, translated_title, \
             translated_content, country, region, latitude, longitude, image_url, risk_level, \
             risk_score, sentiment_score, category, entities, processing_state \
             FROM articles \
             WHERE processing_state = 'enriched' AND published_at >= $1 \
               AND latitude IS NOT NULL AND longitude IS NOT NULL \
               AND (risk_score >= $2 OR sentiment_score <= $3)",
        )
        .bind(since)
        .bind(risk_threshold)
        .bind(sentiment_threshold)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(ArticleRow::into_article).collect())
    }

    /// Consolidator input (§4.7): event records within the lookback window.
    /// `event_type` filtering against the conflict set is left to the
    /// caller, since that set is a domain concept the store doesn't own.
    pub async fn query_events_since(&self, since: chrono::NaiveDate) -> Result<Vec<EventRecord>> {
        let rows: Vec<EventRecordRow> = sqlx::query_as(
            "SELECT event_id_from_provider, event_date, country, region, latitude, longitude, \
             event_type, sub_event_type, actor1, actor2, fatalities, notes, imported_at \
             FROM event_records WHERE event_date >= $1",
        )
        .bind(since)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(EventRecordRow::into_record).collect())
    }

    /// Consolidator input (§4.7): tone events within the lookback window.
    pub async fn query_tone_events_since(&self, since: chrono::NaiveDate) -> Result<Vec<GlobalEventTone>> {
        let rows: Vec<GlobalEventToneRow> = sqlx::query_as(
            "SELECT global_event_id, sql_date, latitude, longitude, avg_tone, goldstein_scale, \
             event_code, event_root_code, num_mentions, num_sources, num_articles \
             FROM global_event_tone WHERE sql_date >= $1",
        )
        .bind(since)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(GlobalEventToneRow::into_tone).collect())
    }

    /// `get_risk_by_country(window)` (§4.9): mean `risk_score` of enriched
    /// articles per country within the window.
    pub async fn risk_by_country(&self, since: chrono::DateTime<Utc>) -> Result<HashMap<String, f64>> {
        let rows = sqlx::query(
            "SELECT country, AVG(risk_score) AS avg_score FROM articles \
             WHERE published_at >= $1 AND country IS NOT NULL AND risk_score IS NOT NULL \
             GROUP BY country",
        )
        .bind(since)
        .fetch_all(&self.pool)
        .await?;
        let mut out = HashMap::new();
        for row in rows {
            let country: String = row.try_get("country")?;
            let avg_score: f64 = row.try_get("avg_score")?;
            out.insert(country, avg_score);
        }
        Ok(out)
    }
}

/// Grouping dimension for `aggregate_counts` (§4.9).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AggregateBy {
    Country,
    Category,
    Language,
}

impl AggregateBy {
    fn column(self) -> &'static str {
        match self {
            AggregateBy::Country => "country",
            AggregateBy::Category => "category",
            AggregateBy::Language => "canonical_language",
        }
    }
}

fn priority_rank(level: &geosignal_common::RiskLevel) -> u8 {
    use geosignal_common::RiskLevel::*;
    match level {
        Low => 0,
        Medium => 1,
        High => 2,
        Critical => 3,
    }
}

#[allow(dead_code)]
fn distinct_sources(zone: &ConflictZone) -> HashSet<String> {
    zone.sources.iter().map(|s| s.to_string()).collect()
}
