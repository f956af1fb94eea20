use std::io::Read;

use chrono::NaiveDate;
use geosignal_common::GlobalEventTone;
use geosignal_store::ArticleStore;

use crate::error::IntegratorError;
use crate::log::run_logged;

/// CAMEO event-root codes the consolidator treats as conflict-relevant
/// (protest through mass violence, CAMEO roots 14-20). The tone export
/// carries many unrelated event categories; filtering here keeps the store
/// from absorbing rows the consolidator would never read anyway.
const CONFLICT_ROOT_CODES: &[&str] = &["14", "15", "16", "17", "18", "19", "20"];

/// Column indices into the tab-separated export (§6: "58 canonical columns
/// of that public dataset"). Only the columns the domain model needs are
/// named; everything else is skipped rather than modeled.
mod column {
    pub const GLOBAL_EVENT_ID: usize = 0;
    pub const SQL_DATE: usize = 1;
    pub const EVENT_CODE: usize = 26;
    pub const EVENT_ROOT_CODE: usize = 28;
    pub const GOLDSTEIN_SCALE: usize = 30;
    pub const NUM_MENTIONS: usize = 31;
    pub const NUM_SOURCES: usize = 32;
    pub const NUM_ARTICLES: usize = 33;
    pub const AVG_TONE: usize = 34;
    pub const ACTION_GEO_LAT: usize = 56;
    pub const ACTION_GEO_LONG: usize = 57;
    pub const MIN_COLUMNS: usize = 58;
}

fn parse_tone_tsv(tsv: &str) -> Result<Vec<GlobalEventTone>, IntegratorError> {
    let mut records = Vec::new();
    for (line_no, line) in tsv.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let fields: Vec<&str> = line.split('\t').collect();
        if fields.len() < column::MIN_COLUMNS {
            return Err(IntegratorError::Schema(format!(
                "line {}: expected at least {} tab-separated columns, got {}",
                line_no + 1,
                column::MIN_COLUMNS,
                fields.len()
            )));
        }

        let root_code = fields[column::EVENT_ROOT_CODE].trim();
        if !CONFLICT_ROOT_CODES.contains(&root_code) {
            continue;
        }

        let sql_date = NaiveDate::parse_from_str(fields[column::SQL_DATE].trim(), "%Y%m%d")
            .map_err(|e| IntegratorError::Schema(format!("line {}: bad SQLDATE: {e}", line_no + 1)))?;

        let parse_f64 = |idx: usize, label: &str| -> Result<f64, IntegratorError> {
            fields[idx]
                .trim()
                .parse::<f64>()
                .map_err(|e| IntegratorError::Schema(format!("line {}: bad {label}: {e}", line_no + 1)))
        };
        let parse_i64 = |idx: usize, label: &str| -> Result<i64, IntegratorError> {
            fields[idx]
                .trim()
                .parse::<i64>()
                .map_err(|e| IntegratorError::Schema(format!("line {}: bad {label}: {e}", line_no + 1)))
        };

        records.push(GlobalEventTone {
            global_event_id: fields[column::GLOBAL_EVENT_ID].trim().to_string(),
            sql_date,
            latitude: parse_f64(column::ACTION_GEO_LAT, "ActionGeo_Lat")?,
            longitude: parse_f64(column::ACTION_GEO_LONG, "ActionGeo_Long")?,
            avg_tone: parse_f64(column::AVG_TONE, "AvgTone")?,
            goldstein_scale: parse_f64(column::GOLDSTEIN_SCALE, "GoldsteinScale")?,
            event_code: fields[column::EVENT_CODE].trim().to_string(),
            event_root_code: root_code.to_string(),
            num_mentions: parse_i64(column::NUM_MENTIONS, "NumMentions")?,
            num_sources: parse_i64(column::NUM_SOURCES, "NumSources")?,
            num_articles: parse_i64(column::NUM_ARTICLES, "NumArticles")?,
        });
    }
    Ok(records)
}

fn extract_single_file_from_zip(bytes: &[u8]) -> Result<String, IntegratorError> {
    let reader = std::io::Cursor::new(bytes);
    let mut archive = zip::ZipArchive::new(reader).map_err(|e| IntegratorError::Parse(e.to_string()))?;
    if archive.is_empty() {
        return Err(IntegratorError::Schema("zip archive contained no files".to_string()));
    }
    let mut file = archive.by_index(0).map_err(|e| IntegratorError::Parse(e.to_string()))?;
    let mut contents = String::new();
    file.read_to_string(&mut contents).map_err(|e| IntegratorError::Parse(e.to_string()))?;
    Ok(contents)
}

/// ToneIntegrator (§4.6): fetches the previous day's zip export, extracts
/// its single TSV member, filters to conflict-relevant event-root codes,
/// and upserts keyed on `global_event_id`.
pub struct ToneIntegrator {
    http: reqwest::Client,
    feed_url: String,
    store: ArticleStore,
}

impl ToneIntegrator {
    pub fn new(feed_url: impl Into<String>, store: ArticleStore) -> Self {
        Self { http: reqwest::Client::new(), feed_url: feed_url.into(), store }
    }

    pub async fn run(&self) -> Result<(), IntegratorError> {
        run_logged(&self.store, "tone_integrator", || async {
            let response = self
                .http
                .get(&self.feed_url)
                .send()
                .await
                .map_err(|e| IntegratorError::Fetch(e.to_string()))?;

            if !response.status().is_success() {
                return Err(IntegratorError::Fetch(format!("http {}", response.status().as_u16())));
            }

            let bytes = response.bytes().await.map_err(|e| IntegratorError::Fetch(e.to_string()))?;
            let tsv = extract_single_file_from_zip(&bytes)?;
            let records = parse_tone_tsv(&tsv)?;
            let count = records.len() as i64;

            for record in &records {
                self.store.upsert_tone_event(record).await?;
            }

            Ok(count)
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_row(root_code: &str) -> String {
        let mut fields = vec!["0"; 58];
        fields[column::GLOBAL_EVENT_ID] = "123456789";
        fields[column::SQL_DATE] = "20260115";
        fields[column::EVENT_CODE] = "190";
        fields[column::EVENT_ROOT_CODE] = root_code;
        fields[column::GOLDSTEIN_SCALE] = "-8.0";
        fields[column::NUM_MENTIONS] = "42";
        fields[column::NUM_SOURCES] = "5";
        fields[column::NUM_ARTICLES] = "12";
        fields[column::AVG_TONE] = "-6.5";
        fields[column::ACTION_GEO_LAT] = "48.5";
        fields[column::ACTION_GEO_LONG] = "37.5";
        fields.join("\t")
    }

    #[test]
    fn conflict_root_code_rows_are_kept() {
        let tsv = sample_row("19");
        let records = parse_tone_tsv(&tsv).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].avg_tone, -6.5);
    }

    #[test]
    fn non_conflict_root_codes_are_filtered_out() {
        let tsv = sample_row("01");
        let records = parse_tone_tsv(&tsv).unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn short_rows_are_a_schema_error() {
        let result = parse_tone_tsv("a\tb\tc");
        assert!(matches!(result, Err(IntegratorError::Schema(_))));
    }
}
