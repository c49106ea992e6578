//! `nrt status`: show what the tracking store knows.

use anyhow::Result;

use crate::config::Config;
use crate::store::{SqliteTrackingStore, TrackingStore};

pub async fn run_status(config: &Config, source_name: Option<&str>, json: bool) -> Result<()> {
    let source_id = match source_name {
        Some(name) => Some(config.source(name)?.source_id),
        None => None,
    };

    let store = SqliteTrackingStore::open(config).await?;
    let records = store.list(source_id).await?;
    store.close().await;

    if json {
        println!("{}", serde_json::to_string_pretty(&records)?);
        return Ok(());
    }

    println!(
        "{:<10} {:<10} {:<21} {:<14} FILENAME",
        "SOURCE", "STATUS", "UPDATED", "FINGERPRINT"
    );
    for record in &records {
        println!(
            "{:<10} {:<10} {:<21} {:<14} {}",
            record.source_id,
            record.status.to_string(),
            format_ts_iso(record.updated_at),
            short_fingerprint(&record.fingerprint),
            record.filename
        );
    }
    println!("{} record(s)", records.len());

    Ok(())
}

fn format_ts_iso(ts: i64) -> String {
    chrono::DateTime::from_timestamp(ts, 0)
        .map(|dt| dt.format("%Y-%m-%dT%H:%M:%SZ").to_string())
        .unwrap_or_else(|| ts.to_string())
}

/// First 12 bytes of a fingerprint, or the whole string when it is shorter
/// or byte 12 is not a char boundary.
fn short_fingerprint(fingerprint: &str) -> &str {
    fingerprint.get(..12).unwrap_or(fingerprint)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_fingerprint() {
        let hex = "e3b0c44298fc1c149afbf4c8996fb924";
        assert_eq!(short_fingerprint(hex), "e3b0c44298fc");
        assert_eq!(short_fingerprint("abc"), "abc");
    }

    #[test]
    fn test_short_fingerprint_non_ascii() {
        // 11 ASCII bytes then a 2-byte char straddling byte 12
        let edited = "aaaaaaaaaaaé-manual";
        assert_eq!(short_fingerprint(edited), edited);
    }
}
