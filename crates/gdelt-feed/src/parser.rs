//! Tab-separated export parsing

use crate::{
    FeedError, Result, COL_ACTOR1_GEO_COUNTRY_CODE, COL_EVENT_ROOT_CODE, COL_GOLDSTEIN_SCALE,
    COL_QUAD_CLASS, COL_SOURCE_URL, EXPORT_COLUMN_COUNT,
};
use kodoku_engine::RawEvent;
use tracing::info;

/// Parse one export row (1-based `line` for error reporting)
pub fn parse_row(line: usize, row: &str) -> Result<RawEvent> {
    let fields: Vec<&str> = row.split('\t').collect();
    if fields.len() != EXPORT_COLUMN_COUNT {
        return Err(FeedError::Arity {
            line,
            expected: EXPORT_COLUMN_COUNT,
            found: fields.len(),
        });
    }

    Ok(RawEvent::from_fields(
        fields[COL_ACTOR1_GEO_COUNTRY_CODE],
        fields[COL_QUAD_CLASS],
        fields[COL_EVENT_ROOT_CODE],
        fields[COL_GOLDSTEIN_SCALE],
        fields[COL_SOURCE_URL],
    ))
}

/// Parse a whole export file; blank lines are skipped, any malformed row fails
pub fn parse_export(text: &str) -> Result<Vec<RawEvent>> {
    let events = text
        .lines()
        .enumerate()
        .filter(|(_, row)| !row.trim().is_empty())
        .map(|(i, row)| parse_row(i + 1, row))
        .collect::<Result<Vec<_>>>()?;

    info!("Parsed {} export rows", events.len());
    Ok(events)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Build a 61-column row with the used columns filled in
    fn export_row(country: &str, quad: &str, root: &str, goldstein: &str, url: &str) -> String {
        let mut fields = vec![""; EXPORT_COLUMN_COUNT];
        fields[0] = "1234567890";
        fields[1] = "20260301";
        fields[COL_EVENT_ROOT_CODE] = root;
        fields[COL_QUAD_CLASS] = quad;
        fields[COL_GOLDSTEIN_SCALE] = goldstein;
        fields[COL_ACTOR1_GEO_COUNTRY_CODE] = country;
        fields[COL_SOURCE_URL] = url;
        fields.join("\t")
    }

    #[test]
    fn test_parse_row_columns() {
        let row = export_row("IS", "4", "19", "-10", "https://news.example/isr-strike");
        let event = parse_row(1, &row).unwrap();
        assert_eq!(event.country_code.as_deref(), Some("IS"));
        assert_eq!(event.quad_class, Some(4));
        assert_eq!(event.root_code, Some(19));
        assert_eq!(event.goldstein, Some(-10.0));
        assert_eq!(event.source_url.as_deref(), Some("https://news.example/isr-strike"));
    }

    #[test]
    fn test_non_numeric_quad_class_kept_as_missing() {
        let row = export_row("IZ", "n/a", "14", "-6.5", "https://x.example/a");
        let event = parse_row(1, &row).unwrap();
        assert_eq!(event.quad_class, None);
        assert_eq!(event.root_code, Some(14));
    }

    #[test]
    fn test_wrong_arity_is_fatal() {
        let short = vec!["x"; 60].join("\t");
        let long = vec!["x"; 62].join("\t");

        assert!(matches!(
            parse_row(7, &short),
            Err(FeedError::Arity { line: 7, expected: 61, found: 60 })
        ));
        assert!(matches!(
            parse_row(8, &long),
            Err(FeedError::Arity { found: 62, .. })
        ));
    }

    #[test]
    fn test_parse_export_skips_blank_lines() {
        let text = format!(
            "{}\r\n\n{}\n",
            export_row("IS", "4", "19", "-10", "https://a.example/1"),
            export_row("EG", "1", "14", "-3", "https://a.example/2"),
        );
        let events = parse_export(&text).unwrap();
        assert_eq!(events.len(), 2);
        assert_eq!(events[1].country_code.as_deref(), Some("EG"));
        assert_eq!(events[0].source_url.as_deref(), Some("https://a.example/1"));
    }

    #[test]
    fn test_export_feeds_aggregator() {
        use kodoku_engine::{aggregate_events, AggregatorConfig};

        let text = [
            export_row("IS", "4", "19", "-10", "https://news.example/naval-missile-strike"),
            export_row("IS", "4", "18", "-8", "https://news.example/tanker-attack"),
            export_row("IS", "1", "14", "-6", "https://news.example/protest"),
            export_row("IS", "1", "4", "-9", "https://news.example/ignored-talks"),
            export_row("EG", "4", "19", "-5", "https://news.example/minor"),
            export_row("", "4", "19", "-10", "https://news.example/nowhere"),
        ]
        .join("\n");

        let events = parse_export(&text).unwrap();
        assert_eq!(events.len(), 6);

        let snapshot = aggregate_events(&events, &AggregatorConfig::default());
        let isr = &snapshot["ISR"];
        // (10 + 8 + 6) / 10, talks row excluded
        assert_eq!(isr.risk_score, 2.4);
        assert_eq!(isr.count, 3);
        assert_eq!(isr.top_news, "https://news.example/naval-missile-strike");
        // 0.5 < 2.0
        assert!(!snapshot.contains_key("EGY"));
    }

    #[test]
    fn test_parse_export_reports_line_number() {
        let text = format!(
            "{}\n{}\n",
            export_row("IS", "4", "19", "-10", "https://a.example/1"),
            "truncated\trow"
        );
        match parse_export(&text) {
            Err(FeedError::Arity { line, found, .. }) => {
                assert_eq!(line, 2);
                assert_eq!(found, 2);
            }
            other => panic!("expected arity error, got {:?}", other),
        }
    }
}
