use crate::session::{ScannedCode, Session, TIMESTAMP_FORMAT};
use crate::storage::DbStats;
use tabled::{settings::Style, Table, Tabled};

#[derive(Tabled)]
struct SessionRow {
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Created (UTC)")]
    created_at: String,
    #[tabled(rename = "Id")]
    id: String,
}

#[derive(Tabled)]
struct CodeRow {
    #[tabled(rename = "#")]
    id: i64,
    #[tabled(rename = "Text")]
    text: String,
    #[tabled(rename = "Scanned (UTC)")]
    created_at: String,
}

#[derive(Tabled)]
struct MetricRow {
    #[tabled(rename = "Metric")]
    metric: String,
    #[tabled(rename = "Value")]
    value: String,
}

fn render<T: Tabled>(rows: Vec<T>) -> String {
    if rows.is_empty() {
        return String::new();
    }
    Table::new(rows).with(Style::rounded()).to_string()
}

pub fn sessions_table(sessions: &[Session]) -> String {
    render(
        sessions
            .iter()
            .map(|s| SessionRow {
                name: s.name.clone(),
                created_at: s.created_at.format(TIMESTAMP_FORMAT).to_string(),
                id: s.id.clone(),
            })
            .collect(),
    )
}

pub fn codes_table(codes: &[ScannedCode]) -> String {
    render(
        codes
            .iter()
            .map(|c| CodeRow {
                id: c.id,
                text: c.text.clone(),
                created_at: c.created_at.format(TIMESTAMP_FORMAT).to_string(),
            })
            .collect(),
    )
}

pub fn stats_table(stats: &DbStats) -> String {
    render(vec![
        MetricRow { metric: "Sessions".into(), value: stats.sessions.to_string() },
        MetricRow { metric: "QR codes".into(), value: stats.qr_codes.to_string() },
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::parse_timestamp;

    #[test]
    fn test_empty_tables_render_nothing() {
        assert!(sessions_table(&[]).is_empty());
        assert!(codes_table(&[]).is_empty());
    }

    #[test]
    fn test_sessions_table_contains_fields() {
        let session = Session {
            id: "abc-123".into(),
            name: "Escaneo 2024-01-01".into(),
            created_at: parse_timestamp("2024-01-01 08:00:00.250").unwrap(),
        };
        let table = sessions_table(&[session]);
        assert!(table.contains("Escaneo 2024-01-01"));
        assert!(table.contains("abc-123"));
        assert!(table.contains("2024-01-01 08:00:00.250"));
    }

    #[test]
    fn test_stats_table() {
        let table = stats_table(&DbStats { sessions: 2, qr_codes: 7 });
        assert!(table.contains("QR codes"));
        assert!(table.contains('7'));
    }
}
