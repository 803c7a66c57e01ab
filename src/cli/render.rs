//! Live Progress Rendering
//!
//! Consumes the progress tracker's snapshot broadcast and redraws a single
//! console line per emission. One line carries every visible batch job,
//! including the retry countdown while a job is backing off.

use std::io::Write;

use tokio::sync::broadcast;

use crate::progress::ProgressRecord;

/// Spawn a task that renders snapshots until the channel closes.
pub fn spawn_renderer(
    mut rx: broadcast::Receiver<Vec<ProgressRecord>>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            match rx.recv().await {
                Ok(records) => {
                    let line = render_line(&records);
                    if !line.is_empty() {
                        print!("\r\x1B[K{line}");
                        let _ = std::io::stdout().flush();
                    }
                }
                Err(broadcast::error::RecvError::Lagged(_)) => continue,
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
        println!();
    })
}

fn render_line(records: &[ProgressRecord]) -> String {
    records
        .iter()
        .filter(|record| record.is_visible)
        .map(format_record)
        .collect::<Vec<_>>()
        .join("  |  ")
}

fn format_record(record: &ProgressRecord) -> String {
    if record.is_waiting_for_retry {
        format!(
            "{}: waiting {}s before retry ({}/{})",
            record.key,
            record.retry_countdown_seconds.unwrap_or(0),
            record.completed_items,
            record.total_items
        )
    } else if record.status_text.is_empty() {
        format!(
            "{}: {}/{}",
            record.key, record.completed_items, record.total_items
        )
    } else {
        format!(
            "{}: {}/{} {}",
            record.key, record.completed_items, record.total_items, record.status_text
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(key: &str) -> ProgressRecord {
        ProgressRecord {
            key: key.to_string(),
            is_visible: true,
            total_items: 4,
            completed_items: 1,
            is_waiting_for_retry: false,
            retry_countdown_seconds: None,
            status_text: "Processing app/a.component.ts".to_string(),
        }
    }

    #[test]
    fn test_format_running_record() {
        assert_eq!(
            format_record(&record("documentation")),
            "documentation: 1/4 Processing app/a.component.ts"
        );
    }

    #[test]
    fn test_format_waiting_record_shows_countdown() {
        let mut waiting = record("documentation");
        waiting.is_waiting_for_retry = true;
        waiting.retry_countdown_seconds = Some(42);
        assert_eq!(
            format_record(&waiting),
            "documentation: waiting 42s before retry (1/4)"
        );
    }

    #[test]
    fn test_hidden_records_are_not_rendered() {
        let mut hidden = record("instructions");
        hidden.is_visible = false;
        assert_eq!(render_line(&[hidden]), "");
    }

    #[test]
    fn test_multiple_jobs_share_the_line() {
        let line = render_line(&[record("documentation"), record("instructions")]);
        assert!(line.contains("documentation: 1/4"));
        assert!(line.contains("  |  instructions: 1/4"));
    }
}
