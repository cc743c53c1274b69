//! Renders console entries and run reports to stdout.

use handoff_core::{LogEntry, RunReport};
use tokio::sync::broadcast::{self, error::RecvError, error::TryRecvError};

pub struct Renderer {
    feed: broadcast::Receiver<LogEntry>,
    json: bool,
}

impl Renderer {
    pub fn new(feed: broadcast::Receiver<LogEntry>, json: bool) -> Self {
        Self { feed, json }
    }

    /// Next entry. Pends forever once the console is gone so it can sit in a `select!`.
    pub async fn recv(&mut self) -> LogEntry {
        loop {
            match self.feed.recv().await {
                Ok(entry) => return entry,
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "renderer fell behind the console");
                }
                Err(RecvError::Closed) => std::future::pending::<()>().await,
            }
        }
    }

    /// Print everything already queued.
    pub fn flush(&mut self) {
        loop {
            match self.feed.try_recv() {
                Ok(entry) => self.print(&entry),
                Err(TryRecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "renderer fell behind the console");
                }
                Err(TryRecvError::Empty | TryRecvError::Closed) => break,
            }
        }
    }

    pub fn print(&self, entry: &LogEntry) {
        println!("{}", self.format_entry(entry));
    }

    pub fn print_report(&self, report: &RunReport) {
        println!("{}", self.format_report(report));
    }

    fn format_entry(&self, entry: &LogEntry) -> String {
        if self.json {
            serde_json::to_string(entry).unwrap_or_else(|_| entry.to_string())
        } else {
            entry.to_string()
        }
    }

    fn format_report(&self, report: &RunReport) -> String {
        if self.json {
            if let Ok(line) = serde_json::to_string(report) {
                return line;
            }
        }
        format!(
            "{}  {:<8}  {} bytes  sender_retained={}  round_trip={:.3} ms",
            report.run_id,
            report.mode,
            report.bytes,
            report.sender_retained,
            report.round_trip.as_secs_f64() * 1000.0,
        )
    }
}
