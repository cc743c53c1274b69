//! Console - append-only なログ表示面
//!
//! 行は追加されるだけで、削除も並べ替えもしない。
//! 描画側は `subscribe()` で新しい行を受け取る。

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::broadcast;

use crate::domain::{LogEntry, LogSource};

/// Lines buffered for a slow renderer before it starts lagging.
const FEED_CAPACITY: usize = 256;

/// Shared, append-only log. Clones write to the same log.
#[derive(Clone)]
pub struct Console {
    entries: Arc<Mutex<Vec<LogEntry>>>,
    feed: broadcast::Sender<LogEntry>,
}

impl Console {
    pub fn new() -> Self {
        let (feed, _) = broadcast::channel(FEED_CAPACITY);
        Self {
            entries: Arc::new(Mutex::new(Vec::new())),
            feed,
        }
    }

    /// Append one line and return its index.
    pub fn append(
        &self,
        source: LogSource,
        message: impl Into<String>,
        time: impl Into<String>,
    ) -> usize {
        let entry = LogEntry {
            time: time.into(),
            source,
            message: message.into(),
        };
        tracing::info!(source = source.as_str(), time = %entry.time, "{}", entry.message);

        // feed への送信もロック内で行い、Vec と feed の順序を揃える
        let mut entries = self.lock();
        entries.push(entry.clone());
        // 購読者がいなくてもエラーにしない
        let _ = self.feed.send(entry);
        entries.len() - 1
    }

    /// Snapshot of every line so far.
    pub fn entries(&self) -> Vec<LogEntry> {
        self.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// All lines, newline separated.
    pub fn render(&self) -> String {
        self.lock()
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Receive lines appended after this call.
    pub fn subscribe(&self) -> broadcast::Receiver<LogEntry> {
        self.feed.subscribe()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<LogEntry>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for Console {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn append_adds_exactly_one_entry() {
        let console = Console::new();
        console.append(LogSource::Thread, "first", "00:00:00.000");
        let before = console.entries();

        let index = console.append(LogSource::Worker, "Ready!", "01:02:03.004");

        let after = console.entries();
        assert_eq!(index, 1);
        assert_eq!(after.len(), before.len() + 1);
        assert_eq!(after[..before.len()], before[..]);
        assert!(after[1].to_string().contains("WORKER: Ready!"));
    }

    #[test]
    fn render_joins_lines_in_order() {
        let console = Console::new();
        console.append(LogSource::Thread, "a", "00:00:00.001");
        console.append(LogSource::Worker, "b", "00:00:00.002");
        assert_eq!(
            console.render(),
            "00:00:00.001: THREAD: a\n00:00:00.002: WORKER: b"
        );
    }

    #[test]
    fn clones_share_the_log() {
        let console = Console::new();
        let other = console.clone();
        other.append(LogSource::Thread, "shared", "00:00:00.000");
        assert_eq!(console.len(), 1);
    }

    #[tokio::test]
    async fn subscribers_see_new_lines() {
        let console = Console::new();
        console.append(LogSource::Thread, "before", "00:00:00.000");
        let mut rx = console.subscribe();
        console.append(LogSource::Worker, "after", "00:00:00.001");

        let entry = rx.recv().await.unwrap();
        assert_eq!(entry.message, "after");
        assert_eq!(entry.source, LogSource::Worker);
    }
}
