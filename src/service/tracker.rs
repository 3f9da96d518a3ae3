use crate::config::TrackerConfig;
use crate::db::{DocumentStore, SeedDocument, read_list};
use crate::error::VerseError;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{info, warn};

/// Start the auto-tracker loop. Returns `None` when disabled in config.
pub fn spawn(store: Arc<dyn DocumentStore>, cfg: &TrackerConfig) -> Option<JoinHandle<()>> {
    if !cfg.enabled {
        info!("Auto-tracker disabled");
        return None;
    }
    let period = Duration::from_secs(cfg.interval_secs.max(1));

    Some(tokio::spawn(async move {
        info!(interval_secs = period.as_secs(), "Auto-tracker started");
        let mut ticker = tokio::time::interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            if let Err(e) = scan_queue(store.as_ref()) {
                warn!(error = %e, "auto-tracker scan failed");
            }
        }
    }))
}

/// Number of entries waiting in the tracker queue.
pub fn scan_queue(store: &dyn DocumentStore) -> Result<usize, VerseError> {
    let pending = read_list(store, SeedDocument::TrackerQueue.file_name())?.len();
    info!(pending, "tracker queue scanned");
    Ok(pending)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MemoryStore;
    use std::io;
    use std::sync::Mutex;
    use tracing::level_filters::LevelFilter;

    #[derive(Clone, Default)]
    struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

    impl io::Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn counts_pending_entries() {
        let store = MemoryStore::new();
        assert_eq!(scan_queue(&store).unwrap(), 0);

        store.insert_raw("tracker_queue.json", r#"[{"animeId":1},{"animeId":2}]"#);
        assert_eq!(scan_queue(&store).unwrap(), 2);
    }

    #[test]
    fn queue_depth_is_logged_at_info() {
        let logs = CapturedLogs::default();
        let writer = logs.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(LevelFilter::INFO)
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();

        let store = MemoryStore::new();
        store.insert_raw("tracker_queue.json", r#"[{"animeId":7}]"#);
        tracing::subscriber::with_default(subscriber, || scan_queue(&store).unwrap());

        let output = String::from_utf8(logs.0.lock().unwrap().clone()).unwrap();
        assert!(output.contains("tracker queue scanned"));
        assert!(output.contains("pending=1"));
    }

    #[test]
    fn corrupt_queue_surfaces_parse_error() {
        let store = MemoryStore::new();
        store.insert_raw("tracker_queue.json", "[");
        assert!(matches!(
            scan_queue(&store),
            Err(VerseError::Parse { .. })
        ));
    }

    #[tokio::test]
    async fn disabled_tracker_does_not_spawn() {
        let cfg = TrackerConfig {
            enabled: false,
            interval_secs: 1,
        };
        assert!(spawn(Arc::new(MemoryStore::new()), &cfg).is_none());
    }
}
