//! Integration tests for the intention store over both storage backends.
//!
//! Times are driven by a manual clock, so "hours" pass instantly.

use std::sync::Arc;
use std::time::Duration;

use mindgate_core::{
    on_installed, BackgroundMessage, HostUi, InstallReason, IntentionService, IntentionStore,
    KeyValueStore, ManualClock, MemoryKeyValueStore, MessageResponse, MessageRouter,
    MindgateResult, SqliteKeyValueStore,
};

const HOUR: Duration = Duration::from_secs(3600);
const EIGHT_HOURS: Duration = Duration::from_secs(8 * 3600);

struct NoopUi;

#[async_trait::async_trait]
impl HostUi for NoopUi {
    async fn open_popup(&self) -> MindgateResult<()> {
        Ok(())
    }

    async fn open_tab(&self, _url: &str) -> MindgateResult<()> {
        Ok(())
    }
}

fn service(kv: Arc<dyn KeyValueStore>, clock: Arc<ManualClock>) -> IntentionService {
    IntentionService::new(Arc::new(IntentionStore::with_clock(kv, clock, EIGHT_HOURS)))
}

/// Write at t=0, present at 1h, absent at 9h.
#[tokio::test]
async fn test_reddit_intention_expires_after_eight_hours() {
    let clock = Arc::new(ManualClock::new(0));
    let intentions = service(Arc::new(MemoryKeyValueStore::new()), clock.clone());

    intentions
        .write("https://www.reddit.com/r/rust", "focus on work")
        .await
        .unwrap();

    clock.set(HOUR.as_millis() as i64);
    let entry = intentions.read("https://reddit.com/").await.unwrap();
    assert_eq!(entry.intention_text, "focus on work");
    let view = intentions.read_with_remaining("reddit.com").await.unwrap();
    assert_eq!(view.ms_remaining, (7 * HOUR).as_millis() as i64);

    clock.set((9 * HOUR).as_millis() as i64);
    assert!(intentions.read("reddit.com").await.is_none());
}

/// A fresh write that expires unread is counted by the next sweep.
#[tokio::test]
async fn test_sweep_counts_unread_expired_entries() {
    let clock = Arc::new(ManualClock::new(0));
    let intentions = service(Arc::new(MemoryKeyValueStore::new()), clock.clone());

    intentions.write("reddit.com", "focus").await.unwrap();
    intentions.write("news.ycombinator.com", "one story").await.unwrap();

    clock.advance(9 * HOUR);
    assert!(intentions.sweep().await >= 1);
    assert_eq!(intentions.sweep().await, 0);
    assert!(intentions.list_active().await.is_empty());
}

#[tokio::test]
async fn test_sqlite_backend_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("storage.db");
    let clock = Arc::new(ManualClock::new(0));

    {
        let kv = Arc::new(SqliteKeyValueStore::new(&path).unwrap());
        let intentions = service(kv, clock.clone());
        intentions.write("https://youtube.com/watch", "one video").await.unwrap();
    }

    clock.advance(HOUR);
    let kv = Arc::new(SqliteKeyValueStore::new(&path).unwrap());
    let intentions = service(kv, clock.clone());
    let entry = intentions.read("www.youtube.com").await.unwrap();
    assert_eq!(entry.intention_text, "one video");

    clock.advance(8 * HOUR);
    let router = MessageRouter::new(intentions.clone(), Arc::new(NoopUi));
    let reply = router.dispatch(BackgroundMessage::CleanupIntentions).await;
    assert_eq!(reply, MessageResponse::Cleanup { cleaned_count: 1 });
}

#[tokio::test]
async fn test_update_event_sweeps_shared_namespace() {
    let clock = Arc::new(ManualClock::new(0));
    let kv = Arc::new(MemoryKeyValueStore::new());
    let intentions = service(kv.clone(), clock.clone());

    intentions.write("x.com", "reply to one message").await.unwrap();
    kv.set_one("pendingRoute", serde_json::json!("/settings"))
        .await
        .unwrap();

    clock.advance(9 * HOUR);
    let swept = on_installed(InstallReason::Update, &intentions, &NoopUi, "welcome.html").await;
    assert_eq!(swept, 1);

    let remaining = kv.get_all().await.unwrap();
    assert_eq!(remaining.len(), 1);
    assert!(remaining.contains_key("pendingRoute"));
}
