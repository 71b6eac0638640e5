mod common;

use common::{fast_options, posting, ReadOnlySentLinks, RecordingChannel};
use jobwatch::application::ledger::DedupLedger;
use jobwatch::application::notify::{NotifyOutcome, NotifyUseCase};
use jobwatch::domain::error::DomainError;
use jobwatch::JobWatch;
use std::sync::Arc;

#[tokio::test]
async fn test_sent_links_survive_restart() {
    let dir = tempfile::tempdir().unwrap();
    let db = dir.path().join("jobwatch.db");
    let db = db.to_str().unwrap();
    let p = posting("FL.ru", "Сайт-визитка", "https://www.fl.ru/projects/1");

    {
        let channel = Arc::new(RecordingChannel::default());
        let jw = JobWatch::with_providers(db, channel.clone(), vec![], fast_options()).unwrap();
        assert_eq!(jw.notify(&p).await.unwrap(), NotifyOutcome::Sent);
        assert_eq!(channel.messages().len(), 1);
    }

    let channel = Arc::new(RecordingChannel::default());
    let jw = JobWatch::with_providers(db, channel.clone(), vec![], fast_options()).unwrap();
    assert!(jw.is_sent(&p.link));
    assert_eq!(jw.sent_count().unwrap(), 1);
    assert_eq!(jw.notify(&p).await.unwrap(), NotifyOutcome::Skipped);
    assert!(channel.messages().is_empty());
}

#[tokio::test]
async fn test_notify_is_idempotent() {
    let channel = Arc::new(RecordingChannel::default());
    let jw = JobWatch::with_providers(":memory:", channel.clone(), vec![], fast_options()).unwrap();
    let p = posting("Kwork", "Лендинг", "https://kwork.ru/projects/7");

    assert_eq!(jw.notify(&p).await.unwrap(), NotifyOutcome::Sent);
    assert_eq!(jw.notify(&p).await.unwrap(), NotifyOutcome::Skipped);
    assert_eq!(channel.messages().len(), 1);
}

#[tokio::test]
async fn test_failed_send_is_not_recorded() {
    let channel = Arc::new(RecordingChannel::default());
    let jw = JobWatch::with_providers(":memory:", channel.clone(), vec![], fast_options()).unwrap();
    let p = posting("Kwork", "Лендинг", "https://kwork.ru/projects/8");

    channel.set_failing(true);
    assert!(jw.notify(&p).await.is_err());
    assert!(!jw.is_sent(&p.link));

    channel.set_failing(false);
    assert_eq!(jw.notify(&p).await.unwrap(), NotifyOutcome::Sent);
    assert!(jw.is_sent(&p.link));
}

#[tokio::test]
async fn test_message_escapes_markup() {
    let channel = Arc::new(RecordingChannel::default());
    let jw = JobWatch::with_providers(":memory:", channel.clone(), vec![], fast_options()).unwrap();
    let p = jobwatch::domain::entities::posting::Posting::new(
        "<script> & co",
        "a < b",
        "https://example.com/p?a=1&b=2",
        Some("5 000 ₽".into()),
        "Test",
    );

    jw.notify(&p).await.unwrap();
    let message = &channel.messages()[0];
    assert!(message.contains("&lt;script&gt; &amp; co"));
    assert!(message.contains("a &lt; b"));
    assert!(message.contains("href=\"https://example.com/p?a=1&amp;b=2\""));
    assert!(message.contains("5 000 ₽"));
    assert!(!message.contains("<script>"));
}

#[tokio::test]
async fn test_markup_in_title_and_description_is_literal() {
    let channel = Arc::new(RecordingChannel::default());
    let jw = JobWatch::with_providers(":memory:", channel.clone(), vec![], fast_options()).unwrap();
    let p = jobwatch::domain::entities::posting::Posting::new(
        "<b>Title</b>",
        "<i>Description</i>",
        "https://example.com/1",
        None,
        "Test",
    );

    jw.notify(&p).await.unwrap();
    let message = &channel.messages()[0];
    assert!(message.contains("&lt;b&gt;Title&lt;/b&gt;"));
    assert!(message.contains("&lt;i&gt;Description&lt;/i&gt;"));
    assert!(!message.contains("<i>"));
    assert!(!message.contains("<b>Title"));
}

#[tokio::test]
async fn test_failed_ledger_write_after_send_still_deduplicates_in_process() {
    let channel = Arc::new(RecordingChannel::default());
    let ledger = Arc::new(DedupLedger::hydrate(Arc::new(ReadOnlySentLinks)).unwrap());
    let notifier = NotifyUseCase::new(ledger.clone(), channel.clone());
    let p = posting("FL.ru", "Сайт", "https://fl.ru/ro");

    assert_eq!(notifier.notify(&p).await.unwrap(), NotifyOutcome::Sent);
    assert!(ledger.contains(&p.link));
    assert_eq!(notifier.notify(&p).await.unwrap(), NotifyOutcome::Skipped);
    assert_eq!(channel.messages().len(), 1);

    assert!(matches!(ledger.record("https://fl.ru/other"), Err(DomainError::Persistence(_))));
}
