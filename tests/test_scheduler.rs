mod common;

use common::{fast_options, CountingSource, RecordingChannel};
use jobwatch::application::scheduler::Schedule;
use jobwatch::domain::ports::posting_source::PostingSource;
use jobwatch::JobWatch;
use std::sync::Arc;
use std::time::Duration;

#[tokio::test(start_paused = true)]
async fn test_first_cycle_runs_immediately_then_on_interval() {
    let source = Arc::new(CountingSource::default());
    let jw = Arc::new(
        JobWatch::with_providers(
            ":memory:",
            Arc::new(RecordingChannel::default()),
            vec![source.clone() as Arc<dyn PostingSource>],
            fast_options(),
        )
        .unwrap(),
    );

    let handle = {
        let jw = Arc::clone(&jw);
        tokio::spawn(async move { jw.run_scheduled(Schedule::Interval(Duration::from_secs(60))).await })
    };

    tokio::time::sleep(Duration::from_secs(1)).await;
    assert_eq!(source.count(), 1);

    tokio::time::sleep(Duration::from_secs(60)).await;
    assert_eq!(source.count(), 2);

    jw.request_shutdown();
    tokio::time::timeout(Duration::from_secs(1), handle)
        .await
        .expect("scheduler should stop on shutdown")
        .unwrap();
    assert_eq!(source.count(), 2);
}
