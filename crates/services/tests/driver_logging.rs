use std::io::Write;
use std::sync::{Arc, Mutex};

use mathdash_core::QuestionGenerator;
use services::{SessionEvent, SessionLoopService, SessionService};
use tokio::sync::mpsc;
use tracing::level_filters::LevelFilter;

/// Collects formatted log output in memory.
#[derive(Clone, Default)]
struct Captured(Arc<Mutex<Vec<u8>>>);

impl Captured {
    fn text(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl Write for Captured {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

#[tokio::test(start_paused = true)]
async fn rejected_and_dropped_answers_stay_below_warn() {
    let captured = Captured::default();
    let writer = captured.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(LevelFilter::DEBUG)
        .with_ansi(false)
        .without_time()
        .with_writer(move || writer.clone())
        .finish();
    let _guard = tracing::subscriber::set_default(subscriber);

    let (answer_tx, answer_rx) = mpsc::channel(16);
    let (event_tx, mut event_rx) = mpsc::channel(256);
    let session = SessionService::new(QuestionGenerator::seeded(21));
    let driver = SessionLoopService::default();
    let handle = tokio::spawn(async move { driver.run(session, answer_rx, event_tx).await });

    let SessionEvent::QuestionReady(question) = event_rx.recv().await.unwrap() else {
        panic!("expected the first question");
    };
    answer_tx.send("abc".into()).await.unwrap();
    answer_tx.send(question.expected().to_string()).await.unwrap();
    answer_tx.send("1".into()).await.unwrap();
    drop(answer_tx);

    let summary = handle.await.unwrap();
    assert_eq!(summary.total_questions(), 1);

    let logs = captured.text();
    assert!(logs.contains("answer rejected"), "logs: {logs}");
    assert!(logs.contains("answer ignored"), "logs: {logs}");
    assert!(!logs.contains("WARN"), "logs: {logs}");
}
