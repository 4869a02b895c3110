//! Integration tests for story submission.
//!
//! Covers the validation and sign-in gates in front of the event bus and
//! the exact payload of the published `generation-requested` event.

mod common;

use std::sync::Arc;
use std::time::Duration;

use assert_matches::assert_matches;
use common::{drain, titles};
use storyreel_core::error::{CoreError, SIGN_IN_PATH};
use storyreel_core::story::SAMPLE_STORY_TEXT;
use storyreel_events::{EventBus, GenerationRequest, StudioEvent};
use storyreel_studio::{InputCollector, Notification, Notifier};
use tokio::sync::broadcast::error::TryRecvError;

fn collector(dispatch_delay: Duration) -> (InputCollector, Arc<EventBus>, Arc<Notifier>) {
    let bus = Arc::new(EventBus::default());
    let notifier = Arc::new(Notifier::new());
    let collector = InputCollector::new(Arc::clone(&bus), Arc::clone(&notifier), dispatch_delay);
    (collector, bus, notifier)
}

// ---------------------------------------------------------------------------
// Test: rejected submits publish nothing
// ---------------------------------------------------------------------------

/// Empty and whitespace-only text fail validation and publish no event.
#[tokio::test]
async fn blank_text_is_rejected() {
    let (collector, bus, notifier) = collector(Duration::ZERO);
    let mut events = bus.subscribe();
    let mut toasts = notifier.subscribe();

    for text in ["", "   ", "\n\t  \n"] {
        collector.set_text(text).await;
        let result = collector.submit(Some("user-1")).await;
        assert_matches!(result, Err(CoreError::Validation(_)));
    }

    assert_matches!(events.try_recv(), Err(TryRecvError::Empty));
    let shown = drain(&mut toasts);
    assert_eq!(shown.len(), 3);
    assert!(shown.iter().all(|n| *n == Notification::text_required()));
    assert!(!collector.is_generating());
}

/// Without a signed-in user the submit redirects to the sign-in page.
#[tokio::test]
async fn missing_user_requires_sign_in() {
    let (collector, bus, notifier) = collector(Duration::ZERO);
    let mut events = bus.subscribe();
    let mut toasts = notifier.subscribe();
    collector.set_text("Call me Ishmael.").await;

    let result = collector.submit(None).await;
    assert_matches!(result, Err(CoreError::AuthRequired { redirect_to }) if redirect_to == SIGN_IN_PATH);

    let result = collector.submit(Some("  ")).await;
    assert_matches!(result, Err(CoreError::AuthRequired { .. }));

    assert_matches!(events.try_recv(), Err(TryRecvError::Empty));
    assert_eq!(
        titles(&drain(&mut toasts)),
        vec!["Authentication Required", "Authentication Required"]
    );
}

/// Blank text is reported before the missing user.
#[tokio::test]
async fn validation_runs_before_the_sign_in_check() {
    let (collector, _bus, _notifier) = collector(Duration::ZERO);

    let result = collector.submit(None).await;
    assert_matches!(result, Err(CoreError::Validation(_)));
}

// ---------------------------------------------------------------------------
// Test: accepted submits
// ---------------------------------------------------------------------------

/// A valid submit publishes exactly one event carrying the text unchanged
/// and the submitting user.
#[tokio::test]
async fn valid_submit_publishes_one_request() {
    let (collector, bus, notifier) = collector(Duration::ZERO);
    let mut events = bus.subscribe();
    let mut toasts = notifier.subscribe();
    let text = "  It was the best of times,\nit was the worst of times.  ";
    collector.set_text(text).await;

    collector
        .submit(Some("user-42"))
        .await
        .expect("submit should succeed");

    let event = events.try_recv().expect("one event should be published");
    assert_eq!(
        event,
        StudioEvent::GenerationRequested(GenerationRequest {
            text: text.to_string(),
            user_id: Some("user-42".to_string()),
        })
    );
    assert_matches!(events.try_recv(), Err(TryRecvError::Empty));
    assert_eq!(drain(&mut toasts), vec![Notification::generation_started()]);
}

/// Submitting succeeds even when nothing is listening on the bus.
#[tokio::test]
async fn submit_without_listeners_still_succeeds() {
    let (collector, _bus, _notifier) = collector(Duration::ZERO);
    collector.load_sample().await;

    assert!(collector.submit(Some("user-1")).await.is_ok());
}

/// The request is published only after the dispatch delay, and the
/// collector reports itself busy in the meantime.
#[tokio::test(start_paused = true)]
async fn submit_waits_for_the_dispatch_delay() {
    let (collector, bus, _notifier) = collector(Duration::from_secs(2));
    let collector = Arc::new(collector);
    let mut events = bus.subscribe();
    collector.set_text("The sky above the port was the color of television.").await;

    let task = {
        let collector = Arc::clone(&collector);
        tokio::spawn(async move { collector.submit(Some("user-1")).await })
    };

    tokio::time::sleep(Duration::from_millis(1_999)).await;
    assert!(collector.is_generating());
    assert_matches!(events.try_recv(), Err(TryRecvError::Empty));

    task.await
        .expect("submit task should not panic")
        .expect("submit should succeed");
    assert!(!collector.is_generating());
    assert_matches!(events.try_recv(), Ok(StudioEvent::GenerationRequested(_)));
}

/// A submit overlapping one still in its dispatch delay is refused, and
/// the collector stays busy until the first one is published.
#[tokio::test(start_paused = true)]
async fn overlapping_submit_is_rejected() {
    let (collector, bus, notifier) = collector(Duration::from_secs(2));
    let collector = Arc::new(collector);
    let mut events = bus.subscribe();
    let mut toasts = notifier.subscribe();
    collector.set_text("All this happened, more or less.").await;

    let first = {
        let collector = Arc::clone(&collector);
        tokio::spawn(async move { collector.submit(Some("user-1")).await })
    };
    tokio::time::sleep(Duration::from_secs(1)).await;

    let second = collector.submit(Some("user-1")).await;
    assert_matches!(second, Err(CoreError::Conflict(_)));
    assert!(collector.is_generating());
    assert_eq!(
        drain(&mut toasts),
        vec![Notification::generation_in_progress()]
    );

    first
        .await
        .expect("submit task should not panic")
        .expect("first submit should succeed");
    assert!(!collector.is_generating());
    assert_matches!(events.try_recv(), Ok(StudioEvent::GenerationRequested(_)));
    assert_matches!(events.try_recv(), Err(TryRecvError::Empty));

    // Once the first has gone out a new submit is accepted again.
    let third = {
        let collector = Arc::clone(&collector);
        tokio::spawn(async move { collector.submit(Some("user-1")).await })
    };
    third.await.unwrap().expect("later submit should succeed");
    assert_matches!(events.try_recv(), Ok(StudioEvent::GenerationRequested(_)));
}

// ---------------------------------------------------------------------------
// Test: sample text
// ---------------------------------------------------------------------------

/// Loading the sample replaces the current text.
#[tokio::test]
async fn load_sample_replaces_text() {
    let (collector, _bus, _notifier) = collector(Duration::ZERO);
    collector.set_text("draft").await;

    collector.load_sample().await;

    assert_eq!(collector.text().await, SAMPLE_STORY_TEXT);
}
