//! `storyreel` -- runs one simulated book-to-video generation.
//!
//! Mounts the studio over the on-disk preference store, submits the story
//! given on the command line (or the built-in sample), follows the job to
//! completion, then downloads and shares the result. The final job state is
//! printed to stdout as JSON.
//!
//! # Environment variables
//!
//! | Variable            | Required | Default | Description                              |
//! |---------------------|----------|---------|------------------------------------------|
//! | `STORYREEL_USER_ID` | yes      | --      | Signed-in user submitting the story      |
//! | `STORYREEL_STYLE`   | no       | --      | Style to select before submitting        |
//! | `STORYREEL_VOICE`   | no       | --      | Voice to select before submitting        |
//!
//! Timing and storage settings are documented on
//! [`StudioConfig::from_env`](storyreel_studio::StudioConfig::from_env).

use std::sync::Arc;

use storyreel_store::FileStore;
use storyreel_studio::{Studio, StudioConfig};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "storyreel_studio=info,storyreel=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = StudioConfig::from_env();
    tracing::info!(
        store_path = %config.store_path.display(),
        tick_interval = ?config.tick_interval,
        total_frames = config.total_frames,
        "Loaded studio configuration",
    );

    let store = Arc::new(FileStore::new(&config.store_path));
    let studio = Studio::mount(&config, store).await.unwrap_or_else(|e| {
        tracing::error!(error = %e, "Failed to mount studio");
        std::process::exit(1);
    });

    for (var, selector) in [
        ("STORYREEL_STYLE", &studio.style),
        ("STORYREEL_VOICE", &studio.voice),
    ] {
        if let Ok(option) = std::env::var(var) {
            if let Err(e) = selector.select(option.trim()).await {
                tracing::error!(error = %e, "{var} is not a valid option");
                std::process::exit(1);
            }
        }
    }

    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.is_empty() {
        tracing::info!("No story given, using the sample excerpt");
        studio.collector.load_sample().await;
    } else {
        studio.collector.set_text(args.join(" ")).await;
    }

    let user_id = std::env::var("STORYREEL_USER_ID").ok();
    let mut progress = studio.simulator.subscribe();

    if let Err(e) = studio.collector.submit(user_id.as_deref()).await {
        tracing::error!(error = %e, "Submit rejected");
        std::process::exit(1);
    }

    loop {
        if progress.changed().await.is_err() {
            tracing::error!("Simulator stopped before the job completed");
            std::process::exit(1);
        }
        let snapshot = progress.borrow_and_update().clone();
        tracing::info!(
            progress = snapshot.progress,
            frame = snapshot.displayed_frame().unwrap_or("-"),
            "Generating frames",
        );
        if snapshot.is_complete() {
            break;
        }
    }

    let mut notifications = studio.notifier.subscribe();
    let terminal = studio.simulator.download().and_then(|()| studio.simulator.share());
    if let Err(e) = terminal {
        tracing::error!(error = %e, "Terminal action rejected");
        std::process::exit(1);
    }

    let download_complete = storyreel_studio::Notification::download_complete();
    while let Ok(notification) = notifications.recv().await {
        if notification == download_complete {
            break;
        }
    }

    match serde_json::to_string_pretty(&studio.simulator.snapshot()) {
        Ok(json) => println!("{json}"),
        Err(e) => tracing::error!(error = %e, "Failed to serialize job state"),
    }

    studio.unmount().await;
}
