//! Notification broadcaster — one rendered payload fanned out to every
//! subscriber.
//!
//! The fetch/render half runs once, synchronously. Delivery is one
//! independent job per recipient: jobs go onto an in-process queue consumed
//! by a small worker pool, with no ordering guarantee between recipients and
//! no retry for failed jobs.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use sqlx::PgPool;
use tokio::sync::{Mutex, mpsc};
use tokio::task::JoinSet;

use taskherald_common::error::AppError;
use taskherald_common::types::{BroadcastSummary, NotificationJob};
use taskherald_engine::format::render_tasks;
use taskherald_engine::recipients::RecipientService;
use taskherald_engine::tasks::TaskClient;

/// Run one broadcast round: enumerate subscribers, fetch and render the
/// outstanding tasks once, then deliver to each subscriber independently.
///
/// With zero subscribers the round short-circuits before the upstream fetch
/// and reports zero on both counts. Individual delivery failures are logged
/// and never abort the round; `recipients_notified` counts the deliveries
/// the platform accepted.
pub async fn broadcast_incomplete_tasks(
    pool: &PgPool,
    tasks: &TaskClient,
    telegram: &crate::telegram::TelegramClient,
    workers: usize,
) -> Result<BroadcastSummary, AppError> {
    let recipients = RecipientService::list_subscribed(pool).await?;
    if recipients.is_empty() {
        tracing::info!("No subscribed recipients, skipping broadcast");
        return Ok(BroadcastSummary::default());
    }

    let items = tasks.fetch_incomplete().await;
    let text = render_tasks(&items);

    tracing::info!(
        tasks_found = items.len(),
        recipients = recipients.len(),
        "Broadcasting task summary"
    );

    let (tx, rx) = mpsc::channel::<NotificationJob>(recipients.len());
    let rx = Arc::new(Mutex::new(rx));
    let delivered = Arc::new(AtomicUsize::new(0));

    let mut deliveries = JoinSet::new();
    for _ in 0..workers.clamp(1, recipients.len()) {
        let rx = Arc::clone(&rx);
        let delivered = Arc::clone(&delivered);
        let telegram = telegram.clone();
        deliveries.spawn(async move {
            loop {
                // The lock guards only the dequeue; sends run lock-free.
                let job = rx.lock().await.recv().await;
                let Some(job) = job else { break };

                if telegram.send_message(&job.chat_id, &job.text).await {
                    delivered.fetch_add(1, Ordering::Relaxed);
                } else {
                    tracing::error!(chat_id = %job.chat_id, "Notification delivery failed");
                }
            }
        });
    }

    for recipient in &recipients {
        let job = NotificationJob {
            chat_id: recipient.chat_id.clone(),
            text: text.clone(),
        };
        if tx.send(job).await.is_err() {
            tracing::warn!("Delivery queue closed early");
            break;
        }
    }
    // Closing the queue is what lets idle workers exit.
    drop(tx);

    while deliveries.join_next().await.is_some() {}

    Ok(BroadcastSummary {
        tasks_found: items.len(),
        recipients_notified: delivered.load(Ordering::Relaxed),
    })
}
