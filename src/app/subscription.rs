use std::sync::Arc;
use std::time::Duration;

use iced::futures::channel::mpsc;
use iced::futures::{stream, SinkExt};
use iced::Subscription;

use crate::dashboard::DashboardController;
use crate::push::sse;
use crate::push::LocalPushChannel;
use super::{App, Message};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PushStatus {
    Connected,
    Disconnected(String),
}

impl App {
    pub fn subscription(&self) -> Subscription<Message> {
        let mut subscriptions = Vec::new();

        if let Some(controller) = &self.dashboard {
            subscriptions.push(dashboard_updates(Arc::clone(controller)));

            if let (Some(key), Some(session)) = (self.push_key(), &self.session) {
                subscriptions.push(push_events(
                    key,
                    session.access_key.clone(),
                    self.push_channel.clone(),
                    Duration::from_secs(self.config.push_retry_secs.max(1)),
                ));
            }
        }

        Subscription::batch(subscriptions)
    }

    /// Identity of the SSE connection. Tied to the controller so a new session never
    /// inherits the previous session's stream and access key.
    pub fn push_key(&self) -> Option<PushKey> {
        let controller = self.dashboard.as_ref()?;
        self.session.as_ref()?;
        let url = self.config.push_url.clone()?;
        Some(PushKey {
            controller: controller.id(),
            url,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PushKey {
    pub controller: u64,
    pub url: String,
}

/// Streams every snapshot the controller publishes, including the ones produced by
/// push-triggered refreshes.
fn dashboard_updates(controller: Arc<DashboardController>) -> Subscription<Message> {
    let id = controller.id();
    let updates = controller.updates();

    Subscription::run_with_id(
        ("dashboard", id),
        stream::unfold(updates, move |mut updates| async move {
            updates.changed().await.ok()?;
            let snapshot = updates.borrow_and_update().clone();
            Some((Message::DashboardUpdated(id, snapshot), updates))
        }),
    )
}

/// Keeps an SSE connection open while a session is active and re-emits its events on the
/// local push channel. Reconnects after `retry` whenever the connection drops.
fn push_events(key: PushKey, access_key: String, channel: LocalPushChannel, retry: Duration) -> Subscription<Message> {
    let url = key.url.clone();
    Subscription::run_with_id(
        ("push", key),
        iced::stream::channel(16, move |mut output: mpsc::Sender<Message>| async move {
            while !output.is_closed() {
                let status = match sse::connect(&url, &access_key).await {
                    Ok(resp) => {
                        tracing::info!(%url, "Push channel connected");
                        let _ = output.send(Message::PushStatus(PushStatus::Connected)).await;
                        match sse::forward(resp, &channel).await {
                            Ok(count) => format!("stream closed after {} events", count),
                            Err(err) => err.to_string(),
                        }
                    }
                    Err(err) => err.to_string(),
                };

                tracing::warn!(%url, reason = %status, retry_secs = retry.as_secs(), "Push channel disconnected");
                let _ = output.send(Message::PushStatus(PushStatus::Disconnected(status))).await;
                tokio::time::sleep(retry).await;
            }
        }),
    )
}
