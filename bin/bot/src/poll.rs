//! The update polling loop.

use crate::handler::Bot;
use litbot_ai::OpenRouterBackend;
use litbot_conversation::InMemorySessionStore;
use litbot_telegram::{TelegramClient, UpdatePoller};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

/// The bot as wired in production.
pub type LiveBot = Bot<InMemorySessionStore, OpenRouterBackend, TelegramClient>;

/// Polls for updates and spawns one task per event until `shutdown` resolves.
///
/// A failed poll waits `backoff` before retrying; `shutdown` also ends
/// that wait.
pub async fn run(
    bot: Arc<LiveBot>,
    mut poller: UpdatePoller,
    backoff: Duration,
    shutdown: impl Future<Output = ()>,
) {
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            () = &mut shutdown => break,
            batch = poller.next_batch() => match batch {
                Ok(updates) => {
                    for event in updates.into_iter().filter_map(|update| update.into_event()) {
                        let bot = Arc::clone(&bot);
                        tokio::spawn(async move {
                            bot.handle_event(event).await;
                        });
                    }
                }
                Err(report) => {
                    tracing::warn!(error = %report, "Polling failed, backing off");
                    tokio::select! {
                        () = &mut shutdown => break,
                        () = tokio::time::sleep(backoff) => {}
                    }
                }
            }
        }
    }

    tracing::info!("Shutting down");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::FeatureFlags;
    use crate::handler::HandlerSettings;
    use crate::texts::Texts;
    use litbot_ai::{ApiKey, OpenRouterConfig, SamplingConfig, system_instruction};
    use litbot_conversation::{ConversationWindow, ResponseRelay};
    use litbot_core::Language;
    use litbot_telegram::BotToken;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn live_bot(client: TelegramClient) -> Arc<LiveBot> {
        let backend = OpenRouterBackend::new(OpenRouterConfig::new(ApiKey::new("test-key")))
            .expect("backend builds");
        let settings = HandlerSettings {
            persona: system_instruction(Language::En),
            sampling: SamplingConfig::default(),
            window: ConversationWindow::new(20),
            relay: ResponseRelay::default(),
            features: FeatureFlags::default(),
            texts: Texts::for_language(Language::En),
        };
        Arc::new(Bot::new(InMemorySessionStore::new(), backend, client, settings))
    }

    #[tokio::test]
    async fn shutdown_interrupts_error_backoff() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/bot123:ABC/getUpdates"))
            .respond_with(ResponseTemplate::new(502))
            .mount(&server)
            .await;

        let client = TelegramClient::new(
            server.uri(),
            BotToken::new("123:ABC"),
            Duration::from_secs(1),
        )
        .expect("client builds");
        let poller = UpdatePoller::new(client.clone(), Duration::from_secs(1));
        let shutdown = tokio::time::sleep(Duration::from_millis(200));

        let stopped = tokio::time::timeout(
            Duration::from_secs(10),
            run(live_bot(client), poller, Duration::from_secs(3600), shutdown),
        )
        .await;

        assert!(stopped.is_ok(), "loop kept sleeping through shutdown");
        assert!(!server.received_requests().await.unwrap_or_default().is_empty());
    }
}
