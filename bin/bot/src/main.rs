use litbot::{Bot, BotConfig, HandlerSettings, poll};
use litbot_ai::OpenRouterBackend;
use litbot_conversation::{InMemorySessionStore, SessionStore};
use litbot_telegram::{TelegramClient, UpdatePoller};
use std::process::ExitCode;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration from environment
    let config = match BotConfig::from_env() {
        Ok(config) => config,
        Err(report) => {
            tracing::error!("{report}");
            return ExitCode::FAILURE;
        }
    };
    tracing::info!(
        model = %config.completion.model,
        language = ?config.language,
        window_size = config.conversation.window_size,
        "Loaded configuration"
    );

    let backend = match OpenRouterBackend::new(config.openrouter()) {
        Ok(backend) => backend,
        Err(e) => {
            tracing::error!(error = %e, "failed to create completion backend");
            return ExitCode::FAILURE;
        }
    };

    let client = match TelegramClient::new(
        config.telegram.api_base.clone(),
        config.bot_token.clone(),
        config.telegram.poll_timeout(),
    ) {
        Ok(client) => client,
        Err(report) => {
            tracing::error!(error = %report, "failed to create Telegram client");
            return ExitCode::FAILURE;
        }
    };

    // Verify the token before polling
    match client.get_me().await {
        Ok(me) => tracing::info!(
            bot = me.username.as_deref().unwrap_or(&me.first_name),
            "Connected to Telegram"
        ),
        Err(report) => {
            tracing::error!(error = %report, "failed to reach the Bot API");
            return ExitCode::FAILURE;
        }
    }

    let store = InMemorySessionStore::new();

    // Spawn periodic idle-session eviction
    if let Some(idle_for) = config.idle_ttl() {
        let eviction_store = store.clone();
        let eviction_interval = config.eviction_interval();
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(eviction_interval);
            loop {
                interval.tick().await;
                let evicted = eviction_store.evict_idle(idle_for).await;
                if evicted > 0 {
                    tracing::debug!(evicted_sessions = evicted, "Evicted idle sessions");
                }
            }
        });
    }

    let bot = Arc::new(Bot::new(
        store,
        backend,
        client.clone(),
        HandlerSettings::from_config(&config),
    ));
    let poller = UpdatePoller::new(client, config.telegram.poll_timeout());

    tracing::info!("Bot started, polling for updates");

    let shutdown = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for Ctrl-C");
        }
    };
    poll::run(bot, poller, config.telegram.error_backoff(), shutdown).await;

    ExitCode::SUCCESS
}
