//! User-facing texts.
//!
//! Every string the bot sends on its own behalf, per language. Model replies
//! are never passed through here.

use crate::config::FeatureFlags;
use litbot_ai::Apology;
use litbot_conversation::{Favorites, UsageStats};
use litbot_core::Language;
use std::fmt::Write;

/// Localized bot texts.
#[derive(Debug)]
pub struct Texts {
    greeting: &'static str,
    help_intro: &'static str,
    commands_header: &'static str,
    cmd_start: &'static str,
    cmd_clear: &'static str,
    cmd_help: &'static str,
    cmd_stats: &'static str,
    cmd_favorites: &'static str,
    /// Confirmation after `/clear`.
    pub cleared: &'static str,
    /// Reply to disabled or unknown commands.
    pub unknown_command: &'static str,
    stats_header: &'static str,
    stats_messages: &'static str,
    stats_joined: &'static str,
    stats_turns: &'static str,
    stats_favorites: &'static str,
    favorites_header: &'static str,
    /// Hint shown when there are no favorites yet.
    pub favorites_empty: &'static str,
    /// Label of the inline button under a reply.
    pub favorite_button: &'static str,
    /// Toast after a topic was added.
    pub favorite_added: &'static str,
    /// Toast when the topic was already a favorite.
    pub favorite_exists: &'static str,
    /// Toast when there is no question to add.
    pub favorite_nothing: &'static str,
    apology_timeout: &'static str,
    apology_request: &'static str,
    apology_generic: &'static str,
}

const RU: Texts = Texts {
    greeting: "👋 Привет! Я – литературный чат-бот!\n\n\
        Я могу рассказать тебе о любом писателе мира, его жизни, творчестве и влиянии на литературу.\n\n\
        Просто напиши имя писателя или вопрос о литературе!",
    help_intro: "📚 Я литературный эксперт. Спроси меня о:\n\
        • Биографии писателей\n\
        • Их произведениях\n\
        • Литературных направлениях\n\
        • Анализе книг\n\
        • Рекомендациях для чтения",
    commands_header: "Команды:",
    cmd_start: "главное меню",
    cmd_clear: "очистить историю",
    cmd_help: "справка",
    cmd_stats: "твоя статистика",
    cmd_favorites: "избранные темы",
    cleared: "✨ История разговора очищена. Давай начнём заново!",
    unknown_command: "🤔 Не знаю такой команды. Напиши /help, чтобы увидеть список команд.",
    stats_header: "📊 Твоя статистика:",
    stats_messages: "Сообщений отправлено",
    stats_joined: "С нами с",
    stats_turns: "Реплик в истории",
    stats_favorites: "Избранных тем",
    favorites_header: "⭐ Избранные темы:",
    favorites_empty: "⭐ Избранное пока пусто. Нажми «В избранное» под ответом, чтобы сохранить тему.",
    favorite_button: "⭐ В избранное",
    favorite_added: "Добавлено в избранное",
    favorite_exists: "Эта тема уже в избранном",
    favorite_nothing: "Пока нечего добавить",
    apology_timeout: "⏳ Извини, ответ занял слишком много времени. Попробуй ещё раз чуть позже.",
    apology_request: "❌ Извини, не удалось связаться с сервисом ответов. \
        Попробуй ещё раз или напиши /clear для очистки истории.",
    apology_generic: "❌ Извини, произошла ошибка при обработке твоего сообщения. \
        Попробуй ещё раз или напиши /clear для очистки истории.",
};

const EN: Texts = Texts {
    greeting: "👋 Hi! I'm a literary chat bot!\n\n\
        I can tell you about any writer in the world, their life, work and influence on literature.\n\n\
        Just send me a writer's name or a question about literature!",
    help_intro: "📚 I'm a literature expert. Ask me about:\n\
        • Writers' biographies\n\
        • Their works\n\
        • Literary movements\n\
        • Book analysis\n\
        • Reading recommendations",
    commands_header: "Commands:",
    cmd_start: "main menu",
    cmd_clear: "clear the history",
    cmd_help: "this help",
    cmd_stats: "your statistics",
    cmd_favorites: "favorite topics",
    cleared: "✨ Conversation history cleared. Let's start over!",
    unknown_command: "🤔 I don't know that command. Send /help to see the list of commands.",
    stats_header: "📊 Your statistics:",
    stats_messages: "Messages sent",
    stats_joined: "With us since",
    stats_turns: "Turns in history",
    stats_favorites: "Favorite topics",
    favorites_header: "⭐ Favorite topics:",
    favorites_empty: "⭐ No favorites yet. Tap \"Add to favorites\" under a reply to save a topic.",
    favorite_button: "⭐ Add to favorites",
    favorite_added: "Added to favorites",
    favorite_exists: "This topic is already a favorite",
    favorite_nothing: "Nothing to add yet",
    apology_timeout: "⏳ Sorry, the answer took too long. Please try again a bit later.",
    apology_request: "❌ Sorry, I couldn't reach the answering service. \
        Try again or send /clear to reset the history.",
    apology_generic: "❌ Sorry, something went wrong while handling your message. \
        Try again or send /clear to reset the history.",
};

impl Texts {
    /// Returns the texts for a language.
    #[must_use]
    pub fn for_language(language: Language) -> &'static Self {
        match language {
            Language::Ru => &RU,
            Language::En => &EN,
        }
    }

    fn command_list(&self, features: FeatureFlags) -> String {
        let mut lines = vec![
            ("start", self.cmd_start),
            ("clear", self.cmd_clear),
            ("help", self.cmd_help),
        ];
        if features.stats {
            lines.push(("stats", self.cmd_stats));
        }
        if features.favorites {
            lines.push(("favorites", self.cmd_favorites));
        }

        let mut out = self.commands_header.to_string();
        for (name, description) in lines {
            let _ = write!(out, "\n/{name} – {description}");
        }
        out
    }

    /// `/start` reply.
    #[must_use]
    pub fn greeting(&self, features: FeatureFlags) -> String {
        format!("{}\n\n{}", self.greeting, self.command_list(features))
    }

    /// `/help` reply, listing only enabled commands.
    #[must_use]
    pub fn help(&self, features: FeatureFlags) -> String {
        format!("{}\n\n{}", self.help_intro, self.command_list(features))
    }

    /// `/stats` reply.
    #[must_use]
    pub fn stats(&self, stats: &UsageStats, stored_turns: usize, favorites: usize) -> String {
        format!(
            "{}\n{}: {}\n{}: {}\n{}: {}\n{}: {}",
            self.stats_header,
            self.stats_messages,
            stats.message_count,
            self.stats_joined,
            stats.joined_at.format("%Y-%m-%d"),
            self.stats_turns,
            stored_turns,
            self.stats_favorites,
            favorites,
        )
    }

    /// `/favorites` reply.
    #[must_use]
    pub fn favorites(&self, favorites: &Favorites) -> String {
        if favorites.is_empty() {
            return self.favorites_empty.to_string();
        }

        let mut out = self.favorites_header.to_string();
        for (index, topic) in favorites.iter().enumerate() {
            let _ = write!(out, "\n{}. {topic}", index + 1);
        }
        out
    }

    /// Text sent instead of a reply when the completion call fails.
    #[must_use]
    pub fn apology(&self, apology: Apology) -> &'static str {
        match apology {
            Apology::Timeout => self.apology_timeout,
            Apology::Request => self.apology_request,
            Apology::Generic => self.apology_generic,
        }
    }
}
