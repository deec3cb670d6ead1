pub const DEFAULT_CHAT_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_DEEPL_API_URL: &str = "https://api-free.deepl.com/v2/translate";
pub const DEFAULT_TARGET_LANG: &str = "EN-US";

pub const DEFAULT_RECENT_HOURS: i64 = 24;
pub const DEFAULT_SUMMARY_WORDS: u32 = 100;
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;

pub const UNTITLED: &str = "(untitled)";

// Discord rejects webhook messages longer than this.
pub const MAX_WEBHOOK_MESSAGE_CHARS: usize = 2000;
