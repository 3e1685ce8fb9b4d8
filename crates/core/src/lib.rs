pub mod domain;
pub mod llm;
pub mod present;
pub mod session;
pub mod time;

pub mod config {
    use anyhow::Context;

    #[derive(Debug, Clone)]
    pub struct Settings {
        pub gemini_api_key: Option<String>,
        pub gemini_model: Option<String>,
        pub gemini_base_url: Option<String>,
        pub gemini_timeout_secs: Option<u64>,
        pub sentry_dsn: Option<String>,
    }

    impl Settings {
        pub fn from_env() -> anyhow::Result<Self> {
            Self::from_lookup(|name| std::env::var(name).ok())
        }

        pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
            let non_empty = |name: &str| lookup(name).filter(|s| !s.trim().is_empty());

            // GEMINI_API_KEY wins; API_KEY is what older .env files carry.
            let gemini_api_key = non_empty("GEMINI_API_KEY").or_else(|| non_empty("API_KEY"));

            let gemini_timeout_secs = match lookup("GEMINI_TIMEOUT_SECS") {
                Some(s) => Some(
                    s.trim()
                        .parse::<u64>()
                        .with_context(|| format!("GEMINI_TIMEOUT_SECS is not a number: {s}"))?,
                ),
                None => None,
            };

            Ok(Self {
                gemini_api_key,
                gemini_model: non_empty("GEMINI_MODEL"),
                gemini_base_url: non_empty("GEMINI_BASE_URL"),
                gemini_timeout_secs,
                sentry_dsn: non_empty("SENTRY_DSN"),
            })
        }

        pub fn require_gemini_api_key(&self) -> anyhow::Result<&str> {
            self.gemini_api_key
                .as_deref()
                .context("GEMINI_API_KEY (or API_KEY) is required")
        }
    }

}
