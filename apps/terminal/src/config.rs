use std::time::Duration;

use zeterminal_market_data::ProviderConfig;

pub struct Config {
    pub providers: ProviderConfig,
}

/// Non-blank value of an environment variable.
fn env_var(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_watchlist(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_uppercase())
        .filter(|s| !s.is_empty())
        .collect()
}

impl Config {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        let defaults = ProviderConfig::default();

        let alpha_vantage_api_key =
            env_var("ALPHA_VANTAGE_API_KEY").unwrap_or(defaults.alpha_vantage_api_key);
        let news_api_key = env_var("NEWS_API_KEY");
        let timeout_ms: u64 = env_var("ZT_REQUEST_TIMEOUT_MS")
            .and_then(|v| v.parse().ok())
            .unwrap_or(30000);
        let intraday_interval =
            env_var("ZT_INTRADAY_INTERVAL").unwrap_or(defaults.intraday_interval);
        let watchlist = env_var("ZT_WATCHLIST")
            .map(|v| parse_watchlist(&v))
            .filter(|w| !w.is_empty())
            .unwrap_or(defaults.watchlist);

        Self {
            providers: ProviderConfig {
                alpha_vantage_api_key,
                news_api_key,
                request_timeout: Duration::from_millis(timeout_ms),
                intraday_interval,
                user_agent: defaults.user_agent,
                watchlist,
            },
        }
    }
}
