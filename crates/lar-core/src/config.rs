use std::{env, fmt, fs, path::Path, str::FromStr, time::Duration};

use crate::{
    errors::Error,
    policy::RateLimitScope,
    specification::time_window::DEFAULT_TIME_ZONE,
    Result,
};

pub const DEFAULT_LINE_API_BASE_URL: &str = "https://api.line.me/v2/bot";

/// Which ready-made rule the binary runs.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Preset {
    #[default]
    Greeting,
    BusinessHours,
    StickerReaction,
}

impl Preset {
    pub fn as_str(self) -> &'static str {
        match self {
            Preset::Greeting => "greeting",
            Preset::BusinessHours => "business-hours",
            Preset::StickerReaction => "sticker-reaction",
        }
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Preset {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().replace('_', "-").as_str() {
            "greeting" => Ok(Preset::Greeting),
            "business-hours" => Ok(Preset::BusinessHours),
            "sticker-reaction" => Ok(Preset::StickerReaction),
            other => Err(Error::Config(format!("unknown preset: {other}"))),
        }
    }
}

/// Typed configuration, read from the environment.
#[derive(Clone, Debug)]
pub struct Config {
    // LINE Messaging API
    pub line_channel_access_token: Option<String>,
    pub line_api_base_url: String,
    pub line_request_timeout: Duration,

    // Engine
    pub account_id: String,
    pub preset: Preset,
    pub time_zone: String,
    pub random_seed: Option<u64>,

    // Rate limiting
    pub rate_limit_max: u32,
    pub rate_limit_window_secs: u64,
    pub rate_limit_scope: RateLimitScope,
}

impl Config {
    pub fn load() -> Result<Self> {
        load_dotenv_if_present(Path::new(".env"));
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a config from any key lookup; `load` passes the process env.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let get = |key: &str| lookup(key).and_then(non_empty);

        let account_id = get("LAR_ACCOUNT_ID").ok_or_else(|| {
            Error::Config("LAR_ACCOUNT_ID environment variable is required".to_string())
        })?;

        let line_channel_access_token = get("LINE_CHANNEL_ACCESS_TOKEN");
        let line_api_base_url = get("LINE_API_BASE_URL")
            .unwrap_or_else(|| DEFAULT_LINE_API_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();
        let line_request_timeout = Duration::from_millis(parse_or(
            "LINE_REQUEST_TIMEOUT_MS",
            get("LINE_REQUEST_TIMEOUT_MS"),
            10_000,
        )?);

        let preset = match get("LAR_PRESET") {
            Some(s) => s.parse()?,
            None => Preset::default(),
        };

        let time_zone = get("LAR_TIME_ZONE").unwrap_or_else(|| DEFAULT_TIME_ZONE.to_string());
        if time_zone.parse::<chrono_tz::Tz>().is_err() {
            return Err(Error::Config(format!("LAR_TIME_ZONE: unknown time zone {time_zone:?}")));
        }

        let random_seed = match get("LAR_RANDOM_SEED") {
            Some(s) => Some(parse_value("LAR_RANDOM_SEED", &s)?),
            None => None,
        };

        let rate_limit_max = parse_or("LAR_RATE_LIMIT_MAX", get("LAR_RATE_LIMIT_MAX"), 1)?;
        let rate_limit_window_secs =
            parse_or("LAR_RATE_LIMIT_WINDOW_SECS", get("LAR_RATE_LIMIT_WINDOW_SECS"), 60)?;
        let rate_limit_scope = match get("LAR_RATE_LIMIT_SCOPE") {
            Some(s) => s
                .parse()
                .map_err(|e| Error::Config(format!("LAR_RATE_LIMIT_SCOPE: {e}")))?,
            None => RateLimitScope::default(),
        };

        Ok(Self {
            line_channel_access_token,
            line_api_base_url,
            line_request_timeout,
            account_id,
            preset,
            time_zone,
            random_seed,
            rate_limit_max,
            rate_limit_window_secs,
            rate_limit_scope,
        })
    }
}

fn parse_or<T: FromStr>(key: &str, raw: Option<String>, default: T) -> Result<T> {
    match raw {
        Some(s) => parse_value(key, &s),
        None => Ok(default),
    }
}

fn parse_value<T: FromStr>(key: &str, raw: &str) -> Result<T> {
    raw.trim()
        .parse::<T>()
        .map_err(|_| Error::Config(format!("{key} has an invalid value: {raw:?}")))
}

fn load_dotenv_if_present(path: &Path) {
    let Ok(contents) = fs::read_to_string(path) else {
        return;
    };

    for raw in contents.lines() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let Some((k, v)) = line.split_once('=') else {
            continue;
        };

        let key = k.trim();
        if key.is_empty() {
            continue;
        }
        if env::var_os(key).is_some() {
            continue; // do not override existing env
        }

        env::set_var(key, strip_quotes(v.trim()));
    }
}

fn strip_quotes(val: &str) -> &str {
    if val.len() >= 2
        && ((val.starts_with('"') && val.ends_with('"'))
            || (val.starts_with('\'') && val.ends_with('\'')))
    {
        &val[1..val.len() - 1]
    } else {
        val
    }
}

fn non_empty(s: String) -> Option<String> {
    if s.trim().is_empty() {
        None
    } else {
        Some(s)
    }
}
