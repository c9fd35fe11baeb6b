use std::env;

use crate::error::AppError;

pub const DEFAULT_PAGE_SIZE: u32 = 10;

#[derive(Clone, Debug)]
pub struct ApiConfig {
    pub base_url: String,
    pub api_token: Option<String>,
    pub strict_durations: bool,
    pub page_size: u32,
}

impl ApiConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_token: None,
            strict_durations: false,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }

    pub fn new_from_env() -> Result<Self, AppError> {
        let base_url = env::var("SCHEDULE_API_URL")
            .map_err(|_| AppError::Config("SCHEDULE_API_URL is not set".to_string()))?;
        if base_url.trim().is_empty() {
            return Err(AppError::Config("SCHEDULE_API_URL is empty".to_string()));
        }

        let api_token = env::var("SCHEDULE_API_TOKEN")
            .ok()
            .filter(|t| !t.trim().is_empty());

        let strict_durations = match env::var("SCHEDULE_STRICT_DURATIONS") {
            Ok(raw) => parse_flag(&raw).ok_or_else(|| {
                AppError::Config(format!("SCHEDULE_STRICT_DURATIONS is not a boolean: {}", raw))
            })?,
            Err(_) => false,
        };

        let page_size = match env::var("SCHEDULE_PAGE_SIZE") {
            Ok(raw) => raw
                .trim()
                .parse::<u32>()
                .ok()
                .filter(|n| *n >= 1)
                .ok_or_else(|| {
                    AppError::Config(format!("SCHEDULE_PAGE_SIZE must be a positive integer: {}", raw))
                })?,
            Err(_) => DEFAULT_PAGE_SIZE,
        };

        Ok(Self {
            api_token,
            strict_durations,
            page_size,
            ..Self::new(base_url)
        })
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.api_token = Some(token.into());
        self
    }

    pub fn schedules_url(&self) -> String {
        format!("{}/schedules", self.base_url)
    }

    pub fn schedule_url(&self, id: &str) -> String {
        format!("{}/schedules/{}", self.base_url, id)
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" | "" => Some(false),
        _ => None,
    }
}
