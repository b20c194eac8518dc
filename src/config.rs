use std::net::{IpAddr, SocketAddr};
use anyhow::Context;
use axum::http::HeaderValue;
use clap::Parser;
use crate::helpers::text::non_blank;

#[derive(Parser, Clone, Debug)]
#[clap(name = "nowhey-backend", about = "Dairy-free restaurant assessment API")]
pub struct Config {
    #[clap(env, long, default_value = "development")]
    pub environment: String,

    #[clap(env, long, default_value = "0.0.0.0")]
    pub host: IpAddr,

    #[clap(env, long, default_value_t = 8000)]
    pub port: u16,

    /// Comma separated list of origins allowed by CORS
    #[clap(env, long, default_value = "http://localhost:5173,http://localhost:3000")]
    pub origin_urls: String,

    #[clap(env, long)]
    pub database_url: Option<String>,

    #[clap(env, long)]
    pub database_pool_size: Option<u32>,

    #[clap(env, long)]
    pub gemini_api_key: Option<String>,

    #[clap(env, long, default_value = "gemini-2.0-flash")]
    pub gemini_model: String,

    #[clap(env, long, default_value = "https://generativelanguage.googleapis.com")]
    pub gemini_base_url: String,

    #[clap(env, long)]
    pub google_places_api_key: Option<String>,

    #[clap(env, long, default_value = "https://places.googleapis.com")]
    pub google_places_base_url: String,

    #[clap(env, long, default_value_t = 30)]
    pub upstream_timeout_secs: u64,
}

impl Config {
    pub fn listen_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    pub fn allowed_origins(&self) -> anyhow::Result<Vec<HeaderValue>> {
        self.origin_urls
            .split(',')
            .map(str::trim)
            .filter(|origin| !origin.is_empty())
            .map(|origin| {
                origin
                    .parse::<HeaderValue>()
                    .with_context(|| format!("Invalid origin url: {}", origin))
            })
            .collect()
    }

    pub fn pool_size(&self) -> u32 {
        self.database_pool_size
            .unwrap_or_else(|| (num_cpus::get() as u32) * 2)
            .max(1)
    }

    // An env var set to an empty string counts as unset.
    pub fn database_url(&self) -> Option<&str> {
        non_blank(self.database_url.as_deref())
    }

    pub fn gemini_api_key(&self) -> Option<&str> {
        non_blank(self.gemini_api_key.as_deref())
    }

    pub fn google_places_api_key(&self) -> Option<&str> {
        non_blank(self.google_places_api_key.as_deref())
    }
}
