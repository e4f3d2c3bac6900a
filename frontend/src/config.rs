pub struct Config {
    pub api_base_url: &'static str,
    pub token_storage_key: &'static str,
    /// How long a rolled-back vote notice stays on screen.
    pub notice_timeout_ms: u32,
}

impl Config {
    pub const fn new() -> Self {
        Self {
            api_base_url: "/api",
            token_storage_key: "authToken",
            notice_timeout_ms: 4_000,
        }
    }
}

pub const CONFIG: Config = Config::new();
