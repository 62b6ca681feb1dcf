use clap::Parser;

/// Command-line flags. Each one overrides the environment variable of the
/// same meaning.
#[derive(Debug, Parser)]
#[command(
    name = "user-relay",
    version,
    about = "Forward .biz users from API A to API B"
)]
pub struct Cli {
    /// URL for API B
    #[arg(long = "api-b-url", env = "API_B_URL")]
    pub api_b_url: Option<String>,

    /// URL users are fetched from
    #[arg(long = "api-a-url", env = "API_A_URL")]
    pub api_a_url: Option<String>,

    /// Emit logs as JSON lines
    #[arg(long = "json-logs")]
    pub json_logs: bool,
}

impl Cli {
    /// Value this command line supplies for a configuration key, if any.
    pub fn lookup(&self, key: &str) -> Option<String> {
        match key {
            "API_B_URL" => self.api_b_url.clone(),
            "API_A_URL" => self.api_a_url.clone(),
            "LOG_JSON" if self.json_logs => Some("true".to_string()),
            _ => None,
        }
    }
}
