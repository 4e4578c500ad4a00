use std::time::Duration;

use binsbot_core::model::Uprn;
use binsbot_provider_bedford::{BASE_URL, BedfordConfig, USER_AGENT};
use chrono_tz::Tz;
use clap::Parser;

use crate::logging::LogLevel;

#[derive(Parser, Debug)]
#[command(name = "binsbot", version, about = "Show Bedford bin collections for a property")]
pub(crate) struct CliArgs {
    /// Unique Property Reference Number to look up
    pub uprn: Uprn,

    #[arg(long, value_name = "URL", default_value = BASE_URL, help = "Endpoint the UPRN is appended to")]
    pub base_url: String,

    #[arg(long, value_name = "SECS", default_value_t = 10, help = "Timeout for the HTTP request")]
    pub timeout: u64,

    #[arg(long, value_name = "SECS", help = "Give up on the whole lookup after this long")]
    pub deadline: Option<u64>,

    #[arg(long, value_name = "TZ", default_value = "Europe/London", value_parser = parse_timezone)]
    pub timezone: Tz,

    #[arg(long, value_enum, default_value_t = LogLevel::Warn)]
    pub log_level: LogLevel,

    #[arg(long, help = "Only show the next collection")]
    pub next: bool,
}

impl CliArgs {
    pub(crate) fn bedford_config(&self) -> BedfordConfig {
        BedfordConfig {
            base_url: self.base_url.clone(),
            user_agent: USER_AGENT.to_owned(),
            timeout: Duration::from_secs(self.timeout),
            timezone: self.timezone,
        }
    }

    pub(crate) fn deadline(&self) -> Option<Duration> {
        self.deadline.map(Duration::from_secs)
    }
}

fn parse_timezone(name: &str) -> Result<Tz, String> {
    name.parse::<Tz>().map_err(|err| err.to_string())
}
