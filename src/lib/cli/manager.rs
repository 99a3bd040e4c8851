use std::{convert::Infallible, sync::Arc};

use clap::{ArgAction, Parser};

use crate::{beszel::auth::Credentials, widget::DisplayConfig};

#[derive(Parser, Debug)]
#[command(version, about, author, long_about = None)]
pub struct Args {
    /// Base URL of the Beszel hub
    #[arg(
        long,
        env = "BESZEL_URL",
        value_name = "URL",
        default_value = "http://localhost:8090",
        value_parser = parse_base_url
    )]
    pub beszel_url: String,

    /// Identity (e-mail) used to log into Beszel
    #[arg(long, env = "BESZEL_EMAIL", value_name = "EMAIL")]
    pub beszel_email: Option<String>,

    /// Password used to log into Beszel
    #[arg(long, env = "BESZEL_PASSWORD", value_name = "PASSWORD", hide_env_values = true)]
    pub beszel_password: Option<String>,

    /// Base URL used to link each system card, defaults to the Beszel URL. An empty value disables the links.
    #[arg(long, env = "REDIRECT_URL", value_name = "URL")]
    pub redirect_url: Option<String>,

    /// Hide the kernel version of each system
    #[arg(long, env = "HIDE_KERNEL", default_value = "false", default_missing_value = "true", num_args = 0..=1, action = ArgAction::Set, value_parser = parse_toggle)]
    pub hide_kernel: bool,

    /// Hide the uptime of each system
    #[arg(long, env = "HIDE_UPTIME", default_value = "false", default_missing_value = "true", num_args = 0..=1, action = ArgAction::Set, value_parser = parse_toggle)]
    pub hide_uptime: bool,

    /// Hide the CPU model of each system
    #[arg(long, env = "HIDE_CPU_INFO", default_value = "false", default_missing_value = "true", num_args = 0..=1, action = ArgAction::Set, value_parser = parse_toggle)]
    pub hide_cpu_info: bool,

    /// Hide the host address of each system
    #[arg(long, env = "HIDE_IP", default_value = "false", default_missing_value = "true", num_args = 0..=1, action = ArgAction::Set, value_parser = parse_toggle)]
    pub hide_ip: bool,

    /// Open the system links in a new browser tab
    #[arg(long, env = "OPEN_IN_NEW_TAB", default_value = "false", default_missing_value = "true", num_args = 0..=1, action = ArgAction::Set, value_parser = parse_toggle)]
    pub open_in_new_tab: bool,

    /// Interval, in seconds, between widget refreshes on the client side
    #[arg(long, env = "RELOAD_INTERVAL", value_name = "SECONDS", default_value_t = 3, value_parser = clap::value_parser!(u64).range(1..))]
    pub reload_interval: u64,

    /// Sets the address for the REST API server
    #[arg(long, env = "REST_SERVER", value_name = "<IP>:<PORT>", default_value = "0.0.0.0:8091")]
    pub rest_server: String,

    /// Directory for the rolling log files, file logging is disabled when unset
    #[arg(long, env = "LOG_PATH", value_name = "PATH")]
    pub log_path: Option<String>,

    /// Turn all log categories up to Debug, for more information check RUST_LOG env variable.
    #[arg(short, long)]
    pub verbose: bool,
}

impl Args {
    /// Both values must be present and non-empty.
    pub fn credentials(&self) -> Option<Credentials> {
        let identity = self.beszel_email.as_deref().filter(|s| !s.is_empty())?;
        let password = self.beszel_password.as_deref().filter(|s| !s.is_empty())?;

        Some(Credentials {
            identity: identity.to_string(),
            password: password.to_string(),
        })
    }

    pub fn redirect_url(&self) -> Option<String> {
        let redirect_url = self.redirect_url.as_deref().unwrap_or(&self.beszel_url);
        let redirect_url = redirect_url.trim().trim_end_matches('/');
        if redirect_url.is_empty() {
            return None;
        }
        Some(redirect_url.to_string())
    }

    pub fn display_config(&self) -> DisplayConfig {
        DisplayConfig {
            hide_kernel: self.hide_kernel,
            hide_uptime: self.hide_uptime,
            hide_cpu_info: self.hide_cpu_info,
            hide_ip: self.hide_ip,
            open_in_new_tab: self.open_in_new_tab,
            redirect_url: self.redirect_url(),
            reload_interval: self.reload_interval,
        }
    }
}

fn parse_toggle(value: &str) -> Result<bool, Infallible> {
    Ok(value.trim().eq_ignore_ascii_case("true"))
}

fn parse_base_url(value: &str) -> Result<String, String> {
    let value = value.trim().trim_end_matches('/');
    let url = url::Url::parse(value).map_err(|error| format!("{value:?} is not a valid URL: {error}"))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(format!("{value:?} must use http or https"));
    }
    Ok(value.to_string())
}

#[derive(Debug)]
struct Manager {
    clap_matches: Args,
    env_file_error: Option<String>,
}

lazy_static! {
    static ref MANAGER: Arc<Manager> = Arc::new(Manager::new());
}

impl Manager {
    fn new() -> Self {
        // The .env file must be loaded before clap reads the environment
        let env_file_error = env_file_error(dotenvy::dotenv()).map(|error| error.to_string());

        Self {
            clap_matches: Args::parse(),
            env_file_error,
        }
    }
}

/// A missing .env file is fine, everything can come from the environment.
fn env_file_error<T>(result: dotenvy::Result<T>) -> Option<dotenvy::Error> {
    match result {
        Ok(_) => None,
        Err(dotenvy::Error::Io(error)) if error.kind() == std::io::ErrorKind::NotFound => None,
        Err(error) => Some(error),
    }
}

// Construct our manager, should be done inside main
pub fn init() {
    MANAGER.as_ref();
}

// Problem found while loading the .env file, reported once the logger is up
pub fn env_file_error_message() -> Option<String> {
    MANAGER.as_ref().env_file_error.clone()
}

// Check if the verbosity parameter was used
pub fn is_verbose() -> bool {
    MANAGER.as_ref().clap_matches.verbose
}

// Return the desired address for the REST API
pub fn server_address() -> String {
    MANAGER.as_ref().clap_matches.rest_server.clone()
}

pub fn beszel_url() -> String {
    MANAGER.as_ref().clap_matches.beszel_url.clone()
}

pub fn credentials() -> Option<Credentials> {
    MANAGER.as_ref().clap_matches.credentials()
}

pub fn display_config() -> DisplayConfig {
    MANAGER.as_ref().clap_matches.display_config()
}

pub fn log_path() -> Option<String> {
    MANAGER.as_ref().clap_matches.log_path.clone()
}

// Return the command line used to start this application
pub fn command_line_string() -> String {
    std::env::args().collect::<Vec<String>>().join(" ")
}
