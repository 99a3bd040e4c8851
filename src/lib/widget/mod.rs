pub mod render;

pub use render::{format_uptime, render, render_empty, render_error};

/// How system cards are displayed, fixed for the lifetime of the process.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DisplayConfig {
    pub hide_kernel: bool,
    pub hide_uptime: bool,
    pub hide_cpu_info: bool,
    pub hide_ip: bool,
    pub open_in_new_tab: bool,
    /// Cards link to `{redirect_url}/system/{name}` when set
    pub redirect_url: Option<String>,
    /// Seconds between client side refreshes
    pub reload_interval: u64,
}
