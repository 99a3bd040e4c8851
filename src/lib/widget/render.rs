use askama::Template;
use tracing::*;

use super::DisplayConfig;
use crate::beszel::types::SystemRecord;

pub const STATUS_UP_COLOR: &str = "#22c55e";
pub const STATUS_DOWN_COLOR: &str = "#ef4444";
pub const NO_SYSTEMS_MESSAGE: &str = "No systems found";

const SECONDS_PER_DAY: f64 = 86_400.0;
const SECONDS_PER_HOUR: f64 = 3_600.0;

struct Row {
    label: &'static str,
    value: String,
}

struct Gauge {
    icon: &'static str,
    label: &'static str,
    value: String,
    width: String,
    color_from: &'static str,
    color_to: &'static str,
}

impl Gauge {
    fn new(
        icon: &'static str,
        label: &'static str,
        percent: f64,
        (color_from, color_to): (&'static str, &'static str),
    ) -> Self {
        Self {
            icon,
            label,
            value: format!("{percent:.1}"),
            width: format!("{:.1}", percent.clamp(0.0, 100.0)),
            color_from,
            color_to,
        }
    }
}

struct Card {
    name: String,
    status_color: &'static str,
    href: Option<String>,
    host: Option<String>,
    rows: Vec<Row>,
    gauges: [Gauge; 3],
}

impl Card {
    fn new(record: &SystemRecord, config: &DisplayConfig) -> Self {
        let mut rows = Vec::with_capacity(3);
        if !config.hide_kernel {
            rows.push(Row {
                label: "Kernel",
                value: record.kernel.clone(),
            });
        }
        if !config.hide_uptime {
            rows.push(Row {
                label: "Uptime",
                value: format_uptime(record.uptime_seconds),
            });
        }
        if !config.hide_cpu_info {
            rows.push(Row {
                label: "CPU",
                value: record.cpu_model.clone(),
            });
        }

        Self {
            name: record.name.clone(),
            status_color: if record.is_up() {
                STATUS_UP_COLOR
            } else {
                STATUS_DOWN_COLOR
            },
            href: config
                .redirect_url
                .as_ref()
                .map(|base| format!("{base}/system/{}", record.name)),
            host: (!config.hide_ip && !record.host.is_empty()).then(|| record.host.clone()),
            rows,
            gauges: [
                Gauge::new("📊", "CPU", record.cpu_percent, ("#3b82f6", "#60a5fa")),
                Gauge::new("🧠", "Memory", record.mem_percent, ("#8b5cf6", "#a78bfa")),
                Gauge::new("💾", "Disk", record.disk_percent, ("#10b981", "#34d399")),
            ],
        }
    }
}

#[derive(Template)]
#[template(path = "widget.html")]
struct WidgetTemplate<'a> {
    cards: Vec<Card>,
    open_in_new_tab: bool,
    refresh_url: &'a str,
    reload_interval_ms: u64,
}

#[derive(Template)]
#[template(path = "empty.html")]
struct EmptyTemplate<'a> {
    message: &'a str,
}

#[derive(Template)]
#[template(path = "error.html")]
struct ErrorTemplate<'a> {
    message: &'a str,
}

/// Days with one decimal from a day on, hours below that.
pub fn format_uptime(seconds: f64) -> String {
    if seconds >= SECONDS_PER_DAY {
        format!("{:.1}d", seconds / SECONDS_PER_DAY)
    } else {
        format!("{:.1}h", seconds / SECONDS_PER_HOUR)
    }
}

/// Renders one card per record, in the given order, followed by the refresh script.
/// `refresh_url` is what the script polls to replace the cards.
#[instrument(level = "debug", skip(records, config))]
pub fn render(
    records: &[SystemRecord],
    config: &DisplayConfig,
    refresh_url: &str,
) -> Result<String, askama::Error> {
    if records.is_empty() {
        return render_empty();
    }

    WidgetTemplate {
        cards: records
            .iter()
            .map(|record| Card::new(record, config))
            .collect(),
        open_in_new_tab: config.open_in_new_tab,
        refresh_url,
        reload_interval_ms: config.reload_interval.saturating_mul(1000),
    }
    .render()
}

pub fn render_empty() -> Result<String, askama::Error> {
    EmptyTemplate {
        message: NO_SYSTEMS_MESSAGE,
    }
    .render()
}

pub fn render_error(message: &str) -> String {
    ErrorTemplate { message }.render().unwrap_or_else(|error| {
        warn!("Failed to render error fragment: {error}");
        message.to_string()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const REFRESH_URL: &str = "http://proxy.lan:8091/widget-html";

    fn sample_record() -> SystemRecord {
        SystemRecord {
            name: "alpha".into(),
            status: "up".into(),
            host: "192.168.1.10".into(),
            cpu_percent: 12.34,
            mem_percent: 56.78,
            disk_percent: 90.12,
            kernel: "6.8.0-45-generic".into(),
            uptime_seconds: 90000.0,
            cpu_model: "Intel(R) Core(TM) i5-8500 @ 3.00GHz".into(),
        }
    }

    fn config() -> DisplayConfig {
        DisplayConfig {
            redirect_url: Some("http://hub.lan:8090".into()),
            reload_interval: 3,
            ..Default::default()
        }
    }

    #[test]
    fn uptime_formatting() {
        assert_eq!(format_uptime(90000.0), "1.0d");
        assert_eq!(format_uptime(86400.0), "1.0d");
        assert_eq!(format_uptime(86399.0), "24.0h");
        assert_eq!(format_uptime(3600.0), "1.0h");
        assert_eq!(format_uptime(5400.0), "1.5h");
        assert_eq!(format_uptime(0.0), "0.0h");
        assert_eq!(format_uptime(1_296_000.0), "15.0d");
    }

    #[test]
    fn empty_listing_renders_only_the_placeholder() {
        let html = render(&[], &config(), REFRESH_URL).unwrap();

        assert!(html.contains(NO_SYSTEMS_MESSAGE));
        assert!(!html.contains("beszel-card"));
        assert!(!html.contains("<script>"));
    }

    #[test]
    fn card_shows_every_field_by_default() {
        let html = render(&[sample_record()], &config(), REFRESH_URL).unwrap();

        assert_eq!(html.matches("class=\"beszel-card\"").count(), 1);
        assert!(html.contains(STATUS_UP_COLOR));
        assert!(html.contains(">alpha</a>"));
        assert!(html.contains("192.168.1.10"));
        assert!(html.contains("6.8.0-45-generic"));
        assert!(html.contains("1.0d"));
        assert!(html.contains("Intel(R) Core(TM) i5-8500 @ 3.00GHz"));
        assert!(html.contains("12.3%"));
        assert!(html.contains("56.8%"));
        assert!(html.contains("90.1%"));
        assert!(html.contains("data-reload-interval=\"3000\""));
        assert!(html.contains("id=\"beszel-widget\""));
        assert!(html.contains("<script>"));
        assert!(!html.contains("target=\"_blank\""));
    }

    #[test]
    fn each_toggle_hides_only_its_field() {
        let record = sample_record();
        let fields = [
            ("host", "192.168.1.10"),
            ("kernel", "6.8.0-45-generic"),
            ("uptime", "1.0d"),
            ("cpu", "Intel(R) Core(TM) i5-8500 @ 3.00GHz"),
        ];

        for (hidden, _) in fields {
            let mut config = config();
            match hidden {
                "host" => config.hide_ip = true,
                "kernel" => config.hide_kernel = true,
                "uptime" => config.hide_uptime = true,
                "cpu" => config.hide_cpu_info = true,
                _ => unreachable!(),
            }

            let html = render(std::slice::from_ref(&record), &config, REFRESH_URL).unwrap();
            for (field, value) in fields {
                assert_eq!(
                    html.contains(value),
                    field != hidden,
                    "field {field:?} with {hidden:?} hidden"
                );
            }
            // Gauges are never hidden
            assert_eq!(html.matches("class=\"beszel-gauge\"").count(), 3);
        }
    }

    #[test]
    fn empty_host_is_not_rendered() {
        let record = SystemRecord {
            host: String::new(),
            ..sample_record()
        };
        let html = render(&[record], &config(), REFRESH_URL).unwrap();

        assert!(!html.contains("margin: 0 0 1rem 0"));
    }

    #[test]
    fn name_links_follow_the_redirect_configuration() {
        let record = sample_record();

        let mut config = config();
        config.open_in_new_tab = true;
        let html = render(std::slice::from_ref(&record), &config, REFRESH_URL).unwrap();
        assert!(html.contains("system"));
        assert!(html.contains("<a href="));
        assert!(html.contains("target=\"_blank\" rel=\"noopener\""));

        config.redirect_url = None;
        let html = render(std::slice::from_ref(&record), &config, REFRESH_URL).unwrap();
        assert!(!html.contains("<a href="));
        assert!(!html.contains("target=\"_blank\""));
        assert!(html.contains(">alpha</span>"));
    }

    #[test]
    fn status_and_gauges() {
        let record = SystemRecord {
            status: "down".into(),
            cpu_percent: 150.0,
            mem_percent: -5.0,
            ..sample_record()
        };
        let html = render(&[record], &config(), REFRESH_URL).unwrap();

        assert!(html.contains(STATUS_DOWN_COLOR));
        assert!(!html.contains(STATUS_UP_COLOR));
        assert!(html.contains("150.0%"));
        assert!(html.contains("width: 100.0%"));
        assert!(html.contains("-5.0%"));
        assert!(html.contains("width: 0.0%"));
    }

    #[test]
    fn cards_keep_upstream_order() {
        let records: Vec<SystemRecord> = ["zeta", "alpha", "mid"]
            .into_iter()
            .map(|name| SystemRecord {
                name: name.into(),
                ..sample_record()
            })
            .collect();
        let html = render(&records, &config(), REFRESH_URL).unwrap();

        let zeta = html.find(">zeta<").unwrap();
        let alpha = html.find(">alpha<").unwrap();
        let mid = html.find(">mid<").unwrap();
        assert!(zeta < alpha && alpha < mid);
    }

    #[test]
    fn values_are_escaped() {
        let record = SystemRecord {
            name: "<script>alert(1)</script>".into(),
            kernel: "\"quoted\"".into(),
            ..sample_record()
        };
        let html = render(&[record], &config(), REFRESH_URL).unwrap();

        assert!(!html.contains("<script>alert(1)"));
        assert!(html.contains("&#60;script&#62;alert(1)"));
        assert!(!html.contains("\"quoted\""));
        assert!(html.contains("&#34;quoted&#34;"));
    }

    #[test]
    fn error_fragment_carries_the_message() {
        let html = render_error("Failed to fetch systems data");

        assert!(html.contains("Failed to fetch systems data"));
        assert!(html.contains("#ef4444"));
    }
}
