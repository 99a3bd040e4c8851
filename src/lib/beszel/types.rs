use serde_json::Value;

pub const STATUS_UP: &str = "up";

/// Latest metrics snapshot of one monitored host, as listed by the hub.
#[derive(Clone, Debug, PartialEq)]
pub struct SystemRecord {
    pub name: String,
    pub status: String,
    pub host: String,
    pub cpu_percent: f64,
    pub mem_percent: f64,
    pub disk_percent: f64,
    pub kernel: String,
    pub uptime_seconds: f64,
    pub cpu_model: String,
}

impl Default for SystemRecord {
    fn default() -> Self {
        Self {
            name: "Unknown".to_string(),
            status: "unknown".to_string(),
            host: String::new(),
            cpu_percent: 0.0,
            mem_percent: 0.0,
            disk_percent: 0.0,
            kernel: "N/A".to_string(),
            uptime_seconds: 0.0,
            cpu_model: "N/A".to_string(),
        }
    }
}

impl SystemRecord {
    /// Reads one item of the records listing. Missing or ill-typed fields fall back to their defaults.
    pub fn from_item(item: &Value) -> Self {
        let defaults = Self::default();
        let info = item.get("info");

        let text = |value: Option<&Value>, default: String| -> String {
            value
                .and_then(Value::as_str)
                .map(str::to_string)
                .unwrap_or(default)
        };
        let number = |key: &str| -> f64 {
            info.and_then(|info| info.get(key))
                .and_then(Value::as_f64)
                .unwrap_or(0.0)
        };

        Self {
            name: text(item.get("name"), defaults.name),
            status: text(item.get("status"), defaults.status),
            host: text(item.get("host"), defaults.host),
            cpu_percent: number("cpu"),
            mem_percent: number("mp"),
            disk_percent: number("dp"),
            kernel: text(info.and_then(|info| info.get("k")), defaults.kernel),
            uptime_seconds: number("u"),
            cpu_model: text(info.and_then(|info| info.get("m")), defaults.cpu_model)
                .replace("CPU ", ""),
        }
    }

    /// Records of a `{"items": [...]}` listing, in upstream order.
    pub fn list_from_payload(payload: &Value) -> Vec<Self> {
        payload
            .get("items")
            .and_then(Value::as_array)
            .map(|items| items.iter().map(Self::from_item).collect())
            .unwrap_or_default()
    }

    pub fn is_up(&self) -> bool {
        self.status == STATUS_UP
    }
}
