use crate::cache::snapshot::ConfigSnapshot;
use crate::parser::coerce::ConfigValue;

static METRIC_NAME: &str = "remote_config";

/// Prometheus text lines for the numeric and boolean (1/0) values of a
/// snapshot. Strings and nulls have no sample and are skipped.
pub fn render_prometheus(snapshot: &ConfigSnapshot) -> String {
    let mut out = String::new();
    for (key, value) in &snapshot.values {
        let sample = match value {
            ConfigValue::Bool(true) => "1".to_owned(),
            ConfigValue::Bool(false) => "0".to_owned(),
            ConfigValue::Int(int) => int.to_string(),
            ConfigValue::Float(float) => float.to_string(),
            ConfigValue::Null | ConfigValue::String(_) => continue,
        };
        out.push_str(&format!("{}{{key=\"{}\"}} {}\n", METRIC_NAME, escape_label_value(key), sample));
    }
    out
}

fn escape_label_value(value: &str) -> String {
    value
        .replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', "\\n")
}
