#[cfg(test)]
mod test {
    use chrono::Utc;
    use serde_json::json;

    use crate::cache::snapshot::ConfigSnapshot;
    use crate::endpoints::config_metrics::render_prometheus;
    use crate::parser::coerce::{coerce, coerce_rows, ConfigValue};
    use crate::sources::fetch::RawRow;

    #[test]
    fn booleans_are_case_insensitive() {
        assert_eq!(coerce(Some("TRUE")), ConfigValue::Bool(true));
        assert_eq!(coerce(Some("true")), ConfigValue::Bool(true));
        assert_eq!(coerce(Some("tRuE")), ConfigValue::Bool(true));
        assert_eq!(coerce(Some("False")), ConfigValue::Bool(false));
    }

    #[test]
    fn null_is_lowercase_only() {
        assert_eq!(coerce(Some("null")), ConfigValue::Null);
        assert_eq!(coerce(Some("Null")), ConfigValue::String("Null".into()));
        assert_eq!(coerce(Some("NULL")), ConfigValue::String("NULL".into()));
    }

    #[test]
    fn integers_win_over_floats() {
        assert_eq!(coerce(Some("-42")), ConfigValue::Int(-42));
        assert_eq!(coerce(Some("0")), ConfigValue::Int(0));
        assert_eq!(coerce(Some("+5")), ConfigValue::Int(5));
        assert_eq!(coerce(Some("1")), ConfigValue::Int(1));
        assert_eq!(coerce(Some("2.75")), ConfigValue::Float(2.75));
        assert_eq!(coerce(Some("1e3")), ConfigValue::Float(1000.0));
        assert_eq!(coerce(Some(".5")), ConfigValue::Float(0.5));
    }

    #[test]
    fn integer_overflow_falls_through_to_float() {
        assert_eq!(
            coerce(Some("9223372036854775808")),
            ConfigValue::Float(9223372036854775808.0)
        );
        assert_eq!(coerce(Some("9223372036854775807")), ConfigValue::Int(i64::MAX));
    }

    #[test]
    fn non_finite_and_padded_numbers_stay_text() {
        assert_eq!(coerce(Some("inf")), ConfigValue::String("inf".into()));
        assert_eq!(coerce(Some("NaN")), ConfigValue::String("NaN".into()));
        assert_eq!(coerce(Some("1e999")), ConfigValue::String("1e999".into()));
        assert_eq!(coerce(Some(" 42")), ConfigValue::String(" 42".into()));
        assert_eq!(coerce(Some("0x10")), ConfigValue::String("0x10".into()));
    }

    #[test]
    fn empty_and_absent_cells_are_empty_strings() {
        assert_eq!(coerce(Some("")), ConfigValue::String(String::new()));
        assert_eq!(coerce(None), ConfigValue::String(String::new()));
    }

    #[test]
    fn text_is_kept_verbatim() {
        assert_eq!(coerce(Some("hello world")), ConfigValue::String("hello world".into()));
        assert_eq!(coerce(Some("truely")), ConfigValue::String("truely".into()));
    }

    #[test]
    fn rows_drop_empty_keys_and_keep_last_duplicate() {
        let rows = vec![
            RawRow::new("feature", Some("true")),
            RawRow::new("", Some("ignored")),
            RawRow::new("limit", Some("10")),
            RawRow::new("feature", Some("false")),
            RawRow::new("label", None),
        ];

        let values = coerce_rows(rows);

        assert_eq!(values.len(), 3);
        assert_eq!(values["feature"], ConfigValue::Bool(false));
        assert_eq!(values["limit"], ConfigValue::Int(10));
        assert_eq!(values["label"], ConfigValue::String(String::new()));
    }

    #[test]
    fn values_serialize_as_plain_json() {
        let rows = vec![
            RawRow::new("a", Some("TRUE")),
            RawRow::new("b", Some("-42")),
            RawRow::new("c", Some("2.75")),
            RawRow::new("d", Some("null")),
            RawRow::new("e", Some("Null")),
        ];

        let values = serde_json::to_value(coerce_rows(rows)).unwrap();

        assert_eq!(
            values,
            json!({"a": true, "b": -42, "c": 2.75, "d": null, "e": "Null"})
        );
    }

    #[test]
    fn prometheus_text_skips_strings_and_nulls() {
        let rows = vec![
            RawRow::new("enabled", Some("true")),
            RawRow::new("disabled", Some("FALSE")),
            RawRow::new("limit", Some("10")),
            RawRow::new("ratio", Some("0.5")),
            RawRow::new("name", Some("svc")),
            RawRow::new("nothing", Some("null")),
            RawRow::new("quo\"te", Some("1")),
        ];
        let snapshot = ConfigSnapshot::from_rows(rows, Utc::now());

        let text = render_prometheus(&snapshot);

        assert_eq!(
            text,
            "remote_config{key=\"disabled\"} 0\n\
             remote_config{key=\"enabled\"} 1\n\
             remote_config{key=\"limit\"} 10\n\
             remote_config{key=\"quo\\\"te\"} 1\n\
             remote_config{key=\"ratio\"} 0.5\n"
        );
    }
}
