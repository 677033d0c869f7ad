use toml::{value::Table, Value};

/// Read-only view over the `[settings]` table of the config file.
#[derive(Debug, Clone, Default)]
pub struct Settings {
    values: Table,
}

impl From<Table> for Settings {
    fn from(values: Table) -> Self {
        Self { values }
    }
}

impl Settings {
    pub fn has(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// Returns the setting as text. Missing settings are empty; numbers and
    /// booleans are formatted.
    pub fn get_string(&self, name: &str) -> String {
        match self.values.get(name) {
            Some(Value::String(s)) => s.clone(),
            Some(Value::Integer(i)) => i.to_string(),
            Some(Value::Float(f)) => f.to_string(),
            Some(Value::Boolean(b)) => b.to_string(),
            Some(other) => other.to_string(),
            None => String::new(),
        }
    }

    pub fn get_bool(&self, name: &str) -> bool {
        match self.values.get(name) {
            Some(Value::Boolean(b)) => *b,
            Some(Value::Integer(i)) => *i != 0,
            Some(Value::String(s)) => matches!(s.as_str(), "1" | "true"),
            _ => false,
        }
    }

    /// A string setting that is present and not empty.
    pub fn non_empty(&self, name: &str) -> Option<String> {
        if !self.has(name) {
            return None;
        }
        let value = self.get_string(name);
        if value.is_empty() {
            None
        } else {
            Some(value)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings() -> Settings {
        let table: Table = toml::from_str(
            r#"
            cookie_note = true
            disabled = false
            legacy_flag = 1
            legacy_text = "1"
            imprint = "https://example.org/imprint"
            empty = ""
            "#,
        )
        .unwrap();
        Settings::from(table)
    }

    #[test]
    fn reads_booleans() {
        let s = settings();
        assert!(s.get_bool("cookie_note"));
        assert!(!s.get_bool("disabled"));
        assert!(s.get_bool("legacy_flag"));
        assert!(s.get_bool("legacy_text"));
        assert!(!s.get_bool("missing"));
    }

    #[test]
    fn reads_strings() {
        let s = settings();
        assert!(s.has("empty"));
        assert!(!s.has("missing"));
        assert_eq!(s.get_string("imprint"), "https://example.org/imprint");
        assert_eq!(s.get_string("legacy_flag"), "1");
        assert_eq!(s.get_string("missing"), "");
        assert_eq!(s.non_empty("empty"), None);
        assert_eq!(
            s.non_empty("imprint").as_deref(),
            Some("https://example.org/imprint")
        );
    }
}
