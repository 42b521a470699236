//! Definitions computed from other configuration values.
//!
//! A template such as `${ZM_PATH_BIN}/zmu` is expanded against the loaded
//! registry after every other layer has been applied.

use super::registry::Registry;
use regex_lite::Regex;
use std::sync::LazyLock;

static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{([^}\s]+)\}").expect("placeholder pattern is valid"));

/// Expand every `${NAME}` in `template`.
///
/// Returns `Err` with the first unresolved name.
pub fn expand(template: &str, registry: &Registry) -> Result<String, String> {
    let mut out = String::with_capacity(template.len());
    let mut last = 0;
    for caps in PLACEHOLDER.captures_iter(template) {
        let (Some(whole), Some(name)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        let value = registry
            .value(name.as_str())
            .ok_or_else(|| name.as_str().to_string())?;
        out.push_str(&template[last..whole.start()]);
        out.push_str(value);
        last = whole.end();
    }
    out.push_str(&template[last..]);
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ConfigRecord;

    fn registry() -> Registry {
        let mut registry = Registry::new();
        registry.insert(ConfigRecord::from_file("ZM_PATH_BIN", "/usr/bin"));
        registry.insert(ConfigRecord::from_file("ZM_PATH_WEB", "/var/www/zm"));
        registry
    }

    #[test]
    fn test_expand_single_placeholder() {
        assert_eq!(
            expand("${ZM_PATH_BIN}/zmu", &registry()).unwrap(),
            "/usr/bin/zmu"
        );
    }

    #[test]
    fn test_expand_multiple_placeholders() {
        assert_eq!(
            expand("${ZM_PATH_WEB}:${ZM_PATH_BIN}", &registry()).unwrap(),
            "/var/www/zm:/usr/bin"
        );
    }

    #[test]
    fn test_expand_reports_missing_name() {
        assert_eq!(
            expand("${ZM_PATH_CGI}/nph-zms", &registry()).unwrap_err(),
            "ZM_PATH_CGI"
        );
    }

    #[test]
    fn test_literal_template_unchanged() {
        assert_eq!(expand("1", &registry()).unwrap(), "1");
    }
}
