//! Output formatting for records and category views.

use crate::types::ConfigRecord;
use serde::Serialize;

/// Output format for command results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            _ => Err(format!("Invalid format '{}'. Valid options: text, json", s)),
        }
    }
}

/// Format records as aligned `NAME = value` lines.
///
/// Categorized records get a trailing `[category]` tag.
pub fn format_records_text<'a>(records: impl IntoIterator<Item = &'a ConfigRecord>) -> String {
    let records: Vec<&ConfigRecord> = records.into_iter().collect();
    let width = records.iter().map(|r| r.name.len()).max().unwrap_or(0);
    let mut out = String::new();
    for record in records {
        out.push_str(&format!("{:<width$} = {}", record.name, record.value, width = width));
        if !record.category.is_empty() {
            out.push_str(&format!("  [{}]", record.category));
        }
        out.push('\n');
    }
    out
}

/// Pretty JSON for any serializable value.
pub fn to_json<T: Serialize + ?Sized>(value: &T) -> serde_json::Result<String> {
    serde_json::to_string_pretty(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_format() {
        assert_eq!("json".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert_eq!("TEXT".parse::<OutputFormat>().unwrap(), OutputFormat::Text);
        assert!("yaml".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn test_text_alignment_and_category_tag() {
        let records = vec![
            ConfigRecord::from_file("A", "1"),
            ConfigRecord::from_store(1, "LONGER", "two words", "system"),
        ];
        let text = format_records_text(&records);
        assert_eq!(text, "A      = 1\nLONGER = two words  [system]\n");
    }
}
