// * INI-style configuration reader for the pipeline settings file.
// * Format: `[SECTION]` headers, `KEY = value` pairs, full-line `#`/`;`
// * comments, and indented continuation lines for multi-line list values.

use crate::config::error::ConfigError;
use std::collections::HashMap;

// * Section every recognized key lives under.
pub const DEFAULT_SECTION: &str = "DEFAULT";

/// A single `KEY = value` entry, with its source line for diagnostics.
#[derive(Debug, Clone)]
pub struct IniEntry {
    pub key: String,
    pub value: String,
    pub line: usize,
}

impl IniEntry {
    /// Returns the value split into its non-blank continuation lines.
    pub fn value_lines(&self) -> impl Iterator<Item = &str> {
        self.value
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
    }

    /// True when the value is blank, meaning "unset, use the default".
    pub fn is_blank(&self) -> bool {
        self.value.trim().is_empty()
    }
}

/// One `[name]` section with entries in file order.
#[derive(Debug, Clone)]
pub struct IniSection {
    pub name: String,
    entries: Vec<IniEntry>,
    // * Normalized key -> index into entries
    index: HashMap<String, usize>,
}

impl IniSection {
    fn new(name: String) -> Self {
        Self {
            name,
            entries: Vec::new(),
            index: HashMap::new(),
        }
    }

    fn insert(&mut self, entry: IniEntry) -> Result<(), ConfigError> {
        let normalized = normalize_key(&entry.key);
        if self.index.contains_key(&normalized) {
            return Err(ConfigError::DuplicateKey {
                key: entry.key,
                line: entry.line,
            });
        }
        self.index.insert(normalized, self.entries.len());
        self.entries.push(entry);
        Ok(())
    }

    /// Case-insensitive key lookup.
    pub fn get(&self, key: &str) -> Option<&IniEntry> {
        self.index
            .get(&normalize_key(key))
            .map(|&idx| &self.entries[idx])
    }

    pub fn entries(&self) -> &[IniEntry] {
        &self.entries
    }
}

/// Parsed configuration document.
#[derive(Debug, Clone)]
pub struct IniDocument {
    sections: Vec<IniSection>,
}

impl IniDocument {
    /// Parses the document, rejecting duplicate keys and malformed lines.
    pub fn parse(input: &str) -> Result<Self, ConfigError> {
        let mut sections: Vec<IniSection> = Vec::new();
        // * Key currently accepting continuation lines, if any
        let mut open_entry: Option<IniEntry> = None;

        for (idx, raw_line) in input.lines().enumerate() {
            let line_no = idx + 1;
            let trimmed = raw_line.trim();

            if trimmed.is_empty() {
                // * Blank lines are tolerated inside multi-line values
                continue;
            }

            let indented = raw_line.starts_with(|c: char| c == ' ' || c == '\t');

            // * Continuation line: indented content following an open entry
            if indented {
                match open_entry.as_mut() {
                    Some(entry) => {
                        if !entry.value.is_empty() {
                            entry.value.push('\n');
                        }
                        entry.value.push_str(trimmed);
                        continue;
                    }
                    None => {
                        return Err(ConfigError::Syntax {
                            line: line_no,
                            reason: "continuation line without a preceding key".into(),
                        });
                    }
                }
            }

            // * Any unindented line closes the entry under construction
            if let Some(entry) = open_entry.take() {
                Self::push_entry(&mut sections, entry)?;
            }

            if trimmed.starts_with('#') || trimmed.starts_with(';') {
                continue;
            }

            if let Some(rest) = trimmed.strip_prefix('[') {
                let name = rest.strip_suffix(']').ok_or(ConfigError::Syntax {
                    line: line_no,
                    reason: "unterminated section header".into(),
                })?;
                sections.push(IniSection::new(name.trim().to_string()));
                continue;
            }

            match trimmed.split_once('=') {
                Some((key, value)) => {
                    let key = key.trim();
                    if key.is_empty() {
                        return Err(ConfigError::Syntax {
                            line: line_no,
                            reason: "missing key before '='".into(),
                        });
                    }
                    open_entry = Some(IniEntry {
                        key: key.to_string(),
                        value: value.trim().to_string(),
                        line: line_no,
                    });
                }
                None => {
                    return Err(ConfigError::Syntax {
                        line: line_no,
                        reason: format!("expected 'KEY = value', got: {trimmed}"),
                    });
                }
            }
        }

        if let Some(entry) = open_entry.take() {
            Self::push_entry(&mut sections, entry)?;
        }

        Ok(Self { sections })
    }

    fn push_entry(sections: &mut [IniSection], entry: IniEntry) -> Result<(), ConfigError> {
        match sections.last_mut() {
            Some(section) => section.insert(entry),
            None => Err(ConfigError::Syntax {
                line: entry.line,
                reason: format!("key '{}' appears before any [section] header", entry.key),
            }),
        }
    }

    /// Case-insensitive section lookup.
    pub fn section(&self, name: &str) -> Option<&IniSection> {
        self.sections
            .iter()
            .find(|s| s.name.eq_ignore_ascii_case(name))
    }

    /// The `[DEFAULT]` section, where every recognized key lives.
    pub fn default_section(&self) -> Result<&IniSection, ConfigError> {
        self.section(DEFAULT_SECTION)
            .ok_or_else(|| ConfigError::MissingSection(DEFAULT_SECTION.into()))
    }
}

fn normalize_key(key: &str) -> String {
    key.to_ascii_uppercase()
}

/// Strips one pair of surrounding double quotes, if present.
pub fn unquote(value: &str) -> &str {
    let value = value.trim();
    value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .unwrap_or(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_pairs() {
        let doc = IniDocument::parse("[DEFAULT]\nDOWNLOAD_TIMEOUT = 30\nCOOKIE =\n").unwrap();
        let section = doc.default_section().unwrap();
        assert_eq!(section.get("DOWNLOAD_TIMEOUT").unwrap().value, "30");
        assert!(section.get("COOKIE").unwrap().is_blank());
    }

    #[test]
    fn test_key_lookup_is_case_insensitive() {
        let doc = IniDocument::parse("[DEFAULT]\nMax_Redirects = 2\n").unwrap();
        let section = doc.default_section().unwrap();
        assert_eq!(section.get("MAX_REDIRECTS").unwrap().value, "2");
        assert_eq!(section.get("max_redirects").unwrap().value, "2");
    }

    #[test]
    fn test_multiline_value_with_blank_lines() {
        let input = "[DEFAULT]\nUSER_AGENTS =\n    \"agent one\"\n\n    \"agent two\"\nCOOKIE =\n";
        let doc = IniDocument::parse(input).unwrap();
        let section = doc.default_section().unwrap();
        let agents: Vec<&str> = section.get("USER_AGENTS").unwrap().value_lines().collect();
        assert_eq!(agents, vec!["\"agent one\"", "\"agent two\""]);
        // * The unindented COOKIE line closed the list
        assert!(section.get("COOKIE").unwrap().is_blank());
    }

    #[test]
    fn test_duplicate_key_rejected() {
        let err = IniDocument::parse("[DEFAULT]\nSLEEP_TIME = 1\nsleep_time = 2\n").unwrap_err();
        assert!(matches!(err, ConfigError::DuplicateKey { line: 3, .. }));
    }

    #[test]
    fn test_entry_before_section_rejected() {
        let err = IniDocument::parse("SLEEP_TIME = 1\n").unwrap_err();
        assert!(matches!(err, ConfigError::Syntax { line: 1, .. }));
    }

    #[test]
    fn test_continuation_without_key_rejected() {
        let err = IniDocument::parse("[DEFAULT]\n    \"orphan\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::Syntax { line: 2, .. }));
    }

    #[test]
    fn test_unterminated_section_header_rejected() {
        let err = IniDocument::parse("[DEFAULT\n").unwrap_err();
        assert!(matches!(err, ConfigError::Syntax { line: 1, .. }));
    }

    #[test]
    fn test_garbage_line_rejected() {
        let err = IniDocument::parse("[DEFAULT]\nnot a pair\n").unwrap_err();
        assert!(matches!(err, ConfigError::Syntax { line: 2, .. }));
    }

    #[test]
    fn test_comment_lines_skipped() {
        let doc = IniDocument::parse("# header\n[DEFAULT]\n; note\nMAX_REDIRECTS = 2\n").unwrap();
        assert_eq!(doc.default_section().unwrap().entries().len(), 1);
    }

    #[test]
    fn test_unquote() {
        assert_eq!(unquote("\"Mozilla/5.0\""), "Mozilla/5.0");
        assert_eq!(unquote("bare"), "bare");
        assert_eq!(unquote("\"unbalanced"), "\"unbalanced");
    }
}
