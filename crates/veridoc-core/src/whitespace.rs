//! # Whitespace Auditor
//!
//! Byte-level hygiene scan: tabs in structural indentation are errors,
//! trailing whitespace is a warning. Runs on the raw bytes, before and
//! independently of any parse.

use serde::{Deserialize, Serialize};

/// Result of a whitespace audit.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct WhitespaceReport {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub messages: Vec<String>,
}

const TAB_EXPLANATION: &str = "Tab issues found in document. Note: Tab characters are not allowed for indentation in either JSON or YAML. They are only valid within string values, not for structuring or formatting the document.";

/// Scan the input for tab and trailing-whitespace issues.
///
/// Lines are 1-indexed. A tab in the leading indentation run is an error
/// (at most one per line, scanning stops at the first non-indentation
/// character); a non-empty line ending in a space or tab is a warning.
pub fn audit(bytes: &[u8]) -> WhitespaceReport {
    let text = String::from_utf8_lossy(bytes);
    let mut report = WhitespaceReport::default();

    for (idx, line) in text.split('\n').enumerate() {
        for ch in line.chars() {
            if ch == '\t' {
                report
                    .errors
                    .push(format!("Line {}: Tab character found.", idx + 1));
                break;
            } else if ch != ' ' {
                break;
            }
        }
        if !line.is_empty() && (line.ends_with(' ') || line.ends_with('\t')) {
            report
                .warnings
                .push(format!("Line {}: Trailing whitespace found.", idx + 1));
        }
    }

    if !report.errors.is_empty() {
        report.messages.push(TAB_EXPLANATION.to_string());
    } else if !report.warnings.is_empty() {
        report
            .messages
            .push("Whitespace issues found in document.".to_string());
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Case {
        name: &'static str,
        input: &'static str,
        has_error: bool,
        has_warning: bool,
    }

    #[test]
    fn audit_table() {
        let cases = [
            Case {
                name: "no issues",
                input: "key: value\nanother: line\n",
                has_error: false,
                has_warning: false,
            },
            Case {
                name: "tab present",
                input: "\tkey: value\nanother: line\n",
                has_error: true,
                has_warning: false,
            },
            Case {
                name: "trailing whitespace",
                input: "key: value \nanother: line\t\n",
                has_error: false,
                has_warning: true,
            },
            Case {
                name: "tab and trailing whitespace",
                input: "\tkey: value \nanother: line\t\n",
                has_error: true,
                has_warning: true,
            },
        ];

        for case in cases {
            let report = audit(case.input.as_bytes());
            assert_eq!(
                !report.errors.is_empty(),
                case.has_error,
                "{}: errors {:?}",
                case.name,
                report.errors
            );
            assert_eq!(
                !report.warnings.is_empty(),
                case.has_warning,
                "{}: warnings {:?}",
                case.name,
                report.warnings
            );
        }
    }

    #[test]
    fn reports_line_numbers_and_single_error_per_line() {
        let report = audit(b"a: 1\n\t\tb: 2\nc: 3\t");
        assert_eq!(report.errors, vec!["Line 2: Tab character found."]);
        assert_eq!(report.warnings, vec!["Line 3: Trailing whitespace found."]);
        assert_eq!(report.messages.len(), 1);
        assert!(report.messages[0].starts_with("Tab issues found in document."));
    }

    #[test]
    fn tab_after_content_is_not_an_indentation_error() {
        // The scan stops at the first non-indentation character.
        let report = audit(b"key:\tvalue\n");
        assert!(report.errors.is_empty());
    }

    #[test]
    fn issue_lines_never_exceed_line_count() {
        let input = b"\ta \n\tb \n";
        let report = audit(input);
        let lines = input.split(|b| *b == b'\n').count();
        assert!(report.errors.len() <= lines);
        assert!(report.warnings.len() <= lines);
    }

    #[test]
    fn clean_document_appends_no_messages() {
        let report = audit(b"key: value\n");
        assert!(report.messages.is_empty());
    }
}
