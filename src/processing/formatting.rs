//! Formatting patterns that trip up applicant tracking systems

use serde::{Deserialize, Serialize};
use std::fmt;

const SPECIAL_CHARACTERS: &[char] = &['#', '~', '|'];

/// Detected formatting problems, in detection order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum FormattingIssue {
    TabCharacters,
    MultipleSpaces,
    SpecialCharacters,
    ExcessiveBlankLines,
}

impl FormattingIssue {
    pub const ALL: [FormattingIssue; 4] = [
        FormattingIssue::TabCharacters,
        FormattingIssue::MultipleSpaces,
        FormattingIssue::SpecialCharacters,
        FormattingIssue::ExcessiveBlankLines,
    ];

    pub fn message(&self) -> &'static str {
        match self {
            FormattingIssue::TabCharacters => "Avoid using tabs - use spaces instead",
            FormattingIssue::MultipleSpaces => "Multiple spaces detected - use single spaces",
            FormattingIssue::SpecialCharacters => "Avoid special characters that might confuse ATS",
            FormattingIssue::ExcessiveBlankLines => "Too many blank lines between sections",
        }
    }

    fn is_present(&self, text: &str) -> bool {
        match self {
            FormattingIssue::TabCharacters => text.contains('\t'),
            FormattingIssue::MultipleSpaces => text.contains("  "),
            FormattingIssue::SpecialCharacters => text.contains(SPECIAL_CHARACTERS),
            FormattingIssue::ExcessiveBlankLines => text.contains("\n\n\n"),
        }
    }
}

impl fmt::Display for FormattingIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

impl From<FormattingIssue> for String {
    fn from(issue: FormattingIssue) -> Self {
        issue.message().to_string()
    }
}

impl TryFrom<String> for FormattingIssue {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        FormattingIssue::ALL
            .into_iter()
            .find(|issue| issue.message() == value)
            .ok_or_else(|| format!("Unknown formatting issue: {}", value))
    }
}

/// Every rule is checked independently
pub fn check_formatting_issues(text: &str) -> Vec<FormattingIssue> {
    FormattingIssue::ALL
        .into_iter()
        .filter(|issue| issue.is_present(text))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_individual_rules() {
        assert_eq!(check_formatting_issues("a\tb"), vec![FormattingIssue::TabCharacters]);
        assert_eq!(check_formatting_issues("a  b"), vec![FormattingIssue::MultipleSpaces]);
        assert_eq!(check_formatting_issues("C# | Rust"), vec![FormattingIssue::SpecialCharacters]);
        assert_eq!(
            check_formatting_issues("Summary\n\n\nExperience"),
            vec![FormattingIssue::ExcessiveBlankLines]
        );
    }

    #[test]
    fn test_clean_text() {
        assert!(check_formatting_issues("clean text").is_empty());
        assert!(check_formatting_issues("").is_empty());
        assert!(check_formatting_issues("one\n\ntwo").is_empty());
    }

    #[test]
    fn test_all_issues_reported_in_rule_order() {
        let issues = check_formatting_issues("~ header\t\n\n\nbody  text");
        assert_eq!(issues, FormattingIssue::ALL.to_vec());
    }

    #[test]
    fn test_serializes_as_message() {
        let json = serde_json::to_string(&FormattingIssue::TabCharacters).unwrap();
        assert_eq!(json, "\"Avoid using tabs - use spaces instead\"");

        let parsed: FormattingIssue = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, FormattingIssue::TabCharacters);
        assert!(serde_json::from_str::<FormattingIssue>("\"nope\"").is_err());
    }
}
