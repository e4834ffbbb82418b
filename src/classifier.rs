//! Decides whether a query goes to search or to the worklog command, and whether a worklog is a multi-day autofill.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

static BROWSE_URL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)https?://[^ \n\t]+/browse/[A-Za-z][A-Za-z0-9]+-[0-9]+")
        .expect("invalid browse url regex")
});
static BROWSE_KEY_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)/browse/([A-Za-z][A-Za-z0-9]+-[0-9]+)").expect("invalid browse key regex")
});
static ISSUE_KEY_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?-u:\b)([A-Za-z][A-Za-z0-9]+)\s*-\s*([0-9]+)(?-u:\b)")
        .expect("invalid issue key regex")
});

/// Dash variants that show up when keys are copied out of the tracker UI or chat clients.
const HYPHEN_VARIANTS: [char; 5] = ['\u{2010}', '\u{2011}', '\u{2013}', '\u{2014}', '\u{2212}'];

const DEFAULT_WORKLOG_KEYWORDS: [&str; 8] = [
    "залог",
    "логир",
    "worklog",
    "спиш",
    "списыв",
    "списат",
    "time log",
    "log time",
];
const DEFAULT_AUTOFILL_KEYWORDS: [&str; 7] = [
    "каждый рабоч",
    "за каждый рабоч",
    "понедельник",
    "вторник",
    "среда",
    "четверг",
    "пятница",
];

/// Keyword sets driving intent detection. Matched as case-insensitive substrings.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(default)]
pub struct KeywordSets {
    pub worklog: Vec<String>,
    pub autofill: Vec<String>,
}

impl Default for KeywordSets {
    fn default() -> Self {
        Self {
            worklog: DEFAULT_WORKLOG_KEYWORDS.iter().map(|k| k.to_string()).collect(),
            autofill: DEFAULT_AUTOFILL_KEYWORDS.iter().map(|k| k.to_string()).collect(),
        }
    }
}

#[derive(Serialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum QueryKind {
    Search,
    WorklogSingle,
    WorklogAutofill,
}

impl QueryKind {
    pub fn is_worklog(self) -> bool {
        !matches!(self, QueryKind::Search)
    }
}

/// Outcome of classifying one query.
#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
pub struct Classification {
    pub kind: QueryKind,
    /// Canonical issue key or browse URL; present only for worklog queries.
    pub issue: Option<String>,
}

impl Classification {
    fn search() -> Self {
        Self {
            kind: QueryKind::Search,
            issue: None,
        }
    }

    pub fn labels(&self) -> ActionLabels {
        match self.kind {
            QueryKind::Search => ActionLabels {
                preview: "Preview JQL",
                run: "Search",
                search_options_enabled: true,
            },
            QueryKind::WorklogSingle => ActionLabels {
                preview: "Preview worklog",
                run: "Go (log time)",
                search_options_enabled: false,
            },
            QueryKind::WorklogAutofill => ActionLabels {
                preview: "Preview plan",
                run: "Go (create worklogs)",
                search_options_enabled: false,
            },
        }
    }
}

/// Describes what the preview and run actions will do for the current query.
#[derive(Serialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct ActionLabels {
    pub preview: &'static str,
    pub run: &'static str,
    /// Analysis and raw output only apply to searches.
    pub search_options_enabled: bool,
}

#[derive(Clone, Debug, Default)]
pub struct QueryClassifier {
    keywords: KeywordSets,
}

impl QueryClassifier {
    pub fn new(keywords: KeywordSets) -> Self {
        let lower = |items: Vec<String>| {
            items
                .into_iter()
                .map(|k| k.trim().to_lowercase())
                .filter(|k| !k.is_empty())
                .collect()
        };
        Self {
            keywords: KeywordSets {
                worklog: lower(keywords.worklog),
                autofill: lower(keywords.autofill),
            },
        }
    }

    pub fn keywords(&self) -> &KeywordSets {
        &self.keywords
    }

    /// An issue reference is a hard prerequisite; autofill is only ever checked on top of worklog intent.
    pub fn classify(&self, text: &str) -> Classification {
        let Some(issue) = extract_issue_reference(text) else {
            return Classification::search();
        };

        let lowered = text.to_lowercase();
        if !contains_any(&lowered, &self.keywords.worklog) {
            return Classification::search();
        }

        let kind = if contains_any(&lowered, &self.keywords.autofill) {
            QueryKind::WorklogAutofill
        } else {
            QueryKind::WorklogSingle
        };
        Classification {
            kind,
            issue: Some(issue),
        }
    }
}

fn contains_any(haystack: &str, needles: &[String]) -> bool {
    needles.iter().any(|needle| haystack.contains(needle.as_str()))
}

/// Replaces every recognized dash variant with an ASCII hyphen.
pub fn normalize_hyphens(text: &str) -> String {
    text.chars()
        .map(|ch| if HYPHEN_VARIANTS.contains(&ch) { '-' } else { ch })
        .collect()
}

/// Finds the first issue reference in `text`. A browse URL wins over a bare key; the URL is returned whole with only
/// the key segment uppercased, a bare key as `PREFIX-NUMBER` without surrounding whitespace.
pub fn extract_issue_reference(text: &str) -> Option<String> {
    if text.is_empty() {
        return None;
    }
    let normalized = normalize_hyphens(text);

    if let Some(found) = BROWSE_URL_REGEX.find(&normalized) {
        let url = found.as_str();
        let canonical = BROWSE_KEY_REGEX.replacen(url, 1, |caps: &regex::Captures| {
            format!("/browse/{}", caps[1].to_uppercase())
        });
        return Some(canonical.into_owned());
    }

    ISSUE_KEY_REGEX
        .captures(&normalized)
        .map(|caps| format!("{}-{}", caps[1].to_uppercase(), &caps[2]))
}
