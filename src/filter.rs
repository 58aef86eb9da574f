//! Predicate tree over articles, mirroring `pan/usenet-utils/filter-info.h`.

/// How a text predicate compares its header value against `text`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchKind {
    Contains,
    Is,
    BeginsWith,
    EndsWith,
    Regex,
}

/// Headers with known semantics independent of the article body. Anything
/// else requires the cached body to evaluate and sets `needs_body`.
const KNOWN_HEADERLESS_OF_BODY: &[&str] = &[
    "Subject",
    "From",
    "Message-ID",
    "Newsgroups",
    "References",
    "Xref",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextMatch {
    pub kind: MatchKind,
    pub case_sensitive: bool,
    pub negate: bool,
    pub text: String,
}

impl TextMatch {
    pub fn new(kind: MatchKind, case_sensitive: bool, negate: bool, text: impl Into<String>) -> Self {
        TextMatch {
            kind,
            case_sensitive,
            negate,
            text: text.into(),
        }
    }

    /// Evaluate against `haystack`, honoring `case_sensitive` and `negate`.
    /// `Regex` patterns that fail to compile never match (rather than
    /// panicking) — an invalid user-supplied pattern is a parse-time
    /// concern, not a match-time one.
    pub fn matches(&self, haystack: &str) -> bool {
        let result = match self.kind {
            MatchKind::Is => {
                if self.case_sensitive {
                    haystack == self.text
                } else {
                    haystack.eq_ignore_ascii_case(&self.text)
                }
            }
            MatchKind::Contains => self.contains(haystack),
            MatchKind::BeginsWith => {
                if self.case_sensitive {
                    haystack.starts_with(self.text.as_str())
                } else {
                    haystack.len() >= self.text.len()
                        && haystack[..self.text.len()].eq_ignore_ascii_case(&self.text)
                }
            }
            MatchKind::EndsWith => {
                if self.case_sensitive {
                    haystack.ends_with(self.text.as_str())
                } else {
                    haystack.len() >= self.text.len()
                        && haystack[haystack.len() - self.text.len()..]
                            .eq_ignore_ascii_case(&self.text)
                }
            }
            MatchKind::Regex => self.regex_matches(haystack),
        };
        result != self.negate
    }

    fn contains(&self, haystack: &str) -> bool {
        if self.case_sensitive {
            haystack.contains(self.text.as_str())
        } else {
            haystack.to_lowercase().contains(&self.text.to_lowercase())
        }
    }

    fn regex_matches(&self, haystack: &str) -> bool {
        let pattern = if self.case_sensitive {
            self.text.clone()
        } else {
            format!("(?i){}", self.text)
        };
        regex::Regex::new(&pattern)
            .map(|re| re.is_match(haystack))
            .unwrap_or(false)
    }
}

/// A predicate tree node over an article.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterInfo {
    AggregateAnd {
        children: Vec<FilterInfo>,
        negate: bool,
    },
    AggregateOr {
        children: Vec<FilterInfo>,
        negate: bool,
    },
    IsBinary,
    IsCached,
    IsPostedByMe,
    IsRead,
    IsUnread,
    ByteCountGe(u64),
    LineCountGe(u32),
    CrosspostCountGe(u32),
    DaysOldGe(u32),
    ScoreGe(i32),
    Text {
        header: String,
        text_match: TextMatch,
    },
}

impl FilterInfo {
    pub fn text(header: impl Into<String>, text_match: TextMatch) -> Self {
        FilterInfo::Text {
            header: header.into(),
            text_match,
        }
    }

    /// Whether evaluating this node requires the cached article body
    /// (any `Text` predicate on a header outside the fixed known set).
    pub fn needs_body(&self) -> bool {
        match self {
            FilterInfo::Text { header, .. } => !KNOWN_HEADERLESS_OF_BODY
                .iter()
                .any(|h| h.eq_ignore_ascii_case(header)),
            FilterInfo::AggregateAnd { children, .. } | FilterInfo::AggregateOr { children, .. } => {
                children.iter().any(FilterInfo::needs_body)
            }
            _ => false,
        }
    }

    /// Recursively flatten aggregates with a single child into that child.
    pub fn normalize(self) -> FilterInfo {
        match self {
            FilterInfo::AggregateAnd { children, negate } => {
                let children: Vec<_> = children.into_iter().map(FilterInfo::normalize).collect();
                if children.len() == 1 && !negate {
                    children.into_iter().next().unwrap()
                } else {
                    FilterInfo::AggregateAnd { children, negate }
                }
            }
            FilterInfo::AggregateOr { children, negate } => {
                let children: Vec<_> = children.into_iter().map(FilterInfo::normalize).collect();
                if children.len() == 1 && !negate {
                    children.into_iter().next().unwrap()
                } else {
                    FilterInfo::AggregateOr { children, negate }
                }
            }
            other => other,
        }
    }

    /// Human-readable description, akin to `FilterInfo::describe()`.
    pub fn describe(&self) -> String {
        match self {
            FilterInfo::AggregateAnd { children, negate } => {
                format!(
                    "{}AND({})",
                    if *negate { "NOT " } else { "" },
                    children.iter().map(FilterInfo::describe).collect::<Vec<_>>().join(", ")
                )
            }
            FilterInfo::AggregateOr { children, negate } => {
                format!(
                    "{}OR({})",
                    if *negate { "NOT " } else { "" },
                    children.iter().map(FilterInfo::describe).collect::<Vec<_>>().join(", ")
                )
            }
            FilterInfo::IsBinary => "is binary".into(),
            FilterInfo::IsCached => "is cached".into(),
            FilterInfo::IsPostedByMe => "posted by me".into(),
            FilterInfo::IsRead => "is read".into(),
            FilterInfo::IsUnread => "is unread".into(),
            FilterInfo::ByteCountGe(n) => format!("byte count >= {n}"),
            FilterInfo::LineCountGe(n) => format!("line count >= {n}"),
            FilterInfo::CrosspostCountGe(n) => format!("crosspost count >= {n}"),
            FilterInfo::DaysOldGe(n) => format!("days old >= {n}"),
            FilterInfo::ScoreGe(n) => format!("score >= {n}"),
            FilterInfo::Text { header, text_match } => {
                format!(
                    "{}{} {:?} {:?}",
                    if text_match.negate { "not " } else { "" },
                    header,
                    text_match.kind,
                    text_match.text
                )
            }
        }
    }
}
