//! slrn-compatible scorefile parser, producing `FilterInfo` trees.
//!
//! Ported from `pan/usenet-utils/score.{h,cc}`'s grammar as described by
//! the engine spec: sections, rules, nested aggregates, includes, expiry
//! and header tests.

use crate::filter::{FilterInfo, MatchKind, TextMatch};
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScorefileError {
    #[error("{file}:{line}: {message}")]
    Syntax {
        file: String,
        line: u32,
        message: String,
    },
}

pub type ScorefileResult<T> = Result<T, ScorefileError>;

#[derive(Debug, Clone)]
pub struct Rule {
    pub origin_file: String,
    pub begin_line: u32,
    pub end_line: u32,
    pub name: Option<String>,
    pub predicate: FilterInfo,
    pub value: i32,
    pub assign_flag: bool,
    pub expired: bool,
}

#[derive(Debug, Clone)]
pub struct Section {
    pub name: String,
    pub negate: bool,
    pub groups: Vec<TextMatch>,
    pub rules: Vec<Rule>,
}

impl Section {
    /// Whether `groupname` is selected by this section's group-pattern
    /// list, honoring the section's overall negation.
    pub fn matches_group(&self, groupname: &str) -> bool {
        let any = self.groups.iter().any(|g| g.matches(groupname));
        any != self.negate
    }
}

#[derive(Debug, Clone, Default)]
pub struct Scorefile {
    pub sections: Vec<Section>,
}

impl Scorefile {
    pub fn parse(text: &str, origin_file: &str) -> ScorefileResult<Scorefile> {
        Scorefile::parse_impl(text, origin_file).inspect_err(|e| {
            debug!(file = %origin_file, error = %e, "scorefile parse error");
        })
    }

    /// Sections whose group-pattern list selects `groupname`.
    pub fn get_matching_sections(&self, groupname: &str) -> Vec<&Section> {
        self.sections
            .iter()
            .filter(|s| s.matches_group(groupname))
            .collect()
    }
}

/// Evaluate every matching section's rules in source order against a
/// caller-supplied predicate evaluator, accumulating (or replacing, for
/// `assign_flag` rules) the score. Expired rules are skipped. Final score
/// is clamped to `i32` range by construction (additions saturate).
pub fn score_article(
    scorefile: &Scorefile,
    groupname: &str,
    mut eval: impl FnMut(&FilterInfo) -> bool,
) -> i32 {
    let mut score: i64 = 0;
    for section in scorefile.get_matching_sections(groupname) {
        for rule in &section.rules {
            if rule.expired {
                continue;
            }
            if eval(&rule.predicate) {
                if rule.assign_flag {
                    score = rule.value as i64;
                } else {
                    score += rule.value as i64;
                }
            }
        }
    }
    score.clamp(i32::MIN as i64, i32::MAX as i64) as i32
}

/// slrn scoring magnitude bands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreBand {
    Watched,
    High,
    Medium,
    Neutral,
    Low,
    Ignored,
}

pub fn score_band(score: i32) -> ScoreBand {
    match score {
        s if s >= 9999 => ScoreBand::Watched,
        5000..=9998 => ScoreBand::High,
        1..=4999 => ScoreBand::Medium,
        0 => ScoreBand::Neutral,
        -9998..=-1 => ScoreBand::Low,
        _ => ScoreBand::Ignored,
    }
}

/// Translate an slrn group-glob (`*` => `.*`, literal `.`/`+`) into an
/// anchored regex-backed `TextMatch`.
fn glob_to_text_match(pattern: &str) -> TextMatch {
    let mut regex = String::from("^");
    for c in pattern.trim().chars() {
        match c {
            '*' => regex.push_str(".*"),
            '.' => regex.push_str("\\."),
            '+' => regex.push_str("\\+"),
            other => regex.push(other),
        }
    }
    regex.push('$');
    TextMatch::new(MatchKind::Regex, false, false, regex)
}

/// Maximum `include` recursion depth, guarding against include cycles.
const MAX_INCLUDE_DEPTH: u32 = 16;

/// Resolve an `include <path>` argument against the directory of the file
/// that names it, matching slrn/Pan's relative-path include semantics.
fn resolve_include_path(origin_file: &str, include_path: &str) -> std::path::PathBuf {
    let p = std::path::Path::new(include_path);
    if p.is_absolute() {
        return p.to_path_buf();
    }
    match std::path::Path::new(origin_file).parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir.join(p),
        _ => p.to_path_buf(),
    }
}

/// Recursive-descent parser operating over owned `String` lines, to avoid
/// fighting borrow lifetimes while building the predicate tree.
///
/// `include` directives are expanded up front into `lines`, each carrying
/// the filename and line number of the file it actually came from, so that
/// a rule built from an included line still reports (and is grounded in)
/// its own origin rather than the top-level scorefile's.
struct LineParser {
    lines: Vec<(String, u32, String)>,
    idx: usize,
    current_origin: String,
}

impl LineParser {
    fn new(origin_file: &str, text: &str) -> ScorefileResult<Self> {
        let mut lines = Vec::new();
        Self::expand_into(origin_file, text, &mut lines, 0)?;
        Ok(LineParser {
            lines,
            idx: 0,
            current_origin: origin_file.to_string(),
        })
    }

    /// Append `text`'s lines to `out`, recursively expanding any
    /// `include <path>` directive in place. Matches `parse_file`'s
    /// recursion in the original: an included file's sections/rules merge
    /// into whatever section was open when the `include` line was hit.
    fn expand_into(
        origin_file: &str,
        text: &str,
        out: &mut Vec<(String, u32, String)>,
        depth: u32,
    ) -> ScorefileResult<()> {
        if depth > MAX_INCLUDE_DEPTH {
            return Err(ScorefileError::Syntax {
                file: origin_file.to_string(),
                line: 0,
                message: "include nesting too deep (possible cycle)".to_string(),
            });
        }
        for (i, raw) in text.lines().enumerate() {
            let line_no = (i + 1) as u32;
            if let Some(path) = raw.trim().strip_prefix("include ") {
                let path = path.trim();
                let resolved = resolve_include_path(origin_file, path);
                let included = std::fs::read_to_string(&resolved).map_err(|e| {
                    ScorefileError::Syntax {
                        file: origin_file.to_string(),
                        line: line_no,
                        message: format!("cannot read include {path:?}: {e}"),
                    }
                })?;
                let resolved_name = resolved.to_string_lossy().into_owned();
                Self::expand_into(&resolved_name, &included, out, depth + 1)?;
                continue;
            }
            out.push((origin_file.to_string(), line_no, raw.to_string()));
        }
        Ok(())
    }

    fn err(&self, line_no: u32, message: impl Into<String>) -> ScorefileError {
        ScorefileError::Syntax {
            file: self.current_origin.clone(),
            line: line_no,
            message: message.into(),
        }
    }

    fn peek(&self) -> Option<&str> {
        self.lines.get(self.idx).map(|(_, _, text)| text.as_str())
    }

    fn next_line(&mut self) -> Option<(u32, String)> {
        let (origin, line_no, line) = self.lines.get(self.idx)?.clone();
        self.current_origin = origin;
        self.idx += 1;
        Some((line_no, line))
    }

    fn parse(&mut self) -> ScorefileResult<Vec<Section>> {
        let mut sections = Vec::new();
        let mut current: Option<Section> = None;

        while self.peek().is_some() {
            let (line_no, raw) = self.next_line().unwrap();
            let trimmed = raw.trim();

            if trimmed.is_empty() || trimmed.starts_with('%') || trimmed.starts_with('#') {
                continue;
            }

            if trimmed.starts_with('[') {
                if let Some(section) = current.take() {
                    sections.push(section);
                }
                let negate = trimmed[1..].starts_with('~');
                let body_start = if negate { 2 } else { 1 };
                let close = trimmed
                    .find(']')
                    .ok_or_else(|| self.err(line_no, "missing ']' in section header"))?;
                let body = &trimmed[body_start..close];
                let groups: Vec<TextMatch> = body.split(',').map(glob_to_text_match).collect();
                current = Some(Section {
                    name: body.to_string(),
                    negate,
                    groups,
                    rules: Vec::new(),
                });
                continue;
            }

            if trimmed.starts_with("Score:") {
                let section = current
                    .get_or_insert_with(|| Section {
                        name: "*".to_string(),
                        negate: false,
                        groups: vec![glob_to_text_match("*")],
                        rules: Vec::new(),
                    });
                let rule = self.parse_rule(line_no, trimmed)?;
                section.rules.push(rule);
                continue;
            }

            return Err(self.err(line_no, format!("unexpected line: {trimmed:?}")));
        }

        if let Some(section) = current.take() {
            sections.push(section);
        }
        Ok(sections)
    }

    /// Parse a `Score:` / `Score::` line plus any continuation lines up to
    /// the next blank line, building the (possibly nested-aggregate)
    /// predicate tree.
    fn parse_rule(&mut self, begin_line: u32, first_line: &str) -> ScorefileResult<Rule> {
        let (is_and, after_colon) = if let Some(rest) = first_line.strip_prefix("Score::") {
            (true, rest)
        } else {
            (
                false,
                first_line
                    .strip_prefix("Score:")
                    .expect("caller checked prefix"),
            )
        };

        // Split off a trailing `# name` comment.
        let (value_and_tests, name) = match after_colon.rfind('#') {
            Some(idx) => (
                &after_colon[..idx],
                Some(after_colon[idx + 1..].trim().to_string()),
            ),
            None => (after_colon, None),
        };

        let mut parts = value_and_tests.splitn(2, '/');
        let value_str = parts.next().unwrap_or("").trim();
        let inline_test = parts.next().map(str::trim);

        let (assign_flag, value) = parse_score_value(value_str)
            .ok_or_else(|| self.err(begin_line, format!("bad score value: {value_str:?}")))?;

        let mut children = Vec::new();
        let mut expired = false;
        if let Some(test) = inline_test {
            if !test.is_empty() {
                self.parse_test_line(begin_line, test, &mut children, &mut expired)?;
            }
        }

        let mut end_line = begin_line;
        while let Some(peeked) = self.peek() {
            let trimmed = peeked.trim();
            if trimmed.is_empty() {
                self.idx += 1;
                break;
            }
            if trimmed.starts_with('[') || trimmed.starts_with("Score:") {
                break;
            }
            let (line_no, raw) = self.next_line().unwrap();
            end_line = line_no;
            let trimmed = raw.trim();
            if trimmed.starts_with('%') || trimmed.starts_with('#') {
                continue;
            }
            if trimmed == "}" {
                continue; // closes an already-consumed nested aggregate
            }
            if let Some(rest) = trimmed.strip_prefix("{:") {
                let (is_or, rest) = match rest.strip_prefix(':') {
                    Some(r) => (true, r),
                    None => (false, rest),
                };
                let nested = self.parse_nested_aggregate(line_no, rest, is_or)?;
                children.push(nested);
                continue;
            }
            self.parse_test_line(line_no, trimmed, &mut children, &mut expired)?;
        }

        let predicate = if children.len() == 1 {
            children.into_iter().next().unwrap()
        } else {
            FilterInfo::AggregateAnd {
                children,
                negate: false,
            }
            .normalize()
        }
        .normalize_with_kind(is_and);

        Ok(Rule {
            origin_file: self.current_origin.clone(),
            begin_line,
            end_line,
            name,
            predicate,
            value,
            assign_flag,
            expired,
        })
    }

    /// Parse a nested `{:...}` (all must pass) or `{::...}` (only one must
    /// pass) aggregate, per `score.cc`'s `only_one_test_must_pass` check on
    /// the two characters following the opening `{`.
    fn parse_nested_aggregate(
        &mut self,
        _open_line: u32,
        first_rest: &str,
        is_or: bool,
    ) -> ScorefileResult<FilterInfo> {
        let mut children = Vec::new();
        let mut expired = false;
        if !first_rest.trim().is_empty() {
            self.parse_test_line(_open_line, first_rest.trim(), &mut children, &mut expired)?;
        }
        while let Some((line_no, raw)) = self.next_line() {
            let trimmed = raw.trim();
            if trimmed == "}" {
                break;
            }
            if trimmed.is_empty() || trimmed.starts_with('%') || trimmed.starts_with('#') {
                continue;
            }
            if let Some(rest) = trimmed.strip_prefix("{:") {
                let (nested_is_or, rest) = match rest.strip_prefix(':') {
                    Some(r) => (true, r),
                    None => (false, rest),
                };
                let nested = self.parse_nested_aggregate(line_no, rest, nested_is_or)?;
                children.push(nested);
                continue;
            }
            self.parse_test_line(line_no, trimmed, &mut children, &mut expired)?;
        }
        let node = if is_or {
            FilterInfo::AggregateOr {
                children,
                negate: false,
            }
        } else {
            FilterInfo::AggregateAnd {
                children,
                negate: false,
            }
        }
        .normalize();
        Ok(node)
    }

    fn parse_test_line(
        &self,
        line_no: u32,
        line: &str,
        children: &mut Vec<FilterInfo>,
        expired: &mut bool,
    ) -> ScorefileResult<()> {
        let line = match line.find('#') {
            Some(idx) => line[..idx].trim(),
            None => line.trim(),
        };
        if line.is_empty() {
            return Ok(());
        }

        if let Some(rest) = line.strip_prefix("Expires:") {
            *expired = is_expired(rest.trim());
            return Ok(());
        }

        let (negate, rest) = match line.strip_prefix('~') {
            Some(r) => (true, r),
            None => (false, line),
        };

        let (header, delim, value) = split_header_test(rest)
            .ok_or_else(|| self.err(line_no, format!("bad header test: {line:?}")))?;
        let case_sensitive = delim == '=';

        let predicate = match header.to_ascii_lowercase().as_str() {
            "lines" => {
                let n: u32 = value
                    .trim()
                    .parse()
                    .map_err(|_| self.err(line_no, "bad Lines value"))?;
                with_negate(FilterInfo::LineCountGe(n + 1), negate)
            }
            "bytes" => {
                let n: u64 = value
                    .trim()
                    .parse()
                    .map_err(|_| self.err(line_no, "bad Bytes value"))?;
                with_negate(FilterInfo::ByteCountGe(n + 1), negate)
            }
            "age" => {
                let n: u32 = value
                    .trim()
                    .parse()
                    .map_err(|_| self.err(line_no, "bad Age value"))?;
                // Age: N => DaysOldLe(N), expressed as negated DaysOldGe(N+1)
                with_negate(FilterInfo::DaysOldGe(n + 1), !negate)
            }
            "has-body" => {
                let on = value.trim() == "1";
                with_negate(FilterInfo::IsCached, negate != !on)
            }
            _ => {
                let tm = TextMatch::new(MatchKind::Regex, case_sensitive, negate, value.trim());
                FilterInfo::text(header, tm)
            }
        };
        children.push(predicate);
        Ok(())
    }
}

fn with_negate(f: FilterInfo, negate: bool) -> FilterInfo {
    if !negate {
        return f;
    }
    FilterInfo::AggregateAnd {
        children: vec![f],
        negate: true,
    }
}

/// Split `Header:<delim> value` into `(header, delim, value)`.
fn split_header_test(s: &str) -> Option<(&str, char, &str)> {
    let colon_pos = s.find(':')?;
    let equal_pos = s.find('=');
    let (pos, delim) = match equal_pos {
        Some(eq) if eq < colon_pos => (eq, '='),
        _ => (colon_pos, ':'),
    };
    let header = s[..pos].trim();
    let value = s[pos + 1..].trim();
    if header.is_empty() {
        return None;
    }
    Some((header, delim, value))
}

fn parse_score_value(s: &str) -> Option<(bool, i32)> {
    let s = s.trim();
    let (assign, rest) = match s.strip_prefix('=') {
        Some(r) => (true, r),
        None => (false, s),
    };
    rest.trim().parse::<i32>().ok().map(|v| (assign, v))
}

/// `MM/DD/YYYY` or `DD-MM-YYYY`. Returns true if the date is in the past.
fn is_expired(date_str: &str) -> bool {
    let parsed = parse_mm_dd_yyyy(date_str).or_else(|| parse_dd_mm_yyyy(date_str));
    let Some((year, month, day)) = parsed else {
        return false;
    };
    let Some(date) = chrono::NaiveDate::from_ymd_opt(year, month, day) else {
        return false;
    };
    date < chrono::Utc::now().date_naive()
}

fn parse_mm_dd_yyyy(s: &str) -> Option<(i32, u32, u32)> {
    let parts: Vec<&str> = s.split('/').collect();
    if parts.len() != 3 {
        return None;
    }
    let month: u32 = parts[0].parse().ok()?;
    let day: u32 = parts[1].parse().ok()?;
    let year: i32 = parts[2].parse().ok()?;
    Some((year, month, day))
}

fn parse_dd_mm_yyyy(s: &str) -> Option<(i32, u32, u32)> {
    let parts: Vec<&str> = s.split('-').collect();
    if parts.len() != 3 {
        return None;
    }
    let day: u32 = parts[0].parse().ok()?;
    let month: u32 = parts[1].parse().ok()?;
    let year: i32 = parts[2].parse().ok()?;
    Some((year, month, day))
}

trait NormalizeWithKind {
    fn normalize_with_kind(self, is_and: bool) -> FilterInfo;
}

impl NormalizeWithKind for FilterInfo {
    /// The top-level rule aggregate is re-tagged AND/OR per the
    /// `Score:`/`Score::` distinction, since `parse_rule` built it as a
    /// generic AND by default when flattening single children.
    fn normalize_with_kind(self, is_and: bool) -> FilterInfo {
        match self {
            FilterInfo::AggregateAnd { children, negate } if !is_and => {
                FilterInfo::AggregateOr { children, negate }.normalize()
            }
            FilterInfo::AggregateOr { children, negate } if is_and => {
                FilterInfo::AggregateAnd { children, negate }.normalize()
            }
            other => other,
        }
    }
}

// Public parse entrypoint using the owned-line implementation.
impl Scorefile {
    fn parse_impl(text: &str, origin_file: &str) -> ScorefileResult<Scorefile> {
        let mut parser = LineParser::new(origin_file, text)?;
        let sections = parser.parse()?;
        Ok(Scorefile { sections })
    }
}
