//! Compiles a [`FilterInfo`] predicate tree into SQL-query fragments, and
//! provides a reference in-memory evaluator over the same tree so both
//! paths can be checked against each other in tests.
//!
//! Ported from `pan/data-impl/header-filter.{h,cc}`. The original targets
//! SQLiteCpp; this crate has no SQL engine dependency, so [`compile`]
//! produces a portable `SqlCond` fragment list any `rusqlite`/`sqlx`-style
//! caller can bind and run, and [`evaluate`] is the authoritative in-memory
//! fallback used by the cache layer.

use crate::filter::{FilterInfo, MatchKind};

#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    Bool(bool),
    Int(i64),
    Str(String),
}

/// One `JOIN ... WHERE ...` fragment plus its positional bind parameter.
#[derive(Debug, Clone, Default)]
pub struct SqlCond {
    pub join: Option<String>,
    pub where_clause: String,
    pub param: Option<SqlValue>,
}

impl SqlCond {
    fn simple(where_clause: impl Into<String>, param: SqlValue) -> Self {
        SqlCond {
            join: None,
            where_clause: where_clause.into(),
            param: Some(param),
        }
    }
}

/// A fully-assembled query: the join/where fragments in source order plus
/// the positional bind values a caller feeds to a prepared statement.
#[derive(Debug, Clone)]
pub struct CompiledQuery {
    pub sql: String,
    pub params: Vec<SqlValue>,
}

/// Compile `filter` into a `select message_id from article ...` query.
pub fn compile(filter: &FilterInfo) -> CompiledQuery {
    let conds = compile_conds(filter);
    let mut sql = String::from("select message_id from article ");
    for c in &conds {
        if let Some(join) = &c.join {
            sql.push_str(join);
            sql.push(' ');
        }
    }
    sql.push_str("where ");
    let wheres: Vec<&str> = conds.iter().map(|c| c.where_clause.as_str()).collect();
    sql.push_str(&wheres.join(" and "));

    let params = conds.into_iter().filter_map(|c| c.param).collect();
    CompiledQuery { sql, params }
}

fn compile_conds(filter: &FilterInfo) -> Vec<SqlCond> {
    match filter {
        FilterInfo::AggregateAnd { children, negate } => {
            compile_aggregate(children, *negate, "and")
        }
        FilterInfo::AggregateOr { children, negate } => {
            compile_aggregate(children, *negate, "or")
        }
        FilterInfo::IsBinary => vec![SqlCond::simple("is_binary = ?", SqlValue::Bool(true))],
        FilterInfo::IsCached => vec![SqlCond::simple("cached = ?", SqlValue::Bool(true))],
        FilterInfo::IsPostedByMe => {
            vec![SqlCond::simple("posted_by_me = ?", SqlValue::Bool(true))]
        }
        FilterInfo::IsRead => vec![SqlCond::simple("is_read = ?", SqlValue::Bool(true))],
        FilterInfo::IsUnread => vec![SqlCond::simple("is_read = ?", SqlValue::Bool(false))],
        FilterInfo::ByteCountGe(n) => {
            vec![SqlCond::simple("byte_count >= ?", SqlValue::Int(*n as i64))]
        }
        FilterInfo::LineCountGe(n) => {
            vec![SqlCond::simple("line_count >= ?", SqlValue::Int(*n as i64))]
        }
        FilterInfo::CrosspostCountGe(n) => {
            let mut sc = SqlCond::simple(
                "(select count(*) from article_group where article_id = article.id) >= ?",
                SqlValue::Int(*n as i64),
            );
            sc.join = Some(String::new());
            vec![sc]
        }
        FilterInfo::DaysOldGe(n) => vec![SqlCond::simple(
            "julianday('now') - julianday(date_posted) >= ?",
            SqlValue::Int(*n as i64),
        )],
        FilterInfo::ScoreGe(n) => {
            vec![SqlCond::simple("score >= ?", SqlValue::Int(*n as i64))]
        }
        FilterInfo::Text { header, text_match } => {
            // A test against an uncached header needs the article body;
            // short-circuit to the cached flag rather than compiling a test
            // the SQL layer has no column for.
            if filter.needs_body() {
                vec![SqlCond {
                    join: None,
                    where_clause: "article.cached = True".to_string(),
                    param: None,
                }]
            } else {
                vec![compile_text(header, text_match)]
            }
        }
    }
}

fn compile_aggregate(children: &[FilterInfo], negate: bool, op: &str) -> Vec<SqlCond> {
    let parts: Vec<String> = children
        .iter()
        .map(|c| {
            let sub = compile_conds(c);
            let joined: Vec<&str> = sub.iter().map(|s| s.where_clause.as_str()).collect();
            format!("({})", joined.join(" and "))
        })
        .collect();
    let mut params = Vec::new();
    for c in children {
        for sc in compile_conds(c) {
            if let Some(p) = sc.param {
                params.push(p);
            }
        }
    }
    let mut where_clause = parts.join(&format!(" {op} "));
    if negate {
        where_clause = format!("not ({where_clause})");
    }
    // Collapse the parameter list into one SqlCond per child to preserve
    // binding order; since SqlCond carries at most one param, emit one
    // synthetic SqlCond per original param and fold the where text into
    // the first.
    let mut conds: Vec<SqlCond> = params
        .into_iter()
        .map(|p| SqlCond {
            join: None,
            where_clause: String::new(),
            param: Some(p),
        })
        .collect();
    if let Some(first) = conds.first_mut() {
        first.where_clause = where_clause;
    } else {
        conds.push(SqlCond {
            join: None,
            where_clause,
            param: None,
        });
    }
    conds
}

/// `xref`/`newsgroups` filters compile to join/subquery shapes of their
/// own; ordinary headers map onto a literal column on `article`.
fn compile_text(header: &str, tm: &crate::filter::TextMatch) -> SqlCond {
    match header.to_ascii_lowercase().as_str() {
        "xref" => compile_xref(tm),
        "newsgroups" => compile_newsgroups(tm),
        "subject" => simple_column_cond("subject", tm),
        "from" => simple_column_cond("author_address", tm),
        "message-id" => simple_column_cond("message_id", tm),
        "references" => simple_column_cond("references_header", tm),
        _ => simple_column_cond("body", tm),
    }
}

/// `column <op> ?` (or its negated/case-folded form), plus the bound
/// pattern value. Shared by every plain-column text test.
fn column_match_fragment(column: &str, tm: &crate::filter::TextMatch) -> (String, SqlValue) {
    let (op, pattern) = match tm.kind {
        MatchKind::Is => ("=", tm.text.clone()),
        MatchKind::Contains => ("like", format!("%{}%", tm.text)),
        MatchKind::BeginsWith => ("like", format!("{}%", tm.text)),
        MatchKind::EndsWith => ("like", format!("%{}", tm.text)),
        MatchKind::Regex => ("regexp", tm.text.clone()),
    };
    let mut where_clause = format!("{column} {op} ?");
    if tm.negate {
        where_clause = format!("not ({where_clause})");
    }
    if !tm.case_sensitive {
        where_clause = format!(
            "lower({column}) {op} lower(?)",
            op = if tm.negate { format!("not {op}") } else { op.to_string() }
        );
    }
    (where_clause, SqlValue::Str(pattern))
}

fn simple_column_cond(column: &str, tm: &crate::filter::TextMatch) -> SqlCond {
    let (where_clause, param) = column_match_fragment(column, tm);
    SqlCond::simple(where_clause, param)
}

/// `Xref:` tests compile to one of three shapes depending on what the
/// pattern is actually asking, mirroring `get_xref_sql_cond`:
/// a crosspost-group-name search (`grp.name like ...`, joined against
/// `article_group`/`group`), a `(.*:){N}` or `.*:.*`-style crosspost-count
/// pattern (delegated to the same subquery `CrosspostCountGe` uses), or
/// the generic per-server xref-string fallback.
fn compile_xref(tm: &crate::filter::TextMatch) -> SqlCond {
    const CROSSPOST_COUNT_SQL: &str =
        "(select count(*) from article_group where article_id = article.id) >= ?";

    if tm.kind == MatchKind::Contains {
        let (where_clause, param) = column_match_fragment("grp.name", tm);
        let mut sc = SqlCond::simple(where_clause, param);
        sc.join = Some(
            "join `article_group` as ag on ag.article_id = article.id \
             join `group` as grp on ag.group_id == grp.id"
                .to_string(),
        );
        return sc;
    }

    if let Some(pos) = tm.text.find("(.*:){") {
        let tail = &tm.text[pos + "(.*:){".len()..];
        let ge: i64 = tail
            .chars()
            .take_while(|c| c.is_ascii_digit())
            .collect::<String>()
            .parse()
            .unwrap_or(0);
        return SqlCond::simple(CROSSPOST_COUNT_SQL, SqlValue::Int(ge));
    }

    if tm.text.contains(".*:.*") {
        let ge = tm.text.matches(':').count() as i64;
        return SqlCond::simple(CROSSPOST_COUNT_SQL, SqlValue::Int(ge));
    }

    let snippet = "(select s.host || ' ' || group_concat(grp.name || ':' || xr.number, ' ') \
         from `group` as grp \
         join article_group as ag on ag.group_id == grp.id and ag.article_id = article.id \
         join article_xref as xr on xr.article_group_id = ag.id \
         join server as s on xr.server_id == s.id \
         group by s.host)";
    let (where_clause, param) = column_match_fragment(snippet, tm);
    SqlCond::simple(where_clause, param)
}

/// `Newsgroups:` tests compile to an `EXISTS`-style count subquery against
/// the group membership join, mirroring the `criteria._header == newsgroups`
/// branch of `get_sql_filter`.
fn compile_newsgroups(tm: &crate::filter::TextMatch) -> SqlCond {
    let (match_clause, param) = column_match_fragment("grp.name", tm);
    let where_clause = format!(
        "(select count(*) from `group` as grp \
          join article_group as ag on ag.group_id == grp.id \
          where ag.article_id == article.id and {match_clause}) > 0"
    );
    SqlCond::simple(where_clause, param)
}

/// Facts about one article the in-memory evaluator needs. Mirrors the
/// columns `compile` references, kept deliberately flat.
#[derive(Debug, Clone, Default)]
pub struct ArticleFacts {
    pub subject: String,
    pub from: String,
    pub message_id: String,
    pub newsgroups: Vec<String>,
    pub references: String,
    pub body: Option<String>,
    pub is_binary: bool,
    pub is_cached: bool,
    pub is_posted_by_me: bool,
    pub is_read: bool,
    pub byte_count: u64,
    pub line_count: u32,
    pub crosspost_count: u32,
    pub days_old: u32,
    pub score: i32,
}

/// Reference interpreter: evaluates `filter` directly against `facts`
/// without going through SQL. Used to validate [`compile`]'s output.
pub fn evaluate(filter: &FilterInfo, facts: &ArticleFacts) -> bool {
    match filter {
        FilterInfo::AggregateAnd { children, negate } => {
            let v = children.iter().all(|c| evaluate(c, facts));
            v != *negate
        }
        FilterInfo::AggregateOr { children, negate } => {
            let v = children.iter().any(|c| evaluate(c, facts));
            v != *negate
        }
        FilterInfo::IsBinary => facts.is_binary,
        FilterInfo::IsCached => facts.is_cached,
        FilterInfo::IsPostedByMe => facts.is_posted_by_me,
        FilterInfo::IsRead => facts.is_read,
        FilterInfo::IsUnread => !facts.is_read,
        FilterInfo::ByteCountGe(n) => facts.byte_count >= *n,
        FilterInfo::LineCountGe(n) => facts.line_count >= *n,
        FilterInfo::CrosspostCountGe(n) => facts.crosspost_count >= *n,
        FilterInfo::DaysOldGe(n) => facts.days_old >= *n,
        FilterInfo::ScoreGe(n) => facts.score >= *n,
        FilterInfo::Text { header, text_match } => {
            let haystack: String = match header.to_ascii_lowercase().as_str() {
                "subject" => facts.subject.clone(),
                "from" => facts.from.clone(),
                "message-id" => facts.message_id.clone(),
                "newsgroups" => facts.newsgroups.join(","),
                "references" => facts.references.clone(),
                _ => facts.body.clone().unwrap_or_default(),
            };
            text_match.matches(&haystack)
        }
    }
}
