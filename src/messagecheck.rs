//! Pre-post sanity checks for a composed article.
//!
//! Ported from `pan/usenet-utils/message-check.{h,cc}`. The original works
//! directly against a `GMimeMessage`; this crate checks a flat
//! [`ComposedMessage`] built by the caller from whatever compose-time
//! representation it has (the MIME assembly tree, a plain draft, etc).

use std::collections::BTreeSet;
use tracing::{debug, warn};

/// Tri-valued severity that only ever escalates, never downgrades, within
/// one check pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub enum Goodness {
    #[default]
    Okay = 0,
    Warn = 1,
    Refuse = 2,
}

impl Goodness {
    pub fn clear(&mut self) {
        *self = Goodness::Okay;
    }

    pub fn raise_to_warn(&mut self) {
        if *self < Goodness::Warn {
            *self = Goodness::Warn;
        }
    }

    pub fn raise_to_refuse(&mut self) {
        if *self < Goodness::Refuse {
            *self = Goodness::Refuse;
        }
    }

    pub fn is_ok(&self) -> bool {
        *self == Goodness::Okay
    }

    pub fn is_warn(&self) -> bool {
        *self == Goodness::Warn
    }

    pub fn is_refuse(&self) -> bool {
        *self == Goodness::Refuse
    }
}

/// What `message_check` needs out of the article under construction. The
/// caller builds this from its own compose-time model.
#[derive(Debug, Clone, Default)]
pub struct ComposedMessage {
    pub subject: String,
    pub body: String,
    pub groups: Vec<String>,
    pub followup_to: Vec<String>,
    pub to_addresses: Vec<String>,
    pub from_address: String,
    pub is_html: bool,
    pub is_binary_post: bool,
    pub attribution_line: Option<String>,
    pub groups_our_server_has: BTreeSet<String>,
    pub readonly_groups: BTreeSet<String>,
}

const MAX_REASONABLE_GROUPS: usize = 20;
const TOO_MANY_GROUPS: usize = 10;
const SIG_MAX_LINES: usize = 4;
const SIG_MAX_WIDTH: usize = 80;

/// Run every check and return the accumulated error/warning strings plus
/// the worst severity seen. Errors are deduplicated as in the original
/// (a `set<string>`), hence the `BTreeSet` return for determinism.
pub fn message_check(msg: &ComposedMessage) -> (BTreeSet<String>, Goodness) {
    let mut errors = BTreeSet::new();
    let mut goodness = Goodness::default();

    check_top_posting(msg, &mut errors, &mut goodness);
    check_signature(msg, &mut errors, &mut goodness);
    check_empty_body(msg, &mut errors, &mut goodness);
    check_mostly_quoted(msg, &mut errors, &mut goodness);
    check_all_quoted(msg, &mut errors, &mut goodness);
    check_groups(msg, &mut errors, &mut goodness);
    check_subject(msg, &mut errors, &mut goodness);
    check_addresses(msg, &mut errors, &mut goodness);
    check_html(msg, &mut errors, &mut goodness);
    check_recipients(msg, &mut errors, &mut goodness);

    if goodness.is_refuse() {
        warn!(reasons = ?errors, "composed message refused by message-check");
    } else if goodness.is_warn() {
        debug!(reasons = ?errors, "composed message warned by message-check");
    }

    (errors, goodness)
}

fn check_top_posting(msg: &ComposedMessage, errors: &mut BTreeSet<String>, g: &mut Goodness) {
    let Some(attribution) = &msg.attribution_line else {
        return;
    };
    if attribution.is_empty() {
        return;
    }
    if let Some(pos) = msg.body.find(attribution.as_str()) {
        let quote_after = msg.body[pos + attribution.len()..]
            .trim_start()
            .starts_with('>');
        let body_before = msg.body[..pos].trim();
        if quote_after && !body_before.is_empty() {
            g.raise_to_warn();
            errors.insert("Warning: Reply seems to be top-posted.".to_string());
        }
    }
}

fn check_signature(msg: &ComposedMessage, errors: &mut BTreeSet<String>, g: &mut Goodness) {
    if let Some(idx) = msg.body.find("\n--\n") {
        if msg.body[..idx].ends_with('\n') || idx == 0 {
            g.raise_to_warn();
            errors.insert(
                "Warning: The signature marker should be \"-- \", not \"--\".".to_string(),
            );
        }
    }

    let Some(idx) = msg.body.find("\n-- \n") else {
        return;
    };
    let sig = &msg.body[idx + 5..];
    if sig.trim().is_empty() {
        g.raise_to_warn();
        errors.insert("Warning: Signature prefix with no signature.".to_string());
        return;
    }
    let lines: Vec<&str> = sig.lines().collect();
    if lines.len() > SIG_MAX_LINES {
        g.raise_to_warn();
        errors.insert("Warning: Signature is more than 4 lines long.".to_string());
    }
    if lines.iter().any(|l| l.chars().count() > SIG_MAX_WIDTH) {
        g.raise_to_warn();
        errors.insert("Warning: Signature is more than 80 characters wide.".to_string());
    }
}

fn check_empty_body(msg: &ComposedMessage, errors: &mut BTreeSet<String>, g: &mut Goodness) {
    if msg.body.trim().is_empty() && !msg.is_binary_post {
        errors.insert("Error: Message is empty.".to_string());
        g.raise_to_refuse();
    }
}

/// Body text up to (not including) the `"-- "` signature marker, matching
/// `check_signature`'s convention: anything after the signature is ignored
/// by the quoting checks below.
fn strip_signature(body: &str) -> &str {
    match body.find("\n-- \n") {
        Some(idx) => &body[..idx + 1],
        None => body,
    }
}

/// How much original content is in this message versus quoted content.
/// Warn if the unquoted/total ratio is under 20%, louder if there's no
/// unquoted content at all.
fn check_mostly_quoted(msg: &ComposedMessage, errors: &mut BTreeSet<String>, g: &mut Goodness) {
    if msg.is_binary_post {
        return;
    }
    let body = strip_signature(&msg.body);
    let mut total = 0usize;
    let mut unquoted = 0usize;
    for line in body.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        total += 1;
        if !trimmed.starts_with('>') {
            unquoted += 1;
        }
    }
    if total != 0 && (100 * unquoted / total) < 20 {
        g.raise_to_warn();
        errors.insert(
            if unquoted == 0 {
                "Warning: The message is entirely quoted text!".to_string()
            } else {
                "Warning: The message is mostly quoted text.".to_string()
            },
        );
    }
}

/// Refuse to post a message that, once a copy of the attribution line is
/// erased from the body, has no non-quoted content before the signature.
fn check_all_quoted(msg: &ComposedMessage, errors: &mut BTreeSet<String>, g: &mut Goodness) {
    if msg.is_binary_post {
        return;
    }
    let body = strip_signature(&msg.body);
    if body.trim().is_empty() {
        return;
    }
    let mut working = body.to_string();
    if let Some(attribution) = &msg.attribution_line {
        if !attribution.is_empty() {
            if let Some(pos) = working.find(attribution.as_str()) {
                working.replace_range(pos..pos + attribution.len(), "");
            }
        }
    }
    for line in working.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        if !trimmed.starts_with('>') {
            return;
        }
    }
    errors.insert("Error: Message appears to have no new content.".to_string());
    g.raise_to_refuse();
}

fn check_groups(msg: &ComposedMessage, errors: &mut BTreeSet<String>, g: &mut Goodness) {
    for group in &msg.groups {
        if !msg.groups_our_server_has.is_empty() && !msg.groups_our_server_has.contains(group) {
            g.raise_to_warn();
            errors.insert(format!(
                "Warning: The posting profile's server doesn't carry newsgroup \"{group}\"."
            ));
        }
        if msg.readonly_groups.contains(group) {
            g.raise_to_warn();
            errors.insert(format!("Warning: Group \"{group}\" is read-only."));
        }
    }

    if msg.groups.len() > TOO_MANY_GROUPS {
        g.raise_to_warn();
        errors.insert("Warning: Following-Up to too many groups.".to_string());
    }
    if msg.groups.len() > MAX_REASONABLE_GROUPS {
        g.raise_to_refuse();
        errors.insert("Error: Posting to a very large number of groups.".to_string());
    }
    if msg.groups.len() > 1 && msg.followup_to.is_empty() {
        g.raise_to_warn();
        errors.insert("Warning: Crossposting without setting Followup-To header.".to_string());
    }
}

fn check_subject(msg: &ComposedMessage, errors: &mut BTreeSet<String>, g: &mut Goodness) {
    if msg.subject.trim().is_empty() {
        g.raise_to_refuse();
        errors.insert("Error: No Subject specified.".to_string());
    }
}

fn check_addresses(msg: &ComposedMessage, errors: &mut BTreeSet<String>, g: &mut Goodness) {
    if crate::gnksa::check_address(&msg.from_address).is_err() {
        errors.insert("Error: Bad email address.".to_string());
        g.raise_to_warn();
    }
}

fn check_html(msg: &ComposedMessage, errors: &mut BTreeSet<String>, g: &mut Goodness) {
    if msg.is_html {
        errors.insert("Warning: Most newsgroups frown upon HTML posts.".to_string());
        g.raise_to_warn();
    }
}

fn check_recipients(msg: &ComposedMessage, errors: &mut BTreeSet<String>, g: &mut Goodness) {
    if msg.groups.is_empty() && msg.to_addresses.is_empty() {
        errors.insert("Error: No Recipients.".to_string());
        g.raise_to_refuse();
    }
}
