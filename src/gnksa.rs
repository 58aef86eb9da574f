//! GNKSA (Good Net-Keeping Seal of Approval) address/Message-ID checks,
//! References trimming and signature-delimiter detection.
//!
//! Ported from `pan/usenet-utils/gnksa.{h,cc}`; error discriminants match
//! the original enum exactly so logs/tests referencing numeric codes stay
//! stable.

use thiserror::Error;

const DEFAULT_DOMAIN: &str = "nospam.com";
const SIG_THRESHOLD: usize = 6;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum GnksaError {
    #[error("internal error")]
    InternalError = 1,

    #[error("missing '<'")]
    LangleMissing = 100,
    #[error("missing '>'")]
    RangleMissing = 101,
    #[error("missing '('")]
    LparenMissing = 102,
    #[error("missing ')'")]
    RparenMissing = 103,
    #[error("missing '@'")]
    AtsignMissing = 104,

    #[error("domain has only one label")]
    SingleDomain = 200,
    #[error("invalid domain")]
    InvalidDomain = 201,
    #[error("illegal domain")]
    IllegalDomain = 202,
    #[error("unknown domain")]
    UnknownDomain = 203,
    #[error("invalid character in FQDN")]
    InvalidFqdnChar = 204,
    #[error("zero-length label")]
    ZeroLengthLabel = 205,
    #[error("label too long")]
    IllegalLabelLength = 206,
    #[error("label starts or ends with a hyphen")]
    IllegalLabelHyphen = 207,
    #[error("label begins with a digit")]
    IllegalLabelBegnum = 208,
    #[error("malformed domain literal")]
    BadDomainLiteral = 209,
    #[error("domain literal not permitted here")]
    LocalDomainLiteral = 210,
    #[error("missing ']'")]
    RbracketMissing = 211,

    #[error("missing local part")]
    LocalpartMissing = 300,
    #[error("invalid local part")]
    InvalidLocalpart = 301,
    #[error("zero-length local word")]
    ZeroLengthLocalWord = 302,

    #[error("illegal unquoted character")]
    IllegalUnquotedChar = 400,
    #[error("illegal quoted character")]
    IllegalQuotedChar = 401,
    #[error("illegal encoded character")]
    IllegalEncodedChar = 402,
    #[error("bad encoded-word syntax")]
    BadEncodeSyntax = 403,
    #[error("illegal parenthesized phrase")]
    IllegalParenPhrase = 404,
    #[error("illegal character in parenthesized phrase")]
    IllegalParenChar = 405,
    #[error("invalid real name")]
    InvalidRealname = 406,
    #[error("illegal plain phrase")]
    IllegalPlainPhrase = 407,
}

pub type GnksaResult<T> = Result<T, GnksaError>;

fn is_unquoted_char(c: u8) -> bool {
    c.is_ascii_graphic()
        && !matches!(
            c,
            b'!' | b'(' | b')' | b'<' | b'>' | b'@' | b',' | b';' | b':' | b'\\' | b'"' | b'.' | b'[' | b']'
        )
}

/// Validate a domain (the part after `@`), matching `GNKSA::check_domain`.
pub fn check_domain(domain: &str) -> GnksaResult<()> {
    if domain.is_empty() {
        return Err(GnksaError::ZeroLengthLabel);
    }
    if domain.starts_with('[') {
        return check_domain_literal(domain);
    }
    if domain.starts_with('.') || domain.ends_with('.') || domain.contains("..") {
        return Err(GnksaError::ZeroLengthLabel);
    }

    let labels: Vec<&str> = domain.split('.').collect();
    if labels.len() < 2 {
        return Err(GnksaError::SingleDomain);
    }

    for label in &labels[..labels.len() - 1] {
        if label.len() > 63 {
            return Err(GnksaError::IllegalLabelLength);
        }
        if label.starts_with('-') || label.ends_with('-') {
            return Err(GnksaError::IllegalLabelHyphen);
        }
    }

    let tld = labels[labels.len() - 1];
    let tld_bytes = tld.as_bytes();
    match tld.len() {
        1 => {
            if tld_bytes[0].is_ascii_digit() {
                return check_domain_literal(domain);
            }
            return Err(GnksaError::IllegalDomain);
        }
        2 => {
            if tld_bytes[0].is_ascii_digit() || tld_bytes[1].is_ascii_digit() {
                return check_domain_literal(domain);
            }
        }
        3 => {
            if tld_bytes[0].is_ascii_digit()
                || tld_bytes[2].is_ascii_digit()
                || tld_bytes.get(3).is_some_and(u8::is_ascii_digit)
            {
                return check_domain_literal(domain);
            }
        }
        _ => {}
    }

    Ok(())
}

fn check_domain_literal(domain: &str) -> GnksaResult<()> {
    let needs_brace = domain.starts_with('[');
    let inner = if needs_brace {
        domain
            .strip_prefix('[')
            .and_then(|s| s.strip_suffix(']'))
            .ok_or(GnksaError::BadDomainLiteral)?
    } else {
        domain
    };
    let parts: Vec<&str> = inner.split('.').collect();
    if parts.len() != 4 {
        return Err(GnksaError::BadDomainLiteral);
    }
    for p in parts {
        let n: u32 = p.parse().map_err(|_| GnksaError::BadDomainLiteral)?;
        if n > 255 {
            return Err(GnksaError::BadDomainLiteral);
        }
    }
    Ok(())
}

fn check_localpart(localpart: &str) -> GnksaResult<()> {
    if localpart.is_empty() {
        return Err(GnksaError::LocalpartMissing);
    }
    for word in localpart.split('.') {
        if word.is_empty() {
            return Err(GnksaError::ZeroLengthLocalWord);
        }
        if !word.bytes().all(is_unquoted_char) {
            return Err(GnksaError::InvalidLocalpart);
        }
    }
    Ok(())
}

/// Validate a bare `local@domain` address (no angle brackets).
pub fn check_address(address: &str) -> GnksaResult<()> {
    if address.is_empty() {
        return Err(GnksaError::LocalpartMissing);
    }
    let Some(at) = address.rfind('@') else {
        return Err(GnksaError::InvalidDomain);
    };
    let (local, domain) = (&address[..at], &address[at + 1..]);
    check_domain(domain)?;
    check_localpart(local)
}

/// Validate a `<local@domain>` Message-ID.
pub fn check_message_id(mid: &str) -> GnksaResult<()> {
    let inner = mid
        .strip_prefix('<')
        .and_then(|s| s.strip_suffix('>'))
        .ok_or(GnksaError::LangleMissing)?;
    check_address(inner)
}

/// Validate a `From:` header value in either "Name <addr>" or
/// "addr (Name)" form. `strict` additionally requires the leading
/// display-phrase to parse as RFC-legal plain text.
pub fn check_from(from: &str, strict: bool) -> GnksaResult<()> {
    let from = from.trim();
    if from.is_empty() {
        return Err(GnksaError::LparenMissing);
    }

    if from.ends_with('>') {
        let langle = from.rfind('<').ok_or(GnksaError::LangleMissing)?;
        let addr = &from[langle + 1..from.len() - 1];
        if strict {
            let name_part = from[..langle].trim();
            if !name_part.is_empty() && !is_plain_phrase(name_part) {
                return Err(GnksaError::IllegalPlainPhrase);
            }
        }
        check_address(addr)
    } else if let Some(lparen) = from.find('(') {
        let addr = from[..lparen].trim();
        let rparen = from.rfind(')').ok_or(GnksaError::RparenMissing)?;
        if rparen < lparen {
            return Err(GnksaError::RparenMissing);
        }
        check_address(addr)
    } else {
        check_address(from)
    }
}

/// crude plain-phrase check: space-separated unquoted/quoted/encoded words.
fn is_plain_phrase(s: &str) -> bool {
    s.split_whitespace().all(|word| {
        (word.starts_with('"') && word.ends_with('"') && word.len() >= 2)
            || (word.starts_with("=?") && word.ends_with("?="))
            || word.bytes().all(is_unquoted_char)
    })
}

/// Extract a UI-friendly display name from a `From:` header, falling back
/// to the local-part of the address when the header can't be split.
pub fn get_short_author_name(from: &str) -> String {
    let from = from.trim();
    if let Some(langle) = from.rfind('<') {
        let name = from[..langle].trim().trim_matches('"');
        if !name.is_empty() {
            return name.to_string();
        }
        let addr = from[langle + 1..].trim_end_matches('>');
        return addr.split('@').next().unwrap_or(addr).to_string();
    }
    if let Some(lparen) = from.find('(') {
        let rparen = from.rfind(')').unwrap_or(from.len());
        if rparen > lparen {
            let name = from[lparen + 1..rparen].trim();
            if !name.is_empty() {
                return name.to_string();
            }
        }
    }
    from.split('@').next().unwrap_or(from).to_string()
}

/// Keep only `<local@domain>` tokens in `references` that parse as valid
/// Message-IDs with a non-empty, non-"postmaster" local part, non-empty
/// domain, and total length <= 250.
pub fn remove_broken_message_ids_from_references(references: &str) -> String {
    let mut out: Vec<&str> = Vec::new();
    let mut rest = references;
    while let Some(start) = rest.find('<') {
        rest = &rest[start..];
        let end = rest
            .find('>')
            .map(|i| i + 1)
            .unwrap_or(rest.len());
        let candidate = &rest[..end];
        rest = &rest[end..];
        if is_well_formed_reference(candidate) {
            out.push(candidate);
        }
    }
    out.join(" ")
}

fn is_well_formed_reference(mid: &str) -> bool {
    if mid.len() > 250 {
        return false;
    }
    let Some(inner) = mid.strip_prefix('<').and_then(|s| s.strip_suffix('>')) else {
        return false;
    };
    let Some((local, domain)) = inner.split_once('@') else {
        return false;
    };
    if local.is_empty() || local.eq_ignore_ascii_case("postmaster") || domain.is_empty() {
        return false;
    }
    true
}

/// Drop malformed Message-IDs, then drop entries from the front of
/// everything after the first reference (keeping the first and a maximal
/// contiguous tail of the most recent) until the total length is at most
/// `cutoff` bytes. Matches `GNKSA::trim_references`.
pub fn trim_references(refs: &str, cutoff: usize) -> String {
    let fixed = remove_broken_message_ids_from_references(refs);
    if fixed.is_empty() {
        return fixed;
    }

    let mut tokens: Vec<&str> = fixed.split(' ').collect();
    let left = tokens.remove(0);
    // `cutoff - left.len() - 1` in the source; saturate instead of
    // underflowing when `left` alone already exceeds the cutoff.
    let budget = cutoff.saturating_sub(left.len() + 1);

    let mut kept_len: usize = tokens.iter().map(|t| t.len() + 1).sum();
    while kept_len > budget && !tokens.is_empty() {
        // drop from the front, preserving the most recent (trailing) entries
        let removed = tokens.remove(0);
        kept_len -= removed.len() + 1;
    }

    let mut s = String::from(left);
    if !tokens.is_empty() {
        s.push(' ');
        s.push_str(&tokens.join(" "));
    }
    s
}

/// Default References trimming cutoff: 998 (NNTP line limit) minus 12 for
/// `"References: "`.
pub const DEFAULT_TRIM_CUTOFF: usize = 986;

pub fn generate_references(prior_refs: &str, own_mid: &str) -> String {
    if own_mid.is_empty() {
        return String::new();
    }
    let combined = if prior_refs.is_empty() {
        own_mid.to_string()
    } else {
        format!("{prior_refs} {own_mid}")
    };
    trim_references(&combined, DEFAULT_TRIM_CUTOFF)
}

/// Generate an outgoing Message-ID: `pan$<usec>$<rand>$<rand>$<rand>@domain`,
/// with each field lowercase hex and `domain` falling back to
/// `nospam.com` when empty.
pub fn generate_message_id(domain: &str, usec: u64, rand_words: [u32; 3]) -> String {
    let domain = if domain.is_empty() {
        DEFAULT_DOMAIN
    } else {
        domain
    };
    format!(
        "<pan${:x}${:x}${:x}${:x}@{}>",
        usec, rand_words[0], rand_words[1], rand_words[2], domain
    )
}

/// Derive the domain for `generate_message_id` from a poster's email
/// address, falling back to `nospam.com`.
pub fn domain_from_email_address(addr: &str) -> String {
    let domain = addr.split('@').nth(1).unwrap_or("");
    let domain = domain.split('>').next().unwrap_or(domain).trim();
    if domain.is_empty() {
        DEFAULT_DOMAIN.to_string()
    } else {
        domain.to_string()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SigType {
    None,
    Standard,
    NonStandard,
}

/// Classify a single line (no trailing `\n`) as a signature delimiter.
pub fn is_signature_delimiter(line: &str) -> SigType {
    match line.as_bytes() {
        b"--" => SigType::NonStandard,
        b"--\r" => SigType::NonStandard,
        b"-- " => SigType::Standard,
        b"-- \r" => SigType::Standard,
        _ => SigType::None,
    }
}

/// Find the byte offset of the last signature delimiter in `body`. A
/// non-standard delimiter (`"--"` without trailing space) is accepted only
/// when at most `SIG_THRESHOLD` lines follow it.
pub fn find_signature_delimiter(body: &str) -> Option<(usize, SigType)> {
    let mut sig_type = SigType::None;
    let mut sig_pos: Option<usize> = None;
    let mut lines_below = 0usize;

    let mut offset = 0usize;
    for line in body.split('\n') {
        let st = is_signature_delimiter(line);
        if st != SigType::None {
            sig_type = st;
            sig_pos = Some(offset);
            lines_below = 0;
        } else if sig_pos.is_some() {
            lines_below += 1;
        }
        offset += line.len() + 1;
    }

    let pos = sig_pos?;
    match sig_type {
        SigType::Standard => Some((pos, SigType::Standard)),
        SigType::NonStandard if lines_below <= SIG_THRESHOLD => Some((pos, SigType::NonStandard)),
        _ => None,
    }
}

/// Strip the signature (if any) from `body`, returning the body text
/// before the delimiter.
pub fn remove_signature(body: &str) -> &str {
    match find_signature_delimiter(body) {
        Some((pos, _)) => &body[..pos],
        None => body,
    }
}
