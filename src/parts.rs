//! Multipart representation: packed Message-IDs and part batches.
//!
//! Large binary newsgroups can have millions of multipart articles; storing
//! each part's full Message-ID verbatim dominates memory. Instead each part's
//! Message-ID is packed against the parent article's own Message-ID by
//! stripping the shared prefix and suffix, mirroring `pan/data/parts.cc`.

const CAP: usize = u8::MAX as usize;

/// Shared-prefix/shared-suffix encoding of a part's Message-ID against a
/// reference (the parent article's) Message-ID.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackedMessageId {
    prefix_len: u8,
    suffix_len: u8,
    middle: Box<[u8]>,
}

impl PackedMessageId {
    /// Pack `mid` against `reference`, per the fixed-point algorithm in
    /// `pan/data/parts.cc`: compute the shared prefix length, then the
    /// shared suffix length of what remains, each capped at `u8::MAX`.
    pub fn pack(mid: &str, reference: &str) -> Self {
        let mid_b = mid.as_bytes();
        let ref_b = reference.as_bytes();

        let prefix_len = mid_b
            .iter()
            .zip(ref_b.iter())
            .take(CAP)
            .take_while(|(a, b)| a == b)
            .count();

        let mid_rest = &mid_b[prefix_len..];
        let ref_rest = &ref_b[prefix_len..];
        let suffix_len = mid_rest
            .iter()
            .rev()
            .zip(ref_rest.iter().rev())
            .take(CAP)
            .take_while(|(a, b)| a == b)
            .count();

        let middle_end = mid_b.len() - suffix_len;
        let middle = mid_b[prefix_len..middle_end].to_vec().into_boxed_slice();

        PackedMessageId {
            prefix_len: prefix_len as u8,
            suffix_len: suffix_len as u8,
            middle,
        }
    }

    /// Reconstruct the original Message-ID against `reference`.
    pub fn unpack(&self, reference: &str) -> String {
        let ref_b = reference.as_bytes();
        let b = self.prefix_len as usize;
        let e = self.suffix_len as usize;
        let mut out = Vec::with_capacity(b + self.middle.len() + e);
        out.extend_from_slice(&ref_b[..b.min(ref_b.len())]);
        out.extend_from_slice(&self.middle);
        if e > 0 && e <= ref_b.len() {
            out.extend_from_slice(&ref_b[ref_b.len() - e..]);
        }
        String::from_utf8(out).expect("packed Message-ID bytes must stay valid UTF-8")
    }

    pub fn prefix_len(&self) -> u8 {
        self.prefix_len
    }

    pub fn suffix_len(&self) -> u8 {
        self.suffix_len
    }
}

/// A single numbered part of a multipart article.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Part {
    pub number: u16,
    pub byte_count: u64,
    pub packed_mid: PackedMessageId,
}

/// Compact storage for a multipart article's parts: sorted by `number`,
/// each holding a Message-ID packed against the owning article's own
/// Message-ID.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Parts {
    total: u16,
    parts: Vec<Part>,
}

impl Parts {
    pub fn new(total: u16) -> Self {
        Parts {
            total,
            parts: Vec::new(),
        }
    }

    pub fn total(&self) -> u16 {
        self.total
    }

    pub fn found(&self) -> u16 {
        self.parts.len() as u16
    }

    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    /// Insert a part, keyed against `article_mid`. A duplicate `number` is a
    /// no-op (the first insertion wins), matching `Parts::add_part`.
    pub fn add_part(&mut self, number: u16, mid: &str, byte_count: u64, article_mid: &str) {
        match self.parts.binary_search_by_key(&number, |p| p.number) {
            Ok(_) => {}
            Err(idx) => {
                let packed_mid = PackedMessageId::pack(mid, article_mid);
                self.parts.insert(
                    idx,
                    Part {
                        number,
                        byte_count,
                        packed_mid,
                    },
                );
            }
        }
    }

    pub fn get(&self, number: u16) -> Option<&Part> {
        self.parts
            .binary_search_by_key(&number, |p| p.number)
            .ok()
            .map(|idx| &self.parts[idx])
    }

    pub fn iter(&self) -> impl Iterator<Item = &Part> {
        self.parts.iter()
    }

    /// Every part's Message-ID, unpacked against `article_mid`.
    pub fn message_id_of(&self, number: u16, article_mid: &str) -> Option<String> {
        self.get(number).map(|p| p.packed_mid.unpack(article_mid))
    }

    pub fn total_bytes(&self) -> u64 {
        self.parts.iter().map(|p| p.byte_count).sum()
    }
}

/// Accumulates `(number, mid, bytes)` tuples referenced against a single
/// article Message-ID, then installs them into a `Parts` in one allocation.
/// Mirrors the accumulate-then-install pattern of the original `PartBatch`.
#[derive(Debug, Default)]
pub struct PartBatch {
    article_mid: String,
    total: u16,
    entries: Vec<(u16, String, u64)>,
}

impl PartBatch {
    pub fn new(article_mid: impl Into<String>, total: u16) -> Self {
        PartBatch {
            article_mid: article_mid.into(),
            total,
            entries: Vec::new(),
        }
    }

    /// Add a part. Adding the same number twice keeps the first value.
    pub fn add(&mut self, number: u16, mid: impl Into<String>, byte_count: u64) {
        if self.entries.iter().any(|(n, ..)| *n == number) {
            return;
        }
        self.entries.push((number, mid.into(), byte_count));
    }

    /// Install all accumulated entries into a fresh `Parts`.
    pub fn install(mut self) -> Parts {
        self.entries.sort_by_key(|(n, ..)| *n);
        let mut parts = Parts::new(self.total);
        for (number, mid, bytes) in self.entries {
            parts.add_part(number, &mid, bytes, &self.article_mid);
        }
        parts
    }
}

/// The three possible completeness states for a (possibly multipart)
/// article, per the engine's derived `PartState`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PartState {
    Single,
    Incomplete,
    Complete,
}

/// Compute `PartState` from raw inputs, matching `Article::get_part_state`:
/// a non-binary article, or one with no parts recorded, is `Single`; any
/// missing slot among `total` is `Incomplete`; otherwise `Complete`. A
/// reply-leader subject on a *short* article (line count below 250)
/// downgrades a would-be multipart state back to `Single` — the downgrade
/// is keyed on line count, not subject length, per `get_part_state`/
/// `has_reply_leader` in `pan/data/article.cc`.
pub fn compute_part_state(
    is_binary: bool,
    parts: &Parts,
    subject: &str,
    line_count: u32,
) -> PartState {
    if !is_binary || parts.is_empty() {
        return PartState::Single;
    }
    if has_reply_leader(subject) && line_count < 250 {
        return PartState::Single;
    }
    if parts.found() < parts.total() {
        PartState::Incomplete
    } else {
        PartState::Complete
    }
}

/// Case-insensitive `"Re: "` prefix, length > 4, matching `has_reply_leader`.
pub fn has_reply_leader(subject: &str) -> bool {
    subject.len() > 4 && subject.as_bytes()[..2].eq_ignore_ascii_case(b"re") && {
        let rest = &subject.as_bytes()[2..];
        rest.starts_with(b": ")
    }
}

/// Number of distinct groups a crossposted article's Xref implies, used by
/// `CrosspostCountGe`.
pub fn crosspost_count(xref_target_count: usize) -> usize {
    xref_target_count
}
