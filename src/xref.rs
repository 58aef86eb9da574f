//! Per-server cross-reference sets, mirroring `pan/data/xref.h` / `xref.cc`.

use crate::quark::Quark;

/// A single `(server, group, number)` cross-reference target. Ordering
/// compares `server` then `group` only — `number` is payload, not part of
/// the sort key, matching `Xref::Target::operator<`.
#[derive(Debug, Clone)]
pub struct Target {
    pub server: Quark,
    pub group: Quark,
    pub number: u64,
}

fn key_cmp(a: &Target, b: &Target) -> std::cmp::Ordering {
    (&a.server, &a.group).cmp(&(&b.server, &b.group))
}

/// A sorted vector of cross-reference targets. No two entries may share the
/// same `(server, group)`.
#[derive(Debug, Clone, Default)]
pub struct Xref {
    targets: Vec<Target>,
}

impl Xref {
    pub fn new() -> Self {
        Xref::default()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Target> {
        self.targets.iter()
    }

    /// Parse a raw `Xref:` header value (with or without the leading
    /// `Xref: ` token) and insert every well-formed `group:number` token
    /// for `server`, skipping malformed tokens silently. Re-sorts
    /// (stably) once after the batch.
    pub fn insert(&mut self, server: &str, raw_line: &str) {
        let server = Quark::new(server);
        let body = raw_line
            .strip_prefix("Xref: ")
            .or_else(|| raw_line.strip_prefix("Xref:"))
            .unwrap_or(raw_line);

        let mut tokens = body.split_whitespace().peekable();
        // The source server/host token (e.g. "news.example.com") sometimes
        // leads the value; skip a token with no ':' in it when one exists.
        if let Some(first) = tokens.peek() {
            if !first.contains(':') {
                tokens.next();
            }
        }

        for token in tokens {
            let Some((group, number_str)) = token.rsplit_once(':') else {
                continue;
            };
            if group.is_empty() {
                continue;
            }
            let Ok(number) = number_str.parse::<u64>() else {
                continue;
            };
            self.insert_one(server.clone(), Quark::new(group), number);
        }
    }

    fn insert_one(&mut self, server: Quark, group: Quark, number: u64) {
        let candidate = Target {
            server,
            group,
            number,
        };
        match self
            .targets
            .binary_search_by(|existing| key_cmp(existing, &candidate))
        {
            Ok(idx) => self.targets[idx] = candidate,
            Err(idx) => self.targets.insert(idx, candidate),
        }
    }

    /// Binary search using the server-only prefix of the sort key.
    pub fn has_server(&self, server: &str) -> bool {
        let server = Quark::new(server);
        self.targets
            .binary_search_by(|t| t.server.cmp(&server))
            .is_ok()
    }

    pub fn find_number(&self, server: &str, group: &str) -> Option<u64> {
        let server = Quark::new(server);
        let group = Quark::new(group);
        self.targets
            .binary_search_by(|t| (&t.server, &t.group).cmp(&(&server, &group)))
            .ok()
            .map(|idx| self.targets[idx].number)
    }

    pub fn find(&self, server: &str, group: &str) -> Option<&Target> {
        let server = Quark::new(server);
        let group = Quark::new(group);
        self.targets
            .binary_search_by(|t| (&t.server, &t.group).cmp(&(&server, &group)))
            .ok()
            .map(|idx| &self.targets[idx])
    }

    /// Remove all targets for `server` (linear filter-rebuild).
    pub fn remove_server(&mut self, server: &str) {
        let server = Quark::new(server);
        self.targets.retain(|t| t.server != server);
    }

    /// Remove targets for `(server, group)` whose number is below `n`.
    pub fn remove_targets_less_than(&mut self, server: &str, group: &str, n: u64) {
        let server = Quark::new(server);
        let group = Quark::new(group);
        self.targets
            .retain(|t| !(t.server == server && t.group == group && t.number < n));
    }

    /// Number of distinct groups referenced — used for `CrosspostCountGe`.
    pub fn crosspost_count(&self) -> usize {
        self.targets.len()
    }

    fn is_sorted_and_unique(&self) -> bool {
        self.targets.windows(2).all(|w| {
            let ord = key_cmp(&w[0], &w[1]);
            ord == std::cmp::Ordering::Less
        })
    }
}
