//! Usenet text manipulation: quoting, fill/unfill, rot13, subject-to-path.
//!
//! Ported from `pan/usenet-utils/text-massager.{h,cc}`.

use std::collections::HashSet;

const DEFAULT_WRAP_COLUMN: usize = 74;

#[derive(Debug, Clone)]
pub struct TextMassager {
    wrap_column: usize,
    quote_characters: HashSet<char>,
}

impl Default for TextMassager {
    fn default() -> Self {
        TextMassager {
            wrap_column: DEFAULT_WRAP_COLUMN,
            quote_characters: HashSet::from(['>']),
        }
    }
}

impl TextMassager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_wrap_column(&self) -> usize {
        self.wrap_column
    }

    pub fn set_wrap_column(&mut self, column: usize) {
        self.wrap_column = column;
    }

    pub fn set_quote_characters(&mut self, chars: HashSet<char>) {
        self.quote_characters = chars;
    }

    pub fn get_quote_characters(&self) -> HashSet<char> {
        self.quote_characters.clone()
    }

    /// `codepoint` outside `[0, 255)` is never a quote character, matching
    /// the original implementation's `unsigned char`-sized lookup table.
    pub fn is_quote_character(&self, codepoint: u32) -> bool {
        if codepoint >= 255 {
            return false;
        }
        char::from_u32(codepoint)
            .map(|c| self.quote_characters.contains(&c))
            .unwrap_or(false)
    }

    /// `rot13` in place over ASCII letters; all other bytes are untouched.
    pub fn rot13_inplace(text: &mut [u8]) {
        for b in text.iter_mut() {
            *b = match *b {
                b'a'..=b'z' => b'a' + (*b - b'a' + 13) % 26,
                b'A'..=b'Z' => b'A' + (*b - b'A' + 13) % 26,
                other => other,
            };
        }
    }

    pub fn rot13(text: &str) -> String {
        let mut bytes = text.as_bytes().to_vec();
        Self::rot13_inplace(&mut bytes);
        String::from_utf8(bytes).unwrap_or_default()
    }

    /// Collapse each maximal run of lines whose first character is a quote
    /// character into a single `"> [quoted text muted]"` line.
    pub fn mute_quotes(&self, text: &str) -> String {
        let mut out = Vec::new();
        let mut in_quote_run = false;
        for line in text.split('\n') {
            let is_quoted = line
                .chars()
                .next()
                .map(|c| self.is_quote_character(c as u32))
                .unwrap_or(false);
            if is_quoted {
                if !in_quote_run {
                    out.push("> [quoted text muted]".to_string());
                    in_quote_run = true;
                }
            } else {
                out.push(line.to_string());
                in_quote_run = false;
            }
        }
        out.join("\n")
    }

    fn leader_len(&self, line: &str) -> usize {
        line.chars()
            .take_while(|&c| c == ' ' || self.is_quote_character(c as u32))
            .map(char::len_utf8)
            .sum()
    }

    /// Wrap `body` at `self.wrap_column`, preserving quote-leader prefixes
    /// and excluding a trailing signature block (from `"\n-- \n"` onward)
    /// from wrapping.
    pub fn fill(&self, body: &str, flowed: bool) -> String {
        let (main, sig) = match body.find("\n-- \n") {
            Some(idx) => (&body[..idx + 1], Some(&body[idx + 1..])),
            None => (body, None),
        };

        let mut paragraphs: Vec<(String, Vec<String>)> = Vec::new();
        for line in main.split('\n') {
            let leader_len = self.leader_len(line);
            let leader = line[..leader_len].to_string();
            let content = line[leader_len..].to_string();

            let continues_prev = paragraphs
                .last()
                .map(|(prev_leader, words)| {
                    if prev_leader != &leader {
                        return false;
                    }
                    if flowed {
                        // RFC 3676: a trailing space on the previous raw line
                        // continues. We only keep rendered words, so treat
                        // any non-empty previous paragraph as continuable.
                        !words.is_empty()
                    } else {
                        !words.is_empty()
                            && !words.last().map(|w: &String| {
                                w.ends_with(['.', '!', '?', ':'])
                            }).unwrap_or(false)
                    }
                })
                .unwrap_or(false);

            if continues_prev && !content.trim().is_empty() {
                paragraphs
                    .last_mut()
                    .unwrap()
                    .1
                    .extend(content.split_whitespace().map(str::to_string));
            } else {
                paragraphs.push((
                    leader,
                    content.split_whitespace().map(str::to_string).collect(),
                ));
            }
        }

        let mut out = String::new();
        for (leader, words) in paragraphs {
            if words.is_empty() {
                out.push_str(&leader);
                out.push('\n');
                continue;
            }
            let avail = self.wrap_column.saturating_sub(leader.len()).max(1);
            let mut cur_line = String::new();
            for word in words {
                if !cur_line.is_empty() && cur_line.len() + 1 + word.len() > avail {
                    out.push_str(&leader);
                    out.push_str(&cur_line);
                    out.push('\n');
                    cur_line.clear();
                }
                if !cur_line.is_empty() {
                    cur_line.push(' ');
                }
                cur_line.push_str(&word);
            }
            if !cur_line.is_empty() {
                out.push_str(&leader);
                out.push_str(&cur_line);
                out.push('\n');
            }
        }

        if let Some(sig) = sig {
            out.push_str(sig);
        }
        out
    }

    /// Normalize a Usenet subject into a filesystem-safe stem: strips
    /// bracketed part counts `(n/m)`, quoted/bare filenames with a
    /// recognized extension, byte-count annotations like `685k`, and
    /// illegal filesystem characters, then collapses whitespace/`_`/`-`
    /// runs into `separator`.
    pub fn subject_to_path(subject: &str, separator: &str) -> String {
        let part_count_re = regex::Regex::new(r"\(\s*\d+\s*/\s*\d+\s*\)").unwrap();
        let filename_re = regex::Regex::new(
            r#""[^"]+\.(jpg|jpeg|gif|png|zip|rar|par2?|nfo|txt|avi|mpg|mp3)"|\b[\w.-]+\.(jpg|jpeg|gif|png|zip|rar|par2?|nfo|txt|avi|mpg|mp3)\b"#,
        )
        .unwrap();
        let byte_count_re = regex::Regex::new(r"(?i)\b\d+(\.\d+)?[kmg]b?\b").unwrap();
        // Matches the original's `[\\/<>|*?'".\s]+`: illegal filesystem
        // characters plus '.' and whitespace, collapsed into `separator`.
        let illegal_re = regex::Regex::new(r#"[\\/<>|*?'".\s]+"#).unwrap();

        let mut s = subject.to_string();
        s = part_count_re.replace_all(&s, "").to_string();
        s = filename_re.replace_all(&s, "").to_string();
        s = byte_count_re.replace_all(&s, "").to_string();
        s = illegal_re.replace_all(&s, separator).to_string();
        s.trim_matches(|c: char| separator.contains(c)).to_string()
    }

    /// Expand an attachment-save-path template.
    pub fn expand_attachment_path(
        template: &str,
        group: &str,
        subject_path: &str,
        full_subject_path: &str,
        author_name: &str,
        author_email: &str,
        posted_date: &str,
    ) -> String {
        let mut out = String::with_capacity(template.len());
        let mut chars = template.chars().peekable();
        while let Some(c) = chars.next() {
            if c != '%' {
                out.push(c);
                continue;
            }
            match chars.next() {
                Some('g') => out.push_str(group),
                Some('G') => out.push_str(&group.replace('.', std::path::MAIN_SEPARATOR_STR)),
                Some('s') => out.push_str(subject_path),
                Some('S') => out.push_str(full_subject_path),
                Some('n') => out.push_str(author_name),
                Some('e') => out.push_str(author_email),
                Some('d') => out.push_str(posted_date),
                Some(other) => {
                    out.push('%');
                    out.push(other);
                }
                None => out.push('%'),
            }
        }
        out
    }
}
