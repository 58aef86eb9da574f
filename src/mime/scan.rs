//! Line-by-line scan that separates embedded yEnc/UU-encoded binary runs
//! from the surrounding plain text within one article body, matching the
//! original's "checking each line to separate the encoded stuff from
//! text" approach to Usenet's loose binary-posting conventions.

use crate::yenc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmbeddedEncoding {
    YEnc,
    UuEncode,
}

#[derive(Debug, Clone)]
pub struct EmbeddedBinary {
    pub encoding: EmbeddedEncoding,
    pub filename: Option<String>,
    pub data: Vec<u8>,
    pub start_line: usize,
    pub end_line: usize,
}

/// Scan `body` for one or more embedded yEnc or uuencoded binary blocks.
/// Text outside any detected block is ignored by this pass — callers
/// combine it with the returned line ranges to reconstruct a plain-text
/// remainder.
pub fn scan_for_embedded_binaries(body: &str) -> Vec<EmbeddedBinary> {
    let lines: Vec<&str> = body.lines().collect();
    let mut out = Vec::new();
    let mut i = 0;
    while i < lines.len() {
        if lines[i].starts_with("=ybegin") {
            if let Some((binary, next)) = scan_yenc_block(&lines, i) {
                out.push(binary);
                i = next;
                continue;
            }
        } else if lines[i].starts_with("begin ") {
            if let Some((binary, next)) = scan_uu_block(&lines, i) {
                out.push(binary);
                i = next;
                continue;
            }
        }
        i += 1;
    }
    out
}

fn scan_yenc_block(lines: &[&str], start: usize) -> Option<(EmbeddedBinary, usize)> {
    let end_idx = (start..lines.len()).find(|&i| lines[i].starts_with("=yend"))?;
    let mut raw = String::new();
    for line in &lines[start..=end_idx] {
        raw.push_str(line);
        raw.push_str("\r\n");
    }
    let decoded = yenc::decode(raw.as_bytes()).ok()?;
    Some((
        EmbeddedBinary {
            encoding: EmbeddedEncoding::YEnc,
            filename: Some(decoded.header.name.clone()),
            data: decoded.data,
            start_line: start,
            end_line: end_idx,
        },
        end_idx + 1,
    ))
}

fn scan_uu_block(lines: &[&str], start: usize) -> Option<(EmbeddedBinary, usize)> {
    let header = lines[start];
    let filename = header
        .splitn(3, ' ')
        .nth(2)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string);

    let end_idx = (start + 1..lines.len()).find(|&i| lines[i].trim() == "end")?;
    let mut data = Vec::new();
    for line in &lines[start + 1..end_idx] {
        if line.is_empty() || line == "`" {
            continue;
        }
        if let Some(decoded) = uudecode_line(line) {
            data.extend(decoded);
        }
    }
    Some((
        EmbeddedBinary {
            encoding: EmbeddedEncoding::UuEncode,
            filename,
            data,
            start_line: start,
            end_line: end_idx,
        },
        end_idx + 1,
    ))
}

/// Decode one uuencoded line: first char encodes the byte count, the rest
/// are 4-character groups of 6-bit values offset by `0x20`.
fn uudecode_line(line: &str) -> Option<Vec<u8>> {
    let bytes = line.as_bytes();
    let count = (bytes.first().copied()? as i32 - 0x20) & 0x3F;
    if count == 0 {
        return Some(Vec::new());
    }
    let mut out = Vec::with_capacity(count as usize);
    let mut chunk = [0u8; 4];
    let payload = &bytes[1..];
    for group in payload.chunks(4) {
        for (i, &b) in group.iter().enumerate() {
            chunk[i] = (b.wrapping_sub(0x20)) & 0x3F;
        }
        out.push((chunk[0] << 2) | (chunk[1] >> 4));
        out.push((chunk[1] << 4) | (chunk[2] >> 2));
        out.push((chunk[2] << 6) | chunk[3]);
    }
    out.truncate(count as usize);
    Some(out)
}
