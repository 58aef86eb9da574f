//! The message tree itself: an algebraic data type standing in for
//! `GMimeMessage`, with its own flattening encoder and header accessors.

use std::collections::BTreeMap;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum MimeError {
    #[error("missing required header: {0}")]
    MissingHeader(&'static str),

    #[error("malformed content-type: {0}")]
    BadContentType(String),

    #[error("empty multipart body")]
    EmptyMultipart,
}

pub type MimeResult<T> = Result<T, MimeError>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Encoding {
    SevenBit,
    EightBit,
    Base64,
    YEnc,
    UuEncode,
}

/// A MIME node. `Leaf` carries opaque bytes with a content-type/encoding;
/// `Multipart` carries an ordered list of children under one of the
/// standard multipart subtypes (`mixed`, `signed`, `encrypted`).
#[derive(Debug, Clone)]
pub enum MimePart {
    Leaf {
        headers: BTreeMap<String, String>,
        content_type: String,
        encoding: Encoding,
        body: Vec<u8>,
    },
    Multipart {
        headers: BTreeMap<String, String>,
        subtype: String,
        boundary: String,
        children: Vec<MimePart>,
    },
}

impl MimePart {
    pub fn text_leaf(headers: BTreeMap<String, String>, text: &str) -> Self {
        MimePart::Leaf {
            headers,
            content_type: "text/plain; charset=utf-8".to_string(),
            encoding: Encoding::EightBit,
            body: text.as_bytes().to_vec(),
        }
    }

    pub fn binary_leaf(
        headers: BTreeMap<String, String>,
        content_type: impl Into<String>,
        encoding: Encoding,
        body: Vec<u8>,
    ) -> Self {
        MimePart::Leaf {
            headers,
            content_type: content_type.into(),
            encoding,
            body,
        }
    }

    pub fn multipart(
        headers: BTreeMap<String, String>,
        subtype: impl Into<String>,
        boundary: impl Into<String>,
        children: Vec<MimePart>,
    ) -> MimeResult<Self> {
        if children.is_empty() {
            return Err(MimeError::EmptyMultipart);
        }
        Ok(MimePart::Multipart {
            headers,
            subtype: subtype.into(),
            boundary: boundary.into(),
            children,
        })
    }

    pub fn headers(&self) -> &BTreeMap<String, String> {
        match self {
            MimePart::Leaf { headers, .. } => headers,
            MimePart::Multipart { headers, .. } => headers,
        }
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers()
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn require_header(&self, name: &'static str) -> MimeResult<&str> {
        self.header(name).ok_or(MimeError::MissingHeader(name))
    }

    /// Flatten the tree into an RFC 5322-ish byte stream: top-level
    /// headers, a blank line, then the body (recursing into children with
    /// `--boundary--` delimiters for multiparts).
    pub fn render(&self) -> Vec<u8> {
        let mut out = Vec::new();
        self.render_into(&mut out, true);
        out
    }

    fn render_into(&self, out: &mut Vec<u8>, top_level: bool) {
        for (k, v) in self.headers() {
            out.extend_from_slice(k.as_bytes());
            out.extend_from_slice(b": ");
            out.extend_from_slice(v.as_bytes());
            out.extend_from_slice(b"\r\n");
        }
        match self {
            MimePart::Leaf {
                content_type,
                encoding,
                body,
                ..
            } => {
                out.extend_from_slice(b"Content-Type: ");
                out.extend_from_slice(content_type.as_bytes());
                out.extend_from_slice(b"\r\n");
                out.extend_from_slice(b"Content-Transfer-Encoding: ");
                out.extend_from_slice(encoding_name(encoding).as_bytes());
                out.extend_from_slice(b"\r\n\r\n");
                out.extend_from_slice(body);
                if top_level {
                    out.extend_from_slice(b"\r\n");
                }
            }
            MimePart::Multipart {
                subtype,
                boundary,
                children,
                ..
            } => {
                out.extend_from_slice(b"Content-Type: multipart/");
                out.extend_from_slice(subtype.as_bytes());
                out.extend_from_slice(b"; boundary=\"");
                out.extend_from_slice(boundary.as_bytes());
                out.extend_from_slice(b"\"\r\n\r\n");
                for child in children {
                    out.extend_from_slice(b"--");
                    out.extend_from_slice(boundary.as_bytes());
                    out.extend_from_slice(b"\r\n");
                    child.render_into(out, false);
                    out.extend_from_slice(b"\r\n");
                }
                out.extend_from_slice(b"--");
                out.extend_from_slice(boundary.as_bytes());
                out.extend_from_slice(b"--\r\n");
            }
        }
    }
}

fn encoding_name(e: &Encoding) -> &'static str {
    match e {
        Encoding::SevenBit => "7bit",
        Encoding::EightBit => "8bit",
        Encoding::Base64 => "base64",
        Encoding::YEnc => "x-yenc",
        Encoding::UuEncode => "x-uuencode",
    }
}
