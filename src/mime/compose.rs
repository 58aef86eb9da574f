//! Builds a post-ready [`MimePart`] tree from compose-time inputs:
//! subject/body/headers, optional attachments, and an optional signer.
//!
//! Ported from the message-construction half of
//! `pan/usenet-utils/mime-utils.cc` (`mime::construct_message`).

use super::crypto::SignVerifyEncrypt;
use super::tree::{Encoding, MimePart};
use crate::gnksa;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default)]
pub struct Attachment {
    pub filename: String,
    pub content_type: String,
    pub data: Vec<u8>,
}

#[derive(Debug, Clone, Default)]
pub struct ComposeOptions {
    pub subject: String,
    pub from: String,
    pub newsgroups: Vec<String>,
    pub references: Vec<String>,
    pub body: String,
    pub attachments: Vec<Attachment>,
    pub domain_for_message_id: String,
}

fn base_headers(opts: &ComposeOptions, message_id: &str) -> BTreeMap<String, String> {
    let mut headers = BTreeMap::new();
    headers.insert("Subject".to_string(), opts.subject.clone());
    headers.insert("From".to_string(), opts.from.clone());
    headers.insert("Newsgroups".to_string(), opts.newsgroups.join(","));
    headers.insert("Message-ID".to_string(), message_id.to_string());
    if !opts.references.is_empty() {
        let joined = opts.references.join(" ");
        let trimmed = gnksa::trim_references(&joined, gnksa::DEFAULT_TRIM_CUTOFF);
        headers.insert("References".to_string(), trimmed);
    }
    headers
}

/// Build the MIME tree: a plain-text leaf if there are no attachments, or
/// a `multipart/mixed` of the text part plus one leaf per attachment
/// otherwise. Optionally signs the rendered bytes and wraps the result in
/// a `multipart/signed` envelope (RFC 3156-style), mirroring the
/// original's PGP/MIME path.
pub fn compose_multipart(
    opts: &ComposeOptions,
    usec: u64,
    rand_words: [u32; 3],
    signer: Option<&dyn SignVerifyEncrypt>,
) -> super::tree::MimeResult<MimePart> {
    let message_id = gnksa::generate_message_id(&opts.domain_for_message_id, usec, rand_words);
    let headers = base_headers(opts, &message_id);

    let text_part = MimePart::text_leaf(BTreeMap::new(), &opts.body);
    let body = if opts.attachments.is_empty() {
        let mut part = text_part;
        if let MimePart::Leaf { headers: h, .. } = &mut part {
            *h = headers.clone();
        }
        part
    } else {
        let mut children = vec![text_part];
        for att in &opts.attachments {
            children.push(MimePart::binary_leaf(
                attachment_headers(&att.filename),
                att.content_type.clone(),
                Encoding::YEnc,
                att.data.clone(),
            ));
        }
        let mut mp = MimePart::multipart(BTreeMap::new(), "mixed", "pan-boundary", children)?;
        if let MimePart::Multipart { headers: h, .. } = &mut mp {
            *h = headers.clone();
        }
        mp
    };

    let Some(signer) = signer else {
        return Ok(body);
    };

    let rendered = body.render();
    let signature = signer
        .sign(&rendered)
        .map_err(|_| super::tree::MimeError::BadContentType("signing failed".into()))?;
    let sig_part = MimePart::binary_leaf(
        BTreeMap::new(),
        "application/pgp-signature",
        Encoding::SevenBit,
        signature,
    );
    let mut signed = MimePart::multipart(headers, "signed", "pan-sig-boundary", vec![body, sig_part])?;
    if let MimePart::Multipart { subtype, .. } = &mut signed {
        *subtype = "signed".to_string();
    }
    Ok(signed)
}

fn attachment_headers(filename: &str) -> BTreeMap<String, String> {
    let mut h = BTreeMap::new();
    h.insert(
        "Content-Disposition".to_string(),
        format!("attachment; filename=\"{filename}\""),
    );
    h
}
