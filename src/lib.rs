#![doc = include_str!("../README.md")]

/// RFC 5536 Article Format
pub mod article;
/// Disk-backed article-body cache
pub mod article_cache;
/// Live, threaded, filtered projection over the article store
pub mod articletree;
/// X.509 certificate pinning store
pub mod certstore;
mod client;
mod config;
/// Disk-backed encode cache for outgoing attachments
pub mod encode_cache;
/// RFC 2047 Encoded Words support for international headers
pub mod encoded_words;
mod error;
/// Predicate tree over articles (slrn-style filters)
pub mod filter;
/// GNKSA posting-hygiene checks and Usenet identifier utilities
pub mod gnksa;
/// SQL compilation and in-memory evaluation of FilterInfo
pub mod headerfilter;
/// Pre-post sanity checks for composed articles
pub mod messagecheck;
/// MIME assembly: message tree, embedded yEnc/UU recovery, OpenPGP
pub mod mime;
/// Packed Message-ID multipart bookkeeping
pub mod parts;
/// Interned, O(1)-comparable string identity
pub mod quark;
mod response;
/// slrn-compatible scorefile parser
pub mod scorefile;
/// Usenet text manipulation: quoting, fill/unfill, rot13, subject-to-path
pub mod textmassager;
/// RFC 5536 Article validation utilities
pub mod validation;
/// Bounded background-task pool with cancellation
pub mod workerpool;
/// Per-server cross-reference sets
pub mod xref;
/// yEnc binary encoding/decoding for Usenet
pub mod yenc;

pub use article::{parse_article, parse_headers, Article, ArticleBuilder, ControlMessage, Headers};
pub use client::NntpClient;
pub use config::ServerConfig;
pub use error::{NntpError, Result};
pub use response::{
    codes, parse_response_line, parse_single_response, NntpBinaryResponse, NntpResponse,
};
pub use validation::{
    parse_date, validate_date, validate_message_id, validate_newsgroup_name, ValidationConfig,
};
pub use yenc::{
    decode as yenc_decode, encode as yenc_encode, YencDecoded, YencEnd, YencHeader,
    YencMultipartAssembler, YencPart,
};

pub use article_cache::{ArticleCache, ArticleCacheListener, CacheError, CacheResult};
pub use articletree::{ArticleTree, Diffs, NodeIndex, ShowType, TreeNode};
pub use certstore::{CertError, CertStore, ChainErrorKind, PinningCertVerifier};
pub use encode_cache::{EncodeCache, EncodeCacheListener};
pub use filter::{FilterInfo, MatchKind, TextMatch};
pub use gnksa::{GnksaError, GnksaResult};
pub use headerfilter::{compile as compile_filter, evaluate as evaluate_filter, ArticleFacts, CompiledQuery, SqlCond, SqlValue};
pub use messagecheck::{message_check, ComposedMessage, Goodness};
pub use mime::{compose_multipart, scan_for_embedded_binaries, ComposeOptions, MimeError, MimePart};
pub use parts::{Part, PartBatch, PartState, Parts};
pub use quark::Quark;
pub use scorefile::{score_article, ScoreBand, Scorefile, ScorefileError};
pub use textmassager::TextMassager;
pub use workerpool::{CancelToken, WorkerPool};
pub use xref::Xref;
