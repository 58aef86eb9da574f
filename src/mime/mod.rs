//! MIME assembly: an in-repo algebraic message tree, embedded yEnc/UU
//! recovery, and optional OpenPGP sign/encrypt.
//!
//! Ported from `pan/usenet-utils/mime-utils.{h,cc}` and
//! `pan/usenet-utils/gpg.{h,cc}`. The original builds and walks
//! `GMimeMessage` trees via gmime; rather than bind a gmime-equivalent
//! crate whose API surface can't be verified here, the tree is expressed
//! as a plain Rust ADT with its own encoder, per the project's MIME
//! design notes.

mod compose;
mod crypto;
mod scan;
mod tree;

pub use compose::{compose_multipart, ComposeOptions};
pub use crypto::{CryptoError, CryptoResult, OpenPgpSigner};
pub use scan::{scan_for_embedded_binaries, EmbeddedBinary, EmbeddedEncoding};
pub use tree::{MimeError, MimePart, MimeResult};
