//! OpenPGP sign/verify/encrypt for the compose and MIME-assembly crypto
//! paths, ported from `pan/usenet-utils/gpg.{h,cc}` (which shells out to
//! GnuPG). This port uses the `pgp` crate (a pure-Rust OpenPGP
//! implementation) instead of spawning a subprocess, and keeps the crate
//! surface behind the [`OpenPgpSigner`] trait so the rest of the MIME
//! assembly path never names `pgp` types directly — that keeps the
//! blast radius of any API mismatch in this one file.

use pgp::composed::{Deserializable, Message, SignedPublicKey, SignedSecretKey};
use pgp::crypto::hash::HashAlgorithm;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CryptoError {
    #[error("OpenPGP error: {0}")]
    Pgp(String),

    #[error("no secret key available for signing")]
    NoSecretKey,

    #[error("no public key available for the given recipient")]
    NoRecipientKey,
}

pub type CryptoResult<T> = Result<T, CryptoError>;

/// Sign/verify/encrypt over raw MIME-part bytes. Implementations own key
/// material; this crate ships [`OpenPgpSigner`] backed by the `pgp`
/// crate.
pub trait SignVerifyEncrypt: Send + Sync {
    fn sign(&self, data: &[u8]) -> CryptoResult<Vec<u8>>;
    fn verify(&self, data: &[u8], signature: &[u8]) -> CryptoResult<bool>;
    fn encrypt(&self, data: &[u8], recipient_armored_public_key: &str) -> CryptoResult<Vec<u8>>;
}

/// `pgp`-crate-backed implementation holding one ASCII-armored secret key
/// used for both signing and self-verification.
pub struct OpenPgpSigner {
    secret_key: Option<SignedSecretKey>,
    public_key: Option<SignedPublicKey>,
}

impl OpenPgpSigner {
    pub fn from_armored_secret_key(armored: &str) -> CryptoResult<Self> {
        let (secret_key, _headers) =
            SignedSecretKey::from_string(armored).map_err(|e| CryptoError::Pgp(e.to_string()))?;
        Ok(OpenPgpSigner {
            secret_key: Some(secret_key),
            public_key: None,
        })
    }

    pub fn from_armored_public_key(armored: &str) -> CryptoResult<Self> {
        let (public_key, _headers) =
            SignedPublicKey::from_string(armored).map_err(|e| CryptoError::Pgp(e.to_string()))?;
        Ok(OpenPgpSigner {
            secret_key: None,
            public_key: Some(public_key),
        })
    }
}

impl SignVerifyEncrypt for OpenPgpSigner {
    fn sign(&self, data: &[u8]) -> CryptoResult<Vec<u8>> {
        let key = self.secret_key.as_ref().ok_or(CryptoError::NoSecretKey)?;
        let message = Message::new_literal_bytes("", data);
        let signed = message
            .sign(key, Default::default(), HashAlgorithm::SHA2_256)
            .map_err(|e| CryptoError::Pgp(e.to_string()))?;
        signed
            .to_armored_bytes(None.into())
            .map_err(|e| CryptoError::Pgp(e.to_string()))
    }

    fn verify(&self, data: &[u8], signature: &[u8]) -> CryptoResult<bool> {
        let public = self
            .public_key
            .as_ref()
            .ok_or(CryptoError::NoRecipientKey)?;
        let (message, _) = Message::from_armor(signature).map_err(|e| CryptoError::Pgp(e.to_string()))?;
        match message.verify(public) {
            Ok(()) => Ok(message.get_content().ok().flatten().as_deref() == Some(data)),
            Err(_) => Ok(false),
        }
    }

    fn encrypt(&self, data: &[u8], recipient_armored_public_key: &str) -> CryptoResult<Vec<u8>> {
        let (recipient, _) = SignedPublicKey::from_string(recipient_armored_public_key)
            .map_err(|e| CryptoError::Pgp(e.to_string()))?;
        let message = Message::new_literal_bytes("", data);
        let encrypted = message
            .encrypt_to_keys_seipdv1(
                &mut rand::thread_rng(),
                Default::default(),
                &[&recipient],
            )
            .map_err(|e| CryptoError::Pgp(e.to_string()))?;
        encrypted
            .to_armored_bytes(None.into())
            .map_err(|e| CryptoError::Pgp(e.to_string()))
    }
}
