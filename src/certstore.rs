//! X.509 certificate pinning store layered on top of `rustls`'s
//! certificate verification, ported from `pan/data/cert-store.{h,cc}` and
//! `pan/data-impl/cert-store.cc`.
//!
//! The original keeps a per-server `X509*` pin, a blacklist of rejected
//! certs, and an OpenSSL `verify_callback` that lets a handful of chain
//! errors (self-signed, expired, hostname mismatch) through to the user
//! as a dialog prompt instead of a hard failure. This port expresses the
//! same idea as a [`rustls::client::danger::ServerCertVerifier`] plus an
//! explicit whitelist of [`ChainErrorKind`]s the caller has chosen to
//! tolerate (the prompt itself lives above this crate).

use crate::quark::Quark;
use sha2::{Digest, Sha256};
use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::sync::{Arc, Mutex, RwLock};
use thiserror::Error;
use tokio_rustls::rustls::client::danger::{
    HandshakeSignatureValid, ServerCertVerified, ServerCertVerifier,
};
use tokio_rustls::rustls::client::WebPkiServerVerifier;
use tokio_rustls::rustls::pki_types::{CertificateDer, ServerName, UnixTime};
use tokio_rustls::rustls::{DigitallySignedStruct, Error as RustlsError, RootCertStore, SignatureScheme};
use tracing::{debug, warn};

#[derive(Error, Debug)]
pub enum CertError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed pin store line: {0:?}")]
    MalformedLine(String),
}

pub type CertResult<T> = Result<T, CertError>;

/// Chain-validation failure categories the UI layer may choose to
/// tolerate with a confirmation prompt, mirroring the subset of OpenSSL
/// `X509_V_ERR_*` codes the original `verify_callback` whitelists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChainErrorKind {
    SelfSigned,
    Expired,
    NotYetValid,
    HostnameMismatch,
    UnknownIssuer,
    Other,
}

fn fingerprint(der: &CertificateDer<'_>) -> String {
    let digest = Sha256::digest(der.as_ref());
    digest.iter().map(|b| format!("{b:02x}")).collect()
}

/// Pinned certs (by server), a blacklist of rejected fingerprints, and a
/// bounded LIFO session cache, matching `CertStore`'s `_certs`,
/// `_blacklist` and `_sessions` members.
pub struct CertStore {
    pinned: RwLock<HashMap<Quark, String>>,
    blacklist: RwLock<HashSet<String>>,
    sessions: Mutex<Vec<Quark>>,
    max_sessions: usize,
    whitelist: HashSet<ChainErrorKind>,
}

impl CertStore {
    pub fn new(whitelist: HashSet<ChainErrorKind>) -> Self {
        CertStore {
            pinned: RwLock::new(HashMap::new()),
            blacklist: RwLock::new(HashSet::new()),
            sessions: Mutex::new(Vec::new()),
            max_sessions: 32,
            whitelist,
        }
    }

    pub fn add_cert(&self, server: &str, der: &CertificateDer<'_>) {
        self.pinned
            .write()
            .unwrap()
            .insert(Quark::new(server), fingerprint(der));
    }

    pub fn cert_for_server(&self, server: &str) -> Option<String> {
        self.pinned
            .read()
            .unwrap()
            .get(&Quark::new(server))
            .cloned()
    }

    pub fn remove_cert(&self, server: &str) {
        self.pinned.write().unwrap().remove(&Quark::new(server));
    }

    pub fn blacklist_cert(&self, der: &CertificateDer<'_>) {
        self.blacklist.write().unwrap().insert(fingerprint(der));
    }

    pub fn in_blacklist(&self, der: &CertificateDer<'_>) -> bool {
        self.blacklist.read().unwrap().contains(&fingerprint(der))
    }

    /// Whether `kind` is pre-approved to pass through without prompting.
    pub fn tolerates(&self, kind: ChainErrorKind) -> bool {
        self.whitelist.contains(&kind)
    }

    pub fn add_session(&self, server: &str) {
        let mut sessions = self.sessions.lock().unwrap();
        sessions.push(Quark::new(server));
        if sessions.len() > self.max_sessions {
            sessions.remove(0);
        }
    }

    pub fn has_session(&self, server: &str) -> bool {
        self.sessions.lock().unwrap().contains(&Quark::new(server))
    }

    /// Persist pinned certs as `server<TAB>sha256hex` lines.
    pub fn save(&self, path: impl AsRef<Path>) -> CertResult<()> {
        let pinned = self.pinned.read().unwrap();
        let mut out = String::new();
        for (server, fp) in pinned.iter() {
            out.push_str(server.as_str());
            out.push('\t');
            out.push_str(fp);
            out.push('\n');
        }
        std::fs::write(path, out)?;
        Ok(())
    }

    pub fn load(&self, path: impl AsRef<Path>) -> CertResult<()> {
        let text = std::fs::read_to_string(path)?;
        let mut pinned = self.pinned.write().unwrap();
        for line in text.lines() {
            if line.trim().is_empty() {
                continue;
            }
            let (server, fp) = line
                .split_once('\t')
                .ok_or_else(|| CertError::MalformedLine(line.to_string()))?;
            pinned.insert(Quark::new(server), fp.to_string());
        }
        Ok(())
    }
}

/// Verifies a server's certificate chain against either its pinned
/// fingerprint (exact match, no further chain validation needed — the
/// point of pinning) or, absent a pin, the standard webpki chain against
/// `roots`.
pub struct PinningCertVerifier {
    store: Arc<CertStore>,
    inner: Arc<WebPkiServerVerifier>,
}

impl PinningCertVerifier {
    pub fn new(store: Arc<CertStore>, roots: Arc<RootCertStore>) -> Result<Self, RustlsError> {
        let inner = WebPkiServerVerifier::builder(roots)
            .build()
            .map_err(|e| RustlsError::General(e.to_string()))?;
        Ok(PinningCertVerifier { store, inner })
    }
}

impl std::fmt::Debug for PinningCertVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PinningCertVerifier").finish()
    }
}

impl ServerCertVerifier for PinningCertVerifier {
    fn verify_server_cert(
        &self,
        end_entity: &CertificateDer<'_>,
        intermediates: &[CertificateDer<'_>],
        server_name: &ServerName<'_>,
        ocsp_response: &[u8],
        now: UnixTime,
    ) -> Result<ServerCertVerified, RustlsError> {
        if self.store.in_blacklist(end_entity) {
            warn!("rejecting blacklisted certificate");
            return Err(RustlsError::General("certificate is blacklisted".into()));
        }

        let server = server_name_str(server_name);
        if let Some(pinned_fp) = self.store.cert_for_server(&server) {
            return if pinned_fp == fingerprint(end_entity) {
                debug!(server = %server, "certificate matches pinned fingerprint, bypassing chain validation");
                Ok(ServerCertVerified::assertion())
            } else {
                warn!(server = %server, "certificate does not match pinned fingerprint");
                Err(RustlsError::General(
                    "certificate does not match pinned fingerprint".into(),
                ))
            };
        }

        self.inner
            .verify_server_cert(end_entity, intermediates, server_name, ocsp_response, now)
    }

    fn verify_tls12_signature(
        &self,
        message: &[u8],
        cert: &CertificateDer<'_>,
        dss: &DigitallySignedStruct,
    ) -> Result<HandshakeSignatureValid, RustlsError> {
        self.inner.verify_tls12_signature(message, cert, dss)
    }

    fn verify_tls13_signature(
        &self,
        message: &[u8],
        cert: &CertificateDer<'_>,
        dss: &DigitallySignedStruct,
    ) -> Result<HandshakeSignatureValid, RustlsError> {
        self.inner.verify_tls13_signature(message, cert, dss)
    }

    fn supported_verify_schemes(&self) -> Vec<SignatureScheme> {
        self.inner.supported_verify_schemes()
    }
}

fn server_name_str(name: &ServerName<'_>) -> String {
    match name {
        ServerName::DnsName(dns) => dns.as_ref().to_string(),
        ServerName::IpAddress(ip) => format!("{ip:?}"),
        _ => String::new(),
    }
}
