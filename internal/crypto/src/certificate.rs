// Copyright 2025 Adobe. All rights reserved.
// This file is licensed to you under the Apache License,
// Version 2.0 (http://www.apache.org/licenses/LICENSE-2.0)
// or the MIT license (http://opensource.org/licenses/MIT),
// at your option.

// Unless required by applicable law or agreed to in writing,
// this software is distributed on an "AS IS" BASIS, WITHOUT
// WARRANTIES OR REPRESENTATIONS OF ANY KIND, either express or
// implied. See the LICENSE-MIT and LICENSE-APACHE files for the
// specific language governing permissions and limitations under
// each license.

//! Decoded X.509 certificates.

use std::fmt;

use chrono::{DateTime, Utc};
use thiserror::Error;
use x509_parser::{certificate::X509Certificate, pem::Pem, prelude::FromDer};

use crate::{base64, hash, internal::time, oids, raw_signature::SignedData};

/// A single key usage bit as named in RFC 5280.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum KeyUsageBit {
    /// digitalSignature (bit 0)
    DigitalSignature,

    /// nonRepudiation / contentCommitment (bit 1)
    NonRepudiation,

    /// keyEncipherment (bit 2)
    KeyEncipherment,

    /// dataEncipherment (bit 3)
    DataEncipherment,

    /// keyAgreement (bit 4)
    KeyAgreement,

    /// keyCertSign (bit 5)
    KeyCertSign,

    /// cRLSign (bit 6)
    CrlSign,

    /// encipherOnly (bit 7)
    EncipherOnly,

    /// decipherOnly (bit 8)
    DecipherOnly,
}

impl KeyUsageBit {
    const ALL: [KeyUsageBit; 9] = [
        Self::DigitalSignature,
        Self::NonRepudiation,
        Self::KeyEncipherment,
        Self::DataEncipherment,
        Self::KeyAgreement,
        Self::KeyCertSign,
        Self::CrlSign,
        Self::EncipherOnly,
        Self::DecipherOnly,
    ];

    fn mask(self) -> u16 {
        1 << (self as u16)
    }

    /// The RFC 5280 name of this bit, e.g. `keyCertSign`.
    pub fn name(self) -> &'static str {
        match self {
            Self::DigitalSignature => "digitalSignature",
            Self::NonRepudiation => "nonRepudiation",
            Self::KeyEncipherment => "keyEncipherment",
            Self::DataEncipherment => "dataEncipherment",
            Self::KeyAgreement => "keyAgreement",
            Self::KeyCertSign => "keyCertSign",
            Self::CrlSign => "cRLSign",
            Self::EncipherOnly => "encipherOnly",
            Self::DecipherOnly => "decipherOnly",
        }
    }

    /// Look up a bit by its RFC 5280 name. `contentCommitment` is accepted
    /// as an alias for `nonRepudiation`.
    pub fn from_name(name: &str) -> Option<Self> {
        if name == "contentCommitment" {
            return Some(Self::NonRepudiation);
        }
        Self::ALL.into_iter().find(|bit| bit.name() == name)
    }
}

impl fmt::Display for KeyUsageBit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The set of key usage bits asserted by a certificate.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub struct KeyUsage(u16);

impl KeyUsage {
    /// Build a key usage set from individual bits.
    pub fn from_bits(bits: &[KeyUsageBit]) -> Self {
        Self(bits.iter().fold(0, |acc, bit| acc | bit.mask()))
    }

    /// Return `true` if `bit` is asserted.
    pub fn contains(&self, bit: KeyUsageBit) -> bool {
        self.0 & bit.mask() != 0
    }

    /// Iterate over the asserted bits.
    pub fn iter(&self) -> impl Iterator<Item = KeyUsageBit> + '_ {
        KeyUsageBit::ALL
            .into_iter()
            .filter(move |bit| self.contains(*bit))
    }
}

/// The basicConstraints extension.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub struct BasicConstraints {
    /// `cA` flag.
    pub ca: bool,

    /// `pathLenConstraint`, if present.
    pub path_len: Option<u32>,
}

/// The certificate extensions that chain and revocation validation consult.
#[derive(Clone, Debug, Default, Eq, Hash, PartialEq)]
pub struct Extensions {
    /// keyUsage, or `None` when the extension is absent.
    pub key_usage: Option<KeyUsage>,

    /// extKeyUsage purpose OIDs, or `None` when the extension is absent.
    pub extended_key_usage: Option<Vec<String>>,

    /// basicConstraints, or `None` when the extension is absent.
    pub basic_constraints: Option<BasicConstraints>,

    /// Dotted OIDs of every extension present, in certificate order.
    pub oids: Vec<String>,
}

impl Extensions {
    /// Return `true` if an extension with the given dotted OID is present.
    pub fn contains(&self, oid: &str) -> bool {
        self.oids.iter().any(|o| o == oid)
    }

    /// Return `true` if the key usage extension asserts `bit`.
    pub fn has_key_usage(&self, bit: KeyUsageBit) -> bool {
        self.key_usage.is_some_and(|ku| ku.contains(bit))
    }

    /// Return `true` if the extended key usage extension lists `oid`.
    pub fn has_extended_key_usage(&self, oid: &str) -> bool {
        self.extended_key_usage
            .as_ref()
            .is_some_and(|ekus| ekus.iter().any(|e| e == oid))
    }

    /// Return `true` if basicConstraints asserts `cA`.
    pub fn is_ca(&self) -> bool {
        self.basic_constraints.is_some_and(|bc| bc.ca)
    }
}

/// A decoded, read-only X.509 certificate.
///
/// Two certificates are equal when all of their decoded content is equal,
/// which for certificates read from DER amounts to DER equality.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct Certificate {
    subject: String,
    subject_raw: Vec<u8>,
    issuer: String,
    issuer_raw: Vec<u8>,
    serial: Vec<u8>,
    not_before: DateTime<Utc>,
    not_after: DateTime<Utc>,
    spki: Vec<u8>,
    public_key: Vec<u8>,
    signed_data: SignedData,
    extensions: Extensions,
    der: Vec<u8>,
}

impl Certificate {
    /// Decode a DER-encoded certificate.
    pub fn from_der(der: &[u8]) -> Result<Self, CertificateError> {
        let (_rem, cert) = X509Certificate::from_der(der)
            .map_err(|e| CertificateError::InvalidCertificate(e.to_string()))?;

        let validity = cert.validity();
        let not_before = time::from_timestamp(validity.not_before.timestamp())
            .ok_or(CertificateError::InvalidTime)?;
        let not_after = time::from_timestamp(validity.not_after.timestamp())
            .ok_or(CertificateError::InvalidTime)?;

        Ok(Self {
            subject: cert.subject().to_string(),
            subject_raw: cert.subject().as_raw().to_vec(),
            issuer: cert.issuer().to_string(),
            issuer_raw: cert.issuer().as_raw().to_vec(),
            serial: normalize_serial(cert.raw_serial()),
            not_before,
            not_after,
            spki: cert.public_key().raw.to_vec(),
            public_key: cert.public_key().subject_public_key.data.to_vec(),
            signed_data: SignedData::new(
                cert.tbs_certificate.as_ref().to_vec(),
                cert.signature_value.data.to_vec(),
                cert.signature_algorithm.algorithm.to_id_string(),
            ),
            extensions: decode_extensions(&cert)?,
            der: der.to_vec(),
        })
    }

    /// Decode every `CERTIFICATE` block in a PEM bundle.
    pub fn from_pem_bundle(pems: &[u8]) -> Result<Vec<Self>, CertificateError> {
        let mut certs = Vec::new();

        for maybe_pem in Pem::iter_from_buffer(pems) {
            let pem = maybe_pem.map_err(|e| CertificateError::InvalidPem(e.to_string()))?;
            if pem.label != "CERTIFICATE" {
                continue;
            }
            certs.push(Self::from_der(&pem.contents)?);
        }

        Ok(certs)
    }

    /// Subject distinguished name in RFC 4514 form.
    pub fn subject(&self) -> &str {
        &self.subject
    }

    /// DER encoding of the subject name.
    pub fn subject_raw(&self) -> &[u8] {
        &self.subject_raw
    }

    /// Issuer distinguished name in RFC 4514 form.
    pub fn issuer(&self) -> &str {
        &self.issuer
    }

    /// DER encoding of the issuer name.
    pub fn issuer_raw(&self) -> &[u8] {
        &self.issuer_raw
    }

    /// Serial number as big-endian bytes without leading zero octets.
    pub fn serial(&self) -> &[u8] {
        &self.serial
    }

    /// Start of the validity interval.
    pub fn not_before(&self) -> DateTime<Utc> {
        self.not_before
    }

    /// End of the validity interval.
    pub fn not_after(&self) -> DateTime<Utc> {
        self.not_after
    }

    /// DER-encoded SubjectPublicKeyInfo.
    pub fn spki(&self) -> &[u8] {
        &self.spki
    }

    /// Contents of the subjectPublicKey BIT STRING.
    pub fn public_key(&self) -> &[u8] {
        &self.public_key
    }

    /// The TBS bytes, signature and algorithm of this certificate.
    pub fn signed_data(&self) -> &SignedData {
        &self.signed_data
    }

    /// Decoded extensions.
    pub fn extensions(&self) -> &Extensions {
        &self.extensions
    }

    /// The encoded certificate.
    pub fn der(&self) -> &[u8] {
        &self.der
    }

    /// SHA-256 over the encoded certificate.
    pub fn fingerprint(&self) -> Vec<u8> {
        hash::sha256(&self.der)
    }

    /// Short human-readable identification used in reports and logs.
    pub fn label(&self) -> String {
        format!("{} (serial {})", self.subject, hex::encode(&self.serial))
    }

    /// Return `true` if subject and issuer names are identical.
    pub fn is_self_signed(&self) -> bool {
        self.subject_raw == self.issuer_raw
    }

    /// Return `true` if `date` lies inside the validity interval (bounds
    /// inclusive).
    pub fn is_valid_at(&self, date: DateTime<Utc>) -> bool {
        self.not_before <= date && date <= self.not_after
    }

    /// Return `true` if the certificate carries id-pkix-ocsp-nocheck.
    pub fn has_ocsp_no_check(&self) -> bool {
        self.extensions.contains(oids::OCSP_NO_CHECK)
    }

    /// Return `true` if the certificate carries the ETSI validity-assured
    /// short-term extension.
    pub fn has_validity_assured_short_term(&self) -> bool {
        self.extensions.contains(oids::VALIDITY_ASSURED_SHORT_TERM)
    }

    /// Return `true` if the certificate carries noRevAvail.
    pub fn has_no_revocation_available(&self) -> bool {
        self.extensions.contains(oids::NO_REVOCATION_AVAILABLE)
    }

    /// PEM rendition of the encoded certificate.
    pub fn to_pem(&self) -> String {
        base64::pem_block("CERTIFICATE", &self.der)
    }
}

impl fmt::Display for Certificate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

fn decode_extensions(cert: &X509Certificate<'_>) -> Result<Extensions, CertificateError> {
    let invalid =
        |e: x509_parser::error::X509Error| CertificateError::InvalidExtension(e.to_string());

    let key_usage = cert.key_usage().map_err(invalid)?.map(|ext| {
        let ku = ext.value;
        let asserted = [
            (KeyUsageBit::DigitalSignature, ku.digital_signature()),
            (KeyUsageBit::NonRepudiation, ku.non_repudiation()),
            (KeyUsageBit::KeyEncipherment, ku.key_encipherment()),
            (KeyUsageBit::DataEncipherment, ku.data_encipherment()),
            (KeyUsageBit::KeyAgreement, ku.key_agreement()),
            (KeyUsageBit::KeyCertSign, ku.key_cert_sign()),
            (KeyUsageBit::CrlSign, ku.crl_sign()),
            (KeyUsageBit::EncipherOnly, ku.encipher_only()),
            (KeyUsageBit::DecipherOnly, ku.decipher_only()),
        ];
        let bits: Vec<KeyUsageBit> = asserted
            .into_iter()
            .filter_map(|(bit, set)| set.then_some(bit))
            .collect();
        KeyUsage::from_bits(&bits)
    });

    let extended_key_usage = cert.extended_key_usage().map_err(invalid)?.map(|ext| {
        let eku = ext.value;
        let known = [
            (oids::EKU_ANY, eku.any),
            (oids::EKU_SERVER_AUTH, eku.server_auth),
            (oids::EKU_CLIENT_AUTH, eku.client_auth),
            (oids::EKU_CODE_SIGNING, eku.code_signing),
            (oids::EKU_EMAIL_PROTECTION, eku.email_protection),
            (oids::EKU_TIME_STAMPING, eku.time_stamping),
            (oids::EKU_OCSP_SIGNING, eku.ocsp_signing),
        ];
        known
            .into_iter()
            .filter_map(|(oid, set)| set.then(|| oid.to_string()))
            .chain(eku.other.iter().map(|oid| oid.to_id_string()))
            .collect::<Vec<_>>()
    });

    let basic_constraints = cert
        .basic_constraints()
        .map_err(invalid)?
        .map(|ext| BasicConstraints {
            ca: ext.value.ca,
            path_len: ext.value.path_len_constraint,
        });

    Ok(Extensions {
        key_usage,
        extended_key_usage,
        basic_constraints,
        oids: cert
            .extensions()
            .iter()
            .map(|ext| ext.oid.to_id_string())
            .collect(),
    })
}

/// Strip the sign-padding zero octets DER adds in front of serial numbers so
/// that serials from certificates, CRLs and OCSP responses compare equal.
pub fn normalize_serial(raw: &[u8]) -> Vec<u8> {
    let first_significant = raw.iter().position(|b| *b != 0).unwrap_or(raw.len());
    if first_significant == raw.len() {
        return vec![0];
    }
    raw[first_significant..].to_vec()
}

/// Assembles a [`Certificate`] from already-decoded parts.
///
/// Callers that obtain certificate content from somewhere other than DER
/// (and tests) use this instead of [`Certificate::from_der`]. Unless set
/// explicitly, the issuer equals the subject, the validity interval is
/// unbounded and the public key is derived from the subject name. The
/// to-be-signed bytes are a deterministic encoding of the other fields so
/// that a signature can be computed over them before calling
/// [`build`](Self::build).
#[derive(Clone, Debug)]
pub struct CertificateBuilder {
    subject: String,
    issuer: Option<String>,
    serial: Vec<u8>,
    not_before: DateTime<Utc>,
    not_after: DateTime<Utc>,
    public_key: Option<Vec<u8>>,
    signature: Vec<u8>,
    algorithm: String,
    extensions: Extensions,
}

impl CertificateBuilder {
    /// Start a certificate for the given subject name.
    pub fn new<S: Into<String>>(subject: S) -> Self {
        Self {
            subject: subject.into(),
            issuer: None,
            serial: vec![1],
            not_before: DateTime::<Utc>::UNIX_EPOCH,
            not_after: DateTime::<Utc>::MAX_UTC,
            public_key: None,
            signature: Vec::new(),
            algorithm: oids::ECDSA_WITH_SHA256.to_string(),
            extensions: Extensions::default(),
        }
    }

    /// Set the issuer name.
    pub fn issuer<S: Into<String>>(mut self, issuer: S) -> Self {
        self.issuer = Some(issuer.into());
        self
    }

    /// Set the serial number.
    pub fn serial(mut self, serial: u64) -> Self {
        self.serial = normalize_serial(&serial.to_be_bytes());
        self
    }

    /// Set the serial number from big-endian bytes.
    pub fn serial_bytes(mut self, serial: &[u8]) -> Self {
        self.serial = normalize_serial(serial);
        self
    }

    /// Set the validity interval.
    pub fn validity(mut self, not_before: DateTime<Utc>, not_after: DateTime<Utc>) -> Self {
        self.not_before = not_before;
        self.not_after = not_after;
        self
    }

    /// Set the public key. The same bytes serve as SubjectPublicKeyInfo and
    /// as subjectPublicKey.
    pub fn public_key(mut self, key: Vec<u8>) -> Self {
        self.public_key = Some(key);
        self
    }

    /// Set the signature algorithm OID.
    pub fn signature_algorithm<S: Into<String>>(mut self, oid: S) -> Self {
        self.algorithm = oid.into();
        self
    }

    /// Assert key usage bits.
    pub fn key_usage(mut self, bits: &[KeyUsageBit]) -> Self {
        self.extensions.key_usage = Some(KeyUsage::from_bits(bits));
        self.push_oid("2.5.29.15");
        self
    }

    /// List extended key usage purposes.
    pub fn extended_key_usage(mut self, purposes: &[&str]) -> Self {
        self.extensions.extended_key_usage =
            Some(purposes.iter().map(|p| p.to_string()).collect());
        self.push_oid("2.5.29.37");
        self
    }

    /// Set basicConstraints.
    pub fn basic_constraints(mut self, ca: bool, path_len: Option<u32>) -> Self {
        self.extensions.basic_constraints = Some(BasicConstraints { ca, path_len });
        self.push_oid("2.5.29.19");
        self
    }

    /// Mark an extension with no decoded content (for example
    /// id-pkix-ocsp-nocheck) as present.
    pub fn extension<S: Into<String>>(mut self, oid: S) -> Self {
        let oid = oid.into();
        self.push_oid(&oid);
        self
    }

    /// Set the signature value.
    pub fn signature(mut self, signature: Vec<u8>) -> Self {
        self.signature = signature;
        self
    }

    fn push_oid(&mut self, oid: &str) {
        if !self.extensions.contains(oid) {
            self.extensions.oids.push(oid.to_string());
        }
    }

    fn public_key_bytes(&self) -> Vec<u8> {
        self.public_key
            .clone()
            .unwrap_or_else(|| hash::sha256(self.subject.as_bytes()))
    }

    /// The bytes a signature over this certificate covers.
    pub fn tbs(&self) -> Vec<u8> {
        let issuer = self.issuer.as_deref().unwrap_or(&self.subject);

        let fields: [Vec<u8>; 8] = [
            self.subject.as_bytes().to_vec(),
            issuer.as_bytes().to_vec(),
            self.serial.clone(),
            self.not_before.timestamp_millis().to_be_bytes().to_vec(),
            self.not_after.timestamp_millis().to_be_bytes().to_vec(),
            self.public_key_bytes(),
            self.algorithm.as_bytes().to_vec(),
            format!("{:?}", self.extensions).into_bytes(),
        ];

        let mut tbs = Vec::new();
        for field in fields {
            tbs.extend_from_slice(&(field.len() as u32).to_be_bytes());
            tbs.extend_from_slice(&field);
        }
        tbs
    }

    /// Produce the certificate.
    pub fn build(self) -> Certificate {
        let tbs = self.tbs();
        let public_key = self.public_key_bytes();
        let issuer = self.issuer.unwrap_or_else(|| self.subject.clone());

        let mut der = tbs.clone();
        der.extend_from_slice(&self.signature);

        Certificate {
            subject_raw: self.subject.as_bytes().to_vec(),
            subject: self.subject,
            issuer_raw: issuer.as_bytes().to_vec(),
            issuer,
            serial: self.serial,
            not_before: self.not_before,
            not_after: self.not_after,
            spki: public_key.clone(),
            public_key,
            signed_data: SignedData::new(tbs, self.signature, self.algorithm),
            extensions: self.extensions,
            der,
        }
    }
}

/// Describes errors that can occur while decoding certificates.
#[derive(Debug, Eq, Error, PartialEq)]
#[non_exhaustive]
pub enum CertificateError {
    /// The certificate could not be parsed.
    #[error("invalid certificate: {0}")]
    InvalidCertificate(String),

    /// A PEM bundle could not be parsed.
    #[error("invalid PEM: {0}")]
    InvalidPem(String),

    /// An extension the validators rely on could not be parsed.
    #[error("invalid certificate extension: {0}")]
    InvalidExtension(String),

    /// A certificate time could not be represented.
    #[error("certificate time out of range")]
    InvalidTime,
}
