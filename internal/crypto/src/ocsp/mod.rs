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

//! Decoding of OCSP responses (RFC 6960).

use chrono::{DateTime, Utc};
use rasn::types::{GeneralizedTime, IntegerType, ObjectIdentifier};
use rasn_ocsp::OcspResponseStatus;
use thiserror::Error;

use crate::{
    certificate::{normalize_serial, Certificate},
    hash::{self, HashAlgorithm},
    internal::time,
    oids,
    raw_signature::SignedData,
};

/// Identifies the key that signed an OCSP response.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ResponderId {
    /// DER encoding of the responder's subject name.
    ByName(Vec<u8>),

    /// SHA-1 over the responder's subjectPublicKey.
    ByKey(Vec<u8>),
}

impl ResponderId {
    /// Return `true` if `cert` is the responder this id designates.
    pub fn matches(&self, cert: &Certificate) -> bool {
        match self {
            Self::ByName(name) => name.as_slice() == cert.subject_raw(),
            Self::ByKey(key_hash) => *key_hash == hash::sha1(cert.public_key()),
        }
    }
}

/// The certificate identifier inside a single response.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CertId {
    /// Dotted OID of the digest used for the two issuer hashes.
    pub hash_algorithm: String,

    /// Digest of the issuer's subject name DER.
    pub issuer_name_hash: Vec<u8>,

    /// Digest of the issuer's subjectPublicKey.
    pub issuer_key_hash: Vec<u8>,

    /// Serial number of the certificate in question, normalised as in
    /// [`Certificate::serial`].
    pub serial: Vec<u8>,
}

impl CertId {
    /// Compute the identifier of `cert` as issued by `issuer`.
    pub fn for_certificate(cert: &Certificate, issuer: &Certificate, alg: HashAlgorithm) -> Self {
        Self {
            hash_algorithm: alg.oid().to_string(),
            issuer_name_hash: alg.digest(issuer.subject_raw()),
            issuer_key_hash: alg.digest(issuer.public_key()),
            serial: cert.serial().to_vec(),
        }
    }

    /// Return `true` if both issuer hashes match `issuer`. Identifiers that
    /// use an unsupported digest never match.
    pub fn matches_issuer(&self, issuer: &Certificate) -> bool {
        let Some(alg) = HashAlgorithm::from_oid(&self.hash_algorithm) else {
            return false;
        };

        self.issuer_name_hash == alg.digest(issuer.subject_raw())
            && self.issuer_key_hash == alg.digest(issuer.public_key())
    }
}

/// Revocation status reported for one certificate.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum CertStatus {
    /// Not revoked.
    Good,

    /// Revoked at the given time.
    Revoked {
        /// When the certificate was revoked.
        revocation_time: DateTime<Utc>,

        /// CRL reason code, if one was given.
        reason: Option<String>,
    },

    /// The responder does not know the certificate.
    Unknown,
}

/// One entry of the `responses` list.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SingleResponse {
    /// Which certificate this entry is about.
    pub cert_id: CertId,

    /// Its status.
    pub status: CertStatus,

    /// Time at which the status is known to be correct.
    pub this_update: DateTime<Utc>,

    /// Time at or before which newer information will be available.
    pub next_update: Option<DateTime<Utc>>,

    /// Archive cutoff given as a single-response extension.
    pub archive_cutoff: Option<DateTime<Utc>>,
}

/// A decoded BasicOCSPResponse.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct BasicOcspResponse {
    /// Who signed the response.
    pub responder_id: ResponderId,

    /// When the response was signed.
    pub produced_at: DateTime<Utc>,

    /// Status entries.
    pub responses: Vec<SingleResponse>,

    /// Certificates embedded to help locate the responder.
    pub certs: Vec<Certificate>,

    /// Archive cutoff given as a response extension.
    pub archive_cutoff: Option<DateTime<Utc>>,

    /// ResponseData bytes, signature and algorithm.
    pub signed_data: SignedData,
}

impl BasicOcspResponse {
    /// Decode a complete DER `OCSPResponse` and return its basic response.
    pub fn from_der(der: &[u8]) -> Result<Self, OcspError> {
        let response = rasn::der::decode::<rasn_ocsp::OcspResponse>(der)
            .map_err(|e| OcspError::InvalidResponse(e.to_string()))?;

        if response.status != OcspResponseStatus::Successful {
            return Err(OcspError::Unsuccessful(format!("{:?}", response.status)));
        }

        let Some(response_bytes) = response.bytes else {
            return Err(OcspError::InvalidResponse("no response bytes".to_string()));
        };

        Self::from_basic_der(&response_bytes.response)
    }

    /// Decode a DER `BasicOCSPResponse`.
    pub fn from_basic_der(der: &[u8]) -> Result<Self, OcspError> {
        let basic = rasn::der::decode::<rasn_ocsp::BasicOcspResponse>(der)
            .map_err(|e| OcspError::InvalidResponse(e.to_string()))?;

        let data = &basic.tbs_response_data;

        let tbs = rasn::der::encode(data).map_err(|e| OcspError::InvalidResponse(e.to_string()))?;

        let responder_id = match &data.responder_id {
            rasn_ocsp::ResponderId::ByName(name) => ResponderId::ByName(
                rasn::der::encode(name).map_err(|e| OcspError::InvalidResponse(e.to_string()))?,
            ),
            rasn_ocsp::ResponderId::ByKey(key_hash) => ResponderId::ByKey(key_hash.to_vec()),
        };

        let mut certs = Vec::new();
        for cert in basic.certs.iter().flatten() {
            let der =
                rasn::der::encode(cert).map_err(|e| OcspError::InvalidResponse(e.to_string()))?;
            match Certificate::from_der(&der) {
                Ok(cert) => certs.push(cert),
                Err(err) => log::debug!("skipping undecodable OCSP certificate: {err}"),
            }
        }

        let responses = data
            .responses
            .iter()
            .map(decode_single_response)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            responder_id,
            produced_at: time::from_generalized(&data.produced_at),
            responses,
            certs,
            archive_cutoff: archive_cutoff(
                data.response_extensions.as_deref().map(Vec::as_slice),
            )?,
            signed_data: SignedData::new(
                tbs,
                basic.signature.as_raw_slice().to_vec(),
                oid_string(&basic.signature_algorithm.algorithm),
            ),
        })
    }

    /// The archive cutoff that applies to `single`: its own extension if
    /// present, otherwise the response-level one.
    pub fn archive_cutoff_for(&self, single: &SingleResponse) -> Option<DateTime<Utc>> {
        single.archive_cutoff.or(self.archive_cutoff)
    }
}

fn decode_single_response(single: &rasn_ocsp::SingleResponse) -> Result<SingleResponse, OcspError> {
    let cert_id = &single.cert_id;

    let (serial_bytes, serial_len) = cert_id.serial_number.to_signed_bytes_be();
    let serial = serial_bytes
        .as_ref()
        .get(..serial_len)
        .ok_or_else(|| OcspError::InvalidResponse("malformed serial number".to_string()))?;

    let status = match &single.cert_status {
        rasn_ocsp::CertStatus::Good => CertStatus::Good,
        rasn_ocsp::CertStatus::Revoked(info) => CertStatus::Revoked {
            revocation_time: time::from_generalized(&info.revocation_time),
            reason: info.revocation_reason.as_ref().map(|r| format!("{r:?}")),
        },
        rasn_ocsp::CertStatus::Unknown(_) => CertStatus::Unknown,
    };

    Ok(SingleResponse {
        cert_id: CertId {
            hash_algorithm: oid_string(&cert_id.hash_algorithm.algorithm),
            issuer_name_hash: cert_id.issuer_name_hash.to_vec(),
            issuer_key_hash: cert_id.issuer_key_hash.to_vec(),
            serial: normalize_serial(serial),
        },
        status,
        this_update: time::from_generalized(&single.this_update),
        next_update: single.next_update.as_ref().map(time::from_generalized),
        archive_cutoff: archive_cutoff(single.single_extensions.as_deref().map(Vec::as_slice))?,
    })
}

fn archive_cutoff(
    extensions: Option<&[rasn_pkix::Extension]>,
) -> Result<Option<DateTime<Utc>>, OcspError> {
    let Some(ext) = extensions
        .unwrap_or_default()
        .iter()
        .find(|ext| oid_string(&ext.extn_id) == oids::OCSP_ARCHIVE_CUTOFF)
    else {
        return Ok(None);
    };

    let cutoff = rasn::der::decode::<GeneralizedTime>(&ext.extn_value)
        .map_err(|e| OcspError::InvalidResponse(e.to_string()))?;

    Ok(Some(time::from_generalized(&cutoff)))
}

pub(crate) fn oid_string(oid: &ObjectIdentifier) -> String {
    oid.iter()
        .map(|arc| arc.to_string())
        .collect::<Vec<_>>()
        .join(".")
}

/// Describes errors that can occur while decoding OCSP responses.
#[derive(Debug, Eq, Error, PartialEq)]
#[non_exhaustive]
pub enum OcspError {
    /// The response could not be decoded.
    #[error("invalid OCSP response: {0}")]
    InvalidResponse(String),

    /// The responder did not return a successful status.
    #[error("OCSP responder returned status {0}")]
    Unsuccessful(String),
}
