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

//! Decoding of certificate revocation lists (RFC 5280 section 5).

use chrono::{DateTime, Utc};
use thiserror::Error;
use x509_parser::{pem::Pem, prelude::FromDer, revocation_list::CertificateRevocationList};

use crate::{certificate::normalize_serial, internal::time, raw_signature::SignedData};

/// One entry of `revokedCertificates`.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RevokedEntry {
    /// Serial number, normalised as in [`Certificate::serial`].
    ///
    /// [`Certificate::serial`]: crate::Certificate::serial
    pub serial: Vec<u8>,

    /// When the certificate was revoked.
    pub revocation_date: DateTime<Utc>,

    /// RFC 5280 reason name, if a reason code extension is present.
    pub reason: Option<String>,
}

/// A decoded CRL.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Crl {
    /// Issuer name in RFC 4514 form.
    pub issuer: String,

    /// DER encoding of the issuer name.
    pub issuer_raw: Vec<u8>,

    /// `thisUpdate`.
    pub this_update: DateTime<Utc>,

    /// `nextUpdate`, if present.
    pub next_update: Option<DateTime<Utc>>,

    /// Revoked certificates.
    pub revoked: Vec<RevokedEntry>,

    /// TBSCertList bytes, signature and algorithm.
    pub signed_data: SignedData,

    /// The encoded CRL, empty for CRLs not read from DER.
    pub der: Vec<u8>,
}

impl Crl {
    /// Decode a DER-encoded CRL.
    pub fn from_der(der: &[u8]) -> Result<Self, CrlError> {
        let (_rem, crl) = CertificateRevocationList::from_der(der)
            .map_err(|e| CrlError::InvalidCrl(e.to_string()))?;

        let this_update =
            time::from_timestamp(crl.last_update().timestamp()).ok_or(CrlError::InvalidTime)?;

        let next_update = match crl.next_update() {
            Some(t) => Some(time::from_timestamp(t.timestamp()).ok_or(CrlError::InvalidTime)?),
            None => None,
        };

        let mut revoked = Vec::new();
        for entry in crl.iter_revoked_certificates() {
            revoked.push(RevokedEntry {
                serial: normalize_serial(entry.raw_serial()),
                revocation_date: time::from_timestamp(entry.revocation_date.timestamp())
                    .ok_or(CrlError::InvalidTime)?,
                reason: entry
                    .reason_code()
                    .map(|(_critical, code)| reason_name(code.0).to_string()),
            });
        }

        Ok(Self {
            issuer: crl.issuer().to_string(),
            issuer_raw: crl.issuer().as_raw().to_vec(),
            this_update,
            next_update,
            revoked,
            signed_data: SignedData::new(
                crl.tbs_cert_list.as_ref().to_vec(),
                crl.signature_value.data.to_vec(),
                crl.signature_algorithm.algorithm.to_id_string(),
            ),
            der: der.to_vec(),
        })
    }

    /// Decode every `X509 CRL` block in a PEM bundle.
    pub fn from_pem_bundle(pems: &[u8]) -> Result<Vec<Self>, CrlError> {
        let mut crls = Vec::new();

        for maybe_pem in Pem::iter_from_buffer(pems) {
            let pem = maybe_pem.map_err(|e| CrlError::InvalidCrl(e.to_string()))?;
            if pem.label == "X509 CRL" {
                crls.push(Self::from_der(&pem.contents)?);
            }
        }

        Ok(crls)
    }

    /// Find the entry for `serial`, if the CRL lists it.
    pub fn find_revoked(&self, serial: &[u8]) -> Option<&RevokedEntry> {
        self.revoked.iter().find(|entry| entry.serial == serial)
    }
}

fn reason_name(code: u8) -> &'static str {
    match code {
        1 => "keyCompromise",
        2 => "cACompromise",
        3 => "affiliationChanged",
        4 => "superseded",
        5 => "cessationOfOperation",
        6 => "certificateHold",
        8 => "removeFromCRL",
        9 => "privilegeWithdrawn",
        10 => "aACompromise",
        _ => "unspecified",
    }
}

/// Describes errors that can occur while decoding CRLs.
#[derive(Debug, Eq, Error, PartialEq)]
#[non_exhaustive]
pub enum CrlError {
    /// The CRL could not be parsed.
    #[error("invalid CRL: {0}")]
    InvalidCrl(String),

    /// A CRL time could not be represented.
    #[error("CRL time out of range")]
    InvalidTime,
}
