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

//! Builders and fake collaborators shared by the tests.
//!
//! Certificates are made with [`CertificateBuilder`]. Their "signatures" are
//! SHA-256 over the signed bytes followed by the signer's public key, which
//! [`TestVerifier`] recomputes. That keeps issuer/subject relationships real
//! without any key material.

use std::sync::Arc;

use certval_crypto::{
    crl::{Crl, RevokedEntry},
    hash::{self, HashAlgorithm},
    normalize_serial,
    ocsp::{BasicOcspResponse, CertId, CertStatus, ResponderId, SingleResponse},
    oids,
    raw_signature::{SignatureError, SignatureVerifier, SignedData},
    Certificate, CertificateBuilder, KeyUsageBit,
};
use chrono::{DateTime, Duration, Utc};

use crate::{
    error::SourceError,
    settings::ValidationSettings,
    sources::{
        CertificateRetriever, CrlData, CrlSource, IssuerCandidate, IssuerRetriever,
        OcspResponseData, OcspSource,
    },
    trust_store::TrustedCertificatesStore,
    validator_chain::{ValidatorChain, ValidatorChainBuilder},
};

pub(crate) fn now() -> DateTime<Utc> {
    "2025-06-01T12:00:00Z".parse().unwrap()
}

pub(crate) fn days(n: i64) -> Duration {
    Duration::days(n)
}

pub(crate) fn signature_over(tbs: &[u8], spki: &[u8]) -> Vec<u8> {
    let mut buf = tbs.to_vec();
    buf.extend_from_slice(spki);
    hash::sha256(&buf)
}

/// Accepts exactly the signatures made by [`signature_over`].
pub(crate) struct TestVerifier;

impl SignatureVerifier for TestVerifier {
    fn verify(&self, data: &SignedData, spki: &[u8]) -> Result<(), SignatureError> {
        if data.signature == signature_over(&data.tbs, spki) {
            Ok(())
        } else {
            Err(SignatureError::SignatureMismatch)
        }
    }
}

/// A CA certificate template with keyCertSign and cRLSign.
pub(crate) fn ca(subject: &str) -> CertificateBuilder {
    CertificateBuilder::new(subject)
        .key_usage(&[KeyUsageBit::KeyCertSign, KeyUsageBit::CrlSign])
        .basic_constraints(true, None)
}

/// An end-entity certificate template.
pub(crate) fn end_entity(subject: &str, serial: u64) -> CertificateBuilder {
    CertificateBuilder::new(subject)
        .serial(serial)
        .key_usage(&[KeyUsageBit::DigitalSignature])
}

/// An OCSP responder certificate template.
pub(crate) fn responder(subject: &str, serial: u64) -> CertificateBuilder {
    CertificateBuilder::new(subject)
        .serial(serial)
        .key_usage(&[KeyUsageBit::DigitalSignature])
        .extended_key_usage(&[oids::EKU_OCSP_SIGNING])
}

pub(crate) fn self_signed(builder: CertificateBuilder) -> Certificate {
    let spki = builder.clone().build().spki().to_vec();
    let signature = signature_over(&builder.tbs(), &spki);
    builder.signature(signature).build()
}

pub(crate) fn issued_by(builder: CertificateBuilder, issuer: &Certificate) -> Certificate {
    let builder = builder.issuer(issuer.subject());
    let signature = signature_over(&builder.tbs(), issuer.spki());
    builder.signature(signature).build()
}

/// A single-entry OCSP response about `cert`, identifying `issuer` in its
/// cert id and signed by `signer`.
pub(crate) fn ocsp_response(
    cert: &Certificate,
    issuer: &Certificate,
    signer: &Certificate,
    status: CertStatus,
    this_update: DateTime<Utc>,
) -> BasicOcspResponse {
    let mut response = BasicOcspResponse {
        responder_id: ResponderId::ByName(signer.subject_raw().to_vec()),
        produced_at: this_update,
        responses: vec![SingleResponse {
            cert_id: CertId::for_certificate(cert, issuer, HashAlgorithm::Sha256),
            status,
            this_update,
            next_update: None,
            archive_cutoff: None,
        }],
        certs: Vec::new(),
        archive_cutoff: None,
        signed_data: SignedData::default(),
    };
    sign_response(&mut response, signer);
    response
}

pub(crate) fn sign_response(response: &mut BasicOcspResponse, signer: &Certificate) {
    let tbs = format!("{:?} {}", response.responses, response.produced_at).into_bytes();
    let signature = signature_over(&tbs, signer.spki());
    response.signed_data = SignedData::new(tbs, signature, oids::ECDSA_WITH_SHA256);
}

pub(crate) fn revoked(at: DateTime<Utc>) -> CertStatus {
    CertStatus::Revoked {
        revocation_time: at,
        reason: Some("keyCompromise".to_string()),
    }
}

/// A CRL signed by `issuer` listing `revoked` as (serial, date) pairs.
pub(crate) fn crl(
    issuer: &Certificate,
    this_update: DateTime<Utc>,
    revoked: &[(u64, DateTime<Utc>)],
) -> Crl {
    let tbs = format!("{} {this_update} {revoked:?}", issuer.subject()).into_bytes();
    let signature = signature_over(&tbs, issuer.spki());

    Crl {
        issuer: issuer.subject().to_string(),
        issuer_raw: issuer.subject_raw().to_vec(),
        this_update,
        next_update: Some(this_update + days(30)),
        revoked: revoked
            .iter()
            .map(|(serial, date)| RevokedEntry {
                serial: normalize_serial(&serial.to_be_bytes()),
                revocation_date: *date,
                reason: None,
            })
            .collect(),
        signed_data: SignedData::new(tbs, signature, oids::ECDSA_WITH_SHA256),
        der: Vec::new(),
    }
}

/// Hands out decoded OCSP responses whose cert id matches the request.
#[derive(Default)]
pub(crate) struct MemoryOcspSource(pub(crate) Vec<BasicOcspResponse>);

impl OcspSource for MemoryOcspSource {
    fn fetch_ocsp(
        &self,
        cert: &Certificate,
        issuer: &Certificate,
    ) -> Result<Option<OcspResponseData>, SourceError> {
        Ok(self
            .0
            .iter()
            .find(|response| {
                response.responses.iter().any(|single| {
                    single.cert_id.serial == cert.serial() && single.cert_id.matches_issuer(issuer)
                })
            })
            .cloned()
            .map(OcspResponseData::Decoded))
    }
}

/// Hands out decoded CRLs issued under the certificate's issuer name.
#[derive(Default)]
pub(crate) struct MemoryCrlSource(pub(crate) Vec<Crl>);

impl CrlSource for MemoryCrlSource {
    fn fetch_crls(&self, cert: &Certificate) -> Result<Vec<CrlData>, SourceError> {
        Ok(self
            .0
            .iter()
            .filter(|crl| crl.issuer_raw == cert.issuer_raw())
            .cloned()
            .map(CrlData::Decoded)
            .collect())
    }
}

/// Hands out every CRL it holds, whoever issued it.
pub(crate) struct UnscopedCrlSource(pub(crate) Vec<Crl>);

impl CrlSource for UnscopedCrlSource {
    fn fetch_crls(&self, _cert: &Certificate) -> Result<Vec<CrlData>, SourceError> {
        Ok(self.0.iter().cloned().map(CrlData::Decoded).collect())
    }
}

/// Every call fails with the given error.
pub(crate) struct FailingSource(pub(crate) SourceError);

impl IssuerRetriever for FailingSource {
    fn retrieve_issuer_candidates(
        &self,
        _cert: &Certificate,
    ) -> Result<Vec<IssuerCandidate>, SourceError> {
        Err(self.0.clone())
    }

    fn retrieve_crl_issuer_candidates(
        &self,
        _crl: &Crl,
    ) -> Result<Vec<IssuerCandidate>, SourceError> {
        Err(self.0.clone())
    }
}

impl OcspSource for FailingSource {
    fn fetch_ocsp(
        &self,
        _cert: &Certificate,
        _issuer: &Certificate,
    ) -> Result<Option<OcspResponseData>, SourceError> {
        Err(self.0.clone())
    }
}

impl CrlSource for FailingSource {
    fn fetch_crls(&self, _cert: &Certificate) -> Result<Vec<CrlData>, SourceError> {
        Err(self.0.clone())
    }
}

/// Everything a test needs to assemble a [`ValidatorChain`].
#[derive(Default)]
pub(crate) struct TestPki {
    pub(crate) store: TrustedCertificatesStore,
    pub(crate) document: Vec<Certificate>,
    pub(crate) known: Vec<Certificate>,
    pub(crate) ocsp: Vec<BasicOcspResponse>,
    pub(crate) crls: Vec<Crl>,
    pub(crate) settings: ValidationSettings,
}

impl TestPki {
    pub(crate) fn chain(self) -> ValidatorChain {
        let store = Arc::new(self.store);

        let mut retriever = CertificateRetriever::new(store.clone());
        retriever.add_document_certificates(self.document);
        retriever.add_known_certificates(self.known);

        let mut builder = ValidatorChainBuilder::new()
            .settings(self.settings)
            .trust_store(store)
            .signature_verifier(Arc::new(TestVerifier))
            .issuer_retriever(Arc::new(retriever));

        if !self.ocsp.is_empty() {
            builder = builder.ocsp_source(Arc::new(MemoryOcspSource(self.ocsp)));
        }
        if !self.crls.is_empty() {
            builder = builder.crl_source(Arc::new(MemoryCrlSource(self.crls)));
        }

        builder.build().unwrap()
    }
}
