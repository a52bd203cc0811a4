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

//! Collaborators that supply certificates and revocation data.
//!
//! The validators never perform I/O themselves. Issuer candidates come from
//! an [`IssuerRetriever`] and revocation data from [`OcspSource`]s and
//! [`CrlSource`]s. Static, in-memory implementations of all three are
//! provided here.

use std::sync::Arc;

use certval_crypto::{crl::Crl, ocsp::BasicOcspResponse, Certificate};

use crate::{error::SourceError, trust_store::TrustedCertificatesStore};

/// Where an issuer candidate was found.
///
/// Candidates are tried in this order.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum CertificateOrigin {
    /// Shipped alongside the signed document.
    Document,

    /// Found in the trust store.
    Trusted,

    /// Supplied by the caller as a known intermediate.
    Known,

    /// Anything else, such as certificates fetched from the network.
    Other,
}

impl CertificateOrigin {
    /// Sort key; lower is tried first.
    pub fn rank(self) -> u8 {
        self as u8
    }
}

/// A certificate that might have issued another one.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct IssuerCandidate {
    /// The candidate itself.
    pub certificate: Certificate,

    /// Where it came from.
    pub origin: CertificateOrigin,
}

impl IssuerCandidate {
    /// Wrap a certificate with its origin.
    pub fn new(certificate: Certificate, origin: CertificateOrigin) -> Self {
        Self {
            certificate,
            origin,
        }
    }
}

/// Finds the possible issuers of certificates and CRLs.
pub trait IssuerRetriever: Send + Sync {
    /// Candidates whose subject equals the issuer of `cert`.
    fn retrieve_issuer_candidates(
        &self,
        cert: &Certificate,
    ) -> Result<Vec<IssuerCandidate>, SourceError>;

    /// Candidates whose subject equals the issuer of `crl`.
    fn retrieve_crl_issuer_candidates(
        &self,
        crl: &Crl,
    ) -> Result<Vec<IssuerCandidate>, SourceError>;
}

/// Default [`IssuerRetriever`] backed by in-memory certificate lists and a
/// trust store.
#[derive(Clone, Debug, Default)]
pub struct CertificateRetriever {
    document: Vec<Certificate>,
    known: Vec<Certificate>,
    trust_store: Arc<TrustedCertificatesStore>,
}

impl CertificateRetriever {
    /// Create a retriever that looks into `trust_store`.
    pub fn new(trust_store: Arc<TrustedCertificatesStore>) -> Self {
        Self {
            trust_store,
            ..Default::default()
        }
    }

    /// Add certificates that came with the signed document.
    pub fn add_document_certificates<I: IntoIterator<Item = Certificate>>(&mut self, certs: I) {
        self.document.extend(certs);
    }

    /// Add intermediates known to the caller.
    pub fn add_known_certificates<I: IntoIterator<Item = Certificate>>(&mut self, certs: I) {
        self.known.extend(certs);
    }

    fn candidates_for(&self, issuer_raw: &[u8]) -> Vec<IssuerCandidate> {
        let document = self
            .document
            .iter()
            .map(|c| (c, CertificateOrigin::Document));
        let trusted = self
            .trust_store
            .get_all_trusted()
            .into_iter()
            .map(|c| (c, CertificateOrigin::Trusted));
        let known = self.known.iter().map(|c| (c, CertificateOrigin::Known));

        let mut candidates: Vec<IssuerCandidate> = Vec::new();
        for (cert, origin) in document.chain(trusted).chain(known) {
            if cert.subject_raw() != issuer_raw {
                continue;
            }
            if candidates.iter().any(|c| c.certificate == *cert) {
                continue;
            }
            candidates.push(IssuerCandidate::new(cert.clone(), origin));
        }
        candidates
    }
}

impl IssuerRetriever for CertificateRetriever {
    fn retrieve_issuer_candidates(
        &self,
        cert: &Certificate,
    ) -> Result<Vec<IssuerCandidate>, SourceError> {
        Ok(self.candidates_for(cert.issuer_raw()))
    }

    fn retrieve_crl_issuer_candidates(
        &self,
        crl: &Crl,
    ) -> Result<Vec<IssuerCandidate>, SourceError> {
        Ok(self.candidates_for(&crl.issuer_raw))
    }
}

/// An OCSP response as delivered by a source.
#[derive(Clone, Debug)]
pub enum OcspResponseData {
    /// Undecoded DER `OCSPResponse`.
    Der(Vec<u8>),

    /// An already decoded basic response.
    Decoded(BasicOcspResponse),
}

impl OcspResponseData {
    /// Decode the response if needed.
    pub fn decode(self) -> Result<BasicOcspResponse, certval_crypto::ocsp::OcspError> {
        match self {
            Self::Der(der) => BasicOcspResponse::from_der(&der),
            Self::Decoded(response) => Ok(response),
        }
    }
}

/// A CRL as delivered by a source.
#[derive(Clone, Debug)]
pub enum CrlData {
    /// Undecoded DER `CertificateList`.
    Der(Vec<u8>),

    /// An already decoded CRL.
    Decoded(Crl),
}

impl CrlData {
    /// Decode the CRL if needed.
    pub fn decode(self) -> Result<Crl, certval_crypto::crl::CrlError> {
        match self {
            Self::Der(der) => Crl::from_der(&der),
            Self::Decoded(crl) => Ok(crl),
        }
    }
}

/// Supplies OCSP responses.
pub trait OcspSource: Send + Sync {
    /// An OCSP response about `cert` as issued by `issuer`, or `None` if the
    /// source has nothing.
    fn fetch_ocsp(
        &self,
        cert: &Certificate,
        issuer: &Certificate,
    ) -> Result<Option<OcspResponseData>, SourceError>;
}

/// Supplies CRLs.
pub trait CrlSource: Send + Sync {
    /// Every CRL the source has that may cover `cert`.
    fn fetch_crls(&self, cert: &Certificate) -> Result<Vec<CrlData>, SourceError>;
}

/// Revocation data held in memory, for example taken from the document
/// being validated.
///
/// Data that fails to decode is still handed out so that the validators can
/// report it. An undecodable OCSP response is handed out only when no stored
/// response covers the certificate.
#[derive(Clone, Debug, Default)]
pub struct StaticRevocationSource {
    ocsp_responses: Vec<Vec<u8>>,
    crls: Vec<Vec<u8>>,
}

impl StaticRevocationSource {
    /// Create an empty source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a DER `OCSPResponse`.
    pub fn add_ocsp_response(&mut self, der: Vec<u8>) {
        self.ocsp_responses.push(der);
    }

    /// Add a DER `CertificateList`.
    pub fn add_crl(&mut self, der: Vec<u8>) {
        self.crls.push(der);
    }
}

impl OcspSource for StaticRevocationSource {
    fn fetch_ocsp(
        &self,
        cert: &Certificate,
        issuer: &Certificate,
    ) -> Result<Option<OcspResponseData>, SourceError> {
        let mut undecodable = None;

        for der in &self.ocsp_responses {
            match BasicOcspResponse::from_der(der) {
                Ok(response) => {
                    let covers = response.responses.iter().any(|single| {
                        single.cert_id.serial == cert.serial()
                            && single.cert_id.matches_issuer(issuer)
                    });
                    if covers {
                        return Ok(Some(OcspResponseData::Decoded(response)));
                    }
                }
                Err(err) => {
                    log::debug!("skipping undecodable OCSP response: {err}");
                    undecodable.get_or_insert_with(|| der.clone());
                }
            }
        }

        // Nothing usable; hand out the broken data so it gets reported.
        Ok(undecodable.map(OcspResponseData::Der))
    }
}

impl CrlSource for StaticRevocationSource {
    fn fetch_crls(&self, cert: &Certificate) -> Result<Vec<CrlData>, SourceError> {
        let mut crls = Vec::new();
        for der in &self.crls {
            match Crl::from_der(der) {
                Ok(crl) if crl.issuer_raw == cert.issuer_raw() => {
                    crls.push(CrlData::Decoded(crl));
                }
                Ok(_) => {}
                Err(err) => {
                    log::debug!("handing out undecodable CRL: {err}");
                    crls.push(CrlData::Der(der.clone()));
                }
            }
        }
        Ok(crls)
    }
}
