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

//! Trust anchors, partitioned by the purpose they are trusted for.

use std::collections::HashMap;

use certval_crypto::Certificate;
use serde::{Deserialize, Serialize};

use crate::{context::CertificateSource, Result};

/// The purpose a certificate is trusted for.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TrustDomain {
    /// Trusted for every purpose.
    General,

    /// Trusted to sign OCSP responses.
    OcspSigning,

    /// Trusted to sign CRLs.
    CrlSigning,

    /// Trusted to sign time stamp tokens.
    Timestamping,

    /// Trusted to issue certificates.
    Ca,
}

impl TrustDomain {
    /// Every domain, in lookup order.
    pub const ALL: [TrustDomain; 5] = [
        Self::General,
        Self::Ca,
        Self::OcspSigning,
        Self::CrlSigning,
        Self::Timestamping,
    ];

    /// The context-specific domain matching a certificate role. Signers have
    /// none; only general trust applies to them.
    pub fn for_source(source: CertificateSource) -> Option<Self> {
        match source {
            CertificateSource::Signer => None,
            CertificateSource::CertIssuer => Some(Self::Ca),
            CertificateSource::OcspIssuer => Some(Self::OcspSigning),
            CertificateSource::CrlIssuer => Some(Self::CrlSigning),
            CertificateSource::Timestamp => Some(Self::Timestamping),
        }
    }
}

/// Trust anchors keyed by subject, one map per [`TrustDomain`].
///
/// Membership in one domain says nothing about any other: a certificate
/// trusted only for CRL signing is not trusted as a CA.
///
/// The store is filled before validation starts and only read afterwards, so
/// it can be shared between threads behind an `Arc`.
#[derive(Clone, Debug, Default)]
pub struct TrustedCertificatesStore {
    domains: HashMap<TrustDomain, HashMap<String, Vec<Certificate>>>,
}

impl TrustedCertificatesStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Trust `certs` for `domain`. Adding a certificate twice has no effect.
    pub fn add<I>(&mut self, domain: TrustDomain, certs: I)
    where
        I: IntoIterator<Item = Certificate>,
    {
        let by_subject = self.domains.entry(domain).or_default();
        for cert in certs {
            let bucket = by_subject.entry(cert.subject().to_string()).or_default();
            if !bucket.contains(&cert) {
                log::debug!("trusting {cert} for {domain:?}");
                bucket.push(cert);
            }
        }
    }

    /// Trust certificates for every purpose.
    pub fn add_generally_trusted<I: IntoIterator<Item = Certificate>>(&mut self, certs: I) {
        self.add(TrustDomain::General, certs);
    }

    /// Trust certificates as certificate issuers.
    pub fn add_ca_trusted<I: IntoIterator<Item = Certificate>>(&mut self, certs: I) {
        self.add(TrustDomain::Ca, certs);
    }

    /// Trust certificates as OCSP responders.
    pub fn add_ocsp_trusted<I: IntoIterator<Item = Certificate>>(&mut self, certs: I) {
        self.add(TrustDomain::OcspSigning, certs);
    }

    /// Trust certificates as CRL signers.
    pub fn add_crl_trusted<I: IntoIterator<Item = Certificate>>(&mut self, certs: I) {
        self.add(TrustDomain::CrlSigning, certs);
    }

    /// Trust certificates as time stamp signers.
    pub fn add_timestamp_trusted<I: IntoIterator<Item = Certificate>>(&mut self, certs: I) {
        self.add(TrustDomain::Timestamping, certs);
    }

    /// Trust every certificate of a PEM bundle for `domain`.
    pub fn add_pem(&mut self, domain: TrustDomain, pems: &[u8]) -> Result<()> {
        let certs = Certificate::from_pem_bundle(pems)?;
        self.add(domain, certs);
        Ok(())
    }

    /// Return `true` if `cert` is trusted for `domain`.
    pub fn is_trusted(&self, domain: TrustDomain, cert: &Certificate) -> bool {
        self.domains
            .get(&domain)
            .and_then(|by_subject| by_subject.get(cert.subject()))
            .is_some_and(|bucket| bucket.contains(cert))
    }

    /// The certificates trusted for `domain` under `subject`.
    pub fn get_trusted(&self, domain: TrustDomain, subject: &str) -> &[Certificate] {
        self.domains
            .get(&domain)
            .and_then(|by_subject| by_subject.get(subject))
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Every certificate trusted for `domain`.
    pub fn get_domain_trusted(&self, domain: TrustDomain) -> Vec<&Certificate> {
        self.domains
            .get(&domain)
            .into_iter()
            .flat_map(|by_subject| by_subject.values().flatten())
            .collect()
    }

    /// Every trusted certificate, regardless of domain, without duplicates.
    pub fn get_all_trusted(&self) -> Vec<&Certificate> {
        let mut all: Vec<&Certificate> = Vec::new();
        for domain in TrustDomain::ALL {
            for cert in self.get_domain_trusted(domain) {
                if !all.contains(&cert) {
                    all.push(cert);
                }
            }
        }
        all
    }

    /// Every domain `cert` is trusted for.
    pub fn trusted_domains(&self, cert: &Certificate) -> Vec<TrustDomain> {
        TrustDomain::ALL
            .into_iter()
            .filter(|domain| self.is_trusted(*domain, cert))
            .collect()
    }

    /// Return `true` if no certificate is trusted for any domain.
    pub fn is_empty(&self) -> bool {
        self.domains.values().all(HashMap::is_empty)
    }
}
