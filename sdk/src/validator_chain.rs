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

//! Wiring of the validators and their collaborators.

use std::sync::Arc;

use certval_crypto::raw_signature::SignatureVerifier;

use crate::{
    settings::ValidationSettings,
    sources::{CertificateRetriever, CrlSource, IssuerRetriever, OcspSource},
    trust_store::TrustedCertificatesStore,
    validators::{CertificateChainValidator, CrlValidator, OcspValidator, RevocationDataValidator},
    Error, Result,
};

/// The collaborators and settings shared by every validator.
///
/// A `ValidatorChain` is built once with [`ValidatorChainBuilder`] and can
/// then serve any number of validation calls, from any number of threads.
/// Validators are cheap views handed out by the accessor methods.
///
/// # Example
///
/// ```
/// # use std::sync::Arc;
/// use certval::{
///     crypto::raw_signature::NativeVerifier, TrustedCertificatesStore, ValidatorChainBuilder,
/// };
///
/// # fn main() -> certval::Result<()> {
/// let chain = ValidatorChainBuilder::new()
///     .trust_store(Arc::new(TrustedCertificatesStore::new()))
///     .signature_verifier(Arc::new(NativeVerifier))
///     .build()?;
///
/// let _validator = chain.certificate_chain_validator();
/// # Ok(())
/// # }
/// ```
pub struct ValidatorChain {
    settings: ValidationSettings,
    trust_store: Arc<TrustedCertificatesStore>,
    verifier: Arc<dyn SignatureVerifier>,
    retriever: Arc<dyn IssuerRetriever>,
    ocsp_sources: Vec<Arc<dyn OcspSource>>,
    crl_sources: Vec<Arc<dyn CrlSource>>,
}

impl ValidatorChain {
    /// The walker that validates a certificate up to a trust anchor.
    pub fn certificate_chain_validator(&self) -> CertificateChainValidator<'_> {
        CertificateChainValidator::new(self)
    }

    /// The orchestrator of OCSP and CRL evidence.
    pub fn revocation_data_validator(&self) -> RevocationDataValidator<'_> {
        RevocationDataValidator::new(self)
    }

    /// The validator of a single OCSP response.
    pub fn ocsp_validator(&self) -> OcspValidator<'_> {
        OcspValidator::new(self)
    }

    /// The validator of a single CRL.
    pub fn crl_validator(&self) -> CrlValidator<'_> {
        CrlValidator::new(self)
    }

    /// The settings every validator reads.
    pub fn settings(&self) -> &ValidationSettings {
        &self.settings
    }

    /// The trust anchors.
    pub fn trust_store(&self) -> &TrustedCertificatesStore {
        &self.trust_store
    }

    pub(crate) fn verifier(&self) -> &dyn SignatureVerifier {
        self.verifier.as_ref()
    }

    pub(crate) fn retriever(&self) -> &dyn IssuerRetriever {
        self.retriever.as_ref()
    }

    pub(crate) fn ocsp_sources(&self) -> &[Arc<dyn OcspSource>] {
        &self.ocsp_sources
    }

    pub(crate) fn crl_sources(&self) -> &[Arc<dyn CrlSource>] {
        &self.crl_sources
    }
}

/// Assembles a [`ValidatorChain`].
///
/// A trust store and a signature verifier are mandatory. Without an explicit
/// issuer retriever, a [`CertificateRetriever`] over the trust store is used.
/// Without revocation sources, every certificate that needs revocation data
/// ends up indeterminate.
#[derive(Default)]
pub struct ValidatorChainBuilder {
    settings: ValidationSettings,
    trust_store: Option<Arc<TrustedCertificatesStore>>,
    verifier: Option<Arc<dyn SignatureVerifier>>,
    retriever: Option<Arc<dyn IssuerRetriever>>,
    ocsp_sources: Vec<Arc<dyn OcspSource>>,
    crl_sources: Vec<Arc<dyn CrlSource>>,
}

impl ValidatorChainBuilder {
    /// Start with default settings and no collaborators.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the default settings.
    pub fn settings(mut self, settings: ValidationSettings) -> Self {
        self.settings = settings;
        self
    }

    /// The trust anchors to validate against.
    pub fn trust_store(mut self, trust_store: Arc<TrustedCertificatesStore>) -> Self {
        self.trust_store = Some(trust_store);
        self
    }

    /// The cryptography provider.
    pub fn signature_verifier(mut self, verifier: Arc<dyn SignatureVerifier>) -> Self {
        self.verifier = Some(verifier);
        self
    }

    /// The issuer lookup.
    pub fn issuer_retriever(mut self, retriever: Arc<dyn IssuerRetriever>) -> Self {
        self.retriever = Some(retriever);
        self
    }

    /// Add a source of OCSP responses. Sources are consulted in the order
    /// they were added.
    pub fn ocsp_source(mut self, source: Arc<dyn OcspSource>) -> Self {
        self.ocsp_sources.push(source);
        self
    }

    /// Add a source of CRLs. Sources are consulted in the order they were
    /// added.
    pub fn crl_source(mut self, source: Arc<dyn CrlSource>) -> Self {
        self.crl_sources.push(source);
        self
    }

    /// Check that the mandatory collaborators are present and assemble the
    /// chain.
    pub fn build(self) -> Result<ValidatorChain> {
        let trust_store = self
            .trust_store
            .ok_or(Error::MissingCollaborator("trust store"))?;

        let verifier = self
            .verifier
            .ok_or(Error::MissingCollaborator("signature verifier"))?;

        let retriever = self.retriever.unwrap_or_else(|| {
            Arc::new(CertificateRetriever::new(trust_store.clone())) as Arc<dyn IssuerRetriever>
        });

        Ok(ValidatorChain {
            settings: self.settings,
            trust_store,
            verifier,
            retriever,
            ocsp_sources: self.ocsp_sources,
            crl_sources: self.crl_sources,
        })
    }
}
