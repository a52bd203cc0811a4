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

use std::sync::Arc;

use certval_crypto::{ocsp::CertStatus, oids, Certificate};
use certval_report::{check_names::*, ItemStatus, ValidationReport, ValidationResult};

use super::support::*;
use crate::{
    context::{CertificateSource, ValidationContext},
    error::SourceError,
    sources::{CertificateRetriever, StaticRevocationSource},
    trust_store::TrustedCertificatesStore,
    validator_chain::{ValidatorChain, ValidatorChainBuilder},
    validators::RevocationEvidence,
};

struct Pki {
    root: Certificate,
    inter: Certificate,
    leaf: Certificate,
}

fn pki() -> Pki {
    let root = self_signed(ca("CN=Root"));
    let inter = issued_by(
        ca("CN=Intermediate")
            .serial(2)
            .extension(oids::VALIDITY_ASSURED_SHORT_TERM),
        &root,
    );
    let leaf = issued_by(end_entity("CN=Leaf", 3), &inter);
    Pki { root, inter, leaf }
}

fn test_pki(pki: &Pki) -> TestPki {
    let mut test_pki = TestPki::default();
    test_pki.store.add_ca_trusted([pki.root.clone()]);
    test_pki.document.push(pki.inter.clone());
    test_pki
}

fn check(chain: &ValidatorChain, ctx: &ValidationContext, cert: &Certificate) -> ValidationReport {
    let mut report = ValidationReport::new();
    chain
        .revocation_data_validator()
        .validate(&mut report, ctx, cert, now())
        .unwrap();
    report
}

#[test]
fn no_revocation_data_is_indeterminate() {
    let pki = pki();
    let chain = test_pki(&pki).chain();

    let report = check(&chain, &ValidationContext::signer(), &pki.leaf);

    assert_eq!(report.len(), 1);
    assert_eq!(report.result(), ValidationResult::Indeterminate);
    assert!(report.has_message("no usable revocation data"));
}

#[test]
fn exempt_certificates() {
    let pki = pki();
    let chain = test_pki(&pki).chain();

    let no_check = issued_by(
        responder("CN=Responder", 9).extension(oids::OCSP_NO_CHECK),
        &pki.inter,
    );

    // id-pkix-ocsp-nocheck only counts for OCSP responders.
    let report = check(&chain, &ValidationContext::signer(), &no_check);
    assert_eq!(report.result(), ValidationResult::Indeterminate);

    let responder_ctx =
        ValidationContext::signer().with_certificate_source(CertificateSource::OcspIssuer);
    let report = check(&chain, &responder_ctx, &no_check);
    assert_eq!(report.len(), 1);
    assert_eq!(report.items()[0].status, ItemStatus::Info);
    assert!(report.has_message("id-pkix-ocsp-nocheck"));

    let no_rev_avail = issued_by(
        end_entity("CN=Attribute", 10).extension(oids::NO_REVOCATION_AVAILABLE),
        &pki.inter,
    );
    let report = check(&chain, &ValidationContext::signer(), &no_rev_avail);
    assert_eq!(report.len(), 1);
    assert!(report.has_message("no-revocation-available"));

    let report = check(&chain, &ValidationContext::signer(), &pki.inter);
    assert_eq!(report.len(), 1);
    assert!(report.has_message("short-term"));

    let report = check(&chain, &ValidationContext::signer(), &pki.root);
    assert_eq!(report.len(), 1);
    assert!(report.has_message("self-signed"));
}

#[test]
fn newer_indeterminate_ocsp_falls_through_to_older_crl() {
    let pki = pki();

    let mut test_pki = test_pki(&pki);
    test_pki.ocsp.push(ocsp_response(
        &pki.leaf,
        &pki.inter,
        &pki.inter,
        CertStatus::Unknown,
        now() - days(1),
    ));
    test_pki
        .crls
        .push(crl(&pki.inter, now() - days(2), &[(3, now() - days(3))]));
    let chain = test_pki.chain();

    let mut report = ValidationReport::new();
    let evidence = chain
        .revocation_data_validator()
        .gather_evidence(&mut report, &pki.leaf)
        .unwrap();
    assert!(report.is_empty());
    assert_eq!(evidence.len(), 2);
    assert!(matches!(evidence[0], RevocationEvidence::Ocsp { .. }));
    assert!(matches!(evidence[1], RevocationEvidence::Crl(_)));

    let report = check(&chain, &ValidationContext::signer(), &pki.leaf);

    assert_eq!(report.result(), ValidationResult::Invalid);
    assert!(report.has_message("revoked"));
    // Only the conclusive evidence is reported.
    assert!(!report.has_message("UNKNOWN"));
    assert!(!report.has_check(OCSP_CHECK));
}

#[test]
fn newest_conclusive_evidence_decides() {
    let pki = pki();

    let mut test_pki = test_pki(&pki);
    test_pki.ocsp.push(ocsp_response(
        &pki.leaf,
        &pki.inter,
        &pki.inter,
        CertStatus::Good,
        now() - days(1),
    ));
    test_pki
        .crls
        .push(crl(&pki.inter, now() - days(5), &[(3, now() - days(6))]));
    let chain = test_pki.chain();

    let report = check(&chain, &ValidationContext::signer(), &pki.leaf);

    assert_eq!(report.result(), ValidationResult::Valid);
    assert_eq!(report.len(), 1);
    assert!(report.has_message("GOOD"));
}

#[test]
fn equal_times_put_ocsp_first() {
    let pki = pki();
    let at = now() - days(2);

    let mut test_pki = test_pki(&pki);
    test_pki
        .ocsp
        .push(ocsp_response(&pki.leaf, &pki.inter, &pki.inter, CertStatus::Good, at));
    test_pki.crls.push(crl(&pki.inter, at, &[]));
    test_pki.crls.push(crl(&pki.inter, at + days(1), &[]));
    let chain = test_pki.chain();

    let mut report = ValidationReport::new();
    let evidence = chain
        .revocation_data_validator()
        .gather_evidence(&mut report, &pki.leaf)
        .unwrap();

    let times: Vec<_> = evidence.iter().map(|e| e.this_update()).collect();
    assert_eq!(times, vec![at + days(1), at, at]);
    assert!(matches!(evidence[0], RevocationEvidence::Crl(_)));
    assert!(matches!(evidence[1], RevocationEvidence::Ocsp { .. }));
    assert!(matches!(evidence[2], RevocationEvidence::Crl(_)));
}

#[test]
fn all_inconclusive_evidence_is_merged() {
    let pki = pki();

    let mut test_pki = test_pki(&pki);
    test_pki.ocsp.push(ocsp_response(
        &pki.leaf,
        &pki.inter,
        &pki.inter,
        CertStatus::Good,
        now() - days(40),
    ));
    test_pki.crls.push(crl(&pki.inter, now() - days(40), &[]));
    let chain = test_pki.chain();

    let report = check(&chain, &ValidationContext::signer(), &pki.leaf);

    assert_eq!(report.result(), ValidationResult::Indeterminate);
    assert_eq!(report.len(), 3);
    assert!(report.has_check(OCSP_CHECK));
    assert!(report.has_check(CRL_CHECK));
    assert!(report.has_message("no usable revocation data"));
}

fn chain_with_sources(
    pki: &Pki,
    ocsp: Arc<dyn crate::sources::OcspSource>,
    crls: Arc<dyn crate::sources::CrlSource>,
) -> ValidatorChain {
    let mut store = TrustedCertificatesStore::new();
    store.add_ca_trusted([pki.root.clone()]);
    let store = Arc::new(store);

    let mut retriever = CertificateRetriever::new(store.clone());
    retriever.add_document_certificates([pki.inter.clone()]);

    ValidatorChainBuilder::new()
        .trust_store(store)
        .signature_verifier(Arc::new(TestVerifier))
        .issuer_retriever(Arc::new(retriever))
        .ocsp_source(ocsp)
        .crl_source(crls)
        .build()
        .unwrap()
}

#[test]
fn source_failures_are_info() {
    let pki = pki();
    let failing = Arc::new(FailingSource(SourceError::Failed("timeout".into())));
    let chain = chain_with_sources(&pki, failing.clone(), failing);

    let report = check(&chain, &ValidationContext::signer(), &pki.leaf);

    assert_eq!(report.len(), 3);
    assert_eq!(report.items_with_status(ItemStatus::Info).count(), 2);
    assert!(report.has_message("OCSP response could not be fetched"));
    assert!(report.has_message("CRL could not be fetched"));
    assert_eq!(report.result(), ValidationResult::Indeterminate);
}

#[test]
fn malformed_evidence_is_info() {
    let pki = pki();

    let mut source = StaticRevocationSource::new();
    source.add_ocsp_response(b"not an OCSP response".to_vec());
    source.add_crl(b"not a CRL".to_vec());
    let source = Arc::new(source);
    let chain = chain_with_sources(&pki, source.clone(), source);

    let report = check(&chain, &ValidationContext::signer(), &pki.leaf);

    assert_eq!(report.len(), 3);
    assert!(report.has_message("OCSP response could not be parsed"));
    assert!(report.has_message("CRL incorrectly formatted"));
    assert_eq!(report.result(), ValidationResult::Indeterminate);
}

#[test]
fn crl_of_a_sibling_ca_does_not_hide_a_revocation() {
    let pki = pki();
    let sibling = issued_by(ca("CN=Sibling CA").serial(5), &pki.root);

    let crls = Arc::new(UnscopedCrlSource(vec![
        crl(&pki.inter, now() - days(5), &[(3, now() - days(10))]),
        // Newer, so it is tried first.
        crl(&sibling, now() - days(1), &[]),
    ]));
    let chain = chain_with_sources(&pki, Arc::new(MemoryOcspSource::default()), crls);

    let report = check(&chain, &ValidationContext::signer(), &pki.leaf);

    assert_eq!(report.result(), ValidationResult::Invalid);
    assert!(!report.has_message("does not cover"));
    let invalid: Vec<_> = report.items_with_status(ItemStatus::Invalid).collect();
    assert_eq!(invalid.len(), 1);
    assert_eq!(invalid[0].check, CRL_CHECK);
    assert!(invalid[0].message.contains("revoked"));
}
