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

use std::{cmp::Reverse, sync::Arc};

use certval_crypto::{
    crl::Crl,
    ocsp::{BasicOcspResponse, SingleResponse},
    Certificate,
};
use certval_report::{check_names::*, report_item, ValidationReport, ValidationResult};
use chrono::{DateTime, Utc};

use crate::{
    context::{CertificateSource, ValidationContext, ValidatorKind},
    error::safe_call,
    validator_chain::ValidatorChain,
    validators::ValidationPath,
    Result,
};

/// One piece of revocation evidence about a certificate.
#[derive(Clone, Debug)]
pub enum RevocationEvidence {
    /// A single response together with the OCSP response that carries it.
    Ocsp {
        /// The entry about the certificate.
        single: SingleResponse,

        /// The enclosing response.
        response: Arc<BasicOcspResponse>,
    },

    /// A CRL issued by the certificate's issuer.
    Crl(Arc<Crl>),
}

impl RevocationEvidence {
    /// When the evidence was known to be correct.
    pub fn this_update(&self) -> DateTime<Utc> {
        match self {
            Self::Ocsp { single, .. } => single.this_update,
            Self::Crl(crl) => crl.this_update,
        }
    }
}

/// Decides whether a certificate has been revoked, using every OCSP response
/// and CRL the configured sources can supply.
///
/// Evidence is tried newest first. The first piece that gives a conclusive
/// answer decides; if none does, the certificate's revocation status is
/// indeterminate.
#[derive(Clone, Copy)]
pub struct RevocationDataValidator<'a> {
    chain: &'a ValidatorChain,
}

impl<'a> RevocationDataValidator<'a> {
    pub(crate) fn new(chain: &'a ValidatorChain) -> Self {
        Self { chain }
    }

    /// Check the revocation status of `cert` as of `date`, appending findings
    /// to `report`.
    pub fn validate(
        &self,
        report: &mut ValidationReport,
        ctx: &ValidationContext,
        cert: &Certificate,
        date: DateTime<Utc>,
    ) -> Result<()> {
        let mut path = ValidationPath::default();
        path.push(cert);
        self.validate_with_path(report, ctx, cert, date, &mut path)
    }

    pub(crate) fn validate_with_path(
        &self,
        report: &mut ValidationReport,
        ctx: &ValidationContext,
        cert: &Certificate,
        date: DateTime<Utc>,
        path: &mut ValidationPath,
    ) -> Result<()> {
        let ctx = ctx.with_validator(ValidatorKind::RevocationData);

        if self.is_exempt(report, &ctx, cert) {
            return Ok(());
        }

        let evidence = self.gather_evidence(report, cert)?;
        log::debug!("{} pieces of revocation evidence for {cert}", evidence.len());

        let mut inconclusive = Vec::new();
        for piece in &evidence {
            let mut sub_report = ValidationReport::new();
            self.validate_evidence(&mut sub_report, &ctx, cert, piece, date, path)?;

            if sub_report.result() != ValidationResult::Indeterminate {
                report.merge(&sub_report);
                return Ok(());
            }
            inconclusive.push(sub_report);
        }

        for sub_report in &inconclusive {
            report.merge(sub_report);
        }

        report_item!(
            REVOCATION_DATA_CHECK,
            "certificate revocation status cannot be checked: no usable revocation data"
        )
        .certificate(cert.label())
        .indeterminate(report);

        Ok(())
    }

    // Certificates that never need revocation data get a single INFO item.
    fn is_exempt(
        &self,
        report: &mut ValidationReport,
        ctx: &ValidationContext,
        cert: &Certificate,
    ) -> bool {
        let reason = if cert.is_self_signed() {
            "certificate is self-signed, revocation data check is not applicable"
        } else if cert.has_validity_assured_short_term() {
            "certificate has the validity assured short-term extension, revocation data check is skipped"
        } else if ctx.certificate_source() == CertificateSource::OcspIssuer
            && cert.has_ocsp_no_check()
        {
            "OCSP responder certificate has the id-pkix-ocsp-nocheck extension, revocation data check is skipped"
        } else if cert.has_no_revocation_available() {
            "certificate has the no-revocation-available extension, revocation data check is skipped"
        } else {
            return false;
        };

        report_item!(REVOCATION_DATA_CHECK, reason)
            .certificate(cert.label())
            .info(report);
        true
    }

    fn validate_evidence(
        &self,
        report: &mut ValidationReport,
        ctx: &ValidationContext,
        cert: &Certificate,
        evidence: &RevocationEvidence,
        date: DateTime<Utc>,
        path: &mut ValidationPath,
    ) -> Result<()> {
        match evidence {
            RevocationEvidence::Ocsp { single, response } => self
                .chain
                .ocsp_validator()
                .validate_with_path(report, ctx, cert, single, response, date, path),
            RevocationEvidence::Crl(crl) => self
                .chain
                .crl_validator()
                .validate_with_path(report, ctx, cert, crl, date, path),
        }
    }

    /// Collect every piece of evidence about `cert`, newest first.
    ///
    /// OCSP responses and CRLs are each sorted by `thisUpdate`, newest
    /// first, and then interleaved by the same key. On equal times the OCSP
    /// response goes first.
    pub fn gather_evidence(
        &self,
        report: &mut ValidationReport,
        cert: &Certificate,
    ) -> Result<Vec<RevocationEvidence>> {
        let mut ocsp = self.gather_ocsp(report, cert)?;
        let mut crls = self.gather_crls(report, cert)?;

        ocsp.sort_by_key(|e| Reverse(e.this_update()));
        crls.sort_by_key(|e| Reverse(e.this_update()));

        Ok(interleave_by_recency(ocsp, crls))
    }

    fn gather_ocsp(
        &self,
        report: &mut ValidationReport,
        cert: &Certificate,
    ) -> Result<Vec<RevocationEvidence>> {
        let mut evidence: Vec<RevocationEvidence> = Vec::new();

        if self.chain.ocsp_sources().is_empty() {
            return Ok(evidence);
        }

        let label = cert.label();
        let candidates = safe_call(
            report,
            || self.chain.retriever().retrieve_issuer_candidates(cert),
            |err, report| {
                report_item!(
                    REVOCATION_DATA_CHECK,
                    "issuer certificate could not be retrieved for OCSP lookup"
                )
                .certificate(label.clone())
                .cause(err)
                .info(report)
            },
        )?
        .unwrap_or_default();

        for candidate in &candidates {
            for source in self.chain.ocsp_sources() {
                let fetched = safe_call(
                    report,
                    || source.fetch_ocsp(cert, &candidate.certificate),
                    |err, report| {
                        report_item!(REVOCATION_DATA_CHECK, "OCSP response could not be fetched")
                            .certificate(label.clone())
                            .cause(err)
                            .info(report)
                    },
                )?;

                let Some(Some(data)) = fetched else {
                    continue;
                };

                let response = match data.decode() {
                    Ok(response) => Arc::new(response),
                    Err(err) => {
                        report_item!(REVOCATION_DATA_CHECK, "OCSP response could not be parsed")
                            .certificate(label.clone())
                            .cause(err)
                            .info(report);
                        continue;
                    }
                };

                for single in &response.responses {
                    if single.cert_id.serial != cert.serial() {
                        continue;
                    }
                    let duplicate = evidence.iter().any(|e| match e {
                        RevocationEvidence::Ocsp {
                            single: seen,
                            response: seen_response,
                        } => seen == single && seen_response.produced_at == response.produced_at,
                        RevocationEvidence::Crl(_) => false,
                    });
                    if !duplicate {
                        evidence.push(RevocationEvidence::Ocsp {
                            single: single.clone(),
                            response: response.clone(),
                        });
                    }
                }
            }
        }

        Ok(evidence)
    }

    fn gather_crls(
        &self,
        report: &mut ValidationReport,
        cert: &Certificate,
    ) -> Result<Vec<RevocationEvidence>> {
        let mut evidence: Vec<RevocationEvidence> = Vec::new();
        let label = cert.label();

        for source in self.chain.crl_sources() {
            let fetched = safe_call(
                report,
                || source.fetch_crls(cert),
                |err, report| {
                    report_item!(REVOCATION_DATA_CHECK, "CRL could not be fetched")
                        .certificate(label.clone())
                        .cause(err)
                        .info(report)
                },
            )?;

            for data in fetched.unwrap_or_default() {
                match data.decode() {
                    Ok(crl) => {
                        let seen = evidence
                            .iter()
                            .any(|e| matches!(e, RevocationEvidence::Crl(c) if **c == crl));
                        if !seen {
                            evidence.push(RevocationEvidence::Crl(Arc::new(crl)));
                        }
                    }
                    Err(err) => {
                        report_item!(REVOCATION_DATA_CHECK, "CRL incorrectly formatted")
                            .certificate(label.clone())
                            .cause(err)
                            .info(report);
                    }
                }
            }
        }

        Ok(evidence)
    }
}

// Both inputs are sorted newest first.
fn interleave_by_recency(
    ocsp: Vec<RevocationEvidence>,
    crls: Vec<RevocationEvidence>,
) -> Vec<RevocationEvidence> {
    let mut merged = Vec::with_capacity(ocsp.len() + crls.len());
    let mut ocsp = ocsp.into_iter().peekable();
    let mut crls = crls.into_iter().peekable();

    loop {
        let take_ocsp = match (ocsp.peek(), crls.peek()) {
            (Some(o), Some(c)) => o.this_update() >= c.this_update(),
            (Some(_), None) => true,
            (None, Some(_)) => false,
            (None, None) => break,
        };

        let next = if take_ocsp { ocsp.next() } else { crls.next() };
        merged.extend(next);
    }

    merged
}
