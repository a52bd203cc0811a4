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

//! Names of the checks that produce [`ReportItem`]s.
//!
//! Every item carries one of these so that callers can group findings by the
//! validator stage that made them.
//!
//! [`ReportItem`]: crate::ReportItem

/// Findings of the certificate chain walker (trust, validity, issuer search).
pub const CERTIFICATE_CHECK: &str = "Certificate check.";

/// Findings about required certificate extensions.
pub const EXTENSIONS_CHECK: &str = "Required certificate extensions check.";

/// Findings of the revocation data orchestrator.
pub const REVOCATION_DATA_CHECK: &str = "Revocation data check.";

/// Findings of the OCSP response validator.
pub const OCSP_CHECK: &str = "OCSP response check.";

/// Findings of the OCSP responder trust resolution.
pub const OCSP_RESPONDER_CHECK: &str = "OCSP responder check.";

/// Findings of the CRL validator.
pub const CRL_CHECK: &str = "CRL response check.";
