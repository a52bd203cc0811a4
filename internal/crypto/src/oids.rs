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

//! Dotted object identifiers used while decoding and verifying.

/// SHA-1.
pub const SHA1: &str = "1.3.14.3.2.26";
/// SHA-256.
pub const SHA256: &str = "2.16.840.1.101.3.4.2.1";
/// SHA-384.
pub const SHA384: &str = "2.16.840.1.101.3.4.2.2";
/// SHA-512.
pub const SHA512: &str = "2.16.840.1.101.3.4.2.3";

/// sha256WithRSAEncryption.
pub const SHA256_WITH_RSA: &str = "1.2.840.113549.1.1.11";
/// sha384WithRSAEncryption.
pub const SHA384_WITH_RSA: &str = "1.2.840.113549.1.1.12";
/// sha512WithRSAEncryption.
pub const SHA512_WITH_RSA: &str = "1.2.840.113549.1.1.13";
/// RSASSA-PSS.
pub const RSA_PSS: &str = "1.2.840.113549.1.1.10";
/// ecdsa-with-SHA256.
pub const ECDSA_WITH_SHA256: &str = "1.2.840.10045.4.3.2";
/// ecdsa-with-SHA384.
pub const ECDSA_WITH_SHA384: &str = "1.2.840.10045.4.3.3";
/// ecdsa-with-SHA512.
pub const ECDSA_WITH_SHA512: &str = "1.2.840.10045.4.3.4";
/// Ed25519.
pub const ED25519: &str = "1.3.101.112";

/// Extended key usage: TLS server authentication.
pub const EKU_SERVER_AUTH: &str = "1.3.6.1.5.5.7.3.1";

/// Extended key usage: TLS client authentication.
pub const EKU_CLIENT_AUTH: &str = "1.3.6.1.5.5.7.3.2";

/// Extended key usage: code signing.
pub const EKU_CODE_SIGNING: &str = "1.3.6.1.5.5.7.3.3";

/// Extended key usage: email protection.
pub const EKU_EMAIL_PROTECTION: &str = "1.3.6.1.5.5.7.3.4";

/// Extended key usage: time stamping.
pub const EKU_TIME_STAMPING: &str = "1.3.6.1.5.5.7.3.8";

/// Extended key usage: OCSP signing.
pub const EKU_OCSP_SIGNING: &str = "1.3.6.1.5.5.7.3.9";

/// Extended key usage: any.
pub const EKU_ANY: &str = "2.5.29.37.0";

/// id-pkix-ocsp-nocheck.
pub const OCSP_NO_CHECK: &str = "1.3.6.1.5.5.7.48.1.5";

/// id-pkix-ocsp-archive-cutoff.
pub const OCSP_ARCHIVE_CUTOFF: &str = "1.3.6.1.5.5.7.48.1.6";

/// id-pkix-ocsp-basic.
pub const OCSP_BASIC: &str = "1.3.6.1.5.5.7.48.1.1";

/// ETSI validity-assured short-term certificate.
pub const VALIDITY_ASSURED_SHORT_TERM: &str = "0.4.0.194121.2.1";

/// No revocation information available.
pub const NO_REVOCATION_AVAILABLE: &str = "2.5.29.56";
