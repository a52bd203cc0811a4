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

//! Tunables for a validation pass.
//!
//! Settings can be built in code through [`ValidationSettings::builder()`] or
//! read from TOML or JSON text with [`ValidationSettings::from_string()`].
//! Every field is optional in the text form; missing fields keep their
//! defaults.

use std::fmt;

use certval_crypto::{oids, KeyUsageBit};
use chrono::Duration;
use serde::{Deserialize, Serialize};

use crate::{
    context::{CertificateSource, TimeBasedContext, ValidatorKind},
    Error, Result,
};

// Used to validate user input before settings are handed to validators.
pub(crate) trait SettingsValidate {
    // Returns an error if the settings are inconsistent.
    fn validate(&self) -> Result<()> {
        Ok(())
    }
}

/// One extension a certificate must carry for its role.
#[derive(Clone, Debug, Eq, Hash, PartialEq, Deserialize, Serialize)]
#[serde(try_from = "String", into = "String")]
pub enum RequiredExtension {
    /// The key usage extension must assert this bit.
    KeyUsage(KeyUsageBit),

    /// The extended key usage extension must list this OID.
    ExtendedKeyUsage(String),

    /// The certificate must be a CA.
    BasicConstraintsCa,

    /// The certificate must be a CA whose path length constraint admits
    /// every intermediate found below it in the chain so far.
    DynamicBasicConstraints,
}

impl RequiredExtension {
    /// Return `true` if `cert` satisfies this requirement.
    ///
    /// `depth` is the position of `cert` in the chain, with the certificate
    /// that started the walk at depth 0.
    pub fn is_satisfied_by(&self, cert: &certval_crypto::Certificate, depth: usize) -> bool {
        let extensions = cert.extensions();
        match self {
            Self::KeyUsage(bit) => extensions.has_key_usage(*bit),
            Self::ExtendedKeyUsage(oid) => extensions.has_extended_key_usage(oid),
            Self::BasicConstraintsCa => extensions.is_ca(),
            Self::DynamicBasicConstraints => {
                let Some(bc) = &extensions.basic_constraints else {
                    return false;
                };
                if !bc.ca {
                    return false;
                }
                let intermediates_below = depth.saturating_sub(1);
                bc.path_len
                    .map_or(true, |path_len| path_len as usize >= intermediates_below)
            }
        }
    }
}

impl fmt::Display for RequiredExtension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::KeyUsage(bit) => write!(f, "keyUsage:{bit}"),
            Self::ExtendedKeyUsage(oid) => write!(f, "extendedKeyUsage:{oid}"),
            Self::BasicConstraintsCa => write!(f, "basicConstraints:ca"),
            Self::DynamicBasicConstraints => write!(f, "basicConstraints:dynamic"),
        }
    }
}

impl From<RequiredExtension> for String {
    fn from(ext: RequiredExtension) -> Self {
        ext.to_string()
    }
}

impl TryFrom<String> for RequiredExtension {
    type Error = String;

    fn try_from(value: String) -> std::result::Result<Self, Self::Error> {
        let Some((kind, arg)) = value.split_once(':') else {
            return Err(format!("malformed required extension {value:?}"));
        };

        match (kind, arg) {
            ("keyUsage", bit) => KeyUsageBit::from_name(bit)
                .map(Self::KeyUsage)
                .ok_or_else(|| format!("unknown key usage {bit:?}")),
            ("extendedKeyUsage", oid) if is_dotted_oid(oid) => {
                Ok(Self::ExtendedKeyUsage(oid.to_string()))
            }
            ("basicConstraints", "ca") => Ok(Self::BasicConstraintsCa),
            ("basicConstraints", "dynamic") => Ok(Self::DynamicBasicConstraints),
            _ => Err(format!("unknown required extension {value:?}")),
        }
    }
}

fn is_dotted_oid(oid: &str) -> bool {
    !oid.is_empty()
        && oid
            .split('.')
            .all(|arc| !arc.is_empty() && arc.bytes().all(|b| b.is_ascii_digit()))
}

/// Extensions required per certificate role.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(default)]
pub struct RequiredExtensions {
    /// Requirements for document signers.
    pub signer: Vec<RequiredExtension>,

    /// Requirements for issuers met while walking a chain.
    pub cert_issuer: Vec<RequiredExtension>,

    /// Requirements for OCSP responders.
    pub ocsp_issuer: Vec<RequiredExtension>,

    /// Requirements for CRL signers.
    pub crl_issuer: Vec<RequiredExtension>,

    /// Requirements for time stamp signers.
    pub timestamp: Vec<RequiredExtension>,
}

impl RequiredExtensions {
    /// The requirements for `source`.
    pub fn for_source(&self, source: CertificateSource) -> &[RequiredExtension] {
        match source {
            CertificateSource::Signer => &self.signer,
            CertificateSource::CertIssuer => &self.cert_issuer,
            CertificateSource::OcspIssuer => &self.ocsp_issuer,
            CertificateSource::CrlIssuer => &self.crl_issuer,
            CertificateSource::Timestamp => &self.timestamp,
        }
    }

    fn for_source_mut(&mut self, source: CertificateSource) -> &mut Vec<RequiredExtension> {
        match source {
            CertificateSource::Signer => &mut self.signer,
            CertificateSource::CertIssuer => &mut self.cert_issuer,
            CertificateSource::OcspIssuer => &mut self.ocsp_issuer,
            CertificateSource::CrlIssuer => &mut self.crl_issuer,
            CertificateSource::Timestamp => &mut self.timestamp,
        }
    }
}

impl Default for RequiredExtensions {
    fn default() -> Self {
        Self {
            signer: Vec::new(),
            cert_issuer: vec![
                RequiredExtension::KeyUsage(KeyUsageBit::KeyCertSign),
                RequiredExtension::DynamicBasicConstraints,
            ],
            ocsp_issuer: vec![RequiredExtension::ExtendedKeyUsage(
                oids::EKU_OCSP_SIGNING.to_string(),
            )],
            crl_issuer: vec![RequiredExtension::KeyUsage(KeyUsageBit::CrlSign)],
            timestamp: vec![RequiredExtension::ExtendedKeyUsage(
                oids::EKU_TIME_STAMPING.to_string(),
            )],
        }
    }
}

/// Whether a validator keeps going after its report turned invalid.
///
/// The revocation orchestrator and the CRL validator always stop at their
/// first conclusive finding, so they have no flag.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(default)]
pub struct ContinueAfterFailure {
    /// Chain walker: keep checking validity, revocation and issuers after a
    /// certificate was found invalid.
    pub certificate_chain: bool,

    /// OCSP validator: keep trying issuer candidates after one of them gave
    /// an invalid outcome.
    pub ocsp: bool,
}

impl ContinueAfterFailure {
    /// The flag for `kind`.
    pub fn for_validator(&self, kind: ValidatorKind) -> bool {
        match kind {
            ValidatorKind::CertificateChain => self.certificate_chain,
            ValidatorKind::Ocsp => self.ocsp,
            ValidatorKind::RevocationData | ValidatorKind::Crl => true,
        }
    }
}

impl Default for ContinueAfterFailure {
    fn default() -> Self {
        Self {
            certificate_chain: true,
            ocsp: true,
        }
    }
}

/// All tunables of a validation pass.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(default)]
pub struct ValidationSettings {
    /// Maximum age of revocation data when validating as of now.
    #[serde(with = "duration_seconds")]
    pub present_freshness: Duration,

    /// Maximum distance between revocation data and a historical date.
    #[serde(with = "duration_seconds")]
    pub historical_freshness: Duration,

    /// Extensions required per certificate role.
    pub required_extensions: RequiredExtensions,

    /// Per-validator behaviour after an invalid finding.
    pub continue_after_failure: ContinueAfterFailure,
}

impl ValidationSettings {
    /// Start building settings from the defaults.
    pub fn builder() -> ValidationSettingsBuilder {
        ValidationSettingsBuilder::default()
    }

    /// Parse settings from `format`, which is `"toml"` or `"json"`.
    pub fn from_string(settings_str: &str, format: &str) -> Result<Self> {
        let settings: Self = match format.to_lowercase().as_str() {
            "toml" => toml::from_str(settings_str)
                .map_err(|e| Error::InvalidSettings(e.message().to_string()))?,
            "json" => serde_json::from_str(settings_str)
                .map_err(|e| Error::InvalidSettings(e.to_string()))?,
            _ => {
                return Err(Error::InvalidSettings(format!(
                    "unsupported settings format {format:?}"
                )))
            }
        };

        settings.validate()?;
        Ok(settings)
    }

    /// Parse settings from TOML text.
    pub fn from_toml_str(settings_str: &str) -> Result<Self> {
        Self::from_string(settings_str, "toml")
    }

    /// Parse settings from JSON text.
    pub fn from_json_str(settings_str: &str) -> Result<Self> {
        Self::from_string(settings_str, "json")
    }

    /// Render the settings as TOML.
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string(self).map_err(|e| Error::InvalidSettings(e.to_string()))
    }

    /// Extensions a certificate playing `source` must carry.
    pub fn required_extensions(&self, source: CertificateSource) -> &[RequiredExtension] {
        self.required_extensions.for_source(source)
    }

    /// Freshness window for revocation data in `time_based`.
    pub fn freshness(&self, time_based: TimeBasedContext) -> Duration {
        match time_based {
            TimeBasedContext::Present => self.present_freshness,
            TimeBasedContext::Historical => self.historical_freshness,
        }
    }

    /// Whether `kind` keeps going after an invalid finding.
    pub fn continue_after_failure(&self, kind: ValidatorKind) -> bool {
        self.continue_after_failure.for_validator(kind)
    }
}

impl Default for ValidationSettings {
    fn default() -> Self {
        Self {
            present_freshness: Duration::days(30),
            historical_freshness: Duration::minutes(1),
            required_extensions: RequiredExtensions::default(),
            continue_after_failure: ContinueAfterFailure::default(),
        }
    }
}

impl SettingsValidate for ValidationSettings {
    fn validate(&self) -> Result<()> {
        if self.present_freshness < Duration::zero() {
            return Err(Error::InvalidSettings(
                "present_freshness must not be negative".into(),
            ));
        }
        if self.historical_freshness < Duration::zero() {
            return Err(Error::InvalidSettings(
                "historical_freshness must not be negative".into(),
            ));
        }
        Ok(())
    }
}

/// Builds [`ValidationSettings`] in code.
#[derive(Debug, Default)]
pub struct ValidationSettingsBuilder {
    settings: ValidationSettings,
}

impl ValidationSettingsBuilder {
    /// Freshness window used when validating as of now.
    pub fn present_freshness(mut self, freshness: Duration) -> Self {
        self.settings.present_freshness = freshness;
        self
    }

    /// Freshness window used for historical validation.
    pub fn historical_freshness(mut self, freshness: Duration) -> Self {
        self.settings.historical_freshness = freshness;
        self
    }

    /// Replace the requirements for `source`.
    pub fn required_extensions(
        mut self,
        source: CertificateSource,
        extensions: Vec<RequiredExtension>,
    ) -> Self {
        *self.settings.required_extensions.for_source_mut(source) = extensions;
        self
    }

    /// Set the continue-after-failure flags.
    pub fn continue_after_failure(mut self, flags: ContinueAfterFailure) -> Self {
        self.settings.continue_after_failure = flags;
        self
    }

    /// Validate and return the settings.
    pub fn build(self) -> Result<ValidationSettings> {
        self.settings.validate()?;
        Ok(self.settings)
    }
}

mod duration_seconds {
    use chrono::Duration;
    use serde::{de::Error as _, Deserialize, Deserializer, Serializer};

    pub(super) fn serialize<S: Serializer>(
        duration: &Duration,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.serialize_i64(duration.num_seconds())
    }

    pub(super) fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Duration, D::Error> {
        let secs = i64::deserialize(deserializer)?;
        Duration::try_seconds(secs)
            .ok_or_else(|| D::Error::custom(format!("duration of {secs} seconds is out of range")))
    }
}
