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

use chrono::{Duration, TimeZone, Utc};

use crate::{
    hash::{self, HashAlgorithm},
    ocsp::{BasicOcspResponse, CertId, CertStatus, OcspError, ResponderId},
    oids, Certificate,
};

const ROOT: &[u8] = include_bytes!("fixtures/root.der");
const INTERMEDIATE: &[u8] = include_bytes!("fixtures/inter.der");
const LEAF: &[u8] = include_bytes!("fixtures/leaf.der");
const OCSP_RESPONDER: &[u8] = include_bytes!("fixtures/ocsp.der");
const GOOD: &[u8] = include_bytes!("fixtures/leaf-good.ocsp.der");
const REVOKED: &[u8] = include_bytes!("fixtures/revoked.ocsp.der");
const HIGH_SERIAL_CA: &[u8] = include_bytes!("fixtures/high-serial-ca.der");
const HIGH_SERIAL: &[u8] = include_bytes!("fixtures/high-serial.der");
const HIGH_SERIAL_GOOD: &[u8] = include_bytes!("fixtures/high-serial.ocsp.der");

#[test]
fn good() {
    let inter = Certificate::from_der(INTERMEDIATE).unwrap();
    let leaf = Certificate::from_der(LEAF).unwrap();
    let responder = Certificate::from_der(OCSP_RESPONDER).unwrap();

    let rsp = BasicOcspResponse::from_der(GOOD).unwrap();

    assert!(matches!(rsp.responder_id, ResponderId::ByName(_)));
    assert!(rsp.responder_id.matches(&responder));
    assert!(!rsp.responder_id.matches(&inter));

    assert_eq!(rsp.certs.len(), 1);
    assert_eq!(rsp.certs[0].serial(), responder.serial());
    assert_eq!(rsp.certs[0].subject(), responder.subject());

    assert_eq!(rsp.responses.len(), 1);
    let single = &rsp.responses[0];
    assert_eq!(single.status, CertStatus::Good);
    assert_eq!(single.cert_id.serial, leaf.serial());
    assert_eq!(single.cert_id.hash_algorithm, oids::SHA1);
    assert!(single.cert_id.matches_issuer(&inter));
    assert_eq!(
        single.cert_id,
        CertId::for_certificate(&leaf, &inter, HashAlgorithm::Sha1)
    );

    assert_eq!(
        single.this_update,
        Utc.with_ymd_and_hms(2026, 10, 17, 17, 58, 8).unwrap()
    );
    assert_eq!(single.next_update, Some(single.this_update + Duration::days(7)));
    assert_eq!(rsp.produced_at, single.this_update);

    assert_eq!(rsp.archive_cutoff, None);
    assert_eq!(rsp.archive_cutoff_for(single), None);

    assert_eq!(rsp.signed_data.algorithm, "1.2.840.10045.4.3.2");
    assert!(!rsp.signed_data.signature.is_empty());
}

#[test]
fn revoked() {
    let root = Certificate::from_der(ROOT).unwrap();
    let inter = Certificate::from_der(INTERMEDIATE).unwrap();

    let rsp = BasicOcspResponse::from_der(REVOKED).unwrap();

    assert_eq!(
        rsp.responder_id,
        ResponderId::ByKey(hash::sha1(inter.public_key()))
    );
    assert!(rsp.responder_id.matches(&inter));
    assert!(rsp.certs.is_empty());

    let single = &rsp.responses[0];
    assert_eq!(single.cert_id.serial, [0x50, 0x05]);
    assert_eq!(single.cert_id.hash_algorithm, oids::SHA256);
    assert!(single.cert_id.matches_issuer(&inter));
    assert!(!single.cert_id.matches_issuer(&root));

    let CertStatus::Revoked {
        revocation_time, ..
    } = &single.status
    else {
        panic!("expected revoked status, got {:?}", single.status);
    };
    assert_eq!(
        *revocation_time,
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
    );
}

#[test]
fn serial_with_high_bit_matches_certificate() {
    // Encoded as 02 03 00 80 F1: the sign octet must not survive.
    let ca = Certificate::from_der(HIGH_SERIAL_CA).unwrap();
    let leaf = Certificate::from_der(HIGH_SERIAL).unwrap();

    let rsp = BasicOcspResponse::from_der(HIGH_SERIAL_GOOD).unwrap();

    let single = &rsp.responses[0];
    assert_eq!(single.cert_id.serial, [0x80, 0xf1]);
    assert_eq!(single.cert_id.serial, leaf.serial());
    assert_eq!(
        single.cert_id,
        CertId::for_certificate(&leaf, &ca, HashAlgorithm::Sha1)
    );
    assert_eq!(single.status, CertStatus::Good);
}

#[test]
fn unsupported_cert_id_hash_never_matches() {
    let inter = Certificate::from_der(INTERMEDIATE).unwrap();
    let leaf = Certificate::from_der(LEAF).unwrap();

    let mut id = CertId::for_certificate(&leaf, &inter, HashAlgorithm::Sha256);
    assert!(id.matches_issuer(&inter));

    id.hash_algorithm = "1.2.840.113549.2.5".to_string(); // MD5
    assert!(!id.matches_issuer(&inter));
}

#[test]
fn archive_cutoff_prefers_single_extension() {
    let mut rsp = BasicOcspResponse::from_der(GOOD).unwrap();
    let response_cutoff = Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap();
    let single_cutoff = Utc.with_ymd_and_hms(2021, 1, 1, 0, 0, 0).unwrap();

    rsp.archive_cutoff = Some(response_cutoff);
    assert_eq!(rsp.archive_cutoff_for(&rsp.responses[0]), Some(response_cutoff));

    rsp.responses[0].archive_cutoff = Some(single_cutoff);
    assert_eq!(rsp.archive_cutoff_for(&rsp.responses[0]), Some(single_cutoff));
}

#[test]
fn garbage() {
    assert!(matches!(
        BasicOcspResponse::from_der(b"definitely not OCSP"),
        Err(OcspError::InvalidResponse(_))
    ));
    assert!(BasicOcspResponse::from_basic_der(&[0x30, 0x00]).is_err());
}
