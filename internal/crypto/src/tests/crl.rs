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
    crl::{Crl, CrlError},
    Certificate,
};

const INTERMEDIATE: &[u8] = include_bytes!("fixtures/inter.der");
const LEAF: &[u8] = include_bytes!("fixtures/leaf.der");
const CRL: &[u8] = include_bytes!("fixtures/inter.crl.der");

#[test]
fn decode() {
    let inter = Certificate::from_der(INTERMEDIATE).unwrap();
    let crl = Crl::from_der(CRL).unwrap();

    assert_eq!(crl.issuer_raw, inter.subject_raw());
    assert_eq!(crl.issuer, inter.subject());
    assert_eq!(
        crl.this_update,
        Utc.with_ymd_and_hms(2026, 10, 17, 17, 58, 8).unwrap()
    );
    assert_eq!(crl.next_update, Some(crl.this_update + Duration::days(30)));
    assert_eq!(crl.signed_data.algorithm, "1.2.840.10045.4.3.2");
    assert_eq!(crl.der, CRL);

    assert_eq!(crl.revoked.len(), 1);
    let entry = &crl.revoked[0];
    assert_eq!(entry.serial, [0x50, 0x05]);
    assert_eq!(
        entry.revocation_date,
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
    );
    assert_eq!(entry.reason, None);
}

#[test]
fn find_revoked() {
    let leaf = Certificate::from_der(LEAF).unwrap();
    let crl = Crl::from_der(CRL).unwrap();

    assert!(crl.find_revoked(&[0x50, 0x05]).is_some());
    assert!(crl.find_revoked(leaf.serial()).is_none());
}

#[test]
fn pem_bundle() {
    let pem = crate::base64::pem_block("X509 CRL", CRL);
    let crls = Crl::from_pem_bundle(pem.as_bytes()).unwrap();
    assert_eq!(crls, vec![Crl::from_der(CRL).unwrap()]);

    // Certificates in the bundle are ignored.
    let cert_pem = crate::base64::pem_block("CERTIFICATE", INTERMEDIATE);
    assert!(Crl::from_pem_bundle(cert_pem.as_bytes()).unwrap().is_empty());
}

#[test]
fn garbage() {
    assert!(matches!(
        Crl::from_der(b"not a crl"),
        Err(CrlError::InvalidCrl(_))
    ));
}
