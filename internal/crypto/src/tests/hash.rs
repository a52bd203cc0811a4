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

use crate::{
    hash::{sha1, sha256, HashAlgorithm},
    oids,
};

#[test]
fn test_sha1() {
    let hash = sha1(b"test message");
    assert_eq!(
        hash,
        [
            53, 238, 131, 134, 65, 13, 65, 209, 75, 63, 119, 159, 201, 95, 70, 149, 244, 133, 22,
            130
        ]
    );
}

#[test]
fn test_sha256() {
    let hash = sha256(b"test message");
    assert_eq!(
        hash,
        [
            63, 10, 55, 123, 160, 164, 164, 96, 236, 182, 22, 246, 80, 124, 224, 216, 207, 163,
            231, 4, 2, 93, 79, 218, 62, 208, 197, 202, 5, 70, 135, 40
        ]
    );
}

#[test]
fn algorithm_by_oid() {
    assert_eq!(HashAlgorithm::from_oid(oids::SHA1), Some(HashAlgorithm::Sha1));
    assert_eq!(
        HashAlgorithm::from_oid(oids::SHA256),
        Some(HashAlgorithm::Sha256)
    );
    assert_eq!(HashAlgorithm::from_oid("1.2.3.4"), None);

    for alg in [
        HashAlgorithm::Sha1,
        HashAlgorithm::Sha256,
        HashAlgorithm::Sha384,
        HashAlgorithm::Sha512,
    ] {
        assert_eq!(HashAlgorithm::from_oid(alg.oid()), Some(alg));
    }
}

#[test]
fn digest_lengths() {
    assert_eq!(HashAlgorithm::Sha1.digest(b"x").len(), 20);
    assert_eq!(HashAlgorithm::Sha256.digest(b"x").len(), 32);
    assert_eq!(HashAlgorithm::Sha384.digest(b"x").len(), 48);
    assert_eq!(HashAlgorithm::Sha512.digest(b"x").len(), 64);
    assert_eq!(HashAlgorithm::Sha256.digest(b"test message"), sha256(b"test message"));
}
