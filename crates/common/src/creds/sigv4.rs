//! Minimal AWS Signature Version 4 signing.
//!
//! Only what the token exchange needs: signing a form-encoded POST with the
//! `content-type;host;x-amz-date` header set. Storage calls themselves are
//! signed by the object-store client, not here.

use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use sha2::{Digest, Sha256};
use url::Url;

type HmacSha256 = Hmac<Sha256>;

pub(crate) struct SignedRequest {
    pub authorization: String,
    pub amz_date: String,
}

pub(crate) fn sha256_hex(data: &[u8]) -> String {
    hex::encode(Sha256::digest(data))
}

fn hmac_sha256(key: &[u8], data: &[u8]) -> Vec<u8> {
    let mut mac = HmacSha256::new_from_slice(key).expect("HMAC accepts keys of any length");
    mac.update(data);
    mac.finalize().into_bytes().to_vec()
}

/// Sign a POST of `body` to `endpoint` for `service` in `region`.
#[allow(clippy::too_many_arguments)]
pub(crate) fn sign_post(
    endpoint: &Url,
    region: &str,
    service: &str,
    access_key_id: &str,
    secret_access_key: &str,
    content_type: &str,
    body: &[u8],
    now: DateTime<Utc>,
) -> SignedRequest {
    let amz_date = now.format("%Y%m%dT%H%M%SZ").to_string();
    let date = now.format("%Y%m%d").to_string();

    // Url::port() is None for scheme-default ports, matching what the HTTP
    // client will put in the Host header.
    let host = match endpoint.port() {
        Some(port) => format!("{}:{}", endpoint.host_str().unwrap_or_default(), port),
        None => endpoint.host_str().unwrap_or_default().to_string(),
    };

    let canonical_uri = if endpoint.path().is_empty() {
        "/"
    } else {
        endpoint.path()
    };
    let canonical_headers = format!(
        "content-type:{}\nhost:{}\nx-amz-date:{}\n",
        content_type, host, amz_date
    );
    let signed_headers = "content-type;host;x-amz-date";
    let canonical_request = format!(
        "POST\n{}\n\n{}\n{}\n{}",
        canonical_uri,
        canonical_headers,
        signed_headers,
        sha256_hex(body)
    );

    let scope = format!("{}/{}/{}/aws4_request", date, region, service);
    let string_to_sign = format!(
        "AWS4-HMAC-SHA256\n{}\n{}\n{}",
        amz_date,
        scope,
        sha256_hex(canonical_request.as_bytes())
    );

    let k_date = hmac_sha256(
        format!("AWS4{}", secret_access_key).as_bytes(),
        date.as_bytes(),
    );
    let k_region = hmac_sha256(&k_date, region.as_bytes());
    let k_service = hmac_sha256(&k_region, service.as_bytes());
    let k_signing = hmac_sha256(&k_service, b"aws4_request");
    let signature = hex::encode(hmac_sha256(&k_signing, string_to_sign.as_bytes()));

    let authorization = format!(
        "AWS4-HMAC-SHA256 Credential={}/{}, SignedHeaders={}, Signature={}",
        access_key_id, scope, signed_headers, signature
    );

    SignedRequest {
        authorization,
        amz_date,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_hmac_sha256_rfc4231_vector() {
        // RFC 4231 test case 1.
        let key = [0x0bu8; 20];
        let out = hmac_sha256(&key, b"Hi There");
        assert_eq!(
            hex::encode(out),
            "b0344c61d8db38535ca8afceaf0bf12b881dc200c9833da726e9376c2e32cff7"
        );
    }

    #[test]
    fn test_signature_shape_and_determinism() {
        let endpoint = Url::parse("http://localhost:9000").unwrap();
        let now = Utc.with_ymd_and_hms(2026, 1, 2, 3, 4, 5).unwrap();
        let sign = || {
            sign_post(
                &endpoint,
                "us-east-1",
                "sts",
                "AK",
                "SK",
                "application/x-www-form-urlencoded; charset=utf-8",
                b"Action=AssumeRole&Version=2011-06-15",
                now,
            )
        };

        let a = sign();
        let b = sign();
        assert_eq!(a.authorization, b.authorization);
        assert_eq!(a.amz_date, "20260102T030405Z");
        assert!(a
            .authorization
            .starts_with("AWS4-HMAC-SHA256 Credential=AK/20260102/us-east-1/sts/aws4_request"));
        assert!(a
            .authorization
            .contains("SignedHeaders=content-type;host;x-amz-date"));

        let signature = a.authorization.rsplit("Signature=").next().unwrap();
        assert_eq!(signature.len(), 64);
        assert!(signature.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_signature_depends_on_secret() {
        let endpoint = Url::parse("http://localhost:9000").unwrap();
        let now = Utc.with_ymd_and_hms(2026, 1, 2, 3, 4, 5).unwrap();
        let a = sign_post(&endpoint, "us-east-1", "sts", "AK", "SK1", "x", b"body", now);
        let b = sign_post(&endpoint, "us-east-1", "sts", "AK", "SK2", "x", b"body", now);
        assert_ne!(a.authorization, b.authorization);
    }
}
