//! Inline session policies attached to token exchanges.
//!
//! The assumed role itself carries no permissions; everything a session can
//! do is granted here, scoped to the single bucket being accessed.

/// Build the session policy document for `bucket`.
///
/// One statement covers bucket-level list/configuration actions, the other
/// object-level CRUD and multipart actions under the bucket.
pub fn session_policy(bucket: &str) -> String {
    let bucket_arn = format!("arn:aws:s3:::{}", bucket);
    let objects_arn = format!("arn:aws:s3:::{}/*", bucket);
    serde_json::json!({
        "Version": "2012-10-17",
        "Statement": [
            {
                "Sid": "BucketAccess",
                "Effect": "Allow",
                "Action": [
                    "s3:ListBucket",
                    "s3:GetBucketLocation",
                    "s3:GetBucketVersioning",
                    "s3:GetLifecycleConfiguration",
                    "s3:PutLifecycleConfiguration",
                    "s3:GetReplicationConfiguration"
                ],
                "Resource": [bucket_arn]
            },
            {
                "Sid": "ObjectAccess",
                "Effect": "Allow",
                "Action": [
                    "s3:GetObject",
                    "s3:PutObject",
                    "s3:DeleteObject",
                    "s3:AbortMultipartUpload",
                    "s3:ListMultipartUploadParts"
                ],
                "Resource": [objects_arn]
            }
        ]
    })
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_policy_is_scoped_to_bucket() {
        let policy = session_policy("bucket1");
        let parsed: serde_json::Value = serde_json::from_str(&policy).unwrap();

        let statements = parsed["Statement"].as_array().unwrap();
        assert_eq!(statements.len(), 2);
        assert_eq!(
            statements[0]["Resource"][0].as_str().unwrap(),
            "arn:aws:s3:::bucket1"
        );
        assert_eq!(
            statements[1]["Resource"][0].as_str().unwrap(),
            "arn:aws:s3:::bucket1/*"
        );
        // No cross-bucket wildcard anywhere.
        assert!(!policy.contains("arn:aws:s3:::*"));
    }
}
