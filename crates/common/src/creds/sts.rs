//! STS AssumeRole client.
//!
//! Speaks the secure-token exchange protocol shared by AWS STS and MinIO's
//! built-in STS endpoint: a SigV4-signed form POST answered with XML.

use chrono::{DateTime, Utc};
use serde::Deserialize;

use super::policy::session_policy;
use super::{sigv4, CredentialProvider, ExchangeError, SessionCredentials};
use crate::node::Node;

const STS_VERSION: &str = "2011-06-15";
const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded; charset=utf-8";
const DEFAULT_DURATION_SECS: u32 = 3600;
const ERROR_DETAIL_LIMIT: usize = 512;

/// Production [`CredentialProvider`] backed by the node's STS endpoint.
pub struct StsClient {
    http: reqwest::Client,
    session_name: String,
    duration_secs: u32,
}

impl Default for StsClient {
    fn default() -> Self {
        Self::new()
    }
}

impl StsClient {
    pub fn new() -> Self {
        Self {
            http: reqwest::Client::new(),
            session_name: "wsio".to_string(),
            duration_secs: DEFAULT_DURATION_SECS,
        }
    }

    pub fn with_session_name(mut self, session_name: impl Into<String>) -> Self {
        self.session_name = session_name.into();
        self
    }
}

#[async_trait::async_trait]
impl CredentialProvider for StsClient {
    async fn exchange(
        &self,
        node: &Node,
        bucket: &str,
    ) -> Result<SessionCredentials, ExchangeError> {
        let federation = node
            .federation()
            .ok_or_else(|| ExchangeError::StaticBackend(node.name.clone()))?;
        let endpoint = node.sts_endpoint()?;

        let body = {
            let mut form = url::form_urlencoded::Serializer::new(String::new());
            form.append_pair("Action", "AssumeRole")
                .append_pair("Version", STS_VERSION)
                .append_pair("RoleArn", &federation.role_arn)
                .append_pair("RoleSessionName", &self.session_name)
                .append_pair("DurationSeconds", &self.duration_secs.to_string())
                .append_pair("Policy", &session_policy(bucket));
            form.finish()
        };

        let signed = sigv4::sign_post(
            &endpoint,
            &node.region,
            "sts",
            &node.credentials.access_key_id,
            node.credentials.secret_access_key(),
            FORM_CONTENT_TYPE,
            body.as_bytes(),
            Utc::now(),
        );

        let response = self
            .http
            .post(endpoint.clone())
            .header(reqwest::header::CONTENT_TYPE, FORM_CONTENT_TYPE)
            .header("x-amz-date", &signed.amz_date)
            .header(reqwest::header::AUTHORIZATION, &signed.authorization)
            .body(body)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;
        if !status.is_success() {
            return Err(ExchangeError::Rejected {
                status,
                detail: truncate_detail(&text),
            });
        }

        parse_assume_role_response(&text)
    }
}

fn truncate_detail(text: &str) -> String {
    if text.len() > ERROR_DETAIL_LIMIT {
        let mut end = ERROR_DETAIL_LIMIT;
        while !text.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}…", &text[..end])
    } else {
        text.to_string()
    }
}

fn parse_assume_role_response(xml: &str) -> Result<SessionCredentials, ExchangeError> {
    let parsed: AssumeRoleResponse =
        quick_xml::de::from_str(xml).map_err(|e| ExchangeError::MalformedResponse(e.to_string()))?;
    let creds = parsed.result.credentials;
    let expiration = DateTime::parse_from_rfc3339(&creds.expiration)
        .map_err(|e| {
            ExchangeError::MalformedResponse(format!(
                "bad expiration '{}': {}",
                creds.expiration, e
            ))
        })?
        .with_timezone(&Utc);

    Ok(SessionCredentials::new(
        creds.access_key_id,
        creds.secret_access_key,
        creds.session_token,
        expiration,
    ))
}

#[derive(Debug, Deserialize)]
struct AssumeRoleResponse {
    #[serde(rename = "AssumeRoleResult")]
    result: AssumeRoleResult,
}

#[derive(Debug, Deserialize)]
struct AssumeRoleResult {
    #[serde(rename = "Credentials")]
    credentials: CredentialsXml,
}

#[derive(Debug, Deserialize)]
struct CredentialsXml {
    #[serde(rename = "AccessKeyId")]
    access_key_id: String,
    #[serde(rename = "SecretAccessKey")]
    secret_access_key: String,
    #[serde(rename = "SessionToken")]
    session_token: String,
    #[serde(rename = "Expiration")]
    expiration: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_RESPONSE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<AssumeRoleResponse xmlns="https://sts.amazonaws.com/doc/2011-06-15/">
  <AssumeRoleResult>
    <Credentials>
      <AccessKeyId>ASIAEXAMPLE</AccessKeyId>
      <SecretAccessKey>wJalrXUtnFEMI/K7MDENG</SecretAccessKey>
      <SessionToken>AQoDYXdzEPT//////////wEXAMPLE</SessionToken>
      <Expiration>2026-08-07T23:28:33Z</Expiration>
    </Credentials>
    <AssumedRoleUser>
      <Arn>arn:aws:sts::123456789012:assumed-role/workspaces/wsio</Arn>
      <AssumedRoleId>ARO123EXAMPLE123:wsio</AssumedRoleId>
    </AssumedRoleUser>
  </AssumeRoleResult>
  <ResponseMetadata>
    <RequestId>c6104cbe-af31-11e0-8154-cbc7ccf896c7</RequestId>
  </ResponseMetadata>
</AssumeRoleResponse>"#;

    #[test]
    fn test_parse_assume_role_response() {
        let session = parse_assume_role_response(SAMPLE_RESPONSE).unwrap();
        assert_eq!(session.access_key_id, "ASIAEXAMPLE");
        assert_eq!(session.secret_access_key(), "wJalrXUtnFEMI/K7MDENG");
        assert_eq!(session.session_token(), "AQoDYXdzEPT//////////wEXAMPLE");
        assert_eq!(session.expiration.to_rfc3339(), "2026-08-07T23:28:33+00:00");
    }

    #[test]
    fn test_parse_rejects_garbage() {
        let err = parse_assume_role_response("<NotSts/>").unwrap_err();
        assert!(matches!(err, ExchangeError::MalformedResponse(_)));
    }

    #[test]
    fn test_truncate_detail_respects_char_boundaries() {
        let long = "é".repeat(ERROR_DETAIL_LIMIT);
        let truncated = truncate_detail(&long);
        assert!(truncated.ends_with('…'));
    }
}
