//! Temporary storage credentials
//!
//! The credential endpoint answers a GET with a JSON document. The fields we
//! need live either at the top level or under `data`; a [`ResponseTransform`]
//! can point somewhere else and rename fields for endpoints with a different
//! shape.

use std::collections::BTreeMap;

use jiff::{SignedDuration, Timestamp};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use url::Url;

use crate::error::{Error, Result};

/// Lifetime assumed when the endpoint does not say when credentials expire
pub const DEFAULT_LIFETIME: SignedDuration = SignedDuration::from_mins(30);

/// Credentials are refreshed this long before they expire
pub const REFRESH_MARGIN_MS: i64 = 10;

/// Storage credentials and bucket location
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Credentials {
    pub region: String,
    pub bucket_name: String,
    pub access_key_id: String,
    #[serde(skip_serializing)]
    pub access_key_secret: String,
    pub endpoint: String,
    #[serde(skip_serializing)]
    pub security_token: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expiration: Option<Timestamp>,
    #[serde(skip_deserializing, skip_serializing_if = "Option::is_none")]
    pub refresh_interval_ms: Option<i64>,
    /// Address objects as `<endpoint>/<bucket>/<key>` instead of `<bucket>.<endpoint>/<key>`
    pub path_style: bool,
}

/// Declarative reshaping of a credential endpoint response
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResponseTransform {
    /// JSON pointer to the credential object, e.g. `/result/credentials`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pointer: Option<String>,
    /// Canonical field name (`accessKeyId`, ...) to the key used by the endpoint
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub fields: BTreeMap<String, String>,
}

/// Where credentials come from and how to reshape them
///
/// Kept as plain data so the storage client can refetch when the SDK
/// notices the credentials expired.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialSource {
    pub endpoint: String,
    #[serde(default)]
    pub transform: ResponseTransform,
}

impl CredentialSource {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            transform: ResponseTransform::default(),
        }
    }

    pub fn with_transform(mut self, transform: ResponseTransform) -> Self {
        self.transform = transform;
        self
    }
}

impl ResponseTransform {
    fn select<'a>(&self, body: &'a Value) -> Result<&'a Value> {
        match &self.pointer {
            Some(pointer) => body.pointer(pointer).ok_or_else(|| {
                Error::Credentials(format!("response has no value at '{pointer}'"))
            }),
            None => match body.get("data") {
                Some(data) if data.is_object() => Ok(data),
                _ => Ok(body),
            },
        }
    }

    fn field<'a>(&self, payload: &'a Value, name: &str) -> Option<&'a Value> {
        let key = self.fields.get(name).map(String::as_str).unwrap_or(name);
        payload.get(key).filter(|v| !v.is_null())
    }
}

fn text(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        _ => String::new(),
    }
}

fn parse_expiration(value: &Value) -> Result<Timestamp> {
    let invalid = || Error::Credentials(format!("unrecognized expiration: {value}"));
    match value {
        Value::Number(n) => n
            .as_i64()
            .and_then(|ms| Timestamp::from_millisecond(ms).ok())
            .ok_or_else(invalid),
        Value::String(s) => {
            if let Ok(ms) = s.trim().parse::<i64>() {
                return Timestamp::from_millisecond(ms).map_err(|_| invalid());
            }
            s.trim().parse::<Timestamp>().map_err(|_| invalid())
        }
        _ => Err(invalid()),
    }
}

impl Credentials {
    /// Normalize a credential endpoint response
    ///
    /// Missing fields become empty strings. A missing expiration defaults to
    /// `now` plus [`DEFAULT_LIFETIME`].
    pub fn from_response(
        body: &Value,
        transform: &ResponseTransform,
        now: Timestamp,
    ) -> Result<Self> {
        let payload = transform.select(body)?;
        if !payload.is_object() {
            return Err(Error::Credentials(
                "credential payload is not a JSON object".into(),
            ));
        }

        let expiration = match transform.field(payload, "expiration") {
            Some(value) => parse_expiration(value)?,
            None => now + DEFAULT_LIFETIME,
        };

        let mut creds = Self {
            region: text(transform.field(payload, "region")),
            bucket_name: text(transform.field(payload, "bucketName")),
            access_key_id: text(transform.field(payload, "accessKeyId")),
            access_key_secret: text(transform.field(payload, "accessKeySecret")),
            endpoint: text(transform.field(payload, "endpoint")),
            security_token: text(transform.field(payload, "securityToken")),
            expiration: Some(expiration),
            refresh_interval_ms: None,
            path_style: false,
        };
        creds.refresh_interval_ms = creds.refresh_interval_at(now);
        Ok(creds)
    }

    /// Milliseconds from `now` until these credentials should be refreshed
    pub fn refresh_interval_at(&self, now: Timestamp) -> Option<i64> {
        self.expiration.map(|exp| {
            let remaining = exp.as_millisecond() - now.as_millisecond();
            (remaining - REFRESH_MARGIN_MS).max(0)
        })
    }

    /// Whether these credentials are due for a refresh at `now`
    pub fn needs_refresh(&self, now: Timestamp) -> bool {
        self.refresh_interval_at(now) == Some(0)
    }

    pub fn session_token(&self) -> Option<&str> {
        Some(self.security_token.as_str()).filter(|t| !t.is_empty())
    }

    /// Storage endpoint as a full URL
    ///
    /// An empty endpoint is derived from the region as `<region>.aliyuncs.com`.
    pub fn endpoint_url(&self) -> Result<Url> {
        let endpoint = self.endpoint.trim().trim_end_matches('/');
        let endpoint = if endpoint.is_empty() {
            if self.region.is_empty() {
                return Err(Error::Credentials(
                    "credentials carry neither an endpoint nor a region".into(),
                ));
            }
            format!("{}.aliyuncs.com", self.region)
        } else {
            endpoint.to_string()
        };

        let full = if endpoint.contains("://") {
            endpoint
        } else {
            format!("https://{endpoint}")
        };
        Ok(Url::parse(&full)?)
    }

    /// Public URL of an object written under `key`
    pub fn object_url(&self, key: &str) -> Result<String> {
        let endpoint = self.endpoint_url()?;
        let host = endpoint
            .host_str()
            .ok_or_else(|| Error::Credentials(format!("endpoint has no host: {endpoint}")))?;
        let port = endpoint.port().map(|p| format!(":{p}")).unwrap_or_default();
        let key = key.trim_start_matches('/');

        let (base, path) = if self.path_style {
            (
                format!("{}://{host}{port}", endpoint.scheme()),
                format!("/{}/{key}", self.bucket_name),
            )
        } else {
            (
                format!("{}://{}.{host}{port}", endpoint.scheme(), self.bucket_name),
                format!("/{key}"),
            )
        };

        let mut url = Url::parse(&base)?;
        url.set_path(&path);
        Ok(url.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn now() -> Timestamp {
        Timestamp::from_millisecond(1_700_000_000_000).unwrap()
    }

    #[test]
    fn test_nested_data_with_expiration() {
        let now = now();
        let body = json!({
            "code": 0,
            "data": {
                "accessKeyId": "X",
                "expiration": (now.as_millisecond() + 1000).to_string(),
            }
        });

        let creds = Credentials::from_response(&body, &ResponseTransform::default(), now).unwrap();
        assert_eq!(creds.access_key_id, "X");
        assert_eq!(creds.bucket_name, "");
        let interval = creds.refresh_interval_ms.unwrap();
        assert!(interval < 1000);
        assert!(interval > 0);
    }

    #[test]
    fn test_top_level_payload_and_rfc3339_expiration() {
        let body = json!({
            "accessKeyId": "id",
            "accessKeySecret": "secret",
            "bucketName": "bucket",
            "region": "oss-cn-hangzhou",
            "endpoint": "oss-cn-hangzhou.aliyuncs.com",
            "securityToken": "token",
            "expiration": "2023-11-14T22:23:20Z",
        });

        let creds =
            Credentials::from_response(&body, &ResponseTransform::default(), now()).unwrap();
        assert_eq!(creds.access_key_secret, "secret");
        assert_eq!(creds.security_token, "token");
        assert_eq!(creds.session_token(), Some("token"));
        assert_eq!(
            creds.expiration,
            Some(Timestamp::from_second(1_700_000_600).unwrap())
        );
        assert_eq!(creds.refresh_interval_ms, Some(600_000 - REFRESH_MARGIN_MS));
    }

    #[test]
    fn test_missing_expiration_defaults_to_thirty_minutes() {
        let now = now();
        let creds =
            Credentials::from_response(&json!({}), &ResponseTransform::default(), now).unwrap();
        assert_eq!(creds.expiration, Some(now + DEFAULT_LIFETIME));
        assert_eq!(creds.access_key_id, "");
        assert_eq!(creds.session_token(), None);
    }

    #[test]
    fn test_expired_credentials_clamp_to_zero() {
        let now = now();
        let body = json!({ "expiration": now.as_millisecond() - 5000 });
        let creds = Credentials::from_response(&body, &ResponseTransform::default(), now).unwrap();
        assert_eq!(creds.refresh_interval_ms, Some(0));
        assert!(creds.needs_refresh(now));
    }

    #[test]
    fn test_transform_pointer_and_field_renames() {
        let body = json!({
            "result": {
                "Credentials": {
                    "AccessKeyId": "STS.abc",
                    "AccessKeySecret": "s",
                    "SecurityToken": "t",
                    "Expiration": "2023-11-14T22:23:20Z"
                },
                "bucket": "media"
            }
        });
        let transform = ResponseTransform {
            pointer: Some("/result/Credentials".into()),
            fields: [
                ("accessKeyId", "AccessKeyId"),
                ("accessKeySecret", "AccessKeySecret"),
                ("securityToken", "SecurityToken"),
                ("expiration", "Expiration"),
            ]
            .into_iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect(),
        };

        let creds = Credentials::from_response(&body, &transform, now()).unwrap();
        assert_eq!(creds.access_key_id, "STS.abc");
        assert_eq!(creds.security_token, "t");
        assert_eq!(creds.bucket_name, "");
    }

    #[test]
    fn test_transform_pointer_missing() {
        let transform = ResponseTransform {
            pointer: Some("/nope".into()),
            ..Default::default()
        };
        let result = Credentials::from_response(&json!({}), &transform, now());
        assert!(matches!(result, Err(Error::Credentials(_))));
    }

    #[test]
    fn test_unparseable_expiration() {
        let body = json!({ "expiration": "next tuesday" });
        let result = Credentials::from_response(&body, &ResponseTransform::default(), now());
        assert!(matches!(result, Err(Error::Credentials(_))));
    }

    #[test]
    fn test_object_url_virtual_host() {
        let creds = Credentials {
            bucket_name: "media".into(),
            endpoint: "oss-cn-hangzhou.aliyuncs.com".into(),
            ..Default::default()
        };
        assert_eq!(
            creds.object_url("nomi/a b.png").unwrap(),
            "https://media.oss-cn-hangzhou.aliyuncs.com/nomi/a%20b.png"
        );
        assert_eq!(
            creds.object_url("/a/b.png").unwrap(),
            "https://media.oss-cn-hangzhou.aliyuncs.com/a/b.png"
        );
    }

    #[test]
    fn test_object_url_from_region_and_path_style() {
        let creds = Credentials {
            region: "oss-cn-beijing".into(),
            bucket_name: "media".into(),
            ..Default::default()
        };
        assert_eq!(
            creds.endpoint_url().unwrap().as_str(),
            "https://oss-cn-beijing.aliyuncs.com/"
        );

        let creds = Credentials {
            bucket_name: "media".into(),
            endpoint: "http://localhost:9000".into(),
            path_style: true,
            ..Default::default()
        };
        assert_eq!(
            creds.object_url("dir/x.txt").unwrap(),
            "http://localhost:9000/media/dir/x.txt"
        );
    }

    #[test]
    fn test_empty_credentials_have_no_endpoint() {
        let result = Credentials::default().endpoint_url();
        assert!(matches!(result, Err(Error::Credentials(_))));
        assert_eq!(result.unwrap_err().exit_code(), 0);
    }
}
