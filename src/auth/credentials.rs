use crate::auth::types::{Claims, DEFAULT_TOKEN_URI, ServiceAccountKey};
use crate::error::GaError;
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use std::fmt;
use std::fs;
use std::path::Path;

/// Lifetime of a signed assertion. The token endpoint rejects anything over an hour.
pub const ASSERTION_LIFETIME_SECS: i64 = 3600;

const SERVICE_ACCOUNT_KEY_TYPE: &str = "service_account";

/// Read the raw service-account key file.
///
/// The file is read fresh on every call; credentials are never cached between
/// collection cycles.
pub fn read_key_file(path: &Path) -> Result<Vec<u8>, GaError> {
    fs::read(path).map_err(|source| GaError::CredentialRead {
        path: path.to_path_buf(),
        source,
    })
}

/// Everything needed to mint JWT-bearer assertions for one service account
#[derive(Clone)]
pub struct JwtConfig {
    pub email: String,
    pub private_key_id: Option<String>,
    pub scopes: Vec<String>,
    pub token_url: String,
    encoding_key: EncodingKey,
}

/// Custom Debug implementation that omits the signing key
impl fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JwtConfig")
            .field("email", &self.email)
            .field("private_key_id", &self.private_key_id)
            .field("scopes", &self.scopes)
            .field("token_url", &self.token_url)
            .finish_non_exhaustive()
    }
}

impl JwtConfig {
    /// Build a JWT config from the JSON contents of a service-account key file.
    pub fn from_json(data: &[u8], scopes: &[&str]) -> Result<Self, GaError> {
        let key: ServiceAccountKey = serde_json::from_slice(data)
            .map_err(|e| GaError::CredentialParse(format!("invalid key file JSON: {}", e)))?;

        match key.key_type.as_deref() {
            Some(SERVICE_ACCOUNT_KEY_TYPE) => {}
            other => {
                return Err(GaError::CredentialParse(format!(
                    "'type' field is {:?} (expected \"{}\")",
                    other.unwrap_or(""),
                    SERVICE_ACCOUNT_KEY_TYPE
                )));
            }
        }

        if key.client_email.trim().is_empty() {
            return Err(GaError::CredentialParse(
                "'client_email' field is empty".to_string(),
            ));
        }

        let encoding_key = EncodingKey::from_rsa_pem(key.private_key.as_bytes())
            .map_err(|e| GaError::CredentialParse(format!("invalid private key: {}", e)))?;

        let token_url = key
            .token_uri
            .filter(|uri| !uri.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_TOKEN_URI.to_string());

        Ok(Self {
            email: key.client_email,
            private_key_id: key.private_key_id.filter(|id| !id.is_empty()),
            scopes: scopes.iter().map(|s| s.to_string()).collect(),
            token_url,
            encoding_key,
        })
    }

    /// Claims for an assertion issued at `now` (unix seconds)
    pub fn claims(&self, now: i64) -> Claims {
        Claims {
            iss: self.email.clone(),
            scope: self.scopes.join(" "),
            aud: self.token_url.clone(),
            iat: now,
            exp: now + ASSERTION_LIFETIME_SECS,
        }
    }

    /// Sign an RS256 assertion issued at `now`
    pub fn assertion(&self, now: i64) -> Result<String, GaError> {
        let mut header = Header::new(Algorithm::RS256);
        header.kid = self.private_key_id.clone();

        jsonwebtoken::encode(&header, &self.claims(now), &self.encoding_key)
            .map_err(|e| GaError::CredentialParse(format!("failed to sign assertion: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::types::ANALYTICS_READONLY_SCOPE;
    use jsonwebtoken::{DecodingKey, Validation};

    const KEY_JSON: &str = include_str!("../../tests/fixtures/service_account.json");
    const PUBLIC_KEY: &str = include_str!("../../tests/fixtures/service_account_public.pem");

    fn config() -> JwtConfig {
        JwtConfig::from_json(KEY_JSON.as_bytes(), &[ANALYTICS_READONLY_SCOPE]).unwrap()
    }

    #[test]
    fn test_from_json_reads_fields() {
        let cfg = config();
        assert_eq!(
            cfg.email,
            "collector@ga-report-test.iam.gserviceaccount.com"
        );
        assert_eq!(cfg.token_url, "https://oauth2.googleapis.com/token");
        assert_eq!(
            cfg.private_key_id.as_deref(),
            Some("0123456789abcdef0123456789abcdef01234567")
        );
        assert_eq!(cfg.scopes, vec![ANALYTICS_READONLY_SCOPE.to_string()]);
    }

    #[test]
    fn test_debug_omits_key_material() {
        let debug_output = format!("{:?}", config());
        assert!(!debug_output.contains("PRIVATE KEY"));
        assert!(debug_output.contains("collector@"));
    }

    #[test]
    fn test_from_json_rejects_malformed_json() {
        let err = JwtConfig::from_json(b"{not json", &[ANALYTICS_READONLY_SCOPE]).unwrap_err();
        assert!(matches!(err, GaError::CredentialParse(_)));
    }

    #[test]
    fn test_from_json_rejects_wrong_type() {
        let data = r#"{"type":"authorized_user","private_key":"x","client_email":"e"}"#;
        let err = JwtConfig::from_json(data.as_bytes(), &[]).unwrap_err();
        assert!(
            matches!(err, GaError::CredentialParse(ref msg) if msg.contains("authorized_user"))
        );
    }

    #[test]
    fn test_from_json_rejects_bad_private_key() {
        let data = r#"{"type":"service_account","private_key":"not a pem","client_email":"e@x"}"#;
        let err = JwtConfig::from_json(data.as_bytes(), &[]).unwrap_err();
        assert!(matches!(err, GaError::CredentialParse(ref msg) if msg.contains("private key")));
    }

    #[test]
    fn test_from_json_defaults_token_uri() {
        let mut value: serde_json::Value = serde_json::from_str(KEY_JSON).unwrap();
        value.as_object_mut().unwrap().remove("token_uri");
        let cfg = JwtConfig::from_json(value.to_string().as_bytes(), &[]).unwrap();
        assert_eq!(cfg.token_url, DEFAULT_TOKEN_URI);
    }

    #[test]
    fn test_read_key_file_missing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.json");
        let err = read_key_file(&path).unwrap_err();
        match err {
            GaError::CredentialRead { path: p, .. } => assert_eq!(p, path),
            other => panic!("expected CredentialRead, got {:?}", other),
        }
    }

    #[test]
    fn test_claims() {
        let claims = config().claims(1_700_000_000);
        assert_eq!(
            claims.iss,
            "collector@ga-report-test.iam.gserviceaccount.com"
        );
        assert_eq!(claims.scope, ANALYTICS_READONLY_SCOPE);
        assert_eq!(claims.aud, "https://oauth2.googleapis.com/token");
        assert_eq!(claims.exp - claims.iat, ASSERTION_LIFETIME_SECS);
    }

    #[test]
    fn test_assertion_verifies_with_public_key() {
        let cfg = config();
        let now = chrono::Utc::now().timestamp();
        let token = cfg.assertion(now).unwrap();

        let header = jsonwebtoken::decode_header(&token).unwrap();
        assert_eq!(header.alg, Algorithm::RS256);
        assert_eq!(header.kid, cfg.private_key_id);

        let mut validation = Validation::new(Algorithm::RS256);
        validation.set_audience(&[cfg.token_url.as_str()]);
        let key = DecodingKey::from_rsa_pem(PUBLIC_KEY.as_bytes()).unwrap();
        let data = jsonwebtoken::decode::<Claims>(&token, &key, &validation).unwrap();
        assert_eq!(data.claims, cfg.claims(now));
    }
}
