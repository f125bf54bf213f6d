//! Authentication: admin login and token verification.

use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use comicseek_core::config::GatewayConfig;
use comicseek_core::SeekError;

/// Token subject. Exactly one administrator exists.
const ADMIN_ROLE: &str = "superuser";

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: String,
    name: String,
    exp: u64,
}

pub struct Aaa {
    user: String,
    password: String,
    token_ttl_secs: u64,
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl Aaa {
    /// Credentials and signing secret come from the configuration record,
    /// never from process-wide globals.
    pub fn from_config(config: &GatewayConfig) -> Result<Self, SeekError> {
        let user = config
            .admin_user
            .clone()
            .ok_or_else(|| SeekError::Internal("ADMIN_USER is not set".into()))?;
        let password = config
            .admin_password
            .clone()
            .ok_or_else(|| SeekError::Internal("ADMIN_PASSWORD is not set".into()))?;
        if config.token_secret.is_empty() {
            return Err(SeekError::Internal("TOKEN_SECRET is not set".into()));
        }
        Ok(Self {
            user,
            password,
            token_ttl_secs: config.token_ttl_secs,
            encoding: EncodingKey::from_secret(config.token_secret.as_bytes()),
            decoding: DecodingKey::from_secret(config.token_secret.as_bytes()),
        })
    }

    /// Mint a signed token valid for the configured TTL.
    pub fn login(&self, name: &str, password: &str) -> Result<String, SeekError> {
        if name != self.user || password != self.password {
            return Err(SeekError::BadCredentials);
        }
        let exp = chrono::Utc::now().timestamp() as u64 + self.token_ttl_secs;
        let claims = Claims {
            sub: ADMIN_ROLE.into(),
            name: name.into(),
            exp,
        };
        encode(&Header::default(), &claims, &self.encoding)
            .map_err(|e| SeekError::Internal(format!("token signing: {e}")))
    }

    /// Check signature, subject, and expiry.
    pub fn verify(&self, token: &str) -> Result<(), SeekError> {
        let mut validation = Validation::default();
        validation.leeway = 0; // reject strictly after expiry
        validation.sub = Some(ADMIN_ROLE.into());
        decode::<Claims>(token, &self.decoding, &validation)
            .map(|_| ())
            .map_err(|_| SeekError::BadCredentials)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(ttl_secs: u64) -> GatewayConfig {
        GatewayConfig {
            address: "127.0.0.1:0".into(),
            words_url: String::new(),
            search_url: String::new(),
            update_url: String::new(),
            token_ttl_secs: ttl_secs,
            search_rps: 10,
            admin_user: Some("admin".into()),
            admin_password: Some("password".into()),
            token_secret: "test-secret".into(),
        }
    }

    #[test]
    fn login_roundtrip() {
        let aaa = Aaa::from_config(&config(3600)).unwrap();
        let token = aaa.login("admin", "password").unwrap();
        assert!(!token.is_empty());
        aaa.verify(&token).unwrap();
    }

    #[test]
    fn wrong_credentials_rejected() {
        let aaa = Aaa::from_config(&config(3600)).unwrap();
        assert!(matches!(
            aaa.login("admin", "nope"),
            Err(SeekError::BadCredentials)
        ));
        assert!(matches!(
            aaa.login("intruder", "password"),
            Err(SeekError::BadCredentials)
        ));
    }

    #[test]
    fn garbage_token_rejected() {
        let aaa = Aaa::from_config(&config(3600)).unwrap();
        assert!(aaa.verify("not.a.token").is_err());
    }

    #[test]
    fn expired_token_rejected() {
        let aaa = Aaa::from_config(&config(3600)).unwrap();
        let stale = Claims {
            sub: ADMIN_ROLE.into(),
            name: "admin".into(),
            exp: chrono::Utc::now().timestamp() as u64 - 10,
        };
        let token = encode(
            &Header::default(),
            &stale,
            &EncodingKey::from_secret(b"test-secret"),
        )
        .unwrap();
        assert!(aaa.verify(&token).is_err());
    }

    #[test]
    fn foreign_signature_rejected() {
        let aaa = Aaa::from_config(&config(3600)).unwrap();
        let claims = Claims {
            sub: ADMIN_ROLE.into(),
            name: "admin".into(),
            exp: chrono::Utc::now().timestamp() as u64 + 600,
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(b"other-secret"),
        )
        .unwrap();
        assert!(aaa.verify(&token).is_err());
    }

    #[test]
    fn missing_credentials_refuse_startup() {
        let mut cfg = config(3600);
        cfg.admin_user = None;
        assert!(Aaa::from_config(&cfg).is_err());

        let mut cfg = config(3600);
        cfg.token_secret = String::new();
        assert!(Aaa::from_config(&cfg).is_err());
    }
}
