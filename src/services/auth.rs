use crate::error::AppError;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Claims carried by the shared-secret bearer token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    #[serde(rename = "userId")]
    pub user_id: Uuid,
    pub exp: usize,
}

/// HS256 verifier over the process-wide signing secret.
pub struct TokenVerifier {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl TokenVerifier {
    pub fn new(secret: &str) -> Self {
        Self {
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation: Validation::new(Algorithm::HS256),
        }
    }

    /// Bad signature, expiry and malformed tokens all fold into
    /// `AppError::InvalidToken`; callers cannot distinguish them.
    pub fn verify(&self, token: &str) -> Result<Claims, AppError> {
        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| {
                tracing::warn!(error = %e, "token verification failed");
                AppError::InvalidToken
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use jsonwebtoken::{encode, EncodingKey, Header};

    const SECRET: &str = "test-secret";

    fn sign(claims: &Claims, secret: &str) -> String {
        encode(
            &Header::default(),
            claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    #[test]
    fn accepts_valid_token_and_extracts_user_id() {
        let user_id = Uuid::new_v4();
        let token = sign(
            &Claims {
                user_id,
                exp: (Utc::now().timestamp() + 3600) as usize,
            },
            SECRET,
        );

        let claims = TokenVerifier::new(SECRET).verify(&token).unwrap();
        assert_eq!(claims.user_id, user_id);
    }

    #[test]
    fn rejects_expired_token() {
        let token = sign(
            &Claims {
                user_id: Uuid::new_v4(),
                exp: (Utc::now().timestamp() - 3600) as usize,
            },
            SECRET,
        );

        let err = TokenVerifier::new(SECRET).verify(&token).unwrap_err();
        assert!(matches!(err, AppError::InvalidToken));
    }

    #[test]
    fn rejects_token_signed_with_other_secret() {
        let token = sign(
            &Claims {
                user_id: Uuid::new_v4(),
                exp: (Utc::now().timestamp() + 3600) as usize,
            },
            "other-secret",
        );

        let err = TokenVerifier::new(SECRET).verify(&token).unwrap_err();
        assert!(matches!(err, AppError::InvalidToken));
    }

    #[test]
    fn rejects_garbage() {
        let err = TokenVerifier::new(SECRET).verify("not-a-jwt").unwrap_err();
        assert!(matches!(err, AppError::InvalidToken));
    }
}
