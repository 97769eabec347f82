use chrono::Utc;
use jsonwebtoken::decode;
use jsonwebtoken::encode;
use jsonwebtoken::Algorithm;
use jsonwebtoken::DecodingKey;
use jsonwebtoken::EncodingKey;
use jsonwebtoken::Header;
use jsonwebtoken::Validation;

use super::claims::TokenClaims;
use super::errors::JwtError;

/// Codec for signed bearer tokens.
///
/// Issues and validates compact HS256 JWTs carrying [`TokenClaims`]. Tokens
/// signed with any other algorithm are rejected, so a verifier configured
/// for HS256 can never be talked into accepting a differently-signed token.
///
/// `exp`/`iat` are epoch milliseconds. The JWT library's own expiry check
/// works on seconds, so it is disabled and the codec enforces expiry itself:
/// a missing `exp` is malformed, and `exp <= now` is expired (strict at the
/// boundary).
pub struct TokenCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    algorithm: Algorithm,
}

impl TokenCodec {
    /// Create a codec from the shared signing secret.
    ///
    /// # Arguments
    /// * `secret` - Symmetric signing key; should be at least 32 bytes for
    ///   HS256 and provisioned out-of-band, never hardcoded
    pub fn new(secret: &[u8]) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            algorithm: Algorithm::HS256,
        }
    }

    /// Serialize and sign claims into a compact token string.
    ///
    /// # Errors
    /// * `EncodingFailed` - Token encoding failed
    pub fn issue(&self, claims: &TokenClaims) -> Result<String, JwtError> {
        let header = Header::new(self.algorithm);

        encode(&header, claims, &self.encoding_key)
            .map_err(|e| JwtError::EncodingFailed(e.to_string()))
    }

    /// Verify a token's signature and expiry, returning its claims.
    ///
    /// # Errors
    /// * `TokenMalformed` - Parse failure, bad signature, unsupported
    ///   algorithm, or missing `exp`
    /// * `TokenExpired` - Signature valid but `exp <= now`
    pub fn validate(&self, token: &str) -> Result<TokenClaims, JwtError> {
        self.validate_at(token, Utc::now().timestamp_millis())
    }

    fn validate_at(&self, token: &str, now_ms: i64) -> Result<TokenClaims, JwtError> {
        let mut validation = Validation::new(self.algorithm);
        // exp here is milliseconds; the library would compare it against
        // seconds, so expiry is enforced below instead.
        validation.validate_exp = false;
        validation.required_spec_claims.clear();

        let data = decode::<TokenClaims>(token, &self.decoding_key, &validation)
            .map_err(|e| JwtError::TokenMalformed(e.to_string()))?;

        let claims = data.claims;
        if claims.exp.is_none() {
            // a token without an expiry is never trusted
            return Err(JwtError::TokenMalformed("missing exp claim".to_string()));
        }
        if claims.is_expired(now_ms) {
            return Err(JwtError::TokenExpired);
        }

        Ok(claims)
    }
}
