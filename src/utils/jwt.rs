use crate::config::AppConfig;
use crate::models::users::entities::{CurrentUser, UserRole};
use jsonwebtoken::{DecodingKey, Validation, decode};
use serde::{Deserialize, Serialize};

// JWT Claims 结构体（由身份服务签发）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,        // Subject (user ID)
    pub role: String,       // 用户角色
    pub token_type: String, // token类型: 只接受 "access"
    pub exp: usize,         // Expiration time (时间戳)
    pub iat: usize,         // Issued at (签发时间)
}

impl Claims {
    /// 转换为当前调用者
    pub fn into_current_user(self) -> Result<CurrentUser, String> {
        let id = self
            .sub
            .parse::<i64>()
            .map_err(|_| "Invalid user ID in JWT".to_string())?;
        let role = self.role.parse::<UserRole>()?;
        Ok(CurrentUser { id, role })
    }
}

pub struct JwtUtils;

impl JwtUtils {
    // 使用指定密钥验证 token
    pub fn verify_token_with(
        token: &str,
        secret: &str,
        leeway: u64,
    ) -> Result<Claims, jsonwebtoken::errors::Error> {
        let decoding_key = DecodingKey::from_secret(secret.as_ref());
        let mut validation = Validation::default();
        validation.leeway = leeway;

        decode::<Claims>(token, &decoding_key, &validation).map(|token_data| token_data.claims)
    }

    // 验证 token 是否为 access token
    pub fn verify_access_token_with(
        token: &str,
        secret: &str,
        leeway: u64,
    ) -> Result<Claims, jsonwebtoken::errors::Error> {
        let claims = Self::verify_token_with(token, secret, leeway)?;
        if claims.token_type != "access" {
            return Err(jsonwebtoken::errors::Error::from(
                jsonwebtoken::errors::ErrorKind::InvalidToken,
            ));
        }
        Ok(claims)
    }

    // 验证 Access Token（使用配置中的密钥）
    pub fn verify_access_token(token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
        let config = AppConfig::get();
        Self::verify_access_token_with(token, &config.jwt.secret, config.jwt.leeway)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{EncodingKey, Header, encode};

    const SECRET: &str = "test-secret";

    fn token(sub: &str, role: &str, token_type: &str, expires_in: i64) -> String {
        let now = chrono::Utc::now();
        let claims = Claims {
            sub: sub.to_string(),
            role: role.to_string(),
            token_type: token_type.to_string(),
            exp: (now + chrono::Duration::seconds(expires_in)).timestamp() as usize,
            iat: now.timestamp() as usize,
        };
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(SECRET.as_ref()),
        )
        .unwrap()
    }

    #[test]
    fn test_access_token_yields_current_user() {
        let claims =
            JwtUtils::verify_access_token_with(&token("42", "teacher", "access", 600), SECRET, 0)
                .unwrap();
        let user = claims.into_current_user().unwrap();
        assert_eq!(user.id, 42);
        assert_eq!(user.role, UserRole::Teacher);
    }

    #[test]
    fn test_refresh_token_rejected() {
        let result =
            JwtUtils::verify_access_token_with(&token("42", "student", "refresh", 600), SECRET, 0);
        assert!(result.is_err());
    }

    #[test]
    fn test_wrong_secret_and_expired_rejected() {
        let valid = token("1", "admin", "access", 600);
        assert!(JwtUtils::verify_access_token_with(&valid, "other", 0).is_err());

        let expired = token("1", "admin", "access", -3600);
        assert!(JwtUtils::verify_access_token_with(&expired, SECRET, 0).is_err());
    }

    #[test]
    fn test_unknown_role_rejected() {
        let claims =
            JwtUtils::verify_access_token_with(&token("5", "user", "access", 600), SECRET, 0)
                .unwrap();
        assert!(claims.into_current_user().is_err());
    }
}
