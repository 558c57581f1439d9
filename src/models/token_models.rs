use crate::error::AppError;

#[derive(serde::Serialize, serde::Deserialize, Clone, Debug)]
pub struct Claims {
    pub sub: String, // user ID
    pub exp: i64,    // expiration timestamp
}

impl Claims {
    pub fn user_id(&self) -> Result<i32, AppError> {
        self.sub.parse().map_err(|_| AppError::Unauthorized)
    }
}
