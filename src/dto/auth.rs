use serde::{Deserialize, Serialize};

/// Claims carried by tokens issued by the external auth service.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// User id (hex ObjectId).
    pub sub: String,
    pub exp: usize,
    #[serde(default)]
    pub iat: usize,
}
