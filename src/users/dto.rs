use serde::Deserialize;

/// Request body for user registration. A missing `username` or `password`
/// field is rejected by the JSON extractor before the handler runs.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    #[serde(default)]
    pub email: Option<String>,
    pub password: String,
}
