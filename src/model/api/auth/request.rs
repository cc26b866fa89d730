use serde::{Deserialize, Serialize};

/// An admin sign-in request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminCredentials {
    pub reference_number: String,
    pub password: String,
}

/// A student sign-in request. The reference number is the credential.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudentCredentials {
    pub reference_number: String,
}
