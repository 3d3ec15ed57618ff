use serde::{Deserialize, Serialize};

/// Body returned by both creation endpoints: the backend-assigned id.
#[derive(Deserialize, Serialize)]
pub struct CreationResponse {
    pub id: i64,
}
