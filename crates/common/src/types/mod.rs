use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug)]
pub struct Health {
    pub status: &'static str,
}

/// `{"status": "ok", "data": ...}` envelope shared by the JSON endpoints.
#[derive(Serialize, Debug)]
pub struct StatusResponse<T> {
    pub status: &'static str,
    pub data: T,
}

impl<T> StatusResponse<T> {
    pub fn ok(data: T) -> Self {
        Self { status: "ok", data }
    }
}

#[derive(Serialize, Deserialize, Debug)]
pub struct Message {
    pub message: String,
}
