use reqwest::Client;
use serde::{Deserialize, Serialize};
use anyhow::{Result, anyhow};

#[derive(Serialize)]
struct ChatRequest<'a> {
    session_id: &'a str,
    message: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    response: String,
}

/// Client for the campus assistant backend.
#[derive(Clone)]
pub struct ChatClient {
    client: Client,
    base_url: String,
}

impl ChatClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// One chat turn against the backend. Transport errors, non-success
    /// statuses, and undecodable bodies all come back as Err.
    pub async fn send(&self, session_id: &str, message: &str) -> Result<String> {
        let url = format!("{}/chat/", self.base_url);

        let request = ChatRequest {
            session_id,
            message,
        };

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(anyhow!(
                "chat request failed with status: {}",
                response.status()
            ));
        }

        let reply: ChatResponse = response.json().await?;
        Ok(reply.response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_body_matches_the_wire_contract() {
        let request = ChatRequest {
            session_id: "student",
            message: "when does the semester start?",
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "session_id": "student",
                "message": "when does the semester start?",
            })
        );
    }

    #[test]
    fn response_body_requires_the_response_field() {
        let reply: ChatResponse = serde_json::from_str(r#"{"response":"42"}"#).unwrap();
        assert_eq!(reply.response, "42");

        assert!(serde_json::from_str::<ChatResponse>(r#"{"answer":"42"}"#).is_err());
    }

    #[test]
    fn trailing_slash_in_base_url_is_normalized() {
        let client = ChatClient::new("http://127.0.0.1:8000/");
        assert_eq!(client.base_url, "http://127.0.0.1:8000");
    }
}
