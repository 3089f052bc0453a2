//! Error-body parsing for auth and PostgREST responses.

use serde_json::Value;

/// Fields checked, in order, for a human-readable message.
const MESSAGE_FIELDS: [&str; 4] = ["message", "msg", "error_description", "error"];

/// Extracts the message to show the user from an error response body.
///
/// Falls back to the raw body, then to the status reason.
pub fn error_message(body: &str, reason: Option<&str>) -> String {
    if let Ok(Value::Object(fields)) = serde_json::from_str::<Value>(body) {
        for key in MESSAGE_FIELDS {
            if let Some(Value::String(message)) = fields.get(key) {
                if !message.is_empty() {
                    return message.clone();
                }
            }
        }
    }
    let body = body.trim();
    if !body.is_empty() {
        return body.to_string();
    }
    reason.unwrap_or("Request failed").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_postgrest_message() {
        let body = r#"{"code":"23505","details":null,"message":"duplicate key value violates unique constraint \"user_skills_pkey\""}"#;
        assert_eq!(
            error_message(body, Some("Conflict")),
            "duplicate key value violates unique constraint \"user_skills_pkey\""
        );
    }

    #[test]
    fn test_auth_messages() {
        assert_eq!(
            error_message(r#"{"error":"invalid_grant","error_description":"Invalid login credentials"}"#, None),
            "Invalid login credentials"
        );
        assert_eq!(
            error_message(r#"{"code":422,"msg":"User already registered"}"#, None),
            "User already registered"
        );
    }

    #[test]
    fn test_fallbacks() {
        assert_eq!(error_message("upstream timeout", Some("Bad Gateway")), "upstream timeout");
        assert_eq!(error_message("", Some("Bad Gateway")), "Bad Gateway");
        assert_eq!(error_message("", None), "Request failed");
    }
}
