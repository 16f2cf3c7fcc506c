pub mod catalog;
pub mod config;
pub mod quote;

use serde::Serialize;
use serde_json::Value;
use shopquote_core::InterfaceError;

#[derive(Debug, Clone)]
pub struct CommandResult {
    pub exit_code: u8,
    pub output: String,
}

#[derive(Debug, Serialize)]
struct CommandOutcome {
    command: String,
    status: String,
    error_class: Option<String>,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    user_message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    correlation_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<Value>,
}

impl CommandResult {
    pub fn success_with_data(
        command: &str,
        message: impl Into<String>,
        data: Option<Value>,
    ) -> Self {
        let payload = CommandOutcome {
            command: command.to_string(),
            status: "ok".to_string(),
            error_class: None,
            message: message.into(),
            user_message: None,
            correlation_id: None,
            data,
        };
        Self { exit_code: 0, output: serialize_payload(payload) }
    }

    pub fn failure(
        command: &str,
        error_class: &str,
        message: impl Into<String>,
        exit_code: u8,
    ) -> Self {
        let payload = CommandOutcome {
            command: command.to_string(),
            status: "error".to_string(),
            error_class: Some(error_class.to_string()),
            message: message.into(),
            user_message: None,
            correlation_id: None,
            data: None,
        };
        Self { exit_code, output: serialize_payload(payload) }
    }

    /// Failure envelope for errors mapped through the application error layer.
    pub fn rejected(
        command: &str,
        error_class: &str,
        error: &InterfaceError,
        exit_code: u8,
        data: Option<Value>,
    ) -> Self {
        let payload = CommandOutcome {
            command: command.to_string(),
            status: "error".to_string(),
            error_class: Some(error_class.to_string()),
            message: error.message().to_string(),
            user_message: Some(error.user_message().to_string()),
            correlation_id: Some(error.correlation_id().to_string()),
            data,
        };
        Self { exit_code, output: serialize_payload(payload) }
    }

    /// Success envelope carrying a serialized payload. A payload that fails to
    /// serialize becomes a failure envelope.
    pub fn success_with_payload<T: Serialize>(
        command: &str,
        message: impl Into<String>,
        payload: &T,
    ) -> Self {
        match serde_json::to_value(payload) {
            Ok(data) => Self::success_with_data(command, message, Some(data)),
            Err(error) => Self::failure(command, "serialization", error.to_string(), 1),
        }
    }
}

fn serialize_payload(payload: CommandOutcome) -> String {
    serde_json::to_string(&payload).unwrap_or_else(|error| {
        format!(
            "{{\"command\":\"unknown\",\"status\":\"error\",\"error_class\":\"serialization\",\"message\":\"{}\"}}",
            error.to_string().replace('\\', "\\\\").replace('"', "\\\"")
        )
    })
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use serde_json::Value;
    use shopquote_core::{ApplicationError, QuoteError};

    use super::CommandResult;

    #[test]
    fn unserializable_payload_becomes_failure_envelope() {
        let payload = BTreeMap::from([(vec![1_u8], 1_u8)]);
        let result = CommandResult::success_with_payload("quote", "Total: R$ 0.00", &payload);

        assert_eq!(result.exit_code, 1);
        let outcome: Value = serde_json::from_str(&result.output).expect("valid envelope");
        assert_eq!(outcome["status"], "error");
        assert_eq!(outcome["error_class"], "serialization");
        assert!(outcome.get("data").is_none());
    }

    #[test]
    fn rejected_envelope_carries_correlation_id_and_user_message() {
        let interface =
            ApplicationError::from(QuoteError::ZeroTotal).into_interface("quote-42");
        let result = CommandResult::rejected("quote", "zero_total", &interface, 1, None);

        let outcome: Value = serde_json::from_str(&result.output).expect("valid envelope");
        assert_eq!(outcome["correlation_id"], "quote-42");
        assert_eq!(outcome["message"], "no valid service was selected");
        assert_eq!(
            outcome["user_message"],
            "The quote could not be calculated. Check the selected services and amounts."
        );
    }
}
