use latexpad_syntax::{ParseTree, SyntaxError};
use serde::{Deserialize, Serialize};

use crate::editing::Delta;

/// A message from the editing surface to the worker.
///
/// ```json
/// {"type": "call", "id": 3, "call": {"command": "getValue"}}
/// {"type": "event", "event": {"name": "change", "data": {"action": "insertText", ...}}}
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum WorkerRequest {
    /// Configures the worker. Absent fields keep their current value.
    Init {
        #[serde(
            rename = "timeoutMs",
            default,
            skip_serializing_if = "Option::is_none"
        )]
        timeout_ms: Option<u64>,
    },
    /// Invokes a worker method. `id` is echoed back on the answer, if any.
    Call {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        id: Option<u64>,
        call: WorkerCall,
    },
    /// Forwards an editor event.
    Event { event: EditorEvent },
}

impl WorkerRequest {
    pub fn change(delta: Delta) -> Self {
        WorkerRequest::Event {
            event: EditorEvent::Change { data: delta },
        }
    }

    pub fn set_value(text: impl Into<String>) -> Self {
        WorkerRequest::Call {
            id: None,
            call: WorkerCall::SetValue { text: text.into() },
        }
    }

    pub fn get_value(id: u64) -> Self {
        WorkerRequest::Call {
            id: Some(id),
            call: WorkerCall::GetValue,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "camelCase")]
pub enum WorkerCall {
    SetValue { text: String },
    GetValue,
    SetTimeout { ms: u64 },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "name", rename_all = "camelCase")]
pub enum EditorEvent {
    Change { data: Delta },
}

/// A message from the worker back to the editing surface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum WorkerResponse {
    /// Answer to a [`WorkerCall::GetValue`].
    Call {
        #[serde(default)]
        id: Option<u64>,
        data: String,
    },
    Event { event: WorkerEvent },
    Log { data: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "name", rename_all = "camelCase")]
pub enum WorkerEvent {
    Parsed { data: ParseTree },
    SyntaxError { data: SyntaxError },
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editing::Range;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn change_request_wraps_delta() {
        let request = WorkerRequest::change(Delta::InsertText {
            range: Range::new(0, 0, 0, 1),
            text: "x".into(),
        });
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({
                "type": "event",
                "event": {
                    "name": "change",
                    "data": {
                        "action": "insertText",
                        "range": {"start": {"row": 0, "column": 0}, "end": {"row": 0, "column": 1}},
                        "text": "x",
                    },
                },
            })
        );
    }

    #[test]
    fn call_request_parses_with_and_without_id() {
        let request: WorkerRequest = serde_json::from_value(json!({
            "type": "call",
            "id": 4,
            "call": {"command": "getValue"},
        }))
        .unwrap();
        assert_eq!(request, WorkerRequest::get_value(4));

        let request: WorkerRequest = serde_json::from_value(json!({
            "type": "call",
            "call": {"command": "setTimeout", "ms": 50},
        }))
        .unwrap();
        assert_eq!(
            request,
            WorkerRequest::Call {
                id: None,
                call: WorkerCall::SetTimeout { ms: 50 },
            }
        );
    }

    #[test]
    fn init_timeout_is_optional() {
        let request: WorkerRequest = serde_json::from_value(json!({"type": "init"})).unwrap();
        assert_eq!(request, WorkerRequest::Init { timeout_ms: None });
        assert_eq!(
            serde_json::to_value(WorkerRequest::Init {
                timeout_ms: Some(200)
            })
            .unwrap(),
            json!({"type": "init", "timeoutMs": 200})
        );
    }

    #[test]
    fn init_timeout_is_camel_case_on_the_wire() {
        let request: WorkerRequest =
            serde_json::from_value(json!({"type": "init", "timeoutMs": 75})).unwrap();
        assert_eq!(request, WorkerRequest::Init { timeout_ms: Some(75) });
    }

    #[test]
    fn unknown_command_is_rejected() {
        let result = serde_json::from_value::<WorkerRequest>(json!({
            "type": "call",
            "call": {"command": "format"},
        }));
        assert!(result.is_err());
    }

    #[test]
    fn parsed_event_carries_tree() {
        let tree = latexpad_syntax::parse("\\emph{x}").unwrap();
        let response = WorkerResponse::Event {
            event: WorkerEvent::Parsed { data: tree },
        };
        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(value["type"], "event");
        assert_eq!(value["event"]["name"], "parsed");
        assert_eq!(value["event"]["data"]["type"], "Document");

        let back: WorkerResponse = serde_json::from_value(value).unwrap();
        assert_eq!(back, response);
    }

    #[test]
    fn log_response_shape() {
        assert_eq!(
            serde_json::to_value(WorkerResponse::Log {
                data: "ready".into()
            })
            .unwrap(),
            json!({"type": "log", "data": "ready"})
        );
    }
}
