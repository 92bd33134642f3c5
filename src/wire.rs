use serde::{Deserialize, Serialize};

/// One RPC request to a cluster endpoint.
///
/// Serialized as a tagged JSON object, e.g.
/// `{"op": "write", "key": "k1", "value": "v1"}`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum RpcRequest {
    /// Read the value stored under `key`.
    Read { key: String },
    /// Store `value` under `key`.
    Write { key: String, value: String },
    /// Administrative shutdown of the receiving endpoint.
    Terminate { graceful: bool },
}

impl RpcRequest {
    /// Operation name, as it appears on the wire. Used for logging.
    pub fn kind(&self) -> &'static str {
        match self {
            RpcRequest::Read { .. } => "read",
            RpcRequest::Write { .. } => "write",
            RpcRequest::Terminate { .. } => "terminate",
        }
    }
}

/// Reply envelope sent by an endpoint.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RpcResponse {
    /// The operation was applied. `value` is populated for reads;
    /// `null` means the cluster does not hold the key.
    Ok {
        #[serde(default)]
        value: Option<String>,
    },
    /// The endpoint rejected the request.
    Error { error: RemoteError },
}

/// Error payload inside an `error` envelope.
#[derive(Debug, Deserialize)]
pub struct RemoteError {
    /// Error message text from the endpoint.
    pub message: String,
    /// Optional endpoint-specific error code.
    #[serde(default)]
    pub code: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn requests_serialize_with_op_tag() {
        let read = serde_json::to_value(RpcRequest::Read { key: "k1".into() })
            .expect("read must serialize");
        assert_eq!(read, serde_json::json!({"op": "read", "key": "k1"}));

        let terminate = serde_json::to_value(RpcRequest::Terminate { graceful: true })
            .expect("terminate must serialize");
        assert_eq!(
            terminate,
            serde_json::json!({"op": "terminate", "graceful": true})
        );
    }

    #[test]
    fn ok_envelope_value_defaults_to_null() {
        let reply: RpcResponse =
            serde_json::from_str(r#"{"type": "ok"}"#).expect("ack envelope must decode");
        assert!(matches!(reply, RpcResponse::Ok { value: None }));

        let reply: RpcResponse = serde_json::from_str(r#"{"type": "ok", "value": "v1"}"#)
            .expect("value envelope must decode");
        match reply {
            RpcResponse::Ok { value } => assert_eq!(value.as_deref(), Some("v1")),
            RpcResponse::Error { .. } => panic!("expected ok envelope"),
        }
    }

    #[test]
    fn error_envelope_decodes_message_and_code() {
        let reply: RpcResponse = serde_json::from_str(
            r#"{"type": "error", "error": {"message": "malformed request", "code": "EBADREQ"}}"#,
        )
        .expect("error envelope must decode");
        match reply {
            RpcResponse::Error { error } => {
                assert_eq!(error.message, "malformed request");
                assert_eq!(error.code.as_deref(), Some("EBADREQ"));
            }
            RpcResponse::Ok { .. } => panic!("expected error envelope"),
        }
    }
}
