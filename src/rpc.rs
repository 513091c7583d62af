use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Method exposed by the local invocation server.
pub const INVOKE_METHOD: &str = "Function.Invoke";

/// Fixed identifiers stamped on every request from this tool.
pub const REQUEST_ID: &str = "1";
pub const TRACE_ID: &str = "1";
pub const FUNCTION_ARN: &str = "arn:aws:lambda:an-antarctica-1:123456789100:function:test";

/// Two-part deadline timestamp as the server-side schema defines it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deadline {
    #[serde(rename = "Seconds")]
    pub seconds: i64,
    #[serde(rename = "Nanos")]
    pub nanos: i64,
}

/// Invocation request as the server expects it on the wire. The field names
/// and the base64 payload encoding match the Go-side message schema and must
/// stay that way.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvokeRequest {
    #[serde(rename = "Payload", with = "payload_bytes")]
    pub payload: Vec<u8>,
    #[serde(rename = "RequestId")]
    pub request_id: String,
    #[serde(rename = "XAmznTraceId")]
    pub trace_id: String,
    #[serde(rename = "Deadline")]
    pub deadline: Deadline,
    #[serde(rename = "InvokedFunctionArn")]
    pub invoked_function_arn: String,
}

impl InvokeRequest {
    /// Build the one request this tool ever sends. `timeout_secs` lands in
    /// `Deadline.Seconds` unchanged.
    pub fn new(payload: Vec<u8>, timeout_secs: i64) -> Self {
        Self {
            payload,
            request_id: REQUEST_ID.to_string(),
            trace_id: TRACE_ID.to_string(),
            deadline: Deadline {
                seconds: timeout_secs,
                nanos: 0,
            },
            invoked_function_arn: FUNCTION_ARN.to_string(),
        }
    }
}

/// One call in the server's RPC envelope: `params` is an array holding the
/// single request argument.
#[derive(Debug, Serialize)]
pub struct RpcCall<'a> {
    pub method: &'a str,
    pub params: (&'a InvokeRequest,),
    pub id: u64,
}

/// Reply envelope. The result is opaque; only `error` decides success.
#[derive(Debug, Deserialize)]
pub struct RpcReply {
    pub id: u64,
    pub result: Option<Value>,
    pub error: Option<String>,
}

mod payload_bytes {
    use base64::engine::general_purpose::STANDARD;
    use base64::Engine as _;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&STANDARD.encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        match Option::<String>::deserialize(deserializer)? {
            Some(s) => STANDARD.decode(s.as_bytes()).map_err(serde::de::Error::custom),
            None => Ok(Vec::new()),
        }
    }
}
