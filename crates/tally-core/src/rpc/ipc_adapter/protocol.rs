use crate::error::RpcError;

/// Request envelope. The `id` is the correlation key: every request is
/// tagged and every response checked against it, so a response can never be
/// attributed to the wrong request by sequencing alone.
#[derive(serde::Serialize)]
pub(super) struct IpcRequest<'a> {
    pub(super) id: u64,
    pub(super) method: &'a str,
    pub(super) params: Vec<serde_json::Value>,
}

#[derive(serde::Deserialize)]
pub(super) struct IpcResponse {
    #[serde(default)]
    pub(super) id: Option<u64>,
    pub(super) result: Option<serde_json::Value>,
    pub(super) error: Option<serde_json::Value>,
}

/// Validate a decoded response envelope against the request that produced it
/// and extract its payload.
///
/// An envelope with neither `result` nor `error` matches no known shape and
/// is rejected as a protocol violation rather than treated as an empty
/// success.
pub(super) fn match_response(
    response: IpcResponse,
    expected_id: u64,
) -> Result<serde_json::Value, RpcError> {
    match response.id {
        Some(got) if got == expected_id => {}
        Some(got) => {
            return Err(RpcError::IdMismatch {
                expected: expected_id,
                got,
            })
        }
        None => {
            return Err(RpcError::InvalidResponse(
                "response envelope is missing an id".to_owned(),
            ))
        }
    }

    if let Some(err) = response.error {
        return Err(parse_node_error(err));
    }

    match response.result {
        Some(result) => Ok(result),
        None => Err(RpcError::InvalidResponse(
            "response envelope carries neither result nor error".to_owned(),
        )),
    }
}

/// Parse a node error value into a structured `RpcError`.
///
/// The node usually reports errors as `{"code": <int>, "message": <string>}`.
/// If the value matches that shape we produce a `Server` error; otherwise the
/// raw JSON is preserved verbatim in `ServerOther`.
pub(super) fn parse_node_error(err: serde_json::Value) -> RpcError {
    #[derive(serde::Deserialize)]
    struct NodeError {
        code: i64,
        message: String,
    }

    match serde_json::from_value::<NodeError>(err.clone()) {
        Ok(parsed) => RpcError::Server {
            code: parsed.code,
            message: parsed.message,
        },
        Err(_) => RpcError::ServerOther(err.to_string()),
    }
}
