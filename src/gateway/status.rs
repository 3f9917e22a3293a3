//! Conversion of gRPC failures into client errors.

use prost::Message;

use crate::error::{ClientError, ErrorDetail};
use crate::gateway::protos;

/// Wrap a gRPC status, decoding any per-endorser details it carries.
pub fn from_status(operation: &'static str, status: tonic::Status) -> ClientError {
    ClientError::Gateway {
        operation,
        code: status.code(),
        message: status.message().to_string(),
        details: decode_details(status.details()),
    }
}

/// Decode `gateway.ErrorDetail` entries from a `google.rpc.Status` blob.
///
/// Undecodable input yields no details rather than an error; the status
/// code and message remain the primary diagnostic.
pub fn decode_details(raw: &[u8]) -> Vec<ErrorDetail> {
    if raw.is_empty() {
        return Vec::new();
    }
    let Ok(status) = protos::RpcStatus::decode(raw) else {
        return Vec::new();
    };

    status
        .details
        .iter()
        .filter(|any| any.type_url.ends_with(protos::ERROR_DETAIL_TYPE))
        .filter_map(|any| protos::ErrorDetail::decode(any.value.as_slice()).ok())
        .map(|d| ErrorDetail {
            address: d.address,
            msp_id: d.msp_id,
            message: d.message,
        })
        .collect()
}
