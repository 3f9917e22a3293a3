//! Request handlers for `/invoke` and `/query`.

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_extra::extract::{Form, Query};
use serde::Deserialize;

use crate::gateway::{ContractApi, ContractProvider};

/// Shared handler state.
pub type AppState = Arc<dyn ContractProvider>;

/// Parameters accepted by both endpoints. `args` may repeat.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TransactionParams {
    pub channelid: Option<String>,
    pub chaincodeid: Option<String>,
    pub function: Option<String>,
    #[serde(default)]
    pub args: Vec<String>,
}

struct Resolved {
    contract: Arc<dyn ContractApi>,
    function: String,
    args: Vec<String>,
}

impl TransactionParams {
    fn resolve(self, provider: &dyn ContractProvider) -> Result<Resolved, Response> {
        let channel = required(self.channelid, "channelid")?;
        let chaincode = required(self.chaincodeid, "chaincodeid")?;
        let function = required(self.function, "function")?;

        Ok(Resolved {
            contract: provider.contract(&channel, &chaincode),
            function,
            args: self.args,
        })
    }
}

fn required(value: Option<String>, name: &str) -> Result<String, Response> {
    match value {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err((StatusCode::BAD_REQUEST, format!("Missing parameter: {}", name)).into_response()),
    }
}

/// `POST /invoke`: submit a transaction.
pub async fn invoke_handler(
    State(provider): State<AppState>,
    Form(params): Form<TransactionParams>,
) -> Response {
    let call = match params.resolve(provider.as_ref()) {
        Ok(call) => call,
        Err(rejection) => return rejection,
    };

    tracing::info!(function = %call.function, args = call.args.len(), "Invoke");
    let result = call.contract.submit_transaction(&call.function, &call.args).await;
    respond(&call.function, result)
}

/// `GET /query`: evaluate a transaction.
pub async fn query_handler(
    State(provider): State<AppState>,
    Query(params): Query<TransactionParams>,
) -> Response {
    let call = match params.resolve(provider.as_ref()) {
        Ok(call) => call,
        Err(rejection) => return rejection,
    };

    tracing::info!(function = %call.function, args = call.args.len(), "Query");
    let result = call.contract.evaluate_transaction(&call.function, &call.args).await;
    respond(&call.function, result)
}

fn respond(function: &str, result: crate::error::ClientResult<Vec<u8>>) -> Response {
    match result {
        Ok(payload) => (
            StatusCode::OK,
            format!("Response: {}", String::from_utf8_lossy(&payload)),
        )
            .into_response(),
        Err(e) => {
            tracing::warn!(function, error = %e, "Transaction failed");
            (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response()
        }
    }
}
