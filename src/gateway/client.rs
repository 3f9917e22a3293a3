//! Gateway session: network and contract handles over one gRPC channel.
//!
//! # Responsibilities
//! - Hold the channel and signing identity for the life of the process
//! - Submit: endorse, sign, submit, wait for commit status
//! - Evaluate: single-peer query without ordering
//! - Enforce a separate deadline on every phase

use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use http::uri::PathAndQuery;
use tokio::time::timeout;
use tonic::codec::ProstCodec;
use tonic::transport::Channel;

use crate::config::TimeoutConfig;
use crate::error::{ClientError, ClientResult};
use crate::gateway::api::{ContractApi, ContractProvider};
use crate::gateway::proposal::{
    build_commit_status_request, build_signed_proposal, extract_result, sign_envelope,
};
use crate::gateway::protos::{self, TxValidationCode};
use crate::gateway::status::from_status;
use crate::identity::SigningIdentity;
use crate::observability::metrics;

const ENDORSE_PATH: &str = "/gateway.Gateway/Endorse";
const SUBMIT_PATH: &str = "/gateway.Gateway/Submit";
const COMMIT_STATUS_PATH: &str = "/gateway.Gateway/CommitStatus";
const EVALUATE_PATH: &str = "/gateway.Gateway/Evaluate";

struct GatewayInner {
    channel: Channel,
    signing: SigningIdentity,
    timeouts: TimeoutConfig,
}

/// Connection to a peer's gateway service on behalf of one identity.
#[derive(Clone)]
pub struct Gateway {
    inner: Arc<GatewayInner>,
}

impl Gateway {
    /// Open a session over an established channel.
    pub fn connect(signing: SigningIdentity, channel: Channel, timeouts: TimeoutConfig) -> Self {
        tracing::info!(
            msp_id = %signing.msp_id(),
            evaluate_secs = timeouts.evaluate_secs,
            endorse_secs = timeouts.endorse_secs,
            submit_secs = timeouts.submit_secs,
            commit_status_secs = timeouts.commit_status_secs,
            "Gateway session opened"
        );
        Self {
            inner: Arc::new(GatewayInner {
                channel,
                signing,
                timeouts,
            }),
        }
    }

    /// Handle for a named channel.
    pub fn network(&self, name: &str) -> Network {
        Network {
            inner: self.inner.clone(),
            name: name.to_string(),
        }
    }
}

impl ContractProvider for Gateway {
    fn contract(&self, channel: &str, chaincode: &str) -> Arc<dyn ContractApi> {
        Arc::new(self.network(channel).contract(chaincode))
    }
}

impl std::fmt::Debug for Gateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Gateway")
            .field("msp_id", &self.inner.signing.msp_id())
            .field("timeouts", &self.inner.timeouts)
            .finish()
    }
}

/// A channel as seen through the gateway.
#[derive(Clone)]
pub struct Network {
    inner: Arc<GatewayInner>,
    name: String,
}

impl Network {
    /// Handle for a chaincode deployed on this channel.
    pub fn contract(&self, chaincode: &str) -> Contract {
        Contract {
            inner: self.inner.clone(),
            channel_name: self.name.clone(),
            chaincode_name: chaincode.to_string(),
        }
    }
}

/// A chaincode on a channel; the unit transactions are addressed to.
#[derive(Clone)]
pub struct Contract {
    inner: Arc<GatewayInner>,
    channel_name: String,
    chaincode_name: String,
}

impl Contract {
    pub fn channel_name(&self) -> &str {
        &self.channel_name
    }

    pub fn chaincode_name(&self) -> &str {
        &self.chaincode_name
    }

    async fn unary<Req, Resp>(
        &self,
        operation: &'static str,
        path: &'static str,
        request: Req,
        deadline: Duration,
    ) -> ClientResult<Resp>
    where
        Req: prost::Message + Send + Sync + 'static,
        Resp: prost::Message + Default + Send + Sync + 'static,
    {
        let started = Instant::now();
        let call = async {
            let mut grpc = tonic::client::Grpc::new(self.inner.channel.clone());
            grpc.ready().await.map_err(|e| ClientError::Gateway {
                operation,
                code: tonic::Code::Unavailable,
                message: format!("service was not ready: {}", e),
                details: Vec::new(),
            })?;

            let mut request = tonic::Request::new(request);
            request.set_timeout(deadline);
            let codec: ProstCodec<Req, Resp> = ProstCodec::default();
            grpc.unary(request, PathAndQuery::from_static(path), codec)
                .await
                .map(tonic::Response::into_inner)
                .map_err(|status| match status.code() {
                    // The server enforces the propagated deadline too and may answer first.
                    tonic::Code::DeadlineExceeded => ClientError::Timeout {
                        operation,
                        after: deadline,
                    },
                    tonic::Code::Cancelled if started.elapsed() >= deadline => {
                        ClientError::Timeout {
                            operation,
                            after: deadline,
                        }
                    }
                    _ => from_status(operation, status),
                })
        };

        match timeout(deadline, call).await {
            Ok(result) => result,
            Err(_) => Err(ClientError::Timeout {
                operation,
                after: deadline,
            }),
        }
    }

    async fn submit(&self, name: &str, args: &[String]) -> ClientResult<Vec<u8>> {
        let signing = &self.inner.signing;
        let timeouts = &self.inner.timeouts;
        let invocation = build_signed_proposal(
            signing,
            &self.channel_name,
            &self.chaincode_name,
            name,
            args,
        )?;
        let transaction_id = invocation.transaction_id.clone();

        tracing::debug!(
            transaction = %name,
            transaction_id = %transaction_id,
            "Endorsing transaction"
        );
        let endorsed: protos::EndorseResponse = self
            .unary(
                "Endorse",
                ENDORSE_PATH,
                protos::EndorseRequest {
                    transaction_id: transaction_id.clone(),
                    channel_id: invocation.channel_id.clone(),
                    proposed_transaction: Some(invocation.signed_proposal),
                    endorsing_organizations: Vec::new(),
                },
                timeouts.endorse(),
            )
            .await?;

        let mut envelope = endorsed.prepared_transaction.ok_or_else(|| {
            ClientError::Protocol("endorse response has no prepared transaction".to_string())
        })?;
        let result = extract_result(&envelope)?;
        sign_envelope(signing, &mut envelope)?;

        tracing::debug!(transaction_id = %transaction_id, "Submitting transaction");
        let _: protos::SubmitResponse = self
            .unary(
                "Submit",
                SUBMIT_PATH,
                protos::SubmitRequest {
                    transaction_id: transaction_id.clone(),
                    channel_id: self.channel_name.clone(),
                    prepared_transaction: Some(envelope),
                },
                timeouts.submit(),
            )
            .await?;

        let status: protos::CommitStatusResponse = self
            .unary(
                "CommitStatus",
                COMMIT_STATUS_PATH,
                build_commit_status_request(signing, &self.channel_name, &transaction_id)?,
                timeouts.commit_status(),
            )
            .await?;

        let code = match TxValidationCode::try_from(status.result) {
            Ok(TxValidationCode::Valid) => None,
            Ok(code) => Some(format!("{:?}", code)),
            Err(_) => Some(format!("Unknown({})", status.result)),
        };
        if let Some(code) = code {
            return Err(ClientError::Commit {
                transaction_id,
                status: code,
                block_number: status.block_number,
            });
        }

        tracing::debug!(
            transaction_id = %transaction_id,
            block_number = status.block_number,
            "Transaction committed"
        );
        Ok(result)
    }

    async fn evaluate(&self, name: &str, args: &[String]) -> ClientResult<Vec<u8>> {
        let invocation = build_signed_proposal(
            &self.inner.signing,
            &self.channel_name,
            &self.chaincode_name,
            name,
            args,
        )?;

        let response: protos::EvaluateResponse = self
            .unary(
                "Evaluate",
                EVALUATE_PATH,
                protos::EvaluateRequest {
                    transaction_id: invocation.transaction_id,
                    channel_id: invocation.channel_id,
                    proposed_transaction: Some(invocation.signed_proposal),
                    target_organizations: Vec::new(),
                },
                self.inner.timeouts.evaluate(),
            )
            .await?;

        Ok(response.result.map(|r| r.payload).unwrap_or_default())
    }
}

#[async_trait]
impl ContractApi for Contract {
    async fn submit_transaction(&self, name: &str, args: &[String]) -> ClientResult<Vec<u8>> {
        let start = Instant::now();
        let result = self.submit(name, args).await;
        metrics::record_transaction("submit", name, result.is_ok(), start);
        result
    }

    async fn evaluate_transaction(&self, name: &str, args: &[String]) -> ClientResult<Vec<u8>> {
        let start = Instant::now();
        let result = self.evaluate(name, args).await;
        metrics::record_transaction("evaluate", name, result.is_ok(), start);
        result
    }
}

impl std::fmt::Debug for Contract {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Contract")
            .field("channel", &self.channel_name)
            .field("chaincode", &self.chaincode_name)
            .finish()
    }
}
