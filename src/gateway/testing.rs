//! In-process gateway service for driving the client over real gRPC.

use std::convert::Infallible;
use std::future::pending;
use std::sync::{Arc, Mutex};
use std::task::{Context, Poll};

use prost::Message;
use tonic::body::BoxBody;
use tonic::codec::ProstCodec;
use tonic::codegen::{empty_body, http, BoxFuture, Service};
use tonic::server::{Grpc, NamedService};
use tonic::transport::server::TcpIncoming;
use tonic::transport::{Channel, Endpoint, Server};
use tonic::{Code, Request, Response, Status};

use crate::gateway::protos;

/// How the stub answers `Endorse`.
#[derive(Debug, Clone)]
pub(crate) enum EndorseBehavior {
    Succeed,
    Stall,
    Reject(Vec<protos::ErrorDetail>),
}

/// How the stub answers `CommitStatus`.
#[derive(Debug, Clone, Copy)]
pub(crate) enum CommitBehavior {
    Code(i32),
    Stall,
}

pub(crate) const STUB_BLOCK_NUMBER: u64 = 7;

#[derive(Debug, Clone)]
pub(crate) struct StubGateway {
    result: Vec<u8>,
    endorse: EndorseBehavior,
    commit: CommitBehavior,
    submitted: Arc<Mutex<Vec<protos::Envelope>>>,
}

impl StubGateway {
    /// Endorses and evaluates to `result`; commits as VALID.
    pub(crate) fn new(result: &[u8]) -> Self {
        Self {
            result: result.to_vec(),
            endorse: EndorseBehavior::Succeed,
            commit: CommitBehavior::Code(protos::TxValidationCode::Valid as i32),
            submitted: Arc::default(),
        }
    }

    pub(crate) fn with_endorse(mut self, endorse: EndorseBehavior) -> Self {
        self.endorse = endorse;
        self
    }

    pub(crate) fn with_commit(mut self, commit: CommitBehavior) -> Self {
        self.commit = commit;
        self
    }

    /// Envelopes received on `Submit`, in arrival order.
    pub(crate) fn submitted(&self) -> Vec<protos::Envelope> {
        self.submitted.lock().unwrap().clone()
    }

    /// Serve on an ephemeral loopback port and return a channel to it.
    pub(crate) async fn spawn(self) -> Channel {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let incoming = TcpIncoming::from_listener(listener, true, None).unwrap();
        tokio::spawn(async move {
            let _ = Server::builder()
                .add_service(self)
                .serve_with_incoming(incoming)
                .await;
        });

        Endpoint::from_shared(format!("http://{}", addr))
            .unwrap()
            .connect()
            .await
            .unwrap()
    }

    async fn endorse(
        self,
        request: Request<protos::EndorseRequest>,
    ) -> Result<Response<protos::EndorseResponse>, Status> {
        if request.get_ref().proposed_transaction.is_none() {
            return Err(Status::invalid_argument("missing proposed transaction"));
        }
        match self.endorse {
            EndorseBehavior::Succeed => Ok(Response::new(protos::EndorseResponse {
                prepared_transaction: Some(prepared_transaction(&self.result)),
            })),
            EndorseBehavior::Stall => pending().await,
            EndorseBehavior::Reject(details) => {
                let rpc = protos::RpcStatus {
                    code: Code::Aborted as i32,
                    message: "failed to endorse transaction".to_string(),
                    details: details
                        .iter()
                        .map(|d| prost_types::Any {
                            type_url: format!("type.googleapis.com/{}", protos::ERROR_DETAIL_TYPE),
                            value: d.encode_to_vec(),
                        })
                        .collect(),
                };
                Err(Status::with_details(
                    Code::Aborted,
                    "failed to endorse transaction",
                    rpc.encode_to_vec().into(),
                ))
            }
        }
    }

    async fn submit(
        self,
        request: Request<protos::SubmitRequest>,
    ) -> Result<Response<protos::SubmitResponse>, Status> {
        let envelope = request
            .into_inner()
            .prepared_transaction
            .ok_or_else(|| Status::invalid_argument("missing prepared transaction"))?;
        self.submitted.lock().unwrap().push(envelope);
        Ok(Response::new(protos::SubmitResponse {}))
    }

    async fn commit_status(
        self,
        request: Request<protos::SignedCommitStatusRequest>,
    ) -> Result<Response<protos::CommitStatusResponse>, Status> {
        protos::CommitStatusRequest::decode(request.get_ref().request.as_slice())
            .map_err(|e| Status::invalid_argument(e.to_string()))?;
        match self.commit {
            CommitBehavior::Code(result) => Ok(Response::new(protos::CommitStatusResponse {
                result,
                block_number: STUB_BLOCK_NUMBER,
            })),
            CommitBehavior::Stall => pending().await,
        }
    }

    async fn evaluate(
        self,
        _request: Request<protos::EvaluateRequest>,
    ) -> Result<Response<protos::EvaluateResponse>, Status> {
        Ok(Response::new(protos::EvaluateResponse {
            result: Some(protos::Response {
                status: 200,
                message: String::new(),
                payload: self.result.clone(),
            }),
        }))
    }
}

impl Service<http::Request<BoxBody>> for StubGateway {
    type Response = http::Response<BoxBody>;
    type Error = Infallible;
    type Future = BoxFuture<Self::Response, Self::Error>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: http::Request<BoxBody>) -> Self::Future {
        let stub = self.clone();
        let path = req.uri().path().to_string();
        Box::pin(async move {
            let response = match path.as_str() {
                "/gateway.Gateway/Endorse" => {
                    let method = tower::service_fn(move |r: Request<protos::EndorseRequest>| {
                        stub.clone().endorse(r)
                    });
                    let mut grpc = Grpc::new(ProstCodec::default());
                    grpc.unary(method, req).await
                }
                "/gateway.Gateway/Submit" => {
                    let method = tower::service_fn(move |r: Request<protos::SubmitRequest>| {
                        stub.clone().submit(r)
                    });
                    let mut grpc = Grpc::new(ProstCodec::default());
                    grpc.unary(method, req).await
                }
                "/gateway.Gateway/CommitStatus" => {
                    let method =
                        tower::service_fn(move |r: Request<protos::SignedCommitStatusRequest>| {
                            stub.clone().commit_status(r)
                        });
                    let mut grpc = Grpc::new(ProstCodec::default());
                    grpc.unary(method, req).await
                }
                "/gateway.Gateway/Evaluate" => {
                    let method = tower::service_fn(move |r: Request<protos::EvaluateRequest>| {
                        stub.clone().evaluate(r)
                    });
                    let mut grpc = Grpc::new(ProstCodec::default());
                    grpc.unary(method, req).await
                }
                _ => {
                    let mut response = http::Response::new(empty_body());
                    let headers = response.headers_mut();
                    headers.insert(
                        "grpc-status",
                        http::HeaderValue::from(Code::Unimplemented as i32),
                    );
                    headers.insert(
                        http::header::CONTENT_TYPE,
                        http::HeaderValue::from_static("application/grpc"),
                    );
                    response
                }
            };
            Ok(response)
        })
    }
}

impl NamedService for StubGateway {
    const NAME: &'static str = "gateway.Gateway";
}

/// An unsigned prepared transaction whose single action returns `result`.
pub(crate) fn prepared_transaction(result: &[u8]) -> protos::Envelope {
    let chaincode_action = protos::ChaincodeAction {
        response: Some(protos::Response {
            status: 200,
            message: String::new(),
            payload: result.to_vec(),
        }),
        ..Default::default()
    };
    let response_payload = protos::ProposalResponsePayload {
        proposal_hash: vec![1, 2, 3],
        extension: chaincode_action.encode_to_vec(),
    };
    let action_payload = protos::ChaincodeActionPayload {
        chaincode_proposal_payload: Vec::new(),
        action: Some(protos::ChaincodeEndorsedAction {
            proposal_response_payload: response_payload.encode_to_vec(),
        }),
    };
    let transaction = protos::Transaction {
        actions: vec![protos::TransactionAction {
            header: Vec::new(),
            payload: action_payload.encode_to_vec(),
        }],
    };
    protos::Envelope {
        payload: protos::Payload {
            header: None,
            data: transaction.encode_to_vec(),
        }
        .encode_to_vec(),
        signature: Vec::new(),
    }
}
