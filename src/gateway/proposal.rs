//! Proposal construction and transaction result extraction.
//!
//! # Responsibilities
//! - Derive the transaction id from a fresh nonce and the creator identity
//! - Build and sign the chaincode invocation proposal
//! - Sign the prepared transaction and the commit-status request
//! - Unwrap the chaincode response payload from a prepared transaction

use prost::Message;
use rand::RngCore;
use sha2::{Digest, Sha256};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::error::{ClientError, ClientResult};
use crate::gateway::protos;
use crate::identity::{SigningIdentity, X509Identity};

/// Size of the random nonce mixed into each transaction id.
pub const NONCE_LENGTH: usize = 24;

/// Serialized creator bytes for an identity.
pub fn serialize_identity(identity: &X509Identity) -> Vec<u8> {
    protos::SerializedIdentity {
        mspid: identity.msp_id().to_string(),
        id_bytes: identity.certificate_pem().to_vec(),
    }
    .encode_to_vec()
}

/// Nonce, creator and the transaction id derived from them.
#[derive(Debug, Clone)]
pub struct TransactionContext {
    pub nonce: Vec<u8>,
    pub creator: Vec<u8>,
    pub transaction_id: String,
}

impl TransactionContext {
    pub fn new(creator: Vec<u8>) -> Self {
        let mut nonce = vec![0u8; NONCE_LENGTH];
        rand::thread_rng().fill_bytes(&mut nonce);
        Self::with_nonce(nonce, creator)
    }

    /// `hex(sha256(nonce || creator))`.
    pub fn with_nonce(nonce: Vec<u8>, creator: Vec<u8>) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(&nonce);
        hasher.update(&creator);
        let transaction_id = hex::encode(hasher.finalize());
        Self {
            nonce,
            creator,
            transaction_id,
        }
    }
}

/// A signed proposal ready to send for endorsement or evaluation.
#[derive(Debug, Clone)]
pub struct SignedInvocation {
    pub transaction_id: String,
    pub channel_id: String,
    pub signed_proposal: protos::SignedProposal,
}

/// Build and sign a proposal invoking `transaction_name(args...)` on `chaincode`.
pub fn build_signed_proposal(
    signing: &SigningIdentity,
    channel: &str,
    chaincode: &str,
    transaction_name: &str,
    args: &[String],
) -> ClientResult<SignedInvocation> {
    let context = TransactionContext::new(serialize_identity(signing.identity()));
    let proposal = build_proposal(&context, channel, chaincode, transaction_name, args);
    let proposal_bytes = proposal.encode_to_vec();
    let signature = signing.sign(&proposal_bytes)?;

    Ok(SignedInvocation {
        transaction_id: context.transaction_id,
        channel_id: channel.to_string(),
        signed_proposal: protos::SignedProposal {
            proposal_bytes,
            signature,
        },
    })
}

/// Unsigned proposal for one chaincode invocation.
pub fn build_proposal(
    context: &TransactionContext,
    channel: &str,
    chaincode: &str,
    transaction_name: &str,
    args: &[String],
) -> protos::Proposal {
    let chaincode_id = protos::ChaincodeId {
        name: chaincode.to_string(),
        ..Default::default()
    };

    let channel_header = protos::ChannelHeader {
        r#type: protos::HEADER_TYPE_ENDORSER_TRANSACTION,
        timestamp: Some(now_timestamp()),
        channel_id: channel.to_string(),
        tx_id: context.transaction_id.clone(),
        extension: protos::ChaincodeHeaderExtension {
            chaincode_id: Some(chaincode_id.clone()),
        }
        .encode_to_vec(),
        ..Default::default()
    };

    let signature_header = protos::SignatureHeader {
        creator: context.creator.clone(),
        nonce: context.nonce.clone(),
    };

    let header = protos::Header {
        channel_header: channel_header.encode_to_vec(),
        signature_header: signature_header.encode_to_vec(),
    };

    let mut chaincode_args = Vec::with_capacity(args.len() + 1);
    chaincode_args.push(transaction_name.as_bytes().to_vec());
    chaincode_args.extend(args.iter().map(|a| a.as_bytes().to_vec()));

    let invocation = protos::ChaincodeInvocationSpec {
        chaincode_spec: Some(protos::ChaincodeSpec {
            chaincode_id: Some(chaincode_id),
            input: Some(protos::ChaincodeInput {
                args: chaincode_args,
                ..Default::default()
            }),
            ..Default::default()
        }),
    };

    let payload = protos::ChaincodeProposalPayload {
        input: invocation.encode_to_vec(),
        ..Default::default()
    };

    protos::Proposal {
        header: header.encode_to_vec(),
        payload: payload.encode_to_vec(),
        extension: Vec::new(),
    }
}

fn now_timestamp() -> prost_types::Timestamp {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default();
    prost_types::Timestamp {
        seconds: now.as_secs() as i64,
        nanos: now.subsec_nanos() as i32,
    }
}

/// Attach the creator's signature to an endorsed, unsigned envelope.
pub fn sign_envelope(
    signing: &SigningIdentity,
    envelope: &mut protos::Envelope,
) -> ClientResult<()> {
    envelope.signature = signing.sign(&envelope.payload)?;
    Ok(())
}

/// Signed request for the commit status of `transaction_id`.
pub fn build_commit_status_request(
    signing: &SigningIdentity,
    channel: &str,
    transaction_id: &str,
) -> ClientResult<protos::SignedCommitStatusRequest> {
    let request = protos::CommitStatusRequest {
        transaction_id: transaction_id.to_string(),
        channel_id: channel.to_string(),
        identity: serialize_identity(signing.identity()),
    }
    .encode_to_vec();
    let signature = signing.sign(&request)?;

    Ok(protos::SignedCommitStatusRequest { request, signature })
}

/// Extract the chaincode response payload from a prepared transaction.
pub fn extract_result(envelope: &protos::Envelope) -> ClientResult<Vec<u8>> {
    let payload = protos::Payload::decode(envelope.payload.as_slice())
        .map_err(|e| malformed("transaction payload", e))?;
    let transaction = protos::Transaction::decode(payload.data.as_slice())
        .map_err(|e| malformed("transaction", e))?;
    let action = transaction
        .actions
        .first()
        .ok_or_else(|| ClientError::Protocol("transaction has no actions".to_string()))?;
    let action_payload = protos::ChaincodeActionPayload::decode(action.payload.as_slice())
        .map_err(|e| malformed("chaincode action payload", e))?;
    let endorsed = action_payload
        .action
        .ok_or_else(|| {
            ClientError::Protocol("chaincode action payload has no action".to_string())
        })?;
    let response_payload =
        protos::ProposalResponsePayload::decode(endorsed.proposal_response_payload.as_slice())
            .map_err(|e| malformed("proposal response payload", e))?;
    let chaincode_action = protos::ChaincodeAction::decode(response_payload.extension.as_slice())
        .map_err(|e| malformed("chaincode action", e))?;

    Ok(chaincode_action
        .response
        .map(|r| r.payload)
        .unwrap_or_default())
}

fn malformed(what: &str, err: prost::DecodeError) -> ClientError {
    ClientError::Protocol(format!("failed to decode {}: {}", what, err))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::testing::prepared_transaction;
    use crate::identity::PrivateKeySigner;

    const EC_CERT: &str = include_str!("../../tests/fixtures/ec_cert.pem");
    const EC_KEY: &str = include_str!("../../tests/fixtures/ec_pkcs8_key.pem");

    fn signing() -> SigningIdentity {
        SigningIdentity::new(
            X509Identity::from_pem("Org1MSP", EC_CERT.as_bytes()).unwrap(),
            PrivateKeySigner::from_pem(EC_KEY.as_bytes()).unwrap(),
        )
    }

    #[test]
    fn test_transaction_id_derivation() {
        let context = TransactionContext::with_nonce(b"nonce".to_vec(), b"creator".to_vec());
        let expected = hex::encode(Sha256::digest(b"noncecreator"));
        assert_eq!(context.transaction_id, expected);

        let a = TransactionContext::new(b"creator".to_vec());
        let b = TransactionContext::new(b"creator".to_vec());
        assert_eq!(a.nonce.len(), NONCE_LENGTH);
        assert_ne!(a.transaction_id, b.transaction_id);
    }

    #[test]
    fn test_proposal_carries_invocation() {
        let context = TransactionContext::with_nonce(vec![7; NONCE_LENGTH], b"me".to_vec());
        let proposal = build_proposal(
            &context,
            "mychannel",
            "livestock",
            "ReadAsset",
            &["42".to_string()],
        );

        let header = protos::Header::decode(proposal.header.as_slice()).unwrap();
        let channel_header =
            protos::ChannelHeader::decode(header.channel_header.as_slice()).unwrap();
        assert_eq!(channel_header.r#type, protos::HEADER_TYPE_ENDORSER_TRANSACTION);
        assert_eq!(channel_header.channel_id, "mychannel");
        assert_eq!(channel_header.tx_id, context.transaction_id);
        let extension =
            protos::ChaincodeHeaderExtension::decode(channel_header.extension.as_slice()).unwrap();
        assert_eq!(extension.chaincode_id.unwrap().name, "livestock");

        let signature_header =
            protos::SignatureHeader::decode(header.signature_header.as_slice()).unwrap();
        assert_eq!(signature_header.creator, b"me");
        assert_eq!(signature_header.nonce, vec![7; NONCE_LENGTH]);

        let payload =
            protos::ChaincodeProposalPayload::decode(proposal.payload.as_slice()).unwrap();
        let invocation = protos::ChaincodeInvocationSpec::decode(payload.input.as_slice()).unwrap();
        let input = invocation.chaincode_spec.unwrap().input.unwrap();
        assert_eq!(input.args, vec![b"ReadAsset".to_vec(), b"42".to_vec()]);
    }

    #[test]
    fn test_signed_proposal_verifies() {
        let signing = signing();
        let invocation =
            build_signed_proposal(&signing, "mychannel", "livestock", "InitLedger", &[]).unwrap();

        let signed = &invocation.signed_proposal;
        assert!(signing
            .identity()
            .verify(&signed.proposal_bytes, &signed.signature)
            .unwrap());

        let proposal = protos::Proposal::decode(signed.proposal_bytes.as_slice()).unwrap();
        let header = protos::Header::decode(proposal.header.as_slice()).unwrap();
        let signature_header =
            protos::SignatureHeader::decode(header.signature_header.as_slice()).unwrap();
        let creator =
            protos::SerializedIdentity::decode(signature_header.creator.as_slice()).unwrap();
        assert_eq!(creator.mspid, "Org1MSP");
        assert_eq!(creator.id_bytes, EC_CERT.as_bytes());
    }

    #[test]
    fn test_extract_result() {
        let envelope = prepared_transaction(br#"{"productId":"42"}"#);
        assert_eq!(extract_result(&envelope).unwrap(), br#"{"productId":"42"}"#);
    }

    #[test]
    fn test_extract_result_without_actions() {
        let envelope = protos::Envelope {
            payload: protos::Payload::default().encode_to_vec(),
            signature: Vec::new(),
        };
        let err = extract_result(&envelope).unwrap_err();
        assert!(matches!(err, ClientError::Protocol(_)));
    }

    #[test]
    fn test_extract_result_garbage() {
        let envelope = protos::Envelope {
            payload: vec![0xff, 0xff, 0xff],
            signature: Vec::new(),
        };
        assert!(matches!(extract_result(&envelope), Err(ClientError::Protocol(_))));
    }

    #[test]
    fn test_envelope_and_commit_request_signatures() {
        let signing = signing();
        let mut envelope = prepared_transaction(b"ok");
        sign_envelope(&signing, &mut envelope).unwrap();
        assert!(signing.identity().verify(&envelope.payload, &envelope.signature).unwrap());

        let request = build_commit_status_request(&signing, "mychannel", "abc").unwrap();
        assert!(signing.identity().verify(&request.request, &request.signature).unwrap());
        let decoded = protos::CommitStatusRequest::decode(request.request.as_slice()).unwrap();
        assert_eq!(decoded.transaction_id, "abc");
        assert_eq!(decoded.channel_id, "mychannel");
    }
}
