//! Conversion between the identity provider's JSON and authenticator shapes.
//!
//! Only the binary members change representation; every other member is
//! moved across untouched.

use super::types::*;
use crate::convert::{decode_base64url, encode_base64url};
use crate::error::PasskeyError;

/// Decode the challenge, user id and excluded credential ids
pub fn to_registration_options(
    input: RegistrationOptionsJson,
) -> Result<RegistrationOptions, PasskeyError> {
    let exclude_credentials = input
        .exclude_credentials
        .into_iter()
        .map(|cred| cred.try_map_id(|id| decode_base64url(&id)))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(CreationOptions {
        challenge: decode_base64url(&input.challenge)?,
        rp: input.rp,
        user: UserEntity {
            id: decode_base64url(&input.user.id)?,
            name: input.user.name,
            display_name: input.user.display_name,
        },
        pub_key_cred_params: input.pub_key_cred_params,
        timeout: input.timeout,
        exclude_credentials,
        authenticator_selection: input.authenticator_selection,
        extra: input.extra,
    })
}

/// Decode the challenge and allowed credential ids
pub fn to_retrieval_options(
    input: RetrievalOptionsJson,
) -> Result<RetrievalOptions, PasskeyError> {
    let allow_credentials = input
        .allow_credentials
        .into_iter()
        .map(|cred| cred.try_map_id(|id| decode_base64url(&id)))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(RequestOptions {
        challenge: decode_base64url(&input.challenge)?,
        rp_id: input.rp_id,
        timeout: input.timeout,
        allow_credentials,
        user_verification: input.user_verification,
        extra: input.extra,
    })
}

pub fn from_creation_result(input: &RawCreationResult) -> CreationResultJson {
    CreationResult {
        id: input.id.clone(),
        raw_id: encode_base64url(&input.raw_id),
        kind: input.kind,
        response: AttestationResponse {
            client_data_json: encode_base64url(&input.response.client_data_json),
            attestation_object: encode_base64url(&input.response.attestation_object),
        },
    }
}

pub fn from_assertion_result(input: &RawAssertionResult) -> AssertionResultJson {
    AssertionResult {
        id: input.id.clone(),
        raw_id: encode_base64url(&input.raw_id),
        kind: input.kind,
        response: AssertionResponse {
            authenticator_data: encode_base64url(&input.response.authenticator_data),
            client_data_json: encode_base64url(&input.response.client_data_json),
            signature: encode_base64url(&input.response.signature),
            user_handle: input.response.user_handle.as_ref().map(encode_base64url),
        },
    }
}
