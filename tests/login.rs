use std::sync::{Arc, Mutex};

use mockito::{Matcher, Mock, Server, ServerGuard};
use p256::ecdsa::signature::Verifier;
use p256::ecdsa::{Signature, SigningKey, VerifyingKey};
use p256::pkcs8::EncodePrivateKey;
use passkey_emu::credential::{Credential, CounterPolicy};
use passkey_emu::encoding::{base64url_decode, base64url_encode, sha256};
use passkey_emu::relying_party::{LoginOptions, RelyingPartyClient, RelyingPartyError, login};
use passkey_emu::{Authenticator, Error, Fido2Client, SoftwareCrypto};
use serde_json::{Value, json};

const TENANT: &str = "e768822f-b1a1-404c-a685-0e37905ca5f5";
const AUTHORIZATION: &str = "Basic ZTc2ODgyMmYtYjFhMS00MDRjLWE2ODUtMGUzNzkwNWNhNWY1";
const CHALLENGE_ID: &str = "c9cfbdf2-c712-4284-abc2-fbd91a9848fb";
const CHALLENGE: &str = "Wn5edg6F1p6AH2HOjxmA6216kZEt_bFfFRetHVT0O10";
const DEVICE_ID: &str = "08e21881-d6a6-4656-b34b-6e2e1ac487d7";
const ACCESS_TOKEN: &str = "eyJhbGciOiJSUzI1NiJ9.e30.sig";

const CHALLENGE_PATH: &str = "/v1/client/challenge";
const OPTIONS_PATH: &str = "/v1/client/user-authenticators/passkey/authentication-options";
const VERIFY_PATH: &str = "/v1/client/verify/passkey";

fn make_client() -> (Fido2Client, VerifyingKey) {
    let key = SigningKey::random(&mut rand::thread_rng());
    let credential = Credential {
        credential_id: "5a4fe2cc-2914-401b-813a-9f8c8f305491".into(),
        rp_id: "simplicity.kiwi".into(),
        user_handle: "NDlkMjlkN2EtMTgwOC00ZGZjLTg4ODgtZTNlMWNiM2ExOGYz".into(),
        user_name: None,
        key_algorithm: "ECDSA".into(),
        key_curve: "P-256".into(),
        key_value: base64url_encode(key.to_pkcs8_der().unwrap().as_bytes()),
        counter: 0,
    };
    (
        Fido2Client::new(Authenticator::new(SoftwareCrypto, credential, CounterPolicy::Fixed)),
        *key.verifying_key(),
    )
}

fn options() -> LoginOptions<'static> {
    LoginOptions {
        origin: "https://app.simplicity.kiwi",
        action: "cognitoAuth",
        device_id: DEVICE_ID,
    }
}

fn relying_party(server: &ServerGuard) -> RelyingPartyClient {
    RelyingPartyClient::new(&format!("{}/v1", server.url()), TENANT)
}

async fn mock_challenge(server: &mut ServerGuard) -> Mock {
    server
        .mock("POST", CHALLENGE_PATH)
        .match_header("authorization", AUTHORIZATION)
        .match_body(Matcher::Json(json!({ "action": "cognitoAuth" })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(json!({ "challengeId": CHALLENGE_ID }).to_string())
        .create_async()
        .await
}

async fn mock_options(server: &mut ServerGuard) -> Mock {
    server
        .mock("POST", OPTIONS_PATH)
        .match_header("authorization", AUTHORIZATION)
        .match_body(Matcher::Json(json!({ "challengeId": CHALLENGE_ID })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({
                "challengeId": CHALLENGE_ID,
                "options": {
                    "rpId": "simplicity.kiwi",
                    "challenge": CHALLENGE,
                    "allowCredentials": [],
                    "timeout": 60000,
                    "userVerification": "preferred"
                }
            })
            .to_string(),
        )
        .create_async()
        .await
}

/// Verify endpoint that keeps the presented body for inspection.
async fn mock_verify(server: &mut ServerGuard, verified: bool) -> (Mock, Arc<Mutex<Option<Value>>>) {
    let presented = Arc::new(Mutex::new(None));
    let seen = presented.clone();
    let access_token = verified.then_some(ACCESS_TOKEN);
    let mock = server
        .mock("POST", VERIFY_PATH)
        .match_header("authorization", AUTHORIZATION)
        .match_body(Matcher::PartialJson(json!({
            "challengeId": CHALLENGE_ID,
            "deviceId": DEVICE_ID,
            "authenticationCredential": {
                "id": "Wk_izCkUQBuBOp-MjzBUkQ",
                "rawId": "Wk_izCkUQBuBOp-MjzBUkQ",
                "type": "public-key",
                "authenticatorAttachment": "platform",
                "clientExtensionResults": {}
            }
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body_from_request(move |request| {
            let body = request.body().map(|b| b.clone()).unwrap_or_default();
            *seen.lock().unwrap() = serde_json::from_slice(&body).ok();
            json!({
                "isVerified": verified,
                "accessToken": access_token,
                "userId": "49d29d7a-1808-4dfc-8888-e3e1cb3a18f3",
                "username": "someone@example.com"
            })
            .to_string()
            .into_bytes()
        })
        .create_async()
        .await;
    (mock, presented)
}

#[tokio::test]
async fn test_login_flow() {
    let mut server = Server::new_async().await;
    let challenge = mock_challenge(&mut server).await;
    let options_mock = mock_options(&mut server).await;
    let (verify_mock, presented) = mock_verify(&mut server, true).await;
    let (client, verifying) = make_client();

    let result = login(&relying_party(&server), &client, &options()).await.unwrap();
    challenge.assert_async().await;
    options_mock.assert_async().await;
    verify_mock.assert_async().await;
    assert!(result.is_verified);
    assert_eq!(result.access_token.as_deref(), Some(ACCESS_TOKEN));

    let body = presented.lock().unwrap().clone().expect("verify body recorded");
    let response = &body["authenticationCredential"]["response"];
    assert_eq!(
        response["userHandle"],
        "NDlkMjlkN2EtMTgwOC00ZGZjLTg4ODgtZTNlMWNiM2ExOGYz"
    );

    let client_data_json =
        base64url_decode(response["clientDataJSON"].as_str().unwrap()).unwrap();
    let client_data: Value = serde_json::from_slice(&client_data_json).unwrap();
    assert_eq!(client_data["type"], "webauthn.get");
    assert_eq!(client_data["challenge"], CHALLENGE);
    assert_eq!(client_data["origin"], "https://app.simplicity.kiwi");
    assert_eq!(client_data["crossOrigin"], false);

    let auth_data = base64url_decode(response["authenticatorData"].as_str().unwrap()).unwrap();
    assert_eq!(&auth_data[..32], &sha256(b"simplicity.kiwi"));
    let der = base64url_decode(response["signature"].as_str().unwrap()).unwrap();
    let mut signed = auth_data.clone();
    signed.extend_from_slice(&sha256(&client_data_json));
    verifying
        .verify(&signed, &Signature::from_der(&der).unwrap())
        .expect("presented assertion must verify");
}

#[tokio::test]
async fn test_login_unverified_is_returned() {
    let mut server = Server::new_async().await;
    let _challenge = mock_challenge(&mut server).await;
    let _options = mock_options(&mut server).await;
    let (verify_mock, _) = mock_verify(&mut server, false).await;
    let (client, _) = make_client();

    let result = login(&relying_party(&server), &client, &options()).await.unwrap();
    verify_mock.assert_async().await;
    assert!(!result.is_verified);
    assert!(result.access_token.is_none());
}

#[tokio::test]
async fn test_login_stops_on_error_status() {
    let mut server = Server::new_async().await;
    let _challenge = mock_challenge(&mut server).await;
    let options_mock = server
        .mock("POST", OPTIONS_PATH)
        .with_status(400)
        .with_body(r#"{"error":"invalid_request"}"#)
        .create_async()
        .await;
    let verify_mock = server
        .mock("POST", VERIFY_PATH)
        .expect(0)
        .create_async()
        .await;
    let (client, _) = make_client();

    let err = login(&relying_party(&server), &client, &options()).await.unwrap_err();
    match err {
        Error::RelyingParty(RelyingPartyError::Status { status, body }) => {
            assert_eq!(status, 400);
            assert!(body.contains("invalid_request"));
        }
        other => panic!("expected status error, got {other:?}"),
    }
    options_mock.assert_async().await;
    verify_mock.assert_async().await;
}

#[tokio::test]
async fn test_login_rejects_undecodable_response() {
    let mut server = Server::new_async().await;
    let challenge = server
        .mock("POST", CHALLENGE_PATH)
        .with_status(200)
        .with_body("not json")
        .create_async()
        .await;
    let (client, _) = make_client();

    let err = login(&relying_party(&server), &client, &options()).await.unwrap_err();
    challenge.assert_async().await;
    assert!(matches!(
        err,
        Error::RelyingParty(RelyingPartyError::Decode(_))
    ));
}
