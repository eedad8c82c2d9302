use crate::*;

use std::collections::BTreeSet;
use std::thread;

use curve25519_dalek::RistrettoPoint;
use curve25519_dalek::Scalar;
use proptest::prelude::*;
use rand_core::OsRng;
use serde_json::{Value, json};

use crate::serialization::{decode_point, decode_scalar, encode_point, encode_scalar};

fn setup_round(max_amount: u64) -> (CredentialIssuer, CredentialClient) {
    let secret = IssuerSecretKey::random(OsRng);
    let issuer = CredentialIssuer::new(secret, CREDENTIAL_NUMBER, max_amount);
    let client = CredentialClient::new(
        CREDENTIAL_NUMBER,
        max_amount,
        issuer.parameters(),
        GeneratorSet::default(),
    );
    (issuer, client)
}

/// Runs the zero exchange that starts every lane of a round.
fn bootstrap(issuer: &CredentialIssuer, client: &mut CredentialClient) {
    let (request, validation) = client.create_request_for_zero_amount(OsRng);
    let response = issuer
        .handle_request(&request.into(), OsRng)
        .expect("zero request should verify");
    client
        .handle_response(&response, validation)
        .expect("zero response should verify");
}

/// Runs a full real exchange end to end.
fn exchange(
    issuer: &CredentialIssuer,
    client: &mut CredentialClient,
    amounts: &[u64],
    present: Vec<Credential>,
) {
    let (request, validation) = client
        .create_request(amounts, present, OsRng)
        .expect("request should build");
    let response = issuer
        .handle_request(&request.into(), OsRng)
        .expect("request should verify");
    client
        .handle_response(&response, validation)
        .expect("response should verify");
}

#[test]
fn zero_bootstrap_fills_the_pool() {
    let (issuer, mut client) = setup_round(MAX_AMOUNT);
    assert!(client.zero_credentials().is_empty());

    bootstrap(&issuer, &mut client);

    assert_eq!(client.zero_credentials().len(), CREDENTIAL_NUMBER);
    assert!(client.valuable_credentials().is_empty());
    assert_eq!(client.balance(), 0);
}

#[test]
fn full_exchange_conserves_value() {
    let (issuer, mut client) = setup_round(MAX_AMOUNT);
    bootstrap(&issuer, &mut client);

    // Register 1500 satoshis against the zero padding.
    let padding = client.zero_credentials().to_vec();
    exchange(&issuer, &mut client, &[1500], padding);

    assert_eq!(client.balance(), 1500);
    assert_eq!(client.valuable_credentials().len(), 1);
    // The second requested slot was padded with a zero credential.
    assert_eq!(client.zero_credentials().len(), 1);
}

#[test]
fn exchange_at_the_maximum_amount() {
    let (issuer, mut client) = setup_round(MAX_AMOUNT);
    bootstrap(&issuer, &mut client);

    let padding = client.zero_credentials().to_vec();
    exchange(&issuer, &mut client, &[MAX_AMOUNT], padding);

    assert_eq!(client.balance(), MAX_AMOUNT);
}

#[test]
fn reissue_splits_and_merges_amounts() {
    let (issuer, mut client) = setup_round(MAX_AMOUNT);
    bootstrap(&issuer, &mut client);
    let padding = client.zero_credentials().to_vec();
    exchange(&issuer, &mut client, &[1000], padding);

    // Split 1000 into 400 + 600 with delta zero.
    let mut present = client.valuable_credentials().to_vec();
    present.extend_from_slice(client.zero_credentials());
    exchange(&issuer, &mut client, &[400, 600], present);
    assert_eq!(client.balance(), 1000);
    assert_eq!(client.valuable_credentials().len(), 2);

    // Merge them back into one credential.
    let present = client.valuable_credentials().to_vec();
    exchange(&issuer, &mut client, &[1000], present);
    assert_eq!(client.balance(), 1000);
    assert_eq!(client.valuable_credentials().len(), 1);
}

#[test]
fn spending_down_to_exit_declares_negative_delta() {
    let (issuer, mut client) = setup_round(MAX_AMOUNT);
    bootstrap(&issuer, &mut client);
    let padding = client.zero_credentials().to_vec();
    exchange(&issuer, &mut client, &[1500], padding);

    // Leave the round: present everything, request nothing but padding.
    let mut present = client.valuable_credentials().to_vec();
    present.extend_from_slice(client.zero_credentials());
    let (request, validation) = client
        .create_request(&[], present, OsRng)
        .expect("request should build");
    assert_eq!(request.delta(), -1500);

    let response = issuer
        .handle_request(&request.into(), OsRng)
        .expect("exit request should verify");
    client
        .handle_response(&response, validation)
        .expect("exit response should verify");
    assert_eq!(client.balance(), 0);
}

#[test]
fn real_requests_have_a_uniform_shape() {
    let (issuer, mut client) = setup_round(MAX_AMOUNT);
    bootstrap(&issuer, &mut client);

    let credential = client.zero_credentials()[0].clone();
    let padding = client.zero_credentials().to_vec();
    let (request, _validation) = client
        .create_request(&[700], padding, OsRng)
        .expect("request should build");

    assert_eq!(request.delta(), 700);
    assert_eq!(request.presented().len(), CREDENTIAL_NUMBER);
    assert_eq!(request.requested.len(), CREDENTIAL_NUMBER);
    for requested in &request.requested {
        assert_eq!(requested.bit_commitments.len(), range_proof_width(MAX_AMOUNT));
    }

    // Presentations reveal exactly the serial numbers of what was spent.
    let serials: Vec<RistrettoPoint> = request
        .presented()
        .iter()
        .map(CredentialPresentation::serial_number)
        .collect();
    assert!(serials.contains(&credential.serial_number(&GeneratorSet::default())));

    let wire = CredentialsRequest::from(request);
    assert_eq!(wire.delta(), 700);
    assert_eq!(wire.requested_count(), CREDENTIAL_NUMBER);
}

#[test]
fn replayed_request_is_rejected() {
    let (issuer, mut client) = setup_round(MAX_AMOUNT);
    bootstrap(&issuer, &mut client);

    let padding = client.zero_credentials().to_vec();
    let (request, validation) = client
        .create_request(&[900], padding, OsRng)
        .expect("request should build");
    let request = CredentialsRequest::from(request);

    let response = issuer
        .handle_request(&request, OsRng)
        .expect("first submission should verify");
    client
        .handle_response(&response, validation)
        .expect("response should verify");

    // The same serial numbers cannot be spent twice in a round.
    assert_eq!(
        issuer.handle_request(&request, OsRng).unwrap_err(),
        CredentialError::SerialNumberAlreadyUsed
    );
}

#[test]
fn duplicate_serials_within_a_request_are_rejected() {
    let (issuer, mut client) = setup_round(MAX_AMOUNT);
    bootstrap(&issuer, &mut client);

    let padding = client.zero_credentials().to_vec();
    let (request, _validation) = client
        .create_request(&[120], padding, OsRng)
        .expect("request should build");

    let mut tampered = request.clone();
    tampered.presented[1] = tampered.presented[0].clone();
    assert_eq!(
        issuer.handle_request(&tampered.into(), OsRng).unwrap_err(),
        CredentialError::SerialNumberDuplicated
    );

    // The duplicate was caught before anything was recorded, so the honest
    // request still goes through.
    issuer
        .handle_request(&request.into(), OsRng)
        .expect("untampered request should verify");
}

#[test]
fn issuer_enforces_credential_counts() {
    let (issuer, mut client) = setup_round(MAX_AMOUNT);
    bootstrap(&issuer, &mut client);

    let padding = client.zero_credentials().to_vec();
    let (request, _validation) = client
        .create_request(&[300], padding, OsRng)
        .expect("request should build");

    let mut short_presented = request.clone();
    short_presented.presented.pop();
    assert_eq!(
        issuer.handle_request(&short_presented.into(), OsRng).unwrap_err(),
        CredentialError::InvalidNumberOfPresentedCredentials {
            expected: CREDENTIAL_NUMBER,
            got: CREDENTIAL_NUMBER - 1,
        }
    );

    let mut short_requested = request.clone();
    short_requested.requested.pop();
    assert_eq!(
        issuer.handle_request(&short_requested.into(), OsRng).unwrap_err(),
        CredentialError::InvalidNumberOfRequestedCredentials {
            expected: CREDENTIAL_NUMBER,
            got: CREDENTIAL_NUMBER - 1,
        }
    );

    // Count checks leave no trace; the honest request still verifies.
    issuer
        .handle_request(&request.into(), OsRng)
        .expect("untampered request should verify");
}

#[test]
fn bit_commitment_counts_are_enforced() {
    let (issuer, mut client) = setup_round(MAX_AMOUNT);
    bootstrap(&issuer, &mut client);

    // A zero request must not smuggle in bit commitments.
    let (zero_request, _validation) = client.create_request_for_zero_amount(OsRng);
    let mut tampered = zero_request.clone();
    tampered.requested[0].bit_commitments.push(RistrettoPoint::random(&mut OsRng));
    assert_eq!(
        issuer.handle_request(&tampered.into(), OsRng).unwrap_err(),
        CredentialError::InvalidBitCommitment
    );

    // A real request must carry exactly one commitment per range bit.
    let padding = client.zero_credentials().to_vec();
    let (request, _validation) = client
        .create_request(&[64], padding, OsRng)
        .expect("request should build");
    let mut tampered = request.clone();
    tampered.requested[0].bit_commitments.pop();
    assert_eq!(
        issuer.handle_request(&tampered.into(), OsRng).unwrap_err(),
        CredentialError::InvalidBitCommitment
    );
}

#[test]
fn tampered_requests_fail_proof_verification() {
    let (issuer, mut client) = setup_round(MAX_AMOUNT);
    bootstrap(&issuer, &mut client);
    let padding = client.zero_credentials().to_vec();
    let (request, _validation) = client
        .create_request(&[2048], padding, OsRng)
        .expect("request should build");

    // A shifted delta breaks the balance proof.
    let mut wrong_delta = request.clone();
    wrong_delta.delta += 1;
    assert_eq!(
        issuer.handle_request(&wrong_delta.into(), OsRng).unwrap_err(),
        CredentialError::CoordinatorReceivedInvalidProofs
    );

    // A mutated bit commitment breaks the range proof.
    let mut wrong_bit = request.clone();
    let bump = wrong_bit.requested[0].ma;
    wrong_bit.requested[0].bit_commitments[0] += bump;
    assert_eq!(
        issuer.handle_request(&wrong_bit.into(), OsRng).unwrap_err(),
        CredentialError::CoordinatorReceivedInvalidProofs
    );

    // A mutated response scalar breaks its proof.
    let mut wrong_response = request.clone();
    wrong_response.proofs[0].responses[0] += Scalar::ONE;
    assert_eq!(
        issuer.handle_request(&wrong_response.into(), OsRng).unwrap_err(),
        CredentialError::CoordinatorReceivedInvalidProofs
    );

    // Proofs are bound to their position in the request.
    let mut swapped = request.clone();
    swapped.proofs.swap(0, 1);
    assert_eq!(
        issuer.handle_request(&swapped.into(), OsRng).unwrap_err(),
        CredentialError::CoordinatorReceivedInvalidProofs
    );

    // The untampered request was never marked spent by any of the above.
    issuer
        .handle_request(&request.into(), OsRng)
        .expect("untampered request should verify");
}

#[test]
fn forged_issuance_proofs_are_rejected() {
    let (issuer, mut client) = setup_round(MAX_AMOUNT);
    bootstrap(&issuer, &mut client);

    let padding = client.zero_credentials().to_vec();
    let (request, validation) = client
        .create_request(&[333], padding, OsRng)
        .expect("request should build");
    let response = issuer
        .handle_request(&request.into(), OsRng)
        .expect("request should verify");

    let mut forged = response.clone();
    let bump = GeneratorSet::default().gw;
    forged.issued[0].v += bump;
    assert_eq!(
        client.handle_response(&forged, validation).unwrap_err(),
        CredentialError::ClientReceivedInvalidProofs
    );
}

#[test]
fn truncated_responses_are_rejected() {
    let (issuer, mut client) = setup_round(MAX_AMOUNT);
    bootstrap(&issuer, &mut client);

    let padding = client.zero_credentials().to_vec();
    let (request, validation) = client
        .create_request(&[333], padding, OsRng)
        .expect("request should build");
    let response = issuer
        .handle_request(&request.into(), OsRng)
        .expect("request should verify");
    assert_eq!(response.issued().len(), CREDENTIAL_NUMBER);

    let mut truncated = response.clone();
    truncated.issued.pop();
    assert_eq!(
        client.handle_response(&truncated, validation).unwrap_err(),
        CredentialError::IssuedCredentialNumberMismatch {
            expected: CREDENTIAL_NUMBER,
            got: CREDENTIAL_NUMBER - 1,
        }
    );
}

#[test]
fn responses_bind_to_their_own_request() {
    let (issuer, mut client) = setup_round(MAX_AMOUNT);

    // Two zero requests in flight at once.
    let (request_a, validation_a) = client.create_request_for_zero_amount(OsRng);
    let (request_b, validation_b) = client.create_request_for_zero_amount(OsRng);
    let _response_a = issuer
        .handle_request(&request_a.into(), OsRng)
        .expect("first request should verify");
    let response_b = issuer
        .handle_request(&request_b.into(), OsRng)
        .expect("second request should verify");

    // Crossing the responses fails: the issuance proofs are tied to the
    // transcript of the request they answer.
    assert_eq!(
        client.handle_response(&response_b, validation_a).unwrap_err(),
        CredentialError::ClientReceivedInvalidProofs
    );
    client
        .handle_response(&response_b, validation_b)
        .expect("matching response should verify");
    assert_eq!(client.zero_credentials().len(), CREDENTIAL_NUMBER);
}

#[test]
fn client_validates_before_touching_the_pool() {
    let (issuer, mut client) = setup_round(1000);
    bootstrap(&issuer, &mut client);
    let padding = client.zero_credentials().to_vec();

    // Too many requested amounts.
    assert_eq!(
        client.create_request(&[1, 2, 3], padding.clone(), OsRng).unwrap_err(),
        CredentialError::InvalidNumberOfRequestedCredentials {
            expected: CREDENTIAL_NUMBER,
            got: 3,
        }
    );

    // Wrong number of presented credentials.
    assert_eq!(
        client.create_request(&[5], padding[..1].to_vec(), OsRng).unwrap_err(),
        CredentialError::InvalidNumberOfPresentedCredentials {
            expected: CREDENTIAL_NUMBER,
            got: 1,
        }
    );

    // An amount above the issuer's maximum.
    assert_eq!(
        client.create_request(&[1001], padding.clone(), OsRng).unwrap_err(),
        CredentialError::CredentialAmountOutOfRange { amount: 1001, max_amount: 1000 }
    );

    // A credential this client never held.
    let foreign = Credential::new(
        5,
        Scalar::random(&mut OsRng),
        Mac { t: Scalar::random(&mut OsRng), v: RistrettoPoint::random(&mut OsRng) },
    );
    assert_eq!(
        client
            .create_request(&[5], vec![foreign, padding[0].clone()], OsRng)
            .unwrap_err(),
        CredentialError::CredentialNotInPool
    );

    // None of the failures removed anything from the pool.
    assert_eq!(client.zero_credentials().len(), CREDENTIAL_NUMBER);
}

#[test]
fn restore_returns_presented_credentials() {
    let (issuer, mut client) = setup_round(MAX_AMOUNT);
    bootstrap(&issuer, &mut client);

    let padding = client.zero_credentials().to_vec();
    let (_request, validation) = client
        .create_request(&[50], padding, OsRng)
        .expect("request should build");
    // Building the request removed the presented credentials.
    assert!(client.zero_credentials().is_empty());

    // The exchange never happened; put them back and spend them for real.
    client.restore(validation);
    assert_eq!(client.zero_credentials().len(), CREDENTIAL_NUMBER);
    let padding = client.zero_credentials().to_vec();
    exchange(&issuer, &mut client, &[50], padding);
    assert_eq!(client.balance(), 50);
}

#[test]
fn concurrent_replay_admits_exactly_one() {
    let (issuer, mut client) = setup_round(MAX_AMOUNT);
    bootstrap(&issuer, &mut client);

    let padding = client.zero_credentials().to_vec();
    let (request, _validation) = client
        .create_request(&[5000], padding, OsRng)
        .expect("request should build");
    let request = CredentialsRequest::from(request);

    let outcomes: Vec<Result<CredentialsResponse, CredentialError>> = thread::scope(|scope| {
        let handles: Vec<_> = (0..8)
            .map(|_| scope.spawn(|| issuer.handle_request(&request, OsRng)))
            .collect();
        handles
            .into_iter()
            .map(|handle| handle.join().expect("submission thread should not panic"))
            .collect()
    });

    let successes = outcomes.iter().filter(|outcome| outcome.is_ok()).count();
    assert_eq!(successes, 1, "exactly one concurrent submission may win");
    for outcome in outcomes {
        if let Err(error) = outcome {
            assert_eq!(error, CredentialError::SerialNumberAlreadyUsed);
        }
    }
}

#[test]
fn exchange_survives_the_wire() {
    let (issuer, mut client) = setup_round(MAX_AMOUNT);
    bootstrap(&issuer, &mut client);

    let padding = client.zero_credentials().to_vec();
    let (request, validation) = client
        .create_request(&[777], padding, OsRng)
        .expect("request should build");

    let wire = serde_json::to_string(&CredentialsRequest::from(request)).unwrap();
    let parsed: CredentialsRequest = serde_json::from_str(&wire).unwrap();
    assert!(matches!(parsed, CredentialsRequest::Real(_)));

    let response = issuer
        .handle_request(&parsed, OsRng)
        .expect("reparsed request should verify");
    let response_wire = serde_json::to_string(&response).unwrap();
    let reparsed: CredentialsResponse = serde_json::from_str(&response_wire).unwrap();
    client
        .handle_response(&reparsed, validation)
        .expect("reparsed response should verify");
    assert_eq!(client.balance(), 777);
}

#[test]
fn wire_forms_are_distinguished_by_shape() {
    let (issuer, mut client) = setup_round(MAX_AMOUNT);
    bootstrap(&issuer, &mut client);

    let (zero_request, _validation) = client.create_request_for_zero_amount(OsRng);
    let zero_value = serde_json::to_value(&zero_request).unwrap();
    let zero_keys: BTreeSet<&str> =
        zero_value.as_object().unwrap().keys().map(String::as_str).collect();
    assert_eq!(zero_keys, ["proofs", "requested"].into_iter().collect());

    let padding = client.zero_credentials().to_vec();
    let (request, _validation) = client
        .create_request(&[9], padding, OsRng)
        .expect("request should build");
    let real_value = serde_json::to_value(&request).unwrap();
    let real_keys: BTreeSet<&str> =
        real_value.as_object().unwrap().keys().map(String::as_str).collect();
    assert_eq!(
        real_keys,
        ["delta", "presented", "proofs", "requested"].into_iter().collect()
    );

    // Each form parses back into its own arm of the request enum.
    assert!(matches!(
        serde_json::from_value::<CredentialsRequest>(zero_value).unwrap(),
        CredentialsRequest::Zero(_)
    ));
    assert!(matches!(
        serde_json::from_value::<CredentialsRequest>(real_value).unwrap(),
        CredentialsRequest::Real(_)
    ));
}

#[test]
fn zero_form_rejects_unknown_fields() {
    let (_issuer, client) = setup_round(MAX_AMOUNT);
    let (zero_request, _validation) = client.create_request_for_zero_amount(OsRng);

    let mut value = serde_json::to_value(&zero_request).unwrap();
    value
        .as_object_mut()
        .unwrap()
        .insert("note".to_string(), json!("ignored"));
    assert!(serde_json::from_value::<ZeroCredentialsRequest>(value).is_err());
}

#[test]
fn malformed_points_fail_at_the_boundary() {
    let (_issuer, client) = setup_round(MAX_AMOUNT);
    let (zero_request, _validation) = client.create_request_for_zero_amount(OsRng);

    // A non-canonical encoding must fail the whole message.
    let mut value = serde_json::to_value(&zero_request).unwrap();
    value["requested"][0]["ma"] = Value::String("ff".repeat(32));
    assert!(serde_json::from_value::<CredentialsRequest>(value.clone()).is_err());

    // So must a truncated one.
    value["requested"][0]["ma"] = Value::String("00ff".to_string());
    assert!(serde_json::from_value::<CredentialsRequest>(value).is_err());
}

#[test]
fn standard_denominations_drive_the_output_search() {
    let denominations = standard_denominations();
    let table = PossibleDecompositions::new(&denominations, 90_000, 100_000, 3);

    // A realistic query: 2 sat/vbyte, 31 vbytes per output, 5000 sat dust.
    let results = table.by_total_value(100_000, 90_000, 5_000, 3, 10, 2, 31);
    assert!(!results.is_empty());
    assert!(results.len() <= 10);
    assert!(results.windows(2).all(|pair| pair[0].total() >= pair[1].total()));

    let standard: BTreeSet<u64> = denominations.iter().copied().collect();
    for decomposition in &results {
        let fees = 2 * 31 * decomposition.outputs().len() as u64;
        assert!(decomposition.total() + fees <= 100_000);
        assert!(decomposition.total() >= 90_000);
        assert!(decomposition.smallest() >= 5_000);
        assert!(decomposition.largest() <= 100_000);
        for &output in decomposition.outputs() {
            assert!(standard.contains(&output), "{output} is not standard");
        }
    }
}

/// Brute-force enumeration of descending multisets for cross-checking the
/// decomposition engine.
fn brute_force(
    denominations: &[u64],
    minimum_total: u64,
    maximum_total: u64,
    maximum_outputs: usize,
) -> BTreeSet<Vec<u64>> {
    fn recurse(
        denominations: &[u64],
        minimum_total: u64,
        maximum_total: u64,
        outputs_left: usize,
        prefix: &mut Vec<u64>,
        total: u64,
        found: &mut BTreeSet<Vec<u64>>,
    ) {
        if !prefix.is_empty() && total >= minimum_total && total <= maximum_total {
            found.insert(prefix.clone());
        }
        if outputs_left == 0 {
            return;
        }
        for &denomination in denominations {
            if prefix.last().is_some_and(|&smallest| denomination > smallest) {
                continue;
            }
            if total + denomination > maximum_total {
                continue;
            }
            prefix.push(denomination);
            recurse(
                denominations,
                minimum_total,
                maximum_total,
                outputs_left - 1,
                prefix,
                total + denomination,
                found,
            );
            prefix.pop();
        }
    }
    let mut found = BTreeSet::new();
    recurse(
        denominations,
        minimum_total,
        maximum_total,
        maximum_outputs,
        &mut Vec::new(),
        0,
        &mut found,
    );
    found
}

// Property: a full exchange ends with exactly the requested value in the pool.
proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]
    #[test]
    fn prop_exchange_conserves_value(amount in 0u64..=1000) {
        let (issuer, mut client) = setup_round(1000);
        bootstrap(&issuer, &mut client);
        let padding = client.zero_credentials().to_vec();
        exchange(&issuer, &mut client, &[amount], padding);
        prop_assert_eq!(client.balance(), amount);
    }
}

// Property: splitting and re-merging credentials never changes the balance.
proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]
    #[test]
    fn prop_split_and_merge_conserve_value(first in 0u64..=500, second in 0u64..=500) {
        let (issuer, mut client) = setup_round(1000);
        bootstrap(&issuer, &mut client);
        let padding = client.zero_credentials().to_vec();
        exchange(&issuer, &mut client, &[first, second], padding);
        prop_assert_eq!(client.balance(), first + second);

        let mut present = client.valuable_credentials().to_vec();
        present.extend_from_slice(client.zero_credentials());
        prop_assert_eq!(present.len(), CREDENTIAL_NUMBER);
        exchange(&issuer, &mut client, &[first + second], present);
        prop_assert_eq!(client.balance(), first + second);
    }
}

// Property: hex wire encodings of points and scalars round-trip exactly.
proptest! {
    #[test]
    fn prop_hex_encodings_round_trip(bytes in any::<[u8; 32]>()) {
        let scalar = Scalar::from_bytes_mod_order(bytes);
        prop_assert_eq!(decode_scalar(&encode_scalar(&scalar)), Ok(scalar));
        let point = RistrettoPoint::mul_base(&scalar);
        prop_assert_eq!(decode_point(&encode_point(&point)), Ok(point));
    }
}

// Property: the decomposition engine finds exactly what brute force finds.
proptest! {
    #[test]
    fn prop_decompositions_match_brute_force(
        denominations in proptest::sample::subsequence(vec![1u64, 2, 3, 5, 8, 13], 1..=4),
        minimum in 1u64..=30,
        span in 0u64..=15,
        maximum_outputs in 1usize..=3,
    ) {
        let maximum = minimum + span;
        let table = PossibleDecompositions::new(&denominations, minimum, maximum, maximum_outputs);
        let results = table.by_total_value(maximum, minimum, 0, maximum_outputs, usize::MAX, 0, 0);
        prop_assert!(results.windows(2).all(|pair| pair[0] >= pair[1]));
        let found: BTreeSet<Vec<u64>> = results
            .iter()
            .map(|decomposition| decomposition.outputs().to_vec())
            .collect();
        prop_assert_eq!(found.len(), results.len());
        prop_assert_eq!(found, brute_force(&denominations, minimum, maximum, maximum_outputs));
    }
}
