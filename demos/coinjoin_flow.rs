//! End-to-end walkthrough of one participant's credential flow in a round.
//!
//! Run with `cargo run --example coinjoin_flow`.

use rand_core::OsRng;
use wabisabi::{
    CREDENTIAL_NUMBER, CredentialClient, CredentialIssuer, GeneratorSet, IssuerSecretKey,
    MAX_AMOUNT, PossibleDecompositions, standard_denominations,
};

fn main() {
    // 1. The coordinator opens a round with a fresh MAC key and publishes
    //    its parameters.
    let issuer =
        CredentialIssuer::new(IssuerSecretKey::random(OsRng), CREDENTIAL_NUMBER, MAX_AMOUNT);
    println!(
        "round open: {CREDENTIAL_NUMBER} credentials per request, amounts up to {MAX_AMOUNT} sat"
    );

    // 2. A wallet joins and bootstraps its zero-valued padding credentials.
    let mut wallet = CredentialClient::new(
        CREDENTIAL_NUMBER,
        MAX_AMOUNT,
        issuer.parameters(),
        GeneratorSet::default(),
    );
    let (request, validation) = wallet.create_request_for_zero_amount(OsRng);
    let response = issuer
        .handle_request(&request.into(), OsRng)
        .expect("zero request verifies");
    wallet
        .handle_response(&response, validation)
        .expect("zero response verifies");
    println!(
        "bootstrap:  wallet holds {} zero credentials",
        wallet.zero_credentials().len()
    );

    // 3. Input registration: the wallet turns a 1_234_567 sat input into a
    //    credential, declaring the value as a positive delta.
    let input_value = 1_234_567u64;
    let padding = wallet.zero_credentials().to_vec();
    let (request, validation) = wallet
        .create_request(&[input_value], padding, OsRng)
        .expect("input request builds");
    println!("input:      registering {} sat (delta {:+})", input_value, request.delta());
    let response = issuer
        .handle_request(&request.into(), OsRng)
        .expect("input request verifies");
    wallet
        .handle_response(&response, validation)
        .expect("input response verifies");
    println!("input:      wallet balance is {} sat", wallet.balance());

    // 4. Output decomposition: search the standard denominations for the
    //    best split of the balance, net of output fees at 2 sat/vbyte.
    let denominations = standard_denominations();
    let table =
        PossibleDecompositions::new(&denominations, 1_100_000, input_value, CREDENTIAL_NUMBER);
    let candidates = table.by_total_value(input_value, 1_100_000, 5_000, CREDENTIAL_NUMBER, 5, 2, 31);
    let decomposition = candidates.first().expect("a decomposition exists");
    println!(
        "decompose:  {:?} totalling {} sat, {} sat left for fees",
        decomposition.outputs(),
        decomposition.total(),
        input_value - decomposition.total()
    );

    // 5. Reissuance: swap the input credential for credentials matching the
    //    chosen outputs. The negative delta surrenders the fee remainder.
    let mut present = wallet.valuable_credentials().to_vec();
    present.extend_from_slice(wallet.zero_credentials());
    let amounts = decomposition.outputs().to_vec();
    let (request, validation) = wallet
        .create_request(&amounts, present, OsRng)
        .expect("reissuance request builds");
    println!("reissue:    delta {:+} sat", request.delta());
    let response = issuer
        .handle_request(&request.into(), OsRng)
        .expect("reissuance request verifies");
    wallet
        .handle_response(&response, validation)
        .expect("reissuance response verifies");
    println!(
        "reissue:    wallet now holds {} output-sized credentials",
        wallet.valuable_credentials().len()
    );

    // 6. Output registration: spend the credentials back to the coordinator,
    //    authorizing the outputs.
    let outputs: Vec<u64> = wallet
        .valuable_credentials()
        .iter()
        .map(|credential| credential.amount())
        .collect();
    let mut present = wallet.valuable_credentials().to_vec();
    present.extend_from_slice(wallet.zero_credentials());
    let (request, validation) = wallet
        .create_request(&[], present, OsRng)
        .expect("output request builds");
    println!("outputs:    registering {outputs:?} (delta {:+})", request.delta());
    let response = issuer
        .handle_request(&request.into(), OsRng)
        .expect("output request verifies");
    wallet
        .handle_response(&response, validation)
        .expect("output response verifies");
    println!("outputs:    wallet balance is {} sat, round complete", wallet.balance());
}
