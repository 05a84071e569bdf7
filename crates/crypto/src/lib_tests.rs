use super::*;
use proptest::prelude::*;

fn bootstrap() -> (SecureChannel, SecureChannel) {
    let mut client = SecureChannel::new();
    let mut worker = SecureChannel::new();

    // 1. client sends its public key
    let client_pub = client.local_public_key_base64().unwrap();
    worker.receive_public_key(&client_pub).unwrap();

    // 2. worker replies with its own public key
    let worker_pub = worker.local_public_key_base64().unwrap();
    client.receive_public_key(&worker_pub).unwrap();

    // 3. client wraps a fresh AES key under the worker's public key
    let wrapped = client.generate_and_wrap_key().unwrap();

    // 4. worker unwraps it
    worker.unwrap_key(&wrapped).unwrap();

    (client, worker)
}

#[test]
fn bootstrap_reaches_symmetric_key_established_on_both_sides() {
    let (client, worker) = bootstrap();
    assert_eq!(client.state(), ChannelState::SymmetricKeyEstablished);
    assert_eq!(worker.state(), ChannelState::SymmetricKeyEstablished);
}

#[test]
fn state_is_none_before_any_exchange() {
    let channel = SecureChannel::new();
    assert_eq!(channel.state(), ChannelState::None);
}

#[test]
fn state_advances_to_remote_pubkey_known_after_receiving_peer_key() {
    let mut client = SecureChannel::new();
    let mut worker = SecureChannel::new();
    let worker_pub = worker.local_public_key_base64().unwrap();
    client.receive_public_key(&worker_pub).unwrap();
    assert_eq!(client.state(), ChannelState::RemotePubkeyKnown);
}

#[test]
fn encrypt_then_decrypt_round_trips() {
    let (client, worker) = bootstrap();
    let plaintext = b"print('hello')\n";
    let frame = client.encrypt(plaintext, b"encrypted-task").unwrap();
    let recovered = worker.decrypt(&frame, b"encrypted-task").unwrap();
    assert_eq!(recovered, plaintext);
}

#[test]
fn tampered_ciphertext_fails_to_decrypt() {
    let (client, worker) = bootstrap();
    let mut frame = client.encrypt(b"payload", b"encrypted-task").unwrap();
    // Flip the last base64 character to corrupt the tag.
    let last = frame.pop().unwrap();
    frame.push(if last == 'A' { 'B' } else { 'A' });
    let result = worker.decrypt(&frame, b"encrypted-task");
    assert!(matches!(result, Err(CryptoError::DecryptionFailed)));
}

#[test]
fn wrong_associated_data_fails_to_decrypt() {
    let (client, worker) = bootstrap();
    let frame = client.encrypt(b"payload", b"encrypted-task").unwrap();
    let result = worker.decrypt(&frame, b"encrypted-result");
    assert!(matches!(result, Err(CryptoError::DecryptionFailed)));
}

#[test]
fn encrypt_before_key_established_fails() {
    let channel = SecureChannel::new();
    let result = channel.encrypt(b"too early", b"encrypted-task");
    assert!(matches!(result, Err(CryptoError::NotEstablished)));
}

proptest! {
    #[test]
    fn round_trip_holds_for_arbitrary_plaintext(data in proptest::collection::vec(any::<u8>(), 0..2048)) {
        let (client, worker) = bootstrap();
        let frame = client.encrypt(&data, b"encrypted-task").unwrap();
        let recovered = worker.decrypt(&frame, b"encrypted-task").unwrap();
        prop_assert_eq!(recovered, data);
    }
}
