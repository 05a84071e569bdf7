use super::*;

#[test]
fn send_public_key_round_trips_kebab_case_fields() {
    let frame = DataChannelFrame::KeyExchange {
        action: KeyExchangeAction::SendPublicKey,
        public_key: Some("abc".into()),
        encrypted_aes_key: None,
    };
    let json = serde_json::to_value(&frame).unwrap();
    assert_eq!(json["type"], "key-exchange");
    assert_eq!(json["action"], "send-public-key");
    assert_eq!(json["public-key"], "abc");
    assert!(json.get("encrypted-aes-key").is_none());

    let round_tripped: DataChannelFrame = serde_json::from_value(json).unwrap();
    matches!(round_tripped, DataChannelFrame::KeyExchange { action: KeyExchangeAction::SendPublicKey, .. });
}

#[test]
fn encrypted_task_uses_encrypted_data_field_name() {
    let frame = DataChannelFrame::EncryptedTask { encrypted_data: "cipher".into() };
    let json = serde_json::to_value(&frame).unwrap();
    assert_eq!(json["type"], "encrypted-task");
    assert_eq!(json["encrypted-data"], "cipher");
}
