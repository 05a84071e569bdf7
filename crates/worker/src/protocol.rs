//! Wire frames for the direct client-worker data channel, once signaling
//! has handed a session off to it. See the secure-channel bootstrap: the
//! client always speaks first.

use serde::{Deserialize, Serialize};

pub const TASK_AAD: &[u8] = b"encrypted-task";
pub const RESULT_AAD: &[u8] = b"encrypted-result";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum DataChannelFrame {
    KeyExchange {
        action: KeyExchangeAction,
        #[serde(default, skip_serializing_if = "Option::is_none", rename = "public-key")]
        public_key: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none", rename = "encrypted-aes-key")]
        encrypted_aes_key: Option<String>,
    },
    EncryptedTask {
        #[serde(rename = "encrypted-data")]
        encrypted_data: String,
    },
    EncryptedResult {
        #[serde(rename = "encrypted-data")]
        encrypted_data: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum KeyExchangeAction {
    SendPublicKey,
    SendAesKey,
    AesKeyReceived,
}

#[cfg(test)]
#[path = "protocol_tests.rs"]
mod tests;
