//! Wire encodings

use crate::error::{Result, SyncError};
use crate::message::{Envelope, PROTOCOL_VERSION};
use serde::{Deserialize, Serialize};

/// Envelope encoding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WireFormat {
    /// JSON (readable, shared with other implementations)
    #[default]
    Json,
    /// bincode (compact)
    Binary,
}

/// Leading fields read before the full decode
#[derive(Deserialize)]
struct VersionProbe {
    version: u32,
}

impl WireFormat {
    /// Encode an envelope
    pub fn encode(self, envelope: &Envelope) -> Result<Vec<u8>> {
        match self {
            Self::Json => serde_json::to_vec(envelope).map_err(|e| SyncError::Serialization(e.to_string())),
            Self::Binary => bincode::serialize(envelope).map_err(|e| SyncError::Serialization(e.to_string())),
        }
    }

    /// Decode an envelope, rejecting other protocol versions before the body
    /// is interpreted
    pub fn decode(self, bytes: &[u8]) -> Result<Envelope> {
        let found = self.probe_version(bytes)?;
        if found != PROTOCOL_VERSION {
            return Err(SyncError::VersionMismatch {
                expected: PROTOCOL_VERSION,
                found,
            });
        }

        match self {
            Self::Json => serde_json::from_slice(bytes).map_err(|e| SyncError::Deserialization(e.to_string())),
            Self::Binary => bincode::deserialize(bytes).map_err(|e| SyncError::Deserialization(e.to_string())),
        }
    }

    fn probe_version(self, bytes: &[u8]) -> Result<u32> {
        match self {
            Self::Json => serde_json::from_slice::<VersionProbe>(bytes)
                .map(|probe| probe.version)
                .map_err(|e| SyncError::Deserialization(e.to_string())),
            // version is the first field; bincode tolerates the trailing body
            Self::Binary => bincode::deserialize::<u32>(bytes).map_err(|e| SyncError::Deserialization(e.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::{SyncMessage, ToolKind};
    use outpost_combat::WeaponKind;
    use outpost_core::PlayerId;

    fn equipment() -> Envelope {
        Envelope::new(
            7,
            SyncMessage::Equipment {
                player: PlayerId(3),
                weapon: WeaponKind::Scatter,
                tool: Some(ToolKind::Hammer),
            },
        )
    }

    #[test]
    fn test_json_layout_is_stable() {
        let bytes = WireFormat::Json.encode(&equipment()).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&bytes).unwrap();

        assert_eq!(value["version"], 1);
        assert_eq!(value["sequence"], 7);
        assert_eq!(value["message"]["equipment"]["weapon"], "scatter");
        assert_eq!(value["message"]["equipment"]["tool"], "hammer");
    }

    #[test]
    fn test_binary_decode() {
        let envelope = equipment();
        let bytes = WireFormat::Binary.encode(&envelope).unwrap();
        assert_eq!(WireFormat::Binary.decode(&bytes).unwrap(), envelope);
    }

    #[test]
    fn test_version_mismatch() {
        let mut envelope = equipment();
        envelope.version = PROTOCOL_VERSION + 1;

        for format in [WireFormat::Json, WireFormat::Binary] {
            let bytes = format.encode(&envelope).unwrap();
            assert!(matches!(
                format.decode(&bytes),
                Err(SyncError::VersionMismatch { found, .. }) if found == PROTOCOL_VERSION + 1
            ));
        }
    }

    #[test]
    fn test_unknown_tag_rejected() {
        let text = r#"{"version":1,"sequence":1,"message":{"teleport":{"player":1}}}"#;
        assert!(matches!(
            WireFormat::Json.decode(text.as_bytes()),
            Err(SyncError::Deserialization(_))
        ));
    }

    #[test]
    fn test_truncated_binary_rejected() {
        let bytes = WireFormat::Binary.encode(&equipment()).unwrap();
        assert!(WireFormat::Binary.decode(&bytes[..bytes.len() - 3]).is_err());
    }
}
