use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, de};
use serde_json::Value;

/// Per-block reward statistics (`block_stats/block_<slot>.json`).
#[derive(Debug, Clone, Deserialize)]
pub struct BlockStats {
    pub graffiti: String,
    /// Total proposer reward for the block.
    pub total: u64,
    /// One map per included attestation: validator index → reward.
    pub per_attestation_rewards: Vec<BTreeMap<String, u64>>,
    pub prev_epoch_rewards: Value,
    pub curr_epoch_rewards: Value,
}

impl BlockStats {
    /// Validators rewarded in either epoch.
    pub fn validators_covered(&self) -> usize {
        collection_len(&self.prev_epoch_rewards) + collection_len(&self.curr_epoch_rewards)
    }
}

fn collection_len(v: &Value) -> usize {
    match v {
        Value::Object(map) => map.len(),
        Value::Array(items) => items.len(),
        _ => 0,
    }
}

/// Beacon API block response (`blocks/block_<slot>.json`), reduced to attestation slots.
#[derive(Debug, Clone, Deserialize)]
pub struct BlockResponse {
    pub data: SignedBlock,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SignedBlock {
    pub message: BeaconBlock,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BeaconBlock {
    pub body: BlockBody,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BlockBody {
    #[serde(default)]
    pub attestations: Vec<Attestation>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Attestation {
    pub data: AttestationData,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AttestationData {
    #[serde(deserialize_with = "quoted_u64")]
    pub slot: u64,
}

impl BlockResponse {
    pub fn attestations(&self) -> &[Attestation] {
        &self.data.message.body.attestations
    }
}

// The beacon API quotes integers; hand-written fixtures often do not.
pub(crate) fn quoted_u64<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Num(u64),
        Str(String),
    }

    match Raw::deserialize(deserializer)? {
        Raw::Num(n) => Ok(n),
        Raw::Str(s) => s.trim().parse().map_err(de::Error::custom),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attestation_slot_accepts_quoted_and_plain() {
        let json = r#"{"data":{"message":{"body":{"attestations":[
            {"data":{"slot":"41"}},
            {"data":{"slot":40}}
        ]}}}}"#;
        let block: BlockResponse = serde_json::from_str(json).unwrap();
        let slots: Vec<u64> = block.attestations().iter().map(|a| a.data.slot).collect();
        assert_eq!(slots, vec![41, 40]);
    }

    #[test]
    fn attestation_slot_rejects_garbage() {
        let json = r#"{"data":{"message":{"body":{"attestations":[{"data":{"slot":"soon"}}]}}}}"#;
        assert!(serde_json::from_str::<BlockResponse>(json).is_err());
    }

    #[test]
    fn validators_covered_counts_both_epochs() {
        let json = r#"{
            "graffiti": "lh",
            "total": 10,
            "per_attestation_rewards": [],
            "prev_epoch_rewards": {"1": 2, "3": 4},
            "curr_epoch_rewards": {"5": 6}
        }"#;
        let stats: BlockStats = serde_json::from_str(json).unwrap();
        assert_eq!(stats.validators_covered(), 3);
    }
}
