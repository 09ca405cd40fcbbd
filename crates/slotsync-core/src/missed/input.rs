use serde::Deserialize;

use crate::tabulate::quoted_u64;

/// Attestations missed around one slot (`missed_atts/<name>_<slot>.json`).
#[derive(Debug, Clone, Deserialize)]
pub struct MissedReport {
    /// Every validator that missed an attestation; a validator may appear more than once.
    pub all: Vec<ValidatorIndex>,
    pub per_attestation: Vec<MissedAttestation>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct ValidatorIndex(#[serde(deserialize_with = "quoted_u64")] pub u64);

#[derive(Debug, Clone, Deserialize)]
pub struct MissedAttestation {
    #[serde(deserialize_with = "quoted_u64")]
    pub subnet: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ignores_extra_attestation_fields() {
        let json = r#"{
            "all": [12, "40", 12],
            "per_attestation": [{"subnet": 3, "committee": [12]}, {"subnet": "7"}]
        }"#;
        let report: MissedReport = serde_json::from_str(json).unwrap();

        let all: Vec<u64> = report.all.iter().map(|v| v.0).collect();
        assert_eq!(all, vec![12, 40, 12]);
        let subnets: Vec<u64> = report.per_attestation.iter().map(|a| a.subnet).collect();
        assert_eq!(subnets, vec![3, 7]);
    }

    #[test]
    fn missing_list_is_rejected() {
        assert!(serde_json::from_str::<MissedReport>(r#"{"all": []}"#).is_err());
    }
}
