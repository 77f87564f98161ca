use serde::{Deserialize, Serialize};

/// A Data Plane configuration transaction.
///
/// Opened against a configuration version; every mutating call tagged
/// with its `id` is staged until the transaction is committed or closed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: String,
    #[serde(rename = "_version", default)]
    pub version: i64,
    #[serde(default)]
    pub status: TransactionStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionStatus {
    #[default]
    InProgress,
    Success,
    Failed,
    Outdated,
    #[serde(other)]
    Unknown,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decodes_open_transaction() {
        let txn: Transaction = serde_json::from_value(json!({
            "_version": 42,
            "id": "273e3385-2d0c-4fb1-aa27-93cbb31ff203",
            "status": "in_progress"
        }))
        .unwrap_or_else(|e| panic!("{e}"));

        assert_eq!(txn.version, 42);
        assert_eq!(txn.status, TransactionStatus::InProgress);
    }
}
