use serde::{Deserialize, Serialize};

pub mod drawing;

// ===== MESSAGE TYPES =====

// The moon backend only serves the frontend bundle; the math, history and
// user APIs are external REST services. These messages exist for the
// framework's connection plumbing and dev tooling.

#[derive(Serialize, Deserialize, Debug)]
pub enum UpMsg {
    Ping,
}

#[derive(Serialize, Deserialize, Debug)]
pub enum DownMsg {
    Pong,
}

// ===== EVALUATION API =====

/// One evaluation call covers a single expression and the x-sub-ranges the
/// frontend is still missing for it. Ranges of different expressions are
/// never batched together.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct EvaluationRequest {
    pub expression: String,
    pub ranges: Vec<EvaluationRange>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct EvaluationRange {
    pub from: f64,
    pub to: f64,
    /// Sampling hint in world units, derived from the current pixel density.
    pub step: f64,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct EvaluationResponse {
    pub results: Vec<RangeResult>,
}

/// Outcome for one requested sub-range. `output` holds the algebra system's
/// textual drawing payload; `error` is set instead when that sub-range failed.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct RangeResult {
    pub from: f64,
    pub to: f64,
    #[serde(default)]
    pub output: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

// ===== HISTORY API =====

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct HistorySnapshot {
    pub id: u64,
    pub created_at: String,
    pub expressions: Vec<SnapshotExpression>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct SnapshotExpression {
    pub text: String,
    pub color: String,
}

/// Body of `POST /api/v1/math/history`; the service assigns id and timestamp.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct NewSnapshot {
    pub expressions: Vec<SnapshotExpression>,
}

// ===== USER API =====

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct UserProfile {
    pub username: String,
    #[serde(default)]
    pub email: Option<String>,
}

// ===== AUTH TYPES =====

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub token_type: Option<String>,
    #[serde(default)]
    pub expires_in: Option<u64>,
}

// ===== UI TYPES =====

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn range_result_tolerates_missing_fields() {
        let parsed: RangeResult = serde_json::from_str(r#"{"from":-1.0,"to":1.0}"#).unwrap();
        assert_eq!(parsed.output, None);
        assert_eq!(parsed.error, None);
    }

    #[test]
    fn snapshot_round_trip_keeps_expression_order() {
        let snapshot = HistorySnapshot {
            id: 7,
            created_at: "2024-11-02T10:00:00Z".to_string(),
            expressions: vec![
                SnapshotExpression {
                    text: "sin(x)".to_string(),
                    color: "#4fc3f7".to_string(),
                },
                SnapshotExpression {
                    text: "x^2".to_string(),
                    color: "#ff8a65".to_string(),
                },
            ],
        };
        let json = serde_json::to_string(&snapshot).unwrap();
        let back: HistorySnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(back, snapshot);
    }

    #[test]
    fn profile_email_is_optional() {
        let parsed: UserProfile = serde_json::from_str(r#"{"username":"ada"}"#).unwrap();
        assert_eq!(parsed.username, "ada");
        assert_eq!(parsed.email, None);
    }
}
