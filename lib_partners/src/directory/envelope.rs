//! Navigation of the upstream listing envelope:
//! `{ total, results: { assets: [ { contentJson: { <Wrapper>: { <Record>: {..} } } } ] } }`.

use super::models::DirectoryRecord;
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TotalError {
    #[error("envelope has no `total` field")]
    Missing,

    #[error("envelope `total` is not a non-negative integer: {0}")]
    Invalid(String),
}

/// Reads the authoritative record count. Upstream sends it as a string; plain
/// numbers are accepted too.
pub fn parse_total(envelope: &Value) -> Result<u64, TotalError> {
    match envelope.get("total") {
        None | Some(Value::Null) => Err(TotalError::Missing),
        Some(Value::Number(n)) => n.as_u64().ok_or_else(|| TotalError::Invalid(n.to_string())),
        Some(Value::String(s)) => s
            .trim()
            .parse::<u64>()
            .map_err(|_| TotalError::Invalid(s.clone())),
        Some(other) => Err(TotalError::Invalid(other.to_string())),
    }
}

/// Extracts every structurally complete record from an envelope.
///
/// Assets whose nested objects are missing at any level, or whose record object
/// does not deserialize, are dropped. A missing `results`/`assets` yields nothing.
pub fn extract_records<R: DirectoryRecord>(envelope: &Value) -> Vec<R> {
    let Some(assets) = envelope
        .get("results")
        .and_then(|results| results.get("assets"))
        .and_then(Value::as_array)
    else {
        return Vec::new();
    };

    assets
        .iter()
        .filter_map(|asset| {
            asset
                .get("contentJson")?
                .get(R::WRAPPER_KEY)?
                .get(R::RECORD_KEY)
                .filter(|record| record.is_object())
        })
        .filter_map(|record| R::deserialize(record).ok())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::directory::{RawPartner, RawSolution};
    use serde_json::json;

    #[test]
    fn total_accepts_strings_and_numbers() {
        assert_eq!(parse_total(&json!({"total": "563"})), Ok(563));
        assert_eq!(parse_total(&json!({"total": " 12 "})), Ok(12));
        assert_eq!(parse_total(&json!({"total": 7})), Ok(7));
        assert_eq!(parse_total(&json!({"total": "0"})), Ok(0));
    }

    #[test]
    fn total_rejects_missing_and_garbage() {
        assert_eq!(parse_total(&json!({})), Err(TotalError::Missing));
        assert_eq!(parse_total(&json!({"total": null})), Err(TotalError::Missing));
        assert!(matches!(
            parse_total(&json!({"total": "lots"})),
            Err(TotalError::Invalid(_))
        ));
        assert!(matches!(
            parse_total(&json!({"total": -3})),
            Err(TotalError::Invalid(_))
        ));
        assert!(matches!(
            parse_total(&json!({"total": [1]})),
            Err(TotalError::Invalid(_))
        ));
    }

    #[test]
    fn extracts_partners_and_skips_incomplete_assets() {
        let envelope = json!({
            "total": "5",
            "results": {"assets": [
                {"contentJson": {"Partners": {"Partner": {"Id": "1", "Name": "Acme"}}}},
                {"contentJson": {"Partners": {}}},
                {"contentJson": {}},
                {"metadata": {"x": 1}},
                {"contentJson": {"Partners": {"Partner": "not an object"}}},
                {"contentJson": {"Partners": {"Partner": {"Id": "2", "Name": "Globex"}}}}
            ]}
        });

        let partners: Vec<RawPartner> = extract_records(&envelope);
        let names: Vec<_> = partners.iter().filter_map(|p| p.name.as_deref()).collect();
        assert_eq!(names, vec!["Acme", "Globex"]);
    }

    #[test]
    fn extracts_solutions_with_their_own_keys() {
        let envelope = json!({
            "results": {"assets": [
                {"contentJson": {"Solutions": {"Solution": {
                    "solutionpartnername": "Acme",
                    "solutiondisplayname": "Capture"
                }}}},
                {"contentJson": {"Partners": {"Partner": {"Name": "wrong listing"}}}}
            ]}
        });

        let solutions: Vec<RawSolution> = extract_records(&envelope);
        assert_eq!(solutions.len(), 1);
        assert_eq!(solutions[0].display_name.as_deref(), Some("Capture"));
    }

    #[test]
    fn missing_results_yield_nothing() {
        assert!(extract_records::<RawPartner>(&json!({"total": "3"})).is_empty());
        assert!(extract_records::<RawPartner>(&json!({"results": {"assets": {}}})).is_empty());
    }
}
