use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Categorical traffic-density label attached to one geometry segment of a
/// route leg. Serialised in lowercase, matching the annotation values a
/// directions service emits; anything unrecognised folds into `Unknown`.
#[derive(
    Clone, Copy, Debug, Default, Eq, PartialEq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Congestion {
    Low,
    Moderate,
    Heavy,
    Severe,
    #[default]
    #[serde(other)]
    Unknown,
}

#[cfg(test)]
mod tests {
    use super::Congestion;
    use std::str::FromStr;

    #[test]
    fn parses_lowercase_labels() {
        assert_eq!(Congestion::from_str("severe"), Ok(Congestion::Severe));
        assert_eq!(Congestion::from_str("moderate"), Ok(Congestion::Moderate));
        assert!(Congestion::from_str("gridlock").is_err());
    }

    #[test]
    fn unknown_catches_unrecognised_annotations() {
        let parsed: Vec<Congestion> =
            serde_json::from_str(r#"["low", "heavy", "gridlock"]"#).expect("deserialises");
        assert_eq!(
            parsed,
            vec![Congestion::Low, Congestion::Heavy, Congestion::Unknown]
        );
    }

    #[test]
    fn displays_lowercase() {
        assert_eq!(Congestion::Severe.to_string(), "severe");
        assert_eq!(Congestion::Unknown.to_string(), "unknown");
    }
}
