use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractedReading {
    pub all: String,
    pub saturation: i32,
    pub heart_rate: i32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reading_serializes_heart_rate_in_camel_case() {
        let reading = ExtractedReading {
            all: "SpO2 98 HR 72".to_string(),
            saturation: 98,
            heart_rate: 72,
        };

        let serialized = serde_json::to_value(&reading).unwrap();

        assert_eq!(serialized["heartRate"], 72);
        assert_eq!(serialized["saturation"], 98);
        assert_eq!(serialized["all"], "SpO2 98 HR 72");
    }
}
