//! Typed ID definitions.

use crate::define_id;

define_id!(
    /// Identifies one uploaded roster and the dashboard session built on it.
    UploadId,
    "upl"
);

define_id!(
    /// Correlates a single HTTP request with its log records and error body.
    RequestId,
    "req"
);

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_upload_id_roundtrip() {
        let id = UploadId::new();
        let parsed: UploadId = id.to_string().parse().unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn test_upload_id_prefix() {
        assert!(UploadId::new().to_string().starts_with("upl_"));
        assert!(RequestId::new().to_string().starts_with("req_"));
    }

    #[test]
    fn test_upload_id_rejects_request_id() {
        let raw = RequestId::new().to_string();
        let err = raw.parse::<UploadId>().unwrap_err();
        assert!(err.is_prefix_error());
    }

    #[test]
    fn test_upload_id_missing_separator() {
        let result: Result<UploadId, _> = "upl01HV4Z2WQXKJNM8GPQY6VBKC3D".parse();
        assert!(matches!(result, Err(crate::IdError::MissingSeparator)));
    }

    #[test]
    fn test_upload_id_empty() {
        let result: Result<UploadId, _> = "".parse();
        assert!(matches!(result, Err(crate::IdError::Empty)));
    }

    #[test]
    fn test_upload_id_invalid_ulid() {
        let result: Result<UploadId, _> = "upl_not-a-ulid".parse();
        assert!(matches!(result, Err(crate::IdError::InvalidUlid(_))));
    }

    #[test]
    fn test_upload_id_json_is_string() {
        let id = UploadId::new();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, format!("\"{id}\""));
        let parsed: UploadId = serde_json::from_str(&json).unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn test_upload_ids_sort_by_creation() {
        let first = UploadId::new();
        std::thread::sleep(std::time::Duration::from_millis(2));
        let second = UploadId::new();
        assert!(first < second);
        assert!(first.timestamp_ms() <= second.timestamp_ms());
    }

    proptest! {
        #[test]
        fn prop_parse_never_panics(input in ".*") {
            let _ = UploadId::parse(&input);
        }

        #[test]
        fn prop_from_ulid_roundtrips(bits in any::<u128>()) {
            let id = UploadId::from_ulid(crate::Ulid(bits));
            prop_assert_eq!(UploadId::parse(&id.to_string()).unwrap(), id);
        }
    }
}
