//! Response envelope used by the remote collaborators.
//!
//! Every remote call answers `{ "success": true, "data": ... }` or
//! `{ "success": false, "error": "..." }`.

use crate::error::{PlannerError, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub const fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn err(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }

    /// Unwrap the envelope.
    ///
    /// A failed call becomes [`PlannerError::Api`]; so does a successful
    /// call that carries no data.
    pub fn into_result(self) -> Result<T> {
        if self.success {
            self.data
                .ok_or_else(|| PlannerError::Api("response marked success but has no data".into()))
        } else {
            Err(PlannerError::Api(
                self.error.unwrap_or_else(|| "unknown error".to_string()),
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_envelope() {
        let resp: ApiResponse<Vec<u32>> =
            serde_json::from_str(r#"{"success": true, "data": [1, 2]}"#).unwrap();
        assert_eq!(resp.into_result().unwrap(), vec![1, 2]);
    }

    #[test]
    fn test_failure_envelope() {
        let resp: ApiResponse<Vec<u32>> =
            serde_json::from_str(r#"{"success": false, "error": "label not found"}"#).unwrap();
        let err = resp.into_result().unwrap_err();
        assert!(matches!(err, PlannerError::Api(ref m) if m == "label not found"));
    }

    #[test]
    fn test_success_without_data_is_an_error() {
        let resp: ApiResponse<u32> = serde_json::from_str(r#"{"success": true}"#).unwrap();
        assert!(resp.into_result().is_err());
        assert!(ApiResponse::<u32>::err("boom").into_result().is_err());
        assert_eq!(ApiResponse::ok(7).into_result().unwrap(), 7);
    }

    #[test]
    fn test_serialization_skips_absent_parts() {
        let json = serde_json::to_string(&ApiResponse::ok("x")).unwrap();
        assert_eq!(json, r#"{"success":true,"data":"x"}"#);
    }
}
