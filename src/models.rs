//! Data models for the tree-inventory API.
//!
//! Field names match the backend's JSON wire format.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::BoomkaartError;

/// A tree record as returned by `GET /trees`.
#[derive(Debug, Clone, Deserialize)]
pub struct Tree {
    /// Server-assigned identifier, immutable once created
    pub id: i64,

    /// Display name
    pub name: Option<String>,

    /// Free-form description
    pub description: Option<String>,

    /// Latitude in decimal degrees
    pub latitude: f64,

    /// Longitude in decimal degrees
    pub longitude: f64,

    /// Height in meters
    pub height: Option<f64>,

    /// Trunk diameter in centimeters
    pub diameter: Option<f64>,

    /// Server-assigned creation timestamp
    pub added_at: Option<DateTime<Utc>>,
}

impl Tree {
    /// Validate the record against the geographic and biometric invariants.
    pub fn validate(&self) -> Result<(), BoomkaartError> {
        if self.latitude < -90.0 || self.latitude > 90.0 {
            return Err(BoomkaartError::Validation(format!(
                "latitude {} out of range [-90, 90]",
                self.latitude
            )));
        }
        if self.longitude < -180.0 || self.longitude > 180.0 {
            return Err(BoomkaartError::Validation(format!(
                "longitude {} out of range [-180, 180]",
                self.longitude
            )));
        }
        if let Some(h) = self.height {
            if h < 0.0 {
                return Err(BoomkaartError::Validation(format!("negative height {h}")));
            }
        }
        if let Some(d) = self.diameter {
            if d < 0.0 {
                return Err(BoomkaartError::Validation(format!("negative diameter {d}")));
            }
        }
        Ok(())
    }
}

/// Body for `POST /trees`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewTree {
    pub name: String,
    pub description: String,
    pub latitude: f64,
    pub longitude: f64,
}

/// Body for `PUT /trees/{id}`. Only the biometric fields are mutable.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct TreeUpdate {
    pub height: Option<f64>,
    pub diameter: Option<f64>,
}

/// Response envelope from `POST /login`.
#[derive(Debug, Deserialize)]
pub struct LoginResponse {
    pub data: LoginData,
}

#[derive(Debug, Deserialize)]
pub struct LoginData {
    pub access_token: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_tree() -> Tree {
        Tree {
            id: 1,
            name: Some("Oak".into()),
            description: Some("d".into()),
            latitude: 50.95306,
            longitude: 5.352692,
            height: Some(12.5),
            diameter: Some(40.0),
            added_at: None,
        }
    }

    #[test]
    fn test_parse_tree_list() {
        let json = r#"[
            {"id": 1, "name": "Oak", "description": "d",
             "latitude": 50.95306, "longitude": 5.352692,
             "height": 12.5, "diameter": 40.0,
             "added_at": "2024-11-04T09:30:00Z"},
            {"id": 2, "name": null, "description": null,
             "latitude": 50.9531, "longitude": 5.3527,
             "height": null, "diameter": null, "added_at": null}
        ]"#;

        let trees: Vec<Tree> = serde_json::from_str(json).expect("failed to parse tree list");
        assert_eq!(trees.len(), 2);
        assert_eq!(trees[0].name.as_deref(), Some("Oak"));
        assert!(trees[0].added_at.is_some());
        assert!(trees[1].height.is_none());

        for tree in &trees {
            tree.validate().expect("invalid tree");
        }
    }

    #[test]
    fn test_validate_rejects_bad_latitude() {
        let mut tree = sample_tree();
        tree.latitude = 95.0;
        assert!(tree.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_negative_height() {
        let mut tree = sample_tree();
        tree.height = Some(-1.0);
        assert!(tree.validate().is_err());
    }

    #[test]
    fn test_parse_login_response() {
        let json = r#"{"success": true, "message": "ok", "data": {"access_token": "abc123"}}"#;
        let resp: LoginResponse = serde_json::from_str(json).expect("failed to parse login");
        assert_eq!(resp.data.access_token, "abc123");
    }
}
