use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::Error;
use crate::sort::linear_assignment::validate_threshold;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssociationConfig {
    /// Minimum IoU for a solver-proposed pair to be kept as a match.
    pub iou_threshold: f32,
}

impl AssociationConfig {
    pub fn new() -> Self {
        Self {
            iou_threshold: 0.3,
        }
    }

    pub fn with_iou_threshold(mut self, iou_threshold: f32) -> Self {
        self.iou_threshold = iou_threshold;
        self
    }

    pub fn validate(&self) -> Result<(), Error> {
        validate_threshold(self.iou_threshold)
    }

    /// Parse and validate a JSON config; missing fields take their defaults.
    pub fn from_json_str(data: &str) -> Result<Self, Error> {
        let cfg: AssociationConfig = serde_json::from_str(data)?;
        cfg.validate()?;

        Ok(cfg)
    }

    /// Load from a JSON file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let data = fs::read_to_string(path)?;

        Self::from_json_str(&data)
    }
}

impl Default for AssociationConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let cfg = AssociationConfig::default();
        assert_eq!(cfg.iou_threshold, 0.3);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn json() -> anyhow::Result<()> {
        assert_eq!(AssociationConfig::from_json_str("{}")?, AssociationConfig::new());
        assert_eq!(
            AssociationConfig::from_json_str(r#"{"iou_threshold": 0.5}"#)?.iou_threshold,
            0.5
        );

        assert!(matches!(
            AssociationConfig::from_json_str(r#"{"iou_threshold": -1.0}"#),
            Err(Error::InvalidThreshold(_))
        ));
        assert!(matches!(
            AssociationConfig::from_json_str("not json"),
            Err(Error::Config(_))
        ));

        Ok(())
    }

    #[test]
    fn missing_file() {
        assert!(matches!(
            AssociationConfig::from_file("/nonexistent/association.json"),
            Err(Error::Io(_))
        ));
    }
}
