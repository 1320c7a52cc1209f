// /////////////////////////////////////////////////////////////////////////////
// Animus
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Dataset aggregate: a Dataset together with its DatasetVersions, carrying
//! the dense-ordinal invariant the store enforces under concurrency.

use crate::entities::{Dataset, DatasetVersion};
use crate::value_objects::Ordinal;
use crate::GovernanceError;

pub struct DatasetAggregate {
    dataset: Dataset,
    versions: Vec<DatasetVersion>,
}

impl DatasetAggregate {
    pub fn new(dataset: Dataset, versions: Vec<DatasetVersion>) -> Self {
        Self { dataset, versions }
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn versions(&self) -> &[DatasetVersion] {
        &self.versions
    }

    /// The ordinal the next uploaded version must receive:
    /// `COALESCE(MAX(ordinal), 0) + 1`.
    pub fn next_ordinal(&self) -> Ordinal {
        self.versions.iter().map(|v| v.ordinal().value()).max().map(|m| Ordinal::new(m + 1).unwrap()).unwrap_or(Ordinal::FIRST)
    }

    /// Verifies the testable-properties invariant: ordinals form `{1..N}`
    /// with no gaps.
    pub fn verify_dense_ordinals(&self) -> Result<(), GovernanceError> {
        let mut observed: Vec<u32> = self.versions.iter().map(|v| v.ordinal().value()).collect();
        observed.sort_unstable();
        for (index, ordinal) in observed.iter().enumerate() {
            if *ordinal != (index as u32) + 1 {
                return Err(GovernanceError::invalid(format!(
                    "ordinal sequence has a gap or duplicate: expected {}, found {}",
                    index + 1,
                    ordinal
                )));
            }
        }
        Ok(())
    }

    /// Whether `content_sha256` already exists among this dataset's
    /// versions — a re-upload of identical content is a duplicate, not a
    /// new version.
    pub fn has_content(&self, content_sha256: &crate::value_objects::Sha256Hex) -> bool {
        self.versions.iter().any(|v| v.content_sha256() == content_sha256)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value_objects::{DatasetId, DatasetVersionId, ProjectId, Sha256Hex};
    use chrono::Utc;
    use serde_json::json;

    fn version(dataset_id: &DatasetId, project_id: &ProjectId, ordinal: u32, content: &[u8]) -> DatasetVersion {
        DatasetVersion::create(
            DatasetVersionId::new(),
            project_id.clone(),
            dataset_id.clone(),
            None,
            Ordinal::new(ordinal).unwrap(),
            Sha256Hex::of(content),
            format!("{dataset_id}/v{ordinal}"),
            content.len() as i64,
            json!({}),
            "alice".into(),
            Utc::now(),
        )
        .unwrap()
    }

    #[test]
    fn next_ordinal_starts_at_one() {
        let project_id = ProjectId::new();
        let dataset_id = DatasetId::new();
        let dataset = Dataset::create(dataset_id.clone(), project_id, "ds".into(), None, json!({}), "alice".into(), Utc::now()).unwrap();
        let agg = DatasetAggregate::new(dataset, vec![]);
        assert_eq!(agg.next_ordinal(), Ordinal::FIRST);
    }

    #[test]
    fn detects_ordinal_gap() {
        let project_id = ProjectId::new();
        let dataset_id = DatasetId::new();
        let dataset = Dataset::create(dataset_id.clone(), project_id.clone(), "ds".into(), None, json!({}), "alice".into(), Utc::now()).unwrap();
        let versions = vec![version(&dataset_id, &project_id, 1, b"a"), version(&dataset_id, &project_id, 3, b"b")];
        let agg = DatasetAggregate::new(dataset, versions);
        assert!(agg.verify_dense_ordinals().is_err());
    }
}
