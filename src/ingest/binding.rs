use crate::types::{KeyKind, KeySchema};

use serde::Deserialize;

pub const SORT_ATTRIBUTE: &str = "range_start_time";

/// The feature type a granule's records describe, recognizable from the
/// marker embedded in its path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeatureKind {
    Reach,
    Node,
    Lake,
}

impl FeatureKind {
    pub const ALL: [FeatureKind; 3] = [FeatureKind::Reach, FeatureKind::Node, FeatureKind::Lake];

    /// The attribute carrying the feature identifier, used as the
    /// partition key.
    pub fn id_attribute(&self) -> &'static str {
        match self {
            Self::Reach => "reach_id",
            Self::Node => "node_id",
            Self::Lake => "lake_id",
        }
    }

    /// The path substring identifying a granule of this feature type.
    pub fn marker(&self) -> &'static str {
        match self {
            Self::Reach => "Reach",
            Self::Node => "Node",
            Self::Lake => "LakeSP_Obs",
        }
    }

    /// The discovery service's collection short name for this feature.
    pub fn collection(&self) -> &'static str {
        match self {
            Self::Reach | Self::Node => "L2_HR_RiverSP",
            Self::Lake => "L2_HR_LakeSP",
        }
    }

    pub(crate) fn of_path(path: &str) -> Option<FeatureKind> {
        Self::ALL.into_iter().find(|kind| path.contains(kind.marker()))
    }
}

/// Binds a logical table name to the feature type it ingests.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TableBinding {
    pub table_name: String,
    pub feature: FeatureKind,
}

impl TableBinding {
    pub fn new<N: Into<String>>(table_name: N, feature: FeatureKind) -> Self {
        Self {
            table_name: table_name.into(),
            feature,
        }
    }

    /// The fixed key schema for feature tables: partition on the feature
    /// id, sort on the observation's range start time, both string-kind.
    pub fn key_schema(&self) -> KeySchema {
        KeySchema::new(
            self.feature.id_attribute(),
            KeyKind::String,
            SORT_ATTRIBUTE,
            KeyKind::String,
        )
    }
}
