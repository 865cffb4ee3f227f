use serde::{Deserialize, Serialize};

/// One axis of the RFM segmentation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RfmDimension {
    Recency,
    Frequency,
    Monetary,
}

impl RfmDimension {
    pub const ALL: [RfmDimension; 3] = [
        RfmDimension::Recency,
        RfmDimension::Frequency,
        RfmDimension::Monetary,
    ];

    /// Returns true when a larger value ranks a customer higher.
    /// Recency is measured in days since the last purchase, so smaller is better.
    pub fn higher_is_better(&self) -> bool {
        match self {
            RfmDimension::Recency => false,
            RfmDimension::Frequency | RfmDimension::Monetary => true,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            RfmDimension::Recency => "By Recency (days)",
            RfmDimension::Frequency => "By Frequency",
            RfmDimension::Monetary => "By Monetary",
        }
    }
}
