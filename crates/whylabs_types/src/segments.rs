use crate::error::TypeError;
use crate::util::{check_length, check_max_items};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash)]
pub struct SegmentTag {
    pub key: String,
    pub value: String,
}

/// A segment is a list of tags, normalized server side
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Segment {
    pub tags: Vec<SegmentTag>,
}

impl Segment {
    pub fn new(tags: Vec<(String, String)>) -> Self {
        Segment {
            tags: tags
                .into_iter()
                .map(|(key, value)| SegmentTag { key, value })
                .collect(),
        }
    }

    pub fn validate(&self) -> Result<(), TypeError> {
        check_max_items("segment.tags", &self.tags, 10)?;
        for tag in &self.tags {
            check_length("segment.tags.key", &tag.key, 0, 1000)?;
            check_length("segment.tags.value", &tag.value, 0, 1000)?;
        }
        Ok(())
    }
}
