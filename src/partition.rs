//! Output partition descriptors.
//!
//! A descriptor such as `"ds=2024-01-01, region = eu"` names the partition
//! columns of an output table. Whitespace around tokens and empty segments
//! are ignored; a repeated key keeps its last value.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::error::DecodeError;

/// Partition column name to partition value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct PartitionSpec {
    values: BTreeMap<String, String>,
}

impl PartitionSpec {
    /// Value for a partition column.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// Number of partition columns.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns true when no partition columns are set.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterates columns in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> + '_ {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl FromIterator<(String, String)> for PartitionSpec {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}

impl fmt::Display for PartitionSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, (key, value)) in self.values.iter().enumerate() {
            if idx > 0 {
                f.write_str(",")?;
            }
            write!(f, "{key}={value}")?;
        }
        Ok(())
    }
}

impl FromStr for PartitionSpec {
    type Err = DecodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_descriptor(s)
    }
}

/// Parses an optional partition descriptor.
///
/// An absent descriptor yields `Ok(None)`; an empty one yields an empty spec.
/// The first segment that is not exactly one `key=value` pair fails the whole
/// parse, scanning left to right.
pub fn parse_partition_values(
    descriptor: Option<&str>,
) -> Result<Option<PartitionSpec>, DecodeError> {
    descriptor.map(parse_descriptor).transpose()
}

fn parse_descriptor(descriptor: &str) -> Result<PartitionSpec, DecodeError> {
    let mut values = BTreeMap::new();
    let segments = descriptor
        .split(',')
        .map(str::trim)
        .filter(|segment| !segment.is_empty());
    for segment in segments {
        let mut tokens = segment
            .split('=')
            .map(str::trim)
            .filter(|token| !token.is_empty());
        match (tokens.next(), tokens.next(), tokens.next()) {
            (Some(key), Some(value), None) => {
                values.insert(key.to_owned(), value.to_owned());
            }
            _ => {
                return Err(DecodeError::MalformedPartitionSegment {
                    descriptor: descriptor.to_owned(),
                    segment: segment.to_owned(),
                })
            }
        }
    }
    Ok(PartitionSpec { values })
}
