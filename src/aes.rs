use crate::data::PlotData;
use crate::error::{Error, Result};
use std::collections::BTreeMap;

/// Aesthetic mapping from visual channels (x, y, size, fill, ...) to data
/// column names. A channel that is absent inherits from the base mapping
/// when layers are resolved.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Aes {
    channels: BTreeMap<String, String>,
}

/// Start an aesthetic mapping. The x and y channels are the positional
/// aesthetics every geom reads first.
///
/// ```
/// use fuplot::aes;
/// let mapping = aes().x("Date").y("Adj Close");
/// ```
pub fn aes() -> Aes {
    Aes::default()
}

impl Aes {
    /// Map the x channel to a column.
    pub fn x(self, column: &str) -> Self {
        self.map("x", column)
    }

    /// Map the y channel to a column.
    pub fn y(self, column: &str) -> Self {
        self.map("y", column)
    }

    /// Map an arbitrary channel (e.g. "size") to a column.
    pub fn map(mut self, channel: &str, column: &str) -> Self {
        self.channels.insert(channel.to_string(), column.to_string());
        self
    }

    /// Column mapped to a channel, if any.
    pub fn get(&self, channel: &str) -> Option<&str> {
        self.channels.get(channel).map(String::as_str)
    }

    /// All (channel, column) pairs in channel-name order.
    pub fn channels(&self) -> impl Iterator<Item = (&str, &str)> {
        self.channels.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }

    /// Resolve this layer mapping against a base mapping: entries present
    /// here override, absent channels inherit from the base.
    pub fn merged_over(&self, base: &Aes) -> Aes {
        let mut merged = base.clone();
        for (channel, column) in &self.channels {
            merged.channels.insert(channel.clone(), column.clone());
        }
        merged
    }

    /// Check that every mapped column exists in the data.
    pub fn validate(&self, data: &PlotData) -> Result<()> {
        for (channel, column) in &self.channels {
            if !data.has_column(column) {
                return Err(Error::InvalidMapping {
                    channel: channel.clone(),
                    column: column.clone(),
                });
            }
        }
        Ok(())
    }
}
