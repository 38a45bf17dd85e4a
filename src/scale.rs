use crate::aes::Aes;
use crate::data::PlotData;
use crate::error::Result;
use std::collections::BTreeMap;

/// Linearly rescale values from a source range into a destination range.
///
/// With `source` as `None` the values' own min/max is used. A zero-width
/// source range maps every value to the midpoint of `dest` (a flat column
/// still renders instead of dividing by zero).
pub fn rescale(values: &[f64], source: Option<(f64, f64)>, dest: (f64, f64)) -> Vec<f64> {
    let (src_min, src_max) = source.unwrap_or_else(|| min_max(values));
    let src_span = src_max - src_min;
    let dest_span = dest.1 - dest.0;

    if src_span == 0.0 {
        let midpoint = dest.0 + dest_span / 2.0;
        return vec![midpoint; values.len()];
    }

    values
        .iter()
        .map(|v| dest.0 + dest_span * (v - src_min) / src_span)
        .collect()
}

/// Positions for `n` categories spanning `dest`, each centered within its
/// slot: `dest.0 + span / n * (i + 0.5)`.
pub fn categorical_positions(n: usize, dest: (f64, f64)) -> Vec<f64> {
    if n == 0 {
        return Vec::new();
    }
    let step = (dest.1 - dest.0) / n as f64;
    (0..n).map(|i| dest.0 + step * (i as f64 + 0.5)).collect()
}

/// Convert a dimension (fraction of the canvas) into the scale range it
/// occupies around `center`. Inverse of [`scale_to_dim`].
pub fn dim_to_scale(dim: f64, center: f64) -> (f64, f64) {
    (center - dim / 2.0, center + dim / 2.0)
}

/// Width of a scale range. Inverse of [`dim_to_scale`].
pub fn scale_to_dim(range: (f64, f64)) -> f64 {
    range.1 - range.0
}

fn min_max(values: &[f64]) -> (f64, f64) {
    let min = values.iter().cloned().fold(f64::INFINITY, f64::min);
    let max = values.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    (min, max)
}

/// Per-channel data ranges accumulated across layers. Ranges only ever
/// widen once seeded, so every layer mapping a channel renders against the
/// union of all columns ever mapped to it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScaleRegistry {
    ranges: BTreeMap<String, (f64, f64)>,
}

impl ScaleRegistry {
    /// Seed ranges from a base mapping. Same widening rules as [`extend`];
    /// the separate name marks orchestrator-construction time.
    ///
    /// [`extend`]: ScaleRegistry::extend
    pub fn seed(&mut self, mapping: &Aes, data: &PlotData) -> Result<()> {
        self.extend(mapping, data)
    }

    /// Widen ranges with every numeric column the mapping references.
    /// Categorical columns carry no continuous range and are skipped;
    /// geoms that need them numerically fail on their own when reading.
    pub fn extend(&mut self, mapping: &Aes, data: &PlotData) -> Result<()> {
        for (channel, column) in mapping.channels() {
            let Ok(values) = data.numeric_column(column) else {
                continue;
            };
            let (col_min, col_max) = min_max(&values);
            self.ranges
                .entry(channel.to_string())
                .and_modify(|(min, max)| {
                    *min = min.min(col_min);
                    *max = max.max(col_max);
                })
                .or_insert((col_min, col_max));
        }
        Ok(())
    }

    /// Accumulated range for a channel.
    pub fn get(&self, channel: &str) -> Option<(f64, f64)> {
        self.ranges.get(channel).copied()
    }

    /// Re-derive the registry as a fold over an ordered layer list. Equals
    /// the incrementally-widened state for the same layers in the same
    /// order.
    pub fn from_layers<'a, I>(base: (&Aes, &PlotData), layers: I) -> Result<Self>
    where
        I: IntoIterator<Item = (&'a Aes, &'a PlotData)>,
    {
        let mut registry = Self::default();
        registry.seed(base.0, base.1)?;
        for (mapping, data) in layers {
            registry.extend(mapping, data)?;
        }
        Ok(registry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aes::aes;

    fn make_data(columns: &[(&str, &[f64])]) -> PlotData {
        let headers: Vec<String> = columns.iter().map(|(n, _)| n.to_string()).collect();
        let len = columns[0].1.len();
        let rows = (0..len)
            .map(|i| columns.iter().map(|(_, v)| v[i].to_string()).collect())
            .collect();
        PlotData::new(headers, rows).unwrap()
    }

    #[test]
    fn test_rescale_into_unit_range() {
        let mapped = rescale(&[0.0, 5.0, 10.0], None, (0.0, 1.0));
        assert_eq!(mapped, vec![0.0, 0.5, 1.0]);
    }

    #[test]
    fn test_rescale_explicit_ranges() {
        let mapped = rescale(&[200.0, 350.0, 500.0], Some((200.0, 500.0)), (0.2, 0.6));
        assert!((mapped[0] - 0.2).abs() < 1e-12);
        assert!((mapped[1] - 0.4).abs() < 1e-12);
        assert!((mapped[2] - 0.6).abs() < 1e-12);
    }

    #[test]
    fn test_rescale_round_trip() {
        let original = vec![3.0, 1.0, 4.0, 1.5, 9.0];
        let src = (1.0, 9.0);
        let dst = (0.125, 0.875);
        let there = rescale(&original, Some(src), dst);
        let back = rescale(&there, Some(dst), src);
        for (a, b) in original.iter().zip(back.iter()) {
            assert!((a - b).abs() < 1e-9, "{a} != {b}");
        }
    }

    #[test]
    fn test_rescale_degenerate_maps_to_midpoint() {
        let mapped = rescale(&[5.0, 5.0, 5.0], None, (0.2, 0.8));
        assert_eq!(mapped, vec![0.5, 0.5, 0.5]);
    }

    #[test]
    fn test_categorical_positions_centered() {
        let positions = categorical_positions(5, (0.0, 1.0));
        let expected = [0.1, 0.3, 0.5, 0.7, 0.9];
        assert_eq!(positions.len(), expected.len());
        for (p, e) in positions.iter().zip(expected.iter()) {
            assert!((p - e).abs() < 1e-12, "{p} != {e}");
        }
    }

    #[test]
    fn test_categorical_positions_symmetric() {
        // First and last slots sit the same distance from the range edges
        let positions = categorical_positions(4, (0.2, 0.8));
        let first_gap = positions[0] - 0.2;
        let last_gap = 0.8 - positions[3];
        assert!((first_gap - last_gap).abs() < 1e-12);
        assert!(first_gap > 0.0);
    }

    #[test]
    fn test_dim_scale_inverses() {
        for d in [0.1, 0.5, 0.75, 1.0] {
            for c in [0.0, 0.25, 0.5, 0.9] {
                let range = dim_to_scale(d, c);
                assert!((scale_to_dim(range) - d).abs() < 1e-12);
            }
        }
    }

    #[test]
    fn test_registry_widens_across_layers() {
        let d1 = make_data(&[("a", &[5.0, 10.0])]);
        let d2 = make_data(&[("b", &[-3.0, 7.0])]);

        let mut registry = ScaleRegistry::default();
        registry.seed(&aes().y("a"), &d1).unwrap();
        registry.extend(&aes().y("b"), &d2).unwrap();

        assert_eq!(registry.get("y"), Some((-3.0, 10.0)));
    }

    #[test]
    fn test_registry_never_narrows() {
        let wide = make_data(&[("a", &[0.0, 100.0])]);
        let narrow = make_data(&[("a", &[40.0, 60.0])]);

        let mut registry = ScaleRegistry::default();
        registry.seed(&aes().x("a"), &wide).unwrap();
        registry.extend(&aes().x("a"), &narrow).unwrap();

        assert_eq!(registry.get("x"), Some((0.0, 100.0)));
    }

    #[test]
    fn test_registry_fold_matches_incremental() {
        let d1 = make_data(&[("a", &[1.0, 2.0]), ("b", &[10.0, 20.0])]);
        let d2 = make_data(&[("a", &[-5.0, 0.0]), ("b", &[15.0, 30.0])]);
        let base = aes().x("a").y("b");
        let layer = aes().y("a");

        let mut incremental = ScaleRegistry::default();
        incremental.seed(&base, &d1).unwrap();
        let merged = layer.merged_over(&base);
        incremental.extend(&merged, &d2).unwrap();

        let folded = ScaleRegistry::from_layers((&base, &d1), [(&merged, &d2)]).unwrap();
        assert_eq!(incremental, folded);
    }

    #[test]
    fn test_registry_skips_categorical() {
        let data = PlotData::new(
            vec!["cat".to_string(), "val".to_string()],
            vec![
                vec!["a".to_string(), "1".to_string()],
                vec!["b".to_string(), "2".to_string()],
            ],
        )
        .unwrap();

        let mut registry = ScaleRegistry::default();
        registry.seed(&aes().x("cat").y("val"), &data).unwrap();
        assert_eq!(registry.get("x"), None);
        assert_eq!(registry.get("y"), Some((1.0, 2.0)));
    }
}
