use serde::Serialize;

use crate::color::ColorScheme;
use crate::data::model::{Dataset, GeoPoint, NumericField};

// ---------------------------------------------------------------------------
// Map layer configuration
// ---------------------------------------------------------------------------

/// Scatter layer drawn on the map view.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MapLayerSpec {
    /// RGBA fill of every point.
    pub fill: [u8; 4],
    /// Radius in metres is `house value (USD) / radius_divisor`.
    pub radius_divisor: f64,
    /// Web-map style zoom level of the initial view.
    pub zoom: f64,
}

impl Default for MapLayerSpec {
    fn default() -> Self {
        MapLayerSpec {
            fill: [255, 0, 0, 160],
            radius_divisor: 1000.0,
            zoom: 7.0,
        }
    }
}

/// Initial map viewport in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MapViewport {
    pub center: GeoPoint,
    pub half_width: f64,
    pub half_height: f64,
}

impl MapViewport {
    pub fn min(&self) -> [f64; 2] {
        [
            self.center.longitude - self.half_width,
            self.center.latitude - self.half_height,
        ]
    }

    pub fn max(&self) -> [f64; 2] {
        [
            self.center.longitude + self.half_width,
            self.center.latitude + self.half_height,
        ]
    }
}

impl MapLayerSpec {
    /// Point radius in metres for a raw `median_house_value`.
    pub fn radius_metres(&self, value: f64, unit: f64) -> f64 {
        value * unit / self.radius_divisor
    }

    /// Viewport centered on the dataset centroid. `None` for an empty
    /// dataset: there is nothing to center on.
    pub fn viewport(&self, dataset: &Dataset) -> Option<MapViewport> {
        let center = dataset.centroid()?;
        let half_width = 180.0 / 2f64.powf(self.zoom);
        // Keep degrees of latitude and longitude at the same ground scale.
        let half_height = half_width * center.latitude.to_radians().cos().max(0.01);
        Some(MapViewport {
            center,
            half_width,
            half_height,
        })
    }
}

// ---------------------------------------------------------------------------
// Declarative scatter chart encoding
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Mark {
    Circle,
}

/// Visual channel a field is mapped onto.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Channel {
    X,
    Y,
    Color,
    Size,
}

/// One `channel ← field` mapping. All fields here are quantitative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Encoding {
    pub channel: Channel,
    pub field: NumericField,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScatterSpec {
    pub mark: Mark,
    pub tooltip: bool,
    pub encodings: Vec<Encoding>,
    pub color_scheme: ColorScheme,
}

impl ScatterSpec {
    /// Median income against median house value, with colour and size
    /// also driven by house value.
    pub fn income_vs_value() -> Self {
        ScatterSpec {
            mark: Mark::Circle,
            tooltip: true,
            encodings: vec![
                Encoding {
                    channel: Channel::X,
                    field: NumericField::MedianIncome,
                },
                Encoding {
                    channel: Channel::Y,
                    field: NumericField::MedianHouseValue,
                },
                Encoding {
                    channel: Channel::Color,
                    field: NumericField::MedianHouseValue,
                },
                Encoding {
                    channel: Channel::Size,
                    field: NumericField::MedianHouseValue,
                },
            ],
            color_scheme: ColorScheme::Blues,
        }
    }

    /// Field bound to `channel`, if any.
    pub fn field(&self, channel: Channel) -> Option<NumericField> {
        self.encodings
            .iter()
            .find(|e| e.channel == channel)
            .map(|e| e.field)
    }
}

// ---------------------------------------------------------------------------
// Bucketing: one drawable series per (colour, size) bucket
// ---------------------------------------------------------------------------

/// Number of value buckets a point cloud is split into for drawing. Bounds
/// the colour and size steps a chart can show.
pub const BUCKETS: usize = 10;

/// Points that share one bucket of the bucketing field.
#[derive(Debug, Clone, PartialEq)]
pub struct Bucket {
    /// Bucket midpoint position in `[0, 1]` over the field's range.
    pub position: f32,
    /// Mean bucketing value of the members.
    pub mean_value: f64,
    pub points: Vec<[f64; 2]>,
}

/// Split `(x, y, key)` triples into [`BUCKETS`] equal-width buckets over
/// the observed range of `key`. Empty buckets are dropped.
///
/// Colour and size are drawn per bucket, not per point: every member is
/// painted with the colour of the bucket's `mean_value` and sized by its
/// `position`. The colour and size channels are therefore quantized to at
/// most [`BUCKETS`] steps across the key's range. x and y stay exact.
pub fn bucketize(points: impl IntoIterator<Item = (f64, f64, f64)>) -> Vec<Bucket> {
    let points: Vec<(f64, f64, f64)> = points.into_iter().collect();
    let Some((min, max)) = points.iter().map(|p| p.2).fold(None, |acc, v| match acc {
        None => Some((v, v)),
        Some((lo, hi)) => Some((f64::min(lo, v), f64::max(hi, v))),
    }) else {
        return Vec::new();
    };

    let span = max - min;
    let mut members: Vec<(Vec<[f64; 2]>, f64)> = vec![(Vec::new(), 0.0); BUCKETS];
    for (x, y, key) in points {
        let idx = if span > 0.0 {
            (((key - min) / span) * BUCKETS as f64).floor() as usize
        } else {
            0
        };
        let slot = &mut members[idx.min(BUCKETS - 1)];
        slot.0.push([x, y]);
        slot.1 += key;
    }

    members
        .into_iter()
        .enumerate()
        .filter(|(_, (pts, _))| !pts.is_empty())
        .map(|(i, (pts, sum))| Bucket {
            position: (i as f32 + 0.5) / BUCKETS as f32,
            mean_value: sum / pts.len() as f64,
            points: pts,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{HousingRecord, SourceKind};

    #[test]
    fn income_vs_value_encodes_all_four_channels() {
        let spec = ScatterSpec::income_vs_value();
        assert_eq!(spec.field(Channel::X), Some(NumericField::MedianIncome));
        assert_eq!(spec.field(Channel::Y), Some(NumericField::MedianHouseValue));
        assert_eq!(spec.field(Channel::Color), Some(NumericField::MedianHouseValue));
        assert_eq!(spec.field(Channel::Size), Some(NumericField::MedianHouseValue));
    }

    #[test]
    fn scatter_spec_serializes_with_snake_case_names() {
        let json = serde_json::to_value(ScatterSpec::income_vs_value()).unwrap();
        assert_eq!(json["mark"], "circle");
        assert_eq!(json["encodings"][0]["channel"], "x");
        assert_eq!(json["encodings"][0]["field"], "median_income");
        assert_eq!(json["color_scheme"], "blues");
    }

    #[test]
    fn viewport_centers_on_centroid() {
        let ds = Dataset::new(
            vec![
                HousingRecord::new(-121.0, 36.0, 1.0, 1.0),
                HousingRecord::new(-119.0, 38.0, 1.0, 1.0),
            ],
            Vec::new(),
            SourceKind::CleanFile,
        );
        let vp = MapLayerSpec::default().viewport(&ds).unwrap();
        assert_eq!(vp.center.longitude, -120.0);
        assert_eq!(vp.center.latitude, 37.0);
        assert!((vp.half_width - 180.0 / 128.0).abs() < 1e-12);
        assert!(vp.min()[0] < -120.0 && vp.max()[0] > -120.0);
    }

    #[test]
    fn empty_dataset_has_no_viewport() {
        let ds = Dataset::new(Vec::new(), Vec::new(), SourceKind::CleanFile);
        assert_eq!(MapLayerSpec::default().viewport(&ds), None);
    }

    #[test]
    fn radius_scales_with_unit() {
        let spec = MapLayerSpec::default();
        assert_eq!(spec.radius_metres(450_000.0, SourceKind::CleanFile.house_value_unit()), 450.0);
        assert_eq!(spec.radius_metres(4.5, SourceKind::Reference.house_value_unit()), 450.0);
    }

    #[test]
    fn map_layer_spec_serializes_fields() {
        let json = serde_json::to_value(MapLayerSpec::default()).unwrap();
        assert_eq!(json["radius_divisor"], 1000.0);
        assert_eq!(json["fill"].as_array().map(Vec::len), Some(4));
    }

    #[test]
    fn bucketize_quantizes_to_at_most_bucket_count() {
        let buckets = bucketize((0..1000).map(|i| (i as f64, i as f64, i as f64)));
        assert_eq!(buckets.len(), BUCKETS);
        assert_eq!(buckets.iter().map(|b| b.points.len()).sum::<usize>(), 1000);
        for b in &buckets {
            let lo = b.points.iter().map(|p| p[1]).fold(f64::INFINITY, f64::min);
            let hi = b.points.iter().map(|p| p[1]).fold(f64::NEG_INFINITY, f64::max);
            assert!(lo <= b.mean_value && b.mean_value <= hi);
        }
    }

    #[test]
    fn bucketize_groups_by_key_range() {
        let buckets = bucketize(vec![(0.0, 0.0, 0.0), (1.0, 1.0, 0.05), (2.0, 2.0, 1.0)]);
        assert_eq!(buckets.len(), 2);
        assert_eq!(buckets[0].points, vec![[0.0, 0.0], [1.0, 1.0]]);
        assert_eq!(buckets[1].points, vec![[2.0, 2.0]]);
        assert_eq!(buckets[1].mean_value, 1.0);
        assert!(bucketize(Vec::new()).is_empty());
    }
}
