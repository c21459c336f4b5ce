//! # Sort Module
//!
//! ## Purpose
//! Builders for the `sort` section of a search request body, covering
//! field sorts and geo-distance sorts.
//!
//! ## Input/Output Specification
//! - **Input**: A field name plus ordering options, optionally anchored to
//!   a geo point
//! - **Output**: One of three field-sort shapes, or a `_geo_distance`
//!   fragment when a geo point is attached
//! - **Shape Rules**: No options emits `{field: {}}`; an `order`-only sort
//!   collapses to `{field: "asc"}`; anything else emits the option object
//!
//! ## Key Features
//! - Set-time validation for order, mode and numeric type
//! - Geo anchor expressed as a geohash string or a `[lon, lat]` pair

use serde_json::{Map, Value};

use crate::errors::{BuilderError, Result};
use crate::serializer::{tagged, Body, Serializable};

const ORDERS: [&str; 2] = ["asc", "desc"];
const MODES: [&str; 5] = ["min", "max", "sum", "avg", "median"];
const NUMERIC_TYPES: [&str; 4] = ["double", "long", "date", "date_nanos"];
const DISTANCE_TYPES: [&str; 2] = ["arc", "plan"];

/// A geographic anchor point for distance sorting.
#[derive(Debug, Default)]
pub struct GeoPoint {
    latitude: Option<f64>,
    longitude: Option<f64>,
    geohash: Option<String>,
    options: Body,
}

impl GeoPoint {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn latitude(mut self, latitude: f64) -> Self {
        self.latitude = Some(latitude);
        self
    }

    pub fn longitude(mut self, longitude: f64) -> Self {
        self.longitude = Some(longitude);
        self
    }

    /// Sets the anchor as a geohash, taking precedence over coordinates.
    pub fn geohash(mut self, geohash: &str) -> Self {
        self.geohash = Some(geohash.to_string());
        self
    }

    /// How to compute the distance. Lowercased and validated eagerly
    /// against `arc` / `plan`.
    pub fn distance_type(mut self, distance_type: &str) -> Result<Self> {
        let distance_type_lower = distance_type.to_lowercase();

        if !DISTANCE_TYPES.contains(&distance_type_lower.as_str()) {
            return Err(BuilderError::InvalidValue {
                value: distance_type.to_string(),
                attribute: "distance type",
            });
        }

        self.options.insert("distance_type", distance_type_lower);
        Ok(self)
    }

    /// The unit to use when computing sort values, e.g. `km`.
    pub fn unit(mut self, unit: &str) -> Self {
        self.options.insert("unit", unit);
        self
    }

    /// The anchor coordinates: the geohash string when set, otherwise a
    /// `[lon, lat]` pair.
    fn coordinates(&self) -> Result<Value> {
        if let Some(geohash) = &self.geohash {
            return Ok(Value::String(geohash.clone()));
        }

        let latitude = self
            .latitude
            .ok_or(BuilderError::MissingRequiredField("latitude"))?;
        let longitude = self
            .longitude
            .ok_or(BuilderError::MissingRequiredField("longitude"))?;

        Ok(serde_json::json!([longitude, latitude]))
    }
}

/// A single sort criterion.
#[derive(Debug, Default)]
pub struct Sort {
    field: Option<String>,
    options: Body,
    geo_point: Option<GeoPoint>,
}

impl Sort {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the field to sort by.
    pub fn field(mut self, field: &str) -> Self {
        self.field = Some(field.to_string());
        self
    }

    /// Anchors the sort to a geo point, switching to the `_geo_distance`
    /// output shape.
    pub fn geo_distance(mut self, geo_point: GeoPoint) -> Self {
        self.geo_point = Some(geo_point);
        self
    }

    /// Value to sort documents that lack the field under.
    pub fn missing(mut self, value: impl Into<Value>) -> Self {
        self.options.insert("missing", value);
        self
    }

    /// How to pick the sort value from a multi-valued field. Lowercased
    /// and validated eagerly.
    pub fn mode(mut self, mode: &str) -> Result<Self> {
        let mode_lower = mode.to_lowercase();

        if !MODES.contains(&mode_lower.as_str()) {
            return Err(BuilderError::InvalidValue {
                value: mode.to_string(),
                attribute: "mode",
            });
        }

        self.options.insert("mode", mode_lower);
        Ok(self)
    }

    /// Numeric type the field values are cast to before sorting.
    /// Lowercased and validated eagerly.
    pub fn numeric_type(mut self, numeric_type: &str) -> Result<Self> {
        let numeric_type_lower = numeric_type.to_lowercase();

        if !NUMERIC_TYPES.contains(&numeric_type_lower.as_str()) {
            return Err(BuilderError::InvalidValue {
                value: numeric_type.to_string(),
                attribute: "numeric type",
            });
        }

        self.options.insert("numeric_type", numeric_type_lower);
        Ok(self)
    }

    /// The sort direction. Lowercased and validated eagerly against
    /// `asc` / `desc`.
    pub fn order(mut self, order: &str) -> Result<Self> {
        let order_lower = order.to_lowercase();

        if !ORDERS.contains(&order_lower.as_str()) {
            return Err(BuilderError::InvalidValue {
                value: order.to_string(),
                attribute: "order",
            });
        }

        self.options.insert("order", order_lower);
        Ok(self)
    }

    /// Fallback type for indices where the field is unmapped.
    pub fn unmapped_type(mut self, unmapped_type: &str) -> Self {
        self.options.insert("unmapped_type", unmapped_type);
        self
    }
}

impl Serializable for Sort {
    fn serialize(&self) -> Result<Value> {
        let field = self
            .field
            .as_deref()
            .ok_or(BuilderError::MissingRequiredField("field"))?;

        if let Some(geo_point) = &self.geo_point {
            let mut inner = Map::new();
            inner.insert(field.to_string(), geo_point.coordinates()?);
            for (key, value) in geo_point.options.to_map()? {
                inner.insert(key, value);
            }
            for (key, value) in self.options.to_map()? {
                inner.insert(key, value);
            }
            return Ok(tagged("_geo_distance", Value::Object(inner)));
        }

        if self.options.is_empty() {
            return Ok(tagged(field, Value::Object(Map::new())));
        }

        let mut resolved = self.options.to_map()?;

        // An order-only sort collapses to the bare direction string
        if resolved.len() == 1 {
            if let Some(order) = resolved.remove("order") {
                return Ok(tagged(field, order));
            }
            return Ok(tagged(field, Value::Object(resolved)));
        }

        Ok(tagged(field, Value::Object(resolved)))
    }
}
