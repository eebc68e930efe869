//! Catalog record parsing.
//!
//! Records are loose JSON objects. Missing attributes fall back to
//! category defaults; attributes that are present but unusable reject
//! the whole record.

use super::types::{Category, Part, PartSpec};
use serde_json::{Map, Value};
use thiserror::Error;

const DEFAULT_CORE_COUNT: f64 = 4.0;
const DEFAULT_CPU_CLOCK_GHZ: f64 = 3.0;
const DEFAULT_GPU_MEMORY_GB: f64 = 4.0;
const DEFAULT_GPU_CLOCK_MHZ: f64 = 1000.0;
const DEFAULT_MEMORY_CAPACITY_GB: f64 = 8.0;
const DEFAULT_MEMORY_SPEED_MHZ: f64 = 3000.0;
const DEFAULT_PSU_WATTAGE: f64 = 500.0;
const DEFAULT_STORAGE_CAPACITY_GB: f64 = 500.0;

/// Why a single catalog record was rejected.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PartError {
    #[error("record is not a JSON object")]
    NotAnObject,
    #[error("record has no name")]
    MissingName,
    #[error("record has no price")]
    MissingPrice,
    #[error("price must be positive, got {0}")]
    NonPositivePrice(f64),
    #[error("malformed attribute `{attribute}`: {value}")]
    MalformedAttribute { attribute: String, value: String },
}

impl PartError {
    fn malformed(attribute: &str, value: &Value) -> Self {
        PartError::MalformedAttribute {
            attribute: attribute.to_string(),
            value: value.to_string(),
        }
    }
}

/// Parses one catalog record into a [`Part`] of the given category.
pub fn parse_part(category: Category, record: &Value) -> Result<Part, PartError> {
    let object = record.as_object().ok_or(PartError::NotAnObject)?;

    let name = match object.get("name") {
        Some(Value::String(name)) if !name.trim().is_empty() => name.clone(),
        _ => return Err(PartError::MissingName),
    };

    let price = match object.get("price") {
        None | Some(Value::Null) => return Err(PartError::MissingPrice),
        Some(value) => as_number(value).ok_or_else(|| PartError::malformed("price", value))?,
    };
    if !price.is_finite() || price <= 0.0 {
        return Err(PartError::NonPositivePrice(price));
    }

    let spec = parse_spec(category, object)?;

    let attributes: Map<String, Value> = object
        .iter()
        .filter(|(key, _)| key.as_str() != "name" && key.as_str() != "price")
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect();

    Ok(Part {
        name,
        price,
        spec,
        attributes,
    })
}

fn parse_spec(category: Category, object: &Map<String, Value>) -> Result<PartSpec, PartError> {
    let spec = match category {
        Category::Cpu => {
            let core_count = number_or(object, "core_count", DEFAULT_CORE_COUNT)?;
            let base_clock = number_or(object, "core_clock", DEFAULT_CPU_CLOCK_GHZ)?;
            PartSpec::Cpu {
                core_count,
                boost_clock_ghz: number_or(object, "boost_clock", base_clock)?,
            }
        }
        Category::VideoCard => {
            let memory_gb = number_or(object, "memory", DEFAULT_GPU_MEMORY_GB)?;
            let base_clock = number_or(object, "core_clock", DEFAULT_GPU_CLOCK_MHZ)?;
            PartSpec::VideoCard {
                memory_gb,
                boost_clock_mhz: number_or(object, "boost_clock", base_clock)?,
            }
        }
        Category::Memory => PartSpec::Memory {
            total_capacity_gb: pair(object.get("modules"))
                .map(|(count, size)| count * size)
                .unwrap_or(DEFAULT_MEMORY_CAPACITY_GB),
            speed_mhz: pair(object.get("speed"))
                .map(|(_, mhz)| mhz)
                .unwrap_or(DEFAULT_MEMORY_SPEED_MHZ),
        },
        Category::Motherboard => PartSpec::Motherboard {
            form_factor: text(object.get("form_factor")),
        },
        Category::PowerSupply => PartSpec::PowerSupply {
            wattage: number_or(object, "wattage", DEFAULT_PSU_WATTAGE)?,
            efficiency: text(object.get("efficiency")),
        },
        Category::Case => PartSpec::Case {
            case_type: text(object.get("type")),
        },
        Category::Storage => PartSpec::Storage {
            capacity_gb: number_or(object, "capacity", DEFAULT_STORAGE_CAPACITY_GB)?,
            storage_type: text(object.get("type")),
        },
    };
    Ok(spec)
}

/// Numeric value of a JSON number or numeric string.
fn as_number(value: &Value) -> Option<f64> {
    let number = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    number.filter(|n| n.is_finite())
}

fn number_or(object: &Map<String, Value>, key: &str, default: f64) -> Result<f64, PartError> {
    match object.get(key) {
        None | Some(Value::Null) => Ok(default),
        Some(value) => as_number(value).ok_or_else(|| PartError::malformed(key, value)),
    }
}

/// `[a, b, ...]` with two leading numbers.
fn pair(value: Option<&Value>) -> Option<(f64, f64)> {
    let items = value?.as_array()?;
    if items.len() < 2 {
        return None;
    }
    Some((as_number(&items[0])?, as_number(&items[1])?))
}

fn text(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
