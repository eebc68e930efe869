//! Part and category types.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

/// Hardware component category.
///
/// Declaration order is the canonical processing order used by the
/// allocation engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Cpu,
    Memory,
    Motherboard,
    PowerSupply,
    Case,
    VideoCard,
    Storage,
}

impl Category {
    /// Number of categories.
    pub const COUNT: usize = 7;

    /// All categories in canonical order.
    pub const ALL: [Category; Category::COUNT] = [
        Category::Cpu,
        Category::Memory,
        Category::Motherboard,
        Category::PowerSupply,
        Category::Case,
        Category::VideoCard,
        Category::Storage,
    ];

    /// Categories a build cannot be assembled without.
    pub const MANDATORY: [Category; 5] = [
        Category::Cpu,
        Category::Memory,
        Category::Motherboard,
        Category::PowerSupply,
        Category::Case,
    ];

    /// Stable identifier, as used in catalog records and output.
    pub fn as_str(self) -> &'static str {
        match self {
            Category::Cpu => "cpu",
            Category::Memory => "memory",
            Category::Motherboard => "motherboard",
            Category::PowerSupply => "power_supply",
            Category::Case => "case",
            Category::VideoCard => "video_card",
            Category::Storage => "storage",
        }
    }

    /// Name of the JSON document holding this category's parts.
    pub fn file_name(self) -> &'static str {
        match self {
            Category::Cpu => "cpu.json",
            Category::Memory => "memory.json",
            Category::Motherboard => "motherboard.json",
            Category::PowerSupply => "power-supply.json",
            Category::Case => "case.json",
            Category::VideoCard => "video-card.json",
            Category::Storage => "storage.json",
        }
    }

    /// Position in [`Category::ALL`].
    pub fn index(self) -> usize {
        self as usize
    }

    /// Whether a bundle without this category is incomplete.
    pub fn is_mandatory(self) -> bool {
        !matches!(self, Category::VideoCard | Category::Storage)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .iter()
            .copied()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| format!("unknown category: {s}"))
    }
}

/// Category-specific intrinsic attributes of a part.
///
/// One variant per [`Category`]; defaults for missing attributes are
/// applied while parsing, so every field here is usable as-is.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "category", rename_all = "snake_case")]
pub enum PartSpec {
    Cpu {
        core_count: f64,
        /// Boost clock in GHz (falls back to the base clock).
        boost_clock_ghz: f64,
    },
    Memory {
        /// Module count multiplied by per-module size.
        total_capacity_gb: f64,
        speed_mhz: f64,
    },
    Motherboard {
        form_factor: Option<String>,
    },
    PowerSupply {
        wattage: f64,
        efficiency: Option<String>,
    },
    Case {
        case_type: Option<String>,
    },
    VideoCard {
        memory_gb: f64,
        boost_clock_mhz: f64,
    },
    Storage {
        capacity_gb: f64,
        storage_type: Option<String>,
    },
}

impl PartSpec {
    pub fn category(&self) -> Category {
        match self {
            PartSpec::Cpu { .. } => Category::Cpu,
            PartSpec::Memory { .. } => Category::Memory,
            PartSpec::Motherboard { .. } => Category::Motherboard,
            PartSpec::PowerSupply { .. } => Category::PowerSupply,
            PartSpec::Case { .. } => Category::Case,
            PartSpec::VideoCard { .. } => Category::VideoCard,
            PartSpec::Storage { .. } => Category::Storage,
        }
    }
}

/// A priced hardware part. Immutable once loaded.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Part {
    pub name: String,
    /// Price in the catalog currency (USD). Always positive.
    pub price: f64,
    pub spec: PartSpec,
    /// Remaining raw attributes of the catalog record.
    pub attributes: Map<String, Value>,
}

impl Part {
    /// Creates a part without raw attributes.
    pub fn new(name: impl Into<String>, price: f64, spec: PartSpec) -> Self {
        Self {
            name: name.into(),
            price,
            spec,
            attributes: Map::new(),
        }
    }

    pub fn category(&self) -> Category {
        self.spec.category()
    }

    /// Whether the price makes this part eligible for selection.
    pub fn has_valid_price(&self) -> bool {
        self.price.is_finite() && self.price > 0.0
    }
}
