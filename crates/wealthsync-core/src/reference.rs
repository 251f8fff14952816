//! Regional reference data for budget calculations
//!
//! Static lookup tables consulted by the calculator:
//! - Economic profile (inflation, cost-of-living index) per region
//! - Tier classification for major cities
//! - Minimum income share per need category
//!
//! ## Configuration Resolution
//!
//! Tables are loaded once at startup with a layered resolution:
//! 1. Explicit path (CLI flag or `WEALTHSYNC_REFERENCE_DATA`)
//! 2. Override in data dir (~/.local/share/wealthsync/config/reference.toml)
//! 3. Embedded defaults (compiled into binary)
//!
//! The resulting [`ReferenceData`] is immutable and shared by reference.

use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{Error, Result};

/// Embedded default tables (compiled into binary)
const DEFAULT_REFERENCE: &str = include_str!("../../../config/reference.toml");

/// Environment variable pointing at a reference data file
pub const REFERENCE_PATH_ENV: &str = "WEALTHSYNC_REFERENCE_DATA";

/// Region key used for any location that is not listed
pub const DEFAULT_REGION: &str = "default";

/// Cost-of-living index of the baseline region
pub const BASELINE_COST_OF_LIVING_INDEX: f64 = 50.0;

/// Economic indicators for a region
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RegionalProfile {
    /// Annual inflation in percent
    pub inflation: f64,
    /// Dimensionless index, baseline 50
    pub cost_of_living_index: f64,
}

impl RegionalProfile {
    pub fn new(inflation: f64, cost_of_living_index: f64) -> Self {
        Self {
            inflation,
            cost_of_living_index,
        }
    }
}

/// City size classification driving the regional adjustment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum CityTier {
    /// Metro: +1.0 inflation, +20% cost of living
    Tier1,
    /// Large city: +0.5 inflation, +10% cost of living
    Tier2,
    /// Everything else, unadjusted
    Tier3,
}

impl CityTier {
    pub fn as_u8(&self) -> u8 {
        match self {
            Self::Tier1 => 1,
            Self::Tier2 => 2,
            Self::Tier3 => 3,
        }
    }

    /// Apply this tier's adjustment to a region's base profile
    pub fn adjust(&self, base: RegionalProfile) -> RegionalProfile {
        match self {
            Self::Tier1 => RegionalProfile {
                inflation: base.inflation + 1.0,
                cost_of_living_index: base.cost_of_living_index * 1.20,
            },
            Self::Tier2 => RegionalProfile {
                inflation: base.inflation + 0.5,
                cost_of_living_index: base.cost_of_living_index * 1.10,
            },
            Self::Tier3 => base,
        }
    }
}

impl TryFrom<u8> for CityTier {
    type Error = String;

    fn try_from(value: u8) -> std::result::Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::Tier1),
            2 => Ok(Self::Tier2),
            3 => Ok(Self::Tier3),
            _ => Err(format!("Unknown city tier: {}", value)),
        }
    }
}

impl From<CityTier> for u8 {
    fn from(tier: CityTier) -> Self {
        tier.as_u8()
    }
}

impl std::fmt::Display for CityTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "tier {}", self.as_u8())
    }
}

/// A known city and the region it belongs to
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CityClassification {
    /// Region key of the containing state
    pub state: String,
    pub tier: CityTier,
}

/// Levels of the needs hierarchy, lowest first
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NeedCategory {
    Physiological,
    Safety,
    Social,
    Esteem,
    SelfActualization,
}

impl NeedCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Physiological => "physiological",
            Self::Safety => "safety",
            Self::Social => "social",
            Self::Esteem => "esteem",
            Self::SelfActualization => "self_actualization",
        }
    }

    /// All categories in hierarchy order
    pub fn all() -> &'static [NeedCategory] {
        &[
            Self::Physiological,
            Self::Safety,
            Self::Social,
            Self::Esteem,
            Self::SelfActualization,
        ]
    }
}

impl std::str::FromStr for NeedCategory {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "physiological" => Ok(Self::Physiological),
            "safety" => Ok(Self::Safety),
            "social" => Ok(Self::Social),
            "esteem" => Ok(Self::Esteem),
            "self_actualization" | "self-actualization" => Ok(Self::SelfActualization),
            _ => Err(format!("Unknown need category: {}", s)),
        }
    }
}

impl std::fmt::Display for NeedCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Minimum fraction of income recommended per need category
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NeedThresholds {
    pub physiological: f64,
    pub safety: f64,
    pub social: f64,
    pub esteem: f64,
    pub self_actualization: f64,
}

impl NeedThresholds {
    pub fn share(&self, category: NeedCategory) -> f64 {
        match category {
            NeedCategory::Physiological => self.physiological,
            NeedCategory::Safety => self.safety,
            NeedCategory::Social => self.social,
            NeedCategory::Esteem => self.esteem,
            NeedCategory::SelfActualization => self.self_actualization,
        }
    }

    /// Minimum recommended spend for a category at the given income
    pub fn minimum(&self, category: NeedCategory, income: f64) -> f64 {
        self.share(category) * income
    }
}

impl Default for NeedThresholds {
    fn default() -> Self {
        Self {
            physiological: 0.40,
            safety: 0.20,
            social: 0.10,
            esteem: 0.05,
            self_actualization: 0.05,
        }
    }
}

/// Immutable reference tables
#[derive(Debug, Clone)]
pub struct ReferenceData {
    regions: HashMap<String, RegionalProfile>,
    /// Kept in definition order for listing
    cities: Vec<(String, CityClassification)>,
    needs: NeedThresholds,
}

impl ReferenceData {
    /// Build validated tables from their parts
    ///
    /// Keys are lowercased. Fails if the `default` region is missing, a region
    /// or city is listed twice once lowercased, or a city points at an unknown
    /// region.
    pub fn new(
        regions: HashMap<String, RegionalProfile>,
        cities: Vec<(String, CityClassification)>,
        needs: NeedThresholds,
    ) -> Result<Self> {
        let mut normalized_regions = HashMap::with_capacity(regions.len());
        for (key, profile) in regions {
            let key = key.trim().to_lowercase();
            if normalized_regions.insert(key.clone(), profile).is_some() {
                return Err(Error::Config(format!("Region '{}' is listed twice", key)));
            }
        }
        let regions = normalized_regions;

        if !regions.contains_key(DEFAULT_REGION) {
            return Err(Error::Config(format!(
                "Reference data must define a '{}' region",
                DEFAULT_REGION
            )));
        }

        let mut seen = HashSet::new();
        let mut normalized = Vec::with_capacity(cities.len());
        for (name, mut classification) in cities {
            let name = name.trim().to_lowercase();
            if !seen.insert(name.clone()) {
                return Err(Error::Config(format!("City '{}' is listed twice", name)));
            }
            classification.state = classification.state.trim().to_lowercase();
            if !regions.contains_key(&classification.state) {
                return Err(Error::Config(format!(
                    "City '{}' refers to unknown region '{}'",
                    name, classification.state
                )));
            }
            normalized.push((name, classification));
        }

        Ok(Self {
            regions,
            cities: normalized,
            needs,
        })
    }

    /// Load tables using the standard resolution order
    pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit_path {
            return Self::from_path(path);
        }

        if let Some(path) = std::env::var(REFERENCE_PATH_ENV)
            .ok()
            .filter(|s| !s.trim().is_empty())
        {
            return Self::from_path(Path::new(path.trim()));
        }

        if let Some(path) = default_override_path().filter(|p| p.exists()) {
            return Self::from_path(&path);
        }

        debug!("Using embedded reference data");
        Self::embedded()
    }

    /// Tables compiled into the binary
    pub fn embedded() -> Result<Self> {
        Self::from_toml_str(DEFAULT_REFERENCE)
    }

    /// Load tables from a TOML file
    pub fn from_path(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            Error::Config(format!(
                "Failed to read reference data {}: {}",
                path.display(),
                e
            ))
        })?;
        let data = Self::from_toml_str(&content)?;
        info!(
            path = %path.display(),
            regions = data.regions.len(),
            cities = data.cities.len(),
            "Loaded reference data override"
        );
        Ok(data)
    }

    /// Parse tables from TOML content
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let raw: RawReference = toml::from_str(content)
            .map_err(|e| Error::Config(format!("Invalid reference data TOML: {}", e)))?;

        let cities = raw
            .cities
            .into_iter()
            .map(|c| {
                let tier = CityTier::try_from(c.tier).map_err(Error::Config)?;
                Ok((
                    c.name,
                    CityClassification {
                        state: c.state,
                        tier,
                    },
                ))
            })
            .collect::<Result<Vec<_>>>()?;

        Self::new(raw.regions, cities, raw.needs)
    }

    /// Economic profile for a region key, falling back to `default`
    pub fn region_profile(&self, key: &str) -> RegionalProfile {
        self.regions
            .get(&key.to_lowercase())
            .or_else(|| self.regions.get(DEFAULT_REGION))
            .copied()
            // `new` guarantees the default region exists
            .unwrap_or(RegionalProfile::new(5.0, BASELINE_COST_OF_LIVING_INDEX))
    }

    pub fn has_region(&self, key: &str) -> bool {
        self.regions.contains_key(&key.to_lowercase())
    }

    /// Classification for a known city, if any
    pub fn city(&self, name: &str) -> Option<&CityClassification> {
        let name = name.to_lowercase();
        self.cities
            .iter()
            .find(|(city, _)| *city == name)
            .map(|(_, classification)| classification)
    }

    /// Known cities in definition order
    pub fn cities(&self) -> impl Iterator<Item = (&str, &CityClassification)> {
        self.cities.iter().map(|(name, c)| (name.as_str(), c))
    }

    pub fn needs(&self) -> &NeedThresholds {
        &self.needs
    }

    pub fn region_count(&self) -> usize {
        self.regions.len()
    }
}

/// Default override path
pub fn default_override_path() -> Option<PathBuf> {
    dirs::data_local_dir().map(|d| d.join("wealthsync").join("config").join("reference.toml"))
}

/// Raw structure for TOML parsing
#[derive(Debug, Deserialize)]
struct RawReference {
    needs: NeedThresholds,
    regions: HashMap<String, RegionalProfile>,
    #[serde(default)]
    cities: Vec<RawCity>,
}

#[derive(Debug, Deserialize)]
struct RawCity {
    name: String,
    state: String,
    tier: u8,
}
