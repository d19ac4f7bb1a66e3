//! Provider code lists
//!
//! Block, weather-type and commodity codes accepted by the AgriQuest API.
//! The lists are maintained by hand from the provider's published codes;
//! wire names are what clients pass in query strings, ids are what the
//! provider expects in request bodies.

use serde::{Deserialize, Deserializer};
use std::str::FromStr;

macro_rules! provider_codes {
    (
        $(#[$meta:meta])*
        $name:ident {
            $($variant:ident => ($wire:literal, $id:literal)),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $($variant,)+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// Name used on the HTTP surface
            pub fn wire_name(self) -> &'static str {
                match self {
                    $($name::$variant => $wire,)+
                }
            }

            /// Provider internal id
            pub fn id(self) -> u32 {
                match self {
                    $($name::$variant => $id,)+
                }
            }
        }

        impl FromStr for $name {
            type Err = UnknownCode;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($wire => Ok($name::$variant),)+
                    other => Err(UnknownCode {
                        kind: stringify!($name),
                        code: other.to_string(),
                    }),
                }
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let raw = String::deserialize(deserializer)?;
                raw.parse().map_err(serde::de::Error::custom)
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.wire_name())
            }
        }
    };
}

provider_codes! {
    /// Regional groupings (AMU blocks)
    BlockCode {
        AmuAustraliaLevel1 => ("AMU_AUSTRALIA_LEVEL_1", 134),
        AmuBrazilLevel1 => ("AMU_BRAZIL_LEVEL_1", 135),
        AmuChinaLevel1 => ("AMU_CHINA_LEVEL_1", 136),
        AmuEuropeLevel1 => ("AMU_EUROPE_LEVEL_1", 137),
        AmuIndiaLevel1 => ("AMU_INDIA_LEVEL_1", 138),
        AmuNorthAmericaLevel1 => ("AMU_NORTH_AMERICA_LEVEL_1", 139),
        AmuSouthAmericaLevel1 => ("AMU_SOUTH_AMERICA_LEVEL_1", 140),
        ArgentinaDepartamentos => ("ARGENTINA_DEPARTAMENTOS", 41),
        BrazilMesoregions => ("BRAZIL_MESOREGIONS", 39),
        BrazilMicroregions => ("BRAZIL_MICROREGIONS", 40),
        CanadaCensusDivisions => ("CANADA_CENSUS_DIVISIONS", 42),
        FraDepartements => ("FRA_DEPARTEMENTS", 25),
        FraRegions => ("FRA_REGIONS", 26),
        UsaCounties => ("USA_COUNTIES", 37),
        UsaStates => ("USA_STATES", 38),
    }
}

provider_codes! {
    /// Weather metrics available per block
    WeatherType {
        AverageTemperature => ("AVERAGE_TEMPERATURE", 1),
        CumulativePrecipitation => ("CUMULATIVE_PRECIPITATION", 2),
        MaxTemperature => ("MAX_TEMPERATURE", 3),
        MinTemperature => ("MIN_TEMPERATURE", 4),
        Precipitation => ("PRECIPITATION", 5),
        RelativeHumidity => ("RELATIVE_HUMIDITY", 6),
        SnowDepth => ("SNOW_DEPTH", 7),
        SoilMoisture => ("SOIL_MOISTURE", 8),
        SolarRadiation => ("SOLAR_RADIATION", 9),
        WindSpeed => ("WIND_SPEED", 10),
    }
}

provider_codes! {
    /// Commodity scopes for vegetation indices
    CommodityCode {
        AllVegetation => ("ALL_VEGETATION", 33),
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown {kind}: {code}")]
pub struct UnknownCode {
    pub kind: &'static str,
    pub code: String,
}
