//! Response structures for the stats provider endpoints.
//!
//! This module contains structures for deserializing JSON responses from
//! a disease.sh compatible API.

use serde::{Deserialize, Deserializer};
use std::fmt;

/// Statistics of a country from `/countries/{country}`, or of the whole world
/// from `/all`.
///
/// Every numeric field is optional: a missing, `null` or non-numeric value is
/// `None` and is displayed as zero.
#[derive(Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CountryStats {
    /// Name of the country, absent for the `/all` endpoint.
    #[serde(default)]
    pub country: Option<String>,
    /// Population of the country.
    #[serde(default, deserialize_with = "lenient_count")]
    pub population: Option<i64>,
    /// Currently infected people.
    #[serde(default, deserialize_with = "lenient_count")]
    pub active: Option<i64>,
    /// People in critical condition.
    #[serde(default, deserialize_with = "lenient_count")]
    pub critical: Option<i64>,
    /// Recovered people.
    #[serde(default, deserialize_with = "lenient_count")]
    pub recovered: Option<i64>,
    /// Cumulative number of cases.
    #[serde(default, deserialize_with = "lenient_count")]
    pub cases: Option<i64>,
    /// Cumulative number of deaths.
    #[serde(default, deserialize_with = "lenient_count")]
    pub deaths: Option<i64>,
    /// Cumulative number of tests.
    #[serde(default, deserialize_with = "lenient_count")]
    pub tests: Option<i64>,
}

impl fmt::Display for CountryStats {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "country={:?}, population={:?}, active={:?}, critical={:?}, recovered={:?}, cases={:?}, deaths={:?}, tests={:?}",
            self.country,
            self.population,
            self.active,
            self.critical,
            self.recovered,
            self.cases,
            self.deaths,
            self.tests
        )
    }
}

/// One element of the `/countries` list.
///
/// The endpoint returns full statistics for every country but only the name
/// is needed to build the selection menus.
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct CountryListing {
    /// Name of the country, as accepted by `/countries/{country}`.
    pub country: String,
}

impl fmt::Display for CountryListing {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "country={}", self.country)
    }
}

/// Accepts integers and floats (rounded), anything else is `None`.
fn lenient_count<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f.round() as i64)),
        _ => None,
    })
}
