//! Text content for the tooltip and info panel.
//!
//! Planet records may come from anywhere, so every numeric field is
//! rendered defensively: non-finite values show as "Unknown" instead of
//! `NaN` or panicking.

use crate::catalog::{self, EarthComparison, PlanetCatalog};
use crate::types::PlanetData;

/// Placeholder for values that cannot be displayed.
pub const UNKNOWN: &str = "Unknown";

/// Format a number with thousands separators and fixed decimals.
pub fn format_number(value: f64, decimals: usize) -> String {
    if !value.is_finite() {
        return UNKNOWN.to_string();
    }

    let formatted = format!("{:.*}", decimals, value.abs());
    let (integer, fraction) = match formatted.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (formatted.as_str(), None),
    };

    let mut grouped = String::with_capacity(integer.len() + integer.len() / 3);
    for (i, digit) in integer.chars().enumerate() {
        if i > 0 && (integer.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let sign = if value < 0.0 && formatted.chars().any(|c| c != '0' && c != '.') {
        "-"
    } else {
        ""
    };
    match fraction {
        Some(f) => format!("{sign}{grouped}.{f}"),
        None => format!("{sign}{grouped}"),
    }
}

/// Format with a unit suffix, or "Unknown".
pub fn with_unit(value: f64, decimals: usize, unit: &str) -> String {
    if value.is_finite() {
        format!("{} {}", format_number(value, decimals), unit)
    } else {
        UNKNOWN.to_string()
    }
}

pub fn format_distance_au(au: f64) -> String {
    with_unit(au, 2, "AU")
}

pub fn format_diameter(km: f64) -> String {
    with_unit(km, 0, "km")
}

pub fn format_mass(mass: Option<f64>) -> String {
    match mass {
        Some(m) if m.is_finite() => format!("{} × Earth", format_number(m, 3)),
        _ => UNKNOWN.to_string(),
    }
}

/// Orbital period in days.
pub fn format_year_length(planet: &PlanetData) -> String {
    let days = planet.orbital_period;
    if !days.is_finite() {
        return UNKNOWN.to_string();
    }
    if days <= 0.0 {
        return "Does not orbit".to_string();
    }
    let decimals = if days >= 730.0 { 0 } else { 2 };
    format!("{} days", format_number(days, decimals))
}

/// Orbital period in Earth years.
pub fn format_period_years(planet: &PlanetData) -> String {
    if !(planet.orbital_period.is_finite() && planet.orbital_period > 0.0) {
        return if planet.orbital_period.is_finite() {
            "Does not orbit".to_string()
        } else {
            UNKNOWN.to_string()
        };
    }
    with_unit(planet.orbital_period_years(), 2, "Earth years")
}

/// Rotation period in hours, or days for slow rotators; negative periods
/// are marked retrograde.
pub fn format_day_length(planet: &PlanetData) -> String {
    let hours = planet.rotation_period;
    if !hours.is_finite() {
        return UNKNOWN.to_string();
    }
    let base = if hours.abs() >= 48.0 {
        format!("{} days", format_number(planet.rotation_period_days().abs(), 1))
    } else {
        format!("{} hours", format_number(hours.abs(), 2))
    };
    if hours < 0.0 {
        format!("{base} (retrograde)")
    } else {
        base
    }
}

pub fn format_moons(planet: &PlanetData) -> String {
    if planet.has_moons || planet.moon_count > 0 {
        planet.moon_count.to_string()
    } else {
        "None".to_string()
    }
}

/// Short lines shown under the planet name in the hover tooltip.
pub fn tooltip_lines(planet: &PlanetData) -> Vec<String> {
    vec![
        planet.planet_type.label().to_string(),
        format!("Distance: {}", format_distance_au(planet.distance_from_sun)),
        format!("Diameter: {}", format_diameter(planet.diameter)),
    ]
}

/// Display name, falling back to "Unknown" for blank names.
pub fn display_name(planet: &PlanetData) -> &str {
    if planet.name.trim().is_empty() {
        UNKNOWN
    } else {
        &planet.name
    }
}

/// Labelled rows describing a planet.
#[derive(Clone, Debug, PartialEq)]
pub struct PlanetSummary {
    pub title: String,
    pub rows: Vec<(&'static str, String)>,
    pub composition: Option<String>,
    pub atmosphere: Option<String>,
}

impl From<&PlanetData> for PlanetSummary {
    fn from(planet: &PlanetData) -> Self {
        let non_empty = |s: &str| (!s.trim().is_empty()).then(|| s.to_string());
        Self {
            title: display_name(planet).to_string(),
            rows: vec![
                ("Type", planet.planet_type.label().to_string()),
                ("Distance from Sun", format_distance_au(planet.distance_from_sun)),
                ("Diameter", format_diameter(planet.diameter)),
                ("Relative diameter", with_unit(planet.diameter_earth_relative(), 2, "× Earth")),
                ("Mass", format_mass(planet.mass)),
                ("Year length", format_year_length(planet)),
                ("Orbital period", format_period_years(planet)),
                ("Day length", format_day_length(planet)),
                ("Axial tilt", with_unit(planet.axial_tilt, 1, "°")),
                ("Moons", format_moons(planet)),
                ("Rings", if planet.has_rings { "Yes" } else { "No" }.to_string()),
            ],
            composition: non_empty(&planet.composition),
            atmosphere: non_empty(&planet.atmosphere),
        }
    }
}

/// Earth comparison rows, e.g. `("Size", "0.95× Earth")`.
pub fn comparison_rows(cmp: &EarthComparison) -> Vec<(&'static str, String)> {
    let ratio = |v: f64| {
        if v.is_finite() {
            format!("{}×", format_number(v, 2))
        } else {
            UNKNOWN.to_string()
        }
    };
    vec![
        ("Size", ratio(cmp.size_ratio)),
        ("Mass", cmp.mass_ratio.map_or_else(|| UNKNOWN.to_string(), ratio)),
        ("Distance", ratio(cmp.distance_ratio)),
        ("Year", ratio(cmp.year_length_ratio)),
        ("Day", ratio(cmp.day_length_ratio)),
    ]
}

/// Everything the info panel renders for one planet.
#[derive(Clone, Debug, PartialEq)]
pub struct InfoContent {
    pub summary: PlanetSummary,
    pub comparison: Vec<(&'static str, String)>,
    pub facts: Vec<&'static str>,
    pub exploration: &'static str,
}

impl InfoContent {
    pub fn build(planet: &PlanetData, catalog: &PlanetCatalog) -> Self {
        let comparison = if planet.name == catalog::EARTH || planet.name == catalog::SUN {
            Vec::new()
        } else {
            catalog
                .earth_comparison(planet)
                .map(|cmp| comparison_rows(&cmp))
                .unwrap_or_default()
        };
        Self {
            summary: PlanetSummary::from(planet),
            comparison,
            facts: catalog::fun_facts(&planet.name).to_vec(),
            exploration: catalog::exploration_summary(&planet.name),
        }
    }
}
