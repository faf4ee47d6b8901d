//! Built-in planetary data set and derived statistics.
//!
//! Values come from NASA/IAU fact sheets. The Sun is carried as a catalog
//! entry (display order 0) so it can be rendered and selected like a planet,
//! but it is excluded from system statistics.

use bevy::prelude::*;

use crate::types::{PlanetData, PlanetType, parse_hex_color, round2};

/// Name of the central star entry.
pub const SUN: &str = "Sun";

/// Name of the reference planet for comparisons.
pub const EARTH: &str = "Earth";

/// Fallback text when no exploration summary is known.
pub const NO_EXPLORATION: &str = "Limited or no direct exploration";

/// Ordered collection of planet records.
#[derive(Resource, Clone, Debug)]
pub struct PlanetCatalog {
    planets: Vec<PlanetData>,
}

impl Default for PlanetCatalog {
    fn default() -> Self {
        Self::solar_system()
    }
}

/// Counts over the catalog, excluding the Sun.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SystemStats {
    pub total_planets: usize,
    pub terrestrial: usize,
    pub gas_giants: usize,
    pub ice_giants: usize,
    pub dwarf_planets: usize,
    pub total_moons: u32,
}

/// Ratios of a planet's properties to Earth's, rounded to two decimals.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EarthComparison {
    pub size_ratio: f64,
    /// `None` when the planet's mass is unknown.
    pub mass_ratio: Option<f64>,
    pub distance_ratio: f64,
    pub year_length_ratio: f64,
    pub day_length_ratio: f64,
}

impl PlanetCatalog {
    /// Build a catalog from arbitrary records, sorted by display order.
    ///
    /// Records failing validation are skipped with a warning.
    pub fn from_records(records: impl IntoIterator<Item = PlanetData>) -> Self {
        let mut planets: Vec<PlanetData> = records
            .into_iter()
            .filter(|planet| match planet.validate() {
                Ok(()) => true,
                Err(err) => {
                    warn!("Skipping planet record: {}", err);
                    false
                }
            })
            .collect();
        planets.sort_by_key(|p| p.display_order);
        Self { planets }
    }

    /// The Sun, eight planets and Pluto.
    pub fn solar_system() -> Self {
        Self::from_records(solar_system_records())
    }

    /// All records in display order.
    pub fn ordered(&self) -> &[PlanetData] {
        &self.planets
    }

    /// Look up a record by name.
    pub fn get(&self, name: &str) -> Option<&PlanetData> {
        self.planets.iter().find(|p| p.name == name)
    }

    /// Number of records (including the Sun).
    pub fn len(&self) -> usize {
        self.planets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.planets.is_empty()
    }

    /// Records of the given type, in display order, excluding the Sun.
    pub fn of_type(&self, planet_type: PlanetType) -> impl Iterator<Item = &PlanetData> {
        self.bodies().filter(move |p| p.planet_type == planet_type)
    }

    pub fn terrestrial(&self) -> Vec<&PlanetData> {
        self.of_type(PlanetType::Terrestrial).collect()
    }

    pub fn gas_giants(&self) -> Vec<&PlanetData> {
        self.of_type(PlanetType::GasGiant).collect()
    }

    pub fn ice_giants(&self) -> Vec<&PlanetData> {
        self.of_type(PlanetType::IceGiant).collect()
    }

    pub fn dwarf_planets(&self) -> Vec<&PlanetData> {
        self.bodies().filter(|p| p.is_dwarf_planet).collect()
    }

    /// Everything except the central star.
    pub fn bodies(&self) -> impl Iterator<Item = &PlanetData> {
        self.planets.iter().filter(|p| p.name != SUN)
    }

    /// Aggregate counts for the system overview.
    pub fn system_stats(&self) -> SystemStats {
        self.bodies().fold(SystemStats::default(), |mut stats, p| {
            stats.total_planets += 1;
            match p.planet_type {
                PlanetType::Terrestrial => stats.terrestrial += 1,
                PlanetType::GasGiant => stats.gas_giants += 1,
                PlanetType::IceGiant => stats.ice_giants += 1,
                PlanetType::DwarfPlanet => {}
            }
            if p.is_dwarf_planet {
                stats.dwarf_planets += 1;
            }
            stats.total_moons += p.moon_count;
            stats
        })
    }

    /// Compare a planet against Earth. `None` if Earth is not in the catalog.
    pub fn earth_comparison(&self, planet: &PlanetData) -> Option<EarthComparison> {
        let earth = self.get(EARTH)?;
        Some(EarthComparison {
            size_ratio: round2(planet.diameter / earth.diameter),
            mass_ratio: planet.mass,
            distance_ratio: round2(planet.distance_from_sun / earth.distance_from_sun),
            year_length_ratio: round2(planet.orbital_period / earth.orbital_period),
            day_length_ratio: round2(planet.rotation_period.abs() / earth.rotation_period),
        })
    }
}

/// Notable facts for the info panel.
pub fn fun_facts(name: &str) -> &'static [&'static str] {
    match name {
        "Mercury" => &[
            "Has the most extreme temperature variations in the solar system",
            "One day on Mercury lasts about 176 Earth days",
            "Has a very large iron core relative to its size",
        ],
        "Venus" => &[
            "Hottest planet in the solar system due to greenhouse effect",
            "Rotates backwards (retrograde rotation)",
            "Surface pressure is 90 times that of Earth",
        ],
        "Earth" => &[
            "The only known planet with life",
            "71% of surface is covered by water",
            "Has a strong magnetic field that protects from solar radiation",
        ],
        "Mars" => &[
            "Home to the largest volcano in the solar system (Olympus Mons)",
            "Has seasons similar to Earth due to axial tilt",
            "Evidence suggests it once had flowing water",
        ],
        "Jupiter" => &[
            "More massive than all other planets combined",
            "Great Red Spot is a storm larger than Earth",
            "Shields the inner planets by capturing comets and asteroids",
        ],
        "Saturn" => &[
            "Less dense than water - it would float!",
            "Ring system spans up to 282,000 km but only ~1 km thick",
            "Has a hexagonal storm at its north pole",
        ],
        "Uranus" => &[
            "Rotates on its side with 98° axial tilt",
            "Coldest planetary atmosphere in solar system",
            "Was the first planet discovered with a telescope",
        ],
        "Neptune" => &[
            "Has the strongest winds in the solar system (up to 2,100 km/h)",
            "Takes 165 Earth years to complete one orbit",
            "Its largest moon Triton orbits backwards",
        ],
        "Pluto" => &[
            "Reclassified as a dwarf planet in 2006",
            "Has a heart-shaped feature on its surface",
            "Its moon Charon is half the size of Pluto itself",
        ],
        _ => &[],
    }
}

/// Short history of missions to a body.
pub fn exploration_summary(name: &str) -> &'static str {
    match name {
        "Mercury" => "Visited by Mariner 10 and MESSENGER, BepiColombo mission ongoing",
        "Venus" => "Multiple Soviet Venera missions, Magellan orbiter, current: Akatsuki",
        "Earth" => "Continuously monitored by numerous satellites and space stations",
        "Mars" => "Multiple rovers including Curiosity and Perseverance, many orbiters",
        "Jupiter" => "Visited by Pioneer, Voyager, Galileo, Cassini, current: Juno",
        "Saturn" => "Visited by Pioneer, Voyager, Cassini mission (2004-2017)",
        "Uranus" => "Only visited by Voyager 2 in 1986",
        "Neptune" => "Only visited by Voyager 2 in 1989",
        "Pluto" => "Visited by New Horizons flyby mission in 2015",
        _ => NO_EXPLORATION,
    }
}

/// Compact row used to declare the built-in records.
struct Row {
    name: &'static str,
    order: u32,
    planet_type: PlanetType,
    distance: f64,
    diameter: f64,
    mass: f64,
    orbital_period: f64,
    eccentricity: f64,
    rotation_period: f64,
    axial_tilt: f64,
    composition: &'static str,
    atmosphere: &'static str,
    color: &'static str,
    albedo: f64,
    rings: bool,
    moons: u32,
}

impl Row {
    fn into_planet(self) -> PlanetData {
        let color = parse_hex_color(self.color).unwrap_or([0x88, 0x88, 0x88]);
        PlanetData {
            name: self.name.to_string(),
            display_order: self.order,
            planet_type: self.planet_type,
            distance_from_sun: self.distance,
            diameter: self.diameter,
            mass: Some(self.mass),
            orbital_period: self.orbital_period,
            orbital_eccentricity: self.eccentricity,
            rotation_period: self.rotation_period,
            axial_tilt: self.axial_tilt,
            composition: self.composition.to_string(),
            atmosphere: self.atmosphere.to_string(),
            color,
            albedo: self.albedo,
            is_dwarf_planet: self.planet_type == PlanetType::DwarfPlanet,
            has_rings: self.rings,
            has_moons: self.moons > 0,
            moon_count: self.moons,
        }
    }
}

fn solar_system_records() -> Vec<PlanetData> {
    use PlanetType::*;

    let rows = [
        Row {
            name: SUN,
            order: 0,
            planet_type: Terrestrial,
            distance: 0.0,
            diameter: 1_392_700.0,
            mass: 333_000.0,
            orbital_period: 0.0,
            eccentricity: 0.0,
            rotation_period: 609.12,
            axial_tilt: 7.25,
            composition: "Hydrogen (73%), Helium (25%), heavier elements (2%)",
            atmosphere: "Corona: extremely hot ionized gas",
            color: "#FDB813",
            albedo: 0.0,
            rings: false,
            moons: 0,
        },
        Row {
            name: "Mercury",
            order: 1,
            planet_type: Terrestrial,
            distance: 0.387,
            diameter: 4879.0,
            mass: 0.055,
            orbital_period: 87.97,
            eccentricity: 0.206,
            rotation_period: 1407.6,
            axial_tilt: 0.034,
            composition: "Iron core (75% of radius), thin silicate mantle, no atmosphere",
            atmosphere: "Extremely thin exosphere (oxygen, sodium, hydrogen, helium)",
            color: "#8C7853",
            albedo: 0.088,
            rings: false,
            moons: 0,
        },
        Row {
            name: "Venus",
            order: 2,
            planet_type: Terrestrial,
            distance: 0.723,
            diameter: 12104.0,
            mass: 0.815,
            orbital_period: 224.7,
            eccentricity: 0.007,
            rotation_period: -5832.5,
            axial_tilt: 177.4,
            composition: "Iron core, rocky mantle, thick atmosphere",
            atmosphere: "CO2 (96.5%), N2 (3.5%), extreme greenhouse effect",
            color: "#FC649F",
            albedo: 0.689,
            rings: false,
            moons: 0,
        },
        Row {
            name: EARTH,
            order: 3,
            planet_type: Terrestrial,
            distance: 1.0,
            diameter: 12756.0,
            mass: 1.0,
            orbital_period: 365.25,
            eccentricity: 0.017,
            rotation_period: 23.93,
            axial_tilt: 23.44,
            composition: "Iron-nickel core, silicate mantle and crust, 71% water surface",
            atmosphere: "N2 (78%), O2 (21%), Ar (0.93%), CO2 (0.04%)",
            color: "#4F94CD",
            albedo: 0.367,
            rings: false,
            moons: 1,
        },
        Row {
            name: "Mars",
            order: 4,
            planet_type: Terrestrial,
            distance: 1.524,
            diameter: 6792.0,
            mass: 0.107,
            orbital_period: 686.98,
            eccentricity: 0.094,
            rotation_period: 24.62,
            axial_tilt: 25.19,
            composition: "Iron core, basaltic mantle, iron oxide surface (rust)",
            atmosphere: "CO2 (95%), N2 (2.8%), Ar (2%), very thin",
            color: "#CD5C5C",
            albedo: 0.170,
            rings: false,
            moons: 2,
        },
        Row {
            name: "Jupiter",
            order: 5,
            planet_type: GasGiant,
            distance: 5.204,
            diameter: 142_984.0,
            mass: 317.8,
            orbital_period: 4332.59,
            eccentricity: 0.049,
            rotation_period: 9.93,
            axial_tilt: 3.13,
            composition: "Hydrogen (89%), Helium (10%), traces of methane, ammonia",
            atmosphere: "H2, He, CH4, NH3, complex storm systems",
            color: "#D2691E",
            albedo: 0.538,
            rings: true,
            moons: 95,
        },
        Row {
            name: "Saturn",
            order: 6,
            planet_type: GasGiant,
            distance: 9.537,
            diameter: 120_536.0,
            mass: 95.2,
            orbital_period: 10759.22,
            eccentricity: 0.057,
            rotation_period: 10.66,
            axial_tilt: 26.73,
            composition: "Hydrogen (96%), Helium (3%), traces of methane, ammonia",
            atmosphere: "H2, He, CH4, NH3, prominent ring system",
            color: "#FAD5A5",
            albedo: 0.499,
            rings: true,
            moons: 146,
        },
        Row {
            name: "Uranus",
            order: 7,
            planet_type: IceGiant,
            distance: 19.191,
            diameter: 51118.0,
            mass: 14.5,
            orbital_period: 30688.5,
            eccentricity: 0.046,
            rotation_period: -17.24,
            axial_tilt: 97.77,
            composition: "Water, methane, ammonia ices; hydrogen, helium atmosphere",
            atmosphere: "H2 (83%), He (15%), CH4 (2%), gives blue color",
            color: "#4FD0FF",
            albedo: 0.488,
            rings: true,
            moons: 28,
        },
        Row {
            name: "Neptune",
            order: 8,
            planet_type: IceGiant,
            distance: 30.069,
            diameter: 49528.0,
            mass: 17.1,
            orbital_period: 60182.0,
            eccentricity: 0.010,
            rotation_period: 16.11,
            axial_tilt: 28.32,
            composition: "Water, methane, ammonia ices; hydrogen, helium atmosphere",
            atmosphere: "H2 (80%), He (19%), CH4 (1%), strongest winds in solar system",
            color: "#4169E1",
            albedo: 0.442,
            rings: true,
            moons: 16,
        },
        Row {
            name: "Pluto",
            order: 9,
            planet_type: DwarfPlanet,
            distance: 39.482,
            diameter: 2376.0,
            mass: 0.00218,
            orbital_period: 90560.0,
            eccentricity: 0.244,
            rotation_period: -153.3,
            axial_tilt: 119.6,
            composition: "Rock and ice, nitrogen-methane atmosphere",
            atmosphere: "N2, CH4, CO, very thin",
            color: "#EEE8AA",
            albedo: 0.49,
            rings: false,
            moons: 5,
        },
    ];

    rows.into_iter().map(Row::into_planet).collect()
}
