//! Catalog records as they reach the scene, the camera and the info panel.

use orrery::camera::{MIN_FOLLOW_DISTANCE, follow_distance_for};
use orrery::catalog::{PlanetCatalog, SUN};
use orrery::info::{InfoContent, tooltip_lines};
use orrery::render::PlanetBody;
use orrery::render::bodies::{MIN_PLANET_RADIUS, SUN_RADIUS};

#[test]
fn test_every_body_renders_with_a_pickable_sphere() {
    let catalog = PlanetCatalog::solar_system();
    for planet in catalog.ordered() {
        let body = PlanetBody::from_data(planet);
        assert!(body.radius >= MIN_PLANET_RADIUS, "{} too small", planet.name);
        assert!(body.radius.is_finite());
        if planet.name == SUN {
            assert_eq!(body.radius, SUN_RADIUS);
            assert_eq!(body.orbit_radius, 0.0);
        } else {
            assert!(
                body.orbit_radius > SUN_RADIUS,
                "{} orbits inside the Sun",
                planet.name
            );
        }
    }
}

#[test]
fn test_orbits_grow_with_display_order() {
    let catalog = PlanetCatalog::solar_system();
    let radii: Vec<f32> = catalog
        .bodies()
        .map(|p| PlanetBody::from_data(p).orbit_radius)
        .collect();
    assert!(radii.windows(2).all(|w| w[0] < w[1]), "radii {radii:?}");
}

#[test]
fn test_follow_distance_scales_with_planet_size() {
    let catalog = PlanetCatalog::solar_system();
    let jupiter = follow_distance_for(catalog.get("Jupiter").unwrap());
    let earth = follow_distance_for(catalog.get("Earth").unwrap());
    let pluto = follow_distance_for(catalog.get("Pluto").unwrap());
    assert!(jupiter > earth);
    assert!(earth >= pluto);
    assert!(pluto >= MIN_FOLLOW_DISTANCE);
}

#[test]
fn test_info_text_is_complete_for_every_body() {
    let catalog = PlanetCatalog::solar_system();
    for planet in catalog.ordered() {
        let content = InfoContent::build(planet, &catalog);
        assert_eq!(content.summary.title, planet.name);
        assert!(!content.exploration.is_empty());

        let text: Vec<&str> = content
            .summary
            .rows
            .iter()
            .map(|(_, v)| v.as_str())
            .chain(content.comparison.iter().map(|(_, v)| v.as_str()))
            .collect();
        for value in text {
            assert!(!value.contains("NaN"), "{}: {value}", planet.name);
        }

        let lines = tooltip_lines(planet);
        assert_eq!(lines.len(), 3);
        assert!(lines[1].starts_with("Distance: "));
    }
}
