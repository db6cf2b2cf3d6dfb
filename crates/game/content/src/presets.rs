//! Built-in world layout.
//!
//! Three towns joined by roads, a dungeon in the south-east, and wilderness
//! everywhere else. Every town carries one portal at its centre. Coordinates
//! are expressed as fractions of the world size so the layout scales with
//! [`WorldConfig`] dimensions.

use game_core::{Portal, Position, WorldConfig, WorldLayout, Zone, ZoneKind};

struct TownSpec {
    name: &'static str,
    theme: &'static str,
    // Fractions of world width/height.
    x: f64,
    y: f64,
}

const TOWNS: [TownSpec; 3] = [
    TownSpec {
        name: "Westhold",
        theme: "stone",
        x: 0.10,
        y: 0.40,
    },
    TownSpec {
        name: "Eastgate",
        theme: "harbor",
        x: 0.75,
        y: 0.40,
    },
    TownSpec {
        name: "Northreach",
        theme: "snow",
        x: 0.425,
        y: 0.05,
    },
];

const TOWN_SIZE: f64 = 0.15;
const ROAD_WIDTH: f64 = 0.04;

/// Default zones and portals for a world of the given size.
pub fn builtin_layout(config: &WorldConfig) -> WorldLayout {
    let (w, h) = (config.width, config.height);
    let mut zones = Vec::new();
    let mut portals = Vec::new();

    for (idx, town) in TOWNS.iter().enumerate() {
        let zone = Zone::new(
            town.x * w,
            town.y * h,
            TOWN_SIZE * w,
            TOWN_SIZE * h,
            ZoneKind::Town,
            town.theme,
        );
        let Position { x, y } = zone.center();
        portals.push(Portal::new(
            idx as u32 + 1,
            format!("{} Portal", town.name),
            town.name,
            Position::new(x, y),
        ));
        zones.push(zone);
    }

    // East-west road between the two southern towns.
    zones.push(Zone::new(
        (0.10 + TOWN_SIZE) * w,
        (0.40 + TOWN_SIZE / 2.0 - ROAD_WIDTH / 2.0) * h,
        (0.75 - 0.10 - TOWN_SIZE) * w,
        ROAD_WIDTH * h,
        ZoneKind::Road,
        "cobble",
    ));
    // North-south road from Northreach down to the east-west road.
    zones.push(Zone::new(
        (0.5 - ROAD_WIDTH / 2.0) * w,
        (0.05 + TOWN_SIZE) * h,
        ROAD_WIDTH * w,
        (0.40 + TOWN_SIZE / 2.0 - 0.05 - TOWN_SIZE) * h,
        ZoneKind::Road,
        "dirt",
    ));

    zones.push(Zone::new(
        0.70 * w,
        0.75 * h,
        0.25 * w,
        0.20 * h,
        ZoneKind::Dungeon,
        "crypt",
    ));

    // Fallback for everything not covered above.
    zones.push(Zone::new(0.0, 0.0, w, h, ZoneKind::Wilderness, "forest"));

    WorldLayout { zones, portals }
}
