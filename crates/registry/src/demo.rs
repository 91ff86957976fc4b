//! Built-in demo layer table, used when no registry file is supplied.
//!
//! A six-step tour from country scale down to a single coastal site, with
//! one marker hunt in the middle so proximity targeting is exercised out of
//! the box.

use std::collections::BTreeMap;

use foundation::geo::LatLng;

use crate::layer::{LayerDefinition, OverlayStyle, Visibility};
use crate::registry::LayerRegistry;

fn layer(
    pannable: bool,
    viewport_zoom: f64,
    spin: &str,
    tilt: &str,
    image_sequence_index: Option<u32>,
    show_labels: bool,
    visibility: &[(&str, Visibility)],
) -> LayerDefinition {
    LayerDefinition {
        pannable,
        viewport_zoom,
        spin_instruction: spin.to_string(),
        tilt_instruction: tilt.to_string(),
        image_sequence_index,
        show_labels,
        visibility: visibility
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect::<BTreeMap<_, _>>(),
    }
}

pub fn demo_registry() -> LayerRegistry {
    let layers = vec![
        layer(
            false,
            4.0,
            "Spin clockwise to get a closer look",
            "",
            None,
            false,
            &[("Mexico", Visibility::RegionOverlay)],
        ),
        layer(
            false,
            5.0,
            "Spin clockwise to zoom in",
            "",
            None,
            true,
            &[
                ("Mexico", Visibility::RegionOverlay),
                ("Sinaloa", Visibility::RegionOverlay),
            ],
        ),
        layer(
            true,
            7.0,
            "Spin clockwise to view the hotspot",
            "Tilt the table to hunt for the hotspot",
            Some(1),
            true,
            &[("Sinaloa", Visibility::MarkerReference("site5".to_string()))],
        ),
        layer(
            true,
            9.0,
            "Spin clockwise to get closer still",
            "Tilt the table to move around",
            Some(1),
            false,
            &[("Sinaloa", Visibility::MarkerReference("site5".to_string()))],
        ),
        layer(
            false,
            12.0,
            "Spin clockwise for a closer look",
            "",
            Some(2),
            false,
            &[("site5", Visibility::CardHotspot)],
        ),
        layer(
            true,
            15.0,
            "Spin counter-clockwise to zoom back out",
            "Tilt the table to explore the site",
            Some(3),
            false,
            &[("site5", Visibility::CardHotspot)],
        ),
    ];

    let mut hotspots = BTreeMap::new();
    hotspots.insert("site1".to_string(), LatLng::new(19.4326077, -99.133208));
    hotspots.insert("site5".to_string(), LatLng::new(25.1721091, -107.4795173));

    let mut overlay_styles = BTreeMap::new();
    overlay_styles.insert(
        "Mexico".to_string(),
        OverlayStyle {
            fill_color: "white".to_string(),
            stroke_weight: 1.0,
        },
    );
    overlay_styles.insert(
        "Sinaloa".to_string(),
        OverlayStyle {
            fill_color: "#ddddff".to_string(),
            stroke_weight: 1.0,
        },
    );

    LayerRegistry::from_parts(layers, hotspots, overlay_styles)
        .expect("demo table is non-empty")
}
