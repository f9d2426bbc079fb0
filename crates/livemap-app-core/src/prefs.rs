// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Map presentation preferences (zoom, padding, icons, tiles, popup styling).

use livemap_surface_port::{IconDef, IconKind, LineStyle, Padding, PopupOptions};
use serde::{Deserialize, Serialize};

/// Saved preferences for one map surface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapPrefs {
    /// Zoom used when centering on the destination.
    pub default_zoom: u8,
    /// Padding kept around a fitted bound, `[x, y]` pixels.
    pub fit_padding: [u32; 2],
    /// Tile layer settings, passed through to the host.
    pub tiles: TilePrefs,
    /// Destination pin icon.
    pub location_icon: IconPrefs,
    /// Vehicle icon.
    pub vehicle_icon: IconPrefs,
    /// Route line styling.
    pub route_line: LinePrefs,
    /// Status popup styling.
    pub popup: PopupPrefs,
}

impl Default for MapPrefs {
    fn default() -> Self {
        Self {
            default_zoom: 17,
            fit_padding: [48, 48],
            tiles: TilePrefs::default(),
            location_icon: IconPrefs::default(),
            vehicle_icon: IconPrefs::default(),
            route_line: LinePrefs::default(),
            popup: PopupPrefs::default(),
        }
    }
}

impl MapPrefs {
    /// Padding for bound fitting.
    pub fn padding(&self) -> Padding {
        Padding {
            x: self.fit_padding[0],
            y: self.fit_padding[1],
        }
    }

    /// Icon for the destination pin.
    pub fn location_icon_def(&self) -> IconDef {
        self.location_icon.to_def(IconKind::Location)
    }

    /// Icon for the vehicle marker.
    pub fn vehicle_icon_def(&self) -> IconDef {
        self.vehicle_icon.to_def(IconKind::Vehicle)
    }

    /// Style for the route line.
    pub fn line_style(&self) -> LineStyle {
        LineStyle {
            color: self.route_line.color.clone(),
            interactive: self.route_line.interactive,
        }
    }

    /// Options for the status popup. Dismissal behaviours are always off.
    pub fn popup_options(&self) -> PopupOptions {
        PopupOptions {
            offset: self.popup.offset,
            max_width: self.popup.max_width,
            class_name: self.popup.class_name.clone(),
            ..PopupOptions::default()
        }
    }
}

/// Raster tile source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TilePrefs {
    /// URL template with `{z}`, `{x}` and `{y}` placeholders.
    pub url_template: String,
    /// Lowest zoom the tile set serves.
    pub min_zoom: u8,
    /// Highest zoom the tile set serves.
    pub max_zoom: u8,
    /// Attribution HTML.
    pub attribution: String,
}

impl Default for TilePrefs {
    fn default() -> Self {
        Self {
            url_template: "https://cdn.mbta.com/osm_tiles/{z}/{x}/{y}.png".into(),
            min_zoom: 9,
            max_zoom: 18,
            attribution:
                "&copy; <a href=\"https://www.openstreetmap.org/copyright\">OpenStreetMap</a>"
                    .into(),
        }
    }
}

impl TilePrefs {
    /// Clamp a requested zoom into the served range.
    pub fn clamp_zoom(&self, zoom: u8) -> u8 {
        zoom.clamp(self.min_zoom, self.max_zoom.max(self.min_zoom))
    }
}

/// Icon image and geometry overrides.
///
/// Unset geometry falls back to the icon kind's own size: 30 px for the
/// destination pin and 40 px for the vehicle, each anchored at its centre.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IconPrefs {
    /// Image source; hosts usually fill this from the page.
    pub url: Option<String>,
    /// Size `[width, height]` in pixels.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<[u32; 2]>,
    /// Anchor pixel within the image.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub anchor: Option<[u32; 2]>,
}

impl IconPrefs {
    fn to_def(&self, kind: IconKind) -> IconDef {
        let side = match kind {
            IconKind::Location => 30,
            IconKind::Vehicle => 40,
        };
        let size = self.size.unwrap_or([side, side]);
        IconDef {
            kind,
            url: self.url.clone(),
            size,
            anchor: self.anchor.unwrap_or([size[0] / 2, size[1] / 2]),
        }
    }
}

/// Route line styling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LinePrefs {
    /// CSS color.
    pub color: String,
    /// Accept pointer events.
    pub interactive: bool,
}

impl Default for LinePrefs {
    fn default() -> Self {
        let style = LineStyle::default();
        Self {
            color: style.color,
            interactive: style.interactive,
        }
    }
}

/// Status popup styling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PopupPrefs {
    /// Pixel offset from the destination pin.
    pub offset: [i32; 2],
    /// Maximum width in pixels.
    pub max_width: u32,
    /// CSS class name.
    pub class_name: String,
}

impl Default for PopupPrefs {
    fn default() -> Self {
        let options = PopupOptions::default();
        Self {
            offset: options.offset,
            max_width: options.max_width,
            class_name: options.class_name,
        }
    }
}
