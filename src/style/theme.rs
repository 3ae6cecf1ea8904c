use std::fmt::{Debug, Display, Formatter};
use std::str::FromStr;

use serde::{de, Deserialize, Deserializer};

use crate::style::paint::CongestionRamp;

/// 8-bit RGBA colour, written and parsed as `#rrggbb` / `#rrggbbaa`.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Color { r, g, b, a: 0xff }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Color { r, g, b, a }
    }
}

impl Display for Color {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if self.a == 0xff {
            write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            write!(
                f,
                "#{:02x}{:02x}{:02x}{:02x}",
                self.r, self.g, self.b, self.a
            )
        }
    }
}

impl Debug for Color {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        Display::fmt(self, f)
    }
}

impl FromStr for Color {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let hex = value.strip_prefix('#').unwrap_or(value);
        if hex.len() != 6 && hex.len() != 8 {
            return Err(format!("expected #rrggbb or #rrggbbaa, given: {value}"));
        }

        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&hex[range], 16)
                .map_err(|err| format!("invalid colour {value}: {err}"))
        };

        Ok(Color {
            r: channel(0..2)?,
            g: channel(2..4)?,
            b: channel(4..6)?,
            a: if hex.len() == 8 { channel(6..8)? } else { 0xff },
        })
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Color::from_str(&raw).map_err(de::Error::custom)
    }
}

/// The recognised visual options for route rendering.
///
/// Construct with [`RouteTheme::default`] and override fields, or
/// deserialise a partial document; missing fields keep their defaults.
/// The icon fields name images the host application has registered with
/// its map style.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct RouteTheme {
    /// Primary route colour for free-flowing traffic. Default `#3887be`.
    pub route_default_color: Color,
    /// Primary route colour under moderate congestion. Default `#ff9500`.
    pub route_moderate_color: Color,
    /// Primary route colour under heavy or severe congestion. Default `#f04a4a`.
    pub route_severe_color: Color,
    /// Primary shield underlay colour. Default `#2a5f8a`.
    pub route_shield_color: Color,
    /// Width scale factor applied to the primary route. Default `1.0`.
    pub route_scale: f64,

    /// Alternative route colour for free-flowing traffic. Default `#8c96a0`.
    pub alternative_default_color: Color,
    /// Alternative route colour under moderate congestion. Default `#bea087`.
    pub alternative_moderate_color: Color,
    /// Alternative route colour under heavy or severe congestion. Default `#b08080`.
    pub alternative_severe_color: Color,
    /// Alternative shield underlay colour. Default `#667180`.
    pub alternative_shield_color: Color,
    /// Width scale factor applied to alternative routes. Default `1.0`.
    pub alternative_scale: f64,

    /// Maneuver arrow fill. Default `#ffffff`. Consumed by a host-side
    /// arrow overlay; this crate only carries the option.
    pub arrow_color: Color,
    /// Maneuver arrow border. Default `#2d3f53`.
    pub arrow_border_color: Color,

    /// Image name for the origin waypoint marker. Default `route-origin-icon`.
    pub origin_icon: String,
    /// Image name for the destination waypoint marker. Default `route-destination-icon`.
    pub destination_icon: String,
}

impl Default for RouteTheme {
    fn default() -> Self {
        RouteTheme {
            route_default_color: Color::rgb(0x38, 0x87, 0xbe),
            route_moderate_color: Color::rgb(0xff, 0x95, 0x00),
            route_severe_color: Color::rgb(0xf0, 0x4a, 0x4a),
            route_shield_color: Color::rgb(0x2a, 0x5f, 0x8a),
            route_scale: 1.0,
            alternative_default_color: Color::rgb(0x8c, 0x96, 0xa0),
            alternative_moderate_color: Color::rgb(0xbe, 0xa0, 0x87),
            alternative_severe_color: Color::rgb(0xb0, 0x80, 0x80),
            alternative_shield_color: Color::rgb(0x66, 0x71, 0x80),
            alternative_scale: 1.0,
            arrow_color: Color::rgb(0xff, 0xff, 0xff),
            arrow_border_color: Color::rgb(0x2d, 0x3f, 0x53),
            origin_icon: String::from("route-origin-icon"),
            destination_icon: String::from("route-destination-icon"),
        }
    }
}

impl RouteTheme {
    /// Congestion colour ramp for a route in the given role.
    pub fn ramp(&self, primary: bool) -> CongestionRamp {
        if primary {
            CongestionRamp {
                default: self.route_default_color,
                moderate: self.route_moderate_color,
                severe: self.route_severe_color,
            }
        } else {
            CongestionRamp {
                default: self.alternative_default_color,
                moderate: self.alternative_moderate_color,
                severe: self.alternative_severe_color,
            }
        }
    }

    pub fn shield_color(&self, primary: bool) -> Color {
        if primary {
            self.route_shield_color
        } else {
            self.alternative_shield_color
        }
    }

    pub fn scale(&self, primary: bool) -> f64 {
        if primary {
            self.route_scale
        } else {
            self.alternative_scale
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_hex_forms() {
        assert_eq!(Color::from_str("#3887be"), Ok(Color::rgb(0x38, 0x87, 0xbe)));
        assert_eq!(
            Color::from_str("3887be80"),
            Ok(Color::rgba(0x38, 0x87, 0xbe, 0x80))
        );
        assert!(Color::from_str("#38").is_err());
        assert!(Color::from_str("#zzzzzz").is_err());
    }

    #[test]
    fn displays_shortest_form() {
        assert_eq!(Color::rgb(0x38, 0x87, 0xbe).to_string(), "#3887be");
        assert_eq!(
            Color::rgba(0x38, 0x87, 0xbe, 0x80).to_string(),
            "#3887be80"
        );
    }

    #[test]
    fn partial_theme_keeps_defaults() {
        let theme: RouteTheme =
            serde_json::from_str(r##"{ "route_default_color": "#112233" }"##).expect("deserialises");

        assert_eq!(theme.route_default_color, Color::rgb(0x11, 0x22, 0x33));
        assert_eq!(theme, RouteTheme {
            route_default_color: Color::rgb(0x11, 0x22, 0x33),
            ..Default::default()
        });
    }

    #[test]
    fn role_lookup_matches_fields() {
        let theme = RouteTheme::default();
        assert_eq!(theme.shield_color(true), theme.route_shield_color);
        assert_eq!(
            theme.ramp(false).moderate,
            theme.alternative_moderate_color
        );
    }
}
