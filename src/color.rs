//! Color ramp resolution shared by the chart builders and the geo layer.
//!
//! A ramp is either an explicit ordered list of colors (passed through as
//! normalized hex) or a named continuous scale sampled at N evenly spaced
//! points. Scale names accept a `_r` suffix for the reversed ramp.

use crate::error::{ChartError, Result};

/// Declarative color ramp request.
#[derive(Debug, Clone, PartialEq)]
pub enum ColorSpec {
    /// Explicit ordered colors, returned verbatim (normalized to
    /// lowercase `#rrggbb`).
    List(Vec<String>),
    /// A named continuous scale sampled at `steps` evenly spaced points.
    Named { name: String, steps: usize },
}

impl ColorSpec {
    pub fn named(name: impl Into<String>, steps: usize) -> Self {
        ColorSpec::Named {
            name: name.into(),
            steps,
        }
    }

    pub fn list<S: Into<String>>(colors: impl IntoIterator<Item = S>) -> Self {
        ColorSpec::List(colors.into_iter().map(Into::into).collect())
    }
}

/// Resolve a ramp to hex strings.
///
/// - `List`: every entry must parse as a color; output length equals input
///   length regardless of any step count.
/// - `Named`: output length equals `steps`.
///
/// Anything else fails with `InvalidColorSpec`.
pub fn resolve_ramp(spec: &ColorSpec) -> Result<Vec<String>> {
    match spec {
        ColorSpec::List(colors) => {
            if colors.is_empty() {
                return Err(ChartError::InvalidColorSpec("empty color list".into()));
            }
            colors
                .iter()
                .map(|c| parse_hex(c).map(|rgb| to_hex(rgb)))
                .collect()
        }
        ColorSpec::Named { name, steps } => {
            if *steps == 0 {
                return Err(ChartError::InvalidColorSpec(
                    "step count must be at least 1".into(),
                ));
            }
            let anchors = scale_anchors(name)
                .ok_or_else(|| ChartError::InvalidColorSpec(format!("unknown scale {name:?}")))?;
            Ok((0..*steps)
                .map(|i| {
                    let t = if *steps == 1 {
                        0.0
                    } else {
                        i as f64 / (*steps - 1) as f64
                    };
                    to_hex(sample_anchors(&anchors, t))
                })
                .collect())
        }
    }
}

/// Lighten a hex color by interpolating its HLS lightness toward white.
/// `fraction` 0 is unchanged, 1 is full white.
pub fn lighten_hex(hex: &str, fraction: f64) -> Result<String> {
    let (r, g, b) = parse_hex(hex)?;
    let (h, l, s) = rgb_to_hls(r as f64 / 255.0, g as f64 / 255.0, b as f64 / 255.0);
    let l = (l + fraction.clamp(0.0, 1.0) * (1.0 - l)).min(1.0);
    let (nr, ng, nb) = hls_to_rgb(h, l, s);
    Ok(to_hex((
        (nr * 255.0).round() as u8,
        (ng * 255.0).round() as u8,
        (nb * 255.0).round() as u8,
    )))
}

/// Parse `#rrggbb`, `rrggbb`, or the short `#rgb` form.
pub(crate) fn parse_hex(color: &str) -> Result<(u8, u8, u8)> {
    let s = color.trim().trim_start_matches('#');
    let err = || ChartError::InvalidColorSpec(format!("not a hex color: {color:?}"));
    match s.len() {
        6 => {
            let r = u8::from_str_radix(&s[0..2], 16).map_err(|_| err())?;
            let g = u8::from_str_radix(&s[2..4], 16).map_err(|_| err())?;
            let b = u8::from_str_radix(&s[4..6], 16).map_err(|_| err())?;
            Ok((r, g, b))
        }
        3 => {
            let d = |i: usize| u8::from_str_radix(&s[i..i + 1], 16).map_err(|_| err());
            let (r, g, b) = (d(0)?, d(1)?, d(2)?);
            Ok((r * 17, g * 17, b * 17))
        }
        _ => Err(err()),
    }
}

pub(crate) fn to_hex((r, g, b): (u8, u8, u8)) -> String {
    format!("#{r:02x}{g:02x}{b:02x}")
}

/// Anchor stops for the built-in continuous scales, dark-to-light ordering
/// as published by their sources. `_r` reverses.
fn scale_anchors(name: &str) -> Option<Vec<(u8, u8, u8)>> {
    let (base, reversed) = match name.strip_suffix("_r") {
        Some(base) => (base, true),
        None => (name, false),
    };
    let hexes: &[&str] = match base.to_ascii_lowercase().as_str() {
        "viridis" => &[
            "#440154", "#46327e", "#365c8d", "#277f8e", "#1fa187", "#4ac16d", "#a0da39", "#fde725",
        ],
        "plasma" => &[
            "#0d0887", "#6a00a8", "#b12a90", "#e16462", "#fca636", "#f0f921",
        ],
        "magma" => &[
            "#000004", "#3b0f70", "#8c2981", "#de4968", "#fe9f6d", "#fcfdbf",
        ],
        "summer" => &["#008066", "#ffff66"],
        "autumn" => &["#ff0000", "#ffff00"],
        "winter" => &["#0000ff", "#00ff80"],
        "spring" => &["#ff00ff", "#ffff00"],
        "cool" => &["#00ffff", "#ff00ff"],
        "coolwarm" => &["#3b4cc0", "#dddddd", "#b40426"],
        "greys" | "grays" => &["#ffffff", "#000000"],
        _ => return None,
    };
    let mut anchors: Vec<(u8, u8, u8)> = hexes
        .iter()
        .map(|h| parse_hex(h).expect("built-in anchor"))
        .collect();
    if reversed {
        anchors.reverse();
    }
    Some(anchors)
}

fn sample_anchors(anchors: &[(u8, u8, u8)], t: f64) -> (u8, u8, u8) {
    if anchors.len() == 1 {
        return anchors[0];
    }
    let pos = t.clamp(0.0, 1.0) * (anchors.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = (lo + 1).min(anchors.len() - 1);
    let frac = pos - lo as f64;
    let lerp = |a: u8, b: u8| (a as f64 + (b as f64 - a as f64) * frac).round() as u8;
    (
        lerp(anchors[lo].0, anchors[hi].0),
        lerp(anchors[lo].1, anchors[hi].1),
        lerp(anchors[lo].2, anchors[hi].2),
    )
}

fn rgb_to_hls(r: f64, g: f64, b: f64) -> (f64, f64, f64) {
    let maxc = r.max(g).max(b);
    let minc = r.min(g).min(b);
    let l = (minc + maxc) / 2.0;
    if (maxc - minc).abs() < f64::EPSILON {
        return (0.0, l, 0.0);
    }
    let delta = maxc - minc;
    let s = if l <= 0.5 {
        delta / (maxc + minc)
    } else {
        delta / (2.0 - maxc - minc)
    };
    let rc = (maxc - r) / delta;
    let gc = (maxc - g) / delta;
    let bc = (maxc - b) / delta;
    let h = if (r - maxc).abs() < f64::EPSILON {
        bc - gc
    } else if (g - maxc).abs() < f64::EPSILON {
        2.0 + rc - bc
    } else {
        4.0 + gc - rc
    };
    ((h / 6.0).rem_euclid(1.0), l, s)
}

fn hls_to_rgb(h: f64, l: f64, s: f64) -> (f64, f64, f64) {
    if s == 0.0 {
        return (l, l, l);
    }
    let m2 = if l <= 0.5 {
        l * (1.0 + s)
    } else {
        l + s - l * s
    };
    let m1 = 2.0 * l - m2;
    (
        hls_component(m1, m2, h + 1.0 / 3.0),
        hls_component(m1, m2, h),
        hls_component(m1, m2, h - 1.0 / 3.0),
    )
}

fn hls_component(m1: f64, m2: f64, hue: f64) -> f64 {
    let hue = hue.rem_euclid(1.0);
    if hue < 1.0 / 6.0 {
        m1 + (m2 - m1) * hue * 6.0
    } else if hue < 0.5 {
        m2
    } else if hue < 2.0 / 3.0 {
        m1 + (m2 - m1) * (2.0 / 3.0 - hue) * 6.0
    } else {
        m1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_list_passes_through() {
        let spec = ColorSpec::list(["#FF0000", "00ff00", "#00f"]);
        let ramp = resolve_ramp(&spec).unwrap();
        assert_eq!(ramp, vec!["#ff0000", "#00ff00", "#0000ff"]);
    }

    #[test]
    fn named_scale_honors_step_count() {
        for steps in [1usize, 2, 5, 7, 12] {
            let ramp = resolve_ramp(&ColorSpec::named("viridis", steps)).unwrap();
            assert_eq!(ramp.len(), steps);
        }
    }

    #[test]
    fn reversed_scale_flips_endpoints() {
        let fwd = resolve_ramp(&ColorSpec::named("summer", 3)).unwrap();
        let rev = resolve_ramp(&ColorSpec::named("summer_r", 3)).unwrap();
        assert_eq!(fwd.first(), rev.last());
        assert_eq!(fwd.last(), rev.first());
    }

    #[test]
    fn unknown_scale_rejected() {
        assert!(matches!(
            resolve_ramp(&ColorSpec::named("sunset9000", 5)),
            Err(ChartError::InvalidColorSpec(_))
        ));
        assert!(resolve_ramp(&ColorSpec::List(vec![])).is_err());
    }

    #[test]
    fn lighten_moves_toward_white() {
        assert_eq!(lighten_hex("#000000", 1.0).unwrap(), "#ffffff");
        assert_eq!(lighten_hex("#5470c6", 0.0).unwrap(), "#5470c6");
        // Halfway up from a mid blue keeps the hue family but brightens.
        let lighter = lighten_hex("#5470c6", 0.5).unwrap();
        let (r, g, b) = parse_hex(&lighter).unwrap();
        assert!(r > 0x54 && g > 0x70 && b > 0xc6);
    }
}
