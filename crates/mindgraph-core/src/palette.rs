//! Category colors.
//!
//! Top-level categories get hues spread evenly around the HSV circle; a category's descendants
//! reuse its color. [`generate_colors`] with a base hue produces a tonal family instead.

const CATEGORY_SATURATION: f64 = 0.7;
const CATEGORY_VALUE: f64 = 0.6;

const TONAL_HUE_STEP: f64 = 0.05;
const TONAL_BASE_SATURATION: f64 = 0.5;
const TONAL_SATURATION_STEP: f64 = 0.1;
const TONAL_VALUE: f64 = 0.6;

#[derive(Debug, Clone, Copy, PartialEq)]
struct Rgb01 {
    r: f64,
    g: f64,
    b: f64,
}

fn hsv_to_rgb01(h: f64, s: f64, v: f64) -> Rgb01 {
    if s == 0.0 {
        return Rgb01 { r: v, g: v, b: v };
    }
    let h = h.rem_euclid(1.0) * 6.0;
    let sector = h.floor();
    let f = h - sector;
    let p = v * (1.0 - s);
    let q = v * (1.0 - s * f);
    let t = v * (1.0 - s * (1.0 - f));
    match sector as i64 % 6 {
        0 => Rgb01 { r: v, g: t, b: p },
        1 => Rgb01 { r: q, g: v, b: p },
        2 => Rgb01 { r: p, g: v, b: t },
        3 => Rgb01 { r: p, g: q, b: v },
        4 => Rgb01 { r: t, g: p, b: v },
        _ => Rgb01 { r: v, g: p, b: q },
    }
}

fn rgb01_to_hex(rgb: Rgb01) -> String {
    // Channels are truncated, not rounded.
    let channel = |c: f64| (c.clamp(0.0, 1.0) * 255.0) as u8;
    format!(
        "#{:02x}{:02x}{:02x}",
        channel(rgb.r),
        channel(rgb.g),
        channel(rgb.b)
    )
}

fn parse_hex_rgb01(s: &str) -> Option<Rgb01> {
    let hex = s.trim().strip_prefix('#')?;
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }
    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
    Some(Rgb01 {
        r: r as f64 / 255.0,
        g: g as f64 / 255.0,
        b: b as f64 / 255.0,
    })
}

/// Returns `count` colors as `#rrggbb` strings.
///
/// Without `base_hue`, hues are distributed evenly over the full circle at fixed saturation and
/// value. With `base_hue` (in `[0, 1)`, wrapping), each step nudges the hue and raises the
/// saturation, keeping value constant.
pub fn generate_colors(count: usize, base_hue: Option<f64>) -> Vec<String> {
    match base_hue {
        None => {
            let denom = count.max(1) as f64;
            (0..count)
                .map(|i| {
                    rgb01_to_hex(hsv_to_rgb01(
                        i as f64 / denom,
                        CATEGORY_SATURATION,
                        CATEGORY_VALUE,
                    ))
                })
                .collect()
        }
        Some(base) => (0..count)
            .map(|i| {
                let i = i as f64;
                let saturation = (TONAL_BASE_SATURATION + i * TONAL_SATURATION_STEP).min(1.0);
                rgb01_to_hex(hsv_to_rgb01(
                    base + i * TONAL_HUE_STEP,
                    saturation,
                    TONAL_VALUE,
                ))
            })
            .collect(),
    }
}

/// HSV hue (in `[0, 1)`) of a `#rrggbb` color, for anchoring a tonal family on a category color.
pub fn hue_of(hex: &str) -> Option<f64> {
    let Rgb01 { r, g, b } = parse_hex_rgb01(hex)?;
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    if max == min {
        return Some(0.0);
    }
    let d = max - min;
    let rc = (max - r) / d;
    let gc = (max - g) / d;
    let bc = (max - b) / d;
    let h = if r == max {
        bc - gc
    } else if g == max {
        2.0 + rc - bc
    } else {
        4.0 + gc - rc
    };
    Some((h / 6.0).rem_euclid(1.0))
}
