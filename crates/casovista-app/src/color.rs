// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use serde::{Deserialize, Serialize};

/// RGB triple derived from a record's accent field. The UI maps this onto a
/// terminal color; the value itself is never rendered as text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccentColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl AccentColor {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

/// Parses a color token: hex (`#f80`, `#ff8800`), functional (`rgb(r, g, b)`),
/// or a plain color name in Spanish or English. Anything else yields `None`
/// and the card renders without an accent.
pub fn parse_color_token(raw: &str) -> Option<AccentColor> {
    let token = raw.trim();
    if token.is_empty() {
        return None;
    }
    if let Some(hex) = token.strip_prefix('#') {
        return parse_hex(hex);
    }
    let lowered = token.to_lowercase();
    if let Some(args) = lowered
        .strip_prefix("rgba(")
        .or_else(|| lowered.strip_prefix("rgb("))
    {
        return parse_functional(args.strip_suffix(')')?);
    }
    named_color(&lowered)
}

fn parse_hex(hex: &str) -> Option<AccentColor> {
    match hex.len() {
        3 => {
            let mut channels = [0u8; 3];
            for (slot, ch) in channels.iter_mut().zip(hex.chars()) {
                let nibble = ch.to_digit(16)? as u8;
                *slot = nibble << 4 | nibble;
            }
            Some(AccentColor::new(channels[0], channels[1], channels[2]))
        }
        6 => {
            let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
            let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
            let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
            Some(AccentColor::new(r, g, b))
        }
        _ => None,
    }
}

fn parse_functional(args: &str) -> Option<AccentColor> {
    let channels: Vec<&str> = args.split(',').map(str::trim).collect();
    let [r, g, b] = channels.as_slice() else {
        return None;
    };
    Some(AccentColor::new(
        r.parse().ok()?,
        g.parse().ok()?,
        b.parse().ok()?,
    ))
}

fn named_color(name: &str) -> Option<AccentColor> {
    let (r, g, b) = match name {
        "rojo" | "red" => (0xdc, 0x26, 0x26),
        "verde" | "green" => (0x16, 0xa3, 0x4a),
        "azul" | "blue" => (0x25, 0x63, 0xeb),
        "amarillo" | "yellow" => (0xea, 0xb3, 0x08),
        "naranja" | "orange" => (0xea, 0x58, 0x0c),
        "morado" | "violeta" | "purple" => (0x7c, 0x3a, 0xed),
        "rosa" | "pink" => (0xdb, 0x27, 0x77),
        "gris" | "gray" | "grey" => (0x6b, 0x72, 0x80),
        "blanco" | "white" => (0xff, 0xff, 0xff),
        "negro" | "black" => (0x00, 0x00, 0x00),
        "cian" | "cyan" => (0x06, 0xb6, 0xd4),
        _ => return None,
    };
    Some(AccentColor::new(r, g, b))
}
