//! Level string codec.
//!
//! A level string is a header segment followed by `;`-terminated objects:
//!
//! ```text
//! kS38,1_255_2_0_3_0_6_999_7_1|,kA13,0;1,211,2,2.5,3,2.5,20,0,21,999,32,5,41,1,43,0a0a0a1a1;
//! ```
//!
//! Header and objects are flat comma-separated key/value lists. The `kS38`
//! header value is the color table: `|`-separated channels, each a flat
//! `_`-separated key/value list.

use super::{ColorChannel, LevelDocument, LevelError, LevelObject};
use crate::color::{DeltaHsv, Rgb};

const COLOR_TABLE_KEY: &str = "kS38";

const KEY_ID: u32 = 1;
const KEY_X: u32 = 2;
const KEY_Y: u32 = 3;
const KEY_EDITOR_LAYER: u32 = 20;
const KEY_COLOR_CHANNEL: u32 = 21;
const KEY_SCALE: u32 = 32;
const KEY_HSV_ENABLED: u32 = 41;
const KEY_HSV: u32 = 43;

pub(super) fn decode(data: &str) -> Result<LevelDocument, LevelError> {
    let mut doc = LevelDocument::new();
    let data = data.trim();
    if data.is_empty() {
        return Ok(doc);
    }

    let mut segments = data.split(';');
    if let Some(header) = segments.next() {
        decode_header(header, &mut doc)?;
    }

    for (index, segment) in segments.filter(|s| !s.is_empty()).enumerate() {
        doc.objects.push(decode_object(segment, index)?);
    }

    Ok(doc)
}

pub(super) fn encode(doc: &LevelDocument) -> String {
    let mut header: Vec<String> = Vec::with_capacity(doc.header.len() * 2 + 2);
    if !doc.colors.is_empty() {
        let table: String = doc.colors.iter().map(|c| format!("{}|", encode_color(c))).collect();
        header.push(COLOR_TABLE_KEY.to_string());
        header.push(table);
    }
    for (key, value) in &doc.header {
        header.push(key.clone());
        header.push(value.clone());
    }

    let mut out = header.join(",");
    out.push(';');
    for obj in &doc.objects {
        out.push_str(&encode_object(obj));
        out.push(';');
    }
    out
}

fn decode_header(header: &str, doc: &mut LevelDocument) -> Result<(), LevelError> {
    if header.is_empty() {
        return Ok(());
    }

    let fields: Vec<&str> = header.split(',').collect();
    if fields.len() % 2 != 0 {
        return Err(LevelError::MalformedHeader(format!("odd number of fields ({})", fields.len())));
    }

    for pair in fields.chunks(2) {
        let (key, value) = (pair[0], pair[1]);
        if key == COLOR_TABLE_KEY {
            for channel in value.split('|').filter(|c| !c.is_empty()) {
                doc.colors.push(decode_color(channel)?);
            }
        } else {
            doc.header.push((key.to_string(), value.to_string()));
        }
    }
    Ok(())
}

fn decode_color(text: &str) -> Result<ColorChannel, LevelError> {
    let malformed = || LevelError::MalformedColor(text.to_string());
    let fields: Vec<&str> = text.split('_').collect();
    if fields.len() % 2 != 0 {
        return Err(malformed());
    }

    let mut channel = ColorChannel::new(0, Rgb::default());
    for pair in fields.chunks(2) {
        let (key, value) = (pair[0], pair[1]);
        match key {
            "1" => channel.rgb.r = value.parse().map_err(|_| malformed())?,
            "2" => channel.rgb.g = value.parse().map_err(|_| malformed())?,
            "3" => channel.rgb.b = value.parse().map_err(|_| malformed())?,
            "5" => channel.blending = value == "1",
            "6" => channel.id = value.parse().map_err(|_| malformed())?,
            "7" => channel.opacity = value.parse().map_err(|_| malformed())?,
            _ => channel.extra.push((key.to_string(), value.to_string())),
        }
    }

    if channel.id == 0 {
        return Err(malformed());
    }
    Ok(channel)
}

fn encode_color(channel: &ColorChannel) -> String {
    let mut parts = vec![
        format!("1_{}", channel.rgb.r),
        format!("2_{}", channel.rgb.g),
        format!("3_{}", channel.rgb.b),
    ];
    if channel.blending {
        parts.push("5_1".to_string());
    }
    parts.push(format!("6_{}", channel.id));
    parts.push(format!("7_{}", channel.opacity));
    for (key, value) in &channel.extra {
        parts.push(format!("{}_{}", key, value));
    }
    parts.join("_")
}

fn decode_object(segment: &str, index: usize) -> Result<LevelObject, LevelError> {
    let malformed = |reason: String| LevelError::MalformedObject { index, reason };

    let fields: Vec<&str> = segment.split(',').collect();
    if fields.len() % 2 != 0 {
        return Err(malformed(format!("odd number of fields ({})", fields.len())));
    }

    let mut pairs: Vec<(u32, &str)> = Vec::with_capacity(fields.len() / 2);
    for pair in fields.chunks(2) {
        let key = pair[0].parse::<u32>().map_err(|_| malformed(format!("bad key '{}'", pair[0])))?;
        pairs.push((key, pair[1]));
    }

    // Only an enabled flag with a value is interpreted; anything else stays in `extra`
    let hsv_enabled = pairs.iter().any(|&(k, v)| k == KEY_HSV_ENABLED && v == "1")
        && pairs.iter().any(|&(k, _)| k == KEY_HSV);

    let mut obj = LevelObject::default();
    let mut has_id = false;
    for (key, value) in pairs {
        let bad_value = |v: &str| malformed(format!("bad value '{}' for key {}", v, key));
        let float = |v: &str| v.parse::<f32>().map_err(|_| bad_value(v));
        let int = |v: &str| v.parse::<u16>().map_err(|_| bad_value(v));
        match key {
            KEY_ID => {
                obj.id = value
                    .parse()
                    .map_err(|_| malformed(format!("bad object id '{}'", value)))?;
                has_id = true;
            }
            KEY_X => obj.x = float(value)?,
            KEY_Y => obj.y = float(value)?,
            KEY_EDITOR_LAYER => obj.editor_layer = Some(int(value)?),
            KEY_COLOR_CHANNEL => obj.color_channel = Some(int(value)?),
            KEY_SCALE => obj.scale = Some(float(value)?),
            KEY_HSV_ENABLED if hsv_enabled => {}
            KEY_HSV if hsv_enabled => {
                let hsv = value.parse::<DeltaHsv>().map_err(|e| malformed(e.to_string()))?;
                obj.hsv = Some(hsv);
            }
            _ => obj.extra.push((key, value.to_string())),
        }
    }

    if !has_id {
        return Err(malformed("missing object id".to_string()));
    }
    Ok(obj)
}

fn encode_object(obj: &LevelObject) -> String {
    let mut parts = vec![
        format!("{},{}", KEY_ID, obj.id),
        format!("{},{}", KEY_X, obj.x),
        format!("{},{}", KEY_Y, obj.y),
    ];
    if let Some(layer) = obj.editor_layer {
        parts.push(format!("{},{}", KEY_EDITOR_LAYER, layer));
    }
    if let Some(channel) = obj.color_channel {
        parts.push(format!("{},{}", KEY_COLOR_CHANNEL, channel));
    }
    if let Some(scale) = obj.scale {
        parts.push(format!("{},{}", KEY_SCALE, scale));
    }
    if let Some(hsv) = obj.hsv {
        parts.push(format!("{},1", KEY_HSV_ENABLED));
        parts.push(format!("{},{}", KEY_HSV, hsv));
    }
    for (key, value) in &obj.extra {
        parts.push(format!("{},{}", key, value));
    }
    parts.join(",")
}
