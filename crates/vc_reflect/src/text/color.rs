use alloc::format;
use alloc::string::String;

use crate::text::{TextFormat, TextFormatError};
use crate::value::{DynamicStruct, Value};

/// `R`, `G`, `B`, `A` integer channels written as `RRGGBBAA` hex.
///
/// Import accepts 6 or 8 hex digits with an optional leading `#`;
/// alpha defaults to `FF`.
#[derive(Debug, Default, Clone, Copy)]
pub struct ColorFormat;

const CHANNELS: [&str; 4] = ["R", "G", "B", "A"];

impl TextFormat for ColorFormat {
    fn export_text(&self, value: &DynamicStruct) -> Option<String> {
        let mut out = String::with_capacity(8);
        for channel in CHANNELS {
            let v = value.get(channel)?.as_int()?;
            let v = u8::try_from(v).ok()?;
            out.push_str(&format!("{v:02X}"));
        }
        Some(out)
    }

    fn import_text(&self, text: &str, value: &mut DynamicStruct) -> Result<(), TextFormatError> {
        let invalid = || TextFormatError::Invalid {
            expected: "color",
            text: text.into(),
        };

        let hex = text.trim();
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        if !(hex.len() == 6 || hex.len() == 8) || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(invalid());
        }

        let mut channels = [255_u8; 4];
        for (i, slot) in channels.iter_mut().take(hex.len() / 2).enumerate() {
            *slot = u8::from_str_radix(&hex[i * 2..i * 2 + 2], 16).map_err(|_| invalid())?;
        }

        for (name, v) in CHANNELS.iter().zip(channels) {
            value.insert(name, Value::Int(i64::from(v)));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::ColorFormat;
    use crate::text::TextFormat;
    use crate::value::{DynamicStruct, Value};

    #[test]
    fn export_import() {
        let color = DynamicStruct::default()
            .with("R", 255_i64)
            .with("G", 128_i64)
            .with("B", 0_i64)
            .with("A", 16_i64);
        assert_eq!(ColorFormat.export_text(&color).as_deref(), Some("FF800010"));

        let mut out = DynamicStruct::default();
        ColorFormat.import_text("#0a0B0c", &mut out).unwrap();
        assert_eq!(out.get("R"), Some(&Value::Int(10)));
        assert_eq!(out.get("B"), Some(&Value::Int(12)));
        assert_eq!(out.get("A"), Some(&Value::Int(255)));

        assert!(ColorFormat.import_text("12345", &mut out).is_err());
        assert!(ColorFormat.import_text("GG0000", &mut out).is_err());
    }

    #[test]
    fn export_rejects_out_of_range() {
        let color = DynamicStruct::default()
            .with("R", 256_i64)
            .with("G", 0_i64)
            .with("B", 0_i64)
            .with("A", 0_i64);
        assert_eq!(ColorFormat.export_text(&color), None);
    }
}
