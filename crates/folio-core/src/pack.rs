//! # Content Packs
//!
//! A pack bundles an ordered, positional sequence of document assets.
//! The access services and the reader treat the sequence as read-only;
//! packs are authored by an administrative workflow elsewhere.
//!
//! Field names follow the catalog API (`_id`, `files`, `fileUrl`,
//! `isFeatured`, `longDescription`).

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::identity::{PackId, PackSlug};

/// Publication status of a pack.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PackStatus {
    /// Not visible in the public catalog; access requests are refused.
    #[default]
    Draft,
    /// Listed in the catalog.
    Published,
    /// A status this client does not know about.
    #[serde(other)]
    Unknown,
}

impl std::fmt::Display for PackStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Draft => "draft",
            Self::Published => "published",
            Self::Unknown => "unknown",
        })
    }
}

/// One document of a pack. Addressed by its position in the pack.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentAsset {
    /// Optional display label.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Retrievable location of the document.
    #[serde(rename = "fileUrl", default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

impl ContentAsset {
    /// Build an asset from a label and a location.
    pub fn new(label: impl Into<String>, location: impl Into<String>) -> Self {
        Self {
            label: Some(label.into()),
            location: Some(location.into()),
        }
    }

    /// The label, or `PDF {n}` (1-based) when the label is missing or blank.
    pub fn display_label(&self, position: usize) -> String {
        match self.label.as_deref().map(str::trim) {
            Some(label) if !label.is_empty() => label.to_string(),
            _ => format!("PDF {}", position + 1),
        }
    }

    /// The location if present and non-blank.
    pub fn location(&self) -> Option<&str> {
        self.location.as_deref().filter(|l| !l.trim().is_empty())
    }
}

/// A catalog pack with its ordered asset sequence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentPack {
    #[serde(rename = "_id")]
    pub id: PackId,
    pub title: String,
    #[serde(default)]
    pub slug: Option<PackSlug>,
    /// Price in FCFA. Absent or zero means free.
    #[serde(default, deserialize_with = "lenient_price")]
    pub price: Option<Price>,
    #[serde(default)]
    pub status: PackStatus,
    #[serde(default)]
    pub is_featured: bool,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub long_description: Option<String>,
    /// Ordered assets. Position is the only asset identity.
    #[serde(rename = "files", default)]
    pub assets: Vec<ContentAsset>,
}

impl ContentPack {
    /// Number of assets in the pack.
    pub fn total_assets(&self) -> usize {
        self.assets.len()
    }

    /// Whether the pack is published.
    pub fn is_published(&self) -> bool {
        self.status == PackStatus::Published
    }

    /// Paragraphs of the long description (falling back to the short one),
    /// split on blank lines.
    pub fn description_blocks(&self) -> Vec<String> {
        let raw = [&self.long_description, &self.description]
            .into_iter()
            .flatten()
            .find(|d| !d.is_empty())
            .map(String::as_str)
            .unwrap_or("");
        raw.split("\n\n")
            .map(str::trim)
            .filter(|block| !block.is_empty())
            .map(str::to_string)
            .collect()
    }

    /// Display price: `Free`, or the grouped amount in FCFA.
    pub fn price_label(&self) -> String {
        match self.price {
            Some(price) if !price.is_free() => format!("{price} FCFA"),
            _ => "Free".to_string(),
        }
    }
}

/// A catalog price in FCFA.
///
/// The admin form stores whatever number was typed, so fractional amounts
/// occur. Always finite.
#[derive(Debug, Clone, Copy)]
pub struct Price(f64);

impl Price {
    /// `None` for NaN or infinite amounts.
    pub fn new(amount: f64) -> Option<Self> {
        amount.is_finite().then_some(Self(amount))
    }

    pub fn amount(self) -> f64 {
        self.0
    }

    pub fn is_free(self) -> bool {
        self.0 == 0.0
    }
}

impl From<u64> for Price {
    fn from(amount: u64) -> Self {
        Self(amount as f64)
    }
}

impl PartialEq for Price {
    fn eq(&self, other: &Self) -> bool {
        self.0.to_bits() == other.0.to_bits()
    }
}

impl Eq for Price {}

/// Grouped integer part, then at most three decimals after a comma.
impl std::fmt::Display for Price {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let thousandths = (self.0.abs() * 1000.0).round() as u64;
        if self.0 < 0.0 && thousandths > 0 {
            f.write_str("-")?;
        }
        f.write_str(&group_thousands(thousandths / 1000))?;
        let fraction = format!("{:03}", thousandths % 1000);
        let fraction = fraction.trim_end_matches('0');
        if !fraction.is_empty() {
            write!(f, ",{fraction}")?;
        }
        Ok(())
    }
}

impl Serialize for Price {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.0)
    }
}

impl<'de> Deserialize<'de> for Price {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let amount = f64::deserialize(deserializer)?;
        Price::new(amount).ok_or_else(|| serde::de::Error::custom("price must be finite"))
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawPrice {
    Number(f64),
    Text(String),
    Other(serde::de::IgnoredAny),
}

/// Integers, floats and numeric strings all count. Anything else is treated
/// as no price rather than failing the whole pack.
fn lenient_price<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Price>, D::Error> {
    Ok(match Option::<RawPrice>::deserialize(deserializer)? {
        Some(RawPrice::Number(amount)) => Price::new(amount),
        Some(RawPrice::Text(text)) => text.trim().parse::<f64>().ok().and_then(Price::new),
        Some(RawPrice::Other(_)) | None => None,
    })
}

fn group_thousands(amount: u64) -> String {
    let digits = amount.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(' ');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pack_json() -> serde_json::Value {
        serde_json::json!({
            "_id": "65a1f0c2e4b0a1b2c3d4e5f6",
            "title": "Pack Anatomie L1",
            "slug": "pack-anatomie-l1",
            "price": 12500,
            "status": "published",
            "isFeatured": true,
            "description": "Short",
            "longDescription": "First paragraph.\n\n\nSecond paragraph.\n\n  ",
            "files": [
                { "label": "Ostéologie", "fileUrl": "https://cdn.example/osteo.pdf" },
                { "fileUrl": "https://cdn.example/myo.pdf" },
                { "label": "", "fileUrl": "https://cdn.example/neuro.pdf" }
            ]
        })
    }

    #[test]
    fn deserializes_catalog_shape() {
        let pack: ContentPack = serde_json::from_value(pack_json()).unwrap();
        assert_eq!(pack.id.as_str(), "65a1f0c2e4b0a1b2c3d4e5f6");
        assert!(pack.is_published());
        assert!(pack.is_featured);
        assert_eq!(pack.total_assets(), 3);
        assert_eq!(pack.assets[0].location(), Some("https://cdn.example/osteo.pdf"));
    }

    #[test]
    fn missing_files_means_no_assets() {
        let pack: ContentPack =
            serde_json::from_value(serde_json::json!({ "_id": "p1", "title": "Empty" })).unwrap();
        assert_eq!(pack.total_assets(), 0);
        assert_eq!(pack.status, PackStatus::Draft);
    }

    #[test]
    fn unknown_status_tolerated() {
        let pack: ContentPack = serde_json::from_value(serde_json::json!({
            "_id": "p1", "title": "Archived", "status": "archived"
        }))
        .unwrap();
        assert_eq!(pack.status, PackStatus::Unknown);
    }

    #[test]
    fn display_label_falls_back_to_position() {
        let pack: ContentPack = serde_json::from_value(pack_json()).unwrap();
        assert_eq!(pack.assets[0].display_label(0), "Ostéologie");
        assert_eq!(pack.assets[1].display_label(1), "PDF 2");
        assert_eq!(pack.assets[2].display_label(2), "PDF 3");
    }

    #[test]
    fn description_blocks_split_on_blank_lines() {
        let pack: ContentPack = serde_json::from_value(pack_json()).unwrap();
        assert_eq!(
            pack.description_blocks(),
            vec!["First paragraph.".to_string(), "Second paragraph.".to_string()]
        );
    }

    #[test]
    fn description_blocks_fall_back_to_short_description() {
        let mut pack: ContentPack = serde_json::from_value(pack_json()).unwrap();
        pack.long_description = None;
        assert_eq!(pack.description_blocks(), vec!["Short".to_string()]);
        pack.description = None;
        assert!(pack.description_blocks().is_empty());
    }

    #[test]
    fn price_label_formats() {
        let mut pack: ContentPack = serde_json::from_value(pack_json()).unwrap();
        assert_eq!(pack.price_label(), "12 500 FCFA");
        pack.price = Some(Price::from(1_250_000));
        assert_eq!(pack.price_label(), "1 250 000 FCFA");
        pack.price = Some(Price::from(900));
        assert_eq!(pack.price_label(), "900 FCFA");
        pack.price = Some(Price::from(0));
        assert_eq!(pack.price_label(), "Free");
        pack.price = None;
        assert_eq!(pack.price_label(), "Free");
    }

    fn with_price(price: serde_json::Value) -> ContentPack {
        let mut json = pack_json();
        json["price"] = price;
        serde_json::from_value(json).unwrap()
    }

    #[test]
    fn fractional_prices_load() {
        let pack = with_price(serde_json::json!(12500.0));
        assert_eq!(pack.price, Price::new(12500.0));
        assert_eq!(pack.price_label(), "12 500 FCFA");

        let pack = with_price(serde_json::json!(12500.5));
        assert_eq!(pack.price_label(), "12 500,5 FCFA");

        let pack = with_price(serde_json::json!(0.0));
        assert_eq!(pack.price_label(), "Free");
    }

    #[test]
    fn odd_price_values_do_not_fail_the_pack() {
        assert_eq!(with_price(serde_json::json!("7500")).price_label(), "7 500 FCFA");
        assert_eq!(with_price(serde_json::json!("n/a")).price, None);
        assert_eq!(with_price(serde_json::json!(null)).price, None);
        assert_eq!(with_price(serde_json::json!({ "amount": 1 })).price, None);
        assert_eq!(with_price(serde_json::json!(true)).total_assets(), 3);
    }

    #[test]
    fn price_rounds_to_three_decimals() {
        assert_eq!(Price::new(0.1234).map(|p| p.to_string()).as_deref(), Some("0,123"));
        assert_eq!(Price::new(-2500.0).map(|p| p.to_string()).as_deref(), Some("-2 500"));
        assert!(Price::new(f64::NAN).is_none());
    }
}
