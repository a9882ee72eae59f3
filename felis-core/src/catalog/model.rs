use serde::{Deserialize, Serialize};

/// A cat breed as reported by the upstream catalog.
///
/// Field names follow the upstream wire format. Unknown fields are ignored so
/// upstream additions never break decoding. Trait scores are on a 0-5 scale.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BreedRecord {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub temperament: Option<String>,
    #[serde(default)]
    pub origin: Option<String>,
    #[serde(default)]
    pub life_span: Option<String>,
    #[serde(default)]
    pub alt_names: Option<String>,
    #[serde(default)]
    pub reference_image_id: Option<String>,

    // Trait scores
    #[serde(default)]
    pub indoor: Option<u8>,
    #[serde(default)]
    pub lap: Option<u8>,
    #[serde(default)]
    pub adaptability: Option<u8>,
    #[serde(default)]
    pub affection_level: Option<u8>,
    #[serde(default)]
    pub child_friendly: Option<u8>,
    #[serde(default)]
    pub dog_friendly: Option<u8>,
    #[serde(default)]
    pub energy_level: Option<u8>,
    #[serde(default)]
    pub grooming: Option<u8>,
    #[serde(default)]
    pub health_issues: Option<u8>,
    #[serde(default)]
    pub intelligence: Option<u8>,
    #[serde(default)]
    pub shedding_level: Option<u8>,
    #[serde(default)]
    pub social_needs: Option<u8>,
    #[serde(default)]
    pub stranger_friendly: Option<u8>,
    #[serde(default)]
    pub vocalisation: Option<u8>,
    #[serde(default)]
    pub experimental: Option<u8>,
    #[serde(default)]
    pub hairless: Option<u8>,
    #[serde(default)]
    pub natural: Option<u8>,
    #[serde(default)]
    pub rare: Option<u8>,
    #[serde(default)]
    pub rex: Option<u8>,
    #[serde(default)]
    pub suppressed_tail: Option<u8>,
    #[serde(default)]
    pub short_legs: Option<u8>,
    #[serde(default)]
    pub hypoallergenic: Option<u8>,

    // Reference links
    #[serde(default)]
    pub wikipedia_url: Option<String>,
    #[serde(default)]
    pub cfa_url: Option<String>,
    #[serde(default)]
    pub vetstreet_url: Option<String>,
    #[serde(default)]
    pub vcahospitals_url: Option<String>,
}

impl BreedRecord {
    /// Minimal record, mostly useful for fixtures.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            ..Self::default()
        }
    }
}

/// An image hosted by the upstream catalog together with the breeds it shows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "ImageWire")]
pub struct ImageRecord {
    pub id: String,
    pub url: String,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub breed_ids: Vec<String>,
}

/// Upstream image shape. Associations arrive either as a flat `breed_ids`
/// list or as embedded breed objects, depending on the endpoint and plan.
#[derive(Deserialize)]
struct ImageWire {
    id: String,
    #[serde(default)]
    url: String,
    #[serde(default)]
    width: Option<u32>,
    #[serde(default)]
    height: Option<u32>,
    #[serde(default)]
    breed_ids: Option<Vec<String>>,
    #[serde(default)]
    breeds: Vec<BreedRef>,
}

#[derive(Deserialize)]
struct BreedRef {
    id: String,
}

impl From<ImageWire> for ImageRecord {
    fn from(wire: ImageWire) -> Self {
        let breed_ids = match wire.breed_ids {
            Some(ids) if !ids.is_empty() => ids,
            _ => wire.breeds.into_iter().map(|breed| breed.id).collect(),
        };

        Self {
            id: wire.id,
            url: wire.url,
            width: wire.width,
            height: wire.height,
            breed_ids,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn breed_ignores_unknown_fields() {
        let raw = r#"{
            "id": "abys",
            "name": "Abyssinian",
            "weight": {"imperial": "7  -  10", "metric": "3 - 5"},
            "country_code": "EG",
            "adaptability": 5,
            "wikipedia_url": "https://en.wikipedia.org/wiki/Abyssinian_(cat)"
        }"#;

        let breed: BreedRecord = serde_json::from_str(raw).unwrap();
        assert_eq!(breed.id, "abys");
        assert_eq!(breed.name, "Abyssinian");
        assert_eq!(breed.adaptability, Some(5));
        assert_eq!(breed.grooming, None);
        assert!(breed.wikipedia_url.is_some());
    }

    #[test]
    fn image_takes_breed_ids_from_embedded_breeds() {
        let raw = r#"{
            "id": "0XYvRd7oD",
            "url": "https://cdn2.thecatapi.com/images/0XYvRd7oD.jpg",
            "width": 1204,
            "height": 1445,
            "breeds": [{"id": "abys", "name": "Abyssinian"}]
        }"#;

        let image: ImageRecord = serde_json::from_str(raw).unwrap();
        assert_eq!(image.breed_ids, vec!["abys".to_string()]);
        assert_eq!(image.width, Some(1204));
    }

    #[test]
    fn image_prefers_flat_breed_ids() {
        let raw = r#"{
            "id": "img1",
            "url": "https://example.com/image1.jpg",
            "breed_ids": ["aege"],
            "breeds": [{"id": "abys"}]
        }"#;

        let image: ImageRecord = serde_json::from_str(raw).unwrap();
        assert_eq!(image.breed_ids, vec!["aege".to_string()]);
    }

    #[test]
    fn image_serializes_flat_shape() {
        let image = ImageRecord {
            id: "img1".into(),
            url: "https://example.com/image1.jpg".into(),
            width: Some(10),
            height: None,
            breed_ids: vec!["abys".into()],
        };

        let value = serde_json::to_value(&image).unwrap();
        assert_eq!(value["breed_ids"][0], "abys");
        assert!(value.get("breeds").is_none());
    }
}
