//! Read-only lookup tables: meme templates, caption pairs and emoji.

use anyhow::{Context, Result};
use once_cell::sync::Lazy;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MemeCategory {
    Classic,
    Reaction,
    Sarcastic,
    Random,
}

impl MemeCategory {
    pub const ALL: [Self; 4] = [Self::Classic, Self::Reaction, Self::Sarcastic, Self::Random];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemeTemplate {
    pub id: &'static str,
    pub name: &'static str,
    pub category: MemeCategory,
}

const fn template(id: &'static str, name: &'static str, category: MemeCategory) -> MemeTemplate {
    MemeTemplate { id, name, category }
}

pub static TEMPLATES: [MemeTemplate; 32] = [
    template("classic-01", "Retro Burst", MemeCategory::Classic),
    template("classic-02", "Hot Sauce", MemeCategory::Classic),
    template("classic-03", "Peach Glow", MemeCategory::Classic),
    template("classic-04", "Gold Rush", MemeCategory::Classic),
    template("classic-05", "Fresh Mint", MemeCategory::Classic),
    template("classic-06", "Teal Tide", MemeCategory::Classic),
    template("classic-07", "Deep Harbor", MemeCategory::Classic),
    template("classic-08", "Forest Haze", MemeCategory::Classic),
    template("reaction-01", "Midnight Punch", MemeCategory::Reaction),
    template("reaction-02", "Violet Echo", MemeCategory::Reaction),
    template("reaction-03", "Candy Drop", MemeCategory::Reaction),
    template("reaction-04", "Lemon Drop", MemeCategory::Reaction),
    template("reaction-05", "Mint Pop", MemeCategory::Reaction),
    template("reaction-06", "Sky Shock", MemeCategory::Reaction),
    template("reaction-07", "Berry Ink", MemeCategory::Reaction),
    template("reaction-08", "Citrus Zip", MemeCategory::Reaction),
    template("sarcastic-01", "Terracotta", MemeCategory::Sarcastic),
    template("sarcastic-02", "Night Slate", MemeCategory::Sarcastic),
    template("sarcastic-03", "Herbal Mist", MemeCategory::Sarcastic),
    template("sarcastic-04", "Sand Drift", MemeCategory::Sarcastic),
    template("sarcastic-05", "Bubblegum", MemeCategory::Sarcastic),
    template("sarcastic-06", "Ice Pop", MemeCategory::Sarcastic),
    template("sarcastic-07", "Lavender Blur", MemeCategory::Sarcastic),
    template("sarcastic-08", "Dew Drop", MemeCategory::Sarcastic),
    template("random-01", "Sunny Side", MemeCategory::Random),
    template("random-02", "Neon Blue", MemeCategory::Random),
    template("random-03", "Aqua Flash", MemeCategory::Random),
    template("random-04", "Electric Grape", MemeCategory::Random),
    template("random-05", "Pink Buzz", MemeCategory::Random),
    template("random-06", "Fresh Tide", MemeCategory::Random),
    template("random-07", "Sea Glass", MemeCategory::Random),
    template("random-08", "Soft Current", MemeCategory::Random),
];

static TEMPLATE_INDEX: Lazy<HashMap<&'static str, &'static MemeTemplate>> =
    Lazy::new(|| TEMPLATES.iter().map(|t| (t.id, t)).collect());

pub fn template_by_id(id: &str) -> Option<&'static MemeTemplate> {
    TEMPLATE_INDEX.get(id).copied()
}

pub fn templates_in(category: MemeCategory) -> impl Iterator<Item = &'static MemeTemplate> {
    TEMPLATES.iter().filter(move |t| t.category == category)
}

pub fn random_template<R: Rng + ?Sized>(
    category: Option<MemeCategory>,
    rng: &mut R,
) -> &'static MemeTemplate {
    let pool: Vec<&'static MemeTemplate> = match category {
        Some(category) => templates_in(category).collect(),
        None => TEMPLATES.iter().collect(),
    };
    // Every category has entries, so the pool is never empty.
    pool[rng.gen_range(0..pool.len())]
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaptionPair {
    pub top: String,
    pub bottom: String,
}

impl CaptionPair {
    pub fn new(top: impl Into<String>, bottom: impl Into<String>) -> Self {
        Self {
            top: top.into(),
            bottom: bottom.into(),
        }
    }
}

pub const CAPTION_PAIRS: [(&str, &str); 16] = [
    ("WHEN YOU HIT", "THE RANDOM BUTTON"),
    ("ME: JUST ONE", "ALSO ME: 47 TABS"),
    ("EXPECTATIONS", "REALITY"),
    ("I OPENED THE APP", "NOW I AM A MEME"),
    ("BRAIN SAYS NO", "FINGER SAYS YES"),
    ("OFFLINE MODE", "ONLINE ENERGY"),
    ("KEPT IT SIMPLE", "MADE IT FUN"),
    ("WHEN THE TEXT", "FIT FINALLY"),
    ("ME SHARING", "EVERYTHING"),
    ("NO INTERNET", "NO PROBLEM"),
    ("JUST ONE MEME", "THEN SLEEP"),
    ("I CAME FOR", "THE TEMPLATE"),
    ("MOUTH SAYS STOP", "BRAIN SAYS POST"),
    ("SARCASM LEVEL", "MAXIMUM"),
    ("WHEN THE CROP", "IS PERFECT"),
    ("SEND IT", "TO EVERYONE"),
];

pub fn random_caption_pair<R: Rng + ?Sized>(rng: &mut R) -> CaptionPair {
    let (top, bottom) = CAPTION_PAIRS[rng.gen_range(0..CAPTION_PAIRS.len())];
    CaptionPair::new(top, bottom)
}

pub const FALLBACK_QUICK_EMOJIS: [&str; 6] = ["😂", "🔥", "🤡", "✨", "💀", "😈"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmojiItem {
    pub id: String,
    pub native: String,
    pub name: String,
    pub keywords: Vec<String>,
    pub category: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmojiCategory {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Deserialize)]
struct RawCatalog {
    #[serde(default)]
    categories: Vec<RawCategory>,
    #[serde(default)]
    emojis: HashMap<String, RawEmoji>,
}

#[derive(Debug, Deserialize)]
struct RawCategory {
    id: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    emojis: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct RawEmoji {
    id: String,
    name: String,
    #[serde(default)]
    keywords: Vec<String>,
    #[serde(default)]
    skins: Vec<RawSkin>,
}

#[derive(Debug, Deserialize)]
struct RawSkin {
    #[serde(default)]
    native: String,
}

/// Emoji grouped by category, built from emoji-mart style JSON.
#[derive(Debug, Clone, Default)]
pub struct EmojiCatalog {
    categories: Vec<EmojiCategory>,
    items: Vec<EmojiItem>,
    by_category: HashMap<String, Vec<usize>>,
}

impl EmojiCatalog {
    pub fn from_json(json: &str) -> Result<Self> {
        let raw: RawCatalog =
            serde_json::from_str(json).context("deserialize emoji catalog payload")?;
        Ok(Self::from_raw(raw))
    }

    fn from_raw(raw: RawCatalog) -> Self {
        let mut catalog = Self::default();
        let mut seen = HashSet::new();

        for category in raw.categories {
            let mut indices = Vec::new();
            for emoji_id in &category.emojis {
                let Some(emoji) = raw.emojis.get(emoji_id) else {
                    continue;
                };
                let Some(native) = emoji.skins.first().map(|s| s.native.as_str()) else {
                    continue;
                };
                if native.is_empty() || !seen.insert(emoji.id.clone()) {
                    continue;
                }
                indices.push(catalog.items.len());
                catalog.items.push(EmojiItem {
                    id: emoji.id.clone(),
                    native: native.to_string(),
                    name: emoji.name.clone(),
                    keywords: emoji.keywords.clone(),
                    category: category.id.clone(),
                });
            }
            catalog.by_category.insert(category.id.clone(), indices);
            catalog.categories.push(EmojiCategory {
                id: category.id,
                name: category.name,
            });
        }

        tracing::debug!(
            emojis = catalog.items.len(),
            categories = catalog.categories.len(),
            "emoji catalog loaded"
        );
        catalog
    }

    pub fn categories(&self) -> &[EmojiCategory] {
        &self.categories
    }

    pub fn all(&self) -> &[EmojiItem] {
        &self.items
    }

    pub fn in_category(&self, category: &str) -> Vec<&EmojiItem> {
        self.by_category
            .get(category)
            .map(|indices| indices.iter().map(|&i| &self.items[i]).collect())
            .unwrap_or_default()
    }

    /// Case-insensitive substring match on name, id and keywords. A blank
    /// query returns everything.
    pub fn search(&self, query: &str) -> Vec<&EmojiItem> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return self.items.iter().collect();
        }
        self.items
            .iter()
            .filter(|emoji| {
                emoji.name.to_lowercase().contains(&needle)
                    || emoji.id.to_lowercase().contains(&needle)
                    || emoji
                        .keywords
                        .iter()
                        .any(|k| k.to_lowercase().contains(&needle))
            })
            .collect()
    }

    pub fn quick_emojis(&self, count: usize) -> Vec<String> {
        if self.items.is_empty() {
            return FALLBACK_QUICK_EMOJIS
                .iter()
                .take(count)
                .map(|e| e.to_string())
                .collect();
        }
        self.items
            .iter()
            .take(count)
            .map(|e| e.native.clone())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    const SAMPLE: &str = r#"{
        "categories": [
            {"id": "people", "name": "Smileys & People", "emojis": ["joy", "clown", "joy"]},
            {"id": "nature", "name": "Animals & Nature", "emojis": ["fire", "ghost", "missing"]}
        ],
        "emojis": {
            "joy": {"id": "joy", "name": "Face with Tears of Joy", "keywords": ["laugh", "lol"], "skins": [{"native": "😂"}]},
            "clown": {"id": "clown", "name": "Clown Face", "skins": [{"native": "🤡"}]},
            "fire": {"id": "fire", "name": "Fire", "keywords": ["lit", "hot"], "skins": [{"native": "🔥"}]},
            "ghost": {"id": "ghost", "name": "Ghost", "skins": []}
        }
    }"#;

    #[test]
    fn every_category_has_eight_templates() {
        for category in MemeCategory::ALL {
            assert_eq!(templates_in(category).count(), 8);
        }
        assert_eq!(
            template_by_id("reaction-06").map(|t| t.name),
            Some("Sky Shock")
        );
        assert!(template_by_id("nope").is_none());
    }

    #[test]
    fn random_template_respects_category() {
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..20 {
            let t = random_template(Some(MemeCategory::Sarcastic), &mut rng);
            assert_eq!(t.category, MemeCategory::Sarcastic);
        }
    }

    #[test]
    fn catalog_skips_duplicates_and_emojis_without_skins() {
        let catalog = EmojiCatalog::from_json(SAMPLE).expect("parse catalog");
        let natives: Vec<&str> = catalog.all().iter().map(|e| e.native.as_str()).collect();
        assert_eq!(natives, vec!["😂", "🤡", "🔥"]);
        assert_eq!(catalog.categories().len(), 2);
        assert_eq!(catalog.in_category("nature").len(), 1);
        assert!(catalog.in_category("unknown").is_empty());
    }

    #[test]
    fn search_matches_name_id_and_keywords() {
        let catalog = EmojiCatalog::from_json(SAMPLE).expect("parse catalog");
        let hits = |q: &str| -> Vec<String> {
            catalog.search(q).into_iter().map(|e| e.id.clone()).collect()
        };
        assert_eq!(hits("  LOL "), vec!["joy"]);
        assert_eq!(hits("clo"), vec!["clown"]);
        assert_eq!(hits("fire"), vec!["fire"]);
        assert_eq!(hits("").len(), 3);
        assert!(hits("zebra").is_empty());
    }

    #[test]
    fn quick_emojis_fall_back_when_catalog_is_empty() {
        let empty = EmojiCatalog::default();
        assert_eq!(empty.quick_emojis(2), vec!["😂", "🔥"]);

        let catalog = EmojiCatalog::from_json(SAMPLE).expect("parse catalog");
        assert_eq!(catalog.quick_emojis(12).len(), 3);
    }
}
