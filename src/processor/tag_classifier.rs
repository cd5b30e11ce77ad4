/// Controlled vocabulary of category tags. Matching is substring-based, so
/// the plural forms only hit when the source text uses them verbatim; the
/// synonym table below catches the common singular/variant spellings.
const VOCABULARY: &[&str] = &[
    "Hoodies",
    "Co-ords",
    "T-Shirts",
    "Baby Tees",
    "Cute Tops",
    "Tanks",
    "Tops",
    "Shades",
    "Bottoms",
    "Dresses",
    "Accessories",
    "Sweatshirts",
    "Camisole",
    "Crop Tops",
    "Hats",
    "Skirts",
    "Sweaters",
];

/// Alias -> canonical tag. Aliases are matched case-insensitively against
/// the same three text sources as the vocabulary.
const SYNONYMS: &[(&str, &str)] = &[
    ("hoodie", "Hoodies"),
    ("hoody", "Hoodies"),
    ("co ord", "Co-ords"),
    ("co-ord", "Co-ords"),
    ("tshirt", "T-Shirts"),
    ("t shirt", "T-Shirts"),
    ("t-shirt", "T-Shirts"),
    ("baby tee", "Baby Tees"),
    ("crop top", "Crop Tops"),
    ("cute top", "Cute Tops"),
    ("tank top", "Tanks"),
    ("tanktop", "Tanks"),
    ("top", "Tops"),
    ("sunglasses", "Shades"),
    ("shade", "Shades"),
    ("pant", "Bottoms"),
    ("jeans", "Bottoms"),
    ("dress", "Dresses"),
    ("skirt", "Skirts"),
    ("sweater", "Sweaters"),
    ("hat", "Hats"),
    ("jewelry", "Accessories"),
    ("jewellery", "Accessories"),
    ("accessory", "Accessories"),
    ("sweatshirt", "Sweatshirts"),
    ("sweat shirt", "Sweatshirts"),
    ("camisole", "Camisole"),
];

/// Best-effort mapping from free text to the tag vocabulary. False
/// negatives are expected; an unmatched category still surfaces as a raw
/// tag so `tags` is never empty when a category exists.
pub struct TagClassifier;

impl TagClassifier {
    pub fn new() -> Self {
        TagClassifier
    }

    /// Tags in order of first discovery across name, then description,
    /// then category; each tag appears at most once.
    pub fn classify(&self, name: &str, description: &str, category: &str) -> Vec<String> {
        let sources = [
            name.to_lowercase(),
            description.to_lowercase(),
            category.to_lowercase(),
        ];

        let mut tags: Vec<String> = Vec::new();

        for tag in VOCABULARY {
            let needle = tag.to_lowercase();
            if sources.iter().any(|source| source.contains(&needle)) {
                push_unique(&mut tags, tag);
            }
        }

        for (alias, tag) in SYNONYMS {
            if sources.iter().any(|source| source.contains(alias)) {
                push_unique(&mut tags, tag);
            }
        }

        if tags.is_empty() && !category.is_empty() {
            tags.push(category.to_string());
        }

        tags
    }
}

impl Default for TagClassifier {
    fn default() -> Self {
        Self::new()
    }
}

fn push_unique(tags: &mut Vec<String>, tag: &str) {
    if !tags.iter().any(|existing| existing == tag) {
        tags.push(tag.to_string());
    }
}
