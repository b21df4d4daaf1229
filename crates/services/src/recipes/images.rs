//! Recipe illustration picker.
//!
//! Illustrations come from a fixed Unsplash catalog. Dish keywords map to
//! a specific photo; when nothing matches, each category falls back to one
//! of two stock photos picked at random. Matching is case- and
//! accent-insensitive and tries the dish name before the model-provided
//! image query.

use rand::RngExt;

const IMAGE_PREFIX: &str = "https://images.unsplash.com/";
const IMAGE_SUFFIX: &str = "?q=80&w=500&auto=format&fit=crop";

/// Keyword → photo id, checked in order; the first keyword contained in
/// the normalized text wins.
const DISH_IMAGES: &[(&str, &str)] = &[
    ("ratatouille", "photo-1572453800999-e8d2d1589b7c"),
    ("lasagnes", "photo-1619895092538-128341789043"),
    ("tiramisu", "photo-1571877227200-a0d98ea2dda9"),
    ("pizza", "photo-1513104890138-7c749659a591"),
    ("salade", "photo-1546793665-c74683f339c1"),
    ("soupe", "photo-1603105037880-880cd4edfb0d"),
    ("poulet", "photo-1598515214211-89d3c73ae83b"),
    ("boeuf", "photo-1545465270-b28c0992c8ff"),
    ("poisson", "photo-1519708227418-c8fd9a32b7a2"),
    ("pates", "photo-1546549032-9571cd6b27df"),
    ("riz", "photo-1536304993881-ff6e9eefa2a6"),
    ("gateau", "photo-1563729784474-d77dbb933a9e"),
    ("tarte", "photo-1621743478914-cc8a86d7e7b5"),
    ("quiche", "photo-1588165171080-c89acfa5a696"),
    ("omelette", "photo-1510693206972-df098062cb71"),
    ("curry", "photo-1604152135912-04a022e23696"),
    ("sandwich", "photo-1528735602780-2552fd46c7af"),
    ("yaourt", "photo-1547592166-23ac45744acd"),
    ("muesli", "photo-1546548970-71785318a17b"),
    ("salade de fruits", "photo-1566443280617-55417af5536d"),
    ("smoothie", "photo-1505252585461-04db1eb84625"),
    ("crepes", "photo-1586489549737-34b078749399"),
];

const CATEGORY_IMAGES: &[(&str, [&str; 2])] = &[
    (
        "Plats principaux",
        ["photo-1547592180-85f173990554", "photo-1512058564366-18510be2db19"],
    ),
    (
        "Desserts",
        ["photo-1551024506-0bcbd69ad6b0", "photo-1542124937-d67b5330d973"],
    ),
    (
        "Petit-déjeuner",
        ["photo-1533089860892-a9c9970ae01a", "photo-1525351484163-7529414344d8"],
    ),
    (
        "Collations",
        ["photo-1505253716362-afaea1d3d1af", "photo-1558961363-fa8fdf82db35"],
    ),
    (
        "Soupes et salades",
        ["photo-1603105037880-880cd4edfb0d", "photo-1547496502-affa22d38842"],
    ),
    (
        "Accompagnements",
        ["photo-1534939561126-855b8675edd7", "photo-1544928147-79a2dbc1f389"],
    ),
];

/// Pick the illustration URL for a recipe.
///
/// The dish name is matched first, then `image_query`; with no match the
/// category's fallback pair is drawn from at random.
pub fn find_recipe_image(name: &str, category: &str, image_query: Option<&str>) -> String {
    let photo = dish_match(name)
        .or_else(|| image_query.and_then(dish_match))
        .unwrap_or_else(|| category_fallback(category));
    format!("{IMAGE_PREFIX}{photo}{IMAGE_SUFFIX}")
}

fn dish_match(text: &str) -> Option<&'static str> {
    let normalized = normalize(text);
    DISH_IMAGES
        .iter()
        .find(|(keyword, _)| normalized.contains(*keyword))
        .map(|(_, photo)| *photo)
}

fn category_fallback(category: &str) -> &'static str {
    let photos = CATEGORY_IMAGES
        .iter()
        .find(|(known, _)| *known == category)
        .map(|(_, photos)| photos)
        .unwrap_or(&CATEGORY_IMAGES[0].1);
    photos[rand::rng().random_range(0..photos.len())]
}

/// Lowercase and fold the French accented letters so "Pâtes" matches "pates".
fn normalize(text: &str) -> String {
    text.to_lowercase()
        .chars()
        .map(|c| match c {
            'à' | 'â' | 'ä' => 'a',
            'é' | 'è' | 'ê' | 'ë' => 'e',
            'î' | 'ï' => 'i',
            'ô' | 'ö' => 'o',
            'ù' | 'û' | 'ü' => 'u',
            'ç' => 'c',
            'ÿ' => 'y',
            'ñ' => 'n',
            other => other,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dish_name_takes_precedence_over_query() {
        let url = find_recipe_image("Tarte aux pommes", "Desserts", Some("smoothie aux fruits"));
        assert_eq!(
            url,
            "https://images.unsplash.com/photo-1621743478914-cc8a86d7e7b5?q=80&w=500&auto=format&fit=crop"
        );
    }

    #[test]
    fn test_matching_folds_accents_and_case() {
        let url = find_recipe_image("Pâtes à la bolognaise", "Plats principaux", None);
        assert!(url.contains("photo-1546549032-9571cd6b27df"));

        let url = find_recipe_image("GÂTEAU au chocolat", "Desserts", None);
        assert!(url.contains("photo-1563729784474-d77dbb933a9e"));
    }

    #[test]
    fn test_query_matched_when_name_is_unknown() {
        let url = find_recipe_image("Plat mystère", "Plats principaux", Some("curry de légumes"));
        assert!(url.contains("photo-1604152135912-04a022e23696"));
    }

    #[test]
    fn test_first_keyword_containment_wins() {
        // "salade" sits before "salade de fruits" in the catalog
        let url = find_recipe_image("Salade de fruits frais", "Desserts", None);
        assert!(url.contains("photo-1546793665-c74683f339c1"));
    }

    #[test]
    fn test_category_fallback_draws_from_its_pair() {
        let expected = [
            "https://images.unsplash.com/photo-1551024506-0bcbd69ad6b0?q=80&w=500&auto=format&fit=crop",
            "https://images.unsplash.com/photo-1542124937-d67b5330d973?q=80&w=500&auto=format&fit=crop",
        ];
        for _ in 0..20 {
            let url = find_recipe_image("Douceur inconnue", "Desserts", None);
            assert!(expected.contains(&url.as_str()));
        }
    }

    #[test]
    fn test_unknown_category_falls_back_to_main_dishes() {
        let expected = [
            "https://images.unsplash.com/photo-1547592180-85f173990554?q=80&w=500&auto=format&fit=crop",
            "https://images.unsplash.com/photo-1512058564366-18510be2db19?q=80&w=500&auto=format&fit=crop",
        ];
        for _ in 0..20 {
            let url = find_recipe_image("Plat mystère", "Cuisine fusion", None);
            assert!(expected.contains(&url.as_str()));
        }
    }
}
