use std::collections::HashSet;

use serde::Serialize;

/// Curated lists that don't reduce to a single genre/keyword/language filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CustomList {
    Upcoming,
    Healing,
    HiddenGems,
}

/// What a category actually queries on. Typed so a malformed category
/// definition cannot exist at runtime; the only startup check left is id
/// uniqueness.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategorySelector {
    Genre(u32),
    Keyword(u32),
    Language(&'static str),
    Custom(CustomList),
}

/// A static catalog-query template shown in the category menu.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CategoryItem {
    pub id: &'static str,
    pub name: &'static str,
    pub selector: CategorySelector,
    /// Genre whose affinity score ranks this item in the menu. Pinned items
    /// carry 0 and ignore it.
    pub sort_genre_id: u32,
}

impl CategoryItem {
    /// Upcoming and hidden gems lead the menu regardless of affinity.
    pub fn is_pinned(&self) -> bool {
        matches!(
            self.selector,
            CategorySelector::Custom(CustomList::Upcoming)
                | CategorySelector::Custom(CustomList::HiddenGems)
        )
    }

    pub fn is_upcoming(&self) -> bool {
        self.selector == CategorySelector::Custom(CustomList::Upcoming)
    }
}

/// The curated category menu, in table order.
pub static CATEGORIES: &[CategoryItem] = &[
    CategoryItem {
        id: "upcoming",
        name: "Coming Soon",
        selector: CategorySelector::Custom(CustomList::Upcoming),
        sort_genre_id: 0,
    },
    CategoryItem {
        id: "hidden_gems",
        name: "Hidden Gems",
        selector: CategorySelector::Custom(CustomList::HiddenGems),
        sort_genre_id: 0,
    },
    CategoryItem {
        id: "healing",
        name: "Feel-Good",
        selector: CategorySelector::Custom(CustomList::Healing),
        sort_genre_id: 10751,
    },
    CategoryItem {
        id: "romance",
        name: "Romance",
        selector: CategorySelector::Genre(10749),
        sort_genre_id: 10749,
    },
    CategoryItem {
        id: "comedy",
        name: "Comedy",
        selector: CategorySelector::Genre(35),
        sort_genre_id: 35,
    },
    CategoryItem {
        id: "mystery",
        name: "Mystery",
        selector: CategorySelector::Genre(9648),
        sort_genre_id: 9648,
    },
    CategoryItem {
        id: "sci_fi",
        name: "Sci-Fi",
        selector: CategorySelector::Genre(878),
        sort_genre_id: 878,
    },
    CategoryItem {
        id: "horror",
        name: "Horror",
        selector: CategorySelector::Genre(27),
        sort_genre_id: 27,
    },
    CategoryItem {
        id: "hong_kong",
        name: "Hong Kong Cinema",
        selector: CategorySelector::Language("cn"),
        sort_genre_id: 28,
    },
    CategoryItem {
        id: "animation",
        name: "Animation",
        selector: CategorySelector::Genre(16),
        sort_genre_id: 16,
    },
    CategoryItem {
        id: "crime",
        name: "Crime",
        selector: CategorySelector::Genre(80),
        sort_genre_id: 80,
    },
    CategoryItem {
        id: "true_stories",
        name: "True Stories",
        selector: CategorySelector::Keyword(9672),
        sort_genre_id: 18,
    },
];

/// Looks a category up by its menu id.
pub fn category_by_id(id: &str) -> Option<&'static CategoryItem> {
    CATEGORIES.iter().find(|category| category.id == id)
}

/// Startup guard: menu ids must be unique, since selection and menu routing
/// key off them.
pub fn validate_categories(items: &[CategoryItem]) -> Result<(), String> {
    let mut seen = HashSet::new();
    for item in items {
        if !seen.insert(item.id) {
            return Err(format!("duplicate category id: {}", item.id));
        }
    }
    Ok(())
}
