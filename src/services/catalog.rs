//! Filtering and ordering of catalog views.
//!
//! Views are computed from a borrowed slice; the source list is never
//! reordered. All sorts are stable so ties keep their source order.

use std::cmp::Ordering;

use feruca::Collator;

use crate::domain::{Catalog, FilterState, SortMode};
use crate::models::{SheetItem, UserRate};

/// What the engine needs to know about a catalog entry.
pub trait CatalogEntry {
    /// Lowercased text the query is matched against.
    fn search_text(&self) -> String;

    /// Lowercased kind used by the category filter.
    fn kind(&self) -> String;

    /// The owner's score, 0 when unrated.
    fn rating(&self) -> f64;

    /// Secondary identity: larger means added later.
    fn chronology(&self) -> i64;

    /// Lowercased name for alphabetical ordering.
    fn sort_name(&self) -> String;
}

impl CatalogEntry for UserRate {
    fn search_text(&self) -> String {
        self.anime
            .as_ref()
            .map(crate::models::AnimeRecord::search_text)
            .unwrap_or_default()
    }

    fn kind(&self) -> String {
        self.anime
            .as_ref()
            .map(crate::models::AnimeRecord::kind_normalized)
            .unwrap_or_default()
    }

    fn rating(&self) -> f64 {
        f64::from(self.score)
    }

    fn chronology(&self) -> i64 {
        self.rate_id
    }

    fn sort_name(&self) -> String {
        self.anime
            .as_ref()
            .and_then(crate::models::AnimeRecord::display_title)
            .unwrap_or("")
            .to_lowercase()
    }
}

impl CatalogEntry for SheetItem {
    fn search_text(&self) -> String {
        format!("{} {} {}", self.name_ru, self.name_orig, self.genres_text).to_lowercase()
    }

    fn kind(&self) -> String {
        self.kind.to_lowercase()
    }

    fn rating(&self) -> f64 {
        self.my_score.unwrap_or(0.0)
    }

    fn chronology(&self) -> i64 {
        self.first_date_ts
    }

    fn sort_name(&self) -> String {
        if self.name_ru.is_empty() {
            self.name_orig.to_lowercase()
        } else {
            self.name_ru.to_lowercase()
        }
    }
}

/// Keyword groups of the movies sheet's free-form type column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MovieCategory {
    Film,
    Series,
    Drama,
    Cartoon,
}

impl MovieCategory {
    /// Classification order: a cartoon is also a "фильм", so it goes first.
    pub const CLASSIFY_ORDER: [Self; 4] = [Self::Cartoon, Self::Drama, Self::Series, Self::Film];

    const fn filter_names(self) -> &'static [&'static str] {
        match self {
            Self::Film => &["фильмы", "film", "movie"],
            Self::Series => &["сериалы", "series", "tv"],
            Self::Drama => &["дорамы", "drama", "dorama"],
            Self::Cartoon => &["м/ф", "cartoon"],
        }
    }

    const fn keywords(self) -> &'static [&'static str] {
        match self {
            Self::Film => &["фильм", "film", "movie"],
            Self::Series => &["сериал", "series", "tv"],
            Self::Drama => &["дорама", "drama", "dorama"],
            Self::Cartoon => &["м/ф", "cartoon", "анимация"],
        }
    }

    /// The group a filter value names, if any.
    #[must_use]
    pub fn from_filter(value: &str) -> Option<Self> {
        let value = value.to_lowercase();
        Self::CLASSIFY_ORDER
            .into_iter()
            .find(|c| c.filter_names().contains(&value.as_str()))
    }

    #[must_use]
    pub fn matches(self, kind: &str) -> bool {
        let kind = kind.to_lowercase();
        self.keywords().iter().any(|k| kind.contains(k))
    }

    #[must_use]
    pub fn classify(kind: &str) -> Option<Self> {
        Self::CLASSIFY_ORDER.into_iter().find(|c| c.matches(kind))
    }
}

fn matches_category(catalog: Catalog, entry_kind: &str, filter: &str) -> bool {
    if catalog == Catalog::Movies
        && let Some(group) = MovieCategory::from_filter(filter)
    {
        return group.matches(entry_kind);
    }
    entry_kind == filter.to_lowercase()
}

/// Entries matching both the query and the category filter.
#[must_use]
pub fn filter_entries<'a, T: CatalogEntry>(
    items: &'a [T],
    catalog: Catalog,
    query: &str,
    kind: &str,
) -> Vec<&'a T> {
    let query = query.trim().to_lowercase();
    let kind = kind.trim();

    items
        .iter()
        .filter(|item| query.is_empty() || item.search_text().contains(&query))
        .filter(|item| kind.is_empty() || matches_category(catalog, &item.kind(), kind))
        .collect()
}

/// Stable sort of a view. [`SortMode::Unchanged`] keeps the order.
pub fn sort_entries<T: CatalogEntry>(view: &mut [&T], mode: SortMode) {
    let compare: fn(&&T, &&T) -> Ordering = match mode {
        SortMode::RatingDesc => |a, b| b.rating().total_cmp(&a.rating()),
        SortMode::RatingAsc => |a, b| a.rating().total_cmp(&b.rating()),
        SortMode::Newest => |a, b| b.chronology().cmp(&a.chronology()),
        SortMode::Oldest => |a, b| a.chronology().cmp(&b.chronology()),
        SortMode::NameAsc => return sort_by_name(view, false),
        SortMode::NameDesc => return sort_by_name(view, true),
        SortMode::Unchanged => return,
    };
    view.sort_by(compare);
}

/// Alphabetical order under the CLDR root collation, so `ё` sits next to
/// `е` instead of after `я`.
fn sort_by_name<'a, T: CatalogEntry>(view: &mut [&'a T], descending: bool) {
    let mut collator = Collator::default();
    let mut keyed: Vec<(String, &'a T)> = view.iter().map(|e| (e.sort_name(), *e)).collect();

    keyed.sort_by(|(a, _), (b, _)| {
        let order = collator.collate(a.as_str(), b.as_str());
        if descending { order.reverse() } else { order }
    });

    for (slot, (_, entry)) in view.iter_mut().zip(keyed) {
        *slot = entry;
    }
}

/// Filters and sorts into a new owned list.
#[must_use]
pub fn apply<T: CatalogEntry + Clone>(items: &[T], catalog: Catalog, filter: &FilterState) -> Vec<T> {
    let mut view = filter_entries(items, catalog, &filter.q, &filter.kind);
    sort_entries(&mut view, filter.sort_mode());
    view.into_iter().cloned().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AnimeRecord;

    fn rate(id: i64, score: i32, name: &str, kind: &str) -> UserRate {
        UserRate {
            id,
            score,
            status: None,
            anime: Some(AnimeRecord {
                id: id * 10,
                name: Some(name.to_string()),
                kind: Some(kind.to_string()),
                synonyms: vec![format!("{name} alt")],
                ..AnimeRecord::default()
            }),
            rate_id: id,
        }
    }

    fn filter(q: &str, kind: &str, sort: &str) -> FilterState {
        FilterState {
            q: q.to_string(),
            kind: kind.to_string(),
            sort: sort.to_string(),
        }
    }

    fn ids(list: &[UserRate]) -> Vec<i64> {
        list.iter().map(|r| r.id).collect()
    }

    #[test]
    fn test_sort_is_stable_on_ties() {
        let list = vec![
            rate(1, 8, "A", "tv"),
            rate(2, 9, "B", "tv"),
            rate(3, 8, "C", "tv"),
            rate(4, 8, "D", "tv"),
        ];

        let sorted = apply(&list, Catalog::Anime, &filter("", "", "rate_desc"));
        assert_eq!(ids(&sorted), vec![2, 1, 3, 4]);

        let sorted = apply(&list, Catalog::Anime, &filter("", "", "rate_asc"));
        assert_eq!(ids(&sorted), vec![1, 3, 4, 2]);
    }

    #[test]
    fn test_default_is_newest_and_unknown_keeps_order() {
        let list = vec![rate(5, 0, "x", "tv"), rate(9, 0, "y", "tv"), rate(7, 0, "z", "tv")];
        assert_eq!(ids(&apply(&list, Catalog::Anime, &filter("", "", ""))), vec![9, 7, 5]);
        assert_eq!(ids(&apply(&list, Catalog::Anime, &filter("", "", "date_old"))), vec![5, 7, 9]);
        assert_eq!(ids(&apply(&list, Catalog::Anime, &filter("", "", "bogus"))), vec![5, 9, 7]);
    }

    #[test]
    fn test_query_and_category_compose() {
        let list = vec![
            rate(1, 0, "Naruto", "tv"),
            rate(2, 0, "Naruto Movie", "movie"),
            rate(3, 0, "Bleach", "tv"),
        ];

        let view = apply(&list, Catalog::Anime, &filter("NARUTO", "TV", "date_old"));
        assert_eq!(ids(&view), vec![1]);

        let view = apply(&list, Catalog::Anime, &filter("naruto alt", "", "date_old"));
        assert_eq!(ids(&view), vec![1]);

        let view = apply(&list, Catalog::Anime, &filter("", "movie", ""));
        assert_eq!(ids(&view), vec![2]);

        assert_eq!(list.len(), 3);
        assert_eq!(ids(&list), vec![1, 2, 3]);
    }

    #[test]
    fn test_name_sort_case_insensitive() {
        let list = vec![rate(1, 0, "beta", "tv"), rate(2, 0, "Alpha", "tv"), rate(3, 0, "gamma", "tv")];
        assert_eq!(ids(&apply(&list, Catalog::Anime, &filter("", "", "name_az"))), vec![2, 1, 3]);
        assert_eq!(ids(&apply(&list, Catalog::Anime, &filter("", "", "name_za"))), vec![3, 1, 2]);
    }

    #[test]
    fn test_name_sort_follows_cyrillic_alphabet() {
        let list = vec![
            sheet(1, "Яблоко", "Фильм", ""),
            sheet(2, "Ёлка", "Фильм", ""),
            sheet(3, "Ель", "Фильм", ""),
            sheet(4, "Жук", "Фильм", ""),
        ];

        let names = |sort: &str| -> Vec<String> {
            apply(&list, Catalog::Movies, &filter("", "", sort))
                .into_iter()
                .map(|i| i.name_ru)
                .collect()
        };

        assert_eq!(names("name_az"), vec!["Ёлка", "Ель", "Жук", "Яблоко"]);
        assert_eq!(names("name_za"), vec!["Яблоко", "Жук", "Ель", "Ёлка"]);
    }

    fn sheet(row: usize, name_ru: &str, kind: &str, genres: &str) -> SheetItem {
        SheetItem {
            row_index: row,
            name_ru: name_ru.to_string(),
            kind: kind.to_string(),
            genres_text: genres.to_string(),
            first_date_ts: i64::try_from(row).unwrap(),
            ..SheetItem::default()
        }
    }

    #[test]
    fn test_movie_category_groups() {
        let list = vec![
            sheet(2, "Интерстеллар", "Фильм", "Фантастика"),
            sheet(3, "Шрек", "М/ф", "Комедия"),
            sheet(4, "Во все тяжкие", "Сериал", "Драма"),
            sheet(5, "Корона", "Дорама", "Драма"),
        ];

        let rows = |kind: &str| -> Vec<usize> {
            apply(&list, Catalog::Movies, &filter("", kind, "date_asc"))
                .iter()
                .map(|i| i.row_index)
                .collect()
        };

        assert_eq!(rows("фильмы"), vec![2]);
        assert_eq!(rows("tv"), vec![4]);
        assert_eq!(rows("cartoon"), vec![3]);
        assert_eq!(rows("drama"), vec![5]);
        assert_eq!(rows("Сериал"), vec![4]);

        let by_genre = apply(&list, Catalog::Movies, &filter("драма", "", "date_asc"));
        assert_eq!(by_genre.len(), 2);
    }

    #[test]
    fn test_classify_checks_cartoons_first() {
        assert_eq!(MovieCategory::classify("Мультфильм (анимация)"), Some(MovieCategory::Cartoon));
        assert_eq!(MovieCategory::classify("Фильм"), Some(MovieCategory::Film));
        assert_eq!(MovieCategory::classify("TV сериал"), Some(MovieCategory::Series));
        assert_eq!(MovieCategory::classify("Документалка"), None);
    }
}
