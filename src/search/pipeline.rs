//! Client-side filter and sort projection.
//!
//! [`project`] derives the displayed list from the raw result set and the
//! filter state. It performs no I/O and never mutates its input; entries are
//! shared `Arc`s, so the output holds the same allocations as the input.

use crate::domain::{BookSummary, FilterState, SortOrder};
use std::sync::Arc;

/// Applies the filters in a fixed order, then sorts by effective year.
///
/// Order: cover, author substring, lower year bound, upper year bound,
/// language, sort. Books without a year count as year `0` for both the bounds
/// and the sort. The sort is stable, so equal years keep their source order.
///
/// # Examples
///
/// ```
/// use bookfinder::domain::{BookSummary, FilterState, SortOrder};
/// use bookfinder::search::project;
/// use std::sync::Arc;
///
/// let mut old = BookSummary::new("/works/OL1W", "Old");
/// old.first_publish_year = Some(1900);
/// let mut new = BookSummary::new("/works/OL2W", "New");
/// new.first_publish_year = Some(2000);
///
/// let raw = vec![Arc::new(new), Arc::new(old)];
/// let filters = FilterState { sort_by_year: Some(SortOrder::Asc), ..Default::default() };
/// let shown = project(&raw, &filters);
/// assert_eq!(shown[0].title, "Old");
/// assert!(Arc::ptr_eq(&shown[0], &raw[1]));
/// ```
#[must_use]
pub fn project(raw: &[Arc<BookSummary>], filters: &FilterState) -> Vec<Arc<BookSummary>> {
    let author = filters.author.trim().to_lowercase();
    let language = filters
        .language
        .as_deref()
        .map(str::trim)
        .filter(|lang| !lang.is_empty())
        .map(str::to_lowercase);

    let mut shown: Vec<Arc<BookSummary>> = raw
        .iter()
        .filter(|book| !filters.only_with_cover || book.cover_id.is_some())
        .filter(|book| author.is_empty() || matches_author(book, &author))
        .filter(|book| filters.year_from.map_or(true, |from| book.effective_year() >= from))
        .filter(|book| filters.year_to.map_or(true, |to| book.effective_year() <= to))
        .filter(|book| {
            language
                .as_deref()
                .map_or(true, |lang| book.languages.iter().any(|l| l.to_lowercase() == lang))
        })
        .cloned()
        .collect();

    match filters.sort_by_year {
        Some(SortOrder::Asc) => shown.sort_by_key(|book| book.effective_year()),
        Some(SortOrder::Desc) => shown.sort_by(|a, b| b.effective_year().cmp(&a.effective_year())),
        None => {}
    }

    shown
}

fn matches_author(book: &BookSummary, needle: &str) -> bool {
    book.author_names
        .iter()
        .any(|name| name.to_lowercase().contains(needle))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::FilterUpdate;
    use crate::testing::book;

    fn raw(books: Vec<BookSummary>) -> Vec<Arc<BookSummary>> {
        books.into_iter().map(Arc::new).collect()
    }

    fn years(books: &[Arc<BookSummary>]) -> Vec<Option<i32>> {
        books.iter().map(|b| b.first_publish_year).collect()
    }

    #[test]
    fn test_ascending_sort_puts_missing_year_first() {
        let raw = raw(vec![
            book("/works/OL1W", "A", Some(1990)),
            book("/works/OL2W", "B", None),
            book("/works/OL3W", "C", Some(2001)),
        ]);
        let mut filters = FilterState::default();
        filters.apply(FilterUpdate::Sort("asc".into()));

        assert_eq!(years(&project(&raw, &filters)), vec![None, Some(1990), Some(2001)]);
    }

    #[test]
    fn test_descending_sort_is_stable() {
        let raw = raw(vec![
            book("/works/OL1W", "first", Some(1990)),
            book("/works/OL2W", "second", Some(2001)),
            book("/works/OL3W", "third", Some(1990)),
        ]);
        let filters = FilterState {
            sort_by_year: Some(SortOrder::Desc),
            ..Default::default()
        };

        let titles: Vec<_> = project(&raw, &filters).iter().map(|b| b.title.clone()).collect();
        assert_eq!(titles, vec!["second", "first", "third"]);
    }

    #[test]
    fn test_year_bounds_are_inclusive_and_treat_missing_as_zero() {
        let raw = raw(vec![
            book("/works/OL1W", "A", Some(1950)),
            book("/works/OL2W", "B", None),
            book("/works/OL3W", "C", Some(1960)),
            book("/works/OL4W", "D", Some(1970)),
        ]);
        let filters = FilterState {
            year_from: Some(1950),
            year_to: Some(1960),
            ..Default::default()
        };
        assert_eq!(years(&project(&raw, &filters)), vec![Some(1950), Some(1960)]);

        let upper_only = FilterState {
            year_to: Some(1955),
            ..Default::default()
        };
        assert_eq!(years(&project(&raw, &upper_only)), vec![Some(1950), None]);
    }

    #[test]
    fn test_author_and_language_are_case_insensitive() {
        let mut tolkien = book("/works/OL1W", "The Hobbit", Some(1937));
        tolkien.author_names = vec!["J.R.R. Tolkien".into()];
        tolkien.languages = vec!["eng".into()];
        let mut lewis = book("/works/OL2W", "Narnia", Some(1950));
        lewis.author_names = vec!["C.S. Lewis".into()];
        lewis.languages = vec!["fre".into()];
        let raw = raw(vec![tolkien, lewis]);

        let by_author = FilterState {
            author: "  TOLK ".into(),
            ..Default::default()
        };
        assert_eq!(project(&raw, &by_author).len(), 1);

        let by_language = FilterState {
            language: Some("FRE".into()),
            ..Default::default()
        };
        let shown = project(&raw, &by_language);
        assert_eq!(shown.len(), 1);
        assert_eq!(shown[0].title, "Narnia");
    }

    #[test]
    fn test_cover_filter() {
        let mut covered = book("/works/OL1W", "Covered", None);
        covered.cover_id = Some(1);
        let raw = raw(vec![covered, book("/works/OL2W", "Bare", None)]);
        let filters = FilterState {
            only_with_cover: true,
            ..Default::default()
        };

        let shown = project(&raw, &filters);
        assert_eq!(shown.len(), 1);
        assert_eq!(shown[0].title, "Covered");
    }

    #[test]
    fn test_cover_and_language_filters_combine_in_either_order() {
        let mut kept = book("/works/OL1W", "Kept", Some(1965));
        kept.cover_id = Some(1);
        kept.languages = vec!["eng".into()];
        let mut bare = book("/works/OL2W", "No cover", Some(1970));
        bare.languages = vec!["eng".into()];
        let mut french = book("/works/OL3W", "French", Some(1980));
        french.cover_id = Some(3);
        french.languages = vec!["fre".into()];
        let raw = raw(vec![kept, bare, french]);

        let mut cover_first = FilterState::default();
        cover_first.apply(FilterUpdate::OnlyWithCover(true));
        cover_first.apply(FilterUpdate::Language("eng".into()));

        let mut language_first = FilterState::default();
        language_first.apply(FilterUpdate::Language("eng".into()));
        language_first.apply(FilterUpdate::OnlyWithCover(true));

        assert_eq!(cover_first, language_first);
        for filters in [&cover_first, &language_first] {
            let shown = project(&raw, filters);
            assert_eq!(shown.len(), 1);
            assert!(Arc::ptr_eq(&shown[0], &raw[0]));
        }
    }

    #[test]
    fn test_projection_is_idempotent_and_identity_preserving() {
        let raw = raw(vec![
            book("/works/OL1W", "A", Some(2001)),
            book("/works/OL2W", "B", Some(1990)),
        ]);
        let filters = FilterState {
            year_from: Some(1980),
            sort_by_year: Some(SortOrder::Asc),
            ..Default::default()
        };

        let once = project(&raw, &filters);
        let twice = project(&once, &filters);
        assert_eq!(once, twice);
        assert!(once.iter().zip(&twice).all(|(a, b)| Arc::ptr_eq(a, b)));
        assert!(Arc::ptr_eq(&once[0], &raw[1]));
    }

    #[test]
    fn test_empty_filters_keep_source_order() {
        let raw = raw(vec![
            book("/works/OL1W", "A", Some(2001)),
            book("/works/OL2W", "B", None),
        ]);
        assert_eq!(project(&raw, &FilterState::default()), raw);
    }
}
