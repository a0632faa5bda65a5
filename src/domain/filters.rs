//! Client-side filter state.
//!
//! [`FilterState`] is the session-scoped set of refinements applied to the raw
//! result set by [`crate::search::pipeline::project`]. Absent or blank fields
//! mean "no constraint". Text coming from the user is normalized on the way in
//! (see [`parse_year`] and [`FilterState::apply`]) so the pipeline only ever sees
//! clean values.

/// Direction for sorting by effective year.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    /// Parses `asc` / `desc` (case-insensitive). Anything else means no sorting.
    #[must_use]
    pub fn parse(text: &str) -> Option<Self> {
        match text.trim().to_ascii_lowercase().as_str() {
            "asc" => Some(Self::Asc),
            "desc" => Some(Self::Desc),
            _ => None,
        }
    }

    const fn label(self) -> &'static str {
        match self {
            Self::Asc => "Asc",
            Self::Desc => "Desc",
        }
    }
}

/// Identifies one field of [`FilterState`], used to clear a single chip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterField {
    Cover,
    Author,
    YearFrom,
    YearTo,
    Language,
    Sort,
}

/// A single user edit to the filter state, carrying raw input text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterUpdate {
    OnlyWithCover(bool),
    Author(String),
    YearFrom(String),
    YearTo(String),
    Language(String),
    Sort(String),
}

/// A label describing one active constraint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterChip {
    pub field: FilterField,
    pub label: String,
}

/// Refinements applied to the raw result set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterState {
    pub only_with_cover: bool,
    pub author: String,
    pub year_from: Option<i32>,
    pub year_to: Option<i32>,
    pub language: Option<String>,
    pub sort_by_year: Option<SortOrder>,
}

/// Parses a year field. Blank or non-integer text is treated as absent.
///
/// # Examples
///
/// ```
/// use bookfinder::domain::filters::parse_year;
///
/// assert_eq!(parse_year(" 1990 "), Some(1990));
/// assert_eq!(parse_year("19x0"), None);
/// assert_eq!(parse_year(""), None);
/// ```
#[must_use]
pub fn parse_year(text: &str) -> Option<i32> {
    text.trim().parse::<i32>().ok()
}

impl FilterState {
    /// Applies a user edit.
    pub fn apply(&mut self, update: FilterUpdate) {
        match update {
            FilterUpdate::OnlyWithCover(on) => self.only_with_cover = on,
            FilterUpdate::Author(text) => self.author = text,
            FilterUpdate::YearFrom(text) => self.year_from = parse_year(&text),
            FilterUpdate::YearTo(text) => self.year_to = parse_year(&text),
            FilterUpdate::Language(text) => {
                let code = text.trim();
                self.language = (!code.is_empty()).then(|| code.to_string());
            }
            FilterUpdate::Sort(text) => self.sort_by_year = SortOrder::parse(&text),
        }
    }

    /// Clears a single field back to "no constraint".
    pub fn clear(&mut self, field: FilterField) {
        match field {
            FilterField::Cover => self.only_with_cover = false,
            FilterField::Author => self.author.clear(),
            FilterField::YearFrom => self.year_from = None,
            FilterField::YearTo => self.year_to = None,
            FilterField::Language => self.language = None,
            FilterField::Sort => self.sort_by_year = None,
        }
    }

    /// Resets every field.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Returns `true` when no constraint is active.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.chips().is_empty()
    }

    /// Lists the active constraints in display order.
    #[must_use]
    pub fn chips(&self) -> Vec<FilterChip> {
        let mut chips = Vec::new();
        if self.only_with_cover {
            chips.push(FilterChip { field: FilterField::Cover, label: "With cover".to_string() });
        }
        let author = self.author.trim();
        if !author.is_empty() {
            chips.push(FilterChip { field: FilterField::Author, label: format!("Author: {author}") });
        }
        if let Some(year) = self.year_from {
            chips.push(FilterChip { field: FilterField::YearFrom, label: format!("From: {year}") });
        }
        if let Some(year) = self.year_to {
            chips.push(FilterChip { field: FilterField::YearTo, label: format!("To: {year}") });
        }
        if let Some(lang) = &self.language {
            chips.push(FilterChip { field: FilterField::Language, label: format!("Language: {lang}") });
        }
        if let Some(order) = self.sort_by_year {
            chips.push(FilterChip { field: FilterField::Sort, label: format!("Year: {}", order.label()) });
        }
        chips
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unparseable_years_are_absent() {
        let mut filters = FilterState::default();
        filters.apply(FilterUpdate::YearFrom("abc".to_string()));
        filters.apply(FilterUpdate::YearTo("2001".to_string()));
        assert_eq!(filters.year_from, None);
        assert_eq!(filters.year_to, Some(2001));
    }

    #[test]
    fn test_blank_language_is_absent() {
        let mut filters = FilterState::default();
        filters.apply(FilterUpdate::Language("  ".to_string()));
        assert_eq!(filters.language, None);
        filters.apply(FilterUpdate::Language(" eng ".to_string()));
        assert_eq!(filters.language.as_deref(), Some("eng"));
    }

    #[test]
    fn test_sort_parse() {
        assert_eq!(SortOrder::parse("ASC"), Some(SortOrder::Asc));
        assert_eq!(SortOrder::parse("desc"), Some(SortOrder::Desc));
        assert_eq!(SortOrder::parse("none"), None);
    }

    #[test]
    fn test_chips_and_clear() {
        let mut filters = FilterState::default();
        assert!(filters.is_empty());

        filters.apply(FilterUpdate::OnlyWithCover(true));
        filters.apply(FilterUpdate::Author(" Tolkien ".to_string()));
        filters.apply(FilterUpdate::Sort("desc".to_string()));

        let labels: Vec<String> = filters.chips().into_iter().map(|c| c.label).collect();
        assert_eq!(labels, vec!["With cover", "Author: Tolkien", "Year: Desc"]);

        filters.clear(FilterField::Author);
        assert_eq!(filters.chips().len(), 2);

        filters.reset();
        assert!(filters.is_empty());
    }

    #[test]
    fn test_blank_author_has_no_chip() {
        let mut filters = FilterState::default();
        filters.apply(FilterUpdate::Author("   ".to_string()));
        assert!(filters.is_empty());
    }
}
