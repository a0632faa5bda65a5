//! Line command parsing for the terminal driver.
//!
//! Plain text replaces the query, an empty line submits it, and lines starting
//! with `:` are commands (see `:help`).

use crate::app::Event;
use crate::domain::{FilterField, FilterUpdate};

/// Parses one input line into an [`Event`].
///
/// # Errors
///
/// Returns a user-facing message for unknown commands or bad arguments.
///
/// # Example
///
/// ```rust
/// use bookfinder::app::input::parse_command;
/// use bookfinder::app::Event;
///
/// assert_eq!(parse_command("dune"), Ok(Event::Input("dune".into())));
/// assert_eq!(parse_command(""), Ok(Event::Submit));
/// assert_eq!(parse_command(":fav 2"), Ok(Event::ToggleFavorite(2)));
/// assert!(parse_command(":fav x").is_err());
/// ```
pub fn parse_command(line: &str) -> Result<Event, String> {
    let line = line.trim_end_matches(['\r', '\n']);
    let Some(command) = line.trim_start().strip_prefix(':') else {
        if line.trim().is_empty() {
            return Ok(Event::Submit);
        }
        return Ok(Event::Input(line.to_string()));
    };

    let (name, arg) = command
        .trim()
        .split_once(char::is_whitespace)
        .map_or((command.trim(), ""), |(name, arg)| (name, arg.trim()));

    let event = match name.to_ascii_lowercase().as_str() {
        "go" => Event::Submit,
        "cover" => match arg.to_ascii_lowercase().as_str() {
            "on" => Event::Filter(FilterUpdate::OnlyWithCover(true)),
            "off" => Event::Filter(FilterUpdate::OnlyWithCover(false)),
            _ => return Err("Usage: :cover on|off".to_string()),
        },
        "author" => Event::Filter(FilterUpdate::Author(arg.to_string())),
        "from" => Event::Filter(FilterUpdate::YearFrom(arg.to_string())),
        "to" => Event::Filter(FilterUpdate::YearTo(arg.to_string())),
        "lang" => Event::Filter(FilterUpdate::Language(arg.to_string())),
        "sort" => Event::Filter(FilterUpdate::Sort(arg.to_string())),
        "clear" => Event::ClearFilter(filter_field(arg)?),
        "reset" => Event::ResetFilters,
        "fav" => Event::ToggleFavorite(index(arg)?),
        "favs" => Event::ShowFavorites,
        "recent" => Event::UseRecent(index(arg)?),
        "recents" if arg.eq_ignore_ascii_case("clear") => Event::ClearRecents,
        "details" => Event::OpenDetails(index(arg)?),
        "close" => Event::CloseDetails,
        "cat" => Event::OpenCategory(arg.to_string()),
        "by" => Event::OpenAuthor(index(arg)?),
        "work" => Event::OpenWork(index(arg)?),
        "home" => Event::Home,
        "theme" => Event::ToggleTheme,
        "help" => Event::Help,
        "quit" | "q" => Event::Quit,
        _ => return Err(format!("Unknown command ':{name}'. Type :help for commands.")),
    };
    Ok(event)
}

fn index(arg: &str) -> Result<usize, String> {
    match arg.parse::<usize>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(format!("Expected an entry number, got '{arg}'.")),
    }
}

fn filter_field(arg: &str) -> Result<FilterField, String> {
    match arg.to_ascii_lowercase().as_str() {
        "cover" => Ok(FilterField::Cover),
        "author" => Ok(FilterField::Author),
        "from" => Ok(FilterField::YearFrom),
        "to" => Ok(FilterField::YearTo),
        "lang" => Ok(FilterField::Language),
        "sort" => Ok(FilterField::Sort),
        _ => Err("Usage: :clear cover|author|from|to|lang|sort".to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_keeps_inner_whitespace() {
        assert_eq!(parse_command("  the  hobbit "), Ok(Event::Input("  the  hobbit ".into())));
        assert_eq!(parse_command("   \r\n"), Ok(Event::Submit));
    }

    #[test]
    fn test_filter_commands() {
        assert_eq!(parse_command(":from 1990"), Ok(Event::Filter(FilterUpdate::YearFrom("1990".into()))));
        assert_eq!(parse_command(":author  Le Guin "), Ok(Event::Filter(FilterUpdate::Author("Le Guin".into()))));
        assert_eq!(parse_command(":COVER on"), Ok(Event::Filter(FilterUpdate::OnlyWithCover(true))));
        assert_eq!(parse_command(":clear lang"), Ok(Event::ClearFilter(FilterField::Language)));
        assert!(parse_command(":clear everything").is_err());
        assert!(parse_command(":cover maybe").is_err());
    }

    #[test]
    fn test_indices_are_one_based() {
        assert_eq!(parse_command(":details 1"), Ok(Event::OpenDetails(1)));
        assert!(parse_command(":details 0").is_err());
        assert!(parse_command(":by").is_err());
    }

    #[test]
    fn test_recents_and_unknown() {
        assert_eq!(parse_command(":recents clear"), Ok(Event::ClearRecents));
        assert!(parse_command(":recents").is_err());
        assert_eq!(
            parse_command(":frobnicate"),
            Err("Unknown command ':frobnicate'. Type :help for commands.".to_string())
        );
    }

    #[test]
    fn test_bare_commands() {
        assert_eq!(parse_command(":home"), Ok(Event::Home));
        assert_eq!(parse_command(":q"), Ok(Event::Quit));
        assert_eq!(parse_command(":cat fiction"), Ok(Event::OpenCategory("fiction".into())));
    }
}
