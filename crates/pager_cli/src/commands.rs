use pager_core::ListMode;

pub const HELP: &str = "\
commands:
  next | n               next page / load more
  prev | p               previous page (replace mode)
  retry | r              replay the request that failed
  open <path> [search]   browse another collection, e.g. `open movie/top_rated`
  search <term>          search the catalog
  mode <replace|accumulate>
  help
  quit | q";

/// A line typed by the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Next,
    Prev,
    Retry,
    Open { path: String, search: Option<String> },
    Search(String),
    Mode(ListMode),
    Help,
    Quit,
    /// Blank line; ignored.
    Empty,
    Unknown(String),
}

pub fn parse(line: &str) -> Command {
    let line = line.trim();
    let (verb, rest) = match line.split_once(char::is_whitespace) {
        Some((verb, rest)) => (verb, rest.trim()),
        None => (line, ""),
    };

    match verb.to_ascii_lowercase().as_str() {
        "" => Command::Empty,
        "next" | "n" | "more" => Command::Next,
        "prev" | "p" => Command::Prev,
        "retry" | "r" => Command::Retry,
        "help" | "h" | "?" => Command::Help,
        "quit" | "q" | "exit" => Command::Quit,
        "open" if !rest.is_empty() => {
            let (path, search) = match rest.split_once(char::is_whitespace) {
                Some((path, search)) => (path, Some(search.trim().to_string())),
                None => (rest, None),
            };
            Command::Open {
                path: path.to_string(),
                search,
            }
        }
        "search" | "s" if !rest.is_empty() => Command::Search(rest.to_string()),
        "mode" => match rest.to_ascii_lowercase().as_str() {
            "replace" | "pages" => Command::Mode(ListMode::Replace),
            "accumulate" | "scroll" => Command::Mode(ListMode::Accumulate),
            _ => Command::Unknown(line.to_string()),
        },
        _ => Command::Unknown(line.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn navigation_aliases() {
        assert_eq!(parse("next"), Command::Next);
        assert_eq!(parse("  N "), Command::Next);
        assert_eq!(parse("prev"), Command::Prev);
        assert_eq!(parse("retry"), Command::Retry);
        assert_eq!(parse("q"), Command::Quit);
        assert_eq!(parse(""), Command::Empty);
    }

    #[test]
    fn open_takes_path_and_optional_search() {
        assert_eq!(
            parse("open movie/top_rated"),
            Command::Open {
                path: "movie/top_rated".to_string(),
                search: None,
            }
        );
        assert_eq!(
            parse("open search/movie  howl's moving castle"),
            Command::Open {
                path: "search/movie".to_string(),
                search: Some("howl's moving castle".to_string()),
            }
        );
    }

    #[test]
    fn search_and_mode() {
        assert_eq!(
            parse("search the thing"),
            Command::Search("the thing".to_string())
        );
        assert_eq!(parse("mode accumulate"), Command::Mode(ListMode::Accumulate));
        assert_eq!(parse("mode Replace"), Command::Mode(ListMode::Replace));
        assert_eq!(
            parse("mode sideways"),
            Command::Unknown("mode sideways".to_string())
        );
        assert_eq!(parse("search"), Command::Unknown("search".to_string()));
    }
}
