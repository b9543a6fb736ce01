use pager_core::{ListMode, ListView, Status};

use crate::movie::MovieSummary;

/// Renders the list as text lines for the terminal.
pub fn render(view: &ListView<MovieSummary>) -> Vec<String> {
    let mut lines = Vec::with_capacity(view.items.len() + 3);
    lines.push(header(view));

    if view.status == Status::Loading && view.items.is_empty() {
        return lines;
    }

    if view.no_results {
        let term = view
            .query
            .as_ref()
            .and_then(|key| key.search_term())
            .unwrap_or_default();
        lines.push(format!("  No results for \"{term}\"."));
    }

    for (index, movie) in view.items.iter().enumerate() {
        lines.push(format!("  {:>3}. {}", index + 1, describe(movie)));
    }

    match view.status {
        Status::Error => {
            let cause = match &view.error {
                Some(err) => err.to_string(),
                None => "request interrupted".to_string(),
            };
            lines.push(format!("  ! {cause} (type `retry`)"));
        }
        Status::LoadingMore => lines.push("  ... loading more".to_string()),
        Status::Loading => lines.push("  ... loading".to_string()),
        Status::Loaded => {
            if let Some(hint) = navigation_hint(view) {
                lines.push(hint);
            }
        }
        Status::Idle => {}
    }
    lines
}

fn header(view: &ListView<MovieSummary>) -> String {
    let query = view
        .query
        .as_ref()
        .map(ToString::to_string)
        .unwrap_or_else(|| "-".to_string());
    let position = match (view.mode, view.page, view.total_pages) {
        (ListMode::Replace, Some(page), Some(total)) => format!(" page {page}/{total}"),
        (ListMode::Replace, Some(page), None) => format!(" page {page}"),
        (ListMode::Accumulate, _, _) => format!(" {} items", view.items.len()),
        _ => String::new(),
    };
    format!("[{}] {query}{position}", view.status)
}

fn describe(movie: &MovieSummary) -> String {
    let mut text = movie.title.clone();
    if let Some(year) = movie
        .release_date
        .as_deref()
        .and_then(|date| date.get(..4))
        .filter(|year| !year.is_empty())
    {
        text.push_str(&format!(" ({year})"));
    }
    if let Some(score) = movie.vote_average {
        text.push_str(&format!(" {score:.1}"));
    }
    text
}

fn navigation_hint(view: &ListView<MovieSummary>) -> Option<String> {
    let mut hints = Vec::new();
    if view.has_previous {
        hints.push("`prev`");
    }
    if view.has_more {
        hints.push(match view.mode {
            ListMode::Replace => "`next`",
            ListMode::Accumulate => "`next` for more",
        });
    }
    (!hints.is_empty()).then(|| format!("  {}", hints.join("  ")))
}

#[cfg(test)]
mod tests {
    use pager_core::{FailureKind, FetchError, QueryKey};
    use pretty_assertions::assert_eq;

    use super::*;

    fn movie(id: u64, title: &str, date: Option<&str>) -> MovieSummary {
        MovieSummary {
            id,
            title: title.to_string(),
            release_date: date.map(str::to_string),
            vote_average: None,
        }
    }

    fn view(status: Status, items: Vec<MovieSummary>) -> ListView<MovieSummary> {
        ListView {
            query: Some(QueryKey::new("movie/popular")),
            mode: ListMode::Replace,
            status,
            items,
            error: None,
            has_more: false,
            has_previous: false,
            no_results: false,
            page: Some(1),
            total_pages: Some(3),
        }
    }

    #[test]
    fn loaded_page_lists_items_and_hints() {
        let mut view = view(
            Status::Loaded,
            vec![
                movie(1, "Parasite", Some("2019-05-30")),
                movie(2, "Oldboy", None),
            ],
        );
        view.has_more = true;

        assert_eq!(
            render(&view),
            vec![
                "[loaded] movie/popular page 1/3".to_string(),
                "    1. Parasite (2019)".to_string(),
                "    2. Oldboy".to_string(),
                "  `next`".to_string(),
            ]
        );
    }

    #[test]
    fn empty_search_says_so() {
        let mut view = view(Status::Loaded, Vec::new());
        view.query = Some(QueryKey::new("search/movie").with_search("qwerty"));
        view.no_results = true;

        let lines = render(&view);
        assert_eq!(lines[1], "  No results for \"qwerty\".");
    }

    #[test]
    fn error_keeps_items_and_shows_cause() {
        let mut view = view(Status::Error, vec![movie(1, "Mother", None)]);
        view.error = Some(FetchError::new(FailureKind::HttpStatus(503), "unavailable"));

        let lines = render(&view);
        assert_eq!(lines[1], "    1. Mother");
        assert_eq!(
            lines[2],
            "  ! http status 503: unavailable (type `retry`)"
        );
    }

    #[test]
    fn error_without_cause_still_offers_retry() {
        let lines = render(&view(Status::Error, Vec::new()));
        assert_eq!(
            lines,
            vec![
                "[error] movie/popular page 1/3".to_string(),
                "  ! request interrupted (type `retry`)".to_string(),
            ]
        );
    }
}
