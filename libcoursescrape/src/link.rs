use crate::errors::CourseError;
use crate::session::Session;
use scraper::{Html, Selector};
use tracing::{event, instrument, Level};
use url::Url;

pub const DEFAULT_LINK_CLASS: &str = "wp-block-sensei-lms-course-outline-lesson";

/// Selector for anchors carrying `class_name`.
pub fn lesson_link_selector(class_name: &str) -> Result<Selector, CourseError> {
    let class_name = class_name.trim();
    if class_name.is_empty() || class_name.contains(char::is_whitespace) {
        return Err(CourseError::InvalidSelector(format!("a.{class_name}")));
    }
    let raw = format!("a.{class_name}");
    Selector::parse(&raw).map_err(|_| CourseError::InvalidSelector(raw.clone()))
}

#[instrument]
/// Get the full link to a lesson, given the index page's full url.
fn get_full_link(link: &str, page_url: &Url) -> Option<Url> {
    match page_url.join(link) {
        Ok(url) => Some(url),
        Err(e) => {
            event!(Level::ERROR, "Failed to get full link for {}", link);
            event!(Level::ERROR, "{}", e);
            None
        }
    }
}

/// Gets the absolute url of every anchor matched by `selector`, in document
/// order. Anchors without an `href` are skipped, duplicates are kept.
pub fn get_lesson_links(html_string: &str, page_url: &Url, selector: &Selector) -> Vec<Url> {
    let html_document = Html::parse_document(html_string);
    html_document
        .select(selector)
        .filter_map(|element| element.value().attr("href"))
        .filter_map(|relative_link| {
            let full_link = get_full_link(relative_link, page_url)?;
            tracing::debug!("Full link for {} => {}", relative_link, &full_link);
            Some(full_link)
        })
        .collect()
}

/// Text of the page's `<title>`, if it has one.
pub fn get_page_title(html_string: &str) -> Option<String> {
    let html_document = Html::parse_document(html_string);
    let title_selector = Selector::parse("title").unwrap();
    let title = html_document.select(&title_selector).next()?;
    Some(title.text().collect::<String>().trim().to_string())
}

/// Fetches the index page and returns its lesson links along with the page
/// body, which the caller reuses for naming the output folder.
#[instrument(skip(session, selector), fields(url = %index_url))]
pub async fn discover_links(
    session: &Session,
    index_url: &Url,
    selector: &Selector,
) -> Result<(Vec<Url>, String), CourseError> {
    let page = session.fetch(index_url).await?;
    let links = get_lesson_links(&page.body, &page.url, selector);
    tracing::debug!("Found {} lesson links on {}", links.len(), index_url);
    Ok((links, page.body))
}
