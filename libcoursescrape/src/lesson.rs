use crate::errors::{CourseError, ExtractError};
use crate::render::{inner_html_with, text_with, ElementAction};
use crate::session::Session;
use lazy_static::lazy_static;
use scraper::node::Element;
use scraper::{ElementRef, Html, Selector};
use tracing::instrument;
use url::Url;

pub const UNKNOWN_MODULE: &str = "unknown-module";
pub const NO_TITLE: &str = "No Title";
pub const NO_CONTENT: &str = "<p>No content found</p>";

lazy_static! {
    static ref POST_TITLE: Selector = Selector::parse("h1.wp-block-post-title").unwrap();
    static ref LESSON_MODULE: Selector =
        Selector::parse("h3.wp-block-sensei-lms-course-theme-lesson-module").unwrap();
    static ref MAIN_CONTENT: Selector =
        Selector::parse("div.sensei-course-theme__main-content").unwrap();
}

/// Class sets marking lesson page chrome. An element is chrome when it
/// carries every class of at least one set.
const CHROME_MARKERS: [&[&str]; 5] = [
    &["wp-block-sensei-lms-lesson-actions"],
    &["wp-block-sensei-lms-course-theme-prev-next-lesson"],
    &["sensei-course-theme-lesson-actions"],
    &["sensei-course-theme-lesson-actions__complete-lesson-form"],
    &["wp-block-group", "sensei-lesson-footer"],
];

/// How to treat a lesson page without a post title heading.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TitlePolicy {
    /// Abort with [`ExtractError::MissingTitle`].
    FailFast,
    /// Use [`NO_TITLE`] and carry on.
    #[default]
    Fallback,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Lesson {
    pub url: Url,
    pub title: String,
    pub module_name: String,
    /// Inner html of the main content region, chrome and module heading removed.
    pub content_html: String,
}

pub fn is_chrome(element: &Element) -> bool {
    CHROME_MARKERS.iter().any(|marker| {
        marker
            .iter()
            .all(|class| element.classes().any(|c| c == *class))
    })
}

/// True if the element or any of its ancestors is chrome.
fn is_removed(element: ElementRef<'_>) -> bool {
    if is_chrome(element.value()) {
        return true;
    }
    element
        .ancestors()
        .filter_map(ElementRef::wrap)
        .any(|ancestor| is_chrome(ancestor.value()))
}

fn first_visible<'a>(document: &'a Html, selector: &Selector) -> Option<ElementRef<'a>> {
    document.select(selector).find(|element| !is_removed(*element))
}

fn heading_text(element: ElementRef<'_>) -> Option<String> {
    let text = text_with(element, &|child| is_chrome(child.value()));
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

/// Pulls title, module name and content out of a lesson page. Chrome
/// elements never contribute to any of the three.
pub fn extract_lesson(html: &str, url: &Url, policy: TitlePolicy) -> Result<Lesson, ExtractError> {
    let document = Html::parse_document(html);

    let title = match first_visible(&document, &POST_TITLE).and_then(heading_text) {
        Some(title) => title,
        None => match policy {
            TitlePolicy::FailFast => {
                return Err(ExtractError::MissingTitle {
                    url: url.to_string(),
                })
            }
            TitlePolicy::Fallback => {
                tracing::warn!("No lesson title found in {}, using {:?}", url, NO_TITLE);
                NO_TITLE.to_string()
            }
        },
    };

    let module_heading = first_visible(&document, &LESSON_MODULE);
    let module_name = module_heading
        .and_then(heading_text)
        .unwrap_or_else(|| UNKNOWN_MODULE.to_string());
    let module_heading_id = module_heading.map(|element| element.id());

    let content_html = match first_visible(&document, &MAIN_CONTENT) {
        Some(main_content) => inner_html_with(&document, main_content, &|element| {
            if is_chrome(element.value()) || Some(element.id()) == module_heading_id {
                ElementAction::Remove
            } else {
                ElementAction::Keep
            }
        }),
        None => {
            tracing::warn!("No main content found in {}", url);
            NO_CONTENT.to_string()
        }
    };

    Ok(Lesson {
        url: url.clone(),
        title,
        module_name,
        content_html,
    })
}

#[instrument(skip(session, url), fields(url = %url))]
pub async fn fetch_lesson(
    session: &Session,
    url: &Url,
    policy: TitlePolicy,
) -> Result<Lesson, CourseError> {
    tracing::info!("Fetching lesson {}...", url);
    let page = session.fetch(url).await?;
    let lesson = extract_lesson(&page.body, url, policy)?;
    tracing::debug!(
        "Extracted lesson {:?} of module {:?} from {}",
        lesson.title,
        lesson.module_name,
        url
    );
    Ok(lesson)
}
