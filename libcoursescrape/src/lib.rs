use crate::assemble::{combined_document, lesson_document, module_document};
use crate::errors::CourseError;
use crate::lesson::{fetch_lesson, Lesson, TitlePolicy};
use crate::link::{discover_links, get_page_title, lesson_link_selector, DEFAULT_LINK_CLASS};
use crate::module::ModuleCollection;
use crate::naming::{lesson_file_name, module_file_name, output_dir_name, COMBINED_FILE_NAME};
use crate::output::{create_output_dir, write_document};
use crate::session::Session;
use futures::{stream, StreamExt, TryStreamExt};
use std::path::PathBuf;
use tracing::instrument;
use url::Url;

pub mod assemble;
pub mod errors;
pub mod lesson;
pub mod link;
pub mod module;
pub mod naming;
pub mod output;
pub mod render;
pub mod session;

const UNTITLED_COURSE: &str = "untitled";

#[derive(Debug, Clone)]
pub struct CourseRule {
    /// Class carried by the lesson anchors on the index page
    pub link_class: String,
    /// Directory the `output-*` folder is created in
    pub output_root: PathBuf,
    pub title_policy: TitlePolicy,
    /// Lessons fetched at once. 1 keeps the crawl strictly sequential.
    /// Results are always aggregated in link order.
    pub concurrency: usize,
    /// Also write every lesson to its own file
    pub write_lesson_files: bool,
}

impl Default for CourseRule {
    fn default() -> Self {
        CourseRule {
            link_class: DEFAULT_LINK_CLASS.to_string(),
            output_root: PathBuf::from("."),
            title_policy: TitlePolicy::default(),
            concurrency: 1,
            write_lesson_files: false,
        }
    }
}

#[derive(Debug, PartialEq)]
pub enum RunSummary {
    /// The index page had no lesson links. Nothing was written.
    NoLinks,
    Completed {
        output_dir: PathBuf,
        lessons: usize,
        module_files: Vec<PathBuf>,
        combined_file: PathBuf,
        lesson_files: Vec<PathBuf>,
    },
}

/// Crawls the course behind `index_url` and writes one document per module
/// plus the combined document into `output-{course title}`.
#[instrument(skip(session, index_url, rule), fields(index = %index_url))]
pub async fn run_course(
    session: &Session,
    index_url: &Url,
    rule: &CourseRule,
) -> Result<RunSummary, CourseError> {
    let selector = lesson_link_selector(&rule.link_class)?;

    tracing::info!("Fetching links from {}...", index_url);
    let (links, index_body) = discover_links(session, index_url, &selector).await?;
    if links.is_empty() {
        tracing::warn!("No links found with the specified class.");
        return Ok(RunSummary::NoLinks);
    }
    tracing::info!("Found {} lesson links", links.len());

    let course_title = match get_page_title(&index_body) {
        Some(title) if !title.is_empty() => title,
        _ => {
            tracing::warn!("Index page has no <title>, using {:?}", UNTITLED_COURSE);
            UNTITLED_COURSE.to_string()
        }
    };
    let output_dir = rule.output_root.join(output_dir_name(&course_title));
    create_output_dir(&output_dir).await?;

    let lessons = fetch_lessons(session, &links, rule).await?;

    let mut lesson_files = Vec::new();
    if rule.write_lesson_files {
        for lesson in &lessons {
            let file_name = lesson_file_name(&lesson.module_name, &lesson.title);
            let path = write_document(&output_dir, &file_name, &lesson_document(lesson)).await?;
            tracing::info!("Saved content from {} to {}", lesson.url, path.display());
            lesson_files.push(path);
        }
    }

    let modules: ModuleCollection = lessons.into_iter().collect();
    let mut module_files = Vec::with_capacity(modules.len());
    for module in &modules {
        let file_name = module_file_name(module.order + 1, &module.name);
        let path = write_document(&output_dir, &file_name, &module_document(module)).await?;
        tracing::info!("Module saved to {}", path.display());
        module_files.push(path);
    }

    let combined_file =
        write_document(&output_dir, COMBINED_FILE_NAME, &combined_document(&modules)).await?;
    tracing::info!("All modules combined into {}", combined_file.display());
    tracing::info!("Content download, processing, and saving complete.");

    Ok(RunSummary::Completed {
        output_dir,
        lessons: modules.lesson_count(),
        module_files,
        combined_file,
        lesson_files,
    })
}

/// Fetches every lesson, at most `rule.concurrency` at a time. The returned
/// lessons are in link order whatever order the responses arrive in, and
/// the first failure aborts the rest.
async fn fetch_lessons(
    session: &Session,
    links: &[Url],
    rule: &CourseRule,
) -> Result<Vec<Lesson>, CourseError> {
    stream::iter(links)
        .map(|link| fetch_lesson(session, link, rule.title_policy))
        .buffered(rule.concurrency.max(1))
        .try_collect()
        .await
}
