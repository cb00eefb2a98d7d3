use crate::lesson::Lesson;
use crate::module::{Module, ModuleCollection};
use crate::render::{escape_html, inner_html_with, ElementAction};
use phf::phf_map;
use scraper::Html;

pub const COMBINED_TITLE: &str = "All Modules";

/// Each heading's next level down. `h6` has nowhere to go and stays `h6`.
static HEADING_SHIFT: phf::Map<&'static str, &'static str> = phf_map! {
    "h1" => "h2",
    "h2" => "h3",
    "h3" => "h4",
    "h4" => "h5",
    "h5" => "h6",
    "h6" => "h6",
};

/// Moves every heading in `fragment` one level down and strips its
/// attributes. Everything else is written back unchanged.
pub fn rewrite_headings(fragment: &str) -> String {
    let html = Html::parse_fragment(fragment);
    inner_html_with(&html, html.root_element(), &|element| {
        match HEADING_SHIFT.get(element.value().name()) {
            Some(next) => ElementAction::Rename(*next),
            None => ElementAction::Keep,
        }
    })
}

fn open_document(title: &str) -> String {
    format!(
        "<html><head><title>{}</title></head><body>",
        escape_html(title)
    )
}

fn push_lessons(document: &mut String, lessons: &[Lesson]) {
    for lesson in lessons {
        document.push_str(&rewrite_headings(&lesson.content_html));
    }
}

/// A module's lessons under a single `<h1>` carrying the module name.
pub fn module_document(module: &Module) -> String {
    let mut document = open_document(&module.name);
    document.push_str(&format!("<h1>{}</h1>", escape_html(&module.name)));
    push_lessons(&mut document, &module.lessons);
    document.push_str("</body></html>");
    document
}

/// Every module in order, each under a numbered `<h1>` such as `01. Basics`.
pub fn combined_document(modules: &ModuleCollection) -> String {
    let mut document = open_document(COMBINED_TITLE);
    document.push_str(&format!("<h1>{COMBINED_TITLE}</h1>"));
    for module in modules {
        document.push_str(&format!(
            "<h1>{:02}. {}</h1>",
            module.order + 1,
            escape_html(&module.name)
        ));
        push_lessons(&mut document, &module.lessons);
    }
    document.push_str("</body></html>");
    document
}

/// Standalone page for one lesson, content left as extracted.
pub fn lesson_document(lesson: &Lesson) -> String {
    let mut document = open_document(&lesson.title);
    document.push_str(&lesson.content_html);
    document.push_str("</body></html>");
    document
}
