use libcoursescrape::errors::{CourseError, ExtractError};
use libcoursescrape::lesson::TitlePolicy;
use libcoursescrape::session::Session;
use libcoursescrape::{run_course, CourseRule, RunSummary};
use std::path::Path;
use std::time::Duration;
use tempfile::TempDir;
use url::Url;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const COOKIE: &str = "wordpress_logged_in_abc=token";

fn index_page(hrefs: &[&str]) -> String {
    let anchors: String = hrefs
        .iter()
        .map(|href| {
            format!(r#"<li><a class="wp-block-sensei-lms-course-outline-lesson" href="{href}">Lesson</a></li>"#)
        })
        .collect();
    format!(
        r#"<html><head><title>Intro Course</title></head><body><ul>{anchors}<li><a class="nav" href="/about">About</a></li></ul></body></html>"#
    )
}

fn lesson_page(title: &str, module: &str, body: &str) -> String {
    format!(
        r#"<html><head><title>{title}</title></head><body>
<h3 class="wp-block-sensei-lms-course-theme-lesson-module">{module}</h3>
<h1 class="wp-block-post-title">{title}</h1>
<div class="sensei-course-theme__main-content">{body}<div class="wp-block-sensei-lms-lesson-actions"><button>Complete Lesson</button></div></div>
<div class="wp-block-group sensei-lesson-footer"><p>Footer</p></div>
</body></html>"#
    )
}

async fn mount_page(server: &MockServer, route: &str, body: String, delay: Option<Duration>) {
    let mut template = ResponseTemplate::new(200).set_body_string(body);
    if let Some(delay) = delay {
        template = template.set_delay(delay);
    }
    Mock::given(method("GET"))
        .and(path(route))
        .and(header("cookie", COOKIE))
        .respond_with(template)
        .mount(server)
        .await;
}

fn index_url(server: &MockServer) -> Url {
    Url::parse(&format!("{}/course", server.uri())).unwrap()
}

fn rule(root: &Path) -> CourseRule {
    CourseRule {
        output_root: root.to_path_buf(),
        ..CourseRule::default()
    }
}

fn file_names(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().to_string())
        .collect();
    names.sort();
    names
}

#[tokio::test]
async fn test_two_lessons_same_module() {
    let server = MockServer::start().await;
    mount_page(&server, "/course", index_page(&["/lesson/1", "lesson/2"]), None).await;
    mount_page(
        &server,
        "/lesson/1",
        lesson_page(
            "Step One",
            "Getting Started",
            r#"<h2 class="wp-block-heading">Install</h2><p>Get the tools.</p>"#,
        ),
        None,
    )
    .await;
    mount_page(
        &server,
        "/lesson/2",
        lesson_page(
            "Step Two",
            "Getting Started",
            r#"<h2 class="wp-block-heading">Configure</h2><p>Edit the config.</p>"#,
        ),
        None,
    )
    .await;

    let root = TempDir::new().unwrap();
    let session = Session::new(COOKIE, None).unwrap();
    let summary = run_course(&session, &index_url(&server), &rule(root.path()))
        .await
        .unwrap();

    let output_dir = root.path().join("output-intro-course");
    assert_eq!(
        summary,
        RunSummary::Completed {
            output_dir: output_dir.clone(),
            lessons: 2,
            module_files: vec![output_dir.join("01_getting-started.html")],
            combined_file: output_dir.join("all_modules.html"),
            lesson_files: vec![],
        }
    );
    assert_eq!(
        file_names(&output_dir),
        vec!["01_getting-started.html", "all_modules.html"]
    );

    let module_doc = std::fs::read_to_string(output_dir.join("01_getting-started.html")).unwrap();
    assert_eq!(
        module_doc,
        "<html><head><title>Getting Started</title></head><body>\
         <h1>Getting Started</h1>\
         <h3>Install</h3><p>Get the tools.</p>\
         <h3>Configure</h3><p>Edit the config.</p>\
         </body></html>"
    );

    let combined = std::fs::read_to_string(output_dir.join("all_modules.html")).unwrap();
    assert_eq!(
        combined,
        "<html><head><title>All Modules</title></head><body>\
         <h1>All Modules</h1>\
         <h1>01. Getting Started</h1>\
         <h3>Install</h3><p>Get the tools.</p>\
         <h3>Configure</h3><p>Edit the config.</p>\
         </body></html>"
    );
    assert!(!combined.contains("Complete Lesson"));
    assert!(!combined.contains("Footer"));
}

#[tokio::test]
async fn test_no_links_is_a_no_op() {
    let server = MockServer::start().await;
    mount_page(&server, "/course", index_page(&[]), None).await;

    let root = TempDir::new().unwrap();
    let session = Session::new(COOKIE, None).unwrap();
    let summary = run_course(&session, &index_url(&server), &rule(root.path()))
        .await
        .unwrap();

    assert_eq!(summary, RunSummary::NoLinks);
    assert!(file_names(root.path()).is_empty());
}

#[tokio::test]
async fn test_concurrent_fetch_keeps_link_order() {
    let server = MockServer::start().await;
    mount_page(&server, "/course", index_page(&["/l/1", "/l/2", "/l/3"]), None).await;
    mount_page(
        &server,
        "/l/1",
        lesson_page("First", "Beta", "<p>one</p>"),
        Some(Duration::from_millis(300)),
    )
    .await;
    mount_page(&server, "/l/2", lesson_page("Second", "Alpha", "<p>two</p>"), None).await;
    mount_page(&server, "/l/3", lesson_page("Third", "Beta", "<p>three</p>"), None).await;

    let root = TempDir::new().unwrap();
    let session = Session::new(COOKIE, None).unwrap();
    let summary = run_course(
        &session,
        &index_url(&server),
        &CourseRule {
            concurrency: 3,
            ..rule(root.path())
        },
    )
    .await
    .unwrap();

    let RunSummary::Completed { module_files, combined_file, .. } = summary else {
        panic!("expected a completed run");
    };
    let names: Vec<String> = module_files
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
        .collect();
    assert_eq!(names, vec!["01_beta.html", "02_alpha.html"]);

    let combined = std::fs::read_to_string(combined_file).unwrap();
    assert!(combined.contains(
        "<h1>01. Beta</h1><p>one</p><p>three</p><h1>02. Alpha</h1><p>two</p>"
    ));
}

#[tokio::test]
async fn test_lesson_files_are_optional_extras() {
    let server = MockServer::start().await;
    mount_page(&server, "/course", index_page(&["/l/1"]), None).await;
    mount_page(
        &server,
        "/l/1",
        lesson_page("Install WP-CLI", "Tools", r#"<h2 class="x">Keep</h2>"#),
        None,
    )
    .await;

    let root = TempDir::new().unwrap();
    let session = Session::new(COOKIE, None).unwrap();
    run_course(
        &session,
        &index_url(&server),
        &CourseRule {
            write_lesson_files: true,
            ..rule(root.path())
        },
    )
    .await
    .unwrap();

    let output_dir = root.path().join("output-intro-course");
    assert_eq!(
        file_names(&output_dir),
        vec!["01_tools.html", "all_modules.html", "tools-install-wp-cli.html"]
    );
    let lesson_doc = std::fs::read_to_string(output_dir.join("tools-install-wp-cli.html")).unwrap();
    assert_eq!(
        lesson_doc,
        r#"<html><head><title>Install WP-CLI</title></head><body><h2 class="x">Keep</h2></body></html>"#
    );
}

#[tokio::test]
async fn test_failed_lesson_aborts_run() {
    let server = MockServer::start().await;
    mount_page(&server, "/course", index_page(&["/l/1", "/l/2"]), None).await;
    mount_page(&server, "/l/1", lesson_page("One", "M", "<p>1</p>"), None).await;
    Mock::given(method("GET"))
        .and(path("/l/2"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let root = TempDir::new().unwrap();
    let session = Session::new(COOKIE, None).unwrap();
    let err = run_course(&session, &index_url(&server), &rule(root.path()))
        .await
        .unwrap_err();

    assert_eq!(
        err,
        CourseError::ErrorStatusCode {
            status_code: 500,
            url: format!("{}/l/2", server.uri()),
        }
    );
    assert!(!root
        .path()
        .join("output-intro-course")
        .join("all_modules.html")
        .exists());
}

#[tokio::test]
async fn test_strict_titles_fail_fast() {
    let server = MockServer::start().await;
    mount_page(&server, "/course", index_page(&["/l/1"]), None).await;
    mount_page(
        &server,
        "/l/1",
        r#"<div class="sensei-course-theme__main-content"><p>x</p></div>"#.to_string(),
        None,
    )
    .await;

    let root = TempDir::new().unwrap();
    let session = Session::new(COOKIE, None).unwrap();
    let err = run_course(
        &session,
        &index_url(&server),
        &CourseRule {
            title_policy: TitlePolicy::FailFast,
            ..rule(root.path())
        },
    )
    .await
    .unwrap_err();

    assert_eq!(
        err,
        CourseError::Extract(ExtractError::MissingTitle {
            url: format!("{}/l/1", server.uri()),
        })
    );
}

#[tokio::test]
async fn test_index_error_status_is_fatal() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/course"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&server)
        .await;

    let root = TempDir::new().unwrap();
    let session = Session::new(COOKIE, None).unwrap();
    let err = run_course(&session, &index_url(&server), &rule(root.path()))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        CourseError::ErrorStatusCode {
            status_code: 403,
            ..
        }
    ));
    assert!(file_names(root.path()).is_empty());
}
