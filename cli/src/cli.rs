use crate::logging::LogOptions;
use chrono::Utc;
use clap::Parser;
use libcoursescrape::errors::CourseError;
use libcoursescrape::lesson::TitlePolicy;
use libcoursescrape::link::DEFAULT_LINK_CLASS;
use libcoursescrape::session::{read_cookie_header, Session, DEFAULT_COOKIE_FILE, DEFAULT_PROXY};
use libcoursescrape::{run_course, CourseRule, RunSummary};
use owo_colors::{OwoColorize, Stream};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::Instrument;
use url::Url;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Download a members-only course as module documents",
    long_about = "Crawls a session-gated course index, strips page chrome from every lesson \
    and writes one html document per module plus an all_modules.html aggregate."
)]
pub struct Cli {
    /// Course index page listing the lessons
    url: Url,
    #[arg(
        default_value = DEFAULT_COOKIE_FILE,
        help = "File holding the complete Cookie header of a logged in browser session.",
        long
    )]
    cookie_file: PathBuf,
    #[arg(default_value = DEFAULT_PROXY, help = "Proxy every request goes through.", long)]
    proxy: String,
    #[arg(help = "Connect directly instead of through the proxy.", long)]
    no_proxy: bool,
    #[arg(default_value = DEFAULT_LINK_CLASS, help = "Class of the lesson anchors on the index page.", long)]
    link_class: String,
    #[arg(default_value = ".", help = "Directory the output-* folder is created in.", long)]
    output_root: PathBuf,
    #[arg(
        default_value_t = 1,
        help = "Number of lessons fetched at once.",
        long,
        value_parser = clap::value_parser!(u16).range(1..)
    )]
    concurrency: u16,
    #[arg(help = "Abort when a lesson page has no title instead of using \"No Title\".", long)]
    strict_titles: bool,
    #[arg(help = "Also save every lesson to its own file.", long)]
    lesson_files: bool,
    #[arg(
        default_value = "debug",
        long,
        value_parser = ["error", "warn", "info", "debug", "trace"]
    )]
    log_level: String,
    #[arg(help = "Write logs to an hourly rolling file in this directory.", long)]
    log_dir: Option<PathBuf>,
}

impl Cli {
    pub fn log_options(&self) -> LogOptions {
        LogOptions {
            level: self.log_level.clone(),
            log_dir: self.log_dir.clone(),
        }
    }

    fn course_rule(&self) -> CourseRule {
        CourseRule {
            link_class: self.link_class.clone(),
            output_root: self.output_root.clone(),
            title_policy: if self.strict_titles {
                TitlePolicy::FailFast
            } else {
                TitlePolicy::Fallback
            },
            concurrency: self.concurrency as usize,
            write_lesson_files: self.lesson_files,
        }
    }

    async fn crawl(&self) -> Result<RunSummary, CourseError> {
        let cookie_header = read_cookie_header(&self.cookie_file).await?;
        let proxy = if self.no_proxy {
            None
        } else {
            Some(self.proxy.as_str())
        };
        let session = Session::new(&cookie_header, proxy)?;
        run_course(&session, &self.url, &self.course_rule()).await
    }

    pub async fn run(self) -> ExitCode {
        let span = tracing::info_span!("run", id = %format!("Run-{}", Utc::now().timestamp()));
        match self.crawl().instrument(span).await {
            Ok(RunSummary::NoLinks) => {
                println!(
                    "{} {}",
                    "No lesson links found on".if_supports_color(Stream::Stdout, |t| t.yellow()),
                    self.url
                );
                ExitCode::SUCCESS
            }
            Ok(RunSummary::Completed {
                output_dir,
                lessons,
                module_files,
                combined_file,
                lesson_files,
            }) => {
                println!(
                    "{} {} lessons into {}",
                    "[Saved]".if_supports_color(Stream::Stdout, |t| t.green()),
                    lessons,
                    output_dir.display()
                );
                for file in module_files.iter().chain(lesson_files.iter()) {
                    println!("  {}", file.display());
                }
                println!("  {}", combined_file.display());
                ExitCode::SUCCESS
            }
            Err(e) => {
                tracing::error!("{}", e);
                let headline = if e.is_config_error() {
                    "Invalid configuration"
                } else {
                    "Course download wasn't able to complete"
                };
                eprintln!(
                    "{}",
                    headline.if_supports_color(Stream::Stderr, |t| t.red())
                );
                eprintln!("{}", e);
                ExitCode::FAILURE
            }
        }
    }
}
