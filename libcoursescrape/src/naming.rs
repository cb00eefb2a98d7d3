pub const COMBINED_FILE_NAME: &str = "all_modules.html";
const OUTPUT_DIR_PREFIX: &str = "output-";

/// Lowercases `name`, turns every whitespace run into a single hyphen and
/// drops anything that isn't `a-z`, `0-9` or `-`.
pub fn sanitize_file_name(name: &str) -> String {
    let lowered = name.to_lowercase();
    let mut out = String::with_capacity(lowered.len());
    let mut in_whitespace = false;
    for ch in lowered.chars() {
        if ch.is_whitespace() {
            if !in_whitespace {
                out.push('-');
                in_whitespace = true;
            }
            continue;
        }
        in_whitespace = false;
        if ch.is_ascii_lowercase() || ch.is_ascii_digit() || ch == '-' {
            out.push(ch);
        }
    }
    out
}

/// Folder the run writes into, derived from the index page's `<title>`.
pub fn output_dir_name(index_title: &str) -> String {
    format!("{OUTPUT_DIR_PREFIX}{}", sanitize_file_name(index_title))
}

/// `module_number` is 1-based.
pub fn module_file_name(module_number: usize, module_name: &str) -> String {
    format!("{:02}_{}.html", module_number, sanitize_file_name(module_name))
}

pub fn lesson_file_name(module_name: &str, lesson_title: &str) -> String {
    format!(
        "{}-{}.html",
        sanitize_file_name(module_name),
        sanitize_file_name(lesson_title)
    )
}
