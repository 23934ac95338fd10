//! Prompt templates for file and directory summaries

/// Prompt asking for a summary of a single source file.
pub fn file_prompt(path: &str, contents: &str) -> String {
    format!(
        "INSTRUCTIONS:\n\
         * You are an experienced software engineer who reads many languages fluently.\n\
         * Below are the path and the full contents of one source file.\n\
         * Describe what the code in this file is for in about 100 words.\n\
         * Format the answer as markdown.\n\
         \n\
         <path>\n{path}\n</path>\n\
         \n\
         <contents>\n{contents}\n</contents>\n"
    )
}

/// Prompt asking for a summary of a directory from its children's summaries.
///
/// `submodules` holds `(child path, child summary)` pairs in the order they
/// should appear.
pub fn directory_prompt(path: &str, submodules: &[(String, String)]) -> String {
    let listing = submodules
        .iter()
        .map(|(child, summary)| {
            format!("<submodule path=\"{child}\">\n{summary}\n</submodule>\n")
        })
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "INSTRUCTIONS:\n\
         * You are an experienced software engineer who reads many languages fluently.\n\
         * Below is the path of a module together with the summaries of its direct submodules.\n\
         * Using those summaries, describe what the module as a whole is for in about 100 words.\n\
         * Format the answer as markdown.\n\
         \n\
         <path>\n{path}\n</path>\n\
         \n\
         <submodules>\n{listing}</submodules>\n"
    )
}

/// Path named in a prompt built by this module.
pub fn prompt_subject(prompt: &str) -> Option<&str> {
    let start = prompt.find("<path>\n")? + "<path>\n".len();
    let len = prompt[start..].find("\n</path>")?;
    Some(&prompt[start..start + len])
}
