//! HTML for the form UI: a company input, and a report page showing the
//! pretty-printed result next to an audio player.

use std::path::Path;

use html_escape::{encode_double_quoted_attribute, encode_text};

const STYLE: &str = "body{font-family:sans-serif;max-width:52rem;margin:2rem auto;padding:0 1rem}\
pre{background:#f4f4f4;padding:1rem;overflow:auto;white-space:pre-wrap}\
.error{color:#a00}";

fn page(body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html><head><meta charset=\"utf-8\"><title>News Summarizer</title>\
<style>{}</style></head><body>\n<h1>News Summarization &amp; TTS</h1>\n{}\n</body></html>\n",
        STYLE, body
    )
}

fn company_form(company: &str) -> String {
    format!(
        "<form method=\"get\" action=\"/report\">\
<label for=\"company\">Enter Company Name</label> \
<input id=\"company\" name=\"company\" placeholder=\"e.g., Tesla\" value=\"{}\" required> \
<button type=\"submit\">Analyze</button></form>",
        encode_double_quoted_attribute(company)
    )
}

pub fn index() -> String {
    page(&company_form(""))
}

/// `report_json` is the pretty-printed result; `audio` the rendered file, if any.
pub fn report(company: &str, report_json: &str, audio: Option<&Path>) -> String {
    let player = match audio.and_then(Path::file_name) {
        Some(name) => format!(
            "<h2>Audio</h2><audio controls src=\"/audio/{}\"></audio>",
            encode_double_quoted_attribute(&name.to_string_lossy())
        ),
        None => String::new(),
    };

    page(&format!(
        "{}\n<h2>Sentiment Report</h2><pre>{}</pre>\n{}",
        company_form(company),
        encode_text(report_json),
        player
    ))
}

pub fn error(company: &str, message: &str) -> String {
    page(&format!(
        "{}\n<p class=\"error\">{}</p>",
        company_form(company),
        encode_text(message)
    ))
}
