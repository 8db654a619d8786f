//! HTML for the single-field form

pub const PAGE_TITLE: &str = "Stock Price AI Assistant";
pub const PAGE_DESCRIPTION: &str =
    "Ask me about any stock price and I'll provide you with the current information.";
pub const INPUT_LABEL: &str = "Ask about any stock price";
pub const INPUT_PLACEHOLDER: &str = "What is the current price of Apple Inc. (AAPL)?";
pub const OUTPUT_LABEL: &str = "Stock Info";

use html_escape::{encode_double_quoted_attribute, encode_text};

/// The whole page, with the last query and its output filled in
pub fn render_page(query: &str, output: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{title}</title>
<style>
body {{ font-family: sans-serif; max-width: 48rem; margin: 2rem auto; padding: 0 1rem; }}
label {{ display: block; font-weight: bold; margin-top: 1rem; }}
input, textarea {{ width: 100%; box-sizing: border-box; padding: 0.5rem; font-size: 1rem; }}
textarea {{ min-height: 8rem; white-space: pre-wrap; }}
button {{ margin-top: 1rem; padding: 0.5rem 1.5rem; font-size: 1rem; }}
</style>
</head>
<body>
<h1>{title}</h1>
<p>{description}</p>
<form method="post" action="/">
<label for="query">{input_label}</label>
<input id="query" name="query" type="text" placeholder="{placeholder}" value="{query}">
<button type="submit">Submit</button>
</form>
<label for="output">{output_label}</label>
<textarea id="output" readonly>{output}</textarea>
</body>
</html>
"#,
        title = PAGE_TITLE,
        description = encode_text(PAGE_DESCRIPTION),
        input_label = INPUT_LABEL,
        placeholder = encode_double_quoted_attribute(INPUT_PLACEHOLDER),
        query = encode_double_quoted_attribute(query),
        output_label = OUTPUT_LABEL,
        output = encode_text(output),
    )
}
