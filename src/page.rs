use html_escape::encode_text;

const PAGE_HEAD: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>AI Gap Analysis</title>
    <style>
        body { font-family: Arial, sans-serif; margin: 20px; background-color: #f9f9f9; }
        .container { max-width: 600px; margin: auto; padding: 20px; }
        h1, h3 { text-align: center; }
        textarea, input, button { width: 100%; padding: 10px; margin-bottom: 10px; }
        .results { margin-top: 20px; background-color: #e8f5e9; padding: 10px; white-space: pre-wrap; }
    </style>
</head>
<body>
    <div class="container">
        <h1>AI Gap Analysis</h1>
        <h3>Find what your explanation is missing</h3>
        <form method="post">
            <label for="topic">What do you want to learn today?</label>
            <input type="text" id="topic" name="topic" required>

            <label for="concepts">Set the concepts you want to master:</label>
            <input type="text" id="concepts" name="concepts" required>

            <label for="explanation">Explain the concepts in your own words:</label>
            <textarea id="explanation" name="explanation" rows="4" required></textarea>

            <button type="submit">Analyze</button>
        </form>
"#;

const PAGE_TAIL: &str = r#"    </div>
</body>
</html>
"#;

/// Renders the whole page. The results block only appears for a non-empty result,
/// and the result is always inserted as escaped text.
pub fn render_page(result: Option<&str>) -> String {
    let mut html = String::with_capacity(PAGE_HEAD.len() + PAGE_TAIL.len() + 256);
    html.push_str(PAGE_HEAD);
    if let Some(text) = result.filter(|text| !text.is_empty()) {
        html.push_str("        <div class=\"results\">\n");
        html.push_str("            <h3>Gap Analysis Results:</h3>\n");
        html.push_str("            <p>");
        html.push_str(&encode_text(text));
        html.push_str("</p>\n");
        html.push_str("        </div>\n");
    }
    html.push_str(PAGE_TAIL);
    html
}
