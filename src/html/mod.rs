//! HTML rendering
//!
//! The upload form is a single static page; the only dynamic content is the
//! list of flash messages, which is escaped before insertion.

const PAGE_HEAD: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <meta name="viewport" content="width=device-width, initial-scale=1">
  <title>Submission Box</title>
</head>
<body>
  <h1>Submit your work</h1>
"#;

const PAGE_FORM: &str = r#"  <form method="post" action="/" enctype="multipart/form-data">
    <p>
      <label for="student-id">Student ID</label>
      <input type="text" id="student-id" name="student-id" inputmode="numeric"
             pattern="[0-9]{11}" maxlength="11" required>
    </p>
    <p>
      <label for="submission">File</label>
      <input type="file" id="submission" name="submission" required>
    </p>
    <p><input type="submit" value="Upload"></p>
  </form>
</body>
</html>
"#;

/// Render the upload form with any pending flash messages.
pub fn render_form(messages: &[String]) -> String {
    let mut page = String::with_capacity(PAGE_HEAD.len() + PAGE_FORM.len() + 64);
    page.push_str(PAGE_HEAD);

    if !messages.is_empty() {
        page.push_str("  <ul class=\"flashes\">\n");
        for message in messages {
            page.push_str("    <li>");
            page.push_str(&html_escape::encode_text(message));
            page.push_str("</li>\n");
        }
        page.push_str("  </ul>\n");
    }

    page.push_str(PAGE_FORM);
    page
}
