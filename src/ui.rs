use crate::models::{DateRange, Entry};
use crate::storage::ListOrder;

const MONTHS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

pub fn render_submit(captcha_site_key: Option<&str>) -> String {
    let captcha_block = match captcha_site_key {
        Some(key) => format!(
            r#"<input type="hidden" name="captcha" id="captcha" />
      <script src="https://www.google.com/recaptcha/api.js?render={key}"></script>
      <script>
        document.getElementById('entry-form').addEventListener('submit', (event) => {{
          event.preventDefault();
          grecaptcha.ready(() => {{
            grecaptcha.execute('{key}', {{ action: 'submit' }}).then((token) => {{
              document.getElementById('captcha').value = token;
              event.target.submit();
            }});
          }});
        }});
      </script>"#
        ),
        None => String::new(),
    };
    SUBMIT_HTML
        .replace("{{STYLE}}", STYLE)
        .replace("{{CAPTCHA}}", &captcha_block)
}

pub fn render_success() -> String {
    SUCCESS_HTML.replace("{{STYLE}}", STYLE)
}

pub fn render_calendar(ranges: &[DateRange]) -> String {
    let mut rows = String::new();
    for range in ranges {
        let span = if range.single_day() {
            format_day(range.from_month, range.from_day)
        } else {
            format!(
                "{} – {}",
                format_day(range.from_month, range.from_day),
                format_day(range.to_month, range.to_day)
            )
        };
        rows.push_str(&format!(
            r#"<li style="border-left-color: {color}"><span class="span">{span}</span><span class="label">{label}</span><span class="details">{details}</span></li>
"#,
            color = range.color.hex(),
            label = range.color.label(),
            details = range.color.details(),
        ));
    }
    CALENDAR_HTML
        .replace("{{STYLE}}", STYLE)
        .replace("{{RANGES}}", &rows)
}

pub fn render_mod(entries: &[Entry], status: &str, order: ListOrder, token: &str) -> String {
    let token = escape_html(token);
    let mut rows = String::new();
    for entry in entries {
        let mut actions = String::new();
        for next in ["approved", "denied", "chosen", "pending"] {
            actions.push_str(&format!(
                r#"<form method="post" action="/mod/edit/status"><input type="hidden" name="id" value="{id}" /><input type="hidden" name="status" value="{next}" /><input type="hidden" name="state" value="{state}" /><input type="hidden" name="order" value="{order}" /><input type="hidden" name="token" value="{token}" /><button>{next}</button></form>"#,
                id = entry.id,
                state = escape_html(status),
                order = order.as_str(),
            ));
        }
        rows.push_str(&format!(
            "<tr><td>{id}</td><td>{date}</td><td>{kind}</td><td>{description}</td><td>{source}</td><td>{name}</td><td>{status}</td><td class=\"actions\">{actions}</td></tr>\n",
            id = entry.id,
            date = entry.date.format("%d.%m.%Y"),
            kind = entry.kind.label(),
            description = escape_html(&entry.description),
            source = escape_html(&entry.source),
            name = escape_html(&entry.name),
            status = entry.status.as_str(),
        ));
    }

    let mut nav = String::new();
    for target in ["pending", "approved", "denied", "chosen", "all"] {
        nav.push_str(&format!(
            r#"<a href="/mod/show/{target}/sortby/{order}?token={token}">{target}</a> "#,
            order = order.as_str(),
        ));
    }

    MOD_HTML
        .replace("{{STYLE}}", STYLE)
        .replace("{{STATUS}}", &escape_html(status))
        .replace("{{NAV}}", &nav)
        .replace("{{TOKEN}}", &token)
        .replace("{{ROWS}}", &rows)
}

fn format_day(month: u8, day: u8) -> String {
    let name = MONTHS
        .get(usize::from(month.saturating_sub(1)))
        .copied()
        .unwrap_or("?");
    format!("{name} {day}")
}

fn escape_html(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

const STYLE: &str = r#"
    body {
      margin: 0;
      min-height: 100vh;
      background: linear-gradient(135deg, #f8f3e6, #ffe9d4 60%, #f9f2e9 100%);
      color: #2b2a28;
      font-family: "Trebuchet MS", sans-serif;
      display: grid;
      place-items: start center;
      padding: 32px 18px 48px;
    }
    .app {
      width: min(860px, 100%);
      background: rgba(255, 255, 255, 0.9);
      border-radius: 20px;
      box-shadow: 0 24px 60px rgba(47, 72, 88, 0.18);
      padding: 32px;
      display: grid;
      gap: 20px;
    }
    h1 { margin: 0; font-size: 1.8rem; }
    label { display: grid; gap: 4px; font-weight: 600; }
    input, select, textarea {
      font: inherit;
      padding: 8px 10px;
      border: 1px solid rgba(47, 72, 88, 0.3);
      border-radius: 8px;
    }
    button {
      border: none;
      border-radius: 999px;
      padding: 10px 18px;
      font-weight: 600;
      background: #ff6b4a;
      color: white;
      cursor: pointer;
    }
    table { border-collapse: collapse; width: 100%; }
    td, th { padding: 6px 8px; border-bottom: 1px solid rgba(47, 72, 88, 0.15); text-align: left; }
    .actions form { display: inline; }
    .actions button { padding: 4px 10px; margin-right: 4px; background: #2f4858; }
    ul.ranges { list-style: none; margin: 0; padding: 0; display: grid; gap: 8px; }
    ul.ranges li {
      background: white;
      border-left: 10px solid;
      border-radius: 8px;
      padding: 10px 14px;
      display: grid;
      gap: 2px;
    }
    ul.ranges .span { font-weight: 600; }
    ul.ranges .details { color: #6b645d; font-size: 0.9rem; }
"#;

const SUBMIT_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>Submit an event</title>
  <style>{{STYLE}}</style>
</head>
<body>
  <main class="app">
    <h1>Submit an event</h1>
    <p>Tell us about a personal or historic event worth a spot on the calendar. How about August 1st?</p>
    <form id="entry-form" method="post" action="/submit" enctype="multipart/form-data">
      <label>Type
        <select name="type">
          <option value="personal">Personal</option>
          <option value="historic">Historic</option>
        </select>
      </label>
      <label>Date
        <input type="date" name="date" required />
      </label>
      <label>Description
        <textarea name="description" rows="4" required></textarea>
      </label>
      <label>Source link (required for historic events)
        <input type="url" name="source" placeholder="https://..." />
      </label>
      <label>Your name (optional)
        <input type="text" name="name" />
      </label>
      <label>Email (optional)
        <input type="email" name="email" />
      </label>
      <button type="submit">Submit</button>
      {{CAPTCHA}}
    </form>
    <p><a href="/calendar">See how the calendar is filling up</a></p>
  </main>
</body>
</html>
"#;

const SUCCESS_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>Thanks!</title>
  <style>{{STYLE}}</style>
</head>
<body>
  <main class="app">
    <h1>Thanks for your submission!</h1>
    <p>A moderator will review it shortly.</p>
    <p><a href="/submit">Submit another event</a> · <a href="/calendar">View the calendar</a></p>
  </main>
</body>
</html>
"#;

const CALENDAR_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>Submission calendar</title>
  <style>{{STYLE}}</style>
</head>
<body>
  <main class="app">
    <h1>Submission calendar</h1>
    <p>Every day of the year, colored by how many approved events it already has.</p>
    <ul class="ranges">
{{RANGES}}
    </ul>
    <p><a href="/submit">Submit an event</a></p>
  </main>
</body>
</html>
"#;

const MOD_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>Moderation</title>
  <style>{{STYLE}}</style>
</head>
<body>
  <main class="app">
    <h1>Moderation: {{STATUS}}</h1>
    <nav>{{NAV}}<a href="/mod/export?token={{TOKEN}}">export chosen</a></nav>
    <table>
      <thead>
        <tr><th>Id</th><th>Date</th><th>Type</th><th>Description</th><th>Source</th><th>Name</th><th>Status</th><th>Actions</th></tr>
      </thead>
      <tbody>
{{ROWS}}
      </tbody>
    </table>
  </main>
</body>
</html>
"#;
