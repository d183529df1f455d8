//! Server-rendered HTML.
//!
//! Every page is assembled with plain string building over a shared shell —
//! no template engine, inline CSS, one small script on the dashboard for
//! the edit-user refill. All interpolated values pass through [`escape`].

use axum::response::Html;

use vpanel_core::{SettingsSnapshot, User};

/// Escape a value for interpolation into HTML text or attributes.
#[must_use]
pub fn escape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

const PAGE_CSS: &str = r#"<style>
*{box-sizing:border-box;margin:0;padding:0}
body{font-family:-apple-system,BlinkMacSystemFont,'Segoe UI',sans-serif;background:#F0F2F5;color:#1C2430;line-height:1.6;padding:24px 16px}
.wrap{max-width:760px;margin:0 auto}
.card{background:#fff;border:1px solid #E1E5EB;border-radius:10px;padding:22px;margin-bottom:20px;box-shadow:0 1px 3px rgba(28,36,48,.06)}
h1{font-size:22px;margin-bottom:16px}
h2{font-size:16px;margin-bottom:12px;padding-bottom:8px;border-bottom:1px solid #E1E5EB}
label{display:block;font-size:13px;font-weight:600;margin-bottom:4px}
input[type=text],input[type=password],input[type=date],textarea{width:100%;padding:9px 12px;border:1px solid #C9D0DA;border-radius:6px;font-size:14px;margin-bottom:12px;font-family:inherit}
textarea{font-family:ui-monospace,Menlo,Consolas,monospace;font-size:12px;min-height:180px}
button{background:#2563EB;color:#fff;border:none;border-radius:6px;padding:9px 18px;font-size:14px;font-weight:600;cursor:pointer}
button:hover{background:#1D4ED8}
button.danger{background:#DC2626}button.danger:hover{background:#B91C1C}
button.ghost{background:#E9ECF1;color:#1C2430}button.ghost:hover{background:#DDE2E9}
table{width:100%;border-collapse:collapse;font-size:14px}
th{text-align:left;font-size:11px;text-transform:uppercase;letter-spacing:.5px;color:#5B6676;padding:8px 10px;border-bottom:1px solid #E1E5EB}
td{padding:9px 10px;border-bottom:1px solid #EEF1F5}
td.mono{font-family:ui-monospace,Menlo,Consolas,monospace;font-size:13px}
.row-actions{display:flex;gap:8px;justify-content:flex-end}
.row-actions button{padding:4px 10px;font-size:12px}
.topline{display:flex;justify-content:space-between;align-items:center;margin-bottom:20px}
.topline a{font-size:13px;color:#2563EB;text-decoration:none}
.muted{color:#5B6676;font-size:13px}
.notice{padding:12px 16px;border-radius:6px;margin-bottom:16px;font-size:14px}
.notice.ok{background:#ECFDF5;border:1px solid #A7F3D0;color:#065F46}
.notice.err{background:#FEF2F2;border:1px solid #FECACA;color:#991B1B}
.inline-form{display:inline}
</style>"#;

/// Wrap a page body in the document shell.
fn page(title: &str, body: &str) -> String {
    let mut html = String::with_capacity(PAGE_CSS.len() + body.len() + 256);
    html.push_str("<!DOCTYPE html>\n<html lang=\"en\"><head><meta charset=\"utf-8\"/>");
    html.push_str("<meta name=\"viewport\" content=\"width=device-width,initial-scale=1\"/><title>");
    html.push_str(&escape(title));
    html.push_str("</title>");
    html.push_str(PAGE_CSS);
    html.push_str("</head>\n<body><div class=\"wrap\">\n");
    html.push_str(body);
    html.push_str("\n</div></body></html>");
    html
}

/// The operator login form. Rendered for any unauthenticated request to a
/// gated path.
#[must_use]
pub fn login_page() -> Html<String> {
    let body = r#"<div class="card" style="max-width:380px;margin:48px auto">
<h1 style="text-align:center">Login Required</h1>
<form action="/login" method="POST">
<label for="password">Admin password</label>
<input type="password" id="password" name="password" required autofocus>
<button type="submit" style="width:100%">Login</button>
</form>
</div>"#;
    Html(page("Control Panel — Login", body))
}

/// The main dashboard: settings form, VPN blob editor, user management.
#[must_use]
pub fn dashboard(settings: &SettingsSnapshot, users: &[User], vpn: &str) -> Html<String> {
    let mut body = String::with_capacity(4096 + vpn.len());

    body.push_str(
        r#"<div class="topline"><h1>Settings &amp; Users</h1><a href="/raw" target="_blank">Check JSON</a></div>"#,
    );

    // Settings form.
    body.push_str(r#"<div class="card"><h2>Main Configuration</h2>
<form method="POST" action="/">
<input type="hidden" name="action" value="update_config">
<label for="AdminUrl">Admin contact URL</label>
<input type="text" id="AdminUrl" name="AdminUrl" placeholder="https://t.me/yourname" value=""#);
    body.push_str(&escape(&settings.admin_url));
    body.push_str(r#"">
<label for="Marquee">Marquee text</label>
<input type="text" id="Marquee" name="Marquee" placeholder="Announcement shown in the app" value=""#);
    body.push_str(&escape(&settings.marquee));
    body.push_str(
        r#"">
<button type="submit">Update Settings</button>
</form></div>"#,
    );

    // VPN blob editor.
    body.push_str(r#"<div class="card"><h2>VPN Configuration</h2>
<p class="muted">Stored in chunks; paste the full configuration text.</p>
<form method="POST" action="/">
<input type="hidden" name="action" value="update_vpn">
<textarea name="VpnData" spellcheck="false">"#);
    body.push_str(&escape(vpn));
    body.push_str(
        r#"</textarea>
<button type="submit">Save VPN Data</button>
</form></div>"#,
    );

    // Add / edit user form.
    body.push_str(r#"<div class="card"><h2>User Management</h2>
<form method="POST" action="/" id="userForm">
<input type="hidden" name="action" value="add_user">
<label for="inputID">User ID / Device ID</label>
<input type="text" id="inputID" name="ID" required>
<label for="inputDate">Expiry date</label>
<input type="date" id="inputDate" name="Expiry" required>
<button type="submit">Save User</button>
</form></div>"#);

    // User table.
    body.push_str(r#"<div class="card"><h2>Active Users ("#);
    body.push_str(&users.len().to_string());
    body.push_str(
        r#")</h2>
<table><thead><tr><th>ID</th><th>Expiry</th><th style="text-align:right">Actions</th></tr></thead><tbody>"#,
    );
    if users.is_empty() {
        body.push_str(r#"<tr><td colspan="3" class="muted" style="text-align:center">No users found.</td></tr>"#);
    }
    for user in users {
        let id = escape(&user.id);
        let stored = escape(&user.expiry);
        body.push_str("<tr><td class=\"mono\">");
        body.push_str(&id);
        body.push_str("</td><td>");
        body.push_str(&stored);
        body.push_str("</td><td><div class=\"row-actions\">");
        body.push_str(&format!(
            r#"<button type="button" class="ghost" onclick="editUser('{id}','{stored}')">Edit</button>"#
        ));
        body.push_str(&format!(
            r#"<form method="POST" action="/" class="inline-form" onsubmit="return confirm('Delete {id}?');"><input type="hidden" name="action" value="delete_user"><input type="hidden" name="ID" value="{id}"><button class="danger">Delete</button></form>"#
        ));
        body.push_str(&format!(
            r#"<form method="POST" action="/" class="inline-form"><input type="hidden" name="action" value="reset_trial"><input type="hidden" name="ID" value="{id}"><button class="ghost" title="Allow this device to claim a trial again">Reset Trial</button></form>"#
        ));
        body.push_str("</div></td></tr>");
    }
    body.push_str("</tbody></table></div>");

    // Refill the form from a table row; the date input wants ISO order.
    body.push_str(
        r#"<script>
function editUser(id, expiry) {
  document.getElementById('inputID').value = id;
  var parts = expiry.split('/');
  if (parts.length === 3) {
    document.getElementById('inputDate').value = parts[2] + '-' + parts[1] + '-' + parts[0];
  }
  document.getElementById('userForm').scrollIntoView();
}
</script>"#,
    );

    Html(page("Control Panel", &body))
}

/// The public trial claim form.
#[must_use]
pub fn trial_form() -> Html<String> {
    let body = r#"<div class="card" style="max-width:420px;margin:48px auto">
<h1 style="text-align:center">Free Trial</h1>
<p class="muted" style="margin-bottom:14px">Enter your device ID to activate a trial. Each device can claim one trial.</p>
<form method="POST" action="/trial">
<label for="ID">Device ID</label>
<input type="text" id="ID" name="ID" required autofocus>
<button type="submit" style="width:100%">Activate Trial</button>
</form>
</div>"#;
    Html(page("Free Trial", body))
}

/// Rendered after a successful trial activation.
#[must_use]
pub fn trial_granted(user: &User) -> Html<String> {
    let mut body = String::with_capacity(512);
    body.push_str(r#"<div class="card" style="max-width:420px;margin:48px auto">"#);
    body.push_str(r#"<div class="notice ok">Trial activated.</div><p>Device <strong class="mono">"#);
    body.push_str(&escape(&user.id));
    body.push_str("</strong> is active until <strong>");
    body.push_str(&escape(&user.expiry));
    body.push_str("</strong>.</p></div>");
    Html(page("Trial Activated", &body))
}

/// Rendered when a device tries to claim a second trial.
#[must_use]
pub fn trial_already_used(id: &str) -> Html<String> {
    let mut body = String::with_capacity(512);
    body.push_str(r#"<div class="card" style="max-width:420px;margin:48px auto">"#);
    body.push_str(r#"<div class="notice err">Trial already used.</div><p>Device <strong class="mono">"#);
    body.push_str(&escape(id));
    body.push_str(
        r#"</strong> has already claimed its trial. Contact the administrator if you believe this is a mistake.</p>
<p style="margin-top:10px"><a href="/trial">Back</a></p></div>"#,
    );
    Html(page("Trial Unavailable", &body))
}

/// Generic failure page shown when an administrative action dies mid-way.
#[must_use]
pub fn error_page(message: &str) -> String {
    let mut body = String::with_capacity(384);
    body.push_str(r#"<div class="card" style="max-width:520px;margin:48px auto">"#);
    body.push_str(r#"<div class="notice err">Something went wrong.</div><p class="mono">"#);
    body.push_str(&escape(message));
    body.push_str(r#"</p><p style="margin-top:10px"><a href="/">Back to dashboard</a></p></div>"#);
    page("Error", &body)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escape_neutralizes_markup() {
        assert_eq!(
            escape(r#"<script>alert("x")</script>"#),
            "&lt;script&gt;alert(&quot;x&quot;)&lt;/script&gt;"
        );
        assert_eq!(escape("a&b'c"), "a&amp;b&#39;c");
    }

    #[test]
    fn dashboard_shows_stored_values() {
        let settings = SettingsSnapshot {
            admin_url: "https://t.me/op".to_owned(),
            marquee: "hello".to_owned(),
        };
        let users = vec![User {
            id: "dev1".to_owned(),
            expiry: "01/01/2025".to_owned(),
        }];
        let Html(html) = dashboard(&settings, &users, "vpn-blob");

        assert!(html.contains("https://t.me/op"));
        assert!(html.contains("dev1"));
        assert!(html.contains("01/01/2025"));
        assert!(html.contains("vpn-blob"));
        assert!(html.contains("Active Users (1)"));
    }

    #[test]
    fn login_page_posts_to_login() {
        let Html(html) = login_page();
        assert!(html.contains(r#"action="/login""#));
        assert!(html.contains(r#"name="password""#));
    }
}
