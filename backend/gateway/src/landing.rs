//! Landing page served at `/`.

use axum::{extract::State, response::Html};

use crate::server::GatewayState;

pub async fn index(State(state): State<GatewayState>) -> Html<String> {
    Html(render(&state.webhook_path))
}

fn render(webhook_path: &str) -> String {
    format!(
        r#"<!doctype html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>SheetBot</title>
</head>
<body>
<main>
<h1>WhatsApp + Google Sheets Bot</h1>
<p>This service exposes a WhatsApp webhook and looks up order status and inventory in a Google Sheet.
Set the webhook URL in your WhatsApp Business settings to <code>{webhook_path}</code>.</p>
<p>Health check: <a href="/api/health"><code>/api/health</code></a></p>
</main>
</body>
</html>
"#
    )
}
