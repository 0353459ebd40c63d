//! HTML pages.

use axum::response::Html;

use crate::config::ServerConfig;
use crate::messages::Locale;

const APP_TEMPLATE: &str = include_str!("../assets/app.html");

/// The single-page editor, wired to the configured app path.
pub fn app_page(config: &ServerConfig) -> Html<String> {
    Html(
        APP_TEMPLATE
            .replace("{{LANG}}", config.locale.html_lang())
            .replace("{{BASE_PATH}}", &config.app_path),
    )
}

pub fn not_found_page(locale: Locale) -> Html<String> {
    Html(format!(
        r#"<!DOCTYPE html>
<html lang="{lang}">
  <head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title}</title>
    <style>body{{font-family:sans-serif;text-align:center;padding:50px;}}</style>
  </head>
  <body>
    <h1>{heading}</h1>
    <p>{hint}</p>
  </body>
</html>"#,
        lang = locale.html_lang(),
        title = locale.not_found_title(),
        heading = locale.not_found_heading(),
        hint = locale.not_found_hint(),
    ))
}
