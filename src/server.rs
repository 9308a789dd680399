use std::net::SocketAddr;

use anyhow::Context;
use axum::extract::Multipart;
use axum::response::Html;
use axum::routing::{get, post};
use axum::Router;
use tracing::info;

use crate::aggregate;
use crate::report;

/// Serves the upload form and renders reports for posted logs.
///
/// Every request builds its own aggregation state, so concurrent uploads
/// cannot interleave their output.
pub async fn serve(addr: SocketAddr) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!("listening on http://{addr}");
    axum::serve(listener, router()).await?;
    Ok(())
}

fn router() -> Router {
    Router::new()
        .route("/", get(index))
        .route("/enviar", post(upload))
}

async fn index() -> Html<String> {
    Html(render_page(None))
}

async fn upload(multipart: Multipart) -> Html<String> {
    let output = match process_upload(multipart).await {
        Ok(report) => report,
        Err(reason) => format!("Arquivo inválido ({reason})"),
    };
    Html(render_page(Some(&output)))
}

/// Feeds the uploaded file to the aggregation core unchanged and returns
/// the report text. Failures come back as plain strings for the page; the
/// adapter never rewrites report content.
async fn process_upload(mut multipart: Multipart) -> Result<String, String> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|err| err.to_string())?
    {
        if field.name() != Some("log") {
            continue;
        }
        let data = field.bytes().await.map_err(|err| err.to_string())?;
        info!(bytes = data.len(), "processing uploaded log");
        let participation =
            aggregate::participation_stats(data.as_ref()).map_err(|err| err.to_string())?;
        return Ok(report::build_report(&participation));
    }
    Err("campo \"log\" ausente no formulário".to_string())
}

fn render_page(output: Option<&str>) -> String {
    let result = match output {
        Some(text) => format!("<pre>{}</pre>", escape_html(text)),
        None => String::new(),
    };
    format!(
        "<!DOCTYPE html>\n\
         <html lang=\"pt-BR\">\n\
         <head><meta charset=\"utf-8\"><title>Relatório de uso do Moodle</title></head>\n\
         <body>\n\
         <h1>Relatório de uso do Moodle</h1>\n\
         <form action=\"/enviar\" method=\"post\" enctype=\"multipart/form-data\">\n\
         <input type=\"file\" name=\"log\">\n\
         <input type=\"submit\" value=\"Enviar\">\n\
         </form>\n\
         {result}\n\
         </body>\n\
         </html>\n"
    )
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_page_has_the_upload_form() {
        let page = render_page(None);
        assert!(page.contains("action=\"/enviar\""));
        assert!(page.contains("name=\"log\""));
        assert!(!page.contains("<pre>"));
    }

    #[test]
    fn report_text_is_escaped_into_the_page() {
        let page = render_page(Some("** Relatório **\n\t<ANA> & BOB"));
        assert!(page.contains("<pre>** Relatório **\n\t&lt;ANA&gt; &amp; BOB</pre>"));
    }

    #[test]
    fn escape_html_covers_the_three_metacharacters() {
        assert_eq!(escape_html("a&b<c>d"), "a&amp;b&lt;c&gt;d");
        assert_eq!(escape_html("sem marcação"), "sem marcação");
    }
}
