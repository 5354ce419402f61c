//! Product listing endpoint
//!
//! One listing, three representations chosen by path suffix:
//! `.json` (download), `.xls` (HTML table served as a spreadsheet download)
//! and anything else as a browsable HTML page.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::Response;
use std::fmt::{self, Write};

use super::context::RequestContext;
use crate::catalog::{format_price, Product, ProductSource};
use crate::error::HandlerError;
use crate::http::{self, escape_html, mime};

/// Representation selected for a listing request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Html,
    Spreadsheet,
    Json,
}

impl OutputFormat {
    /// Classify a request path by its suffix; HTML is the default
    pub fn from_path(path: &str) -> Self {
        if path.ends_with(".json") {
            Self::Json
        } else if path.ends_with(".xls") {
            Self::Spreadsheet
        } else {
            Self::Html
        }
    }

    pub const fn extension(self) -> &'static str {
        match self {
            Self::Html => "html",
            Self::Spreadsheet => "xls",
            Self::Json => "json",
        }
    }

    pub fn content_type(self) -> &'static str {
        mime::get_content_type(Some(self.extension()))
    }

    /// Download file name, for the representations served as attachments
    pub const fn attachment(self) -> Option<&'static str> {
        match self {
            Self::Html => None,
            Self::Spreadsheet => Some("productos.xls"),
            Self::Json => Some("productos.json"),
        }
    }
}

/// Serve `GET {context}/productos.{html,xls,json}`
pub fn handle(
    ctx: &RequestContext,
    source: &dyn ProductSource,
) -> Result<Response<Full<Bytes>>, HandlerError> {
    let products = source.list_all()?;
    let format = OutputFormat::from_path(&ctx.servlet_path);
    let body = render(format, &products, &ctx.context_path)?;

    Ok(http::build_content_response(
        Bytes::from(body),
        format.content_type(),
        format.attachment(),
        ctx.is_head(),
    ))
}

/// Render the body for the chosen representation
pub fn render(
    format: OutputFormat,
    products: &[Product],
    context_path: &str,
) -> Result<String, HandlerError> {
    if format == OutputFormat::Json {
        return Ok(serde_json::to_string(products)?);
    }

    let mut out = String::new();
    match format {
        OutputFormat::Spreadsheet => write_table(&mut out, products)?,
        _ => write_page(&mut out, products, context_path)?,
    }
    Ok(out)
}

fn write_page(out: &mut String, products: &[Product], context_path: &str) -> fmt::Result {
    let prefix = escape_html(context_path);

    out.push_str(concat!(
        "<!DOCTYPE html>\n",
        "<html>\n",
        "<head>\n",
        "  <meta charset=\"utf-8\">\n",
        "  <title>Listado de Productos</title>\n",
        "</head>\n",
        "<body>\n",
        "  <h1>Listado de productos</h1>\n",
    ));
    writeln!(out, "<p><a href='{prefix}/productos.xls'>Exportar a Excel</a></p>")?;
    writeln!(out, "<p><a href='{prefix}/productos.json'>Mostrar JSON</a></p>")?;
    write_table(out, products)?;
    out.push_str("</body>\n</html>\n");
    Ok(())
}

/// Table shared by the HTML page and the spreadsheet download
fn write_table(out: &mut String, products: &[Product]) -> fmt::Result {
    out.push_str("<table>\n<tr>\n");
    for column in ["id", "nombre", "tipo", "precio"] {
        writeln!(out, "<th>{column}</th>")?;
    }
    out.push_str("</tr>\n");

    for p in products {
        out.push_str("<tr>\n");
        writeln!(out, "<td>{}</td>", p.id)?;
        writeln!(out, "<td>{}</td>", escape_html(&p.name))?;
        writeln!(out, "<td>{}</td>", escape_html(&p.kind))?;
        writeln!(out, "<td>{}</td>", format_price(p.price))?;
        out.push_str("</tr>\n");
    }

    out.push_str("</table>\n");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{CatalogError, StaticProductSource};
    use crate::handler::context::tests::context_for;
    use http_body_util::BodyExt;
    use hyper::header::{CONTENT_DISPOSITION, CONTENT_TYPE};

    struct FailingSource;

    impl ProductSource for FailingSource {
        fn list_all(&self) -> Result<Vec<Product>, CatalogError> {
            Err(CatalogError::Unavailable("connection refused".to_string()))
        }
    }

    fn sample() -> Vec<Product> {
        vec![
            Product::new(1, "notebook", "computacion", 175_000.0),
            Product::new(2, "mesa <escritorio>", "oficina & hogar", 19.999),
            Product::new(3, "lapiz", "libreria", 19.5),
        ]
    }

    fn table_of(body: &str) -> &str {
        let start = body.find("<table>").unwrap();
        let end = body.find("</table>").unwrap() + "</table>".len();
        &body[start..end]
    }

    #[test]
    fn test_classify_by_suffix() {
        assert_eq!(OutputFormat::from_path("/productos.json"), OutputFormat::Json);
        assert_eq!(OutputFormat::from_path("/productos.xls"), OutputFormat::Spreadsheet);
        assert_eq!(OutputFormat::from_path("/productos.html"), OutputFormat::Html);
        assert_eq!(OutputFormat::from_path("/productos"), OutputFormat::Html);
        assert_eq!(OutputFormat::from_path("/productos.xlsx"), OutputFormat::Html);
    }

    #[test]
    fn test_format_headers() {
        assert_eq!(OutputFormat::Html.content_type(), "text/html;charset=UTF-8");
        assert_eq!(OutputFormat::Spreadsheet.content_type(), "application/vnd.ms-excel");
        assert_eq!(OutputFormat::Json.content_type(), "application/json;charset=UTF-8");
        assert_eq!(OutputFormat::Html.attachment(), None);
        assert_eq!(OutputFormat::Spreadsheet.attachment(), Some("productos.xls"));
        assert_eq!(OutputFormat::Json.attachment(), Some("productos.json"));
    }

    #[test]
    fn test_json_matches_source() {
        let products = sample();
        let body = render(OutputFormat::Json, &products, "").unwrap();
        let parsed: Vec<serde_json::Value> = serde_json::from_str(&body).unwrap();
        assert_eq!(parsed.len(), products.len());
        for (value, product) in parsed.iter().zip(&products) {
            assert_eq!(value["id"], product.id);
            assert_eq!(value["nombre"], product.name.as_str());
            assert_eq!(value["tipo"], product.kind.as_str());
            let price = value["precio"].as_f64().unwrap();
            assert!((price - product.price).abs() < 1e-9);
        }
        assert!(!body.contains("<table>"));
    }

    #[test]
    fn test_html_and_spreadsheet_share_table() {
        let products = sample();
        let page = render(OutputFormat::Html, &products, "/app").unwrap();
        let sheet = render(OutputFormat::Spreadsheet, &products, "/app").unwrap();

        assert_eq!(table_of(&page), sheet.trim_end());
        assert!(sheet.starts_with("<table>"));
        assert!(!sheet.contains("<html>"));
        assert!(!sheet.contains("<a href"));
    }

    #[test]
    fn test_html_page_shell() {
        let page = render(OutputFormat::Html, &sample(), "/app").unwrap();
        assert!(page.starts_with("<!DOCTYPE html>"));
        assert!(page.contains("<h1>Listado de productos</h1>"));
        assert!(page.contains("<a href='/app/productos.xls'>Exportar a Excel</a>"));
        assert!(page.contains("<a href='/app/productos.json'>Mostrar JSON</a>"));
        assert!(page.trim_end().ends_with("</html>"));
    }

    #[test]
    fn test_rows_keep_source_order_and_format_prices() {
        let sheet = render(OutputFormat::Spreadsheet, &sample(), "").unwrap();
        let first = sheet.find("<td>1</td>").unwrap();
        let second = sheet.find("<td>2</td>").unwrap();
        let third = sheet.find("<td>3</td>").unwrap();
        assert!(first < second && second < third);
        assert!(sheet.contains("<td>175000.00</td>"));
        assert!(sheet.contains("<td>20.00</td>"));
        assert!(sheet.contains("<td>19.50</td>"));
    }

    #[test]
    fn test_cells_are_escaped() {
        let sheet = render(OutputFormat::Spreadsheet, &sample(), "").unwrap();
        assert!(sheet.contains("<td>mesa &lt;escritorio&gt;</td>"));
        assert!(sheet.contains("<td>oficina &amp; hogar</td>"));
    }

    #[test]
    fn test_empty_list() {
        assert_eq!(render(OutputFormat::Json, &[], "").unwrap(), "[]");
        let sheet = render(OutputFormat::Spreadsheet, &[], "").unwrap();
        assert_eq!(sheet.matches("<tr>").count(), 1);
        assert!(!sheet.contains("<td>"));
        let page = render(OutputFormat::Html, &[], "").unwrap();
        assert_eq!(table_of(&page).matches("<tr>").count(), 1);
    }

    #[tokio::test]
    async fn test_handle_sets_download_headers() {
        let ctx = context_for("/app/productos.xls", "/app", &[]);
        let source = StaticProductSource::new(sample());
        let resp = handle(&ctx, &source).unwrap();

        assert_eq!(resp.headers()[CONTENT_TYPE], "application/vnd.ms-excel");
        assert_eq!(
            resp.headers()[CONTENT_DISPOSITION],
            "attachment; filename=productos.xls"
        );
        let body = resp.into_body().collect().await.unwrap().to_bytes();
        assert!(body.starts_with(b"<table>"));
    }

    #[test]
    fn test_source_failure_propagates() {
        let ctx = context_for("/productos.html", "", &[]);
        let err = handle(&ctx, &FailingSource).unwrap_err();
        assert!(matches!(err, HandlerError::Catalog(_)));
    }
}
