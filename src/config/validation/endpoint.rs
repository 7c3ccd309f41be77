//! Base URL validation
//!
//! Local inference servers legitimately live on localhost or private addresses, so
//! only the shape of the URL is checked here.

use url::Url;

pub fn validate_base_url(url_str: &str, context: &str) -> Result<(), String> {
    let url = Url::parse(url_str)
        .map_err(|e| format!("{} has invalid URL format: {}", context, e))?;

    match url.scheme() {
        "http" | "https" => {}
        scheme => {
            return Err(format!(
                "{} must use http:// or https:// scheme, got: {}",
                context, scheme
            ));
        }
    }

    if url.host_str().is_none_or(str::is_empty) {
        return Err(format!("{} URL must have a valid host", context));
    }

    if url.query().is_some() || url.fragment().is_some() {
        return Err(format!("{} must not carry a query string or fragment", context));
    }

    Ok(())
}
