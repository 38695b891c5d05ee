use url::Url;

/// Render the `bee-url` input for the step log.
///
/// Gateway URLs may carry basic-auth credentials or an API key in the query
/// string; both are dropped along with any fragment. Text that does not parse
/// as a URL is returned unchanged, since it is rejected later by the client.
pub fn redact_node_url(bee_url: &str) -> String {
    let Ok(mut url) = Url::parse(bee_url) else {
        return bee_url.to_string();
    };
    if url.username().is_empty() && url.password().is_none() && url.query().is_none() && url.fragment().is_none() {
        return bee_url.to_string();
    }

    let _ = url.set_username("");
    let _ = url.set_password(None);
    url.set_query(None);
    url.set_fragment(None);
    url.to_string()
}
