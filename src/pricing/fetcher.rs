use std::time::Duration;

use super::catalog::CatalogDocument;

const FETCH_TIMEOUT: Duration = Duration::from_secs(10);
const FETCH_RETRIES: usize = 3;
const RETRY_BACKOFF_MS: u64 = 250;

/// Fetch a JSON catalog document, retrying with linear backoff
pub(super) fn fetch_catalog(url: &str) -> Option<CatalogDocument> {
    let agent: ureq::Agent = ureq::Agent::config_builder()
        .timeout_global(Some(FETCH_TIMEOUT))
        .build()
        .into();

    for attempt in 0..FETCH_RETRIES {
        match agent.get(url).call() {
            Ok(response) => {
                let mut body = response.into_body();
                match serde_json::from_reader(body.as_reader()) {
                    Ok(parsed) => return Some(parsed),
                    Err(e) => tracing::warn!(%url, error = %e, "catalog response is not a catalog document"),
                }
            }
            Err(e) => tracing::debug!(%url, attempt, error = %e, "catalog fetch failed"),
        }

        if attempt + 1 < FETCH_RETRIES {
            std::thread::sleep(Duration::from_millis(
                RETRY_BACKOFF_MS * (attempt as u64 + 1),
            ));
        }
    }

    None
}
