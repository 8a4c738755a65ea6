// src/cloud_handler.rs
use std::future::Future;
use std::sync::Arc;

use tokio::task;
use tracing::{debug, info, warn};
use url::Url;

use crate::data_types::{DisplayMode, SheetData, SourceReference};
use crate::error::FetchError;
use crate::gviz;

pub const DEFAULT_ENDPOINT: &str = "https://docs.google.com/spreadsheets/d/";

/// Network seam: turns a request URL into the raw response body.
pub trait SheetFetcher: Send + Sync {
    fn fetch_text(&self, url: &Url) -> impl Future<Output = Result<String, FetchError>> + Send;
}

#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new() -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("sheet_viewer/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(HttpFetcher { client })
    }
}

impl SheetFetcher for HttpFetcher {
    fn fetch_text(&self, url: &Url) -> impl Future<Output = Result<String, FetchError>> + Send {
        let request = self.client.get(url.clone());
        async move {
            let response = request.send().await?.error_for_status()?;
            Ok(response.text().await?)
        }
    }
}

/// Loads a published sheet through the public gviz query endpoint.
#[derive(Debug)]
pub struct SheetLoader<F> {
    fetcher: Arc<F>,
    endpoint: Url,
}

impl<F> Clone for SheetLoader<F> {
    fn clone(&self) -> Self {
        SheetLoader {
            fetcher: Arc::clone(&self.fetcher),
            endpoint: self.endpoint.clone(),
        }
    }
}

impl<F: SheetFetcher> SheetLoader<F> {
    pub fn new(fetcher: F, endpoint: Url) -> Self {
        SheetLoader {
            fetcher: Arc::new(fetcher),
            endpoint,
        }
    }

    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    /// `<endpoint>/<id>/gviz/tq?tqx=out:json&sheet=<tab>`
    pub fn request_url(&self, source: &SourceReference) -> Result<Url, FetchError> {
        let mut url = self.endpoint.clone();
        url.path_segments_mut()
            .map_err(|_| {
                FetchError::Config(format!("endpoint {} cannot take a path", self.endpoint))
            })?
            .pop_if_empty()
            .extend([source.document_key(), "gviz", "tq"]);
        url.query_pairs_mut()
            .append_pair("tqx", "out:json")
            .append_pair("sheet", source.tab_or_default());
        Ok(url)
    }

    /// Fetch the sheet and shape it for `mode`. Nothing is sent when the
    /// document id is blank.
    pub async fn fetch_and_render(
        &self,
        source: &SourceReference,
        mode: DisplayMode,
    ) -> Result<SheetData, FetchError> {
        source.validate()?;
        let url = self.request_url(source)?;
        debug!(%url, ?mode, "fetching sheet");

        let result = self.fetch_and_parse(&url, mode).await;
        match &result {
            Ok(data) => info!(
                document = source.document_key(),
                tab = source.tab_or_default(),
                entries = data.len(),
                "sheet loaded"
            ),
            Err(err) => warn!(
                document = source.document_key(),
                tab = source.tab_or_default(),
                error = %err,
                "sheet load failed"
            ),
        }
        result
    }

    async fn fetch_and_parse(&self, url: &Url, mode: DisplayMode) -> Result<SheetData, FetchError> {
        let raw = self.fetcher.fetch_text(url).await?;

        // Large sheets decode off the async workers.
        task::spawn_blocking(move || shape(&raw, mode))
            .await
            .map_err(|e| FetchError::Parse(format!("decoding task failed: {}", e)))?
    }
}

fn shape(raw: &str, mode: DisplayMode) -> Result<SheetData, FetchError> {
    let table = gviz::parse_table(raw)?;

    Ok(match mode {
        DisplayMode::Table => SheetData::Table(gviz::to_table(&table)),
        DisplayMode::List => SheetData::List(gviz::to_excuses(&table)),
    })
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::gviz::{EPILOGUE, PROLOGUE};
    use assert_matches::assert_matches;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    /// Replies with a canned body and counts calls.
    pub(crate) struct StubFetcher {
        pub calls: AtomicUsize,
        pub urls: Mutex<Vec<Url>>,
        reply: Result<String, FetchError>,
    }

    impl StubFetcher {
        pub(crate) fn replying(reply: Result<String, FetchError>) -> Self {
            StubFetcher {
                calls: AtomicUsize::new(0),
                urls: Mutex::new(Vec::new()),
                reply,
            }
        }

        pub(crate) fn wrapped(payload: &str) -> Self {
            Self::replying(Ok(format!("{PROLOGUE}{payload}{EPILOGUE}")))
        }

        pub(crate) fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl SheetFetcher for StubFetcher {
        fn fetch_text(&self, url: &Url) -> impl Future<Output = Result<String, FetchError>> + Send {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.urls.lock().unwrap().push(url.clone());
            let reply = self.reply.clone();
            async move { reply }
        }
    }

    pub(crate) const EXCUSES: &str = r#"{"table":{"cols":[{"id":"A","label":"Text"}],
        "rows":[{"c":[{"v":"excuse one"}]},{"c":[{"v":""}]},{"c":[{"v":"excuse two"}]}]}}"#;

    fn loader(fetcher: StubFetcher) -> SheetLoader<StubFetcher> {
        SheetLoader::new(fetcher, Url::parse(DEFAULT_ENDPOINT).unwrap())
    }

    #[test]
    fn request_url_targets_gviz_json() {
        let loader = loader(StubFetcher::wrapped(EXCUSES));
        let url = loader
            .request_url(&SourceReference::new("abc123", "My Tab/2"))
            .unwrap();

        assert_eq!(url.host_str(), Some("docs.google.com"));
        assert_eq!(url.path(), "/spreadsheets/d/abc123/gviz/tq");
        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert_eq!(
            pairs,
            vec![
                ("tqx".to_string(), "out:json".to_string()),
                ("sheet".to_string(), "My Tab/2".to_string()),
            ]
        );
        assert!(!url.query().unwrap().contains(' '));
    }

    #[test]
    fn request_url_uses_default_tab_and_extracts_id_from_links() {
        let loader = loader(StubFetcher::wrapped(EXCUSES));
        let url = loader
            .request_url(&SourceReference::new(
                "https://docs.google.com/spreadsheets/d/xyz/edit",
                "",
            ))
            .unwrap();

        assert_eq!(url.path(), "/spreadsheets/d/xyz/gviz/tq");
        assert!(url.query_pairs().any(|(k, v)| k == "sheet" && v == "Sheet1"));
    }

    #[tokio::test]
    async fn endpoint_without_path_is_a_config_error() {
        let loader = SheetLoader::new(
            StubFetcher::wrapped(EXCUSES),
            Url::parse("mailto:sheets@example.com").unwrap(),
        );
        let result = loader
            .fetch_and_render(&SourceReference::new("abc", ""), DisplayMode::List)
            .await;

        assert_matches!(result, Err(FetchError::Config(msg)) if msg.contains("mailto:"));
        assert_eq!(loader.fetcher().call_count(), 0);
    }

    #[tokio::test]
    async fn empty_document_id_never_touches_the_network() {
        let loader = loader(StubFetcher::wrapped(EXCUSES));
        let result = loader
            .fetch_and_render(&SourceReference::new("", "Sheet1"), DisplayMode::List)
            .await;

        assert_eq!(result, Err(FetchError::Validation));
        assert_eq!(loader.fetcher().call_count(), 0);
    }

    #[tokio::test]
    async fn list_mode_yields_excuses() {
        let loader = loader(StubFetcher::wrapped(EXCUSES));
        let data = loader
            .fetch_and_render(&SourceReference::new("abc", ""), DisplayMode::List)
            .await
            .unwrap();

        assert_matches!(data, SheetData::List(excuses) => {
            let ids: Vec<usize> = excuses.iter().map(|e| e.id).collect();
            assert_eq!(ids, vec![1, 3]);
        });
        assert_eq!(loader.fetcher().call_count(), 1);
    }

    #[tokio::test]
    async fn table_mode_yields_table() {
        let loader = loader(StubFetcher::wrapped(EXCUSES));
        let data = loader
            .fetch_and_render(&SourceReference::new("abc", ""), DisplayMode::Table)
            .await
            .unwrap();

        assert_matches!(data, SheetData::Table(table) => {
            assert_eq!(table.columns, vec!["Text"]);
            assert_eq!(table.rows.len(), 3);
            assert_eq!(table.cell(1, "Text"), "");
        });
    }

    #[tokio::test]
    async fn failures_collapse_into_fetch_errors() {
        let network = loader(StubFetcher::replying(Err(FetchError::Network(
            "connection reset".to_string(),
        ))));
        assert_matches!(
            network
                .fetch_and_render(&SourceReference::new("abc", ""), DisplayMode::List)
                .await,
            Err(FetchError::Network(_))
        );

        let unwrapped = loader(StubFetcher::replying(Ok(EXCUSES.to_string())));
        assert_matches!(
            unwrapped
                .fetch_and_render(&SourceReference::new("abc", ""), DisplayMode::List)
                .await,
            Err(FetchError::Parse(_))
        );

        let shapeless = loader(StubFetcher::wrapped(r#"{"status":"ok"}"#));
        assert_matches!(
            shapeless
                .fetch_and_render(&SourceReference::new("abc", ""), DisplayMode::Table)
                .await,
            Err(FetchError::Shape(_))
        );
    }
}
