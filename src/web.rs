use crate::{config::Config, Error};
use eyre::WrapErr;
use url::Url;

/// Retrieves the body of a page, the only way the scraper touches the network.
pub trait Fetch {
    fn get(&self, url: &Url) -> eyre::Result<String>;
}

impl<T: Fetch + ?Sized> Fetch for &T {
    fn get(&self, url: &Url) -> eyre::Result<String> {
        (**self).get(url)
    }
}

#[derive(Debug, Clone)]
pub struct Client {
    client: reqwest::blocking::Client,
}

impl Client {
    #[culpa::try_fn]
    pub fn new(config: &Config) -> eyre::Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(&config.user_agent)
            .gzip(true)
            .build()?;
        Self { client }
    }
}

impl Fetch for Client {
    #[culpa::try_fn]
    #[tracing::instrument(skip(self), fields(%url))]
    fn get(&self, url: &Url) -> eyre::Result<String> {
        let response = self
            .client
            .get(url.clone())
            .send()
            .and_then(|response| response.error_for_status())
            .wrap_err(Error::Request { url: url.clone() })?;
        tracing::debug!(status = %response.status(), "received response");
        response
            .text()
            .wrap_err(Error::Request { url: url.clone() })?
    }
}
