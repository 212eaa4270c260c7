use crate::{
    config::Config,
    data::{Album, AlbumId, AlbumResult, AlbumSummary, Band, BandId, BandResult, Collection, Lyrics, SimilarArtist, TrackId},
    web::{self, Fetch},
    Error, Page,
};
use eyre::WrapErr;
use jiff::Timestamp;
use url::Url;

mod album;
mod band;
mod ext;
pub mod search;
mod text;

use self::{
    ext::{ScraperExt, TextExt},
    search::{AlbumSearch, BandSearch, Search},
};

/// Client for the site, generic over how pages are fetched.
///
/// Every call performs exactly one request and nothing is cached.
#[derive(Debug)]
pub struct Metallum<F = web::Client> {
    fetch: F,
    base: Url,
}

impl Metallum {
    #[culpa::try_fn]
    pub fn new(config: Config) -> eyre::Result<Self> {
        let fetch = web::Client::new(&config)?;
        Self::with_fetch(fetch, &config)
    }
}

impl<F: Fetch> Metallum<F> {
    pub fn with_fetch(fetch: F, config: &Config) -> Self {
        Self {
            fetch,
            base: config.base_url.clone(),
        }
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    #[culpa::try_fn]
    fn get(&self, path: &str) -> eyre::Result<String> {
        let url = self.base.join(path)?;
        self.fetch.get(&url)?
    }

    #[culpa::try_fn]
    #[tracing::instrument(skip(self, search), fields(name = %search.name))]
    pub fn band_search(&self, search: &BandSearch) -> eyre::Result<Search<BandResult>> {
        let mut url = self.base.join("search/ajax-advanced/searching/bands/")?;
        search.apply(&mut url);
        let json = self.fetch.get(&url)?;
        search::parse_band_search(&json).wrap_err(Error::Parse { page: Page::BandSearch })?
    }

    #[culpa::try_fn]
    #[tracing::instrument(skip(self, search), fields(title = %search.title))]
    pub fn album_search(&self, search: &AlbumSearch) -> eyre::Result<Search<AlbumResult>> {
        let mut url = self.base.join("search/ajax-advanced/searching/albums/")?;
        search.apply(&mut url);
        let json = self.fetch.get(&url)?;
        search::parse_album_search(&json).wrap_err(Error::Parse { page: Page::AlbumSearch })?
    }

    #[culpa::try_fn]
    #[tracing::instrument(skip(self), fields(%id))]
    pub fn band(&self, id: BandId) -> eyre::Result<Band> {
        let html = self.get(&id.path())?;
        band::parse_band(&html, &self.base).wrap_err(Error::Parse { page: Page::Band })?
    }

    #[culpa::try_fn]
    #[tracing::instrument(skip(self), fields(%id))]
    pub fn album(&self, id: AlbumId) -> eyre::Result<Album> {
        let html = self.get(&id.path())?;
        album::parse_album(&html, &self.base).wrap_err(Error::Parse { page: Page::Album })?
    }

    #[culpa::try_fn]
    #[tracing::instrument(skip(self), fields(%id))]
    pub fn discography(&self, id: BandId) -> eyre::Result<Collection<AlbumSummary>> {
        let html = self.get(&format!("band/discography/id/{id}/tab/all"))?;
        band::parse_discography(&html).wrap_err(Error::Parse { page: Page::Discography })?
    }

    #[culpa::try_fn]
    #[tracing::instrument(skip(self), fields(%id))]
    pub fn similar_artists(&self, id: BandId) -> eyre::Result<Vec<SimilarArtist>> {
        let html = self.get(&format!("band/ajax-recommendations/id/{id}"))?;
        band::parse_similar_artists(&html).wrap_err(Error::Parse { page: Page::SimilarArtists })?
    }

    /// `None` for instrumentals and tracks nobody has submitted lyrics for.
    #[culpa::try_fn]
    #[tracing::instrument(skip(self), fields(%id))]
    pub fn lyrics(&self, id: &TrackId) -> eyre::Result<Option<Lyrics>> {
        let html = self.get(&format!("release/ajax-view-lyrics/id/{id}"))?;
        album::parse_lyrics(&html).wrap_err(Error::Parse { page: Page::Lyrics })?
    }
}

/// Added and last modified times from the footer of entity pages.
#[culpa::try_fn]
pub(crate) fn audit_trail(document: &scraper::Html) -> eyre::Result<(Option<Timestamp>, Option<Timestamp>)> {
    let cells = document.try_select("#auditTrail tr:nth-child(2) td")?;
    let mut times = cells.iter().map(|cell| audit_time(&cell.clean_text()));
    (times.next().flatten(), times.next().flatten())
}

/// `"Added on: 2002-07-23 15:39:08"`
fn audit_time(cell: &str) -> Option<Timestamp> {
    let (_, value) = cell.split_once(": ")?;
    match text::parse_server_time(value) {
        Ok(time) => Some(time),
        Err(error) => {
            if value.trim() != "N/A" {
                tracing::warn!(?error, %value, "unparseable audit time");
            }
            None
        }
    }
}
