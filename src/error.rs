use url::Url;

/// Categories attached to the `eyre::Report`s returned by this crate.
///
/// Reports keep their full chain, so the underlying cause (e.g. a
/// `reqwest::Error` carrying the HTTP status) is still reachable after
/// matching on the category:
///
/// ```no_run
/// # fn demo(report: eyre::Report) {
/// match report.downcast_ref::<metallum::Error>() {
///     Some(metallum::Error::Request { url }) => eprintln!("could not fetch {url}"),
///     Some(metallum::Error::Parse { page }) => eprintln!("site layout changed for {page}"),
///     None => eprintln!("{report:?}"),
/// }
/// # }
/// ```
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("request for {url} failed")]
    Request { url: Url },

    #[error("unexpected structure in {page} page")]
    Parse { page: Page },
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "kebab-case")]
pub enum Page {
    Band,
    Discography,
    SimilarArtists,
    Album,
    Lyrics,
    BandSearch,
    AlbumSearch,
}
