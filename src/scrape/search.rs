use super::{
    ext::{JsonExt, ScraperExt, TextExt},
    text,
};
use crate::data::{
    AlbumId, AlbumRef, AlbumResult, AlbumType, BandId, BandRef, BandResult, BandStatus,
};
use eyre::OptionExt;
use url::Url;

/// Results of one page of an advanced search.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Search<T> {
    pub results: Vec<T>,
    /// Matches across every page, `results` holds at most one page of them.
    pub total: u64,
}

impl<T> Search<T> {
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}

impl<T> IntoIterator for Search<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.results.into_iter()
    }
}

#[derive(Debug, serde::Deserialize)]
struct SearchPage {
    #[serde(default)]
    error: String,
    #[serde(rename = "iTotalRecords")]
    total: u64,
    #[serde(rename = "aaData")]
    rows: Vec<Vec<String>>,
}

/// Parameters of the band advanced search; unset fields are left out of the
/// query.
#[derive(Clone, Debug)]
pub struct BandSearch {
    pub name: String,
    /// Match `name` exactly rather than as a substring.
    pub strict: bool,
    pub genre: Option<String>,
    /// ISO 3166-1 alpha-2 codes.
    pub countries: Vec<String>,
    pub year_created_from: Option<i16>,
    pub year_created_to: Option<i16>,
    pub status: Vec<BandStatus>,
    pub themes: Option<String>,
    pub location: Option<String>,
    pub label: Option<String>,
    /// Offset of the first result, for paging.
    pub page_start: u64,
}

impl BandSearch {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            strict: true,
            genre: None,
            countries: Vec::new(),
            year_created_from: None,
            year_created_to: None,
            status: Vec::new(),
            themes: None,
            location: None,
            label: None,
            page_start: 0,
        }
    }

    pub fn loose(mut self) -> Self {
        self.strict = false;
        self
    }

    pub(crate) fn apply(&self, url: &mut Url) {
        let mut query = url.query_pairs_mut();
        query
            .append_pair("bandName", &self.name)
            .append_pair("exactBandMatch", flag(self.strict));
        if let Some(genre) = &self.genre {
            query.append_pair("genre", genre);
        }
        for country in &self.countries {
            query.append_pair("country[]", country);
        }
        if let Some(year) = self.year_created_from {
            query.append_pair("yearCreationFrom", &year.to_string());
        }
        if let Some(year) = self.year_created_to {
            query.append_pair("yearCreationTo", &year.to_string());
        }
        for status in &self.status {
            match status.search_id() {
                Some(id) => {
                    query.append_pair("status[]", &id.to_string());
                }
                None => tracing::warn!(%status, "status has no search equivalent, ignoring"),
            }
        }
        if let Some(themes) = &self.themes {
            query.append_pair("themes", themes);
        }
        if let Some(location) = &self.location {
            query.append_pair("location", location);
        }
        if let Some(label) = &self.label {
            query.append_pair("bandLabelName", label);
        }
        query.append_pair("iDisplayStart", &self.page_start.to_string());
    }
}

/// Parameters of the album advanced search.
#[derive(Clone, Debug)]
pub struct AlbumSearch {
    pub title: String,
    pub strict: bool,
    pub band: Option<String>,
    pub band_strict: bool,
    pub year_from: Option<i16>,
    pub year_to: Option<i16>,
    pub month_from: Option<i8>,
    pub month_to: Option<i8>,
    pub countries: Vec<String>,
    pub location: Option<String>,
    pub label: Option<String>,
    /// Only releases on independent labels.
    pub indie_label: bool,
    pub genre: Option<String>,
    pub types: Vec<AlbumType>,
    pub page_start: u64,
}

impl AlbumSearch {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            strict: true,
            band: None,
            band_strict: true,
            year_from: None,
            year_to: None,
            month_from: None,
            month_to: None,
            countries: Vec::new(),
            location: None,
            label: None,
            indie_label: false,
            genre: None,
            types: Vec::new(),
            page_start: 0,
        }
    }

    pub fn loose(mut self) -> Self {
        self.strict = false;
        self
    }

    pub fn by_band(mut self, band: impl Into<String>) -> Self {
        self.band = Some(band.into());
        self
    }

    pub(crate) fn apply(&self, url: &mut Url) {
        // The site ignores a year bound unless its month is given too.
        let month_from = self.month_from.or(self.year_from.map(|_| 1));
        let month_to = self.month_to.or(self.year_to.map(|_| 12));

        let mut query = url.query_pairs_mut();
        query
            .append_pair("releaseTitle", &self.title)
            .append_pair("exactReleaseMatch", flag(self.strict));
        if let Some(band) = &self.band {
            query.append_pair("bandName", band);
        }
        query.append_pair("exactBandMatch", flag(self.band_strict));
        if let Some(year) = self.year_from {
            query.append_pair("releaseYearFrom", &year.to_string());
        }
        if let Some(year) = self.year_to {
            query.append_pair("releaseYearTo", &year.to_string());
        }
        if let Some(month) = month_from {
            query.append_pair("releaseMonthFrom", &month.to_string());
        }
        if let Some(month) = month_to {
            query.append_pair("releaseMonthTo", &month.to_string());
        }
        for country in &self.countries {
            query.append_pair("country[]", country);
        }
        if let Some(location) = &self.location {
            query.append_pair("location", location);
        }
        if let Some(label) = &self.label {
            query.append_pair("releaseLabelName", label);
        }
        query.append_pair("indieLabel", flag(self.indie_label));
        if let Some(genre) = &self.genre {
            query.append_pair("genre", genre);
        }
        for ty in &self.types {
            match ty.search_id() {
                Some(id) => {
                    query.append_pair("releaseType[]", &id.to_string());
                }
                None => tracing::warn!(%ty, "release type has no search equivalent, ignoring"),
            }
        }
        query.append_pair("iDisplayStart", &self.page_start.to_string());
    }
}

fn flag(value: bool) -> &'static str {
    if value {
        "1"
    } else {
        "0"
    }
}

/// A search cell is an HTML fragment, usually one or more links.
#[derive(Debug)]
struct Cell {
    text: String,
    links: Vec<(String, String)>,
}

#[culpa::try_fn]
fn parse_cell(html: &str) -> eyre::Result<Cell> {
    let fragment = scraper::Html::parse_fragment(html);
    let links = fragment
        .try_select("a[href]")?
        .into_iter()
        .filter_map(|a| Some((a.value().attr("href")?.to_owned(), a.clean_text())))
        .collect();
    Cell {
        text: fragment.root_element().clean_text(),
        links,
    }
}

#[culpa::try_fn]
fn parse_page(json: &str) -> eyre::Result<SearchPage> {
    let page: SearchPage = json.parse_json()?;
    if page.error.is_empty() {
        page
    } else {
        Err(eyre::eyre!("search rejected: {}", page.error))?
    }
}

#[culpa::try_fn]
#[tracing::instrument(skip_all)]
pub(crate) fn parse_band_search(json: &str) -> eyre::Result<Search<BandResult>> {
    let page = parse_page(json)?;

    let mut results = Vec::with_capacity(page.rows.len());
    for row in page.rows {
        let cells = eyre::Result::<Vec<_>, _>::from_iter(row.iter().map(|cell| parse_cell(cell)))?;
        let (name, genre, country) = match &cells[..] {
            [name, genre, country, ..] => (name, genre, country),
            _ => Err(eyre::eyre!("band result with {} columns", cells.len()))?,
        };
        let (href, band_name) = name.links.first().ok_or_eyre("band result without link")?;
        results.push(BandResult {
            band: BandRef {
                id: BandId(text::trailing_id(href)?),
                name: band_name.clone(),
            },
            genres: text::split_genres(&genre.text),
            country: country.text.clone(),
            extra: cells[3..].iter().map(|cell| cell.text.clone()).collect(),
        });
    }
    tracing::debug!(count = results.len(), total = page.total, "parsed band search");
    Search {
        results,
        total: page.total,
    }
}

#[culpa::try_fn]
#[tracing::instrument(skip_all)]
pub(crate) fn parse_album_search(json: &str) -> eyre::Result<Search<AlbumResult>> {
    let page = parse_page(json)?;

    let mut results = Vec::with_capacity(page.rows.len());
    for row in page.rows {
        let cells = eyre::Result::<Vec<_>, _>::from_iter(row.iter().map(|cell| parse_cell(cell)))?;
        let (bands, album, ty) = match &cells[..] {
            [bands, album, ty, ..] => (bands, album, ty),
            _ => Err(eyre::eyre!("album result with {} columns", cells.len()))?,
        };
        let (href, title) = album.links.first().ok_or_eyre("album result without link")?;
        let bands = eyre::Result::<Vec<_>, _>::from_iter(bands.links.iter().map(|(href, name)| {
            eyre::Result::<_>::Ok(BandRef {
                id: BandId(text::trailing_id(href)?),
                name: name.clone(),
            })
        }))?;
        let date = cells.get(3).and_then(|cell| match text::parse_release_date(&cell.text) {
            Ok(date) => Some(date),
            Err(error) => {
                tracing::warn!(?error, date = %cell.text, "unparseable release date");
                None
            }
        });
        results.push(AlbumResult {
            album: AlbumRef {
                id: AlbumId(text::trailing_id(href)?),
                title: title.clone(),
            },
            band_name: cells[0].text.clone(),
            bands,
            ty: ty.text.parse()?,
            date,
            extra: cells.iter().skip(4).map(|cell| cell.text.clone()).collect(),
        });
    }
    tracing::debug!(count = results.len(), total = page.total, "parsed album search");
    Search {
        results,
        total: page.total,
    }
}

#[cfg(test)]
mod tests {
    use super::{parse_album_search, parse_band_search, AlbumSearch, BandSearch};
    use crate::data::{AlbumId, AlbumType, BandId, BandStatus, ReleaseDate};
    use url::Url;

    const BAND_SEARCH: &str = include_str!("../../tests/fixtures/band_search.json");
    const ALBUM_SEARCH: &str = include_str!("../../tests/fixtures/album_search.json");
    const EMPTY_SEARCH: &str = include_str!("../../tests/fixtures/search_empty.json");

    fn query(url: &Url) -> Vec<(String, String)> {
        url.query_pairs()
            .map(|(key, value)| (key.into_owned(), value.into_owned()))
            .collect()
    }

    fn pairs(expected: &[(&str, &str)]) -> Vec<(String, String)> {
        expected
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect()
    }

    #[test]
    fn band_search_query() {
        let mut url = Url::parse("https://www.metal-archives.com/search/ajax-advanced/searching/bands/").unwrap();
        let search = BandSearch {
            countries: vec!["US".to_owned(), "CA".to_owned()],
            status: vec![BandStatus::Active, BandStatus::SplitUp],
            ..BandSearch::new("metallica").loose()
        };
        search.apply(&mut url);
        assert_eq!(
            query(&url),
            pairs(&[
                ("bandName", "metallica"),
                ("exactBandMatch", "0"),
                ("country[]", "US"),
                ("country[]", "CA"),
                ("status[]", "1"),
                ("status[]", "3"),
                ("iDisplayStart", "0"),
            ])
        );
    }

    #[test]
    fn album_search_query_fills_months() {
        let mut url = Url::parse("https://www.metal-archives.com/search/ajax-advanced/searching/albums/").unwrap();
        let search = AlbumSearch {
            year_from: Some(1983),
            year_to: Some(1986),
            types: vec![AlbumType::FullLength],
            ..AlbumSearch::new("master of puppets").by_band("metallica")
        };
        search.apply(&mut url);
        assert_eq!(
            query(&url),
            pairs(&[
                ("releaseTitle", "master of puppets"),
                ("exactReleaseMatch", "1"),
                ("bandName", "metallica"),
                ("exactBandMatch", "1"),
                ("releaseYearFrom", "1983"),
                ("releaseYearTo", "1986"),
                ("releaseMonthFrom", "1"),
                ("releaseMonthTo", "12"),
                ("indieLabel", "0"),
                ("releaseType[]", "1"),
                ("iDisplayStart", "0"),
            ])
        );
    }

    #[test]
    fn band_results() {
        let search = parse_band_search(BAND_SEARCH).unwrap();
        assert_eq!(search.total, 2);
        assert_eq!(search.results.len(), 2);

        let first = &search.results[0];
        assert_eq!(first.band.id, BandId(125));
        assert_eq!(first.band.name, "Metallica");
        assert_eq!(
            first.genres,
            ["Thrash Metal (early)", "Hard Rock (mid)", "Heavy/Thrash Metal (later)"]
        );
        assert_eq!(first.country, "United States");
        assert!(first.extra.is_empty());

        assert_eq!(search.results[1].band.name, "Metallica");
        assert_eq!(search.results[1].country, "Sweden");
    }

    #[test]
    fn album_results() {
        let search = parse_album_search(ALBUM_SEARCH).unwrap();
        assert_eq!(search.total, 2);

        let puppets = &search.results[0];
        assert_eq!(puppets.album.id, AlbumId(547));
        assert_eq!(puppets.album.title, "Master of Puppets");
        assert_eq!(puppets.band_name, "Metallica");
        assert_eq!(puppets.bands[0].id, BandId(125));
        assert_eq!(puppets.ty, AlbumType::FullLength);
        assert_eq!(
            puppets.date,
            Some(ReleaseDate { year: 1986, month: Some(3), day: Some(3) })
        );

        let split = &search.results[1];
        assert_eq!(split.band_name, "Lunar Aurora / Paysage d'Hiver");
        assert_eq!(
            split.bands.iter().map(|band| band.id).collect::<Vec<_>>(),
            [BandId(3540), BandId(15924)]
        );
        assert_eq!(split.ty, AlbumType::Split);
    }

    #[test]
    fn no_matches_is_empty() {
        let bands = parse_band_search(EMPTY_SEARCH).unwrap();
        assert!(bands.is_empty());
        assert_eq!(bands.total, 0);
        assert!(parse_album_search(EMPTY_SEARCH).unwrap().is_empty());
    }

    #[test]
    fn malformed_json_fails() {
        assert!(parse_band_search("<html>Too many requests</html>").is_err());
        assert!(parse_band_search(r#"{"error": "Invalid query", "iTotalRecords": 0, "aaData": []}"#).is_err());
    }
}
