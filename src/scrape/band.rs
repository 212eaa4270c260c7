use super::{
    audit_trail,
    ext::{Definitions, ScraperExt, TextExt},
    text,
};
use crate::data::{AlbumId, AlbumSummary, Band, BandId, BandRef, Collection, SimilarArtist};
use eyre::OptionExt;
use url::Url;

#[culpa::try_fn]
#[tracing::instrument(skip_all)]
pub(crate) fn parse_band(html: &str, base: &Url) -> eyre::Result<Band> {
    let document = scraper::Html::parse_document(html);

    let heading = document.try_select_one("h1.band_name")?;
    let name = heading.clean_text();
    let link = heading.try_select_one("a")?;
    let href = link.value().attr("href").ok_or_eyre("band name without link")?;
    let id = BandId(text::trailing_id(href)?);

    let definitions = Definitions::new(&document)?;
    let (added, modified) = audit_trail(&document)?;

    let band = Band {
        id,
        name,
        country: definitions.text(&["Country of origin:"]),
        location: definitions.text(&["Location:"]),
        status: definitions.text(&["Status:"]).parse()?,
        formed_in: definitions.text(&["Formed in:"]),
        years_active: definitions.text(&["Years active:"]),
        genres: text::split_genres(&definitions.text(&["Genre:"])),
        themes: text::split_themes(&definitions.text(&["Lyrical themes:", "Themes:"])),
        label: definitions.text(&["Current label:", "Last label:"]),
        logo: text::image_url(base, document.try_select_opt("#logo")?.and_then(|a| a.value().attr("href"))),
        photo: text::image_url(base, document.try_select_opt("#photo")?.and_then(|a| a.value().attr("href"))),
        added,
        modified,
    };
    tracing::debug!(id = %band.id, name = %band.name, "parsed band");
    band
}

#[culpa::try_fn]
#[tracing::instrument(skip_all)]
pub(crate) fn parse_discography(html: &str) -> eyre::Result<Collection<AlbumSummary>> {
    let document = scraper::Html::parse_document(html);
    let table = document.try_select_one("table")?;

    let mut albums = Vec::new();
    for row in table.try_select("tr")? {
        let cells = row.try_select("td")?;
        // Header rows have no cells, an empty discography has a single
        // unlinked "Nothing entered yet" cell.
        let [title, ty, year, reviews, ..] = cells[..] else {
            continue;
        };
        let Some(link) = title.try_select_opt("a")? else {
            continue;
        };
        let href = link.value().attr("href").ok_or_eyre("album without link")?;
        let year = year.clean_text();
        albums.push(AlbumSummary {
            id: AlbumId(text::trailing_id(href)?),
            title: link.clean_text(),
            ty: ty.clean_text().parse()?,
            year: year.parse().ok().or_else(|| {
                if !year.is_empty() {
                    tracing::warn!(%year, "unparseable discography year");
                }
                None
            }),
            reviews: text::parse_reviews(&reviews.clean_text()),
        });
    }
    tracing::debug!(count = albums.len(), "parsed discography");
    Collection::new(albums)
}

#[culpa::try_fn]
#[tracing::instrument(skip_all)]
pub(crate) fn parse_similar_artists(html: &str) -> eyre::Result<Vec<SimilarArtist>> {
    let document = scraper::Html::parse_document(html);

    let mut artists = Vec::new();
    for row in document.try_select("tr")? {
        let cells = row.try_select("td")?;
        // Skips the header and the trailing "show more" row.
        let [name, country, genre, score, ..] = cells[..] else {
            continue;
        };
        let Some(link) = name.try_select_opt("a")? else {
            continue;
        };
        let href = link.value().attr("href").ok_or_eyre("similar artist without link")?;
        artists.push(SimilarArtist {
            band: BandRef {
                id: BandId(text::trailing_id(href)?),
                name: link.clean_text(),
            },
            country: country.clean_text(),
            genres: text::split_genres(&genre.clean_text()),
            score: score.clean_text().parse()?,
        });
    }
    tracing::debug!(count = artists.len(), "parsed similar artists");
    artists
}

#[cfg(test)]
mod tests {
    use super::{parse_band, parse_discography, parse_similar_artists};
    use crate::data::{AlbumId, AlbumType, BandId, BandStatus, Reviews};
    use url::Url;

    const BAND: &str = include_str!("../../tests/fixtures/band.html");
    const DISCOGRAPHY: &str = include_str!("../../tests/fixtures/discography.html");
    const EMPTY_DISCOGRAPHY: &str = include_str!("../../tests/fixtures/discography_empty.html");
    const SIMILAR: &str = include_str!("../../tests/fixtures/similar_artists.html");

    fn base() -> Url {
        Url::parse("https://www.metal-archives.com/").unwrap()
    }

    #[test]
    fn band_fields() {
        let band = parse_band(BAND, &base()).unwrap();
        assert_eq!(band.id, BandId(125));
        assert_eq!(band.name, "Metallica");
        assert_eq!(band.country, "United States");
        assert_eq!(band.location, "Los Angeles/San Francisco, California");
        assert_eq!(band.status, BandStatus::Active);
        assert_eq!(band.formed_in, "1981");
        assert_eq!(band.years_active, "1981-present");
        assert_eq!(
            band.genres,
            ["Thrash Metal (early)", "Hard Rock (mid)", "Heavy/Thrash Metal (later)"]
        );
        assert_eq!(
            band.themes,
            ["Corruption", "Death", "Life", "Internal struggles", "Anger"]
        );
        assert_eq!(band.label, "Blackened Recordings");
        assert_eq!(
            band.logo.unwrap().as_str(),
            "https://www.metal-archives.com/images/1/2/5/125_logo.png"
        );
        assert_eq!(
            band.photo.unwrap().as_str(),
            "https://www.metal-archives.com/images/1/2/5/125_photo.jpg"
        );
        assert_eq!(
            band.added.unwrap(),
            "2002-07-23T19:39:08Z".parse::<jiff::Timestamp>().unwrap()
        );
        assert_eq!(
            band.modified.unwrap(),
            "2024-05-12T01:14:39Z".parse::<jiff::Timestamp>().unwrap()
        );
    }

    #[test]
    fn band_parse_is_deterministic() {
        assert_eq!(
            parse_band(BAND, &base()).unwrap(),
            parse_band(BAND, &base()).unwrap()
        );
    }

    #[test]
    fn band_without_heading_fails() {
        assert!(parse_band("<html><body><p>Maintenance</p></body></html>", &base()).is_err());
    }

    #[test]
    fn discography_rows() {
        let albums = parse_discography(DISCOGRAPHY).unwrap();
        assert_eq!(albums.len(), 5);

        let first = &albums[0];
        assert_eq!(first.id, AlbumId(4180));
        assert_eq!(first.title, "No Life 'til Leather");
        assert_eq!(first.ty, AlbumType::Demo);
        assert_eq!(first.year, Some(1982));
        assert_eq!(first.reviews, Some(Reviews { count: 1, average: Some(92) }));

        let puppets = &albums[3];
        assert_eq!(puppets.id, AlbumId(547));
        assert_eq!(puppets.ty, AlbumType::FullLength);
        assert_eq!(puppets.reviews, Some(Reviews { count: 39, average: Some(79) }));

        assert_eq!(albums[4].ty, AlbumType::Single);
        assert_eq!(albums[4].reviews, None);
    }

    #[test]
    fn empty_discography() {
        assert!(parse_discography(EMPTY_DISCOGRAPHY).unwrap().is_empty());
    }

    #[test]
    fn similar_artist_rows() {
        let artists = parse_similar_artists(SIMILAR).unwrap();
        assert_eq!(artists.len(), 3);
        assert_eq!(artists[0].band.id, BandId(138));
        assert_eq!(artists[0].band.name, "Megadeth");
        assert_eq!(artists[0].country, "United States");
        assert_eq!(
            artists[0].genres,
            ["Speed/Thrash Metal (early/later)", "Heavy Metal/Rock (mid)"]
        );
        assert_eq!(artists[0].score, 490);
        assert_eq!(artists[2].band.name, "Exodus");
        assert_eq!(artists[2].score, 212);
    }

    #[test]
    fn no_similar_artists() {
        let html = "<table id=\"artist_list\"><tr><td>No similar artist has been recommended yet.</td></tr></table>";
        assert!(parse_similar_artists(html).unwrap().is_empty());
    }
}
