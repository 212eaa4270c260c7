use super::{
    audit_trail,
    ext::{Definitions, ScraperExt, TextExt},
    text,
};
use crate::data::{
    Album, AlbumId, AlbumType, BandId, BandRef, Collection, Lyrics, LyricsState, Track, TrackId,
};
use eyre::OptionExt;
use scraper::ElementRef;
use url::Url;

#[culpa::try_fn]
#[tracing::instrument(skip_all)]
pub(crate) fn parse_album(html: &str, base: &Url) -> eyre::Result<Album> {
    let document = scraper::Html::parse_document(html);

    let heading = document.try_select_one("h1.album_name a")?;
    let href = heading.value().attr("href").ok_or_eyre("album name without link")?;
    let id = AlbumId(text::trailing_id(href)?);
    let title = heading.clean_text();

    let mut bands = Vec::new();
    for link in document.try_select(".band_name a")? {
        let href = link.value().attr("href").ok_or_eyre("band name without link")?;
        bands.push(BandRef {
            id: BandId(text::trailing_id(href)?),
            name: link.clean_text(),
        });
    }

    let definitions = Definitions::new(&document)?;
    let ty: AlbumType = definitions.text(&["Type:"]).parse()?;

    let date = definitions.text(&["Release date:"]);
    let date = match text::parse_release_date(&date) {
        Ok(date) => Some(date),
        Err(error) => {
            if !date.is_empty() {
                tracing::warn!(?error, %date, "unparseable release date");
            }
            None
        }
    };

    let duration = match document.try_select_opt("table.table_lyrics td strong")? {
        Some(total) => text::parse_duration(&total.clean_text())?,
        None => jiff::SignedDuration::ZERO,
    };

    let tracks = parse_tracks(&document, &ty, &bands)?;
    let (added, modified) = audit_trail(&document)?;

    let album = Album {
        id,
        title,
        ty,
        date,
        catalog_id: definitions.text(&["Catalog ID:"]),
        label: definitions.text(&["Label:"]),
        format: definitions.text(&["Format:"]),
        version: definitions.text(&["Version desc.:"]),
        reviews: text::parse_reviews(&definitions.text(&["Reviews:"])),
        duration,
        cover: text::image_url(base, document.try_select_opt("#cover")?.and_then(|a| a.value().attr("href"))),
        added,
        modified,
        bands,
        tracks,
    };
    tracing::debug!(id = %album.id, title = %album.title, tracks = album.tracks.len(), "parsed album");
    album
}

#[culpa::try_fn]
fn parse_tracks(
    document: &scraper::Html,
    ty: &AlbumType,
    bands: &[BandRef],
) -> eyre::Result<Collection<Track>> {
    let table = document.try_select_one("table.table_lyrics")?;
    let rows = table.try_select("tr.odd:not(.displayNone), tr.even:not(.displayNone)")?;

    let mut tracks = Vec::with_capacity(rows.len());
    let mut disc_number = 1;
    for (overall_number, row) in (1..).zip(rows) {
        let cells = row.try_select("td")?;
        let (number, title, duration, lyrics) = match cells[..] {
            [number, title, duration, lyrics, ..] => (number, title, duration, lyrics),
            _ => Err(eyre::eyre!("track row {overall_number} has too few cells"))?,
        };

        let number = parse_track_number(number)?;
        // Each disc restarts its numbering.
        if overall_number != 1 && number == 1 {
            disc_number += 1;
        }

        let id = row
            .try_select_one("a[name]")?
            .value()
            .attr("name")
            .ok_or_eyre("track without anchor")?
            .to_owned();
        let full_title = title.clean_text();
        let (band, title) = attribute_track(&full_title, ty, bands);

        tracks.push(Track {
            id: TrackId(id),
            number,
            overall_number,
            disc_number,
            title,
            full_title,
            duration: text::parse_duration(&duration.clean_text())?,
            band,
            lyrics: lyrics_state(lyrics)?,
        });
    }
    Collection::new(tracks)
}

/// `"1."`
#[culpa::try_fn]
fn parse_track_number(cell: ElementRef<'_>) -> eyre::Result<u32> {
    cell.clean_text().trim_end_matches('.').parse()?
}

/// Split releases list each track as `"{band} - {title}"`.
fn attribute_track(full_title: &str, ty: &AlbumType, bands: &[BandRef]) -> (Option<BandRef>, String) {
    if *ty != AlbumType::Split {
        return (bands.first().cloned(), full_title.to_owned());
    }
    bands
        .iter()
        .find_map(|band| {
            let title = full_title.strip_prefix(band.name.as_str())?.strip_prefix(" - ")?;
            Some((Some(band.clone()), title.to_owned()))
        })
        .unwrap_or_else(|| (None, full_title.to_owned()))
}

#[culpa::try_fn]
fn lyrics_state(cell: ElementRef<'_>) -> eyre::Result<LyricsState> {
    if cell.try_select_opt("a[id^=lyricsButton]")?.is_some() {
        LyricsState::Available
    } else if cell.clean_text().to_lowercase().contains("instrumental") {
        LyricsState::Instrumental
    } else {
        LyricsState::Unavailable
    }
}

/// The lyrics endpoint returns a bare fragment with `<br />` line breaks,
/// usually each followed by a newline in the source.
#[culpa::try_fn]
#[tracing::instrument(skip_all)]
pub(crate) fn parse_lyrics(html: &str) -> eyre::Result<Option<Lyrics>> {
    let fragment = scraper::Html::parse_fragment(html);
    let mut text = String::new();
    let mut after_break = false;
    for node in fragment.root_element().descendants() {
        match node.value() {
            scraper::Node::Text(chunk) => {
                let chunk = chunk.replace('\r', "");
                if after_break {
                    text.push_str(chunk.strip_prefix('\n').unwrap_or(&chunk));
                } else {
                    text.push_str(&chunk);
                }
                after_break = false;
            }
            scraper::Node::Element(element) if element.name() == "br" => {
                text.push('\n');
                after_break = true;
            }
            _ => {}
        }
    }
    let text = text.lines().map(str::trim_end).collect::<Vec<_>>().join("\n");
    let text = text.trim();
    if text.is_empty() || text.eq_ignore_ascii_case("(lyrics not available)") {
        None
    } else {
        Some(Lyrics(text.to_owned()))
    }
}
