use super::{
    collection::{field_eq, text_eq},
    AlbumId, AlbumRef, AlbumType, BandRef, Collection, ReleaseDate, Reviews, Searchable, TrackId,
};
use crate::{web::Fetch, Metallum};
use std::fmt;
use url::Url;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Album {
    pub id: AlbumId,
    pub title: String,
    /// More than one only for splits and collaborations.
    pub bands: Vec<BandRef>,
    pub ty: AlbumType,
    pub date: Option<ReleaseDate>,
    pub catalog_id: String,
    pub label: String,
    pub format: String,
    pub version: String,
    pub reviews: Option<Reviews>,
    /// Zero when the site lists no total.
    pub duration: jiff::SignedDuration,
    pub cover: Option<Url>,
    pub added: Option<jiff::Timestamp>,
    pub modified: Option<jiff::Timestamp>,
    pub tracks: Collection<Track>,
}

impl Album {
    pub fn to_ref(&self) -> AlbumRef {
        AlbumRef {
            id: self.id,
            title: self.title.clone(),
        }
    }

    pub fn year(&self) -> Option<i16> {
        self.date.map(|date| date.year)
    }

    pub fn disc_count(&self) -> u32 {
        self.tracks
            .iter()
            .map(|track| track.disc_number)
            .max()
            .unwrap_or(0)
    }
}

/// A row of a band's discography, enough to identify an album without
/// fetching its page.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AlbumSummary {
    pub id: AlbumId,
    pub title: String,
    pub ty: AlbumType,
    pub year: Option<i16>,
    pub reviews: Option<Reviews>,
}

impl AlbumSummary {
    pub fn get<F: Fetch>(&self, metallum: &Metallum<F>) -> eyre::Result<Album> {
        metallum.album(self.id)
    }

    /// Requires fetching the album page.
    pub fn tracks<F: Fetch>(&self, metallum: &Metallum<F>) -> eyre::Result<Collection<Track>> {
        Ok(self.get(metallum)?.tracks)
    }
}

#[derive(Clone, Debug, Default)]
pub struct AlbumCriteria {
    pub title: Option<String>,
    pub ty: Option<AlbumType>,
    pub year: Option<i16>,
}

impl Searchable for AlbumSummary {
    type Criteria = AlbumCriteria;

    fn matches(&self, criteria: &AlbumCriteria) -> bool {
        text_eq(&criteria.title, &self.title)
            && field_eq(&criteria.ty, &self.ty)
            && criteria.year.is_none_or(|year| self.year == Some(year))
    }
}

/// One row of an album search.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AlbumResult {
    pub album: AlbumRef,
    pub bands: Vec<BandRef>,
    /// The band column as displayed, e.g. `"Lunar Aurora / Paysage d'Hiver"`.
    pub band_name: String,
    pub ty: AlbumType,
    pub date: Option<ReleaseDate>,
    pub extra: Vec<String>,
}

impl AlbumResult {
    pub fn get<F: Fetch>(&self, metallum: &Metallum<F>) -> eyre::Result<Album> {
        self.album.get(metallum)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum LyricsState {
    Available,
    Instrumental,
    Unavailable,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Track {
    pub id: TrackId,
    /// Position on its disc.
    pub number: u32,
    /// Position across all discs.
    pub overall_number: u32,
    pub disc_number: u32,
    /// Title as listed, prefixed with the band name on split releases.
    pub full_title: String,
    pub title: String,
    pub duration: jiff::SignedDuration,
    pub band: Option<BandRef>,
    pub lyrics: LyricsState,
}

impl Track {
    pub fn lyrics<F: Fetch>(&self, metallum: &Metallum<F>) -> eyre::Result<Option<Lyrics>> {
        metallum.lyrics(&self.id)
    }
}

#[derive(Clone, Debug, Default)]
pub struct TrackCriteria {
    pub title: Option<String>,
    pub disc_number: Option<u32>,
    pub band: Option<String>,
}

impl Searchable for Track {
    type Criteria = TrackCriteria;

    fn matches(&self, criteria: &TrackCriteria) -> bool {
        text_eq(&criteria.title, &self.title)
            && field_eq(&criteria.disc_number, &self.disc_number)
            && (criteria.band.is_none()
                || self
                    .band
                    .as_ref()
                    .is_some_and(|band| text_eq(&criteria.band, &band.name)))
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Lyrics(pub String);

impl fmt::Display for Lyrics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
