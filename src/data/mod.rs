use crate::{web::Fetch, Metallum};
use std::fmt;

mod album;
mod band;
pub mod collection;

pub use self::{
    album::{Album, AlbumCriteria, AlbumResult, AlbumSummary, Lyrics, LyricsState, Track, TrackCriteria},
    band::{Band, BandResult, SimilarArtist},
    collection::{Collection, Searchable},
};

#[derive(Copy, Clone, Debug, PartialOrd, Ord, PartialEq, Eq, Hash)]
pub struct BandId(pub u64);

impl BandId {
    pub fn path(self) -> String {
        format!("bands/_/{}", self.0)
    }
}

impl fmt::Display for BandId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[derive(Copy, Clone, Debug, PartialOrd, Ord, PartialEq, Eq, Hash)]
pub struct AlbumId(pub u64);

impl AlbumId {
    pub fn path(self) -> String {
        format!("albums/_/_/{}", self.0)
    }
}

impl fmt::Display for AlbumId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Anchor name of a track row, not always numeric (e.g. `5018A`).
#[derive(Clone, Debug, PartialOrd, Ord, PartialEq, Eq, Hash)]
pub struct TrackId(pub String);

impl fmt::Display for TrackId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct BandRef {
    pub id: BandId,
    pub name: String,
}

impl BandRef {
    pub fn get<F: Fetch>(&self, metallum: &Metallum<F>) -> eyre::Result<Band> {
        metallum.band(self.id)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct AlbumRef {
    pub id: AlbumId,
    pub title: String,
}

impl AlbumRef {
    pub fn get<F: Fetch>(&self, metallum: &Metallum<F>) -> eyre::Result<Album> {
        metallum.album(self.id)
    }
}

/// Parsing is case-insensitive and never fails, unrecognised names land in
/// `Other`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, strum::EnumString, strum::Display)]
#[strum(ascii_case_insensitive)]
pub enum AlbumType {
    #[strum(serialize = "Full-length")]
    FullLength,
    #[strum(serialize = "Live album")]
    LiveAlbum,
    Demo,
    Single,
    #[strum(serialize = "EP")]
    Ep,
    #[strum(to_string = "Video", serialize = "Video/VHS")]
    Video,
    #[strum(serialize = "Boxed set")]
    BoxedSet,
    Split,
    Compilation,
    #[strum(serialize = "Split video")]
    SplitVideo,
    Collaboration,
    #[strum(default)]
    Other(String),
}

impl AlbumType {
    /// Value of the `releaseType[]` option on the advanced search form.
    pub fn search_id(&self) -> Option<u8> {
        match self {
            Self::FullLength => Some(1),
            Self::LiveAlbum => Some(2),
            Self::Demo => Some(3),
            Self::Single => Some(4),
            Self::Ep => Some(5),
            Self::Video => Some(6),
            Self::BoxedSet => Some(7),
            Self::Split => Some(8),
            Self::Compilation => Some(10),
            Self::SplitVideo => Some(12),
            Self::Collaboration => Some(13),
            Self::Other(_) => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, strum::EnumString, strum::Display)]
#[strum(ascii_case_insensitive)]
pub enum BandStatus {
    Active,
    #[strum(serialize = "On hold")]
    OnHold,
    #[strum(serialize = "Split-up")]
    SplitUp,
    Unknown,
    #[strum(serialize = "Changed name")]
    ChangedName,
    Disputed,
    #[strum(default)]
    Other(String),
}

impl BandStatus {
    /// Value of the `status[]` option on the advanced search form.
    pub fn search_id(&self) -> Option<u8> {
        match self {
            Self::Active => Some(1),
            Self::OnHold => Some(2),
            Self::SplitUp => Some(3),
            Self::Unknown => Some(4),
            Self::ChangedName => Some(5),
            Self::Disputed => Some(6),
            Self::Other(_) => None,
        }
    }
}

/// A release date with whatever precision the site knows it to.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ReleaseDate {
    pub year: i16,
    pub month: Option<i8>,
    pub day: Option<i8>,
}

impl ReleaseDate {
    /// First day of the known period, so `"March 1986"` gives 1986-03-01.
    #[culpa::try_fn]
    pub fn date(&self) -> eyre::Result<jiff::civil::Date> {
        jiff::civil::Date::new(self.year, self.month.unwrap_or(1), self.day.unwrap_or(1))?
    }
}

impl fmt::Display for ReleaseDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.month, self.day) {
            (Some(month), Some(day)) => write!(f, "{:04}-{month:02}-{day:02}", self.year),
            (Some(month), None) => write!(f, "{:04}-{month:02}", self.year),
            _ => write!(f, "{:04}", self.year),
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Reviews {
    pub count: u32,
    /// Average rating in percent.
    pub average: Option<u8>,
}

#[cfg(test)]
mod tests {
    use super::{AlbumType, BandStatus, ReleaseDate};

    #[test]
    fn album_type_names() {
        assert_eq!("Full-length".parse::<AlbumType>().unwrap(), AlbumType::FullLength);
        assert_eq!("full-length".parse::<AlbumType>().unwrap(), AlbumType::FullLength);
        assert_eq!("EP".parse::<AlbumType>().unwrap(), AlbumType::Ep);
        assert_eq!("Video/VHS".parse::<AlbumType>().unwrap(), AlbumType::Video);
        assert_eq!(
            "Bootleg".parse::<AlbumType>().unwrap(),
            AlbumType::Other("Bootleg".to_owned())
        );
        assert_eq!(AlbumType::Other("Bootleg".to_owned()).search_id(), None);
        assert_eq!(AlbumType::LiveAlbum.to_string(), "Live album");
    }

    #[test]
    fn band_status_names() {
        assert_eq!("Split-up".parse::<BandStatus>().unwrap(), BandStatus::SplitUp);
        assert_eq!("on hold".parse::<BandStatus>().unwrap(), BandStatus::OnHold);
        assert_eq!(BandStatus::OnHold.search_id(), Some(2));
        assert_eq!("".parse::<BandStatus>().unwrap().search_id(), None);
    }

    #[test]
    fn release_date_precision() {
        let date = ReleaseDate {
            year: 1986,
            month: Some(3),
            day: None,
        };
        assert_eq!(date.to_string(), "1986-03");
        assert_eq!(date.date().unwrap(), jiff::civil::date(1986, 3, 1));
    }
}
