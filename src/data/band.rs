use super::{AlbumSummary, BandId, BandRef, BandStatus, Collection};
use crate::{web::Fetch, Metallum};
use url::Url;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Band {
    pub id: BandId,
    pub name: String,
    pub country: String,
    pub location: String,
    pub status: BandStatus,
    pub formed_in: String,
    pub years_active: String,
    pub genres: Vec<String>,
    pub themes: Vec<String>,
    /// Current label, or the last one for bands that are no longer active.
    pub label: String,
    pub logo: Option<Url>,
    pub photo: Option<Url>,
    pub added: Option<jiff::Timestamp>,
    pub modified: Option<jiff::Timestamp>,
}

impl Band {
    pub fn to_ref(&self) -> BandRef {
        BandRef {
            id: self.id,
            name: self.name.clone(),
        }
    }

    /// Fetches the full discography, every release type included.
    pub fn albums<F: Fetch>(&self, metallum: &Metallum<F>) -> eyre::Result<Collection<AlbumSummary>> {
        metallum.discography(self.id)
    }

    pub fn similar_artists<F: Fetch>(&self, metallum: &Metallum<F>) -> eyre::Result<Vec<SimilarArtist>> {
        metallum.similar_artists(self.id)
    }
}

/// One row of a band search.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BandResult {
    pub band: BandRef,
    pub genres: Vec<String>,
    pub country: String,
    /// Columns added by some search filters (location, formation year, ...).
    pub extra: Vec<String>,
}

impl BandResult {
    pub fn get<F: Fetch>(&self, metallum: &Metallum<F>) -> eyre::Result<Band> {
        self.band.get(metallum)
    }
}

/// An entry of a band's "Similar artists" tab.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SimilarArtist {
    pub band: BandRef,
    pub country: String,
    pub genres: Vec<String>,
    /// User votes for the similarity.
    pub score: u32,
}

impl SimilarArtist {
    pub fn get<F: Fetch>(&self, metallum: &Metallum<F>) -> eyre::Result<Band> {
        self.band.get(metallum)
    }
}
