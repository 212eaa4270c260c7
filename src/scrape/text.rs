//! Parsers for the free-form strings the site embeds in its pages.

use crate::data::{ReleaseDate, Reviews};
use eyre::WrapErr;
use jiff::{civil, tz, SignedDuration, Timestamp};
use url::Url;

/// Splits on `,` or `;` except inside parentheses.
///
/// `"Heavy Metal/Hard Rock (early, later), Thrash Metal (mid)"` gives
/// `["Heavy Metal/Hard Rock (early, later)", "Thrash Metal (mid)"]`.
pub(crate) fn split_genres(s: &str) -> Vec<String> {
    let mut genres = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    for (i, c) in s.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            ',' | ';' if depth == 0 => {
                genres.push(&s[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    genres.push(&s[start..]);
    genres
        .into_iter()
        .map(str::trim)
        .filter(|genre| !genre.is_empty())
        .map(String::from)
        .collect()
}

pub(crate) fn split_themes(s: &str) -> Vec<String> {
    s.split(',')
        .map(str::trim)
        .filter(|theme| !theme.is_empty())
        .map(String::from)
        .collect()
}

/// `SS`, `MM:SS` or `HH:MM:SS`, empty is zero.
#[culpa::try_fn]
pub(crate) fn parse_duration(s: &str) -> eyre::Result<SignedDuration> {
    let parts: Vec<&str> = match s.trim() {
        "" => Vec::new(),
        s => s.split(':').collect(),
    };
    let parts = match parts.len() {
        0..=3 => parts,
        _ => Err(eyre::eyre!("too many components in duration {s:?}"))?,
    };
    let mut seconds = 0i64;
    for part in parts {
        let part: i64 = part.trim().parse()?;
        seconds = seconds
            .checked_mul(60)
            .and_then(|seconds| seconds.checked_add(part))
            .ok_or_else(|| eyre::eyre!("duration {s:?} out of range"))?;
    }
    SignedDuration::from_secs(seconds)
}

const MONTHS: [&str; 12] = [
    "january",
    "february",
    "march",
    "april",
    "may",
    "june",
    "july",
    "august",
    "september",
    "october",
    "november",
    "december",
];

#[culpa::try_fn]
fn parse_month(s: &str) -> eyre::Result<i8> {
    let s = s.to_lowercase();
    let index = MONTHS
        .iter()
        .position(|month| *month == s)
        .ok_or_else(|| eyre::eyre!("unknown month {s:?}"))?;
    i8::try_from(index + 1)?
}

/// `"March 3rd, 1986"`, `"March 1986"` or `"1986"`.
#[culpa::try_fn]
pub(crate) fn parse_release_date(s: &str) -> eyre::Result<ReleaseDate> {
    let parts: Vec<&str> = s
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|part| !part.is_empty())
        .collect();
    let date = match parts[..] {
        [year] => ReleaseDate {
            year: year.parse()?,
            month: None,
            day: None,
        },
        [month, year] => ReleaseDate {
            year: year.parse()?,
            month: Some(parse_month(month)?),
            day: None,
        },
        [month, day, year] => ReleaseDate {
            year: year.parse()?,
            month: Some(parse_month(month)?),
            day: Some(
                day.trim_end_matches(|c: char| c.is_ascii_alphabetic())
                    .parse()?,
            ),
        },
        _ => Err(eyre::eyre!("unrecognised release date {s:?}"))?,
    };
    // Rejects impossible days such as February 30th.
    date.date()?;
    date
}

/// The last run of digits in an entity link, e.g. `.../bands/Metallica/125`.
#[culpa::try_fn]
pub(crate) fn trailing_id(href: &str) -> eyre::Result<u64> {
    let path = href.split(['?', '#']).next().unwrap_or(href);
    let digits = path.len() - path.trim_end_matches(|c: char| c.is_ascii_digit()).len();
    path[path.len() - digits..]
        .parse()
        .wrap_err_with(|| format!("no id at end of {href:?}"))?
}

/// Timestamps on the site are in its local time, four hours behind UTC.
const SERVER_OFFSET_HOURS: i8 = -4;

/// `"Added on: 2002-07-23 15:39:08"` with its label prefix already removed.
#[culpa::try_fn]
pub(crate) fn parse_server_time(s: &str) -> eyre::Result<Timestamp> {
    let datetime = civil::DateTime::strptime("%Y-%m-%d %H:%M:%S", s.trim())?;
    datetime
        .to_zoned(tz::TimeZone::fixed(tz::offset(SERVER_OFFSET_HOURS)))?
        .timestamp()
}

/// `"39 reviews (avg. 79%)"` on album pages, `"39 (79%)"` in discographies,
/// `None` for `"None yet"` or an empty cell.
pub(crate) fn parse_reviews(s: &str) -> Option<Reviews> {
    let count_start = s.find(|c: char| c.is_ascii_digit())?;
    let count_len = s[count_start..]
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(s.len() - count_start);
    let count = s[count_start..count_start + count_len].parse().ok()?;

    let average = s.find('%').and_then(|percent| {
        let before = &s[..percent];
        let digits = before.len() - before.trim_end_matches(|c: char| c.is_ascii_digit()).len();
        before[before.len() - digits..].parse().ok()
    });

    Some(Reviews { count, average })
}

/// Image links carry a cache-busting query string.
pub(crate) fn image_url(base: &Url, href: Option<&str>) -> Option<Url> {
    let href = href?.trim();
    if href.is_empty() {
        return None;
    }
    let mut url = base.join(href).ok()?;
    url.set_query(None);
    Some(url)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn genres_split_by_comma() {
        assert_eq!(
            split_genres("Thrash Metal (early), Hard Rock/Heavy/Thrash Metal (later)"),
            ["Thrash Metal (early)", "Hard Rock/Heavy/Thrash Metal (later)"]
        );
    }

    #[test]
    fn genres_split_by_semicolon() {
        assert_eq!(
            split_genres("Deathcore (early); Melodic Death/Groove Metal"),
            ["Deathcore (early)", "Melodic Death/Groove Metal"]
        );
    }

    #[test]
    fn genres_keep_parenthesised_commas() {
        assert_eq!(split_genres("Heavy Metal"), ["Heavy Metal"]);
        assert_eq!(
            split_genres("Heavy Metal/Hard Rock (early, later), Thrash Metal (mid)"),
            ["Heavy Metal/Hard Rock (early, later)", "Thrash Metal (mid)"]
        );
        assert!(split_genres("").is_empty());
    }

    #[test]
    fn durations() {
        assert_eq!(parse_duration("00:01").unwrap(), SignedDuration::from_secs(1));
        assert_eq!(parse_duration("03:33").unwrap(), SignedDuration::from_secs(213));
        assert_eq!(parse_duration("01:14:00").unwrap(), SignedDuration::from_secs(4440));
        assert_eq!(parse_duration("").unwrap(), SignedDuration::ZERO);
        assert!(parse_duration("1:2:3:4").is_err());
        assert!(parse_duration("soon").is_err());
        assert!(parse_duration("99999999999999999:0:0").is_err());
    }

    #[test]
    fn release_dates() {
        assert_eq!(
            parse_release_date("March 3rd, 1986").unwrap(),
            ReleaseDate { year: 1986, month: Some(3), day: Some(3) }
        );
        assert_eq!(
            parse_release_date("August 21st, 2001").unwrap(),
            ReleaseDate { year: 2001, month: Some(8), day: Some(21) }
        );
        assert_eq!(
            parse_release_date("March 1986").unwrap(),
            ReleaseDate { year: 1986, month: Some(3), day: None }
        );
        assert_eq!(
            parse_release_date("1986").unwrap(),
            ReleaseDate { year: 1986, month: None, day: None }
        );
        assert!(parse_release_date("February 30th, 1986").is_err());
        assert!(parse_release_date("").is_err());
    }

    #[test]
    fn ids_from_links() {
        assert_eq!(
            trailing_id("https://www.metal-archives.com/bands/Metallica/125").unwrap(),
            125
        );
        assert_eq!(
            trailing_id("https://www.metal-archives.com/albums/Metallica/Master_of_Puppets/547#reviews")
                .unwrap(),
            547
        );
        assert!(trailing_id("https://www.metal-archives.com/bands/Metallica/").is_err());
    }

    #[test]
    fn server_time_is_shifted_to_utc() {
        assert_eq!(
            parse_server_time("2002-07-23 15:39:08").unwrap(),
            "2002-07-23T19:39:08Z".parse::<Timestamp>().unwrap()
        );
        assert!(parse_server_time("N/A").is_err());
    }

    #[test]
    fn reviews() {
        assert_eq!(
            parse_reviews("39 reviews (avg. 79%)"),
            Some(Reviews { count: 39, average: Some(79) })
        );
        assert_eq!(
            parse_reviews("1 review (avg. 94%)"),
            Some(Reviews { count: 1, average: Some(94) })
        );
        assert_eq!(
            parse_reviews("4 (97%)"),
            Some(Reviews { count: 4, average: Some(97) })
        );
        assert_eq!(parse_reviews("None yet"), None);
        assert_eq!(parse_reviews(""), None);
    }

    #[test]
    fn image_urls_drop_query() {
        let base = Url::parse("https://www.metal-archives.com/").unwrap();
        assert_eq!(
            image_url(&base, Some("https://www.metal-archives.com/images/1/2/5/125_logo.png?5906")),
            Some(Url::parse("https://www.metal-archives.com/images/1/2/5/125_logo.png").unwrap())
        );
        assert_eq!(image_url(&base, Some("")), None);
        assert_eq!(image_url(&base, None), None);
    }

    proptest! {
        #[test]
        fn formatted_durations_parse_back(seconds in 0i64..360_000) {
            let formatted = if seconds >= 3600 {
                format!("{:02}:{:02}:{:02}", seconds / 3600, seconds / 60 % 60, seconds % 60)
            } else {
                format!("{:02}:{:02}", seconds / 60, seconds % 60)
            };
            prop_assert_eq!(parse_duration(&formatted).unwrap(), SignedDuration::from_secs(seconds));
        }

        #[test]
        fn genres_never_contain_top_level_separators(
            parts in prop::collection::vec("[A-Za-z/ ]{1,12}( \\([a-z]{1,6}(, [a-z]{1,6})?\\))?", 1..5)
        ) {
            let joined = parts.join(", ");
            let genres = split_genres(&joined);
            let expected: Vec<&str> = parts.iter().map(|part| part.trim()).filter(|part| !part.is_empty()).collect();
            prop_assert_eq!(genres, expected);
        }
    }
}
