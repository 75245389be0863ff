use crate::error::{MovieError, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// OMDb's marker for a missing value, including posters without an image.
pub const NOT_AVAILABLE: &str = "N/A";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    Movie,
    Series,
    Episode,
    Game,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieSummary {
    #[serde(rename = "imdbID")]
    pub imdb_id: String,
    #[serde(rename = "Title")]
    pub title: String,
    #[serde(rename = "Year", default)]
    pub year: String,
    #[serde(rename = "Type")]
    pub media_type: MediaType,
    #[serde(rename = "Poster", default)]
    pub poster: String,
}

impl MovieSummary {
    pub fn has_poster(&self) -> bool {
        let p = self.poster.trim();
        !p.is_empty() && p != NOT_AVAILABLE
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieDetail {
    #[serde(flatten)]
    pub summary: MovieSummary,
    #[serde(rename = "Plot")]
    pub plot: Option<String>,
    #[serde(rename = "Director")]
    pub director: Option<String>,
    #[serde(rename = "Writer")]
    pub writer: Option<String>,
    #[serde(rename = "Actors")]
    pub actors: Option<String>,
    #[serde(rename = "Genre")]
    pub genre: Option<String>,
    #[serde(rename = "Runtime")]
    pub runtime: Option<String>,
    #[serde(rename = "Released")]
    pub released: Option<String>,
    #[serde(rename = "imdbRating")]
    pub imdb_rating: Option<String>,
    #[serde(rename = "Country")]
    pub country: Option<String>,
    #[serde(rename = "Language")]
    pub language: Option<String>,
    #[serde(rename = "Awards")]
    pub awards: Option<String>,
    #[serde(rename = "Rated")]
    pub rated: Option<String>,
    #[serde(rename = "Metascore")]
    pub metascore: Option<String>,
    #[serde(rename = "BoxOffice")]
    pub box_office: Option<String>,
    #[serde(rename = "Production")]
    pub production: Option<String>,
    #[serde(rename = "Website")]
    pub website: Option<String>,
}

impl MovieDetail {
    pub fn plot(&self) -> Option<&str> {
        present(&self.plot)
    }

    pub fn director(&self) -> Option<&str> {
        present(&self.director)
    }

    pub fn writer(&self) -> Option<&str> {
        present(&self.writer)
    }

    pub fn awards(&self) -> Option<&str> {
        present(&self.awards)
    }

    pub fn country(&self) -> Option<&str> {
        present(&self.country)
    }

    pub fn language(&self) -> Option<&str> {
        present(&self.language)
    }

    pub fn genres(&self) -> Vec<&str> {
        split_list(present(&self.genre))
    }

    pub fn cast(&self) -> Vec<&str> {
        split_list(present(&self.actors))
    }

    pub fn rating(&self) -> Option<f32> {
        present(&self.imdb_rating).and_then(|r| r.parse().ok())
    }

    /// "136 min" -> 136
    pub fn runtime_minutes(&self) -> Option<u32> {
        present(&self.runtime)
            .and_then(|r| r.split_whitespace().next())
            .and_then(|n| n.parse().ok())
    }

    /// "04 May 2012" -> 2012-05-04
    pub fn released_on(&self) -> Option<NaiveDate> {
        present(&self.released).and_then(|d| NaiveDate::parse_from_str(d, "%d %b %Y").ok())
    }
}

fn present(value: &Option<String>) -> Option<&str> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty() && *v != NOT_AVAILABLE)
}

fn split_list(value: Option<&str>) -> Vec<&str> {
    value
        .map(|v| {
            v.split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .collect()
        })
        .unwrap_or_default()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    #[serde(rename = "Search", default)]
    pub movies: Vec<MovieSummary>,
    #[serde(
        rename = "totalResults",
        default,
        deserialize_with = "de_total_results",
        serialize_with = "ser_total_results"
    )]
    pub total_results: u32,
    #[serde(
        rename = "Response",
        deserialize_with = "de_response_flag",
        serialize_with = "ser_response_flag"
    )]
    pub success: bool,
    #[serde(rename = "Error", default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SearchResult {
    /// The summaries, or nothing when the service flagged the response as failed.
    pub fn summaries(&self) -> &[MovieSummary] {
        if self.success {
            self.movies.as_slice()
        } else {
            &[]
        }
    }

    pub fn into_summaries(self) -> Vec<MovieSummary> {
        if self.success {
            self.movies
        } else {
            Vec::new()
        }
    }

    pub fn into_checked(self) -> Result<Self> {
        if self.success {
            Ok(self)
        } else {
            Err(MovieError::remote(self.error))
        }
    }
}

pub(crate) fn is_true_flag(raw: &str) -> bool {
    raw.trim().eq_ignore_ascii_case("true")
}

fn de_response_flag<'de, D: Deserializer<'de>>(de: D) -> std::result::Result<bool, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Flag {
        Bool(bool),
        Text(String),
    }
    Ok(match Flag::deserialize(de)? {
        Flag::Bool(b) => b,
        Flag::Text(s) => is_true_flag(&s),
    })
}

fn ser_response_flag<S: Serializer>(flag: &bool, ser: S) -> std::result::Result<S::Ok, S::Error> {
    ser.serialize_str(if *flag { "True" } else { "False" })
}

fn de_total_results<'de, D: Deserializer<'de>>(de: D) -> std::result::Result<u32, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Count {
        Number(u32),
        Text(String),
    }
    Ok(match Option::<Count>::deserialize(de)? {
        Some(Count::Number(n)) => n,
        Some(Count::Text(s)) => s.trim().parse().unwrap_or(0),
        None => 0,
    })
}

fn ser_total_results<S: Serializer>(total: &u32, ser: S) -> std::result::Result<S::Ok, S::Error> {
    ser.serialize_str(&total.to_string())
}

/// Genres offered by the browse filter. OMDb has no genre endpoint, so every
/// genre other than `All` is searched as a plain title term.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Genre {
    #[default]
    All,
    Action,
    Comedy,
    Drama,
    Horror,
    Romance,
    SciFi,
    Thriller,
    Animation,
}

impl Genre {
    pub const ALL: [Genre; 9] = [
        Genre::All,
        Genre::Action,
        Genre::Comedy,
        Genre::Drama,
        Genre::Horror,
        Genre::Romance,
        Genre::SciFi,
        Genre::Thriller,
        Genre::Animation,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Genre::All => "all",
            Genre::Action => "action",
            Genre::Comedy => "comedy",
            Genre::Drama => "drama",
            Genre::Horror => "horror",
            Genre::Romance => "romance",
            Genre::SciFi => "sci-fi",
            Genre::Thriller => "thriller",
            Genre::Animation => "animation",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Genre::All => "All Movies",
            Genre::Action => "Action",
            Genre::Comedy => "Comedy",
            Genre::Drama => "Drama",
            Genre::Horror => "Horror",
            Genre::Romance => "Romance",
            Genre::SciFi => "Sci-Fi",
            Genre::Thriller => "Thriller",
            Genre::Animation => "Animation",
        }
    }
}

impl fmt::Display for Genre {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownGenre(pub String);

impl fmt::Display for UnknownGenre {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown genre '{}'", self.0)
    }
}

impl std::error::Error for UnknownGenre {}

impl FromStr for Genre {
    type Err = UnknownGenre;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        if wanted.is_empty() {
            return Ok(Genre::All);
        }
        Genre::ALL
            .into_iter()
            .find(|g| g.label() == wanted)
            .ok_or_else(|| UnknownGenre(s.to_string()))
    }
}

impl Serialize for Genre {
    fn serialize<S: Serializer>(&self, ser: S) -> std::result::Result<S::Ok, S::Error> {
        ser.serialize_str(self.label())
    }
}

impl<'de> Deserialize<'de> for Genre {
    fn deserialize<D: Deserializer<'de>>(de: D) -> std::result::Result<Self, D::Error> {
        let raw = String::deserialize(de)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}
