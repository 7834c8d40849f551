use crate::result::{BirdError, BirdResult};
use lazy_static::lazy_static;
use regex::Regex;
use std::{collections::BTreeMap, fmt::Display};

/// Bird species of the dataset. Image filenames start with the abbreviation, e.g.,
/// `AMAV123_foo.jpg` shows an American Avocet.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum Species {
    AmericanAvocet,
    BrownHeadedNuthatch,
    Bufflehead,
    ProthonotaryWarbler,
    Sanderling,
    WesternGrebe,
    Whimbrel,
    WhiteIbis,
}
impl Species {
    pub const ALL: [Species; 8] = [
        Species::AmericanAvocet,
        Species::BrownHeadedNuthatch,
        Species::Bufflehead,
        Species::ProthonotaryWarbler,
        Species::Sanderling,
        Species::WesternGrebe,
        Species::Whimbrel,
        Species::WhiteIbis,
    ];
    pub fn abbreviation(self) -> &'static str {
        match self {
            Species::AmericanAvocet => "AMAV",
            Species::BrownHeadedNuthatch => "BHN",
            Species::Bufflehead => "BF",
            Species::ProthonotaryWarbler => "PW",
            Species::Sanderling => "SDL",
            Species::WesternGrebe => "WGR",
            Species::Whimbrel => "WHMB",
            Species::WhiteIbis => "WIB",
        }
    }
    /// Class name as it appears in the dataset, typo in `Whte_Ibis` included.
    pub fn class_name(self) -> &'static str {
        match self {
            Species::AmericanAvocet => "American_Avocet",
            Species::BrownHeadedNuthatch => "Brown-headed_Nuthatch",
            Species::Bufflehead => "Bufflehead",
            Species::ProthonotaryWarbler => "Prothonotary_Warbler",
            Species::Sanderling => "Sanderling",
            Species::WesternGrebe => "Western_Grebe",
            Species::Whimbrel => "Whimbrel",
            Species::WhiteIbis => "Whte_Ibis",
        }
    }
}
impl Display for Species {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.class_name())
    }
}

/// Maps filename prefixes to class names
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AbbrvTable {
    abbrv_to_class: BTreeMap<String, String>,
}
impl AbbrvTable {
    pub fn from_map(abbrv_to_class: BTreeMap<String, String>) -> Self {
        Self { abbrv_to_class }
    }
    pub fn lookup(&self, abbreviation: &str) -> Option<&str> {
        self.abbrv_to_class.get(abbreviation).map(String::as_str)
    }
    pub fn len(&self) -> usize {
        self.abbrv_to_class.len()
    }
    pub fn is_empty(&self) -> bool {
        self.abbrv_to_class.is_empty()
    }

    /// Derives the class of an image from its filename.
    ///
    /// The abbreviation is the run of uppercase letters in front of the first 3-digit sequence
    /// of the filename. Fails if there is no such run or if the table does not know the
    /// abbreviation.
    pub fn class_name(&self, image_id: &str) -> BirdResult<String> {
        let abbreviation = extract_abbreviation(image_id).ok_or_else(|| {
            BirdError::MalformedFilename {
                image_id: image_id.to_string(),
            }
        })?;
        self.lookup(abbreviation)
            .map(str::to_string)
            .ok_or_else(|| BirdError::UnknownAbbreviation {
                image_id: image_id.to_string(),
                abbreviation: abbreviation.to_string(),
            })
    }
}
impl Default for AbbrvTable {
    fn default() -> Self {
        Self::from_map(
            Species::ALL
                .into_iter()
                .map(|s| (s.abbreviation().to_string(), s.class_name().to_string()))
                .collect(),
        )
    }
}

fn extract_abbreviation(image_id: &str) -> Option<&str> {
    lazy_static! {
        static ref RE: Regex = Regex::new(r"([A-Z]*)\d\d\d").unwrap();
    }
    RE.captures(image_id)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
        .filter(|abbrv| !abbrv.is_empty())
}
