use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Place categories understood by the places provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlaceType {
    Museum,
    ArtGallery,
    Church,
    Restaurant,
    Cafe,
    Bakery,
    ShoppingMall,
    Store,
    Park,
    Zoo,
    AmusementPark,
    TouristAttraction,
    NightClub,
    Bar,
    Stadium,
    Gym,
    Spa,
}

impl PlaceType {
    /// Provider-side type identifier
    pub fn as_str(&self) -> &'static str {
        match self {
            PlaceType::Museum => "museum",
            PlaceType::ArtGallery => "art_gallery",
            PlaceType::Church => "church",
            PlaceType::Restaurant => "restaurant",
            PlaceType::Cafe => "cafe",
            PlaceType::Bakery => "bakery",
            PlaceType::ShoppingMall => "shopping_mall",
            PlaceType::Store => "store",
            PlaceType::Park => "park",
            PlaceType::Zoo => "zoo",
            PlaceType::AmusementPark => "amusement_park",
            PlaceType::TouristAttraction => "tourist_attraction",
            PlaceType::NightClub => "night_club",
            PlaceType::Bar => "bar",
            PlaceType::Stadium => "stadium",
            PlaceType::Gym => "gym",
            PlaceType::Spa => "spa",
        }
    }

    /// Resolves an activity alias such as "museums" or "parks"
    pub fn from_activity(activity: &str) -> Option<PlaceType> {
        match activity.trim().to_lowercase().as_str() {
            "attractions" => Some(PlaceType::TouristAttraction),
            "museums" => Some(PlaceType::Museum),
            "parks" => Some(PlaceType::Park),
            "shopping" => Some(PlaceType::ShoppingMall),
            "entertainment" => Some(PlaceType::AmusementPark),
            "nightlife" => Some(PlaceType::NightClub),
            "spa" => Some(PlaceType::Spa),
            _ => None,
        }
    }
}

impl Display for PlaceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Travel interest supplied by the caller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Interest {
    Culture,
    Food,
    Shopping,
    Nature,
    Adventure,
    Nightlife,
    History,
    Art,
    Sports,
    /// Anything outside the recognized vocabulary
    Unrecognized,
}

impl Interest {
    /// Case-insensitive parse; never fails
    pub fn parse(tag: &str) -> Self {
        match tag.trim().to_lowercase().as_str() {
            "culture" => Interest::Culture,
            "food" => Interest::Food,
            "shopping" => Interest::Shopping,
            "nature" => Interest::Nature,
            "adventure" => Interest::Adventure,
            "nightlife" => Interest::Nightlife,
            "history" => Interest::History,
            "art" => Interest::Art,
            "sports" => Interest::Sports,
            _ => Interest::Unrecognized,
        }
    }

    /// Place types searched for this interest, most relevant first
    pub fn place_types(&self) -> &'static [PlaceType] {
        use PlaceType::*;
        match self {
            Interest::Culture => &[Museum, ArtGallery, Church],
            Interest::Food => &[Restaurant, Cafe, Bakery],
            Interest::Shopping => &[ShoppingMall, Store],
            Interest::Nature => &[Park, Zoo],
            Interest::Adventure => &[AmusementPark, TouristAttraction],
            Interest::Nightlife => &[NightClub, Bar],
            Interest::History => &[Museum, Church, TouristAttraction],
            Interest::Art => &[ArtGallery, Museum],
            Interest::Sports => &[Stadium, Gym],
            Interest::Unrecognized => &[TouristAttraction],
        }
    }

    /// The single place type searched per interest
    pub fn primary_place_type(&self) -> PlaceType {
        // Every arm of `place_types` is non-empty
        self.place_types()[0]
    }
}
