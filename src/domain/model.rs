use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Placeholder some geolocation sources put in place of a city they could not resolve.
pub const UNKNOWN_PLACE: &str = "Unknown";

/// A point on the Earth's surface in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Builds a coordinate only when both parts are present and finite.
    pub fn from_parts(latitude: Option<f64>, longitude: Option<f64>) -> Option<Self> {
        match (latitude, longitude) {
            (Some(lat), Some(lng)) if lat.is_finite() && lng.is_finite() => {
                Some(Self::new(lat, lng))
            }
            _ => None,
        }
    }

    pub fn is_within_bounds(&self) -> bool {
        (-90.0..=90.0).contains(&self.latitude) && (-180.0..=180.0).contains(&self.longitude)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Office {
    pub id: String,
    pub city: String,
    pub state: String,
    pub phone: String,
    pub email: String,
    pub address: String,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default)]
    pub projects: Vec<String>,
}

impl Office {
    pub fn coordinate(&self) -> Coordinate {
        Coordinate::new(self.latitude, self.longitude)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LocationSource {
    IpLookup,
    Device,
    #[default]
    None,
}

/// What the geolocation layer learned about the visitor for one page view.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct UserLocation {
    pub city: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,
    pub country_code: Option<String>,
    pub postal: Option<String>,
    pub timezone: Option<String>,
    pub coordinate: Option<Coordinate>,
    pub source: LocationSource,
}

impl UserLocation {
    /// Nothing is known; resolves to the default office.
    pub fn unknown() -> Self {
        Self::default()
    }

    pub fn from_coordinate(coordinate: Coordinate, source: LocationSource) -> Self {
        Self {
            coordinate: Some(coordinate),
            source,
            ..Self::default()
        }
    }

    /// City name, unless absent or the "Unknown" placeholder.
    pub fn known_city(&self) -> Option<&str> {
        known(self.city.as_deref())
    }

    pub fn known_state(&self) -> Option<&str> {
        known(self.state.as_deref())
    }

    pub fn was_detected(&self) -> bool {
        self.source != LocationSource::None
    }
}

fn known(value: Option<&str>) -> Option<&str> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty() && !v.eq_ignore_ascii_case(UNKNOWN_PLACE))
}

/// The office closest to the visitor. The office is shared with the registry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NearestOffice {
    pub office: Arc<Office>,
    pub distance_km: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PhoneDirective {
    pub display: String,
    pub tel_href: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmailDirective {
    pub address: String,
    pub mailto_href: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OfficeBadge {
    pub city: String,
    pub phone: PhoneDirective,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LocalProjects {
    pub city: String,
    pub count: usize,
    pub title: String,
    pub subtitle: String,
    pub call_to_action: String,
    pub projects: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormLocation {
    pub value: String,
    pub placeholder: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnalyticsEvent {
    pub name: String,
    pub params: BTreeMap<String, Option<String>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrackingDirectives {
    pub event: AnalyticsEvent,
    pub user_properties: BTreeMap<String, Option<String>>,
    pub pixel_properties: BTreeMap<String, Option<String>>,
}

/// Content values the presentation layer writes into the page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContentDirectives {
    pub phone: PhoneDirective,
    pub email: EmailDirective,
    pub city: String,
    pub office_badge: OfficeBadge,
    pub hero_subtitle: Option<String>,
    pub local_projects: Option<LocalProjects>,
    pub form_location: Option<FormLocation>,
    pub meta_user_location: Option<String>,
    pub tracking: Option<TrackingDirectives>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PersonalizationResult {
    pub office: Arc<Office>,
    pub distance_km: Option<f64>,
    pub directives: ContentDirectives,
}
