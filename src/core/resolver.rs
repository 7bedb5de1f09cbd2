use crate::core::distance::haversine_km;
use crate::core::registry::OfficeRegistry;
use crate::domain::model::{
    AnalyticsEvent, ContentDirectives, Coordinate, EmailDirective, FormLocation, LocalProjects,
    NearestOffice, Office, OfficeBadge, PersonalizationResult, PhoneDirective, TrackingDirectives,
    UserLocation, UNKNOWN_PLACE,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;

pub const DEFAULT_TAGLINE: &str = "25 Years of Excellence | 500+ Projects Completed";
pub const DEFAULT_PROJECTS_SUBTITLE: &str = "Infrastructure excellence in your region";
pub const LOCATION_DETECTED_EVENT: &str = "user_location_detected";

/// Distances closer than this count as a tie.
pub const TIE_EPSILON_KM: f64 = 1e-9;

/// Site copy that surrounds the office-specific values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentSettings {
    #[serde(default = "default_tagline")]
    pub tagline: String,
    #[serde(default = "default_projects_subtitle")]
    pub projects_subtitle: String,
}

fn default_tagline() -> String {
    DEFAULT_TAGLINE.to_string()
}

fn default_projects_subtitle() -> String {
    DEFAULT_PROJECTS_SUBTITLE.to_string()
}

impl Default for ContentSettings {
    fn default() -> Self {
        Self {
            tagline: default_tagline(),
            projects_subtitle: default_projects_subtitle(),
        }
    }
}

/// Maps a visitor coordinate to the nearest office and the content to show for it.
#[derive(Debug, Clone)]
pub struct LocationResolver {
    registry: Arc<OfficeRegistry>,
    content: ContentSettings,
}

impl LocationResolver {
    pub fn new(registry: Arc<OfficeRegistry>) -> Self {
        Self::with_content(registry, ContentSettings::default())
    }

    pub fn with_content(registry: Arc<OfficeRegistry>, content: ContentSettings) -> Self {
        Self { registry, content }
    }

    pub fn registry(&self) -> &OfficeRegistry {
        &self.registry
    }

    /// Nearest office by Haversine distance.
    ///
    /// Offices are scanned in registry order and the candidate only changes when
    /// another office is closer by more than `TIE_EPSILON_KM`, so ties (rounding
    /// noise included) go to the earlier office. Without a coordinate the first
    /// office is returned and no distance is reported.
    pub fn resolve_nearest(&self, coordinate: Option<Coordinate>) -> NearestOffice {
        let Some(user) = coordinate.filter(|c| c.latitude.is_finite() && c.longitude.is_finite())
        else {
            tracing::debug!("No coordinate available, using default office");
            return NearestOffice {
                office: Arc::clone(self.registry.default_office()),
                distance_km: None,
            };
        };

        let mut nearest = self.registry.default_office();
        let mut min_distance = f64::INFINITY;

        for office in self.registry.iter() {
            let distance = haversine_km(user, office.coordinate());
            tracing::trace!("Distance to {}: {:.3} km", office.id, distance);
            if distance < min_distance - TIE_EPSILON_KM {
                min_distance = distance;
                nearest = office;
            }
        }

        tracing::debug!(
            "Nearest office to ({}, {}) is {} at {:.1} km",
            user.latitude,
            user.longitude,
            nearest.id,
            min_distance
        );

        NearestOffice {
            office: Arc::clone(nearest),
            distance_km: min_distance.is_finite().then_some(min_distance),
        }
    }

    /// Content directives for the resolved office and what is known about the visitor.
    pub fn derive_personalization(
        &self,
        nearest: &NearestOffice,
        location: &UserLocation,
    ) -> PersonalizationResult {
        let office = nearest.office.as_ref();
        let phone = phone_directive(&office.phone);
        let user_city = location.known_city();
        let user_state = location.known_state();

        let hero_subtitle = user_city.map(|city| {
            format!(
                "Serving {} and surrounding areas | {}",
                city, self.content.tagline
            )
        });

        let form_location = user_city.map(|city| {
            let value = format!("{}, {}", city, user_state.unwrap_or(UNKNOWN_PLACE));
            FormLocation {
                placeholder: format!("e.g., {}", value),
                value,
            }
        });

        let meta_user_location = location.was_detected().then(|| {
            format!(
                "{}, {}",
                user_city.unwrap_or(UNKNOWN_PLACE),
                user_state.unwrap_or(UNKNOWN_PLACE)
            )
        });

        let directives = ContentDirectives {
            email: EmailDirective {
                address: office.email.clone(),
                mailto_href: format!("mailto:{}", office.email),
            },
            city: office.city.clone(),
            office_badge: OfficeBadge {
                city: office.city.clone(),
                phone: phone.clone(),
            },
            phone,
            hero_subtitle,
            local_projects: self.local_projects(office),
            form_location,
            meta_user_location,
            tracking: location.was_detected().then(|| tracking(location)),
        };

        PersonalizationResult {
            office: Arc::clone(&nearest.office),
            distance_km: nearest.distance_km,
            directives,
        }
    }

    /// Resolve and derive in one step.
    pub fn personalize(&self, location: &UserLocation) -> PersonalizationResult {
        let nearest = self.resolve_nearest(location.coordinate);
        self.derive_personalization(&nearest, location)
    }

    fn local_projects(&self, office: &Office) -> Option<LocalProjects> {
        if office.projects.is_empty() {
            return None;
        }

        Some(LocalProjects {
            city: office.city.clone(),
            count: office.projects.len(),
            title: format!("Our Projects in {}", office.city),
            subtitle: self.content.projects_subtitle.clone(),
            call_to_action: format!("Need similar infrastructure in {}?", office.city),
            projects: office.projects.clone(),
        })
    }
}

fn phone_directive(display: &str) -> PhoneDirective {
    let digits: String = display.chars().filter(char::is_ascii_digit).collect();
    PhoneDirective {
        display: display.to_string(),
        tel_href: format!("tel:{}", digits),
    }
}

fn tracking(location: &UserLocation) -> TrackingDirectives {
    let city = location.city.clone();
    let state = location.state.clone();
    let country = location.country.clone();

    let place = BTreeMap::from([
        ("city".to_string(), city.clone()),
        ("state".to_string(), state.clone()),
        ("country".to_string(), country),
    ]);

    TrackingDirectives {
        event: AnalyticsEvent {
            name: LOCATION_DETECTED_EVENT.to_string(),
            params: place.clone(),
        },
        user_properties: BTreeMap::from([
            ("user_city".to_string(), city),
            ("user_state".to_string(), state),
        ]),
        pixel_properties: place,
    }
}
