use crate::core::resolver::LocationResolver;
use crate::domain::model::{PersonalizationResult, UserLocation};
use crate::domain::ports::GeolocationProvider;
use crate::utils::error::{LocatorError, Result};
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::watch;

#[derive(Debug, Clone, PartialEq)]
pub enum SessionOutcome {
    Personalized(PersonalizationResult),
    /// The page went away before the location arrived; nothing may be applied.
    Discarded,
}

impl SessionOutcome {
    pub fn into_result(self) -> Option<PersonalizationResult> {
        match self {
            SessionOutcome::Personalized(result) => Some(result),
            SessionOutcome::Discarded => None,
        }
    }
}

/// Signals that the page backing a session has been torn down.
#[derive(Debug)]
pub struct TeardownHandle {
    sender: watch::Sender<bool>,
}

impl TeardownHandle {
    pub fn teardown(&self) {
        // send_replace works even when every receiver is gone
        self.sender.send_replace(true);
    }
}

/// One page view: acquire the visitor's location once, then resolve it.
pub struct PageSession {
    resolver: LocationResolver,
    torn_down: watch::Receiver<bool>,
    finished: AtomicBool,
}

impl PageSession {
    pub fn new(resolver: LocationResolver) -> (Self, TeardownHandle) {
        let (sender, receiver) = watch::channel(false);
        let session = Self {
            resolver,
            torn_down: receiver,
            finished: AtomicBool::new(false),
        };
        (session, TeardownHandle { sender })
    }

    pub async fn run(&self, provider: &dyn GeolocationProvider) -> Result<SessionOutcome> {
        if self.finished.swap(true, Ordering::SeqCst) {
            return Err(LocatorError::SessionFinished);
        }

        tracing::info!("Acquiring visitor location via {}", provider.name());

        let mut torn_down = self.torn_down.clone();
        if *torn_down.borrow_and_update() {
            tracing::info!("Page torn down before lookup started, discarding");
            return Ok(SessionOutcome::Discarded);
        }

        let lookup = provider.locate();
        tokio::pin!(lookup);
        let mut watching = true;

        let location = loop {
            tokio::select! {
                biased;
                changed = torn_down.changed(), if watching => match changed {
                    Ok(()) if *torn_down.borrow() => {
                        tracing::info!("Page torn down while lookup was pending, discarding");
                        return Ok(SessionOutcome::Discarded);
                    }
                    Ok(()) => continue,
                    // handle dropped without a teardown; the page lives on
                    Err(_) => watching = false,
                },
                located = &mut lookup => break located,
            }
        };

        let location = match location {
            Ok(location) => {
                tracing::info!(
                    "Location detected: {}, {} ({:?})",
                    location.city.as_deref().unwrap_or("?"),
                    location.state.as_deref().unwrap_or("?"),
                    location.source
                );
                location
            }
            Err(e) => {
                tracing::warn!("Geolocation not available: {}", e);
                UserLocation::unknown()
            }
        };

        let result = self.resolver.personalize(&location);
        tracing::info!(
            "Personalized for office {} ({})",
            result.office.id,
            result
                .distance_km
                .map(|d| format!("{:.1} km", d))
                .unwrap_or_else(|| "default".to_string())
        );

        Ok(SessionOutcome::Personalized(result))
    }
}
