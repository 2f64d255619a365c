use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use crate::calendar::{Event, EventForm, EventId, RepeatInfo};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Event not found: {0}")]
    NotFound(EventId),
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

/// The `{ "events": [...] }` document exchanged with the backend.
#[derive(Debug, Default, Serialize, Deserialize)]
struct EventDocument {
    #[serde(default)]
    events: Vec<Event>,
}

/// Fields to override on an existing event; `None` keeps the stored value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EventPatch {
    pub title: Option<String>,
    pub date: Option<String>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub description: Option<String>,
    pub location: Option<String>,
    pub category: Option<String>,
    pub repeat: Option<RepeatInfo>,
    pub notification_time: Option<u32>,
}

impl EventPatch {
    fn apply(self, event: &mut Event) {
        if let Some(title) = self.title {
            event.title = title;
        }
        if let Some(date) = self.date {
            event.date = date;
        }
        if let Some(start_time) = self.start_time {
            event.start_time = start_time;
        }
        if let Some(end_time) = self.end_time {
            event.end_time = end_time;
        }
        if let Some(description) = self.description {
            event.description = description;
        }
        if let Some(location) = self.location {
            event.location = location;
        }
        if let Some(category) = self.category {
            event.category = category;
        }
        if let Some(repeat) = self.repeat {
            event.repeat = repeat;
        }
        if let Some(notification_time) = self.notification_time {
            event.notification_time = notification_time;
        }
    }
}

/// In-memory event collection with the list/create/update/delete contract of
/// the local backend.
#[derive(Debug, Default)]
pub struct EventStore {
    events: Vec<Event>,
}

impl EventStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_events(events: Vec<Event>) -> Self {
        Self { events }
    }

    pub fn from_json(content: &str) -> Result<Self, StoreError> {
        let document: EventDocument = serde_json::from_str(content)?;
        debug!("Loaded {} events from document", document.events.len());
        Ok(Self::from_events(document.events))
    }

    pub fn to_json(&self) -> Result<String, StoreError> {
        let document = EventDocument {
            events: self.events.clone(),
        };
        Ok(serde_json::to_string_pretty(&document)?)
    }

    pub fn list(&self) -> &[Event] {
        &self.events
    }

    pub fn get(&self, id: &EventId) -> Option<&Event> {
        self.events.iter().find(|event| &event.id == id)
    }

    /// Stores `form` under a freshly generated identifier.
    pub fn create(&mut self, form: EventForm) -> Event {
        let event = form.into_event(EventId::generate());
        info!("Created event {} '{}'", event.id, event.title);
        self.events.push(event.clone());
        event
    }

    pub fn update(&mut self, id: &EventId, patch: EventPatch) -> Result<Event, StoreError> {
        let event = self
            .events
            .iter_mut()
            .find(|event| &event.id == id)
            .ok_or_else(|| StoreError::NotFound(id.clone()))?;

        patch.apply(event);
        info!("Updated event {}", id);
        Ok(event.clone())
    }

    /// Removes the event if present and reports whether anything was removed.
    pub fn delete(&mut self, id: &EventId) -> bool {
        let before = self.events.len();
        self.events.retain(|event| &event.id != id);
        let removed = self.events.len() != before;
        if removed {
            info!("Deleted event {}", id);
        }
        removed
    }

    pub fn into_events(self) -> Vec<Event> {
        self.events
    }
}
