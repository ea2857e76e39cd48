use serde::Deserialize;
use validator::Validate;

use crate::domain::calendar_event::{EventFields, EventSchedule};
use crate::domain::types::{BranchId, EventTitle, non_blank};
use crate::forms::{FormError, checkbox, parse_datetime};

#[derive(Debug, Deserialize, Validate)]
/// Add/edit form for a calendar event. Times come from `datetime-local` inputs.
pub struct EventForm {
    #[validate(length(min = 1, max = 300))]
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    /// `0` or missing means a network-wide event.
    #[serde(default)]
    pub branch_id: Option<i32>,
    pub starts_at: String,
    #[serde(default)]
    pub ends_at: Option<String>,
    #[serde(default)]
    pub all_day: Option<String>,
}

impl TryFrom<EventForm> for EventFields {
    type Error = FormError;

    fn try_from(form: EventForm) -> Result<Self, Self::Error> {
        form.validate()?;

        let starts_at = parse_datetime(&form.starts_at)?;
        // A missing end means the event ends when it starts.
        let ends_at = match non_blank(form.ends_at) {
            Some(value) => parse_datetime(&value)?,
            None => starts_at,
        };
        let schedule = EventSchedule::try_new(starts_at, ends_at, checkbox(&form.all_day))
            .map_err(|_| FormError::InvalidRange)?;

        let branch_id = match form.branch_id {
            None | Some(0) => None,
            Some(id) => Some(BranchId::new(id).map_err(|_| FormError::InvalidId("branch"))?),
        };

        Ok(EventFields {
            branch_id,
            title: EventTitle::new(form.title).map_err(|_| FormError::Required("title"))?,
            description: non_blank(form.description),
            location: non_blank(form.location),
            schedule,
        })
    }
}

#[derive(Debug, Default, Deserialize)]
/// Query string of the month view.
pub struct CalendarQuery {
    pub year: Option<i32>,
    pub month: Option<u32>,
    pub branch_id: Option<i32>,
}
