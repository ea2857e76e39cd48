use serde::Serialize;

use crate::domain::alert::Alert;
use crate::domain::calendar_event::CalendarEvent;
use crate::domain::news::News;
use crate::domain::user::User;
use crate::repository::HubStats;

/// Data required to render the dashboard.
#[derive(Debug, Serialize)]
pub struct DashboardPageData {
    /// Profile of the signed-in user, synced from the identity.
    pub profile: User,
    pub alerts: Vec<Alert>,
    /// Latest news visible to the user.
    pub news: Vec<News>,
    /// Next events for the user's branch and the whole network.
    pub events: Vec<CalendarEvent>,
    /// Entity counts, only for admins.
    pub stats: Option<HubStats>,
}
