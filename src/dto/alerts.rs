use serde::Serialize;

use crate::domain::alert::Alert;

/// Alert row with its state at render time.
#[derive(Debug, Serialize)]
pub struct AlertView {
    #[serde(flatten)]
    pub alert: Alert,
    pub is_live: bool,
}

#[derive(Debug, Serialize)]
pub struct AlertsPageData {
    pub alerts: Vec<AlertView>,
}
