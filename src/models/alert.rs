use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::alert::{Alert as DomainAlert, AlertFields, NewAlert as DomainNewAlert};
use crate::domain::types::{AlertId, AlertTitle, HubId, RichText, TypeConstraintError};

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::alerts)]
pub struct Alert {
    pub id: i32,
    pub hub_id: i32,
    pub title: String,
    pub message: String,
    pub level: String,
    pub is_active: bool,
    pub starts_at: Option<NaiveDateTime>,
    pub expires_at: Option<NaiveDateTime>,
    pub created_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::alerts)]
pub struct NewAlert<'a> {
    pub hub_id: i32,
    pub title: &'a str,
    pub message: &'a str,
    pub level: &'static str,
    pub is_active: bool,
    pub starts_at: Option<NaiveDateTime>,
    pub expires_at: Option<NaiveDateTime>,
}

#[derive(AsChangeset)]
#[diesel(table_name = crate::schema::alerts)]
#[diesel(treat_none_as_null = true)]
pub struct UpdateAlert<'a> {
    pub title: &'a str,
    pub message: &'a str,
    pub level: &'static str,
    pub is_active: bool,
    pub starts_at: Option<NaiveDateTime>,
    pub expires_at: Option<NaiveDateTime>,
}

impl TryFrom<Alert> for DomainAlert {
    type Error = TypeConstraintError;

    fn try_from(alert: Alert) -> Result<Self, Self::Error> {
        Ok(Self {
            id: AlertId::new(alert.id)?,
            hub_id: HubId::new(alert.hub_id)?,
            title: AlertTitle::new(alert.title)?,
            message: RichText::new(alert.message)?,
            level: alert.level.parse()?,
            is_active: alert.is_active,
            starts_at: alert.starts_at,
            expires_at: alert.expires_at,
            created_at: alert.created_at,
        })
    }
}

impl<'a> From<&'a DomainNewAlert> for NewAlert<'a> {
    fn from(alert: &'a DomainNewAlert) -> Self {
        let fields = &alert.fields;
        Self {
            hub_id: alert.hub_id.get(),
            title: fields.title.as_str(),
            message: fields.message.as_str(),
            level: fields.level.as_str(),
            is_active: fields.is_active,
            starts_at: fields.starts_at,
            expires_at: fields.expires_at,
        }
    }
}

impl<'a> From<&'a AlertFields> for UpdateAlert<'a> {
    fn from(fields: &'a AlertFields) -> Self {
        Self {
            title: fields.title.as_str(),
            message: fields.message.as_str(),
            level: fields.level.as_str(),
            is_active: fields.is_active,
            starts_at: fields.starts_at,
            expires_at: fields.expires_at,
        }
    }
}
