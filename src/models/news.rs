//! Diesel models for news posts and their visibility rows.

use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::news::{News as DomainNews, NewsFields, NewsVisibility as DomainNewsVisibility};
use crate::domain::types::{
    BranchId, CategoryName, HubId, NewsId, NewsTitle, RichText, Tags, TypeConstraintError, UserId,
};

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::news)]
pub struct News {
    pub id: i32,
    pub hub_id: i32,
    pub title: String,
    pub body: String,
    pub category: String,
    pub tags: String,
    pub is_published: bool,
    pub author_id: Option<i32>,
    pub published_at: Option<NaiveDateTime>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::news)]
pub struct NewNews<'a> {
    pub hub_id: i32,
    pub title: &'a str,
    pub body: &'a str,
    pub category: &'a str,
    pub tags: String,
    pub is_published: bool,
    pub author_id: Option<i32>,
    pub published_at: Option<NaiveDateTime>,
}

#[derive(AsChangeset)]
#[diesel(table_name = crate::schema::news)]
pub struct UpdateNews<'a> {
    pub title: &'a str,
    pub body: &'a str,
    pub category: &'a str,
    pub tags: String,
    pub is_published: bool,
    pub published_at: Option<NaiveDateTime>,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Clone, Identifiable, Queryable, Selectable, Associations)]
#[diesel(belongs_to(News, foreign_key = news_id))]
#[diesel(table_name = crate::schema::news_visibility)]
pub struct NewsVisibility {
    pub id: i32,
    pub news_id: i32,
    pub branch_id: Option<i32>,
    pub user_type: Option<String>,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::news_visibility)]
pub struct NewNewsVisibility {
    pub news_id: i32,
    pub branch_id: Option<i32>,
    pub user_type: Option<&'static str>,
}

impl TryFrom<News> for DomainNews {
    type Error = TypeConstraintError;

    fn try_from(news: News) -> Result<Self, Self::Error> {
        Ok(Self {
            id: NewsId::new(news.id)?,
            hub_id: HubId::new(news.hub_id)?,
            title: NewsTitle::new(news.title)?,
            body: RichText::new(news.body)?,
            category: CategoryName::new(news.category)?,
            tags: Tags::parse(&news.tags),
            is_published: news.is_published,
            author_id: news.author_id.map(UserId::new).transpose()?,
            published_at: news.published_at,
            created_at: news.created_at,
            updated_at: news.updated_at,
        })
    }
}

impl<'a> NewNews<'a> {
    pub fn new(
        hub_id: HubId,
        author_id: Option<UserId>,
        fields: &'a NewsFields,
        published_at: Option<NaiveDateTime>,
    ) -> Self {
        Self {
            hub_id: hub_id.get(),
            title: fields.title.as_str(),
            body: fields.body.as_str(),
            category: fields.category.as_str(),
            tags: fields.tags.to_storage(),
            is_published: fields.is_published,
            author_id: author_id.map(UserId::get),
            published_at,
        }
    }
}

impl<'a> UpdateNews<'a> {
    pub fn new(
        fields: &'a NewsFields,
        published_at: Option<NaiveDateTime>,
        updated_at: NaiveDateTime,
    ) -> Self {
        Self {
            title: fields.title.as_str(),
            body: fields.body.as_str(),
            category: fields.category.as_str(),
            tags: fields.tags.to_storage(),
            is_published: fields.is_published,
            published_at,
            updated_at,
        }
    }
}

impl TryFrom<NewsVisibility> for DomainNewsVisibility {
    type Error = TypeConstraintError;

    fn try_from(row: NewsVisibility) -> Result<Self, Self::Error> {
        Ok(Self {
            branch_id: row.branch_id.map(BranchId::new).transpose()?,
            user_type: row.user_type.map(|t| t.parse()).transpose()?,
        })
    }
}

impl NewNewsVisibility {
    pub fn new(news_id: NewsId, row: &DomainNewsVisibility) -> Self {
        Self {
            news_id: news_id.get(),
            branch_id: row.branch_id.map(BranchId::get),
            user_type: row.user_type.map(|t| t.as_str()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::user::UserType;

    #[test]
    fn visibility_row_round_trip_through_columns() {
        let domain = DomainNewsVisibility {
            branch_id: None,
            user_type: Some(UserType::Agent),
        };
        let insertable = NewNewsVisibility::new(NewsId::new(3).unwrap(), &domain);
        assert_eq!(insertable.news_id, 3);
        assert_eq!(insertable.branch_id, None);
        assert_eq!(insertable.user_type, Some("agent"));

        let stored = NewsVisibility {
            id: 1,
            news_id: 3,
            branch_id: Some(2),
            user_type: None,
        };
        let loaded = DomainNewsVisibility::try_from(stored).unwrap();
        assert_eq!(loaded.branch_id, Some(BranchId::new(2).unwrap()));
        assert_eq!(loaded.user_type, None);
    }
}
