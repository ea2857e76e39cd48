//! Internal announcements and their audience scoping.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::types::{BranchId, CategoryName, HubId, NewsId, NewsTitle, RichText, Tags, UserId};
use crate::domain::user::UserType;

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct News {
    pub id: NewsId,
    pub hub_id: HubId,
    pub title: NewsTitle,
    pub body: RichText,
    pub category: CategoryName,
    pub tags: Tags,
    pub is_published: bool,
    pub author_id: Option<UserId>,
    pub published_at: Option<NaiveDateTime>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Clone, Debug, PartialEq)]
pub struct NewsFields {
    pub title: NewsTitle,
    pub body: RichText,
    pub category: CategoryName,
    pub tags: Tags,
    pub is_published: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct NewNews {
    pub hub_id: HubId,
    pub author_id: Option<UserId>,
    pub fields: NewsFields,
    pub visibility: Vec<NewsVisibility>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct UpdateNews {
    pub fields: NewsFields,
    pub visibility: Vec<NewsVisibility>,
}

/// One audience row. `None` on either axis matches everyone on that axis.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct NewsVisibility {
    pub branch_id: Option<BranchId>,
    pub user_type: Option<UserType>,
}

impl NewsVisibility {
    /// Whether a reader from `branch_id` with `user_type` is covered by this row.
    pub fn matches(&self, branch_id: Option<BranchId>, user_type: UserType) -> bool {
        let branch_ok = match self.branch_id {
            None => true,
            Some(target) => branch_id == Some(target),
        };
        let type_ok = self.user_type.is_none_or(|target| target == user_type);
        branch_ok && type_ok
    }
}

/// Expands the selected branches and user types into visibility rows.
///
/// The result is the cross product of both selections. An empty selection on
/// an axis stands for "all" and contributes a single `None`. Duplicates in the
/// input are ignored and the first-seen order is kept.
pub fn expand_visibility(branches: &[BranchId], user_types: &[UserType]) -> Vec<NewsVisibility> {
    let mut branch_axis: Vec<Option<BranchId>> = Vec::new();
    for branch in branches {
        if !branch_axis.contains(&Some(*branch)) {
            branch_axis.push(Some(*branch));
        }
    }
    if branch_axis.is_empty() {
        branch_axis.push(None);
    }

    let mut type_axis: Vec<Option<UserType>> = Vec::new();
    for user_type in user_types {
        if !type_axis.contains(&Some(*user_type)) {
            type_axis.push(Some(*user_type));
        }
    }
    if type_axis.is_empty() {
        type_axis.push(None);
    }

    let mut rows = Vec::with_capacity(branch_axis.len() * type_axis.len());
    for branch_id in &branch_axis {
        for user_type in &type_axis {
            rows.push(NewsVisibility {
                branch_id: *branch_id,
                user_type: *user_type,
            });
        }
    }
    rows
}

/// Publication timestamp after a save: stamped on first publish, kept afterwards.
pub fn resolve_published_at(
    current: Option<NaiveDateTime>,
    is_published: bool,
    now: NaiveDateTime,
) -> Option<NaiveDateTime> {
    match current {
        Some(at) => Some(at),
        None if is_published => Some(now),
        None => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn branch(id: i32) -> BranchId {
        BranchId::new(id).unwrap()
    }

    #[test]
    fn expands_cross_product() {
        let rows = expand_visibility(
            &[branch(1), branch(2)],
            &[UserType::Agent, UserType::Manager],
        );

        assert_eq!(rows.len(), 4);
        assert_eq!(
            rows[0],
            NewsVisibility {
                branch_id: Some(branch(1)),
                user_type: Some(UserType::Agent)
            }
        );
        assert_eq!(
            rows[3],
            NewsVisibility {
                branch_id: Some(branch(2)),
                user_type: Some(UserType::Manager)
            }
        );
    }

    #[test]
    fn empty_axis_means_everyone() {
        let rows = expand_visibility(&[], &[UserType::Agent]);
        assert_eq!(
            rows,
            vec![NewsVisibility {
                branch_id: None,
                user_type: Some(UserType::Agent)
            }]
        );

        let rows = expand_visibility(&[], &[]);
        assert_eq!(
            rows,
            vec![NewsVisibility {
                branch_id: None,
                user_type: None
            }]
        );
    }

    #[test]
    fn duplicates_are_collapsed() {
        let rows = expand_visibility(&[branch(5), branch(5)], &[UserType::Agent, UserType::Agent]);
        assert_eq!(rows.len(), 1);
    }

    #[test]
    fn visibility_matching() {
        let row = NewsVisibility {
            branch_id: Some(branch(1)),
            user_type: None,
        };
        assert!(row.matches(Some(branch(1)), UserType::Agent));
        assert!(!row.matches(Some(branch(2)), UserType::Agent));
        assert!(!row.matches(None, UserType::Agent));

        let row = NewsVisibility {
            branch_id: None,
            user_type: Some(UserType::Franchisee),
        };
        assert!(row.matches(None, UserType::Franchisee));
        assert!(!row.matches(Some(branch(1)), UserType::Employee));
    }

    #[test]
    fn published_at_is_stamped_once() {
        let first = NaiveDate::from_ymd_opt(2025, 3, 1)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap();
        let later = NaiveDate::from_ymd_opt(2025, 4, 1)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap();

        assert_eq!(resolve_published_at(None, false, first), None);
        assert_eq!(resolve_published_at(None, true, first), Some(first));
        assert_eq!(resolve_published_at(Some(first), true, later), Some(first));
        assert_eq!(resolve_published_at(Some(first), false, later), Some(first));
    }
}
