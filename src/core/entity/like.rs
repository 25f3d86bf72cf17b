use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "likes")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub liked_by: i64,
    pub target_kind: TargetKind,
    pub target_id: i64,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Deserialize, Serialize, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "lowercase")]
pub enum TargetKind {
    #[sea_orm(string_value = "video")]
    Video,
    #[sea_orm(string_value = "comment")]
    Comment,
    #[sea_orm(string_value = "tweet")]
    Tweet,
}

/// What a like points at. Exactly one target per like, enforced by
/// construction rather than by three nullable columns.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum LikeTarget {
    Video(i64),
    Comment(i64),
    Tweet(i64),
}

impl LikeTarget {
    pub fn kind(&self) -> TargetKind {
        match self {
            LikeTarget::Video(_) => TargetKind::Video,
            LikeTarget::Comment(_) => TargetKind::Comment,
            LikeTarget::Tweet(_) => TargetKind::Tweet,
        }
    }

    pub fn id(&self) -> i64 {
        match *self {
            LikeTarget::Video(id) | LikeTarget::Comment(id) | LikeTarget::Tweet(id) => id,
        }
    }
}

impl Model {
    pub fn target(&self) -> LikeTarget {
        match self.target_kind {
            TargetKind::Video => LikeTarget::Video(self.target_id),
            TargetKind::Comment => LikeTarget::Comment(self.target_id),
            TargetKind::Tweet => LikeTarget::Tweet(self.target_id),
        }
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::LikedBy",
        to = "super::user::Column::Id"
    )]
    LikedBy,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::LikedBy.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn target_round_trips_through_columns() {
        let now = chrono::Utc::now().into();
        for target in [
            LikeTarget::Video(1),
            LikeTarget::Comment(2),
            LikeTarget::Tweet(3),
        ] {
            let like = Model {
                id: 9,
                liked_by: 4,
                target_kind: target.kind(),
                target_id: target.id(),
                created_at: now,
            };
            assert_eq!(like.target(), target);
        }
    }

    #[test]
    fn target_kind_serializes_lowercase() {
        let json = serde_json::to_string(&TargetKind::Comment).unwrap();
        assert_eq!(json, "\"comment\"");
    }
}
