use sea_orm::prelude::*;
use sea_orm::sea_query::Expr;
use sea_orm::{
    Condition, IntoActiveModel, Order, QueryOrder, QuerySelect, QueryTrait, Select,
    TransactionTrait,
};

use crate::core::entity::like::TargetKind;
use crate::core::entity::{comment, like, playlist_video, user, video, watch_history};
use crate::data::page::{Page, PageQuery, fetch_page};

pub type VideoWithOwner = (video::Model, Option<user::Model>);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VideoSort {
    #[default]
    CreatedAt,
    Views,
    Title,
}

impl VideoSort {
    fn column(self) -> video::Column {
        match self {
            VideoSort::CreatedAt => video::Column::CreatedAt,
            VideoSort::Views => video::Column::Views,
            VideoSort::Title => video::Column::Title,
        }
    }
}

#[derive(Debug, Clone)]
pub struct VideoFilter {
    /// Substring matched against title and description.
    pub query: Option<String>,
    pub owner_id: Option<i64>,
    pub published_only: bool,
    pub sort: VideoSort,
    pub order: Order,
}

impl Default for VideoFilter {
    fn default() -> Self {
        Self {
            query: None,
            owner_id: None,
            published_only: true,
            sort: VideoSort::CreatedAt,
            order: Order::Desc,
        }
    }
}

/// Owned-video totals for a channel.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OwnerVideoStats {
    pub total_videos: u64,
    pub total_views: i64,
    pub video_ids: Vec<i64>,
}

#[derive(Clone)]
pub struct VideoData {
    db: DatabaseConnection,
}

impl VideoData {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn create_video(&self, video: video::ActiveModel) -> Result<video::Model, DbErr> {
        video.insert(&self.db).await
    }

    pub async fn update_video(&self, video: video::ActiveModel) -> Result<video::Model, DbErr> {
        video.update(&self.db).await
    }

    pub async fn get_video(&self, id: i64) -> Result<Option<video::Model>, DbErr> {
        video::Entity::find_by_id(id).one(&self.db).await
    }

    /// The video if `viewer_id` may see it: published, or owned by the viewer.
    pub async fn get_visible_video(
        &self,
        id: i64,
        viewer_id: i64,
    ) -> Result<Option<video::Model>, DbErr> {
        video::Entity::find_by_id(id)
            .filter(visible_to(viewer_id))
            .one(&self.db)
            .await
    }

    pub async fn get_video_with_owner(&self, id: i64) -> Result<Option<VideoWithOwner>, DbErr> {
        video::Entity::find_by_id(id)
            .find_also_related(user::Entity)
            .one(&self.db)
            .await
    }

    pub async fn increment_views(&self, id: i64) -> Result<(), DbErr> {
        video::Entity::update_many()
            .col_expr(
                video::Column::Views,
                Expr::col(video::Column::Views).add(1),
            )
            .filter(video::Column::Id.eq(id))
            .exec(&self.db)
            .await?;
        Ok(())
    }

    pub async fn list_videos(
        &self,
        filter: VideoFilter,
        page: PageQuery,
    ) -> Result<Page<VideoWithOwner>, DbErr> {
        let mut select = video::Entity::find();
        if let Some(owner_id) = filter.owner_id {
            select = select.filter(video::Column::OwnerId.eq(owner_id));
        }
        if filter.published_only {
            select = select.filter(video::Column::IsPublished.eq(true));
        }
        if let Some(query) = filter.query.as_deref().filter(|q| !q.is_empty()) {
            select = select.filter(
                Condition::any()
                    .add(video::Column::Title.contains(query))
                    .add(video::Column::Description.contains(query)),
            );
        }
        let select = select
            .order_by(filter.sort.column(), filter.order)
            .order_by(video::Column::Id, Order::Desc)
            .find_also_related(user::Entity);
        fetch_page(&self.db, select, page).await
    }

    /// Every video of one owner, published or not, newest first.
    pub async fn list_videos_by_owner(
        &self,
        owner_id: i64,
        page: PageQuery,
    ) -> Result<Page<video::Model>, DbErr> {
        let select = newest_first(
            video::Entity::find().filter(video::Column::OwnerId.eq(owner_id)),
        );
        fetch_page(&self.db, select, page).await
    }

    /// Videos `user_id` liked that are still visible to them.
    pub async fn list_liked_videos(
        &self,
        user_id: i64,
        page: PageQuery,
    ) -> Result<Page<VideoWithOwner>, DbErr> {
        let liked_ids = like::Entity::find()
            .select_only()
            .column(like::Column::TargetId)
            .filter(like::Column::LikedBy.eq(user_id))
            .filter(like::Column::TargetKind.eq(TargetKind::Video))
            .into_query();
        let select = newest_first(
            video::Entity::find()
                .filter(video::Column::Id.in_subquery(liked_ids))
                .filter(visible_to(user_id)),
        )
        .find_also_related(user::Entity);
        fetch_page(&self.db, select, page).await
    }

    pub async fn list_playlist_videos(
        &self,
        playlist_id: i64,
        viewer_id: i64,
        page: PageQuery,
    ) -> Result<Page<VideoWithOwner>, DbErr> {
        let member_ids = playlist_video::Entity::find()
            .select_only()
            .column(playlist_video::Column::VideoId)
            .filter(playlist_video::Column::PlaylistId.eq(playlist_id))
            .into_query();
        let select = newest_first(
            video::Entity::find()
                .filter(video::Column::Id.in_subquery(member_ids))
                .filter(visible_to(viewer_id)),
        )
        .find_also_related(user::Entity);
        fetch_page(&self.db, select, page).await
    }

    pub async fn get_owner_stats(&self, owner_id: i64) -> Result<OwnerVideoStats, DbErr> {
        let rows: Vec<(i64, i64)> = video::Entity::find()
            .select_only()
            .column(video::Column::Id)
            .column(video::Column::Views)
            .filter(video::Column::OwnerId.eq(owner_id))
            .into_tuple()
            .all(&self.db)
            .await?;
        Ok(OwnerVideoStats {
            total_videos: rows.len() as u64,
            total_views: rows.iter().map(|(_, views)| views).sum(),
            video_ids: rows.into_iter().map(|(id, _)| id).collect(),
        })
    }

    /// Deletes a video together with everything that points at it: comments
    /// (and their likes), likes, playlist memberships and watch history.
    pub async fn delete_video_with_dependents(&self, video: video::Model) -> Result<(), DbErr> {
        let tx = self.db.begin().await?;

        let comment_ids: Vec<i64> = comment::Entity::find()
            .select_only()
            .column(comment::Column::Id)
            .filter(comment::Column::VideoId.eq(video.id))
            .into_tuple()
            .all(&tx)
            .await?;

        like::Entity::delete_many()
            .filter(
                Condition::any()
                    .add(
                        Condition::all()
                            .add(like::Column::TargetKind.eq(TargetKind::Video))
                            .add(like::Column::TargetId.eq(video.id)),
                    )
                    .add(
                        Condition::all()
                            .add(like::Column::TargetKind.eq(TargetKind::Comment))
                            .add(like::Column::TargetId.is_in(comment_ids)),
                    ),
            )
            .exec(&tx)
            .await?;

        comment::Entity::delete_many()
            .filter(comment::Column::VideoId.eq(video.id))
            .exec(&tx)
            .await?;
        playlist_video::Entity::delete_many()
            .filter(playlist_video::Column::VideoId.eq(video.id))
            .exec(&tx)
            .await?;
        watch_history::Entity::delete_many()
            .filter(watch_history::Column::VideoId.eq(video.id))
            .exec(&tx)
            .await?;

        video.into_active_model().delete(&tx).await?;
        tx.commit().await?;
        Ok(())
    }
}

fn visible_to(viewer_id: i64) -> Condition {
    Condition::any()
        .add(video::Column::IsPublished.eq(true))
        .add(video::Column::OwnerId.eq(viewer_id))
}

fn newest_first(select: Select<video::Entity>) -> Select<video::Entity> {
    select
        .order_by(video::Column::CreatedAt, Order::Desc)
        .order_by(video::Column::Id, Order::Desc)
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use sea_orm::Set;

    use super::*;
    use crate::testing::{insert_user, insert_video, setup_db};

    #[tokio::test]
    async fn pages_cover_every_video_exactly_once() {
        let db = setup_db().await;
        let owner = insert_user(&db, "alice").await;
        for i in 0..23 {
            insert_video(&db, owner.id, &format!("video-{i}"), true).await;
        }
        let data = VideoData::new(db);

        let first = data
            .list_videos(VideoFilter::default(), PageQuery::new(Some(1), Some(5)).unwrap())
            .await
            .unwrap();
        assert_eq!(first.total_docs, 23);
        assert_eq!(first.total_pages, 5);

        let mut seen = HashSet::new();
        let mut previous: Option<video::Model> = None;
        for page in 1..=first.total_pages {
            let res = data
                .list_videos(
                    VideoFilter::default(),
                    PageQuery::new(Some(page), Some(5)).unwrap(),
                )
                .await
                .unwrap();
            assert!(res.docs.len() <= 5);
            for (video, owner) in res.docs {
                assert_eq!(owner.map(|o| o.username).as_deref(), Some("alice"));
                if let Some(prev) = &previous {
                    assert!(
                        (prev.created_at, prev.id) > (video.created_at, video.id),
                        "videos must come newest first"
                    );
                }
                assert!(seen.insert(video.id));
                previous = Some(video);
            }
        }
        assert_eq!(seen.len(), 23);

        let past_end = data
            .list_videos(VideoFilter::default(), PageQuery::new(Some(9), Some(5)).unwrap())
            .await
            .unwrap();
        assert!(past_end.docs.is_empty());
    }

    #[tokio::test]
    async fn filters_apply_to_listing() {
        let db = setup_db().await;
        let alice = insert_user(&db, "alice").await;
        let bob = insert_user(&db, "bob").await;
        insert_video(&db, alice.id, "rust tutorial", true).await;
        insert_video(&db, alice.id, "draft", false).await;
        insert_video(&db, bob.id, "cooking", true).await;
        let data = VideoData::new(db);
        let page = PageQuery::default();

        let published = data
            .list_videos(VideoFilter::default(), page)
            .await
            .unwrap();
        assert_eq!(published.total_docs, 2);

        let own = data
            .list_videos(
                VideoFilter {
                    owner_id: Some(alice.id),
                    published_only: false,
                    ..Default::default()
                },
                page,
            )
            .await
            .unwrap();
        assert_eq!(own.total_docs, 2);

        let search = data
            .list_videos(
                VideoFilter {
                    query: Some("rust".to_string()),
                    ..Default::default()
                },
                page,
            )
            .await
            .unwrap();
        assert_eq!(search.total_docs, 1);
        assert_eq!(search.docs[0].0.title, "rust tutorial");

        let by_title = data
            .list_videos(
                VideoFilter {
                    sort: VideoSort::Title,
                    order: Order::Asc,
                    ..Default::default()
                },
                page,
            )
            .await
            .unwrap();
        let titles: Vec<_> = by_title.docs.iter().map(|(v, _)| v.title.as_str()).collect();
        assert_eq!(titles, ["cooking", "rust tutorial"]);
    }

    #[tokio::test]
    async fn views_and_owner_stats() {
        let db = setup_db().await;
        let alice = insert_user(&db, "alice").await;
        let first = insert_video(&db, alice.id, "one", true).await;
        insert_video(&db, alice.id, "two", false).await;
        let data = VideoData::new(db);

        data.increment_views(first.id).await.unwrap();
        data.increment_views(first.id).await.unwrap();

        let stats = data.get_owner_stats(alice.id).await.unwrap();
        assert_eq!(stats.total_videos, 2);
        assert_eq!(stats.total_views, 2);
        assert_eq!(stats.video_ids.len(), 2);
    }

    #[tokio::test]
    async fn deleting_a_video_removes_its_dependents() {
        let db = setup_db().await;
        let alice = insert_user(&db, "alice").await;
        let bob = insert_user(&db, "bob").await;
        let video = insert_video(&db, alice.id, "doomed", true).await;
        let other = insert_video(&db, alice.id, "kept", true).await;
        let now: DateTimeWithTimeZone = chrono::Utc::now().into();

        let comment = comment::ActiveModel {
            video_id: Set(video.id),
            owner_id: Set(bob.id),
            content: Set("nice".to_string()),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&db)
        .await
        .unwrap();

        let likes = crate::data::LikeData::new(db.clone());
        likes
            .create_like(bob.id, like::LikeTarget::Video(video.id))
            .await
            .unwrap();
        likes
            .create_like(bob.id, like::LikeTarget::Comment(comment.id))
            .await
            .unwrap();
        likes
            .create_like(bob.id, like::LikeTarget::Video(other.id))
            .await
            .unwrap();

        let users = crate::data::UserData::new(db.clone());
        users.record_watch(bob.id, video.id).await.unwrap();

        let data = VideoData::new(db.clone());
        data.delete_video_with_dependents(video.clone()).await.unwrap();

        assert!(data.get_video(video.id).await.unwrap().is_none());
        assert_eq!(comment::Entity::find().count(&db).await.unwrap(), 0);
        assert_eq!(like::Entity::find().count(&db).await.unwrap(), 1);
        assert_eq!(watch_history::Entity::find().count(&db).await.unwrap(), 0);
        assert!(data.get_video(other.id).await.unwrap().is_some());
    }
}
