use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering as AtomicOrdering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use uuid::Uuid;
use vidshare_core::models::{
    Comment, CommentWithOwner, Like, LikeTarget, LikedVideo, MembershipChange, NewVideo,
    OrphanedAsset, OwnerSummary, Playlist, ToggleOutcome, Tweet, UserProfile, Video, VideoChanges, VideoDetails,
    VideoFilter,
};
use vidshare_core::{AppError, Page, PageRequest, SortDirection, SortSpec, VideoSortField};

use crate::db::playlist::DUPLICATE_PLAYLIST;
use crate::traits::{
    CommentRepository, HealthCheck, LikeRepository, OrphanedAssetRepository, PlaylistRepository,
    TweetRepository, VideoRepository,
};

#[derive(Default)]
struct State {
    last_timestamp: Option<DateTime<Utc>>,
    users: HashMap<Uuid, UserProfile>,
    videos: HashMap<Uuid, Video>,
    comments: HashMap<Uuid, Comment>,
    tweets: HashMap<Uuid, Tweet>,
    likes: Vec<Like>,
    playlists: HashMap<Uuid, Playlist>,
    orphaned_assets: Vec<OrphanedAsset>,
}

impl State {
    /// Strictly increasing timestamps so "newest first" is deterministic.
    fn now(&mut self) -> DateTime<Utc> {
        let mut now = Utc::now();
        if let Some(last) = self.last_timestamp {
            if now <= last {
                now = last + Duration::microseconds(1);
            }
        }
        self.last_timestamp = Some(now);
        now
    }

    fn owner_summary(&self, id: Uuid) -> Option<OwnerSummary> {
        self.users.get(&id).cloned().map(OwnerSummary::from)
    }
}

fn paginate<T>(items: Vec<T>, page: PageRequest) -> Page<T> {
    let total = items.len() as i64;
    let docs = items
        .into_iter()
        .skip(page.offset() as usize)
        .take(page.limit as usize)
        .collect();
    Page::new(docs, total, &page)
}

fn directed(ordering: Ordering, direction: SortDirection) -> Ordering {
    match direction {
        SortDirection::Asc => ordering,
        SortDirection::Desc => ordering.reverse(),
    }
}

fn compare_videos(a: &Video, b: &Video, sort: SortSpec<VideoSortField>) -> Ordering {
    let primary = match sort.field {
        VideoSortField::CreatedAt => a.created_at.cmp(&b.created_at),
        VideoSortField::Title => a.title.cmp(&b.title),
        VideoSortField::Views => a.views.cmp(&b.views),
        VideoSortField::Duration => a.duration.total_cmp(&b.duration),
    };
    directed(primary.then_with(|| a.id.cmp(&b.id)), sort.direction)
}

/// Shared in-memory store. Clones share state.
#[derive(Clone, Default)]
pub struct InMemoryDatabase {
    state: Arc<Mutex<State>>,
    unavailable: Arc<AtomicBool>,
}

impl InMemoryDatabase {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Register a user profile, as the account service would.
    pub fn add_user(&self, username: &str, full_name: &str) -> UserProfile {
        let user = UserProfile {
            id: Uuid::new_v4(),
            username: username.to_string(),
            full_name: full_name.to_string(),
            avatar: Some(format!("https://avatars.example.com/{}.png", username)),
            email: format!("{}@example.com", username),
        };
        self.state().users.insert(user.id, user.clone());
        user
    }

    /// Make health checks fail until reset.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, AtomicOrdering::SeqCst);
    }

    pub fn orphaned_assets(&self) -> Vec<OrphanedAsset> {
        self.state().orphaned_assets.clone()
    }

    pub fn like_count(&self, target: LikeTarget) -> usize {
        self.state()
            .likes
            .iter()
            .filter(|like| like.target() == Some(target))
            .count()
    }
}

#[async_trait]
impl VideoRepository for InMemoryDatabase {
    async fn list(
        &self,
        filter: &VideoFilter,
        sort: SortSpec<VideoSortField>,
        page: PageRequest,
    ) -> Result<Page<Video>, AppError> {
        let needle = filter
            .query
            .as_deref()
            .map(|q| q.trim().to_lowercase())
            .filter(|q| !q.is_empty());

        let mut videos: Vec<Video> = self
            .state()
            .videos
            .values()
            .filter(|v| filter.owner_id.map_or(true, |owner| v.owner_id == owner))
            .filter(|v| {
                needle.as_deref().map_or(true, |n| {
                    v.title.to_lowercase().contains(n) || v.description.to_lowercase().contains(n)
                })
            })
            .cloned()
            .collect();
        videos.sort_by(|a, b| compare_videos(a, b, sort));

        Ok(paginate(videos, page))
    }

    async fn create(&self, video: NewVideo) -> Result<Video, AppError> {
        let mut state = self.state();
        let now = state.now();
        let created = Video {
            id: Uuid::new_v4(),
            title: video.title,
            description: video.description,
            owner_id: video.owner_id,
            video_file: video.video_file,
            thumbnail: video.thumbnail,
            duration: video.duration,
            views: 0,
            is_published: true,
            created_at: now,
            updated_at: now,
        };
        state.videos.insert(created.id, created.clone());
        Ok(created)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Video>, AppError> {
        Ok(self.state().videos.get(&id).cloned())
    }

    async fn find_details(&self, id: Uuid) -> Result<Option<VideoDetails>, AppError> {
        let state = self.state();
        Ok(state.videos.get(&id).map(|v| {
            let owner = state.users.get(&v.owner_id);
            VideoDetails {
                id: v.id,
                title: v.title.clone(),
                description: v.description.clone(),
                video_file: v.video_file.clone(),
                thumbnail: v.thumbnail.clone(),
                duration: v.duration,
                views: v.views,
                is_published: v.is_published,
                created_at: v.created_at,
                updated_at: v.updated_at,
                username: owner.map(|u| u.username.clone()),
                full_name: owner.map(|u| u.full_name.clone()),
                avatar: owner.and_then(|u| u.avatar.clone()),
                email: owner.map(|u| u.email.clone()),
            }
        }))
    }

    async fn exists(&self, id: Uuid) -> Result<bool, AppError> {
        Ok(self.state().videos.contains_key(&id))
    }

    async fn update_fields(
        &self,
        id: Uuid,
        owner_id: Uuid,
        changes: &VideoChanges,
    ) -> Result<Option<Video>, AppError> {
        let mut state = self.state();
        let now = state.now();
        Ok(state
            .videos
            .get_mut(&id)
            .filter(|v| v.owner_id == owner_id)
            .map(|v| {
                if let Some(title) = &changes.title {
                    v.title = title.clone();
                }
                if let Some(description) = &changes.description {
                    v.description = description.clone();
                }
                if let Some(thumbnail) = &changes.thumbnail {
                    v.thumbnail = thumbnail.clone();
                }
                v.updated_at = now;
                v.clone()
            }))
    }

    async fn toggle_publish(&self, id: Uuid, owner_id: Uuid) -> Result<Option<Video>, AppError> {
        let mut state = self.state();
        let now = state.now();
        Ok(state
            .videos
            .get_mut(&id)
            .filter(|v| v.owner_id == owner_id)
            .map(|v| {
                v.is_published = !v.is_published;
                v.updated_at = now;
                v.clone()
            }))
    }

    async fn delete_owned(&self, id: Uuid, owner_id: Uuid) -> Result<Option<Video>, AppError> {
        let mut state = self.state();
        match state.videos.get(&id) {
            Some(v) if v.owner_id == owner_id => Ok(state.videos.remove(&id)),
            _ => Ok(None),
        }
    }
}

#[async_trait]
impl CommentRepository for InMemoryDatabase {
    async fn list_for_video(
        &self,
        video_id: Uuid,
        page: PageRequest,
    ) -> Result<Page<CommentWithOwner>, AppError> {
        let state = self.state();
        let mut comments: Vec<&Comment> = state
            .comments
            .values()
            .filter(|c| c.video_id == video_id)
            .collect();
        comments.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| b.id.cmp(&a.id)));

        let with_owner = comments
            .into_iter()
            .map(|c| CommentWithOwner {
                comment: c.clone(),
                owner_details: state.owner_summary(c.owner_id),
            })
            .collect();
        Ok(paginate(with_owner, page))
    }

    async fn create(
        &self,
        video_id: Uuid,
        owner_id: Uuid,
        content: &str,
    ) -> Result<Comment, AppError> {
        let mut state = self.state();
        let now = state.now();
        let comment = Comment {
            id: Uuid::new_v4(),
            content: content.to_string(),
            video_id,
            owner_id,
            version: 0,
            created_at: now,
            updated_at: now,
        };
        state.comments.insert(comment.id, comment.clone());
        Ok(comment)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Comment>, AppError> {
        Ok(self.state().comments.get(&id).cloned())
    }

    async fn update_content(
        &self,
        id: Uuid,
        expected_version: i32,
        content: &str,
    ) -> Result<Option<Comment>, AppError> {
        let mut state = self.state();
        let now = state.now();
        Ok(state
            .comments
            .get_mut(&id)
            .filter(|c| c.version == expected_version)
            .map(|c| {
                c.content = content.to_string();
                c.version += 1;
                c.updated_at = now;
                c.clone()
            }))
    }

    async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        Ok(self.state().comments.remove(&id).is_some())
    }
}

#[async_trait]
impl TweetRepository for InMemoryDatabase {
    async fn list_for_owner(
        &self,
        owner_id: Uuid,
        page: PageRequest,
    ) -> Result<Page<Tweet>, AppError> {
        let mut tweets: Vec<Tweet> = self
            .state()
            .tweets
            .values()
            .filter(|t| t.owner_id == owner_id)
            .cloned()
            .collect();
        tweets.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| b.id.cmp(&a.id)));
        Ok(paginate(tweets, page))
    }

    async fn create(&self, owner_id: Uuid, content: &str) -> Result<Tweet, AppError> {
        let mut state = self.state();
        let now = state.now();
        let tweet = Tweet {
            id: Uuid::new_v4(),
            content: content.to_string(),
            owner_id,
            version: 0,
            created_at: now,
            updated_at: now,
        };
        state.tweets.insert(tweet.id, tweet.clone());
        Ok(tweet)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Tweet>, AppError> {
        Ok(self.state().tweets.get(&id).cloned())
    }

    async fn update_content(
        &self,
        id: Uuid,
        expected_version: i32,
        content: &str,
    ) -> Result<Option<Tweet>, AppError> {
        let mut state = self.state();
        let now = state.now();
        Ok(state
            .tweets
            .get_mut(&id)
            .filter(|t| t.version == expected_version)
            .map(|t| {
                t.content = content.to_string();
                t.version += 1;
                t.updated_at = now;
                t.clone()
            }))
    }

    async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        Ok(self.state().tweets.remove(&id).is_some())
    }
}

#[async_trait]
impl LikeRepository for InMemoryDatabase {
    async fn target_exists(&self, target: LikeTarget) -> Result<bool, AppError> {
        let state = self.state();
        Ok(match target {
            LikeTarget::Video(id) => state.videos.contains_key(&id),
            LikeTarget::Comment(id) => state.comments.contains_key(&id),
            LikeTarget::Tweet(id) => state.tweets.contains_key(&id),
        })
    }

    async fn toggle(&self, actor: Uuid, target: LikeTarget) -> Result<ToggleOutcome, AppError> {
        let mut state = self.state();
        let existing = state
            .likes
            .iter()
            .position(|like| like.liked_by == actor && like.target() == Some(target));

        match existing {
            Some(index) => {
                state.likes.remove(index);
                Ok(ToggleOutcome::Removed)
            }
            None => {
                let created_at = state.now();
                let (video_id, comment_id, tweet_id) = match target {
                    LikeTarget::Video(id) => (Some(id), None, None),
                    LikeTarget::Comment(id) => (None, Some(id), None),
                    LikeTarget::Tweet(id) => (None, None, Some(id)),
                };
                state.likes.push(Like {
                    id: Uuid::new_v4(),
                    liked_by: actor,
                    video_id,
                    comment_id,
                    tweet_id,
                    created_at,
                });
                Ok(ToggleOutcome::Added)
            }
        }
    }

    async fn liked_videos(
        &self,
        actor: Uuid,
        page: PageRequest,
    ) -> Result<Page<LikedVideo>, AppError> {
        let state = self.state();
        let mut liked: Vec<LikedVideo> = state
            .likes
            .iter()
            .filter(|like| like.liked_by == actor)
            .filter_map(|like| {
                let video_id = like.video_id?;
                let video = state.videos.get(&video_id);
                Some(LikedVideo {
                    like_id: like.id,
                    video_id,
                    title: video.map(|v| v.title.clone()),
                    thumbnail: video.map(|v| v.thumbnail.clone()),
                    liked_at: like.created_at,
                })
            })
            .collect();
        liked.sort_by(|a, b| b.liked_at.cmp(&a.liked_at).then_with(|| b.like_id.cmp(&a.like_id)));
        Ok(paginate(liked, page))
    }
}

#[async_trait]
impl PlaylistRepository for InMemoryDatabase {
    async fn create(
        &self,
        owner_id: Uuid,
        name: &str,
        description: &str,
    ) -> Result<Playlist, AppError> {
        let mut state = self.state();
        if state
            .playlists
            .values()
            .any(|p| p.owner_id == owner_id && p.name == name)
        {
            return Err(AppError::Conflict(DUPLICATE_PLAYLIST.to_string()));
        }

        let now = state.now();
        let playlist = Playlist {
            id: Uuid::new_v4(),
            name: name.to_string(),
            description: description.to_string(),
            owner_id,
            videos: Vec::new(),
            version: 0,
            created_at: now,
            updated_at: now,
        };
        state.playlists.insert(playlist.id, playlist.clone());
        Ok(playlist)
    }

    async fn list_for_owner(&self, owner_id: Uuid) -> Result<Vec<Playlist>, AppError> {
        let mut playlists: Vec<Playlist> = self
            .state()
            .playlists
            .values()
            .filter(|p| p.owner_id == owner_id)
            .cloned()
            .collect();
        playlists.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| b.id.cmp(&a.id)));
        Ok(playlists)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Playlist>, AppError> {
        Ok(self.state().playlists.get(&id).cloned())
    }

    async fn update(
        &self,
        id: Uuid,
        expected_version: i32,
        name: Option<&str>,
        description: Option<&str>,
    ) -> Result<Option<Playlist>, AppError> {
        let mut state = self.state();
        let Some(current) = state.playlists.get(&id) else {
            return Ok(None);
        };
        if current.version != expected_version {
            return Ok(None);
        }
        if let Some(name) = name {
            let owner_id = current.owner_id;
            if state
                .playlists
                .values()
                .any(|p| p.id != id && p.owner_id == owner_id && p.name == name)
            {
                return Err(AppError::Conflict(DUPLICATE_PLAYLIST.to_string()));
            }
        }

        let now = state.now();
        Ok(state.playlists.get_mut(&id).map(|p| {
            if let Some(name) = name {
                p.name = name.to_string();
            }
            if let Some(description) = description {
                p.description = description.to_string();
            }
            p.version += 1;
            p.updated_at = now;
            p.clone()
        }))
    }

    async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        Ok(self.state().playlists.remove(&id).is_some())
    }

    async fn add_video(&self, id: Uuid, video_id: Uuid) -> Result<MembershipChange, AppError> {
        let mut state = self.state();
        let now = state.now();
        Ok(match state.playlists.get_mut(&id) {
            Some(p) if !p.videos.contains(&video_id) => {
                p.videos.push(video_id);
                p.version += 1;
                p.updated_at = now;
                MembershipChange::Applied
            }
            Some(_) => MembershipChange::Unchanged,
            None => MembershipChange::PlaylistMissing,
        })
    }

    async fn remove_video(
        &self,
        id: Uuid,
        video_id: Uuid,
    ) -> Result<MembershipChange, AppError> {
        let mut state = self.state();
        let now = state.now();
        Ok(match state.playlists.get_mut(&id) {
            Some(p) if p.videos.contains(&video_id) => {
                p.videos.retain(|v| *v != video_id);
                p.version += 1;
                p.updated_at = now;
                MembershipChange::Applied
            }
            Some(_) => MembershipChange::Unchanged,
            None => MembershipChange::PlaylistMissing,
        })
    }
}

#[async_trait]
impl OrphanedAssetRepository for InMemoryDatabase {
    async fn record(
        &self,
        url: &str,
        reason: &str,
        error: Option<&str>,
    ) -> Result<OrphanedAsset, AppError> {
        let mut state = self.state();
        let now = state.now();
        let asset = OrphanedAsset {
            id: Uuid::new_v4(),
            url: url.to_string(),
            reason: reason.to_string(),
            attempts: 0,
            last_error: error.map(str::to_string),
            created_at: now,
            resolved_at: None,
        };
        state.orphaned_assets.push(asset.clone());
        Ok(asset)
    }

    async fn pending(&self, limit: i64) -> Result<Vec<OrphanedAsset>, AppError> {
        let mut pending: Vec<OrphanedAsset> = self
            .state()
            .orphaned_assets
            .iter()
            .filter(|a| a.resolved_at.is_none())
            .cloned()
            .collect();
        pending.sort_by_key(|a| (a.attempts, a.created_at));
        pending.truncate(limit.max(0) as usize);
        Ok(pending)
    }

    async fn mark_resolved(&self, id: Uuid) -> Result<(), AppError> {
        let mut state = self.state();
        let now = state.now();
        if let Some(asset) = state.orphaned_assets.iter_mut().find(|a| a.id == id) {
            asset.attempts += 1;
            asset.resolved_at = Some(now);
        }
        Ok(())
    }

    async fn record_failure(&self, id: Uuid, error: &str) -> Result<(), AppError> {
        if let Some(asset) = self.state().orphaned_assets.iter_mut().find(|a| a.id == id) {
            asset.attempts += 1;
            asset.last_error = Some(error.to_string());
        }
        Ok(())
    }
}

#[async_trait]
impl HealthCheck for InMemoryDatabase {
    async fn ping(&self) -> Result<(), AppError> {
        if self.unavailable.load(AtomicOrdering::SeqCst) {
            return Err(AppError::Internal("database unavailable".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_toggle_alternates() {
        let db = InMemoryDatabase::new();
        let actor = Uuid::new_v4();
        let target = LikeTarget::Tweet(Uuid::new_v4());

        let outcomes = [
            db.toggle(actor, target).await.unwrap(),
            db.toggle(actor, target).await.unwrap(),
            db.toggle(actor, target).await.unwrap(),
        ];
        assert_eq!(
            outcomes,
            [ToggleOutcome::Added, ToggleOutcome::Removed, ToggleOutcome::Added]
        );
        assert_eq!(db.like_count(target), 1);
    }

    #[tokio::test]
    async fn test_concurrent_toggles_never_duplicate() {
        let db = InMemoryDatabase::new();
        let actor = Uuid::new_v4();
        let target = LikeTarget::Video(Uuid::new_v4());

        let handles: Vec<_> = (0..16)
            .map(|_| {
                let db = db.clone();
                tokio::spawn(async move { db.toggle(actor, target).await.unwrap() })
            })
            .collect();
        for handle in handles {
            handle.await.unwrap();
        }

        assert!(db.like_count(target) <= 1);
    }

    #[tokio::test]
    async fn test_playlist_membership_is_a_set() {
        let db = InMemoryDatabase::new();
        let owner = Uuid::new_v4();
        let playlist = PlaylistRepository::create(&db, owner, "Mix", "desc").await.unwrap();
        let video = Uuid::new_v4();

        use MembershipChange::*;
        assert_eq!(db.add_video(playlist.id, video).await.unwrap(), Applied);
        assert_eq!(db.add_video(playlist.id, video).await.unwrap(), Unchanged);
        assert_eq!(db.remove_video(playlist.id, video).await.unwrap(), Applied);
        assert_eq!(db.remove_video(playlist.id, video).await.unwrap(), Unchanged);
        assert_eq!(db.add_video(playlist.id, video).await.unwrap(), Applied);
    }

    #[tokio::test]
    async fn test_membership_change_on_deleted_playlist() {
        let db = InMemoryDatabase::new();
        let playlist = PlaylistRepository::create(&db, Uuid::new_v4(), "Mix", "desc")
            .await
            .unwrap();
        let video = Uuid::new_v4();
        assert!(PlaylistRepository::delete(&db, playlist.id).await.unwrap());

        assert_eq!(
            db.add_video(playlist.id, video).await.unwrap(),
            MembershipChange::PlaylistMissing
        );
        assert_eq!(
            db.remove_video(playlist.id, video).await.unwrap(),
            MembershipChange::PlaylistMissing
        );
    }

    #[tokio::test]
    async fn test_stale_version_is_rejected() {
        let db = InMemoryDatabase::new();
        let tweet = TweetRepository::create(&db, Uuid::new_v4(), "first").await.unwrap();

        let updated = TweetRepository::update_content(&db, tweet.id, tweet.version, "second")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.version, tweet.version + 1);

        let stale = TweetRepository::update_content(&db, tweet.id, tweet.version, "third")
            .await
            .unwrap();
        assert!(stale.is_none());
    }

    #[tokio::test]
    async fn test_video_list_filters_and_sorts() {
        let db = InMemoryDatabase::new();
        let owner = Uuid::new_v4();
        for (title, views) in [("Cat video", 5), ("Dog video", 50), ("CATS again", 10)] {
            let video = VideoRepository::create(
                &db,
                NewVideo {
                    title: title.to_string(),
                    description: "desc".to_string(),
                    owner_id: owner,
                    video_file: "v".to_string(),
                    thumbnail: "t".to_string(),
                    duration: 1.0,
                },
            )
            .await
            .unwrap();
            db.state().videos.get_mut(&video.id).unwrap().views = views;
        }

        let filter = VideoFilter {
            query: Some("cat".to_string()),
            owner_id: None,
        };
        let sort = SortSpec::from_raw(Some("views"), Some("1")).unwrap();
        let page = db.list(&filter, sort, PageRequest::default()).await.unwrap();

        let titles: Vec<_> = page.docs.iter().map(|v| v.title.as_str()).collect();
        assert_eq!(titles, ["Cat video", "CATS again"]);
        assert_eq!(page.total_docs, 2);
    }
}
