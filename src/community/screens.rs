//! Feed, events, transfers and search screens
//!
//! Each screen holds a local copy of what it shows. Toggles update that copy
//! first and roll it back when the repository rejects the change.

use crate::community::optimistic::apply_with_rollback;
use crate::community::{
    CommunityRepository, CreateEventRequest, CreatePostRequest, CreateTransferRequest, Event,
    Post, SearchHit, Transfer, TransferKind, User,
};
use crate::error::{Error, Result};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

fn toggled_count(count: u32, now_on: bool) -> u32 {
    if now_on {
        count + 1
    } else {
        count.saturating_sub(1)
    }
}

/// Home feed
pub struct FeedScreen {
    repo: Arc<dyn CommunityRepository>,
    posts: Vec<Post>,
}

impl FeedScreen {
    pub fn new(repo: Arc<dyn CommunityRepository>) -> Self {
        let posts = repo.posts();
        Self { repo, posts }
    }

    pub fn posts(&self) -> &[Post] {
        &self.posts
    }

    /// Reload from the repository
    pub fn refresh(&mut self) {
        self.posts = self.repo.posts();
    }

    /// Flip the like flag on a post
    pub fn toggle_like(&mut self, id: &str) -> Result<Post> {
        let index = self
            .posts
            .iter()
            .position(|p| p.id == id)
            .ok_or_else(|| Error::NotFound(format!("Post not found: {}", id)))?;

        let repo = &self.repo;
        let committed = apply_with_rollback(
            &mut self.posts[index],
            |post| {
                post.is_liked = !post.is_liked;
                post.likes = toggled_count(post.likes, post.is_liked);
            },
            |post| repo.set_post_liked(&post.id, post.is_liked),
        )?;

        self.posts[index] = committed.clone();
        Ok(committed)
    }

    pub fn create(&mut self, request: &CreatePostRequest) -> Result<Post> {
        let post = self.repo.create_post(request.validate()?)?;
        self.posts.insert(0, post.clone());
        Ok(post)
    }
}

/// Upcoming events
pub struct EventsScreen {
    repo: Arc<dyn CommunityRepository>,
    events: Vec<Event>,
}

impl EventsScreen {
    pub fn new(repo: Arc<dyn CommunityRepository>) -> Self {
        let events = repo.events();
        Self { repo, events }
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn refresh(&mut self) {
        self.events = self.repo.events();
    }

    /// Join or leave an event
    pub fn toggle_join(&mut self, id: &str) -> Result<Event> {
        let index = self
            .events
            .iter()
            .position(|e| e.id == id)
            .ok_or_else(|| Error::NotFound(format!("Event not found: {}", id)))?;

        let repo = &self.repo;
        let committed = apply_with_rollback(
            &mut self.events[index],
            |event| {
                event.is_joined = !event.is_joined;
                event.participants = toggled_count(event.participants, event.is_joined);
            },
            |event| repo.set_event_joined(&event.id, event.is_joined),
        )?;

        self.events[index] = committed.clone();
        Ok(committed)
    }

    pub fn create(&mut self, request: &CreateEventRequest) -> Result<Event> {
        let event = self.repo.create_event(request.validate()?)?;
        self.events.push(event.clone());
        Ok(event)
    }
}

/// Which transfer listings to show
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TransferFilter {
    #[default]
    All,
    PlayersSeeking,
    TeamsSeeking,
}

impl TransferFilter {
    pub fn matches(&self, transfer: &Transfer) -> bool {
        match self {
            TransferFilter::All => true,
            TransferFilter::PlayersSeeking => transfer.kind == TransferKind::PlayerSeeking,
            TransferFilter::TeamsSeeking => transfer.kind == TransferKind::TeamSeeking,
        }
    }
}

impl fmt::Display for TransferFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransferFilter::All => write!(f, "All"),
            TransferFilter::PlayersSeeking => write!(f, "Players Seeking"),
            TransferFilter::TeamsSeeking => write!(f, "Teams Seeking"),
        }
    }
}

impl FromStr for TransferFilter {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().replace([' ', '-'], "_").as_str() {
            "" | "all" => Ok(TransferFilter::All),
            "players_seeking" | "player_seeking" | "players" => Ok(TransferFilter::PlayersSeeking),
            "teams_seeking" | "team_seeking" | "teams" => Ok(TransferFilter::TeamsSeeking),
            _ => Err(format!("Unknown transfer filter: {}", s)),
        }
    }
}

/// Transfer market
pub struct TransfersScreen {
    repo: Arc<dyn CommunityRepository>,
    transfers: Vec<Transfer>,
    filter: TransferFilter,
}

impl TransfersScreen {
    pub fn new(repo: Arc<dyn CommunityRepository>) -> Self {
        let transfers = repo.transfers();
        Self {
            repo,
            transfers,
            filter: TransferFilter::All,
        }
    }

    pub fn filter(&self) -> TransferFilter {
        self.filter
    }

    pub fn set_filter(&mut self, filter: TransferFilter) {
        self.filter = filter;
    }

    /// Listings passing the active filter
    pub fn visible(&self) -> Vec<&Transfer> {
        self.transfers
            .iter()
            .filter(|t| self.filter.matches(t))
            .collect()
    }

    pub fn refresh(&mut self) {
        self.transfers = self.repo.transfers();
    }

    pub fn create(&mut self, request: &CreateTransferRequest) -> Result<Transfer> {
        let transfer = self.repo.create_transfer(request.validate()?)?;
        self.transfers.insert(0, transfer.clone());
        Ok(transfer)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchCategory {
    #[default]
    All,
    Posts,
    Events,
    Transfers,
    Users,
}

impl SearchCategory {
    pub const ALL: [SearchCategory; 5] = [
        SearchCategory::All,
        SearchCategory::Posts,
        SearchCategory::Events,
        SearchCategory::Transfers,
        SearchCategory::Users,
    ];

    fn includes(&self, other: SearchCategory) -> bool {
        *self == SearchCategory::All || *self == other
    }
}

impl fmt::Display for SearchCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SearchCategory::All => "All",
            SearchCategory::Posts => "Posts",
            SearchCategory::Events => "Events",
            SearchCategory::Transfers => "Transfers",
            SearchCategory::Users => "Users",
        };
        write!(f, "{}", name)
    }
}

impl FromStr for SearchCategory {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        SearchCategory::ALL
            .into_iter()
            .find(|c| c.to_string().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("Unknown search category: {}", s))
    }
}

fn any_contains<'a>(fields: impl IntoIterator<Item = &'a str>, needle: &str) -> bool {
    fields
        .into_iter()
        .any(|field| field.to_lowercase().contains(needle))
}

fn user_matches(user: &User, needle: &str) -> bool {
    any_contains([user.name.as_str(), user.club.as_str(), user.position.as_str()], needle)
}

/// Case-insensitive search across the community.
///
/// A blank query matches everything in the category. Hits come grouped by
/// kind: posts, events, transfers, then users.
pub fn search_community(
    repo: &dyn CommunityRepository,
    query: &str,
    category: SearchCategory,
) -> Vec<SearchHit> {
    let needle = query.trim().to_lowercase();
    let mut hits = Vec::new();

    if category.includes(SearchCategory::Posts) {
        hits.extend(
            repo.posts()
                .into_iter()
                .filter(|p| any_contains([p.content.as_str(), p.user.name.as_str()], &needle))
                .map(SearchHit::Post),
        );
    }

    if category.includes(SearchCategory::Events) {
        hits.extend(
            repo.events()
                .into_iter()
                .filter(|e| {
                    any_contains(
                        [
                            e.title.as_str(),
                            e.club.as_str(),
                            e.address.as_str(),
                            e.game.as_str(),
                        ],
                        &needle,
                    )
                })
                .map(SearchHit::Event),
        );
    }

    if category.includes(SearchCategory::Transfers) {
        hits.extend(
            repo.transfers()
                .into_iter()
                .filter(|t| {
                    any_contains(
                        [
                            t.description.as_str(),
                            t.position.as_deref().unwrap_or_default(),
                            t.location.as_deref().unwrap_or_default(),
                            t.user.name.as_str(),
                        ],
                        &needle,
                    )
                })
                .map(SearchHit::Transfer),
        );
    }

    if category.includes(SearchCategory::Users) {
        hits.extend(
            repo.users()
                .into_iter()
                .filter(|u| user_matches(u, &needle))
                .map(SearchHit::User),
        );
    }

    hits
}

/// Community search
pub struct SearchScreen {
    repo: Arc<dyn CommunityRepository>,
    query: String,
    category: SearchCategory,
}

impl SearchScreen {
    pub fn new(repo: Arc<dyn CommunityRepository>) -> Self {
        Self {
            repo,
            query: String::new(),
            category: SearchCategory::All,
        }
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
    }

    pub fn category(&self) -> SearchCategory {
        self.category
    }

    pub fn set_category(&mut self, category: SearchCategory) {
        self.category = category;
    }

    pub fn results(&self) -> Vec<SearchHit> {
        search_community(self.repo.as_ref(), &self.query, self.category)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::community::requests::{NewEvent, NewPost, NewTransfer};
    use crate::community::{InMemoryRepository, PostKind};

    /// Reads from seeded data but rejects every write
    struct OfflineRepository(InMemoryRepository);

    impl CommunityRepository for OfflineRepository {
        fn current_user(&self) -> User {
            self.0.current_user()
        }
        fn users(&self) -> Vec<User> {
            self.0.users()
        }
        fn posts(&self) -> Vec<Post> {
            self.0.posts()
        }
        fn events(&self) -> Vec<Event> {
            self.0.events()
        }
        fn transfers(&self) -> Vec<Transfer> {
            self.0.transfers()
        }
        fn create_post(&self, _post: NewPost) -> Result<Post> {
            Err(Error::Server("offline".to_string()))
        }
        fn create_event(&self, _event: NewEvent) -> Result<Event> {
            Err(Error::Server("offline".to_string()))
        }
        fn create_transfer(&self, _transfer: NewTransfer) -> Result<Transfer> {
            Err(Error::Server("offline".to_string()))
        }
        fn set_post_liked(&self, _id: &str, _liked: bool) -> Result<Post> {
            Err(Error::Server("offline".to_string()))
        }
        fn set_event_joined(&self, _id: &str, _joined: bool) -> Result<Event> {
            Err(Error::Server("offline".to_string()))
        }
        fn toggle_post_like(&self, _id: &str) -> Result<Post> {
            Err(Error::Server("offline".to_string()))
        }
        fn toggle_event_join(&self, _id: &str) -> Result<Event> {
            Err(Error::Server("offline".to_string()))
        }
    }

    fn seeded() -> Arc<dyn CommunityRepository> {
        Arc::new(InMemoryRepository::seeded())
    }

    fn offline() -> Arc<dyn CommunityRepository> {
        Arc::new(OfflineRepository(InMemoryRepository::seeded()))
    }

    #[test]
    fn test_toggle_like() {
        let repo = seeded();
        let mut feed = FeedScreen::new(repo.clone());

        let post = feed.toggle_like("1").unwrap();
        assert!(post.is_liked);
        assert_eq!(post.likes, 25);
        assert!(repo.posts()[0].is_liked);

        // Already liked post gets unliked
        let post = feed.toggle_like("2").unwrap();
        assert!(!post.is_liked);
        assert_eq!(post.likes, 44);
    }

    #[test]
    fn test_toggle_like_rolls_back() {
        let mut feed = FeedScreen::new(offline());
        let err = feed.toggle_like("1").unwrap_err();
        assert!(matches!(err, Error::Server(_)));

        let post = &feed.posts()[0];
        assert!(!post.is_liked);
        assert_eq!(post.likes, 24);
    }

    #[test]
    fn test_toggle_unknown_post() {
        let mut feed = FeedScreen::new(seeded());
        assert!(matches!(feed.toggle_like("42"), Err(Error::NotFound(_))));
    }

    #[test]
    fn test_toggle_join() {
        let mut screen = EventsScreen::new(seeded());
        let event = screen.toggle_join("1").unwrap();
        assert!(event.is_joined);
        assert_eq!(event.participants, 19);

        let event = screen.toggle_join("2").unwrap();
        assert!(!event.is_joined);
        assert_eq!(event.participants, 11);
    }

    #[test]
    fn test_toggle_join_rolls_back() {
        let mut screen = EventsScreen::new(offline());
        assert!(screen.toggle_join("2").is_err());
        assert!(screen.events()[1].is_joined);
        assert_eq!(screen.events()[1].participants, 12);
    }

    #[test]
    fn test_create_post_rejects_blank() {
        let repo = seeded();
        let mut feed = FeedScreen::new(repo.clone());
        let request = CreatePostRequest {
            content: "\n".to_string(),
            kind: PostKind::Text,
        };
        assert!(matches!(feed.create(&request), Err(Error::Validation(_))));
        assert_eq!(repo.posts().len(), 3);
    }

    #[test]
    fn test_create_post_prepends() {
        let mut feed = FeedScreen::new(seeded());
        let request = CreatePostRequest {
            content: "Kreisliga derby this Sunday".to_string(),
            kind: PostKind::Reel,
        };
        let post = feed.create(&request).unwrap();
        assert_eq!(feed.posts()[0].id, post.id);
        assert_eq!(feed.posts().len(), 4);
    }

    #[test]
    fn test_transfer_filter() {
        let mut screen = TransfersScreen::new(seeded());
        assert_eq!(screen.visible().len(), 2);

        screen.set_filter(TransferFilter::PlayersSeeking);
        let visible = screen.visible();
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].position.as_deref(), Some("Midfielder"));

        screen.set_filter(TransferFilter::TeamsSeeking);
        assert_eq!(screen.visible()[0].location.as_deref(), Some("Reeßum"));
    }

    #[test]
    fn test_transfer_filter_from_str() {
        assert_eq!(
            TransferFilter::from_str("Players Seeking").unwrap(),
            TransferFilter::PlayersSeeking
        );
        assert_eq!(
            TransferFilter::from_str("team_seeking").unwrap(),
            TransferFilter::TeamsSeeking
        );
        assert_eq!(TransferFilter::from_str("").unwrap(), TransferFilter::All);
        assert!(TransferFilter::from_str("loans").is_err());
    }

    #[test]
    fn test_search_is_case_insensitive() {
        let mut screen = SearchScreen::new(seeded());
        screen.set_query("CLEAN SHEET");
        screen.set_category(SearchCategory::Posts);

        let results = screen.results();
        assert_eq!(results.len(), 1);
        assert!(matches!(&results[0], SearchHit::Post(p) if p.id == "3"));
    }

    #[test]
    fn test_search_users_by_club() {
        let mut screen = SearchScreen::new(seeded());
        screen.set_query("bremen nord");
        screen.set_category(SearchCategory::Users);

        let results = screen.results();
        assert_eq!(results.len(), 1);
        assert!(matches!(&results[0], SearchHit::User(u) if u.name == "Tom Weber"));
    }

    #[test]
    fn test_search_all_spans_kinds() {
        let repo = seeded();
        let hits = search_community(repo.as_ref(), "reeßum", SearchCategory::All);

        assert!(hits.iter().any(|h| matches!(h, SearchHit::Event(_))));
        assert!(hits.iter().any(|h| matches!(h, SearchHit::Transfer(_))));
        assert!(hits.iter().any(|h| matches!(h, SearchHit::User(_))));
    }

    #[test]
    fn test_blank_query_lists_category() {
        let repo = seeded();
        let hits = search_community(repo.as_ref(), "  ", SearchCategory::Events);
        assert_eq!(hits.len(), 2);

        let hits = search_community(repo.as_ref(), "", SearchCategory::All);
        assert_eq!(hits.len(), 3 + 2 + 2 + 3);
    }

    #[test]
    fn test_search_category_from_str() {
        assert_eq!(
            SearchCategory::from_str("transfers").unwrap(),
            SearchCategory::Transfers
        );
        assert!(SearchCategory::from_str("clubs").is_err());
    }
}
