use crate::{
    errors::ApiError,
    models::{Comment, Follow, Group, Post, PostChanges, User},
};
use chrono::Utc;
use dashmap::{DashMap, mapref::entry::Entry};
use std::sync::atomic::{AtomicU64, Ordering};
use uuid::Uuid;

/// Which posts a listing shows.
#[derive(Debug, Clone, Copy)]
pub enum PostFilter {
    All,
    Group(u64),
    Author(Uuid),
    /// Posts whose author is followed by the given user.
    FollowedBy(Uuid),
}

/// Everything needed to persist a new post.
#[derive(Debug, Clone)]
pub struct NewPost {
    pub author_id: Uuid,
    pub text: String,
    pub group_id: Option<u64>,
    pub image: Option<String>,
}

/// In-memory relational store.
///
/// `DashMap` = Thread-safe HashMap
/// - Can be read/written from multiple threads simultaneously
/// - Uniqueness checks go through `entry()` so they are atomic per key
#[derive(Default)]
pub struct Store {
    users: DashMap<Uuid, User>,
    username_index: DashMap<String, Uuid>,
    email_index: DashMap<String, Uuid>, // Quick Lookup by Email
    groups: DashMap<u64, Group>,
    slug_index: DashMap<String, u64>,
    posts: DashMap<u64, Post>,
    comments: DashMap<u64, Comment>,
    follows: DashMap<(Uuid, Uuid), Follow>,
    group_seq: AtomicU64,
    post_seq: AtomicU64,
    comment_seq: AtomicU64,
}

fn next_id(seq: &AtomicU64) -> u64 {
    seq.fetch_add(1, Ordering::Relaxed) + 1
}

impl Store {
    pub fn new() -> Self {
        Self::default()
    }

    // ------------------------------------------------------------------
    // Users
    // ------------------------------------------------------------------

    pub fn create_user(
        &self,
        email: &str,
        username: &str,
        hashed_password: String,
    ) -> Result<User, ApiError> {
        let user = User {
            id: Uuid::new_v4(),
            email: email.to_string(),
            username: username.to_string(),
            hashed_password,
            created_at: Utc::now().timestamp(),
        };

        match self.email_index.entry(user.email.clone()) {
            Entry::Occupied(_) => return Err(ApiError::UserAlreadyExists),
            Entry::Vacant(slot) => {
                slot.insert(user.id);
            }
        }
        match self.username_index.entry(user.username.clone()) {
            Entry::Occupied(_) => {
                // Release the email reserved above.
                self.email_index.remove(&user.email);
                return Err(ApiError::UserAlreadyExists);
            }
            Entry::Vacant(slot) => {
                slot.insert(user.id);
            }
        }
        self.users.insert(user.id, user.clone());

        Ok(user)
    }

    pub fn user(&self, id: &Uuid) -> Option<User> {
        self.users.get(id).map(|user| user.clone())
    }

    pub fn user_by_username(&self, username: &str) -> Option<User> {
        let id = *self.username_index.get(username)?;
        self.user(&id)
    }

    // ------------------------------------------------------------------
    // Groups
    // ------------------------------------------------------------------

    pub fn create_group(
        &self,
        title: &str,
        slug: &str,
        description: &str,
    ) -> Result<Group, ApiError> {
        let id = match self.slug_index.entry(slug.to_string()) {
            Entry::Occupied(_) => {
                return Err(ApiError::Conflict(format!("Group slug '{}' is taken", slug)));
            }
            Entry::Vacant(slot) => {
                let id = next_id(&self.group_seq);
                slot.insert(id);
                id
            }
        };

        let group = Group {
            id,
            title: title.to_string(),
            slug: slug.to_string(),
            description: description.to_string(),
        };
        self.groups.insert(id, group.clone());

        Ok(group)
    }

    pub fn group(&self, id: u64) -> Option<Group> {
        self.groups.get(&id).map(|group| group.clone())
    }

    pub fn group_by_slug(&self, slug: &str) -> Option<Group> {
        let id = *self.slug_index.get(slug)?;
        self.group(id)
    }

    /// All groups, ordered by title.
    pub fn groups(&self) -> Vec<Group> {
        let mut groups: Vec<Group> = self.groups.iter().map(|entry| entry.value().clone()).collect();
        groups.sort_by(|a, b| a.title.cmp(&b.title).then(a.id.cmp(&b.id)));
        groups
    }

    // ------------------------------------------------------------------
    // Posts
    // ------------------------------------------------------------------

    pub fn create_post(&self, new_post: NewPost) -> Post {
        let post = Post {
            id: next_id(&self.post_seq),
            author_id: new_post.author_id,
            text: new_post.text,
            group_id: new_post.group_id,
            image: new_post.image,
            created_at: Utc::now().timestamp(),
        };
        self.posts.insert(post.id, post.clone());
        post
    }

    pub fn post(&self, id: u64) -> Option<Post> {
        self.posts.get(&id).map(|post| post.clone())
    }

    /// Applies `changes` in place. Returns the updated post, or `None` if it
    /// no longer exists.
    pub fn update_post(&self, id: u64, changes: PostChanges) -> Option<Post> {
        let mut post = self.posts.get_mut(&id)?;
        post.text = changes.text;
        post.group_id = changes.group_id;
        if let Some(image) = changes.image {
            post.image = Some(image);
        }
        Some(post.clone())
    }

    /// Removes a post together with its comments.
    pub fn delete_post(&self, id: u64) -> Option<Post> {
        let (_, post) = self.posts.remove(&id)?;
        self.comments.retain(|_, comment| comment.post_id != id);
        Some(post)
    }

    /// Posts matching `filter`, newest first.
    pub fn posts(&self, filter: PostFilter) -> Vec<Post> {
        let mut posts: Vec<Post> = self
            .posts
            .iter()
            .filter(|entry| self.matches(entry.value(), filter))
            .map(|entry| entry.value().clone())
            .collect();

        // Sort by creation date (newest first)
        posts.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        posts
    }

    fn matches(&self, post: &Post, filter: PostFilter) -> bool {
        match filter {
            PostFilter::All => true,
            PostFilter::Group(group_id) => post.group_id == Some(group_id),
            PostFilter::Author(author_id) => post.author_id == author_id,
            PostFilter::FollowedBy(user_id) => {
                self.follows.contains_key(&(user_id, post.author_id))
            }
        }
    }

    // ------------------------------------------------------------------
    // Comments
    // ------------------------------------------------------------------

    pub fn create_comment(&self, post_id: u64, author_id: Uuid, text: String) -> Comment {
        let comment = Comment {
            id: next_id(&self.comment_seq),
            post_id,
            author_id,
            text,
            created_at: Utc::now().timestamp(),
        };
        self.comments.insert(comment.id, comment.clone());
        comment
    }

    /// Comments on a post, oldest first.
    pub fn comments_for(&self, post_id: u64) -> Vec<Comment> {
        let mut comments: Vec<Comment> = self
            .comments
            .iter()
            .filter(|entry| entry.post_id == post_id)
            .map(|entry| entry.value().clone())
            .collect();
        comments.sort_by_key(|comment| comment.id);
        comments
    }

    pub fn comment_count(&self, post_id: u64) -> usize {
        self.comments
            .iter()
            .filter(|entry| entry.post_id == post_id)
            .count()
    }

    // ------------------------------------------------------------------
    // Follows
    // ------------------------------------------------------------------

    /// Creates the edge `user -> author`. Returns `false` when nothing was
    /// created: self-follow or an existing edge.
    pub fn follow(&self, user_id: Uuid, author_id: Uuid) -> bool {
        if user_id == author_id {
            return false;
        }
        match self.follows.entry((user_id, author_id)) {
            Entry::Occupied(_) => false,
            Entry::Vacant(slot) => {
                slot.insert(Follow {
                    user_id,
                    author_id,
                    created_at: Utc::now().timestamp(),
                });
                true
            }
        }
    }

    /// Removes the edge `user -> author` if present.
    pub fn unfollow(&self, user_id: Uuid, author_id: Uuid) -> bool {
        self.follows.remove(&(user_id, author_id)).is_some()
    }

    pub fn is_following(&self, user_id: Uuid, author_id: Uuid) -> bool {
        self.follows.contains_key(&(user_id, author_id))
    }

    pub fn follow_count(&self) -> usize {
        self.follows.len()
    }
}
