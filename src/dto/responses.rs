use crate::{
    models::{Comment, Group, Post, User},
    store::Store,
    urls,
};
use serde::Serialize;
use uuid::Uuid;

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: UserResponse,
}

#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub email: String,
    pub username: String,
    pub created_at: i64,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            username: user.username,
            created_at: user.created_at,
        }
    }
}

/// Public face of a user: no email, no password hash.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct AuthorView {
    pub id: Uuid,
    pub username: String,
}

impl From<&User> for AuthorView {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct GroupView {
    pub id: u64,
    pub title: String,
    pub slug: String,
    pub description: String,
}

impl From<Group> for GroupView {
    fn from(group: Group) -> Self {
        Self {
            id: group.id,
            title: group.title,
            slug: group.slug,
            description: group.description,
        }
    }
}

/// Option of the group `<select>` on the post form.
#[derive(Debug, Clone, Serialize)]
pub struct GroupChoice {
    pub id: u64,
    pub title: String,
}

/// A post with its relations resolved for rendering.
#[derive(Debug, Clone, Serialize)]
pub struct PostView {
    pub id: u64,
    pub text: String,
    pub author: AuthorView,
    pub group: Option<GroupView>,
    pub image: Option<String>,
    pub image_url: Option<String>,
    pub comment_count: usize,
    pub created_at: i64,
}

impl PostView {
    pub fn build(store: &Store, post: Post) -> Self {
        // Authors are never removed, but a dangling id still renders.
        let author = store
            .user(&post.author_id)
            .map(|user| AuthorView::from(&user))
            .unwrap_or_else(|| AuthorView {
                id: post.author_id,
                username: String::new(),
            });

        Self {
            id: post.id,
            author,
            group: post.group_id.and_then(|id| store.group(id)).map(GroupView::from),
            image_url: post.image.as_deref().map(urls::media),
            image: post.image,
            comment_count: store.comment_count(post.id),
            created_at: post.created_at,
            text: post.text,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CommentView {
    pub id: u64,
    pub text: String,
    pub author: AuthorView,
    pub created_at: i64,
}

impl CommentView {
    pub fn build(store: &Store, comment: Comment) -> Self {
        let author = store
            .user(&comment.author_id)
            .map(|user| AuthorView::from(&user))
            .unwrap_or_else(|| AuthorView {
                id: comment.author_id,
                username: String::new(),
            });

        Self {
            id: comment.id,
            text: comment.text,
            author,
            created_at: comment.created_at,
        }
    }
}
