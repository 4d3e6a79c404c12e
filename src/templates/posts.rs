use super::{Template, html};
use crate::{
    dto::{AuthorView, CommentForm, CommentView, GroupView, PostForm, PostView},
    pagination::Page,
    urls,
};
use serde::Serialize;
use std::fmt::Write;

#[derive(Debug, Serialize)]
pub struct IndexContext {
    pub title: String,
    pub page_obj: Page<PostView>,
}

impl Template for IndexContext {
    const NAME: &'static str = "posts/index.html";

    fn title(&self) -> String {
        self.title.clone()
    }

    fn body(&self, out: &mut String) {
        let _ = writeln!(out, "<h1>{}</h1>", html::escape(&self.title));
        html::post_list(out, &self.page_obj);
    }
}

#[derive(Debug, Serialize)]
pub struct GroupListContext {
    pub group: GroupView,
    pub page_obj: Page<PostView>,
}

impl Template for GroupListContext {
    const NAME: &'static str = "posts/group_list.html";

    fn title(&self) -> String {
        format!("Group posts {}", self.group.title)
    }

    fn body(&self, out: &mut String) {
        let _ = writeln!(out, "<h1>{}</h1>", html::escape(&self.group.title));
        let _ = writeln!(out, "<p>{}</p>", html::linebreaks(&self.group.description));
        html::post_list(out, &self.page_obj);
    }
}

#[derive(Debug, Serialize)]
pub struct ProfileContext {
    pub author: AuthorView,
    pub page_obj: Page<PostView>,
    pub following: bool,
}

impl Template for ProfileContext {
    const NAME: &'static str = "posts/profile.html";

    fn title(&self) -> String {
        format!("Profile of {}", self.author.username)
    }

    fn body(&self, out: &mut String) {
        let username = &self.author.username;
        let _ = writeln!(out, "<h1>All posts of {}</h1>", html::escape(username));
        let _ = writeln!(out, "<h3>Posts: {}</h3>", self.page_obj.count);
        if self.following {
            let _ = writeln!(
                out,
                "<a class=\"unfollow\" href=\"{}\">Unfollow</a>",
                urls::profile_unfollow(username)
            );
        } else {
            let _ = writeln!(
                out,
                "<a class=\"follow\" href=\"{}\">Follow</a>",
                urls::profile_follow(username)
            );
        }
        html::post_list(out, &self.page_obj);
    }
}

#[derive(Debug, Serialize)]
pub struct PostDetailContext {
    pub post: PostView,
    pub comments: Vec<CommentView>,
    pub form: CommentForm,
}

impl Template for PostDetailContext {
    const NAME: &'static str = "posts/post_detail.html";

    fn title(&self) -> String {
        self.post.text.chars().take(30).collect()
    }

    fn body(&self, out: &mut String) {
        html::post_card(out, &self.post);
        let _ = writeln!(out, "<h3>Comments: {}</h3>", self.comments.len());
        for comment in &self.comments {
            let _ = writeln!(
                out,
                "<div class=\"comment\"><a href=\"{}\">{}</a> <span>{}</span><p>{}</p></div>",
                urls::profile(&comment.author.username),
                html::escape(&comment.author.username),
                html::date(comment.created_at),
                html::linebreaks(&comment.text),
            );
        }
        let _ = writeln!(
            out,
            "<form method=\"post\" action=\"{}\">\n<textarea name=\"text\">{}</textarea>",
            urls::add_comment(self.post.id),
            html::escape(&self.form.text),
        );
        html::field_errors(out, self.form.errors.get("text"));
        out.push_str("<button type=\"submit\">Send</button>\n</form>\n");
    }
}

/// Shared by the create and edit pages; `is_edit` tells them apart.
#[derive(Debug, Serialize)]
pub struct CreatePostContext {
    pub form: PostForm,
    pub is_edit: bool,
    pub post: Option<PostView>,
}

impl CreatePostContext {
    pub fn create(form: PostForm) -> Self {
        Self {
            form,
            is_edit: false,
            post: None,
        }
    }

    pub fn edit(form: PostForm, post: PostView) -> Self {
        Self {
            form,
            is_edit: true,
            post: Some(post),
        }
    }
}

impl Template for CreatePostContext {
    const NAME: &'static str = "posts/create_post.html";

    fn title(&self) -> String {
        let title = if self.is_edit { "Edit post" } else { "New post" };
        title.to_string()
    }

    fn body(&self, out: &mut String) {
        let action = match &self.post {
            Some(post) if self.is_edit => urls::post_edit(post.id),
            _ => urls::post_create(),
        };
        let _ = writeln!(out, "<h1>{}</h1>", self.title());
        let _ = writeln!(
            out,
            "<form method=\"post\" enctype=\"multipart/form-data\" action=\"{}\">",
            action
        );

        let _ = writeln!(
            out,
            "<label>Text <textarea name=\"text\" required>{}</textarea></label>",
            html::escape(&self.form.text)
        );
        html::field_errors(out, self.form.errors.get("text"));

        out.push_str("<label>Group <select name=\"group\">\n<option value=\"\">---------</option>\n");
        for choice in &self.form.groups {
            let selected = if self.form.group == Some(choice.id) { " selected" } else { "" };
            let _ = writeln!(
                out,
                "<option value=\"{}\"{}>{}</option>",
                choice.id,
                selected,
                html::escape(&choice.title)
            );
        }
        out.push_str("</select></label>\n");
        html::field_errors(out, self.form.errors.get("group"));

        if let Some(image) = &self.form.image {
            let _ = writeln!(out, "<p>Currently: {}</p>", html::escape(image));
        }
        out.push_str("<label>Image <input type=\"file\" name=\"image\" accept=\"image/*\"></label>\n");
        html::field_errors(out, self.form.errors.get("image"));

        let submit = if self.is_edit { "Save" } else { "Add" };
        let _ = writeln!(out, "<button type=\"submit\">{}</button>\n</form>", submit);
    }
}

#[derive(Debug, Serialize)]
pub struct FollowContext {
    pub title: String,
    pub page_obj: Page<PostView>,
}

impl Template for FollowContext {
    const NAME: &'static str = "posts/follow.html";

    fn title(&self) -> String {
        self.title.clone()
    }

    fn body(&self, out: &mut String) {
        let _ = writeln!(out, "<h1>{}</h1>", html::escape(&self.title));
        html::post_list(out, &self.page_obj);
    }
}
