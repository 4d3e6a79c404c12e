use crate::{dto::PostView, pagination::Page, urls};
use chrono::{DateTime, Utc};
use std::fmt::Write;

pub fn escape(raw: &str) -> String {
    raw.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

pub fn date(timestamp: i64) -> String {
    DateTime::<Utc>::from_timestamp(timestamp, 0)
        .map(|d| d.format("%d %b %Y").to_string())
        .unwrap_or_default()
}

/// Text with line breaks kept.
pub fn linebreaks(raw: &str) -> String {
    escape(raw).replace('\n', "<br>")
}

pub fn layout(title: &str, main: &str) -> String {
    let mut out = String::with_capacity(main.len() + 512);
    let _ = write!(
        out,
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <title>{}</title>\n</head>\n<body>\n<nav>\
         <a href=\"{}\">Home</a> <a href=\"{}\">Following</a> <a href=\"{}\">New post</a>\
         </nav>\n<main>\n{}</main>\n</body>\n</html>\n",
        escape(title),
        urls::index(),
        urls::follow_index(),
        urls::post_create(),
        main,
    );
    out
}

/// One post in a listing.
pub fn post_card(out: &mut String, post: &PostView) {
    let _ = write!(
        out,
        "<article class=\"post\">\n<ul>\n<li>Author: <a href=\"{}\">{}</a></li>\n\
         <li>Published: {}</li>\n</ul>\n",
        urls::profile(&post.author.username),
        escape(&post.author.username),
        date(post.created_at),
    );
    if let Some(url) = &post.image_url {
        let _ = writeln!(out, "<img src=\"{}\" alt=\"\">", escape(url));
    }
    let _ = writeln!(out, "<p>{}</p>", linebreaks(&post.text));
    let _ = write!(
        out,
        "<a href=\"{}\">details</a>",
        urls::post_detail(post.id)
    );
    if let Some(group) = &post.group {
        let _ = write!(
            out,
            " <a href=\"{}\">all posts of the group {}</a>",
            urls::group_list(&group.slug),
            escape(&group.title)
        );
    }
    out.push_str("\n</article>\n");
}

pub fn post_list(out: &mut String, page: &Page<PostView>) {
    if page.is_empty() {
        out.push_str("<p class=\"empty\">No posts yet.</p>\n");
    }
    for post in &page.object_list {
        post_card(out, post);
    }
    paginator(out, page);
}

fn paginator<T>(out: &mut String, page: &Page<T>) {
    if page.num_pages <= 1 {
        return;
    }
    out.push_str("<nav class=\"pagination\">");
    if page.has_previous {
        let _ = write!(out, "<a href=\"?page={}\">previous</a> ", page.number - 1);
    }
    let _ = write!(out, "Page {} of {}", page.number, page.num_pages);
    if page.has_next {
        let _ = write!(out, " <a href=\"?page={}\">next</a>", page.number + 1);
    }
    out.push_str("</nav>\n");
}

pub fn field_errors(out: &mut String, errors: Option<&Vec<String>>) {
    for message in errors.into_iter().flatten() {
        let _ = writeln!(out, "<p class=\"error\">{}</p>", escape(message));
    }
}
