use crate::{
    dto::GroupChoice,
    errors::ApiError,
    media,
    models::Post,
    store::Store,
};
use axum::{
    Form,
    body::Bytes,
    extract::{FromRequest, Multipart, Request},
    http::header::CONTENT_TYPE,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use validator::{Validate, ValidationErrors};

const INVALID_CHOICE: &str = "Select a valid choice. That choice is not one of the available choices.";
const INVALID_IMAGE: &str =
    "Upload a valid image. The file you uploaded was either not an image or a corrupted image.";

/// Flattens validator output into `field -> messages`.
pub fn field_errors(errors: &ValidationErrors) -> BTreeMap<String, Vec<String>> {
    errors
        .field_errors()
        .into_iter()
        .map(|(field, errs)| {
            let messages = errs
                .iter()
                .map(|e| {
                    e.message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| e.code.to_string())
                })
                .collect();
            (field.to_string(), messages)
        })
        .collect()
}

/// An uploaded file, fully buffered.
#[derive(Debug, Clone)]
pub struct Upload {
    pub filename: String,
    pub bytes: Bytes,
}

#[derive(Debug, Default, Deserialize)]
struct PostFields {
    #[serde(default)]
    text: String,
    #[serde(default)]
    group: String,
}

#[derive(Debug, Validate)]
struct PostInput {
    #[validate(length(min = 1, message = "This field is required."))]
    text: String,
}

/// Raw post form submission, from either an urlencoded or a multipart body.
#[derive(Debug, Default)]
pub struct PostSubmission {
    pub text: String,
    pub group: String,
    pub image: Option<Upload>,
}

/// A submission that passed validation.
#[derive(Debug)]
pub struct ValidPost {
    pub text: String,
    pub group_id: Option<u64>,
    pub image: Option<Upload>,
}

impl<S> FromRequest<S> for PostSubmission
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let is_multipart = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|ct| ct.starts_with("multipart/form-data"));

        if !is_multipart {
            let Form(fields) = Form::<PostFields>::from_request(req, state)
                .await
                .map_err(|e| ApiError::ValidationError(e.body_text()))?;
            return Ok(Self {
                text: fields.text,
                group: fields.group,
                image: None,
            });
        }

        let mut multipart = Multipart::from_request(req, state)
            .await
            .map_err(|e| ApiError::ValidationError(e.body_text()))?;
        let mut submission = Self::default();

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| ApiError::ValidationError(e.body_text()))?
        {
            let name = field.name().unwrap_or_default().to_string();
            match name.as_str() {
                "text" => {
                    submission.text = field
                        .text()
                        .await
                        .map_err(|e| ApiError::ValidationError(e.body_text()))?;
                }
                "group" => {
                    submission.group = field
                        .text()
                        .await
                        .map_err(|e| ApiError::ValidationError(e.body_text()))?;
                }
                "image" => {
                    let filename = field.file_name().unwrap_or_default().to_string();
                    let bytes = field
                        .bytes()
                        .await
                        .map_err(|e| ApiError::ValidationError(e.body_text()))?;
                    // Browsers send an empty part when no file was picked.
                    if !bytes.is_empty() {
                        submission.image = Some(Upload { filename, bytes });
                    }
                }
                _ => {}
            }
        }

        Ok(submission)
    }
}

impl PostSubmission {
    /// Validates against the current store. On failure returns the form to
    /// re-render, carrying what the user typed and the field errors.
    pub fn validate(self, store: &Store) -> Result<ValidPost, PostForm> {
        let input = PostInput {
            text: self.text.trim().to_string(),
        };
        let mut errors = match input.validate() {
            Ok(()) => BTreeMap::new(),
            Err(e) => field_errors(&e),
        };

        let raw_group = self.group.trim();
        let group_id = if raw_group.is_empty() {
            None
        } else {
            match raw_group.parse::<u64>().ok().filter(|id| store.group(*id).is_some()) {
                Some(id) => Some(id),
                None => {
                    errors
                        .entry("group".to_string())
                        .or_default()
                        .push(INVALID_CHOICE.to_string());
                    None
                }
            }
        };

        if let Some(upload) = &self.image {
            if media::sniff(&upload.bytes).is_none() {
                errors
                    .entry("image".to_string())
                    .or_default()
                    .push(INVALID_IMAGE.to_string());
            }
        }

        if errors.is_empty() {
            return Ok(ValidPost {
                text: input.text,
                group_id,
                image: self.image,
            });
        }

        Err(PostForm {
            text: self.text,
            group: group_id,
            image: None,
            groups: PostForm::choices(store),
            errors,
        })
    }
}

/// Post form state handed to `posts/create_post.html`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct PostForm {
    pub text: String,
    pub group: Option<u64>,
    /// Image currently attached to the post being edited.
    pub image: Option<String>,
    pub groups: Vec<GroupChoice>,
    pub errors: BTreeMap<String, Vec<String>>,
}

impl PostForm {
    pub fn blank(store: &Store) -> Self {
        Self {
            groups: Self::choices(store),
            ..Default::default()
        }
    }

    /// Pre-filled with the post's current values.
    pub fn for_post(store: &Store, post: &Post) -> Self {
        Self {
            text: post.text.clone(),
            group: post.group_id,
            image: post.image.clone(),
            groups: Self::choices(store),
            errors: BTreeMap::new(),
        }
    }

    fn choices(store: &Store) -> Vec<GroupChoice> {
        store
            .groups()
            .into_iter()
            .map(|group| GroupChoice {
                id: group.id,
                title: group.title,
            })
            .collect()
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct CommentFields {
    #[serde(default)]
    pub text: String,
}

#[derive(Debug, Validate)]
struct CommentInput {
    #[validate(length(min = 1, message = "This field is required."))]
    text: String,
}

impl CommentFields {
    /// Trimmed comment text, or `None` when it would not pass validation.
    pub fn into_valid_text(self) -> Option<String> {
        let input = CommentInput {
            text: self.text.trim().to_string(),
        };
        input.validate().ok().map(|()| input.text)
    }
}

/// Comment form state; the detail page always shows it empty.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CommentForm {
    pub text: String,
    pub errors: BTreeMap<String, Vec<String>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    const REQUIRED: &str = "This field is required.";

    const SMALL_GIF: &[u8] = &[
        0x47, 0x49, 0x46, 0x38, 0x39, 0x61, 0x02, 0x00, 0x01, 0x00, 0x80, 0x00, 0x00, 0x00,
        0x00, 0x00, 0xFF, 0xFF, 0xFF, 0x21, 0xF9, 0x04, 0x00, 0x00, 0x00, 0x00, 0x00, 0x2C,
        0x00, 0x00, 0x00, 0x00, 0x02, 0x00, 0x01, 0x00, 0x00, 0x02, 0x02, 0x0C, 0x0A, 0x00,
        0x3B,
    ];

    fn submission(text: &str, group: &str) -> PostSubmission {
        PostSubmission {
            text: text.into(),
            group: group.into(),
            image: None,
        }
    }

    #[test]
    fn blank_text_is_required() {
        let store = Store::new();
        let form = submission("   ", "").validate(&store).unwrap_err();
        assert_eq!(form.errors["text"], vec![REQUIRED.to_string()]);
    }

    #[test]
    fn unknown_group_is_an_invalid_choice() {
        let store = Store::new();
        let form = submission("hello", "42").validate(&store).unwrap_err();
        assert_eq!(form.errors["group"], vec![INVALID_CHOICE.to_string()]);
        assert_eq!(form.text, "hello");
    }

    #[test]
    fn valid_submission_resolves_group_and_trims_text() {
        let store = Store::new();
        let group = store.create_group("Title", "test-slug", "").unwrap();

        let valid = submission("  hello  ", &group.id.to_string())
            .validate(&store)
            .unwrap();
        assert_eq!(valid.text, "hello");
        assert_eq!(valid.group_id, Some(group.id));
    }

    #[test]
    fn image_must_be_an_image() {
        let store = Store::new();
        let mut bad = submission("hello", "");
        bad.image = Some(Upload {
            filename: "notes.txt".into(),
            bytes: Bytes::from_static(b"plain text"),
        });
        let form = bad.validate(&store).unwrap_err();
        assert_eq!(form.errors["image"], vec![INVALID_IMAGE.to_string()]);

        let mut good = submission("hello", "");
        good.image = Some(Upload {
            filename: "small.gif".into(),
            bytes: Bytes::from_static(SMALL_GIF),
        });
        assert!(good.validate(&store).is_ok());
    }

    #[test]
    fn edit_form_is_prefilled() {
        let store = Store::new();
        let post = Post {
            id: 1,
            author_id: Uuid::new_v4(),
            text: "Test post".into(),
            group_id: None,
            image: Some("posts/small.gif".into()),
            created_at: 0,
        };
        let form = PostForm::for_post(&store, &post);
        assert_eq!(form.text, "Test post");
        assert_eq!(form.image.as_deref(), Some("posts/small.gif"));
        assert!(form.errors.is_empty());
    }

    #[test]
    fn comment_text_is_trimmed_and_required() {
        let blank = CommentFields { text: " \n".into() };
        assert_eq!(blank.into_valid_text(), None);

        let ok = CommentFields {
            text: " nice ".into(),
        };
        assert_eq!(ok.into_valid_text().as_deref(), Some("nice"));
    }
}
