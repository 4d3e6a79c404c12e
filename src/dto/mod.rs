mod forms;
mod requests;
mod responses;

pub use forms::{
    CommentFields, CommentForm, PostForm, PostSubmission, Upload, ValidPost, field_errors,
};
pub use requests::{LoginRequest, SignupRequest};
pub use responses::{
    AuthResponse, AuthorView, CommentView, GroupChoice, GroupView, PostView, UserResponse,
};
