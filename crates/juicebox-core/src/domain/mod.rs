//! Domain entities - the core business objects.

mod post;
mod tag;
mod user;

pub use post::{HydratedPost, Post, PostUpdate};
pub use tag::{Tag, normalize_tag_names};
pub use user::{Author, MIN_PASSWORD_LEN, PublicUser, User, UserProfile, UserUpdate};
