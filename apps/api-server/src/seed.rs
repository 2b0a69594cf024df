//! Development fixture: three users with one tagged post each.
//!
//! Run with `api-server seed`. Users that already exist are left alone along
//! with their posts, so seeding twice changes nothing.

use juicebox_core::domain::{Post, User};

use crate::middleware::error::AppResult;
use crate::state::AppState;

struct SeedUser {
    username: &'static str,
    password: &'static str,
    name: &'static str,
    location: &'static str,
    post_title: &'static str,
    tags: &'static [&'static str],
}

const SEED_USERS: &[SeedUser] = &[
    SeedUser {
        username: "albert",
        password: "bertie99",
        name: "Al Bert",
        location: "Sidney, Australia",
        post_title: "albert Post",
        tags: &["#happy", "#youcandoanything"],
    },
    SeedUser {
        username: "sandra",
        password: "2sandy4me",
        name: "Just Sandra",
        location: "Ain't tellin'",
        post_title: "sandra Post",
        tags: &["#happy", "#worst-day-ever", "#youcandoanything"],
    },
    SeedUser {
        username: "glamgal",
        password: "soglam",
        name: "Joshua",
        location: "Upper East Side",
        post_title: "glamgal Post",
        tags: &["#happy", "#catmandoeverything", "#youcandoanything"],
    },
];

#[derive(Debug, Default, PartialEq, Eq)]
pub struct SeedSummary {
    pub users: usize,
    pub posts: usize,
}

/// Insert the fixture users and their posts.
pub async fn seed(state: &AppState) -> AppResult<SeedSummary> {
    let mut summary = SeedSummary::default();

    for fixture in SEED_USERS {
        let password_hash = state.passwords.hash(fixture.password)?;
        let user = User::new(
            fixture.username.to_string(),
            password_hash,
            fixture.name.to_string(),
            fixture.location.to_string(),
        );

        let Some(created) = state.users.create_user(user).await? else {
            tracing::info!(username = fixture.username, "Seed user exists, skipping");
            continue;
        };
        summary.users += 1;

        let post = Post::new(
            created.id,
            fixture.post_title.to_string(),
            "This is my first post.".to_string(),
        );
        let tags = fixture.tags.iter().map(|t| t.to_string()).collect();
        state.posts.create_post(post, tags).await?;
        summary.posts += 1;
    }

    tracing::info!(users = summary.users, posts = summary.posts, "Seeding complete");
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::test_state;

    #[actix_web::test]
    async fn test_seed_populates_fixture() {
        let state = test_state().await;

        let summary = seed(&state).await.unwrap();

        assert_eq!(summary, SeedSummary { users: 3, posts: 3 });
        assert_eq!(state.users.get_all_users().await.unwrap().len(), 3);
        assert_eq!(state.tags.get_all_tags().await.unwrap().len(), 4);

        let happy = state.posts.get_posts_by_tag_name("#happy").await.unwrap();
        assert_eq!(happy.len(), 3);

        let albert = state.users.find_credentials("albert").await.unwrap().unwrap();
        assert!(state.passwords.verify("bertie99", &albert.password_hash).unwrap());
    }

    #[actix_web::test]
    async fn test_seed_twice_changes_nothing() {
        let state = test_state().await;
        seed(&state).await.unwrap();

        let again = seed(&state).await.unwrap();

        assert_eq!(again, SeedSummary::default());
        assert_eq!(state.posts.get_all_posts().await.unwrap().len(), 3);
    }
}
