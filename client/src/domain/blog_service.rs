//! Blog use cases: list, create, view, edit and delete posts.

use pagination::{ListEnvelope, Page as ResultsPage};
use serde_json::Value;
use tracing::info;
use url::Url;

use super::ports::{ApiTransport, SessionStore};
use super::{
    ApiClient, Endpoint, Error, Page, Post, PostDraft, PostFilter, PostForm, PostPatch, PostSlug,
    RequestTarget,
};

/// A post together with whether the signed-in user may manage it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostView {
    /// The post.
    pub post: Post,
    /// True when the post's author matches the token's username claim.
    pub can_manage: bool,
}

/// Blog use cases.
pub struct BlogService<T, S> {
    client: ApiClient<T, S>,
}

impl<T, S> BlogService<T, S> {
    /// Create the service.
    pub fn new(client: ApiClient<T, S>) -> Self {
        Self { client }
    }
}

impl<T, S> BlogService<T, S>
where
    T: ApiTransport,
    S: SessionStore,
{
    /// One page of posts, filtered or via a pagination link.
    pub async fn list(
        &self,
        filter: &PostFilter,
        link: Option<Url>,
    ) -> Result<ResultsPage<Post>, Error> {
        let target = match link {
            Some(url) => RequestTarget::Link(url),
            None => RequestTarget::with_query(Endpoint::Posts, filter.query()),
        };
        self.client
            .get::<ListEnvelope<Post>>(target)
            .await
            .map(ResultsPage::from)
            .map_err(|err| err.with_fallback("Failed to fetch posts"))
    }

    /// Validate and publish a post. Returns [`Page::Index`].
    pub async fn create(&self, form: &PostForm) -> Result<Page, Error> {
        let draft = PostDraft::try_from_form(form).map_err(|err| Error::validation(err.to_string()))?;
        self.client
            .post::<_, Value>(Endpoint::Posts, &draft)
            .await
            .map_err(|err| err.with_fallback("Failed to create post"))?;
        info!(tags = draft.tags().len(), "post created");
        Ok(Page::Index)
    }

    /// Load a post for display or editing.
    ///
    /// The author is normalized to a string and compared with the access
    /// token's `username` claim; no signature is checked.
    pub async fn detail(&self, slug: &PostSlug) -> Result<PostView, Error> {
        let session = self.client.session()?;
        let post: Post = self
            .client
            .get(Endpoint::Post(slug.clone()))
            .await
            .map_err(|err| err.with_fallback("Failed to fetch post"))?;
        let username = session.username();
        let can_manage = post.is_authored_by(username.as_deref());
        Ok(PostView { post, can_manage })
    }

    /// Send an edited title and content. Returns the post's detail page.
    pub async fn update(&self, slug: &PostSlug, title: &str, content: &str) -> Result<Page, Error> {
        let patch = PostPatch::try_new(title, content).map_err(|err| Error::validation(err.to_string()))?;
        self.client
            .patch::<_, Value>(Endpoint::Post(slug.clone()), &patch)
            .await
            .map_err(|err| err.with_fallback("Failed to update post"))?;
        info!(%slug, "post updated");
        Ok(Page::Detail { slug: slug.clone() })
    }

    /// Delete a post. Returns [`Page::Index`].
    pub async fn delete(&self, slug: &PostSlug) -> Result<Page, Error> {
        self.client
            .delete(Endpoint::Post(slug.clone()))
            .await
            .map_err(|err| err.with_fallback("Failed to delete post"))?;
        info!(%slug, "post deleted");
        Ok(Page::Index)
    }
}
