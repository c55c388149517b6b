//! Trello members.

use std::fmt;

use tracing::{instrument, warn};

use crate::api::error::{ApiError, Result};
use crate::api::types::MemberResponse;
use crate::api::{ApiRequest, TrelloClient};

/// Path segment Trello resolves to the authenticated member.
const SELF_ALIAS: &str = "me";

/// A Trello user account.
pub struct Member<'a> {
    client: &'a TrelloClient,
    id: String,
    server_id: Option<String>,
    username: Option<String>,
    full_name: Option<String>,
    initials: Option<String>,
    status: Option<String>,
    bio: Option<String>,
    url: Option<String>,
}

impl<'a> Member<'a> {
    /// A member reference carrying its id, its username, or `me` for the
    /// authenticated user.
    pub fn new(client: &'a TrelloClient, id: impl Into<String>) -> Self {
        Self {
            client,
            id: id.into(),
            server_id: None,
            username: None,
            full_name: None,
            initials: None,
            status: None,
            bio: None,
            url: None,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// The canonical id reported by the server after `fetch()`. Differs from
    /// [`Member::id`] when the member was looked up by username or `me`.
    pub fn server_id(&self) -> Option<&str> {
        self.server_id.as_deref()
    }

    pub fn username(&self) -> Option<&str> {
        self.username.as_deref()
    }

    pub fn full_name(&self) -> Option<&str> {
        self.full_name.as_deref()
    }

    pub fn initials(&self) -> Option<&str> {
        self.initials.as_deref()
    }

    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    pub fn bio(&self) -> Option<&str> {
        self.bio.as_deref()
    }

    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }

    pub fn client(&self) -> &'a TrelloClient {
        self.client
    }

    /// Fetch all attributes for this member.
    ///
    /// The id passed at construction stays authoritative. A response id that
    /// differs from it is accepted when the member was addressed by its
    /// username or as `me`, and recorded as [`Member::server_id`].
    ///
    /// # Errors
    ///
    /// Returns `ApiError::IdMismatch`, leaving the member untouched, if the
    /// response names a different member.
    #[instrument(skip(self), fields(member_id = %self.id))]
    pub fn fetch(&mut self) -> Result<()> {
        let request = ApiRequest::get(format!("/members/{}", self.id)).query("badges", false);
        let response: MemberResponse = self.client.fetch(&request)?;

        if let Some(actual) = response.id.as_deref() {
            let alias = self.id == SELF_ALIAS || self.id == response.username;
            if actual != self.id && !alias {
                warn!(expected = %self.id, actual, "Member id in response does not match");
                return Err(ApiError::IdMismatch {
                    expected: self.id.clone(),
                    actual: actual.to_string(),
                });
            }
        }

        self.server_id = response.id;
        self.username = Some(response.username);
        self.full_name = Some(response.full_name);
        self.initials = Some(response.initials);
        self.status = Some(response.status);
        self.bio = Some(response.bio);
        self.url = Some(response.url);
        Ok(())
    }
}

impl fmt::Debug for Member<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Member")
            .field("id", &self.id)
            .field("server_id", &self.server_id)
            .field("username", &self.username)
            .field("full_name", &self.full_name)
            .field("initials", &self.initials)
            .field("status", &self.status)
            .finish_non_exhaustive()
    }
}

impl fmt::Display for Member<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<Member {}>", self.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::mock_client;

    const MEMBER_JSON: &str = r#"{
        "id": "m1",
        "username": "jdoe",
        "fullName": "Jane Doe",
        "initials": "JD",
        "status": "active",
        "bio": "Builds things",
        "url": "https://trello.com/jdoe"
    }"#;

    #[test]
    fn test_get_member_hydrates() {
        let (client, mock) = mock_client(vec![(200, MEMBER_JSON)]);
        let member = client.get_member("m1").unwrap();

        assert_eq!(member.id(), "m1");
        assert_eq!(member.username(), Some("jdoe"));
        assert_eq!(member.full_name(), Some("Jane Doe"));
        assert_eq!(member.initials(), Some("JD"));
        assert_eq!(member.status(), Some("active"));
        assert_eq!(member.bio(), Some("Builds things"));
        assert_eq!(member.url(), Some("https://trello.com/jdoe"));
        assert!(mock.requests()[0]
            .url
            .ends_with("/members/m1?key=key&token=token&badges=false"));
    }

    #[test]
    fn test_fetch_defaults_missing_bio_and_url() {
        let (client, _) = mock_client(vec![(
            200,
            r#"{"id":"m1","username":"jdoe","fullName":"Jane","initials":"J","status":"idle"}"#,
        )]);
        let mut member = Member::new(&client, "m1");
        member.fetch().unwrap();
        assert_eq!(member.bio(), Some(""));
        assert_eq!(member.url(), Some(""));
    }

    #[test]
    fn test_fetch_by_username_keeps_lookup_id() {
        let (client, mock) = mock_client(vec![(200, MEMBER_JSON)]);
        let member = client.get_member("jdoe").unwrap();

        assert_eq!(member.id(), "jdoe");
        assert_eq!(member.server_id(), Some("m1"));
        assert_eq!(member.full_name(), Some("Jane Doe"));
        assert!(mock.requests()[0].url.contains("/members/jdoe?"));
    }

    #[test]
    fn test_fetch_me_resolves_server_id() {
        let (client, _) = mock_client(vec![(200, MEMBER_JSON)]);
        let mut member = Member::new(&client, "me");
        member.fetch().unwrap();

        assert_eq!(member.id(), "me");
        assert_eq!(member.server_id(), Some("m1"));
        assert_eq!(member.username(), Some("jdoe"));
    }

    #[test]
    fn test_fetch_id_mismatch_is_an_error() {
        let (client, _) = mock_client(vec![(200, MEMBER_JSON)]);
        let mut member = Member::new(&client, "m2");
        let err = member.fetch().unwrap_err();

        match err {
            ApiError::IdMismatch { expected, actual } => {
                assert_eq!(expected, "m2");
                assert_eq!(actual, "m1");
            }
            other => panic!("Expected IdMismatch, got {:?}", other),
        }
        assert_eq!(member.id(), "m2");
        assert!(member.username().is_none());
        assert!(member.server_id().is_none());
    }

    #[test]
    fn test_fetch_without_response_id_keeps_constructor_id() {
        let (client, _) = mock_client(vec![(
            200,
            r#"{"username":"jdoe","fullName":"Jane","initials":"J","status":"idle"}"#,
        )]);
        let mut member = Member::new(&client, "m1");
        member.fetch().unwrap();
        assert_eq!(member.id(), "m1");
        assert!(member.server_id().is_none());
        assert_eq!(member.username(), Some("jdoe"));
    }

    #[test]
    fn test_fetch_missing_username_is_invalid() {
        let (client, _) = mock_client(vec![(200, r#"{"id":"m1","status":"idle"}"#)]);
        let err = Member::new(&client, "m1").fetch().unwrap_err();
        assert!(matches!(err, ApiError::InvalidResponse(_)));
    }
}
