// User directory endpoints

use reqwest::Method;

use crate::ApiClient;
use crate::client::success_text;
use crate::error::Error;
use crate::models::User;
use crate::schema::parse_list;

impl ApiClient {
    /// Search users by free text. The term is URL-encoded; an empty
    /// response body means no match.
    ///
    /// `GET api/users?query=<term>`
    pub async fn search_users(&self, query: &str) -> Result<Vec<User>, Error> {
        let raw = self
            .send::<()>(Method::GET, "api/users", &[("query", query)], None)
            .await?;
        let text = success_text(raw)?;
        if text.trim().is_empty() {
            return Ok(Vec::new());
        }
        parse_list(&text)
    }
}
