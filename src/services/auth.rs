use async_trait::async_trait;
use reqwest::Url;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpListener;
use tracing::{debug, info, warn};

use crate::error::TriageError;

use super::github::get_github_token;

const CALLBACK_PATH: &str = "/callback";
const CALLBACK_RESPONSE: &str = "HTTP/1.1 200 OK\r\nContent-Type: text/plain; charset=utf-8\r\nConnection: close\r\n\r\nSigned in. You can close this window.\r\n";

/// Produces the token the GitHub client is built from.
#[async_trait]
pub trait AuthFlow: Send + Sync {
    async fn authenticate(&self) -> Result<String, TriageError>;
}

/// Reads the `token` query parameter off a redirect URL.
pub fn token_from_redirect(url: &str) -> Option<String> {
    let url = Url::parse(url).ok()?;
    url.query_pairs()
        .find(|(key, _)| key == "token")
        .map(|(_, value)| value.into_owned())
        .filter(|token| !token.is_empty())
}

/// Sign-in through the web login service: the service redirects back to a
/// loopback listener with `?token=...` once the user has authorized.
pub struct WebAuthFlow {
    login_url: String,
    opener: Vec<String>,
}

impl WebAuthFlow {
    pub fn new(login_base_url: &str, opener: Vec<String>) -> Self {
        Self {
            login_url: format!("{}/login", login_base_url.trim_end_matches('/')),
            opener,
        }
    }

    pub fn authorize_url(&self, redirect_uri: &str) -> String {
        format!(
            "{}?redirect_uri={}",
            self.login_url,
            urlencoding::encode(redirect_uri)
        )
    }

    fn launch(&self, url: &str) -> Result<(), TriageError> {
        let (program, args) = self
            .opener
            .split_first()
            .ok_or_else(|| TriageError::AuthenticationFailed("no opener command".to_string()))?;

        std::process::Command::new(program)
            .args(args)
            .arg(url)
            .spawn()
            .map_err(|e| TriageError::AuthenticationFailed(format!("{}: {}", program, e)))?;
        Ok(())
    }
}

#[async_trait]
impl AuthFlow for WebAuthFlow {
    async fn authenticate(&self) -> Result<String, TriageError> {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let redirect_uri = format!("http://{}{}", listener.local_addr()?, CALLBACK_PATH);

        info!(login = %self.login_url, "starting web sign-in");
        self.launch(&self.authorize_url(&redirect_uri))?;

        let redirect = accept_redirect(&listener).await?;
        debug!("redirect received");

        token_from_redirect(&redirect).ok_or_else(|| {
            warn!("redirect carried no token");
            TriageError::AuthenticationFailed("no token in redirect".to_string())
        })
    }
}

/// Waits for the browser to hit the loopback listener and returns the full
/// redirect URL it requested.
async fn accept_redirect(listener: &TcpListener) -> Result<String, TriageError> {
    let (stream, peer) = listener.accept().await?;
    debug!(%peer, "callback connection");

    let (read_half, mut write_half) = stream.into_split();
    let mut reader = BufReader::new(read_half);
    let mut request_line = String::new();
    reader.read_line(&mut request_line).await?;

    write_half.write_all(CALLBACK_RESPONSE.as_bytes()).await?;
    write_half.shutdown().await?;

    let target = request_line
        .split_whitespace()
        .nth(1)
        .ok_or_else(|| TriageError::AuthenticationFailed("malformed redirect".to_string()))?;

    Ok(format!("http://{}{}", listener.local_addr()?, target))
}

/// Token from an existing `gh auth login` session.
pub struct GhCliAuth;

#[async_trait]
impl AuthFlow for GhCliAuth {
    async fn authenticate(&self) -> Result<String, TriageError> {
        get_github_token()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::AsyncReadExt;
    use tokio::net::TcpStream;

    #[test]
    fn token_is_read_from_the_query_string() {
        assert_eq!(
            token_from_redirect("https://id.example.com/cb?state=1&token=abc%20def"),
            Some("abc def".to_string())
        );
    }

    #[test]
    fn missing_or_empty_token_is_none() {
        assert_eq!(token_from_redirect("https://id.example.com/cb?state=1"), None);
        assert_eq!(token_from_redirect("https://id.example.com/cb?token="), None);
        assert_eq!(token_from_redirect("not a url"), None);
    }

    #[test]
    fn authorize_url_encodes_the_redirect() {
        let flow = WebAuthFlow::new("https://login.example.com/", vec!["true".to_string()]);
        assert_eq!(
            flow.authorize_url("http://127.0.0.1:4000/callback"),
            "https://login.example.com/login?redirect_uri=http%3A%2F%2F127.0.0.1%3A4000%2Fcallback"
        );
    }

    #[tokio::test]
    async fn redirect_listener_returns_the_requested_url() {
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let addr = listener.local_addr().expect("addr");

        let client = tokio::spawn(async move {
            let mut stream = TcpStream::connect(addr).await.expect("connect");
            stream
                .write_all(b"GET /callback?token=t0k HTTP/1.1\r\nHost: localhost\r\n\r\n")
                .await
                .expect("write");
            let mut response = String::new();
            stream.read_to_string(&mut response).await.expect("read");
            response
        });

        let redirect = accept_redirect(&listener).await.expect("redirect");
        assert_eq!(token_from_redirect(&redirect), Some("t0k".to_string()));

        let response = client.await.expect("join");
        assert!(response.starts_with("HTTP/1.1 200 OK"));
    }
}
