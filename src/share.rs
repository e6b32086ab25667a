//! Share-target intake
//!
//! A root POST request carrying the share-target query marker is
//! answered with a redirect (so a refresh does not resubmit the form),
//! and the uploaded file is relayed to the session once it signals that
//! it is ready to receive.

use anyhow::Context;
use tokio::sync::mpsc;

use crate::session::messages::Msg;
use crate::session::rendezvous::Rendezvous;

/// Query marker identifying a share-target request
pub const SHARE_QUERY: &str = "share-target";
/// Signal the session fires when it is ready to receive the file
pub const READY_SIGNAL: &str = "share-ready";
/// Form field carrying the shared file
pub const FILE_FIELD: &str = "file";

/// Request method
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

/// One multipart form field
#[derive(Clone, Debug)]
pub struct FormField {
    pub name: String,
    pub filename: Option<String>,
    pub data: Vec<u8>,
}

/// An incoming request, reduced to what the intake needs
#[derive(Clone, Debug)]
pub struct ShareRequest {
    pub method: Method,
    pub path: String,
    /// Raw query string, without the leading `?`
    pub query: Option<String>,
    pub form: Vec<FormField>,
}

impl ShareRequest {
    /// Whether this is a share-target submission: a root POST with the
    /// share-target query marker.
    pub fn is_share_target(&self) -> bool {
        self.method == Method::Post && self.path == "/" && self.has_share_marker()
    }

    fn has_share_marker(&self) -> bool {
        let Some(query) = self.query.as_deref() else {
            return false;
        };
        query
            .split('&')
            .any(|pair| pair == SHARE_QUERY || pair.starts_with(&format!("{}=", SHARE_QUERY)))
    }

    fn take_field(self, name: &str) -> Option<FormField> {
        self.form.into_iter().find(|field| field.name == name)
    }
}

/// Response to a share-target submission
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ShareResponse {
    /// Redirect the submitter to `location`
    Redirect(String),
    /// Not a share-target request; serve it normally
    NotHandled,
}

/// Immediate response for a request: share-target submissions are
/// redirected, everything else passes through.
pub fn respond(request: &ShareRequest) -> ShareResponse {
    if request.is_share_target() {
        ShareResponse::Redirect(format!("/?{}", SHARE_QUERY))
    } else {
        ShareResponse::NotHandled
    }
}

/// Relay the uploaded file to the session.
///
/// Parks on the ready signal first: the session fires it when it can
/// receive, and only then is the file extracted and forwarded. A signal
/// that never fires leaves the relay suspended.
pub async fn relay_share(
    request: ShareRequest,
    rendezvous: &Rendezvous,
    client: &mpsc::Sender<Msg>,
) -> anyhow::Result<()> {
    let ready = rendezvous.next_signal(READY_SIGNAL);
    let _ = ready.await;

    let field = request
        .take_field(FILE_FIELD)
        .context("share request has no file field")?;
    let name = field
        .filename
        .unwrap_or_else(|| "shared-image".to_string());

    log::info!("Relaying shared file {} ({} bytes)", name, field.data.len());
    client
        .send(Msg::LoadImage {
            name,
            bytes: field.data,
        })
        .await
        .context("session receiver dropped")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Poll the relay once so it parks on the ready signal
    macro_rules! park_relay {
        ($relay:expr) => {
            tokio::select! {
                biased;
                _ = &mut $relay => panic!("relay completed before share-ready"),
                _ = tokio::task::yield_now() => {}
            }
        };
    }

    fn share_request() -> ShareRequest {
        ShareRequest {
            method: Method::Post,
            path: "/".to_string(),
            query: Some(SHARE_QUERY.to_string()),
            form: vec![FormField {
                name: FILE_FIELD.to_string(),
                filename: Some("screenshot.png".to_string()),
                data: vec![1, 2, 3, 4],
            }],
        }
    }

    #[test]
    fn test_share_target_is_redirected() {
        assert_eq!(
            respond(&share_request()),
            ShareResponse::Redirect("/?share-target".to_string())
        );
    }

    #[test]
    fn test_other_requests_pass_through() {
        let mut get = share_request();
        get.method = Method::Get;
        assert_eq!(respond(&get), ShareResponse::NotHandled);

        let mut wrong_path = share_request();
        wrong_path.path = "/app.css".to_string();
        assert_eq!(respond(&wrong_path), ShareResponse::NotHandled);

        let mut no_marker = share_request();
        no_marker.query = Some("utm_source=x".to_string());
        assert_eq!(respond(&no_marker), ShareResponse::NotHandled);

        let mut no_query = share_request();
        no_query.query = None;
        assert_eq!(respond(&no_query), ShareResponse::NotHandled);
    }

    #[test]
    fn test_marker_matches_with_value_or_among_pairs() {
        let mut with_value = share_request();
        with_value.query = Some("share-target=1".to_string());
        assert!(with_value.is_share_target());

        let mut among_pairs = share_request();
        among_pairs.query = Some("a=b&share-target".to_string());
        assert!(among_pairs.is_share_target());
    }

    #[tokio::test]
    async fn test_relay_waits_for_ready_then_delivers() {
        let rendezvous = Rendezvous::new();
        let (tx, mut rx) = mpsc::channel(1);

        let relay = relay_share(share_request(), &rendezvous, &tx);
        tokio::pin!(relay);

        // Not delivered before the session says it is ready
        park_relay!(relay);
        assert!(rx.try_recv().is_err());

        rendezvous.signal(READY_SIGNAL);
        relay.await.unwrap();

        let Some(Msg::LoadImage { name, bytes }) = rx.recv().await else {
            panic!("expected a LoadImage message");
        };
        assert_eq!(name, "screenshot.png");
        assert_eq!(bytes, vec![1, 2, 3, 4]);
    }

    #[tokio::test]
    async fn test_relay_without_file_field_is_an_error() {
        let rendezvous = Rendezvous::new();
        let (tx, _rx) = mpsc::channel(1);

        let mut request = share_request();
        request.form.clear();

        let relay = relay_share(request, &rendezvous, &tx);
        tokio::pin!(relay);
        park_relay!(relay);

        rendezvous.signal(READY_SIGNAL);
        assert!(relay.await.is_err());
    }

    #[tokio::test]
    async fn test_missing_filename_gets_a_default() {
        let rendezvous = Rendezvous::new();
        let (tx, mut rx) = mpsc::channel(1);

        let mut request = share_request();
        request.form[0].filename = None;

        let relay = relay_share(request, &rendezvous, &tx);
        tokio::pin!(relay);
        park_relay!(relay);

        rendezvous.signal(READY_SIGNAL);
        relay.await.unwrap();

        let Some(Msg::LoadImage { name, .. }) = rx.recv().await else {
            panic!("expected a LoadImage message");
        };
        assert_eq!(name, "shared-image");
    }
}
