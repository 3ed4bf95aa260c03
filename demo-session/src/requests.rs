use http::header::{HeaderMap, HeaderValue, USER_AGENT};
use serde_json::json;

use session_service::{
    ExpiredPolicy, IdentityCommand, RemoteAddrValidator, RequestIdentity, SaveHandlerFactory,
    Session, SessionBuilder, SessionConfig, SessionError, UserAgentValidator, ValidatorChain,
    begin_request, end_request,
};

/// A browser as far as the session is concerned: its address, headers and cookie jar.
pub(crate) struct Client {
    addr: String,
    headers: HeaderMap,
    cookie: Option<String>,
}

impl Client {
    pub(crate) fn new(addr: &str, user_agent: &'static str) -> Self {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static(user_agent));
        Self {
            addr: addr.to_string(),
            headers,
            cookie: None,
        }
    }

    fn apply(&mut self, command: IdentityCommand) {
        match command {
            IdentityCommand::Keep => {}
            IdentityCommand::Issue { id, cookie } => {
                tracing::info!(
                    path = %cookie.path,
                    same_site = cookie.same_site.as_str(),
                    "Client received session cookie"
                );
                self.cookie = Some(id);
            }
            IdentityCommand::Remove { .. } => {
                tracing::info!("Client dropped session cookie");
                self.cookie = None;
            }
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub(crate) enum Page {
    SignIn,
    Profile,
    SignOut,
}

pub(crate) async fn handle_request(
    factory: &SaveHandlerFactory,
    config: &SessionConfig,
    client: &mut Client,
    page: Page,
) -> Result<(), SessionError> {
    let validation = ValidatorChain::new()
        .with(RemoteAddrValidator::new(client.addr.as_str()))
        .with(UserAgentValidator::from_headers(&client.headers));

    let mut session = SessionBuilder::from_config(config.clone())
        .boxed_save_handler(factory.create())
        .validation(validation)
        .identity(RequestIdentity::from_cookie_value(client.cookie.as_deref()))
        .build();

    let outcome = begin_request(&mut session, ExpiredPolicy::DestroyAndRestart).await?;
    tracing::info!(?page, ?outcome, "Request started");

    match page {
        Page::SignIn => sign_in(&mut session).await?,
        Page::Profile => profile(&mut session),
        Page::SignOut => sign_out(&mut session).await?,
    }

    end_request(&mut session).await?;
    client.apply(session.identity().command());
    Ok(())
}

async fn sign_in(session: &mut Session) -> Result<(), SessionError> {
    // New privileges, new id
    session.regenerate_id(true).await?;
    session.set("user.name", "alice");
    session.set("user.roles", json!(["reader"]));
    session.flash("notice", "Welcome back");
    session.once("csrf", "c0ffee");
    session.now("request.page", "sign-in");
    Ok(())
}

fn profile(session: &mut Session) {
    let name: Option<String> = session.get_as("user.name");
    let notice = session.get("notice");
    let csrf = session.get("csrf");
    tracing::info!(?name, ?notice, ?csrf, "Rendering profile");

    // Consumed by the read above
    tracing::info!(csrf_left = session.has("csrf"), "After reading once value");
}

async fn sign_out(session: &mut Session) -> Result<(), SessionError> {
    let notice = session.get("notice");
    tracing::info!(?notice, "Flash value after its second request");
    session.destroy().await
}
