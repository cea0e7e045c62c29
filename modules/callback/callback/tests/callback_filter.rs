#![allow(clippy::unwrap_used, clippy::expect_used)]

//! The callback filter, alone and wired to the static client and the
//! profile realm.

mod common;

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use bytes::Bytes;
use callback::{CallbackFilter, CallbackFilterConfig, InMemorySessionStore, ProfileManager};
use callback_sdk::{
    CallbackError, CallbackLogic, CallbackOptions, Clients, HttpAction, HttpActionAdapter,
    IndirectClient, REQUESTED_URL_SESSION_KEY, Realm, SecurityConfig, SecurityEnvironment,
    SessionStore, Subject, WebContext, WebResponse,
};
use common::{RecordingSubject, environment};
use http::header::COOKIE;
use http::{Request, StatusCode};
use parking_lot::Mutex;
use profile_realm::{ProfileRealm, RealmSecurityManager};
use serde_json::Value;
use static_client_plugin::{
    CodeMapping, IdentityConfig, StaticClient, StaticClientConfig, StaticClientMode,
};

const COOKIE_NAME: &str = "AUTHBRIDGE_SESSION";

/// Delegate that writes a value into the session and ends with a fixed
/// action (or error), counting its invocations.
struct ScriptedLogic {
    calls: AtomicUsize,
    result: fn() -> Result<HttpAction, CallbackError>,
}

impl ScriptedLogic {
    fn new(result: fn() -> Result<HttpAction, CallbackError>) -> Arc<Self> {
        Arc::new(Self {
            calls: AtomicUsize::new(0),
            result,
        })
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CallbackLogic for ScriptedLogic {
    async fn perform(
        &self,
        ctx: &mut WebContext,
        _config: &SecurityConfig,
        adapter: &dyn HttpActionAdapter,
        _options: &CallbackOptions,
    ) -> Result<HttpAction, CallbackError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        ctx.session_set("touched", Value::from(true))?;
        let action = (self.result)()?;
        ctx.apply_action(&action)?;
        adapter.adapt(&action, ctx);
        Ok(action)
    }
}

#[derive(Default)]
struct RecordingAdapter {
    seen: Mutex<Vec<(HttpAction, StatusCode)>>,
}

impl HttpActionAdapter for RecordingAdapter {
    fn adapt(&self, action: &HttpAction, ctx: &mut WebContext) {
        self.seen
            .lock()
            .push((action.clone(), ctx.response().status()));
    }
}

fn get(uri: &str) -> Request<Bytes> {
    Request::get(uri).body(Bytes::new()).unwrap()
}

fn get_with_session(uri: &str, session_id: &str) -> Request<Bytes> {
    Request::get(uri)
        .header(COOKIE, format!("{COOKIE_NAME}={session_id}"))
        .body(Bytes::new())
        .unwrap()
}

fn empty_security_config() -> Arc<SecurityConfig> {
    Arc::new(SecurityConfig::new(Clients::new(vec![])))
}

fn nobody() -> SecurityEnvironment {
    environment(&RecordingSubject::new(), &[])
}

/// Session id announced by the last `Set-Cookie` of `response`.
fn session_cookie(response: &WebResponse) -> String {
    response
        .cookies()
        .filter_map(|cookie| cookie.strip_prefix(&format!("{COOKIE_NAME}=")))
        .filter_map(|rest| rest.split(';').next())
        .last()
        .expect("response sets a session cookie")
        .to_owned()
}

#[tokio::test]
async fn missing_security_config_fails_before_the_delegate_runs() {
    let logic = ScriptedLogic::new(|| Ok(HttpAction::redirect("/home")));
    let filter = CallbackFilter::new(CallbackFilterConfig::default())
        .unwrap()
        .with_callback_logic(logic.clone());

    let err = filter.handle(get("/callback"), nobody()).await.unwrap_err();

    assert!(matches!(err, CallbackError::Configuration(_)));
    assert_eq!(logic.calls(), 0);
    assert!(filter.default_session_store().is_empty());
}

#[tokio::test]
async fn default_session_store_is_used_without_override() {
    let logic = ScriptedLogic::new(|| Ok(HttpAction::ok("done")));
    let filter = CallbackFilter::new(CallbackFilterConfig::default())
        .unwrap()
        .with_security_config(empty_security_config())
        .with_callback_logic(logic.clone());

    let outcome = filter.handle(get("/callback"), nobody()).await.unwrap();

    assert_eq!(logic.calls(), 1);
    assert_eq!(filter.default_session_store().len(), 1);
    assert_eq!(outcome.response.cookies().count(), 1);
}

#[tokio::test]
async fn configured_session_store_overrides_default() {
    let custom = Arc::new(InMemorySessionStore::new("CUSTOM_SESSION"));
    let config = SecurityConfig::new(Clients::new(vec![]))
        .with_session_store(custom.clone() as Arc<dyn SessionStore>);
    let filter = CallbackFilter::new(CallbackFilterConfig::default())
        .unwrap()
        .with_security_config(Arc::new(config))
        .with_callback_logic(ScriptedLogic::new(|| Ok(HttpAction::ok("done"))));

    let outcome = filter.handle(get("/callback"), nobody()).await.unwrap();

    assert_eq!(custom.len(), 1);
    assert!(filter.default_session_store().is_empty());
    assert!(
        outcome
            .response
            .cookies()
            .next()
            .unwrap()
            .starts_with("CUSTOM_SESSION=")
    );
}

#[tokio::test]
async fn delegate_redirect_reaches_the_adapter() {
    let adapter = Arc::new(RecordingAdapter::default());
    let filter = CallbackFilter::new(CallbackFilterConfig::default())
        .unwrap()
        .with_security_config(empty_security_config())
        .with_callback_logic(ScriptedLogic::new(|| Ok(HttpAction::redirect("/home"))))
        .with_http_action_adapter(adapter.clone());

    let outcome = filter.handle(get("/callback"), nobody()).await.unwrap();

    assert_eq!(outcome.action, HttpAction::redirect("/home"));
    assert_eq!(outcome.response.status(), StatusCode::FOUND);
    assert_eq!(outcome.response.location(), Some("/home"));
    assert_eq!(
        *adapter.seen.lock(),
        [(HttpAction::redirect("/home"), StatusCode::FOUND)]
    );
}

#[tokio::test]
async fn delegate_error_propagates_unchanged() {
    let filter = CallbackFilter::new(CallbackFilterConfig::default())
        .unwrap()
        .with_security_config(empty_security_config())
        .with_callback_logic(ScriptedLogic::new(|| {
            Err(CallbackError::Session("store unavailable".to_owned()))
        }));

    let err = filter.handle(get("/callback"), nobody()).await.unwrap_err();

    assert!(matches!(err, CallbackError::Session(msg) if msg == "store unavailable"));
}

#[tokio::test]
async fn shared_filter_serves_concurrent_requests() {
    let logic = ScriptedLogic::new(|| Ok(HttpAction::redirect("/home")));
    let filter = Arc::new(
        CallbackFilter::new(CallbackFilterConfig::default())
            .unwrap()
            .with_security_config(empty_security_config())
            .with_callback_logic(logic.clone()),
    );

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let filter = Arc::clone(&filter);
            tokio::spawn(async move { filter.handle(get("/callback"), nobody()).await })
        })
        .collect();
    for handle in handles {
        assert_eq!(
            handle.await.unwrap().unwrap().action,
            HttpAction::redirect("/home")
        );
    }

    assert_eq!(logic.calls(), 8);
    assert_eq!(filter.default_session_store().len(), 8);
}

// End to end: static client, profile realm, default session store.

struct App {
    filter: CallbackFilter,
    realm: Arc<ProfileRealm>,
    manager: Arc<RealmSecurityManager>,
}

fn static_client(name: &str, code: &str, id: &str, remembered: bool) -> Arc<dyn IndirectClient> {
    Arc::new(StaticClient::from_config(&StaticClientConfig {
        name: name.to_owned(),
        mode: StaticClientMode::StaticCodes,
        codes: vec![CodeMapping {
            code: code.to_owned(),
            identity: IdentityConfig {
                id: id.to_owned(),
                roles: vec!["admin".to_owned()],
                remembered,
                ..IdentityConfig::default()
            },
        }],
        ..StaticClientConfig::default()
    }))
}

fn app(config: CallbackFilterConfig) -> App {
    let clients = Clients::new(vec![
        static_client("CasClient", "cas-code", "alice", false),
        static_client("OidcClient", "oidc-code", "alice", true),
    ]);
    let realm = Arc::new(ProfileRealm::new("profiles"));
    let realms: Vec<Arc<dyn Realm>> = vec![realm.clone()];
    let manager = Arc::new(RealmSecurityManager::new(realms));
    let filter = CallbackFilter::new(config)
        .unwrap()
        .with_security_config(Arc::new(SecurityConfig::new(clients)));
    App {
        filter,
        realm,
        manager,
    }
}

/// Start a session holding the URL the user asked for, as the login
/// redirect would have. Returns its id.
fn remember_requested_url(store: &Arc<InMemorySessionStore>, url: &str) -> String {
    let mut ctx = WebContext::new(
        get("/reports"),
        store.clone(),
        environment(&RecordingSubject::new(), &[]),
    );
    ctx.session_set(REQUESTED_URL_SESSION_KEY, Value::from(url))
        .unwrap();
    ctx.session_id().unwrap().to_owned()
}

fn saved_clients(store: &Arc<InMemorySessionStore>, session_id: &str) -> Vec<String> {
    let mut ctx = WebContext::new(
        get_with_session("/app", session_id),
        store.clone(),
        environment(&RecordingSubject::new(), &[]),
    );
    ProfileManager::new(&mut ctx)
        .get_all(true)
        .unwrap()
        .client_names()
        .map(str::to_owned)
        .collect()
}

#[tokio::test]
async fn callback_logs_in_and_returns_to_requested_url() {
    let app = app(CallbackFilterConfig::default());
    let store = app.filter.default_session_store().clone();
    let session = remember_requested_url(&store, "/reports/42");
    let subject = app.manager.subject();
    let security = SecurityEnvironment::new(app.manager.clone(), subject.clone());

    let outcome = app
        .filter
        .handle(
            get_with_session("/callback?client_name=CasClient&code=cas-code", &session),
            security,
        )
        .await
        .unwrap();

    assert_eq!(outcome.action, HttpAction::redirect("/reports/42"));
    assert!(subject.is_authenticated());
    let principals = subject.principals().unwrap();
    assert_eq!(principals.to_string(), "[CasClient#alice]");
    assert!(app.realm.has_role(&principals, "admin"));

    let renewed = session_cookie(&outcome.response);
    assert_ne!(renewed, session);
    assert_eq!(store.len(), 1);
    assert_eq!(saved_clients(&store, &renewed), ["CasClient"]);
}

#[tokio::test]
async fn first_login_announces_a_single_session_cookie() {
    let app = app(CallbackFilterConfig::default());
    let store = app.filter.default_session_store().clone();

    let outcome = app
        .filter
        .handle(
            get("/callback?client_name=CasClient&code=cas-code"),
            app.manager.environment(),
        )
        .await
        .unwrap();

    assert_eq!(outcome.response.cookies().count(), 1);
    let session = session_cookie(&outcome.response);
    assert_eq!(store.len(), 1);
    assert_eq!(saved_clients(&store, &session), ["CasClient"]);
}

#[tokio::test]
async fn remembered_identity_is_only_remembered() {
    let app = app(CallbackFilterConfig {
        default_url: Some("/home".to_owned()),
        ..CallbackFilterConfig::default()
    });
    let subject = app.manager.subject();
    let security = SecurityEnvironment::new(app.manager.clone(), subject.clone());

    let outcome = app
        .filter
        .handle(get("/callback?client_name=OidcClient&code=oidc-code"), security)
        .await
        .unwrap();

    assert_eq!(outcome.action, HttpAction::redirect("/home"));
    assert!(!subject.is_authenticated());
    assert!(subject.is_remembered());
}

#[tokio::test]
async fn multi_profile_accumulates_across_callbacks() {
    let app = app(CallbackFilterConfig {
        multi_profile: true,
        ..CallbackFilterConfig::default()
    });
    let store = app.filter.default_session_store().clone();

    let first = app
        .filter
        .handle(
            get("/callback?client_name=CasClient&code=cas-code"),
            app.manager.environment(),
        )
        .await
        .unwrap();
    let session = session_cookie(&first.response);

    let subject = app.manager.subject();
    let second = app
        .filter
        .handle(
            get_with_session("/callback?client_name=OidcClient&code=oidc-code", &session),
            SecurityEnvironment::new(app.manager.clone(), subject.clone()),
        )
        .await
        .unwrap();

    let session = session_cookie(&second.response);
    assert_eq!(saved_clients(&store, &session), ["CasClient", "OidcClient"]);
    assert!(subject.is_authenticated());
    assert_eq!(subject.principals().unwrap().len(), 2);
}

#[tokio::test]
async fn callback_without_code_is_unauthorized() {
    let app = app(CallbackFilterConfig::default());
    let subject = app.manager.subject();

    let outcome = app
        .filter
        .handle(
            get("/callback?client_name=CasClient"),
            SecurityEnvironment::new(app.manager.clone(), subject.clone()),
        )
        .await
        .unwrap();

    assert_eq!(outcome.action, HttpAction::unauthorized());
    assert_eq!(outcome.response.status(), StatusCode::UNAUTHORIZED);
    assert!(!subject.is_authenticated());
    assert!(app.filter.default_session_store().is_empty());
}

#[tokio::test]
async fn restricted_filter_rejects_other_clients() {
    let app = app(CallbackFilterConfig {
        client: Some("CasClient".to_owned()),
        ..CallbackFilterConfig::default()
    });

    let err = app
        .filter
        .handle(
            get("/callback?client_name=OidcClient&code=oidc-code"),
            app.manager.environment(),
        )
        .await
        .unwrap_err();

    assert!(matches!(err, CallbackError::Technical(_)));
}
