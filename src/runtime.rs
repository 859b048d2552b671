//! Update/command runtime.
//!
//! A program is a pure [`Update`] implementation. [`Runtime::start`] puts it
//! behind a `redux_rs` store: the reducer keeps the state returned by the
//! update function and forwards its commands to [`Effects`], which runs each
//! one as a thunk. Whatever a thunk dispatches goes back through the same
//! store, so every action is reduced one at a time on a single queue.

use std::sync::Arc;

use redux_rs::{
  middlewares::thunk::{ActionOrThunk, ThunkMiddleware},
  Reducer, Store, StoreApi,
};
use tokio::{
  sync::{mpsc, watch},
  task::{JoinHandle, JoinSet},
};

pub mod command;
pub mod dispatch;
pub mod effect;
pub mod embed;
pub mod error;
pub mod registry;
pub mod update;

pub use command::{Command, EffectKey, HttpRequest};
pub use dispatch::{Dispatch, Dispatcher, Mapped};
pub use effect::{EffectSettings, Effects};
pub use embed::{Embed, Lens};
pub use error::FetchError;
pub use registry::EffectRegistry;
pub use update::{Next, Update};

/// Adapts an [`Update`] program to the store's `(state, action) -> state`
/// reducer shape. Commands leave through `commands` in the order the update
/// function returned them.
pub struct UpdateReducer<U: Update> {
  program: U,
  commands: mpsc::UnboundedSender<Command<U::Action>>,
}

impl<U: Update> UpdateReducer<U> {
  pub fn new(program: U, commands: mpsc::UnboundedSender<Command<U::Action>>) -> Self {
    Self { program, commands }
  }
}

impl<U: Update> Reducer<U::State, U::Action> for UpdateReducer<U> {
  fn reduce(&self, state: U::State, action: U::Action) -> U::State {
    tracing::debug!(?action, "reduce");
    let Next { state, commands } = self.program.update(action, state);
    for command in commands {
      if self.commands.send(command).is_err() {
        tracing::warn!("effect runtime stopped, dropping command");
      }
    }
    state
  }
}

pub struct Runtime<U: Update> {
  dispatcher: Dispatcher<U::Action>,
  state: watch::Receiver<U::State>,
  registry: Arc<EffectRegistry>,
  tasks: Vec<JoinHandle<()>>,
}

impl<U: Update> Runtime<U> {
  pub async fn start(program: U, initial_state: U::State, effects: Effects) -> Self {
    let (command_tx, mut command_rx) = mpsc::unbounded_channel::<Command<U::Action>>();
    let (action_tx, mut action_rx) = mpsc::unbounded_channel::<U::Action>();
    let (state_tx, state_rx) = watch::channel(initial_state.clone());

    let store = Store::new_with_state(UpdateReducer::new(program, command_tx), initial_state);
    store
      .subscribe(move |state: &U::State| {
        state_tx.send_replace(state.clone());
      })
      .await;
    let store = Arc::new(store.wrap(ThunkMiddleware).await);

    let dispatch_store = store.clone();
    let dispatch_task = tokio::spawn(async move {
      while let Some(action) = action_rx.recv().await {
        dispatch_store.dispatch(ActionOrThunk::Action(action)).await;
      }
    });

    let registry = effects.registry().clone();
    let effect_task = tokio::spawn(async move {
      // Dropping the set aborts every thunk still running.
      let mut running = JoinSet::new();
      loop {
        tokio::select! {
          command = command_rx.recv() => {
            let Some(command) = command else { break };
            tracing::debug!(?command, "scheduling effect");
            let thunk = effects.thunk(command);
            // Thunks can sleep for seconds; keep draining commands meanwhile.
            let store = store.clone();
            running.spawn(async move { store.dispatch(ActionOrThunk::Thunk(thunk)).await });
          },
          Some(_) = running.join_next(), if !running.is_empty() => {},
        }
      }
      while running.join_next().await.is_some() {}
    });

    Self {
      dispatcher: Dispatcher::new(action_tx),
      state: state_rx,
      registry,
      tasks: vec![dispatch_task, effect_task],
    }
  }

  pub fn dispatcher(&self) -> Dispatcher<U::Action> {
    self.dispatcher.clone()
  }

  pub fn state(&self) -> U::State {
    self.state.borrow().clone()
  }

  pub fn subscribe(&self) -> watch::Receiver<U::State> {
    self.state.clone()
  }

  pub fn pending_effects(&self) -> Vec<EffectKey> {
    self.registry.pending()
  }

  /// Cancels named effects and aborts every effect still in flight, so nothing
  /// dispatches afterwards.
  pub fn shutdown(&mut self) {
    self.registry.cancel_all();
    for task in self.tasks.drain(..) {
      task.abort();
    }
  }
}

impl<U: Update> Drop for Runtime<U> {
  fn drop(&mut self) {
    self.shutdown();
  }
}

#[cfg(test)]
mod tests {
  use std::{
    sync::{
      atomic::{AtomicUsize, Ordering},
      Arc,
    },
    time::Duration,
  };

  use axum::{http::StatusCode, routing::get, Json, Router};
  use pretty_assertions::assert_eq;
  use serde_json::json;

  use super::*;
  use crate::{
    counter::{update::INPUT_DEBOUNCE, Action, AppState, Counter, FetchSettings, User},
    meta::{MetaAction, MetaApp, MetaState},
  };

  fn effects() -> Effects {
    let client = reqwest::Client::builder().no_proxy().build().expect("http client");
    Effects::with_client(client, EffectSettings { retry_backoff: Duration::from_millis(10) })
  }

  fn counter_for(users_url: String, timeout: Duration, retries: Option<u32>) -> Counter {
    Counter::new(FetchSettings { users_url, timeout, retries })
  }

  async fn serve(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move { axum::serve(listener, router).await.expect("serve") });
    format!("http://{addr}/users")
  }

  async fn settle<S: Clone>(rx: &mut watch::Receiver<S>, done: impl FnMut(&S) -> bool) -> S {
    let state = tokio::time::timeout(Duration::from_secs(10), rx.wait_for(done))
      .await
      .expect("state never settled")
      .expect("runtime stopped");
    state.clone()
  }

  #[tokio::test(start_paused = true)]
  async fn delayed_increment_lands_after_a_second() {
    let runtime = Runtime::start(Counter::default(), AppState::new(), effects()).await;
    runtime.dispatcher().dispatch(Action::DelayedIncrement);

    tokio::time::sleep(Duration::from_millis(900)).await;
    assert_eq!(runtime.state().counter, 0);

    tokio::time::sleep(Duration::from_millis(200)).await;
    assert_eq!(runtime.state().counter, 1);
  }

  #[tokio::test(start_paused = true)]
  async fn increments_apply_in_dispatch_order() {
    let runtime = Runtime::start(Counter::default(), AppState::new(), effects()).await;
    let dispatcher = runtime.dispatcher();
    for action in [Action::Increment, Action::Increment, Action::Decrement, Action::Noop, Action::Increment] {
      dispatcher.dispatch(action);
    }

    let mut rx = runtime.subscribe();
    let state = settle(&mut rx, |s: &AppState| s.counter == 2).await;
    assert_eq!(state, AppState { counter: 2, ..AppState::new() });
  }

  #[tokio::test(start_paused = true)]
  async fn input_bursts_collapse_into_one_increment() {
    let runtime = Runtime::start(Counter::default(), AppState::new(), effects()).await;
    let dispatcher = runtime.dispatcher();

    for value in ["a", "ab", "abc"] {
      dispatcher.dispatch(Action::ChangeInput { value: value.to_string() });
      tokio::time::sleep(Duration::from_millis(100)).await;
    }
    assert_eq!(runtime.pending_effects(), vec![INPUT_DEBOUNCE]);
    assert_eq!(runtime.state().counter, 0);

    tokio::time::sleep(Duration::from_secs(2)).await;
    assert_eq!(runtime.state().counter, 1);
    assert!(runtime.pending_effects().is_empty());
  }

  #[tokio::test(start_paused = true)]
  async fn composed_delay_lands_in_its_own_pane() {
    let runtime = Runtime::start(MetaApp::new(Counter::default()), MetaState::default(), effects()).await;
    let right = runtime.dispatcher().map(MetaAction::App2);

    right.dispatch(Action::DelayedIncrement);
    tokio::time::sleep(Duration::from_millis(1100)).await;

    let state = runtime.state();
    assert_eq!(state.app1, AppState::new());
    assert_eq!(state.app2.counter, 1);
  }

  #[tokio::test(start_paused = true)]
  async fn shutdown_stops_pending_delays() {
    let mut runtime = Runtime::start(Counter::default(), AppState::new(), effects()).await;
    let rx = runtime.subscribe();
    runtime.dispatcher().dispatch(Action::DelayedIncrement);

    tokio::time::sleep(Duration::from_millis(100)).await;
    runtime.shutdown();
    tokio::time::sleep(Duration::from_secs(2)).await;

    assert_eq!(rx.borrow().counter, 0);
  }

  #[tokio::test]
  async fn newer_retry_supersedes_the_pending_one() {
    let users = vec![User { id: 2, name: "Ervin Howell".into(), username: "Antonette".into(), email: "Shanna@melissa.tv".into() }];
    let body = json!(users);
    let hits = Arc::new(AtomicUsize::new(0));
    let counted = hits.clone();
    let url = serve(Router::new().route(
      "/users",
      get(move || {
        let hits = counted.clone();
        let body = body.clone();
        async move {
          hits.fetch_add(1, Ordering::SeqCst);
          tokio::time::sleep(Duration::from_millis(300)).await;
          Json(body)
        }
      }),
    ))
    .await;

    let program = MetaApp::new(counter_for(url, Duration::from_secs(2), Some(3)));
    let runtime = Runtime::start(program, MetaState::default(), effects()).await;
    let dispatcher = runtime.dispatcher();
    dispatcher.dispatch(MetaAction::App1(Action::FetchUsers));
    tokio::time::sleep(Duration::from_millis(50)).await;
    dispatcher.dispatch(MetaAction::App2(Action::FetchUsers));

    let mut rx = runtime.subscribe();
    let state = settle(&mut rx, |s: &MetaState| !s.app2.users.is_empty() || s.app2.error.is_some()).await;
    assert_eq!(state.app2, AppState { counter: 1, error: None, users });

    // the first request would have answered by now
    tokio::time::sleep(Duration::from_millis(400)).await;
    let state = runtime.state();
    assert_eq!(state.app1, AppState { counter: 1, ..AppState::new() });
    assert_eq!(hits.load(Ordering::SeqCst), 2);
    assert!(runtime.pending_effects().is_empty());
  }

  #[tokio::test]
  async fn fetched_users_replace_the_list() {
    let users = vec![User { id: 1, name: "Leanne Graham".into(), username: "Bret".into(), email: "Sincere@april.biz".into() }];
    let body = json!(users);
    let url = serve(Router::new().route("/users", get(move || async move { Json(body) }))).await;

    let runtime =
      Runtime::start(counter_for(url, Duration::from_secs(2), None), AppState::new(), effects()).await;
    runtime.dispatcher().dispatch(Action::FetchUsers);

    let mut rx = runtime.subscribe();
    let state = settle(&mut rx, |s: &AppState| !s.users.is_empty() || s.error.is_some()).await;
    assert_eq!(state, AppState { counter: 1, error: None, users });
  }

  #[tokio::test]
  async fn server_errors_are_retried_until_exhausted() {
    let hits = Arc::new(AtomicUsize::new(0));
    let counted = hits.clone();
    let url = serve(Router::new().route(
      "/users",
      get(move || {
        let hits = counted.clone();
        async move {
          hits.fetch_add(1, Ordering::SeqCst);
          StatusCode::SERVICE_UNAVAILABLE
        }
      }),
    ))
    .await;

    let runtime =
      Runtime::start(counter_for(url, Duration::from_secs(2), Some(3)), AppState::new(), effects()).await;
    runtime.dispatcher().dispatch(Action::FetchUsers);

    let mut rx = runtime.subscribe();
    let state = settle(&mut rx, |s: &AppState| s.error.is_some()).await;
    assert_eq!(
      state.error,
      Some(FetchError::Exhausted { attempts: 3, last: Box::new(FetchError::Status { status: 503 }) })
    );
    assert_eq!(state.counter, 1);
    assert_eq!(hits.load(Ordering::SeqCst), 3);
    assert!(runtime.pending_effects().is_empty());
  }

  #[tokio::test]
  async fn slow_responses_surface_as_timeouts() {
    let url = serve(Router::new().route(
      "/users",
      get(|| async {
        tokio::time::sleep(Duration::from_millis(500)).await;
        Json(json!([]))
      }),
    ))
    .await;

    let runtime =
      Runtime::start(counter_for(url.clone(), Duration::from_millis(35), None), AppState::new(), effects()).await;
    runtime.dispatcher().dispatch(Action::FetchUsers);

    let mut rx = runtime.subscribe();
    let state = settle(&mut rx, |s: &AppState| s.error.is_some()).await;
    assert_eq!(state.error, Some(FetchError::Timeout { url, timeout_ms: 35 }));
    assert!(state.users.is_empty());
  }

  #[tokio::test]
  async fn missing_routes_are_not_retried() {
    let hits = Arc::new(AtomicUsize::new(0));
    let counted = hits.clone();
    let url = serve(Router::new().route(
      "/elsewhere",
      get(move || {
        let hits = counted.clone();
        async move {
          hits.fetch_add(1, Ordering::SeqCst);
          StatusCode::OK
        }
      }),
    ))
    .await;

    let runtime =
      Runtime::start(counter_for(url, Duration::from_secs(2), Some(5)), AppState::new(), effects()).await;
    runtime.dispatcher().dispatch(Action::FetchUsers);

    let mut rx = runtime.subscribe();
    let state = settle(&mut rx, |s: &AppState| s.error.is_some()).await;
    assert_eq!(state.error, Some(FetchError::Status { status: 404 }));
    assert_eq!(hits.load(Ordering::SeqCst), 0);
  }
}
