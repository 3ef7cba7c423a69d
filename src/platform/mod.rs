//! Platform leaderboard integration
//!
//! On iOS builds the page runs inside a native shell that exposes a
//! GameCenter plugin. Everything here is optional: failures are reported
//! to the caller and logged, never fed back into the simulation.

#[cfg(target_arch = "wasm32")]
mod gamecenter;

#[cfg(target_arch = "wasm32")]
pub use gamecenter::GameCenter;

use std::cell::RefCell;
use std::fmt;

/// Leaderboard the game submits to
pub const DEFAULT_LEADERBOARD_ID: &str = "lanerush.highscores";

/// Leaderboard failures
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlatformError {
    /// Submit/show attempted before a successful authentication
    NotAuthenticated,
    /// A required argument was empty
    MissingArgument(&'static str),
    /// The platform call failed
    Rejected(String),
}

impl fmt::Display for PlatformError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlatformError::NotAuthenticated => write!(f, "player not authenticated"),
            PlatformError::MissingArgument(name) => write!(f, "missing {name}"),
            PlatformError::Rejected(msg) => write!(f, "platform call failed: {msg}"),
        }
    }
}

impl std::error::Error for PlatformError {}

/// Raw platform calls
#[allow(async_fn_in_trait)]
pub trait LeaderboardBackend {
    /// Sign the player in. `Ok(Some(id))` when authenticated, `Ok(None)`
    /// when the player declined or no account is available.
    async fn authenticate(&self) -> Result<Option<String>, PlatformError>;
    async fn submit_score(&self, score: i64, leaderboard_id: &str) -> Result<(), PlatformError>;
    async fn show_leaderboard(&self, leaderboard_id: &str) -> Result<(), PlatformError>;
}

/// Backend for platforms without a leaderboard service
#[derive(Debug, Clone, Copy, Default)]
pub struct NoLeaderboard;

impl LeaderboardBackend for NoLeaderboard {
    async fn authenticate(&self) -> Result<Option<String>, PlatformError> {
        Ok(None)
    }

    async fn submit_score(&self, _score: i64, _leaderboard_id: &str) -> Result<(), PlatformError> {
        Err(PlatformError::NotAuthenticated)
    }

    async fn show_leaderboard(&self, _leaderboard_id: &str) -> Result<(), PlatformError> {
        Err(PlatformError::NotAuthenticated)
    }
}

/// Leaderboard client that remembers the signed-in player
///
/// Methods take `&self` so the client can be shared with spawned futures;
/// no borrow is held across an await.
pub struct Leaderboard<B> {
    backend: B,
    leaderboard_id: String,
    player_id: RefCell<Option<String>>,
}

impl<B: LeaderboardBackend> Leaderboard<B> {
    pub fn new(backend: B, leaderboard_id: impl Into<String>) -> Self {
        Self {
            backend,
            leaderboard_id: leaderboard_id.into(),
            player_id: RefCell::new(None),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.player_id.borrow().is_some()
    }

    pub fn player_id(&self) -> Option<String> {
        self.player_id.borrow().clone()
    }

    /// Authenticate once; later calls return the cached result
    pub async fn authenticate(&self) -> Result<bool, PlatformError> {
        if self.is_authenticated() {
            return Ok(true);
        }
        let result = self.backend.authenticate().await?;
        let authenticated = result.is_some();
        match &result {
            Some(id) => log::info!("Leaderboard: authenticated as {id}"),
            None => log::info!("Leaderboard: player not signed in"),
        }
        *self.player_id.borrow_mut() = result;
        Ok(authenticated)
    }

    /// Submit a finished run (negative scores submit as 0)
    pub async fn submit_score(&self, score: i64) -> Result<(), PlatformError> {
        self.check_ready()?;
        self.backend
            .submit_score(score.max(0), &self.leaderboard_id)
            .await?;
        log::info!("Leaderboard: submitted {score}");
        Ok(())
    }

    pub async fn show(&self) -> Result<(), PlatformError> {
        self.check_ready()?;
        self.backend.show_leaderboard(&self.leaderboard_id).await
    }

    fn check_ready(&self) -> Result<(), PlatformError> {
        if self.leaderboard_id.is_empty() {
            return Err(PlatformError::MissingArgument("leaderboardId"));
        }
        if !self.is_authenticated() {
            return Err(PlatformError::NotAuthenticated);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::future::Future;
    use std::pin::pin;
    use std::task::{Context, Poll, Waker};

    fn block_on<F: Future>(fut: F) -> F::Output {
        let mut fut = pin!(fut);
        let mut cx = Context::from_waker(Waker::noop());
        loop {
            if let Poll::Ready(out) = fut.as_mut().poll(&mut cx) {
                return out;
            }
        }
    }

    #[derive(Default)]
    struct MockBackend {
        player: Option<String>,
        auth_calls: Cell<u32>,
        submitted: RefCell<Vec<(i64, String)>>,
        fail_submit: bool,
    }

    impl LeaderboardBackend for MockBackend {
        async fn authenticate(&self) -> Result<Option<String>, PlatformError> {
            self.auth_calls.set(self.auth_calls.get() + 1);
            Ok(self.player.clone())
        }

        async fn submit_score(&self, score: i64, leaderboard_id: &str) -> Result<(), PlatformError> {
            if self.fail_submit {
                return Err(PlatformError::Rejected("network".into()));
            }
            self.submitted
                .borrow_mut()
                .push((score, leaderboard_id.to_string()));
            Ok(())
        }

        async fn show_leaderboard(&self, _leaderboard_id: &str) -> Result<(), PlatformError> {
            Ok(())
        }
    }

    fn signed_in() -> MockBackend {
        MockBackend {
            player: Some("G:123".into()),
            ..Default::default()
        }
    }

    #[test]
    fn test_submit_requires_authentication() {
        let board = Leaderboard::new(signed_in(), DEFAULT_LEADERBOARD_ID);
        assert_eq!(
            block_on(board.submit_score(10)),
            Err(PlatformError::NotAuthenticated)
        );
        assert_eq!(block_on(board.show()), Err(PlatformError::NotAuthenticated));

        assert_eq!(block_on(board.authenticate()), Ok(true));
        assert_eq!(block_on(board.submit_score(10)), Ok(()));
        assert_eq!(
            board.backend.submitted.borrow().as_slice(),
            &[(10, DEFAULT_LEADERBOARD_ID.to_string())]
        );
    }

    #[test]
    fn test_authenticate_is_idempotent() {
        let board = Leaderboard::new(signed_in(), DEFAULT_LEADERBOARD_ID);
        block_on(board.authenticate()).unwrap();
        block_on(board.authenticate()).unwrap();
        assert_eq!(board.backend.auth_calls.get(), 1);
        assert_eq!(board.player_id().as_deref(), Some("G:123"));
    }

    #[test]
    fn test_declined_and_missing_id() {
        let board = Leaderboard::new(MockBackend::default(), DEFAULT_LEADERBOARD_ID);
        assert_eq!(block_on(board.authenticate()), Ok(false));
        assert!(!board.is_authenticated());

        let board = Leaderboard::new(signed_in(), "");
        block_on(board.authenticate()).unwrap();
        assert_eq!(
            block_on(board.submit_score(5)),
            Err(PlatformError::MissingArgument("leaderboardId"))
        );
    }

    #[test]
    fn test_backend_failure_is_reported() {
        let board = Leaderboard::new(
            MockBackend {
                fail_submit: true,
                ..signed_in()
            },
            DEFAULT_LEADERBOARD_ID,
        );
        block_on(board.authenticate()).unwrap();
        let err = block_on(board.submit_score(-40)).unwrap_err();
        assert_eq!(err.to_string(), "platform call failed: network");
    }

    #[test]
    fn test_no_leaderboard_never_authenticates() {
        let board = Leaderboard::new(NoLeaderboard, DEFAULT_LEADERBOARD_ID);
        assert_eq!(block_on(board.authenticate()), Ok(false));
        assert_eq!(
            block_on(board.submit_score(1)),
            Err(PlatformError::NotAuthenticated)
        );
    }
}
