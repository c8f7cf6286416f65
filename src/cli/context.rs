use std::{path::PathBuf, sync::Arc, time::Duration};

use indicatif::{ProgressBar, ProgressStyle};

use crate::{
    config::{self, Config},
    error,
    error::{Error, Result},
    management::{FileTokenStore, TokenManager},
    session,
    spotify::SpotifyClient,
};

/// Everything a command needs, built once per run and passed down explicitly.
pub struct Context {
    pub config: Config,
    pub manager: Arc<TokenManager>,
    pub data_dir: PathBuf,
}

impl Context {
    pub fn new(config: Config) -> Result<Self> {
        let data_dir = config::data_dir();
        let store = Arc::new(FileTokenStore::new(&data_dir));
        let manager = Arc::new(TokenManager::new(&config, store)?);

        Ok(Self {
            config,
            manager,
            data_dir,
        })
    }

    /// Client for the current session, or exits with a hint to sign in again.
    pub async fn client(&self) -> SpotifyClient {
        let user = match session::load_current(&self.data_dir).await {
            Ok(Some(user)) => user,
            Ok(None) => error!("No session found. Please run spotdash auth"),
            Err(e) => error!("Failed to load session. Err: {}", e),
        };

        match SpotifyClient::create(&user.id, &self.config, Arc::clone(&self.manager)).await {
            Ok(Some(client)) => client,
            Ok(None) => error!(
                "Session for {} has expired. Please run spotdash auth",
                user.name
            ),
            Err(e) => fail(e),
        }
    }
}

/// Reports a library error and exits.
pub fn fail(err: Error) -> ! {
    if err.is_terminal() {
        error!("Your Spotify session has ended ({}). Please run spotdash auth", err)
    }
    error!("{}", err)
}

pub fn spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb.set_style(
        ProgressStyle::with_template("{spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"),
    );
    pb
}

/// Runs `fut` behind a spinner; errors end the program.
pub async fn fetch<T, F>(message: &str, fut: F) -> Option<T>
where
    F: std::future::Future<Output = Result<Option<T>>>,
{
    let pb = spinner(message);
    let result = fut.await;
    pb.finish_and_clear();

    match result {
        Ok(value) => value,
        Err(e) => fail(e),
    }
}
