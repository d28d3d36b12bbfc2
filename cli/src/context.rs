//! Console wiring for one CLI invocation.

use std::path::PathBuf;

use anyhow::{Context as _, Result, bail};
use chaos_business::{BusinessConfig, Console, MemoryStorage, NoticeReceiver, TokenStore};

use crate::config::{Config, FileStorage};
use crate::output::Output;

pub struct AppContext {
    pub console: Console,
    pub out: Output,
    notices: NoticeReceiver,
}

impl AppContext {
    /// Builds the console from flags, falling back to `CHAOS_*` environment
    /// variables and the default config file.
    pub fn from_args(api_url: Option<String>, config_path: Option<PathBuf>) -> Result<Self> {
        let config = match api_url {
            Some(url) => BusinessConfig::new(url),
            None => BusinessConfig::from_env().context("Invalid CHAOS_* environment")?,
        };
        let path = match config_path {
            Some(path) => path,
            None => Config::default_path()?,
        };
        let tokens = TokenStore::new(
            Box::new(FileStorage::open(path)),
            Box::new(MemoryStorage::default()),
        );
        Ok(Self::new(config, tokens))
    }

    pub fn new(config: BusinessConfig, tokens: TokenStore) -> Self {
        let (console, notices) = Console::new(config, tokens);
        Self {
            console,
            out: Output::new(),
            notices,
        }
    }

    pub fn require_session(&self) -> Result<()> {
        if !self.console.session.is_authenticated() {
            bail!("Not signed in. Run `chaos login --remember` or use `chaos shell`.");
        }
        Ok(())
    }

    /// Prints queued notices. The first error notice becomes the command's
    /// failure; any later ones are printed.
    pub fn report(&self) -> Result<()> {
        let mut failure = None;
        for notice in self.notices.drain() {
            if notice.is_error() && failure.is_none() {
                failure = Some(notice.message);
            } else {
                self.out.notice(&notice);
            }
        }
        match failure {
            Some(message) => bail!(message),
            None => Ok(()),
        }
    }

    /// Like [`report`](Self::report), but errors are printed instead of
    /// returned. Used by the shell, which keeps running.
    pub fn show_notices(&self) {
        for notice in self.notices.drain() {
            self.out.notice(&notice);
        }
    }
}
