pub mod catalog;
pub mod library;
pub mod stats;

use anyhow::{Context as _, Result, bail};
use gamebox_catalog::{CatalogAdapter, CatalogGame, IgdbSource};
use gamebox_config::GameboxConfig;
use gamebox_library::{LibrarySync, SqliteStore};
use gamebox_session::{AuthUser, LocalIdentity, Session};
use std::path::Path;

/// Everything a command needs: configuration and the chosen profile
pub struct Context {
    pub config: GameboxConfig,
    user: Option<String>,
}

impl Context {
    pub fn load(config_path: Option<&Path>, user: Option<String>) -> Result<Self> {
        let config = match config_path {
            Some(path) => GameboxConfig::load(path)
                .with_context(|| format!("Failed to load {}", path.display()))?,
            None => GameboxConfig::load_default()?,
        };

        let user = user
            .or_else(|| config.session.default_user.clone())
            .filter(|uid| !uid.trim().is_empty());

        Ok(Self { config, user })
    }

    pub fn catalog(&self) -> Result<CatalogAdapter<IgdbSource>> {
        let source = IgdbSource::new(&self.config.catalog)?;
        Ok(CatalogAdapter::new(source).with_min_query_len(self.config.search.min_query_len))
    }

    /// Resolve the signed-in profile through a session
    pub async fn signed_in_user(&self) -> Result<AuthUser> {
        let identity = match &self.user {
            Some(uid) => LocalIdentity::signed_in(AuthUser {
                uid: uid.clone(),
                email: None,
                display_name: None,
                photo_url: None,
            }),
            None => LocalIdentity::new(),
        };

        let session = Session::init(identity, &self.config.session);
        let snapshot = session.ready().await;
        session.shutdown();

        match snapshot.user {
            Some(user) => Ok(user),
            None => bail!("No profile selected; pass --user or set session.default_user"),
        }
    }

    /// Open the signed-in user's library, loaded from disk
    pub async fn library(&self) -> Result<LibrarySync<SqliteStore>> {
        let user = self.signed_in_user().await?;
        let path = &self.config.library.database_path;
        let store = SqliteStore::open(path)
            .with_context(|| format!("Failed to open library at {}", path.display()))?;

        let mut library = LibrarySync::new(store, user.uid);
        library.load().await?;
        Ok(library)
    }
}

/// One catalog game per line
pub fn print_games(games: &[CatalogGame]) {
    if games.is_empty() {
        println!("no signals");
        return;
    }

    for game in games {
        println!(
            "{:>8}  {} ({})  {:.1}/5  {}",
            game.id, game.title, game.release_year, game.rating, game.developer
        );
    }
}
