//! Basic example of the Amanah injector.

use amanah_container::error::Result;
use amanah_container::injector::Injector;
use amanah_container::key::TypeKey;
use amanah_container::metadata::DeclarationTable;
use std::sync::Arc;

// === Define your types ===

struct Config {
    database_url: String,
}

struct Database {
    config: Arc<Config>,
}

impl Database {
    fn query(&self, sql: &str) -> String {
        tracing::info!(sql, "executing query");
        format!("Results from {}", self.config.database_url)
    }
}

struct UserRepository {
    db: Arc<Database>,
}

impl UserRepository {
    fn find_user(&self, id: u64) -> String {
        self.db
            .query(&format!("SELECT * FROM users WHERE id = {id}"))
    }
}

struct UserService {
    repo: Arc<UserRepository>,
}

impl UserService {
    fn get_user(&self, id: u64) -> String {
        self.repo.find_user(id)
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    // Declare each constructor's parameter types, in order.
    let metadata = DeclarationTable::new()
        .declare::<Config>(vec![])
        .declare::<Database>(vec![TypeKey::of::<Config>()])
        .declare::<UserRepository>(vec![TypeKey::of::<Database>()])
        .declare::<UserService>(vec![TypeKey::of::<UserRepository>()]);

    let injector = Injector::new(Arc::new(metadata));

    injector.register::<Config>(|_| {
        Ok(Config {
            database_url: "postgres://localhost".into(),
        })
    })?;
    injector.register::<Database>(|args| {
        Ok(Database {
            config: args.arg::<Config>(0)?,
        })
    })?;
    injector.register::<UserRepository>(|args| {
        Ok(UserRepository {
            db: args.arg::<Database>(0)?,
        })
    })?;
    injector.register::<UserService>(|args| {
        Ok(UserService {
            repo: args.arg::<UserRepository>(0)?,
        })
    })?;

    // Singleton: every `get` returns the same service.
    let service: Arc<UserService> = injector.get()?;
    println!("{}", service.get_user(7));

    // Transient: a fresh service, still sharing the singleton repo.
    let fresh: Arc<UserService> = injector.instantiate()?;
    assert!(!Arc::ptr_eq(&service, &fresh));
    assert!(Arc::ptr_eq(&service.repo, &fresh.repo));
    println!("{}", fresh.get_user(8));

    Ok(())
}
