use std::sync::Arc;

use adapter::auth::JwtCodec;
use adapter::database::ConnectionPool;
use adapter::mailer::RegistrationNotifier;
use adapter::repository::auth::AuthRepositoryImpl;
use adapter::repository::event::EventRepositoryImpl;
use adapter::repository::health::HealthCheckRepositoryImpl;
use adapter::repository::space::SpaceRepositoryImpl;
use adapter::repository::user::UserRepositoryImpl;
use adapter::storage::FileStorage;
use kernel::repository::auth::AuthRepository;
use kernel::repository::event::EventRepository;
use kernel::repository::health::HealthCheckRepository;
use kernel::repository::space::SpaceRepository;
use kernel::repository::user::UserRepository;
use shared::config::AppConfig;

#[derive(Clone)]
pub struct AppRegistry {
    health_check_repository: Arc<dyn HealthCheckRepository>,
    user_repository: Arc<dyn UserRepository>,
    event_repository: Arc<dyn EventRepository>,
    space_repository: Arc<dyn SpaceRepository>,
    auth_repository: Arc<dyn AuthRepository>,
    file_storage: Arc<FileStorage>,
    notifier: Arc<RegistrationNotifier>,
}

impl AppRegistry {
    pub fn new(pool: ConnectionPool, app_config: AppConfig) -> Self {
        let health_check_repository = Arc::new(HealthCheckRepositoryImpl::new(pool.clone()));
        let user_repository = Arc::new(UserRepositoryImpl::new(pool.clone()));
        let event_repository = Arc::new(EventRepositoryImpl::new(pool.clone()));
        let space_repository = Arc::new(SpaceRepositoryImpl::new(pool.clone()));
        let auth_repository = Arc::new(AuthRepositoryImpl::new(
            pool.clone(),
            JwtCodec::new(&app_config.auth),
        ));
        let file_storage = Arc::new(FileStorage::new(&app_config.storage));
        let notifier = Arc::new(RegistrationNotifier::new(&app_config.mailer));
        Self {
            health_check_repository,
            user_repository,
            event_repository,
            space_repository,
            auth_repository,
            file_storage,
            notifier,
        }
    }

    pub fn health_check_repository(&self) -> Arc<dyn HealthCheckRepository> {
        self.health_check_repository.clone()
    }

    pub fn user_repository(&self) -> Arc<dyn UserRepository> {
        self.user_repository.clone()
    }

    pub fn event_repository(&self) -> Arc<dyn EventRepository> {
        self.event_repository.clone()
    }

    pub fn space_repository(&self) -> Arc<dyn SpaceRepository> {
        self.space_repository.clone()
    }

    pub fn auth_repository(&self) -> Arc<dyn AuthRepository> {
        self.auth_repository.clone()
    }

    pub fn file_storage(&self) -> Arc<FileStorage> {
        self.file_storage.clone()
    }

    pub fn notifier(&self) -> Arc<RegistrationNotifier> {
        self.notifier.clone()
    }
}
