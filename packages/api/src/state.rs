// ABOUTME: Shared application state for API handlers
// ABOUTME: Storages, the access evaluator, the hierarchy manager, JWT, and AI

use std::sync::Arc;

use sqlx::SqlitePool;

use canopy_ai::AiService;
use canopy_auth::JwtAuth;
use canopy_interviews::{InterviewStorage, TemplateStorage};
use canopy_products::{AccessEvaluator, HierarchyManager, ProductStorage};
use canopy_reminders::ReminderStorage;
use canopy_tasks::TaskStorage;
use canopy_users::UserStorage;

/// Shared state for API handlers
#[derive(Clone)]
pub struct AppState {
    pub pool: SqlitePool,
    pub user_storage: Arc<UserStorage>,
    pub product_storage: Arc<ProductStorage>,
    pub evaluator: Arc<AccessEvaluator>,
    pub hierarchy: Arc<HierarchyManager>,
    pub task_storage: Arc<TaskStorage>,
    pub interview_storage: Arc<InterviewStorage>,
    pub template_storage: Arc<TemplateStorage>,
    pub reminder_storage: Arc<ReminderStorage>,
    pub jwt: Arc<JwtAuth>,
    pub ai: Arc<AiService>,
}

impl AppState {
    pub fn new(pool: SqlitePool, jwt: JwtAuth, ai: AiService) -> Self {
        Self {
            user_storage: Arc::new(UserStorage::new(pool.clone())),
            product_storage: Arc::new(ProductStorage::new(pool.clone())),
            evaluator: Arc::new(AccessEvaluator::new(pool.clone())),
            hierarchy: Arc::new(HierarchyManager::new(pool.clone())),
            task_storage: Arc::new(TaskStorage::new(pool.clone())),
            interview_storage: Arc::new(InterviewStorage::new(pool.clone())),
            template_storage: Arc::new(TemplateStorage::new(pool.clone())),
            reminder_storage: Arc::new(ReminderStorage::new(pool.clone())),
            jwt: Arc::new(jwt),
            ai: Arc::new(ai),
            pool,
        }
    }
}
