use std::sync::Arc;

use engine::{ContestEngine, Ledger, MembershipGate};

use crate::config::AppConfig;
use crate::questions::QuestionBank;
use crate::users::UserDirectory;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub users: Arc<UserDirectory>,
    pub questions: Arc<QuestionBank>,
    pub ledger: Arc<Ledger>,
    pub memberships: Arc<MembershipGate>,
    pub contests: Arc<ContestEngine>,
}

impl AppState {
    /// Wire up the engine components. The user directory doubles as the
    /// identity collaborator and the question bank as the question source.
    pub fn new(config: AppConfig) -> Self {
        let users = Arc::new(UserDirectory::new());
        let questions = Arc::new(QuestionBank::new());
        let ledger = Arc::new(Ledger::new());
        let memberships = Arc::new(MembershipGate::new());
        let contests = Arc::new(ContestEngine::new(
            config.engine.clone(),
            ledger.clone(),
            memberships.clone(),
            questions.clone(),
            users.clone(),
        ));

        Self {
            config: Arc::new(config),
            users,
            questions,
            ledger,
            memberships,
            contests,
        }
    }
}
