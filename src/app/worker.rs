use std::sync::mpsc::{Receiver, Sender};
use tokio::runtime::Runtime;
use tracing::{error, info, warn};

use crate::config::Config;
use crate::data::Query;
use crate::error::TriageError;
use crate::services::{
    AuthFlow, GhCliAuth, GithubClient, SqliteSettingsStore, SystemBrowser, WebAuthFlow,
};
use crate::tabs::{LoadOutcome, WindowOrchestrator};

use super::message::{Job, JobResult};

/// Owns the authenticated client and the browser and runs jobs one at a
/// time, so two loads never overlap.
pub struct Worker {
    owner: String,
    repo: String,
    auth: Box<dyn AuthFlow>,
    client: Option<GithubClient>,
    browser: SystemBrowser,
    settings: SqliteSettingsStore,
}

impl Worker {
    pub fn from_config(config: &Config) -> Self {
        let auth: Box<dyn AuthFlow> = match &config.login_url {
            Some(url) => Box::new(WebAuthFlow::new(url, config.opener.clone())),
            None => Box::new(GhCliAuth),
        };

        Self {
            owner: config.owner.clone(),
            repo: config.repo.clone(),
            auth,
            client: None,
            browser: SystemBrowser::new(config.opener.clone(), config.new_window_flag.clone()),
            settings: SqliteSettingsStore::new(config.settings_path.clone()),
        }
    }

    /// Blocks on the job channel until the UI hangs up.
    pub fn run(mut self, rt: Runtime, jobs: Receiver<Job>, results: Sender<JobResult>) {
        while let Ok(job) = jobs.recv() {
            let result = rt.block_on(self.handle(job));
            if results.send(result).is_err() {
                break;
            }
        }
        info!("worker stopped");
    }

    pub async fn handle(&mut self, job: Job) -> JobResult {
        match job {
            Job::Authenticate => match self.authenticate().await {
                Ok(user) => JobResult::Authenticated { user },
                Err(e) => {
                    error!(error = %e, "authentication failed");
                    JobResult::AuthFailed(e.to_string())
                }
            },
            Job::LoadLabels => {
                let Some(client) = &self.client else {
                    return JobResult::LabelsFailed("not signed in".to_string());
                };
                match client.list_labels().await {
                    Ok(labels) => JobResult::LabelsLoaded(labels),
                    Err(e) => {
                        warn!(error = %e, "could not load labels");
                        JobResult::LabelsFailed(e.to_string())
                    }
                }
            }
            Job::LoadIssues(query) => match self.load_issues(&query).await {
                Ok(outcome) => JobResult::IssuesLoaded(outcome),
                Err(e) => {
                    error!(error = %e, "load failed");
                    JobResult::LoadFailed(e.to_string())
                }
            },
        }
    }

    async fn authenticate(&mut self) -> Result<Option<String>, TriageError> {
        self.client = None;
        let token = self.auth.authenticate().await?;
        let client = GithubClient::from_token(token, &self.owner, &self.repo)?;

        let user = match client.current_user().await {
            Ok(login) => Some(login),
            Err(e) => {
                warn!(error = %e, "could not resolve current user");
                None
            }
        };

        info!(repo = %client.repo_display(), user = user.as_deref().unwrap_or("?"), "signed in");
        self.client = Some(client);
        Ok(user)
    }

    async fn load_issues(&self, query: &Query) -> Result<LoadOutcome, TriageError> {
        let client = self
            .client
            .as_ref()
            .ok_or_else(|| TriageError::AuthenticationFailed("not signed in".to_string()))?;

        WindowOrchestrator::new(client, &self.browser)
            .with_settings(&self.settings)
            .run(query)
            .await
    }
}
