use log::info;
use serde::Deserialize;
use serde_json::json;

use crate::domain::{JobInfo, JobWithAttempts};
use crate::error::Result;

use super::client::ApiClient;

/// Job history endpoints.
pub struct JobService<'a> {
    client: &'a ApiClient,
}

#[derive(Deserialize)]
struct JobList {
    jobs: Vec<JobWithAttempts>,
}

impl<'a> JobService<'a> {
    pub fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub async fn get(&self, job_id: i64) -> Result<JobInfo> {
        self.client.post("v1/jobs/get", &json!({ "id": job_id })).await
    }

    /// Lists jobs of one connection (or connector), newest first as the
    /// server returns them.
    pub async fn list(
        &self,
        config_id: &str,
        config_types: &[String],
    ) -> Result<Vec<JobWithAttempts>> {
        let list: JobList = self
            .client
            .post(
                "v1/jobs/list",
                &json!({ "configId": config_id, "configTypes": config_types }),
            )
            .await?;

        info!("Fetched {} jobs for {config_id}", list.jobs.len());
        Ok(list.jobs)
    }
}
