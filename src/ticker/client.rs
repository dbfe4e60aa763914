use anyhow::Result;

use super::server::{HistoryResponse, InfoResponse, LatestResponse};

///Blocking client for the tick server, for subscribers that do nothing but poll.
#[derive(Debug)]
pub struct TickClient {
    pub path: String,
    pub client: reqwest::blocking::Client,
}

impl TickClient {
    pub fn new(path: String) -> Self {
        Self {
            path,
            client: reqwest::blocking::Client::new(),
        }
    }

    pub fn info(&self) -> Result<InfoResponse> {
        Ok(self
            .client
            .get(self.path.clone() + "/")
            .send()?
            .json::<InfoResponse>()?)
    }

    pub fn latest(&self) -> Result<LatestResponse> {
        Ok(self
            .client
            .get(self.path.clone() + "/latest")
            .send()?
            .json::<LatestResponse>()?)
    }

    pub fn history(&self, from: usize) -> Result<HistoryResponse> {
        Ok(self
            .client
            .get(self.path.clone() + format!("/history/{from}").as_str())
            .send()?
            .json::<HistoryResponse>()?)
    }
}
