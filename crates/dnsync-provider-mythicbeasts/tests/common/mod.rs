//! Test doubles and common utilities for provider contract tests
//!
//! `MockTransport` stands in for the HTTP API: it replays canned responses
//! and records every request the provider makes.

#![allow(dead_code)]

use dnsync_core::error::Result;
use dnsync_core::{Record, Zone, ZoneName};
use dnsync_provider_mythicbeasts::MythicBeastsProvider;
use dnsync_provider_mythicbeasts::transport::{ApiCommand, ApiRequest, ApiResponse, ZoneTransport};
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

/// A request as seen by the mock
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeenRequest {
    pub domain: String,
    pub password: String,
    /// `None` for LIST, the command line otherwise
    pub command: Option<String>,
    pub form: Vec<(String, String)>,
}

/// A transport double sharing its state between clones
#[derive(Clone)]
pub struct MockTransport {
    /// Responses used in order before falling back to `fallback`
    queued: Arc<Mutex<VecDeque<ApiResponse>>>,
    /// Response for every request once the queue is empty
    fallback: Arc<Mutex<ApiResponse>>,
    /// Every request received, in order
    seen: Arc<Mutex<Vec<SeenRequest>>>,
}

impl MockTransport {
    /// Answer every request with `status` and `body`
    pub fn replying(status: u16, body: &str) -> Self {
        Self {
            queued: Arc::new(Mutex::new(VecDeque::new())),
            fallback: Arc::new(Mutex::new(ApiResponse::new(status, body))),
            seen: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Answer the next request with `status` and `body` instead
    pub fn then(self, status: u16, body: &str) -> Self {
        self.queued
            .lock()
            .unwrap()
            .push_back(ApiResponse::new(status, body));
        self
    }

    /// Change the response used once the queue is empty
    pub fn set_reply(&self, status: u16, body: &str) {
        *self.fallback.lock().unwrap() = ApiResponse::new(status, body);
    }

    pub fn requests(&self) -> Vec<SeenRequest> {
        self.seen.lock().unwrap().clone()
    }

    pub fn request_count(&self) -> usize {
        self.seen.lock().unwrap().len()
    }

    /// Command lines sent, in order
    pub fn commands(&self) -> Vec<String> {
        self.requests()
            .into_iter()
            .filter_map(|request| request.command)
            .collect()
    }

    pub fn clear(&self) {
        self.seen.lock().unwrap().clear();
    }
}

#[async_trait::async_trait]
impl ZoneTransport for MockTransport {
    async fn send(&self, request: &ApiRequest<'_>) -> Result<ApiResponse> {
        let command = match request.command {
            ApiCommand::List => None,
            ApiCommand::Action(line) => Some(line.to_string()),
        };
        self.seen.lock().unwrap().push(SeenRequest {
            domain: request.domain.to_string(),
            password: request.password.to_string(),
            command,
            form: request
                .form()
                .into_iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        });

        let queued = self.queued.lock().unwrap().pop_front();
        Ok(queued.unwrap_or_else(|| self.fallback.lock().unwrap().clone()))
    }
}

/// The zone used throughout the tests
pub fn unit_tests() -> ZoneName {
    ZoneName::new("unit.tests.").unwrap()
}

/// Password map with a single entry for `unit.tests.`
pub fn passwords() -> Option<HashMap<String, String>> {
    Some(HashMap::from([(
        "unit.tests.".to_string(),
        "mypassword".to_string(),
    )]))
}

/// A strict provider for `unit.tests.` backed by `transport`
pub fn provider_with(transport: &MockTransport) -> MythicBeastsProvider {
    MythicBeastsProvider::with_transport("test", passwords(), Box::new(transport.clone())).unwrap()
}

/// Build a zone from records
pub fn zone_with(records: Vec<Record>) -> Zone {
    let mut zone = Zone::new(unit_tests());
    for record in records {
        zone.add_record(record).unwrap();
    }
    zone
}

/// Contents of the LIST fixture
pub fn listing_fixture() -> &'static str {
    include_str!("../fixtures/mythicbeasts-list.txt")
}
