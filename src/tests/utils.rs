use astra::Body;
use http::{Method, Request};
use serde_json::Value;
use std::io::Read;
use std::sync::Arc;

use crate::auth::RoleTable;
use crate::db::{init_db, Database};
use crate::notify::Notifier;
use crate::ratelimit::RateLimiter;
use crate::router::handle;
use crate::scraper::{official_sources, OfficialUpdates};
use crate::services::{CacheStore, GeocodingService, ImageVerifier, LocationExtractor};
use crate::state::AppState;
use crate::tests::mocks::{CallCounter, FakeGeocoder, FakeImages, FakeModel, FakePages};

/// Fresh SQLite file under the temp dir with the production schema.
pub fn temp_db(name: &str) -> Database {
    let path = std::env::temp_dir().join(format!(
        "disaster_relief_{name}_{}.sqlite3",
        uuid::Uuid::new_v4()
    ));
    let db = Database::new(path.to_string_lossy().into_owned());
    init_db(&db).unwrap_or_else(|e| panic!("Database initialization failed: {e}"));
    db
}

/// App state wired to fakes, plus handles for asserting on them.
pub struct TestApp {
    pub state: AppState,
    pub model: Arc<FakeModel>,
    pub geocoder_calls: CallCounter,
    pub image_calls: CallCounter,
    pub page_calls: CallCounter,
}

pub struct TestAppBuilder {
    name: String,
    geocoder: FakeGeocoder,
    model: FakeModel,
    images: FakeImages,
    pages: FakePages,
}

impl TestAppBuilder {
    pub fn geocoder(mut self, geocoder: FakeGeocoder) -> Self {
        self.geocoder = geocoder;
        self
    }

    pub fn model(mut self, model: FakeModel) -> Self {
        self.model = model;
        self
    }

    pub fn images(mut self, images: FakeImages) -> Self {
        self.images = images;
        self
    }

    pub fn pages(mut self, pages: FakePages) -> Self {
        self.pages = pages;
        self
    }

    pub fn build(self) -> TestApp {
        let db = temp_db(&self.name);
        let cache = CacheStore::new(db.clone());
        let model = Arc::new(self.model);
        let geocoder_calls = self.geocoder.calls();
        let image_calls = self.images.calls();
        let page_calls = self.pages.calls();

        let state = AppState {
            db,
            cache: cache.clone(),
            auth: Box::new(RoleTable::demo()),
            geocoder: GeocodingService::new(cache.clone(), Box::new(self.geocoder)),
            extractor: LocationExtractor::new(cache.clone(), model.clone()),
            verifier: ImageVerifier::new(cache, model.clone(), Box::new(self.images)),
            updates: OfficialUpdates::new(Box::new(self.pages), official_sources()),
            notifier: Notifier::new(),
            limiter: RateLimiter::new(1000, std::time::Duration::from_secs(60)),
        };

        TestApp {
            state,
            model,
            geocoder_calls,
            image_calls,
            page_calls,
        }
    }
}

impl TestApp {
    /// Tokyo geocodes, the model answers "Tokyo", images download, every
    /// news source is down.
    pub fn builder(name: &str) -> TestAppBuilder {
        TestAppBuilder {
            name: name.to_string(),
            geocoder: FakeGeocoder::new().with("Tokyo", 35.68, 139.69),
            model: FakeModel::answering("Tokyo"),
            images: FakeImages::ok(),
            pages: FakePages::failing(),
        }
    }

    pub fn new(name: &str) -> Self {
        Self::builder(name).build()
    }

    /// Runs one request through the router and decodes the JSON body.
    pub fn call(&self, method: Method, uri: &str, user: Option<&str>, body: Option<Value>) -> (u16, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(user) = user {
            builder = builder.header("X-User-ID", user);
        }
        let body = match body {
            Some(v) => {
                builder = builder.header("Content-Type", "application/json");
                Body::from(v.to_string())
            }
            None => Body::empty(),
        };
        let req = builder.body(body).unwrap();

        let resp = handle(req, &self.state);
        let status = resp.status().as_u16();
        let mut raw = String::new();
        resp.into_body().reader().read_to_string(&mut raw).unwrap();
        let json = if raw.is_empty() {
            Value::Null
        } else {
            serde_json::from_str(&raw).unwrap_or_else(|e| panic!("non-JSON body {raw:?}: {e}"))
        };
        (status, json)
    }

    pub fn get(&self, uri: &str) -> (u16, Value) {
        self.call(Method::GET, uri, None, None)
    }
}
