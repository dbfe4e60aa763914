use std::sync::Mutex;

use actix_web::web;
use serde::{Deserialize, Serialize};

use super::{Tick, TickFeed};

pub struct AppState {
    pub feed: Mutex<TickFeed>,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct InfoResponse {
    pub symbol: String,
    pub ticks: usize,
}

pub async fn info(app: web::Data<AppState>) -> web::Json<InfoResponse> {
    let feed = app.feed.lock().unwrap();
    web::Json(InfoResponse {
        symbol: feed.symbol().to_string(),
        ticks: feed.len(),
    })
}

#[derive(Debug, Deserialize, Serialize)]
pub struct LatestResponse {
    pub tick: Option<Tick>,
}

pub async fn latest(app: web::Data<AppState>) -> web::Json<LatestResponse> {
    let feed = app.feed.lock().unwrap();
    web::Json(LatestResponse {
        tick: feed.latest().cloned(),
    })
}

#[derive(Debug, Deserialize, Serialize)]
pub struct HistoryResponse {
    pub ticks: Vec<Tick>,
    ///Cursor to poll from on the next request.
    pub next: usize,
}

pub async fn history(
    app: web::Data<AppState>,
    path: web::Path<(usize,)>,
) -> web::Json<HistoryResponse> {
    let (from,) = path.into_inner();
    let feed = app.feed.lock().unwrap();
    web::Json(HistoryResponse {
        ticks: feed.history_from(from).to_vec(),
        next: feed.len(),
    })
}

#[cfg(test)]
mod tests {
    use actix_web::{test, web, App};

    use super::*;

    fn setup() -> web::Data<AppState> {
        let mut feed = TickFeed::new("EURUSD", 1.10, 0.0005, 1_000, 100, 42);
        for _ in 0..5 {
            feed.tick();
        }
        web::Data::new(AppState {
            feed: Mutex::new(feed),
        })
    }

    #[actix_web::test]
    async fn test_that_subscriber_can_follow_the_feed() {
        let app_state = setup();
        let app = test::init_service(
            App::new()
                .app_data(app_state.clone())
                .route("/", web::get().to(info))
                .route("/latest", web::get().to(latest))
                .route("/history/{from}", web::get().to(history)),
        )
        .await;

        let req = test::TestRequest::get().uri("/").to_request();
        let resp: InfoResponse = test::call_and_read_body_json(&app, req).await;
        assert_eq!(resp.symbol, "EURUSD");
        assert_eq!(resp.ticks, 5);

        let req = test::TestRequest::get().uri("/history/0").to_request();
        let resp: HistoryResponse = test::call_and_read_body_json(&app, req).await;
        assert_eq!(resp.ticks.len(), 5);
        assert_eq!(resp.next, 5);

        //New ticks arrive between polls; the cursor picks up only the new ones
        app_state.feed.lock().unwrap().tick();
        let req = test::TestRequest::get().uri("/history/5").to_request();
        let resp: HistoryResponse = test::call_and_read_body_json(&app, req).await;
        assert_eq!(resp.ticks.len(), 1);
        assert_eq!(resp.next, 6);

        let req = test::TestRequest::get().uri("/latest").to_request();
        let resp: LatestResponse = test::call_and_read_body_json(&app, req).await;
        assert_eq!(resp.tick.unwrap().time, 1_500);
    }

    #[actix_web::test]
    async fn test_that_empty_feed_reads_as_empty() {
        let feed = TickFeed::new("EURUSD", 1.10, 0.0005, 0, 100, 1);
        let app_state = web::Data::new(AppState {
            feed: Mutex::new(feed),
        });
        let app = test::init_service(
            App::new()
                .app_data(app_state)
                .route("/latest", web::get().to(latest))
                .route("/history/{from}", web::get().to(history)),
        )
        .await;

        let req = test::TestRequest::get().uri("/latest").to_request();
        let resp: LatestResponse = test::call_and_read_body_json(&app, req).await;
        assert!(resp.tick.is_none());

        let req = test::TestRequest::get().uri("/history/0").to_request();
        let resp: HistoryResponse = test::call_and_read_body_json(&app, req).await;
        assert!(resp.ticks.is_empty());
        assert_eq!(resp.next, 0);
    }
}
