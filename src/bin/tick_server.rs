use std::env;
use std::sync::Mutex;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use actix_web::{web, App, HttpServer};
use log::info;

use ticklab::ticker::server::{history, info as feed_info, latest, AppState};
use ticklab::ticker::TickFeed;

const SYMBOL: &str = "EURUSD";
const START_PRICE: f64 = 1.10;
const SIGMA: f64 = 0.0005;
const INTERVAL_MS: u64 = 100;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init();
    let args: Vec<String> = env::args().collect();

    let address = args
        .get(1)
        .cloned()
        .unwrap_or_else(|| "127.0.0.1".to_string());
    let port: u16 = args
        .get(2)
        .and_then(|value| value.parse().ok())
        .unwrap_or(5555);

    let start_time_ms = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis() as i64)
        .unwrap_or(0);
    let app_state = web::Data::new(AppState {
        feed: Mutex::new(TickFeed::new(
            SYMBOL,
            START_PRICE,
            SIGMA,
            start_time_ms,
            INTERVAL_MS as i64,
            42,
        )),
    });

    //The feed advances on its own; handlers only ever read the log
    let generator_state = app_state.clone();
    actix_web::rt::spawn(async move {
        loop {
            actix_web::rt::time::sleep(Duration::from_millis(INTERVAL_MS)).await;
            generator_state.feed.lock().unwrap().tick();
        }
    });

    info!("streaming {SYMBOL} ticks on {address}:{port}");
    HttpServer::new(move || {
        App::new()
            .app_data(app_state.clone())
            .route("/", web::get().to(feed_info))
            .route("/latest", web::get().to(latest))
            .route("/history/{from}", web::get().to(history))
    })
    .bind((address, port))?
    .run()
    .await
}
