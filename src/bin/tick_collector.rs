use std::env;
use std::fs::OpenOptions;
use std::thread;
use std::time::Duration;

use anyhow::Result;
use log::{debug, info};

use ticklab::ticker::client::TickClient;

fn main() -> Result<()> {
    env_logger::init();
    let args: Vec<String> = env::args().collect();

    let path = args
        .get(1)
        .cloned()
        .unwrap_or_else(|| "http://127.0.0.1:5555".to_string());
    let out = args.get(2).map(String::as_str).unwrap_or("ticks.csv");

    //Append-only table of time,symbol,price; the header is written once when the file is new
    let is_new = std::fs::metadata(out).map(|meta| meta.len() == 0).unwrap_or(true);
    let file = OpenOptions::new().create(true).append(true).open(out)?;
    let mut writer = csv::WriterBuilder::new()
        .has_headers(is_new)
        .from_writer(file);

    let client = TickClient::new(path);
    info!("collecting ticks into {out}");

    let mut from = 0;
    loop {
        let resp = client.history(from)?;
        for tick in &resp.ticks {
            writer.serialize(tick)?;
        }
        if !resp.ticks.is_empty() {
            writer.flush()?;
            debug!("appended {} ticks, cursor at {}", resp.ticks.len(), resp.next);
        }
        from = resp.next;
        thread::sleep(Duration::from_millis(100));
    }
}
